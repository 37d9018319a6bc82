/*
 * Copyright (c) 2019 Geoffroy Couprie <contact@geoffroycouprie.com> and Contributors to the Eclipse Foundation.
 * SPDX-License-Identifier: Apache-2.0
 */
use std::time::Duration;

use bencher::{benchmark_group, benchmark_main, Bencher};
use biscuit_datalog::{builder::*, AuthorizerBuilder, AuthorizerLimits, Token};

fn limits() -> AuthorizerLimits {
    AuthorizerLimits {
        max_facts: 100_000,
        max_iterations: 100,
        max_time: Duration::from_secs(10),
    }
}

fn token() -> Token {
    let mut authority = BlockBuilder::new();
    for i in 0..50 {
        authority = authority
            .fact(fact("right", &[string(&format!("file{}", i)), string("read")]))
            .unwrap();
    }
    Token::new(authority, b"rev-0").append(
        BlockBuilder::new()
            .check(check(&[pred("operation", &[string("read")])]))
            .unwrap(),
        b"rev-1",
        None,
    )
}

fn authorizer(token: &Token) -> biscuit_datalog::Authorizer {
    AuthorizerBuilder::new()
        .fact(fact("resource", &[string("file25")]))
        .unwrap()
        .fact(fact("operation", &[string("read")]))
        .unwrap()
        .rule(rule(
            "can_access",
            &[var("f")],
            &[
                pred("resource", &[var("f")]),
                pred("right", &[var("f"), string("read")]),
            ],
        ))
        .unwrap()
        .policy(allow_policy(vec![query(
            vec![pred("can_access", &[var("f")])],
            vec![],
            vec![],
        )]))
        .unwrap()
        .limits(limits())
        .build(token)
        .unwrap()
}

fn build_authorizer(b: &mut Bencher) {
    let token = token();

    b.iter(|| {
        let _ = authorizer(&token);
    });
}

fn authorize_token(b: &mut Bencher) {
    let token = token();

    b.iter(|| {
        let mut authorizer = authorizer(&token);
        authorizer.authorize().unwrap();
    });
}

benchmark_group!(world, build_authorizer, authorize_token);
benchmark_main!(world);
