/*
 * Copyright (c) 2019 Geoffroy Couprie <contact@geoffroycouprie.com> and Contributors to the Eclipse Foundation.
 * SPDX-License-Identifier: Apache-2.0
 */
//! Scoped Datalog engine for Biscuit authorization tokens
//!
//! A Biscuit token carries a chain of cryptographically signed blocks, each
//! holding Datalog facts, rules and checks. This crate implements the
//! evaluation side: given the blocks of a verified token and the
//! authorizer's own block and policies, it derives every reachable fact,
//! evaluates every check, and selects the policy that decides the request.
//!
//! Token signing, serialization and the surface syntax parser live in their
//! own crates; the engine receives already parsed, already authenticated
//! block structures.
//!
//! Every fact is tagged with its *origin*, the set of blocks that
//! participated in deriving it, and a rule only consumes facts whose whole
//! origin it trusts. Blocks appended after the authority block can therefore
//! restrict a token but never extend what the authority block grants:
//!
//! ```rust
//! use biscuit_datalog::{
//!     builder::*, error, AuthorizerBuilder, AuthorizerLimits, Token,
//! };
//! use std::time::Duration;
//!
//! fn main() -> Result<(), error::Error> {
//!     // the authority block carries the token's rights
//!     let authority = BlockBuilder::new()
//!         .fact(fact("right", &[string("file1"), string("read")]))?;
//!
//!     // an attenuation block can add a check, not new rights
//!     let block1 = BlockBuilder::new()
//!         .check(check(&[pred("operation", &[string("read")])]))?;
//!
//!     let token = Token::new(authority, b"revocation-id-0").append(
//!         block1,
//!         b"revocation-id-1",
//!         None,
//!     );
//!
//!     let mut authorizer = AuthorizerBuilder::new()
//!         .fact(fact("operation", &[string("read")]))?
//!         .policy(allow_policy(vec![query(
//!             vec![pred("right", &[string("file1"), string("read")])],
//!             vec![],
//!             vec![],
//!         )]))?
//!         .limits(AuthorizerLimits {
//!             max_time: Duration::from_secs(1),
//!             ..Default::default()
//!         })
//!         .build(&token)?;
//!
//!     let success = authorizer.authorize()?;
//!     assert_eq!(success.policy_id, 0);
//!     Ok(())
//! }
//! ```
pub mod builder;
pub mod datalog;
pub mod error;
mod token;

pub use datalog::RunLimits;
pub use token::authorizer::{
    AuthorizationSuccess, Authorizer, AuthorizerBuilder, AuthorizerLimits, Binding, MatchedQuery,
};
pub use token::{Algorithm, PublicKey, Token, TokenBlock};
