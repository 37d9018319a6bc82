/*
 * Copyright (c) 2019 Geoffroy Couprie <contact@geoffroycouprie.com> and Contributors to the Eclipse Foundation.
 * SPDX-License-Identifier: Apache-2.0
 */
//! string interning
//!
//! To reduce the size of tokens, the language uses string interning: strings
//! are referred to by an index in a list of strings. A set of symbols that
//! come up often in authorization policies is predefined; symbols provided at
//! runtime start at an offset, so the default table can grow without
//! renumbering existing tokens.
use std::fmt::Write;

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use super::{Check, Expression, Fact, Predicate, Rule, SymbolIndex, Term};
use crate::token::{PublicKey, Scope};

/// the symbols predefined in every implementation
const DEFAULT_SYMBOLS: [&str; 27] = [
    "read",
    "write",
    "resource",
    "operation",
    "right",
    "time",
    "role",
    "owner",
    "tenant",
    "namespace",
    "user",
    "team",
    "service",
    "admin",
    "email",
    "group",
    "member",
    "ip_address",
    "client",
    "client_ip",
    "domain",
    "path",
    "version",
    "cluster",
    "node",
    "hostname",
    "nonce",
];

/// indexes from the default table are stable, so tokens only transmit
/// symbols starting at this offset
const OFFSET: usize = 1024;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SymbolTable {
    symbols: Vec<String>,
    /// interned public keys, referred to by index in `trusting` annotations
    pub public_keys: PublicKeys,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    pub fn insert(&mut self, s: &str) -> SymbolIndex {
        match DEFAULT_SYMBOLS.iter().position(|sym| *sym == s) {
            Some(index) => index as SymbolIndex,
            None => match self.symbols.iter().position(|sym| sym == s) {
                Some(index) => (OFFSET + index) as SymbolIndex,
                None => {
                    self.symbols.push(s.to_string());
                    (OFFSET + self.symbols.len() - 1) as SymbolIndex
                }
            },
        }
    }

    /// inserts a symbol and returns it as a string value
    pub fn add(&mut self, s: &str) -> Term {
        let id = self.insert(s);
        Term::Str(id)
    }

    pub fn get(&self, s: &str) -> Option<SymbolIndex> {
        match DEFAULT_SYMBOLS.iter().position(|sym| *sym == s) {
            Some(index) => Some(index as SymbolIndex),
            None => self
                .symbols
                .iter()
                .position(|sym| sym == s)
                .map(|i| (OFFSET + i) as SymbolIndex),
        }
    }

    pub fn get_symbol(&self, i: SymbolIndex) -> Option<&str> {
        let i = i as usize;
        if i < OFFSET {
            DEFAULT_SYMBOLS.get(i).copied()
        } else {
            self.symbols.get(i - OFFSET).map(|s| s.as_str())
        }
    }

    /// prints a symbol, with a fallback for unknown indexes
    pub fn print_symbol_default(&self, i: SymbolIndex) -> String {
        self.get_symbol(i)
            .map(|s| s.to_string())
            .unwrap_or_else(|| format!("<{}?>", i))
    }

    pub fn print_term(&self, term: &Term) -> String {
        match term {
            Term::Variable(i) => format!("${}", self.print_symbol_default(*i as SymbolIndex)),
            Term::Integer(i) => i.to_string(),
            Term::Str(index) => format!("{:?}", self.print_symbol_default(*index)),
            Term::Date(d) => print_date(*d),
            Term::Bytes(s) => format!("hex:{}", hex::encode(s)),
            Term::Bool(b) => {
                if *b {
                    "true".to_string()
                } else {
                    "false".to_string()
                }
            }
            Term::Set(s) => {
                let terms = s
                    .iter()
                    .map(|term| self.print_term(term))
                    .collect::<Vec<_>>();
                format!("[{}]", terms.join(", "))
            }
        }
    }

    pub fn print_predicate(&self, p: &Predicate) -> String {
        let strings = p
            .terms
            .iter()
            .map(|term| self.print_term(term))
            .collect::<Vec<_>>();
        format!(
            "{}({})",
            self.print_symbol_default(p.name),
            strings.join(", ")
        )
    }

    pub fn print_fact(&self, f: &Fact) -> String {
        self.print_predicate(&f.predicate)
    }

    pub fn print_expression(&self, e: &Expression) -> String {
        e.print(self)
            .unwrap_or_else(|| "<invalid expression>".to_string())
    }

    pub fn print_scope(&self, scope: &Scope) -> String {
        match scope {
            Scope::Authority => "authority".to_string(),
            Scope::Previous => "previous".to_string(),
            Scope::PublicKey(id) => match self.public_keys.get_key(*id) {
                Some(key) => key.to_string(),
                None => format!("<unknown key {}?>", id),
            },
        }
    }

    /// prints a rule's body: predicates, expressions, then the scope annotations
    pub fn print_rule_body(&self, r: &Rule) -> String {
        let mut res = String::new();
        let preds = r
            .body
            .iter()
            .map(|p| self.print_predicate(p))
            .collect::<Vec<_>>();
        let _ = write!(res, "{}", preds.join(", "));

        if !r.expressions.is_empty() {
            if !preds.is_empty() {
                let _ = write!(res, ", ");
            }
            let exprs = r
                .expressions
                .iter()
                .map(|e| self.print_expression(e))
                .collect::<Vec<_>>();
            let _ = write!(res, "{}", exprs.join(", "));
        }

        if !r.scopes.is_empty() {
            let scopes = r
                .scopes
                .iter()
                .map(|s| self.print_scope(s))
                .collect::<Vec<_>>();
            let _ = write!(res, " trusting {}", scopes.join(", "));
        }
        res
    }

    pub fn print_rule(&self, r: &Rule) -> String {
        format!(
            "{} <- {}",
            self.print_predicate(&r.head),
            self.print_rule_body(r)
        )
    }

    pub fn print_check(&self, c: &Check) -> String {
        let queries = c
            .queries
            .iter()
            .map(|r| self.print_rule_body(r))
            .collect::<Vec<_>>();
        format!("check if {}", queries.join(" or "))
    }
}

/// dates are stored as nanoseconds since the Unix epoch and rendered as
/// RFC 3339, subseconds included when they are non-zero
pub(crate) fn print_date(nanos: i128) -> String {
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .ok()
        .and_then(|date| date.format(&Rfc3339).ok())
        .unwrap_or_else(|| format!("<invalid date {}>", nanos))
}

/// table of the public keys that signed the token's blocks
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PublicKeys {
    pub(crate) keys: Vec<PublicKey>,
}

impl PublicKeys {
    pub fn new() -> Self {
        PublicKeys::default()
    }

    pub fn insert(&mut self, key: &PublicKey) -> u64 {
        match self.keys.iter().position(|k| k == key) {
            Some(index) => index as u64,
            None => {
                self.keys.push(key.clone());
                (self.keys.len() - 1) as u64
            }
        }
    }

    pub fn get_key(&self, i: u64) -> Option<&PublicKey> {
        self.keys.get(i as usize)
    }
}
