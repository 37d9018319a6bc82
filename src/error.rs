/*
 * Copyright (c) 2019 Geoffroy Couprie <contact@geoffroycouprie.com> and Contributors to the Eclipse Foundation.
 * SPDX-License-Identifier: Apache-2.0
 */
//! error types for the evaluator
//!
//! callers are expected to match on [Error] exhaustively: execution limits,
//! static rule validation and authorization results are all reported there.
use std::fmt;
use thiserror::Error;

/// errors returned when evaluating a token's blocks and the authorizer's policies
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("reached the maximum execution time allowed")]
    Timeout,
    #[error("reached the maximum number of facts allowed")]
    TooManyFacts,
    #[error("reached the maximum number of iterations allowed")]
    TooManyIterations,
    #[error("the rule's head contains variables that are not bound by its body: {0}")]
    InvalidRule(String),
    #[error("facts cannot contain variables: {0}")]
    InvalidFact(String),
    #[error("authorization failed: {0}")]
    Result(#[from] ResultError),
}

/// outcome of check and policy evaluation, once the world is fully generated
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ResultError {
    /// a policy allowed the request, but some checks failed
    #[error("the following checks failed: {0:?}")]
    FailedChecks(Vec<FailedCheck>),
    /// no policy matched. The list of failed checks may be empty
    #[error("no matching policy was found, and the following checks failed: {0:?}")]
    NoPoliciesMatched(Vec<FailedCheck>),
    /// a deny policy matched. The list of failed checks may be empty
    #[error("the policy `{policy}` denied the request (failed checks: {checks:?})")]
    DenyRuleMatched {
        checks: Vec<FailedCheck>,
        policy_id: usize,
        policy: String,
    },
}

/// check that failed during authorization, with its printed source
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum FailedCheck {
    #[error("{0}")]
    Block(FailedBlockCheck),
    #[error("{0}")]
    Authorizer(FailedAuthorizerCheck),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailedBlockCheck {
    pub block_id: u32,
    pub check_id: u32,
    /// pretty printed check
    pub rule: String,
}

impl fmt::Display for FailedBlockCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "check n°{} in block n°{}: {}",
            self.check_id, self.block_id, self.rule
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailedAuthorizerCheck {
    pub check_id: u32,
    /// pretty printed check
    pub rule: String,
}

impl fmt::Display for FailedAuthorizerCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "check n°{} in the authorizer: {}", self.check_id, self.rule)
    }
}

/// failure modes of expression evaluation
///
/// these stay local to the rule matcher: a failing expression drops the
/// candidate binding instead of aborting the whole computation
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum Expression {
    #[error("unknown variable {0}")]
    UnknownVariable(u32),
    #[error("unknown symbol {0}")]
    UnknownSymbol(u64),
    #[error("unexpected value type on the stack")]
    InvalidType,
    #[error("the expression is malformed")]
    InvalidStack,
    #[error("overflow")]
    Overflow,
    #[error("division by zero")]
    DivideByZero,
}
