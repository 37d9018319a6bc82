/*
 * Copyright (c) 2019 Geoffroy Couprie <contact@geoffroycouprie.com> and Contributors to the Eclipse Foundation.
 * SPDX-License-Identifier: Apache-2.0
 */
//! helper functions and structures to create blocks and authorizers
//!
//! these types carry plain strings and real dates; they are translated into
//! the interned datalog representation when loaded into an authorizer
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::time::SystemTime;

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::datalog::{self, SymbolTable};
use crate::error;
use crate::token::PublicKey;

/// Builder for a Datalog value
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Term {
    Variable(String),
    Integer(i64),
    Str(String),
    Date(OffsetDateTime),
    Bytes(Vec<u8>),
    Bool(bool),
    Set(BTreeSet<Term>),
}

impl From<&Term> for Term {
    fn from(i: &Term) -> Self {
        i.clone()
    }
}

impl AsRef<Term> for Term {
    fn as_ref(&self) -> &Term {
        self
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Variable(s) => write!(f, "${}", s),
            Term::Integer(i) => write!(f, "{}", i),
            Term::Str(s) => write!(f, "{:?}", s),
            Term::Date(d) => match d.format(&Rfc3339) {
                Ok(s) => write!(f, "{}", s),
                Err(_) => write!(f, "<invalid date>"),
            },
            Term::Bytes(s) => write!(f, "hex:{}", hex::encode(s)),
            Term::Bool(b) => {
                if *b {
                    write!(f, "true")
                } else {
                    write!(f, "false")
                }
            }
            Term::Set(s) => {
                let terms = s.iter().map(|t| t.to_string()).collect::<Vec<_>>();
                write!(f, "[{}]", terms.join(", "))
            }
        }
    }
}

/// conversions between the builder types and the interned datalog types
pub trait Convert<T>: Sized {
    fn convert(&self, symbols: &mut SymbolTable) -> T;
    fn convert_from(f: &T, symbols: &SymbolTable) -> Self;
}

impl Convert<datalog::Term> for Term {
    fn convert(&self, symbols: &mut SymbolTable) -> datalog::Term {
        match self {
            Term::Variable(s) => datalog::Term::Variable(symbols.insert(s) as u32),
            Term::Integer(i) => datalog::Term::Integer(*i),
            Term::Str(s) => datalog::Term::Str(symbols.insert(s)),
            Term::Date(d) => datalog::Term::Date(d.unix_timestamp_nanos()),
            Term::Bytes(s) => datalog::Term::Bytes(s.clone()),
            Term::Bool(b) => datalog::Term::Bool(*b),
            Term::Set(s) => datalog::Term::Set(s.iter().map(|i| i.convert(symbols)).collect()),
        }
    }

    fn convert_from(f: &datalog::Term, symbols: &SymbolTable) -> Self {
        match f {
            datalog::Term::Variable(i) => {
                Term::Variable(symbols.print_symbol_default(*i as u64))
            }
            datalog::Term::Integer(i) => Term::Integer(*i),
            datalog::Term::Str(index) => Term::Str(symbols.print_symbol_default(*index)),
            datalog::Term::Date(d) => Term::Date(
                OffsetDateTime::from_unix_timestamp_nanos(*d)
                    .unwrap_or(OffsetDateTime::UNIX_EPOCH),
            ),
            datalog::Term::Bytes(s) => Term::Bytes(s.clone()),
            datalog::Term::Bool(b) => Term::Bool(*b),
            datalog::Term::Set(s) => Term::Set(
                s.iter()
                    .map(|i| Term::convert_from(i, symbols))
                    .collect(),
            ),
        }
    }
}

/// Builder for a Datalog predicate, used in facts and rules
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Predicate {
    pub name: String,
    pub terms: Vec<Term>,
}

impl Predicate {
    pub fn new<T: Into<Vec<Term>>>(name: String, terms: T) -> Predicate {
        Predicate {
            name,
            terms: terms.into(),
        }
    }
}

impl Convert<datalog::Predicate> for Predicate {
    fn convert(&self, symbols: &mut SymbolTable) -> datalog::Predicate {
        datalog::Predicate {
            name: symbols.insert(&self.name),
            terms: self.terms.iter().map(|t| t.convert(symbols)).collect(),
        }
    }

    fn convert_from(p: &datalog::Predicate, symbols: &SymbolTable) -> Self {
        Predicate {
            name: symbols.print_symbol_default(p.name),
            terms: p
                .terms
                .iter()
                .map(|t| Term::convert_from(t, symbols))
                .collect(),
        }
    }
}

impl AsRef<Predicate> for Predicate {
    fn as_ref(&self) -> &Predicate {
        self
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let terms = self.terms.iter().map(|t| t.to_string()).collect::<Vec<_>>();
        write!(f, "{}({})", self.name, terms.join(", "))
    }
}

/// Builder for a Datalog fact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fact {
    pub predicate: Predicate,
}

impl Fact {
    pub fn new<T: Into<Vec<Term>>>(name: String, terms: T) -> Fact {
        Fact {
            predicate: Predicate::new(name, terms),
        }
    }

    /// facts are ground: variables are rejected, in sets too
    pub fn validate(&self) -> Result<(), String> {
        for term in &self.predicate.terms {
            validate_ground_term(term)?;
        }
        Ok(())
    }
}

impl Convert<datalog::Fact> for Fact {
    fn convert(&self, symbols: &mut SymbolTable) -> datalog::Fact {
        datalog::Fact {
            predicate: self.predicate.convert(symbols),
        }
    }

    fn convert_from(f: &datalog::Fact, symbols: &SymbolTable) -> Self {
        Fact {
            predicate: Predicate::convert_from(&f.predicate, symbols),
        }
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.predicate.fmt(f)
    }
}

fn validate_ground_term(term: &Term) -> Result<(), String> {
    match term {
        Term::Variable(s) => Err(format!("variables are not allowed here: ${}", s)),
        Term::Set(_) => validate_set_term(term),
        _ => Ok(()),
    }
}

fn validate_set_term(term: &Term) -> Result<(), String> {
    if let Term::Set(s) = term {
        for inner in s {
            match inner {
                Term::Variable(name) => {
                    return Err(format!("sets cannot contain variables: ${}", name))
                }
                Term::Set(_) => return Err("sets cannot be nested".to_string()),
                _ => {}
            }
        }
    }
    Ok(())
}

/// Builder for a Datalog expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    pub ops: Vec<Op>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Value(Term),
    Unary(Unary),
    Binary(Binary),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unary {
    Negate,
    Parens,
    Length,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binary {
    LessThan,
    GreaterThan,
    LessOrEqual,
    GreaterOrEqual,
    Equal,
    Contains,
    Prefix,
    Suffix,
    Regex,
    Add,
    Sub,
    Mul,
    Div,
    And,
    Or,
    Intersection,
    Union,
}

impl Convert<datalog::Expression> for Expression {
    fn convert(&self, symbols: &mut SymbolTable) -> datalog::Expression {
        datalog::Expression {
            ops: self.ops.iter().map(|op| op.convert(symbols)).collect(),
        }
    }

    fn convert_from(e: &datalog::Expression, symbols: &SymbolTable) -> Self {
        Expression {
            ops: e
                .ops
                .iter()
                .map(|op| Op::convert_from(op, symbols))
                .collect(),
        }
    }
}

impl Convert<datalog::Op> for Op {
    fn convert(&self, symbols: &mut SymbolTable) -> datalog::Op {
        match self {
            Op::Value(t) => datalog::Op::Value(t.convert(symbols)),
            Op::Unary(u) => datalog::Op::Unary(u.convert()),
            Op::Binary(b) => datalog::Op::Binary(b.convert()),
        }
    }

    fn convert_from(op: &datalog::Op, symbols: &SymbolTable) -> Self {
        match op {
            datalog::Op::Value(t) => Op::Value(Term::convert_from(t, symbols)),
            datalog::Op::Unary(u) => Op::Unary(Unary::convert_from(u)),
            datalog::Op::Binary(b) => Op::Binary(Binary::convert_from(b)),
        }
    }
}

impl Unary {
    fn convert(&self) -> datalog::Unary {
        match self {
            Unary::Negate => datalog::Unary::Negate,
            Unary::Parens => datalog::Unary::Parens,
            Unary::Length => datalog::Unary::Length,
        }
    }

    fn convert_from(u: &datalog::Unary) -> Self {
        match u {
            datalog::Unary::Negate => Unary::Negate,
            datalog::Unary::Parens => Unary::Parens,
            datalog::Unary::Length => Unary::Length,
        }
    }

    fn print(&self, value: String) -> String {
        match self {
            Unary::Negate => format!("!{}", value),
            Unary::Parens => format!("({})", value),
            Unary::Length => format!("{}.length()", value),
        }
    }
}

impl Binary {
    fn convert(&self) -> datalog::Binary {
        match self {
            Binary::LessThan => datalog::Binary::LessThan,
            Binary::GreaterThan => datalog::Binary::GreaterThan,
            Binary::LessOrEqual => datalog::Binary::LessOrEqual,
            Binary::GreaterOrEqual => datalog::Binary::GreaterOrEqual,
            Binary::Equal => datalog::Binary::Equal,
            Binary::Contains => datalog::Binary::Contains,
            Binary::Prefix => datalog::Binary::Prefix,
            Binary::Suffix => datalog::Binary::Suffix,
            Binary::Regex => datalog::Binary::Regex,
            Binary::Add => datalog::Binary::Add,
            Binary::Sub => datalog::Binary::Sub,
            Binary::Mul => datalog::Binary::Mul,
            Binary::Div => datalog::Binary::Div,
            Binary::And => datalog::Binary::And,
            Binary::Or => datalog::Binary::Or,
            Binary::Intersection => datalog::Binary::Intersection,
            Binary::Union => datalog::Binary::Union,
        }
    }

    fn convert_from(b: &datalog::Binary) -> Self {
        match b {
            datalog::Binary::LessThan => Binary::LessThan,
            datalog::Binary::GreaterThan => Binary::GreaterThan,
            datalog::Binary::LessOrEqual => Binary::LessOrEqual,
            datalog::Binary::GreaterOrEqual => Binary::GreaterOrEqual,
            datalog::Binary::Equal => Binary::Equal,
            datalog::Binary::Contains => Binary::Contains,
            datalog::Binary::Prefix => Binary::Prefix,
            datalog::Binary::Suffix => Binary::Suffix,
            datalog::Binary::Regex => Binary::Regex,
            datalog::Binary::Add => Binary::Add,
            datalog::Binary::Sub => Binary::Sub,
            datalog::Binary::Mul => Binary::Mul,
            datalog::Binary::Div => Binary::Div,
            datalog::Binary::And => Binary::And,
            datalog::Binary::Or => Binary::Or,
            datalog::Binary::Intersection => Binary::Intersection,
            datalog::Binary::Union => Binary::Union,
        }
    }

    fn print(&self, left: String, right: String) -> String {
        match self {
            Binary::LessThan => format!("{} < {}", left, right),
            Binary::GreaterThan => format!("{} > {}", left, right),
            Binary::LessOrEqual => format!("{} <= {}", left, right),
            Binary::GreaterOrEqual => format!("{} >= {}", left, right),
            Binary::Equal => format!("{} == {}", left, right),
            Binary::Contains => format!("{}.contains({})", left, right),
            Binary::Prefix => format!("{}.starts_with({})", left, right),
            Binary::Suffix => format!("{}.ends_with({})", left, right),
            Binary::Regex => format!("{}.matches({})", left, right),
            Binary::Add => format!("{} + {}", left, right),
            Binary::Sub => format!("{} - {}", left, right),
            Binary::Mul => format!("{} * {}", left, right),
            Binary::Div => format!("{} / {}", left, right),
            Binary::And => format!("{} && {}", left, right),
            Binary::Or => format!("{} || {}", left, right),
            Binary::Intersection => format!("{}.intersection({})", left, right),
            Binary::Union => format!("{}.union({})", left, right),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack: Vec<String> = Vec::new();

        for op in self.ops.iter() {
            match op {
                Op::Value(i) => stack.push(i.to_string()),
                Op::Unary(unary) => match stack.pop() {
                    None => return write!(f, "<invalid expression>"),
                    Some(s) => stack.push(unary.print(s)),
                },
                Op::Binary(binary) => match (stack.pop(), stack.pop()) {
                    (Some(right), Some(left)) => stack.push(binary.print(left, right)),
                    _ => return write!(f, "<invalid expression>"),
                },
            }
        }

        if stack.len() == 1 {
            write!(f, "{}", stack.remove(0))
        } else {
            write!(f, "<invalid expression>")
        }
    }
}

/// scope annotation, written after `trusting` in the surface syntax
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// the facts of the authority block
    Authority,
    /// the facts of all the blocks before this one
    Previous,
    /// the facts of the blocks signed by this key
    PublicKey(PublicKey),
}

impl Scope {
    pub fn convert(&self, symbols: &mut SymbolTable) -> crate::token::Scope {
        match self {
            Scope::Authority => crate::token::Scope::Authority,
            Scope::Previous => crate::token::Scope::Previous,
            Scope::PublicKey(key) => {
                crate::token::Scope::PublicKey(symbols.public_keys.insert(key))
            }
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Authority => write!(f, "authority"),
            Scope::Previous => write!(f, "previous"),
            Scope::PublicKey(key) => write!(f, "{}", key),
        }
    }
}

/// Builder for a Datalog rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub head: Predicate,
    pub body: Vec<Predicate>,
    pub expressions: Vec<Expression>,
    pub scopes: Vec<Scope>,
}

impl Rule {
    pub fn new(
        head: Predicate,
        body: Vec<Predicate>,
        expressions: Vec<Expression>,
        scopes: Vec<Scope>,
    ) -> Rule {
        Rule {
            head,
            body,
            expressions,
            scopes,
        }
    }

    /// every variable used in the head or the expressions must be bound by a
    /// body predicate
    pub fn validate_variables(&self) -> Result<(), String> {
        let mut free_variables: HashSet<String> = HashSet::default();
        for term in self.head.terms.iter() {
            if let Term::Variable(s) = term {
                free_variables.insert(s.to_string());
            }
        }

        for e in self.expressions.iter() {
            for op in e.ops.iter() {
                if let Op::Value(Term::Variable(s)) = op {
                    free_variables.insert(s.to_string());
                }
            }
        }

        for predicate in self.body.iter() {
            for term in predicate.terms.iter() {
                if let Term::Variable(v) = term {
                    free_variables.remove(v);
                    if free_variables.is_empty() {
                        return Ok(());
                    }
                }
            }
        }

        if free_variables.is_empty() {
            Ok(())
        } else {
            Err(format!(
                "the rule contains variables that are not bound by predicates in the rule's body: {}",
                free_variables
                    .iter()
                    .map(|s| format!("${}", s))
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        }
    }

    /// set values may not contain variables or other sets
    pub fn validate_terms(&self) -> Result<(), String> {
        for term in self.head.terms.iter() {
            validate_set_term(term)?;
        }
        for predicate in self.body.iter() {
            for term in predicate.terms.iter() {
                validate_set_term(term)?;
            }
        }
        for e in self.expressions.iter() {
            for op in e.ops.iter() {
                if let Op::Value(term) = op {
                    validate_set_term(term)?;
                }
            }
        }
        Ok(())
    }

    pub fn convert(&self, symbols: &mut SymbolTable) -> datalog::Rule {
        datalog::Rule {
            head: self.head.convert(symbols),
            body: self.body.iter().map(|p| p.convert(symbols)).collect(),
            expressions: self
                .expressions
                .iter()
                .map(|e| e.convert(symbols))
                .collect(),
            scopes: self.scopes.iter().map(|s| s.convert(symbols)).collect(),
        }
    }
}

fn display_rule_body(r: &Rule, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut printed = false;
    for (i, predicate) in r.body.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", predicate)?;
        printed = true;
    }
    for expression in r.expressions.iter() {
        if printed {
            write!(f, ", ")?;
        }
        write!(f, "{}", expression)?;
        printed = true;
    }
    if !r.scopes.is_empty() {
        let scopes = r.scopes.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        write!(f, " trusting {}", scopes.join(", "))?;
    }
    Ok(())
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <- ", self.head)?;
        display_rule_body(self, f)
    }
}

/// Builder for a Biscuit check
///
/// the check passes if any of its queries has a solution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Check {
    pub queries: Vec<Rule>,
}

impl Check {
    pub fn validate(&self) -> Result<(), String> {
        for query in &self.queries {
            query.validate_variables()?;
            query.validate_terms()?;
        }
        Ok(())
    }

    pub fn convert(&self, symbols: &mut SymbolTable) -> datalog::Check {
        datalog::Check {
            queries: self.queries.iter().map(|q| q.convert(symbols)).collect(),
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "check if ")?;
        for (i, query) in self.queries.iter().enumerate() {
            if i > 0 {
                write!(f, " or ")?;
            }
            display_rule_body(query, f)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyKind {
    Allow,
    Deny,
}

/// Builder for an authorizer policy
///
/// policies are ordered, and the first one with a solution decides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    pub queries: Vec<Rule>,
    pub kind: PolicyKind,
}

impl Policy {
    pub fn validate(&self) -> Result<(), String> {
        for query in &self.queries {
            query.validate_variables()?;
            query.validate_terms()?;
        }
        Ok(())
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            PolicyKind::Allow => write!(f, "allow if ")?,
            PolicyKind::Deny => write!(f, "deny if ")?,
        }
        for (i, query) in self.queries.iter().enumerate() {
            if i > 0 {
                write!(f, " or ")?;
            }
            display_rule_body(query, f)?;
        }
        Ok(())
    }
}

/// Builder for a block's contents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockBuilder {
    pub facts: Vec<Fact>,
    pub rules: Vec<Rule>,
    pub checks: Vec<Check>,
    pub scopes: Vec<Scope>,
    pub context: Option<String>,
}

impl BlockBuilder {
    pub fn new() -> BlockBuilder {
        BlockBuilder::default()
    }

    pub fn fact(mut self, fact: Fact) -> Result<Self, error::Error> {
        fact.validate()
            .map_err(|_| error::Error::InvalidFact(fact.to_string()))?;
        self.facts.push(fact);
        Ok(self)
    }

    pub fn rule(mut self, rule: Rule) -> Result<Self, error::Error> {
        rule.validate_variables()
            .and_then(|_| rule.validate_terms())
            .map_err(|_| error::Error::InvalidRule(rule.to_string()))?;
        self.rules.push(rule);
        Ok(self)
    }

    pub fn check(mut self, check: Check) -> Result<Self, error::Error> {
        check
            .validate()
            .map_err(|_| error::Error::InvalidRule(check.to_string()))?;
        self.checks.push(check);
        Ok(self)
    }

    /// sets the default scope for this block's rules and checks
    pub fn scope(mut self, scope: Scope) -> Self {
        self.scopes.push(scope);
        self
    }

    /// free form text field for application specific data
    pub fn context(mut self, context: &str) -> Self {
        self.context = Some(context.to_string());
        self
    }
}

impl fmt::Display for BlockBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for fact in &self.facts {
            writeln!(f, "{};", fact)?;
        }
        for rule in &self.rules {
            writeln!(f, "{};", rule)?;
        }
        for check in &self.checks {
            writeln!(f, "{};", check)?;
        }
        Ok(())
    }
}

/// creates a new fact
pub fn fact<I: AsRef<Term>>(name: &str, terms: &[I]) -> Fact {
    let pred = pred(name, terms);
    Fact::new(pred.name, pred.terms)
}

/// creates a predicate
pub fn pred<I: AsRef<Term>>(name: &str, terms: &[I]) -> Predicate {
    Predicate {
        name: name.to_string(),
        terms: terms.iter().map(|term| term.as_ref().clone()).collect(),
    }
}

/// creates a rule
pub fn rule<T: AsRef<Term>>(head_name: &str, head_terms: &[T], predicates: &[Predicate]) -> Rule {
    Rule::new(
        pred(head_name, head_terms),
        predicates.to_vec(),
        Vec::new(),
        vec![],
    )
}

/// creates a rule with constraints
pub fn constrained_rule<T: AsRef<Term>>(
    head_name: &str,
    head_terms: &[T],
    predicates: &[Predicate],
    expressions: &[Expression],
) -> Rule {
    Rule::new(
        pred(head_name, head_terms),
        predicates.to_vec(),
        expressions.to_vec(),
        vec![],
    )
}

/// creates a check from a single query
pub fn check<P: AsRef<Predicate>>(predicates: &[P]) -> Check {
    let empty_terms: &[Term] = &[];
    Check {
        queries: vec![Rule::new(
            pred("query", empty_terms),
            predicates.iter().map(|p| p.as_ref().clone()).collect(),
            vec![],
            vec![],
        )],
    }
}

/// creates a check from a full query, with expressions and scopes
pub fn query(body: Vec<Predicate>, expressions: Vec<Expression>, scopes: Vec<Scope>) -> Rule {
    let empty_terms: &[Term] = &[];
    Rule::new(pred("query", empty_terms), body, expressions, scopes)
}

/// creates an allow policy
pub fn allow_policy(queries: Vec<Rule>) -> Policy {
    Policy {
        queries,
        kind: PolicyKind::Allow,
    }
}

/// creates a deny policy
pub fn deny_policy(queries: Vec<Rule>) -> Policy {
    Policy {
        queries,
        kind: PolicyKind::Deny,
    }
}

/// creates an integer value
pub fn int(i: i64) -> Term {
    Term::Integer(i)
}

/// creates a string
pub fn string(s: &str) -> Term {
    Term::Str(s.to_string())
}

/// creates a date
pub fn date(t: &SystemTime) -> Term {
    Term::Date(OffsetDateTime::from(*t))
}

/// creates a variable for a rule
pub fn var(s: &str) -> Term {
    Term::Variable(s.to_string())
}

/// creates a variable for a rule
pub fn variable(s: &str) -> Term {
    Term::Variable(s.to_string())
}

/// creates a byte array
pub fn bytes(s: &[u8]) -> Term {
    Term::Bytes(s.to_vec())
}

/// creates a boolean
pub fn boolean(b: bool) -> Term {
    Term::Bool(b)
}

/// creates a set
pub fn set(s: BTreeSet<Term>) -> Term {
    Term::Set(s)
}
