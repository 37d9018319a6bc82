/*
 * Copyright (c) 2019 Geoffroy Couprie <contact@geoffroycouprie.com> and Contributors to the Eclipse Foundation.
 * SPDX-License-Identifier: Apache-2.0
 */
use crate::error;

use super::SymbolTable;
use super::Term;
use regex::RegexBuilder;
use std::collections::HashMap;

/// upper bound on the compiled size of a regular expression
///
/// the `matches` operator compiles patterns provided by untrusted blocks;
/// a pattern that does not fit makes the expression fail
pub const REGEX_SIZE_LIMIT: usize = 1 << 20;

/// an expression, stored as a list of operations in reverse polish notation
///
/// this is the form used on the wire and by the evaluator; [ExpressionTree]
/// provides the equivalent tree representation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Expression {
    pub ops: Vec<Op>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Op {
    Value(Term),
    Unary(Unary),
    Binary(Binary),
}

/// Unary operation code
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Unary {
    Negate,
    Parens,
    Length,
}

impl Unary {
    fn evaluate(&self, value: Term, symbols: &SymbolTable) -> Result<Term, error::Expression> {
        match (self, value) {
            (Unary::Negate, Term::Bool(b)) => Ok(Term::Bool(!b)),
            (Unary::Parens, i) => Ok(i),
            (Unary::Length, Term::Str(i)) => symbols
                .get_symbol(i)
                .map(|s| Term::Integer(s.len() as i64))
                .ok_or(error::Expression::UnknownSymbol(i)),
            (Unary::Length, Term::Bytes(s)) => Ok(Term::Integer(s.len() as i64)),
            (Unary::Length, Term::Set(s)) => Ok(Term::Integer(s.len() as i64)),
            _ => Err(error::Expression::InvalidType),
        }
    }

    pub fn print(&self, value: String) -> String {
        match self {
            Unary::Negate => format!("!{}", value),
            Unary::Parens => format!("({})", value),
            Unary::Length => format!("{}.length()", value),
        }
    }
}

/// Binary operation code
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
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

impl Binary {
    fn evaluate(
        &self,
        left: Term,
        right: Term,
        symbols: &SymbolTable,
    ) -> Result<Term, error::Expression> {
        match (self, left, right) {
            // integer
            (Binary::LessThan, Term::Integer(i), Term::Integer(j)) => Ok(Term::Bool(i < j)),
            (Binary::GreaterThan, Term::Integer(i), Term::Integer(j)) => Ok(Term::Bool(i > j)),
            (Binary::LessOrEqual, Term::Integer(i), Term::Integer(j)) => Ok(Term::Bool(i <= j)),
            (Binary::GreaterOrEqual, Term::Integer(i), Term::Integer(j)) => Ok(Term::Bool(i >= j)),
            (Binary::Equal, Term::Integer(i), Term::Integer(j)) => Ok(Term::Bool(i == j)),
            (Binary::Add, Term::Integer(i), Term::Integer(j)) => i
                .checked_add(j)
                .map(Term::Integer)
                .ok_or(error::Expression::Overflow),
            (Binary::Sub, Term::Integer(i), Term::Integer(j)) => i
                .checked_sub(j)
                .map(Term::Integer)
                .ok_or(error::Expression::Overflow),
            (Binary::Mul, Term::Integer(i), Term::Integer(j)) => i
                .checked_mul(j)
                .map(Term::Integer)
                .ok_or(error::Expression::Overflow),
            (Binary::Div, Term::Integer(i), Term::Integer(j)) => i
                .checked_div(j)
                .map(Term::Integer)
                .ok_or(error::Expression::DivideByZero),

            // string
            (Binary::Prefix, Term::Str(s), Term::Str(pref)) => {
                match (symbols.get_symbol(s), symbols.get_symbol(pref)) {
                    (Some(s), Some(pref)) => Ok(Term::Bool(s.starts_with(pref))),
                    (Some(_), None) => Err(error::Expression::UnknownSymbol(pref)),
                    _ => Err(error::Expression::UnknownSymbol(s)),
                }
            }
            (Binary::Suffix, Term::Str(s), Term::Str(suff)) => {
                match (symbols.get_symbol(s), symbols.get_symbol(suff)) {
                    (Some(s), Some(suff)) => Ok(Term::Bool(s.ends_with(suff))),
                    (Some(_), None) => Err(error::Expression::UnknownSymbol(suff)),
                    _ => Err(error::Expression::UnknownSymbol(s)),
                }
            }
            (Binary::Regex, Term::Str(s), Term::Str(r)) => {
                match (symbols.get_symbol(s), symbols.get_symbol(r)) {
                    (Some(s), Some(r)) => Ok(Term::Bool(
                        RegexBuilder::new(r)
                            .size_limit(REGEX_SIZE_LIMIT)
                            .build()
                            .map(|re| re.is_match(s))
                            .unwrap_or(false),
                    )),
                    (Some(_), None) => Err(error::Expression::UnknownSymbol(r)),
                    _ => Err(error::Expression::UnknownSymbol(s)),
                }
            }
            (Binary::Contains, Term::Str(s), Term::Str(pattern)) => {
                match (symbols.get_symbol(s), symbols.get_symbol(pattern)) {
                    (Some(s), Some(pattern)) => Ok(Term::Bool(s.contains(pattern))),
                    (Some(_), None) => Err(error::Expression::UnknownSymbol(pattern)),
                    _ => Err(error::Expression::UnknownSymbol(s)),
                }
            }
            (Binary::LessThan, Term::Str(i), Term::Str(j)) => {
                match (symbols.get_symbol(i), symbols.get_symbol(j)) {
                    (Some(i), Some(j)) => Ok(Term::Bool(i < j)),
                    (Some(_), None) => Err(error::Expression::UnknownSymbol(j)),
                    _ => Err(error::Expression::UnknownSymbol(i)),
                }
            }
            (Binary::GreaterThan, Term::Str(i), Term::Str(j)) => {
                match (symbols.get_symbol(i), symbols.get_symbol(j)) {
                    (Some(i), Some(j)) => Ok(Term::Bool(i > j)),
                    (Some(_), None) => Err(error::Expression::UnknownSymbol(j)),
                    _ => Err(error::Expression::UnknownSymbol(i)),
                }
            }
            (Binary::LessOrEqual, Term::Str(i), Term::Str(j)) => {
                match (symbols.get_symbol(i), symbols.get_symbol(j)) {
                    (Some(i), Some(j)) => Ok(Term::Bool(i <= j)),
                    (Some(_), None) => Err(error::Expression::UnknownSymbol(j)),
                    _ => Err(error::Expression::UnknownSymbol(i)),
                }
            }
            (Binary::GreaterOrEqual, Term::Str(i), Term::Str(j)) => {
                match (symbols.get_symbol(i), symbols.get_symbol(j)) {
                    (Some(i), Some(j)) => Ok(Term::Bool(i >= j)),
                    (Some(_), None) => Err(error::Expression::UnknownSymbol(j)),
                    _ => Err(error::Expression::UnknownSymbol(i)),
                }
            }
            // interned strings are equal iff their indexes are
            (Binary::Equal, Term::Str(i), Term::Str(j)) => Ok(Term::Bool(i == j)),

            // date
            (Binary::LessThan, Term::Date(i), Term::Date(j)) => Ok(Term::Bool(i < j)),
            (Binary::GreaterThan, Term::Date(i), Term::Date(j)) => Ok(Term::Bool(i > j)),
            (Binary::LessOrEqual, Term::Date(i), Term::Date(j)) => Ok(Term::Bool(i <= j)),
            (Binary::GreaterOrEqual, Term::Date(i), Term::Date(j)) => Ok(Term::Bool(i >= j)),
            (Binary::Equal, Term::Date(i), Term::Date(j)) => Ok(Term::Bool(i == j)),

            // byte array
            (Binary::Equal, Term::Bytes(i), Term::Bytes(j)) => Ok(Term::Bool(i == j)),

            // set
            (Binary::Equal, Term::Set(set), Term::Set(s)) => Ok(Term::Bool(set == s)),
            (Binary::Intersection, Term::Set(set), Term::Set(s)) => {
                Ok(Term::Set(set.intersection(&s).cloned().collect()))
            }
            (Binary::Union, Term::Set(set), Term::Set(s)) => {
                Ok(Term::Set(set.union(&s).cloned().collect()))
            }
            (Binary::Contains, Term::Set(set), Term::Integer(i)) => {
                Ok(Term::Bool(set.contains(&Term::Integer(i))))
            }
            (Binary::Contains, Term::Set(set), Term::Date(i)) => {
                Ok(Term::Bool(set.contains(&Term::Date(i))))
            }
            (Binary::Contains, Term::Set(set), Term::Bool(i)) => {
                Ok(Term::Bool(set.contains(&Term::Bool(i))))
            }
            (Binary::Contains, Term::Set(set), Term::Str(i)) => {
                Ok(Term::Bool(set.contains(&Term::Str(i))))
            }
            (Binary::Contains, Term::Set(set), Term::Bytes(i)) => {
                Ok(Term::Bool(set.contains(&Term::Bytes(i))))
            }

            // boolean
            // both operands were already evaluated, only the values combine
            (Binary::And, Term::Bool(i), Term::Bool(j)) => Ok(Term::Bool(i & j)),
            (Binary::Or, Term::Bool(i), Term::Bool(j)) => Ok(Term::Bool(i | j)),
            (Binary::Equal, Term::Bool(i), Term::Bool(j)) => Ok(Term::Bool(i == j)),

            _ => Err(error::Expression::InvalidType),
        }
    }

    pub fn print(&self, left: String, right: String) -> String {
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

impl Expression {
    pub fn evaluate(
        &self,
        values: &HashMap<u32, Term>,
        symbols: &SymbolTable,
    ) -> Result<Term, error::Expression> {
        let mut stack: Vec<Term> = Vec::new();

        for op in self.ops.iter() {
            match op {
                Op::Value(Term::Variable(i)) => match values.get(i) {
                    Some(term) => stack.push(term.clone()),
                    None => {
                        return Err(error::Expression::UnknownVariable(*i));
                    }
                },
                Op::Value(term) => stack.push(term.clone()),
                Op::Unary(unary) => match stack.pop() {
                    Some(term) => stack.push(unary.evaluate(term, symbols)?),
                    None => {
                        return Err(error::Expression::InvalidStack);
                    }
                },
                Op::Binary(binary) => match (stack.pop(), stack.pop()) {
                    (Some(right_term), Some(left_term)) => {
                        stack.push(binary.evaluate(left_term, right_term, symbols)?)
                    }
                    _ => {
                        return Err(error::Expression::InvalidStack);
                    }
                },
            }
        }

        if stack.len() == 1 {
            Ok(stack.remove(0))
        } else {
            Err(error::Expression::InvalidStack)
        }
    }

    pub fn print(&self, symbols: &SymbolTable) -> Option<String> {
        let mut stack: Vec<String> = Vec::new();

        for op in self.ops.iter() {
            match op {
                Op::Value(i) => stack.push(symbols.print_term(i)),
                Op::Unary(unary) => match stack.pop() {
                    None => return None,
                    Some(s) => stack.push(unary.print(s)),
                },
                Op::Binary(binary) => match (stack.pop(), stack.pop()) {
                    (Some(right), Some(left)) => stack.push(binary.print(left, right)),
                    _ => return None,
                },
            }
        }

        if stack.len() == 1 {
            Some(stack.remove(0))
        } else {
            None
        }
    }

    /// rebuilds the tree form from the stack representation
    ///
    /// returns `None` if the operation list is not a well formed reverse
    /// polish encoding of an expression
    pub fn to_tree(&self) -> Option<ExpressionTree> {
        let mut stack: Vec<ExpressionTree> = Vec::new();

        for op in self.ops.iter() {
            match op {
                Op::Value(term) => stack.push(ExpressionTree::Value(term.clone())),
                Op::Unary(unary) => {
                    let e = stack.pop()?;
                    stack.push(ExpressionTree::Unary(unary.clone(), Box::new(e)));
                }
                Op::Binary(binary) => {
                    let right = stack.pop()?;
                    let left = stack.pop()?;
                    stack.push(ExpressionTree::Binary(
                        binary.clone(),
                        Box::new(left),
                        Box::new(right),
                    ));
                }
            }
        }

        if stack.len() == 1 {
            stack.pop()
        } else {
            None
        }
    }
}

/// tree representation of an expression
///
/// the wire format stores expressions as a stack ([Expression]); both forms
/// convert into each other without loss
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExpressionTree {
    Value(Term),
    Unary(Unary, Box<ExpressionTree>),
    Binary(Binary, Box<ExpressionTree>, Box<ExpressionTree>),
}

impl ExpressionTree {
    pub fn to_expression(&self) -> Expression {
        let mut ops = Vec::new();
        self.push_ops(&mut ops);
        Expression { ops }
    }

    fn push_ops(&self, ops: &mut Vec<Op>) {
        match self {
            ExpressionTree::Value(term) => ops.push(Op::Value(term.clone())),
            ExpressionTree::Unary(unary, e) => {
                e.push_ops(ops);
                ops.push(Op::Unary(unary.clone()));
            }
            ExpressionTree::Binary(binary, left, right) => {
                left.push_ops(ops);
                right.push_ops(ops);
                ops.push(Op::Binary(binary.clone()));
            }
        }
    }
}
