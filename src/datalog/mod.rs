/*
 * Copyright (c) 2019 Geoffroy Couprie <contact@geoffroycouprie.com> and Contributors to the Eclipse Foundation.
 * SPDX-License-Identifier: Apache-2.0
 */
//! Logic language implementation for checks
//!
//! facts are tagged with the set of blocks that produced them (their origin),
//! and rules only consume facts whose entire origin they trust. This is what
//! keeps extension blocks from influencing conclusions drawn from the
//! authority block
use crate::error;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::time::{Duration, Instant};

mod expression;
mod origin;
mod symbol;

pub use expression::*;
pub use origin::*;
pub use symbol::*;

pub use crate::token::Scope;

pub type SymbolIndex = u64;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    Variable(u32),
    Integer(i64),
    Str(SymbolIndex),
    /// nanoseconds since the Unix epoch, UTC
    Date(i128),
    Bytes(Vec<u8>),
    Bool(bool),
    Set(BTreeSet<Term>),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Predicate {
    pub name: SymbolIndex,
    pub terms: Vec<Term>,
}

impl Predicate {
    pub fn new(name: SymbolIndex, terms: &[Term]) -> Predicate {
        Predicate {
            name,
            terms: terms.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fact {
    pub predicate: Predicate,
}

impl Fact {
    pub fn new(name: SymbolIndex, terms: &[Term]) -> Fact {
        Fact {
            predicate: Predicate::new(name, terms),
        }
    }

    /// could this fact match the predicate? Variables are holes, any other
    /// term must be equal
    pub fn match_predicate(&self, predicate: &Predicate) -> bool {
        self.predicate.name == predicate.name
            && self.predicate.terms.len() == predicate.terms.len()
            && self
                .predicate
                .terms
                .iter()
                .zip(&predicate.terms)
                .all(|(fact_term, pred_term)| match pred_term {
                    Term::Variable(_) => true,
                    _ => fact_term == pred_term,
                })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rule {
    pub head: Predicate,
    pub body: Vec<Predicate>,
    pub expressions: Vec<Expression>,
    pub scopes: Vec<Scope>,
}

impl Rule {
    /// the set of variables appearing in the rule's body
    fn variables_set(&self) -> HashSet<u32> {
        self.body
            .iter()
            .flat_map(|pred| {
                pred.terms.iter().filter_map(|term| match term {
                    Term::Variable(i) => Some(*i),
                    _ => None,
                })
            })
            .collect()
    }

    /// every variable of the head must appear in the body
    pub fn is_range_restricted(&self) -> bool {
        let variables = self.variables_set();
        self.head.terms.iter().all(|term| match term {
            Term::Variable(i) => variables.contains(i),
            _ => true,
        })
    }

    /// enumerates the body substitutions over the trusted facts, keeping
    /// those that pass every expression
    ///
    /// an expression failure (type mismatch, overflow, unbound variable)
    /// drops the candidate binding and nothing else
    fn matches<'a>(
        &'a self,
        facts: &'a FactSet,
        scope: &'a TrustedOrigins,
        symbols: &'a SymbolTable,
    ) -> impl Iterator<Item = (Origin, HashMap<u32, Term>)> + 'a {
        let variables = MatchedVariables::new(self.variables_set());

        Combinator::new(variables, self.body.clone(), facts, scope).filter_map(
            move |(origin, variables)| {
                for expression in self.expressions.iter() {
                    match expression.evaluate(&variables, symbols) {
                        Ok(Term::Bool(true)) => {}
                        _ => return None,
                    }
                }
                Some((origin, variables))
            },
        )
    }

    /// fires the rule once over the trusted facts, yielding head facts tagged
    /// with the origin of their derivation
    pub fn apply<'a>(
        &'a self,
        facts: &'a FactSet,
        rule_origin: usize,
        scope: &'a TrustedOrigins,
        symbols: &'a SymbolTable,
    ) -> impl Iterator<Item = (Origin, Fact)> + 'a {
        self.matches(facts, scope, symbols)
            .filter_map(move |(mut origin, variables)| {
                origin.insert(rule_origin);

                let mut terms = Vec::with_capacity(self.head.terms.len());
                for term in self.head.terms.iter() {
                    match term {
                        Term::Variable(i) => match variables.get(i) {
                            Some(value) => terms.push(value.clone()),
                            // a rule that is not range restricted generates nothing
                            None => return None,
                        },
                        _ => terms.push(term.clone()),
                    }
                }

                Some((
                    origin,
                    Fact {
                        predicate: Predicate {
                            name: self.head.name,
                            terms,
                        },
                    },
                ))
            })
    }

    pub fn find_match(
        &self,
        facts: &FactSet,
        scope: &TrustedOrigins,
        symbols: &SymbolTable,
    ) -> bool {
        self.matches(facts, scope, symbols).next().is_some()
    }
}

/// a check succeeds if any of its queries has a solution
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Check {
    pub queries: Vec<Rule>,
}

pub fn fact(name: SymbolIndex, terms: &[Term]) -> Fact {
    Fact::new(name, terms)
}

pub fn pred(name: SymbolIndex, terms: &[Term]) -> Predicate {
    Predicate::new(name, terms)
}

pub fn rule(head_name: SymbolIndex, head_terms: &[Term], predicates: &[Predicate]) -> Rule {
    Rule {
        head: Predicate::new(head_name, head_terms),
        body: predicates.to_vec(),
        expressions: Vec::new(),
        scopes: Vec::new(),
    }
}

pub fn constrained_rule(
    head_name: SymbolIndex,
    head_terms: &[Term],
    predicates: &[Predicate],
    expressions: &[Expression],
) -> Rule {
    Rule {
        head: Predicate::new(head_name, head_terms),
        body: predicates.to_vec(),
        expressions: expressions.to_vec(),
        scopes: Vec::new(),
    }
}

pub fn var(symbols: &mut SymbolTable, name: &str) -> Term {
    let id = symbols.insert(name);
    Term::Variable(id as u32)
}

/// variable bindings accumulated while matching a rule's body
#[derive(Debug, Clone)]
pub struct MatchedVariables {
    pub variables: HashMap<u32, Option<Term>>,
}

impl MatchedVariables {
    pub fn new(import: HashSet<u32>) -> Self {
        MatchedVariables {
            variables: import.into_iter().map(|key| (key, None)).collect(),
        }
    }

    /// binds a variable, or tests consistency if it is already bound
    pub fn insert(&mut self, key: u32, value: &Term) -> bool {
        match self.variables.get(&key) {
            Some(None) => {
                self.variables.insert(key, Some(value.clone()));
                true
            }
            Some(Some(v)) => value == v,
            None => false,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.variables.values().all(|v| v.is_some())
    }

    pub fn complete(&self) -> Option<HashMap<u32, Term>> {
        let mut result = HashMap::new();
        for (key, value) in self.variables.iter() {
            match value {
                Some(value) => {
                    result.insert(*key, value.clone());
                }
                None => return None,
            }
        }
        Some(result)
    }
}

/// iterator enumerating the substitutions that unify a rule's body with the
/// trusted facts
///
/// it tries each candidate fact for the first predicate, and for each match
/// recurses on the rest of the body with the accumulated bindings. The origin
/// of a complete match is the union of the origins of the matched facts
pub struct Combinator<'a> {
    variables: MatchedVariables,
    predicates: Vec<Predicate>,
    all_facts: &'a FactSet,
    scope: &'a TrustedOrigins,
    current_facts: Box<dyn Iterator<Item = (&'a Origin, &'a Fact)> + 'a>,
    current_origin: Option<Origin>,
    current_it: Option<Box<Combinator<'a>>>,
    // a body with no predicate matches exactly once, with no bindings
    empty_body_matched: bool,
}

impl<'a> Combinator<'a> {
    pub fn new(
        variables: MatchedVariables,
        predicates: Vec<Predicate>,
        all_facts: &'a FactSet,
        scope: &'a TrustedOrigins,
    ) -> Self {
        let current_facts: Box<dyn Iterator<Item = (&'a Origin, &'a Fact)> + 'a> =
            match predicates.first() {
                Some(predicate) => {
                    let predicate = predicate.clone();
                    Box::new(
                        all_facts
                            .iterator(scope)
                            .filter(move |(_, fact)| fact.match_predicate(&predicate)),
                    )
                }
                None => Box::new(std::iter::empty()),
            };

        Combinator {
            variables,
            predicates,
            all_facts,
            scope,
            current_facts,
            current_origin: None,
            current_it: None,
            empty_body_matched: false,
        }
    }
}

impl<'a> Iterator for Combinator<'a> {
    type Item = (Origin, HashMap<u32, Term>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.predicates.is_empty() {
            if self.empty_body_matched {
                return None;
            }
            self.empty_body_matched = true;
            return self
                .variables
                .complete()
                .map(|variables| (Origin::default(), variables));
        }

        loop {
            if let Some(inner) = self.current_it.as_mut() {
                match inner.next() {
                    Some((origin, variables)) => {
                        let current = self.current_origin.as_ref()?;
                        return Some((current.union(&origin), variables));
                    }
                    None => {
                        self.current_it = None;
                        self.current_origin = None;
                    }
                }
            }

            let (origin, fact) = self.current_facts.next()?;

            let predicate = &self.predicates[0];
            let mut variables = self.variables.clone();
            let mut match_terms = true;
            for (key, term) in predicate.terms.iter().zip(&fact.predicate.terms) {
                if let Term::Variable(i) = key {
                    if !variables.insert(*i, term) {
                        match_terms = false;
                        break;
                    }
                }
            }

            if !match_terms {
                continue;
            }

            if self.predicates.len() == 1 {
                match variables.complete() {
                    Some(variables) => return Some((origin.clone(), variables)),
                    None => continue,
                }
            }

            self.current_origin = Some(origin.clone());
            self.current_it = Some(Box::new(Combinator::new(
                variables,
                self.predicates[1..].to_vec(),
                self.all_facts,
                self.scope,
            )));
        }
    }
}

/// facts grouped by origin
///
/// each fact appears under exactly one key, the origin computed when it was
/// derived; inserting merges fact sets under equal origins
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactSet {
    pub(crate) inner: HashMap<Origin, HashSet<Fact>>,
}

impl FactSet {
    pub fn insert(&mut self, origin: &Origin, fact: Fact) {
        match self.inner.get_mut(origin) {
            None => {
                let mut facts = HashSet::new();
                facts.insert(fact);
                self.inner.insert(origin.clone(), facts);
            }
            Some(facts) => {
                facts.insert(fact);
            }
        }
    }

    /// number of distinct (origin, fact) pairs
    pub fn len(&self) -> usize {
        self.inner.values().map(|facts| facts.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.values().all(|facts| facts.is_empty())
    }

    pub fn merge(&mut self, other: FactSet) {
        for (origin, facts) in other.inner {
            self.inner.entry(origin).or_default().extend(facts)
        }
    }

    /// iterates over the facts whose whole origin is trusted
    pub fn iterator<'a>(
        &'a self,
        block_ids: &'a TrustedOrigins,
    ) -> impl Iterator<Item = (&'a Origin, &'a Fact)> + 'a {
        self.inner
            .iter()
            .filter(move |(origin, _)| block_ids.contains(origin))
            .flat_map(|(origin, facts)| facts.iter().map(move |fact| (origin, fact)))
    }

    pub fn iter_all<'a>(&'a self) -> impl Iterator<Item = (&'a Origin, &'a Fact)> + 'a {
        self.inner
            .iter()
            .flat_map(|(origin, facts)| facts.iter().map(move |fact| (origin, fact)))
    }
}

/// rules indexed by the origins they trust
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    pub inner: HashMap<TrustedOrigins, Vec<(usize, Rule)>>,
}

impl RuleSet {
    pub fn insert(&mut self, origin: usize, scope: &TrustedOrigins, rule: Rule) {
        self.inner
            .entry(scope.clone())
            .or_default()
            .push((origin, rule));
    }

    pub fn iter_all<'a>(&'a self) -> impl Iterator<Item = (&'a TrustedOrigins, usize, &'a Rule)> + 'a {
        self.inner.iter().flat_map(|(scope, rules)| {
            rules.iter().map(move |(origin, rule)| (scope, *origin, rule))
        })
    }

    pub fn len(&self) -> usize {
        self.inner.values().map(|rules| rules.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.values().all(|rules| rules.is_empty())
    }
}

/// execution limits for the fixpoint
///
/// those are hard failures: when a limit is reached the computation is
/// abandoned, there is no partial result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLimits {
    /// maximum number of distinct (origin, fact) pairs
    pub max_facts: u64,
    /// maximum number of fixpoint rounds
    pub max_iterations: u64,
    /// maximum wall clock time
    pub max_time: Duration,
}

impl Default for RunLimits {
    fn default() -> Self {
        RunLimits {
            max_facts: 1000,
            max_iterations: 100,
            max_time: Duration::from_millis(1),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct World {
    pub facts: FactSet,
    pub rules: RuleSet,
    pub iterations: u64,
}

impl World {
    pub fn new() -> Self {
        World::default()
    }

    pub fn add_fact(&mut self, origin: &Origin, fact: Fact) {
        self.facts.insert(origin, fact);
    }

    pub fn add_rule(&mut self, origin: usize, scope: &TrustedOrigins, rule: Rule) {
        self.rules.insert(origin, scope, rule);
    }

    /// runs the fixpoint: fires every rule over the current facts until no
    /// new (origin, fact) pair appears, or a limit is reached
    pub fn run_with_limits(
        &mut self,
        symbols: &SymbolTable,
        limits: RunLimits,
    ) -> Result<(), error::Error> {
        let start = Instant::now();
        let time_limit = start + limits.max_time;

        for (_, _, rule) in self.rules.iter_all() {
            if !rule.is_range_restricted() {
                return Err(error::Error::InvalidRule(symbols.print_rule(rule)));
            }
        }

        loop {
            if Instant::now() >= time_limit {
                return Err(error::Error::Timeout);
            }

            let mut new_facts = FactSet::default();

            for (scope, origin, rule) in self.rules.iter_all() {
                for (origin, fact) in rule.apply(&self.facts, origin, scope, symbols) {
                    new_facts.insert(&origin, fact);

                    // since re-derived facts already count in self.facts,
                    // reaching the cap here means the merged set reaches it too
                    if new_facts.len() as u64 >= limits.max_facts {
                        return Err(error::Error::TooManyFacts);
                    }
                }

                if Instant::now() >= time_limit {
                    return Err(error::Error::Timeout);
                }
            }

            let previous_count = self.facts.len();
            self.facts.merge(new_facts);
            self.iterations += 1;

            if self.facts.len() as u64 >= limits.max_facts {
                return Err(error::Error::TooManyFacts);
            }
            if self.iterations >= limits.max_iterations {
                return Err(error::Error::TooManyIterations);
            }
            if self.facts.len() == previous_count {
                break;
            }
        }

        Ok(())
    }

    /// derives the facts produced by a query rule over the current world
    pub fn query_rule(
        &self,
        rule: &Rule,
        origin: usize,
        scope: &TrustedOrigins,
        symbols: &SymbolTable,
    ) -> FactSet {
        let mut result = FactSet::default();
        for (origin, fact) in rule.apply(&self.facts, origin, scope, symbols) {
            result.insert(&origin, fact);
        }
        result
    }

    /// does the query have at least one solution?
    pub fn query_match(&self, rule: &Rule, scope: &TrustedOrigins, symbols: &SymbolTable) -> bool {
        rule.find_match(&self.facts, scope, symbols)
    }

    /// all the variable bindings satisfying the query's body and expressions
    pub fn query_bindings(
        &self,
        rule: &Rule,
        scope: &TrustedOrigins,
        symbols: &SymbolTable,
    ) -> Vec<HashMap<u32, Term>> {
        rule.matches(&self.facts, scope, symbols)
            .map(|(_, variables)| variables)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::iter::FromIterator;

    fn test_world() -> (World, SymbolTable, TrustedOrigins) {
        let world = World::new();
        let symbols = SymbolTable::new();
        let scope: TrustedOrigins = vec![0usize].into_iter().collect();
        (world, symbols, scope)
    }

    #[test]
    fn family() {
        let (mut w, mut syms, scope) = test_world();
        let parent = syms.insert("parent");
        let grandparent = syms.insert("grandparent");
        let a = syms.add("A");
        let b = syms.add("B");
        let c = syms.add("C");

        let authority = Origin::from_iter(vec![0usize]);
        w.add_fact(&authority, fact(parent, &[a.clone(), b.clone()]));
        w.add_fact(&authority, fact(parent, &[b.clone(), c.clone()]));

        let r = rule(
            grandparent,
            &[var(&mut syms, "grandparent"), var(&mut syms, "grandchild")],
            &[
                pred(parent, &[var(&mut syms, "grandparent"), var(&mut syms, "parent")]),
                pred(parent, &[var(&mut syms, "parent"), var(&mut syms, "grandchild")]),
            ],
        );

        let res = w.query_rule(&r, 0, &scope, &syms);
        assert_eq!(res.len(), 1);
        let (origin, derived) = res.iter_all().next().unwrap();
        assert_eq!(*origin, Origin::from_iter(vec![0usize]));
        assert_eq!(*derived, fact(grandparent, &[a, c]));
    }

    #[test]
    fn fixpoint_derives_transitively() {
        let (mut w, mut syms, scope) = test_world();
        let parent = syms.insert("parent");
        let ancestor = syms.insert("ancestor");
        let a = syms.add("A");
        let b = syms.add("B");
        let c = syms.add("C");
        let d = syms.add("D");

        let authority = Origin::from_iter(vec![0usize]);
        w.add_fact(&authority, fact(parent, &[a.clone(), b.clone()]));
        w.add_fact(&authority, fact(parent, &[b.clone(), c.clone()]));
        w.add_fact(&authority, fact(parent, &[c.clone(), d.clone()]));

        w.add_rule(
            0,
            &scope,
            rule(
                ancestor,
                &[var(&mut syms, "p"), var(&mut syms, "c")],
                &[pred(parent, &[var(&mut syms, "p"), var(&mut syms, "c")])],
            ),
        );
        w.add_rule(
            0,
            &scope,
            rule(
                ancestor,
                &[var(&mut syms, "p"), var(&mut syms, "d")],
                &[
                    pred(parent, &[var(&mut syms, "p"), var(&mut syms, "c")]),
                    pred(ancestor, &[var(&mut syms, "c"), var(&mut syms, "d")]),
                ],
            ),
        );

        w.run_with_limits(
            &syms,
            RunLimits {
                max_time: Duration::from_secs(10),
                ..Default::default()
            },
        )
        .unwrap();

        // 3 parent facts, 6 ancestor facts
        assert_eq!(w.facts.len(), 9);

        let ancestors = w
            .facts
            .iter_all()
            .filter(|(_, f)| f.predicate.name == ancestor)
            .count();
        assert_eq!(ancestors, 6);

        // a rule firing adds its own block to the origin of everything it used
        for (origin, f) in w.facts.iter_all() {
            assert!(origin.is_superset(&Origin::from_iter(vec![0usize])));
            assert_eq!(f.predicate.terms.len(), 2);
        }
    }

    #[test]
    fn expressions_filter_bindings() {
        let (mut w, mut syms, scope) = test_world();
        let n = syms.insert("n");
        let small = syms.insert("small");
        let x = var(&mut syms, "x");

        let authority = Origin::from_iter(vec![0usize]);
        w.add_fact(&authority, fact(n, &[Term::Integer(1)]));
        w.add_fact(&authority, fact(n, &[Term::Integer(5)]));
        w.add_fact(&authority, fact(n, &[Term::Integer(10)]));

        let r = constrained_rule(
            small,
            &[x.clone()],
            &[pred(n, &[x.clone()])],
            &[Expression {
                ops: vec![
                    Op::Value(x),
                    Op::Value(Term::Integer(5)),
                    Op::Binary(Binary::LessThan),
                ],
            }],
        );

        let res = w.query_rule(&r, 0, &scope, &syms);
        assert_eq!(res.len(), 1);
        assert_eq!(
            *res.iter_all().next().unwrap().1,
            fact(small, &[Term::Integer(1)])
        );
    }

    #[test]
    fn scope_filters_facts_by_origin_subset() {
        let (mut w, mut syms, _) = test_world();
        let data = syms.insert("data");

        let authority = Origin::from_iter(vec![0usize]);
        let block1 = Origin::from_iter(vec![1usize]);
        let mixed = Origin::from_iter(vec![0usize, 1]);

        w.add_fact(&authority, fact(data, &[Term::Integer(0)]));
        w.add_fact(&block1, fact(data, &[Term::Integer(1)]));
        w.add_fact(&mixed, fact(data, &[Term::Integer(2)]));

        let q = rule(
            syms.insert("out"),
            &[var(&mut syms, "x")],
            &[pred(data, &[var(&mut syms, "x")])],
        );

        let authority_only: TrustedOrigins = vec![0usize].into_iter().collect();
        let res = w.query_rule(&q, 0, &authority_only, &syms);
        assert_eq!(res.len(), 1);

        // a fact whose origin is {0, 1} needs both blocks to be trusted
        let both: TrustedOrigins = vec![0usize, 1].into_iter().collect();
        let res = w.query_rule(&q, 0, &both, &syms);
        assert_eq!(res.len(), 3);
    }

    #[test]
    fn derived_origin_is_rule_block_union_premises() {
        let (mut w, mut syms, _) = test_world();
        let data = syms.insert("data");
        let moved = syms.insert("moved");

        let authority = Origin::from_iter(vec![0usize]);
        w.add_fact(&authority, fact(data, &[Term::Integer(1)]));

        let q = rule(
            moved,
            &[var(&mut syms, "x")],
            &[pred(data, &[var(&mut syms, "x")])],
        );

        // the rule belongs to block 1 and consumes an authority fact
        let scope: TrustedOrigins = vec![0usize, 1].into_iter().collect();
        let res = w.query_rule(&q, 1, &scope, &syms);
        assert_eq!(res.len(), 1);
        let (origin, _) = res.iter_all().next().unwrap();
        assert_eq!(*origin, Origin::from_iter(vec![0usize, 1]));
    }

    #[test]
    fn too_many_facts() {
        let (mut w, mut syms, scope) = test_world();
        let n = syms.insert("n");
        let p = syms.insert("p");

        let authority = Origin::from_iter(vec![0usize]);
        for i in 0..1000 {
            w.add_fact(&authority, fact(n, &[Term::Integer(i)]));
        }

        w.add_rule(
            0,
            &scope,
            rule(
                p,
                &[var(&mut syms, "x"), var(&mut syms, "y")],
                &[
                    pred(n, &[var(&mut syms, "x")]),
                    pred(n, &[var(&mut syms, "y")]),
                ],
            ),
        );

        let res = w.run_with_limits(
            &syms,
            RunLimits {
                max_facts: 10_000,
                max_iterations: 100,
                max_time: Duration::from_secs(10),
            },
        );
        assert_eq!(res, Err(error::Error::TooManyFacts));
    }

    #[test]
    fn too_many_iterations() {
        let (mut w, mut syms, scope) = test_world();
        let start = syms.insert("start");

        let authority = Origin::from_iter(vec![0usize]);
        w.add_fact(&authority, fact(start, &[Term::Integer(0)]));

        // each round unlocks one more level of the chain
        let step = syms.insert("step");
        let x = var(&mut syms, "x");
        w.add_rule(
            0,
            &scope,
            rule(step, &[x.clone()], &[pred(start, &[x.clone()])]),
        );

        let mut names = vec![step];
        for i in 0..10 {
            let next = syms.insert(&format!("step{}", i));
            let prev = *names.last().unwrap();
            w.add_rule(
                0,
                &scope,
                rule(next, &[x.clone()], &[pred(prev, &[x.clone()])]),
            );
            names.push(next);
        }

        let res = w.run_with_limits(
            &syms,
            RunLimits {
                max_facts: 1000,
                max_iterations: 3,
                max_time: Duration::from_secs(10),
            },
        );
        assert_eq!(res, Err(error::Error::TooManyIterations));
    }

    #[test]
    fn invalid_rule_rejected_before_derivation() {
        let (mut w, mut syms, scope) = test_world();
        let b = syms.insert("b");
        let h = syms.insert("h");

        let authority = Origin::from_iter(vec![0usize]);
        w.add_fact(&authority, fact(b, &[Term::Integer(0)]));

        w.add_rule(
            0,
            &scope,
            rule(
                h,
                &[var(&mut syms, "x"), var(&mut syms, "y")],
                &[pred(b, &[var(&mut syms, "x")])],
            ),
        );

        let res = w.run_with_limits(
            &syms,
            RunLimits {
                max_time: Duration::from_secs(10),
                ..Default::default()
            },
        );
        assert_eq!(
            res,
            Err(error::Error::InvalidRule("h($x, $y) <- b($x)".to_string()))
        );
        // nothing was derived
        assert_eq!(w.facts.len(), 1);
    }

    #[test]
    fn deterministic_fixpoint() {
        fn build() -> (World, SymbolTable, TrustedOrigins) {
            let (mut w, mut syms, scope) = test_world();
            let parent = syms.insert("parent");
            let ancestor = syms.insert("ancestor");
            let a = syms.add("A");
            let b = syms.add("B");
            let c = syms.add("C");

            let authority = Origin::from_iter(vec![0usize]);
            w.add_fact(&authority, fact(parent, &[a.clone(), b.clone()]));
            w.add_fact(&authority, fact(parent, &[b, c]));
            w.add_rule(
                0,
                &scope,
                rule(
                    ancestor,
                    &[var(&mut syms, "p"), var(&mut syms, "c")],
                    &[pred(parent, &[var(&mut syms, "p"), var(&mut syms, "c")])],
                ),
            );
            w.add_rule(
                0,
                &scope,
                rule(
                    ancestor,
                    &[var(&mut syms, "p"), var(&mut syms, "d")],
                    &[
                        pred(parent, &[var(&mut syms, "p"), var(&mut syms, "c")]),
                        pred(ancestor, &[var(&mut syms, "c"), var(&mut syms, "d")]),
                    ],
                ),
            );
            (w, syms, scope)
        }

        let limits = RunLimits {
            max_time: Duration::from_secs(10),
            ..Default::default()
        };

        let (mut w1, syms1, _) = build();
        w1.run_with_limits(&syms1, limits.clone()).unwrap();
        let (mut w2, syms2, _) = build();
        w2.run_with_limits(&syms2, limits).unwrap();

        assert_eq!(w1.facts, w2.facts);
        assert_eq!(w1.iterations, w2.iterations);
    }

    #[test]
    fn monotonicity() {
        let (mut w, mut syms, scope) = test_world();
        let parent = syms.insert("parent");
        let ancestor = syms.insert("ancestor");
        let a = syms.add("A");
        let b = syms.add("B");

        let authority = Origin::from_iter(vec![0usize]);
        w.add_fact(&authority, fact(parent, &[a, b]));
        w.add_rule(
            0,
            &scope,
            rule(
                ancestor,
                &[var(&mut syms, "p"), var(&mut syms, "c")],
                &[pred(parent, &[var(&mut syms, "p"), var(&mut syms, "c")])],
            ),
        );

        let before: Vec<(Origin, Fact)> = w
            .facts
            .iter_all()
            .map(|(o, f)| (o.clone(), f.clone()))
            .collect();

        w.run_with_limits(
            &syms,
            RunLimits {
                max_time: Duration::from_secs(10),
                ..Default::default()
            },
        )
        .unwrap();

        for (origin, f) in before {
            assert!(w
                .facts
                .iter_all()
                .any(|(o, existing)| *o == origin && *existing == f));
        }
    }

    #[test]
    fn bodiless_query_matches_once() {
        let (w, syms, scope) = test_world();

        let q = Rule {
            head: Predicate::new(1024, &[]),
            body: vec![],
            expressions: vec![Expression {
                ops: vec![Op::Value(Term::Bool(true))],
            }],
            scopes: vec![],
        };

        assert!(w.query_match(&q, &scope, &syms));

        let q_false = Rule {
            head: Predicate::new(1024, &[]),
            body: vec![],
            expressions: vec![Expression {
                ops: vec![Op::Value(Term::Bool(false))],
            }],
            scopes: vec![],
        };
        assert!(!w.query_match(&q_false, &scope, &syms));
    }
}
