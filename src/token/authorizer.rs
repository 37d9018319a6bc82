/*
 * Copyright (c) 2019 Geoffroy Couprie <contact@geoffroycouprie.com> and Contributors to the Eclipse Foundation.
 * SPDX-License-Identifier: Apache-2.0
 */
//! Authorizer structure and associated functions
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;
use std::time::Instant;

use crate::builder::{self, BlockBuilder, Check, Convert, Fact, Policy, PolicyKind, Rule, Scope};
use crate::datalog::{self, FactSet, Origin, RunLimits, SymbolTable, TrustedOrigins, World};
use crate::error;
use crate::token::{Block, Token};

pub type AuthorizerLimits = RunLimits;

/// a set of values for the variables of a matched query
pub type Binding = BTreeMap<String, builder::Term>;

/// the query of the allow policy that authorized the request, with every
/// binding that satisfied it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedQuery {
    pub query: Rule,
    pub bindings: BTreeSet<Binding>,
}

/// result of a successful authorization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationSuccess {
    /// index of the allow policy that matched
    pub policy_id: usize,
    pub matched_query: MatchedQuery,
    /// every fact derived during evaluation, grouped by origin
    pub facts: FactSet,
    /// the limits the computation ran under
    pub limits: AuthorizerLimits,
}

/// used to build an [Authorizer] from the authorizer's own block and policies
#[derive(Debug, Clone, Default)]
pub struct AuthorizerBuilder {
    authorizer_block_builder: BlockBuilder,
    policies: Vec<Policy>,
    limits: AuthorizerLimits,
}

impl AuthorizerBuilder {
    pub fn new() -> AuthorizerBuilder {
        AuthorizerBuilder::default()
    }

    pub fn fact(mut self, fact: Fact) -> Result<Self, error::Error> {
        self.authorizer_block_builder = self.authorizer_block_builder.fact(fact)?;
        Ok(self)
    }

    pub fn rule(mut self, rule: Rule) -> Result<Self, error::Error> {
        self.authorizer_block_builder = self.authorizer_block_builder.rule(rule)?;
        Ok(self)
    }

    pub fn check(mut self, check: Check) -> Result<Self, error::Error> {
        self.authorizer_block_builder = self.authorizer_block_builder.check(check)?;
        Ok(self)
    }

    pub fn policy(mut self, policy: Policy) -> Result<Self, error::Error> {
        policy
            .validate()
            .map_err(|_| error::Error::InvalidRule(policy.to_string()))?;
        self.policies.push(policy);
        Ok(self)
    }

    /// sets the default scope for the authorizer's rules, checks and policies
    pub fn scope(mut self, scope: Scope) -> Self {
        self.authorizer_block_builder = self.authorizer_block_builder.scope(scope);
        self
    }

    pub fn context(mut self, context: &str) -> Self {
        self.authorizer_block_builder = self.authorizer_block_builder.context(context);
        self
    }

    pub fn limits(mut self, limits: AuthorizerLimits) -> Self {
        self.limits = limits;
        self
    }

    /// loads the token's blocks and builds the authorizer
    pub fn build(self, token: &Token) -> Result<Authorizer, error::Error> {
        self.build_inner(Some(token))
    }

    /// builds an authorizer without a token, for the unauthenticated case
    pub fn build_unauthenticated(self) -> Result<Authorizer, error::Error> {
        self.build_inner(None)
    }

    fn build_inner(self, token: Option<&Token>) -> Result<Authorizer, error::Error> {
        let mut symbols = SymbolTable::new();

        // the authorizer's own block comes after every token block
        let authorizer_block_id = token.map(|t| t.block_count()).unwrap_or(0);

        let mut public_key_to_block_id: HashMap<usize, Vec<usize>> = HashMap::new();
        if let Some(token) = token {
            for (i, token_block) in token.token_blocks().enumerate() {
                if let Some(key) = &token_block.external_key {
                    let key_id = symbols.public_keys.insert(key) as usize;
                    public_key_to_block_id.entry(key_id).or_default().push(i);
                }
            }
        }

        let mut world = World::new();
        let mut blocks = Vec::new();

        if let Some(token) = token {
            for (i, token_block) in token.token_blocks().enumerate() {
                let block = load_block(&token_block.block, &mut symbols)?;

                let mut origin = Origin::default();
                origin.insert(i);
                for fact in &block.facts {
                    world.add_fact(&origin, fact.clone());
                }

                let block_trusted_origins = TrustedOrigins::from_scopes(
                    &block.scopes,
                    &TrustedOrigins::default(authorizer_block_id),
                    i,
                    authorizer_block_id,
                    &public_key_to_block_id,
                );

                for rule in &block.rules {
                    let rule_trusted_origins = TrustedOrigins::from_scopes(
                        &rule.scopes,
                        &block_trusted_origins,
                        i,
                        authorizer_block_id,
                        &public_key_to_block_id,
                    );
                    world.add_rule(i, &rule_trusted_origins, rule.clone());
                }

                blocks.push(block);
            }
        }

        let mut authorizer_origin = Origin::default();
        authorizer_origin.insert(authorizer_block_id);

        // revocation identifiers are published as facts under the
        // authorizer's own origin
        if let Some(token) = token {
            let revocation_id_sym = symbols.insert("revocation_id");
            for (i, id) in token.revocation_identifiers().into_iter().enumerate() {
                world.add_fact(
                    &authorizer_origin,
                    datalog::Fact::new(
                        revocation_id_sym,
                        &[datalog::Term::Integer(i as i64), datalog::Term::Bytes(id)],
                    ),
                );
            }
        }

        let authorizer_block = load_block(&self.authorizer_block_builder, &mut symbols)?;

        for fact in &authorizer_block.facts {
            world.add_fact(&authorizer_origin, fact.clone());
        }

        // with no explicit scope, the authorizer sees every block
        let token_origins: TrustedOrigins = (0..=authorizer_block_id).collect();
        let authorizer_trusted_origins = TrustedOrigins::from_scopes(
            &authorizer_block.scopes,
            &token_origins,
            authorizer_block_id,
            authorizer_block_id,
            &public_key_to_block_id,
        );

        for rule in &authorizer_block.rules {
            let rule_trusted_origins = TrustedOrigins::from_scopes(
                &rule.scopes,
                &authorizer_trusted_origins,
                authorizer_block_id,
                authorizer_block_id,
                &public_key_to_block_id,
            );
            world.add_rule(authorizer_block_id, &rule_trusted_origins, rule.clone());
        }

        let mut policy_queries = Vec::with_capacity(self.policies.len());
        for policy in &self.policies {
            policy_queries.push(
                policy
                    .queries
                    .iter()
                    .map(|q| q.convert(&mut symbols))
                    .collect::<Vec<_>>(),
            );
        }

        Ok(Authorizer {
            world,
            symbols,
            authorizer_block_id,
            blocks,
            authorizer_checks: authorizer_block.checks,
            authorizer_context: authorizer_block.context,
            authorizer_trusted_origins,
            token_origins,
            policies: self.policies,
            policy_queries,
            public_key_to_block_id,
            limits: self.limits,
            has_run: false,
        })
    }
}

/// validates a block's contents and translates them to the shared symbol table
fn load_block(builder: &BlockBuilder, symbols: &mut SymbolTable) -> Result<Block, error::Error> {
    for fact in &builder.facts {
        fact.validate()
            .map_err(|_| error::Error::InvalidFact(fact.to_string()))?;
    }
    for rule in &builder.rules {
        rule.validate_variables()
            .and_then(|_| rule.validate_terms())
            .map_err(|_| error::Error::InvalidRule(rule.to_string()))?;
    }
    for check in &builder.checks {
        check
            .validate()
            .map_err(|_| error::Error::InvalidRule(check.to_string()))?;
    }

    Ok(Block {
        facts: builder.facts.iter().map(|f| f.convert(symbols)).collect(),
        rules: builder.rules.iter().map(|r| r.convert(symbols)).collect(),
        checks: builder.checks.iter().map(|c| c.convert(symbols)).collect(),
        scopes: builder.scopes.iter().map(|s| s.convert(symbols)).collect(),
        context: builder.context.clone(),
    })
}

/// used to check authorization policies on a token
///
/// runs the fixpoint over the token's blocks and its own block, then
/// evaluates every check and the ordered policies
#[derive(Debug, Clone)]
pub struct Authorizer {
    world: World,
    symbols: SymbolTable,
    authorizer_block_id: usize,
    blocks: Vec<Block>,
    authorizer_checks: Vec<datalog::Check>,
    authorizer_context: Option<String>,
    authorizer_trusted_origins: TrustedOrigins,
    token_origins: TrustedOrigins,
    policies: Vec<Policy>,
    policy_queries: Vec<Vec<datalog::Rule>>,
    public_key_to_block_id: HashMap<usize, Vec<usize>>,
    limits: AuthorizerLimits,
    has_run: bool,
}

impl Authorizer {
    /// Returns the runtime limits of the authorizer
    pub fn limits(&self) -> &AuthorizerLimits {
        &self.limits
    }

    /// returns the number of fact generation iterations
    pub fn iterations(&self) -> u64 {
        self.world.iterations
    }

    /// returns the number of distinct (origin, fact) pairs
    pub fn fact_count(&self) -> usize {
        self.world.facts.len()
    }

    /// application context attached to the blocks; the last one set wins
    pub fn context(&self) -> Option<String> {
        let mut res = None;
        for block in &self.blocks {
            if block.context.is_some() {
                res = block.context.clone();
            }
        }
        if self.authorizer_context.is_some() {
            res = self.authorizer_context.clone();
        }
        res
    }

    /// verifies the checks and policies
    ///
    /// the failed checks of every block are reported, even when a policy
    /// already settled the decision
    pub fn authorize(&mut self) -> Result<AuthorizationSuccess, error::Error> {
        let limits = self.limits.clone();
        self.authorize_with_limits(limits)
    }

    /// verifies the checks and policies, overriding the authorizer's limits
    /// for this call
    ///
    /// `max_time` bounds the whole call: fact generation, checks and policies
    pub fn authorize_with_limits(
        &mut self,
        limits: AuthorizerLimits,
    ) -> Result<AuthorizationSuccess, error::Error> {
        let start = Instant::now();
        let time_limit = start + limits.max_time;
        self.run(&limits)?;
        self.authorize_inner(&limits, time_limit)
    }

    fn run(&mut self, limits: &AuthorizerLimits) -> Result<(), error::Error> {
        if !self.has_run {
            self.world.run_with_limits(&self.symbols, limits.clone())?;
            self.has_run = true;
        }
        Ok(())
    }

    fn authorize_inner(
        &mut self,
        limits: &AuthorizerLimits,
        time_limit: Instant,
    ) -> Result<AuthorizationSuccess, error::Error> {
        let mut errors = vec![];

        for (i, check) in self.authorizer_checks.iter().enumerate() {
            let mut successful = false;

            for query in check.queries.iter() {
                let rule_trusted_origins = TrustedOrigins::from_scopes(
                    &query.scopes,
                    &self.authorizer_trusted_origins,
                    self.authorizer_block_id,
                    self.authorizer_block_id,
                    &self.public_key_to_block_id,
                );
                let res = self
                    .world
                    .query_match(query, &rule_trusted_origins, &self.symbols);

                if Instant::now() >= time_limit {
                    return Err(error::Error::Timeout);
                }

                if res {
                    successful = true;
                    break;
                }
            }

            if !successful {
                errors.push(error::FailedCheck::Authorizer(
                    error::FailedAuthorizerCheck {
                        check_id: i as u32,
                        rule: self.symbols.print_check(check),
                    },
                ));
            }
        }

        for (block_id, block) in self.blocks.iter().enumerate() {
            let block_trusted_origins = TrustedOrigins::from_scopes(
                &block.scopes,
                &TrustedOrigins::default(self.authorizer_block_id),
                block_id,
                self.authorizer_block_id,
                &self.public_key_to_block_id,
            );

            for (j, check) in block.checks.iter().enumerate() {
                let mut successful = false;

                for query in check.queries.iter() {
                    let rule_trusted_origins = TrustedOrigins::from_scopes(
                        &query.scopes,
                        &block_trusted_origins,
                        block_id,
                        self.authorizer_block_id,
                        &self.public_key_to_block_id,
                    );
                    let res = self
                        .world
                        .query_match(query, &rule_trusted_origins, &self.symbols);

                    if Instant::now() >= time_limit {
                        return Err(error::Error::Timeout);
                    }

                    if res {
                        successful = true;
                        break;
                    }
                }

                if !successful {
                    errors.push(error::FailedCheck::Block(error::FailedBlockCheck {
                        block_id: block_id as u32,
                        check_id: j as u32,
                        rule: self.symbols.print_check(check),
                    }));
                }
            }
        }

        let mut policy_result: Option<Result<(usize, usize, BTreeSet<Binding>), usize>> = None;

        'policies_test: for (i, queries) in self.policy_queries.iter().enumerate() {
            for (query_id, query) in queries.iter().enumerate() {
                let rule_trusted_origins = TrustedOrigins::from_scopes(
                    &query.scopes,
                    &self.authorizer_trusted_origins,
                    self.authorizer_block_id,
                    self.authorizer_block_id,
                    &self.public_key_to_block_id,
                );

                let matches =
                    self.world
                        .query_bindings(query, &rule_trusted_origins, &self.symbols);

                if Instant::now() >= time_limit {
                    return Err(error::Error::Timeout);
                }

                if !matches.is_empty() {
                    let bindings = self.convert_bindings(&matches);
                    match self.policies[i].kind {
                        PolicyKind::Allow => policy_result = Some(Ok((i, query_id, bindings))),
                        PolicyKind::Deny => policy_result = Some(Err(i)),
                    };
                    break 'policies_test;
                }
            }
        }

        match (policy_result, errors.is_empty()) {
            (Some(Ok((policy_id, query_id, bindings))), true) => Ok(AuthorizationSuccess {
                policy_id,
                matched_query: MatchedQuery {
                    query: self.policies[policy_id].queries[query_id].clone(),
                    bindings,
                },
                facts: self.world.facts.clone(),
                limits: limits.clone(),
            }),
            (Some(Ok(_)), false) => Err(error::ResultError::FailedChecks(errors).into()),
            (Some(Err(policy_id)), _) => Err(error::ResultError::DenyRuleMatched {
                checks: errors,
                policy_id,
                policy: self.policies[policy_id].to_string(),
            }
            .into()),
            (None, _) => Err(error::ResultError::NoPoliciesMatched(errors).into()),
        }
    }

    fn convert_bindings(&self, matches: &[HashMap<u32, datalog::Term>]) -> BTreeSet<Binding> {
        matches
            .iter()
            .map(|variables| {
                variables
                    .iter()
                    .map(|(id, term)| {
                        (
                            self.symbols.print_symbol_default(*id as u64),
                            builder::Term::convert_from(term, &self.symbols),
                        )
                    })
                    .collect()
            })
            .collect()
    }

    /// queries the facts derived from the authority block alone
    ///
    /// facts touched by extension blocks (origin beyond {0}) are never
    /// returned, whatever scope the rule carries
    pub fn query_authority_facts(&mut self, rule: Rule) -> Result<Vec<Fact>, error::Error> {
        let scope: TrustedOrigins = std::iter::once(0usize).collect();
        self.query_inner(rule, scope, false)
    }

    /// runs a query over every fact generated during evaluation
    ///
    /// an explicit `trusting` annotation on the rule restricts the facts it
    /// sees, as usual
    pub fn query_all(&mut self, rule: Rule) -> Result<Vec<Fact>, error::Error> {
        let scope = self.token_origins.clone();
        self.query_inner(rule, scope, true)
    }

    fn query_inner(
        &mut self,
        rule: Rule,
        default_scope: TrustedOrigins,
        allow_explicit_scopes: bool,
    ) -> Result<Vec<Fact>, error::Error> {
        rule.validate_variables()
            .and_then(|_| rule.validate_terms())
            .map_err(|_| error::Error::InvalidRule(rule.to_string()))?;

        let limits = self.limits.clone();
        self.run(&limits)?;

        let rule = rule.convert(&mut self.symbols);

        let scope = if allow_explicit_scopes && !rule.scopes.is_empty() {
            TrustedOrigins::from_scopes(
                &rule.scopes,
                &default_scope,
                self.authorizer_block_id,
                self.authorizer_block_id,
                &self.public_key_to_block_id,
            )
        } else {
            default_scope
        };

        let res = self
            .world
            .query_rule(&rule, self.authorizer_block_id, &scope, &self.symbols);

        let facts: HashSet<&datalog::Fact> = res.iter_all().map(|(_, fact)| fact).collect();
        Ok(facts
            .into_iter()
            .map(|fact| Fact::convert_from(fact, &self.symbols))
            .collect())
    }
}

impl fmt::Display for Authorizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut all_facts: BTreeMap<&Origin, BTreeSet<String>> = BTreeMap::new();
        for (origin, factset) in &self.world.facts.inner {
            let facts = all_facts.entry(origin).or_default();
            for fact in factset {
                facts.insert(self.symbols.print_fact(fact));
            }
        }
        let has_facts = all_facts.values().any(|facts| !facts.is_empty());

        if has_facts {
            writeln!(f, "// Facts:")?;
        }

        for (origin, facts) in &all_facts {
            if !facts.is_empty() {
                writeln!(f, "// origin: {}", origin)?;
            }
            for fact in facts {
                writeln!(f, "{};", fact)?;
            }
        }

        if has_facts {
            writeln!(f)?;
        }

        let mut rules_map: BTreeMap<usize, BTreeSet<String>> = BTreeMap::new();
        for ruleset in self.world.rules.inner.values() {
            for (origin, rule) in ruleset {
                rules_map
                    .entry(*origin)
                    .or_default()
                    .insert(self.symbols.print_rule(rule));
            }
        }
        let has_rules = rules_map.values().any(|rules| !rules.is_empty());

        if has_rules {
            writeln!(f, "// Rules:")?;
        }

        for (origin, rule_list) in &rules_map {
            if !rule_list.is_empty() {
                writeln!(f, "// origin: {}", origin)?;
            }
            for rule in rule_list {
                writeln!(f, "{};", rule)?;
            }
        }

        if has_rules {
            writeln!(f)?;
        }

        let mut checks_map: BTreeMap<usize, Vec<String>> = BTreeMap::new();
        for (i, block) in self.blocks.iter().enumerate() {
            let entry = checks_map.entry(i).or_default();
            for check in &block.checks {
                entry.push(self.symbols.print_check(check));
            }
        }
        let authorizer_entry = checks_map.entry(self.authorizer_block_id).or_default();
        for check in &self.authorizer_checks {
            authorizer_entry.push(self.symbols.print_check(check));
        }
        let has_checks = checks_map.values().any(|checks| !checks.is_empty());

        if has_checks {
            writeln!(f, "// Checks:")?;
        }

        for (origin, checks) in checks_map {
            if !checks.is_empty() {
                writeln!(f, "// origin: {}", origin)?;
            }
            for check in checks {
                writeln!(f, "{};", check)?;
            }
        }

        if has_checks {
            writeln!(f)?;
        }

        if !self.policies.is_empty() {
            writeln!(f, "// Policies:")?;
        }
        for policy in self.policies.iter() {
            writeln!(f, "{};", policy)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{
        allow_policy, boolean, check, fact, pred, query, string, var, Op,
    };
    use std::time::Duration;

    fn generous_limits() -> AuthorizerLimits {
        AuthorizerLimits {
            max_time: Duration::from_secs(10),
            ..Default::default()
        }
    }

    #[test]
    fn empty_authorizer() {
        let mut authorizer = AuthorizerBuilder::new()
            .policy(allow_policy(vec![query(
                vec![],
                vec![builder::Expression {
                    ops: vec![Op::Value(boolean(true))],
                }],
                vec![],
            )]))
            .unwrap()
            .limits(generous_limits())
            .build_unauthenticated()
            .unwrap();

        let res = authorizer.authorize().unwrap();
        assert_eq!(res.policy_id, 0);
        assert_eq!(res.matched_query.bindings.len(), 1);
        assert!(res.matched_query.bindings.iter().next().unwrap().is_empty());
    }

    #[test]
    fn no_policies_matched() {
        let token = Token::new(
            BlockBuilder::new()
                .fact(fact("resource", &[string("file1")]))
                .unwrap(),
            b"revocation-0",
        );

        let mut authorizer = AuthorizerBuilder::new()
            .policy(allow_policy(vec![query(
                vec![pred("resource", &[string("file2")])],
                vec![],
                vec![],
            )]))
            .unwrap()
            .limits(generous_limits())
            .build(&token)
            .unwrap();

        match authorizer.authorize() {
            Err(error::Error::Result(error::ResultError::NoPoliciesMatched(checks))) => {
                assert!(checks.is_empty())
            }
            res => panic!("unexpected result: {:?}", res),
        }
    }

    #[test]
    fn failed_checks_are_all_reported() {
        let token = Token::new(
            BlockBuilder::new()
                .fact(fact("resource", &[string("file1")]))
                .unwrap()
                .check(check(&[pred("operation", &[string("read")])]))
                .unwrap(),
            b"revocation-0",
        );

        let mut authorizer = AuthorizerBuilder::new()
            .check(check(&[pred("operation", &[string("write")])]))
            .unwrap()
            .policy(allow_policy(vec![query(
                vec![pred("resource", &[string("file1")])],
                vec![],
                vec![],
            )]))
            .unwrap()
            .limits(generous_limits())
            .build(&token)
            .unwrap();

        match authorizer.authorize() {
            Err(error::Error::Result(error::ResultError::FailedChecks(checks))) => {
                assert_eq!(checks.len(), 2);
                assert_eq!(
                    checks[0],
                    error::FailedCheck::Authorizer(error::FailedAuthorizerCheck {
                        check_id: 0,
                        rule: "check if operation(\"write\")".to_string(),
                    })
                );
                assert_eq!(
                    checks[1],
                    error::FailedCheck::Block(error::FailedBlockCheck {
                        block_id: 0,
                        check_id: 0,
                        rule: "check if operation(\"read\")".to_string(),
                    })
                );
            }
            res => panic!("unexpected result: {:?}", res),
        }
    }

    #[test]
    fn revocation_ids_are_authorizer_only() {
        let token = Token::new(
            BlockBuilder::new()
                .fact(fact("resource", &[string("file1")]))
                .unwrap(),
            b"rev-0",
        )
        .append(BlockBuilder::new(), b"rev-1", None);

        let mut authorizer = AuthorizerBuilder::new()
            .policy(allow_policy(vec![query(
                vec![],
                vec![builder::Expression {
                    ops: vec![Op::Value(boolean(true))],
                }],
                vec![],
            )]))
            .unwrap()
            .limits(generous_limits())
            .build(&token)
            .unwrap();
        authorizer.authorize().unwrap();

        // the authorizer can query them
        let ids = authorizer
            .query_all(builder::rule(
                "rev",
                &[var("i"), var("id")],
                &[pred("revocation_id", &[var("i"), var("id")])],
            ))
            .unwrap();
        assert_eq!(ids.len(), 2);

        // but they are not authority facts
        let ids = authorizer
            .query_authority_facts(builder::rule(
                "rev",
                &[var("i"), var("id")],
                &[pred("revocation_id", &[var("i"), var("id")])],
            ))
            .unwrap();
        assert!(ids.is_empty());
    }

    #[test]
    fn context_last_writer_wins() {
        let token = Token::new(
            BlockBuilder::new().context("authority"),
            b"rev-0",
        )
        .append(BlockBuilder::new().context("block1"), b"rev-1", None);

        let authorizer = AuthorizerBuilder::new()
            .limits(generous_limits())
            .build(&token)
            .unwrap();
        assert_eq!(authorizer.context(), Some("block1".to_string()));

        let authorizer = AuthorizerBuilder::new()
            .context("authorizer")
            .limits(generous_limits())
            .build(&token)
            .unwrap();
        assert_eq!(authorizer.context(), Some("authorizer".to_string()));
    }

    #[test]
    fn display_after_authorization() {
        let token = Token::new(
            BlockBuilder::new()
                .fact(fact("right", &[string("file1"), string("read")]))
                .unwrap(),
            b"rev-0",
        );

        let mut authorizer = AuthorizerBuilder::new()
            .fact(fact("resource", &[string("file1")]))
            .unwrap()
            .rule(builder::rule(
                "can_read",
                &[var("f")],
                &[
                    pred("resource", &[var("f")]),
                    pred("right", &[var("f"), string("read")]),
                ],
            ))
            .unwrap()
            .check(check(&[pred("can_read", &[string("file1")])]))
            .unwrap()
            .policy(allow_policy(vec![query(
                vec![pred("can_read", &[var("f")])],
                vec![],
                vec![],
            )]))
            .unwrap()
            .limits(generous_limits())
            .build(&token)
            .unwrap();

        authorizer.authorize().unwrap();

        let output = authorizer.to_string();
        assert!(output.contains("// Facts:"));
        assert!(output.contains("right(\"file1\", \"read\");"));
        assert!(output.contains("can_read(\"file1\");"));
        assert!(output.contains("// Rules:"));
        assert!(output.contains("can_read($f) <- resource($f), right($f, \"read\");"));
        assert!(output.contains("// Checks:"));
        assert!(output.contains("check if can_read(\"file1\");"));
        assert!(output.contains("// Policies:"));
        assert!(output.contains("allow if can_read($f);"));
    }
}
