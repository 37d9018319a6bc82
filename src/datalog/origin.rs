/*
 * Copyright (c) 2019 Geoffroy Couprie <contact@geoffroycouprie.com> and Contributors to the Eclipse Foundation.
 * SPDX-License-Identifier: Apache-2.0
 */
use std::collections::BTreeSet;
use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;
use std::iter::FromIterator;

use crate::token::Scope;

/// set of the block ids that participated in deriving a fact
///
/// a fact declared in block b has origin {b}; a fact derived by a rule of
/// block r from premises with origins O1..Ok has origin {r} ∪ O1 ∪ … ∪ Ok
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Origin {
    pub(crate) inner: BTreeSet<usize>,
}

impl Origin {
    pub fn insert(&mut self, i: usize) {
        self.inner.insert(i);
    }

    pub fn union(&self, other: &Self) -> Self {
        Origin {
            inner: self.inner.union(&other.inner).cloned().collect(),
        }
    }

    pub fn is_superset(&self, other: &Self) -> bool {
        self.inner.is_superset(&other.inner)
    }
}

impl<'a> Extend<&'a usize> for Origin {
    fn extend<T: IntoIterator<Item = &'a usize>>(&mut self, iter: T) {
        self.inner.extend(iter)
    }
}

impl Extend<usize> for Origin {
    fn extend<T: IntoIterator<Item = usize>>(&mut self, iter: T) {
        self.inner.extend(iter)
    }
}

impl<'a> FromIterator<&'a usize> for Origin {
    fn from_iter<T: IntoIterator<Item = &'a usize>>(iter: T) -> Self {
        Self {
            inner: iter.into_iter().cloned().collect(),
        }
    }
}

impl FromIterator<usize> for Origin {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

impl Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut it = self.inner.iter();

        if let Some(i) = it.next() {
            write!(f, "{}", i)?;
        }

        for i in it {
            write!(f, ", {}", i)?;
        }
        Ok(())
    }
}

/// This represents the sets of origins trusted by a rule
///
/// a fact is only visible to a rule if every block of its origin is trusted
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct TrustedOrigins(Origin);

impl TrustedOrigins {
    /// the implicit trust set of a block's rules: the authority block and the
    /// authorizer
    pub fn default(authorizer_block_id: usize) -> TrustedOrigins {
        let mut origins = Origin::default();
        origins.insert(0);
        origins.insert(authorizer_block_id);
        TrustedOrigins(origins)
    }

    /// resolves a list of scope annotations to a concrete set of block ids
    ///
    /// an empty scope list falls back to `default_origins` (the enclosing
    /// block's trust set). The current block and the authorizer block are
    /// always trusted
    pub fn from_scopes(
        rule_scopes: &[Scope],
        default_origins: &TrustedOrigins,
        current_block: usize,
        authorizer_block_id: usize,
        public_key_to_block_id: &HashMap<usize, Vec<usize>>,
    ) -> TrustedOrigins {
        if rule_scopes.is_empty() {
            let mut origins = default_origins.clone();
            origins.0.insert(current_block);
            origins.0.insert(authorizer_block_id);
            return origins;
        }

        let mut origins = Origin::default();
        origins.insert(authorizer_block_id);
        origins.insert(current_block);

        for scope in rule_scopes {
            match scope {
                Scope::Authority => {
                    origins.insert(0);
                }
                Scope::Previous => {
                    origins.extend(0..current_block);
                }
                Scope::PublicKey(key_id) => {
                    if let Some(block_ids) = public_key_to_block_id.get(&(*key_id as usize)) {
                        origins.extend(block_ids.iter())
                    }
                }
            }
        }

        TrustedOrigins(origins)
    }

    pub fn contains(&self, fact_origin: &Origin) -> bool {
        self.0.is_superset(fact_origin)
    }
}

impl FromIterator<usize> for TrustedOrigins {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a usize> for TrustedOrigins {
    fn from_iter<T: IntoIterator<Item = &'a usize>>(iter: T) -> Self {
        Self(iter.into_iter().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trusted_origins_superset() {
        let trusted: TrustedOrigins = vec![0usize, 1, 4].into_iter().collect();

        let authority_fact: Origin = vec![0usize].into_iter().collect();
        let derived: Origin = vec![0usize, 1].into_iter().collect();
        let tainted: Origin = vec![0usize, 2].into_iter().collect();

        assert!(trusted.contains(&authority_fact));
        assert!(trusted.contains(&derived));
        assert!(!trusted.contains(&tainted));
    }

    #[test]
    fn scope_resolution() {
        // authority, two extra blocks, authorizer is block 3
        let authorizer_id = 3;
        let mut key_map = HashMap::new();
        key_map.insert(0usize, vec![2usize]);

        let default = TrustedOrigins::default(authorizer_id);

        // empty scope in block 1: authority + self + authorizer
        let b1 = TrustedOrigins::from_scopes(&[], &default, 1, authorizer_id, &key_map);
        assert_eq!(
            b1,
            vec![0usize, 1, 3].into_iter().collect::<TrustedOrigins>()
        );

        // explicit `trusting authority` in the authorizer: authority + authorizer only
        let authority_only = TrustedOrigins::from_scopes(
            &[Scope::Authority],
            &default,
            authorizer_id,
            authorizer_id,
            &key_map,
        );
        assert_eq!(
            authority_only,
            vec![0usize, 3].into_iter().collect::<TrustedOrigins>()
        );

        // `previous` in block 2 covers blocks 0 and 1
        let previous = TrustedOrigins::from_scopes(
            &[Scope::Previous],
            &default,
            2,
            authorizer_id,
            &key_map,
        );
        assert_eq!(
            previous,
            vec![0usize, 1, 2, 3].into_iter().collect::<TrustedOrigins>()
        );

        // a third party key resolves to the blocks it signed
        let third_party = TrustedOrigins::from_scopes(
            &[Scope::PublicKey(0)],
            &default,
            authorizer_id,
            authorizer_id,
            &key_map,
        );
        assert_eq!(
            third_party,
            vec![2usize, 3].into_iter().collect::<TrustedOrigins>()
        );
    }
}
