/*
 * Copyright (c) 2019 Geoffroy Couprie <contact@geoffroycouprie.com> and Contributors to the Eclipse Foundation.
 * SPDX-License-Identifier: Apache-2.0
 */
//! main structures to interact with already verified tokens
//!
//! the evaluator receives blocks once their signatures were checked by the
//! cryptographic layer: each block comes with its revocation identifier and,
//! for third party blocks, the public key that signed it
use std::fmt;

use crate::builder::BlockBuilder;
use crate::datalog;

pub mod authorizer;

/// identity of the key that signed a block
///
/// signature verification happens upstream, only equality matters here
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PublicKey {
    key: Vec<u8>,
    algorithm: Algorithm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Algorithm {
    Ed25519,
    Secp256r1,
}

impl PublicKey {
    pub fn from_bytes(key: &[u8], algorithm: Algorithm) -> Self {
        PublicKey {
            key: key.to_vec(),
            algorithm,
        }
    }

    pub fn to_bytes(&self) -> &[u8] {
        &self.key
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.algorithm {
            Algorithm::Ed25519 => write!(f, "ed25519/{}", hex::encode(&self.key)),
            Algorithm::Secp256r1 => write!(f, "secp256r1/{}", hex::encode(&self.key)),
        }
    }
}

/// scope annotation, with the public key resolved to its interned index
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    Authority,
    Previous,
    PublicKey(u64),
}

/// a block's contents, translated to the authorizer's symbol table
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Block {
    pub facts: Vec<datalog::Fact>,
    pub rules: Vec<datalog::Rule>,
    pub checks: Vec<datalog::Check>,
    pub scopes: Vec<Scope>,
    pub context: Option<String>,
}

/// one block of a token, with its authentication data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenBlock {
    pub block: BlockBuilder,
    pub revocation_id: Vec<u8>,
    /// `Some` for third party blocks, `None` otherwise
    pub external_key: Option<PublicKey>,
}

/// the blocks of a verified token, in signature order
///
/// block 0 is the authority block; every following block attenuates the
/// token and is untrusted relative to the authority
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub(crate) authority: TokenBlock,
    pub(crate) blocks: Vec<TokenBlock>,
}

impl Token {
    pub fn new(authority: BlockBuilder, revocation_id: &[u8]) -> Self {
        Token {
            authority: TokenBlock {
                block: authority,
                revocation_id: revocation_id.to_vec(),
                external_key: None,
            },
            blocks: Vec::new(),
        }
    }

    /// appends an attenuation block
    pub fn append(
        mut self,
        block: BlockBuilder,
        revocation_id: &[u8],
        external_key: Option<PublicKey>,
    ) -> Self {
        self.blocks.push(TokenBlock {
            block,
            revocation_id: revocation_id.to_vec(),
            external_key,
        });
        self
    }

    /// number of blocks in the token
    pub fn block_count(&self) -> usize {
        1 + self.blocks.len()
    }

    /// returns the list of revocation identifiers for each block, in order
    pub fn revocation_identifiers(&self) -> Vec<Vec<u8>> {
        let mut res = vec![self.authority.revocation_id.clone()];
        for block in self.blocks.iter() {
            res.push(block.revocation_id.clone());
        }
        res
    }

    /// returns the external key of each block, in order
    pub fn external_public_keys(&self) -> Vec<Option<PublicKey>> {
        let mut res = vec![None];
        for block in self.blocks.iter() {
            res.push(block.external_key.clone());
        }
        res
    }

    /// returns the context element of each block
    pub fn context(&self) -> Vec<Option<String>> {
        let mut res = vec![self.authority.block.context.clone()];
        for block in self.blocks.iter() {
            res.push(block.block.context.clone());
        }
        res
    }

    pub(crate) fn token_blocks(&self) -> impl Iterator<Item = &TokenBlock> {
        std::iter::once(&self.authority).chain(self.blocks.iter())
    }
}
