// SPDX-FileCopyrightText: 2026 Trolley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Token records and the store they live in.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// Spending constraints bound into a token at issuance.
///
/// `None` fields serialize as explicit nulls; the granted-token response
/// echoes the limits exactly as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageLimits {
    pub currency: String,
    pub max_amount: Option<i64>,
    pub expires_at: Option<i64>,
}

/// Merchant identity the token was issued for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerDetails {
    pub network_id: Option<String>,
    pub external_id: Option<String>,
}

/// One issued shared payment token.
///
/// Records are immutable after insert. `status` is stored as `active`;
/// expiry is a read-time predicate, never a stored transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedPaymentToken {
    pub id: String,
    pub payment_method: String,
    pub usage_limits: UsageLimits,
    pub seller_details: SellerDetails,
    pub created: i64,
    pub status: String,
}

impl SharedPaymentToken {
    /// True once `now` is strictly past the bound expiration instant.
    /// Tokens issued without one never expire.
    pub fn is_expired(&self, now: i64) -> bool {
        match self.usage_limits.expires_at {
            Some(expires_at) => now > expires_at,
            None => false,
        }
    }
}

/// Storage for issued tokens.
///
/// Injected into the service so the in-memory map can be swapped for a
/// persistent store without touching handler code.
pub trait TokenStore: Send + Sync {
    /// Inserts a freshly issued token.
    fn put(&self, token: SharedPaymentToken);

    /// Looks up a token by id.
    fn get(&self, id: &str) -> Option<SharedPaymentToken>;

    /// Number of tokens issued so far.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-lifetime store backed by a concurrent map. Contents are lost
/// when the process exits.
#[derive(Default)]
pub struct MemoryTokenStore {
    tokens: DashMap<String, SharedPaymentToken>,
}

impl TokenStore for MemoryTokenStore {
    fn put(&self, token: SharedPaymentToken) {
        self.tokens.insert(token.id.clone(), token);
    }

    fn get(&self, id: &str) -> Option<SharedPaymentToken> {
        self.tokens.get(id).map(|entry| entry.clone())
    }

    fn len(&self) -> usize {
        self.tokens.len()
    }
}
