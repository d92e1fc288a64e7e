// SPDX-FileCopyrightText: 2026 Trolley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Checkout completion orchestration.
//!
//! Completion is the only flow that touches both the seller and the token
//! issuer: the session's authoritative total is read from the seller, a
//! scoped token is issued for exactly that amount, and only the token id is
//! forwarded into the seller's completion call.

use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use tracing::{debug, info};
use trolley_acp::{AcpClient, Address, CheckoutSession};
use trolley_core::TrolleyError;

use crate::exchange::{SellerBinding, SptExchange};

/// Payment provider reported to the seller when the caller names none.
pub const DEFAULT_PROVIDER: &str = "stripe";

/// Drives the exchange-then-complete sequence for one configured seller.
pub struct CheckoutOrchestrator {
    acp: Arc<AcpClient>,
    exchange: SptExchange,
    currency: String,
    binding: SellerBinding,
}

impl CheckoutOrchestrator {
    pub fn new(
        acp: Arc<AcpClient>,
        exchange: SptExchange,
        currency: String,
        binding: SellerBinding,
    ) -> Self {
        Self {
            acp,
            exchange,
            currency,
            binding,
        }
    }

    /// Completes a checkout using a raw payment credential.
    ///
    /// 1. Refetch the session; the stored total is authoritative, whatever
    ///    amount the caller believes they are paying.
    /// 2. Exchange the raw credential for a token capped at that total.
    /// 3. Complete the checkout with the token id.
    ///
    /// Any failure before step 3 short-circuits; the seller never sees a
    /// completion attempt without a freshly scoped token. One attempt per
    /// call, no retry.
    pub async fn complete_with_payment(
        &self,
        checkout_id: &str,
        raw_payment_token: &str,
        provider: Option<&str>,
        billing_address: Option<Address>,
    ) -> Result<CheckoutSession, TrolleyError> {
        let session = self.acp.get_checkout(checkout_id).await?;
        let amount = session.total_amount().ok_or(TrolleyError::TotalNotFound)?;
        debug!(checkout_id, amount, "bound session total for token issuance");

        let issued = self
            .exchange
            .issue_token(
                raw_payment_token,
                amount,
                &self.currency,
                default_expiry(),
                &self.binding,
            )
            .await?;

        let provider = provider.unwrap_or(DEFAULT_PROVIDER);
        let completed = self
            .acp
            .complete_checkout(checkout_id, &issued.id, provider, billing_address)
            .await?;
        info!(checkout_id, amount, provider, "checkout completed");
        Ok(completed)
    }

    /// Exchanges a raw credential for a token capped at `amount`.
    ///
    /// Same expiry and seller binding as the completion flow; backs the
    /// standalone exchange endpoint.
    pub async fn exchange_raw_token(
        &self,
        payment_method: &str,
        amount: i64,
    ) -> Result<String, TrolleyError> {
        let issued = self
            .exchange
            .issue_token(
                payment_method,
                amount,
                &self.currency,
                default_expiry(),
                &self.binding,
            )
            .await?;
        Ok(issued.id)
    }
}

/// Tokens expire one day after issuance (unix seconds).
fn default_expiry() -> i64 {
    (Utc::now() + TimeDelta::days(1)).timestamp()
}
