use serde::Serialize;

use eco_types::{Tier, TokenAmount};

use crate::config::{ProfileConfig, TierThresholds};
use crate::tier::TierStatus;

/// The session user's running totals.
///
/// Fields are private: the reward engine is the only writer, and it updates
/// the profile in lockstep with a ledger append. `tier` is always derived
/// from `bottle_count`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    name: String,
    token_balance: TokenAmount,
    bottle_count: u64,
    co2_saved_grams: u64,
    tier: Tier,
}

impl UserProfile {
    pub(crate) fn open(config: &ProfileConfig, thresholds: &TierThresholds) -> Self {
        Self {
            name: config.name.clone(),
            token_balance: config.balance,
            bottle_count: config.bottles,
            co2_saved_grams: 0,
            tier: TierStatus::for_count(thresholds, config.bottles).tier,
        }
    }

    /// The profile after a deposit, or `None` on overflow.
    pub(crate) fn after_deposit(
        &self,
        quantity: u64,
        tokens: TokenAmount,
        co2_grams: u64,
        thresholds: &TierThresholds,
    ) -> Option<Self> {
        let bottle_count = self.bottle_count.checked_add(quantity)?;
        Some(Self {
            name: self.name.clone(),
            token_balance: self.token_balance.checked_add(tokens)?,
            bottle_count,
            co2_saved_grams: self.co2_saved_grams.checked_add(co2_grams)?,
            tier: TierStatus::for_count(thresholds, bottle_count).tier,
        })
    }

    /// The profile after paying `cost`, or `None` if the balance is short.
    pub(crate) fn after_debit(&self, cost: TokenAmount) -> Option<Self> {
        Some(Self {
            token_balance: self.token_balance.checked_sub(cost)?,
            ..self.clone()
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn token_balance(&self) -> TokenAmount {
        self.token_balance
    }

    pub fn bottle_count(&self) -> u64 {
        self.bottle_count
    }

    pub fn co2_saved_grams(&self) -> u64 {
        self.co2_saved_grams
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }
}
