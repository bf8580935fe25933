use std::sync::Arc;

use tracing::{debug, info, warn};

use eco_ledger::{EntryPayload, Ledger, LedgerEntry, GENESIS_NOTE};
use eco_types::{Clock, SystemClock, Tier, TokenAmount};

use crate::catalog::{Catalog, CatalogItem};
use crate::config::{ProfileConfig, RewardConfig, SessionConfig};
use crate::error::RewardError;
use crate::profile::UserProfile;
use crate::sensor::{SensorReading, SensorSource};
use crate::session::Session;
use crate::tier::TierStatus;

/// Result of a successful deposit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepositOutcome {
    pub entry: LedgerEntry,
    pub tokens_awarded: TokenAmount,
    pub co2_saved_grams: u64,
    /// Set when the deposit moved the profile into a higher tier.
    pub promoted_to: Option<Tier>,
}

/// Business rules that turn deposits and redemptions into ledger entries.
///
/// The engine holds only configuration. Every operation takes the
/// [`Session`] explicitly and either commits both the profile change and one
/// ledger append, or neither.
#[derive(Clone, Debug)]
pub struct RewardEngine {
    config: RewardConfig,
    catalog: Catalog,
}

impl RewardEngine {
    pub fn new(config: RewardConfig, catalog: Catalog) -> Self {
        Self { config, catalog }
    }

    /// Validate a session configuration and build its engine.
    pub fn from_config(config: &SessionConfig) -> Result<Self, RewardError> {
        config.validate()?;
        Ok(Self::new(
            config.rewards.clone(),
            Catalog::new(config.catalog.clone()),
        ))
    }

    pub fn config(&self) -> &RewardConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Tier and next threshold for a bottle count.
    pub fn tier_for(&self, bottle_count: u64) -> TierStatus {
        TierStatus::for_count(&self.config.tiers, bottle_count)
    }

    /// Start a session whose genesis entry records the opening profile.
    pub fn open_session(&self, profile: &ProfileConfig) -> Result<Session, RewardError> {
        self.open_session_with_clock(profile, Arc::new(SystemClock))
    }

    pub fn open_session_with_clock(
        &self,
        profile: &ProfileConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Session, RewardError> {
        let genesis = EntryPayload::Genesis {
            note: GENESIS_NOTE.into(),
            opening_balance: profile.balance,
            opening_bottles: profile.bottles,
        };
        let ledger = Ledger::with_genesis_and_clock(genesis, clock)?;
        let profile = UserProfile::open(profile, &self.config.tiers);
        debug!(user = profile.name(), tier = %profile.tier(), "session opened");
        Ok(Session::new(profile, ledger))
    }

    /// Credit a deposit and append its ledger entry.
    pub fn record_deposit(
        &self,
        session: &mut Session,
        reading: &SensorReading,
    ) -> Result<DepositOutcome, RewardError> {
        let weight_grams = self.check_reading(reading)?;
        let quantity = u64::from(reading.quantity);

        let tokens = self
            .config
            .reward_rate
            .checked_mul(quantity)
            .ok_or(RewardError::Overflow("tokens awarded"))?;
        let co2_grams = if weight_grams > 0 {
            weight_grams
                .checked_mul(self.config.co2_grams_per_kg)
                .map(|g| g / 1_000)
        } else {
            quantity.checked_mul(self.config.co2_grams_per_bottle)
        }
        .ok_or(RewardError::Overflow("co2 saved"))?;

        let (profile, ledger) = session.parts_mut();
        let next = profile
            .after_deposit(quantity, tokens, co2_grams, &self.config.tiers)
            .ok_or(RewardError::Overflow("profile totals"))?;

        let entry = ledger.append(EntryPayload::Deposit {
            actor: profile.name().to_string(),
            quantity: reading.quantity,
            weight_grams,
            tokens,
            co2_grams,
            location: self.config.location.clone(),
        })?;

        let promoted_to = (next.tier() > profile.tier()).then_some(next.tier());
        if let Some(tier) = promoted_to {
            info!(user = next.name(), %tier, bottles = next.bottle_count(), "tier promotion");
        }
        *profile = next;

        debug!(
            index = entry.index,
            quantity,
            tokens = %tokens,
            balance = %profile.token_balance(),
            "deposit recorded"
        );
        Ok(DepositOutcome {
            entry,
            tokens_awarded: tokens,
            co2_saved_grams: co2_grams,
            promoted_to,
        })
    }

    /// Take one reading from the injected sensor and record it.
    pub fn scan(
        &self,
        session: &mut Session,
        sensor: &mut dyn SensorSource,
    ) -> Result<DepositOutcome, RewardError> {
        let reading = sensor.read()?;
        self.record_deposit(session, &reading)
    }

    /// Pay for a catalog item.
    ///
    /// A short balance fails with [`RewardError::InsufficientBalance`] and
    /// leaves the session exactly as it was.
    pub fn redeem(
        &self,
        session: &mut Session,
        item: &CatalogItem,
    ) -> Result<LedgerEntry, RewardError> {
        let (profile, ledger) = session.parts_mut();
        let balance = profile.token_balance();
        let Some(next) = profile.after_debit(item.cost) else {
            warn!(item = %item.id, cost = %item.cost, %balance, "redemption rejected");
            return Err(RewardError::InsufficientBalance {
                cost: item.cost,
                balance,
            });
        };

        let entry = ledger.append(EntryPayload::Redemption {
            actor: profile.name().to_string(),
            item: item.id.clone(),
            cost: item.cost.debit(),
        })?;
        *profile = next;

        debug!(index = entry.index, item = %item.id, balance = %profile.token_balance(), "redemption recorded");
        Ok(entry)
    }

    /// Look up a catalog item by id and redeem it.
    pub fn redeem_by_id(
        &self,
        session: &mut Session,
        item_id: &str,
    ) -> Result<LedgerEntry, RewardError> {
        let item = self
            .catalog
            .find(item_id)
            .ok_or_else(|| RewardError::UnknownItem(item_id.to_string()))?;
        self.redeem(session, item)
    }

    /// Range-check a reading and return its weight in whole grams.
    fn check_reading(&self, reading: &SensorReading) -> Result<u64, RewardError> {
        if reading.quantity > self.config.max_bottles_per_reading {
            return Err(RewardError::InvalidReading(format!(
                "{} bottles exceeds the per-reading limit of {}",
                reading.quantity, self.config.max_bottles_per_reading
            )));
        }
        let kg = reading.weight_kg;
        if !kg.is_finite() || kg < 0.0 || kg > self.config.max_weight_kg_per_reading {
            return Err(RewardError::InvalidReading(format!(
                "weight {kg} kg outside 0..={} kg",
                self.config.max_weight_kg_per_reading
            )));
        }
        Ok((kg * 1_000.0).round() as u64)
    }
}

impl Default for RewardEngine {
    fn default() -> Self {
        Self::new(RewardConfig::default(), Catalog::default())
    }
}
