//! Reward engine for EcoLedger.
//!
//! Every rule that turns an external event into a balance change lives here,
//! and every successful rule application appends exactly one ledger entry.
//!
//! - [`RewardEngine`] — deposits, redemptions and tier evaluation
//! - [`Session`] — the explicit `{ profile, ledger }` pair threaded through calls
//! - [`SharedSession`] — the same session behind a lock for multi-threaded hosts
//! - [`SensorSource`] — injected source of readings; the engine never
//!   generates randomness itself
//! - [`SessionConfig`] — TOML-loadable configuration

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod profile;
pub mod sensor;
pub mod session;
pub mod tier;

pub use catalog::{Catalog, CatalogItem};
pub use config::{ConfigError, ProfileConfig, RewardConfig, SessionConfig, TierThresholds};
pub use engine::{DepositOutcome, RewardEngine};
pub use error::RewardError;
pub use profile::UserProfile;
pub use sensor::{FixedReadings, SensorError, SensorReading, SensorSource};
pub use session::{Session, SharedSession};
pub use tier::TierStatus;
