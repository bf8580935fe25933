use std::sync::{Arc, Mutex, MutexGuard};

use eco_ledger::{Ledger, LedgerEntry};

use crate::engine::{DepositOutcome, RewardEngine};
use crate::error::RewardError;
use crate::profile::UserProfile;
use crate::sensor::{SensorReading, SensorSource};

/// One user's profile and ledger, owned by the caller.
///
/// Read access is public; every write goes through [`RewardEngine`].
#[derive(Clone, Debug)]
pub struct Session {
    profile: UserProfile,
    ledger: Ledger,
}

impl Session {
    pub(crate) fn new(profile: UserProfile, ledger: Ledger) -> Self {
        Self { profile, ledger }
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut UserProfile, &mut Ledger) {
        (&mut self.profile, &mut self.ledger)
    }
}

/// A session shared between threads.
///
/// Each operation holds the lock for the whole "compute new state, append
/// entry" unit, so concurrent callers can neither reuse an index nor spend
/// a stale balance.
#[derive(Clone)]
pub struct SharedSession {
    engine: Arc<RewardEngine>,
    inner: Arc<Mutex<Session>>,
}

impl SharedSession {
    pub fn new(engine: RewardEngine, session: Session) -> Self {
        Self {
            engine: Arc::new(engine),
            inner: Arc::new(Mutex::new(session)),
        }
    }

    pub fn engine(&self) -> &RewardEngine {
        &self.engine
    }

    fn lock(&self) -> Result<MutexGuard<'_, Session>, RewardError> {
        self.inner.lock().map_err(|_| RewardError::SessionPoisoned)
    }

    pub fn record_deposit(&self, reading: &SensorReading) -> Result<DepositOutcome, RewardError> {
        let mut session = self.lock()?;
        self.engine.record_deposit(&mut session, reading)
    }

    /// Read from the sensor and record the deposit under one lock.
    pub fn scan(&self, sensor: &mut dyn SensorSource) -> Result<DepositOutcome, RewardError> {
        let mut session = self.lock()?;
        self.engine.scan(&mut session, sensor)
    }

    pub fn redeem_by_id(&self, item_id: &str) -> Result<LedgerEntry, RewardError> {
        let mut session = self.lock()?;
        self.engine.redeem_by_id(&mut session, item_id)
    }

    /// Run a read-only closure against a consistent view of the session.
    pub fn read<R>(&self, f: impl FnOnce(&Session) -> R) -> Result<R, RewardError> {
        let session = self.lock()?;
        Ok(f(&session))
    }

    pub fn profile(&self) -> Result<UserProfile, RewardError> {
        self.read(|s| s.profile().clone())
    }

    pub fn is_valid(&self) -> Result<bool, RewardError> {
        self.read(|s| s.ledger().is_valid())
    }

    /// Copy of the current session state.
    pub fn snapshot(&self) -> Result<Session, RewardError> {
        self.read(Session::clone)
    }
}
