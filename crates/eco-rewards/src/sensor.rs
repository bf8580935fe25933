use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// What a collection point reports for one deposit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub quantity: u32,
    /// Weight in kilograms; `0.0` when the bin has no scale.
    pub weight_kg: f64,
}

impl SensorReading {
    pub fn new(quantity: u32, weight_kg: f64) -> Self {
        Self {
            quantity,
            weight_kg,
        }
    }

    /// A count-only reading.
    pub fn bottles(quantity: u32) -> Self {
        Self::new(quantity, 0.0)
    }
}

/// Source of sensor readings.
///
/// Production wiring plugs in a hardware adapter or a simulator; tests use
/// [`FixedReadings`] or a closure.
pub trait SensorSource {
    fn read(&mut self) -> Result<SensorReading, SensorError>;
}

impl<F> SensorSource for F
where
    F: FnMut() -> Result<SensorReading, SensorError>,
{
    fn read(&mut self) -> Result<SensorReading, SensorError> {
        self()
    }
}

/// Replays a fixed sequence of readings, then reports exhaustion.
#[derive(Clone, Debug, Default)]
pub struct FixedReadings {
    readings: VecDeque<SensorReading>,
}

impl FixedReadings {
    pub fn new(readings: impl IntoIterator<Item = SensorReading>) -> Self {
        Self {
            readings: readings.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.readings.len()
    }
}

impl SensorSource for FixedReadings {
    fn read(&mut self) -> Result<SensorReading, SensorError> {
        self.readings.pop_front().ok_or(SensorError::Exhausted)
    }
}

/// Errors reported by a sensor source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SensorError {
    #[error("no more readings available")]
    Exhausted,

    #[error("sensor unavailable: {0}")]
    Unavailable(String),
}
