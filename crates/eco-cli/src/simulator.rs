use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use eco_rewards::{SensorError, SensorReading, SensorSource};

/// Bottles per kilogram assumed by the simulated scale.
const BOTTLES_PER_KG: f64 = 20.0;

/// Stand-in for a smart bin: weighs 0.1–2.0 kg and estimates a bottle count.
pub struct SimulatedSensor {
    rng: StdRng,
}

impl SimulatedSensor {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl SensorSource for SimulatedSensor {
    fn read(&mut self) -> Result<SensorReading, SensorError> {
        let weight_kg: f64 = self.rng.gen_range(0.1..=2.0);
        let weight_kg = (weight_kg * 100.0).round() / 100.0;
        let quantity = (weight_kg * BOTTLES_PER_KG) as u32;
        Ok(SensorReading::new(quantity, weight_kg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readings_stay_in_range() {
        let mut sensor = SimulatedSensor::new(Some(7));
        for _ in 0..200 {
            let r = sensor.read().unwrap();
            assert!((0.1..=2.0).contains(&r.weight_kg));
            assert!((1..=40).contains(&r.quantity));
        }
    }

    #[test]
    fn seeded_sensors_repeat() {
        let mut a = SimulatedSensor::new(Some(42));
        let mut b = SimulatedSensor::new(Some(42));
        for _ in 0..10 {
            assert_eq!(a.read().unwrap(), b.read().unwrap());
        }
    }
}
