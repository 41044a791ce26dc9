//! Seeded stand-in for the live weather provider.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{ProviderError, SnapshotOrigin, WeatherProvider};
use crate::engine::{CloudCategory, Location, WeatherSnapshot};

/// Generates plausible snapshots without network access.
///
/// Each location draws from its own stream derived from the seed, so the sequence a location
/// sees does not depend on the order concurrent fetches complete in.
#[derive(Debug, Clone)]
pub struct DemoWeatherGenerator {
    seed: u64,
    draws: Arc<Mutex<HashMap<String, u64>>>,
}

impl DemoWeatherGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            draws: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Seed from config, else from the clock.
    pub fn from_seed(seed: Option<u64>) -> Self {
        Self::new(seed.unwrap_or_else(|| chrono::Utc::now().timestamp_millis() as u64))
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Deterministic snapshot for `location` on its `draw`-th request.
    pub fn generate(&self, location: &Location, draw: u64) -> WeatherSnapshot {
        let stream = self.seed
            ^ id_hash(location.id.as_str())
            ^ draw.wrapping_mul(0x9E37_79B9_7F4A_7C15);
        let mut rng = StdRng::seed_from_u64(stream);
        let categories = CloudCategory::all();

        WeatherSnapshot {
            cloud_cover: rng.gen_range(0..100) as f64,
            cloud_category: categories[rng.gen_range(0..categories.len())],
            rainfall_mm: rng.gen_range(0..30) as f64,
            humidity: rng.gen_range(50..90) as f64,
            wind_speed: Some(rng.gen_range(5..25) as f64),
            temperature_c: rng.gen_range(25..35) as f64,
            pressure_hpa: Some(rng.gen_range(1005..1025) as f64),
        }
    }

    fn next_draw(&self, location: &Location) -> u64 {
        let mut draws = self
            .draws
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let counter = draws.entry(location.id.as_str().to_string()).or_insert(0);
        let draw = *counter;
        *counter += 1;
        draw
    }
}

fn id_hash(id: &str) -> u64 {
    id.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
    })
}

impl WeatherProvider for DemoWeatherGenerator {
    fn origin(&self) -> SnapshotOrigin {
        SnapshotOrigin::Demo
    }

    fn fetch(
        &self,
        location: &Location,
    ) -> impl Future<Output = Result<WeatherSnapshot, ProviderError>> + Send {
        let snapshot = self.generate(location, self.next_draw(location));
        async move { Ok(snapshot) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::emirates;

    #[test]
    fn same_seed_same_sequence() {
        let dubai = &emirates()[0];
        let a = DemoWeatherGenerator::new(7);
        let b = DemoWeatherGenerator::new(7);

        assert_eq!(a.generate(dubai, 0), b.generate(dubai, 0));
        assert_eq!(a.generate(dubai, 3), b.generate(dubai, 3));
    }

    #[test]
    fn values_stay_in_documented_ranges() {
        let generator = DemoWeatherGenerator::new(11);
        for location in emirates() {
            for draw in 0..20 {
                let snapshot = generator.generate(location, draw);
                assert!((0.0..100.0).contains(&snapshot.cloud_cover));
                assert!((0.0..30.0).contains(&snapshot.rainfall_mm));
                assert!((50.0..90.0).contains(&snapshot.humidity));
                assert!((25.0..35.0).contains(&snapshot.temperature_c));
                assert!(snapshot.pressure_hpa.is_some());
            }
        }
    }

    #[tokio::test]
    async fn successive_fetches_advance_the_stream() {
        let generator = DemoWeatherGenerator::new(3);
        let rak = &emirates()[4];

        let first = generator.fetch(rak).await.expect("demo never fails");
        let second = generator.fetch(rak).await.expect("demo never fails");

        assert_eq!(first, generator.generate(rak, 0));
        assert_eq!(second, generator.generate(rak, 1));
    }
}
