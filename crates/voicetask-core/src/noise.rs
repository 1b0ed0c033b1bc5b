//! Ambient noise check run before any task.
//!
//! A handful of decibel readings are taken at a fixed interval; the room
//! passes when their integer average stays below the configured ceiling.

use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::audio::AudioRecorder;

/// Source of ambient noise readings in decibels.
#[async_trait]
pub trait NoiseMeter: Send + Sync {
    async fn sample_db(&self) -> u32;
}

/// Produces uniformly random readings between 5 and 55 dB.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedNoiseMeter;

#[async_trait]
impl NoiseMeter for SimulatedNoiseMeter {
    async fn sample_db(&self) -> u32 {
        rand::rng().random_range(5..=55)
    }
}

/// Derives readings from a running recorder's input level.
///
/// The meter level spans 60 dB, so a reading is the number of decibels the
/// input sits above the -60 dBFS floor. The recorder must already be
/// capturing; an idle recorder reads as 0 dB.
pub struct LevelNoiseMeter {
    recorder: Arc<dyn AudioRecorder>,
}

impl LevelNoiseMeter {
    pub fn new(recorder: Arc<dyn AudioRecorder>) -> Self {
        Self { recorder }
    }
}

#[async_trait]
impl NoiseMeter for LevelNoiseMeter {
    async fn sample_db(&self) -> u32 {
        let level = self.recorder.get_amplitude().await.clamp(0.0, 1.0);
        (level * 60.0).round() as u32
    }
}

/// Noise check parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoiseCheckConfig {
    /// Number of readings to average
    #[serde(default = "default_samples")]
    pub samples: u32,
    /// Pause between readings
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// The average must be strictly below this to pass
    #[serde(default = "default_max_average_db")]
    pub max_average_db: u32,
}

fn default_samples() -> u32 {
    6
}

fn default_interval_ms() -> u64 {
    350
}

fn default_max_average_db() -> u32 {
    40
}

impl Default for NoiseCheckConfig {
    fn default() -> Self {
        Self {
            samples: default_samples(),
            interval_ms: default_interval_ms(),
            max_average_db: default_max_average_db(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoiseVerdict {
    Pass { average_db: u32 },
    TooNoisy { average_db: u32 },
}

impl NoiseVerdict {
    pub fn passed(&self) -> bool {
        matches!(self, NoiseVerdict::Pass { .. })
    }

    pub fn average_db(&self) -> u32 {
        match self {
            NoiseVerdict::Pass { average_db } | NoiseVerdict::TooNoisy { average_db } => {
                *average_db
            }
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            NoiseVerdict::Pass { .. } => "Good to proceed",
            NoiseVerdict::TooNoisy { .. } => "Please move to a quieter place",
        }
    }
}

pub struct NoiseCheck {
    config: NoiseCheckConfig,
}

impl NoiseCheck {
    pub fn new(config: NoiseCheckConfig) -> Self {
        Self { config }
    }

    /// Take the configured number of readings, reporting each one through
    /// `on_sample`, and judge the average.
    pub async fn run<M, F>(&self, meter: &M, mut on_sample: F) -> NoiseVerdict
    where
        M: NoiseMeter + ?Sized,
        F: FnMut(u32),
    {
        let samples = self.config.samples.max(1);
        let interval = Duration::from_millis(self.config.interval_ms);

        let mut total: u64 = 0;
        for _ in 0..samples {
            let db = meter.sample_db().await;
            total += u64::from(db);
            on_sample(db);
            tokio::time::sleep(interval).await;
        }

        let average_db = u32::try_from(total / u64::from(samples)).unwrap_or(u32::MAX);
        debug!(average_db, samples, "noise check finished");

        if average_db < self.config.max_average_db {
            NoiseVerdict::Pass { average_db }
        } else {
            NoiseVerdict::TooNoisy { average_db }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{RecorderFault, Recording};
    use std::path::Path;
    use std::sync::Mutex;

    /// Recorder that reports whatever level it was last given.
    struct FixedLevelRecorder(Mutex<f32>);

    impl FixedLevelRecorder {
        fn set(&self, level: f32) {
            *self.0.lock().unwrap() = level;
        }
    }

    #[async_trait]
    impl AudioRecorder for FixedLevelRecorder {
        async fn start_recording(&self, _target_path: &Path) -> Result<(), RecorderFault> {
            Ok(())
        }

        async fn stop_recording(&self) -> Result<Recording, RecorderFault> {
            Ok(Recording::empty())
        }

        async fn get_amplitude(&self) -> f32 {
            *self.0.lock().unwrap()
        }
    }

    /// Replays a fixed list of readings.
    struct ReplayMeter(Mutex<Vec<u32>>);

    impl ReplayMeter {
        fn new(mut readings: Vec<u32>) -> Self {
            readings.reverse();
            Self(Mutex::new(readings))
        }
    }

    #[async_trait]
    impl NoiseMeter for ReplayMeter {
        async fn sample_db(&self) -> u32 {
            self.0.lock().unwrap().pop().unwrap_or(0)
        }
    }

    fn quick_check() -> NoiseCheck {
        NoiseCheck::new(NoiseCheckConfig {
            interval_ms: 0,
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_quiet_room_passes() {
        let meter = ReplayMeter::new(vec![10, 20, 30, 40, 50, 20]);
        let verdict = quick_check().run(&meter, |_| {}).await;
        assert_eq!(verdict, NoiseVerdict::Pass { average_db: 28 });
        assert_eq!(verdict.message(), "Good to proceed");
    }

    #[tokio::test]
    async fn test_average_at_ceiling_fails() {
        let meter = ReplayMeter::new(vec![40; 6]);
        let verdict = quick_check().run(&meter, |_| {}).await;
        assert_eq!(verdict, NoiseVerdict::TooNoisy { average_db: 40 });
        assert!(!verdict.passed());
    }

    #[tokio::test]
    async fn test_average_is_truncated() {
        // 239 / 6 = 39.83
        let meter = ReplayMeter::new(vec![40, 40, 40, 40, 40, 39]);
        let verdict = quick_check().run(&meter, |_| {}).await;
        assert_eq!(verdict, NoiseVerdict::Pass { average_db: 39 });
    }

    #[tokio::test]
    async fn test_every_reading_is_reported() {
        let meter = ReplayMeter::new(vec![5, 6, 7, 8, 9, 10]);
        let mut seen = Vec::new();
        quick_check().run(&meter, |db| seen.push(db)).await;
        assert_eq!(seen, vec![5, 6, 7, 8, 9, 10]);
    }

    #[tokio::test]
    async fn test_simulated_meter_range() {
        let meter = SimulatedNoiseMeter;
        for _ in 0..100 {
            let db = meter.sample_db().await;
            assert!((5..=55).contains(&db));
        }
    }

    #[tokio::test]
    async fn test_level_meter_maps_level_onto_sixty_db() {
        let recorder = Arc::new(FixedLevelRecorder(Mutex::new(0.5)));
        let meter = LevelNoiseMeter::new(recorder.clone());
        assert_eq!(meter.sample_db().await, 30);

        // Idle recorder
        recorder.set(0.0);
        assert_eq!(meter.sample_db().await, 0);

        recorder.set(4.0);
        assert_eq!(meter.sample_db().await, 60);

        recorder.set(-1.0);
        assert_eq!(meter.sample_db().await, 0);

        recorder.set(f32::NAN);
        assert_eq!(meter.sample_db().await, 0);
    }
}
