//! Synthetic 16-bit sensor traces drawn from a normal distribution.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use cfg_if::cfg_if;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, IoContext, Result};

cfg_if! {
    if #[cfg(feature = "f32")] {
        type Sample = f32;
    } else {
        type Sample = f64;
    }
}

/// How a real-valued sample becomes a `u16`.
///
/// Both policies first truncate the sample toward zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleConversion {
    /// Clamp into `0..=u16::MAX`.
    #[default]
    Saturate,
    /// Reduce modulo 2^16, so `-1` becomes `65535`.
    Wrap,
}

impl SampleConversion {
    /// Converts one sample.
    pub fn apply(self, sample: f64) -> u16 {
        let truncated = sample.trunc();
        match self {
            // `as` saturates and maps NaN to 0.
            SampleConversion::Saturate => truncated as u16,
            SampleConversion::Wrap => {
                if !truncated.is_finite() {
                    return 0;
                }
                truncated.rem_euclid(65_536.0) as u16
            }
        }
    }
}

/// Parameters of a synthetic trace.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Mean of the distribution.
    pub mean: f64,
    /// Standard deviation of the distribution.
    pub std_dev: f64,
    /// Number of samples.
    pub sample_count: usize,
    /// Conversion to `u16`.
    pub conversion: SampleConversion,
    /// RNG seed. Drawn from the OS when absent.
    pub seed: Option<u64>,
    /// Output file.
    pub output: PathBuf,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            mean: 65.0,
            std_dev: 5.0,
            sample_count: 1_000_000,
            conversion: SampleConversion::Saturate,
            seed: None,
            output: PathBuf::from("sensorData.txt"),
        }
    }
}

/// An ordered sequence of 16-bit sensor readings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SensorTrace {
    samples: Vec<u16>,
}

impl SensorTrace {
    /// Draws `config.sample_count` samples, seeded from `config.seed` or the OS.
    ///
    /// ```
    /// use rawseq::{SensorConfig, SensorTrace};
    ///
    /// let config = SensorConfig { sample_count: 1000, seed: Some(7), ..SensorConfig::default() };
    /// let trace = SensorTrace::generate(&config)?;
    /// assert_eq!(trace.len(), 1000);
    /// # Ok::<(), rawseq::Error>(())
    /// ```
    pub fn generate(config: &SensorConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_entropy(),
        };
        Self::from_rng(config, rng)
    }

    /// Draws samples from an existing RNG source, ignoring `config.seed`.
    pub fn from_rng(config: &SensorConfig, rng: ChaCha20Rng) -> Result<Self> {
        let invalid = || Error::Distribution {
            mean: config.mean,
            std_dev: config.std_dev,
        };
        // Checked after narrowing, a finite f64 can overflow to inf as f32.
        let mean = config.mean as Sample;
        let std_dev = config.std_dev as Sample;
        if !mean.is_finite() || !std_dev.is_finite() || std_dev < 0.0 {
            return Err(invalid());
        }
        let normal = Normal::new(mean, std_dev).map_err(|_| invalid())?;
        let samples = rng
            .sample_iter(normal)
            .take(config.sample_count)
            .map(|sample| config.conversion.apply(f64::from(sample)))
            .collect();
        Ok(Self { samples })
    }

    /// Wraps existing samples.
    pub fn from_samples(samples: Vec<u16>) -> Self {
        Self { samples }
    }

    /// The samples, in order.
    pub fn samples(&self) -> &[u16] {
        &self.samples
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the trace holds no sample.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Arithmetic mean of the samples, `None` when empty.
    pub fn mean(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        let sum: u64 = self.samples.iter().map(|&s| u64::from(s)).sum();
        Some(sum as f64 / self.samples.len() as f64)
    }

    /// Writes the samples as flat little-endian `u16`.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path).at(path)?);
        for sample in &self.samples {
            writer.write_all(&sample.to_le_bytes()).at(path)?;
        }
        writer.flush().at(path)?;
        info!(samples = self.samples.len(), path = %path.display(), "sensor trace written");
        Ok(())
    }

    /// Reads a trace written by [`SensorTrace::write_to`].
    pub fn read_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).at(path)?;
        if bytes.len() % 2 != 0 {
            return Err(Error::TraceSize {
                path: path.to_path_buf(),
                len: bytes.len(),
            });
        }
        let samples = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        Ok(Self { samples })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saturate_clamps_both_ends() {
        assert_eq!(SampleConversion::Saturate.apply(-3.7), 0);
        assert_eq!(SampleConversion::Saturate.apply(70_000.0), u16::MAX);
        assert_eq!(SampleConversion::Saturate.apply(64.9), 64);
        assert_eq!(SampleConversion::Saturate.apply(f64::NAN), 0);
    }

    #[test]
    fn wrap_reduces_modulo_two_to_the_sixteen() {
        assert_eq!(SampleConversion::Wrap.apply(-1.0), u16::MAX);
        assert_eq!(SampleConversion::Wrap.apply(-0.9), 0);
        assert_eq!(SampleConversion::Wrap.apply(65_536.0), 0);
        assert_eq!(SampleConversion::Wrap.apply(65_537.5), 1);
        assert_eq!(SampleConversion::Wrap.apply(f64::INFINITY), 0);
    }

    #[test]
    fn wrap_is_exact_beyond_i64_range() {
        let big = 2f64.powi(64) + 4096.0;
        assert_eq!(SampleConversion::Wrap.apply(big), 4096);
        assert_eq!(SampleConversion::Wrap.apply(-big), 61_440);
    }

    #[test]
    fn default_config_matches_reference_trace() {
        let config = SensorConfig::default();
        assert_eq!(config.mean, 65.0);
        assert_eq!(config.std_dev, 5.0);
        assert_eq!(config.sample_count, 1_000_000);
    }

    #[test]
    fn seeded_traces_repeat() {
        let config = SensorConfig {
            sample_count: 500,
            seed: Some(3),
            ..SensorConfig::default()
        };
        let a = SensorTrace::generate(&config).unwrap();
        let b = SensorTrace::generate(&config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn sample_mean_is_near_distribution_mean() {
        let config = SensorConfig {
            sample_count: 20_000,
            seed: Some(11),
            ..SensorConfig::default()
        };
        let trace = SensorTrace::generate(&config).unwrap();
        // Truncation toward zero lowers the mean by about half a unit.
        let mean = trace.mean().unwrap();
        assert!((63.5..65.5).contains(&mean), "mean was {mean}");
    }

    #[test]
    fn negative_std_dev_is_rejected() {
        let config = SensorConfig {
            std_dev: -5.0,
            sample_count: 3,
            seed: Some(1),
            ..SensorConfig::default()
        };
        assert!(matches!(
            SensorTrace::generate(&config),
            Err(Error::Distribution { std_dev, .. }) if std_dev == -5.0
        ));
    }

    #[test]
    fn nan_std_dev_is_rejected() {
        let config = SensorConfig {
            std_dev: f64::NAN,
            sample_count: 3,
            ..SensorConfig::default()
        };
        assert!(matches!(
            SensorTrace::generate(&config),
            Err(Error::Distribution { .. })
        ));
    }

    #[test]
    fn zero_std_dev_gives_constant_trace() {
        let config = SensorConfig {
            std_dev: 0.0,
            sample_count: 10,
            seed: Some(1),
            ..SensorConfig::default()
        };
        let trace = SensorTrace::generate(&config).unwrap();
        assert!(trace.samples().iter().all(|&s| s == 65));
    }

    #[cfg(feature = "f32")]
    #[test]
    fn mean_beyond_f32_range_is_rejected() {
        let config = SensorConfig {
            mean: 1e300,
            sample_count: 3,
            ..SensorConfig::default()
        };
        assert!(matches!(
            SensorTrace::generate(&config),
            Err(Error::Distribution { .. })
        ));
    }

    #[test]
    fn infinite_mean_is_rejected() {
        let config = SensorConfig {
            mean: f64::INFINITY,
            ..SensorConfig::default()
        };
        assert!(SensorTrace::generate(&config).is_err());
    }

    #[test]
    fn empty_trace_has_no_mean() {
        assert_eq!(SensorTrace::default().mean(), None);
    }
}
