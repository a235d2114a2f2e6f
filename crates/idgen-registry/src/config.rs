use core::time::Duration;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use chrono::{NaiveDate, NaiveDateTime};
use idgen::{BitLayout, GeneratorOptions, LockIdGenerator, MonotonicClock, OverflowStrategy};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

/// Environment variable naming the config file when no path is given.
pub const CONFIG_ENV_VAR: &str = "IDGEN_CONFIG";

/// Config file read when neither a path nor [`CONFIG_ENV_VAR`] is given.
pub const DEFAULT_CONFIG_NAME: &str = "idgen.toml";

/// Maximum config file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 512 * 1024;

const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];
const DATE_FORMAT: &str = "%Y-%m-%d";
const DEFAULT_TICK: Duration = Duration::from_millis(1);

/// Declarative configuration for a set of named generators.
///
/// ```toml
/// [[generators]]
/// name = "orders"
/// id = 3
/// epoch = "2015-01-01"
/// timestamp_bits = 41
/// generator_id_bits = 10
/// sequence_bits = 12
/// sequence_overflow_strategy = "spin_wait"
///
/// [[generators]]
/// name = "audit"
/// id = 0
/// epoch = "2020-06-01T12:00:00"
/// timestamp_bits = 45
/// generator_id_bits = 2
/// sequence_bits = 16
/// tick_duration = { secs = 0, nanos = 100000000 }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    /// Generator entries, in file order.
    #[serde(default)]
    pub generators: Vec<GeneratorConfig>,
}

impl RegistryConfig {
    /// Loads configuration from `path`, from the file named by
    /// [`CONFIG_ENV_VAR`], or from [`DEFAULT_CONFIG_NAME`], in that order of
    /// preference.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, [`Error::TooLarge`]
    /// above [`MAX_CONFIG_FILE_SIZE`] and [`Error::Parse`] if it is not a
    /// valid configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let resolved = resolve_path(path);
        let io_error = |source| Error::Io {
            path: resolved.clone(),
            source,
        };

        let len = fs::metadata(&resolved).map_err(io_error)?.len();
        if len > MAX_CONFIG_FILE_SIZE as u64 {
            return Err(Error::TooLarge {
                path: resolved,
                size: usize::try_from(len).unwrap_or(usize::MAX),
                limit: MAX_CONFIG_FILE_SIZE,
            });
        }

        // The file may have grown since it was measured.
        let content = fs::read_to_string(&resolved).map_err(io_error)?;
        if content.len() > MAX_CONFIG_FILE_SIZE {
            return Err(Error::TooLarge {
                path: resolved,
                size: content.len(),
                limit: MAX_CONFIG_FILE_SIZE,
            });
        }
        let config = Self::from_toml(&content)?;
        debug!(
            path = %resolved.display(),
            generators = config.generators.len(),
            "loaded id generator config"
        );
        Ok(config)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if `content` is not a valid configuration.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

fn resolve_path(path: Option<&Path>) -> PathBuf {
    if let Some(path) = path {
        return path.to_path_buf();
    }
    env::var_os(CONFIG_ENV_VAR).map_or_else(|| PathBuf::from(DEFAULT_CONFIG_NAME), PathBuf::from)
}

/// One named generator.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Registry key, matched case-sensitively.
    pub name: String,
    /// The generator id embedded in every id.
    pub id: u32,
    /// UTC start of tick zero, as `yyyy-MM-ddTHH:mm:ss`, `yyyy-MM-dd HH:mm:ss`
    /// or `yyyy-MM-dd`.
    pub epoch: String,
    /// Width of the timestamp field.
    pub timestamp_bits: u8,
    /// Width of the generator id field.
    pub generator_id_bits: u8,
    /// Width of the sequence field.
    pub sequence_bits: u8,
    /// Length of one tick; absent or zero means one millisecond.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tick_duration: Option<Duration>,
    /// What to do when a tick's sequence space runs out.
    #[serde(default)]
    pub sequence_overflow_strategy: OverflowStrategy,
}

impl GeneratorConfig {
    /// The bit layout formed by the three widths.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Generator`] if the widths do not form a valid layout.
    pub fn layout(&self) -> Result<BitLayout> {
        Ok(BitLayout::new(
            self.timestamp_bits,
            self.generator_id_bits,
            self.sequence_bits,
        )?)
    }

    /// The epoch as a [`Duration`] since the UNIX epoch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEpoch`] if the string matches none of the
    /// accepted formats or lies before 1970-01-01.
    pub fn epoch(&self) -> Result<Duration> {
        parse_epoch(&self.epoch).ok_or_else(|| Error::InvalidEpoch {
            name: self.name.clone(),
            value: self.epoch.clone(),
        })
    }

    /// The configured tick length, or one millisecond if absent or zero.
    pub fn tick_duration(&self) -> Duration {
        self.tick_duration
            .filter(|tick| !tick.is_zero())
            .unwrap_or(DEFAULT_TICK)
    }

    /// Builds the generator this entry describes, on a fresh
    /// [`MonotonicClock`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Generator`] for an invalid layout or generator id and
    /// [`Error::InvalidEpoch`] for an unparseable epoch.
    pub fn build(&self) -> Result<LockIdGenerator<MonotonicClock>> {
        let layout = self.layout()?;
        let clock = MonotonicClock::new(self.epoch()?, self.tick_duration())?;
        let options = GeneratorOptions::new(clock)
            .with_layout(layout)
            .with_overflow_strategy(self.sequence_overflow_strategy);
        Ok(LockIdGenerator::with_options(self.id, options)?)
    }
}

fn parse_epoch(value: &str) -> Option<Duration> {
    let value = value.trim();
    let date_time = DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, DATE_FORMAT)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;
    let secs = u64::try_from(date_time.and_utc().timestamp()).ok()?;
    Some(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_each_epoch_format_as_utc() {
        let expected = Some(Duration::from_secs(1_420_070_400));
        assert_eq!(parse_epoch("2015-01-01"), expected);
        assert_eq!(parse_epoch("2015-01-01T00:00:00"), expected);
        assert_eq!(parse_epoch("2015-01-01 00:00:00"), expected);
        assert_eq!(
            parse_epoch("2018-07-31T12:48:02"),
            Some(Duration::from_secs(1_533_041_282))
        );
    }

    #[test]
    fn rejects_malformed_and_pre_unix_epochs() {
        assert_eq!(parse_epoch("01/01/2015"), None);
        assert_eq!(parse_epoch("2015-13-01"), None);
        assert_eq!(parse_epoch("1969-12-31"), None);
        assert_eq!(parse_epoch(""), None);
    }

    #[test]
    fn zero_or_missing_tick_duration_means_one_millisecond() {
        let mut config = GeneratorConfig {
            name: "a".into(),
            id: 0,
            epoch: "2015-01-01".into(),
            timestamp_bits: 41,
            generator_id_bits: 10,
            sequence_bits: 12,
            tick_duration: None,
            sequence_overflow_strategy: OverflowStrategy::Throw,
        };
        assert_eq!(config.tick_duration(), Duration::from_millis(1));

        config.tick_duration = Some(Duration::ZERO);
        assert_eq!(config.tick_duration(), Duration::from_millis(1));

        config.tick_duration = Some(Duration::from_secs(7));
        assert_eq!(config.tick_duration(), Duration::from_secs(7));
    }

    #[test]
    fn toml_schema_round_trips() {
        let config = RegistryConfig::from_toml(
            r#"
            [[generators]]
            name = "audit"
            id = 1
            epoch = "2020-06-01T12:00:00"
            timestamp_bits = 45
            generator_id_bits = 2
            sequence_bits = 16
            tick_duration = { secs = 0, nanos = 100000000 }
            sequence_overflow_strategy = "spin_wait"
            "#,
        )
        .unwrap();

        let generator = &config.generators[0];
        assert_eq!(generator.tick_duration(), Duration::from_millis(100));
        assert_eq!(
            generator.sequence_overflow_strategy,
            OverflowStrategy::SpinWait
        );
        assert_eq!(generator.layout().unwrap(), BitLayout::new(45, 2, 16).unwrap());

        let rendered = toml::to_string(&config).unwrap();
        assert_eq!(RegistryConfig::from_toml(&rendered).unwrap(), config);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = RegistryConfig::from_toml(
            r#"
            [[generators]]
            name = "a"
            id = 0
            epoch = "2015-01-01"
            timestamp_bits = 41
            generator_id_bits = 10
            sequence_bits = 12
            machine = 4
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }
}
