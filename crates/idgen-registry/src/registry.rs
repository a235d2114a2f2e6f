use std::{
    collections::{HashMap, HashSet},
    path::Path,
    sync::Arc,
};

use idgen::{IdGenerator, LockIdGenerator, MonotonicClock};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::{Error, GeneratorConfig, RegistryConfig, Result};

/// The generator type handed out by a [`GeneratorRegistry`].
pub type NamedGenerator = LockIdGenerator<MonotonicClock>;

/// Named generators, built on first request and shared afterwards.
///
/// A registry is an ordinary value: create one per process (or per test) and
/// pass it to whoever needs ids. Repeated [`GeneratorRegistry::get`] calls
/// for a name return the same [`Arc`], so every caller draws from one
/// sequence.
///
/// ```
/// use idgen::IdGenerator;
/// use idgen_registry::{GeneratorRegistry, RegistryConfig};
///
/// let config = RegistryConfig::from_toml(
///     r#"
///     [[generators]]
///     name = "orders"
///     id = 3
///     epoch = "2015-01-01"
///     timestamp_bits = 41
///     generator_id_bits = 10
///     sequence_bits = 12
///     "#,
/// )
/// .unwrap();
///
/// let registry = GeneratorRegistry::new(config);
/// let orders = registry.get("orders").unwrap();
/// assert_eq!(orders.decode(orders.create_id()).generator_id(), 3);
/// assert!(registry.get("Orders").is_err());
/// ```
#[derive(Debug)]
pub struct GeneratorRegistry {
    config: RegistryConfig,
    generators: Mutex<HashMap<String, Arc<NamedGenerator>>>,
}

impl GeneratorRegistry {
    /// Wraps `config` without building any generator yet.
    pub fn new(config: RegistryConfig) -> Self {
        let mut seen = HashSet::new();
        for generator in &config.generators {
            if !seen.insert(generator.name.as_str()) {
                warn!(name = %generator.name, "duplicate generator name; the first entry wins");
            }
        }
        Self {
            config,
            generators: Mutex::new(HashMap::new()),
        }
    }

    /// Loads the configuration with [`RegistryConfig::load`] and wraps it.
    ///
    /// # Errors
    ///
    /// Any error [`RegistryConfig::load`] returns.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        RegistryConfig::load(path).map(Self::new)
    }

    /// Returns the generator registered under `name`, building it on first
    /// use.
    ///
    /// Failed builds are not cached; the next call tries again.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownGenerator`] if no entry has this exact name,
    /// otherwise whatever [`GeneratorConfig::build`] reports.
    pub fn get(&self, name: &str) -> Result<Arc<NamedGenerator>> {
        let mut generators = self.generators.lock();
        if let Some(generator) = generators.get(name) {
            debug!(name, "reusing id generator");
            return Ok(Arc::clone(generator));
        }

        let Some(config) = self.config(name) else {
            warn!(name, "no id generator configured under this name");
            return Err(Error::UnknownGenerator {
                name: name.to_owned(),
            });
        };

        let generator = Arc::new(config.build()?);
        info!(
            name,
            generator_id = generator.generator_id(),
            layout = %generator.layout(),
            tick = ?config.tick_duration(),
            "built id generator"
        );
        generators.insert(name.to_owned(), Arc::clone(&generator));
        Ok(generator)
    }

    /// The configuration entry for `name`, if any.
    pub fn config(&self, name: &str) -> Option<&GeneratorConfig> {
        self.config.generators.iter().find(|g| g.name == name)
    }

    /// Configured names in file order, each listed once.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        let mut seen = HashSet::new();
        self.config
            .generators
            .iter()
            .map(|g| g.name.as_str())
            .filter(move |name| seen.insert(*name))
    }
}
