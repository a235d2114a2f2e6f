//! A registry of named [`idgen`] generators, configured from TOML.
//!
//! Each `[[generators]]` entry describes one generator: its id, epoch, bit
//! layout, tick duration and overflow strategy. Generators are built on
//! first lookup and memoized, so every lookup of a name shares one sequence.
//!
//! Configuration is read from an explicit path, else from the file named by
//! the `IDGEN_CONFIG` environment variable, else from `idgen.toml`.

mod config;
mod error;
mod registry;

pub use crate::config::*;
pub use crate::error::*;
pub use crate::registry::*;
