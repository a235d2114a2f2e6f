//! Distributed, roughly time-ordered, unique 63-bit ids in the style of
//! Twitter's Snowflake.
//!
//! Every id packs three fields into a non-negative `i64`, most significant
//! first: a tick count since an epoch, the id of the generator that minted
//! it, and a per-tick sequence number. How the 63 bits are split is described
//! by a [`BitLayout`]; where ticks come from by a [`TimeSource`].
//!
//! Two generator flavours share the same algorithm:
//!
//! - [`LockIdGenerator`] keeps its state behind a mutex.
//! - [`AtomicIdGenerator`] keeps it in a single atomic word.
//!
//! ```
//! use idgen::{GeneratorOptions, IdGenerator, LockIdGenerator};
//!
//! let generator = LockIdGenerator::with_options(42, GeneratorOptions::default()).unwrap();
//! let id = generator.create_id();
//!
//! let decoded = generator.decode(id);
//! assert_eq!(decoded.generator_id(), 42);
//! assert!(decoded.to_system_time().is_some());
//! ```
//!
//! ## Features
//!
//! - `parking-lot`: use `parking_lot`'s non-poisoning mutex.
//! - `cache-padded`: pad generator state to a cache line.
//! - `tracing`: emit `tracing` spans and events from generators.
//! - `serde`: derive `Serialize`/`Deserialize` for [`Id`] and
//!   [`OverflowStrategy`].
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod generator;
mod id;
mod layout;
mod time;

pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::layout::*;
pub use crate::time::*;
