//! Coordination-free, strictly increasing 64-bit IDs.
//!
//! A [`SnowflakeGenerator`] packs the milliseconds elapsed since a custom
//! epoch, a per-node [`WorkerId`] and a per-millisecond sequence into a single
//! [`SnowflakeId`]. Nodes never talk to each other: global uniqueness holds as
//! long as every node is started with a distinct worker ID.
//!
//! ```
//! use snowgen::SnowflakeGenerator;
//!
//! let generator = SnowflakeGenerator::new(7).unwrap();
//!
//! let a = generator.next_id().unwrap();
//! let b = generator.next_id().unwrap();
//! assert!(a < b);
//! assert_eq!(a.worker_id(), 7);
//! ```
//!
//! ## Features
//!
//! - `tracing`: emit spans and events on the generation path.
//! - `serde`: (de)serialize [`SnowflakeId`] as a plain integer.
//! - `cache-padded`: pad the generator state to a cache line.
#![forbid(unsafe_code)]

mod error;
mod generator;
mod id;
mod time;

pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::time::*;
