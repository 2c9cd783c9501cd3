//! # SectorScope Core
//!
//! Core traits, types, and error handling for SectorScope.
//!
//! This crate provides the foundational abstractions shared by the sector
//! sources and the partition decoder:
//! - **SectorReader**: anything that hands out sectors by LBA
//! - **BlockDevice**: a sector reader that also describes its media
//! - **SectorBuffer**: immutable sector bytes passed to decoders
//! - **MediaInfo**: block size, last block, and device flags
//!
//! ## Example
//!
//! ```rust,no_run
//! use sectorscope_core::{BlockDevice, Result};
//!
//! fn first_sector(device: &mut dyn BlockDevice) -> Result<Vec<u8>> {
//!     println!("Device: {} ({})", device.identify(), device.media());
//!     Ok(device.read_block(0)?.into_inner())
//! }
//! ```

pub mod error;
pub mod security;
pub mod traits;
pub mod types;

// Re-export commonly used items
pub use error::{ensure_len, Error, Result};
pub use security::*;
pub use traits::{BlockDevice, SectorReader};
pub use types::{format_size, MediaInfo, SectorBuffer};
