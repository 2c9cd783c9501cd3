//! # SectorScope Pipeline
//!
//! Sector sources for SectorScope.
//!
//! This crate provides the `SectorReader` implementations the decoder reads
//! through:
//! - **StreamSource**: any `Read + Seek` stream
//! - **MmapSource**: memory-mapped file access
//! - **PartialSource**: one partition of a disk, as a logical partition device
//! - **ImageDevice**: a disk image file opened as a whole-disk block device
//!
//! ## Example
//!
//! ```rust,no_run
//! use sectorscope_pipeline::{ImageDevice, PartialSource, SourceConfig};
//! use sectorscope_core::BlockDevice;
//! use std::path::Path;
//!
//! let mut disk = ImageDevice::open(Path::new("disk.img"), SourceConfig::default()).unwrap();
//! let boot_sector = disk.read_block(0).unwrap();
//!
//! // Present sectors 2048..4096 as their own device
//! let mut partition = PartialSource::new(&mut disk, 2048, 2048, 512).unwrap();
//! let first = partition.read_block(0).unwrap();
//! ```

pub mod image;
pub mod mmap;
pub mod partial;
pub mod stream;

pub use image::{ImageDevice, SourceConfig};
pub use mmap::MmapSource;
pub use partial::PartialSource;
pub use stream::StreamSource;
