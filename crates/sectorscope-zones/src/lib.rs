//! # SectorScope Zones
//!
//! Partition scheme detection and decoding for SectorScope.
//!
//! This crate decides whether a disk carries an MBR or a GPT and extracts
//! the structural fields of whichever it finds:
//! - **MBR**: Master Boot Record (BIOS/legacy partitioning)
//! - **GPT**: GUID Partition Table header behind a protective MBR
//!
//! Decoding is pure: functions take sector bytes and return values. Reading
//! the sectors is the job of a `SectorReader`, and printing is left to the
//! caller.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sectorscope_zones::{analyze, PartitionScheme};
//! use sectorscope_pipeline::{ImageDevice, SourceConfig};
//! use std::path::Path;
//!
//! let mut device = ImageDevice::open(Path::new("disk.img"), SourceConfig::default()).unwrap();
//! let analysis = analyze(&mut device).unwrap();
//!
//! match analysis.scheme() {
//!     Some(PartitionScheme::Mbr(entries)) => {
//!         for entry in entries {
//!             println!("  {}", entry);
//!         }
//!     }
//!     Some(PartitionScheme::Gpt(header)) => println!("GPT: {}", header),
//!     Some(PartitionScheme::NoBootSignature) => println!("No partition table"),
//!     None => println!("Logical partition"),
//! }
//! ```

pub mod gpt;
pub mod mbr;
pub mod scheme;

pub use gpt::{decode_gpt, is_gpt_header, GptHeaderSummary};
pub use mbr::{decode_mbr, has_boot_signature, MbrPartitionEntry, MbrPartitionType};
pub use scheme::{analyze, classify, DeviceAnalysis, PartitionScheme};
