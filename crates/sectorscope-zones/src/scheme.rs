//! Partition scheme classification
//!
//! `classify` is the entry point for raw sectors; `analyze` drives it from a
//! block device.

use crate::gpt::{self, GptHeaderSummary};
use crate::mbr::{self, MbrPartitionEntry};
use sectorscope_core::{ensure_len, BlockDevice, Result, SectorBuffer};
use serde::Serialize;

/// The partitioning scheme found on a disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "scheme", content = "table", rename_all = "snake_case")]
pub enum PartitionScheme {
    /// LBA 0 does not end in the 0xAA55 trailer
    NoBootSignature,

    /// Legacy MBR; populated slots in physical order
    Mbr(Vec<MbrPartitionEntry>),

    /// GPT behind a protective MBR
    Gpt(GptHeaderSummary),
}

impl PartitionScheme {
    /// Get a human-readable identifier for this scheme
    pub fn identify(&self) -> &str {
        match self {
            Self::NoBootSignature => "No partition table",
            Self::Mbr(_) => "Master Boot Record",
            Self::Gpt(_) => "GUID Partition Table",
        }
    }

    /// MBR entries, empty for every other scheme
    pub fn mbr_entries(&self) -> &[MbrPartitionEntry] {
        match self {
            Self::Mbr(entries) => entries,
            _ => &[],
        }
    }
}

/// Classify a disk from its first sector, reading LBA 1 only when needed
///
/// `lba1_provider` is called at most once, and only when LBA 0 carries the
/// boot signature. If it fails, GPT cannot be confirmed and the disk is
/// reported as MBR; that error is never returned.
///
/// # Errors
///
/// Returns `TruncatedSector` if `lba0` is shorter than 512 bytes, or if a
/// GPT-signed LBA 1 is shorter than 96 bytes
///
/// # Example
///
/// ```rust
/// use sectorscope_zones::{classify, PartitionScheme};
///
/// let blank = vec![0u8; 512];
/// let scheme = classify(&blank, || unreachable!("no signature, no LBA 1 read")).unwrap();
/// assert_eq!(scheme, PartitionScheme::NoBootSignature);
/// ```
pub fn classify<F>(lba0: &[u8], lba1_provider: F) -> Result<PartitionScheme>
where
    F: FnOnce() -> Result<SectorBuffer>,
{
    ensure_len(lba0, mbr::MBR_SIZE, "LBA 0")?;

    if !mbr::has_boot_signature(lba0)? {
        tracing::debug!("No boot signature at LBA 0");
        return Ok(PartitionScheme::NoBootSignature);
    }

    match lba1_provider() {
        Ok(lba1) if gpt::is_gpt_header(&lba1) => {
            tracing::debug!("GPT header found at LBA 1");
            Ok(PartitionScheme::Gpt(gpt::decode_gpt(&lba1)?))
        }
        Ok(_) => Ok(PartitionScheme::Mbr(mbr::decode_mbr(lba0)?)),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read LBA 1, falling back to MBR");
            Ok(PartitionScheme::Mbr(mbr::decode_mbr(lba0)?))
        }
    }
}

/// Outcome of analyzing one block device
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeviceAnalysis {
    /// Device is a single partition; no table check was made
    LogicalPartition,

    /// Device is a whole disk
    Table {
        /// Classification of LBA 0 and LBA 1
        scheme: PartitionScheme,

        /// MBR disk signature, only read when the scheme is MBR
        disk_signature: Option<u32>,
    },
}

impl DeviceAnalysis {
    /// The classified scheme, if the device was examined
    pub fn scheme(&self) -> Option<&PartitionScheme> {
        match self {
            Self::LogicalPartition => None,
            Self::Table { scheme, .. } => Some(scheme),
        }
    }
}

/// Read LBA 0 (and LBA 1 when needed) from a device and classify it
///
/// Logical partition devices are skipped without any read.
///
/// # Errors
///
/// Returns an error if LBA 0 cannot be read or is shorter than 512 bytes
pub fn analyze<D: BlockDevice + ?Sized>(device: &mut D) -> Result<DeviceAnalysis> {
    if device.media().logical_partition {
        tracing::debug!(device = device.identify(), "Skipping logical partition");
        return Ok(DeviceAnalysis::LogicalPartition);
    }

    let lba0 = device.read_block(0)?;
    let scheme = classify(&lba0, || device.read_block(1))?;

    let disk_signature = match scheme {
        PartitionScheme::Mbr(_) => Some(mbr::disk_signature(&lba0)?),
        _ => None,
    };

    tracing::debug!(scheme = scheme.identify(), ?disk_signature, "Classified device");

    Ok(DeviceAnalysis::Table {
        scheme,
        disk_signature,
    })
}
