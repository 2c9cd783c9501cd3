//! Core types for sector inspection

use serde::Serialize;
use std::fmt;
use std::ops::Deref;

/// An immutable run of bytes read from one or more sectors
///
/// Decoders borrow the bytes for the duration of a call and never keep them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectorBuffer {
    bytes: Vec<u8>,
}

impl SectorBuffer {
    /// Wrap raw sector bytes
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Borrow the sector contents
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Take back the underlying bytes
    pub fn into_inner(self) -> Vec<u8> {
        self.bytes
    }
}

impl From<Vec<u8>> for SectorBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&[u8]> for SectorBuffer {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes.to_vec())
    }
}

impl Deref for SectorBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes
    }
}

impl AsRef<[u8]> for SectorBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Media description of a block device
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaInfo {
    /// Identifier of the inserted media
    pub media_id: u32,

    /// Media can be removed from the device
    pub removable: bool,

    /// Media is currently present
    pub media_present: bool,

    /// Device exposes a single partition rather than a whole disk
    pub logical_partition: bool,

    /// Device rejects writes
    pub read_only: bool,

    /// Logical block size in bytes
    pub block_size: u32,

    /// Index of the last addressable block
    pub last_block: u64,

    /// First logical block aligned to a physical block boundary
    pub lowest_aligned_lba: u64,

    /// Logical blocks packed into one physical block
    pub logical_blocks_per_physical_block: u32,

    /// Preferred transfer granularity in logical blocks, 0 when not reported
    pub optimal_transfer_length_granularity: u32,
}

impl MediaInfo {
    /// Media for a read-only whole-disk image of `block_count` blocks
    ///
    /// `block_count` must be at least one.
    pub fn fixed(block_size: u32, block_count: u64) -> Self {
        Self {
            media_id: 0,
            removable: false,
            media_present: true,
            logical_partition: false,
            read_only: true,
            block_size,
            last_block: block_count.saturating_sub(1),
            lowest_aligned_lba: 0,
            logical_blocks_per_physical_block: 1,
            optimal_transfer_length_granularity: 0,
        }
    }

    /// Mark the media as a logical partition
    pub fn as_logical_partition(mut self) -> Self {
        self.logical_partition = true;
        self
    }

    /// Number of addressable blocks
    pub fn block_count(&self) -> u64 {
        self.last_block.saturating_add(1)
    }

    /// Total device size in bytes, `None` on overflow
    pub fn total_size(&self) -> Option<u64> {
        self.block_count().checked_mul(self.block_size as u64)
    }
}

impl fmt::Display for MediaInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} blocks x {} bytes",
            self.block_count(),
            self.block_size
        )?;
        if let Some(total) = self.total_size() {
            write!(f, " ({})", format_size(total))?;
        }
        if self.logical_partition {
            write!(f, " [partition]")?;
        }
        Ok(())
    }
}

/// Format size in human-readable format
pub fn format_size(size: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = size as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", size as u64, UNITS[unit_idx])
    } else {
        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}
