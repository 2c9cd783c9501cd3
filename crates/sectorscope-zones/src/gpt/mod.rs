//! GPT (GUID Partition Table) header decoding
//!
//! # Structure
//!
//! ```text
//! LBA 0:    Protective MBR (for backward compatibility)
//! LBA 1:    Primary GPT header
//! LBA 2-33: Partition entries array (typically 128 entries)
//! LBA 34+:  Usable disk space
//! ```
//!
//! Only the header fields describing the usable area are decoded. Header and
//! entry-array checksums and the backup header are not examined.

pub mod types;

use sectorscope_core::{ensure_len, Result};
pub use types::GptHeaderSummary;

/// GPT header signature
pub const SIGNATURE: &[u8; 8] = b"EFI PART";

/// Minimum header bytes needed to reach every decoded field
pub const MIN_HEADER_SIZE: usize = 96;

/// Offset of the first usable LBA
pub const FIRST_USABLE_LBA_OFFSET: usize = 40;

/// Offset of the last usable LBA
pub const LAST_USABLE_LBA_OFFSET: usize = 48;

/// Offset of the partition entry count
pub const PARTITION_ENTRY_COUNT_OFFSET: usize = 80;

/// Check whether a sector starts with the "EFI PART" signature
///
/// Exact, case-sensitive comparison of the first 8 bytes. Sectors shorter
/// than 8 bytes are not GPT headers. No boot-signature check is implied.
pub fn is_gpt_header(sector: &[u8]) -> bool {
    sector.get(..SIGNATURE.len()) == Some(&SIGNATURE[..])
}

/// Decode the usable-area fields of an LBA-1 GPT header
///
/// The signature is not re-checked here.
///
/// # Errors
///
/// Returns `TruncatedSector` if the sector is shorter than 96 bytes
pub fn decode_gpt(sector: &[u8]) -> Result<GptHeaderSummary> {
    ensure_len(sector, MIN_HEADER_SIZE, "GPT header")?;

    Ok(GptHeaderSummary {
        first_usable_lba: read_u64(sector, FIRST_USABLE_LBA_OFFSET),
        last_usable_lba: read_u64(sector, LAST_USABLE_LBA_OFFSET),
        partition_entry_count: read_u32(sector, PARTITION_ENTRY_COUNT_OFFSET),
    })
}

fn read_u64(bytes: &[u8], offset: usize) -> u64 {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&bytes[offset..offset + 8]);
    u64::from_le_bytes(raw)
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_le_bytes(raw)
}
