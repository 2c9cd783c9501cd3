//! MBR (Master Boot Record) decoding
//!
//! # Structure
//!
//! ```text
//! Offset  Size  Field
//! ------  ----  -----
//! 0x000   440   Bootstrap code
//! 0x1B8   4     Disk signature
//! 0x1BE   16    Partition entry 1
//! 0x1CE   16    Partition entry 2
//! 0x1DE   16    Partition entry 3
//! 0x1EE   16    Partition entry 4
//! 0x1FE   2     Boot signature (0xAA55)
//! ```
//!
//! All offsets are absolute byte positions; sectors larger than 512 bytes
//! carry the same layout in their first 512 bytes.

pub mod types;

use sectorscope_core::{ensure_len, Result};
pub use types::{CHSAddress, MbrPartitionEntry, MbrPartitionType};

/// The boot signature that must be present at offset 0x1FE
pub const BOOT_SIGNATURE: u16 = 0xAA55;

/// Size of the MBR region in bytes
pub const MBR_SIZE: usize = 512;

/// Offset of the boot signature
pub const BOOT_SIGNATURE_OFFSET: usize = 0x1FE;

/// Offset of the disk signature
pub const DISK_SIGNATURE_OFFSET: usize = 0x1B8;

/// Offset of the first partition entry
pub const PARTITION_TABLE_OFFSET: usize = 0x1BE;

/// Number of partition entries in MBR
pub const NUM_PARTITIONS: usize = 4;

/// Check for the 0xAA55 boot-sector trailer at offset 510
///
/// Both plain MBR disks and GPT disks (via the protective MBR) carry it, so a
/// match alone does not tell the two apart.
///
/// # Errors
///
/// Returns `TruncatedSector` if the sector is shorter than 512 bytes
pub fn has_boot_signature(sector: &[u8]) -> Result<bool> {
    ensure_len(sector, MBR_SIZE, "boot signature")?;

    let signature = u16::from_le_bytes([
        sector[BOOT_SIGNATURE_OFFSET],
        sector[BOOT_SIGNATURE_OFFSET + 1],
    ]);

    Ok(signature == BOOT_SIGNATURE)
}

/// Decode the four-slot MBR partition table
///
/// Empty slots (type 0x00) are left out; the remaining entries keep their
/// physical slot order. The boot signature is not re-checked here.
///
/// # Errors
///
/// Returns `TruncatedSector` if the sector is shorter than 512 bytes
pub fn decode_mbr(sector: &[u8]) -> Result<Vec<MbrPartitionEntry>> {
    ensure_len(sector, MBR_SIZE, "MBR partition table")?;

    let mut entries = Vec::with_capacity(NUM_PARTITIONS);

    for slot in 0..NUM_PARTITIONS {
        let offset = PARTITION_TABLE_OFFSET + slot * MbrPartitionEntry::ENTRY_SIZE;
        let mut raw = [0u8; MbrPartitionEntry::ENTRY_SIZE];
        raw.copy_from_slice(&sector[offset..offset + MbrPartitionEntry::ENTRY_SIZE]);

        let entry = MbrPartitionEntry::from_slot(slot, &raw);
        if entry.kind() == MbrPartitionType::Empty {
            continue;
        }

        entries.push(entry);
    }

    tracing::trace!(populated = entries.len(), "Decoded MBR partition table");

    Ok(entries)
}

/// Read the 32-bit disk signature at offset 440
///
/// # Errors
///
/// Returns `TruncatedSector` if the sector is shorter than 512 bytes
pub fn disk_signature(sector: &[u8]) -> Result<u32> {
    ensure_len(sector, MBR_SIZE, "disk signature")?;

    Ok(u32::from_le_bytes([
        sector[DISK_SIGNATURE_OFFSET],
        sector[DISK_SIGNATURE_OFFSET + 1],
        sector[DISK_SIGNATURE_OFFSET + 2],
        sector[DISK_SIGNATURE_OFFSET + 3],
    ]))
}
