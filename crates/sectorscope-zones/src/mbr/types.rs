//! MBR partition entries, type codes and CHS addressing

use serde::Serialize;
use std::fmt;

/// MBR partition type codes
///
/// Named codes for the types commonly found on PC disks. Anything else is
/// carried through as `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MbrPartitionType {
    /// Empty/unused partition entry
    Empty,
    /// FAT12, CHS
    Fat12,
    /// FAT16 < 32MB, CHS
    Fat16Small,
    /// Extended partition, CHS
    Extended,
    /// FAT16 >= 32MB, CHS
    Fat16,
    /// NTFS/exFAT/HPFS
    Ntfs,
    /// FAT32, CHS
    Fat32Chs,
    /// FAT32, LBA
    Fat32Lba,
    /// FAT16, LBA
    Fat16Lba,
    /// Extended partition, LBA
    ExtendedLba,
    /// Linux swap
    LinuxSwap,
    /// Linux native (ext2/ext3/ext4)
    LinuxNative,
    /// Linux extended
    LinuxExtended,
    /// Linux LVM
    LinuxLvm,
    /// GPT protective MBR
    GptProtective,
    /// EFI system partition
    EfiSystem,
    /// Unknown partition type
    Unknown(u8),
}

impl MbrPartitionType {
    /// Create a partition type from a byte value
    pub fn from_byte(b: u8) -> Self {
        match b {
            0x00 => Self::Empty,
            0x01 => Self::Fat12,
            0x04 => Self::Fat16Small,
            0x05 => Self::Extended,
            0x06 => Self::Fat16,
            0x07 => Self::Ntfs,
            0x0B => Self::Fat32Chs,
            0x0C => Self::Fat32Lba,
            0x0E => Self::Fat16Lba,
            0x0F => Self::ExtendedLba,
            0x82 => Self::LinuxSwap,
            0x83 => Self::LinuxNative,
            0x85 => Self::LinuxExtended,
            0x8E => Self::LinuxLvm,
            0xEE => Self::GptProtective,
            0xEF => Self::EfiSystem,
            _ => Self::Unknown(b),
        }
    }

    /// Get a human-readable name for this partition type
    pub fn name(&self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            Self::Fat12 => "FAT12",
            Self::Fat16Small => "FAT16 (<32MB)",
            Self::Extended => "Extended",
            Self::Fat16 => "FAT16",
            Self::Ntfs => "NTFS/exFAT",
            Self::Fat32Chs => "FAT32 (CHS)",
            Self::Fat32Lba => "FAT32 (LBA)",
            Self::Fat16Lba => "FAT16 (LBA)",
            Self::ExtendedLba => "Extended (LBA)",
            Self::LinuxSwap => "Linux swap",
            Self::LinuxNative => "Linux",
            Self::LinuxExtended => "Linux extended",
            Self::LinuxLvm => "Linux LVM",
            Self::GptProtective => "GPT Protective",
            Self::EfiSystem => "EFI System",
            Self::Unknown(_) => "Unknown",
        }
    }

    /// Extended partitions chain further tables instead of holding data
    pub fn is_extended(&self) -> bool {
        matches!(self, Self::Extended | Self::ExtendedLba | Self::LinuxExtended)
    }
}

impl fmt::Display for MbrPartitionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// CHS (Cylinder-Head-Sector) address
///
/// Maximum values: 1023 cylinders, 255 heads, 63 sectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CHSAddress {
    pub cylinder: u16,
    pub head: u8,
    pub sector: u8,
}

impl CHSAddress {
    /// Parse CHS address from the 3 packed bytes of a partition slot
    ///
    /// - Byte 0: Head
    /// - Byte 1: Sector (bits 0-5) + Cylinder high (bits 6-7)
    /// - Byte 2: Cylinder low
    pub fn from_bytes(bytes: [u8; 3]) -> Self {
        let sector = bytes[1] & 0x3F;
        let cyl_high = ((bytes[1] & 0xC0) as u16) << 2;

        Self {
            cylinder: cyl_high | bytes[2] as u16,
            head: bytes[0],
            sector,
        }
    }
}

impl fmt::Display for CHSAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C:{}/H:{}/S:{}", self.cylinder, self.head, self.sector)
    }
}

/// One populated slot of an MBR partition table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MbrPartitionEntry {
    /// Physical slot (0-3) this entry was read from
    pub slot: usize,

    /// Raw status byte (0x80 = active)
    pub status_or_head: u8,

    /// Status byte marks the partition active
    pub bootable: bool,

    /// Raw partition type code
    pub partition_type: u8,

    /// CHS address of the first sector
    pub chs_start: CHSAddress,

    /// CHS address of the last sector
    pub chs_end: CHSAddress,

    /// First sector of the partition
    pub start_lba: u32,

    /// Length of the partition in sectors
    pub size_sectors: u32,
}

impl MbrPartitionEntry {
    /// Status byte value of an active partition
    pub const ACTIVE: u8 = 0x80;

    /// Size of a partition slot in bytes
    pub const ENTRY_SIZE: usize = 16;

    /// Decode one 16-byte slot
    pub fn from_slot(slot: usize, entry: &[u8; Self::ENTRY_SIZE]) -> Self {
        let status_or_head = entry[0];

        Self {
            slot,
            status_or_head,
            bootable: status_or_head == Self::ACTIVE,
            partition_type: entry[4],
            chs_start: CHSAddress::from_bytes([entry[1], entry[2], entry[3]]),
            chs_end: CHSAddress::from_bytes([entry[5], entry[6], entry[7]]),
            start_lba: u32::from_le_bytes([entry[8], entry[9], entry[10], entry[11]]),
            size_sectors: u32::from_le_bytes([entry[12], entry[13], entry[14], entry[15]]),
        }
    }

    /// Named partition type
    pub fn kind(&self) -> MbrPartitionType {
        MbrPartitionType::from_byte(self.partition_type)
    }

    /// One past the last sector of the partition
    pub fn end_lba(&self) -> u64 {
        self.start_lba as u64 + self.size_sectors as u64
    }
}

impl fmt::Display for MbrPartitionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Partition {}: Type=0x{:02x}, Start={}, Size={} sectors",
            self.slot + 1,
            self.partition_type,
            self.start_lba,
            self.size_sectors
        )
    }
}
