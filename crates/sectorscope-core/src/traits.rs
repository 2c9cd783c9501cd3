//! Core traits for sector inspection

use crate::{error::Result, types::{MediaInfo, SectorBuffer}};

/// Trait for anything that can hand out sectors by logical block address
pub trait SectorReader: Send {
    /// Read `byte_count` bytes starting at the first byte of sector `lba`
    fn read_sector(&mut self, lba: u64, byte_count: usize) -> Result<SectorBuffer>;
}

/// Trait for block devices (whole disks or single partitions)
pub trait BlockDevice: SectorReader {
    /// Get a human-readable identifier for this device
    fn identify(&self) -> &str;

    /// Get the media description
    fn media(&self) -> &MediaInfo;

    /// Read one full block at `lba`
    fn read_block(&mut self, lba: u64) -> Result<SectorBuffer> {
        let block_size = self.media().block_size as usize;
        self.read_sector(lba, block_size)
    }
}

impl<T: SectorReader + ?Sized> SectorReader for &mut T {
    fn read_sector(&mut self, lba: u64, byte_count: usize) -> Result<SectorBuffer> {
        (**self).read_sector(lba, byte_count)
    }
}

impl<T: SectorReader + ?Sized> SectorReader for Box<T> {
    fn read_sector(&mut self, lba: u64, byte_count: usize) -> Result<SectorBuffer> {
        (**self).read_sector(lba, byte_count)
    }
}

impl<T: BlockDevice + ?Sized> BlockDevice for &mut T {
    fn identify(&self) -> &str {
        (**self).identify()
    }

    fn media(&self) -> &MediaInfo {
        (**self).media()
    }
}

impl<T: BlockDevice + ?Sized> BlockDevice for Box<T> {
    fn identify(&self) -> &str {
        (**self).identify()
    }

    fn media(&self) -> &MediaInfo {
        (**self).media()
    }
}
