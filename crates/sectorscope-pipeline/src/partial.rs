//! Partial source - exposes one partition of a disk as its own device

use sectorscope_core::{
    validate_sector_size, BlockDevice, Error, MediaInfo, Result, SectorBuffer, SectorReader,
};

/// A sector source that exposes only a window of an underlying reader.
///
/// LBAs are relative to the window: LBA 0 is `start_lba` on the parent.
/// The media always reports a logical partition, since a partition carries
/// no partition table of its own.
///
/// # Example
///
/// ```rust
/// use sectorscope_pipeline::{PartialSource, StreamSource};
/// use sectorscope_core::BlockDevice;
/// use std::io::Cursor;
///
/// let disk = StreamSource::new(Cursor::new(vec![0u8; 8 * 512]), 512).unwrap();
///
/// // Sectors 2..6 of the disk
/// let partition = PartialSource::new(disk, 2, 4, 512).unwrap();
/// assert!(partition.media().logical_partition);
/// ```
pub struct PartialSource<S> {
    inner: S,
    start_lba: u64,
    media: MediaInfo,
}

impl<S: SectorReader> PartialSource<S> {
    /// Create a new window of `length` sectors starting at `start_lba`
    ///
    /// # Errors
    ///
    /// Returns an error if the block size is invalid, or if the window is
    /// empty or its end overflows
    pub fn new(inner: S, start_lba: u64, length: u64, block_size: u32) -> Result<Self> {
        validate_sector_size(block_size)?;
        if length == 0 {
            return Err(Error::out_of_range("partition window has zero length"));
        }
        if start_lba.checked_add(length).is_none() {
            return Err(Error::out_of_range(format!(
                "partition window {}+{} overflows",
                start_lba, length
            )));
        }

        Ok(Self {
            inner,
            start_lba,
            media: MediaInfo::fixed(block_size, length).as_logical_partition(),
        })
    }

    /// First parent LBA covered by this window
    pub fn start_lba(&self) -> u64 {
        self.start_lba
    }

    /// Number of sectors in this window
    pub fn length(&self) -> u64 {
        self.media.block_count()
    }
}

impl<S: SectorReader> SectorReader for PartialSource<S> {
    fn read_sector(&mut self, lba: u64, byte_count: usize) -> Result<SectorBuffer> {
        let block_size = self.media.block_size as u64;
        let spanned = (byte_count as u64).div_ceil(block_size).max(1);

        let in_window = lba
            .checked_add(spanned)
            .map_or(false, |end| end <= self.length());
        if !in_window {
            return Err(Error::out_of_range(format!(
                "read of {} bytes at LBA {} exceeds partition of {} sectors",
                byte_count,
                lba,
                self.length()
            )));
        }

        self.inner.read_sector(self.start_lba + lba, byte_count)
    }
}

impl<S: SectorReader> BlockDevice for PartialSource<S> {
    fn identify(&self) -> &str {
        "Logical partition"
    }

    fn media(&self) -> &MediaInfo {
        &self.media
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StreamSource;
    use std::io::Cursor;

    fn numbered_disk(sectors: usize) -> StreamSource<Cursor<Vec<u8>>> {
        let mut disk = vec![0u8; sectors * 512];
        for (i, sector) in disk.chunks_mut(512).enumerate() {
            sector.fill(i as u8);
        }
        StreamSource::new(Cursor::new(disk), 512).unwrap()
    }

    #[test]
    fn test_partial_source_creation() {
        let partial = PartialSource::new(numbered_disk(8), 2, 4, 512).unwrap();

        assert_eq!(partial.start_lba(), 2);
        assert_eq!(partial.length(), 4);
        assert_eq!(partial.identify(), "Logical partition");
        assert!(partial.media().logical_partition);
        assert_eq!(partial.media().last_block, 3);
    }

    #[test]
    fn test_partial_source_relative_lba() {
        let mut partial = PartialSource::new(numbered_disk(8), 2, 4, 512).unwrap();

        let first = partial.read_block(0).unwrap();
        assert!(first.iter().all(|&b| b == 2));

        let last = partial.read_block(3).unwrap();
        assert!(last.iter().all(|&b| b == 5));
    }

    #[test]
    fn test_partial_source_bounds() {
        let mut partial = PartialSource::new(numbered_disk(8), 2, 4, 512).unwrap();

        assert!(matches!(partial.read_block(4), Err(Error::OutOfRange(_))));
        assert!(matches!(partial.read_sector(3, 1024), Err(Error::OutOfRange(_))));
        assert!(partial.read_sector(u64::MAX, 1).is_err());
    }

    #[test]
    fn test_partial_source_rejects_empty_window() {
        assert!(PartialSource::new(numbered_disk(8), 2, 0, 512).is_err());
        assert!(PartialSource::new(numbered_disk(8), u64::MAX, 2, 512).is_err());
    }

    #[test]
    fn test_partial_source_rejects_bad_block_size() {
        let result = PartialSource::new(numbered_disk(8), 0, 4, 0);
        assert!(matches!(result, Err(Error::InvalidSectorSize(_))));

        assert!(PartialSource::new(numbered_disk(8), 0, 4, 600).is_err());
    }

    #[test]
    fn test_partial_source_over_borrowed_disk() {
        let mut disk = numbered_disk(8);
        {
            let mut partial = PartialSource::new(&mut disk, 6, 2, 512).unwrap();
            assert!(partial.read_block(1).unwrap().iter().all(|&b| b == 7));
        }
        assert!(disk.read_sector(0, 512).unwrap().iter().all(|&b| b == 0));
    }
}
