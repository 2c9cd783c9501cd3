//! Memory-mapped sector source for high-performance image access

use memmap2::Mmap;
use sectorscope_core::{
    lba_to_offset, u64_to_usize, validate_allocation_size, validate_sector_size, Error, Result,
    SectorBuffer, SectorReader, MAX_ALLOCATION_SIZE, MAX_MMAP_SIZE,
};
use std::fs::File;
use std::path::Path;

/// A sector source backed by a read-only memory-mapped file.
///
/// Sector reads are bounds-checked slice copies out of the mapping, with no
/// system call per read.
///
/// # Example
///
/// ```rust,no_run
/// use sectorscope_pipeline::MmapSource;
/// use sectorscope_core::SectorReader;
/// use std::path::Path;
///
/// let mut source = MmapSource::open(Path::new("disk.img"), 512).unwrap();
/// let mbr = source.read_sector(0, 512).unwrap();
/// ```
pub struct MmapSource {
    mmap: Mmap,
    sector_size: u32,
}

impl MmapSource {
    /// Open a file with memory mapping
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or mapped, or if the
    /// sector size is invalid
    pub fn open(path: &Path, sector_size: u32) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_file(&file, sector_size)
    }

    /// Create a memory-mapped source from an existing file
    ///
    /// # Security
    ///
    /// Validates file before mapping:
    /// - Ensures file is a regular file (not device, pipe, etc.)
    /// - Checks file size is within `MAX_MMAP_SIZE`
    ///
    /// # Safety
    ///
    /// Uses `unsafe` for memory mapping. The mapping is read-only and the
    /// file must not be truncated while the source is alive (caller
    /// responsibility).
    pub fn from_file(file: &File, sector_size: u32) -> Result<Self> {
        validate_sector_size(sector_size)?;
        let metadata = file.metadata()?;

        if !metadata.is_file() {
            return Err(Error::invalid_image("only regular files can be memory-mapped"));
        }

        if metadata.len() > MAX_MMAP_SIZE {
            return Err(Error::invalid_image(format!(
                "file size {} exceeds memory mapping limit {}",
                metadata.len(),
                MAX_MMAP_SIZE
            )));
        }

        // SAFETY: regular file, bounded size, valid descriptor, read-only map
        let mmap = unsafe { Mmap::map(file)? };

        Ok(Self { mmap, sector_size })
    }

    /// Get the length of the mapped region
    pub fn len(&self) -> u64 {
        self.mmap.len() as u64
    }

    /// Check if the mapped region is empty
    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }

    /// Get a slice of the entire mapped data
    pub fn as_slice(&self) -> &[u8] {
        &self.mmap
    }
}

impl SectorReader for MmapSource {
    fn read_sector(&mut self, lba: u64, byte_count: usize) -> Result<SectorBuffer> {
        let size = validate_allocation_size(byte_count as u64, MAX_ALLOCATION_SIZE, "Sector read")?;
        let start = lba_to_offset(lba, self.sector_size)?;

        let end = match start.checked_add(size as u64) {
            Some(end) if end <= self.len() => end,
            _ => {
                return Err(Error::out_of_range(format!(
                    "read of {} bytes at LBA {} exceeds mapped length {}",
                    byte_count,
                    lba,
                    self.len()
                )))
            }
        };

        let start = u64_to_usize(start, "Mapped offset")?;
        let end = u64_to_usize(end, "Mapped offset")?;

        Ok(SectorBuffer::from(&self.mmap[start..end]))
    }
}
