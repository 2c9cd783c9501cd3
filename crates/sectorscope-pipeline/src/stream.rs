//! Stream source - sector reads over any seekable stream

use sectorscope_core::{
    lba_to_offset, validate_allocation_size, validate_sector_size, Error, Result, SectorBuffer,
    SectorReader, MAX_ALLOCATION_SIZE,
};
use std::io::{Read, Seek, SeekFrom};

/// A sector source backed by a `Read + Seek` stream.
///
/// Sector `lba` starts at byte `lba * sector_size`. Reads that would run past
/// the end of the stream fail instead of returning a short buffer.
///
/// # Example
///
/// ```rust
/// use sectorscope_pipeline::StreamSource;
/// use sectorscope_core::SectorReader;
/// use std::io::Cursor;
///
/// let mut source = StreamSource::new(Cursor::new(vec![0u8; 1024]), 512).unwrap();
/// let sector = source.read_sector(1, 512).unwrap();
/// assert_eq!(sector.len(), 512);
/// ```
pub struct StreamSource<R> {
    inner: R,
    sector_size: u32,
    length: u64,
}

impl<R: Read + Seek> StreamSource<R> {
    /// Wrap a stream, measuring its length
    ///
    /// # Errors
    ///
    /// Returns an error if the sector size is invalid or the stream cannot seek
    pub fn new(mut inner: R, sector_size: u32) -> Result<Self> {
        validate_sector_size(sector_size)?;
        let length = inner.seek(SeekFrom::End(0))?;

        Ok(Self {
            inner,
            sector_size,
            length,
        })
    }

    /// Length of the stream in bytes
    pub fn length(&self) -> u64 {
        self.length
    }

    /// Sector size used to translate LBAs
    pub fn sector_size(&self) -> u32 {
        self.sector_size
    }

    /// Give back the wrapped stream
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read + Seek + Send> SectorReader for StreamSource<R> {
    fn read_sector(&mut self, lba: u64, byte_count: usize) -> Result<SectorBuffer> {
        let offset = lba_to_offset(lba, self.sector_size)?;
        let size = validate_allocation_size(byte_count as u64, MAX_ALLOCATION_SIZE, "Sector read")?;

        let end = offset.checked_add(size as u64);
        if end.map_or(true, |end| end > self.length) {
            return Err(Error::out_of_range(format!(
                "read of {} bytes at LBA {} exceeds stream length {}",
                byte_count, lba, self.length
            )));
        }

        self.inner.seek(SeekFrom::Start(offset))?;
        let mut buf = vec![0u8; size];
        self.inner.read_exact(&mut buf)?;

        Ok(SectorBuffer::new(buf))
    }
}
