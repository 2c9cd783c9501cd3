//! Image device - a disk image file presented as a block device
//!
//! Raw sector images (.img, .dsk, .bin, dd output) have no container metadata,
//! so the block size comes from configuration rather than the file.

use crate::{MmapSource, StreamSource};
use sectorscope_core::{
    validate_sector_size, BlockDevice, Error, MediaInfo, Result, SectorBuffer, SectorReader,
};
use std::fs::File;
use std::io::Cursor;
use std::path::Path;

/// Configuration for opening an image device
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Use memory mapping (high performance)
    pub use_mmap: bool,

    /// Logical block size of the imaged disk
    pub sector_size: u32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            use_mmap: true,
            sector_size: 512,
        }
    }
}

/// A whole-disk image file exposed as a read-only block device
///
/// # Example
///
/// ```rust,no_run
/// use sectorscope_pipeline::{ImageDevice, SourceConfig};
/// use sectorscope_core::BlockDevice;
/// use std::path::Path;
///
/// let device = ImageDevice::open(Path::new("disk.img"), SourceConfig::default()).unwrap();
/// println!("Device: {}", device.identify());
/// println!("Media:  {}", device.media());
/// ```
pub struct ImageDevice {
    source: Box<dyn SectorReader>,
    media: MediaInfo,
}

impl ImageDevice {
    /// Open an image file as a block device
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The sector size is invalid
    /// - The path is not a regular file or cannot be opened
    /// - The image is smaller than one sector
    pub fn open(path: &Path, config: SourceConfig) -> Result<Self> {
        validate_sector_size(config.sector_size)?;

        let file = File::open(path)?;
        let metadata = file.metadata()?;
        if !metadata.is_file() {
            return Err(Error::invalid_image(format!(
                "{} is not a regular file",
                path.display()
            )));
        }

        let length = metadata.len();
        let media = Self::media_for(length, config.sector_size)?;

        let source: Box<dyn SectorReader> = if config.use_mmap {
            Box::new(MmapSource::from_file(&file, config.sector_size)?)
        } else {
            Box::new(StreamSource::new(file, config.sector_size)?)
        };

        tracing::debug!(
            path = %path.display(),
            length,
            sector_size = config.sector_size,
            mmap = config.use_mmap,
            "Opened image device"
        );

        Ok(Self { source, media })
    }

    /// Create an in-memory image device from raw disk bytes
    ///
    /// # Example
    ///
    /// ```rust
    /// use sectorscope_pipeline::ImageDevice;
    /// use sectorscope_core::BlockDevice;
    ///
    /// // A blank 1.44MB floppy
    /// let device = ImageDevice::from_bytes(vec![0u8; 1_474_560], 512).unwrap();
    /// assert_eq!(device.media().last_block, 2879);
    /// ```
    pub fn from_bytes(bytes: Vec<u8>, sector_size: u32) -> Result<Self> {
        validate_sector_size(sector_size)?;
        let media = Self::media_for(bytes.len() as u64, sector_size)?;
        let source = StreamSource::new(Cursor::new(bytes), sector_size)?;

        Ok(Self {
            source: Box::new(source),
            media,
        })
    }

    fn media_for(length: u64, sector_size: u32) -> Result<MediaInfo> {
        let block_count = length / sector_size as u64;
        if block_count == 0 {
            return Err(Error::invalid_image(format!(
                "image of {} bytes is smaller than one {}-byte sector",
                length, sector_size
            )));
        }
        Ok(MediaInfo::fixed(sector_size, block_count))
    }
}

impl SectorReader for ImageDevice {
    fn read_sector(&mut self, lba: u64, byte_count: usize) -> Result<SectorBuffer> {
        self.source.read_sector(lba, byte_count)
    }
}

impl BlockDevice for ImageDevice {
    fn identify(&self) -> &str {
        "Raw disk image"
    }

    fn media(&self) -> &MediaInfo {
        &self.media
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn image_file(bytes: &[u8]) -> NamedTempFile {
        let mut tmpfile = NamedTempFile::new().unwrap();
        tmpfile.write_all(bytes).unwrap();
        tmpfile.flush().unwrap();
        tmpfile
    }

    #[test]
    fn test_source_config_default() {
        let config = SourceConfig::default();
        assert!(config.use_mmap);
        assert_eq!(config.sector_size, 512);
    }

    #[test]
    fn test_image_device_open_with_mmap() {
        let data: Vec<u8> = (0u8..=255).cycle().take(4096).collect();
        let tmpfile = image_file(&data);

        let mut device = ImageDevice::open(tmpfile.path(), SourceConfig::default()).unwrap();

        assert_eq!(device.identify(), "Raw disk image");
        assert_eq!(device.media().block_size, 512);
        assert_eq!(device.media().last_block, 7);
        assert!(!device.media().logical_partition);

        let block = device.read_block(1).unwrap();
        assert_eq!(&block[..4], &data[512..516]);
    }

    #[test]
    fn test_image_device_open_without_mmap() {
        let data: Vec<u8> = (0u8..=255).cycle().take(8192).collect();
        let tmpfile = image_file(&data);

        let config = SourceConfig {
            use_mmap: false,
            sector_size: 4096,
        };
        let mut device = ImageDevice::open(tmpfile.path(), config).unwrap();

        assert_eq!(device.media().last_block, 1);
        let block = device.read_block(1).unwrap();
        assert_eq!(block.len(), 4096);
        assert_eq!(block[0], data[4096]);
    }

    #[test]
    fn test_image_device_ignores_trailing_partial_sector() {
        let tmpfile = image_file(&[0u8; 1300]);
        let device = ImageDevice::open(tmpfile.path(), SourceConfig::default()).unwrap();
        assert_eq!(device.media().last_block, 1);
    }

    #[test]
    fn test_image_device_rejects_tiny_image() {
        let tmpfile = image_file(&[0u8; 100]);
        let result = ImageDevice::open(tmpfile.path(), SourceConfig::default());
        assert!(matches!(result, Err(Error::InvalidImage(_))));

        let empty = image_file(&[]);
        assert!(ImageDevice::open(empty.path(), SourceConfig::default()).is_err());
    }

    #[test]
    fn test_image_device_rejects_bad_sector_size() {
        let tmpfile = image_file(&[0u8; 4096]);
        let config = SourceConfig {
            use_mmap: false,
            sector_size: 768,
        };
        let result = ImageDevice::open(tmpfile.path(), config);
        assert!(matches!(result, Err(Error::InvalidSectorSize(_))));
    }

    #[test]
    fn test_image_device_missing_file() {
        let result = ImageDevice::open(Path::new("/nonexistent/disk.img"), SourceConfig::default());
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_image_device_from_bytes() {
        let mut device = ImageDevice::from_bytes(vec![7u8; 2048], 512).unwrap();
        assert_eq!(device.media().block_count(), 4);
        assert!(device.read_block(3).unwrap().iter().all(|&b| b == 7));
        assert!(device.read_block(4).is_err());
    }
}
