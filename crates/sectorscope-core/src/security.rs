//! Size limits and validation helpers
//!
//! Sector sources consult these before allocating or addressing anything
//! derived from caller input or image metadata.

use crate::Error;

/// Smallest sector size we'll accept (the classic PC sector)
pub const MIN_SECTOR_SIZE: u32 = 512;

/// Maximum sector size we'll accept (4KB - common for advanced format)
pub const MAX_SECTOR_SIZE: u32 = 4096;

/// Maximum allocation size for single buffer (256 MB)
pub const MAX_ALLOCATION_SIZE: usize = 256 * 1024 * 1024;

/// Maximum file size for memory mapping (16 GB - practical limit for most systems)
pub const MAX_MMAP_SIZE: u64 = 16 * 1024 * 1024 * 1024;

/// Validate that a size is within allocation limits
///
/// # Security
/// Prevents memory exhaustion from absurd read requests
pub fn validate_allocation_size(size: u64, limit: usize, context: &str) -> crate::Result<usize> {
    if size > limit as u64 {
        return Err(Error::AllocationLimit(format!(
            "{} size {} exceeds limit {}",
            context, size, limit
        )));
    }

    u64_to_usize(size, context)
}

/// Safely multiply two u64 values with overflow checking
pub fn checked_multiply_u64(a: u64, b: u64, context: &str) -> crate::Result<u64> {
    a.checked_mul(b)
        .ok_or_else(|| Error::out_of_range(format!("{}: multiplication overflow", context)))
}

/// Safely convert u64 to usize with platform checking
pub fn u64_to_usize(value: u64, context: &str) -> crate::Result<usize> {
    value.try_into().map_err(|_| {
        Error::out_of_range(format!(
            "{}: value {} exceeds platform usize limit",
            context, value
        ))
    })
}

/// Byte offset of the first byte of sector `lba`
pub fn lba_to_offset(lba: u64, sector_size: u32) -> crate::Result<u64> {
    checked_multiply_u64(lba, sector_size as u64, "LBA offset")
}

/// Validate sector size is reasonable
pub fn validate_sector_size(sector_size: u32) -> crate::Result<()> {
    if !(MIN_SECTOR_SIZE..=MAX_SECTOR_SIZE).contains(&sector_size) {
        return Err(Error::invalid_sector_size(format!(
            "{} (must be {}-{})",
            sector_size, MIN_SECTOR_SIZE, MAX_SECTOR_SIZE
        )));
    }

    if !sector_size.is_power_of_two() {
        return Err(Error::invalid_sector_size(format!(
            "{} is not a power of 2",
            sector_size
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_allocation_size() {
        assert_eq!(validate_allocation_size(1024, MAX_ALLOCATION_SIZE, "test").unwrap(), 1024);

        let err = validate_allocation_size(
            MAX_ALLOCATION_SIZE as u64 + 1,
            MAX_ALLOCATION_SIZE,
            "test",
        )
        .unwrap_err();
        assert!(matches!(err, Error::AllocationLimit(_)));
    }

    #[test]
    fn test_checked_multiply_u64() {
        assert_eq!(checked_multiply_u64(1000, 512, "test").unwrap(), 512_000);
        assert!(checked_multiply_u64(u64::MAX, 2, "test").is_err());
    }

    #[test]
    fn test_lba_to_offset() {
        assert_eq!(lba_to_offset(1, 512).unwrap(), 512);
        assert_eq!(lba_to_offset(34, 4096).unwrap(), 34 * 4096);
        assert!(lba_to_offset(u64::MAX, 512).is_err());
    }

    #[test]
    fn test_validate_sector_size() {
        assert!(validate_sector_size(512).is_ok());
        assert!(validate_sector_size(1024).is_ok());
        assert!(validate_sector_size(4096).is_ok());

        assert!(validate_sector_size(0).is_err());
        assert!(validate_sector_size(256).is_err());
        assert!(validate_sector_size(8192).is_err());
        assert!(matches!(
            validate_sector_size(1000),
            Err(Error::InvalidSectorSize(_))
        ));
    }
}
