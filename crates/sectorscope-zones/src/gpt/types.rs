//! GPT header summary

use serde::Serialize;
use std::fmt;

/// The fields of a GPT header that describe the usable disk area
///
/// Decoding is descriptive: an inverted range is reported as read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GptHeaderSummary {
    /// First LBA usable by partitions
    pub first_usable_lba: u64,

    /// Last LBA usable by partitions (inclusive)
    pub last_usable_lba: u64,

    /// Number of slots in the partition entry array
    pub partition_entry_count: u32,
}

impl GptHeaderSummary {
    /// Get the number of usable sectors on the disk
    ///
    /// An inverted range counts as zero. `None` when the range spans the whole
    /// 64-bit LBA space and the count does not fit in a `u64`.
    pub fn usable_lba_count(&self) -> Option<u64> {
        match self.last_usable_lba.checked_sub(self.first_usable_lba) {
            Some(span) => span.checked_add(1),
            None => Some(0),
        }
    }
}

impl fmt::Display for GptHeaderSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "usable LBA {}..={}, {} partition entries",
            self.first_usable_lba, self.last_usable_lba, self.partition_entry_count
        )
    }
}
