//! Text rendering of devices, analyses and sector dumps

use sectorscope_core::{format_size, BlockDevice, MediaInfo};
use sectorscope_zones::{DeviceAnalysis, PartitionScheme};

/// Bytes per hex dump line
const DUMP_WIDTH: usize = 16;

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// Media information for one enumerated device
pub fn media_lines(index: usize, label: &str, device: &dyn BlockDevice) -> Vec<String> {
    let media: &MediaInfo = device.media();

    let total = match media.total_size() {
        Some(bytes) => format!("{} ({} bytes)", format_size(bytes), bytes),
        None => "unknown (overflow)".to_string(),
    };

    vec![
        format!("Device {}: {}", index, device.identify()),
        format!("  Device Path: {}", label),
        format!("  Media ID: {}", media.media_id),
        format!("  Removable: {}", yes_no(media.removable)),
        format!("  Media Present: {}", yes_no(media.media_present)),
        format!("  Logical Partition: {}", yes_no(media.logical_partition)),
        format!("  Read Only: {}", yes_no(media.read_only)),
        format!("  Block Size: {} bytes", media.block_size),
        format!("  Last Block: {}", media.last_block),
        format!("  Total Size: {}", total),
        format!(
            "  Optimal Transfer Length Granularity: {}",
            media.optimal_transfer_length_granularity
        ),
        format!("  Lowest Aligned LBA: {}", media.lowest_aligned_lba),
        format!(
            "  Logical Blocks per Physical Block: {}",
            media.logical_blocks_per_physical_block
        ),
    ]
}

/// Partition table analysis of one device
pub fn analysis_lines(analysis: &DeviceAnalysis) -> Vec<String> {
    let (scheme, disk_signature) = match analysis {
        DeviceAnalysis::LogicalPartition => {
            return vec!["  (Logical partition - skipping partition table check)".to_string()];
        }
        DeviceAnalysis::Table {
            scheme,
            disk_signature,
        } => (scheme, disk_signature),
    };

    let mut lines = vec!["  Partition Table Analysis:".to_string()];

    match scheme {
        PartitionScheme::NoBootSignature => {
            lines.push("    No partition table (no valid MBR signature found)".to_string());
        }
        PartitionScheme::Mbr(entries) => {
            lines.push("    MBR (Master Boot Record) detected".to_string());
            if let Some(signature) = disk_signature {
                lines.push(format!("    Disk Signature: 0x{:08X}", signature));
            }
            if entries.is_empty() {
                lines.push("    No partitions found".to_string());
            }
            for entry in entries {
                let active = if entry.bootable { ", active" } else { "" };
                lines.push(format!("    {} [{}{}]", entry, entry.kind(), active));
            }
        }
        PartitionScheme::Gpt(header) => {
            lines.push("    GPT (GUID Partition Table) detected".to_string());
            lines.push(format!("    First Usable LBA: {}", header.first_usable_lba));
            lines.push(format!("    Last Usable LBA: {}", header.last_usable_lba));
            lines.push(format!("    Partition Entries: {}", header.partition_entry_count));
            match header.usable_lba_count() {
                Some(count) => lines.push(format!("    Usable Sectors: {}", count)),
                None => lines.push("    Usable Sectors: unknown (overflow)".to_string()),
            }
        }
    }

    lines
}

/// Hex dump of the leading bytes of a block, 16 bytes per line
pub fn hex_dump_lines(lba: u64, bytes: &[u8]) -> Vec<String> {
    let mut lines = vec![format!("  First {} bytes of LBA {}:", bytes.len(), lba)];

    lines.extend(bytes.chunks(DUMP_WIDTH).map(|chunk| {
        let hex: Vec<String> = chunk.iter().map(|b| format!("{:02x}", b)).collect();
        format!("  {}", hex.join(" "))
    }));

    lines
}

/// Print rendered lines to stdout
pub fn emit(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}
