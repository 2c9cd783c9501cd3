//! SectorScope CLI - partition table inspection for disk images
//!
//! Treats each image file as a block device: prints its media information,
//! classifies its partition scheme and dumps raw sectors.

mod report;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sectorscope_core::BlockDevice;
use sectorscope_pipeline::{ImageDevice, PartialSource, SourceConfig};
use sectorscope_zones::{analyze, DeviceAnalysis, MbrPartitionEntry, PartitionScheme};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Bytes of LBA 0 shown for each device during a scan
const SCAN_DUMP_BYTES: usize = 32;

#[derive(Parser)]
#[command(name = "sectorscope")]
#[command(about = "Detect and decode MBR and GPT partition tables in disk images")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Logical sector size of the imaged disk
    #[arg(long, global = true, env = "SECTORSCOPE_SECTOR_SIZE", default_value = "512")]
    sector_size: u32,

    /// Read images with plain file I/O instead of memory mapping
    #[arg(long, global = true)]
    no_mmap: bool,

    /// Log level
    #[arg(long, global = true, env = "RUST_LOG", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Command {
    /// Display media information for an image
    Info {
        /// Disk image file
        image: PathBuf,
    },

    /// Classify the partition scheme of an image
    Scheme {
        /// Disk image file
        image: PathBuf,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Hex dump the start of a block
    Dump {
        /// Disk image file
        image: PathBuf,

        /// Block to dump
        #[arg(long, default_value = "0")]
        lba: u64,

        /// Number of bytes to show (clamped to the block size)
        #[arg(long, default_value = "32")]
        bytes: usize,
    },

    /// Enumerate images and their MBR partitions as block devices
    Scan {
        /// Disk image files
        #[arg(required = true)]
        images: Vec<PathBuf>,

        /// Stop after this many devices
        #[arg(
            long,
            default_value = "5",
            value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
        )]
        limit: usize,
    },
}

#[derive(Serialize)]
struct SchemeReport<'a> {
    image: &'a Path,
    media: &'a sectorscope_core::MediaInfo,
    analysis: &'a DeviceAnalysis,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(cli.log_level.as_str())
        .with_writer(std::io::stderr)
        .init();

    let config = SourceConfig {
        use_mmap: !cli.no_mmap,
        sector_size: cli.sector_size,
    };

    match cli.command {
        Command::Info { image } => cmd_info(&image, config),
        Command::Scheme { image, json } => cmd_scheme(&image, config, json),
        Command::Dump { image, lba, bytes } => cmd_dump(&image, config, lba, bytes),
        Command::Scan { images, limit } => cmd_scan(&images, config, limit),
    }
}

fn open_image(path: &Path, config: SourceConfig) -> Result<ImageDevice> {
    ImageDevice::open(path, config).with_context(|| format!("failed to open {}", path.display()))
}

fn cmd_info(path: &Path, config: SourceConfig) -> Result<()> {
    let device = open_image(path, config)?;

    report::emit(&report::media_lines(1, &path.display().to_string(), &device));
    Ok(())
}

fn cmd_scheme(path: &Path, config: SourceConfig, json: bool) -> Result<()> {
    let mut device = open_image(path, config)?;
    let analysis = analyze(&mut device)
        .with_context(|| format!("failed to analyze {}", path.display()))?;

    if json {
        let report = SchemeReport {
            image: path,
            media: device.media(),
            analysis: &analysis,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Image: {}", path.display());
        report::emit(&report::analysis_lines(&analysis));
    }

    Ok(())
}

fn cmd_dump(path: &Path, config: SourceConfig, lba: u64, bytes: usize) -> Result<()> {
    let mut device = open_image(path, config)?;
    report::emit(&dump_lines(&mut device, lba, bytes)?);
    Ok(())
}

fn dump_lines(device: &mut dyn BlockDevice, lba: u64, bytes: usize) -> Result<Vec<String>> {
    let block = device
        .read_block(lba)
        .with_context(|| format!("failed to read LBA {}", lba))?;

    let shown = bytes.min(block.len());
    Ok(report::hex_dump_lines(lba, &block[..shown]))
}

/// Media info, analysis and leading bytes of one device; the analysis is
/// returned when LBA 0 could be read
fn device_lines(
    index: usize,
    label: &str,
    device: &mut dyn BlockDevice,
) -> (Vec<String>, Option<DeviceAnalysis>) {
    let mut lines = vec![String::new()];
    lines.extend(report::media_lines(index, label, device));

    let analysis = match analyze(&mut *device) {
        Ok(analysis) => analysis,
        Err(e) => {
            lines.push(format!("  Failed to read LBA 0: {}", e));
            return (lines, None);
        }
    };

    lines.extend(report::analysis_lines(&analysis));
    match dump_lines(device, 0, SCAN_DUMP_BYTES) {
        Ok(dump) => lines.extend(dump),
        Err(e) => lines.push(format!("  {:#}", e)),
    }

    (lines, Some(analysis))
}

/// Whether an MBR entry can be exposed as a device of its own
fn is_enumerable(entry: &MbrPartitionEntry, disk_blocks: u64) -> bool {
    entry.size_sectors != 0 && !entry.kind().is_extended() && entry.end_lba() <= disk_blocks
}

fn cmd_scan(images: &[PathBuf], config: SourceConfig, limit: usize) -> Result<()> {
    report::emit(&scan_lines(images, config, limit)?);
    Ok(())
}

/// Enumerate images, then the MBR partitions of each, as numbered devices
///
/// Images that cannot be opened are skipped. Stops once `limit` devices
/// have been listed.
fn scan_lines(images: &[PathBuf], config: SourceConfig, limit: usize) -> Result<Vec<String>> {
    let mut lines = vec![
        "=== Enumerating Block Devices ===".to_string(),
        format!("Found {} image path(s)", images.len()),
    ];
    let limit_note = format!("(Showing first {} devices with media present)", limit);

    let mut device_count = 0;

    'images: for path in images {
        let mut device = match ImageDevice::open(path, config.clone()) {
            Ok(device) => device,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Skipping image");
                continue;
            }
        };

        device_count += 1;
        let label = path.display().to_string();
        let (device_report, analysis) = device_lines(device_count, &label, &mut device);
        lines.extend(device_report);

        if device_count >= limit {
            lines.push(String::new());
            lines.push(limit_note.clone());
            break;
        }

        let entries = match analysis.as_ref().and_then(DeviceAnalysis::scheme) {
            Some(PartitionScheme::Mbr(entries)) => entries.clone(),
            _ => continue,
        };

        let block_size = device.media().block_size;
        let disk_blocks = device.media().block_count();

        for entry in entries {
            if !is_enumerable(&entry, disk_blocks) {
                tracing::warn!(
                    image = %label,
                    slot = entry.slot,
                    kind = %entry.kind(),
                    start = entry.start_lba,
                    size = entry.size_sectors,
                    "Partition not enumerated as a device"
                );
                continue;
            }

            let mut partition = PartialSource::new(
                &mut device,
                entry.start_lba as u64,
                entry.size_sectors as u64,
                block_size,
            )?;

            device_count += 1;
            let label = format!("{} (partition {})", label, entry.slot + 1);
            let (partition_report, _) = device_lines(device_count, &label, &mut partition);
            lines.extend(partition_report);

            if device_count >= limit {
                lines.push(String::new());
                lines.push(limit_note.clone());
                break 'images;
            }
        }
    }

    lines.push(String::new());
    lines.push(format!("Total devices with media: {}", device_count));

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_scan_defaults() {
        let cli = Cli::try_parse_from(["sectorscope", "scan", "a.img", "b.img"]).unwrap();

        assert_eq!(cli.sector_size, 512);
        assert!(!cli.no_mmap);
        match cli.command {
            Command::Scan { images, limit } => {
                assert_eq!(images, vec![PathBuf::from("a.img"), PathBuf::from("b.img")]);
                assert_eq!(limit, 5);
            }
            _ => panic!("expected scan"),
        }
    }

    #[test]
    fn test_scan_requires_images() {
        assert!(Cli::try_parse_from(["sectorscope", "scan"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "sectorscope",
            "dump",
            "disk.img",
            "--lba",
            "1",
            "--sector-size",
            "4096",
            "--no-mmap",
        ])
        .unwrap();

        assert_eq!(cli.sector_size, 4096);
        assert!(cli.no_mmap);
        assert!(matches!(cli.command, Command::Dump { lba: 1, bytes: 32, .. }));
    }

    #[test]
    fn test_scan_rejects_zero_limit() {
        assert!(Cli::try_parse_from(["sectorscope", "scan", "a.img", "--limit", "0"]).is_err());

        let cli = Cli::try_parse_from(["sectorscope", "scan", "a.img", "--limit", "1"]).unwrap();
        assert!(matches!(cli.command, Command::Scan { limit: 1, .. }));
    }

    #[test]
    fn test_dump_lines_reads_requested_lba() {
        let mut device = ImageDevice::from_bytes(vec![0xA5u8; 1024], 512).unwrap();

        let lines = dump_lines(&mut device, 1, 4096).unwrap();
        assert_eq!(lines[0], "  First 512 bytes of LBA 1:");
        assert_eq!(lines.len(), 1 + 512 / 16);

        assert!(dump_lines(&mut device, 2, 16).is_err());
    }

    fn write_slot(disk: &mut [u8], slot: usize, partition_type: u8, start: u32, size: u32) {
        let offset = 0x1BE + slot * 16;
        disk[offset + 4] = partition_type;
        disk[offset + 8..offset + 12].copy_from_slice(&start.to_le_bytes());
        disk[offset + 12..offset + 16].copy_from_slice(&size.to_le_bytes());
    }

    /// 64-sector MBR disk: Linux at 2..10, an extended container at 10..14,
    /// and NTFS claiming sectors past the end of the image
    fn scan_image() -> NamedTempFile {
        let mut disk = vec![0u8; 64 * 512];
        write_slot(&mut disk, 0, 0x83, 2, 8);
        write_slot(&mut disk, 1, 0x05, 10, 4);
        write_slot(&mut disk, 2, 0x07, 60, 100);
        disk[510] = 0x55;
        disk[511] = 0xAA;
        disk[2 * 512..3 * 512].fill(0xAB);

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&disk).unwrap();
        file.flush().unwrap();
        file
    }

    fn contains(lines: &[String], wanted: &str) -> bool {
        lines.iter().any(|line| line == wanted)
    }

    #[test]
    fn test_is_enumerable() {
        let mut disk = vec![0u8; 512];
        write_slot(&mut disk, 0, 0x83, 2, 8);
        write_slot(&mut disk, 1, 0x05, 10, 4);
        write_slot(&mut disk, 2, 0x07, 60, 100);
        write_slot(&mut disk, 3, 0x0C, 20, 0);
        let entries = sectorscope_zones::decode_mbr(&disk).unwrap();

        let fits: Vec<bool> = entries.iter().map(|e| is_enumerable(e, 64)).collect();
        assert_eq!(fits, vec![true, false, false, false]);
    }

    #[test]
    fn test_scan_lists_partitions_as_logical_devices() {
        let image = scan_image();
        let label = image.path().display().to_string();
        let images = vec![PathBuf::from("/nonexistent/missing.img"), image.path().to_path_buf()];

        let lines = scan_lines(&images, SourceConfig::default(), 5).unwrap();

        assert_eq!(lines[0], "=== Enumerating Block Devices ===");
        assert!(contains(&lines, "Found 2 image path(s)"));

        // The missing image is skipped and does not take a device number
        assert!(contains(&lines, "Device 1: Raw disk image"));
        assert!(contains(&lines, &format!("  Device Path: {}", label)));
        assert!(contains(&lines, "    MBR (Master Boot Record) detected"));

        assert!(contains(&lines, "Device 2: Logical partition"));
        assert!(contains(&lines, &format!("  Device Path: {} (partition 1)", label)));
        assert!(contains(&lines, "  (Logical partition - skipping partition table check)"));
        assert!(contains(&lines, "  Last Block: 7"));

        // Partition LBA 0 is disk LBA 2
        assert!(contains(
            &lines,
            "  ab ab ab ab ab ab ab ab ab ab ab ab ab ab ab ab"
        ));

        assert!(!lines.iter().any(|line| line.contains("(partition 2)")));
        assert!(!lines.iter().any(|line| line.contains("(partition 3)")));
        assert!(!lines.iter().any(|line| line.contains("Showing first")));
        assert_eq!(lines.last().unwrap(), "Total devices with media: 2");
    }

    #[test]
    fn test_scan_stops_at_limit() {
        let image = scan_image();
        let images = vec![image.path().to_path_buf(), image.path().to_path_buf()];

        let lines = scan_lines(&images, SourceConfig::default(), 1).unwrap();

        assert!(contains(&lines, "Device 1: Raw disk image"));
        assert!(contains(&lines, "(Showing first 1 devices with media present)"));
        assert!(!lines.iter().any(|line| line.starts_with("Device 2")));
        assert_eq!(lines.last().unwrap(), "Total devices with media: 1");
    }

    #[test]
    fn test_scan_limit_inside_partitions() {
        let image = scan_image();
        let images = vec![image.path().to_path_buf(), image.path().to_path_buf()];

        let lines = scan_lines(&images, SourceConfig::default(), 2).unwrap();

        assert!(contains(&lines, "Device 2: Logical partition"));
        assert!(contains(&lines, "(Showing first 2 devices with media present)"));
        assert!(!lines.iter().any(|line| line.starts_with("Device 3")));
        assert_eq!(lines.last().unwrap(), "Total devices with media: 2");
    }

    #[test]
    fn test_scan_with_no_openable_images() {
        let images = vec![PathBuf::from("/nonexistent/a.img")];

        let lines = scan_lines(&images, SourceConfig::default(), 5).unwrap();

        assert!(!lines.iter().any(|line| line.starts_with("Device ")));
        assert_eq!(lines.last().unwrap(), "Total devices with media: 0");
    }
}
