//! Command scripts for the partitioning tool.
//!
//! User text never reaches a script directly. Fields are parsed into
//! typed values first (`DiskIndex`, `PartitionSize`), and scripts are
//! only built from those. Anything that is not a plain run of digits
//! is rejected before a single line is produced.

use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Field label used in disk-number validation messages.
pub const DISK_FIELD: &str = "Disk number";

/// Field label used in partition-size validation messages.
pub const SIZE_FIELD: &str = "Partition size";

// ============================================================================
// TYPED VALUES
// ============================================================================

/// Index of a disk as shown by `list disk`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DiskIndex(pub u32);

/// Partition size in megabytes. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PartitionSize(u64);

impl DiskIndex {
    /// Parse user input for the named field.
    pub fn parse_field(input: &str, field: &'static str) -> Result<Self, ValidationError> {
        let digits = digits_only(input, field)?;
        digits
            .parse::<u32>()
            .map(DiskIndex)
            .map_err(|_| ValidationError::OutOfRange {
                field,
                value: digits.to_string(),
            })
    }
}

impl PartitionSize {
    /// Size in megabytes, rejecting zero.
    pub fn new(megabytes: u64) -> Option<Self> {
        (megabytes > 0).then_some(PartitionSize(megabytes))
    }

    pub fn megabytes(self) -> u64 {
        self.0
    }

    /// Size in bytes, saturating.
    pub fn bytes(self) -> u64 {
        self.0.saturating_mul(1024 * 1024)
    }

    /// Parse user input for the named field.
    pub fn parse_field(input: &str, field: &'static str) -> Result<Self, ValidationError> {
        let digits = digits_only(input, field)?;
        let megabytes = digits
            .parse::<u64>()
            .map_err(|_| ValidationError::OutOfRange {
                field,
                value: digits.to_string(),
            })?;
        PartitionSize::new(megabytes).ok_or(ValidationError::Zero { field })
    }
}

impl FromStr for DiskIndex {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DiskIndex::parse_field(s, DISK_FIELD)
    }
}

impl FromStr for PartitionSize {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PartitionSize::parse_field(s, SIZE_FIELD)
    }
}

impl fmt::Display for DiskIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for PartitionSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trim surrounding whitespace and require a non-empty run of ASCII digits.
///
/// `str::parse` alone would accept a leading `+`, so the digit check
/// comes first.
fn digits_only<'a>(input: &'a str, field: &'static str) -> Result<&'a str, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::NotANumber {
            field,
            value: trimmed.to_string(),
        });
    }
    Ok(trimmed)
}

// ============================================================================
// SCRIPTS
// ============================================================================

/// Ordered, non-empty list of instructions for the partitioning tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandScript {
    lines: Vec<String>,
}

impl CommandScript {
    /// `list disk`
    pub fn list_disks() -> Self {
        CommandScript {
            lines: vec!["list disk".to_string()],
        }
    }

    /// Wipe every partition on a disk.
    pub fn clean(disk: DiskIndex) -> Self {
        CommandScript {
            lines: vec![format!("select disk {}", disk), "clean".to_string()],
        }
    }

    /// Create, quick-format (NTFS) and assign a primary partition.
    pub fn create_partition(disk: DiskIndex, size: PartitionSize) -> Self {
        CommandScript {
            lines: vec![
                format!("select disk {}", disk),
                format!("create partition primary size={}", size),
                "format fs=ntfs quick".to_string(),
                "assign".to_string(),
            ],
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Script file contents: lines joined by `\n`, no trailing separator.
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_script_is_single_line() {
        assert_eq!(CommandScript::list_disks().lines(), ["list disk"]);
    }

    #[test]
    fn clean_script_selects_then_cleans() {
        let disk: DiskIndex = "1".parse().unwrap();
        assert_eq!(CommandScript::clean(disk).lines(), ["select disk 1", "clean"]);
    }

    #[test]
    fn create_script_matches_expected_sequence() {
        let disk: DiskIndex = "1".parse().unwrap();
        let size: PartitionSize = "10240".parse().unwrap();
        assert_eq!(
            CommandScript::create_partition(disk, size).lines(),
            [
                "select disk 1",
                "create partition primary size=10240",
                "format fs=ntfs quick",
                "assign",
            ]
        );
    }

    #[test]
    fn script_text_has_no_trailing_newline() {
        let script = CommandScript::clean(DiskIndex(3));
        assert_eq!(script.to_text(), "select disk 3\nclean");
    }

    #[test]
    fn disk_index_accepts_surrounding_whitespace() {
        assert_eq!(" 2 ".parse::<DiskIndex>(), Ok(DiskIndex(2)));
        assert_eq!("0".parse::<DiskIndex>(), Ok(DiskIndex(0)));
    }

    #[test]
    fn disk_index_rejects_non_digits() {
        for bad in ["abc", "-1", "+1", "1.0", "1 2", "1; clean", "1\nclean"] {
            assert!(
                matches!(bad.parse::<DiskIndex>(), Err(ValidationError::NotANumber { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn disk_index_rejects_empty() {
        assert_eq!(
            "   ".parse::<DiskIndex>(),
            Err(ValidationError::Empty { field: DISK_FIELD })
        );
    }

    #[test]
    fn disk_index_rejects_overflow() {
        assert!(matches!(
            "99999999999".parse::<DiskIndex>(),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn partition_size_rejects_zero() {
        assert_eq!(
            "0".parse::<PartitionSize>(),
            Err(ValidationError::Zero { field: SIZE_FIELD })
        );
        assert_eq!(PartitionSize::new(0), None);
    }

    #[test]
    fn partition_size_bytes() {
        let size = PartitionSize::new(2).unwrap();
        assert_eq!(size.megabytes(), 2);
        assert_eq!(size.bytes(), 2 * 1024 * 1024);
    }
}
