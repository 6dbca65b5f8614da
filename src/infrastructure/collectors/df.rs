use std::process::Command;

use crate::domain::entities::space::SpaceUsage;
use crate::domain::ports::space::{SpaceError, SpaceReporter};

/// Reports filesystem usage by invoking `df <device>`.
///
/// Block counts are passed through in whatever unit `df` emits; no unit
/// conversion is attempted.
pub struct DfReporter;

impl DfReporter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for DfReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl SpaceReporter for DfReporter {
    fn space_usage(&self, device: &str) -> Result<SpaceUsage, SpaceError> {
        let output = Command::new("df")
            .arg(device)
            .output()
            .map_err(|e| SpaceError::ToolUnavailable(format!("df: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SpaceError::DeviceUnknown(format!(
                "{device}: {}",
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_df_output(&stdout)
            .ok_or_else(|| SpaceError::DeviceUnknown(format!("{device}: unparseable df output")))
    }
}

/// Parse the single data line of a `df` report:
/// `Filesystem 1K-blocks Used Available Use% Mounted on`.
fn parse_df_output(stdout: &str) -> Option<SpaceUsage> {
    let line = stdout.lines().nth(1)?;
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 6 {
        return None;
    }
    Some(SpaceUsage {
        total: fields[1].parse().ok()?,
        used: fields[2].parse().ok()?,
        available: fields[3].parse().ok()?,
        usage_percent: fields[4].trim_end_matches('%').parse().ok()?,
    })
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    const SAMPLE_OUTPUT: &str = "\
Filesystem     1K-blocks     Used Available Use% Mounted on
/dev/sda1      488245288 41943040 446302248   9% /
";

    #[test]
    fn parse_extracts_usage_fields() {
        let space = parse_df_output(SAMPLE_OUTPUT).expect("parse");
        assert_eq!(space.total, 488_245_288);
        assert_eq!(space.used, 41_943_040);
        assert_eq!(space.available, 446_302_248);
        assert!((space.usage_percent - 9.0).abs() < f64::EPSILON);
    }

    #[test]
    fn parse_header_only_is_none() {
        let output = "Filesystem     1K-blocks     Used Available Use% Mounted on\n";
        assert!(parse_df_output(output).is_none());
    }

    #[test]
    fn parse_empty_output_is_none() {
        assert!(parse_df_output("").is_none());
    }

    #[test]
    fn parse_short_line_is_none() {
        let output = "header\n/dev/sda1 100 50\n";
        assert!(parse_df_output(output).is_none());
    }

    #[test]
    fn parse_non_numeric_fields_is_none() {
        let output = "header\n/dev/sda1 abc def ghi 9% /\n";
        assert!(parse_df_output(output).is_none());
    }

    #[test]
    fn parse_ignores_trailing_fields_after_mount_point() {
        let output = "\
Filesystem 1K-blocks Used Available Use% Mounted on
/dev/sda1 100 50 50 50% /mnt/my disk
";
        let space = parse_df_output(output).expect("parse");
        assert_eq!(space.total, 100);
        assert!((space.usage_percent - 50.0).abs() < f64::EPSILON);
    }
}
