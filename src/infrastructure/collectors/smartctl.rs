use std::process::Command;

use crate::domain::entities::attribute::DiagnosticAttribute;
use crate::domain::ports::telemetry::{TelemetryError, TelemetrySource};

/// The attribute table starts after two header lines.
const HEADER_LINES: usize = 2;

/// Column positions in the smartctl attribute table:
/// `ID# ATTRIBUTE_NAME FLAG VALUE WORST THRESH TYPE UPDATED WHEN_FAILED RAW_VALUE`
const NAME_FIELD: usize = 1;
const VALUE_FIELD: usize = 3;
const THRESHOLD_FIELD: usize = 5;
const RAW_VALUE_FIELD: usize = 9;

/// Reads SMART attributes by invoking `smartctl -A <device>`.
pub struct SmartctlSource;

impl SmartctlSource {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for SmartctlSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetrySource for SmartctlSource {
    fn get_attributes(&self, device: &str) -> Result<Vec<DiagnosticAttribute>, TelemetryError> {
        let output = Command::new("smartctl")
            .args(["-A", device])
            .output()
            .map_err(|e| TelemetryError::ToolUnavailable(format!("smartctl: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TelemetryError::DeviceUnreadable(format!(
                "{device}: smartctl exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(parse_attribute_table(&stdout))
    }
}

/// Parse the smartctl attribute table, skipping the header lines and any
/// line that does not look like an attribute row. Vendor-specific oddities
/// are dropped silently rather than aborting the whole read.
fn parse_attribute_table(stdout: &str) -> Vec<DiagnosticAttribute> {
    stdout
        .lines()
        .skip(HEADER_LINES)
        .filter_map(parse_attribute_line)
        .collect()
}

fn parse_attribute_line(line: &str) -> Option<DiagnosticAttribute> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    // The raw value sits at a fixed position past the flags, so short
    // lines (separators, free-form notes) cannot be attribute rows.
    if fields.len() <= RAW_VALUE_FIELD {
        return None;
    }
    let value = fields[VALUE_FIELD].parse().ok()?;
    let threshold = fields[THRESHOLD_FIELD].parse().ok()?;
    Some(DiagnosticAttribute {
        name: fields[NAME_FIELD].to_string(),
        value,
        threshold,
        raw_value: fields[RAW_VALUE_FIELD].to_string(),
    })
}
