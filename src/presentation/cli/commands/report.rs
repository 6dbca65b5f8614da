use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;

use crate::domain::entities::space::SpaceUsage;
use crate::domain::ports::space::SpaceReporter;
use crate::domain::ports::store::HealthStore;

#[derive(Serialize)]
struct ReportOutput {
    generated_at: DateTime<Utc>,
    devices: Vec<DeviceReport>,
}

#[derive(Serialize)]
struct DeviceReport {
    device: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    health_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    prediction_confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    space: Option<SpaceUsage>,
}

/// Print a health report for all monitored disks: latest health record
/// plus current space usage per device.
///
/// Missing pieces (no history yet, device not mounted) are reported as
/// such rather than failing the whole report.
///
/// # Errors
///
/// Returns an error if a store query fails or JSON serialization fails.
pub fn run_report(
    health_store: &dyn HealthStore,
    space_reporter: &dyn SpaceReporter,
    devices: &[String],
    json: bool,
) -> anyhow::Result<()> {
    let mut output = ReportOutput {
        generated_at: Utc::now(),
        devices: Vec::new(),
    };

    for device in devices {
        let health = health_store.latest_health(device)?;
        let space = match space_reporter.space_usage(device) {
            Ok(space) => Some(space),
            Err(e) => {
                tracing::warn!(device = %device, "space usage unavailable: {e}");
                None
            }
        };
        output.devices.push(DeviceReport {
            device: device.clone(),
            health_score: health.as_ref().map(|h| h.health_score),
            prediction_confidence: health.as_ref().map(|h| h.confidence),
            space,
        });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_text_report(&output);
    }
    Ok(())
}

fn print_text_report(output: &ReportOutput) {
    println!("{}", "DiskSentry Health Report".bold());
    println!("Generated at: {}\n", output.generated_at.to_rfc3339());

    for report in &output.devices {
        println!("{}", format!("Device: {}", report.device).bold());
        match (report.health_score, report.prediction_confidence) {
            (Some(score), Some(confidence)) => {
                let score_text = format!("{score:.2}");
                let colored_score = if score < 0.7 {
                    score_text.red()
                } else {
                    score_text.green()
                };
                println!("Health Score: {colored_score}");
                println!("Prediction Confidence: {confidence:.2}");
            }
            _ => println!("No health history recorded yet"),
        }
        if let Some(space) = &report.space {
            println!("Space Usage: {:.1}%", space.usage_percent);
            // df reports opaque block counts; do not label them as KB
            println!("Available Space: {} blocks", space.available);
        }
        println!();
    }
}
