pub mod attribute;
pub mod backup;
pub mod health;
pub mod snapshot;
pub mod space;

pub use attribute::DiagnosticAttribute;
pub use backup::{BackupOutcome, BackupRun};
pub use health::HealthRecord;
pub use snapshot::TelemetrySnapshot;
pub use space::SpaceUsage;
