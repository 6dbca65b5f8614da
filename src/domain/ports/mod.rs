pub mod backup;
pub mod scorer;
pub mod space;
pub mod store;
pub mod telemetry;
pub mod volume;
