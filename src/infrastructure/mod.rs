pub mod backup;
pub mod collectors;
pub mod persistence;
pub mod scoring;
