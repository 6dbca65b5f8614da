pub mod df;
pub mod smartctl;
