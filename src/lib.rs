//! disksentry — predictive disk health monitoring with automatic
//! protective backup.
//!
//! The crate is laid out hexagonally: `domain` holds entities, port
//! traits and the remediation policy; `application` orchestrates the
//! monitoring cycle; `infrastructure` implements the ports against
//! smartctl, df, SQLite and the mount/rsync/umount commands;
//! `presentation` is the CLI.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
