//! invitedb - a flat-file user registry with invite tracking
//!
//! Users live in a semicolon-delimited text file, one per line. The
//! registry creates them, finds them by id or email, and records when an
//! invite has been sent.

pub mod cli;
pub mod config;
pub mod observability;
pub mod registry;
pub mod storage;
