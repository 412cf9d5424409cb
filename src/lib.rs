//! Polls CloudWatch Logs for error entries and forwards them to SNS.
//!
//! The two Lambda entry points live under `src/bin`; `src/main.rs` runs
//! either handler once from a workstation.

#[macro_use]
extern crate lazy_static;

pub mod aws;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logs;
pub mod models;
pub mod notify;
pub mod utilities;
