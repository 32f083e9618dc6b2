pub mod config;
pub mod dataset;
pub mod domain;
pub mod error;
pub mod schema;
pub mod storage;
pub mod telemetry;
pub mod workflows;
