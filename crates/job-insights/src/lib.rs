pub mod config;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod insights;
pub mod pipeline;
pub mod report;
pub mod telemetry;
