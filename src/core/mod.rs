pub mod config;
pub mod formatter;
pub mod models;
pub mod notify;
pub mod period;
pub mod pipeline;
pub mod report;
pub mod sources;
