pub mod app;
pub mod tracing;
