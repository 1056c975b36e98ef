pub mod capture_delegate;
pub mod capture_provider;
pub mod recorder;
pub mod sample_sink;
