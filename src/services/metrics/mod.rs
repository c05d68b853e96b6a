pub mod registry;

pub use registry::AuthMetrics;
