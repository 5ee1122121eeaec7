pub mod logging;
pub mod pipeline;

pub use logging::{init_logging, LogFormat};
pub use pipeline::{collect_artifacts, generate, inspect, GenerateOptions, GroupSummary};
