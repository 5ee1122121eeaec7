pub mod environment;
pub mod error;
pub mod timerange;
pub mod uid;

pub use environment::Environment;
pub use error::{GritError, Result};
pub use timerange::{normalize, try_normalize, TimeRange};
pub use uid::create_uid_from_string;
