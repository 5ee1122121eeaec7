pub mod definition;
pub mod environment;
pub mod loader;

pub use definition::{
    AlertDefinition, AlertFile, BuilderDefinition, DashboardDefinition, DashboardFile,
    GroupDefinition, NamedMetricDefinition,
};
pub use environment::{DatasourceConfig, EnvironmentConfig};
pub use loader::ConfigLoader;
