pub mod artifact;
pub mod json;
pub mod sink;

pub use artifact::{Artifact, ArtifactSet};
pub use json::to_canonical_json;
pub use sink::{ArtifactSink, FileSink, MemorySink};
