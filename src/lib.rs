//! Pipewright - pipelines-as-code publisher for Azure DevOps YAML
//!
//! Pipeline definitions are written as Rust types, validated, serialized to
//! canonical YAML, and published into the repository; checked-in YAML
//! templates get typed Rust reference functions generated for them.

pub mod config;
pub mod error;
pub mod hash;
pub mod models;
pub mod publish;
pub mod registry;
pub mod repo;
pub mod serializer;
pub mod template;

// Re-exports for convenience
pub use config::{Hooks, PublishConfig, SerializationSettings};
pub use error::{PipewrightError, PipewrightResult};
pub use models::{Conditioned, ConditionedList, Parameter, TaskInputs, Template};
pub use publish::{ConsoleSink, PublishOutcome, PublishReport, PublishRun, PublishSink, Publisher};
pub use registry::{Definition, DefinitionCollection, DefinitionRegistry, TargetPathKind};
pub use template::update_template_api;
