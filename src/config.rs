//! Publishing configuration
//!
//! Serialization settings and hooks are an explicit value handed to the
//! serializer and the publisher. They are fixed before a run starts and
//! read-only while it executes.

use std::path::Path;

use crate::registry::Definition;

/// Called after validation succeeds, right before the document is written
pub type BeforePublishHook = Box<dyn Fn(&dyn Definition, &Path)>;

/// Called right after the document is written, with the emitted text
pub type AfterPublishHook = Box<dyn Fn(&dyn Definition, &Path, &str)>;

/// Settings around YAML serialization
#[derive(Debug, Clone, Copy)]
pub struct SerializationSettings {
    /// Emit the per-definition header comment block above the document
    pub include_headers: bool,

    /// Insert blank lines to make the YAML more human-readable
    pub prettify: bool,
}

impl Default for SerializationSettings {
    fn default() -> Self {
        Self {
            include_headers: true,
            prettify: true,
        }
    }
}

/// Hooks into the publishing process
///
/// Both hooks are optional and invoked synchronously, exactly once per
/// published definition, in publish order. A panicking hook aborts the run.
#[derive(Default)]
pub struct Hooks {
    pub before_publish: Option<BeforePublishHook>,
    pub after_publish: Option<AfterPublishHook>,
}

/// Configuration for a publish run
#[derive(Default)]
pub struct PublishConfig {
    pub serialization: SerializationSettings,
    pub hooks: Hooks,
}
