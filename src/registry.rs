//! Definition registry and discovery
//!
//! Publishable definitions register explicitly (a capability registry in
//! place of assembly scanning), preserving the contract of an ordered list
//! of instances implementing a capability. A constructor failure aborts
//! discovery: it signals a structurally broken definition type rather than
//! a data problem.

use std::fmt;
use std::path::PathBuf;

use serde_yaml_ng::Value;

use crate::error::PipewrightResult;

/// How a definition's target path is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetPathKind {
    /// Use the path as-is
    Absolute,
    /// Resolve against the repository root (nearest parent with `.git`)
    #[default]
    RelativeToRepoRoot,
    /// Resolve against the current working directory
    RelativeToCurrentDir,
}

/// One publishable document-producing unit
pub trait Definition {
    /// Label used in logs and reports
    fn display_name(&self) -> String;

    /// Where the serialized document is written
    fn target_path(&self) -> PathBuf;

    /// How [`Definition::target_path`] is interpreted
    fn target_path_kind(&self) -> TargetPathKind {
        TargetPathKind::RelativeToRepoRoot
    }

    /// Header comment lines emitted above the document when headers are
    /// enabled; `None` suppresses the header for this definition
    fn header(&self) -> Option<Vec<String>> {
        Some(vec![
            "DO NOT MODIFY THIS FILE!".to_string(),
            String::new(),
            format!("This YAML was auto-generated from {}", self.display_name()),
            "To make changes, change the definition and republish".to_string(),
        ])
    }

    /// Self-validation; a failure message is recorded against this
    /// definition only and never aborts the batch
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }

    /// The serializable document graph
    fn document(&self) -> PipewrightResult<Value>;
}

/// A named grouping that yields zero or more definitions
///
/// Exists so a single registered type can produce many output documents.
pub trait DefinitionCollection {
    fn display_name(&self) -> String;
    fn definitions(&self) -> Vec<Box<dyn Definition>>;
}

/// Fallible definition constructor
pub type DefinitionCtor = fn() -> PipewrightResult<Box<dyn Definition>>;

/// Fallible collection constructor
pub type CollectionCtor = fn() -> PipewrightResult<Box<dyn DefinitionCollection>>;

/// A discovered definition, paired with its owning collection's name when
/// it came out of one
pub struct Discovered {
    pub definition: Box<dyn Definition>,
    pub collection: Option<String>,
}

impl Discovered {
    /// Display label for logs and reports
    ///
    /// Definitions from a collection are labelled by the collection name
    /// plus the target file name, matching how they show up on disk.
    pub fn label(&self) -> String {
        match &self.collection {
            Some(collection) => {
                let path = self.definition.target_path();
                let file = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                format!("{collection} / {file}")
            }
            None => self.definition.display_name(),
        }
    }
}

// Box<dyn Definition> has no Debug, so show the label instead
impl fmt::Debug for Discovered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Discovered")
            .field("label", &self.label())
            .finish()
    }
}

/// Explicit registry of publishable definitions and collections
#[derive(Default)]
pub struct DefinitionRegistry {
    definitions: Vec<DefinitionCtor>,
    collections: Vec<CollectionCtor>,
}

impl DefinitionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition type constructed via `Default`
    pub fn register<T>(&mut self) -> &mut Self
    where
        T: Definition + Default + 'static,
    {
        self.definitions.push(|| Ok(Box::new(T::default())));
        self
    }

    /// Register a definition with a fallible constructor
    pub fn register_with(&mut self, ctor: DefinitionCtor) -> &mut Self {
        self.definitions.push(ctor);
        self
    }

    /// Register a collection type constructed via `Default`
    pub fn register_collection<T>(&mut self) -> &mut Self
    where
        T: DefinitionCollection + Default + 'static,
    {
        self.collections.push(|| Ok(Box::new(T::default())));
        self
    }

    /// Register a collection with a fallible constructor
    pub fn register_collection_with(&mut self, ctor: CollectionCtor) -> &mut Self {
        self.collections.push(ctor);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty() && self.collections.is_empty()
    }

    /// Instantiate every registered definition and collection
    ///
    /// The result is sorted by display label so publish order (and with it
    /// log and report order) is reproducible regardless of registration
    /// order.
    pub fn discover(&self) -> PipewrightResult<Vec<Discovered>> {
        let mut found = Vec::new();

        for ctor in &self.definitions {
            found.push(Discovered {
                definition: ctor()?,
                collection: None,
            });
        }

        for ctor in &self.collections {
            let collection = ctor()?;
            let name = collection.display_name();
            for definition in collection.definitions() {
                found.push(Discovered {
                    definition,
                    collection: Some(name.clone()),
                });
            }
        }

        found.sort_by_key(Discovered::label);
        Ok(found)
    }
}
