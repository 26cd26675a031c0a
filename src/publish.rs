//! Publish orchestration
//!
//! Walks discovered definitions strictly in order: validate, fingerprint,
//! write, fingerprint again, classify. The document is always written, even
//! when nothing changed, so the file deterministically reflects the current
//! in-memory definition; change detection is purely content-based.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::PublishConfig;
use crate::error::PipewrightResult;
use crate::hash;
use crate::registry::{Definition, DefinitionRegistry, Discovered, TargetPathKind};
use crate::repo;
use crate::serializer;

/// Where a definition ended up after a publish pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The target file did not exist before
    Created,
    /// Before and after fingerprints match
    Unchanged,
    /// The on-disk content was replaced
    Changed,
    /// Validation rejected the definition; nothing was written
    ValidationFailed(String),
}

/// Per-definition publish result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub name: String,
    pub path: PathBuf,
    pub outcome: PublishOutcome,
}

/// Results of a whole publish run
///
/// Under `fail_if_changed`, `Created` and `Changed` outcomes count as
/// errors: generated output is expected to already be checked in. This is a
/// reporting-severity decision layered on top of a successful write, not an
/// exception path.
#[derive(Debug)]
pub struct PublishRun {
    pub reports: Vec<PublishReport>,
    fail_if_changed: bool,
}

impl PublishRun {
    pub fn errors(&self) -> usize {
        self.reports
            .iter()
            .filter(|report| self.is_error(&report.outcome))
            .count()
    }

    pub fn is_success(&self) -> bool {
        self.errors() == 0
    }

    fn is_error(&self, outcome: &PublishOutcome) -> bool {
        match outcome {
            PublishOutcome::ValidationFailed(_) => true,
            PublishOutcome::Created | PublishOutcome::Changed => self.fail_if_changed,
            PublishOutcome::Unchanged => false,
        }
    }
}

/// Sink for publish progress
pub trait PublishSink {
    fn info(&mut self, message: &str);
    fn error(&mut self, message: &str);
}

/// Sink writing to stdout/stderr
pub struct ConsoleSink;

impl PublishSink for ConsoleSink {
    fn info(&mut self, message: &str) {
        println!("{message}");
    }

    fn error(&mut self, message: &str) {
        eprintln!("error: {message}");
    }
}

/// Collecting sink for tests and embedding
#[derive(Default)]
pub struct BufferSink {
    pub infos: Vec<String>,
    pub errors: Vec<String>,
}

impl PublishSink for BufferSink {
    fn info(&mut self, message: &str) {
        self.infos.push(message.to_string());
    }

    fn error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}

/// Publishes discovered definitions one by one
pub struct Publisher {
    config: PublishConfig,
    anchor: PathBuf,
}

impl Publisher {
    /// Anchor target-path resolution at the current working directory
    pub fn new(config: PublishConfig) -> PipewrightResult<Self> {
        Ok(Self {
            config,
            anchor: std::env::current_dir()?,
        })
    }

    /// Anchor target-path resolution at an explicit directory
    pub fn with_anchor(config: PublishConfig, anchor: impl Into<PathBuf>) -> Self {
        Self {
            config,
            anchor: anchor.into(),
        }
    }

    /// Publish everything in the registry, strictly in discovery order
    pub fn publish(
        &self,
        registry: &DefinitionRegistry,
        fail_if_changed: bool,
        sink: &mut dyn PublishSink,
    ) -> PipewrightResult<PublishRun> {
        let discovered = registry.discover()?;

        if discovered.is_empty() {
            sink.info("No definitions registered");
        }

        let mut run = PublishRun {
            reports: Vec::new(),
            fail_if_changed,
        };
        for item in &discovered {
            run.reports.push(self.publish_one(item, fail_if_changed, sink)?);
        }
        Ok(run)
    }

    fn publish_one(
        &self,
        item: &Discovered,
        fail_if_changed: bool,
        sink: &mut dyn PublishSink,
    ) -> PipewrightResult<PublishReport> {
        let definition = item.definition.as_ref();
        let name = item.label();
        let path = self.resolve_target_path(definition)?;

        sink.info(&format!("{name}:"));
        sink.info("  Validating definition..");

        if let Err(message) = definition.validate() {
            sink.error(&format!("Validation of definition {name} failed: {message}"));
            return Ok(PublishReport {
                name,
                path,
                outcome: PublishOutcome::ValidationFailed(message),
            });
        }

        let before = hash::fingerprint(&path)?;

        if let Some(hook) = &self.config.hooks.before_publish {
            hook(definition, &path);
        }

        let document = definition.document()?;
        let mut text = serializer::serialize(&document, &self.config.serialization)?;
        if self.config.serialization.include_headers {
            if let Some(header) = definition.header() {
                text = serializer::with_header(&text, &header);
            }
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        write_atomic(&path, &text)?;

        if let Some(hook) = &self.config.hooks.after_publish {
            hook(definition, &path, &text);
        }

        let after = hash::fingerprint(&path)?;

        let outcome = match before {
            None => PublishOutcome::Created,
            Some(before) if Some(&before) == after.as_ref() => PublishOutcome::Unchanged,
            Some(_) => PublishOutcome::Changed,
        };

        match &outcome {
            PublishOutcome::Created if fail_if_changed => {
                sink.error("  This definition hasn't been published yet!");
            }
            PublishOutcome::Created => {
                sink.info(&format!("  {name} created at {}", path.display()));
            }
            PublishOutcome::Unchanged => {
                sink.info("  No new changes to publish");
            }
            PublishOutcome::Changed if fail_if_changed => {
                sink.error(&format!(
                    "  Changes detected between {name} and {}",
                    path.display()
                ));
            }
            PublishOutcome::Changed => {
                sink.info(&format!("  Published new changes to {}", path.display()));
            }
            // Handled before anything was written
            PublishOutcome::ValidationFailed(_) => {}
        }

        Ok(PublishReport {
            name,
            path,
            outcome,
        })
    }

    fn resolve_target_path(&self, definition: &dyn Definition) -> PipewrightResult<PathBuf> {
        let path = definition.target_path();
        Ok(match definition.target_path_kind() {
            TargetPathKind::Absolute => path,
            TargetPathKind::RelativeToRepoRoot => repo::find_repo_root(&self.anchor)?.join(path),
            TargetPathKind::RelativeToCurrentDir => self.anchor.join(path),
        })
    }
}

/// Write via a temporary file in the target directory plus rename
fn write_atomic(path: &Path, content: &str) -> PipewrightResult<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(content.as_bytes())?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
