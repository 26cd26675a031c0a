//! Template API generation
//!
//! Reads a checked-in YAML template, infers a typed reference signature
//! for it, and merges the generated method into a Rust source file so the
//! template can be referenced without hand-written strings.

pub mod merge;
pub mod parser;
pub mod synthesize;

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

pub use parser::{ParsedTemplate, TemplateCategory, TemplateParameter};
pub use synthesize::method_name;

use crate::error::PipewrightResult;
use crate::repo::{find_repo_root, repo_relative_path};

/// Generate or refresh the reference method for one template
///
/// The template path is resolved against the repository root so the
/// generated reference matches how the pipeline service addresses it.
pub fn update_template_api(
    output: &Path,
    struct_name: &str,
    template_path: &Path,
) -> PipewrightResult<()> {
    let text = fs::read_to_string(template_path)?;
    let parsed = parser::parse(&text, template_path)?;

    let template_path = template_path.canonicalize()?;
    let anchor = template_path.parent().unwrap_or(&template_path);
    let root = find_repo_root(anchor)?;
    let relative = repo_relative_path(&template_path, &root);

    let method = synthesize::method_block(&relative, &parsed);

    let existing = match fs::read_to_string(output) {
        Ok(content) => Some(content),
        Err(error) if error.kind() == ErrorKind::NotFound => None,
        Err(error) => return Err(error.into()),
    };
    let merged = merge::merge_into(existing.as_deref(), struct_name, &relative, &method)?;

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, merged)?;
    Ok(())
}
