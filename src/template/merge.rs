//! Idempotent merge of generated methods into the reference file
//!
//! The generated file is plain text to the merge step. The mutable region
//! is the body of the `impl` block; each method block starts at its marker
//! comment and ends at the first closing-brace line after it. Re-merging an
//! unchanged template is byte-identical.

use crate::error::{PipewrightError, PipewrightResult};

/// Fresh file content for a reference struct with no methods yet
fn skeleton(struct_name: &str) -> Vec<String> {
    vec![
        "//! Typed references to checked-in YAML templates".to_string(),
        "//!".to_string(),
        "//! Auto-generated; regenerate instead of editing by hand.".to_string(),
        String::new(),
        "#![allow(non_snake_case, unused_imports)]".to_string(),
        String::new(),
        "use pipewright::models::{".to_string(),
        "    Conditioned, ConditionedList, Deployment, Job, Stage, Step, TaskInputs, Template, Variable,"
            .to_string(),
        "};".to_string(),
        String::new(),
        format!("pub struct {struct_name};"),
        String::new(),
        format!("impl {struct_name} {{"),
        "}".to_string(),
        String::new(),
    ]
}

/// Merge one generated method block into the reference file
///
/// When a block for the same template already exists it is replaced in
/// place; otherwise the method is appended at the end of the impl body.
/// `None` for `existing` starts from a fresh skeleton.
pub fn merge_into(
    existing: Option<&str>,
    struct_name: &str,
    repo_relative_path: &str,
    method: &[String],
) -> PipewrightResult<String> {
    let newline = match existing {
        Some(text) if text.contains("\r\n") => "\r\n",
        _ => "\n",
    };

    let lines: Vec<String> = match existing {
        Some(text) => text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect(),
        None => skeleton(struct_name),
    };

    let impl_open = format!("impl {struct_name} {{");
    let impl_index = lines
        .iter()
        .position(|line| line.trim() == impl_open)
        .ok_or_else(|| PipewrightError::MalformedGeneratedFile {
            message: format!("could not find `{impl_open}`"),
        })?;
    let impl_close = lines
        .iter()
        .rposition(|line| line.trim() == "}")
        .filter(|close| *close > impl_index)
        .ok_or_else(|| PipewrightError::MalformedGeneratedFile {
            message: format!("`{impl_open}` is never closed"),
        })?;

    let mut body: Vec<String> = lines[impl_index + 1..impl_close].to_vec();
    let marker = format!("// {repo_relative_path}");

    match body.iter().position(|line| line.trim() == marker) {
        Some(start) => {
            let end = body
                .iter()
                .enumerate()
                .skip(start + 1)
                .find(|(_, line)| line.is_empty() || line.contains(");") || line.trim() == "}")
                .map(|(index, _)| index)
                .unwrap_or(body.len() - 1);
            body.splice(start..=end, method.iter().cloned());
        }
        None => body.extend(method.iter().cloned()),
    }

    let mut merged: Vec<String> = Vec::with_capacity(lines.len() + method.len());
    merged.extend_from_slice(&lines[..=impl_index]);
    merged.append(&mut body);
    merged.extend_from_slice(&lines[impl_close..]);

    Ok(normalize(merged).join(newline))
}

/// Collapse runs of blank lines and drop a blank directly before the
/// closing brace of the impl block
fn normalize(lines: Vec<String>) -> Vec<String> {
    let mut kept: Vec<String> = Vec::with_capacity(lines.len());
    for line in lines {
        if line.is_empty() && kept.last().is_some_and(|last| last.is_empty()) {
            continue;
        }
        if line == "}" && kept.last().is_some_and(|last| last.is_empty()) {
            kept.pop();
        }
        kept.push(line);
    }
    kept
}
