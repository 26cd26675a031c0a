//! Template document parsing and type inference
//!
//! A template declares its parameters in one of two shapes: fully
//! specified (`- name: x` / `type:` / `default:` documents) or shorthand
//! (a flat `name: default` mapping). Nothing in the document says which
//! shape is in use; it is decided by the structural shape of the value
//! under the `parameters` key.

use std::path::Path;

use serde_yaml_ng::{Mapping, Value};

use crate::error::{PipewrightError, PipewrightResult};

/// Type a parameter falls back to when nothing stronger can be inferred
const UNTYPED_INPUTS: &str = "TaskInputs";

/// Sentinel that must stay visible in generated output for a human to fix
const MISSING_TYPE: &str = "MISSING_TYPE";

/// Semantic category of a template's top-level content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateCategory {
    Stage,
    Job,
    Step,
    Variable,
}

impl TemplateCategory {
    /// Marker type name used in the generated `Template<_>` signature
    pub fn type_name(self) -> &'static str {
        match self {
            TemplateCategory::Stage => "Stage",
            TemplateCategory::Job => "Job",
            TemplateCategory::Step => "Step",
            TemplateCategory::Variable => "Variable",
        }
    }
}

/// One declared template parameter, resolved to a Rust parameter type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateParameter {
    pub name: String,
    /// Type the generated signature uses
    pub rust_type: String,
    /// Default value rendered as a Rust literal, when one was declared
    pub default: Option<String>,
}

impl TemplateParameter {
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

/// A parsed template: its category plus signature-ordered parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTemplate {
    pub category: TemplateCategory,
    pub parameters: Vec<TemplateParameter>,
}

/// Parse a template document and infer its reference signature
pub fn parse(text: &str, file: &Path) -> PipewrightResult<ParsedTemplate> {
    let doc: Value = serde_yaml_ng::from_str(text)?;
    let doc = doc
        .as_mapping()
        .ok_or_else(|| PipewrightError::InvalidTemplate {
            file: file.to_path_buf(),
            message: "top level of a template must be a mapping".to_string(),
        })?;

    let category = infer_category(doc, file)?;
    let parameters = order_for_signature(parse_parameters(doc, file)?);

    Ok(ParsedTemplate {
        category,
        parameters,
    })
}

/// The category comes from which top-level key is present, in priority
/// order; it is never guessed from content.
fn infer_category(doc: &Mapping, file: &Path) -> PipewrightResult<TemplateCategory> {
    for (key, category) in [
        ("stages", TemplateCategory::Stage),
        ("jobs", TemplateCategory::Job),
        ("steps", TemplateCategory::Step),
        ("variables", TemplateCategory::Variable),
    ] {
        if doc.get(&Value::from(key)).is_some() {
            return Ok(category);
        }
    }

    Err(PipewrightError::UnknownTemplateCategory {
        file: file.to_path_buf(),
    })
}

fn parse_parameters(doc: &Mapping, file: &Path) -> PipewrightResult<Vec<TemplateParameter>> {
    let Some(parameters) = doc.get(&Value::from("parameters")) else {
        return Ok(Vec::new());
    };

    match parameters {
        // Shorthand: a flat name -> default value mapping
        Value::Mapping(entries) => entries
            .iter()
            .map(|(name, default)| shorthand_parameter(name, default, file))
            .collect(),
        // Fully specified: a list of name/type/default documents
        Value::Sequence(items) => items
            .iter()
            .map(|item| full_parameter(item, file))
            .collect(),
        _ => Err(PipewrightError::InvalidTemplate {
            file: file.to_path_buf(),
            message: "parameters must be a mapping of defaults or a list of parameter definitions"
                .to_string(),
        }),
    }
}

fn shorthand_parameter(
    name: &Value,
    default: &Value,
    file: &Path,
) -> PipewrightResult<TemplateParameter> {
    let name = name
        .as_str()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| PipewrightError::InvalidTemplate {
            file: file.to_path_buf(),
            message: "parameter names must be non-empty strings".to_string(),
        })?;

    let (rust_type, default) = infer_from_literal(default);
    Ok(TemplateParameter {
        name: name.to_string(),
        rust_type,
        default,
    })
}

fn full_parameter(item: &Value, file: &Path) -> PipewrightResult<TemplateParameter> {
    let entry = item
        .as_mapping()
        .ok_or_else(|| PipewrightError::InvalidTemplate {
            file: file.to_path_buf(),
            message: "every entry in the parameters list must be a mapping".to_string(),
        })?;

    let name = entry
        .get(&Value::from("name"))
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| PipewrightError::InvalidTemplate {
            file: file.to_path_buf(),
            message: "every parameter definition needs a non-empty name".to_string(),
        })?;

    let (inferred, default) = match entry.get(&Value::from("default")) {
        Some(value) if !value.is_null() => infer_from_literal(value),
        _ => (UNTYPED_INPUTS.to_string(), None),
    };

    let rust_type = match entry.get(&Value::from("type")).and_then(Value::as_str) {
        Some(keyword) => declared_type(keyword).to_string(),
        None => inferred,
    };

    Ok(TemplateParameter {
        name: name.to_string(),
        rust_type,
        default,
    })
}

/// Map a default value's literal form to a parameter type and a rendered
/// Rust default literal
fn infer_from_literal(value: &Value) -> (String, Option<String>) {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => {
            ("i32".to_string(), n.as_i64().map(|i| i.to_string()))
        }
        Value::Number(n) => ("f64".to_string(), n.as_f64().map(|f| format!("{f:?}"))),
        Value::Bool(b) => ("bool".to_string(), Some(b.to_string())),
        Value::String(s) if s == "true" || s == "false" => ("bool".to_string(), Some(s.clone())),
        Value::String(s) => ("String".to_string(), Some(format!("{s:?}"))),
        Value::Mapping(_) => (UNTYPED_INPUTS.to_string(), None),
        // Element type cannot be recovered from a bare list; flagged for
        // manual follow-up in the generated output
        Value::Sequence(_) => (format!("ConditionedList<{MISSING_TYPE}>"), None),
        _ => (MISSING_TYPE.to_string(), None),
    }
}

/// Fixed declared-type keyword table; unrecognized keywords fall back to
/// the untyped inputs type
fn declared_type(keyword: &str) -> &'static str {
    match keyword {
        "string" => "String",
        "number" => "i32",
        "boolean" => "bool",
        "object" => UNTYPED_INPUTS,
        "step" => "Conditioned<Step>",
        "stepList" => "ConditionedList<Step>",
        "job" => "Conditioned<Job>",
        "jobList" => "ConditionedList<Job>",
        "deployment" => "Conditioned<Deployment>",
        "deploymentList" => "ConditionedList<Deployment>",
        "stage" => "Conditioned<Stage>",
        "stageList" => "ConditionedList<Stage>",
        _ => UNTYPED_INPUTS,
    }
}

/// Required parameters come first so defaulted ones can surface as trailing
/// optional arguments; relative order within each group is preserved.
pub fn order_for_signature(parameters: Vec<TemplateParameter>) -> Vec<TemplateParameter> {
    let (required, defaulted): (Vec<_>, Vec<_>) = parameters
        .into_iter()
        .partition(|parameter| parameter.default.is_none());
    required.into_iter().chain(defaulted).collect()
}
