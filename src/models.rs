//! Template reference model
//!
//! The minimal typed surface generated template APIs compile against:
//! `Template<C>` reference values plus the wrapper types the declared-type
//! keywords of a template map onto.

use std::marker::PhantomData;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_yaml_ng::{Mapping, Value};

use crate::error::PipewrightResult;

/// Marker for stage-producing templates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stage;

/// Marker for job-producing templates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Job;

/// Marker for deployment-job-producing templates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deployment;

/// Marker for step-producing templates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step;

/// Marker for variable-producing templates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variable;

/// A single value forwarded to a template parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter(Value);

impl From<i32> for Parameter {
    fn from(value: i32) -> Self {
        Parameter(Value::from(value))
    }
}

impl From<f64> for Parameter {
    fn from(value: f64) -> Self {
        Parameter(Value::from(value))
    }
}

impl From<bool> for Parameter {
    fn from(value: bool) -> Self {
        Parameter(Value::from(value))
    }
}

impl From<&str> for Parameter {
    fn from(value: &str) -> Self {
        Parameter(Value::from(value))
    }
}

impl From<String> for Parameter {
    fn from(value: String) -> Self {
        Parameter(Value::from(value))
    }
}

impl From<Value> for Parameter {
    fn from(value: Value) -> Self {
        Parameter(value)
    }
}

/// Free-form name -> value inputs for parameters with no stronger type
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct TaskInputs(pub Mapping);

impl TaskInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion
    pub fn input(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.0.insert(Value::from(name), value.into());
        self
    }
}

impl From<TaskInputs> for Parameter {
    fn from(inputs: TaskInputs) -> Self {
        Parameter(Value::Mapping(inputs.0))
    }
}

/// A single item that may sit under a template expression condition
///
/// The item is captured as its serialized document graph so it can be
/// forwarded into a parameter map without re-serializing later.
#[derive(Debug, Clone, PartialEq)]
pub struct Conditioned<T> {
    value: Value,
    _kind: PhantomData<T>,
}

impl<T: Serialize> Conditioned<T> {
    pub fn new(item: T) -> PipewrightResult<Self> {
        Ok(Self {
            value: serde_yaml_ng::to_value(item)?,
            _kind: PhantomData,
        })
    }
}

impl<T> From<Conditioned<T>> for Parameter {
    fn from(conditioned: Conditioned<T>) -> Self {
        Parameter(conditioned.value)
    }
}

/// A list of conditioned items
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionedList<T> {
    values: Vec<Value>,
    _kind: PhantomData<T>,
}

impl<T> Default for ConditionedList<T> {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            _kind: PhantomData,
        }
    }
}

impl<T: Serialize> ConditionedList<T> {
    pub fn new(items: impl IntoIterator<Item = T>) -> PipewrightResult<Self> {
        let mut values = Vec::new();
        for item in items {
            values.push(serde_yaml_ng::to_value(item)?);
        }
        Ok(Self {
            values,
            _kind: PhantomData,
        })
    }
}

impl<T> From<ConditionedList<T>> for Parameter {
    fn from(list: ConditionedList<T>) -> Self {
        Parameter(Value::Sequence(list.values))
    }
}

/// A reference to a YAML template checked in at a repository-relative path
///
/// Serializes as the `template:` document node Azure DevOps expects, with
/// the parameter map omitted when empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Template<C> {
    template: String,
    parameters: Vec<(String, Parameter)>,
    _category: PhantomData<C>,
}

impl<C> Template<C> {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            template: path.into(),
            parameters: Vec::new(),
            _category: PhantomData,
        }
    }

    pub fn with_parameters<'a>(
        path: impl Into<String>,
        parameters: impl IntoIterator<Item = (&'a str, Parameter)>,
    ) -> Self {
        Self {
            template: path.into(),
            parameters: parameters
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
            _category: PhantomData,
        }
    }

    pub fn path(&self) -> &str {
        &self.template
    }

    pub fn parameters(&self) -> &[(String, Parameter)] {
        &self.parameters
    }
}

impl<C> Serialize for Template<C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("template", &self.template)?;
        if !self.parameters.is_empty() {
            let mut parameters = Mapping::new();
            for (name, value) in &self.parameters {
                parameters.insert(Value::from(name.as_str()), value.0.clone());
            }
            map.serialize_entry("parameters", &parameters)?;
        }
        map.end()
    }
}
