//! Workflow Data Model
//!
//! Core data structures for workflow documents, their jobs, and the runners
//! that may execute them. Only the parts needed to judge runner compatibility
//! and to read manual-dispatch inputs are modeled; everything else in a
//! workflow file is ignored.
//!
//! # Example YAML Format
//!
//! ```yaml
//! name: CI
//! on:
//!   push:
//!   workflow_dispatch:
//!     inputs:
//!       target:
//!         type: environment
//! jobs:
//!   build:
//!     runs-on: ubuntu-latest
//!   test:
//!     runs-on: [self-hosted, "${{ matrix.os }}"]
//!   deploy:
//!     runs-on:
//!       group: production
//!       labels: [linux]
//! ```

use serde::de::{self, Deserializer, Error as _};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use super::node::RawNode;

/// A single job inside a workflow document.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Job {
    /// Key of the job under `jobs:`
    #[serde(skip_deserializing)]
    pub id: String,

    /// Runner labels this job requires, in document order
    #[serde(rename = "runs-on", deserialize_with = "runs_on_labels", default)]
    pub runs_on: Vec<String>,
}

impl Job {
    /// Creates a job with no required labels.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            runs_on: Vec::new(),
        }
    }

    /// Appends a required runner label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.runs_on.push(label.into());
        self
    }

    /// Replaces the required runner labels.
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.runs_on = labels.into_iter().map(Into::into).collect();
        self
    }
}

/// A parsed workflow file.
///
/// `raw_on` is kept as an untyped YAML node because trigger configuration
/// has no schema this crate can rely on. It is filled in by
/// [`parse_workflow`](super::parser::parse_workflow) from the source text.
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct WorkflowDocument {
    /// Optional display name
    #[serde(default)]
    pub name: Option<String>,

    /// Raw trigger configuration (`on:`)
    #[serde(skip)]
    pub raw_on: RawNode,

    /// Jobs in the order they appear in the file
    #[serde(deserialize_with = "ordered_jobs", default)]
    pub jobs: Vec<Job>,
}

impl WorkflowDocument {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a document from a list of jobs.
    pub fn from_jobs(jobs: Vec<Job>) -> Self {
        Self {
            jobs,
            ..Self::default()
        }
    }

    /// Sets the raw trigger configuration.
    pub fn with_raw_on(mut self, raw_on: RawNode) -> Self {
        self.raw_on = raw_on;
        self
    }
}

/// A registered runner and the labels it advertises.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Runner {
    pub name: String,

    #[serde(default)]
    pub labels: Vec<String>,

    /// Offline or paused runners do not count towards compatibility
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

impl Runner {
    /// Creates an available runner with the given labels.
    pub fn new<I, S>(name: impl Into<String>, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            labels: labels.into_iter().map(Into::into).collect(),
            available: true,
        }
    }

    /// Marks the runner as unavailable.
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }
}

/// Top-level shape of a runner roster file.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct RunnerRoster {
    #[serde(default)]
    pub runners: Vec<Runner>,
}

/// Returns the textual form of a scalar YAML node.
///
/// Numbers are rendered from their parsed value, so `3.10` reads as `3.1`.
/// Only used for job ids and runner labels.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Reads a scalar or a sequence of scalars as a list of labels.
fn label_list(value: &Value) -> Result<Vec<String>, String> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Sequence(items) => items
            .iter()
            .map(|item| {
                scalar_text(item).ok_or_else(|| "Expected string in runs-on list".to_string())
            })
            .collect(),
        other => scalar_text(other)
            .map(|s| vec![s])
            .ok_or_else(|| "Expected string or list of strings for runs-on".to_string()),
    }
}

/// Deserializes every supported `runs-on` shape into an ordered label list.
///
/// The mapping form contributes its `labels` first, then `group` if set.
fn runs_on_labels<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let val = Value::deserialize(deserializer)?;
    match val {
        Value::Mapping(map) => {
            let mut labels = match map.get("labels") {
                Some(v) => label_list(v).map_err(D::Error::custom)?,
                None => Vec::new(),
            };
            if let Some(group) = map.get("group") {
                let group = match group {
                    Value::Null => String::new(),
                    other => scalar_text(other)
                        .ok_or_else(|| D::Error::custom("runs-on group must be a string"))?,
                };
                if !group.is_empty() {
                    labels.push(group);
                }
            }
            Ok(labels)
        }
        other => label_list(&other).map_err(de::Error::custom),
    }
}

/// Deserializes the `jobs:` mapping into a list that keeps document order.
fn ordered_jobs<'de, D>(deserializer: D) -> Result<Vec<Job>, D::Error>
where
    D: Deserializer<'de>,
{
    let val = Value::deserialize(deserializer)?;
    let map = match val {
        Value::Null => return Ok(Vec::new()),
        Value::Mapping(map) => map,
        _ => return Err(de::Error::custom("jobs must be a mapping of job id to job")),
    };

    map.into_iter()
        .map(|(key, value)| -> Result<Job, D::Error> {
            let id = scalar_text(&key).ok_or_else(|| D::Error::custom("job id must be a string"))?;
            let mut job: Job = match value {
                Value::Null => Job::default(),
                value @ Value::Mapping(_) => serde_yaml::from_value(value)
                    .map_err(|e| D::Error::custom(format!("job '{}': {}", id, e)))?,
                _ => return Err(D::Error::custom(format!("job '{}' must be a mapping", id))),
            };
            job.id = id;
            Ok(job)
        })
        .collect()
}
