//! Manual Dispatch Inputs
//!
//! Reads the inputs a `workflow_dispatch` trigger declares so a form can be
//! rendered for them. Trigger configuration is user-authored and follows no
//! enforced schema, so every level is checked separately. Any problem
//! yields `None` and a log line; a partial list is never returned.
//!
//! # Example YAML Format
//!
//! ```yaml
//! on:
//!   workflow_dispatch:
//!     inputs:
//!       logLevel:
//!         description: Log level
//!         required: true
//!         default: warning
//!         type: choice
//!         options: [info, warning, debug]
//!       dryRun:
//!         type: boolean
//!         default: false
//!       target:
//!         type: environment
//! ```

use log::{debug, error};
use serde::Serialize;

use super::node::RawNode;

/// Trigger key for manual dispatch.
pub const WORKFLOW_DISPATCH_KEY: &str = "workflow_dispatch";

/// Key holding input declarations under the dispatch trigger.
pub const INPUTS_KEY: &str = "inputs";

/// Kind of value a dispatch input accepts.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    #[default]
    String,
    Choice,
    Boolean,
    Environment,
}

impl InputKind {
    /// Parse an input kind from its `type:` tag.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "string" => Some(Self::String),
            "choice" => Some(Self::Choice),
            "boolean" => Some(Self::Boolean),
            "environment" => Some(Self::Environment),
            _ => None,
        }
    }
}

/// Definition of a single manual-dispatch input.
///
/// Scalars are kept exactly as written, so `default: 1.20` stays `"1.20"`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct DispatchInput {
    #[serde(rename = "type")]
    pub kind: InputKind,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub required: bool,

    /// Allowed values of a choice input, in declaration order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl DispatchInput {
    pub fn new(kind: InputKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }
}

/// A named input, as it appeared under `inputs:`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DispatchInputNode {
    pub key: String,
    pub value: DispatchInput,
}

/// Reads an optional scalar field.
fn optional_text(field: &str, value: &RawNode) -> Result<Option<String>, String> {
    match value {
        RawNode::Null => Ok(None),
        RawNode::Scalar(text) => Ok(Some(text.clone())),
        other => Err(format!("'{}' must be a scalar, found a {}", field, other.kind_name())),
    }
}

/// Reads a YAML boolean; a missing value is false.
fn parse_bool(field: &str, value: &RawNode) -> Result<bool, String> {
    match value.as_scalar() {
        _ if value.is_null() => Ok(false),
        Some("true" | "True" | "TRUE") => Ok(true),
        Some("false" | "False" | "FALSE") => Ok(false),
        _ => Err(format!("'{}' must be true or false", field)),
    }
}

/// Reads a sequence of scalars, keeping order.
fn text_list(field: &str, value: &RawNode) -> Result<Vec<String>, String> {
    match value {
        RawNode::Null => Ok(Vec::new()),
        RawNode::Sequence(items) => items
            .iter()
            .map(|item| {
                item.as_scalar()
                    .map(str::to_string)
                    .ok_or_else(|| format!("'{}' must only contain scalars", field))
            })
            .collect(),
        other => Err(format!("'{}' must be a list, found a {}", field, other.kind_name())),
    }
}

/// Decodes one input definition. Unrecognised fields are ignored.
fn decode_input(value: &RawNode) -> Result<DispatchInput, String> {
    let entries = match value {
        RawNode::Null => return Ok(DispatchInput::default()),
        RawNode::Mapping(entries) => entries,
        other => return Err(format!("expected a mapping, found a {}", other.kind_name())),
    };

    let mut input = DispatchInput::default();
    for (field, value) in entries {
        match field.as_scalar() {
            Some("type") => {
                input.kind = match optional_text("type", value)? {
                    None => InputKind::default(),
                    Some(tag) => InputKind::from_str(&tag)
                        .ok_or_else(|| format!("unknown input type '{}'", tag))?,
                }
            }
            Some("default") => input.default = optional_text("default", value)?,
            Some("description") => input.description = optional_text("description", value)?,
            Some("required") => input.required = parse_bool("required", value)?,
            Some("options") => input.options = text_list("options", value)?,
            _ => {}
        }
    }
    Ok(input)
}

/// Looks up a mapping-valued entry, logging why it is unusable if not.
fn mapping_entry<'a>(node: &'a RawNode, key: &str) -> Option<&'a RawNode> {
    match node.get(key) {
        Some(value @ RawNode::Mapping(_)) => Some(value),
        Some(other) => {
            error!("Failed to decode '{}' as a mapping: found a {}", key, other.kind_name());
            None
        }
        None => {
            debug!("No '{}' key present", key);
            None
        }
    }
}

/// Extracts the manual-dispatch inputs from a workflow's raw `on:` node.
///
/// Returns `None` if the workflow has no usable `workflow_dispatch.inputs`
/// mapping or if any single input fails to decode. On success the inputs
/// are in the order they were written; an empty `inputs` mapping yields an
/// empty list.
///
/// # Example
///
/// ```
/// use actionscope::workflow::{workflow_dispatch_inputs, InputKind, RawNode};
///
/// let yaml = r#"
/// workflow_dispatch:
///   inputs:
///     name:
///       default: x
///     env:
///       type: environment
/// "#;
/// let on = RawNode::parse(yaml).unwrap();
///
/// let inputs = workflow_dispatch_inputs(&on).unwrap();
/// assert_eq!(inputs[0].key, "name");
/// assert_eq!(inputs[1].value.kind, InputKind::Environment);
/// ```
pub fn workflow_dispatch_inputs(raw_on: &RawNode) -> Option<Vec<DispatchInputNode>> {
    if !raw_on.is_mapping() {
        debug!("Trigger configuration is not a mapping: found a {}", raw_on.kind_name());
        return None;
    }

    let dispatch = mapping_entry(raw_on, WORKFLOW_DISPATCH_KEY)?;

    let inputs: &[(RawNode, RawNode)] = match dispatch.get(INPUTS_KEY) {
        Some(RawNode::Null) => &[],
        _ => mapping_entry(dispatch, INPUTS_KEY)?.as_mapping()?,
    };

    let mut nodes = Vec::with_capacity(inputs.len());
    for (key, value) in inputs {
        let Some(key) = key.as_scalar() else {
            error!("Failed to decode dispatch input key: found a {}", key.kind_name());
            return None;
        };
        let input = match decode_input(value) {
            Ok(input) => input,
            Err(e) => {
                error!("Failed to decode dispatch input '{}': {}", key, e);
                return None;
            }
        };
        nodes.push(DispatchInputNode {
            key: key.to_string(),
            value: input,
        });
    }

    debug!("Found {} dispatch inputs", nodes.len());
    Some(nodes)
}
