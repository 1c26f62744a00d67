//! Workflow Inspection Module
//!
//! Provides data structures and checks for CI workflow files.
//!
//! # Structure
//!
//! - [`model`]: Core data structures (WorkflowDocument, Job, Runner)
//! - [`node`]: Untyped YAML tree that keeps scalar source text
//! - [`parser`]: YAML loading and workflow discovery
//! - [`labels`]: Union of labels offered by available runners
//! - [`compat`]: Runner compatibility check
//! - [`dispatch`]: Manual-dispatch input extraction
//! - [`listing`]: Per-workflow display records

pub mod compat;
pub mod dispatch;
pub mod labels;
pub mod listing;
pub mod model;
pub mod node;
pub mod parser;

pub use compat::{check_workflow, first_unmatched_label, is_expression};
pub use dispatch::{workflow_dispatch_inputs, DispatchInput, DispatchInputNode, InputKind};
pub use labels::LabelSet;
pub use listing::{
    build_listing, list_workflows, Listing, ListingOptions, WorkflowEntry, WorkflowStatus,
};
pub use model::{Job, Runner, RunnerRoster, WorkflowDocument};
pub use node::RawNode;
pub use parser::{discover_workflows, load_runners, load_workflow, parse_workflow};
