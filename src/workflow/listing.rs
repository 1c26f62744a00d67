//! Workflow Listing
//!
//! Builds the display records for a repository's workflows: whether each
//! one can run on the registered runners, and the dispatch form of the
//! selected workflow.

use std::collections::HashSet;
use std::path::Path;

use log::{debug, info};
use serde::Serialize;

use crate::error::WorkflowError;

use super::compat::check_workflow;
use super::dispatch::{workflow_dispatch_inputs, DispatchInputNode};
use super::labels::LabelSet;
use super::model::WorkflowDocument;
use super::parser::load_workflow;

/// Display state of a single workflow.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WorkflowStatus {
    /// Every job can be picked up by some runner
    Ready,
    /// No available runner advertises this label
    NoMatchingRunner { label: String },
    /// The file could not be parsed
    Invalid { message: String },
}

/// One row of the workflow listing.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct WorkflowEntry {
    pub file_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(flatten)]
    pub status: WorkflowStatus,
}

/// Options controlling which workflow gets its dispatch form extracted.
#[derive(Debug, Clone, Default)]
pub struct ListingOptions {
    /// File name of the workflow selected for manual dispatch
    pub selected: Option<String>,

    /// File names of disabled workflows
    pub disabled: HashSet<String>,
}

impl ListingOptions {
    pub fn is_disabled(&self, file_name: &str) -> bool {
        self.disabled.contains(file_name)
    }
}

/// The complete listing of a repository's workflows.
#[derive(Serialize, Debug, Clone, Default)]
pub struct Listing {
    pub entries: Vec<WorkflowEntry>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<String>,

    pub selected_disabled: bool,

    /// Inputs of the selected workflow, if it accepts manual dispatch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dispatch_inputs: Option<Vec<DispatchInputNode>>,
}

impl Listing {
    /// Number of workflows that can run as-is.
    pub fn ready_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.status == WorkflowStatus::Ready)
            .count()
    }
}

/// Computes the display state of a parsed workflow.
pub fn workflow_status(workflow: &WorkflowDocument, labels: &LabelSet) -> WorkflowStatus {
    match check_workflow(workflow, labels) {
        Some(label) => WorkflowStatus::NoMatchingRunner { label },
        None => WorkflowStatus::Ready,
    }
}

/// Builds the listing from already loaded workflow files.
///
/// Files keep the order they are given in. A file that failed to load is
/// listed as invalid and never checked against the runners.
pub fn build_listing(
    files: &[(String, Result<WorkflowDocument, WorkflowError>)],
    labels: &LabelSet,
    options: &ListingOptions,
) -> Listing {
    let mut listing = Listing {
        entries: Vec::with_capacity(files.len()),
        selected: options.selected.clone(),
        ..Listing::default()
    };
    let mut current: Option<&WorkflowDocument> = None;

    for (file_name, loaded) in files {
        let entry = match loaded {
            Ok(workflow) => {
                if options.selected.as_deref() == Some(file_name.as_str()) {
                    current = Some(workflow);
                }
                WorkflowEntry {
                    file_name: file_name.clone(),
                    name: workflow.name.clone(),
                    status: workflow_status(workflow, labels),
                }
            }
            Err(e) => WorkflowEntry {
                file_name: file_name.clone(),
                name: None,
                status: WorkflowStatus::Invalid {
                    message: e.to_string(),
                },
            },
        };
        debug!("{}: {:?}", entry.file_name, entry.status);
        listing.entries.push(entry);
    }

    if let Some(selected) = options.selected.as_deref() {
        listing.selected_disabled = options.is_disabled(selected);
        if listing.selected_disabled {
            info!("Workflow '{}' is disabled, skipping dispatch inputs", selected);
        } else if let Some(workflow) = current {
            listing.dispatch_inputs = workflow_dispatch_inputs(&workflow.raw_on);
        }
    }

    info!(
        "Listed {} workflows, {} ready",
        listing.entries.len(),
        listing.ready_count()
    );
    listing
}

/// Loads every workflow file and builds the listing.
///
/// Entries are keyed by file name, the same key used for selection and
/// for disabling workflows.
pub fn list_workflows<P: AsRef<Path>>(
    paths: &[P],
    labels: &LabelSet,
    options: &ListingOptions,
) -> Listing {
    let files: Vec<_> = paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            (file_name, load_workflow(path))
        })
        .collect();

    build_listing(&files, labels, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::dispatch::InputKind;
    use crate::workflow::parser::parse_workflow;
    use tempfile::tempdir;

    const DISPATCH: &str = r#"
name: Deploy
on:
  workflow_dispatch:
    inputs:
      target:
        type: environment
      verbose:
        type: boolean
jobs:
  deploy:
    runs-on: production
"#;

    const BUILD: &str = "on: push\njobs:\n  build:\n    runs-on: linux\n";

    fn files() -> Vec<(String, Result<WorkflowDocument, WorkflowError>)> {
        vec![
            ("build.yml".to_string(), parse_workflow(BUILD)),
            ("broken.yml".to_string(), parse_workflow("jobs: [")),
            ("deploy.yml".to_string(), parse_workflow(DISPATCH)),
        ]
    }

    fn labels() -> LabelSet {
        ["linux"].into_iter().collect()
    }

    #[test]
    fn test_statuses_in_file_order() {
        let listing = build_listing(&files(), &labels(), &ListingOptions::default());

        let names: Vec<_> = listing.entries.iter().map(|e| e.file_name.as_str()).collect();
        assert_eq!(names, vec!["build.yml", "broken.yml", "deploy.yml"]);

        assert_eq!(listing.entries[0].status, WorkflowStatus::Ready);
        assert!(matches!(listing.entries[1].status, WorkflowStatus::Invalid { .. }));
        assert_eq!(
            listing.entries[2].status,
            WorkflowStatus::NoMatchingRunner {
                label: "production".to_string()
            }
        );
        assert_eq!(listing.entries[2].name.as_deref(), Some("Deploy"));
        assert_eq!(listing.ready_count(), 1);
    }

    #[test]
    fn test_no_selection_no_inputs() {
        let listing = build_listing(&files(), &labels(), &ListingOptions::default());
        assert!(listing.dispatch_inputs.is_none());
        assert!(listing.selected.is_none());
    }

    #[test]
    fn test_selected_workflow_inputs() {
        let options = ListingOptions {
            selected: Some("deploy.yml".to_string()),
            ..ListingOptions::default()
        };
        let listing = build_listing(&files(), &labels(), &options);

        let inputs = listing.dispatch_inputs.unwrap();
        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[0].key, "target");
        assert_eq!(inputs[0].value.kind, InputKind::Environment);
        assert_eq!(inputs[1].value.kind, InputKind::Boolean);
    }

    #[test]
    fn test_selected_without_dispatch_trigger() {
        let options = ListingOptions {
            selected: Some("build.yml".to_string()),
            ..ListingOptions::default()
        };
        let listing = build_listing(&files(), &labels(), &options);
        assert!(listing.dispatch_inputs.is_none());
        assert!(!listing.selected_disabled);
    }

    #[test]
    fn test_selected_invalid_workflow() {
        let options = ListingOptions {
            selected: Some("broken.yml".to_string()),
            ..ListingOptions::default()
        };
        let listing = build_listing(&files(), &labels(), &options);
        assert!(listing.dispatch_inputs.is_none());
    }

    #[test]
    fn test_disabled_selected_workflow_skips_inputs() {
        let options = ListingOptions {
            selected: Some("deploy.yml".to_string()),
            disabled: ["deploy.yml".to_string()].into_iter().collect(),
        };
        let listing = build_listing(&files(), &labels(), &options);
        assert!(listing.selected_disabled);
        assert!(listing.dispatch_inputs.is_none());
    }

    #[test]
    fn test_list_workflows_from_disk() {
        let temp_dir = tempdir().unwrap();
        let good = temp_dir.path().join("build.yml");
        let bad = temp_dir.path().join("bad.yml");
        std::fs::write(&good, BUILD).unwrap();
        std::fs::write(&bad, "- not\n- a mapping\n").unwrap();

        let listing = list_workflows(&[&good, &bad], &labels(), &ListingOptions::default());
        let status = |name: &str| {
            let entry = listing.entries.iter().find(|e| e.file_name == name).unwrap();
            entry.status.clone()
        };
        assert_eq!(status("build.yml"), WorkflowStatus::Ready);
        assert!(matches!(
            status("bad.yml"),
            WorkflowStatus::Invalid { .. }
        ));
    }

    #[test]
    fn test_listing_json_shape() {
        let options = ListingOptions {
            selected: Some("deploy.yml".to_string()),
            ..ListingOptions::default()
        };
        let listing = build_listing(&files(), &labels(), &options);
        let json = serde_json::to_value(&listing).unwrap();

        assert_eq!(json["entries"][0]["status"], "ready");
        assert_eq!(json["entries"][2]["status"], "no_matching_runner");
        assert_eq!(json["entries"][2]["label"], "production");
        assert_eq!(json["dispatch_inputs"][0]["key"], "target");
    }
}
