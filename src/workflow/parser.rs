//! Workflow Loading
//!
//! Reads workflow files and runner rosters from disk, and finds the
//! workflow files of a repository checkout.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde_yaml::Value;

use crate::error::{Result, WorkflowError};

use super::model::{Runner, RunnerRoster, WorkflowDocument};
use super::node::RawNode;

/// Directories searched for workflow files, in order of preference.
pub const WORKFLOW_DIRS: &[&str] = &[".gitea/workflows", ".github/workflows"];

/// File extensions recognised as workflow files.
const WORKFLOW_EXTENSIONS: &[&str] = &["yml", "yaml"];

/// Parses workflow YAML text into a document.
///
/// Only the top-level shape is checked: the document must be a mapping,
/// and `jobs`, if present, must map job ids to job definitions. The `on:`
/// node is read separately so its scalars keep their source text.
pub fn parse_workflow(content: &str) -> Result<WorkflowDocument> {
    let value: Value = serde_yaml::from_str(content)?;

    if !value.is_mapping() {
        return Err(WorkflowError::InvalidStructure(
            "workflow must be a mapping at the top level".to_string(),
        ));
    }

    let mut workflow: WorkflowDocument = serde_yaml::from_value(value)?;
    workflow.raw_on = RawNode::parse(content)?
        .get("on")
        .cloned()
        .unwrap_or_default();

    debug!(
        "Parsed workflow {:?} with {} jobs",
        workflow.name.as_deref().unwrap_or("<unnamed>"),
        workflow.jobs.len()
    );

    Ok(workflow)
}

/// Loads and parses a workflow file.
///
/// # Example
///
/// ```rust,no_run
/// use actionscope::workflow::load_workflow;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let workflow = load_workflow(".gitea/workflows/ci.yml")?;
///     println!("Loaded {} jobs", workflow.jobs.len());
///     Ok(())
/// }
/// ```
pub fn load_workflow(path: impl AsRef<Path>) -> Result<WorkflowDocument> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| WorkflowError::io(path, e))?;

    debug!("Read {} ({} bytes)", path.display(), content.len());

    parse_workflow(&content)
}

/// Returns true if the path has a workflow file extension.
fn is_workflow_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| WORKFLOW_EXTENSIONS.contains(&e))
        .unwrap_or(false)
}

/// Finds the workflow files of a repository checkout.
///
/// The first of [`WORKFLOW_DIRS`] that exists is used. Files are sorted
/// by name. A repository without a workflow directory has no workflows.
pub fn discover_workflows(repo_root: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let repo_root = repo_root.as_ref();

    let Some(dir) = WORKFLOW_DIRS
        .iter()
        .map(|d| repo_root.join(d))
        .find(|d| d.is_dir())
    else {
        info!("No workflow directory found under {}", repo_root.display());
        return Ok(Vec::new());
    };

    let entries = fs::read_dir(&dir).map_err(|e| WorkflowError::io(&dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| WorkflowError::io(&dir, e))?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        if !is_workflow_file(&path) {
            warn!("Skipping non-workflow file: {}", path.display());
            continue;
        }
        files.push(path);
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    info!("Found {} workflow files in {}", files.len(), dir.display());
    Ok(files)
}

/// Loads a runner roster file.
///
/// ```yaml
/// runners:
///   - name: linux-1
///     labels: [ubuntu-latest, self-hosted]
///   - name: offline-box
///     labels: [windows-latest]
///     available: false
/// ```
pub fn load_runners(path: impl AsRef<Path>) -> Result<Vec<Runner>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| WorkflowError::io(path, e))?;

    let roster: RunnerRoster = serde_yaml::from_str(&content)?;

    info!(
        "Loaded {} runners from {}",
        roster.runners.len(),
        path.display()
    );
    Ok(roster.runners)
}
