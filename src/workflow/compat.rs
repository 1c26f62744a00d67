//! Runner Compatibility Check
//!
//! Decides whether every job of a workflow could be picked up by some
//! available runner. The answer is a display hint only: the first label
//! nobody advertises is reported and the rest of the workflow is not
//! examined.

use log::debug;

use super::labels::LabelSet;
use super::model::{Job, WorkflowDocument};

/// Marker that opens an expression evaluated only when the job runs.
pub const EXPRESSION_MARKER: &str = "${{";

/// Returns true if the label contains an unresolved expression.
pub fn is_expression(label: &str) -> bool {
    label.contains(EXPRESSION_MARKER)
}

/// Finds the first required label that no available runner advertises.
///
/// Jobs are checked in document order, and labels in the order each job
/// lists them. Labels holding an expression are always treated as
/// satisfiable since they cannot be evaluated here.
///
/// # Example
///
/// ```
/// use actionscope::workflow::{first_unmatched_label, Job, LabelSet};
///
/// let labels: LabelSet = ["ubuntu-latest"].into_iter().collect();
/// let jobs = vec![
///     Job::new("build").with_label("ubuntu-latest"),
///     Job::new("test").with_labels(["${{ matrix.os }}", "gpu", "arm64"]),
/// ];
///
/// assert_eq!(first_unmatched_label(&jobs, &labels).as_deref(), Some("gpu"));
/// ```
pub fn first_unmatched_label(jobs: &[Job], labels: &LabelSet) -> Option<String> {
    for job in jobs {
        for label in &job.runs_on {
            if is_expression(label) {
                continue;
            }
            if !labels.contains(label) {
                debug!("Job '{}' requires label '{}' which no runner offers", job.id, label);
                return Some(label.clone());
            }
        }
    }
    None
}

/// Runs [`first_unmatched_label`] over all jobs of a document.
pub fn check_workflow(workflow: &WorkflowDocument, labels: &LabelSet) -> Option<String> {
    first_unmatched_label(&workflow.jobs, labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label_set(labels: &[&str]) -> LabelSet {
        labels.iter().copied().collect()
    }

    #[test]
    fn test_all_labels_present() {
        let jobs = vec![
            Job::new("a").with_labels(["linux", "x64"]),
            Job::new("b").with_label("x64"),
        ];
        assert_eq!(first_unmatched_label(&jobs, &label_set(&["linux", "x64"])), None);
    }

    #[test]
    fn test_missing_label_reported() {
        let jobs = vec![Job::new("a").with_labels(["linux", "gpu"])];
        assert_eq!(
            first_unmatched_label(&jobs, &label_set(&["linux"])).as_deref(),
            Some("gpu")
        );
    }

    #[test]
    fn test_first_missing_in_job_then_label_order() {
        let jobs = vec![
            Job::new("first").with_labels(["linux", "missing-1", "missing-2"]),
            Job::new("second").with_label("missing-0"),
        ];
        assert_eq!(
            first_unmatched_label(&jobs, &label_set(&["linux"])).as_deref(),
            Some("missing-1")
        );
    }

    #[test]
    fn test_later_job_reported_when_earlier_ok() {
        let jobs = vec![
            Job::new("ok").with_label("linux"),
            Job::new("bad").with_labels(["windows", "macos"]),
        ];
        assert_eq!(
            first_unmatched_label(&jobs, &label_set(&["linux"])).as_deref(),
            Some("windows")
        );
    }

    #[test]
    fn test_expressions_never_block() {
        let jobs = vec![
            Job::new("matrix").with_labels(["${{ matrix.os }}", "prefix-${{ inputs.arch }}"]),
        ];
        assert_eq!(first_unmatched_label(&jobs, &LabelSet::new()), None);
    }

    #[test]
    fn test_expression_skipped_before_missing_label() {
        let jobs = vec![Job::new("j").with_labels(["${{ matrix.os }}", "arm64"])];
        assert_eq!(
            first_unmatched_label(&jobs, &LabelSet::new()).as_deref(),
            Some("arm64")
        );
    }

    #[test]
    fn test_job_without_labels_is_compatible() {
        let jobs = vec![Job::new("empty")];
        assert_eq!(first_unmatched_label(&jobs, &LabelSet::new()), None);
        assert_eq!(first_unmatched_label(&[], &LabelSet::new()), None);
    }

    #[test]
    fn test_empty_label_set_blocks_concrete_label() {
        let jobs = vec![Job::new("j").with_label("ubuntu-latest")];
        assert_eq!(
            first_unmatched_label(&jobs, &LabelSet::new()).as_deref(),
            Some("ubuntu-latest")
        );
    }

    #[test]
    fn test_case_sensitive_match() {
        let jobs = vec![Job::new("j").with_label("Linux")];
        assert_eq!(
            first_unmatched_label(&jobs, &label_set(&["linux"])).as_deref(),
            Some("Linux")
        );
    }

    #[test]
    fn test_deterministic() {
        let jobs = vec![
            Job::new("a").with_labels(["x", "y"]),
            Job::new("b").with_label("z"),
        ];
        let labels = label_set(&["x"]);
        let first = first_unmatched_label(&jobs, &labels);
        let second = first_unmatched_label(&jobs, &labels);
        assert_eq!(first, second);
        assert_eq!(first.as_deref(), Some("y"));
    }

    #[test]
    fn test_check_workflow_uses_document_jobs() {
        let doc = WorkflowDocument::from_jobs(vec![Job::new("j").with_label("self-hosted")]);
        assert_eq!(
            check_workflow(&doc, &LabelSet::new()).as_deref(),
            Some("self-hosted")
        );
        assert_eq!(check_workflow(&doc, &label_set(&["self-hosted"])), None);
    }

    #[test]
    fn test_is_expression() {
        assert!(is_expression("${{ matrix.os }}"));
        assert!(!is_expression("$ { { not one"));
        assert!(!is_expression("ubuntu-latest"));
    }
}
