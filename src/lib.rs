//! actionscope - Workflow Runner Compatibility Inspector
//!
//! Lists the CI workflow files of a repository and reports, for display,
//! whether each one can run on the currently registered runners and which
//! inputs a manually dispatched workflow accepts.
//!
//! # Architecture
//!
//! - [`workflow`]: Workflow model, loading, compatibility and dispatch inputs
//! - [`error`]: Errors raised while reading workflow and roster files
//!
//! # Example
//!
//! ```rust,no_run
//! use actionscope::workflow::{discover_workflows, list_workflows, load_runners};
//! use actionscope::{LabelSet, ListingOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let runners = load_runners("runners.yaml")?;
//!     let labels = LabelSet::from_runners(&runners);
//!
//!     let files = discover_workflows(".")?;
//!     let listing = list_workflows(&files, &labels, &ListingOptions::default());
//!
//!     for entry in &listing.entries {
//!         println!("{}: {:?}", entry.file_name, entry.status);
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod workflow;

// Re-export commonly used types
pub use error::WorkflowError;
pub use workflow::labels::LabelSet;
pub use workflow::listing::{Listing, ListingOptions, WorkflowStatus};
pub use workflow::model::{Job, WorkflowDocument};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "actionscope";
