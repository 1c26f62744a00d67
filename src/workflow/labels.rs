//! Runner Label Set
//!
//! The union of labels advertised by every runner that can currently pick
//! up jobs. Built once per listing and discarded afterwards.

use std::collections::HashSet;

use log::debug;

use super::model::Runner;

/// Set of case-sensitive runner labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSet {
    labels: HashSet<String>,
}

impl LabelSet {
    /// Creates an empty label set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the labels of all available runners.
    pub fn from_runners<'a, I>(runners: I) -> Self
    where
        I: IntoIterator<Item = &'a Runner>,
    {
        let mut set = Self::new();
        for runner in runners {
            if !runner.available {
                debug!("Runner '{}' is unavailable, ignoring its labels", runner.name);
                continue;
            }
            set.add_multiple(runner.labels.iter().cloned());
        }
        set
    }

    /// Adds a single label.
    pub fn add(&mut self, label: impl Into<String>) {
        self.labels.insert(label.into());
    }

    /// Adds every label from an iterator.
    pub fn add_multiple<I, S>(&mut self, labels: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels.extend(labels.into_iter().map(Into::into));
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterates over the labels in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    /// Returns the labels sorted, for stable display.
    pub fn sorted(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.iter().collect();
        labels.sort_unstable();
        labels
    }
}

impl<S: Into<String>> FromIterator<S> for LabelSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        set.add_multiple(iter);
        set
    }
}
