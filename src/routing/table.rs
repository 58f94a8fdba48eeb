// Ordered first-match-wins routing table

use tracing::{debug, trace};

use crate::error::TemplateError;
use crate::template::{MatchMode, UriTemplate};

/// A compiled template paired with the value returned when it matches.
#[derive(Debug, Clone)]
pub struct RoutingEntry<T> {
    template: UriTemplate,
    result: T,
}

impl<T> RoutingEntry<T> {
    pub fn template(&self) -> &UriTemplate {
        &self.template
    }

    pub fn result(&self) -> &T {
        &self.result
    }
}

/// Result of a successful lookup, bound to the template that matched so the
/// caller can extract parameters without recompiling.
#[derive(Debug)]
pub struct TemplateMatch<'a, T> {
    pub result: &'a T,
    pub template: &'a UriTemplate,
}

impl<T> Clone for TemplateMatch<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TemplateMatch<'_, T> {}

/// Immutable, ordered list of routing entries.
///
/// Lookup scans entries in insertion order and returns the first whose
/// template matches. There is no specificity ranking: callers add shorter,
/// more literal templates before general ones.
#[derive(Debug, Clone)]
pub struct RoutingTable<T> {
    entries: Box<[RoutingEntry<T>]>,
}

impl<T> RoutingTable<T> {
    pub fn builder() -> RoutingTableBuilder<T> {
        RoutingTableBuilder::new()
    }

    pub fn try_match(&self, uri: &str) -> Option<TemplateMatch<'_, T>> {
        self.try_match_with(uri, MatchMode::Unrooted)
    }

    pub fn try_match_with(&self, uri: &str, mode: MatchMode) -> Option<TemplateMatch<'_, T>> {
        let (index, entry) = self
            .entries
            .iter()
            .enumerate()
            .find(|(_, entry)| entry.template.is_match_with(uri, mode))?;

        trace!(uri, index, template = entry.template.as_str(), "routing table hit");
        Some(TemplateMatch {
            result: &entry.result,
            template: &entry.template,
        })
    }

    pub fn entries(&self) -> &[RoutingEntry<T>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Accumulates entries in the order they should be tried.
#[derive(Debug, Clone)]
pub struct RoutingTableBuilder<T> {
    entries: Vec<RoutingEntry<T>>,
}

impl<T> Default for RoutingTableBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RoutingTableBuilder<T> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Compile `template` and append it.
    pub fn add(&mut self, template: &str, result: T) -> Result<&mut Self, TemplateError> {
        let template = UriTemplate::compile(template)?;
        Ok(self.add_template(template, result))
    }

    /// Append an already compiled template.
    pub fn add_template(&mut self, template: UriTemplate, result: T) -> &mut Self {
        self.entries.push(RoutingEntry { template, result });
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Freeze into a table, consuming the builder.
    pub fn build(self) -> RoutingTable<T> {
        debug!(entries = self.entries.len(), "built routing table");
        RoutingTable {
            entries: self.entries.into_boxed_slice(),
        }
    }

    /// Freeze a copy of the current entries; the builder stays usable.
    pub fn to_table(&self) -> RoutingTable<T>
    where
        T: Clone,
    {
        self.clone().build()
    }
}
