// Two-stage routing table keyed by a secondary value such as an HTTP verb

use std::borrow::Borrow;

use tracing::{debug, trace};

use crate::error::TemplateError;
use crate::template::{MatchMode, UriTemplate};

use super::table::TemplateMatch;

/// One registration. `template` indexes the table's distinct templates.
#[derive(Debug, Clone)]
struct KeyedEntry<K, T> {
    template: usize,
    key: K,
    result: T,
}

/// Routing table that matches the template first, then requires the key to
/// be equal.
///
/// Entries are tried in insertion order, so lookup stays first-match-wins.
/// Identical template text is compiled once and shared by its entries.
#[derive(Debug, Clone)]
pub struct KeyedRoutingTable<K, T> {
    templates: Box<[UriTemplate]>,
    entries: Box<[KeyedEntry<K, T>]>,
}

impl<K, T> KeyedRoutingTable<K, T> {
    pub fn builder() -> KeyedRoutingTableBuilder<K, T> {
        KeyedRoutingTableBuilder::new()
    }

    pub fn try_match<Q>(&self, uri: &str, key: &Q) -> Option<TemplateMatch<'_, T>>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.try_match_with(uri, key, MatchMode::Unrooted)
    }

    /// Rooted mode keeps a candidate from matching a template that only
    /// fits a suffix of it, e.g. a mounted sub-router's path.
    pub fn try_match_with<Q>(&self, uri: &str, key: &Q, mode: MatchMode) -> Option<TemplateMatch<'_, T>>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        // Each distinct template is matched at most once per lookup
        let mut matched: Vec<Option<bool>> = vec![None; self.templates.len()];

        for entry in self.entries.iter() {
            if <K as Borrow<Q>>::borrow(&entry.key) != key {
                continue;
            }

            let template = &self.templates[entry.template];
            let is_match = *matched[entry.template]
                .get_or_insert_with(|| template.is_match_with(uri, mode));
            if is_match {
                trace!(uri, template = template.as_str(), "keyed routing table hit");
                return Some(TemplateMatch {
                    result: &entry.result,
                    template,
                });
            }
        }

        None
    }

    /// Number of distinct templates
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of `(template, key, result)` registrations
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

#[derive(Debug, Clone)]
pub struct KeyedRoutingTableBuilder<K, T> {
    templates: Vec<UriTemplate>,
    entries: Vec<KeyedEntry<K, T>>,
}

impl<K, T> Default for KeyedRoutingTableBuilder<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, T> KeyedRoutingTableBuilder<K, T> {
    pub fn new() -> Self {
        Self {
            templates: Vec::new(),
            entries: Vec::new(),
        }
    }

    /// Register `result` for `template` under `key`. Repeated template text
    /// reuses the compiled template instead of compiling it again.
    pub fn add(&mut self, template: &str, key: K, result: T) -> Result<&mut Self, TemplateError> {
        let index = match self.template_index(template) {
            Some(index) => index,
            None => {
                self.templates.push(UriTemplate::compile(template)?);
                self.templates.len() - 1
            }
        };
        Ok(self.push(index, key, result))
    }

    pub fn add_template(&mut self, template: UriTemplate, key: K, result: T) -> &mut Self {
        let index = match self.template_index(template.as_str()) {
            Some(index) => index,
            None => {
                self.templates.push(template);
                self.templates.len() - 1
            }
        };
        self.push(index, key, result)
    }

    fn template_index(&self, text: &str) -> Option<usize> {
        self.templates.iter().position(|t| t.as_str() == text)
    }

    fn push(&mut self, template: usize, key: K, result: T) -> &mut Self {
        self.entries.push(KeyedEntry { template, key, result });
        self
    }

    /// Number of distinct templates added so far
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn build(self) -> KeyedRoutingTable<K, T> {
        debug!(
            templates = self.templates.len(),
            entries = self.entries.len(),
            "built keyed routing table"
        );
        KeyedRoutingTable {
            templates: self.templates.into_boxed_slice(),
            entries: self.entries.into_boxed_slice(),
        }
    }

    pub fn to_table(&self) -> KeyedRoutingTable<K, T>
    where
        K: Clone,
        T: Clone,
    {
        self.clone().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verb_table() -> KeyedRoutingTable<&'static str, &'static str> {
        let mut builder = KeyedRoutingTableBuilder::new();
        let routes = [
            ("/", "GET", "root_get"),
            ("/", "PUT", "root_put"),
            ("/foo/{bar}", "GET", "foo_get"),
            ("/foo/{bar}", "PUT", "foo_put"),
            ("/baz/kit", "GET", "kit_get"),
            ("/baz/kit", "PUT", "kit_put"),
            ("/baz/{bar}", "GET", "baz_get"),
            ("/baz/{bar}", "PUT", "baz_put"),
            ("/baz/{bar}/blob", "GET", "blob_get"),
            ("/baz/{bar}/blob", "PUT", "blob_put"),
            ("/{goo}/{bar}/blob", "GET", "goo_get"),
            ("/{goo}/{bar}/blob", "PUT", "goo_put"),
            ("foo/{goo}/{bar}/blob", "PUT", "foo_prefix_goo_put"),
        ];
        for (template, verb, result) in routes {
            builder.add(template, verb, result).unwrap();
        }
        builder.build()
    }

    #[test]
    fn test_counts_distinct_templates() {
        let table = verb_table();
        assert_eq!(table.len(), 7);
        assert_eq!(table.entry_count(), 13);
    }

    #[test]
    fn test_key_selects_result() {
        let table = verb_table();
        assert_eq!(table.try_match("/", "GET").map(|m| *m.result), Some("root_get"));
        assert_eq!(table.try_match("/", "PUT").map(|m| *m.result), Some("root_put"));
        assert_eq!(table.try_match("/baz/kit", "PUT").map(|m| *m.result), Some("kit_put"));
        assert!(table.try_match("/baz/kit", "DELETE").is_none());
    }

    #[test]
    fn test_insertion_order_holds_across_templates() {
        let mut builder = KeyedRoutingTableBuilder::new();
        builder.add("/a/{x}", "GET", "a_get").unwrap();
        builder.add("/{y}/{x}", "PUT", "any_put").unwrap();
        builder.add("/a/{x}", "PUT", "a_put").unwrap();
        let table = builder.build();

        assert_eq!(table.len(), 2);
        assert_eq!(table.entry_count(), 3);
        assert_eq!(table.try_match("/a/1", "PUT").map(|m| *m.result), Some("any_put"));
        assert_eq!(table.try_match("/a/1", "GET").map(|m| *m.result), Some("a_get"));
    }

    #[test]
    fn test_shared_template_is_compiled_once() {
        let mut builder = KeyedRoutingTableBuilder::new();
        builder.add("/a/{x}", "GET", 1).unwrap();
        builder.add("/a/{x}", "PUT", 2).unwrap();
        let table = builder.build();

        let get = table.try_match("/a/1", "GET").unwrap();
        let put = table.try_match("/a/1", "PUT").unwrap();
        assert!(std::ptr::eq(get.template, put.template));
    }

    #[test]
    fn test_unknown_key_falls_through_to_later_entry() {
        let mut builder = KeyedRoutingTableBuilder::new();
        builder.add("/items/{id}", "GET", "get_item").unwrap();
        builder.add("/{any}/{id}", "POST", "post_any").unwrap();
        let table = builder.build();

        assert_eq!(table.try_match("/items/1", "POST").map(|m| *m.result), Some("post_any"));
    }

    #[test]
    fn test_rooted_fallback() {
        let table = verb_table();
        assert_eq!(
            table.try_match("foo/glah/flip/blob", "PUT").map(|m| *m.result),
            Some("goo_put")
        );
        assert_eq!(
            table
                .try_match_with("foo/glah/flip/blob", "PUT", MatchMode::Rooted)
                .map(|m| *m.result),
            Some("foo_prefix_goo_put")
        );
    }

    #[test]
    fn test_borrowed_key_lookup() {
        let mut builder = KeyedRoutingTable::builder();
        builder.add("/a", "GET".to_string(), 1).unwrap();
        let table = builder.to_table();

        assert_eq!(table.try_match("/a", "GET").map(|m| *m.result), Some(1));
    }
}
