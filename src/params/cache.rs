// Parameter cache that copies captured names and values into pooled storage

use std::ops::Range;

use crate::error::ParameterError;
use crate::template::matcher::CaptureSink;
use crate::template::{MatchMode, UriTemplate, VariableSpec};

use super::pool::{ParameterPool, Rental};

/// Initial capacity used when the caller doesn't pick one
pub const DEFAULT_CAPACITY: usize = 10;

/// One captured parameter: name and value packed into a single pooled string.
#[derive(Debug)]
pub(crate) struct CacheEntry {
    text: String,
    name_len: usize,
}

impl CacheEntry {
    fn name(&self) -> &str {
        &self.text[..self.name_len]
    }

    fn value(&self) -> &str {
        &self.text[self.name_len..]
    }
}

/// Captured `(name, value)` pairs that outlive the candidate string.
///
/// Rented from a [`ParameterPool`] and returned to it on [`release`] or drop.
/// The entry array grows by the initial capacity each time it fills up.
///
/// [`release`]: ParameterCache::release
pub struct ParameterCache<'p> {
    pool: &'p ParameterPool,
    entries: Rental<'p, Vec<CacheEntry>>,
    increment: usize,
}

impl ParameterCache<'static> {
    /// Rent from the shared pool.
    pub fn rent(initial_capacity: usize) -> Self {
        Self::rent_from(ParameterPool::shared(), initial_capacity)
    }
}

impl<'p> ParameterCache<'p> {
    pub fn rent_from(pool: &'p ParameterPool, initial_capacity: usize) -> Self {
        let increment = initial_capacity.max(1);
        Self {
            pool,
            entries: pool.entries.rent_scoped(increment),
            increment,
        }
    }

    /// Match `uri` against `template`, keeping the parameters of the
    /// successful attempt. Previous contents are discarded first.
    pub fn capture(&mut self, template: &UriTemplate, uri: &str) -> Result<bool, ParameterError> {
        self.capture_with(template, uri, MatchMode::Unrooted)
    }

    pub fn capture_with(&mut self, template: &UriTemplate, uri: &str, mode: MatchMode) -> Result<bool, ParameterError> {
        if self.is_released() {
            return Err(ParameterError::Released);
        }

        self.reset();
        let mut sink = CacheSink { cache: self, uri };
        Ok(template.run(uri, mode, &mut sink))
    }

    pub fn add(&mut self, name: &str, value: &str) -> Result<(), ParameterError> {
        if self.is_released() {
            return Err(ParameterError::Released);
        }

        self.push(name, value);
        Ok(())
    }

    fn push(&mut self, name: &str, value: &str) {
        let full = match self.entries.get() {
            Some(entries) => entries.len() == entries.capacity(),
            None => return,
        };
        if full {
            self.entries.grow(self.increment);
        }

        let text = if name.is_empty() && value.is_empty() {
            String::new()
        } else {
            let mut text = self.pool.text.rent(name.len() + value.len());
            text.push_str(name);
            text.push_str(value);
            text
        };

        if let Some(entries) = self.entries.get_mut() {
            entries.push(CacheEntry {
                text,
                name_len: name.len(),
            });
        }
    }

    /// Drop every entry, keeping the entry array itself.
    pub fn reset(&mut self) {
        if let Some(entries) = self.entries.get_mut() {
            for entry in entries.drain(..) {
                if entry.text.capacity() > 0 {
                    self.pool.text.give_back(entry.text);
                }
            }
        }
    }

    /// Return all storage to the pool. Safe to call more than once.
    pub fn release(&mut self) {
        self.reset();
        self.entries.release();
    }

    pub fn is_released(&self) -> bool {
        self.entries.is_released()
    }

    pub fn len(&self) -> usize {
        self.entries.get().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value of the first parameter called `name`, if captured
    pub fn try_get(&self, name: &str) -> Option<&str> {
        self.entries
            .get()?
            .iter()
            .find(|entry| entry.name() == name)
            .map(CacheEntry::value)
    }

    pub fn get(&self, name: &str) -> Result<&str, ParameterError> {
        if self.is_released() {
            return Err(ParameterError::Released);
        }
        self.try_get(name)
            .ok_or_else(|| ParameterError::Missing(name.to_string()))
    }

    /// Entries in capture order. Empty once released.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .get()
            .into_iter()
            .flatten()
            .map(|entry| (entry.name(), entry.value()))
    }

    pub fn enumerate<F>(&self, mut callback: F) -> Result<(), ParameterError>
    where
        F: FnMut(&str, &str),
    {
        if self.is_released() {
            return Err(ParameterError::Released);
        }
        for (name, value) in self.iter() {
            callback(name, value);
        }
        Ok(())
    }
}

impl Drop for ParameterCache<'_> {
    fn drop(&mut self) {
        self.release();
    }
}

struct CacheSink<'c, 'p, 'u> {
    cache: &'c mut ParameterCache<'p>,
    uri: &'u str,
}

impl<'t> CaptureSink<'t> for CacheSink<'_, '_, '_> {
    fn capture(&mut self, variable: &'t VariableSpec, value: Range<usize>) {
        self.cache.push(&variable.name, &self.uri[value]);
    }

    fn reset(&mut self) {
        self.cache.reset();
    }
}
