// Zero-copy parameter cache recording name handles and value ranges

use std::ops::Range;

use crate::error::ParameterError;
use crate::template::matcher::CaptureSink;
use crate::template::{MatchMode, ParameterName, UriTemplate, VariableSpec};

use super::pool::{ParameterPool, Rental};

#[derive(Debug, Clone)]
pub(crate) struct RangeEntry {
    name: ParameterName,
    value: Range<usize>,
}

/// Captured parameters as `(handle, range)` pairs.
///
/// Ranges index the candidate string, so they are only meaningful while the
/// caller still holds it. Names resolve through the matching template.
pub struct RangeParameterCache<'p> {
    entries: Rental<'p, Vec<RangeEntry>>,
    increment: usize,
}

impl RangeParameterCache<'static> {
    pub fn rent(initial_capacity: usize) -> Self {
        Self::rent_from(ParameterPool::shared(), initial_capacity)
    }
}

impl<'p> RangeParameterCache<'p> {
    pub fn rent_from(pool: &'p ParameterPool, initial_capacity: usize) -> Self {
        let increment = initial_capacity.max(1);
        Self {
            entries: pool.ranges.rent_scoped(increment),
            increment,
        }
    }

    pub fn capture(&mut self, template: &UriTemplate, uri: &str) -> Result<bool, ParameterError> {
        self.capture_with(template, uri, MatchMode::Unrooted)
    }

    pub fn capture_with(&mut self, template: &UriTemplate, uri: &str, mode: MatchMode) -> Result<bool, ParameterError> {
        if self.is_released() {
            return Err(ParameterError::Released);
        }

        self.reset();
        Ok(template.run(uri, mode, self))
    }

    pub fn add(&mut self, name: ParameterName, value: Range<usize>) -> Result<(), ParameterError> {
        if self.is_released() {
            return Err(ParameterError::Released);
        }

        self.push(name, value);
        Ok(())
    }

    fn push(&mut self, name: ParameterName, value: Range<usize>) {
        let full = match self.entries.get() {
            Some(entries) => entries.len() == entries.capacity(),
            None => return,
        };
        if full {
            self.entries.grow(self.increment);
        }
        if let Some(entries) = self.entries.get_mut() {
            entries.push(RangeEntry { name, value });
        }
    }

    pub fn reset(&mut self) {
        if let Some(entries) = self.entries.get_mut() {
            entries.clear();
        }
    }

    /// Return the entry array to the pool. Safe to call more than once.
    pub fn release(&mut self) {
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

    /// Range of the first parameter called `name`; names are resolved
    /// through `template`, which must be the one that produced the captures.
    pub fn try_get(&self, template: &UriTemplate, name: &str) -> Option<Range<usize>> {
        self.iter()
            .find(|(handle, _)| template.parameter_name(*handle) == Some(name))
            .map(|(_, range)| range)
    }

    pub fn get(&self, template: &UriTemplate, name: &str) -> Result<Range<usize>, ParameterError> {
        if self.is_released() {
            return Err(ParameterError::Released);
        }
        self.try_get(template, name)
            .ok_or_else(|| ParameterError::Missing(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (ParameterName, Range<usize>)> + '_ {
        self.entries
            .get()
            .into_iter()
            .flatten()
            .map(|entry| (entry.name, entry.value.clone()))
    }

    pub fn enumerate<F>(&self, mut callback: F) -> Result<(), ParameterError>
    where
        F: FnMut(ParameterName, Range<usize>),
    {
        if self.is_released() {
            return Err(ParameterError::Released);
        }
        for (name, range) in self.iter() {
            callback(name, range);
        }
        Ok(())
    }
}

impl<'t> CaptureSink<'t> for RangeParameterCache<'_> {
    fn capture(&mut self, variable: &'t VariableSpec, value: Range<usize>) {
        self.push(variable.handle(), value);
    }

    fn reset(&mut self) {
        RangeParameterCache::reset(self);
    }
}
