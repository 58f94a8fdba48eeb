// Compiled URI template, the public matching handle

use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use std::sync::Arc;

use tracing::debug;

use crate::error::TemplateError;
use crate::params::{Parameters, ParameterCache, RangeParameterCache, DEFAULT_CAPACITY};

use super::ast::{ParameterName, PatternElement, VariableSpec};
use super::matcher::{CaptureSink, Consumer, Discard};
use super::parser::TemplateParser;

/// Where a match may start in the candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Leading characters of the candidate may be skipped
    #[default]
    Unrooted,
    /// The match must start at offset 0
    Rooted,
}

/// Callback event carrying borrowed views into the template and the candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capture<'t, 'u> {
    Parameter { name: &'t str, value: &'u str },
    /// Discard every parameter reported since the last reset
    Reset,
}

/// Callback event carrying a name handle and a byte range into the candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeCapture {
    Parameter {
        name: ParameterName,
        value: Range<usize>,
    },
    /// Discard every parameter reported since the last reset
    Reset,
}

/// A compiled RFC 6570 template.
///
/// Immutable once compiled and cheap to clone; any number of threads may
/// match against the same instance.
#[derive(Debug, Clone)]
pub struct UriTemplate {
    source: Arc<str>,
    elements: Arc<[PatternElement]>,
    /// Variable names indexed by handle
    names: Arc<[String]>,
}

impl UriTemplate {
    /// Compile a template. This is the only place structural errors surface.
    pub fn compile(template: &str) -> Result<Self, TemplateError> {
        let elements = TemplateParser::parse(template)?;
        let names: Vec<String> = elements
            .iter()
            .flat_map(|element| element.variables())
            .map(|variable| variable.name.clone())
            .collect();
        debug!(
            template,
            elements = elements.len(),
            variables = names.len(),
            "compiled uri template"
        );

        Ok(Self {
            source: Arc::from(template),
            elements: elements.into(),
            names: names.into(),
        })
    }

    /// The template text this was compiled from
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn elements(&self) -> &[PatternElement] {
        &self.elements
    }

    /// Every variable in template order
    pub fn variables(&self) -> impl Iterator<Item = &VariableSpec> {
        self.elements.iter().flat_map(|element| element.variables())
    }

    /// Resolve a handle reported by [`UriTemplate::parse_uri_ranges`].
    pub fn parameter_name(&self, handle: ParameterName) -> Option<&str> {
        self.names.get(handle.index()).map(String::as_str)
    }

    pub fn is_match(&self, uri: &str) -> bool {
        self.is_match_with(uri, MatchMode::Unrooted)
    }

    pub fn is_match_with(&self, uri: &str, mode: MatchMode) -> bool {
        self.run(uri, mode, &mut Discard)
    }

    /// Match `uri`, reporting each captured parameter to `callback`.
    ///
    /// Parameters reported before a [`Capture::Reset`] belong to a rejected
    /// attempt. When this returns `false` every report is stale.
    pub fn parse_uri<'t, 'u, F>(&'t self, uri: &'u str, callback: F) -> bool
    where
        F: FnMut(Capture<'t, 'u>),
    {
        self.parse_uri_with(uri, MatchMode::Unrooted, callback)
    }

    pub fn parse_uri_with<'t, 'u, F>(&'t self, uri: &'u str, mode: MatchMode, callback: F) -> bool
    where
        F: FnMut(Capture<'t, 'u>),
    {
        let mut sink = SpanSink { uri, callback };
        self.run(uri, mode, &mut sink)
    }

    /// Like [`UriTemplate::parse_uri`] but reports name handles and ranges,
    /// which stay meaningful after the call returns.
    pub fn parse_uri_ranges<F>(&self, uri: &str, callback: F) -> bool
    where
        F: FnMut(RangeCapture),
    {
        self.parse_uri_ranges_with(uri, MatchMode::Unrooted, callback)
    }

    pub fn parse_uri_ranges_with<F>(&self, uri: &str, mode: MatchMode, callback: F) -> bool
    where
        F: FnMut(RangeCapture),
    {
        let mut sink = RangeSink { callback };
        self.run(uri, mode, &mut sink)
    }

    /// Match `uri` and hand each captured `(name, value)` to `callback`, in
    /// template order. Nothing is reported unless the match succeeds.
    pub fn enumerate_parameters<F>(&self, uri: &str, callback: F) -> bool
    where
        F: FnMut(&str, &str),
    {
        self.enumerate_parameters_with_capacity(uri, DEFAULT_CAPACITY, callback)
    }

    pub fn enumerate_parameters_with_capacity<F>(&self, uri: &str, initial_capacity: usize, callback: F) -> bool
    where
        F: FnMut(&str, &str),
    {
        let mut cache = ParameterCache::rent(initial_capacity);
        match cache.capture(self, uri) {
            Ok(true) => cache.enumerate(callback).is_ok(),
            _ => false,
        }
    }

    /// Range-based counterpart of [`UriTemplate::enumerate_parameters`].
    pub fn enumerate_parameter_ranges<F>(&self, uri: &str, callback: F) -> bool
    where
        F: FnMut(ParameterName, Range<usize>),
    {
        let mut cache = RangeParameterCache::rent(DEFAULT_CAPACITY);
        match cache.capture(self, uri) {
            Ok(true) => cache.enumerate(callback).is_ok(),
            _ => false,
        }
    }

    /// Match `uri` and keep the captured parameters for lookup by name.
    pub fn parameters<'t, 'u>(&'t self, uri: &'u str) -> Option<Parameters<'t, 'u>> {
        Parameters::capture(self, uri, DEFAULT_CAPACITY)
    }

    pub(crate) fn run<'t, S: CaptureSink<'t>>(&'t self, uri: &str, mode: MatchMode, sink: &mut S) -> bool {
        Consumer::new(&self.elements).consume(uri, mode == MatchMode::Rooted, sink)
    }
}

impl FromStr for UriTemplate {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

impl fmt::Display for UriTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

struct SpanSink<'u, F> {
    uri: &'u str,
    callback: F,
}

impl<'t, 'u, F> CaptureSink<'t> for SpanSink<'u, F>
where
    F: FnMut(Capture<'t, 'u>),
{
    fn capture(&mut self, variable: &'t VariableSpec, value: Range<usize>) {
        let uri = self.uri;
        (self.callback)(Capture::Parameter {
            name: &variable.name,
            value: &uri[value],
        });
    }

    fn reset(&mut self) {
        (self.callback)(Capture::Reset);
    }
}

struct RangeSink<F> {
    callback: F,
}

impl<'t, F> CaptureSink<'t> for RangeSink<F>
where
    F: FnMut(RangeCapture),
{
    fn capture(&mut self, variable: &'t VariableSpec, value: Range<usize>) {
        (self.callback)(RangeCapture::Parameter {
            name: variable.handle,
            value,
        });
    }

    fn reset(&mut self) {
        (self.callback)(RangeCapture::Reset);
    }
}
