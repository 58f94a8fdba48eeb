// Backtracking matcher over compiled pattern elements
//
// Positions are byte offsets into the candidate. Every marker and terminator
// is ASCII, so scanning bytes never splits a multi-byte character.

use std::ops::Range;

use super::ast::{Expression, Operator, PatternElement, VariableSpec};

/// Receives the results of a match attempt.
pub(crate) trait CaptureSink<'t> {
    fn capture(&mut self, variable: &'t VariableSpec, value: Range<usize>);

    /// Everything captured since the previous reset is stale.
    fn reset(&mut self);
}

/// Sink for `is_match` and tail lookahead.
pub(crate) struct Discard;

impl<'t> CaptureSink<'t> for Discard {
    fn capture(&mut self, _variable: &'t VariableSpec, _value: Range<usize>) {}

    fn reset(&mut self) {}
}

/// Cursor over a run of elements. The elements after the one being consumed
/// form its tail.
#[derive(Clone, Copy)]
pub(crate) struct Consumer<'t> {
    elements: &'t [PatternElement],
}

impl<'t> Consumer<'t> {
    pub(crate) fn new(elements: &'t [PatternElement]) -> Self {
        Self { elements }
    }

    /// Match the whole input, skipping leading characters unless `rooted`.
    ///
    /// Only offsets inside the input are tried, so an empty input never
    /// matches, even against a template that could match nothing. Each
    /// rejected starting offset is followed by exactly one reset.
    pub(crate) fn consume<S: CaptureSink<'t>>(&self, input: &str, rooted: bool, sink: &mut S) -> bool {
        if input.is_empty() {
            sink.reset();
            return false;
        }

        let mut start = 0;
        loop {
            if self.consume_from(input, start, sink) == Some(input.len()) {
                return true;
            }

            sink.reset();
            if rooted {
                return false;
            }

            match input[start..].chars().next() {
                Some(ch) if start + ch.len_utf8() < input.len() => start += ch.len_utf8(),
                _ => return false,
            }
        }
    }

    /// Whether these elements take exactly `input[start..]`. Captures nothing.
    fn matches_as_tail(&self, input: &str, start: usize) -> bool {
        self.consume_from(input, start, &mut Discard) == Some(input.len())
    }

    /// Run the chain once from `start`, returning where it stopped.
    fn consume_from<S: CaptureSink<'t>>(&self, input: &str, start: usize, sink: &mut S) -> Option<usize> {
        let elements = self.elements;
        let mut pos = start;
        for (i, element) in elements.iter().enumerate() {
            let tail = Consumer::new(&elements[i + 1..]);
            pos = consume_element(element, input, pos, &tail, sink)?;
        }
        Some(pos)
    }
}

fn consume_element<'t, S: CaptureSink<'t>>(
    element: &'t PatternElement,
    input: &str,
    pos: usize,
    tail: &Consumer<'t>,
    sink: &mut S,
) -> Option<usize> {
    match element {
        PatternElement::Literal(text) => {
            if input[pos..].starts_with(text.as_str()) {
                Some(pos + text.len())
            } else {
                None
            }
        }
        PatternElement::Expression(expr) => Some(consume_expression(expr, input, pos, tail, sink)),
        PatternElement::QueryExpression(expr) => Some(consume_query(expr, input, pos, sink)),
    }
}

/// Operators `∅ + # . / ;`. Never fails: a missing marker means the
/// remaining variables are absent.
fn consume_expression<'t, S: CaptureSink<'t>>(
    expr: &'t Expression,
    input: &str,
    start: usize,
    tail: &Consumer<'t>,
    sink: &mut S,
) -> usize {
    let bytes = input.as_bytes();
    let operator = expr.operator;
    let continuation = operator.continuation();
    let terminators = operator.terminators();
    let mut pos = start;

    for (index, variable) in expr.variables.iter().enumerate() {
        let marker = if index == 0 {
            operator.prefix()
        } else {
            Some(continuation)
        };

        match marker {
            Some(marker) => {
                if bytes.get(pos) != Some(&marker) {
                    return pos;
                }
                pos += 1;
            }
            None if pos >= bytes.len() => return pos,
            None => {}
        }

        let value_start = if operator == Operator::PathParameter {
            match skip_parameter_name(input, pos, &variable.name, terminators) {
                Some(value_start) => value_start,
                // Someone else's `;key`, leave the marker for the tail
                None => return pos - 1,
            }
        } else {
            pos
        };

        let has_next = index + 1 < expr.variables.len();
        let split_on_comma = has_next && continuation == b',';
        let is_terminator = |b: u8| terminators.contains(&b) || (split_on_comma && b == b',');

        let mut end = scan_value(input, value_start, variable.prefix_length, &is_terminator);
        if variable.explode {
            while bytes.get(end) == Some(&continuation) && !tail.matches_as_tail(input, end) {
                let mut item_start = end + 1;
                if operator == Operator::PathParameter {
                    match skip_parameter_name(input, item_start, &variable.name, terminators) {
                        Some(next) => item_start = next,
                        None => break,
                    }
                }
                end = scan_value(input, item_start, None, &is_terminator);
            }
        }

        sink.capture(variable, value_start..end);
        pos = end;

        if !has_next {
            return pos;
        }

        // Leave the rest to the tail when it can match everything from here
        if tail.matches_as_tail(input, pos) {
            return pos;
        }
    }

    pos
}

/// Operators `? &`. Only `name=value` pairs whose name is one of this
/// expression's variables are consumed, in template order.
fn consume_query<'t, S: CaptureSink<'t>>(expr: &'t Expression, input: &str, start: usize, sink: &mut S) -> usize {
    let bytes = input.as_bytes();
    let terminators = expr.operator.terminators();
    let is_terminator = |b: u8| terminators.contains(&b);
    let mut marker = if expr.operator == Operator::Query { b'?' } else { b'&' };
    let mut pos = start;
    let mut index = 0;

    while index < expr.variables.len() {
        if bytes.get(pos) != Some(&marker) {
            break;
        }

        let key_start = pos + 1;
        if key_start == bytes.len() {
            // Dangling `?` or `&` at the very end
            return key_start;
        }

        let found = expr.variables[index..]
            .iter()
            .position(|v| key_matches(input, key_start, &v.name));
        let Some(offset) = found else {
            break;
        };

        let variable = &expr.variables[index + offset];
        let value_start = key_start + variable.name.len() + 1;
        let mut end = scan_value(input, value_start, variable.prefix_length, &is_terminator);
        if variable.explode {
            while bytes.get(end) == Some(&b'&') && key_matches(input, end + 1, &variable.name) {
                end = scan_value(input, end + variable.name.len() + 2, None, &is_terminator);
            }
        }

        sink.capture(variable, value_start..end);
        pos = end;
        index += offset + 1;
        marker = b'&';
    }

    pos
}

/// `name=` exactly, so `foo` does not claim `fooBar=`.
fn key_matches(input: &str, at: usize, name: &str) -> bool {
    input[at..].starts_with(name) && input.as_bytes().get(at + name.len()) == Some(&b'=')
}

/// Skip `name=` (or a bare `name`) after a `;` marker.
fn skip_parameter_name(input: &str, at: usize, name: &str, terminators: &[u8]) -> Option<usize> {
    if !input[at..].starts_with(name) {
        return None;
    }

    let after = at + name.len();
    match input.as_bytes().get(after) {
        Some(b'=') => Some(after + 1),
        Some(b) if terminators.contains(b) => Some(after),
        None => Some(after),
        Some(_) => None,
    }
}

/// End of the value starting at `start`: the first terminator, the end of
/// input, or `limit` characters in.
fn scan_value(input: &str, start: usize, limit: Option<usize>, is_terminator: &dyn Fn(u8) -> bool) -> usize {
    let limit = limit.unwrap_or(usize::MAX);
    let mut end = start;
    for (taken, ch) in input[start..].chars().enumerate() {
        if taken == limit || (ch.is_ascii() && is_terminator(ch as u8)) {
            break;
        }
        end += ch.len_utf8();
    }
    end
}
