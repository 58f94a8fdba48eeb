// RFC 6570 URI template compilation and matching
//
// Templates compile once into a list of pattern elements; matching walks the
// elements against a candidate URI and backtracks over skipped prefixes.

mod ast;
pub(crate) mod matcher;
mod parser;
mod uri_template;

pub use ast::{Expression, Operator, ParameterName, PatternElement, VariableSpec};
pub use parser::TemplateParser;
pub use uri_template::{Capture, MatchMode, RangeCapture, UriTemplate};
