// Error types for urimatch

use std::fmt;

/// Structural errors found while compiling a URI template.
///
/// These are only ever produced by [`crate::UriTemplate::compile`]; a compiled
/// template can fail to match but never fails structurally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A `{` with no matching `}`
    UnclosedExpression { position: usize },
    /// A `}` outside of any expression
    UnexpectedClosingBrace { position: usize },
    InvalidVariableCharacter { character: char, position: usize },
    /// `{}` or an expression holding only separators
    EmptyExpression { position: usize },
    /// `:` not followed by a positive length
    InvalidPrefixLength { position: usize },
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::UnclosedExpression { position } => {
                write!(f, "Unclosed expression starting at position {}", position)
            }
            TemplateError::UnexpectedClosingBrace { position } => {
                write!(f, "Unexpected closing brace at position {}", position)
            }
            TemplateError::InvalidVariableCharacter { character, position } => write!(
                f,
                "Invalid character '{}' in variable name at position {}",
                character, position
            ),
            TemplateError::EmptyExpression { position } => {
                write!(f, "Expression at position {} has no variables", position)
            }
            TemplateError::InvalidPrefixLength { position } => {
                write!(f, "Invalid prefix length at position {}", position)
            }
        }
    }
}

impl std::error::Error for TemplateError {}

/// Misuse of captured parameters after a match.
///
/// Distinct from a non-match, which is reported as `false` / `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterError {
    /// The named parameter was not captured by the match
    Missing(String),
    /// The cache has already been released back to its pool
    Released,
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterError::Missing(name) => write!(f, "Parameter not captured: {}", name),
            ParameterError::Released => write!(f, "Parameter cache used after release"),
        }
    }
}

impl std::error::Error for ParameterError {}
