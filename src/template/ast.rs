// Compiled element types for URI templates

/// RFC 6570 expression operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `{var}`
    Simple,
    /// `{+var}`
    Reserved,
    /// `{#var}`
    Fragment,
    /// `{.var}`
    Label,
    /// `{/var}`
    PathSegment,
    /// `{;var}`
    PathParameter,
    /// `{?var}`
    Query,
    /// `{&var}`
    QueryContinuation,
}

impl Operator {
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '+' => Some(Operator::Reserved),
            '#' => Some(Operator::Fragment),
            '.' => Some(Operator::Label),
            '/' => Some(Operator::PathSegment),
            ';' => Some(Operator::PathParameter),
            '?' => Some(Operator::Query),
            '&' => Some(Operator::QueryContinuation),
            _ => None,
        }
    }

    /// Marker expected in front of the first variable, if any.
    pub fn prefix(self) -> Option<u8> {
        match self {
            Operator::Simple | Operator::Reserved => None,
            Operator::Fragment => Some(b'#'),
            Operator::Label => Some(b'.'),
            Operator::PathSegment => Some(b'/'),
            Operator::PathParameter => Some(b';'),
            Operator::Query => Some(b'?'),
            Operator::QueryContinuation => Some(b'&'),
        }
    }

    /// Marker expected in front of every variable after the first.
    pub fn continuation(self) -> u8 {
        match self {
            Operator::Simple | Operator::Reserved | Operator::Fragment => b',',
            Operator::Label => b'.',
            Operator::PathSegment => b'/',
            Operator::PathParameter => b';',
            Operator::Query | Operator::QueryContinuation => b'&',
        }
    }

    /// Characters that end a captured value.
    pub(crate) fn terminators(self) -> &'static [u8] {
        match self {
            Operator::Simple | Operator::Reserved => b"/?&",
            Operator::Fragment => b"",
            Operator::Label => b"./?#",
            Operator::PathSegment => b"/?",
            Operator::PathParameter => b";/?#",
            Operator::Query | Operator::QueryContinuation => b"&#",
        }
    }

    pub fn is_query(self) -> bool {
        matches!(self, Operator::Query | Operator::QueryContinuation)
    }

    /// Expansion prefix from the RFC 6570 operator table.
    pub fn first(self) -> &'static str {
        match self {
            Operator::Simple | Operator::Reserved => "",
            Operator::Fragment => "#",
            Operator::Label => ".",
            Operator::PathSegment => "/",
            Operator::PathParameter => ";",
            Operator::Query => "?",
            Operator::QueryContinuation => "&",
        }
    }

    /// Expansion separator from the RFC 6570 operator table.
    pub fn separator(self) -> &'static str {
        match self {
            Operator::Simple | Operator::Reserved | Operator::Fragment => ",",
            Operator::Label => ".",
            Operator::PathSegment => "/",
            Operator::PathParameter => ";",
            Operator::Query | Operator::QueryContinuation => "&",
        }
    }

    /// Whether values expand as `name=value`.
    pub fn named(self) -> bool {
        matches!(
            self,
            Operator::PathParameter | Operator::Query | Operator::QueryContinuation
        )
    }

    /// What a named, empty value expands to after its name.
    pub fn if_empty(self) -> &'static str {
        match self {
            Operator::Query | Operator::QueryContinuation => "=",
            _ => "",
        }
    }

    pub fn allow_reserved(self) -> bool {
        matches!(self, Operator::Reserved | Operator::Fragment)
    }
}

/// Handle to a variable of a compiled template.
///
/// Range-based captures report this instead of the name text; resolve it with
/// [`crate::UriTemplate::parameter_name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParameterName(pub(crate) usize);

impl ParameterName {
    /// Position of the variable in template order
    pub fn index(self) -> usize {
        self.0
    }
}

/// One variable of an expression, e.g. `rest*` in `{/rest*}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableSpec {
    pub name: String,
    pub operator: Operator,
    pub explode: bool,
    pub prefix_length: Option<usize>,
    pub(crate) handle: ParameterName,
}

impl VariableSpec {
    pub fn handle(&self) -> ParameterName {
        self.handle
    }
}

/// A `{...}` block: an operator and its variables in template order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    pub operator: Operator,
    pub variables: Vec<VariableSpec>,
}

/// A compiled template is an ordered list of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternElement {
    Literal(String),
    /// Operators `∅ + # . / ;`
    Expression(Expression),
    /// Operators `? &`
    QueryExpression(Expression),
}

impl PatternElement {
    pub fn variables(&self) -> &[VariableSpec] {
        match self {
            PatternElement::Literal(_) => &[],
            PatternElement::Expression(expr) | PatternElement::QueryExpression(expr) => {
                &expr.variables
            }
        }
    }
}
