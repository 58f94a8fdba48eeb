// Contract shared with template expansion components
//
// Matching never calls into this module. It exposes the compiled variable
// data in the shape an expander needs, plus the result type an expander's
// parameter provider reports.

use crate::template::{Operator, UriTemplate, VariableSpec};

/// Outcome of formatting one variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableProcessingState {
    /// Output was written
    Success,
    /// The payload has no usable value for the variable
    NotProcessed,
    /// The value exists but can't be expressed with this variable's modifiers
    Failure,
}

/// One variable as seen by an expander, with its position in its expression.
#[derive(Debug, Clone, Copy)]
pub struct VariableSpecification<'t> {
    variable: &'t VariableSpec,
    first: bool,
}

impl<'t> VariableSpecification<'t> {
    /// Every variable of `template` in template order.
    pub fn all(template: &'t UriTemplate) -> impl Iterator<Item = VariableSpecification<'t>> {
        template
            .elements()
            .iter()
            .flat_map(|element| {
                element
                    .variables()
                    .iter()
                    .enumerate()
                    .map(|(index, variable)| VariableSpecification {
                        variable,
                        first: index == 0,
                    })
            })
    }

    pub fn name(&self) -> &'t str {
        &self.variable.name
    }

    pub fn operator(&self) -> Operator {
        self.variable.operator
    }

    pub fn explode(&self) -> bool {
        self.variable.explode
    }

    pub fn prefix_length(&self) -> Option<usize> {
        self.variable.prefix_length
    }

    /// Whether this is the first variable of its expression, which takes the
    /// operator's `first` string instead of its separator.
    pub fn is_first(&self) -> bool {
        self.first
    }

    /// What to write in front of this variable's value.
    pub fn lead(&self) -> &'static str {
        if self.first {
            self.operator().first()
        } else {
            self.operator().separator()
        }
    }
}

/// Supplies and formats values for one kind of parameter payload `P`.
pub trait ParameterProvider<P: ?Sized> {
    fn process_variable(
        &self,
        specification: &VariableSpecification<'_>,
        parameters: &P,
        output: &mut String,
    ) -> VariableProcessingState;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    type Payload = HashMap<&'static str, &'static str>;

    /// Strings only, no percent-encoding.
    struct MapProvider;

    impl ParameterProvider<Payload> for MapProvider {
        fn process_variable(
            &self,
            specification: &VariableSpecification<'_>,
            parameters: &Payload,
            output: &mut String,
        ) -> VariableProcessingState {
            let Some(value) = parameters.get(specification.name()) else {
                return VariableProcessingState::NotProcessed;
            };
            if specification.explode() {
                return VariableProcessingState::Failure;
            }

            output.push_str(specification.lead());
            if specification.operator().named() {
                output.push_str(specification.name());
                if value.is_empty() {
                    output.push_str(specification.operator().if_empty());
                    return VariableProcessingState::Success;
                }
                output.push('=');
            }
            match specification.prefix_length() {
                Some(length) => output.extend(value.chars().take(length)),
                None => output.push_str(value),
            }
            VariableProcessingState::Success
        }
    }

    #[test]
    fn test_specifications_mark_first_per_expression() {
        let template = UriTemplate::compile("/a{/b,c}{?d,e}").unwrap();
        let specs: Vec<(&str, bool)> = VariableSpecification::all(&template)
            .map(|s| (s.name(), s.is_first()))
            .collect();
        assert_eq!(specs, vec![("b", true), ("c", false), ("d", true), ("e", false)]);
    }

    #[test]
    fn test_specification_metadata() {
        let template = UriTemplate::compile("{;list*}{#frag:3}").unwrap();
        let specs: Vec<_> = VariableSpecification::all(&template).collect();

        assert_eq!(specs[0].operator(), Operator::PathParameter);
        assert!(specs[0].explode());
        assert_eq!(specs[0].lead(), ";");
        assert_eq!(specs[1].prefix_length(), Some(3));
        assert!(specs[1].operator().allow_reserved());
    }

    #[test]
    fn test_provider_reports_states() {
        let template = UriTemplate::compile("{?x,y}{/rest*}").unwrap();
        let params = HashMap::from([("x", "1"), ("y", ""), ("rest", "a")]);
        let mut output = String::new();
        let states: Vec<_> = VariableSpecification::all(&template)
            .map(|spec| MapProvider.process_variable(&spec, &params, &mut output))
            .collect();

        assert_eq!(
            states,
            vec![
                VariableProcessingState::Success,
                VariableProcessingState::Success,
                VariableProcessingState::Failure,
            ]
        );
        assert_eq!(output, "?x=1&y=");

        let empty = Payload::new();
        let spec = VariableSpecification::all(&template).next().unwrap();
        assert_eq!(
            MapProvider.process_variable(&spec, &empty, &mut output),
            VariableProcessingState::NotProcessed
        );
    }
}
