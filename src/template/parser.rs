// Template compiler using recursive descent

use crate::error::TemplateError;

use super::ast::{Expression, Operator, ParameterName, PatternElement, VariableSpec};

/// RFC 6570 allows prefix lengths up to four digits
const MAX_PREFIX_DIGITS: usize = 4;

pub struct TemplateParser<'a> {
    input: &'a str,
    pos: usize,
    next_handle: usize,
}

impl<'a> TemplateParser<'a> {
    /// Compile a template into its ordered pattern elements.
    pub fn parse(template: &'a str) -> Result<Vec<PatternElement>, TemplateError> {
        let mut parser = Self {
            input: template,
            pos: 0,
            next_handle: 0,
        };
        parser.parse_template()
    }

    fn parse_template(&mut self) -> Result<Vec<PatternElement>, TemplateError> {
        let mut elements = Vec::new();
        let mut literal_buf = String::new();

        while let Some(ch) = self.peek_char() {
            match ch {
                '{' => {
                    // Flush the literal gap before this expression
                    if !literal_buf.is_empty() {
                        elements.push(PatternElement::Literal(std::mem::take(&mut literal_buf)));
                    }
                    elements.push(self.parse_expression()?);
                }
                '}' => {
                    return Err(TemplateError::UnexpectedClosingBrace { position: self.pos });
                }
                '\\' if self.peek_ahead(1) == Some('?') => {
                    // Escaped question mark is a literal, not the query operator
                    self.pos += 2;
                    literal_buf.push('?');
                }
                _ => {
                    self.pos += ch.len_utf8();
                    literal_buf.push(ch);
                }
            }
        }

        if !literal_buf.is_empty() {
            elements.push(PatternElement::Literal(literal_buf));
        }

        Ok(elements)
    }

    fn parse_expression(&mut self) -> Result<PatternElement, TemplateError> {
        let start = self.pos;
        self.pos += 1; // consume {

        let operator = match self.peek_char().and_then(Operator::from_char) {
            Some(op) => {
                self.pos += 1;
                op
            }
            None => Operator::Simple,
        };

        let mut variables = Vec::new();
        loop {
            match self.peek_char() {
                None => return Err(TemplateError::UnclosedExpression { position: start }),
                Some('}') => {
                    self.pos += 1;
                    break;
                }
                Some(',') => self.pos += 1,
                Some(_) => {
                    if let Some(var) = self.parse_variable(operator)? {
                        variables.push(var);
                    }
                }
            }
        }

        if variables.is_empty() {
            return Err(TemplateError::EmptyExpression { position: start });
        }

        let expression = Expression {
            operator,
            variables,
        };
        if operator.is_query() {
            Ok(PatternElement::QueryExpression(expression))
        } else {
            Ok(PatternElement::Expression(expression))
        }
    }

    /// Parse `name`, `name*` or `name:N`. Empty names are skipped.
    fn parse_variable(&mut self, operator: Operator) -> Result<Option<VariableSpec>, TemplateError> {
        let name_start = self.pos;
        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        let name = &self.input[name_start..self.pos];

        let mut explode = false;
        let mut prefix_length = None;
        match self.peek_char() {
            Some('*') => {
                self.pos += 1;
                explode = true;
            }
            Some(':') => {
                self.pos += 1;
                prefix_length = Some(self.parse_prefix_length()?);
            }
            _ => {}
        }

        match self.peek_char() {
            Some(',') | Some('}') | None => {}
            Some(ch) => {
                return Err(TemplateError::InvalidVariableCharacter {
                    character: ch,
                    position: self.pos,
                });
            }
        }

        if name.is_empty() {
            return Ok(None);
        }

        let handle = ParameterName(self.next_handle);
        self.next_handle += 1;

        Ok(Some(VariableSpec {
            name: name.to_string(),
            operator,
            explode,
            prefix_length,
            handle,
        }))
    }

    fn parse_prefix_length(&mut self) -> Result<usize, TemplateError> {
        let start = self.pos;
        while matches!(self.peek_char(), Some(ch) if ch.is_ascii_digit()) {
            self.pos += 1;
        }

        let digits = &self.input[start..self.pos];
        if digits.is_empty() || digits.len() > MAX_PREFIX_DIGITS {
            return Err(TemplateError::InvalidPrefixLength { position: start });
        }

        match digits.parse::<usize>() {
            Ok(length) if length > 0 => Ok(length),
            _ => Err(TemplateError::InvalidPrefixLength { position: start }),
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_ahead(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }
}
