//! Recursive-descent parser for type expressions.
//!
//! ```text
//! type         := ['|'] intersection ('|' intersection)*
//! intersection := postfix ('&' postfix)*
//! postfix      := primary ('[' ']')*
//! primary      := '(' type ')'
//!               | name ['<' type (',' type)* '>']
//!               | string | number | 'true' | 'false'
//! ```

use crate::scanner::{ScannerState, SyntaxKind};
use formtree_common::limits::MAX_TYPE_EXPR_DEPTH;
use formtree_solver::IntrinsicKind;
use std::fmt;

/// Parsed type expression, before names are resolved.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeExpr {
    Keyword(IntrinsicKind),
    StringLiteral(String),
    NumberLiteral(f64),
    BooleanLiteral(bool),
    /// A model, leaf or generic (`Omit<User, 'id'>`) reference.
    Reference { name: String, args: Vec<TypeExpr> },
    Array(Box<TypeExpr>),
    Union(Vec<TypeExpr>),
    Intersection(Vec<TypeExpr>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    /// Byte offset into the expression.
    pub pos: usize,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.message, self.pos)
    }
}

impl std::error::Error for ParseError {}

/// Parse a complete type expression.
pub fn parse_type_expr(text: &str) -> Result<TypeExpr, ParseError> {
    let mut parser = ParserState::new(text);
    let expr = parser.parse_type()?;
    if parser.current_token != SyntaxKind::EndOfFileToken {
        return Err(parser.unexpected("end of input"));
    }
    Ok(expr)
}

struct ParserState<'a> {
    scanner: ScannerState<'a>,
    current_token: SyntaxKind,
    depth: u32,
}

impl<'a> ParserState<'a> {
    fn new(text: &'a str) -> Self {
        let mut scanner = ScannerState::new(text);
        let current_token = scanner.scan();
        ParserState {
            scanner,
            current_token,
            depth: 0,
        }
    }

    #[inline]
    fn is_token(&self, kind: SyntaxKind) -> bool {
        self.current_token == kind
    }

    fn next_token(&mut self) -> SyntaxKind {
        self.current_token = self.scanner.scan();
        self.current_token
    }

    fn parse_optional(&mut self, kind: SyntaxKind) -> bool {
        if self.is_token(kind) {
            self.next_token();
            true
        } else {
            false
        }
    }

    fn parse_expected(&mut self, kind: SyntaxKind) -> Result<(), ParseError> {
        if self.parse_optional(kind) {
            Ok(())
        } else {
            Err(self.unexpected(kind.text()))
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let found = match self.current_token {
            SyntaxKind::Unknown => match self.scanner.error() {
                Some(reason) => {
                    return ParseError {
                        message: reason.to_string(),
                        pos: self.scanner.token_start(),
                    };
                }
                None => format!("'{}'", self.scanner.token_value()),
            },
            SyntaxKind::Identifier => format!("'{}'", self.scanner.token_value()),
            other => other.text().to_string(),
        };
        ParseError {
            message: format!("expected {expected}, found {found}"),
            pos: self.scanner.token_start(),
        }
    }

    fn parse_type(&mut self) -> Result<TypeExpr, ParseError> {
        if self.depth >= MAX_TYPE_EXPR_DEPTH {
            return Err(ParseError {
                message: format!("type expression nested deeper than {MAX_TYPE_EXPR_DEPTH}"),
                pos: self.scanner.token_start(),
            });
        }
        self.depth += 1;
        let result = self.parse_union_type();
        self.depth -= 1;
        result
    }

    fn parse_union_type(&mut self) -> Result<TypeExpr, ParseError> {
        // Leading `|` is allowed, as in multi-line unions.
        self.parse_optional(SyntaxKind::BarToken);
        let first = self.parse_intersection_type()?;
        if !self.is_token(SyntaxKind::BarToken) {
            return Ok(first);
        }
        let mut members = vec![first];
        while self.parse_optional(SyntaxKind::BarToken) {
            members.push(self.parse_intersection_type()?);
        }
        Ok(TypeExpr::Union(members))
    }

    fn parse_intersection_type(&mut self) -> Result<TypeExpr, ParseError> {
        let first = self.parse_postfix_type()?;
        if !self.is_token(SyntaxKind::AmpersandToken) {
            return Ok(first);
        }
        let mut members = vec![first];
        while self.parse_optional(SyntaxKind::AmpersandToken) {
            members.push(self.parse_postfix_type()?);
        }
        Ok(TypeExpr::Intersection(members))
    }

    fn parse_postfix_type(&mut self) -> Result<TypeExpr, ParseError> {
        let mut ty = self.parse_primary_type()?;
        while self.parse_optional(SyntaxKind::OpenBracketToken) {
            self.parse_expected(SyntaxKind::CloseBracketToken)?;
            ty = TypeExpr::Array(Box::new(ty));
        }
        Ok(ty)
    }

    fn parse_primary_type(&mut self) -> Result<TypeExpr, ParseError> {
        match self.current_token {
            SyntaxKind::OpenParenToken => {
                self.next_token();
                let inner = self.parse_type()?;
                self.parse_expected(SyntaxKind::CloseParenToken)?;
                Ok(inner)
            }
            SyntaxKind::StringLiteral => {
                let value = self.scanner.token_value().to_string();
                self.next_token();
                Ok(TypeExpr::StringLiteral(value))
            }
            SyntaxKind::NumericLiteral => {
                let value = self.scanner.token_value().parse::<f64>().map_err(|_| ParseError {
                    message: format!("invalid number '{}'", self.scanner.token_value()),
                    pos: self.scanner.token_start(),
                })?;
                self.next_token();
                Ok(TypeExpr::NumberLiteral(value))
            }
            SyntaxKind::Identifier => self.parse_type_reference(),
            _ => Err(self.unexpected("a type")),
        }
    }

    fn parse_type_reference(&mut self) -> Result<TypeExpr, ParseError> {
        let name = self.scanner.token_value().to_string();
        self.next_token();

        match name.as_str() {
            "true" => return Ok(TypeExpr::BooleanLiteral(true)),
            "false" => return Ok(TypeExpr::BooleanLiteral(false)),
            _ => {}
        }
        if let Some(kind) = IntrinsicKind::from_name(&name) {
            return Ok(TypeExpr::Keyword(kind));
        }

        let mut args = Vec::new();
        if self.parse_optional(SyntaxKind::LessThanToken) {
            loop {
                args.push(self.parse_type()?);
                if !self.parse_optional(SyntaxKind::CommaToken) {
                    break;
                }
            }
            self.parse_expected(SyntaxKind::GreaterThanToken)?;
        }
        Ok(TypeExpr::Reference { name, args })
    }
}

#[cfg(test)]
#[path = "../tests/parser_tests.rs"]
mod tests;
