//! Tokenizer for type expressions (`Omit<User, 'id'> | null`).

/// Token kinds of the type-expression grammar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyntaxKind {
    Identifier,
    StringLiteral,
    NumericLiteral,
    BarToken,
    AmpersandToken,
    OpenBracketToken,
    CloseBracketToken,
    LessThanToken,
    GreaterThanToken,
    OpenParenToken,
    CloseParenToken,
    CommaToken,
    EndOfFileToken,
    Unknown,
}

impl SyntaxKind {
    /// How the token is written, for "expected X" messages.
    pub const fn text(self) -> &'static str {
        match self {
            SyntaxKind::Identifier => "identifier",
            SyntaxKind::StringLiteral => "string literal",
            SyntaxKind::NumericLiteral => "number",
            SyntaxKind::BarToken => "'|'",
            SyntaxKind::AmpersandToken => "'&'",
            SyntaxKind::OpenBracketToken => "'['",
            SyntaxKind::CloseBracketToken => "']'",
            SyntaxKind::LessThanToken => "'<'",
            SyntaxKind::GreaterThanToken => "'>'",
            SyntaxKind::OpenParenToken => "'('",
            SyntaxKind::CloseParenToken => "')'",
            SyntaxKind::CommaToken => "','",
            SyntaxKind::EndOfFileToken => "end of input",
            SyntaxKind::Unknown => "unknown token",
        }
    }
}

/// Scanner state: position in the text plus the current token.
pub struct ScannerState<'a> {
    text: &'a str,
    pos: usize,
    token: SyntaxKind,
    token_start: usize,
    token_value: String,
    error: Option<&'static str>,
}

impl<'a> ScannerState<'a> {
    pub fn new(text: &'a str) -> Self {
        ScannerState {
            text,
            pos: 0,
            token: SyntaxKind::Unknown,
            token_start: 0,
            token_value: String::new(),
            error: None,
        }
    }

    #[inline]
    pub fn token(&self) -> SyntaxKind {
        self.token
    }

    /// Identifier name, unescaped string literal contents, or number text.
    #[inline]
    pub fn token_value(&self) -> &str {
        &self.token_value
    }

    #[inline]
    pub fn token_start(&self) -> usize {
        self.token_start
    }

    /// Why the last token is `Unknown`, if the scanner knows.
    pub fn error(&self) -> Option<&'static str> {
        self.error
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    pub fn scan(&mut self) -> SyntaxKind {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
        self.token_start = self.pos;
        self.token_value.clear();
        self.error = None;

        let Some(c) = self.bump() else {
            self.token = SyntaxKind::EndOfFileToken;
            return self.token;
        };
        self.token = match c {
            '|' => SyntaxKind::BarToken,
            '&' => SyntaxKind::AmpersandToken,
            '[' => SyntaxKind::OpenBracketToken,
            ']' => SyntaxKind::CloseBracketToken,
            '<' => SyntaxKind::LessThanToken,
            '>' => SyntaxKind::GreaterThanToken,
            '(' => SyntaxKind::OpenParenToken,
            ')' => SyntaxKind::CloseParenToken,
            ',' => SyntaxKind::CommaToken,
            '\'' | '"' => self.scan_string(c),
            '-' | '0'..='9' => self.scan_number(c),
            c if is_identifier_start(c) => {
                self.token_value.push(c);
                while let Some(next) = self.peek().filter(|c| is_identifier_part(*c)) {
                    self.token_value.push(next);
                    self.bump();
                }
                SyntaxKind::Identifier
            }
            other => {
                self.token_value.push(other);
                SyntaxKind::Unknown
            }
        };
        self.token
    }

    fn scan_string(&mut self, quote: char) -> SyntaxKind {
        loop {
            match self.bump() {
                None => {
                    self.error = Some("unterminated string literal");
                    return SyntaxKind::Unknown;
                }
                Some(c) if c == quote => return SyntaxKind::StringLiteral,
                Some('\\') => match self.bump() {
                    Some('n') => self.token_value.push('\n'),
                    Some('t') => self.token_value.push('\t'),
                    Some(other) => self.token_value.push(other),
                    None => {
                        self.error = Some("unterminated string literal");
                        return SyntaxKind::Unknown;
                    }
                },
                Some(c) => self.token_value.push(c),
            }
        }
    }

    fn scan_number(&mut self, first: char) -> SyntaxKind {
        self.token_value.push(first);
        let mut seen_dot = false;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || (c == '.' && !seen_dot) {
                seen_dot |= c == '.';
                self.token_value.push(c);
                self.bump();
            } else {
                break;
            }
        }
        if self.token_value == "-" {
            self.error = Some("expected digits after '-'");
            return SyntaxKind::Unknown;
        }
        SyntaxKind::NumericLiteral
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
#[path = "../tests/scanner_tests.rs"]
mod tests;
