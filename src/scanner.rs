//! Token scanner for the class dialect.
//!
//! The scanner is deliberately shallow: the loader only needs to see the
//! structural shape of a source file (class headers, member signatures,
//! statement boundaries, brackets, strings). Everything between structural
//! tokens is recovered later by slicing the original text, so punctuation
//! the grammar does not interpret is reported as single-character
//! [`SyntaxKind::Punctuation`] tokens with exact byte positions.
//!
//! Strings and comments are scanned as units so that `;`, `{` and friends
//! inside them never look like statement structure.

use crate::span::Span;

/// Token kinds the parser distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxKind {
    Identifier,
    StringLiteral,
    NumericLiteral,
    OpenBrace,
    CloseBrace,
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    Colon,
    Semicolon,
    Comma,
    Dot,
    Equals,
    /// Any operator character the grammar does not interpret.
    Punctuation,
    EndOfFile,
}

/// A cursor over source text producing one token at a time.
///
/// `Clone` is cheap (a couple of indices), which is how the parser peeks:
/// clone the scanner, scan once, throw the clone away.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    source: &'a str,
    pos: usize,
    token: SyntaxKind,
    token_start: usize,
    unterminated: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Scanner {
            source,
            pos: 0,
            token: SyntaxKind::EndOfFile,
            token_start: 0,
            unterminated: false,
        }
    }

    pub fn token(&self) -> SyntaxKind {
        self.token
    }

    pub fn token_start(&self) -> usize {
        self.token_start
    }

    pub fn token_end(&self) -> usize {
        self.pos
    }

    pub fn token_text(&self) -> &'a str {
        &self.source[self.token_start..self.pos]
    }

    pub fn token_span(&self) -> Span {
        Span::new(self.token_start as u32, self.pos as u32)
    }

    /// True when the current string literal ran off the end of the file.
    pub fn is_unterminated(&self) -> bool {
        self.unterminated
    }

    fn peek_char(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn bump_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek_char() {
                Some(ch) if ch.is_whitespace() => {
                    self.bump_char();
                }
                Some('/') if self.source[self.pos..].starts_with("//") => {
                    while let Some(ch) = self.peek_char() {
                        if ch == '\n' {
                            break;
                        }
                        self.bump_char();
                    }
                }
                Some('/') if self.source[self.pos..].starts_with("/*") => {
                    self.pos += 2;
                    match self.source[self.pos..].find("*/") {
                        Some(end) => self.pos += end + 2,
                        // Unterminated block comment swallows the rest.
                        None => self.pos = self.source.len(),
                    }
                }
                _ => break,
            }
        }
    }

    fn scan_string(&mut self, quote: char) {
        self.unterminated = true;
        while let Some(ch) = self.bump_char() {
            if ch == '\\' {
                self.bump_char();
            } else if ch == quote {
                self.unterminated = false;
                break;
            }
        }
    }

    fn scan_number(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                self.bump_char();
            } else if ch == '.' {
                // Only part of the number when a digit follows (`1.5`, not `1.toString`).
                let rest = &self.source[self.pos + 1..];
                if rest.chars().next().is_some_and(|c| c.is_ascii_digit()) {
                    self.bump_char();
                } else {
                    break;
                }
            } else {
                break;
            }
        }
    }

    /// Advance to the next token and return its kind.
    pub fn scan(&mut self) -> SyntaxKind {
        self.skip_trivia();
        self.token_start = self.pos;
        self.unterminated = false;

        let Some(ch) = self.bump_char() else {
            self.token = SyntaxKind::EndOfFile;
            return self.token;
        };

        self.token = match ch {
            '{' => SyntaxKind::OpenBrace,
            '}' => SyntaxKind::CloseBrace,
            '(' => SyntaxKind::OpenParen,
            ')' => SyntaxKind::CloseParen,
            '[' => SyntaxKind::OpenBracket,
            ']' => SyntaxKind::CloseBracket,
            ':' => SyntaxKind::Colon,
            ';' => SyntaxKind::Semicolon,
            ',' => SyntaxKind::Comma,
            '.' => SyntaxKind::Dot,
            '=' => SyntaxKind::Equals,
            '"' | '\'' | '`' => {
                self.scan_string(ch);
                SyntaxKind::StringLiteral
            }
            c if c.is_ascii_digit() => {
                self.scan_number();
                SyntaxKind::NumericLiteral
            }
            c if c.is_alphabetic() || c == '_' || c == '$' => {
                while let Some(next) = self.peek_char() {
                    if next.is_alphanumeric() || next == '_' || next == '$' {
                        self.bump_char();
                    } else {
                        break;
                    }
                }
                SyntaxKind::Identifier
            }
            _ => SyntaxKind::Punctuation,
        };
        self.token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<SyntaxKind> {
        let mut scanner = Scanner::new(source);
        let mut out = Vec::new();
        loop {
            let kind = scanner.scan();
            if kind == SyntaxKind::EndOfFile {
                break;
            }
            out.push(kind);
        }
        out
    }

    #[test]
    fn scans_class_header() {
        assert_eq!(
            kinds("class Foo extends App.Base {"),
            vec![
                SyntaxKind::Identifier,
                SyntaxKind::Identifier,
                SyntaxKind::Identifier,
                SyntaxKind::Identifier,
                SyntaxKind::Dot,
                SyntaxKind::Identifier,
                SyntaxKind::OpenBrace,
            ]
        );
    }

    #[test]
    fn string_contents_hide_structure() {
        // The braces and semicolon inside the literal are not tokens.
        assert_eq!(
            kinds(r#""a { ; } b";"#),
            vec![SyntaxKind::StringLiteral, SyntaxKind::Semicolon]
        );
    }

    #[test]
    fn escaped_quote_does_not_end_string() {
        let mut scanner = Scanner::new(r#""a\"b" x"#);
        assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
        assert_eq!(scanner.token_text(), r#""a\"b""#);
        assert!(!scanner.is_unterminated());
    }

    #[test]
    fn comments_are_trivia() {
        assert_eq!(
            kinds("a // line {\n/* block ; */ b"),
            vec![SyntaxKind::Identifier, SyntaxKind::Identifier]
        );
    }

    #[test]
    fn numeric_member_access_is_not_a_fraction() {
        assert_eq!(
            kinds("1.toString"),
            vec![
                SyntaxKind::NumericLiteral,
                SyntaxKind::Dot,
                SyntaxKind::Identifier,
            ]
        );
        assert_eq!(kinds("1.5"), vec![SyntaxKind::NumericLiteral]);
    }

    #[test]
    fn unterminated_string_is_flagged() {
        let mut scanner = Scanner::new("\"abc");
        assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
        assert!(scanner.is_unterminated());
    }
}
