//! Parser for the class dialect.
//!
//! [`ParserState`] turns source text into a [`SourceUnit`]. It parses the
//! structure the hook transform needs — class headers, member signatures,
//! blocks, `return` statements — and captures everything else as raw text
//! slices of the original source, so unknown statements and expressions
//! survive the round trip byte-for-byte.
//!
//! Parse problems are collected into a [`DiagnosticBag`] rather than
//! aborting; the caller decides whether errors are fatal (the loader
//! treats any error diagnostic as fatal for that file).
//!
//! # Grammar notes
//!
//! Control-flow statements must use block bodies. A brace-less `return`
//! nested inside another statement (`if (x) return y;`) is reported as an
//! error instead of being passed through: passing it through would hide a
//! return point from the transform and miscompile the method.

use crate::diagnostics::DiagnosticBag;
use crate::scanner::{Scanner, SyntaxKind};
use crate::span::Span;
use crate::syntax::{
    ClassDeclaration, ClassMember, CompoundClause, Expr, MethodDeclaration, Parameter,
    PropertyDeclaration, QualifiedName, SourceUnit, Stmt,
};


/// Keywords that continue a compound statement after a block.
const COMPOUND_CONTINUATIONS: [&str; 3] = ["else", "catch", "finally"];

/// Recursive-descent parser over a single source file.
pub struct ParserState<'src> {
    file_name: String,
    source: &'src str,
    scanner: Scanner<'src>,
    token: SyntaxKind,
    pub diagnostics: DiagnosticBag,
}

impl<'src> ParserState<'src> {
    pub fn new(file_name: impl Into<String>, source: &'src str) -> Self {
        let mut scanner = Scanner::new(source);
        let token = scanner.scan();
        ParserState {
            file_name: file_name.into(),
            source,
            scanner,
            token,
            diagnostics: DiagnosticBag::new(),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn source(&self) -> &str {
        self.source
    }

    // --- Token plumbing ---

    fn bump(&mut self) {
        if self.token == SyntaxKind::StringLiteral && self.scanner.is_unterminated() {
            self.diagnostics
                .error(self.scanner.token_span(), "unterminated string literal");
        }
        self.token = self.scanner.scan();
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.token == kind
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        self.token == SyntaxKind::Identifier && self.scanner.token_text() == keyword
    }

    fn token_text(&self) -> &'src str {
        self.scanner.token_text()
    }

    fn token_span(&self) -> Span {
        self.scanner.token_span()
    }

    /// Kind of the token after the current one, without consuming anything.
    fn peek(&self) -> SyntaxKind {
        let mut lookahead = self.scanner.clone();
        lookahead.scan()
    }

    fn expect(&mut self, kind: SyntaxKind, what: &str) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            let found = self.describe_current();
            self.diagnostics
                .error(self.token_span(), format!("expected {what}, found {found}"));
            false
        }
    }

    fn describe_current(&self) -> String {
        match self.token {
            SyntaxKind::EndOfFile => "end of file".to_string(),
            _ => format!("`{}`", self.token_text()),
        }
    }

    // --- Entry point ---

    /// Parse the whole file: directive prologue, then class declarations.
    pub fn parse_source_unit(&mut self) -> SourceUnit {
        let mut unit = SourceUnit::default();

        while self.at(SyntaxKind::StringLiteral) && self.peek() == SyntaxKind::Semicolon {
            unit.directives.push(self.token_text().to_string());
            self.bump();
            self.bump();
        }

        while !self.at(SyntaxKind::EndOfFile) {
            if self.at_keyword("class") {
                if let Some(class) = self.parse_class() {
                    unit.classes.push(class);
                }
            } else {
                let found = self.describe_current();
                self.diagnostics.error(
                    self.token_span(),
                    format!("expected class declaration, found {found}"),
                );
                self.bump();
            }
        }

        unit
    }

    // --- Declarations ---

    fn parse_class(&mut self) -> Option<ClassDeclaration> {
        self.bump(); // `class`

        if !self.at(SyntaxKind::Identifier) {
            self.diagnostics
                .error(self.token_span(), "expected class name");
            return None;
        }
        let name = QualifiedName::simple(self.token_text());
        self.bump();

        let extends = if self.at_keyword("extends") {
            self.bump();
            self.parse_qualified_name()
        } else {
            None
        };

        if !self.expect(SyntaxKind::OpenBrace, "`{` to open class body") {
            return None;
        }

        let mut members = Vec::new();
        while !self.at(SyntaxKind::CloseBrace) && !self.at(SyntaxKind::EndOfFile) {
            if self.at(SyntaxKind::Identifier) {
                if self.peek() == SyntaxKind::OpenParen {
                    if let Some(method) = self.parse_method() {
                        members.push(ClassMember::Method(method));
                    }
                } else if let Some(property) = self.parse_property() {
                    members.push(ClassMember::Property(property));
                }
            } else {
                let found = self.describe_current();
                self.diagnostics.error(
                    self.token_span(),
                    format!("expected class member, found {found}"),
                );
                self.bump();
            }
        }
        self.expect(SyntaxKind::CloseBrace, "`}` to close class body");

        Some(ClassDeclaration {
            name,
            extends,
            members,
        })
    }

    fn parse_qualified_name(&mut self) -> Option<QualifiedName> {
        if !self.at(SyntaxKind::Identifier) {
            self.diagnostics
                .error(self.token_span(), "expected name after `extends`");
            return None;
        }
        let mut parts = vec![self.token_text().to_string()];
        self.bump();
        while self.at(SyntaxKind::Dot) {
            self.bump();
            if !self.at(SyntaxKind::Identifier) {
                self.diagnostics
                    .error(self.token_span(), "expected identifier after `.`");
                break;
            }
            parts.push(self.token_text().to_string());
            self.bump();
        }
        Some(QualifiedName::new(parts))
    }

    fn parse_property(&mut self) -> Option<PropertyDeclaration> {
        let name = self.token_text().to_string();
        self.bump();

        let declared_type = if self.at(SyntaxKind::Colon) {
            self.bump();
            Some(self.scan_type_text(&[SyntaxKind::Semicolon, SyntaxKind::Equals])?)
        } else {
            None
        };

        let initializer = if self.at(SyntaxKind::Equals) {
            self.bump();
            Some(Expr::Raw(self.scan_raw_until(&[SyntaxKind::Semicolon])?))
        } else {
            None
        };

        self.expect(SyntaxKind::Semicolon, "`;` after property declaration");
        Some(PropertyDeclaration {
            name,
            declared_type,
            initializer,
        })
    }

    fn parse_method(&mut self) -> Option<MethodDeclaration> {
        let name = self.token_text().to_string();
        let is_constructor = name == "constructor";
        self.bump();
        self.expect(SyntaxKind::OpenParen, "`(` to open parameter list");

        let mut params = Vec::new();
        while !self.at(SyntaxKind::CloseParen) && !self.at(SyntaxKind::EndOfFile) {
            if !self.at(SyntaxKind::Identifier) {
                let found = self.describe_current();
                self.diagnostics.error(
                    self.token_span(),
                    format!("expected parameter name, found {found}"),
                );
                break;
            }
            let param_name = self.token_text().to_string();
            self.bump();

            let declared_type = if self.at(SyntaxKind::Colon) {
                self.bump();
                Some(self.scan_type_text(&[SyntaxKind::Comma, SyntaxKind::CloseParen])?)
            } else {
                None
            };
            params.push(Parameter {
                name: param_name,
                declared_type,
            });

            if self.at(SyntaxKind::Comma) {
                self.bump();
            } else if !self.at(SyntaxKind::CloseParen) {
                let found = self.describe_current();
                self.diagnostics.error(
                    self.token_span(),
                    format!("expected `,` or `)` in parameter list, found {found}"),
                );
                break;
            }
        }
        self.expect(SyntaxKind::CloseParen, "`)` to close parameter list");

        let return_type = if self.at(SyntaxKind::Colon) {
            self.bump();
            Some(self.scan_type_text(&[SyntaxKind::OpenBrace])?)
        } else {
            None
        };

        let body = self.parse_block()?;
        Some(MethodDeclaration {
            name,
            params,
            return_type,
            body,
            is_constructor,
        })
    }

    // --- Statements ---

    fn parse_block(&mut self) -> Option<Vec<Stmt>> {
        if !self.expect(SyntaxKind::OpenBrace, "`{` to open block") {
            return None;
        }
        let mut stmts = Vec::new();
        while !self.at(SyntaxKind::CloseBrace) && !self.at(SyntaxKind::EndOfFile) {
            if let Some(stmt) = self.parse_statement() {
                stmts.push(stmt);
            }
        }
        self.expect(SyntaxKind::CloseBrace, "`}` to close block");
        Some(stmts)
    }

    fn parse_statement(&mut self) -> Option<Stmt> {
        if self.at(SyntaxKind::Semicolon) {
            // Empty statement.
            self.bump();
            return None;
        }

        if self.at_keyword("return") {
            self.bump();
            if self.at(SyntaxKind::Semicolon) {
                self.bump();
                return Some(Stmt::Return(None));
            }
            let expr = self.scan_raw_until(&[SyntaxKind::Semicolon])?;
            self.expect(SyntaxKind::Semicolon, "`;` after return value");
            return Some(Stmt::Return(Some(Expr::Raw(expr))));
        }

        if self.at(SyntaxKind::OpenBrace) {
            return self.parse_block().map(Stmt::Block);
        }

        self.parse_raw_or_compound()
    }

    /// Scan an opaque statement. Ends at `;` at bracket depth zero; a `{`
    /// at depth zero instead starts a compound statement whose blocks are
    /// parsed structurally so nested returns stay visible.
    fn parse_raw_or_compound(&mut self) -> Option<Stmt> {
        let start = self.scanner.token_start();
        let mut depth = 0usize;

        loop {
            match self.token {
                SyntaxKind::EndOfFile => {
                    self.diagnostics
                        .error(self.token_span(), "unterminated statement");
                    return None;
                }
                SyntaxKind::Semicolon if depth == 0 => {
                    let text = self.slice(start, self.scanner.token_start());
                    self.bump();
                    return Some(Stmt::Raw(text));
                }
                SyntaxKind::OpenBrace if depth == 0 => {
                    let header = self.slice(start, self.scanner.token_start());
                    return self.parse_compound(header);
                }
                SyntaxKind::Identifier if depth == 0 && self.token_text() == "return" => {
                    self.diagnostics.error(
                        self.token_span(),
                        "`return` must be its own statement; brace-less control flow \
                         around a return is not supported",
                    );
                    self.skip_to_statement_end();
                    return None;
                }
                SyntaxKind::OpenBrace | SyntaxKind::OpenParen | SyntaxKind::OpenBracket => {
                    depth += 1;
                }
                SyntaxKind::CloseParen | SyntaxKind::CloseBracket => {
                    depth = depth.saturating_sub(1);
                }
                SyntaxKind::CloseBrace => {
                    if depth == 0 {
                        self.diagnostics
                            .error(self.token_span(), "expected `;` before `}`");
                        return None;
                    }
                    depth -= 1;
                }
                _ => {}
            }
            self.bump();
        }
    }

    fn parse_compound(&mut self, first_header: String) -> Option<Stmt> {
        let body = self.parse_block()?;
        let mut clauses = vec![CompoundClause {
            header: first_header,
            body,
        }];

        while self.token == SyntaxKind::Identifier
            && COMPOUND_CONTINUATIONS.contains(&self.token_text())
        {
            let header_start = self.scanner.token_start();
            let mut depth = 0usize;
            // Consume the continuation header up to its block.
            loop {
                match self.token {
                    SyntaxKind::EndOfFile => {
                        self.diagnostics
                            .error(self.token_span(), "unexpected end of file");
                        return None;
                    }
                    SyntaxKind::OpenBrace if depth == 0 => break,
                    SyntaxKind::OpenParen | SyntaxKind::OpenBracket => depth += 1,
                    SyntaxKind::CloseParen | SyntaxKind::CloseBracket => {
                        depth = depth.saturating_sub(1)
                    }
                    SyntaxKind::Semicolon | SyntaxKind::CloseBrace if depth == 0 => {
                        self.diagnostics.error(
                            self.token_span(),
                            "expected `{` after `else`/`catch`/`finally`",
                        );
                        return None;
                    }
                    _ => {}
                }
                self.bump();
            }
            let header = self.slice(header_start, self.scanner.token_start());
            let body = self.parse_block()?;
            clauses.push(CompoundClause { header, body });
        }

        Some(Stmt::Compound(clauses))
    }

    // --- Raw text capture ---

    /// Capture raw source text up to (not including) any of `stops` at
    /// bracket depth zero. The stop token is left current. Returns `None`
    /// at end of file.
    fn scan_raw_until(&mut self, stops: &[SyntaxKind]) -> Option<String> {
        let start = self.scanner.token_start();
        let mut depth = 0usize;
        loop {
            if self.at(SyntaxKind::EndOfFile) {
                self.diagnostics
                    .error(self.token_span(), "unexpected end of file");
                return None;
            }
            if depth == 0 && stops.contains(&self.token) {
                return Some(self.slice(start, self.scanner.token_start()));
            }
            match self.token {
                SyntaxKind::OpenBrace | SyntaxKind::OpenParen | SyntaxKind::OpenBracket => {
                    depth += 1
                }
                SyntaxKind::CloseBrace | SyntaxKind::CloseParen | SyntaxKind::CloseBracket => {
                    if depth == 0 {
                        // Closing bracket of an enclosing construct: stop here.
                        return Some(self.slice(start, self.scanner.token_start()));
                    }
                    depth -= 1;
                }
                _ => {}
            }
            self.bump();
        }
    }

    /// Capture raw type-annotation text up to any of `stops` at depth zero.
    ///
    /// Unlike [`Self::scan_raw_until`], this also tracks `<`/`>` pairs so
    /// generic arguments (`Map<string, number>`) do not stop at their inner
    /// commas, and it recognises `=>` so a function type is not cut at the
    /// `=` of an initializer stop.
    fn scan_type_text(&mut self, stops: &[SyntaxKind]) -> Option<String> {
        let start = self.scanner.token_start();
        let mut depth = 0usize;
        let mut angles = 0usize;
        loop {
            if self.at(SyntaxKind::EndOfFile) {
                self.diagnostics
                    .error(self.token_span(), "unexpected end of file");
                return None;
            }
            let is_arrow = self.token == SyntaxKind::Equals && self.next_char_is('>');
            if depth == 0 && angles == 0 && !is_arrow && stops.contains(&self.token) {
                return Some(self.slice(start, self.scanner.token_start()));
            }
            match self.token {
                SyntaxKind::OpenBrace | SyntaxKind::OpenParen | SyntaxKind::OpenBracket => {
                    depth += 1
                }
                SyntaxKind::CloseBrace | SyntaxKind::CloseParen | SyntaxKind::CloseBracket => {
                    if depth == 0 {
                        // Closing bracket of an enclosing construct: stop here.
                        return Some(self.slice(start, self.scanner.token_start()));
                    }
                    depth -= 1;
                }
                SyntaxKind::Punctuation if self.token_text() == "<" => angles += 1,
                SyntaxKind::Punctuation if self.token_text() == ">" => {
                    angles = angles.saturating_sub(1)
                }
                _ => {}
            }
            self.bump();
        }
    }

    fn next_char_is(&self, ch: char) -> bool {
        self.source[self.scanner.token_end()..].starts_with(ch)
    }

    fn slice(&self, start: usize, end: usize) -> String {
        self.source[start..end.max(start)].trim().to_string()
    }

    fn skip_to_statement_end(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.token {
                SyntaxKind::EndOfFile => return,
                SyntaxKind::Semicolon if depth == 0 => {
                    self.bump();
                    return;
                }
                SyntaxKind::CloseBrace if depth == 0 => return,
                SyntaxKind::OpenBrace | SyntaxKind::OpenParen | SyntaxKind::OpenBracket => {
                    depth += 1
                }
                SyntaxKind::CloseBrace | SyntaxKind::CloseParen | SyntaxKind::CloseBracket => {
                    depth = depth.saturating_sub(1)
                }
                _ => {}
            }
            self.bump();
        }
    }
}
