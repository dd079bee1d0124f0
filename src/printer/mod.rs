//! AST-to-source printer.
//!
//! Walks the syntax tree and emits class-dialect source text. Raw
//! statements and expressions are reprinted verbatim; synthesized nodes
//! get canonical formatting (four-space indent, one statement per line).
//!
//! The printer is deterministic: the same tree always produces the same
//! text, which is what makes "synthesize twice, compare bytes" a valid
//! test for the hook transform.

use crate::syntax::{
    ClassDeclaration, ClassMember, CompoundClause, Expr, MethodDeclaration, Parameter,
    PropertyDeclaration, SourceUnit, Stmt,
};

const INDENT: &str = "    ";

/// Print a single class declaration to a string.
pub fn print_class(class: &ClassDeclaration) -> String {
    let mut printer = Printer::new();
    printer.emit_class(class);
    printer.finish()
}

/// Print a whole source unit (directives, then classes).
pub fn print_source_unit(unit: &SourceUnit) -> String {
    let mut printer = Printer::new();
    for directive in &unit.directives {
        printer.write(directive);
        printer.write(";");
        printer.write_line();
    }
    if !unit.directives.is_empty() && !unit.classes.is_empty() {
        printer.write_line();
    }
    for (i, class) in unit.classes.iter().enumerate() {
        if i > 0 {
            printer.write_line();
        }
        printer.emit_class(class);
    }
    printer.finish()
}

/// Stateful writer with indent tracking.
pub struct Printer {
    output: String,
    indent_level: usize,
    at_line_start: bool,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

impl Printer {
    pub fn new() -> Self {
        Printer {
            output: String::new(),
            indent_level: 0,
            at_line_start: true,
        }
    }

    pub fn finish(self) -> String {
        self.output
    }

    fn write(&mut self, text: &str) {
        if self.at_line_start && !text.is_empty() {
            for _ in 0..self.indent_level {
                self.output.push_str(INDENT);
            }
            self.at_line_start = false;
        }
        self.output.push_str(text);
    }

    fn write_line(&mut self) {
        self.output.push('\n');
        self.at_line_start = true;
    }

    fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    fn decrease_indent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    // --- Declarations ---

    pub fn emit_class(&mut self, class: &ClassDeclaration) {
        self.write("class ");
        self.write(&class.name.to_string());
        if let Some(extends) = &class.extends {
            self.write(" extends ");
            self.write(&extends.to_string());
        }
        self.write(" {");
        self.write_line();
        self.increase_indent();

        for member in &class.members {
            match member {
                ClassMember::Property(property) => self.emit_property(property),
                ClassMember::Method(method) => self.emit_method(method),
            }
        }

        self.decrease_indent();
        self.write("}");
        self.write_line();
    }

    fn emit_property(&mut self, property: &PropertyDeclaration) {
        self.write(&property.name);
        if let Some(declared_type) = &property.declared_type {
            self.write(": ");
            self.write(declared_type);
        }
        if let Some(initializer) = &property.initializer {
            self.write(" = ");
            self.emit_expr(initializer);
        }
        self.write(";");
        self.write_line();
    }

    fn emit_method(&mut self, method: &MethodDeclaration) {
        self.write(&method.name);
        self.write("(");
        for (i, param) in method.params.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit_parameter(param);
        }
        self.write(")");
        if let Some(return_type) = &method.return_type {
            self.write(": ");
            self.write(return_type);
        }
        self.write(" {");
        self.write_line();
        self.increase_indent();
        for stmt in &method.body {
            self.emit_stmt(stmt);
        }
        self.decrease_indent();
        self.write("}");
        self.write_line();
    }

    fn emit_parameter(&mut self, param: &Parameter) {
        self.write(&param.name);
        if let Some(declared_type) = &param.declared_type {
            self.write(": ");
            self.write(declared_type);
        }
    }

    // --- Statements ---

    fn emit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Return(None) => {
                self.write("return;");
                self.write_line();
            }
            Stmt::Return(Some(expr)) => {
                self.write("return ");
                self.emit_expr(expr);
                self.write(";");
                self.write_line();
            }
            Stmt::Block(stmts) => {
                self.write("{");
                self.write_line();
                self.increase_indent();
                for inner in stmts {
                    self.emit_stmt(inner);
                }
                self.decrease_indent();
                self.write("}");
                self.write_line();
            }
            Stmt::Compound(clauses) => self.emit_compound(clauses),
            Stmt::If {
                condition,
                then_branch,
            } => {
                self.write("if (");
                self.emit_expr(condition);
                self.write(") {");
                self.write_line();
                self.increase_indent();
                for inner in then_branch {
                    self.emit_stmt(inner);
                }
                self.decrease_indent();
                self.write("}");
                self.write_line();
            }
            Stmt::VarDecl { name, initializer } => {
                self.write("const ");
                self.write(name);
                self.write(" = ");
                self.emit_expr(initializer);
                self.write(";");
                self.write_line();
            }
            Stmt::Expression(expr) => {
                self.emit_expr(expr);
                self.write(";");
                self.write_line();
            }
            Stmt::Raw(text) => {
                self.write(text);
                self.write(";");
                self.write_line();
            }
        }
    }

    fn emit_compound(&mut self, clauses: &[CompoundClause]) {
        for (i, clause) in clauses.iter().enumerate() {
            if i > 0 {
                self.write(" ");
            }
            self.write(&clause.header);
            self.write(" {");
            self.write_line();
            self.increase_indent();
            for inner in &clause.body {
                self.emit_stmt(inner);
            }
            self.decrease_indent();
            self.write("}");
        }
        self.write_line();
    }

    // --- Expressions ---

    fn emit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Identifier(name) => self.write(name),
            Expr::This => self.write("this"),
            Expr::Undefined => self.write("undefined"),
            Expr::StringLiteral(value) => {
                self.write("\"");
                self.write(&escape_string(value));
                self.write("\"");
            }
            Expr::NumericLiteral(value) => self.write(value),
            Expr::ArrayLiteral(elements) => {
                self.write("[");
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.emit_expr(element);
                }
                self.write("]");
            }
            Expr::PropertyAccess { object, property } => {
                self.emit_expr(object);
                self.write(".");
                self.write(property);
            }
            Expr::Call { callee, arguments } => {
                self.emit_expr(callee);
                self.write("(");
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.emit_expr(argument);
                }
                self.write(")");
            }
            Expr::New { callee, arguments } => {
                self.write("new ");
                self.write(callee);
                self.write("(");
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.emit_expr(argument);
                }
                self.write(")");
            }
            Expr::Binary {
                left,
                operator,
                right,
            } => {
                self.emit_expr(left);
                self.write(" ");
                self.write(operator);
                self.write(" ");
                self.emit_expr(right);
            }
            Expr::Raw(text) => self.write(text),
        }
    }
}

fn escape_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
