//! Syntax tree for the class dialect.
//!
//! The tree is a plain owned data structure: the loader produces it, the
//! hook proxy transform consumes it by reference and builds a fresh tree,
//! and the printer walks it to emit source text. Nothing here is mutated
//! after it is handed downstream.
//!
//! Only the constructs the transform interprets are modeled structurally:
//! class shape, method signatures, blocks, and `return` statements.
//! Everything else a method body contains rides along as raw source text
//! ([`Stmt::Raw`], [`Expr::Raw`]) and is reprinted verbatim. Compound
//! statements (`if`/`try`/loops with block bodies) keep their headers raw
//! but expose their blocks, so returns nested anywhere inside them stay
//! reachable.
//!
//! Builder constructors on [`Expr`] and [`Stmt`] keep transform code
//! readable; they mirror the shapes the synthesizer needs to emit
//! (assignment, conditional branch, event construction/dispatch, return).

use std::fmt;

/// A dotted qualified name, e.g. `App.Services.Mailer`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    pub parts: Vec<String>,
}

impl QualifiedName {
    pub fn new(parts: Vec<String>) -> Self {
        debug_assert!(!parts.is_empty(), "qualified name needs at least one part");
        QualifiedName { parts }
    }

    pub fn simple(name: impl Into<String>) -> Self {
        QualifiedName {
            parts: vec![name.into()],
        }
    }

    /// Parse a dotted string (`"App.Foo"`) into its segments.
    pub fn from_dotted(dotted: &str) -> Self {
        QualifiedName {
            parts: dotted.split('.').map(str::to_string).collect(),
        }
    }

    /// The unqualified (last) segment.
    pub fn last_segment(&self) -> &str {
        self.parts.last().map(String::as_str).unwrap_or_default()
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.parts.join("."))
    }
}

/// One parsed source file: directive prologue plus class declarations.
#[derive(Debug, Clone, Default)]
pub struct SourceUnit {
    /// Leading directive statements (e.g. `"use strict";`), raw literal text.
    pub directives: Vec<String>,
    pub classes: Vec<ClassDeclaration>,
}

/// A class declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDeclaration {
    pub name: QualifiedName,
    pub extends: Option<QualifiedName>,
    pub members: Vec<ClassMember>,
}

impl ClassDeclaration {
    /// Iterate over method members.
    pub fn methods(&self) -> impl Iterator<Item = &MethodDeclaration> {
        self.members.iter().filter_map(|m| match m {
            ClassMember::Method(method) => Some(method),
            ClassMember::Property(_) => None,
        })
    }

    /// The constructor, when one is declared.
    pub fn constructor(&self) -> Option<&MethodDeclaration> {
        self.methods().find(|m| m.is_constructor)
    }
}

/// A class member in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassMember {
    Property(PropertyDeclaration),
    Method(MethodDeclaration),
}

/// A property declaration: `name`, `name: T;`, `name: T = init;`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDeclaration {
    pub name: String,
    pub declared_type: Option<String>,
    pub initializer: Option<Expr>,
}

impl PropertyDeclaration {
    pub fn untyped(name: impl Into<String>) -> Self {
        PropertyDeclaration {
            name: name.into(),
            declared_type: None,
            initializer: None,
        }
    }

    pub fn typed(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        PropertyDeclaration {
            name: name.into(),
            declared_type: Some(declared_type.into()),
            initializer: None,
        }
    }
}

/// A method declaration (or constructor).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDeclaration {
    pub name: String,
    pub params: Vec<Parameter>,
    /// Raw declared return type text, absent when not annotated.
    pub return_type: Option<String>,
    pub body: Vec<Stmt>,
    pub is_constructor: bool,
}

impl MethodDeclaration {
    /// True only if the declared return type is the "no value" type.
    pub fn returns_void(&self) -> bool {
        self.return_type.as_deref() == Some("void")
    }
}

/// A method parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub declared_type: Option<String>,
}

impl Parameter {
    pub fn new(name: impl Into<String>) -> Self {
        Parameter {
            name: name.into(),
            declared_type: None,
        }
    }

    pub fn typed(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Parameter {
            name: name.into(),
            declared_type: Some(declared_type.into()),
        }
    }
}

/// One `header { body }` clause of a compound statement.
///
/// `if (x) { a } else { b }` parses as two clauses with headers
/// `"if (x)"` and `"else"`; `try`/`catch`/`finally` chains likewise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundClause {
    pub header: String,
    pub body: Vec<Stmt>,
}

/// A statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// `return;` / `return expr;`
    Return(Option<Expr>),
    /// A bare nested block.
    Block(Vec<Stmt>),
    /// Raw-header control flow whose blocks remain visible (see
    /// [`CompoundClause`]).
    Compound(Vec<CompoundClause>),
    /// `if (condition) { then_branch }` — synthesized branches only.
    If {
        condition: Expr,
        then_branch: Vec<Stmt>,
    },
    /// `const name = initializer;`
    VarDecl { name: String, initializer: Expr },
    /// `expr;`
    Expression(Expr),
    /// Opaque passthrough statement, reprinted verbatim plus `;`.
    Raw(String),
}

impl Stmt {
    pub fn ret(expr: Option<Expr>) -> Self {
        Stmt::Return(expr)
    }

    pub fn expr_stmt(expr: Expr) -> Self {
        Stmt::Expression(expr)
    }

    /// `target = value;`
    pub fn assign(target: Expr, value: Expr) -> Self {
        Stmt::Expression(Expr::binary(target, "=", value))
    }

    pub fn var_decl(name: impl Into<String>, initializer: Expr) -> Self {
        Stmt::VarDecl {
            name: name.into(),
            initializer,
        }
    }

    pub fn if_then(condition: Expr, then_branch: Vec<Stmt>) -> Self {
        Stmt::If {
            condition,
            then_branch,
        }
    }
}

/// An expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Identifier(String),
    This,
    Undefined,
    /// String literal; the payload is the unquoted value.
    StringLiteral(String),
    NumericLiteral(String),
    ArrayLiteral(Vec<Expr>),
    PropertyAccess {
        object: Box<Expr>,
        property: String,
    },
    Call {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
    },
    New {
        callee: String,
        arguments: Vec<Expr>,
    },
    Binary {
        left: Box<Expr>,
        operator: String,
        right: Box<Expr>,
    },
    /// Opaque passthrough expression, reprinted verbatim.
    Raw(String),
}

impl Expr {
    pub fn id(name: impl Into<String>) -> Self {
        Expr::Identifier(name.into())
    }

    pub fn this() -> Self {
        Expr::This
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::StringLiteral(value.into())
    }

    pub fn number(value: impl fmt::Display) -> Self {
        Expr::NumericLiteral(value.to_string())
    }

    pub fn array(elements: Vec<Expr>) -> Self {
        Expr::ArrayLiteral(elements)
    }

    pub fn raw(text: impl Into<String>) -> Self {
        Expr::Raw(text.into())
    }

    /// `object.property`
    pub fn prop(object: Expr, property: impl Into<String>) -> Self {
        Expr::PropertyAccess {
            object: Box::new(object),
            property: property.into(),
        }
    }

    pub fn call(callee: Expr, arguments: Vec<Expr>) -> Self {
        Expr::Call {
            callee: Box::new(callee),
            arguments,
        }
    }

    /// `object.method(arguments)`
    pub fn method_call(object: Expr, method: impl Into<String>, arguments: Vec<Expr>) -> Self {
        Expr::call(Expr::prop(object, method), arguments)
    }

    /// `new Callee(arguments)`
    pub fn new_expr(callee: impl Into<String>, arguments: Vec<Expr>) -> Self {
        Expr::New {
            callee: callee.into(),
            arguments,
        }
    }

    pub fn binary(left: Expr, operator: impl Into<String>, right: Expr) -> Self {
        Expr::Binary {
            left: Box::new(left),
            operator: operator.into(),
            right: Box::new(right),
        }
    }

    /// `left + right`
    pub fn concat(left: Expr, right: Expr) -> Self {
        Expr::binary(left, "+", right)
    }
}
