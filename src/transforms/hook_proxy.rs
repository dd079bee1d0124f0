//! Hook Proxy Transform
//!
//! Derives a proxy subclass from a class declaration. Every non-constructor
//! method is wrapped with event dispatch at entry and at each return point,
//! so observers can inspect or override arguments and return values without
//! touching the original class.
//!
//! ```text
//! class Mailer {
//!     constructor(transport: Transport) { this.transport = transport; }
//!     send(to: string): boolean { return this.transport.deliver(to); }
//! }
//! ```
//!
//! Becomes:
//!
//! ```text
//! class MailerHookProxy extends Mailer {
//!     eventDispatcher;
//!     serviceId: string;
//!     constructor(transport: Transport, eventDispatcher: EventDispatcherInterface, serviceId: string) {
//!         this.transport = transport;
//!         this.eventDispatcher = eventDispatcher;
//!         this.serviceId = serviceId;
//!     }
//!     send(to: string): boolean {
//!         const __hookEvent = this.eventDispatcher.dispatch(new BeforeHookEvent([to], this), this.serviceId + "::send::before");
//!         if (__hookEvent.hasArgument(0)) {
//!             to = __hookEvent.getArgument(0);
//!         }
//!         if (__hookEvent.hasReturn()) {
//!             return __hookEvent.getReturn();
//!         }
//!         return this.eventDispatcher.dispatch(new AfterHookEvent([to], this, this.transport.deliver(to)), this.serviceId + "::send::after").getReturn();
//!     }
//! }
//! ```
//!
//! The transform is a pure function of the input tree: it never mutates the
//! original declaration, and synthesizing the same class twice yields
//! byte-identical output. The channel name strings
//! `<serviceId>::<method>::before` / `::after` are a wire contract with the
//! event dispatcher; any change breaks interoperability with deployed
//! observers.
//!
//! Structural inputs the transform refuses (instead of miscompiling):
//! duplicate parameter names, parameters colliding with the injected
//! dependency names, and more than one constructor. A class with *no*
//! constructor gets a default one so the injected dependencies always have
//! a binding site.

use crate::syntax::{
    ClassDeclaration, ClassMember, Expr, MethodDeclaration, Parameter, PropertyDeclaration,
    QualifiedName, Stmt,
};
use rustc_hash::FxHashSet;
use std::fmt;

/// Suffix appended to the original class's simple name.
pub const PROXY_SUFFIX: &str = "HookProxy";

/// Channel suffix for entry dispatch (wire contract).
pub const BEFORE_CHANNEL_SUFFIX: &str = "::before";

/// Channel suffix for return-point dispatch (wire contract).
pub const AFTER_CHANNEL_SUFFIX: &str = "::after";

/// Property holding the dispatcher reference on the proxy.
const DISPATCHER_PROPERTY: &str = "eventDispatcher";

/// Property holding the proxy instance's service id.
const SERVICE_ID_PROPERTY: &str = "serviceId";

/// Local binding for the dispatched before-hook event.
const HOOK_EVENT_LOCAL: &str = "__hookEvent";

const DISPATCHER_TYPE: &str = "EventDispatcherInterface";
const BEFORE_EVENT_CLASS: &str = "BeforeHookEvent";
const AFTER_EVENT_CLASS: &str = "AfterHookEvent";

/// A structural input the transform refuses to compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    /// More than one constructor was declared; instrumenting only the
    /// first would silently leave the others unhooked.
    MultipleConstructors { class: String },
    /// A parameter name appears twice in one method, or collides with an
    /// injected dependency name in the constructor.
    DuplicateParameter {
        class: String,
        method: String,
        parameter: String,
    },
}

impl fmt::Display for SynthesisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthesisError::MultipleConstructors { class } => {
                write!(f, "class `{class}` declares more than one constructor")
            }
            SynthesisError::DuplicateParameter {
                class,
                method,
                parameter,
            } => write!(
                f,
                "parameter `{parameter}` of `{class}.{method}` conflicts with another parameter or an injected dependency"
            ),
        }
    }
}

impl std::error::Error for SynthesisError {}

/// Derive the hook proxy declaration for `original`.
///
/// The proxy is named `<SimpleName>HookProxy`, extends the original's
/// qualified name, declares the two injected properties, and contains the
/// (possibly synthesized) extended constructor followed by one wrapped
/// override per non-constructor method, in original declaration order.
/// Original property declarations are not copied; the proxy inherits them.
pub fn synthesize(original: &ClassDeclaration) -> Result<ClassDeclaration, SynthesisError> {
    validate(original)?;

    let mut members = vec![
        ClassMember::Property(PropertyDeclaration::untyped(DISPATCHER_PROPERTY)),
        ClassMember::Property(PropertyDeclaration::typed(SERVICE_ID_PROPERTY, "string")),
    ];

    let constructor = match original.constructor() {
        Some(declared) => extend_constructor(declared),
        None => default_constructor(),
    };
    members.push(ClassMember::Method(constructor));

    for method in original.methods().filter(|m| !m.is_constructor) {
        members.push(ClassMember::Method(transform_method(method)));
    }

    Ok(ClassDeclaration {
        name: QualifiedName::simple(format!("{}{}", original.name.last_segment(), PROXY_SUFFIX)),
        extends: Some(original.name.clone()),
        members,
    })
}

fn validate(class: &ClassDeclaration) -> Result<(), SynthesisError> {
    let class_name = class.name.to_string();

    let constructors = class.methods().filter(|m| m.is_constructor).count();
    if constructors > 1 {
        return Err(SynthesisError::MultipleConstructors { class: class_name });
    }

    for method in class.methods() {
        let mut seen = FxHashSet::default();
        for param in &method.params {
            let collides_with_injection = method.is_constructor
                && (param.name == DISPATCHER_PROPERTY || param.name == SERVICE_ID_PROPERTY);
            if !seen.insert(param.name.as_str()) || collides_with_injection {
                return Err(SynthesisError::DuplicateParameter {
                    class: class_name.clone(),
                    method: method.name.clone(),
                    parameter: param.name.clone(),
                });
            }
        }
    }
    Ok(())
}

// --- Constructor handling ---

/// Append the two injected parameters and field assignments to the declared
/// constructor. The user-written body runs first, then the assignments.
fn extend_constructor(declared: &MethodDeclaration) -> MethodDeclaration {
    let mut constructor = declared.clone();
    constructor
        .params
        .push(Parameter::typed(DISPATCHER_PROPERTY, DISPATCHER_TYPE));
    constructor
        .params
        .push(Parameter::typed(SERVICE_ID_PROPERTY, "string"));
    constructor.body.extend(injected_assignments());
    constructor
}

/// Constructor synthesized for classes that declare none: the injected
/// dependencies still need a binding site. `super()` runs first because the
/// proxy is always a derived class.
fn default_constructor() -> MethodDeclaration {
    let mut body = vec![Stmt::expr_stmt(Expr::call(Expr::id("super"), vec![]))];
    body.extend(injected_assignments());
    MethodDeclaration {
        name: "constructor".to_string(),
        params: vec![
            Parameter::typed(DISPATCHER_PROPERTY, DISPATCHER_TYPE),
            Parameter::typed(SERVICE_ID_PROPERTY, "string"),
        ],
        return_type: None,
        body,
        is_constructor: true,
    }
}

fn injected_assignments() -> Vec<Stmt> {
    vec![
        Stmt::assign(
            Expr::prop(Expr::this(), DISPATCHER_PROPERTY),
            Expr::id(DISPATCHER_PROPERTY),
        ),
        Stmt::assign(
            Expr::prop(Expr::this(), SERVICE_ID_PROPERTY),
            Expr::id(SERVICE_ID_PROPERTY),
        ),
    ]
}

// --- Method handling ---

/// Wrap one non-constructor method: rewrite its return points to dispatch
/// the after-hook, then prepend the before-hook dispatch, the per-parameter
/// override checks (declaration order), and the short-circuit return check.
fn transform_method(method: &MethodDeclaration) -> MethodDeclaration {
    let rewritten = rewrite_returns(method.body.clone(), method);

    let mut body = Vec::with_capacity(rewritten.len() + method.params.len() + 2);
    body.push(Stmt::var_decl(
        HOOK_EVENT_LOCAL,
        dispatch_expr(
            Expr::new_expr(
                BEFORE_EVENT_CLASS,
                vec![arguments_array(method), Expr::this()],
            ),
            &method.name,
            BEFORE_CHANNEL_SUFFIX,
        ),
    ));

    for (index, param) in method.params.iter().enumerate() {
        body.push(Stmt::if_then(
            Expr::method_call(
                Expr::id(HOOK_EVENT_LOCAL),
                "hasArgument",
                vec![Expr::number(index)],
            ),
            vec![Stmt::assign(
                Expr::id(param.name.as_str()),
                Expr::method_call(
                    Expr::id(HOOK_EVENT_LOCAL),
                    "getArgument",
                    vec![Expr::number(index)],
                ),
            )],
        ));
    }

    let short_circuit = if method.returns_void() {
        Stmt::Return(None)
    } else {
        Stmt::Return(Some(Expr::method_call(
            Expr::id(HOOK_EVENT_LOCAL),
            "getReturn",
            vec![],
        )))
    };
    body.push(Stmt::if_then(
        Expr::method_call(Expr::id(HOOK_EVENT_LOCAL), "hasReturn", vec![]),
        vec![short_circuit],
    ));

    body.extend(rewritten);

    MethodDeclaration {
        name: method.name.clone(),
        params: method.params.clone(),
        return_type: method.return_type.clone(),
        body,
        is_constructor: false,
    }
}

/// Rewrite every return statement, however deeply nested in blocks or
/// compound-statement bodies, to route its value through the after-hook.
///
/// A valueless `return;` still dispatches (with `undefined` as the original
/// value) but stays a bare return so void methods remain void-compatible.
fn rewrite_returns(stmts: Vec<Stmt>, method: &MethodDeclaration) -> Vec<Stmt> {
    let mut out = Vec::with_capacity(stmts.len());
    for stmt in stmts {
        match stmt {
            Stmt::Return(Some(original)) => {
                out.push(Stmt::Return(Some(Expr::method_call(
                    after_dispatch(method, original),
                    "getReturn",
                    vec![],
                ))));
            }
            Stmt::Return(None) => {
                out.push(Stmt::expr_stmt(after_dispatch(method, Expr::Undefined)));
                out.push(Stmt::Return(None));
            }
            Stmt::Block(inner) => out.push(Stmt::Block(rewrite_returns(inner, method))),
            Stmt::Compound(clauses) => out.push(Stmt::Compound(
                clauses
                    .into_iter()
                    .map(|mut clause| {
                        clause.body = rewrite_returns(clause.body, method);
                        clause
                    })
                    .collect(),
            )),
            other => out.push(other),
        }
    }
    out
}

/// `this.eventDispatcher.dispatch(new AfterHookEvent([args], this, original), this.serviceId + "::name::after")`
fn after_dispatch(method: &MethodDeclaration, original_value: Expr) -> Expr {
    dispatch_expr(
        Expr::new_expr(
            AFTER_EVENT_CLASS,
            vec![arguments_array(method), Expr::this(), original_value],
        ),
        &method.name,
        AFTER_CHANNEL_SUFFIX,
    )
}

/// `this.eventDispatcher.dispatch(event, this.serviceId + "::<method><suffix>")`
fn dispatch_expr(event: Expr, method_name: &str, channel_suffix: &str) -> Expr {
    Expr::method_call(
        Expr::prop(Expr::this(), DISPATCHER_PROPERTY),
        "dispatch",
        vec![
            event,
            Expr::concat(
                Expr::prop(Expr::this(), SERVICE_ID_PROPERTY),
                Expr::string(format!("::{method_name}{channel_suffix}")),
            ),
        ],
    )
}

/// The call arguments as seen by hook events: the declared parameter
/// bindings, in order.
fn arguments_array(method: &MethodDeclaration) -> Expr {
    Expr::array(
        method
            .params
            .iter()
            .map(|param| Expr::id(param.name.as_str()))
            .collect(),
    )
}
