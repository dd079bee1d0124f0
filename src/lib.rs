//! tshook — hook proxy generator.
//!
//! Given a class declaration, tshook derives a `<Name>HookProxy` subclass
//! whose methods dispatch a before-hook on entry (argument override,
//! short-circuit return) and an after-hook at every return point (return
//! value override), without touching the original class. Proxies receive
//! two extra constructor dependencies: the event dispatcher and a service
//! id that namespaces their event channels
//! (`<serviceId>::<method>::before` / `::after`).
//!
//! # Pipeline
//!
//! ```text
//! manifest → loader (parse + locate class)
//!          → transforms::hook_proxy (pure tree-to-tree)
//!          → printer (tree-to-source)
//!          → artifact (concatenate, persist atomically)
//!          → registry (load step; the only process-level side effect)
//! ```
//!
//! The transform itself never fails for structurally valid input and never
//! performs I/O; everything effectful lives at the edges (`loader`,
//! `artifact`, `registry`).

// Syntax tree for the class dialect, plus builder constructors
pub mod syntax;

// Scanner - token definitions and scanning over source text
pub mod scanner;

// Parser - source text to SourceUnit, collecting diagnostics
pub mod parser;

// Transforms - the hook proxy derivation
pub mod transforms;

// Printer - syntax tree back to emittable source
pub mod printer;

// Source Loader boundary - file to validated class declaration
pub mod loader;

// Artifact persistence - atomic write + load of the generated file
pub mod artifact;

// Process-wide registry of loaded proxies
pub mod registry;

// Batch driver over a build manifest
pub mod builder;

// Native CLI support for the tshook binary
pub mod cli;

// Span - source location tracking (byte offsets)
pub mod span;

// Diagnostics - error collection and formatting
pub mod diagnostics;

// Tracing setup (TSHOOK_LOG / TSHOOK_LOG_FORMAT)
pub mod tracing_config;

pub use builder::{BuildOutcome, GeneratedArtifact, HookBuilder};
pub use syntax::{ClassDeclaration, ClassMember, MethodDeclaration, Parameter, QualifiedName};
pub use transforms::{SynthesisError, synthesize};
