//! Syntax-tree transforms.
//!
//! One transform lives here: the hook proxy derivation. It consumes an
//! immutable class declaration and produces a fresh proxy declaration;
//! printing is a separate phase (see [`crate::printer`]), so the transform
//! stays testable on tree structure alone.

pub mod hook_proxy;

pub use hook_proxy::{SynthesisError, synthesize};
