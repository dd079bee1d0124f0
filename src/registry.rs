//! Process-wide proxy registry.
//!
//! Loading a generated artifact makes its proxy declarations available to
//! the rest of the process; this module is that "type registry". It is the
//! one piece of global state in the crate, and only the artifact load step
//! writes to it — generation never touches it, so `generate` stays
//! referentially transparent.

use crate::syntax::ClassDeclaration;
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use std::sync::{Arc, RwLock};

static REGISTRY: Lazy<RwLock<FxHashMap<String, Arc<ClassDeclaration>>>> =
    Lazy::new(|| RwLock::new(FxHashMap::default()));

/// Register a loaded proxy declaration under its class name.
/// Re-registering replaces the previous entry (a rebuilt artifact wins).
pub fn register(class: ClassDeclaration) {
    let name = class.name.to_string();
    let mut registry = REGISTRY.write().expect("registry poisoned");
    registry.insert(name, Arc::new(class));
}

/// Look up a loaded proxy declaration by class name.
pub fn lookup(name: &str) -> Option<Arc<ClassDeclaration>> {
    let registry = REGISTRY.read().expect("registry poisoned");
    registry.get(name).cloned()
}

/// True when a proxy with this name has been loaded.
pub fn is_loaded(name: &str) -> bool {
    let registry = REGISTRY.read().expect("registry poisoned");
    registry.contains_key(name)
}

/// Names of every loaded proxy, sorted for stable output.
pub fn loaded_names() -> Vec<String> {
    let registry = REGISTRY.read().expect("registry poisoned");
    let mut names: Vec<String> = registry.keys().cloned().collect();
    names.sort();
    names
}

/// Drop every registration. Test support.
pub fn clear() {
    let mut registry = REGISTRY.write().expect("registry poisoned");
    registry.clear();
}
