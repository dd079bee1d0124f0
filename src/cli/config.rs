//! Build manifest loading.
//!
//! The manifest is a JSON file:
//!
//! ```json
//! {
//!     "classes": {
//!         "App.Services.Mailer": "src/services/mailer.ts",
//!         "App.Repo.Users": "src/repo/users.ts"
//!     },
//!     "cacheDir": ".tshook"
//! }
//! ```
//!
//! The textual order of the `classes` object is the batch order — entries
//! deserialize into an [`IndexMap`], and relative source paths resolve
//! against the manifest's own directory so a manifest works no matter
//! where the tool is invoked from.

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Manifest {
    /// Qualified class name → source file, in generation order.
    pub classes: IndexMap<String, PathBuf>,
    /// Optional cache directory, overridable from the command line.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

/// Read and parse the manifest at `path`, resolving relative source paths
/// against the manifest's directory.
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading manifest `{}`", path.display()))?;
    let mut manifest: Manifest = serde_json::from_str(&text)
        .with_context(|| format!("parsing manifest `{}`", path.display()))?;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    for source in manifest.classes.values_mut() {
        if source.is_relative() {
            *source = base.join(&*source);
        }
    }
    if let Some(cache_dir) = &mut manifest.cache_dir {
        if cache_dir.is_relative() {
            *cache_dir = base.join(&*cache_dir);
        }
    }
    Ok(manifest)
}
