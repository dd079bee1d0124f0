//! Batch driver.
//!
//! [`HookBuilder`] walks the build manifest in order, derives a hook proxy
//! for every class, and concatenates the printed proxies into one
//! artifact. Generation is all-or-nothing: the first failure aborts the
//! batch with an error naming the offending class, and nothing is written
//! — a partially generated artifact would load a subset of proxies and
//! silently leave the rest of the system unhooked.
//!
//! `generate` has no side effects beyond reading the input files.
//! [`HookBuilder::build`] additionally writes the artifact and loads it
//! into the process registry; callers that need the two effects separated
//! (e.g. a build step that ships the artifact elsewhere) call
//! [`HookBuilder::generate`] and [`artifact::write_artifact`] themselves.

use crate::artifact;
use crate::loader;
use crate::printer;
use crate::transforms;
use anyhow::{Context, Result};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// The concatenated output of one generation pass.
#[derive(Debug, Clone)]
pub struct GeneratedArtifact {
    /// Printed proxy declarations, in manifest order.
    pub code: String,
    /// Generated proxy class names, in manifest order.
    pub proxy_names: Vec<String>,
}

/// Result of a full build: artifact written and loaded.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub artifact_path: PathBuf,
    pub proxy_names: Vec<String>,
}

/// Drives load → synthesize → print over a manifest of classes.
pub struct HookBuilder {
    cache_dir: PathBuf,
}

impl HookBuilder {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        HookBuilder {
            cache_dir: cache_dir.into(),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Generate proxy source for every manifest entry, in manifest order.
    ///
    /// Pure apart from reading the listed source files: no artifact is
    /// written and the registry is untouched, even on failure.
    pub fn generate(&self, classes: &IndexMap<String, PathBuf>) -> Result<GeneratedArtifact> {
        if classes.is_empty() {
            anyhow::bail!("build manifest lists no classes");
        }

        let mut code = String::new();
        let mut proxy_names = Vec::with_capacity(classes.len());

        for (qualified_name, path) in classes {
            let printed = generate_one(qualified_name, path)
                .with_context(|| format!("generating hook proxy for `{qualified_name}`"))?;
            if !code.is_empty() {
                code.push('\n');
            }
            code.push_str(&printed.code);
            proxy_names.push(printed.proxy_name);
        }

        tracing::info!(classes = classes.len(), "generated hook proxies");
        Ok(GeneratedArtifact { code, proxy_names })
    }

    /// Generate, persist, and load the artifact.
    ///
    /// Side effect: on success the generated proxies become visible in the
    /// process [`registry`](crate::registry). A failure at any stage
    /// leaves no artifact behind and the registry unchanged.
    pub fn build(&self, classes: &IndexMap<String, PathBuf>) -> Result<BuildOutcome> {
        let generated = self.generate(classes)?;
        let artifact_path = artifact::write_artifact(&self.cache_dir, &generated.code)?;
        artifact::load_artifact(&artifact_path)?;
        Ok(BuildOutcome {
            artifact_path,
            proxy_names: generated.proxy_names,
        })
    }
}

struct PrintedProxy {
    code: String,
    proxy_name: String,
}

/// One class through the pipeline: load, synthesize, print.
///
/// The directive prologue of the source file is dropped here; file-level
/// pragmas are meaningless once several units share one artifact.
fn generate_one(qualified_name: &str, path: &Path) -> Result<PrintedProxy> {
    let loaded = loader::load_class(qualified_name, path)?;
    let proxy = transforms::synthesize(&loaded.class)?;
    let proxy_name = proxy.name.to_string();
    let code = printer::print_class(&proxy);
    tracing::debug!(class = qualified_name, proxy = %proxy_name, "synthesized hook proxy");
    Ok(PrintedProxy { code, proxy_name })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn manifest(entries: &[(&str, PathBuf)]) -> IndexMap<String, PathBuf> {
        entries
            .iter()
            .map(|(name, path)| (name.to_string(), path.clone()))
            .collect()
    }

    #[test]
    fn generates_in_manifest_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.ts");
        let b = dir.path().join("b.ts");
        fs::write(&a, "class Alpha { constructor() {} }").unwrap();
        fs::write(&b, "class Beta { constructor() {} }").unwrap();

        let builder = HookBuilder::new(dir.path().join("cache"));
        let generated = builder
            .generate(&manifest(&[("App.Beta", b), ("App.Alpha", a)]))
            .unwrap();

        assert_eq!(generated.proxy_names, vec!["BetaHookProxy", "AlphaHookProxy"]);
        let beta_at = generated.code.find("class BetaHookProxy").unwrap();
        let alpha_at = generated.code.find("class AlphaHookProxy").unwrap();
        assert!(beta_at < alpha_at, "manifest order must be preserved");
    }

    #[test]
    fn failure_names_the_class_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.ts");
        fs::write(&good, "class Good { constructor() {} }").unwrap();
        let cache = dir.path().join("cache");

        let builder = HookBuilder::new(&cache);
        let err = builder
            .build(&manifest(&[
                ("App.Good", good),
                ("App.Missing", dir.path().join("missing.ts")),
            ]))
            .unwrap_err();

        assert!(format!("{err:#}").contains("App.Missing"));
        assert!(
            !cache.join(artifact::ARTIFACT_FILE_NAME).exists(),
            "no artifact may exist after a failed batch"
        );
    }

    #[test]
    fn generate_strips_directives() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("c.ts");
        fs::write(&src, "\"use strict\";\nclass Gamma { constructor() {} }").unwrap();

        let builder = HookBuilder::new(dir.path().join("cache"));
        let generated = builder.generate(&manifest(&[("App.Gamma", src)])).unwrap();
        assert!(!generated.code.contains("use strict"));
    }
}
