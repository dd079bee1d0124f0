//! Artifact persistence.
//!
//! The batch driver hands this module one concatenated source buffer; it
//! lands on disk as a single file inside the cache directory. Writing goes
//! through a temp file followed by a rename, so a crash mid-write can
//! never leave a torn artifact that a later load would half-trust.
//!
//! Loading parses the artifact back and registers every proxy declaration
//! in the process [`registry`](crate::registry). Parse failure leaves the
//! registry untouched and is reported to the caller — the process must not
//! continue believing hooks are active when they are not.

use crate::parser::ParserState;
use crate::registry;
use crate::syntax::ClassDeclaration;
use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};

/// File name of the generated artifact inside the cache directory.
pub const ARTIFACT_FILE_NAME: &str = "hooks.generated.ts";

const ARTIFACT_BANNER: &str = "// Generated by tshook. Do not edit.\n";

/// Persist `code` as the hook artifact under `cache_dir`.
pub fn write_artifact(cache_dir: &Path, code: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(cache_dir)
        .with_context(|| format!("creating cache directory `{}`", cache_dir.display()))?;

    let artifact_path = cache_dir.join(ARTIFACT_FILE_NAME);
    let temp_path = cache_dir.join(format!("{ARTIFACT_FILE_NAME}.tmp"));

    let mut contents = String::with_capacity(ARTIFACT_BANNER.len() + code.len());
    contents.push_str(ARTIFACT_BANNER);
    contents.push_str(code);

    std::fs::write(&temp_path, contents)
        .with_context(|| format!("writing `{}`", temp_path.display()))?;
    std::fs::rename(&temp_path, &artifact_path).with_context(|| {
        format!(
            "moving `{}` into place as `{}`",
            temp_path.display(),
            artifact_path.display()
        )
    })?;

    tracing::info!(path = %artifact_path.display(), bytes = code.len(), "wrote hook artifact");
    Ok(artifact_path)
}

/// Load the artifact at `path` into the process registry.
///
/// Returns the declarations that were registered. Nothing is registered
/// unless the whole artifact parses cleanly.
pub fn load_artifact(path: &Path) -> Result<Vec<ClassDeclaration>> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("reading hook artifact `{}`", path.display()))?;

    let file_name = path.display().to_string();
    let mut parser = ParserState::new(file_name.clone(), &source);
    let unit = parser.parse_source_unit();

    if parser.diagnostics.has_errors() {
        bail!(
            "hook artifact `{}` is not loadable:\n{}",
            path.display(),
            parser.diagnostics.format_all(&file_name, &source)
        );
    }
    if unit.classes.is_empty() {
        bail!("hook artifact `{}` contains no classes", path.display());
    }

    for class in &unit.classes {
        registry::register(class.clone());
    }
    tracing::info!(
        path = %path.display(),
        proxies = unit.classes.len(),
        "loaded hook artifact into registry"
    );
    Ok(unit.classes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry;

    #[test]
    fn write_then_load_registers_proxies() {
        let dir = tempfile::tempdir().expect("temp dir");
        let code = "class ArtifactRoundTripHookProxy extends ArtifactRoundTrip {\n}\n";
        let path = write_artifact(dir.path(), code).unwrap();
        assert_eq!(path.file_name().unwrap(), ARTIFACT_FILE_NAME);

        let classes = load_artifact(&path).unwrap();
        assert_eq!(classes.len(), 1);
        assert!(registry::is_loaded("ArtifactRoundTripHookProxy"));
    }

    #[test]
    fn banner_is_invisible_to_the_loader() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_artifact(dir.path(), "class ArtifactBannerHookProxy {\n}\n").unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("// Generated by tshook."));
        assert!(load_artifact(&path).is_ok());
    }

    #[test]
    fn corrupt_artifact_fails_and_registers_nothing() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(ARTIFACT_FILE_NAME);
        std::fs::write(&path, "class ArtifactCorruptHookProxy {").unwrap();
        assert!(load_artifact(&path).is_err());
        assert!(!registry::is_loaded("ArtifactCorruptHookProxy"));
    }

    #[test]
    fn no_temp_file_left_behind() {
        let dir = tempfile::tempdir().expect("temp dir");
        write_artifact(dir.path(), "class ArtifactTempHookProxy {\n}\n").unwrap();
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .filter(|n| n.to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
