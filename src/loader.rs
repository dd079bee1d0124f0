//! Source loading boundary.
//!
//! Bridges the filesystem and the parser: reads a file, parses it, and
//! pins down the one class declaration the batch driver asked for. The
//! qualified name comes from the build manifest, not the source file (the
//! file declares only the simple name); the loader verifies the two agree
//! and rebinds the declaration to its fully qualified name so the
//! transform can derive the proxy's `extends` clause from it.

use crate::parser::ParserState;
use crate::syntax::{ClassDeclaration, QualifiedName};
use anyhow::{Context, Result, bail};
use std::path::Path;

/// A class pulled out of a source file, ready for transformation.
#[derive(Debug, Clone)]
pub struct LoadedClass {
    pub class: ClassDeclaration,
    /// Directive prologue statements stripped from the top of the file.
    pub directives: Vec<String>,
}

/// Load and validate the class `qualified_name` from `path`.
pub fn load_class(qualified_name: &str, path: &Path) -> Result<LoadedClass> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("reading source file `{}`", path.display()))?;

    let file_name = path.display().to_string();
    let mut parser = ParserState::new(file_name.clone(), &source);
    let unit = parser.parse_source_unit();

    if parser.diagnostics.has_errors() {
        bail!(
            "parse errors in `{}`:\n{}",
            path.display(),
            parser.diagnostics.format_all(&file_name, &source)
        );
    }

    let mut classes = unit.classes;
    let class = match classes.len() {
        0 => bail!("no class declaration found in `{}`", path.display()),
        1 => classes.remove(0),
        n => bail!(
            "expected a single class declaration in `{}`, found {n}",
            path.display()
        ),
    };

    let name = QualifiedName::from_dotted(qualified_name);
    if class.name.last_segment() != name.last_segment() {
        bail!(
            "`{}` declares class `{}`, expected `{}`",
            path.display(),
            class.name,
            name.last_segment()
        );
    }

    tracing::debug!(
        class = qualified_name,
        file = %path.display(),
        directives = unit.directives.len(),
        "loaded class declaration"
    );

    Ok(LoadedClass {
        class: ClassDeclaration { name, ..class },
        directives: unit.directives,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(content.as_bytes()).expect("write");
        file
    }

    #[test]
    fn loads_and_rebinds_qualified_name() {
        let file = write_temp(
            "\"use strict\";\nclass Mailer { constructor() {} send(to: string): void {} }",
        );
        let loaded = load_class("App.Services.Mailer", file.path()).unwrap();
        assert_eq!(loaded.class.name.to_string(), "App.Services.Mailer");
        assert_eq!(loaded.directives, vec!["\"use strict\"".to_string()]);
    }

    #[test]
    fn rejects_simple_name_mismatch() {
        let file = write_temp("class Mailer { constructor() {} }");
        let err = load_class("App.Postman", file.path()).unwrap_err();
        assert!(err.to_string().contains("declares class `Mailer`"));
    }

    #[test]
    fn rejects_file_without_class() {
        let file = write_temp("\"use strict\";");
        let err = load_class("App.Mailer", file.path()).unwrap_err();
        assert!(err.to_string().contains("no class declaration"));
    }

    #[test]
    fn rejects_multiple_classes() {
        let file = write_temp("class A {} class B {}");
        let err = load_class("App.A", file.path()).unwrap_err();
        assert!(err.to_string().contains("found 2"));
    }

    #[test]
    fn missing_file_error_names_the_path() {
        let err = load_class("App.Gone", Path::new("/nonexistent/gone.ts")).unwrap_err();
        assert!(err.to_string().contains("gone.ts"));
    }

    #[test]
    fn parse_errors_are_fatal_and_located() {
        let file = write_temp("class Broken { constructor() { if (x) return 1; } }");
        let err = load_class("App.Broken", file.path()).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("parse errors"), "unexpected error: {message}");
    }
}
