use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for `tshook`.
#[derive(Parser, Debug)]
#[command(
    name = "tshook",
    version,
    about = "Generate hook proxy classes wrapping methods with before/after event dispatch"
)]
pub struct CliArgs {
    /// Build manifest: JSON mapping qualified class names to source files.
    pub manifest: PathBuf,

    /// Directory the generated artifact is written to.
    /// Overrides `cacheDir` from the manifest; defaults to `.tshook`.
    #[arg(long = "cache-dir")]
    pub cache_dir: Option<PathBuf>,

    /// Generate and write the artifact without loading it into the
    /// process registry.
    #[arg(long = "emit-only")]
    pub emit_only: bool,

    /// Print the generated source to stdout instead of writing the
    /// artifact.
    #[arg(long)]
    pub print: bool,
}
