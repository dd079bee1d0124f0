//! CLI driver: wires the manifest, the batch builder, and the artifact
//! steps together according to the chosen flags.

use crate::artifact;
use crate::builder::HookBuilder;
use crate::cli::args::CliArgs;
use crate::cli::config::load_manifest;
use anyhow::Result;
use std::path::PathBuf;

const DEFAULT_CACHE_DIR: &str = ".tshook";

/// Run one invocation. Returns the human-readable summary printed on
/// success (kept out of stdout when `--print` is streaming the artifact).
pub fn run(args: &CliArgs) -> Result<String> {
    let manifest = load_manifest(&args.manifest)?;

    let cache_dir: PathBuf = args
        .cache_dir
        .clone()
        .or_else(|| manifest.cache_dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR));
    let builder = HookBuilder::new(cache_dir);

    if args.print {
        let generated = builder.generate(&manifest.classes)?;
        print!("{}", generated.code);
        return Ok(format!(
            "generated {} hook proxies (not persisted)",
            generated.proxy_names.len()
        ));
    }

    if args.emit_only {
        let generated = builder.generate(&manifest.classes)?;
        let path = artifact::write_artifact(builder.cache_dir(), &generated.code)?;
        return Ok(format!(
            "wrote {} hook proxies to {}",
            generated.proxy_names.len(),
            path.display()
        ));
    }

    let outcome = builder.build(&manifest.classes)?;
    Ok(format!(
        "built and loaded {} hook proxies from {}",
        outcome.proxy_names.len(),
        outcome.artifact_path.display()
    ))
}
