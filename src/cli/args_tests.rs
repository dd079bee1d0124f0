use clap::Parser;
use std::path::PathBuf;

use super::args::CliArgs;

#[test]
fn parses_defaults() {
    let args = CliArgs::try_parse_from(["tshook", "hooks.json"]).expect("default args should parse");

    assert_eq!(args.manifest, PathBuf::from("hooks.json"));
    assert!(args.cache_dir.is_none());
    assert!(!args.emit_only);
    assert!(!args.print);
}

#[test]
fn parses_common_flags() {
    let args = CliArgs::try_parse_from([
        "tshook",
        "--cache-dir",
        "build/hooks",
        "--emit-only",
        "config/hooks.json",
    ])
    .expect("flagged args should parse");

    assert_eq!(args.manifest, PathBuf::from("config/hooks.json"));
    assert_eq!(args.cache_dir, Some(PathBuf::from("build/hooks")));
    assert!(args.emit_only);
    assert!(!args.print);
}

#[test]
fn manifest_is_required() {
    assert!(CliArgs::try_parse_from(["tshook"]).is_err());
}
