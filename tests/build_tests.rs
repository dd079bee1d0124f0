//! End-to-end batch build tests: manifest in, loaded registry out.

use std::fs;
use std::path::PathBuf;

use indexmap::IndexMap;
use tshook::artifact::ARTIFACT_FILE_NAME;
use tshook::cli::args::CliArgs;
use tshook::cli::driver;
use tshook::{HookBuilder, registry};

fn write_source(dir: &std::path::Path, file: &str, content: &str) -> PathBuf {
    let path = dir.join(file);
    fs::write(&path, content).expect("write source");
    path
}

#[test]
fn build_generates_loads_and_registers_in_manifest_order() {
    let dir = tempfile::tempdir().unwrap();
    let mailer = write_source(
        dir.path(),
        "mailer.ts",
        "\"use strict\";
class BuildMailer {
    constructor(transport: Transport) {
        this.transport = transport;
    }
    send(to: string): boolean {
        return this.transport.deliver(to);
    }
}",
    );
    let audit = write_source(
        dir.path(),
        "audit.ts",
        "class BuildAudit {
    constructor() {}
    record(entry: Entry): void {
        this.entries.push(entry);
    }
}",
    );

    let mut classes = IndexMap::new();
    classes.insert("App.BuildMailer".to_string(), mailer);
    classes.insert("App.BuildAudit".to_string(), audit);

    let cache = dir.path().join("cache");
    let outcome = HookBuilder::new(&cache).build(&classes).unwrap();

    assert_eq!(
        outcome.proxy_names,
        vec!["BuildMailerHookProxy", "BuildAuditHookProxy"]
    );
    assert_eq!(outcome.artifact_path, cache.join(ARTIFACT_FILE_NAME));

    let code = fs::read_to_string(&outcome.artifact_path).unwrap();
    assert!(code.starts_with("// Generated by tshook."));
    // Directive pragmas from individual files never reach the artifact.
    assert!(!code.contains("use strict"));
    // Manifest order is artifact order.
    let mailer_at = code.find("class BuildMailerHookProxy extends App.BuildMailer").unwrap();
    let audit_at = code.find("class BuildAuditHookProxy extends App.BuildAudit").unwrap();
    assert!(mailer_at < audit_at);
    // Wire contract: channel names are serviceId + "::<method>::<phase>".
    assert!(code.contains("this.serviceId + \"::send::before\""));
    assert!(code.contains("this.serviceId + \"::send::after\""));
    assert!(code.contains("this.serviceId + \"::record::before\""));

    // The load step is what makes proxies visible to the process.
    assert!(registry::is_loaded("BuildMailerHookProxy"));
    assert!(registry::is_loaded("BuildAuditHookProxy"));
    let proxy = registry::lookup("BuildMailerHookProxy").unwrap();
    assert_eq!(
        proxy.extends.as_ref().map(|e| e.to_string()),
        Some("App.BuildMailer".to_string())
    );
}

#[test]
fn mid_batch_failure_leaves_no_artifact_and_registers_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let fine = write_source(
        dir.path(),
        "fine.ts",
        "class BuildFine { constructor() {} poke(): void {} }",
    );
    let broken = write_source(
        dir.path(),
        "broken.ts",
        // Brace-less return: rejected by the parser.
        "class BuildBroken { constructor() {} m(x: boolean): number { if (x) return 1; return 0; } }",
    );

    let mut classes = IndexMap::new();
    classes.insert("App.BuildFine".to_string(), fine);
    classes.insert("App.BuildBroken".to_string(), broken);

    let cache = dir.path().join("cache");
    let err = HookBuilder::new(&cache).build(&classes).unwrap_err();

    // The failure names the offending class.
    assert!(format!("{err:#}").contains("App.BuildBroken"));
    // No artifact may be considered valid after a mid-batch failure.
    assert!(!cache.join(ARTIFACT_FILE_NAME).exists());
    assert!(!registry::is_loaded("BuildFineHookProxy"));
}

#[test]
fn driver_emit_only_writes_but_does_not_load() {
    let dir = tempfile::tempdir().unwrap();
    write_source(
        dir.path(),
        "quiet.ts",
        "class BuildQuiet { constructor() {} hush(): void {} }",
    );
    let manifest_path = dir.path().join("hooks.json");
    fs::write(
        &manifest_path,
        r#"{ "classes": { "App.BuildQuiet": "quiet.ts" }, "cacheDir": "cache" }"#,
    )
    .unwrap();

    let args = CliArgs {
        manifest: manifest_path,
        cache_dir: None,
        emit_only: true,
        print: false,
    };
    let summary = driver::run(&args).unwrap();
    assert!(summary.contains("wrote 1 hook proxies"));

    let artifact = dir.path().join("cache").join(ARTIFACT_FILE_NAME);
    assert!(artifact.exists());
    assert!(!registry::is_loaded("BuildQuietHookProxy"));
}

#[test]
fn driver_cache_dir_flag_overrides_manifest() {
    let dir = tempfile::tempdir().unwrap();
    write_source(
        dir.path(),
        "over.ts",
        "class BuildOverride { constructor() {} nop(): void {} }",
    );
    let manifest_path = dir.path().join("hooks.json");
    fs::write(
        &manifest_path,
        r#"{ "classes": { "App.BuildOverride": "over.ts" }, "cacheDir": "ignored" }"#,
    )
    .unwrap();

    let flag_cache = dir.path().join("flagged");
    let args = CliArgs {
        manifest: manifest_path,
        cache_dir: Some(flag_cache.clone()),
        emit_only: true,
        print: false,
    };
    driver::run(&args).unwrap();

    assert!(flag_cache.join(ARTIFACT_FILE_NAME).exists());
    assert!(!dir.path().join("ignored").exists());
}

#[test]
fn rebuilding_replaces_the_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source(
        dir.path(),
        "evolve.ts",
        "class BuildEvolve { constructor() {} one(): void {} }",
    );
    let mut classes = IndexMap::new();
    classes.insert("App.BuildEvolve".to_string(), source.clone());

    let cache = dir.path().join("cache");
    let builder = HookBuilder::new(&cache);
    builder.build(&classes).unwrap();

    // Grow the class, rebuild, and the artifact must reflect it.
    fs::write(
        &source,
        "class BuildEvolve { constructor() {} one(): void {} two(): void {} }",
    )
    .unwrap();
    builder.build(&classes).unwrap();

    let code = fs::read_to_string(cache.join(ARTIFACT_FILE_NAME)).unwrap();
    assert!(code.contains("::two::before"));
    let loaded = registry::lookup("BuildEvolveHookProxy").unwrap();
    assert!(loaded.methods().any(|m| m.name == "two"));
}
