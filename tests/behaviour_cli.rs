//! End-to-end CLI behaviour tests for `depseal`.
//!
//! These scenarios build a scratch project with a dependency cache and an
//! artifact listing, then invoke the compiled binary from that directory.
//! Tests use the rstest-bdd v0.5.0 mutable world pattern.

use camino::Utf8PathBuf;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};
use std::process::{Command, Output};
use tempfile::TempDir;

const LISTING_FILE: &str = "listing.json";
const CONFIG_FILE: &str = "depseal.toml";

struct CliWorld {
    temp_dir: TempDir,
    scopes: Vec<Value>,
    artifacts: Vec<Value>,
    config_lines: Vec<String>,
    output: Option<Output>,
}

#[fixture]
fn cli_world() -> CliWorld {
    CliWorld {
        temp_dir: TempDir::new().expect("temp dir"),
        scopes: Vec::new(),
        artifacts: Vec::new(),
        config_lines: Vec::new(),
        output: None,
    }
}

fn root(world: &CliWorld) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(world.temp_dir.path().to_path_buf()).expect("utf-8 temp path")
}

/// Map `group:name:version` to its path in the scratch cache.
fn cache_path(world: &CliWorld, coordinates: &str) -> Utf8PathBuf {
    let mut parts = coordinates.split(':');
    let mut next = || parts.next().expect("group:name:version");
    let (group, name, version) = (next(), next(), next());
    root(world)
        .join("cache")
        .join(group)
        .join(name)
        .join(version)
        .join("c0ffee")
        .join(format!("{name}-{version}.jar"))
}

/// Write the listing and configuration the binary reads on start-up.
fn write_inputs(world: &CliWorld) {
    let mut scopes = vec![json!({"name": "runtimeClasspath", "artifacts": world.artifacts})];
    scopes.extend(world.scopes.iter().cloned());
    let listing = json!({
        "project": {"name": "app", "dir": root(world).join("app")},
        "scopes": scopes,
    });
    std::fs::write(root(world).join(LISTING_FILE), listing.to_string()).expect("write listing");

    if !world.config_lines.is_empty() {
        let config = world.config_lines.join("\n") + "\n";
        std::fs::write(root(world).join(CONFIG_FILE), config).expect("write configuration");
    }
}

fn run_depseal(world: &CliWorld, args: &str) -> Output {
    write_inputs(world);
    Command::new(env!("CARGO_BIN_EXE_depseal"))
        .args(args.split_whitespace())
        .current_dir(world.temp_dir.path())
        .output()
        .expect("failed to run depseal")
}

fn output(world: &CliWorld) -> &Output {
    world.output.as_ref().expect("depseal has not been run")
}

// ---------------------------------------------------------------------------
// Step definitions
// ---------------------------------------------------------------------------

#[given("a cached artifact \"{coordinates}\"")]
fn given_cached_artifact(cli_world: &mut CliWorld, coordinates: String) {
    let path = cache_path(cli_world, &coordinates);
    let parent = path.parent().expect("cache path has a parent");
    std::fs::create_dir_all(parent).expect("create cache dir");
    std::fs::write(&path, coordinates.as_bytes()).expect("write artifact");
    let version = coordinates.rsplit(':').next().expect("version");
    cli_world
        .artifacts
        .push(json!({"path": path, "version": version}));
}

#[given("the build also resolves a scope \"{scope}\" with a malformed path")]
fn given_malformed_scope(cli_world: &mut CliWorld, scope: String) {
    cli_world.scopes.push(json!({
        "name": scope,
        "artifacts": [{"path": "/loose/lint.jar", "version": "1.0"}],
    }));
}

#[given("depseal is configured with the project listing")]
fn given_listing_configured(cli_world: &mut CliWorld) {
    cli_world
        .config_lines
        .push(format!("listing = \"{LISTING_FILE}\""));
}

#[given("depseal excludes the scope \"{scope}\"")]
fn given_excluded_scope(cli_world: &mut CliWorld, scope: String) {
    cli_world
        .config_lines
        .push(format!("excluded_scopes = \"{scope}\""));
}

#[given("the configuration contains an unknown key")]
fn given_unknown_key(cli_world: &mut CliWorld) {
    cli_world.config_lines.push("verify_all = true".to_owned());
}

#[given("the manifest has been generated to \"{file}\"")]
fn given_generated_manifest(cli_world: &mut CliWorld, file: String) {
    let generated = run_depseal(cli_world, &format!("generate --output {file}"));
    assert!(
        generated.status.success(),
        "generate failed: {}",
        String::from_utf8_lossy(&generated.stderr)
    );
}

#[given("the artifact \"{coordinates}\" has been tampered with")]
fn given_tampered_artifact(cli_world: &mut CliWorld, coordinates: String) {
    let path = cache_path(cli_world, &coordinates);
    std::fs::write(path, b"tampered").expect("tamper with artifact");
}

#[when("depseal is run with \"{args}\"")]
fn when_depseal_run(cli_world: &mut CliWorld, args: String) {
    let result = run_depseal(cli_world, &args);
    cli_world.output = Some(result);
}

#[then("the command succeeds")]
fn then_command_succeeds(cli_world: &mut CliWorld) {
    let result = output(cli_world);
    assert!(
        result.status.success(),
        "expected success, stderr: {}",
        String::from_utf8_lossy(&result.stderr)
    );
}

#[then("the command fails")]
fn then_command_fails(cli_world: &mut CliWorld) {
    let result = output(cli_world);
    assert_eq!(result.status.code(), Some(1));
}

#[then("stdout contains \"{text}\"")]
fn then_stdout_contains(cli_world: &mut CliWorld, text: String) {
    let stdout = String::from_utf8_lossy(&output(cli_world).stdout).into_owned();
    assert!(stdout.contains(&text), "expected {text:?} in stdout: {stdout}");
}

#[then("stderr contains \"{text}\"")]
fn then_stderr_contains(cli_world: &mut CliWorld, text: String) {
    let stderr = String::from_utf8_lossy(&output(cli_world).stderr).into_owned();
    assert!(stderr.contains(&text), "expected {text:?} in stderr: {stderr}");
}

// ---------------------------------------------------------------------------
// Scenario bindings
// ---------------------------------------------------------------------------

#[scenario(
    path = "tests/features/cli.feature",
    name = "Generated manifest verifies the unchanged cache"
)]
fn scenario_generate_then_verify(cli_world: CliWorld) {
    let _ = cli_world;
}

#[scenario(
    path = "tests/features/cli.feature",
    name = "Tampered artifact fails verification"
)]
fn scenario_tampered_artifact(cli_world: CliWorld) {
    let _ = cli_world;
}

#[scenario(
    path = "tests/features/cli.feature",
    name = "Verification without a manifest is not configured"
)]
fn scenario_without_manifest(cli_world: CliWorld) {
    let _ = cli_world;
}

#[scenario(
    path = "tests/features/cli.feature",
    name = "Configured exclusions skip a scope"
)]
fn scenario_configured_exclusions(cli_world: CliWorld) {
    let _ = cli_world;
}

#[scenario(
    path = "tests/features/cli.feature",
    name = "Malformed paths in unexcluded scopes are rejected"
)]
fn scenario_malformed_path(cli_world: CliWorld) {
    let _ = cli_world;
}

#[scenario(path = "tests/features/cli.feature", name = "Missing listing names the flag")]
fn scenario_missing_listing(cli_world: CliWorld) {
    let _ = cli_world;
}

#[scenario(
    path = "tests/features/cli.feature",
    name = "Unknown configuration keys are rejected"
)]
fn scenario_unknown_config_key(cli_world: CliWorld) {
    let _ = cli_world;
}
