//! End-to-end tests for the `template-api` command.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::{tempdir, TempDir};

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_pipewright")
}

fn test_repo() -> TempDir {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join(".git")).unwrap();
    fs::create_dir_all(dir.path().join("templates")).unwrap();
    fs::write(
        dir.path().join("templates/install-dotnet.yml"),
        "parameters:\n  version: \"8.0\"\n  restore: true\nsteps:\n- script: dotnet restore\n",
    )
    .unwrap();
    dir
}

fn generate(repo: &Path, templates: &[&str]) -> Output {
    Command::new(bin())
        .arg("template-api")
        .arg("--output")
        .arg("src/templates.rs")
        .args(templates)
        .current_dir(repo)
        .output()
        .unwrap()
}

#[test]
fn generates_a_typed_reference_for_a_template() {
    let repo = test_repo();
    let output = generate(repo.path(), &["templates/install-dotnet.yml"]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Processing templates/install-dotnet.yml.."));
    assert!(stdout.contains("API for template templates/install-dotnet.yml created"));

    let generated = fs::read_to_string(repo.path().join("src/templates.rs")).unwrap();
    assert!(generated.contains("// /templates/install-dotnet.yml"));
    assert!(generated.contains(
        "pub fn InstallDotnet(version: Option<String>, restore: Option<bool>) -> Template<Step> {"
    ));
    // struct name defaults from the output file name
    assert!(generated.contains("impl Templates {"));
}

#[test]
fn regeneration_is_byte_identical() {
    let repo = test_repo();
    assert!(generate(repo.path(), &["templates/install-dotnet.yml"]).status.success());
    let first = fs::read(repo.path().join("src/templates.rs")).unwrap();

    assert!(generate(repo.path(), &["templates/install-dotnet.yml"]).status.success());
    let second = fs::read(repo.path().join("src/templates.rs")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn second_template_appends_a_second_method() {
    let repo = test_repo();
    fs::write(
        repo.path().join("templates/deploy.yml"),
        "parameters:\n- name: environment\n  type: string\n- name: timeout\n  type: number\n  default: 60\njobs:\n- job: deploy\n",
    )
    .unwrap();

    assert!(generate(repo.path(), &["templates/install-dotnet.yml"]).status.success());
    assert!(generate(repo.path(), &["templates/deploy.yml"]).status.success());

    let generated = fs::read_to_string(repo.path().join("src/templates.rs")).unwrap();
    assert!(generated.contains("pub fn InstallDotnet("));
    assert!(generated
        .contains("pub fn Deploy(environment: String, timeout: Option<i32>) -> Template<Job> {"));

    let first = generated.find("// /templates/install-dotnet.yml").unwrap();
    let second = generated.find("// /templates/deploy.yml").unwrap();
    assert!(first < second);
}

#[test]
fn changed_template_replaces_only_its_own_method() {
    let repo = test_repo();
    fs::write(repo.path().join("templates/vars.yml"), "variables:\n- name: cfg\n  value: Release\n")
        .unwrap();
    assert!(generate(
        repo.path(),
        &["templates/install-dotnet.yml", "templates/vars.yml"]
    )
    .status
    .success());

    fs::write(
        repo.path().join("templates/install-dotnet.yml"),
        "parameters:\n  version: \"9.0\"\n  restore: true\nsteps:\n- script: dotnet restore\n",
    )
    .unwrap();
    assert!(generate(repo.path(), &["templates/install-dotnet.yml"]).status.success());

    let generated = fs::read_to_string(repo.path().join("src/templates.rs")).unwrap();
    assert_eq!(generated.matches("// /templates/install-dotnet.yml").count(), 1);
    assert!(generated.contains("\"9.0\""));
    assert!(!generated.contains("\"8.0\""));
    assert!(generated.contains("pub fn Vars() -> Template<Variable> {"));
}

#[test]
fn missing_template_fails_the_run() {
    let repo = test_repo();
    let output = generate(repo.path(), &["templates/no-such.yml"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("does not exist"));
    assert!(!repo.path().join("src/templates.rs").exists());
}

#[test]
fn template_without_a_category_fails_the_run() {
    let repo = test_repo();
    fs::write(repo.path().join("templates/odd.yml"), "parameters:\n  x: 1\n").unwrap();

    let output = generate(repo.path(), &["templates/odd.yml"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unable to infer the category"));
}

#[test]
fn explicit_struct_name_overrides_the_default() {
    let repo = test_repo();
    let output = Command::new(bin())
        .arg("template-api")
        .arg("--output")
        .arg("src/templates.rs")
        .arg("--name")
        .arg("PipelineTemplates")
        .arg("templates/install-dotnet.yml")
        .current_dir(repo.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let generated = fs::read_to_string(repo.path().join("src/templates.rs")).unwrap();
    assert!(generated.contains("pub struct PipelineTemplates;"));
    assert!(generated.contains("impl PipelineTemplates {"));
}
