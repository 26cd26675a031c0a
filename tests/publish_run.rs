//! Publish runs across multiple definitions and collections.

use std::fs;
use std::path::PathBuf;

use serde_yaml_ng::Value;
use tempfile::{tempdir, TempDir};

use pipewright::publish::BufferSink;
use pipewright::{
    Definition, DefinitionCollection, DefinitionRegistry, PipewrightResult, PublishConfig,
    PublishOutcome, Publisher, TargetPathKind,
};

#[derive(Default)]
struct CiPipeline;

impl Definition for CiPipeline {
    fn display_name(&self) -> String {
        "CiPipeline".to_string()
    }

    fn target_path(&self) -> PathBuf {
        PathBuf::from("eng/pipelines/ci.yml")
    }

    fn document(&self) -> PipewrightResult<Value> {
        Ok(serde_yaml_ng::from_str(
            "name: ci\ntrigger:\n- main\nstages:\n- stage: Build\n  jobs:\n  - job: build\n",
        )
        .unwrap())
    }
}

struct NightlyPipeline(&'static str);

impl Definition for NightlyPipeline {
    fn display_name(&self) -> String {
        format!("Nightly-{}", self.0)
    }

    fn target_path(&self) -> PathBuf {
        PathBuf::from(format!("eng/pipelines/nightly-{}.yml", self.0))
    }

    fn header(&self) -> Option<Vec<String>> {
        None
    }

    fn document(&self) -> PipewrightResult<Value> {
        Ok(serde_yaml_ng::from_str(&format!("name: nightly-{}\n", self.0)).unwrap())
    }
}

#[derive(Default)]
struct Nightlies;

impl DefinitionCollection for Nightlies {
    fn display_name(&self) -> String {
        "Nightlies".to_string()
    }

    fn definitions(&self) -> Vec<Box<dyn Definition>> {
        vec![
            Box::new(NightlyPipeline("linux")),
            Box::new(NightlyPipeline("windows")),
        ]
    }
}

fn test_repo() -> TempDir {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join(".git")).unwrap();
    dir
}

fn registry() -> DefinitionRegistry {
    let mut registry = DefinitionRegistry::new();
    registry.register::<CiPipeline>().register_collection::<Nightlies>();
    registry
}

#[test]
fn a_run_publishes_every_definition_and_collection_member() {
    let repo = test_repo();
    let mut sink = BufferSink::default();
    let run = Publisher::with_anchor(PublishConfig::default(), repo.path())
        .publish(&registry(), false, &mut sink)
        .unwrap();

    assert_eq!(run.reports.len(), 3);
    assert!(run.is_success());
    assert!(run
        .reports
        .iter()
        .all(|report| report.outcome == PublishOutcome::Created));

    assert!(repo.path().join("eng/pipelines/ci.yml").exists());
    assert!(repo.path().join("eng/pipelines/nightly-linux.yml").exists());
    assert!(repo.path().join("eng/pipelines/nightly-windows.yml").exists());

    // Reports come back in label order, collections labelled by file
    let names: Vec<&str> = run.reports.iter().map(|report| report.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "CiPipeline",
            "Nightlies / nightly-linux.yml",
            "Nightlies / nightly-windows.yml"
        ]
    );
}

#[test]
fn published_yaml_carries_header_and_section_breaks() {
    let repo = test_repo();
    let mut sink = BufferSink::default();
    Publisher::with_anchor(PublishConfig::default(), repo.path())
        .publish(&registry(), false, &mut sink)
        .unwrap();

    let text = fs::read_to_string(repo.path().join("eng/pipelines/ci.yml")).unwrap();
    assert!(text.starts_with("### DO NOT MODIFY THIS FILE!\n"));
    assert!(text.contains("### This YAML was auto-generated from CiPipeline\n"));
    assert!(text.contains("\n\ntrigger:\n- main\n"));
    assert!(text.contains("\n\nstages:\n- stage: Build\n"));

    // header suppressed per definition
    let nightly = fs::read_to_string(repo.path().join("eng/pipelines/nightly-linux.yml")).unwrap();
    assert!(nightly.starts_with("name: nightly-linux\n"));
}

#[test]
fn ci_gate_passes_once_everything_is_checked_in() {
    let repo = test_repo();
    let mut sink = BufferSink::default();
    let publisher = Publisher::with_anchor(PublishConfig::default(), repo.path());

    // first run from a clean tree fails the gate for every definition
    let gated = publisher.publish(&registry(), true, &mut sink).unwrap();
    assert_eq!(gated.errors(), 3);

    // the first run wrote everything, so the gate now passes
    let mut sink = BufferSink::default();
    let clean = publisher.publish(&registry(), true, &mut sink).unwrap();
    assert!(clean.is_success());
    assert!(sink.infos.iter().any(|m| m.contains("No new changes to publish")));
}

#[test]
fn absolute_target_paths_skip_repo_root_resolution() {
    struct Pinned(PathBuf);

    impl Definition for Pinned {
        fn display_name(&self) -> String {
            "Pinned".to_string()
        }

        fn target_path(&self) -> PathBuf {
            self.0.clone()
        }

        fn target_path_kind(&self) -> TargetPathKind {
            TargetPathKind::Absolute
        }

        fn header(&self) -> Option<Vec<String>> {
            None
        }

        fn document(&self) -> PipewrightResult<Value> {
            Ok(serde_yaml_ng::from_str("name: pinned\n").unwrap())
        }
    }

    // fn-pointer ctors cannot capture, so the path goes through a static
    static TARGET: std::sync::OnceLock<PathBuf> = std::sync::OnceLock::new();

    // no .git anywhere; absolute paths must not need one
    let out = tempdir().unwrap();
    let target = out.path().join("pinned.yml");
    TARGET.set(target.clone()).unwrap();

    let mut registry = DefinitionRegistry::new();
    registry.register_with(|| {
        Ok(Box::new(Pinned(TARGET.get().unwrap().clone())) as Box<dyn Definition>)
    });

    let mut sink = BufferSink::default();
    let run = Publisher::with_anchor(PublishConfig::default(), out.path())
        .publish(&registry, false, &mut sink)
        .unwrap();

    assert_eq!(run.reports[0].outcome, PublishOutcome::Created);
    assert_eq!(fs::read_to_string(target).unwrap(), "name: pinned\n");
}
