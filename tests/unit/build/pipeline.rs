use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use super::*;
use crate::foundation::error::NinError;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "nin_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn context(root: &std::path::Path) -> BuildContext {
    std::fs::create_dir_all(root).unwrap();
    BuildContext::new(
        ProjectLayout::open(root).unwrap(),
        EngineLayout::new(root.join("engine")),
        ProjectSettings {
            title: "t".to_string(),
            ..Default::default()
        },
        BuildOptions::default(),
        BuildServices::default(),
    )
}

struct Recording {
    name: &'static str,
    log: Arc<Mutex<Vec<&'static str>>>,
    fail: bool,
}

impl BuildStage for Recording {
    fn name(&self) -> &'static str {
        self.name
    }

    fn run(&self, _ctx: &mut BuildContext) -> NinResult<()> {
        self.log.lock().unwrap().push(self.name);
        if self.fail {
            return Err(NinError::validation(format!("{} failed", self.name)));
        }
        Ok(())
    }
}

fn stage(name: &'static str, log: &Arc<Mutex<Vec<&'static str>>>, fail: bool) -> Recording {
    Recording {
        name,
        log: Arc::clone(log),
        fail,
    }
}

#[test]
fn stages_run_in_insertion_order() {
    let root = temp_dir("pipeline_order");
    let mut ctx = context(&root);
    let log = Arc::new(Mutex::new(Vec::new()));

    let pipeline = BuildPipeline::new()
        .with_stage(stage("a", &log, false))
        .with_stage(stage("b", &log, false))
        .with_stage(stage("c", &log, false));
    assert_eq!(pipeline.stage_names(), vec!["a", "b", "c"]);

    pipeline.run(&mut ctx).unwrap();
    assert_eq!(*log.lock().unwrap(), vec!["a", "b", "c"]);

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn first_failure_stops_later_stages() {
    let root = temp_dir("pipeline_abort");
    let mut ctx = context(&root);
    let log = Arc::new(Mutex::new(Vec::new()));

    let err = BuildPipeline::new()
        .with_stage(stage("a", &log, false))
        .with_stage(stage("b", &log, true))
        .with_stage(stage("c", &log, false))
        .run(&mut ctx)
        .unwrap_err();

    assert!(matches!(err, NinError::Validation(ref m) if m == "b failed"));
    assert_eq!(*log.lock().unwrap(), vec!["a", "b"]);

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn default_options_use_graph_asset() {
    let opts = BuildOptions::default();
    assert!(!opts.optimize_images);
    assert_eq!(opts.graph_key, "graph.json");
}
