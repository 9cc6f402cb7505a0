use super::*;

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

#[test]
fn groups_follow_fixed_order() {
    let root = temp_dir("sources_order");
    std::fs::create_dir_all(&root).unwrap();
    let project = ProjectLayout::open(&root).unwrap();
    let engine = EngineLayout::new(root.join("engine"));

    let labels = source_groups(&engine, &project)
        .into_iter()
        .map(|g| g.label)
        .collect::<Vec<_>>();
    assert_eq!(
        labels,
        vec!["engine-lib", "engine", "project-lib", "project-gen", "project-src"]
    );

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn collects_js_only_sorted_within_group() {
    let root = temp_dir("sources_collect");
    let a = root.join("a");
    let b = root.join("b");
    std::fs::create_dir_all(a.join("nested")).unwrap();
    std::fs::create_dir_all(&b).unwrap();
    std::fs::write(a.join("z.js"), "z").unwrap();
    std::fs::write(a.join("m.js"), "m").unwrap();
    std::fs::write(a.join("notes.txt"), "skip").unwrap();
    std::fs::write(a.join("nested").join("deep.js"), "skip").unwrap();
    std::fs::write(b.join("a.js"), "b-a").unwrap();

    let groups = [
        SourceGroup { label: "a", dir: a },
        SourceGroup { label: "b", dir: b },
        SourceGroup {
            label: "missing",
            dir: root.join("missing"),
        },
    ];
    let srcs = collect_sources(&groups)
        .unwrap()
        .into_iter()
        .map(|s| s.src)
        .collect::<Vec<_>>();
    assert_eq!(srcs, vec!["m", "z", "b-a"]);

    std::fs::remove_dir_all(&root).ok();
}
