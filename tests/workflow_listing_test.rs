use std::fs;

use tempfile::tempdir;
use text_workflow::workflow::{list_workflows, load_config};

#[test]
fn test_listing_has_one_entry_per_yaml_file() {
    for count in [0usize, 1, 3, 12] {
        let dir = tempdir().unwrap();
        for index in 0..count {
            fs::write(
                dir.path().join(format!("workflow-{index:02}.yaml")),
                format!("index: {index}\n"),
            )
            .unwrap();
        }
        fs::write(dir.path().join("README.md"), "not a workflow").unwrap();

        let workflows = list_workflows(dir.path()).unwrap();
        assert_eq!(workflows.len(), count);
        for (index, name) in workflows.iter().enumerate() {
            assert_eq!(name, &format!("workflow-{index:02}"));
            assert!(dir.path().join(format!("{name}.yaml")).is_file());
        }
    }
}

#[test]
fn test_every_listed_workflow_loads() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("summarize.yaml"),
        "steps:\n  - prompt: Summarize the text\n",
    )
    .unwrap();
    fs::write(dir.path().join("empty.yaml"), "").unwrap();

    for name in list_workflows(dir.path()).unwrap() {
        let config = load_config(dir.path(), &name).unwrap();
        assert_eq!(config.name(), name);
    }
}

#[test]
fn test_configuration_is_read_fresh() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("summarize.yaml");

    fs::write(&path, "model: first\n").unwrap();
    let first = load_config(dir.path(), "summarize").unwrap();

    fs::write(&path, "model: second\n").unwrap();
    let second = load_config(dir.path(), "summarize").unwrap();

    assert_ne!(first, second);
    assert_eq!(second.value()["model"].as_str(), Some("second"));
}
