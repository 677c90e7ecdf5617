use std::fs;

use tempfile::tempdir;

use classweave::{Access, RelationshipType, Signature, persist};
use classweave_cli::{Args, CliError, run};

fn args_for(script: &str) -> Args {
    Args {
        script: Some(script.to_string()),
        load: None,
        config: None,
        log_level: "off".to_string(),
        no_banner: true,
    }
}

#[test]
fn test_script_builds_and_saves_diagram() {
    let dir = tempdir().expect("Failed to create temp directory");
    let output = dir.path().join("vehicles.json");
    let script = dir.path().join("build.cw");
    fs::write(
        &script,
        format!(
            "# vehicles\n\
             addc Vehicle\n\
             addc Car\n\
             addc Wheel\n\
             addf Car int speed\n\
             addm Car void drive int km\n\
             addr Car Vehicle generalization\n\
             addr Car Wheel composition\n\
             \n\
             save {}\n",
            output.display()
        ),
    )
    .unwrap();

    run(&args_for(&script.to_string_lossy())).expect("script should succeed");

    let store = persist::load(&output).unwrap();
    assert_eq!(store.class_names().collect::<Vec<_>>(), ["Vehicle", "Car", "Wheel"]);
    assert_eq!(
        store.class("Car").unwrap().field("speed").unwrap().access(),
        Access::Private
    );
    assert!(
        store
            .find_method("Car", &Signature::new("drive", ["int"]))
            .is_some()
    );
    assert_eq!(store.relationships().len(), 2);
}

#[test]
fn test_loaded_diagram_is_edited_and_saved_back() {
    let dir = tempdir().unwrap();
    let diagram = dir.path().join("diagram.json");
    fs::write(
        &diagram,
        r#"{"classes":[{"name":"A"},{"name":"B"}],
            "relationships":[{"from":"A","to":"B","kind":"aggregation"}]}"#,
    )
    .unwrap();
    let script = dir.path().join("edit.cw");
    fs::write(&script, "deletec B\naddc C\naddr C A realization\nsave\n").unwrap();

    let mut args = args_for(&script.to_string_lossy());
    args.load = Some(diagram.to_string_lossy().to_string());
    run(&args).unwrap();

    let store = persist::load(&diagram).unwrap();
    assert!(store.class("B").is_none());
    assert_eq!(
        store.relationships(),
        vec![("C", "A", RelationshipType::Realization)]
    );
}

#[test]
fn test_script_with_bad_line_fails() {
    let dir = tempdir().unwrap();
    let script = dir.path().join("broken.cw");
    fs::write(&script, "addc A\naddf A int\n").unwrap();

    match run(&args_for(&script.to_string_lossy())) {
        Err(CliError::Command { err, src }) => {
            assert_eq!(err.message(), "missing arguments");
            assert!(src.contains("addf A int"));
        }
        other => panic!("expected a command error, got {other:?}"),
    }
}

#[test]
fn test_missing_config_file_fails() {
    let dir = tempdir().unwrap();
    let script = dir.path().join("empty.cw");
    fs::write(&script, "").unwrap();

    let mut args = args_for(&script.to_string_lossy());
    args.config = Some(dir.path().join("nope.toml").to_string_lossy().to_string());
    assert!(matches!(run(&args), Err(CliError::App(_))));
}
