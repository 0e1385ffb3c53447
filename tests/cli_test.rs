use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::{tempdir, TempDir};

fn config_dir() -> TempDir {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("config")).unwrap();
    fs::create_dir(dir.path().join("work")).unwrap();
    fs::write(dir.path().join("config/summarize.yaml"), "model: test\n").unwrap();
    fs::write(dir.path().join("config/translate.yaml"), "target: de\n").unwrap();
    dir
}

fn twflow(dir: &TempDir) -> Command {
    let mut command = Command::cargo_bin("twflow").unwrap();
    command
        .current_dir(dir.path())
        .env_remove("OPENROUTER_API_KEY")
        .env_remove("EXA_API_KEY")
        .env_remove("OPENAI_API_KEY")
        .env_remove("OPENAI_API_BASE")
        .env_remove("TWFLOW_ENTRY_POINT")
        .env_remove("TWFLOW_ENTRY_ARG")
        .env_remove("TWFLOW_LOG_LEVEL")
        .args(["--config-dir", "config", "--work-dir", "work", "--log-file", ""]);
    command
}

#[test]
fn test_list_prints_workflows() {
    let dir = config_dir();
    twflow(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout("summarize\ntranslate\n");
}

#[test]
fn test_list_missing_directory_fails() {
    let dir = tempdir().unwrap();
    twflow(&dir)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to list workflows"));
}

#[test]
fn test_run_unknown_workflow_fails() {
    let dir = config_dir();
    fs::write(dir.path().join("input.txt"), "Hello world").unwrap();
    twflow(&dir)
        .args(["run", "input.txt", "--workflow", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Workflow 'missing' not found"));
}

#[cfg(unix)]
mod with_program {
    use super::*;

    const PROGRAM: &str = r#"input="$1"
workflow="$3"
text="$(cat "$input")"
if [ "$text" = "fail" ]; then
    printf 'ModelError: rate limited' >&2
    exit 1
fi
printf 'Summary: %s' "$text" > "$(dirname "$input")/$workflow-output.md"
"#;

    fn with_program(dir: &TempDir) -> Command {
        fs::write(dir.path().join("app.sh"), PROGRAM).unwrap();
        let mut command = twflow(dir);
        command.args(["--entry-point", "sh", "--entry-arg", "app.sh"]);
        command
    }

    #[test]
    fn test_run_prints_output() {
        let dir = config_dir();
        with_program(&dir)
            .args(["run", "-", "--workflow", "summarize"])
            .write_stdin("Hello world")
            .assert()
            .success()
            .stdout("Summary: Hello world");
    }

    #[test]
    fn test_entry_point_from_environment() {
        let dir = config_dir();
        fs::write(dir.path().join("app.sh"), PROGRAM).unwrap();
        twflow(&dir)
            .env("TWFLOW_ENTRY_POINT", "sh")
            .env("TWFLOW_ENTRY_ARG", "app.sh")
            .args(["run", "-", "--workflow", "translate"])
            .write_stdin("Hallo")
            .assert()
            .success()
            .stdout("Summary: Hallo");
    }

    #[test]
    fn test_explicit_entry_point_gets_no_default_argument() {
        let dir = config_dir();
        // The input itself is the script: sh <input> --workflow <name>
        fs::write(
            dir.path().join("input.sh"),
            r#"printf 'ran directly' > "$(dirname "$0")/$2-output.md""#,
        )
        .unwrap();
        twflow(&dir)
            .args(["--entry-point", "sh", "run", "input.sh", "--workflow", "summarize"])
            .assert()
            .success()
            .stdout("ran directly");
    }

    #[test]
    fn test_run_writes_output_file() {
        let dir = config_dir();
        fs::write(dir.path().join("input.txt"), "Hello world").unwrap();
        with_program(&dir)
            .args(["run", "input.txt", "--workflow", "summarize", "-o", "result.md"])
            .assert()
            .success();

        assert_eq!(
            fs::read_to_string(dir.path().join("result.md")).unwrap(),
            "Summary: Hello world"
        );
    }

    #[test]
    fn test_run_failure_reports_stderr() {
        let dir = config_dir();
        with_program(&dir)
            .args(["run", "-", "--workflow", "summarize"])
            .write_stdin("fail")
            .assert()
            .failure()
            .stderr(predicate::str::contains("ModelError: rate limited"))
            .stderr(predicate::str::contains("failed with exit code 1"));
    }

    #[test]
    fn test_run_empty_input_fails() {
        let dir = config_dir();
        with_program(&dir)
            .args(["run", "-", "--workflow", "summarize"])
            .write_stdin("")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Please enter some text to process."));

        let leftovers = fs::read_dir(dir.path().join("work")).unwrap().count();
        assert_eq!(leftovers, 0);
    }
}
