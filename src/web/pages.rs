use askama::Template;

use crate::credentials::{Credential, CredentialStore};
use crate::runner::RunOutcome;
use crate::session::{LastRun, Notice};
use crate::workflow::WorkflowConfig;

pub const PAGE_TITLE: &str = "Text Processing Workflow";

pub struct CredentialField {
    pub field: &'static str,
    pub label: &'static str,
    pub input_type: &'static str,
    pub value: String,
    pub is_set: bool,
}

pub struct WorkflowOption {
    pub name: String,
    pub selected: bool,
}

pub struct NoticeView {
    pub level: &'static str,
    pub message: String,
}

/// What the result pane shows for the last run
pub struct ResultView {
    pub workflow: String,
    pub output: Option<String>,
    pub download_name: Option<String>,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub title: &'static str,
    pub credentials: Vec<CredentialField>,
    pub workflows: Vec<WorkflowOption>,
    pub config_yaml: Option<String>,
    pub config_keys: Vec<String>,
    pub input: String,
    pub notice: Option<NoticeView>,
    pub result: Option<ResultView>,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage {
    pub status: u16,
    pub reason: &'static str,
    pub message: String,
}

pub fn credential_fields(store: &CredentialStore) -> Vec<CredentialField> {
    Credential::ALL
        .iter()
        .map(|&credential| CredentialField {
            field: credential.field(),
            label: credential.label(),
            input_type: if credential.is_secret() { "password" } else { "text" },
            value: store.get(credential).unwrap_or_default().to_string(),
            is_set: store.is_set(credential),
        })
        .collect()
}

pub fn workflow_options(workflows: &[String], current: Option<&str>) -> Vec<WorkflowOption> {
    workflows
        .iter()
        .map(|name| WorkflowOption {
            name: name.clone(),
            selected: Some(name.as_str()) == current,
        })
        .collect()
}

impl From<Notice> for NoticeView {
    fn from(notice: Notice) -> Self {
        NoticeView {
            level: notice.level.as_str(),
            message: notice.message,
        }
    }
}

impl From<&LastRun> for ResultView {
    fn from(run: &LastRun) -> Self {
        let workflow = run.workflow.clone();
        match &run.outcome {
            RunOutcome::Completed { file_name, content } => ResultView {
                workflow,
                output: Some(content.clone()),
                download_name: Some(file_name.clone()),
                stdout: None,
                stderr: None,
            },
            // stderr is only worth a pane when the program wrote something
            RunOutcome::MissingOutput { stdout, stderr } => ResultView {
                workflow,
                output: None,
                download_name: None,
                stdout: Some(stdout.clone()),
                stderr: Some(stderr.clone()).filter(|s| !s.is_empty()),
            },
            RunOutcome::Failed { stdout, stderr, .. } => ResultView {
                workflow,
                output: None,
                download_name: None,
                stdout: Some(stdout.clone()),
                stderr: Some(stderr.clone()),
            },
        }
    }
}

impl IndexPage {
    pub fn new(
        store: &CredentialStore,
        workflows: &[String],
        current: Option<&str>,
        config: Option<&WorkflowConfig>,
        input: &str,
        notice: Option<Notice>,
        last_run: Option<&LastRun>,
    ) -> Self {
        IndexPage {
            title: PAGE_TITLE,
            credentials: credential_fields(store),
            workflows: workflow_options(workflows, current),
            config_yaml: config.map(WorkflowConfig::to_yaml_string),
            config_keys: config.map(WorkflowConfig::keys).unwrap_or_default(),
            input: input.to_string(),
            notice: notice.map(NoticeView::from),
            result: last_run.map(ResultView::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_run_view_shows_both_streams() {
        let run = LastRun {
            workflow: "summarize".to_string(),
            outcome: RunOutcome::Failed {
                code: Some(1),
                stdout: String::new(),
                stderr: "ModelError: rate limited".to_string(),
            },
        };

        let view = ResultView::from(&run);
        assert!(view.output.is_none());
        assert!(view.download_name.is_none());
        assert_eq!(view.stdout.as_deref(), Some(""));
        assert_eq!(view.stderr.as_deref(), Some("ModelError: rate limited"));
    }

    #[test]
    fn test_missing_output_view_hides_empty_stderr() {
        let run = LastRun {
            workflow: "summarize".to_string(),
            outcome: RunOutcome::MissingOutput {
                stdout: "debug".to_string(),
                stderr: String::new(),
            },
        };

        let view = ResultView::from(&run);
        assert_eq!(view.stdout.as_deref(), Some("debug"));
        assert!(view.stderr.is_none());
    }

    #[test]
    fn test_index_page_renders_escaped_output() {
        let run = LastRun {
            workflow: "summarize".to_string(),
            outcome: RunOutcome::Completed {
                file_name: "summarize-output.md".to_string(),
                content: "Summary <b>bold".to_string(),
            },
        };
        let workflows = vec!["summarize".to_string(), "translate".to_string()];

        let page = IndexPage::new(
            &CredentialStore::new(),
            &workflows,
            Some("summarize"),
            None,
            "Hello world",
            None,
            Some(&run),
        );
        let html = page.render().unwrap();

        assert!(html.contains("Summary &lt;b&gt;bold"));
        assert!(html.contains("summarize-output.md"));
        assert!(html.contains(r#"<option value="summarize" selected>"#));
        assert!(html.contains("Hello world"));
    }

    #[test]
    fn test_index_page_summarizes_config_keys() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("summarize.yaml"),
            "model: test\nsteps: []\n",
        )
        .unwrap();
        let config = crate::workflow::load_config(dir.path(), "summarize").unwrap();
        let workflows = vec!["summarize".to_string()];

        let page = IndexPage::new(
            &CredentialStore::new(),
            &workflows,
            Some("summarize"),
            Some(&config),
            "",
            None,
            None,
        );
        assert_eq!(page.config_keys, vec!["model", "steps"]);
        assert!(page
            .render()
            .unwrap()
            .contains("Workflow configuration (model, steps)"));
    }

    #[test]
    fn test_credential_fields_mask_keys() {
        let mut store = CredentialStore::new();
        store.set(Credential::OpenAiApiBase, "https://example.invalid/v1");

        let fields = credential_fields(&store);
        assert_eq!(fields.len(), 4);
        assert_eq!(fields[0].input_type, "password");
        assert_eq!(fields[3].input_type, "text");
        assert!(fields[3].is_set);
        assert_eq!(fields[3].value, "https://example.invalid/v1");
    }
}
