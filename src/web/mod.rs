//! HTTP front-end for the workflow form
//!
//! The page is a single form. Every POST submits all of its fields, which are
//! applied to the session before the action of the route itself, so typed
//! credentials and text are never lost between interactions. The session is
//! shared by every request of the server process and all access to it runs
//! on the blocking pool, so a running workflow holds up other interactions
//! until the external program exits.

mod errors;
pub mod pages;

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use askama::Template;
use axum::{
    extract::{Form, Query, State},
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use log::{debug, info};
use serde::Deserialize;

pub use errors::ServerError;

use crate::credentials::CredentialForm;
use crate::session::{Action, Session, Workspace};
use pages::IndexPage;

pub struct AppState {
    pub workspace: Workspace,
    pub session: Mutex<Session>,
}

impl AppState {
    pub fn new(workspace: Workspace) -> Self {
        AppState {
            workspace,
            session: Mutex::new(Session::new()),
        }
    }
}

pub type SharedState = Arc<AppState>;

#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    pub workflow: Option<String>,
}

/// Fields of the page form
#[derive(Debug, Default, Deserialize)]
pub struct PageForm {
    #[serde(flatten)]
    pub credentials: CredentialForm,
    pub workflow: Option<String>,
    pub input: Option<String>,
}

// Carry the submitted field values into the session ahead of `action`.
fn with_edits(
    credentials: CredentialForm,
    input: Option<String>,
    action: Action,
) -> Vec<Action> {
    let mut actions = vec![Action::UpdateCredentials(credentials)];
    if let Some(input) = input {
        actions.push(Action::EditInput(input));
    }
    actions.push(action);
    actions
}

async fn with_session<T, F>(state: SharedState, handler: F) -> Result<T, ServerError>
where
    T: Send + 'static,
    F: FnOnce(&Workspace, &mut Session) -> Result<T, ServerError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut session = state
            .session
            .lock()
            .map_err(|_| ServerError::Internal("Session state is poisoned".to_string()))?;
        handler(&state.workspace, &mut session)
    })
    .await?
}

async fn dispatch(state: SharedState, actions: Vec<Action>) -> Result<Redirect, ServerError> {
    with_session(state, move |workspace, session| {
        for action in actions {
            session.handle(action, workspace)?;
        }
        Ok(Redirect::to("/"))
    })
    .await
}

async fn index_handler(
    State(state): State<SharedState>,
    Query(query): Query<IndexQuery>,
) -> Result<Html<String>, ServerError> {
    let body = with_session(state, move |workspace, session| {
        let workflows = workspace.workflows()?;
        if let Some(workflow) = query.workflow {
            session.handle(Action::SelectWorkflow(workflow), workspace)?;
        }

        let current = session.current_workflow(&workflows);
        let config = current
            .as_deref()
            .map(|name| workspace.load_config(name))
            .transpose()?;

        let notice = session.take_notice();
        let page = IndexPage::new(
            session.credentials(),
            &workflows,
            current.as_deref(),
            config.as_ref(),
            session.input(),
            notice,
            session.last_run(),
        );
        Ok(page.render()?)
    })
    .await?;
    Ok(Html(body))
}

async fn credentials_handler(
    State(state): State<SharedState>,
    Form(form): Form<PageForm>,
) -> Result<Redirect, ServerError> {
    let PageForm {
        credentials, input, ..
    } = form;
    let mut actions = vec![Action::UpdateCredentials(credentials)];
    actions.extend(input.map(Action::EditInput));
    dispatch(state, actions).await
}

async fn clear_credentials_handler(
    State(state): State<SharedState>,
    Form(form): Form<PageForm>,
) -> Result<Redirect, ServerError> {
    let PageForm {
        credentials, input, ..
    } = form;
    dispatch(state, with_edits(credentials, input, Action::ClearCredentials)).await
}

async fn select_handler(
    State(state): State<SharedState>,
    Form(form): Form<PageForm>,
) -> Result<Redirect, ServerError> {
    let PageForm {
        credentials,
        workflow,
        input,
    } = form;
    let Some(workflow) = workflow else {
        return Ok(Redirect::to("/"));
    };
    dispatch(
        state,
        with_edits(credentials, input, Action::SelectWorkflow(workflow)),
    )
    .await
}

async fn process_handler(
    State(state): State<SharedState>,
    Form(form): Form<PageForm>,
) -> Result<Redirect, ServerError> {
    let PageForm {
        credentials,
        workflow,
        input,
    } = form;
    let process = Action::Process {
        workflow: workflow.unwrap_or_default(),
        input: input.unwrap_or_default(),
    };
    dispatch(state, with_edits(credentials, None, process)).await
}

/// `Content-Disposition` value offering `file_name` as an attachment
pub fn content_disposition(file_name: &str) -> String {
    let mut quoted = String::with_capacity(file_name.len());
    for c in file_name.chars() {
        match c {
            '"' | '\\' => {
                quoted.push('\\');
                quoted.push(c);
            }
            c if c.is_ascii() && !c.is_ascii_control() => quoted.push(c),
            _ => quoted.push('_'),
        }
    }
    format!("attachment; filename=\"{quoted}\"")
}

async fn download_handler(State(state): State<SharedState>) -> Result<Response, ServerError> {
    with_session(state, |_, session| {
        let (file_name, content) = session
            .download()
            .ok_or_else(|| ServerError::NotFound("No output available for download".to_string()))?;

        let headers = [
            (header::CONTENT_TYPE, "text/markdown; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, content_disposition(file_name)),
        ];
        Ok((headers, content.to_string()).into_response())
    })
    .await
}

/// Build the router serving the workflow form
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/credentials", post(credentials_handler))
        .route("/credentials/clear", post(clear_credentials_handler))
        .route("/select", post(select_handler))
        .route("/process", post(process_handler))
        .route("/download", get(download_handler))
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
}

/// Serve the workflow form until the process is stopped
pub async fn serve(workspace: Workspace, addr: SocketAddr) -> std::io::Result<()> {
    debug!(
        "Workflows from {} run with {}",
        workspace.config_dir().display(),
        workspace.runner().entry_point()
    );
    let state = Arc::new(AppState::new(workspace));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Serving workflow form on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state).into_make_service()).await
}
