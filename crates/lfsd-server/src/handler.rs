use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use lfsd_reconcile::CancelFlag;
use serde::Deserialize;

use crate::error::ServerResult;
use crate::render::{self, Page};
use crate::state::AppState;

/// Where user mutations send the browser afterwards.
const USERS_PAGE: &str = "/mgmt/users";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserForm {
    pub name: String,
    pub password: String,
}

/// `GET /mgmt`
pub async fn index_handler(State(state): State<AppState>) -> ServerResult<Html<String>> {
    Ok(Html(render::render(Page::Index(&state.config))?))
}

/// `GET /mgmt/refresh`: run a full reconciliation pass and wait for it.
///
/// The walk runs on the blocking pool. If the client goes away, this future
/// is dropped and the guard cancels the walk.
pub async fn refresh_handler(State(state): State<AppState>) -> Response {
    let cancel = CancelFlag::new();
    let guard = cancel.drop_guard();

    let reconciler = state.reconciler.clone();
    let source = state.source.clone();
    let task = tokio::task::spawn_blocking(move || reconciler.run(source.as_ref(), &cancel));

    match task.await {
        Ok(report) => {
            guard.disarm();
            tracing::debug!(%report, "refresh complete");
            (StatusCode::OK, "refreshed").into_response()
        }
        Err(e) => {
            guard.disarm();
            tracing::error!(error = %e, "refresh task failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "refresh failed").into_response()
        }
    }
}

/// `GET /mgmt/objects`
pub async fn objects_handler(State(state): State<AppState>) -> Response {
    let objects = match state.store.objects() {
        Ok(objects) => objects,
        Err(e) => {
            tracing::warn!(error = %e, "listing objects failed");
            return format!("Error retrieving objects: {e}").into_response();
        }
    };
    page_response(Page::Objects(&objects))
}

/// `GET /mgmt/users`
pub async fn users_handler(State(state): State<AppState>) -> Response {
    let users = match state.store.users() {
        Ok(users) => users,
        Err(e) => {
            tracing::warn!(error = %e, "listing users failed");
            return format!("Error retrieving users: {e}").into_response();
        }
    };
    page_response(Page::Users(&users))
}

/// A missing or unreadable form body counts as empty fields.
fn form_or_default(form: Option<Form<UserForm>>) -> UserForm {
    form.map(|Form(form)| form).unwrap_or_default()
}

/// `POST /mgmt/add`
pub async fn add_user_handler(State(state): State<AppState>, form: Option<Form<UserForm>>) -> Response {
    let form = form_or_default(form);
    if form.name.is_empty() || form.password.is_empty() {
        return "Invalid username or password".into_response();
    }
    if let Err(e) = state.store.add_user(&form.name, &form.password) {
        tracing::warn!(user = %form.name, error = %e, "add user failed");
        return format!("Error adding user: {e}").into_response();
    }
    tracing::info!(user = %form.name, "user added");
    redirect_to_users()
}

/// `POST /mgmt/del`
pub async fn del_user_handler(State(state): State<AppState>, form: Option<Form<UserForm>>) -> Response {
    let form = form_or_default(form);
    if form.name.is_empty() {
        return "Invalid username".into_response();
    }
    if let Err(e) = state.store.delete_user(&form.name) {
        tracing::warn!(user = %form.name, error = %e, "delete user failed");
        return format!("Error deleting user: {e}").into_response();
    }
    tracing::info!(user = %form.name, "user deleted");
    redirect_to_users()
}

/// `GET /mgmt/css/:file`
pub async fn css_handler(Path(file): Path<String>) -> Response {
    match render::stylesheet(&file) {
        Some(css) => ([(header::CONTENT_TYPE, "text/css")], css).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

fn page_response(page: Page<'_>) -> Response {
    match render::render(page) {
        Ok(html) => Html(html).into_response(),
        Err(e) => e.into_response(),
    }
}

fn redirect_to_users() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, USERS_PAGE)]).into_response()
}
