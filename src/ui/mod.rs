//! Server-rendered pages. Every page talks to the JSON API through
//! `UsersClient`, so the UI can point at a backend on another host.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::de::DeserializeOwned;
use tracing::{error, instrument, warn};

use crate::state::AppState;
use crate::users::repo_types::User;

pub mod components;

use components::UserDraft;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_page))
        .route("/add", get(add_page).post(submit_add))
        .route("/edit/:id", get(edit_page).post(submit_edit))
        .route("/delete/:id", post(submit_delete))
}

async fn payload<T: DeserializeOwned>(
    res: reqwest::Result<reqwest::Response>,
) -> anyhow::Result<T> {
    Ok(res?.error_for_status()?.json::<T>().await?)
}

async fn succeeded(res: reqwest::Result<reqwest::Response>) -> anyhow::Result<()> {
    res?.error_for_status()?;
    Ok(())
}

fn page(rendered: anyhow::Result<String>) -> Response {
    match rendered {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!(error = %e, "page render failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[instrument(skip(state))]
pub async fn list_page(State(state): State<AppState>) -> Response {
    let users: Vec<User> = match payload(state.client.list_users().await).await {
        Ok(users) => users,
        Err(e) => {
            warn!(error = %e, "list users failed");
            Vec::new()
        }
    };
    let t = &state.templates;
    page(t.user_table(&users).and_then(|body| t.layout("User List", &body)))
}

#[instrument(skip(state))]
pub async fn submit_delete(State(state): State<AppState>, Path(id): Path<i64>) -> Redirect {
    if let Err(e) = succeeded(state.client.delete_user(id).await).await {
        warn!(error = %e, user_id = id, "delete user failed");
    }
    Redirect::to("/")
}

fn add_form(state: &AppState, draft: &UserDraft) -> Response {
    let t = &state.templates;
    page(
        t.user_form("/add", draft, true)
            .and_then(|body| t.layout("Add User", &body)),
    )
}

fn edit_form(state: &AppState, id: i64, draft: Option<&UserDraft>) -> Response {
    let t = &state.templates;
    let body = match draft {
        Some(draft) => t.user_form(&format!("/edit/{id}"), draft, false),
        None => Ok(String::new()),
    };
    page(body.and_then(|body| t.layout("Edit User", &body)))
}

pub async fn add_page(State(state): State<AppState>) -> Response {
    add_form(&state, &UserDraft::default())
}

#[instrument(skip(state, draft))]
pub async fn submit_add(State(state): State<AppState>, Form(draft): Form<UserDraft>) -> Response {
    match succeeded(state.client.create_user(&draft).await).await {
        Ok(()) => Redirect::to("/").into_response(),
        Err(e) => {
            warn!(error = %e, "create user failed");
            add_form(&state, &draft.without_password())
        }
    }
}

#[instrument(skip(state))]
pub async fn edit_page(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match payload::<User>(state.client.get_user(id).await).await {
        Ok(user) => edit_form(&state, id, Some(&UserDraft::from_user(&user))),
        Err(e) => {
            warn!(error = %e, user_id = id, "load user failed");
            edit_form(&state, id, None)
        }
    }
}

#[instrument(skip(state, draft))]
pub async fn submit_edit(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(draft): Form<UserDraft>,
) -> Response {
    match succeeded(state.client.update_user(id, &draft).await).await {
        Ok(()) => Redirect::to("/").into_response(),
        Err(e) => {
            warn!(error = %e, user_id = id, "update user failed");
            edit_form(&state, id, Some(&draft.without_password()))
        }
    }
}
