use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::state::AppState;

use super::dto::{CreateUserRequest, UpdateUserRequest};
use super::error::{UserError, UserResult};
use super::repo_types::User;

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> UserResult<T> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        warn!(error = %rejection, "rejected request body");
        UserError::Validation(rejection.body_text())
    })
}

fn path_id(path: Result<Path<i64>, PathRejection>) -> UserResult<i64> {
    path.map(|Path(id)| id).map_err(|rejection| {
        warn!(error = %rejection, "rejected user id");
        UserError::Validation(rejection.body_text())
    })
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> UserResult<(StatusCode, Json<User>)> {
    let input = json_body(payload)?.validate().map_err(|e| {
        warn!("create user missing required fields");
        e
    })?;
    let user = state.users.create(input).await?;
    info!(user_id = user.id, "user registered");
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> UserResult<Json<Vec<User>>> {
    Ok(Json(state.users.list_all().await?))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> UserResult<Json<User>> {
    let id = path_id(path)?;
    state
        .users
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or(UserError::NotFound(id))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> UserResult<Json<User>> {
    let id = path_id(path)?;
    let changes = json_body(payload)?;
    state
        .users
        .update(id, changes)
        .await?
        .map(Json)
        .ok_or(UserError::NotFound(id))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> UserResult<Json<User>> {
    let id = path_id(path)?;
    state
        .users
        .delete(id)
        .await?
        .map(Json)
        .ok_or(UserError::NotFound(id))
}
