use crate::extract::{json_rejection, UserForm};
use crate::response::{Envelope, NotFoundBody};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use userbase_app::domain::{DeleteResult, EmailCheck, User, UserListItem, UserProfile};
use userbase_app::AppContext;
use userbase_errors::AppError;

#[derive(Debug, Deserialize)]
pub struct EmailCheckRequest {
    pub email: Option<String>,
}

pub async fn create_user(
    State(ctx): State<AppContext>,
    form: UserForm,
) -> Result<Envelope<User>, AppError> {
    let user = ctx.users.create(form.fields, form.avatar).await?;
    Ok(Envelope::ok("user created successfully", user))
}

pub async fn single_user(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Envelope<UserProfile>, AppError> {
    let profile = ctx.users.find_one(&id).await?;
    Ok(Envelope::ok("User information", profile))
}

pub async fn all_users(
    State(ctx): State<AppContext>,
) -> Result<Envelope<Vec<UserListItem>>, AppError> {
    let users = ctx.users.find_all().await?;
    Ok(Envelope::ok("All Users information", users))
}

pub async fn update_user(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    form: UserForm,
) -> Result<Envelope<User>, AppError> {
    let user = ctx.users.update(&id, form.fields, form.avatar).await?;
    Ok(Envelope::ok("user updated successfully", user))
}

pub async fn delete_user(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Envelope<DeleteResult>, AppError> {
    let result = ctx.users.delete(&id).await?;
    Ok(Envelope::ok("user deleted successfully", result))
}

pub async fn check_email_exists(
    State(ctx): State<AppContext>,
    body: Result<Json<EmailCheckRequest>, JsonRejection>,
) -> Result<Envelope<EmailCheck>, AppError> {
    let Json(body) = body.map_err(json_rejection)?;
    let check = ctx.users.email_exists(body.email.as_deref()).await?;
    let message = if check.exists {
        "Email already exists"
    } else {
        "Email is available"
    };
    Ok(Envelope::ok(message, check))
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(NotFoundBody::default()))
}
