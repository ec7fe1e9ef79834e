//! User management API handlers
//!
//! CRUD endpoints for managing users.
//! Delegates to `UserService` from the application/identity layer.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{CreateUserRequest, PageParams, UpdateUserRequest, UserDto, UserPageDto};
use crate::application::identity::UserService;
use crate::infrastructure::{BcryptPasswordHasher, SeaOrmTransactionManager};
use crate::interfaces::http::common::{domain_error, not_found, ApiError, ApiResponse};

/// The service as wired by the binary.
pub type AppUserService = UserService<SeaOrmTransactionManager, BcryptPasswordHasher>;

/// User handler state - concrete over the SeaORM store for Axum compatibility.
#[derive(Clone)]
pub struct UserHandlerState {
    pub user_service: Arc<AppUserService>,
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users", body = ApiResponse<Vec<UserDto>>)
    )
)]
pub async fn list_users(
    State(state): State<UserHandlerState>,
) -> Result<Json<ApiResponse<Vec<UserDto>>>, ApiError> {
    let users = state.user_service.find_all().await.map_err(domain_error)?;
    let items = users.into_iter().map(UserDto::from).collect();
    Ok(Json(ApiResponse::success(items)))
}

#[utoipa::path(
    get,
    path = "/api/users/page/{page}",
    tag = "Users",
    params(
        ("page" = u64, Path, description = "Zero-based page index"),
        PageParams
    ),
    responses(
        (status = 200, description = "One page of users", body = ApiResponse<UserPageDto>)
    )
)]
pub async fn list_users_page(
    State(state): State<UserHandlerState>,
    Path(page): Path<u64>,
    Query(params): Query<PageParams>,
) -> Result<Json<ApiResponse<UserPageDto>>, ApiError> {
    let request = params.to_request(page);
    let page = state
        .user_service
        .find_page(&request)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(UserPageDto::from(page))))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = ApiResponse<UserDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_user(
    State(state): State<UserHandlerState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    match state.user_service.find_by_id(id).await {
        Ok(Some(user)) => Ok(Json(ApiResponse::success(UserDto::from(user)))),
        Ok(None) => Err(not_found(format!("User '{}' not found", id))),
        Err(e) => Err(domain_error(e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserDto>),
        (status = 409, description = "Username or email already exists")
    )
)]
pub async fn create_user(
    State(state): State<UserHandlerState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), ApiError> {
    let user = state
        .user_service
        .save(request.into())
        .await
        .map_err(domain_error)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(UserDto::from(user))),
    ))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<UserDto>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Username or email already exists")
    )
)]
pub async fn update_user(
    State(state): State<UserHandlerState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    match state.user_service.update(&request.into(), id).await {
        Ok(Some(user)) => Ok(Json(ApiResponse::success(UserDto::from(user)))),
        Ok(None) => Err(not_found(format!("User '{}' not found", id))),
        Err(e) => Err(domain_error(e)),
    }
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted (or never existed)")
    )
)]
pub async fn delete_user(
    State(state): State<UserHandlerState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state
        .user_service
        .delete_by_id(id)
        .await
        .map_err(domain_error)?;
    Ok(StatusCode::NO_CONTENT)
}
