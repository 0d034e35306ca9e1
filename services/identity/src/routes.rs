//! Identity service routes
//!
//! Guards are attached per route at registration time: the permission
//! create endpoint runs behind the token guard and the permission guard;
//! user provisioning runs behind the token guard alone.

use axum::{
    Extension, Json, Router,
    extract::{Query, State},
    http::StatusCode,
    middleware,
    response::Response,
    routing::{get, patch, post},
};
use serde_json::json;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::{PermissionPolicy, require_permission, require_token},
    models::{
        ChangePassword, CreateEntityUser, CreateGlobalUser, CreatePermissionSet,
        GetEntityPermissions, Identity, LoginQuery,
    },
    repositories::is_unique_violation,
    response,
};

/// Create the router for the identity service
pub fn create_router(state: AppState) -> Router {
    let create_permission_guarded = post(create_entity_permission)
        .route_layer(middleware::from_fn_with_state(
            (
                state.clone(),
                PermissionPolicy::new("entity_permissions", &["permissions"]),
            ),
            require_permission,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_token,
        ));

    let user_routes = Router::new()
        .route("/user", post(create_entity_user))
        .route("/user/global", post(create_global_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_token,
        ));

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/login", get(login))
        .route("/password", patch(change_password))
        .route(
            "/permission/entity",
            get(fetch_entity_permissions).merge(create_permission_guarded),
        )
        .merge(user_routes)
        .with_state(state.clone());

    if state.config.base_route.is_empty() {
        app
    } else {
        Router::new().nest(&state.config.base_route, app)
    }
}

/// Health check endpoint
pub async fn health_check() -> Response {
    response::success(
        StatusCode::OK,
        "ok",
        json!({"service": "identity-service"}),
    )
}

/// Validate credentials and issue an authentication token
pub async fn login(
    State(state): State<AppState>,
    Query(query): Query<LoginQuery>,
) -> ApiResult<Response> {
    query.validate().map_err(ApiError::InvalidInput)?;

    let outcome = state
        .authenticator
        .login(&query.user_email, &query.user_password)
        .await?;

    Ok(response::success(
        StatusCode::OK,
        "login successful",
        json!(outcome),
    ))
}

/// Change a password after re-validating the old one
pub async fn change_password(
    State(state): State<AppState>,
    Json(payload): Json<ChangePassword>,
) -> ApiResult<Response> {
    payload.validate().map_err(ApiError::InvalidInput)?;

    state
        .authenticator
        .change_password(
            &payload.user_email,
            &payload.old_password,
            &payload.new_password,
        )
        .await?;

    Ok(response::success_empty(
        StatusCode::OK,
        "password updated successfully",
    ))
}

/// Fetch an entity's active permission sets
pub async fn fetch_entity_permissions(
    State(state): State<AppState>,
    Query(query): Query<GetEntityPermissions>,
) -> ApiResult<Response> {
    let sets = state
        .permissions
        .fetch_entity_permissions(&query.entity_id, None)
        .await
        .map_err(|e| ApiError::store("Failed to fetch entity permissions", e))?;

    Ok(response::success(
        StatusCode::OK,
        "successfully fetched permissions",
        json!(sets),
    ))
}

/// Create an entity-scoped permission set
pub async fn create_entity_permission(
    State(state): State<AppState>,
    Extension(actor): Extension<Identity>,
    Json(payload): Json<CreatePermissionSet>,
) -> ApiResult<Response> {
    payload.validate().map_err(ApiError::ValidationError)?;

    let permission_id = crate::ids::nano_id(crate::ids::PERMISSION_ID_LEN);
    state
        .permissions
        .create_entity_permission(
            &payload.entity_id,
            &permission_id,
            &payload.permission_name,
            &payload.permissions,
            &actor.user_id,
        )
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::DuplicateName
            } else {
                ApiError::store("Failed to create permission", e)
            }
        })?;

    Ok(response::success_empty(
        StatusCode::CREATED,
        "Successfully created permission",
    ))
}

/// Provision an entity-scoped user
pub async fn create_entity_user(
    State(state): State<AppState>,
    Extension(actor): Extension<Identity>,
    Json(payload): Json<CreateEntityUser>,
) -> ApiResult<Response> {
    payload.validate().map_err(ApiError::InvalidInput)?;

    let user_id = state
        .provisioning
        .create_entity_user(&payload, &actor.user_id)
        .await?;

    Ok(response::success(
        StatusCode::OK,
        "Successfully created user",
        json!({"user_id": user_id}),
    ))
}

/// Provision a platform-wide chief-admin user
pub async fn create_global_user(
    State(state): State<AppState>,
    Extension(actor): Extension<Identity>,
    Json(payload): Json<CreateGlobalUser>,
) -> ApiResult<Response> {
    payload.validate().map_err(ApiError::InvalidInput)?;

    let user_id = state
        .provisioning
        .create_global_user(&payload, &actor.user_id)
        .await?;

    Ok(response::success(
        StatusCode::OK,
        "Successfully created user",
        json!({"user_id": user_id}),
    ))
}
