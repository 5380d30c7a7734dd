//! API service routes

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Extension, Multipart, Path, State},
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use serde_json::json;
use tower_http::services::ServeDir;
use tracing::info;
use uuid::Uuid;

use crate::{
    error::ApiError,
    middleware::{CurrentUser, require_session},
    models::{CreateCommentRequest, LoginRequest, NewComment, NewPhoto, NewUser, RegisterRequest},
    session::SESSION_COOKIE,
    state::AppState,
    upload,
    views::{self, CommentView, UserSummary, UserView},
};

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/user/list", get(list_users))
        .route("/user/:id", get(get_user))
        .route("/photosOfUser/:id", get(photos_of_user))
        .route(
            "/upload",
            post(upload_photo).layer(DefaultBodyLimit::max(upload::UPLOAD_BODY_LIMIT_BYTES)),
        )
        .route("/commentsOfPhoto/:photo_id", post(add_comment))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/test/info", get(get_schema_info))
        .route("/test/counts", get(get_collection_counts))
        .route("/admin/login", post(login))
        .route("/admin/register", post(register))
        .route("/admin/logout", post(logout))
        .merge(protected_routes)
        .nest_service("/images", ServeDir::new(state.images.root()))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "foto-kunga-api"
    }))
}

/// Get the schema info singleton
pub async fn get_schema_info(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let info = state
        .store
        .schema_info()
        .await?
        .ok_or_else(|| ApiError::Store(anyhow::anyhow!("schema info singleton is missing")))?;

    Ok(Json(info))
}

/// Get per-collection document counts
pub async fn get_collection_counts(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let counts = state.store.counts().await?;

    Ok(Json(counts))
}

/// Get all users as public summaries
pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let users = state.store.list_users().await?;
    let summaries: Vec<UserSummary> = users.iter().map(UserSummary::of).collect();

    Ok(Json(summaries))
}

/// Get a user by ID, full view
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .store
        .find_user(id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    Ok(Json(UserView::of(&user)))
}

/// Get a user's photos with their comments and comment authors resolved
pub async fn photos_of_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    // Distinguish an unknown user from a user with no photos
    state
        .store
        .find_user(id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    let photos = state.store.photos_of_user(id).await?;
    let views = views::assemble_photo_views(state.store.as_ref(), photos).await?;

    Ok(Json(views))
}

/// Accept a photo upload for the logged-in user
pub async fn upload_photo(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let (file_name, content_type, bytes) = upload::read_image_field(&mut multipart).await?;
    let extension = upload::validate_image(&file_name, &content_type, bytes.len())?;

    // The stored name is generated; the client's name is not trusted
    let key = upload::storage_key(extension);
    state.images.save(&key, &bytes).await?;

    let photo = state
        .store
        .create_photo(NewPhoto {
            user_id: user.id,
            file_name: key,
        })
        .await?;

    let view = views::assemble_photo_view(state.store.as_ref(), photo).await?;
    Ok(Json(view))
}

/// Log a user in by login name and start a session
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .store
        .find_user_by_login(payload.login_name.trim())
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    let token = state.sessions.insert(user.clone()).await;
    let jar = jar.add(session_cookie(token));

    info!("User {} logged in", user.login_name);
    Ok((jar, Json(UserView::of(&user))))
}

/// Register a new user and log them straight in
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let login_name = payload.login_name.trim();
    if login_name.is_empty() {
        return Err(ApiError::Validation(
            "login_name must not be empty".to_string(),
        ));
    }
    if state.store.find_user_by_login(login_name).await?.is_some() {
        return Err(ApiError::Validation(format!(
            "login_name {} is already taken",
            login_name
        )));
    }

    let user = state
        .store
        .create_user(NewUser::from_login_name(login_name))
        .await?;
    let token = state.sessions.insert(user.clone()).await;
    let jar = jar.add(session_cookie(token));

    info!("User {} registered", user.login_name);
    Ok((jar, Json(UserView::of(&user))))
}

/// End the current session
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or(ApiError::Unauthenticated)?;

    if !state.sessions.remove(&token).await {
        return Err(ApiError::Unauthenticated);
    }

    let jar = jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/"));
    Ok((jar, Json(json!({"message": "Success"}))))
}

/// Add a comment to a photo as the logged-in user
pub async fn add_comment(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(photo_id): Path<Uuid>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let text = payload.comment.unwrap_or_default();
    if text.trim().is_empty() {
        return Err(ApiError::Validation(
            "comment must not be empty".to_string(),
        ));
    }

    let comment = state
        .store
        .add_comment(
            photo_id,
            NewComment {
                comment: text,
                user_id: user.id,
            },
        )
        .await?
        .ok_or(ApiError::NotFound("Photo"))?;

    Ok(Json(CommentView::of(&comment, Some(&user))))
}

/// Session cookie for a freshly issued token
fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}
