//! Session middleware guarding the signed-in surface

use axum::{extract::State, http::Request, middleware::Next, response::Response};
use axum_extra::extract::CookieJar;

use crate::{error::ApiError, models::User, session::SESSION_COOKIE, state::AppState};

/// User behind the current request's session
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Session middleware
///
/// Reads the session cookie, resolves it against the session store and makes
/// the user available to handlers through the request extensions. Requests
/// without a live session are rejected before any handler or store work runs.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    // Extract the session token from the cookie
    let token = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or(ApiError::Unauthenticated)?;

    // Resolve it to a live session
    let user = state
        .sessions
        .get(&token)
        .await
        .ok_or(ApiError::Unauthenticated)?;

    // Insert the user into the request extensions
    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}
