use axum::{
    Extension, Json,
    body::Body,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::IntoResponse,
};
use axum_extra::extract::cookie::CookieJar;
use shared::{abstract_trait::DynJwtService, errors::ErrorResponse};
use uuid::Uuid;

/// Header that binds a guest browser session to its cart.
pub const SESSION_HEADER: &str = "x-session-id";

/// Who is making the request: a logged-in user, a guest session, or both
/// (a user who still carries a guest session cookie from before login).
#[derive(Debug, Clone, Default)]
pub struct RequestIdentity {
    pub user_id: Option<Uuid>,
    pub session_id: Option<String>,
}

fn unauthorized(message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::UNAUTHORIZED, Json(ErrorResponse::fail(message)))
}

fn extract_token(cookie_jar: &CookieJar, req: &Request<Body>) -> Option<String> {
    cookie_jar
        .get("token")
        .map(|cookie| cookie.value().to_string())
        .or_else(|| {
            req.headers()
                .get(header::AUTHORIZATION)
                .and_then(|auth_header| auth_header.to_str().ok())
                .and_then(|auth_value| auth_value.strip_prefix("Bearer ").map(str::to_owned))
        })
}

/// Requires a valid access token and exposes the user id to handlers.
pub async fn auth_middleware(
    cookie_jar: CookieJar,
    Extension(jwt): Extension<DynJwtService>,
    mut req: Request<Body>,
    next: Next,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    let token = extract_token(&cookie_jar, &req)
        .ok_or_else(|| unauthorized("You are not logged in, please provide token"))?;

    let user_id = jwt
        .verify_token(&token, "access")
        .map_err(|_| unauthorized("Invalid token"))?;

    req.extensions_mut().insert(user_id);

    Ok(next.run(req).await)
}

/// Accepts either a logged-in user or a guest session header. Invalid tokens
/// are rejected rather than silently downgraded to guest.
pub async fn identity_middleware(
    cookie_jar: CookieJar,
    Extension(jwt): Extension<DynJwtService>,
    mut req: Request<Body>,
    next: Next,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    let user_id = match extract_token(&cookie_jar, &req) {
        Some(token) => Some(
            jwt.verify_token(&token, "access")
                .map_err(|_| unauthorized("Invalid token"))?,
        ),
        None => None,
    };

    let session_id = req
        .headers()
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_string);

    if user_id.is_none() && session_id.is_none() {
        return Err(unauthorized(
            "Provide a bearer token or an X-Session-Id header",
        ));
    }

    req.extensions_mut().insert(RequestIdentity {
        user_id,
        session_id,
    });

    Ok(next.run(req).await)
}
