use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Serialize;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::config::ServerConfig;

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Admin credential settings enforced on writes.
#[derive(Clone)]
pub struct AuthState {
    username: Arc<String>,
    password: Option<Arc<String>>,
    tokens: Arc<Vec<String>>,
}

impl AuthState {
    #[must_use]
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            username: Arc::new(config.admin_username.clone()),
            password: config.admin_password.clone().map(Arc::new),
            tokens: Arc::new(config.admin_tokens.clone()),
        }
    }

    #[cfg(test)]
    pub fn for_tests(username: &str, password: Option<&str>, tokens: &[&str]) -> Self {
        Self {
            username: Arc::new(username.to_string()),
            password: password.map(|p| Arc::new(p.to_string())),
            tokens: Arc::new(tokens.iter().map(ToString::to_string).collect()),
        }
    }

    /// Checks an `Authorization` header against the configured credentials.
    /// All comparisons are constant-time.
    fn allows(&self, header: Option<&HeaderValue>) -> bool {
        let Some(value) = header.and_then(|v| v.to_str().ok()) else {
            return false;
        };

        if let Some(encoded) = value.strip_prefix("Basic ") {
            return self.allows_basic(encoded);
        }
        if let Some(token) = value.strip_prefix("Bearer ") {
            return self.allows_bearer(token.trim());
        }
        false
    }

    fn allows_basic(&self, encoded: &str) -> bool {
        let Some(password) = &self.password else {
            return false;
        };
        let Ok(decoded) = BASE64.decode(encoded.trim()) else {
            return false;
        };
        let Ok(pair) = String::from_utf8(decoded) else {
            return false;
        };
        let Some((user, pass)) = pair.split_once(':') else {
            return false;
        };
        let user_ok: bool = user.as_bytes().ct_eq(self.username.as_bytes()).into();
        let pass_ok: bool = pass.as_bytes().ct_eq(password.as_bytes()).into();
        user_ok && pass_ok
    }

    fn allows_bearer(&self, token: &str) -> bool {
        if token.is_empty() {
            return false;
        }
        self.tokens
            .iter()
            .any(|t| bool::from(t.as_bytes().ct_eq(token.as_bytes())))
    }
}

impl std::fmt::Debug for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthState")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[redacted]"))
            .field("tokens", &format!("[{} redacted]", self.tokens.len()))
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct MiddlewareErrorBody {
    error: MiddlewareError,
}

#[derive(Debug, Serialize)]
struct MiddlewareError {
    code: &'static str,
    message: &'static str,
}

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Middleware enforcing Basic or Bearer admin auth on protected routes.
///
/// Rejections carry a `WWW-Authenticate` challenge so browsers prompt for
/// Basic credentials.
pub async fn require_admin_auth(
    State(auth): State<AuthState>,
    req: Request,
    next: Next,
) -> Response {
    if auth.allows(req.headers().get(AUTHORIZATION)) {
        return next.run(req).await;
    }

    let mut res = (
        StatusCode::UNAUTHORIZED,
        Json(MiddlewareErrorBody {
            error: MiddlewareError {
                code: "unauthorized",
                message: "missing or invalid admin credentials",
            },
        }),
    )
        .into_response();
    res.headers_mut().insert(
        axum::http::header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"picks-admin\""),
    );
    res
}
