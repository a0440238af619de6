use async_trait::async_trait;
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

/// Challenge sent with every 401.
pub const CHALLENGE: &str = "Basic realm=mgmt";

#[derive(Clone, Debug)]
pub struct Identity {
    pub name: String,
    pub is_admin: bool,
}

impl Identity {
    pub fn admin(name: impl Into<String>) -> Self {
        Self { name: name.into(), is_admin: true }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Basic { user: String, pass: String },
    Anonymous,
}

impl Credentials {
    /// Extract HTTP Basic credentials. Absent or unparseable headers are
    /// treated as anonymous.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(Self::parse_basic)
            .unwrap_or(Self::Anonymous)
    }

    fn parse_basic(value: &str) -> Option<Self> {
        let (scheme, encoded) = value.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return None;
        }
        let decoded = BASE64.decode(encoded.trim()).ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (user, pass) = decoded.split_once(':')?;
        Some(Self::Basic { user: user.to_string(), pass: pass.to_string() })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basic { user, .. } => f.debug_struct("Basic").field("user", user).finish_non_exhaustive(),
            Self::Anonymous => f.write_str("Anonymous"),
        }
    }
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Whether the admin surface exists at all.
    fn enabled(&self) -> bool;
    async fn authenticate(&self, credentials: &Credentials) -> ServerResult<Identity>;
}

/// Checks Basic credentials against the configured admin identity.
///
/// Values are compared as BLAKE3 digests, whose equality is constant-time.
pub struct AdminAuth {
    user: String,
    user_digest: blake3::Hash,
    pass_digest: blake3::Hash,
    enabled: bool,
}

impl AdminAuth {
    pub fn new(user: &str, pass: &str) -> Self {
        Self {
            user: user.to_string(),
            user_digest: blake3::hash(user.as_bytes()),
            pass_digest: blake3::hash(pass.as_bytes()),
            enabled: !user.is_empty() && !pass.is_empty(),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(&config.admin_user, &config.admin_pass)
    }
}

#[async_trait]
impl AuthProvider for AdminAuth {
    fn enabled(&self) -> bool {
        self.enabled
    }

    async fn authenticate(&self, credentials: &Credentials) -> ServerResult<Identity> {
        if !self.enabled {
            return Err(ServerError::AuthFailed("admin disabled".into()));
        }
        match credentials {
            Credentials::Basic { user, pass } => {
                let user_ok = blake3::hash(user.as_bytes()) == self.user_digest;
                let pass_ok = blake3::hash(pass.as_bytes()) == self.pass_digest;
                if user_ok & pass_ok {
                    Ok(Identity::admin(self.user.clone()))
                } else {
                    Err(ServerError::AuthFailed("bad credentials".into()))
                }
            }
            Credentials::Anonymous => Err(ServerError::AuthFailed("missing credentials".into())),
        }
    }
}

/// Middleware gating every admin route.
///
/// Disabled admin answers 404 so the surface stays hidden; otherwise
/// missing or wrong credentials get a 401 with a Basic challenge.
pub async fn require_admin(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if !state.auth.enabled() {
        return StatusCode::NOT_FOUND.into_response();
    }
    let credentials = Credentials::from_headers(request.headers());
    match state.auth.authenticate(&credentials).await {
        Ok(identity) if identity.is_admin => {
            tracing::debug!(user = %identity.name, path = %request.uri().path(), "admin request");
            next.run(request).await
        }
        Ok(identity) => {
            tracing::debug!(user = %identity.name, path = %request.uri().path(), "non-admin identity rejected");
            (StatusCode::UNAUTHORIZED, [(header::WWW_AUTHENTICATE, CHALLENGE)]).into_response()
        }
        Err(e) => {
            tracing::debug!(error = %e, path = %request.uri().path(), "admin request rejected");
            (StatusCode::UNAUTHORIZED, [(header::WWW_AUTHENTICATE, CHALLENGE)]).into_response()
        }
    }
}
