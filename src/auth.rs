//! Session-based authentication.
//!
//! The session cookie is signed and encrypted by `actix-session`; the identity
//! stored in it is the user's id. Handlers take an [`AuthUser`] argument to
//! require a logged-in caller.

use std::{future::Future, pin::Pin, time::Duration};

use actix_identity::{Identity, IdentityMiddleware};
use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::{
    cookie::{Key, SameSite},
    dev::Payload,
    web::Data,
    FromRequest, HttpRequest,
};

use crate::{db, errors::AppError, structs::User, AppState};

pub const SESSION_COOKIE: &str = "token";

/// The user behind a valid session.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub user: User,
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let identity = Identity::extract(&req)
                .await
                .map_err(|_| missing_identity(&req))?;
            let state = req
                .app_data::<Data<AppState>>()
                .cloned()
                .ok_or(AppError::InternalServerError)?;
            resolve(&state, &identity).await
        })
    }
}

/// No identity with no session cookie is an anonymous caller (401). A
/// non-empty cookie that yields no identity was forged, tampered with or has
/// outlived its login deadline (403).
fn missing_identity(req: &HttpRequest) -> AppError {
    match req.cookie(SESSION_COOKIE) {
        Some(cookie) if !cookie.value().is_empty() => {
            log::warn!("Rejected session cookie on {}", req.path());
            AppError::invalid_token()
        }
        _ => AppError::unauthenticated(),
    }
}

/// Maps a session identity to a live user. An identity that does not name an
/// existing user is treated as a forged or stale token.
pub async fn resolve(state: &AppState, identity: &Identity) -> Result<AuthUser, AppError> {
    let raw_id = identity.id().map_err(|e| {
        log::warn!("Session identity unreadable: {}", e);
        AppError::invalid_token()
    })?;
    let id: i64 = raw_id.parse().map_err(|_| {
        log::warn!("Session identity is not a user id: {:?}", raw_id);
        AppError::invalid_token()
    })?;
    match db::users::find_user_by_id(state, id).await? {
        Some(user) => Ok(AuthUser {
            id: user.id,
            email: user.email.clone(),
            user,
        }),
        None => {
            log::warn!("Session names unknown user {}", id);
            Err(AppError::invalid_token())
        }
    }
}

/// Cookie-backed session store. The cookie content is encrypted and signed
/// with `key`; `secure` enables cross-site delivery (`Secure`, `SameSite=None`).
pub fn session_middleware(key: Key, secure: bool) -> SessionMiddleware<CookieSessionStore> {
    let same_site = if secure { SameSite::None } else { SameSite::Lax };
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_http_only(true)
        .cookie_secure(secure)
        .cookie_same_site(same_site)
        .build()
}

/// Identity layer on top of the session. Logins older than `ttl` are dropped.
pub fn identity_middleware(ttl: Duration) -> IdentityMiddleware {
    IdentityMiddleware::builder()
        .login_deadline(Some(ttl))
        .build()
}
