use actix_identity::Identity;
use actix_web::{
    get, post,
    web::{self, Data},
    HttpMessage, HttpRequest, HttpResponse, Responder,
};

use crate::{
    auth,
    db::{self, users::NewUser},
    errors::AppError,
    structs::{LoginRequest, LoginResponse, MessageResponse, RegisterRequest},
    utils, AppState,
};

#[post("/register")]
pub async fn register_handler(
    web::Json(form): web::Json<RegisterRequest>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    utils::require_non_empty(&form.name, "Name")?;
    utils::require_non_empty(&form.business_name, "Business name")?;
    utils::validate_email(&form.email)?;
    utils::validate_password(&form.password)?;

    let pwd_hash = utils::hash_password(&form.password)?;
    let user = db::users::create_user(
        &state,
        NewUser {
            name: form.name.trim().to_owned(),
            email: utils::normalize_email(&form.email),
            pwd_hash,
            business_name: form.business_name.trim().to_owned(),
            phone: utils::non_blank(form.phone),
            address: utils::non_blank(form.address),
            gstin: utils::non_blank(form.gstin),
        },
    )
    .await?;

    Ok(HttpResponse::Created().json(user))
}

#[post("/login")]
pub async fn login_handler(
    web::Json(form): web::Json<LoginRequest>,
    state: Data<AppState>,
    request: HttpRequest,
) -> Result<impl Responder, AppError> {
    let lc_email = utils::normalize_email(&form.email);

    let user = match db::users::find_user_by_email(&state, &lc_email).await? {
        Some(user) => user,
        None => {
            log::warn!("Login attempt for unknown email {}", lc_email);
            return Err(AppError::Forbidden("Invalid email".to_owned()));
        }
    };

    if !utils::verify_password(&form.password, &user.pwd_hash)? {
        log::warn!("Wrong password for user ID: {}", user.id);
        return Err(AppError::Forbidden("Invalid password".to_owned()));
    }

    Identity::login(&request.extensions(), user.id.to_string())
        .map_err(|e| AppError::IdentityError(e.to_string()))?;
    log::info!("User {} logged in", user.id);

    Ok(HttpResponse::Ok().json(LoginResponse {
        message: "Login successful".to_owned(),
        user,
    }))
}

#[post("/logout")]
pub async fn logout_handler(identity: Option<Identity>) -> impl Responder {
    if let Some(identity) = identity {
        identity.logout();
    }
    HttpResponse::Ok().json(MessageResponse {
        message: "Logged out".to_owned(),
    })
}

#[get("/validate-token")]
pub async fn validate_token_handler(
    identity: Option<Identity>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    let identity = identity.ok_or_else(AppError::unauthenticated)?;
    let auth_user = auth::resolve(&state, &identity).await.map_err(|e| match e {
        AppError::Forbidden(_) => AppError::unauthenticated(),
        other => other,
    })?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        message: "Token is valid".to_owned(),
        user: auth_user.user,
    }))
}
