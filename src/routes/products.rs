use actix_web::{
    get, post, put,
    web::{self, Data},
    HttpResponse, Responder,
};

use crate::{auth::AuthUser, db, errors::AppError, structs::ProductRequest, utils, AppState};

fn product_not_found() -> AppError {
    AppError::NotFound("Product not found or does not belong to you".to_owned())
}

fn validate(form: &ProductRequest) -> Result<(), AppError> {
    utils::require_non_empty(&form.title, "Title")?;
    utils::validate_price(form.price)
}

#[get("/allProduct")]
pub async fn all_products_handler(
    user: AuthUser,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    let products = db::products::list_products(&state, user.id).await?;
    Ok(HttpResponse::Ok().json(products))
}

#[get("/product/{product_id}")]
pub async fn product_handler(
    user: AuthUser,
    path: web::Path<i64>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    let product = db::products::get_product(&state, user.id, path.into_inner())
        .await?
        .ok_or_else(product_not_found)?;
    Ok(HttpResponse::Ok().json(product))
}

#[post("/addProduct")]
pub async fn add_product_handler(
    user: AuthUser,
    web::Json(form): web::Json<ProductRequest>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    validate(&form)?;
    let description = utils::non_blank(form.description);
    let product = db::products::create_product(
        &state,
        user.id,
        form.title.trim(),
        form.price,
        description.as_deref(),
    )
    .await?;
    Ok(HttpResponse::Created().json(product))
}

#[put("/editProduct/{product_id}")]
pub async fn edit_product_handler(
    user: AuthUser,
    path: web::Path<i64>,
    web::Json(form): web::Json<ProductRequest>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    validate(&form)?;
    let description = utils::non_blank(form.description);
    let product = db::products::update_product(
        &state,
        user.id,
        path.into_inner(),
        form.title.trim(),
        form.price,
        description.as_deref(),
    )
    .await?
    .ok_or_else(product_not_found)?;
    Ok(HttpResponse::Ok().json(product))
}
