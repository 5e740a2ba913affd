use actix_web::{
    get, post, put,
    web::{self, Data},
    HttpResponse, Responder,
};

use crate::{
    auth::AuthUser,
    db,
    errors::AppError,
    pricing,
    structs::{CreateQuotationRequest, EditQuotationRequest},
    AppState,
};

pub(crate) fn quotation_not_found() -> AppError {
    AppError::NotFound("Quotation not found or does not belong to you".to_owned())
}

fn customer_not_found() -> AppError {
    AppError::NotFound("Customer not found or does not belong to you".to_owned())
}

#[post("/createQuotation")]
pub async fn create_quotation_handler(
    user: AuthUser,
    web::Json(form): web::Json<CreateQuotationRequest>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    pricing::validate_items(&form.items)?;

    let mut tx = state.db_pool.begin().await?;

    if !db::customers::customer_belongs_to(&mut tx, user.id, form.customer_id).await? {
        return Err(customer_not_found());
    }

    let product_ids = pricing::referenced_product_ids(&form.items);
    let owned = db::products::owned_products_by_ids(&mut tx, user.id, &product_ids).await?;
    let lines = pricing::price_lines(&form.items, &owned)?;

    let created = db::quotations::create_quotation(&mut tx, user.id, form.customer_id, &lines).await?;
    tx.commit().await?;

    Ok(HttpResponse::Created().json(created))
}

#[put("/editQuotation/{quotation_id}")]
pub async fn edit_quotation_handler(
    user: AuthUser,
    path: web::Path<i64>,
    web::Json(form): web::Json<EditQuotationRequest>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    let quotation_id = path.into_inner();
    pricing::validate_items(&form.items)?;

    let mut tx = state.db_pool.begin().await?;

    let quotation = db::quotations::get_quotation(&mut tx, user.id, quotation_id)
        .await?
        .ok_or_else(quotation_not_found)?;

    if !db::customers::customer_belongs_to(&mut tx, user.id, quotation.customer_id).await? {
        return Err(customer_not_found());
    }

    let product_ids = pricing::referenced_product_ids(&form.items);
    let owned = db::products::owned_products_by_ids(&mut tx, user.id, &product_ids).await?;
    let lines = pricing::price_lines(&form.items, &owned)?;

    let updated = db::quotations::replace_items(&mut tx, quotation.id, &lines).await?;
    tx.commit().await?;

    Ok(HttpResponse::Ok().json(updated))
}

#[get("/allQuotation")]
pub async fn all_quotations_handler(
    user: AuthUser,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    let quotations = db::quotations::list_quotations(&state, user.id).await?;
    Ok(HttpResponse::Ok().json(quotations))
}

#[get("/allQuotation/dashboard")]
pub async fn dashboard_handler(
    user: AuthUser,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    let entries = db::quotations::dashboard(&state, user.id).await?;
    Ok(HttpResponse::Ok().json(entries))
}

#[get("/quotation/{quotation_id}")]
pub async fn quotation_handler(
    user: AuthUser,
    path: web::Path<i64>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    let detail = db::quotations::quotation_detail(&state, user.id, path.into_inner())
        .await?
        .ok_or_else(quotation_not_found)?;
    Ok(HttpResponse::Ok().json(detail))
}
