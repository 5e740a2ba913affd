use actix_web::{
    get, post, put,
    web::{self, Data},
    HttpResponse, Responder,
};

use crate::{
    auth::AuthUser,
    db,
    errors::AppError,
    structs::{CustomerPage, CustomerRequest, PageQuery},
    utils, AppState,
};

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;

fn customer_not_found() -> AppError {
    AppError::NotFound("Customer not found or does not belong to you".to_owned())
}

/// Trimmed and validated customer fields.
struct CustomerFields {
    name: String,
    email: String,
    phone: Option<String>,
    address: Option<String>,
}

fn validate(form: CustomerRequest) -> Result<CustomerFields, AppError> {
    utils::require_non_empty(&form.name, "Name")?;
    utils::validate_email(&form.email)?;
    Ok(CustomerFields {
        name: form.name.trim().to_owned(),
        email: form.email.trim().to_owned(),
        phone: utils::non_blank(form.phone),
        address: utils::non_blank(form.address),
    })
}

/// Clamps paging input to a valid page number and page size.
pub fn paging(query: &PageQuery) -> (i64, i64) {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    (page, limit)
}

#[get("/allCustomer")]
pub async fn all_customers_handler(
    user: AuthUser,
    query: web::Query<PageQuery>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    let (page, limit) = paging(&query);
    let (customers, total) = db::customers::list_customers(&state, user.id, page, limit).await?;
    Ok(HttpResponse::Ok().json(CustomerPage {
        total,
        page,
        customers,
    }))
}

#[get("/customer/{customer_id}")]
pub async fn customer_handler(
    user: AuthUser,
    path: web::Path<i64>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    let customer = db::customers::get_customer(&state, user.id, path.into_inner())
        .await?
        .ok_or_else(customer_not_found)?;
    Ok(HttpResponse::Ok().json(customer))
}

#[post("/addCustomer")]
pub async fn add_customer_handler(
    user: AuthUser,
    web::Json(form): web::Json<CustomerRequest>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    let fields = validate(form)?;
    let customer = db::customers::create_customer(
        &state,
        user.id,
        &fields.name,
        &fields.email,
        fields.phone.as_deref(),
        fields.address.as_deref(),
    )
    .await?;
    Ok(HttpResponse::Created().json(customer))
}

#[put("/editCustomer/{customer_id}")]
pub async fn edit_customer_handler(
    user: AuthUser,
    path: web::Path<i64>,
    web::Json(form): web::Json<CustomerRequest>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    let fields = validate(form)?;
    let customer = db::customers::update_customer(
        &state,
        user.id,
        path.into_inner(),
        &fields.name,
        &fields.email,
        fields.phone.as_deref(),
        fields.address.as_deref(),
    )
    .await?
    .ok_or_else(customer_not_found)?;
    Ok(HttpResponse::Ok().json(customer))
}
