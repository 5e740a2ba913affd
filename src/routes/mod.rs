use actix_cors::Cors;
use actix_web::{
    error::JsonPayloadError,
    http::{header, Method},
    middleware::Condition,
    web::{self, ServiceConfig},
    HttpRequest, HttpResponse, Responder,
};

use crate::errors::AppError;

pub mod auth;
pub mod customers;
pub mod invoices;
pub mod products;
pub mod quotations;

/// Registers every API route.
pub fn configure(cfg: &mut ServiceConfig) {
    cfg.app_data(json_config())
        .service(auth::register_handler)
        .service(auth::login_handler)
        .service(auth::logout_handler)
        .service(auth::validate_token_handler)
        .service(products::all_products_handler)
        .service(products::product_handler)
        .service(products::add_product_handler)
        .service(products::edit_product_handler)
        .service(customers::all_customers_handler)
        .service(customers::customer_handler)
        .service(customers::add_customer_handler)
        .service(customers::edit_customer_handler)
        .service(quotations::create_quotation_handler)
        .service(quotations::edit_quotation_handler)
        .service(quotations::dashboard_handler)
        .service(quotations::all_quotations_handler)
        .service(quotations::quotation_handler)
        .service(invoices::send_invoice_handler);
}

/// Cross-origin access for the browser frontend at `origin`, with credentials.
/// Without an origin the layer is disabled and requests pass through untouched.
pub fn cors(origin: Option<&str>) -> Condition<Cors> {
    let layer = origin.map(|origin| {
        Cors::default()
            .allowed_origin(origin)
            .allowed_methods(vec![Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
            .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
            .supports_credentials()
            .max_age(3600)
    });
    Condition::new(layer.is_some(), layer.unwrap_or_default())
}

/// Malformed or mistyped JSON bodies answer 400 with the usual message shape.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        log::warn!("Rejected request body: {}", err);
        AppError::BadRequest(format!("Invalid request body: {}", err)).into()
    })
}

pub async fn default_handler(req_method: Method) -> Result<impl Responder, AppError> {
    match req_method {
        Method::GET | Method::POST | Method::PUT => {
            Err::<HttpResponse, _>(AppError::NotFound("Not found".to_owned()))
        }
        _ => Ok(HttpResponse::MethodNotAllowed().finish()),
    }
}
