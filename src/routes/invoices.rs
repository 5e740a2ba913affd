use actix_web::{
    post,
    web::{self, Data},
    HttpResponse, Responder,
};

use crate::{
    auth::AuthUser, db, errors::AppError, mailer, routes::quotations::quotation_not_found,
    structs::MessageResponse, AppState,
};

#[post("/sendInvoice/{quotation_id}")]
pub async fn send_invoice_handler(
    user: AuthUser,
    path: web::Path<i64>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    let detail = db::quotations::quotation_detail(&state, user.id, path.into_inner())
        .await?
        .ok_or_else(quotation_not_found)?;

    let email = mailer::invoice_email(&detail)?;
    state.mailer.send(&email).await?;
    log::info!(
        "Invoice for quotation {} sent to {} by user {}",
        detail.id,
        detail.customer_email,
        user.id
    );

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Invoice sent successfully".to_owned(),
    }))
}
