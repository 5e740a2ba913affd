//! Multi-tenant invoicing backend: business users manage products, customers
//! and quotations, and email invoices to their customers.

#[macro_use]
extern crate lazy_static;

use std::sync::Arc;

use sqlx::SqlitePool;

pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod mailer;
pub mod pricing;
pub mod routes;
pub mod structs;
pub mod utils;

use mailer::Mailer;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new(db_pool: SqlitePool, mailer: Arc<dyn Mailer>) -> Self {
        AppState { db_pool, mailer }
    }
}
