use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Deserialize, Serialize, Debug, Clone, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub pwd_hash: String,
    pub business_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(rename = "GSTIN")]
    pub gstin: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Serialize, Debug, Clone, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub price: f64,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Serialize, Debug, Clone, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Serialize, Debug, Clone, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Quotation {
    pub id: i64,
    pub user_id: i64,
    pub customer_id: i64,
    pub grand_total: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Serialize, Debug, Clone, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct QuotationItem {
    pub id: i64,
    pub quotation_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub price: f64,
    pub amount: f64,
}

// Request bodies

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub business_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(rename = "GSTIN")]
    pub gstin: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ProductRequest {
    pub title: String,
    pub price: f64,
    pub description: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CustomerRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct QuotationItemRequest {
    pub product_id: i64,
    pub quantity: i64,
    pub price: Option<f64>,
    pub product_name: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuotationRequest {
    pub customer_id: i64,
    pub items: Vec<QuotationItemRequest>,
}

#[derive(Deserialize, Debug)]
pub struct EditQuotationRequest {
    pub items: Vec<QuotationItemRequest>,
}

// Response bodies

#[derive(Serialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize, Debug)]
pub struct LoginResponse {
    pub message: String,
    pub user: User,
}

#[derive(Serialize, Debug)]
pub struct CustomerPage {
    pub total: i64,
    pub page: i64,
    pub customers: Vec<Customer>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct QuotationWithItems {
    #[serde(flatten)]
    pub quotation: Quotation,
    pub quotation_items: Vec<QuotationItem>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct QuotationItemWithProduct {
    #[serde(flatten)]
    pub item: QuotationItem,
    pub product: Product,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct QuotationListing {
    #[serde(flatten)]
    pub quotation: Quotation,
    pub quotation_items: Vec<QuotationItemWithProduct>,
    pub quotation_of: Customer,
}

#[derive(Serialize, Debug, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DashboardEntry {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub grand_total: f64,
    pub customer: String,
}

#[derive(Serialize, Debug, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct QuotationDetail {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub grand_total: f64,
    pub business_name: String,
    pub user_address: Option<String>,
    pub user_phone: Option<String>,
    pub user_email: String,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_email: String,
    pub customer_address: Option<String>,
    #[sqlx(skip)]
    pub quotation_items: Vec<QuotationItem>,
}
