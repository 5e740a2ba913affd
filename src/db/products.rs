use std::collections::HashMap;

use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::{errors::AppError, structs::Product, AppState};

pub async fn list_products(state: &AppState, user_id: i64) -> Result<Vec<Product>, AppError> {
    let products =
        sqlx::query_as::<_, Product>("SELECT * FROM products WHERE user_id = $1 ORDER BY id")
            .bind(user_id)
            .fetch_all(&state.db_pool)
            .await?;
    Ok(products)
}

pub async fn get_product(
    state: &AppState,
    user_id: i64,
    id: i64,
) -> Result<Option<Product>, AppError> {
    let product =
        sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&state.db_pool)
            .await?;
    Ok(product)
}

pub async fn create_product(
    state: &AppState,
    user_id: i64,
    title: &str,
    price: f64,
    description: Option<&str>,
) -> Result<Product, AppError> {
    let created_at = chrono::Utc::now();
    let product = sqlx::query_as::<_, Product>(
        "INSERT INTO products (user_id, title, price, description, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(user_id)
    .bind(title)
    .bind(price)
    .bind(description)
    .bind(created_at)
    .bind(created_at)
    .fetch_one(&state.db_pool)
    .await?;
    log::info!("Product {} created for user {}", product.id, user_id);
    Ok(product)
}

/// Updates a product owned by `user_id`. A `None` description keeps the stored
/// one. Returns `None` when no such product belongs to the user.
pub async fn update_product(
    state: &AppState,
    user_id: i64,
    id: i64,
    title: &str,
    price: f64,
    description: Option<&str>,
) -> Result<Option<Product>, AppError> {
    let product = sqlx::query_as::<_, Product>(
        "UPDATE products
         SET title = $1, price = $2, description = COALESCE($3, description), updated_at = $4
         WHERE id = $5 AND user_id = $6
         RETURNING *",
    )
    .bind(title)
    .bind(price)
    .bind(description)
    .bind(chrono::Utc::now())
    .bind(id)
    .bind(user_id)
    .fetch_optional(&state.db_pool)
    .await?;
    if let Some(product) = &product {
        log::info!("Product {} updated for user {}", product.id, user_id);
    }
    Ok(product)
}

/// Loads the subset of `ids` owned by `user_id`, keyed by id.
pub async fn owned_products_by_ids(
    conn: &mut SqliteConnection,
    user_id: i64,
    ids: &[i64],
) -> Result<HashMap<i64, Product>, AppError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let mut query = QueryBuilder::<Sqlite>::new("SELECT * FROM products WHERE user_id = ");
    query.push_bind(user_id);
    query.push(" AND id IN (");
    let mut separated = query.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");

    let products = query
        .build_query_as::<Product>()
        .fetch_all(&mut *conn)
        .await?;
    Ok(products.into_iter().map(|p| (p.id, p)).collect())
}
