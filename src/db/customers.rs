use sqlx::SqliteConnection;

use crate::{errors::AppError, structs::Customer, AppState};

/// Returns one page of the user's customers and their total count.
pub async fn list_customers(
    state: &AppState,
    user_id: i64,
    page: i64,
    limit: i64,
) -> Result<(Vec<Customer>, i64), AppError> {
    let offset = (page - 1).saturating_mul(limit);
    let customers = sqlx::query_as::<_, Customer>(
        "SELECT * FROM customers WHERE user_id = $1 ORDER BY id LIMIT $2 OFFSET $3",
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.db_pool)
    .await?;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(&state.db_pool)
        .await?;

    Ok((customers, total))
}

pub async fn get_customer(
    state: &AppState,
    user_id: i64,
    id: i64,
) -> Result<Option<Customer>, AppError> {
    let customer =
        sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&state.db_pool)
            .await?;
    Ok(customer)
}

pub async fn create_customer(
    state: &AppState,
    user_id: i64,
    name: &str,
    email: &str,
    phone: Option<&str>,
    address: Option<&str>,
) -> Result<Customer, AppError> {
    let created_at = chrono::Utc::now();
    let customer = sqlx::query_as::<_, Customer>(
        "INSERT INTO customers (user_id, name, email, phone, address, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
    )
    .bind(user_id)
    .bind(name)
    .bind(email)
    .bind(phone)
    .bind(address)
    .bind(created_at)
    .bind(created_at)
    .fetch_one(&state.db_pool)
    .await?;
    log::info!("Customer {} created for user {}", customer.id, user_id);
    Ok(customer)
}

pub async fn update_customer(
    state: &AppState,
    user_id: i64,
    id: i64,
    name: &str,
    email: &str,
    phone: Option<&str>,
    address: Option<&str>,
) -> Result<Option<Customer>, AppError> {
    let customer = sqlx::query_as::<_, Customer>(
        "UPDATE customers
         SET name = $1, email = $2, phone = COALESCE($3, phone),
             address = COALESCE($4, address), updated_at = $5
         WHERE id = $6 AND user_id = $7
         RETURNING *",
    )
    .bind(name)
    .bind(email)
    .bind(phone)
    .bind(address)
    .bind(chrono::Utc::now())
    .bind(id)
    .bind(user_id)
    .fetch_optional(&state.db_pool)
    .await?;
    if let Some(customer) = &customer {
        log::info!("Customer {} updated for user {}", customer.id, user_id);
    }
    Ok(customer)
}

pub async fn customer_belongs_to(
    conn: &mut SqliteConnection,
    user_id: i64,
    id: i64,
) -> Result<bool, AppError> {
    let owned: Option<i64> =
        sqlx::query_scalar("SELECT id FROM customers WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&mut *conn)
            .await?;
    Ok(owned.is_some())
}
