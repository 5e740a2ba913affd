use std::collections::HashMap;

use sqlx::SqliteConnection;

use crate::{
    errors::AppError,
    pricing::{grand_total, PricedLine},
    structs::{
        Customer, DashboardEntry, Product, Quotation, QuotationDetail, QuotationItem,
        QuotationItemWithProduct, QuotationListing, QuotationWithItems,
    },
    AppState,
};

async fn insert_items(
    conn: &mut SqliteConnection,
    quotation_id: i64,
    lines: &[PricedLine],
) -> Result<Vec<QuotationItem>, AppError> {
    let mut items = Vec::with_capacity(lines.len());
    for line in lines {
        let item = sqlx::query_as::<_, QuotationItem>(
            "INSERT INTO quotation_items (quotation_id, product_id, product_name, quantity, price, amount)
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(quotation_id)
        .bind(line.product_id)
        .bind(&line.product_name)
        .bind(line.quantity)
        .bind(line.price)
        .bind(line.amount)
        .fetch_one(&mut *conn)
        .await?;
        items.push(item);
    }
    Ok(items)
}

/// Inserts a quotation and its items in one transaction.
pub async fn create_quotation(
    conn: &mut SqliteConnection,
    user_id: i64,
    customer_id: i64,
    lines: &[PricedLine],
) -> Result<QuotationWithItems, AppError> {
    let total = grand_total(lines)?;
    let created_at = chrono::Utc::now();
    let quotation = sqlx::query_as::<_, Quotation>(
        "INSERT INTO quotations (user_id, customer_id, grand_total, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(user_id)
    .bind(customer_id)
    .bind(total)
    .bind(created_at)
    .bind(created_at)
    .fetch_one(&mut *conn)
    .await?;

    let quotation_items = insert_items(conn, quotation.id, lines).await?;
    log::info!(
        "Quotation {} created for user {} with {} item(s), total {:.2}",
        quotation.id,
        user_id,
        quotation_items.len(),
        quotation.grand_total
    );
    Ok(QuotationWithItems {
        quotation,
        quotation_items,
    })
}

/// Drops every existing item of the quotation and inserts `lines` in their
/// place, recomputing the grand total.
pub async fn replace_items(
    conn: &mut SqliteConnection,
    quotation_id: i64,
    lines: &[PricedLine],
) -> Result<QuotationWithItems, AppError> {
    let total = grand_total(lines)?;
    sqlx::query("DELETE FROM quotation_items WHERE quotation_id = $1")
        .bind(quotation_id)
        .execute(&mut *conn)
        .await?;

    let quotation = sqlx::query_as::<_, Quotation>(
        "UPDATE quotations SET grand_total = $1, updated_at = $2 WHERE id = $3 RETURNING *",
    )
    .bind(total)
    .bind(chrono::Utc::now())
    .bind(quotation_id)
    .fetch_one(&mut *conn)
    .await?;

    let quotation_items = insert_items(conn, quotation_id, lines).await?;
    log::info!(
        "Quotation {} items replaced ({} item(s), total {:.2})",
        quotation_id,
        quotation_items.len(),
        quotation.grand_total
    );
    Ok(QuotationWithItems {
        quotation,
        quotation_items,
    })
}

pub async fn get_quotation(
    conn: &mut SqliteConnection,
    user_id: i64,
    id: i64,
) -> Result<Option<Quotation>, AppError> {
    let quotation =
        sqlx::query_as::<_, Quotation>("SELECT * FROM quotations WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&mut *conn)
            .await?;
    Ok(quotation)
}

pub async fn list_items(
    state: &AppState,
    quotation_id: i64,
) -> Result<Vec<QuotationItem>, AppError> {
    let items = sqlx::query_as::<_, QuotationItem>(
        "SELECT * FROM quotation_items WHERE quotation_id = $1 ORDER BY id",
    )
    .bind(quotation_id)
    .fetch_all(&state.db_pool)
    .await?;
    Ok(items)
}

/// Every quotation of the user with its items (each with its product) and
/// its customer.
pub async fn list_quotations(
    state: &AppState,
    user_id: i64,
) -> Result<Vec<QuotationListing>, AppError> {
    let pool = &state.db_pool;
    let quotations =
        sqlx::query_as::<_, Quotation>("SELECT * FROM quotations WHERE user_id = $1 ORDER BY id")
            .bind(user_id)
            .fetch_all(pool)
            .await?;

    let items = sqlx::query_as::<_, QuotationItem>(
        "SELECT qi.* FROM quotation_items qi
         JOIN quotations q ON q.id = qi.quotation_id
         WHERE q.user_id = $1
         ORDER BY qi.id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let products: HashMap<i64, Product> = sqlx::query_as::<_, Product>(
        "SELECT * FROM products WHERE id IN (
             SELECT qi.product_id FROM quotation_items qi
             JOIN quotations q ON q.id = qi.quotation_id
             WHERE q.user_id = $1)",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(|p| (p.id, p))
    .collect();

    let customers: HashMap<i64, Customer> = sqlx::query_as::<_, Customer>(
        "SELECT * FROM customers WHERE id IN (SELECT customer_id FROM quotations WHERE user_id = $1)",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(|c| (c.id, c))
    .collect();

    let mut items_by_quotation: HashMap<i64, Vec<QuotationItemWithProduct>> = HashMap::new();
    for item in items {
        let product = products
            .get(&item.product_id)
            .cloned()
            .ok_or(AppError::InternalServerError)?;
        items_by_quotation
            .entry(item.quotation_id)
            .or_default()
            .push(QuotationItemWithProduct { item, product });
    }

    quotations
        .into_iter()
        .map(|quotation| {
            let quotation_of = customers
                .get(&quotation.customer_id)
                .cloned()
                .ok_or(AppError::InternalServerError)?;
            let quotation_items = items_by_quotation
                .remove(&quotation.id)
                .unwrap_or_default();
            Ok(QuotationListing {
                quotation,
                quotation_items,
                quotation_of,
            })
        })
        .collect()
}

pub async fn dashboard(state: &AppState, user_id: i64) -> Result<Vec<DashboardEntry>, AppError> {
    let entries = sqlx::query_as::<_, DashboardEntry>(
        "SELECT q.id, q.created_at, q.grand_total, c.name AS customer
         FROM quotations q
         JOIN customers c ON c.id = q.customer_id
         WHERE q.user_id = $1
         ORDER BY q.id",
    )
    .bind(user_id)
    .fetch_all(&state.db_pool)
    .await?;
    Ok(entries)
}

/// Flattened view of a quotation with issuer and customer details, or `None`
/// when the quotation does not exist or is not owned by `user_id`.
pub async fn quotation_detail(
    state: &AppState,
    user_id: i64,
    id: i64,
) -> Result<Option<QuotationDetail>, AppError> {
    let detail = sqlx::query_as::<_, QuotationDetail>(
        "SELECT q.id, q.created_at, q.grand_total,
                u.business_name, u.address AS user_address, u.phone AS user_phone, u.email AS user_email,
                c.name AS customer_name, c.phone AS customer_phone, c.email AS customer_email,
                c.address AS customer_address
         FROM quotations q
         JOIN users u ON u.id = q.user_id
         JOIN customers c ON c.id = q.customer_id
         WHERE q.id = $1 AND q.user_id = $2",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(&state.db_pool)
    .await?;

    match detail {
        Some(mut detail) => {
            detail.quotation_items = list_items(state, detail.id).await?;
            Ok(Some(detail))
        }
        None => Ok(None),
    }
}
