use crate::{errors::AppError, structs::User, AppState};

/// Fields of a new account, already validated and normalised.
#[derive(Debug)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub pwd_hash: String,
    pub business_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub gstin: Option<String>,
}

pub async fn create_user(state: &AppState, new_user: NewUser) -> Result<User, AppError> {
    let created_at = chrono::Utc::now();
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (name, email, pwd_hash, business_name, phone, address, gstin, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
    )
    .bind(&new_user.name)
    .bind(&new_user.email)
    .bind(&new_user.pwd_hash)
    .bind(&new_user.business_name)
    .bind(&new_user.phone)
    .bind(&new_user.address)
    .bind(&new_user.gstin)
    .bind(created_at)
    .bind(created_at)
    .fetch_one(&state.db_pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("Email is already registered".to_owned())
        }
        other => AppError::DatabaseError(other),
    })?;
    log::info!("User created: id={} email={}", user.id, user.email);
    Ok(user)
}

pub async fn find_user_by_email(state: &AppState, email: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(&state.db_pool)
        .await?;
    Ok(user)
}

pub async fn find_user_by_id(state: &AppState, id: i64) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db_pool)
        .await?;
    Ok(user)
}
