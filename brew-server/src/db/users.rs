//! User accounts and registration entries

use shared::models::{
    Address, AddressInput, GovernmentProof, GovernmentProofInput, Role, User, UserProfileUpdate,
    WorkExperience, WorkExperienceInput,
};
use shared::util::{now_millis, snowflake_id};
use sqlx::{PgConnection, PgPool};

/// Fields for a new user row
pub struct NewUser<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password_hash: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub gender: Option<&'a str>,
    pub street_address: Option<&'a str>,
    pub city: Option<&'a str>,
    pub postal_code: Option<&'a str>,
    pub role: Role,
    pub is_active: bool,
    pub is_email_verified: bool,
}

pub async fn insert(conn: &mut PgConnection, user: &NewUser<'_>) -> Result<User, sqlx::Error> {
    let now = now_millis();
    sqlx::query_as(
        r#"
        INSERT INTO users (
            id, first_name, last_name, email, password_hash, phone, gender,
            street_address, city, postal_code, role, is_active, is_email_verified,
            created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $14)
        RETURNING *
        "#,
    )
    .bind(snowflake_id())
    .bind(user.first_name)
    .bind(user.last_name)
    .bind(user.email)
    .bind(user.password_hash)
    .bind(user.phone)
    .bind(user.gender)
    .bind(user.street_address)
    .bind(user.city)
    .bind(user.postal_code)
    .bind(user.role)
    .bind(user.is_active)
    .bind(user.is_email_verified)
    .bind(now)
    .fetch_one(conn)
    .await
}

pub async fn insert_address(
    conn: &mut PgConnection,
    user_id: i64,
    a: &AddressInput,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO addresses (id, user_id, street, city, postal_code) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(snowflake_id())
    .bind(user_id)
    .bind(&a.street)
    .bind(&a.city)
    .bind(&a.postal_code)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn insert_work_experience(
    conn: &mut PgConnection,
    user_id: i64,
    w: &WorkExperienceInput,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO work_experiences (id, user_id, company_name, position, years) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(snowflake_id())
    .bind(user_id)
    .bind(&w.company_name)
    .bind(&w.position)
    .bind(w.years.unwrap_or(0).max(0))
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn insert_government_proof(
    conn: &mut PgConnection,
    user_id: i64,
    g: &GovernmentProofInput,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO government_proofs (id, user_id, proof_type, proof_number) VALUES ($1, $2, $3, $4)",
    )
    .bind(snowflake_id())
    .bind(user_id)
    .bind(&g.proof_type)
    .bind(&g.proof_number)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
        .bind(email)
        .fetch_one(pool)
        .await
}

pub async fn list(pool: &PgPool, role: Option<Role>) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM users WHERE ($1::user_role IS NULL OR role = $1) ORDER BY created_at DESC",
    )
    .bind(role)
    .fetch_all(pool)
    .await
}

/// Inactive accounts that were never given a password
pub async fn list_pending(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM users WHERE NOT is_active AND password_hash IS NULL ORDER BY created_at",
    )
    .fetch_all(pool)
    .await
}

pub async fn list_addresses(pool: &PgPool, user_id: i64) -> Result<Vec<Address>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM addresses WHERE user_id = $1")
        .bind(user_id)
        .fetch_all(pool)
        .await
}

pub async fn list_work_experiences(
    pool: &PgPool,
    user_id: i64,
) -> Result<Vec<WorkExperience>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM work_experiences WHERE user_id = $1")
        .bind(user_id)
        .fetch_all(pool)
        .await
}

pub async fn list_government_proofs(
    pool: &PgPool,
    user_id: i64,
) -> Result<Vec<GovernmentProof>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM government_proofs WHERE user_id = $1")
        .bind(user_id)
        .fetch_all(pool)
        .await
}

pub async fn record_login(pool: &PgPool, id: i64, ip: Option<&str>) -> Result<(), sqlx::Error> {
    let now = now_millis();
    sqlx::query(
        "UPDATE users SET login_count = login_count + 1, last_login_at = $1, last_login_ip = $2, updated_at = $1 WHERE id = $3",
    )
    .bind(now)
    .bind(ip)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn mark_email_verified(pool: &PgPool, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET is_email_verified = TRUE, updated_at = $1 WHERE id = $2")
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn update_password(pool: &PgPool, id: i64, hash: &str) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET password_hash = $1, updated_at = $2 WHERE id = $3")
        .bind(hash)
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Activate, optionally setting a first password
pub async fn activate(
    pool: &PgPool,
    id: i64,
    password_hash: Option<&str>,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE users SET
            is_active = TRUE,
            password_hash = COALESCE($1, password_hash),
            updated_at = $2
        WHERE id = $3
        RETURNING *
        "#,
    )
    .bind(password_hash)
    .bind(now_millis())
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn deactivate(pool: &PgPool, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("UPDATE users SET is_active = FALSE, updated_at = $1 WHERE id = $2 RETURNING *")
        .bind(now_millis())
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Reactivate an existing staff user with a fresh password
pub async fn reactivate_with_password(
    conn: &mut PgConnection,
    id: i64,
    password_hash: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE users SET is_active = TRUE, password_hash = $1, updated_at = $2 WHERE id = $3",
    )
    .bind(password_hash)
    .bind(now_millis())
    .bind(id)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn update_profile(
    pool: &PgPool,
    id: i64,
    data: &UserProfileUpdate,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE users SET
            phone = COALESCE($1, phone),
            street_address = COALESCE($2, street_address),
            city = COALESCE($3, city),
            postal_code = COALESCE($4, postal_code),
            updated_at = $5
        WHERE id = $6
        RETURNING *
        "#,
    )
    .bind(&data.phone)
    .bind(&data.street_address)
    .bind(&data.city)
    .bind(&data.postal_code)
    .bind(now_millis())
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Hard delete; profile entries cascade. Only pending non-admin rows match.
pub async fn delete_pending(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "DELETE FROM users \
         WHERE id = $1 AND NOT is_active AND password_hash IS NULL AND role <> 'ADMIN'",
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn admin_exists(pool: &PgPool) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE role = 'ADMIN')")
        .fetch_one(pool)
        .await
}
