//! Staff assignments and the round-robin cursor

use shared::models::{StaffAssignment, StaffMember, StaffRole};
use shared::util::{now_millis, snowflake_id};
use sqlx::{PgConnection, PgPool};

pub async fn list_members(pool: &PgPool, cafe_id: i64) -> Result<Vec<StaffMember>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT
            sa.id AS assignment_id, sa.staff_id, u.first_name, u.last_name, u.email,
            sa.role, sa.assigned_at
        FROM staff_assignments sa
        JOIN users u ON u.id = sa.staff_id
        WHERE sa.cafe_id = $1 AND sa.is_active
        ORDER BY sa.role, u.first_name
        "#,
    )
    .bind(cafe_id)
    .fetch_all(pool)
    .await
}

/// The single active assignment of a staff user, if any
pub async fn find_active_for_staff(
    pool: &PgPool,
    staff_id: i64,
) -> Result<Option<StaffAssignment>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM staff_assignments WHERE staff_id = $1 AND is_active")
        .bind(staff_id)
        .fetch_optional(pool)
        .await
}

pub async fn find_active_in_cafe(
    pool: &PgPool,
    cafe_id: i64,
    staff_id: i64,
) -> Result<Option<StaffAssignment>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM staff_assignments WHERE cafe_id = $1 AND staff_id = $2 AND is_active",
    )
    .bind(cafe_id)
    .bind(staff_id)
    .fetch_optional(pool)
    .await
}

/// Active staff ids of one role, in stable assignment order
pub async fn active_ids(
    conn: &mut PgConnection,
    cafe_id: i64,
    role: StaffRole,
) -> Result<Vec<i64>, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT staff_id FROM staff_assignments
        WHERE cafe_id = $1 AND role = $2 AND is_active
        ORDER BY assigned_at, id
        "#,
    )
    .bind(cafe_id)
    .bind(role)
    .fetch_all(conn)
    .await
}

pub async fn insert(
    conn: &mut PgConnection,
    cafe_id: i64,
    staff_id: i64,
    role: StaffRole,
    assigned_by: i64,
) -> Result<StaffAssignment, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO staff_assignments (id, cafe_id, staff_id, role, is_active, assigned_by, assigned_at)
        VALUES ($1, $2, $3, $4, TRUE, $5, $6)
        RETURNING *
        "#,
    )
    .bind(snowflake_id())
    .bind(cafe_id)
    .bind(staff_id)
    .bind(role)
    .bind(assigned_by)
    .bind(now_millis())
    .fetch_one(conn)
    .await
}

/// Deactivate an assignment; returns the staff user id when one was active
pub async fn deactivate(
    pool: &PgPool,
    cafe_id: i64,
    assignment_id: i64,
) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        UPDATE staff_assignments SET is_active = FALSE
        WHERE id = $1 AND cafe_id = $2 AND is_active
        RETURNING staff_id
        "#,
    )
    .bind(assignment_id)
    .bind(cafe_id)
    .fetch_optional(pool)
    .await
}

/// Take the current round-robin slot and advance the cursor.
///
/// The upsert increments atomically, so concurrent callers get distinct
/// slots. The caller reduces the slot modulo the active staff count.
pub async fn take_rotation_slot(
    conn: &mut PgConnection,
    cafe_id: i64,
    role: StaffRole,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        INSERT INTO staff_rotation (cafe_id, role, next_slot)
        VALUES ($1, $2, 1)
        ON CONFLICT (cafe_id, role) DO UPDATE SET next_slot = staff_rotation.next_slot + 1
        RETURNING next_slot - 1
        "#,
    )
    .bind(cafe_id)
    .bind(role)
    .fetch_one(conn)
    .await
}

/// `(role, count)` of active assignments
pub async fn count_by_role(
    pool: &PgPool,
    cafe_id: i64,
) -> Result<Vec<(StaffRole, i64)>, sqlx::Error> {
    sqlx::query_as(
        "SELECT role, COUNT(*) FROM staff_assignments WHERE cafe_id = $1 AND is_active GROUP BY role",
    )
    .bind(cafe_id)
    .fetch_all(pool)
    .await
}
