//! Staff onboarding and order assignment

use shared::error::{AppError, ErrorCode};
use shared::models::{AddStaffRequest, Cafe, StaffMember, StaffRole};
use sqlx::PgConnection;

use crate::auth::CurrentUser;
use crate::db;
use crate::db::users::NewUser;
use crate::email::{self, templates};
use crate::error::{ServiceResult, internal};
use crate::state::AppState;
use crate::util::{generate_password, hash_password, normalize_email};
use crate::validation::{MAX_NAME_LEN, validate_email, validate_required_text};

/// Pick the staff member for `slot` from a stable id list
pub fn pick_round_robin(ids: &[i64], slot: i64) -> Option<i64> {
    if ids.is_empty() {
        return None;
    }
    let idx = slot.rem_euclid(ids.len() as i64) as usize;
    ids.get(idx).copied()
}

/// Resolve who should hold `role` on an order.
///
/// An explicit id must be active staff of the café in that role. Without
/// one, `auto` takes the next slot of the café's rotation; `None` means
/// leave the slot as it is.
pub async fn resolve_assignee(
    conn: &mut PgConnection,
    cafe_id: i64,
    role: StaffRole,
    explicit: Option<i64>,
    auto: bool,
) -> ServiceResult<Option<i64>> {
    if explicit.is_none() && !auto {
        return Ok(None);
    }
    let ids = db::staff::active_ids(&mut *conn, cafe_id, role).await?;

    if let Some(id) = explicit {
        if !ids.contains(&id) {
            return Err(AppError::with_message(
                ErrorCode::StaffRoleMismatch,
                format!("User {id} is not an active {} of this cafe", role.as_role()),
            )
            .into());
        }
        return Ok(Some(id));
    }

    if ids.is_empty() {
        tracing::debug!(cafe_id, role = ?role, "No active staff for auto-assign");
        return Ok(None);
    }
    let slot = db::staff::take_rotation_slot(&mut *conn, cafe_id, role).await?;
    Ok(pick_round_robin(&ids, slot))
}

/// Create (or re-assign) a staff account and bind it to `cafe`
pub async fn add_staff(
    state: &AppState,
    owner: &CurrentUser,
    cafe: &Cafe,
    req: &AddStaffRequest,
) -> ServiceResult<StaffMember> {
    validate_required_text(&req.first_name, "first_name", MAX_NAME_LEN)?;
    validate_required_text(&req.last_name, "last_name", MAX_NAME_LEN)?;
    let email_addr = normalize_email(&req.email);
    validate_email(&email_addr)?;

    let existing = db::users::find_by_email(&state.pool, &email_addr).await?;
    if let Some(user) = &existing {
        if !user.role.is_staff() {
            return Err(AppError::new(ErrorCode::EmailAlreadyRegistered)
                .with_detail("email", email_addr.clone())
                .into());
        }
        if user.role != req.role.as_role() {
            return Err(AppError::with_message(
                ErrorCode::StaffRoleMismatch,
                format!("{} is registered as {}", email_addr, user.role),
            )
            .into());
        }
        if db::staff::find_active_for_staff(&state.pool, user.id).await?.is_some() {
            return Err(AppError::new(ErrorCode::StaffAlreadyAssigned).into());
        }
    }

    let password = generate_password(&mut rand::thread_rng());
    let hash = hash_password(&password).map_err(internal)?;

    let mut tx = state.pool.begin().await?;
    let user = match existing {
        Some(user) => {
            db::users::reactivate_with_password(&mut *tx, user.id, &hash).await?;
            user
        }
        None => {
            let new_user = NewUser {
                first_name: req.first_name.trim(),
                last_name: req.last_name.trim(),
                email: &email_addr,
                password_hash: Some(&hash),
                phone: None,
                gender: None,
                street_address: None,
                city: None,
                postal_code: None,
                role: req.role.as_role(),
                is_active: true,
                is_email_verified: true,
            };
            db::users::insert(&mut *tx, &new_user).await?
        }
    };
    let assignment = db::staff::insert(&mut *tx, cafe.id, user.id, req.role, owner.user_id).await?;
    tx.commit().await?;

    tracing::info!(cafe_id = cafe.id, staff_id = user.id, role = ?req.role, "Staff assigned");

    email::notify(
        state.email.clone(),
        user.email.clone(),
        templates::staff_welcome(&user.first_name, &user.email, &password, &cafe.name),
    );

    Ok(StaffMember {
        assignment_id: assignment.id,
        staff_id: user.id,
        first_name: user.first_name,
        last_name: user.last_name,
        email: user.email,
        role: assignment.role,
        assigned_at: assignment.assigned_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_robin_cycles() {
        let ids = [11, 22, 33];
        let picked: Vec<i64> = (0..7).filter_map(|s| pick_round_robin(&ids, s)).collect();
        assert_eq!(picked, vec![11, 22, 33, 11, 22, 33, 11]);
    }

    #[test]
    fn test_round_robin_empty() {
        assert_eq!(pick_round_robin(&[], 4), None);
    }

    #[test]
    fn test_round_robin_survives_shrinking_staff() {
        // Cursor stays past the list length after someone leaves
        assert_eq!(pick_round_robin(&[11, 22], 5), Some(22));
    }
}
