//! Order placement and lifecycle transitions
//!
//! Every status write goes through [`transition`], which checks the edge
//! against the shared transition table and appends the history row in the
//! same database transaction.
//!
//! Transitions are validated against the status read at request time and
//! there is no row lock or version column. Two staff racing on one order can
//! both pass; the last write wins and both history rows remain.

use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    AssignStaffRequest, Order, OrderDetail, OrderType, PlaceOrderRequest, StaffRole,
};
use shared::order::{OrderStatus, authorize_transition, compute_totals, price_lines};

use crate::auth::CurrentUser;
use crate::db;
use crate::db::orders::NewOrder;
use crate::email::{self, templates};
use crate::error::ServiceResult;
use crate::services::staff::resolve_assignee;
use crate::state::AppState;
use crate::validation::{MAX_NOTE_LEN, validate_optional_text};

/// Place an order for the calling customer
pub async fn place_order(
    state: &AppState,
    customer: &CurrentUser,
    req: &PlaceOrderRequest,
) -> ServiceResult<OrderDetail> {
    validate_optional_text(&req.special_instructions, "special_instructions", MAX_NOTE_LEN)?;
    for line in &req.items {
        validate_optional_text(&line.notes, "notes", MAX_NOTE_LEN)?;
    }

    let cafe = db::cafes::find_by_id(&state.pool, req.cafe_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CafeNotFound))?;
    if !cafe.is_public() {
        return Err(AppError::new(ErrorCode::CafeNotPublic).into());
    }

    match (req.order_type, req.table_id) {
        (OrderType::DineIn, None) => {
            return Err(AppError::new(ErrorCode::TableRequiredForDineIn).into());
        }
        (_, Some(table_id)) => {
            db::tables::find(&state.pool, cafe.id, table_id)
                .await?
                .ok_or_else(|| {
                    AppError::new(ErrorCode::TableNotFound).with_detail("table_id", table_id)
                })?;
        }
        _ => {}
    }

    let ids: Vec<i64> = req.items.iter().map(|l| l.menu_item_id).collect();
    let menu = db::menu::find_items(&state.pool, &ids).await?;
    let lines = price_lines(cafe.id, &req.items, &menu)?;
    let totals = compute_totals(&lines, Decimal::ZERO, Decimal::ZERO)?;

    let mut tx = state.pool.begin().await?;
    let order = db::orders::insert_order(
        &mut *tx,
        &NewOrder {
            cafe_id: cafe.id,
            customer_id: customer.user_id,
            table_id: req.table_id,
            order_type: req.order_type,
            special_instructions: req.special_instructions.as_deref(),
            totals,
        },
    )
    .await?;
    for line in &lines {
        db::orders::insert_item(&mut *tx, order.id, line).await?;
    }
    db::orders::insert_history(
        &mut *tx,
        order.id,
        OrderStatus::Placed,
        Some(customer.user_id),
        Some("Order placed"),
    )
    .await?;
    db::payments::insert_pending(&mut *tx, order.id, order.grand_total).await?;
    tx.commit().await?;

    tracing::info!(
        order_id = order.id,
        order_ref = %order.order_ref,
        cafe_id = cafe.id,
        grand_total = %order.grand_total,
        "Order placed"
    );

    if let Ok(Some(user)) = db::users::find_by_id(&state.pool, customer.user_id).await {
        email::notify(
            state.email.clone(),
            user.email,
            templates::order_placed(&user.first_name, &order.order_ref, order.grand_total),
        );
    }

    let items = db::orders::list_items(&state.pool, order.id).await?;
    Ok(OrderDetail { order, items })
}

/// Move `order` to `to` on behalf of `actor`.
///
/// `chef_id` / `waiter_id` fill assignment columns that are still empty.
pub async fn transition(
    state: &AppState,
    actor: &CurrentUser,
    order: &Order,
    to: OrderStatus,
    notes: Option<&str>,
    chef_id: Option<i64>,
    waiter_id: Option<i64>,
) -> ServiceResult<Order> {
    authorize_transition(actor.role, order.status, to)?;

    let mut tx = state.pool.begin().await?;
    let updated = db::orders::update_status(&mut *tx, order.id, to, chef_id, waiter_id).await?;
    db::orders::insert_history(&mut *tx, order.id, to, Some(actor.user_id), notes).await?;
    tx.commit().await?;

    tracing::info!(
        order_id = order.id,
        from = %order.status,
        to = %to,
        actor = actor.user_id,
        "Order status changed"
    );
    Ok(updated)
}

/// Owner confirmation, optionally assigning staff in the same step
pub async fn confirm(
    state: &AppState,
    owner: &CurrentUser,
    order: &Order,
    req: &AssignStaffRequest,
) -> ServiceResult<Order> {
    validate_optional_text(&req.notes, "notes", MAX_NOTE_LEN)?;
    authorize_transition(owner.role, order.status, OrderStatus::Confirmed)?;

    let mut tx = state.pool.begin().await?;
    let chef =
        resolve_assignee(&mut *tx, order.cafe_id, StaffRole::Chef, req.chef_id, req.auto_assign)
            .await?;
    let waiter = resolve_assignee(
        &mut *tx,
        order.cafe_id,
        StaffRole::Waiter,
        req.waiter_id,
        req.auto_assign,
    )
    .await?;
    let mut updated =
        db::orders::update_status(&mut *tx, order.id, OrderStatus::Confirmed, None, None).await?;
    if chef.is_some() || waiter.is_some() {
        updated = db::orders::set_assignment(&mut *tx, order.id, chef, waiter).await?;
    }
    let notes = req.notes.as_deref().unwrap_or("Confirmed by owner");
    db::orders::insert_history(
        &mut *tx,
        order.id,
        OrderStatus::Confirmed,
        Some(owner.user_id),
        Some(notes),
    )
    .await?;
    tx.commit().await?;

    tracing::info!(order_id = order.id, chef = ?chef, waiter = ?waiter, "Order confirmed");
    Ok(updated)
}

/// Change assigned staff without touching the status
pub async fn reassign(
    state: &AppState,
    order: &Order,
    req: &AssignStaffRequest,
) -> ServiceResult<Order> {
    if order.status.is_terminal() {
        return Err(AppError::new(ErrorCode::OrderAlreadyTerminal)
            .with_detail("status", order.status.as_str())
            .into());
    }

    let mut tx = state.pool.begin().await?;
    let chef =
        resolve_assignee(&mut *tx, order.cafe_id, StaffRole::Chef, req.chef_id, req.auto_assign)
            .await?;
    let waiter = resolve_assignee(
        &mut *tx,
        order.cafe_id,
        StaffRole::Waiter,
        req.waiter_id,
        req.auto_assign,
    )
    .await?;
    let updated = db::orders::set_assignment(&mut *tx, order.id, chef, waiter).await?;
    tx.commit().await?;

    tracing::info!(order_id = order.id, chef = ?chef, waiter = ?waiter, "Order staff reassigned");
    Ok(updated)
}
