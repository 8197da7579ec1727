//! Order Models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::order::OrderStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(
    feature = "db",
    sqlx(type_name = "order_type", rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum OrderType {
    DineIn,
    Takeaway,
    Delivery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(
    feature = "db",
    sqlx(type_name = "payment_status", rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

/// Order header
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub order_ref: String,
    pub cafe_id: i64,
    pub customer_id: i64,
    pub table_id: Option<i64>,
    pub order_type: OrderType,
    pub status: OrderStatus,
    pub special_instructions: Option<String>,
    pub total_amount: Decimal,
    pub tax_amount: Decimal,
    pub discount_amount: Decimal,
    pub grand_total: Decimal,
    pub payment_status: PaymentStatus,
    pub assigned_chef_id: Option<i64>,
    pub assigned_waiter_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Order line with the price captured at placement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub menu_item_id: i64,
    pub item_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub sub_total: Decimal,
    pub notes: Option<String>,
}

/// Append-only audit row, one per status change
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderStatusHistory {
    pub id: i64,
    pub order_id: i64,
    pub status: OrderStatus,
    pub changed_by: Option<i64>,
    pub changed_at: i64,
    pub notes: Option<String>,
}

/// Order with its lines
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineInput {
    pub menu_item_id: i64,
    pub quantity: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceOrderRequest {
    pub cafe_id: i64,
    pub order_type: OrderType,
    pub table_id: Option<i64>,
    pub special_instructions: Option<String>,
    pub items: Vec<OrderLineInput>,
}

/// Body for generic and named status endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusChangeRequest {
    pub status: Option<OrderStatus>,
    pub notes: Option<String>,
}

/// Staff selection for confirm/assign. `auto_assign` fills any slot left
/// empty using the café's round-robin rotation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignStaffRequest {
    pub chef_id: Option<i64>,
    pub waiter_id: Option<i64>,
    #[serde(default)]
    pub auto_assign: bool,
    pub notes: Option<String>,
}
