//! Cafe Table Model

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(
    feature = "db",
    sqlx(type_name = "table_type", rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum TableType {
    Economy,
    #[default]
    Standard,
    Premium,
    Exclusive,
}

/// Manually tracked occupancy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(
    feature = "db",
    sqlx(type_name = "table_status", rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum TableStatus {
    #[default]
    Available,
    Booked,
    Occupied,
}

/// Cafe table entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CafeTable {
    pub id: i64,
    pub cafe_id: i64,
    pub table_number: i32,
    pub table_type: TableType,
    pub capacity: i32,
    pub display_label: Option<String>,
    pub description: Option<String>,
    pub status: TableStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CafeTableCreate {
    pub table_number: i32,
    pub capacity: i32,
    pub table_type: Option<TableType>,
    pub display_label: Option<String>,
    pub description: Option<String>,
    pub status: Option<TableStatus>,
}

/// Update table payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CafeTableUpdate {
    pub table_number: Option<i32>,
    pub capacity: Option<i32>,
    pub table_type: Option<TableType>,
    pub display_label: Option<String>,
    pub description: Option<String>,
    pub status: Option<TableStatus>,
}
