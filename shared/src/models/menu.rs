//! Menu Category & Item Models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(
    feature = "db",
    sqlx(type_name = "menu_item_type", rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum MenuItemType {
    #[default]
    Veg,
    NonVeg,
    Egg,
}

/// Menu category, listed by `display_order` ascending
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MenuCategory {
    pub id: i64,
    pub cafe_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuCategoryCreate {
    pub name: String,
    pub description: Option<String>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuCategoryUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}

/// Menu item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MenuItem {
    pub id: i64,
    pub cafe_id: i64,
    pub category_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub item_type: MenuItemType,
    pub image_url: Option<String>,
    pub is_available: bool,
    pub is_addon: bool,
    pub avg_rating: Decimal,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreate {
    pub category_id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Required; kept optional here so a missing price reports a field error
    pub price: Option<Decimal>,
    pub item_type: Option<MenuItemType>,
    pub image_url: Option<String>,
    pub is_available: Option<bool>,
    pub is_addon: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuItemUpdate {
    pub category_id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub item_type: Option<MenuItemType>,
    pub image_url: Option<String>,
    pub is_available: Option<bool>,
    pub is_addon: Option<bool>,
}
