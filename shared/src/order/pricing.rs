//! Order pricing using rust_decimal
//!
//! Unit prices are copied from the menu at placement and never re-read, so
//! later menu edits leave existing orders untouched.

use rust_decimal::prelude::*;
use std::collections::HashMap;
use thiserror::Error;

use crate::error::{AppError, ErrorCode};
use crate::models::{MenuItem, OrderLineInput};

/// Monetary values are kept at 2 decimal places, half away from zero
const DECIMAL_PLACES: u32 = 2;
/// Maximum quantity on a single line
pub const MAX_QUANTITY: i32 = 999;
/// Maximum number of lines on one order
pub const MAX_LINES: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error("order has no items")]
    Empty,

    #[error("order has too many lines ({0}, max {MAX_LINES})")]
    TooManyLines(usize),

    #[error("quantity must be between 1 and {MAX_QUANTITY}, got {0}")]
    InvalidQuantity(i32),

    #[error("menu item {0} is not available at this cafe")]
    ItemUnavailable(i64),

    #[error("{field} must not be negative")]
    NegativeAmount { field: &'static str },
}

impl From<PricingError> for AppError {
    fn from(err: PricingError) -> Self {
        let code = match &err {
            PricingError::Empty => ErrorCode::OrderEmpty,
            PricingError::ItemUnavailable(_) => ErrorCode::MenuItemUnavailable,
            PricingError::InvalidQuantity(_) | PricingError::TooManyLines(_) => {
                ErrorCode::ValueOutOfRange
            }
            PricingError::NegativeAmount { .. } => ErrorCode::InvalidPrice,
        };
        let app = AppError::with_message(code, err.to_string());
        match err {
            PricingError::ItemUnavailable(id) => app.with_detail("menu_item_id", id),
            _ => app,
        }
    }
}

#[inline]
fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// One priced order line
#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub menu_item_id: i64,
    pub item_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub sub_total: Decimal,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    pub total_amount: Decimal,
    pub tax_amount: Decimal,
    pub discount_amount: Decimal,
    pub grand_total: Decimal,
}

/// `unit_price × quantity`, rounded to cents
pub fn line_subtotal(unit_price: Decimal, quantity: i32) -> Result<Decimal, PricingError> {
    if !(1..=MAX_QUANTITY).contains(&quantity) {
        return Err(PricingError::InvalidQuantity(quantity));
    }
    if unit_price.is_sign_negative() && !unit_price.is_zero() {
        return Err(PricingError::NegativeAmount { field: "unit_price" });
    }
    Ok(round_money(unit_price * Decimal::from(quantity)))
}

/// Price the requested lines against the café's menu snapshot.
///
/// Every line must reference an available item of `cafe_id`.
pub fn price_lines(
    cafe_id: i64,
    lines: &[OrderLineInput],
    menu: &[MenuItem],
) -> Result<Vec<PricedLine>, PricingError> {
    if lines.is_empty() {
        return Err(PricingError::Empty);
    }
    if lines.len() > MAX_LINES {
        return Err(PricingError::TooManyLines(lines.len()));
    }

    let by_id: HashMap<i64, &MenuItem> = menu.iter().map(|m| (m.id, m)).collect();

    lines
        .iter()
        .map(|line| {
            let item = by_id
                .get(&line.menu_item_id)
                .filter(|m| m.cafe_id == cafe_id && m.is_available)
                .ok_or(PricingError::ItemUnavailable(line.menu_item_id))?;
            let sub_total = line_subtotal(item.price, line.quantity)?;
            Ok(PricedLine {
                menu_item_id: item.id,
                item_name: item.name.clone(),
                quantity: line.quantity,
                unit_price: item.price,
                sub_total,
                notes: line.notes.clone(),
            })
        })
        .collect()
}

/// `total = Σ sub_total`, `grand = total + tax − discount`
pub fn compute_totals(
    lines: &[PricedLine],
    tax: Decimal,
    discount: Decimal,
) -> Result<OrderTotals, PricingError> {
    if tax.is_sign_negative() && !tax.is_zero() {
        return Err(PricingError::NegativeAmount { field: "tax_amount" });
    }
    if discount.is_sign_negative() && !discount.is_zero() {
        return Err(PricingError::NegativeAmount {
            field: "discount_amount",
        });
    }

    let total_amount = round_money(lines.iter().map(|l| l.sub_total).sum());
    let tax_amount = round_money(tax);
    let discount_amount = round_money(discount);
    Ok(OrderTotals {
        total_amount,
        tax_amount,
        discount_amount,
        grand_total: total_amount + tax_amount - discount_amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MenuItemType;

    fn item(id: i64, cafe_id: i64, price: &str) -> MenuItem {
        MenuItem {
            id,
            cafe_id,
            category_id: 1,
            name: format!("item-{id}"),
            description: None,
            price: Decimal::from_str(price).unwrap(),
            item_type: MenuItemType::Veg,
            image_url: None,
            is_available: true,
            is_addon: false,
            avg_rating: Decimal::ZERO,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn line(menu_item_id: i64, quantity: i32) -> OrderLineInput {
        OrderLineInput {
            menu_item_id,
            quantity,
            notes: None,
        }
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_two_lines_total_eleven_fifty() {
        let menu = vec![item(1, 9, "3.50"), item(2, 9, "4.50")];
        let priced = price_lines(9, &[line(1, 2), line(2, 1)], &menu).unwrap();
        assert_eq!(priced[0].sub_total, dec("7.00"));
        assert_eq!(priced[1].sub_total, dec("4.50"));

        let totals = compute_totals(&priced, Decimal::ZERO, Decimal::ZERO).unwrap();
        assert_eq!(totals.total_amount, dec("11.50"));
        assert_eq!(totals.grand_total, dec("11.50"));
    }

    #[test]
    fn test_grand_total_adds_tax_and_subtracts_discount() {
        let menu = vec![item(1, 9, "10.00")];
        let priced = price_lines(9, &[line(1, 3)], &menu).unwrap();
        let totals = compute_totals(&priced, dec("1.50"), dec("2.25")).unwrap();
        assert_eq!(totals.total_amount, dec("30.00"));
        assert_eq!(
            totals.grand_total,
            totals.total_amount + totals.tax_amount - totals.discount_amount
        );
        assert_eq!(totals.grand_total, dec("29.25"));
    }

    #[test]
    fn test_price_snapshot_is_independent_of_later_edits() {
        let mut menu = vec![item(1, 9, "3.50")];
        let priced = price_lines(9, &[line(1, 2)], &menu).unwrap();
        menu[0].price = dec("9.99");
        assert_eq!(priced[0].unit_price, dec("3.50"));
        assert_eq!(priced[0].sub_total, dec("7.00"));
    }

    #[test]
    fn test_rejects_foreign_or_unavailable_items() {
        let mut menu = vec![item(1, 9, "3.50"), item(2, 8, "1.00")];
        assert_eq!(
            price_lines(9, &[line(2, 1)], &menu),
            Err(PricingError::ItemUnavailable(2))
        );
        assert_eq!(
            price_lines(9, &[line(77, 1)], &menu),
            Err(PricingError::ItemUnavailable(77))
        );
        menu[0].is_available = false;
        assert_eq!(
            price_lines(9, &[line(1, 1)], &menu),
            Err(PricingError::ItemUnavailable(1))
        );
    }

    #[test]
    fn test_rejects_bad_quantities_and_empty_orders() {
        let menu = vec![item(1, 9, "3.50")];
        assert_eq!(price_lines(9, &[], &menu), Err(PricingError::Empty));
        assert_eq!(
            price_lines(9, &[line(1, 0)], &menu),
            Err(PricingError::InvalidQuantity(0))
        );
        assert_eq!(
            price_lines(9, &[line(1, MAX_QUANTITY + 1)], &menu),
            Err(PricingError::InvalidQuantity(MAX_QUANTITY + 1))
        );
    }

    #[test]
    fn test_line_subtotal_rounds_half_away_from_zero() {
        assert_eq!(line_subtotal(dec("0.125"), 1).unwrap(), dec("0.13"));
        assert_eq!(line_subtotal(dec("0.333"), 3).unwrap(), dec("1.00"));
    }

    #[test]
    fn test_negative_adjustments_rejected() {
        assert!(compute_totals(&[], dec("-1"), Decimal::ZERO).is_err());
        assert!(compute_totals(&[], Decimal::ZERO, dec("-0.01")).is_err());
    }

    #[test]
    fn test_error_codes() {
        let app: AppError = PricingError::Empty.into();
        assert_eq!(app.code, ErrorCode::OrderEmpty);
        let app: AppError = PricingError::ItemUnavailable(5).into();
        assert_eq!(app.code, ErrorCode::MenuItemUnavailable);
    }
}
