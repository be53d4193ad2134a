// ABOUTME: Shopping list aggregation over a user's cart and plain-text rendering
// ABOUTME: Amounts are summed per (ingredient name, unit) and ordered by name then unit
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use std::fmt::Write;

use tracing::info;

use crate::constants::messages::CART_IS_EMPTY;
use crate::constants::shopping_list::{HEADER, SEPARATOR};
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::ShoppingListItem;

/// Render aggregated items as the downloadable document
///
/// One line per item between the header and the separator. The items are rendered in the
/// order given.
#[must_use]
pub fn render(items: &[ShoppingListItem]) -> String {
    let mut document = String::with_capacity(HEADER.len() + SEPARATOR.len() + items.len() * 32);
    document.push_str(HEADER);
    document.push('\n');

    for item in items {
        // Writing to a String cannot fail
        let _ = writeln!(
            document,
            "- {} ({}) \u{2014} {}",
            item.name, item.measurement_unit, item.amount
        );
    }

    document.push_str(SEPARATOR);
    document.push('\n');
    document
}

/// Build the shopping list document for a user
///
/// The cart is left as it is.
///
/// # Errors
///
/// Returns `EmptyResult` when the cart is empty or none of its recipes has ingredients
pub async fn build_shopping_list(db: &Database, user_id: i64) -> AppResult<String> {
    let items = db.recipe_ingredients().cart_totals(user_id).await?;
    if items.is_empty() {
        return Err(AppError::empty_result(CART_IS_EMPTY));
    }

    info!(user.id = user_id, lines = items.len(), "Shopping list built");
    Ok(render(&items))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, unit: &str, amount: i64) -> ShoppingListItem {
        ShoppingListItem {
            name: name.to_owned(),
            measurement_unit: unit.to_owned(),
            amount,
        }
    }

    #[test]
    fn test_render_layout() {
        let document = render(&[item("flour", "g", 500), item("sugar", "g", 100)]);
        let lines: Vec<&str> = document.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], HEADER);
        assert_eq!(lines[1], "- flour (g) \u{2014} 500");
        assert_eq!(lines[2], "- sugar (g) \u{2014} 100");
        assert_eq!(lines[3], SEPARATOR);
    }

    #[test]
    fn test_render_is_deterministic() {
        let items = [item("eggs", "pcs", 3), item("milk", "ml", 250)];
        assert_eq!(render(&items), render(&items));
    }
}
