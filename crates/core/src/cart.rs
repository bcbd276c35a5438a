//! Shopping cart state and operations.
//!
//! The cart is a plain value owned by the visitor's session: an ordered
//! list of lines keyed by product *name*. Two catalog products sharing a
//! name land on the same line. Every mutation is synchronous; the caller
//! re-renders the cart panel and badge afterwards.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{ImageData, Price};

/// Lower bound for a quantity picked on the storefront.
pub const QTY_MIN: u32 = 1;
/// Upper bound for a quantity picked on the storefront.
pub const QTY_MAX: u32 = 99;

/// Clamp a requested quantity into the stepper bounds `[1, 99]`.
///
/// Clamping is silent; there is no wraparound at either end.
#[must_use]
pub fn clamp_quantity(qty: u32) -> u32 {
    qty.clamp(QTY_MIN, QTY_MAX)
}

/// One cart line: a product name with its unit price, thumbnail and count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub name: String,
    pub price: Price,
    /// First image of the product at the time it was added.
    pub image: Option<ImageData>,
    pub quantity: u32,
}

impl CartLine {
    /// Line subtotal: unit price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.price.amount() * Decimal::from(self.quantity)
    }
}

/// The visitor's cart. Process-local, single writer, never persisted
/// beyond the session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// The cart lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// True when the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of items across all lines (the badge count).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Grand total: sum of `price * quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Add `quantity` units of a product. If a line with the same name
    /// already exists its quantity accumulates; otherwise a new line is
    /// appended.
    pub fn add_with_quantity(
        &mut self,
        name: &str,
        price: Price,
        image: Option<ImageData>,
        quantity: u32,
    ) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.name == name) {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            self.lines.push(CartLine {
                name: name.to_owned(),
                price,
                image,
                quantity,
            });
        }
    }

    /// Add `delta` to the quantity of line `index`. A resulting quantity
    /// of zero or less removes the line entirely. Out-of-range indices
    /// are ignored.
    pub fn change_quantity(&mut self, index: usize, delta: i32) {
        let Some(line) = self.lines.get_mut(index) else {
            return;
        };
        let new_qty = i64::from(line.quantity) + i64::from(delta);
        if new_qty <= 0 {
            self.lines.remove(index);
        } else {
            line.quantity = u32::try_from(new_qty).unwrap_or(u32::MAX);
        }
    }

    /// Delete line `index`. The caller is responsible for the yes/no
    /// confirmation gate before invoking this. Out-of-range indices are
    /// ignored.
    pub fn remove_line(&mut self, index: usize) {
        if index < self.lines.len() {
            self.lines.remove(index);
        }
    }

    /// Remove the first line matching `name`, if any.
    pub fn remove_by_name(&mut self, name: &str) {
        if let Some(index) = self.lines.iter().position(|l| l.name == name) {
            self.lines.remove(index);
        }
    }

    /// Remove every line matching `name`.
    pub fn remove_all_by_name(&mut self, name: &str) {
        self.lines.retain(|l| l.name != name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(s: &str) -> Price {
        Price::parse(s).expect("valid price")
    }

    #[test]
    fn adding_same_name_accumulates_instead_of_duplicating() {
        let mut cart = Cart::new();
        cart.add_with_quantity("Touca de lã", price("25.00"), None, 2);
        cart.add_with_quantity("Touca de lã", price("25.00"), None, 3);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 5);
        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn total_is_sum_of_price_times_quantity() {
        let mut cart = Cart::new();
        cart.add_with_quantity("Touca", price("10.00"), None, 2);
        cart.add_with_quantity("Manta", price("49.90"), None, 1);

        assert_eq!(cart.total(), Decimal::new(6990, 2));
    }

    #[test]
    fn change_quantity_removes_line_iff_result_drops_to_zero() {
        let mut cart = Cart::new();
        cart.add_with_quantity("Touca", price("10.00"), None, 2);

        cart.change_quantity(0, -1);
        assert_eq!(cart.lines()[0].quantity, 1);

        cart.change_quantity(0, -1);
        assert!(cart.is_empty());
    }

    #[test]
    fn change_quantity_ignores_out_of_range_index() {
        let mut cart = Cart::new();
        cart.add_with_quantity("Touca", price("10.00"), None, 1);
        cart.change_quantity(5, -1);
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn remove_line_and_remove_by_name() {
        let mut cart = Cart::new();
        cart.add_with_quantity("Touca", price("10.00"), None, 1);
        cart.add_with_quantity("Manta", price("20.00"), None, 1);

        cart.remove_line(0);
        assert_eq!(cart.lines()[0].name, "Manta");

        cart.remove_by_name("Manta");
        assert!(cart.is_empty());
    }

    #[test]
    fn remove_all_by_name_clears_every_match() {
        let mut cart = Cart::new();
        cart.add_with_quantity("Touca", price("10.00"), None, 1);
        cart.add_with_quantity("Manta", price("20.00"), None, 1);
        cart.remove_all_by_name("Touca");

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].name, "Manta");
    }

    #[test]
    fn quantity_clamp_never_leaves_bounds() {
        assert_eq!(clamp_quantity(0), 1);
        assert_eq!(clamp_quantity(1), 1);
        assert_eq!(clamp_quantity(50), 50);
        assert_eq!(clamp_quantity(99), 99);
        assert_eq!(clamp_quantity(100), 99);
        assert_eq!(clamp_quantity(u32::MAX), 99);
    }
}
