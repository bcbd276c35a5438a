//! WhatsApp checkout hand-off.
//!
//! Checkout does not touch a payment provider: the cart is rendered into
//! a pre-filled WhatsApp message and the visitor finishes the order in
//! chat. Nothing is awaited or parsed back from the messaging service.

use maos_de_fada_core::cart::Cart;

/// Render the order summary message for a non-empty cart.
///
/// One block per line: quantity, name, unit price, subtotal; grand total
/// at the end. The wording matches what the shop's customers already
/// receive, including WhatsApp `*bold*` markers.
#[must_use]
pub fn order_message(cart: &Cart) -> String {
    let mut message = String::from("🛍️ *Olá! Gostaria de fazer o seguinte pedido:*\n\n");

    for line in cart.lines() {
        message.push_str(&format!(
            "• {}x {}\n  💰 R$ {:.2} cada\n  Subtotal: R$ {:.2}\n\n",
            line.quantity,
            line.name,
            line.price.amount(),
            line.subtotal(),
        ));
    }

    message.push_str(&format!("*Total: R$ {:.2}*", cart.total()));
    message
}

/// Build the `wa.me` URL carrying the order summary for `number`.
#[must_use]
pub fn checkout_url(number: &str, cart: &Cart) -> String {
    format!(
        "https://wa.me/{number}?text={}",
        urlencoding::encode(&order_message(cart))
    )
}

#[cfg(test)]
mod tests {
    use maos_de_fada_core::Price;

    use super::*;

    fn cart_with(name: &str, price: &str, qty: u32) -> Cart {
        let mut cart = Cart::new();
        cart.add_with_quantity(name, Price::parse(price).expect("valid price"), None, qty);
        cart
    }

    #[test]
    fn message_lists_quantity_unit_price_subtotal_and_total() {
        let cart = cart_with("Touca de lã", "10.00", 2);
        let message = order_message(&cart);

        assert!(message.contains("• 2x Touca de lã"));
        assert!(message.contains("R$ 10.00 cada"));
        assert!(message.contains("Subtotal: R$ 20.00"));
        assert!(message.ends_with("*Total: R$ 20.00*"));
    }

    #[test]
    fn message_totals_across_lines() {
        let mut cart = cart_with("Touca", "10.00", 1);
        cart.add_with_quantity(
            "Manta",
            Price::parse("49.90").expect("valid price"),
            None,
            2,
        );

        let message = order_message(&cart);
        assert!(message.contains("Subtotal: R$ 99.80"));
        assert!(message.ends_with("*Total: R$ 109.80*"));
    }

    #[test]
    fn url_targets_the_configured_number_with_encoded_text() {
        let cart = cart_with("Touca", "10.00", 1);
        let url = checkout_url("5586995630268", &cart);

        assert!(url.starts_with("https://wa.me/5586995630268?text="));
        // The raw message must be URL-encoded
        assert!(!url.contains(' '));
        assert!(url.contains("Total"));
    }
}
