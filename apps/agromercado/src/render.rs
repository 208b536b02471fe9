//! Terminal rendering of marketplace records.
//!
//! Every function returns text; printing is left to the commands. Colors
//! are the badge colors of the domain, emitted as 24-bit ANSI escapes only
//! when `color` is set.

use crate::error::AppError;
use agromercado_core::{
    Cart, FarmerStats, Order, PasswordCriteria, PasswordStrengthResult, Product, Role,
    order::OrderStatus,
};
use serde::Serialize;

const BAR_WIDTH: usize = 10;

/// Wrap `text` in the foreground color `hex` (`#RRGGBB`).
pub fn paint(text: &str, hex: &str, color: bool) -> String {
    match (color, hex_to_rgb(hex)) {
        (true, Some((r, g, b))) => format!("\x1b[38;2;{r};{g};{b}m{text}\x1b[0m"),
        _ => text.to_string(),
    }
}

fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

pub fn money(amount: f64) -> String {
    format!("${amount:.2}")
}

// =============================================================================
// PASSWORD
// =============================================================================

/// Progress bar proportional to the strength, e.g. `[████████░░]  80% Fuerte`.
pub fn strength_meter(result: &PasswordStrengthResult, color: bool) -> String {
    let filled = usize::from(result.bar_percent()) * BAR_WIDTH / 100;
    let bar = format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled));
    format!(
        "[{}] {:>3}% {}",
        paint(&bar, &result.color, color),
        result.bar_percent(),
        paint(&result.message, &result.color, color)
    )
}

/// One row per criterion, met or not.
pub fn checklist(criteria: &PasswordCriteria) -> Vec<String> {
    criteria
        .checklist()
        .iter()
        .map(|(criterion, met)| format!("{} {}", if *met { "✓" } else { "✗" }, criterion.label()))
        .collect()
}

// =============================================================================
// CATALOG & CART
// =============================================================================

pub fn product_line(product: &Product) -> String {
    let stock = if product.is_available() {
        format!("{} {}", product.stock, product.unit.as_str())
    } else {
        "agotado".to_string()
    };
    format!(
        "{}  {}  {}/{}  [{}]  {}",
        product.id,
        product.name,
        money(product.price),
        product.unit.as_str(),
        product.category.display_name(),
        stock
    )
}

pub fn cart_lines(cart: &Cart) -> Vec<String> {
    let mut lines: Vec<String> = cart
        .items
        .iter()
        .map(|item| {
            format!(
                "{}  {} x{}  {}",
                item.id,
                item.display_name(),
                item.quantity,
                money(item.subtotal())
            )
        })
        .collect();
    lines.push(format!("Total: {}", money(cart.display_total())));
    lines
}

// =============================================================================
// ORDERS
// =============================================================================

pub fn status_badge(status: &OrderStatus, color: bool) -> String {
    paint(&format!("[{}]", status.label()), status.color(), color)
}

pub fn order_line(order: &Order, color: bool) -> String {
    format!(
        "{}  {}  {}  {}",
        order.id,
        status_badge(&order.status, color),
        order.placed_on().unwrap_or("-"),
        money(order.total)
    )
}

/// Full view of one order with the actions open to `role`.
pub fn order_detail(order: &Order, role: Role, color: bool) -> Vec<String> {
    let mut lines = vec![order_line(order, color)];

    if let Some(name) = order.buyer.as_ref().and_then(|b| b.name.as_deref()) {
        lines.push(format!("Comprador: {name}"));
    }
    for item in &order.items {
        lines.push(format!("  {} x{}  {}", item.name, item.quantity, money(item.subtotal)));
    }
    if let Some(address) = &order.delivery_address {
        lines.push(format!(
            "Entrega: {}, {}, {} {} (tel. {})",
            address.street, address.city, address.region, address.postal_code, address.phone
        ));
    }
    if let Some(method) = order.payment_method {
        lines.push(format!("Pago: {method}"));
    }
    if let Some(notes) = order.notes.as_deref().filter(|n| !n.is_empty()) {
        lines.push(format!("Notas: {notes}"));
    }

    let actions = order.actions_for(role);
    if !actions.is_empty() {
        let labels: Vec<&str> = actions.iter().map(|a| a.label()).collect();
        lines.push(format!("Acciones: {}", labels.join(" | ")));
    }
    lines
}

pub fn stats_lines(stats: &FarmerStats) -> Vec<String> {
    vec![
        format!("Productos:          {}", stats.total_products),
        format!("Pedidos pendientes: {}", stats.pending_orders),
        format!("Pedidos totales:    {}", stats.total_orders),
        format!("Ventas totales:     {}", money(stats.total_sales)),
    ]
}

/// Pretty JSON for `--json` output.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agromercado_core::{OrderId, score};

    #[test]
    fn paint_respects_flag_and_hex() {
        assert_eq!(paint("x", "#FF0000", false), "x");
        assert_eq!(paint("x", "#FF0000", true), "\x1b[38;2;255;0;0mx\x1b[0m");
        assert_eq!(paint("x", "red", true), "x");
    }

    #[test]
    fn meter_fills_two_cells_per_criterion() {
        let meter = strength_meter(&score("Aa1aaaaa"), false);
        assert_eq!(meter, "[████████░░]  80% Fuerte");
        let empty = strength_meter(&score(""), false);
        assert_eq!(empty, "[░░░░░░░░░░]   0% Muy débil");
    }

    #[test]
    fn checklist_marks_each_row() {
        let rows = checklist(&score("abc").criteria);
        assert_eq!(rows.len(), 5);
        assert_eq!(rows.iter().filter(|r| r.starts_with('✓')).count(), 1);
    }

    #[test]
    fn money_has_two_decimals() {
        assert_eq!(money(18.5), "$18.50");
        assert_eq!(money(0.0), "$0.00");
    }

    #[test]
    fn detail_lists_farmer_actions() {
        let order = Order {
            id: OrderId::new("o1"),
            status: OrderStatus::Pendiente,
            items: Vec::new(),
            total: 10.0,
            buyer: None,
            delivery_address: None,
            payment_method: None,
            notes: None,
            created_at: Some("2026-03-01T10:00:00Z".into()),
            ordered_at: None,
        };
        let lines = order_detail(&order, Role::Agricultor, false);
        assert_eq!(lines[0], "o1  [PENDIENTE]  2026-03-01  $10.00");
        assert!(lines.iter().any(|l| l.contains("Confirmar pedido")));

        let buyer = order_detail(&order, Role::Comprador, false);
        assert_eq!(buyer.last().map(String::as_str), Some("Acciones: Cancelar pedido"));
    }

    #[test]
    fn cart_lines_show_fractional_quantities_and_fallback_total() {
        let cart: Cart = serde_json::from_value(serde_json::json!({
            "items": [{"_id": "i1", "producto": {"nombre": "Queso"}, "cantidad": 1.5, "precio": 100}]
        }))
        .expect("cart");
        let lines = cart_lines(&cart);
        assert_eq!(lines[0], "i1  Queso x1.5  $150.00");
        assert_eq!(lines[1], "Total: $150.00");
    }

    #[test]
    fn json_output_reports_serialization_failures() {
        let mut keyed_by_bytes = std::collections::BTreeMap::new();
        keyed_by_bytes.insert(vec![1u8], 1u8);
        assert!(matches!(
            to_json(&keyed_by_bytes),
            Err(AppError::Serialization(_))
        ));
        assert_eq!(to_json(&serde_json::json!({ "ok": true })).expect("json"), "{\n  \"ok\": true\n}");
    }
}
