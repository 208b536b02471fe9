//! # Marketplace Flow Tests
//!
//! End-to-end checks of the pure domain, grouped by the flow they cover.
//!
//! ## Flows
//! - F0: Password strength gate
//! - F1: Registration into a session
//! - F2: Cart to checkout
//! - F3: Order lifecycle by role

use agromercado_core::{
    MarketError, OrderStatus, RegistrationForm, Role, Session, User, UserId, score,
};

// =============================================================================
// FLOW F0: PASSWORD STRENGTH GATE
// =============================================================================

mod f0_password_gate {
    use super::*;

    /// F0.1: The empty password scores zero with every criterion unmet.
    #[test]
    fn empty_password() {
        let result = score("");
        assert_eq!(result.strength, 0);
        assert!(!result.is_strong);
        assert_eq!(result.message, "Muy débil");
        assert_eq!(result.criteria.unmet().len(), 5);
    }

    /// F0.2: Reference passwords land in their documented bands.
    #[test]
    fn reference_passwords() {
        let cases = [
            ("alllowercase", 2, false, "Débil"),
            ("Aa1!aaaa", 5, true, "Muy fuerte"),
            ("Aa1aaaaa", 4, true, "Fuerte"),
        ];
        for (password, strength, strong, message) in cases {
            let result = score(password);
            assert_eq!(result.strength, strength, "{password}");
            assert_eq!(result.is_strong, strong, "{password}");
            assert_eq!(result.message, message, "{password}");
        }
    }

    /// F0.3: Seven characters miss the length criterion, eight meet it.
    #[test]
    fn length_boundary() {
        assert!(!score("Aa1!aaa").criteria.length);
        assert!(score("Aa1!aaaa").criteria.length);
    }

    /// F0.4: Appending a digit to a digit-less password raises strength.
    #[test]
    fn adding_a_digit() {
        let before = score("Abcdefgh");
        let after = score("Abcdefgh1");
        assert!(!before.criteria.number);
        assert_eq!(after.strength, before.strength + 1);
    }
}

// =============================================================================
// FLOW F1: REGISTRATION INTO A SESSION
// =============================================================================

mod f1_registration {
    use super::*;

    /// F1.1: The gate follows each keystroke of the password field.
    #[test]
    fn gate_opens_as_password_strengthens() {
        let mut form = RegistrationForm {
            name: "Luis".into(),
            email: "luis@rancho.mx".into(),
            role: Role::Comprador,
            ..RegistrationForm::default()
        };
        let mut opened_at = None;
        for (i, c) in "luisRancho9".chars().enumerate() {
            form.password.push(c);
            if form.can_submit() && opened_at.is_none() {
                opened_at = Some(i + 1);
            }
        }
        // "luisRancho9" first reaches four criteria when the digit lands.
        assert_eq!(opened_at, Some(11));
    }

    /// F1.2: A validated registration becomes a signed-in session.
    #[test]
    fn registration_then_sign_in() {
        let form = RegistrationForm {
            name: "Luis".into(),
            email: "Luis@Rancho.mx".into(),
            password: "Rancho#2024".into(),
            confirm_password: "Rancho#2024".into(),
            role: Role::Comprador,
            ..RegistrationForm::default()
        };
        let request = form.validate().expect("valid registration");

        let user = User {
            id: UserId::new("u-7"),
            name: request.name.clone(),
            email: request.email.clone(),
            role: request.role,
            phone: None,
            location: None,
        };
        let session = Session::signed_in("jwt", user);
        assert_eq!(session.role(), Some(Role::Comprador));
        assert_eq!(
            session.user().map(|u| u.email.as_str()),
            Some("luis@rancho.mx")
        );
    }
}

// =============================================================================
// FLOW F2: CART TO CHECKOUT
// =============================================================================

mod f2_checkout {
    use agromercado_core::{Cart, CartItem, CartItemId, CheckoutForm, PaymentMethod, QuantityChange};

    /// F2.1: Decrementing the last unit removes the line.
    #[test]
    fn decrement_to_zero_removes() {
        let cart = Cart {
            items: vec![CartItem {
                id: CartItemId::new("i1"),
                product: None,
                quantity: 1.0,
                price: 20.0,
            }],
            total: 20.0,
        };
        let line = &cart.items[0];
        let change = QuantityChange::for_quantity(line.id.clone(), line.quantity as i64 - 1);
        assert_eq!(change, QuantityChange::Remove(CartItemId::new("i1")));
    }

    /// F2.2: Checkout produces the order body with the chosen payment method.
    #[test]
    fn checkout_body() {
        let form = CheckoutForm {
            street: "Calle 5 #12".into(),
            city: "Morelia".into(),
            region: "Michoacán".into(),
            postal_code: "58000".into(),
            phone: "4431112233".into(),
            payment_method: PaymentMethod::Transferencia,
            notes: " tocar timbre ".into(),
        };
        let body = form.validate().expect("valid checkout");
        assert_eq!(body.payment_method, PaymentMethod::Transferencia);
        assert_eq!(body.notes, "tocar timbre");
    }
}

// =============================================================================
// FLOW F3: ORDER LIFECYCLE BY ROLE
// =============================================================================

mod f3_lifecycle {
    use super::*;
    use agromercado_core::{OrderAction, available_actions, order::authorize_status_change};

    /// F3.1: A farmer can walk an order through every step to delivery.
    #[test]
    fn farmer_walks_full_lifecycle() {
        let mut status = OrderStatus::Pendiente;
        for next in [
            OrderStatus::Confirmado,
            OrderStatus::EnProceso,
            OrderStatus::Enviado,
            OrderStatus::Entregado,
        ] {
            assert!(
                available_actions(Role::Agricultor, &status)
                    .contains(&OrderAction::Advance(next.clone()))
            );
            authorize_status_change(Role::Agricultor, &status, &next).expect("legal step");
            status = next;
        }
        assert!(available_actions(Role::Agricultor, &status).is_empty());
    }

    /// F3.2: Delivered orders cannot be reopened.
    #[test]
    fn delivered_cannot_reopen() {
        let result = authorize_status_change(
            Role::Agricultor,
            &OrderStatus::Entregado,
            &OrderStatus::Pendiente,
        );
        assert!(matches!(result, Err(MarketError::IllegalTransition { .. })));
    }

    /// F3.3: The buyer's cancel option disappears once the farmer confirms.
    #[test]
    fn buyer_cancel_window() {
        assert_eq!(
            available_actions(Role::Comprador, &OrderStatus::Pendiente),
            vec![OrderAction::Cancel]
        );
        assert!(available_actions(Role::Comprador, &OrderStatus::Confirmado).is_empty());
    }
}
