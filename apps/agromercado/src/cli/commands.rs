//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.
//!
//! Every rule that can be checked locally (form validation, role gates,
//! the order transition table) runs before the backend is called.

use super::{CheckoutArgs, Context, ProductArgs, ProductChanges, RegisterArgs};
use crate::error::AppError;
use crate::render;
use agromercado_core::{
    AddToCartRequest, CartItemId, CategoryFilter, CheckoutForm, MarketError, Order, OrderId,
    OrderStatus, ProductForm, ProductId, ProfileUpdate, QuantityChange, RegistrationForm,
    ResetPasswordForm, Role, Session, SessionStore, StatusFilter, User, filter_products,
    forms::{validate_forgot_email, validate_login},
    order::{authorize_cancel, authorize_status_change},
    score,
};
use serde_json::json;

// =============================================================================
// HELPERS
// =============================================================================

/// Load the session and require a token.
fn signed_in(ctx: &Context) -> Result<Session, AppError> {
    let session = ctx.store.load()?;
    session.bearer()?;
    Ok(session)
}

/// Load the session and require an account with `role`.
fn signed_in_as(ctx: &Context, role: Role) -> Result<Session, AppError> {
    let session = signed_in(ctx)?;
    if session.require_role()? != role {
        return Err(AppError::RoleRequired(role));
    }
    Ok(session)
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

fn print_message(ctx: &Context, message: &str) -> Result<(), AppError> {
    if ctx.json {
        println!("{}", render::to_json(&json!({ "message": message }))?);
    } else {
        println!("{message}");
    }
    Ok(())
}

fn find_order(orders: Vec<Order>, id: &OrderId) -> Result<Order, AppError> {
    orders
        .into_iter()
        .find(|o| o.id == *id)
        .ok_or_else(|| AppError::NotFound {
            kind: "Pedido",
            id: id.to_string(),
        })
}

/// Orders visible to the signed-in user, by role.
async fn visible_orders(ctx: &Context, session: &Session) -> Result<Vec<Order>, AppError> {
    let token = session.bearer()?;
    let orders = match session.require_role()? {
        Role::Agricultor => ctx.client.received_orders(token).await?,
        Role::Comprador => ctx.client.my_orders(token).await?,
    };
    Ok(orders)
}

// =============================================================================
// PASSWORD COMMAND
// =============================================================================

/// Score a password locally.
pub fn cmd_password_check(ctx: &Context, password: &str) -> Result<(), AppError> {
    let result = score(password);

    if ctx.json {
        println!("{}", render::to_json(&result)?);
        return Ok(());
    }

    println!("{}", render::strength_meter(&result, ctx.color));
    println!();
    print_lines(&render::checklist(&result.criteria));
    println!();
    if result.is_strong {
        println!("La contraseña cumple el mínimo para registrarse.");
    } else {
        println!("La contraseña no es suficientemente segura para registrarse.");
    }
    Ok(())
}

// =============================================================================
// AUTH COMMANDS
// =============================================================================

pub async fn cmd_login(ctx: &Context, email: &str, password: &str) -> Result<(), AppError> {
    let credentials = validate_login(email, password)?;
    let (token, user) = ctx.client.login(&credentials).await?;
    tracing::info!(user = %user.id, role = %user.role, "signed in");

    let session = Session::signed_in(token, user);
    ctx.store.save(&session)?;
    print_user(ctx, &session, "Bienvenido")
}

/// Register and sign in. The strength gate is checked before any request.
pub async fn cmd_register(ctx: &Context, args: RegisterArgs) -> Result<(), AppError> {
    let form = RegistrationForm {
        name: args.name,
        email: args.email,
        phone: args.phone,
        confirm_password: args.confirm.unwrap_or_else(|| args.password.clone()),
        password: args.password,
        role: args.role,
    };
    let request = form.validate()?;
    let (token, user) = ctx.client.register(&request).await?;
    tracing::info!(user = %user.id, role = %user.role, "registered");

    let session = Session::signed_in(token, user);
    ctx.store.save(&session)?;
    print_user(ctx, &session, "Cuenta creada")
}

fn print_user(ctx: &Context, session: &Session, headline: &str) -> Result<(), AppError> {
    let user = session.user().ok_or(MarketError::NotAuthenticated)?;
    if ctx.json {
        println!("{}", render::to_json(user)?);
    } else {
        println!(
            "{headline}: {} ({})",
            user.name,
            render::paint(user.role.as_str(), user.role.color(), ctx.color)
        );
    }
    Ok(())
}

pub fn cmd_logout(ctx: &Context) -> Result<(), AppError> {
    ctx.store.clear()?;
    tracing::debug!(path = %ctx.store.path().display(), "session cleared");
    print_message(ctx, "Sesión cerrada")?;
    Ok(())
}

pub fn cmd_whoami(ctx: &Context) -> Result<(), AppError> {
    let session = ctx.store.load()?;

    if ctx.json {
        println!(
            "{}",
            render::to_json(&json!({
                "authenticated": session.is_authenticated(),
                "user": session.user(),
            }))?
        );
        return Ok(());
    }

    match session.user().filter(|_| session.is_authenticated()) {
        Some(user) => {
            println!("{} <{}>", user.name, user.email);
            println!("Rol:       {}", user.role);
            if let Some(phone) = &user.phone {
                println!("Teléfono:  {phone}");
            }
            if let Some(location) = &user.location {
                println!("Ubicación: {location}");
            }
        }
        None => println!("No has iniciado sesión"),
    }
    Ok(())
}

pub async fn cmd_forgot_password(ctx: &Context, email: &str) -> Result<(), AppError> {
    let request = validate_forgot_email(email)?;
    ctx.client.forgot_password(&request).await?;
    print_message(
        ctx,
        "Se envió un código a tu email. Revisa tu bandeja de entrada.",
    )?;
    Ok(())
}

pub async fn cmd_reset_password(
    ctx: &Context,
    code: &str,
    password: &str,
    confirm: Option<&str>,
) -> Result<(), AppError> {
    let form = ResetPasswordForm {
        code: code.to_string(),
        new_password: password.to_string(),
        confirm_password: confirm.unwrap_or(password).to_string(),
    };
    let request = form.validate()?;
    ctx.client.reset_password(&request).await?;
    print_message(ctx, "Contraseña actualizada. Ahora puedes iniciar sesión.")?;
    Ok(())
}

// =============================================================================
// PRODUCT COMMANDS
// =============================================================================

pub async fn cmd_products_list(
    ctx: &Context,
    category: CategoryFilter,
    search: &str,
) -> Result<(), AppError> {
    let products = ctx.client.list_products().await?;
    let shown = filter_products(&products, category, search);
    tracing::debug!(total = products.len(), shown = shown.len(), "catalog filtered");

    if ctx.json {
        println!("{}", render::to_json(&shown)?);
        return Ok(());
    }
    if shown.is_empty() {
        println!("No se encontraron productos");
        return Ok(());
    }
    for product in shown {
        println!("{}", render::product_line(product));
    }
    Ok(())
}

pub async fn cmd_products_mine(ctx: &Context) -> Result<(), AppError> {
    let session = signed_in_as(ctx, Role::Agricultor)?;
    let products = ctx.client.my_products(session.bearer()?).await?;

    if ctx.json {
        println!("{}", render::to_json(&products)?);
        return Ok(());
    }
    if products.is_empty() {
        println!("Aún no has publicado productos");
        return Ok(());
    }
    for product in &products {
        println!("{}", render::product_line(product));
    }
    Ok(())
}

pub async fn cmd_products_add(ctx: &Context, args: ProductArgs) -> Result<(), AppError> {
    let session = signed_in_as(ctx, Role::Agricultor)?;
    let draft = ProductForm {
        name: args.name,
        description: args.description,
        price: args.price,
        stock: args.stock,
        unit: args.unit,
        category: args.category,
    }
    .validate()?;

    let created = ctx.client.create_product(session.bearer()?, &draft).await?;
    match created {
        Some(product) if ctx.json => println!("{}", render::to_json(&product)?),
        Some(product) => println!("Producto publicado: {}", render::product_line(&product)),
        None => print_message(ctx, "Producto publicado")?,
    }
    Ok(())
}

/// Edit a listing, starting from its current values.
pub async fn cmd_products_edit(
    ctx: &Context,
    id: &ProductId,
    changes: ProductChanges,
) -> Result<(), AppError> {
    let session = signed_in_as(ctx, Role::Agricultor)?;
    let token = session.bearer()?;

    let current = ctx
        .client
        .my_products(token)
        .await?
        .into_iter()
        .find(|p| p.id == *id)
        .ok_or_else(|| AppError::NotFound {
            kind: "Producto",
            id: id.to_string(),
        })?
        .to_draft();

    let draft = ProductForm {
        name: changes.name.unwrap_or(current.name),
        description: changes.description.unwrap_or(current.description),
        price: changes.price.unwrap_or_else(|| current.price.to_string()),
        stock: changes.stock.unwrap_or_else(|| current.stock.to_string()),
        unit: changes.unit.unwrap_or(current.unit),
        category: changes.category.unwrap_or(current.category),
    }
    .validate()?;

    let updated = ctx.client.update_product(token, id, &draft).await?;
    match updated {
        Some(product) if ctx.json => println!("{}", render::to_json(&product)?),
        Some(product) => println!("Producto actualizado: {}", render::product_line(&product)),
        None => print_message(ctx, "Producto actualizado")?,
    }
    Ok(())
}

pub async fn cmd_products_delete(ctx: &Context, id: &ProductId) -> Result<(), AppError> {
    let session = signed_in_as(ctx, Role::Agricultor)?;
    let message = ctx.client.delete_product(session.bearer()?, id).await?;
    print_message(ctx, message.as_deref().unwrap_or("Producto eliminado"))?;
    Ok(())
}

// =============================================================================
// CART COMMANDS
// =============================================================================

pub async fn cmd_cart_show(ctx: &Context) -> Result<(), AppError> {
    let session = signed_in_as(ctx, Role::Comprador)?;
    let cart = ctx.client.get_cart(session.bearer()?).await?;

    if ctx.json {
        println!("{}", render::to_json(&cart)?);
    } else if cart.is_empty() {
        println!("Tu carrito está vacío");
    } else {
        print_lines(&render::cart_lines(&cart));
    }
    Ok(())
}

/// Add a product, refusing ones the catalog shows without stock.
pub async fn cmd_cart_add(ctx: &Context, product: &ProductId, quantity: u32) -> Result<(), AppError> {
    let session = signed_in_as(ctx, Role::Comprador)?;

    let catalog = ctx.client.list_products().await?;
    let listed = catalog
        .iter()
        .find(|p| p.id == *product)
        .ok_or_else(|| AppError::NotFound {
            kind: "Producto",
            id: product.to_string(),
        })?;
    listed.ensure_available()?;

    let request = AddToCartRequest {
        product_id: product.clone(),
        quantity: quantity.max(1),
    };
    ctx.client.add_to_cart(session.bearer()?, &request).await?;
    print_message(ctx, &format!("{} agregado al carrito", listed.name))?;
    Ok(())
}

/// Set a line's quantity. Zero or less removes the line.
pub async fn cmd_cart_set(ctx: &Context, item: CartItemId, quantity: i64) -> Result<(), AppError> {
    let session = signed_in_as(ctx, Role::Comprador)?;
    let change = QuantityChange::for_quantity(item, quantity);
    let cart = ctx
        .client
        .apply_quantity_change(session.bearer()?, &change)
        .await?;

    match cart {
        Some(cart) if ctx.json => println!("{}", render::to_json(&cart)?),
        Some(cart) if !cart.is_empty() => print_lines(&render::cart_lines(&cart)),
        _ => match change {
            QuantityChange::Remove(_) => print_message(ctx, "Producto eliminado del carrito")?,
            QuantityChange::Update(_) => print_message(ctx, "Cantidad actualizada")?,
        },
    }
    Ok(())
}

pub async fn cmd_cart_clear(ctx: &Context) -> Result<(), AppError> {
    let session = signed_in_as(ctx, Role::Comprador)?;
    ctx.client.clear_cart(session.bearer()?).await?;
    print_message(ctx, "Carrito vaciado")?;
    Ok(())
}

/// Turn the cart into an order.
pub async fn cmd_checkout(ctx: &Context, args: CheckoutArgs) -> Result<(), AppError> {
    let session = signed_in_as(ctx, Role::Comprador)?;
    let token = session.bearer()?;

    let order = CheckoutForm {
        street: args.street,
        city: args.city,
        region: args.region,
        postal_code: args.postal_code,
        phone: args.phone,
        payment_method: args.payment,
        notes: args.notes,
    }
    .validate()?;

    let cart = ctx.client.get_cart(token).await?;
    if cart.is_empty() {
        return Err(AppError::EmptyCart);
    }

    let placed = ctx.client.place_order(token, &order).await?;
    tracing::info!(items = cart.items.len(), total = cart.total, "order placed");
    match placed {
        Some(order) if ctx.json => println!("{}", render::to_json(&order)?),
        Some(order) => {
            println!("Pedido realizado");
            println!("{}", render::order_line(&order, ctx.color));
        }
        None => print_message(ctx, "Pedido realizado")?,
    }
    Ok(())
}

// =============================================================================
// ORDER COMMANDS
// =============================================================================

fn print_orders(ctx: &Context, orders: &[&Order]) -> Result<(), AppError> {
    if ctx.json {
        println!("{}", render::to_json(&orders)?);
    } else if orders.is_empty() {
        println!("No hay pedidos");
    } else {
        for order in orders {
            println!("{}", render::order_line(order, ctx.color));
        }
    }
    Ok(())
}

pub async fn cmd_orders_mine(ctx: &Context) -> Result<(), AppError> {
    let session = signed_in_as(ctx, Role::Comprador)?;
    let orders = ctx.client.my_orders(session.bearer()?).await?;
    print_orders(ctx, &orders.iter().collect::<Vec<_>>())?;
    Ok(())
}

pub async fn cmd_orders_received(ctx: &Context, status: &StatusFilter) -> Result<(), AppError> {
    let session = signed_in_as(ctx, Role::Agricultor)?;
    let orders = ctx.client.received_orders(session.bearer()?).await?;
    print_orders(ctx, &status.apply(&orders))?;
    Ok(())
}

pub async fn cmd_orders_show(ctx: &Context, id: &OrderId) -> Result<(), AppError> {
    let session = signed_in(ctx)?;
    let role = session.require_role()?;
    let order = find_order(visible_orders(ctx, &session).await?, id)?;

    if ctx.json {
        let actions: Vec<&str> = order.actions_for(role).iter().map(|a| a.label()).collect();
        println!(
            "{}",
            render::to_json(&json!({ "order": order, "actions": actions }))?
        );
    } else {
        print_lines(&render::order_detail(&order, role, ctx.color));
    }
    Ok(())
}

/// Move a received order forward, checked against the transition table.
pub async fn cmd_orders_set_status(
    ctx: &Context,
    id: &OrderId,
    status: &OrderStatus,
) -> Result<(), AppError> {
    let session = signed_in_as(ctx, Role::Agricultor)?;
    let token = session.bearer()?;

    let current = find_order(ctx.client.received_orders(token).await?, id)?;
    authorize_status_change(Role::Agricultor, &current.status, status)?;

    let updated = ctx.client.update_order_status(token, id, status).await?;
    tracing::info!(order = %id, from = %current.status, to = %status, "order status changed");
    match updated {
        Some(order) if ctx.json => println!("{}", render::to_json(&order)?),
        _ => print_message(ctx, &format!("Pedido actualizado a {}", status.label()))?,
    }
    Ok(())
}

/// Cancel one of the buyer's orders while it is still pending.
pub async fn cmd_orders_cancel(ctx: &Context, id: &OrderId) -> Result<(), AppError> {
    let session = signed_in(ctx)?;
    let role = session.require_role()?;
    let token = session.bearer()?;

    let current = find_order(visible_orders(ctx, &session).await?, id)?;
    authorize_cancel(role, &current.status)?;

    ctx.client.cancel_order(token, id).await?;
    tracing::info!(order = %id, "order cancelled");
    print_message(ctx, "Pedido cancelado")?;
    Ok(())
}

// =============================================================================
// STATS & PROFILE
// =============================================================================

pub async fn cmd_stats(ctx: &Context) -> Result<(), AppError> {
    let session = signed_in_as(ctx, Role::Agricultor)?;
    let stats = ctx.client.farmer_stats(session.bearer()?).await?;

    if ctx.json {
        println!("{}", render::to_json(&stats)?);
    } else {
        print_lines(&render::stats_lines(&stats));
    }
    Ok(())
}

/// Profile fields given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
}

/// Update the profile and keep the stored session in sync.
pub async fn cmd_profile_update(ctx: &Context, changes: ProfileChanges) -> Result<(), AppError> {
    let mut session = signed_in(ctx)?;
    let current = session
        .user()
        .cloned()
        .ok_or(MarketError::NotAuthenticated)?;

    let update = ProfileUpdate {
        name: changes.name.unwrap_or_else(|| current.name.clone()),
        email: changes.email.unwrap_or_else(|| current.email.clone()),
        phone: changes
            .phone
            .unwrap_or_else(|| current.phone.clone().unwrap_or_default()),
        location: changes
            .location
            .unwrap_or_else(|| current.location.clone().unwrap_or_default()),
    }
    .validate()?;

    let echoed = ctx
        .client
        .update_profile(session.bearer()?, &update)
        .await?;
    let user = echoed.unwrap_or_else(|| User {
        name: update.name.clone(),
        email: update.email.clone(),
        phone: Some(update.phone.clone()).filter(|p| !p.is_empty()),
        location: Some(update.location.clone()).filter(|l| !l.is_empty()),
        ..current
    });
    session.set_user(user);
    ctx.store.save(&session)?;
    print_user(ctx, &session, "Perfil actualizado")
}
