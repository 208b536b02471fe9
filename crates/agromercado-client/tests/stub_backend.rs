//! # Client Against a Stub Backend
//!
//! Each test starts a local axum server that records what it receives and
//! answers with a canned envelope, then drives `MarketClient` against it.

#![allow(clippy::unwrap_used, clippy::panic)]

use agromercado_client::{ClientConfig, ClientError, MarketClient};
use agromercado_core::{
    AddToCartRequest, CartItemId, Category, LoginRequest, OrderId, OrderStatus, ProductDraft,
    ProductId, QuantityChange, Role, Unit,
};
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// =============================================================================
// STUB SERVER
// =============================================================================

#[derive(Debug, Clone)]
struct Recorded {
    method: String,
    path: String,
    bearer: Option<String>,
    body: Option<Value>,
}

#[derive(Default)]
struct Stub {
    routes: HashMap<String, (u16, Value)>,
    seen: Mutex<Vec<Recorded>>,
}

impl Stub {
    fn last(&self) -> Recorded {
        self.seen.lock().unwrap().last().cloned().unwrap()
    }
}

async fn handle(
    State(stub): State<Arc<Stub>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let bearer = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);
    let body = serde_json::from_slice::<Value>(&body).ok();
    stub.seen.lock().unwrap().push(Recorded {
        method: method.to_string(),
        path: uri.path().to_string(),
        bearer,
        body,
    });

    let key = format!("{} {}", method, uri.path());
    let (status, reply) = stub
        .routes
        .get(&key)
        .cloned()
        .unwrap_or((404, json!({ "success": false, "message": "Ruta no encontrada" })));
    (
        StatusCode::from_u16(status).unwrap(),
        axum::Json(reply),
    )
}

/// Start a stub answering `routes` ("METHOD /api/path" → status, body).
async fn start(routes: &[(&str, u16, Value)]) -> (MarketClient, Arc<Stub>) {
    let stub = Arc::new(Stub {
        routes: routes
            .iter()
            .map(|(k, s, v)| ((*k).to_string(), (*s, v.clone())))
            .collect(),
        seen: Mutex::new(Vec::new()),
    });
    let app = Router::new().fallback(handle).with_state(Arc::clone(&stub));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = ClientConfig::new(format!("http://{addr}/api"));
    (MarketClient::new(&config).unwrap(), stub)
}

fn ok(data: Value) -> Value {
    json!({ "success": true, "data": data })
}

fn product_json(id: &str) -> Value {
    json!({
        "_id": id,
        "nombre": "Jitomate",
        "descripcion": "Saladet",
        "precio": 18.5,
        "cantidad": 40,
        "unidad": "kg",
        "categoria": "verduras"
    })
}

// =============================================================================
// AUTH
// =============================================================================

#[tokio::test]
async fn login_splits_token_and_user() {
    let (client, stub) = start(&[(
        "POST /api/auth/login",
        200,
        ok(json!({
            "token": "jwt-rosa",
            "_id": "u1",
            "nombre": "Rosa",
            "email": "rosa@campo.mx",
            "rol": "agricultor"
        })),
    )])
    .await;

    let credentials = LoginRequest {
        email: "rosa@campo.mx".into(),
        password: "Rancho#2024".into(),
    };
    let (token, user) = client.login(&credentials).await.unwrap();
    assert_eq!(token, "jwt-rosa");
    assert_eq!(user.role, Role::Agricultor);

    let seen = stub.last();
    assert_eq!(seen.method, "POST");
    assert_eq!(seen.bearer, None);
    assert_eq!(
        seen.body,
        Some(json!({ "email": "rosa@campo.mx", "password": "Rancho#2024" }))
    );
}

#[tokio::test]
async fn bad_credentials_surface_server_message() {
    let (client, _stub) = start(&[(
        "POST /api/auth/login",
        401,
        json!({ "success": false, "message": "Credenciales inválidas" }),
    )])
    .await;

    let credentials = LoginRequest {
        email: "x@y.mx".into(),
        password: "nope".into(),
    };
    let err = client.login(&credentials).await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.user_message(), "Credenciales inválidas");
}

#[tokio::test]
async fn login_without_data_is_missing_data() {
    let (client, _stub) = start(&[("POST /api/auth/login", 200, json!({ "success": true }))]).await;
    let credentials = LoginRequest {
        email: "x@y.mx".into(),
        password: "p".into(),
    };
    let err = client.login(&credentials).await.unwrap_err();
    assert!(matches!(err, ClientError::MissingData));
}

// =============================================================================
// CATALOG
// =============================================================================

#[tokio::test]
async fn list_products_is_public() {
    let (client, stub) = start(&[(
        "GET /api/products",
        200,
        ok(json!([product_json("p1"), product_json("p2")])),
    )])
    .await;

    let products = client.list_products().await.unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].unit, Unit::Kg);
    assert_eq!(stub.last().bearer, None);
}

#[tokio::test]
async fn one_odd_listing_does_not_fail_the_catalog() {
    let mut odd = product_json("p2");
    odd["unidad"] = json!("frascos");
    odd["categoria"] = Value::Null;
    let (client, _stub) = start(&[(
        "GET /api/products",
        200,
        ok(json!([product_json("p1"), odd])),
    )])
    .await;

    let products = client.list_products().await.unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[1].unit, Unit::Unknown("frascos".into()));
    assert_eq!(products[1].category, Category::Otros);
}

#[tokio::test]
async fn update_product_puts_draft_with_bearer() {
    let (client, stub) = start(&[(
        "PUT /api/products/p9",
        200,
        ok(product_json("p9")),
    )])
    .await;

    let draft = ProductDraft {
        name: "Jitomate".into(),
        description: "Saladet".into(),
        price: 18.5,
        stock: 40.0,
        unit: Unit::Kg,
        category: Category::Verduras,
    };
    let updated = client
        .update_product("jwt", &ProductId::new("p9"), &draft)
        .await
        .unwrap();
    assert!(updated.is_some());

    let seen = stub.last();
    assert_eq!(seen.method, "PUT");
    assert_eq!(seen.path, "/api/products/p9");
    assert_eq!(seen.bearer.as_deref(), Some("jwt"));
    let body = seen.body.unwrap();
    assert_eq!(body["nombre"], "Jitomate");
    assert_eq!(body["cantidad"], 40.0);
    assert_eq!(body["categoria"], "verduras");
}

#[tokio::test]
async fn delete_product_returns_message() {
    let (client, stub) = start(&[(
        "DELETE /api/products/p3",
        200,
        json!({ "success": true, "message": "Producto eliminado" }),
    )])
    .await;

    let message = client
        .delete_product("jwt", &ProductId::new("p3"))
        .await
        .unwrap();
    assert_eq!(message.as_deref(), Some("Producto eliminado"));
    assert_eq!(stub.last().method, "DELETE");
}

// =============================================================================
// CART
// =============================================================================

#[tokio::test]
async fn add_to_cart_body() {
    let (client, stub) = start(&[(
        "POST /api/cart/add",
        200,
        ok(json!({ "items": [], "total": 0 })),
    )])
    .await;

    let item = AddToCartRequest {
        product_id: ProductId::new("p1"),
        quantity: 2,
    };
    client.add_to_cart("jwt", &item).await.unwrap();
    assert_eq!(
        stub.last().body,
        Some(json!({ "productoId": "p1", "cantidad": 2 }))
    );
}

#[tokio::test]
async fn quantity_change_to_zero_hits_remove() {
    let (client, stub) = start(&[(
        "DELETE /api/cart/remove/i7",
        200,
        ok(json!({ "items": [], "total": 0 })),
    )])
    .await;

    let change = QuantityChange::for_quantity(CartItemId::new("i7"), 0);
    let cart = client.apply_quantity_change("jwt", &change).await.unwrap();
    assert!(cart.is_some_and(|c| c.is_empty()));
    assert_eq!(stub.last().path, "/api/cart/remove/i7");
}

#[tokio::test]
async fn missing_cart_is_empty() {
    let (client, _stub) = start(&[("GET /api/cart", 200, json!({ "success": true, "data": null }))]).await;
    let cart = client.get_cart("jwt").await.unwrap();
    assert!(cart.is_empty());
}

#[tokio::test]
async fn stock_rejection_is_api_error() {
    let (client, _stub) = start(&[(
        "PUT /api/cart/update",
        400,
        json!({ "success": false, "message": "Stock insuficiente" }),
    )])
    .await;

    let change = QuantityChange::for_quantity(CartItemId::new("i1"), 99);
    let err = client
        .apply_quantity_change("jwt", &change)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 400, .. }));
    assert_eq!(err.user_message(), "Stock insuficiente");
}

// =============================================================================
// ORDERS
// =============================================================================

#[tokio::test]
async fn update_status_sends_estado() {
    let (client, stub) = start(&[(
        "PUT /api/orders/o1/status",
        200,
        ok(json!({ "_id": "o1", "estado": "en_proceso", "items": [], "total": 50 })),
    )])
    .await;

    let order = client
        .update_order_status("jwt", &OrderId::new("o1"), &OrderStatus::EnProceso)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status, OrderStatus::EnProceso);
    assert_eq!(stub.last().body, Some(json!({ "estado": "en_proceso" })));
}

#[tokio::test]
async fn cancel_sends_empty_object() {
    let (client, stub) = start(&[(
        "PUT /api/orders/o2/cancel",
        200,
        json!({ "success": true, "message": "Pedido cancelado" }),
    )])
    .await;

    let order = client.cancel_order("jwt", &OrderId::new("o2")).await.unwrap();
    assert!(order.is_none());
    assert_eq!(stub.last().body, Some(json!({})));
}

#[tokio::test]
async fn unknown_status_does_not_break_listing() {
    let (client, _stub) = start(&[(
        "GET /api/orders/agricultor",
        200,
        ok(json!([
            { "_id": "o1", "estado": "pendiente", "total": 10 },
            { "_id": "o2", "estado": "devuelto", "total": 20 }
        ])),
    )])
    .await;

    let orders = client.received_orders("jwt").await.unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[1].status, OrderStatus::Unknown("devuelto".into()));
}

#[tokio::test]
async fn success_false_is_rejected() {
    let (client, _stub) = start(&[(
        "POST /api/orders",
        200,
        json!({ "success": false, "message": "El carrito está vacío" }),
    )])
    .await;

    let body = agromercado_core::CheckoutForm {
        street: "Calle 5".into(),
        city: "Morelia".into(),
        region: "Michoacán".into(),
        postal_code: "58000".into(),
        phone: "4431112233".into(),
        ..Default::default()
    }
    .validate()
    .unwrap();
    let err = client.place_order("jwt", &body).await.unwrap_err();
    assert!(matches!(err, ClientError::Rejected(Some(ref m)) if m == "El carrito está vacío"));
}

#[tokio::test]
async fn stats_default_missing_fields() {
    let (client, _stub) = start(&[(
        "GET /api/orders/agricultor/stats",
        200,
        ok(json!({ "totalProductos": 4, "totalVentas": 1250.5 })),
    )])
    .await;

    let stats = client.farmer_stats("jwt").await.unwrap();
    assert_eq!(stats.total_products, 4);
    assert_eq!(stats.pending_orders, 0);
    assert!((stats.total_sales - 1250.5).abs() < f64::EPSILON);
}

// =============================================================================
// TRANSPORT
// =============================================================================

#[tokio::test]
async fn unreachable_backend_is_connection_error() {
    // Bind then drop to get a port nothing listens on.
    let addr = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let config =
        ClientConfig::new(format!("http://{addr}/api")).with_timeout(Duration::from_secs(2));
    let client = MarketClient::new(&config).unwrap();

    let err = client.list_products().await.unwrap_err();
    assert!(matches!(err, ClientError::Connection { .. }));
    assert!(!err.user_message().is_empty());
}

#[tokio::test]
async fn unrouted_path_is_api_error() {
    let (client, _stub) = start(&[]).await;
    // Unrouted paths answer 404 with an envelope message.
    let err = client.my_orders("jwt").await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 404, .. }));
    assert_eq!(err.user_message(), "Ruta no encontrada");
}
