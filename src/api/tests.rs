//! HTTP-level tests against the full router (middleware included).

use axum::http::{Method, StatusCode};
use serde_json::{Value, json};

use crate::services::auth::Role;
use crate::test_support::{TestApp, request};

const ALICE: i64 = 1;
const BOB: i64 = 2;

async fn add_item(app: &TestApp, token: &str, body: Value) -> Value {
    let (status, res) = app
        .send(request(Method::POST, "/cart", Some(token), Some(body)))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{res}");
    res["data"].clone()
}

#[tokio::test]
async fn health_is_public_and_carries_common_headers() {
    let app = TestApp::new();

    let res = app.raw(request(Method::GET, "/health", None, None)).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.headers()["x-content-type-options"], "nosniff");

    let (_, body) = app.send(request(Method::GET, "/health", None, None)).await;
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn cart_requires_a_valid_bearer_token() {
    let app = TestApp::new();

    let (missing, body) = app.send(request(Method::GET, "/cart", None, None)).await;
    let (garbled, _) = app
        .send(request(Method::GET, "/cart", Some("not-a-jwt"), None))
        .await;

    assert_eq!(missing, StatusCode::UNAUTHORIZED);
    assert_eq!(garbled, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], "error");
    assert_eq!(body["code"], 1002);
}

#[tokio::test]
async fn create_then_merge_and_ownership_walkthrough() {
    let app = TestApp::new();
    let alice = app.token(ALICE, Role::User);
    let bob = app.token(BOB, Role::User);

    let item = add_item(&app, &alice, json!({"product_id": 10, "quantity": 2})).await;
    assert_eq!(item["price"], 20.0);
    assert_eq!(item["name"], "Pineapple Tee");
    let uri = format!("/cart/{}", item["id"]);

    let (status, body) = app
        .send(request(Method::GET, &uri, Some(bob.as_str()), None))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 1003);

    let merged = add_item(&app, &alice, json!({"product_id": 10, "quantity": 3})).await;
    assert_eq!(merged["id"], item["id"]);
    assert_eq!(merged["quantity"], 5);
    assert_eq!(merged["price"], 50.0);

    let (status, body) = app
        .send(request(Method::GET, &uri, Some(alice.as_str()), None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["quantity"], 5);

    let (status, list) = app
        .send(request(Method::GET, "/cart", Some(alice.as_str()), None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["data"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn single_item_read_loads_the_row_once() {
    let app = TestApp::new();
    let alice = app.token(ALICE, Role::User);
    let item = add_item(&app, &alice, json!({"product_id": 11, "quantity": 1, "size": "M"})).await;
    let before = app.carts.get_calls();

    let uri = format!("/cart/{}", item["id"]);
    let (status, body) = app
        .send(request(Method::GET, &uri, Some(alice.as_str()), None))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], item["id"]);
    assert_eq!(body["data"]["size"], "M");
    assert_eq!(app.carts.get_calls() - before, 1);
}

#[tokio::test]
async fn other_users_cannot_update_or_delete_an_item() {
    let app = TestApp::new();
    let alice = app.token(ALICE, Role::User);
    let bob = app.token(BOB, Role::Admin);

    let item = add_item(&app, &alice, json!({"product_id": 10, "quantity": 1})).await;
    let uri = format!("/cart/{}", item["id"]);

    let (put, _) = app
        .send(request(
            Method::PUT,
            &uri,
            Some(bob.as_str()),
            Some(json!({"product_id": 10, "quantity": 9})),
        ))
        .await;
    let (delete, _) = app
        .send(request(Method::DELETE, &uri, Some(bob.as_str()), None))
        .await;

    assert_eq!(put, StatusCode::FORBIDDEN);
    assert_eq!(delete, StatusCode::FORBIDDEN);
    assert_eq!(app.carts.all()[0].quantity, 1);
}

#[tokio::test]
async fn owner_can_update_and_delete() {
    let app = TestApp::new();
    let alice = app.token(ALICE, Role::User);
    let item = add_item(&app, &alice, json!({"product_id": 10, "quantity": 1})).await;
    let uri = format!("/cart/{}", item["id"]);

    app.products.set_price(10, 4.0);
    let (status, body) = app
        .send(request(
            Method::PUT,
            &uri,
            Some(alice.as_str()),
            Some(json!({"product_id": 10, "quantity": 3, "color": "red"})),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["price"], 12.0);
    assert_eq!(body["data"]["color"], "red");

    let (status, _) = app
        .send(request(Method::DELETE, &uri, Some(alice.as_str()), None))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .send(request(Method::GET, &uri, Some(alice.as_str()), None))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 1004);
}

#[tokio::test]
async fn malformed_input_is_a_validation_failure() {
    let app = TestApp::new();
    let alice = app.token(ALICE, Role::User);

    let (bad_id, body) = app
        .send(request(Method::GET, "/cart/abc", Some(alice.as_str()), None))
        .await;
    assert_eq!(bad_id, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "failed");
    assert_eq!(body["code"], 1001);

    let cases = [
        json!({"quantity": 1}),
        json!({"product_id": 10}),
        json!({"product_id": 10, "quantity": 1000}),
        json!({"product_id": 10, "quantity": "two"}),
    ];
    for case in cases {
        let (status, body) = app
            .send(request(Method::POST, "/cart", Some(alice.as_str()), Some(case.clone())))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{case}");
        assert_eq!(body["status"], "failed");
    }

    assert!(app.carts.all().is_empty());
}

#[tokio::test]
async fn unknown_product_is_not_found() {
    let app = TestApp::new();
    let alice = app.token(ALICE, Role::User);

    let (status, body) = app
        .send(request(
            Method::POST,
            "/cart",
            Some(alice.as_str()),
            Some(json!({"product_id": 404, "quantity": 1})),
        ))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "product not found");
}

#[tokio::test]
async fn bulk_create_bounds_and_success() {
    let app = TestApp::new();
    let alice = app.token(ALICE, Role::User);

    let (empty, _) = app
        .send(request(Method::POST, "/cart/bulk", Some(alice.as_str()), Some(json!([]))))
        .await;
    assert_eq!(empty, StatusCode::BAD_REQUEST);

    let oversized: Vec<Value> = (0..51)
        .map(|_| json!({"product_id": 10, "quantity": 1}))
        .collect();
    let (too_many, _) = app
        .send(request(
            Method::POST,
            "/cart/bulk",
            Some(alice.as_str()),
            Some(Value::Array(oversized)),
        ))
        .await;
    assert_eq!(too_many, StatusCode::BAD_REQUEST);
    assert!(app.carts.all().is_empty());

    let (status, body) = app
        .send(request(
            Method::POST,
            "/cart/bulk",
            Some(alice.as_str()),
            Some(json!([
                {"product_id": 10, "quantity": 1, "size": "M"},
                {"product_id": 11, "quantity": 2},
            ])),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn bulk_delete_is_rejected_whole_when_any_id_is_foreign() {
    let app = TestApp::new();
    let alice = app.token(ALICE, Role::User);
    let bob = app.token(BOB, Role::User);

    let a1 = add_item(&app, &alice, json!({"product_id": 10, "quantity": 1})).await;
    let a2 = add_item(&app, &alice, json!({"product_id": 11, "quantity": 1})).await;
    let b1 = add_item(&app, &bob, json!({"product_id": 10, "quantity": 1})).await;

    let (status, _) = app
        .send(request(
            Method::DELETE,
            "/cart/bulk",
            Some(alice.as_str()),
            Some(json!({"ids": [a1["id"], b1["id"], a2["id"]]})),
        ))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(app.carts.all().len(), 3);

    let (status, _) = app
        .send(request(
            Method::DELETE,
            "/cart/bulk",
            Some(alice.as_str()),
            Some(json!({"ids": [a1["id"], 999]})),
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.carts.all().len(), 3);

    let (status, _) = app
        .send(request(
            Method::DELETE,
            "/cart/bulk",
            Some(alice.as_str()),
            Some(json!({"ids": []})),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .send(request(
            Method::DELETE,
            "/cart/bulk",
            Some(alice.as_str()),
            Some(json!({"ids": [a1["id"], a2["id"]]})),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["count"], 2);
    assert_eq!(app.carts.all().len(), 1);
}

#[tokio::test]
async fn total_reports_user_and_sum() {
    let app = TestApp::new();
    let alice = app.token(ALICE, Role::User);

    let (_, empty) = app
        .send(request(Method::GET, "/cart/total", Some(alice.as_str()), None))
        .await;
    assert_eq!(empty["data"], json!({"user_id": ALICE, "total": 0.0}));

    add_item(&app, &alice, json!({"product_id": 10, "quantity": 2})).await;
    add_item(&app, &alice, json!({"product_id": 11, "quantity": 2})).await;

    let (status, body) = app
        .send(request(Method::GET, "/cart/total", Some(alice.as_str()), None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({"user_id": ALICE, "total": 45.0}));
}

#[tokio::test]
async fn product_writes_are_admin_only() {
    let app = TestApp::new();
    let product = json!({"name": "Sun Hat", "description": "wide brim", "price": 18.0});

    let (status, _) = app
        .send(request(
            Method::POST,
            "/products",
            Some(app.token(ALICE, Role::User).as_str()),
            Some(product.clone()),
        ))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    for role in [Role::Admin, Role::SuperAdmin] {
        let (status, body) = app
            .send(request(
                Method::POST,
                "/products",
                Some(app.token(BOB, role).as_str()),
                Some(product.clone()),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{role:?}");
        assert_eq!(body["data"]["name"], "Sun Hat");
    }

    let (status, body) = app
        .send(request(
            Method::GET,
            "/products",
            Some(app.token(ALICE, Role::User).as_str()),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(4));

    let (status, _) = app.send(request(Method::GET, "/products", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn product_price_change_does_not_touch_cart_rows() {
    let app = TestApp::new();
    let alice = app.token(ALICE, Role::User);
    let admin = app.token(BOB, Role::Admin);
    add_item(&app, &alice, json!({"product_id": 10, "quantity": 2})).await;

    let (status, _) = app
        .send(request(
            Method::PUT,
            "/products/10",
            Some(admin.as_str()),
            Some(json!({"name": "Pineapple Tee", "description": "", "price": 99.0})),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(app.carts.all()[0].price, 20.0);
}

#[tokio::test]
async fn admin_deletes_a_product_and_carts_keep_their_rows() {
    let app = TestApp::new();
    let alice = app.token(ALICE, Role::User);
    let admin = app.token(BOB, Role::Admin);
    let held = add_item(&app, &alice, json!({"product_id": 10, "quantity": 2})).await;

    let (status, _) = app
        .send(request(Method::DELETE, "/products/10", Some(alice.as_str()), None))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .send(request(Method::DELETE, "/products/10", Some(admin.as_str()), None))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "product deleted");

    let (status, _) = app
        .send(request(Method::DELETE, "/products/10", Some(admin.as_str()), None))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(request(Method::GET, "/products/10", Some(alice.as_str()), None))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .send(request(
            Method::POST,
            "/cart",
            Some(alice.as_str()),
            Some(json!({"product_id": 10, "quantity": 1})),
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "product not found");

    let uri = format!("/cart/{}", held["id"]);
    let (status, body) = app
        .send(request(Method::GET, &uri, Some(alice.as_str()), None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["quantity"], 2);
    assert_eq!(body["data"]["price"], 20.0);
}

fn registration(email: &str, role: Option<i16>) -> Value {
    json!({
        "username": "carol",
        "email": email,
        "password": "hunter22",
        "phone_number": "0801234567",
        "date_of_birth": "1995-06-15",
        "role": role,
    })
}

#[tokio::test]
async fn register_and_login() {
    let app = TestApp::new();

    let (status, body) = app
        .send(request(
            Method::POST,
            "/users/register",
            None,
            Some(registration("Carol@Example.com", None)),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["email"], "carol@example.com");
    assert_eq!(body["data"]["role"], 2);
    assert!(body["data"].get("password_hash").is_none());

    let (status, _) = app
        .send(request(
            Method::POST,
            "/users/register",
            None,
            Some(registration("carol@example.com", Some(0))),
        ))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app
        .send(request(
            Method::POST,
            "/users/login",
            None,
            Some(json!({"email": "carol@example.com", "password": "hunter22"})),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["token"].as_str().unwrap_or_default().to_string();
    let claims = app.tokens.verify(&token).unwrap();
    assert_eq!(claims.role, Role::User);

    // the issued token opens the cart
    let (status, _) = app
        .send(request(Method::GET, "/cart", Some(token.as_str()), None))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (wrong, wrong_body) = app
        .send(request(
            Method::POST,
            "/users/login",
            None,
            Some(json!({"email": "carol@example.com", "password": "nope-nope"})),
        ))
        .await;
    let (unknown, unknown_body) = app
        .send(request(
            Method::POST,
            "/users/login",
            None,
            Some(json!({"email": "dave@example.com", "password": "hunter22"})),
        ))
        .await;
    assert_eq!(wrong, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
}

#[tokio::test]
async fn admin_registration_needs_an_admin_token() {
    let app = TestApp::new();

    let (anonymous, _) = app
        .send(request(
            Method::POST,
            "/users/register",
            None,
            Some(registration("a1@example.com", Some(1))),
        ))
        .await;
    let (as_user, _) = app
        .send(request(
            Method::POST,
            "/users/register",
            Some(app.token(ALICE, Role::User).as_str()),
            Some(registration("a2@example.com", Some(1))),
        ))
        .await;
    let (as_admin, body) = app
        .send(request(
            Method::POST,
            "/users/register",
            Some(app.token(BOB, Role::Admin).as_str()),
            Some(registration("a3@example.com", Some(1))),
        ))
        .await;

    assert_eq!(anonymous, StatusCode::UNAUTHORIZED);
    assert_eq!(as_user, StatusCode::FORBIDDEN);
    assert_eq!(as_admin, StatusCode::CREATED);
    assert_eq!(body["data"]["role"], 1);
}
