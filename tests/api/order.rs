use food_ordering::{cart::Cart, client::ClientError, db_interaction::create_order_with_items, domain::{OrderStatus, UserRole}, models::OrderLine};

use crate::helpers::{add_address, open_restaurant, TestApp};

#[actix_web::test]
pub async fn post_order_creates_order_with_price_snapshots(){
    let app = TestApp::spawn_app().await;
    let (owner, _) = app.signed_up(UserRole::Owner).await;
    let (customer, customer_user) = app.signed_up(UserRole::Customer).await;
    let (_, menu) = open_restaurant(&owner).await;
    let address = add_address(&customer).await;

    let mut cart = Cart::new();
    cart.add_item(&menu[0], 2);
    cart.add_item(&menu[1], 1);
    assert_eq!(cart.total_cents(), 2497);

    let placed = customer.place_order(&cart, address.id).await.unwrap();

    assert_eq!(placed.order.user_id, customer_user.id);
    assert_eq!(placed.order.address_id, address.id);
    assert_eq!(placed.order.status, OrderStatus::Pending);
    assert_eq!(placed.order_items.len(), 2);
    assert_eq!(placed.order_items[0].item_id, menu[0].id);
    assert_eq!(placed.order_items[0].quantity, 2);
    assert_eq!(placed.order_items[0].price_snapshot, 999);
    assert_eq!(placed.order_items[1].price_snapshot, 499);

    assert_eq!(app.order_count(), 1);
    assert_eq!(app.order_item_count(), 2);

    let listed = customer.orders().await.unwrap();
    assert_eq!(listed, vec![placed.order.clone()]);

    let fetched = customer.order(placed.order.id).await.unwrap();
    assert_eq!(fetched, placed);
}

#[actix_web::test]
pub async fn order_response_uses_order_items_key(){
    let app = TestApp::spawn_app().await;
    let (owner, _) = app.signed_up(UserRole::Owner).await;
    let (_, menu) = open_restaurant(&owner).await;

    let register = app.api_client.post(format!("{}/api/auth/register", app.get_app_url()))
                    .json(&serde_json::json!({
                        "email": crate::helpers::random_email(),
                        "password": "password123",
                        "role": "customer"
                    }))
                    .send()
                    .await
                    .unwrap();
    assert_eq!(register.status().as_u16(), 201);

    let address: serde_json::Value = app.api_client.post(format!("{}/api/addresses", app.get_app_url()))
                    .json(&crate::helpers::sample_address())
                    .send()
                    .await
                    .unwrap()
                    .json()
                    .await
                    .unwrap();

    let address_id = address["address"]["id"].clone();
    let item_id = menu[0].id;

    let response = app.api_client.post(format!("{}/api/orders", app.get_app_url()))
                    .json(&serde_json::json!({
                        "address_id": address_id,
                        "items": [{ "item_id": item_id, "quantity": 1, "price_snapshot": 999 }]
                    }))
                    .send()
                    .await
                    .unwrap();

    assert_eq!(response.status().as_u16(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["order"]["status"], "pending");
    assert_eq!(body["orderItems"].as_array().map(|items| items.len()), Some(1));
}

#[actix_web::test]
pub async fn stale_price_snapshot_is_rejected_without_an_order(){
    let app = TestApp::spawn_app().await;
    let (owner, _) = app.signed_up(UserRole::Owner).await;
    let (customer, _) = app.signed_up(UserRole::Customer).await;
    let (_, mut menu) = open_restaurant(&owner).await;
    let address = add_address(&customer).await;

    // the customer still sees the old price
    menu[1].price = 399;
    let mut cart = Cart::new();
    cart.add_item(&menu[0], 1);
    cart.add_item(&menu[1], 1);

    match customer.place_order(&cart, address.id).await {
        Err(ClientError::Api{ status, body }) => {
            assert_eq!(status, 400);
            assert_eq!(body.errors.len(), 1);
            assert_eq!(body.errors[0].param, "items[1].price_snapshot");
        },
        other => panic!("expected validation error, got {:?}", other)
    }

    assert_eq!(app.order_count(), 0);
}

#[actix_web::test]
pub async fn unknown_item_is_rejected(){
    let app = TestApp::spawn_app().await;
    let (owner, _) = app.signed_up(UserRole::Owner).await;
    let (customer, _) = app.signed_up(UserRole::Customer).await;
    let (_, mut menu) = open_restaurant(&owner).await;
    let address = add_address(&customer).await;

    menu[0].id = 424242;
    let mut cart = Cart::new();
    cart.add_item(&menu[0], 1);

    match customer.place_order(&cart, address.id).await {
        Err(ClientError::Api{ status, body }) => {
            assert_eq!(status, 400);
            assert_eq!(body.errors[0].param, "items[0].item_id");
        },
        other => panic!("expected validation error, got {:?}", other)
    }
}

#[actix_web::test]
pub async fn ordering_to_someone_elses_address_is_not_found(){
    let app = TestApp::spawn_app().await;
    let (owner, _) = app.signed_up(UserRole::Owner).await;
    let (alice, _) = app.signed_up(UserRole::Customer).await;
    let (mallory, _) = app.signed_up(UserRole::Customer).await;
    let (_, menu) = open_restaurant(&owner).await;
    let address = add_address(&alice).await;

    let mut cart = Cart::new();
    cart.add_item(&menu[0], 1);

    match mallory.place_order(&cart, address.id).await {
        Err(ClientError::Api{ status, body }) => {
            assert_eq!(status, 404);
            assert_eq!(body.error.as_deref(), Some("Address not found"));
        },
        other => panic!("expected not found, got {:?}", other)
    }
    assert_eq!(app.order_count(), 0);
}

#[actix_web::test]
pub async fn empty_cart_cannot_be_ordered(){
    let app = TestApp::spawn_app().await;
    let (customer, _) = app.signed_up(UserRole::Customer).await;
    let address = add_address(&customer).await;

    match customer.place_order(&Cart::new(), address.id).await {
        Err(ClientError::Api{ status, body }) => {
            assert_eq!(status, 400);
            assert_eq!(body.errors[0].param, "items");
        },
        other => panic!("expected validation error, got {:?}", other)
    }
}

#[actix_web::test]
pub async fn orders_are_for_customers_only(){
    let app = TestApp::spawn_app().await;
    let (owner, _) = app.signed_up(UserRole::Owner).await;

    match owner.orders().await {
        Err(ClientError::Api{ status, .. }) => assert_eq!(status, 403),
        other => panic!("expected forbidden, got {:?}", other)
    }

    match app.new_client().orders().await {
        Err(ClientError::Api{ status, .. }) => assert_eq!(status, 401),
        other => panic!("expected unauthenticated, got {:?}", other)
    }
}

#[actix_web::test]
pub async fn someone_elses_order_is_not_found(){
    let app = TestApp::spawn_app().await;
    let (owner, _) = app.signed_up(UserRole::Owner).await;
    let (alice, _) = app.signed_up(UserRole::Customer).await;
    let (bob, _) = app.signed_up(UserRole::Customer).await;
    let (_, menu) = open_restaurant(&owner).await;
    let address = add_address(&alice).await;

    let mut cart = Cart::new();
    cart.add_item(&menu[0], 1);
    let placed = alice.place_order(&cart, address.id).await.unwrap();

    match bob.order(placed.order.id).await {
        Err(ClientError::Api{ status, .. }) => assert_eq!(status, 404),
        other => panic!("expected not found, got {:?}", other)
    }
    assert!(bob.orders().await.unwrap().is_empty());
}

#[actix_web::test]
pub async fn failed_line_insert_rolls_back_the_whole_order(){
    let app = TestApp::spawn_app().await;
    let (owner, _) = app.signed_up(UserRole::Owner).await;
    let (customer, customer_user) = app.signed_up(UserRole::Customer).await;
    let (_, menu) = open_restaurant(&owner).await;
    let address = add_address(&customer).await;

    let lines = vec![
        OrderLine{ item_id: menu[0].id, quantity: 2, price_snapshot: 999 },
        // no such item, the foreign key rejects the second insert
        OrderLine{ item_id: 987654, quantity: 1, price_snapshot: 499 }
    ];

    let conn = app.pool.get().unwrap();
    let outcome = create_order_with_items(conn, customer_user.id, address.id, lines).await;

    assert!(outcome.is_err());
    assert_eq!(app.order_count(), 0);
    assert_eq!(app.order_item_count(), 0);
}
