use food_ordering::{client::{ClientError, ItemInput, RestaurantInput}, domain::UserRole};

use crate::helpers::{open_restaurant, random_email, TestApp};

fn status_of<T: std::fmt::Debug>(outcome: Result<T, ClientError>) -> u16 {
    match outcome {
        Err(ClientError::Api{ status, .. }) => status,
        other => panic!("expected api error, got {:?}", other)
    }
}

fn renamed() -> RestaurantInput {
    RestaurantInput{
        name: "Tastier Bites".into(),
        description: None
    }
}

#[actix_web::test]
async fn restaurant_details_list_the_menu_in_order(){
    let app = TestApp::spawn_app().await;
    let (owner, owner_user) = app.signed_up(UserRole::Owner).await;
    let (restaurant, menu) = open_restaurant(&owner).await;

    let visitor = app.new_client();
    let details = visitor.restaurant(restaurant.id).await.unwrap();

    assert_eq!(details.restaurant.owner_id, owner_user.id);
    assert_eq!(details.items, menu);
    assert_eq!(details.items[0].name, "Burger");
    assert_eq!(details.items[0].price, 999);

    let listed = visitor.restaurants().await.unwrap();
    assert_eq!(listed, vec![restaurant]);
}

#[actix_web::test]
async fn missing_restaurant_is_not_found(){
    let app = TestApp::spawn_app().await;

    let response = app.api_client.get(format!("{}/api/restaurants/4242", app.get_app_url()))
                    .send()
                    .await
                    .unwrap();

    assert_eq!(response.status().as_u16(), 404);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "error": "Restaurant not found" }));
}

#[actix_web::test]
async fn customers_cannot_create_restaurants(){
    let app = TestApp::spawn_app().await;
    let (customer, _) = app.signed_up(UserRole::Customer).await;

    match customer.create_restaurant(&renamed()).await {
        Err(ClientError::Api{ status, body }) => {
            assert_eq!(status, 403);
            assert_eq!(body.error.as_deref(), Some("Forbidden: wrong role"));
        },
        other => panic!("expected forbidden, got {:?}", other)
    }

    assert_eq!(status_of(app.new_client().create_restaurant(&renamed()).await), 401);
}

#[actix_web::test]
async fn mine_lists_only_the_callers_restaurants(){
    let app = TestApp::spawn_app().await;
    let (owner, _) = app.signed_up(UserRole::Owner).await;
    let (rival, _) = app.signed_up(UserRole::Owner).await;

    let (mine, _) = open_restaurant(&owner).await;
    open_restaurant(&rival).await;

    assert_eq!(owner.my_restaurants().await.unwrap(), vec![mine]);
    assert_eq!(app.new_client().restaurants().await.unwrap().len(), 2);
}

#[actix_web::test]
async fn only_the_owner_can_update_a_restaurant(){
    let app = TestApp::spawn_app().await;
    let (owner, _) = app.signed_up(UserRole::Owner).await;
    let (rival, _) = app.signed_up(UserRole::Owner).await;
    let (restaurant, _) = open_restaurant(&owner).await;

    assert_eq!(status_of(rival.update_restaurant(restaurant.id, &renamed()).await), 404);
    assert_eq!(status_of(owner.update_restaurant(9999, &renamed()).await), 404);

    let updated = owner.update_restaurant(restaurant.id, &renamed()).await.unwrap();
    assert_eq!(updated.name, "Tastier Bites");
    assert_eq!(updated.description, None);
}

#[actix_web::test]
async fn only_the_owner_can_change_the_menu(){
    let app = TestApp::spawn_app().await;
    let (owner, _) = app.signed_up(UserRole::Owner).await;
    let (rival, _) = app.signed_up(UserRole::Owner).await;
    let (restaurant, menu) = open_restaurant(&owner).await;
    let (rival_restaurant, _) = open_restaurant(&rival).await;

    let cheaper = ItemInput{
        name: "Burger".into(),
        description: Some("Now cheaper".into()),
        price: 899
    };

    assert_eq!(status_of(rival.create_item(restaurant.id, &cheaper).await), 404);
    assert_eq!(status_of(rival.update_item(restaurant.id, menu[0].id, &cheaper).await), 404);
    assert_eq!(status_of(rival.delete_item(restaurant.id, menu[0].id).await), 404);
    // the rival's own restaurant id does not unlock someone else's item
    assert_eq!(status_of(rival.delete_item(rival_restaurant.id, menu[0].id).await), 404);

    let updated = owner.update_item(restaurant.id, menu[0].id, &cheaper).await.unwrap();
    assert_eq!(updated.price, 899);

    owner.delete_item(restaurant.id, menu[1].id).await.unwrap();
    let details = owner.restaurant(restaurant.id).await.unwrap();
    assert_eq!(details.items, vec![updated]);
}

#[actix_web::test]
async fn item_price_must_be_positive(){
    let app = TestApp::spawn_app().await;
    let (owner, _) = app.signed_up(UserRole::Owner).await;
    let (restaurant, _) = open_restaurant(&owner).await;

    let free = ItemInput{
        name: "Water".into(),
        description: None,
        price: 0
    };

    match owner.create_item(restaurant.id, &free).await {
        Err(ClientError::Api{ status, body }) => {
            assert_eq!(status, 400);
            assert_eq!(body.errors[0].param, "price");
            assert_eq!(body.errors[0].msg, "Price must be a positive integer (cents)");
        },
        other => panic!("expected validation error, got {:?}", other)
    }
}

#[actix_web::test]
async fn fractional_price_is_a_price_error(){
    let app = TestApp::spawn_app().await;

    app.api_client.post(format!("{}/api/auth/register", app.get_app_url()))
        .json(&serde_json::json!({ "email": random_email(), "password": "password123", "role": "owner" }))
        .send()
        .await
        .unwrap();
    let created: serde_json::Value = app.api_client.post(format!("{}/api/restaurants", app.get_app_url()))
        .json(&serde_json::json!({ "name": "Tasty Bites" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let restaurant_id = &created["restaurant"]["id"];

    let response = app.api_client.post(format!("{}/api/restaurants/{}/items", app.get_app_url(), restaurant_id))
        .json(&serde_json::json!({ "name": "Burger", "price": 9.99 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["errors"][0]["param"], "price");
    assert_eq!(body["errors"][0]["msg"], "Price must be a positive integer (cents)");
}

#[actix_web::test]
async fn non_integer_item_id_names_the_item_segment(){
    let app = TestApp::spawn_app().await;

    app.api_client.post(format!("{}/api/auth/register", app.get_app_url()))
        .json(&serde_json::json!({ "email": random_email(), "password": "password123", "role": "owner" }))
        .send()
        .await
        .unwrap();

    let response = app.api_client.put(format!("{}/api/restaurants/1/items/abc", app.get_app_url()))
        .json(&serde_json::json!({ "name": "Burger", "price": 999 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["errors"][0]["param"], "item_id");
    assert_eq!(body["errors"][0]["msg"], "item_id must be an integer");
}
