use food_ordering::{client::ClientError, domain::UserRole};

use crate::helpers::{add_address, sample_address, TestApp};

fn status_of<T: std::fmt::Debug>(outcome: Result<T, ClientError>) -> u16 {
    match outcome {
        Err(ClientError::Api{ status, .. }) => status,
        other => panic!("expected api error, got {:?}", other)
    }
}

#[actix_web::test]
async fn addresses_are_listed_newest_first_and_only_for_their_user(){
    let app = TestApp::spawn_app().await;
    let (alice, _) = app.signed_up(UserRole::Customer).await;
    let (bob, _) = app.signed_up(UserRole::Customer).await;

    let first = add_address(&alice).await;
    let second = add_address(&alice).await;
    add_address(&bob).await;

    let listed = alice.addresses().await.unwrap();
    let ids: Vec<i32> = listed.iter().map(|a| a.id).collect();

    assert_eq!(ids, vec![second.id, first.id]);
    assert_eq!(listed[0].postal_code, sample_address().postal_code);
}

#[actix_web::test]
async fn create_address_requires_every_field(){
    let app = TestApp::spawn_app().await;
    let (client, _) = app.signed_up(UserRole::Customer).await;

    let mut address = sample_address();
    address.city = String::new();

    match client.create_address(&address).await {
        Err(ClientError::Api{ status, body }) => {
            assert_eq!(status, 400);
            assert_eq!(body.errors.len(), 1);
            assert_eq!(body.errors[0].param, "city");
            assert_eq!(body.errors[0].msg, "City is required");
        },
        other => panic!("expected validation error, got {:?}", other)
    }
}

#[actix_web::test]
async fn deleting_someone_elses_address_is_not_found(){
    let app = TestApp::spawn_app().await;
    let (alice, _) = app.signed_up(UserRole::Customer).await;
    let (mallory, _) = app.signed_up(UserRole::Customer).await;

    let address = add_address(&alice).await;

    assert_eq!(status_of(mallory.delete_address(address.id).await), 404);
    assert_eq!(alice.addresses().await.unwrap().len(), 1);
}

#[actix_web::test]
async fn delete_removes_the_address_once(){
    let app = TestApp::spawn_app().await;
    let (client, _) = app.signed_up(UserRole::Customer).await;
    let address = add_address(&client).await;

    client.delete_address(address.id).await.unwrap();
    assert!(client.addresses().await.unwrap().is_empty());

    assert_eq!(status_of(client.delete_address(address.id).await), 404);
}

#[actix_web::test]
async fn non_integer_address_id_is_a_validation_error(){
    let app = TestApp::spawn_app().await;

    let response = app.api_client.post(format!("{}/api/auth/register", app.get_app_url()))
                    .json(&serde_json::json!({
                        "email": crate::helpers::random_email(),
                        "password": "password123",
                        "role": "customer"
                    }))
                    .send()
                    .await
                    .unwrap();
    assert_eq!(response.status().as_u16(), 201);

    let response = app.api_client.delete(format!("{}/api/addresses/abc", app.get_app_url()))
                    .send()
                    .await
                    .unwrap();

    assert_eq!(response.status().as_u16(), 400);
}
