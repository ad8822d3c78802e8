use food_ordering::{client::ClientError, domain::UserRole};

use crate::helpers::{password, random_email, TestApp};

#[actix_web::test]
async fn register_returns_201_with_user_and_session_cookie(){
    let app = TestApp::spawn_app().await;
    let email = random_email();

    let response = app.api_client.post(format!("{}/api/auth/register", app.get_app_url()))
                    .json(&serde_json::json!({
                        "email": email,
                        "password": "password123",
                        "role": "customer"
                    }))
                    .send()
                    .await
                    .expect("Failed to send request to register endpoint");

    assert_eq!(response.status().as_u16(), 201);

    let cookie = response.cookies().find(|c| c.name() == "food_session");
    let cookie = cookie.expect("No session cookie set");
    assert!(cookie.http_only());
    assert!(cookie.same_site_lax());
    assert_eq!(cookie.max_age(), Some(std::time::Duration::from_secs(24 * 60 * 60)));
    assert_eq!(app.session_count(), 1);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["user"]["email"], email.as_str());
    assert_eq!(body["user"]["role"], "customer");
    assert!(body["user"].get("password_hash").is_none());

    let me = app.api_client.get(format!("{}/api/users/me", app.get_app_url()))
                .send()
                .await
                .unwrap();
    assert_eq!(me.status().as_u16(), 200);
}

#[actix_web::test]
async fn registering_the_same_email_twice_is_a_conflict(){
    let app = TestApp::spawn_app().await;
    let email = random_email();

    let first = app.new_client();
    first.register(&email, &password(), UserRole::Customer).await.unwrap();

    let second = app.new_client();
    let outcome = second.register(&email, &password(), UserRole::Owner).await;

    match outcome {
        Err(ClientError::Api{ status, body }) => {
            assert_eq!(status, 400);
            assert_eq!(body.error.as_deref(), Some("Email already in use"));
        },
        other => panic!("expected conflict, got {:?}", other)
    }
}

#[actix_web::test]
async fn register_rejects_invalid_fields(){
    let app = TestApp::spawn_app().await;

    let test_cases = vec![
        (serde_json::json!({ "email": "not-an-email", "password": "password123", "role": "customer" }), "email"),
        (serde_json::json!({ "email": random_email(), "password": "12345", "role": "customer" }), "password"),
        (serde_json::json!({ "email": random_email(), "password": "password123", "role": "admin" }), "role"),
        (serde_json::json!({ "email": random_email(), "role": "owner" }), "password"),
    ];

    for (body, field) in test_cases {
        let response = app.api_client.post(format!("{}/api/auth/register", app.get_app_url()))
                        .json(&body)
                        .send()
                        .await
                        .unwrap();

        assert_eq!(response.status().as_u16(), 400, "payload {}", body);

        let errors: serde_json::Value = response.json().await.unwrap();
        assert_eq!(errors["errors"][0]["param"], field, "payload {}", body);
    }
}
