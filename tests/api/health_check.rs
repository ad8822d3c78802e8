use crate::helpers::TestApp;

#[actix_web::test]
async fn health_check_works(){
    let app = TestApp::spawn_app().await;

    let response = app.api_client.get(format!("{}/api/health", app.get_app_url()))
                    .send()
                    .await
                    .expect("Failed to send request to health endpoint");

    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "status": "ok" }));
}
