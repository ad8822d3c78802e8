use std::time::Duration as StdDuration;

use actix_web::web;
use chrono::{Duration, Utc};
use diesel::{QueryDsl, RunQueryDsl};
use food_ordering::{db_interaction::delete_expired_sessions, models::SessionRecord, schema::sessions, session_store::prune_expired_sessions};

use crate::helpers::TestApp;

fn insert_session(app: &TestApp, key: &str, expires_in: Duration) {
    let mut conn = app.pool.get().unwrap();

    diesel::insert_into(sessions::table)
        .values(&SessionRecord{
            session_key: key.to_string(),
            state: "{}".to_string(),
            expires_at: Utc::now() + expires_in
        })
        .execute(&mut conn)
        .unwrap();
}

fn remaining_keys(app: &TestApp) -> Vec<String> {
    let mut conn = app.pool.get().unwrap();

    sessions::table
        .select(sessions::session_key)
        .order(sessions::session_key)
        .load::<String>(&mut conn)
        .unwrap()
}

#[actix_web::test]
async fn expired_sessions_are_deleted_without_a_lookup(){
    let app = TestApp::spawn_app().await;
    insert_session(&app, "abandoned", -Duration::hours(1));
    insert_session(&app, "live", Duration::hours(1));

    let removed = delete_expired_sessions(app.pool.get().unwrap())
        .await
        .unwrap();

    assert_eq!(removed, 1);
    assert_eq!(remaining_keys(&app), vec!["live"]);
}

#[actix_web::test]
async fn pruning_task_clears_abandoned_sessions(){
    let app = TestApp::spawn_app().await;
    insert_session(&app, "abandoned", -Duration::minutes(5));
    insert_session(&app, "live", Duration::hours(1));

    let pruning = actix_web::rt::spawn(prune_expired_sessions(
        web::Data::new(app.pool.clone()),
        StdDuration::from_millis(50)
    ));
    tokio::time::sleep(StdDuration::from_millis(500)).await;
    pruning.abort();

    assert_eq!(remaining_keys(&app), vec!["live"]);
}
