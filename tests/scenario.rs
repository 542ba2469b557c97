//! The whole flow: two users, two roles, one employee's life cycle.

mod common;

use axum::http::{Method, StatusCode};
use common::spawn_app;
use serde_json::json;

#[tokio::test]
async fn user_and_admin_manage_an_employee() {
    let app = spawn_app().await;

    // alice is a plain user, admin registers with the admin role.
    let (status, _) = app.register("alice", "pw1", None).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = app.login("alice", "pw1").await;
    assert_eq!(status, StatusCode::OK);
    let token_a = body["token"].as_str().unwrap().to_string();

    let (status, _) = app.register("admin", "admin123", Some("admin")).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = app.login("admin", "admin123").await;
    assert_eq!(status, StatusCode::OK);
    let token_b = body["token"].as_str().unwrap().to_string();

    let bob = json!({ "name": "Bob", "position": "Eng" });

    let (status, _) = app
        .send(Method::POST, "/employees", Some(&token_a), Some(bob.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, created) = app
        .send(Method::POST, "/employees", Some(&token_b), Some(bob))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();

    let (status, list) = app.send(Method::GET, "/employees", Some(&token_a), None).await;
    assert_eq!(status, StatusCode::OK);
    let listed = list.as_array().unwrap();
    assert!(listed.iter().any(|e| e["id"] == id.as_str() && e["name"] == "Bob"));

    let uri = format!("/employees/{id}");
    let (status, _) = app.send(Method::DELETE, &uri, Some(&token_a), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.send(Method::DELETE, &uri, Some(&token_b), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, list) = app.send(Method::GET, "/employees", Some(&token_a), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(list.as_array().unwrap().iter().all(|e| e["name"] != "Bob"));
}
