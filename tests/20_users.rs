mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use hungry_food_api::database::{Collection, DocumentStore, Filter};

#[tokio::test]
async fn registering_twice_inserts_once() -> Result<()> {
    let server = common::spawn_server().await?;
    let user = json!({ "email": "new@hungry.test", "name": "New Diner" });

    let res = server.client.post(server.url("/users")).json(&user).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let first = res.json::<Value>().await?;
    assert_eq!(first["acknowledged"], true);
    assert!(first["insertedId"].is_string());

    let res = server.client.post(server.url("/users")).json(&user).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let second = res.json::<Value>().await?;
    assert_eq!(second, json!({ "message": "User already exists!" }));

    assert_eq!(server.store.count(Collection::Users).await, 1);
    Ok(())
}

#[tokio::test]
async fn registration_cannot_choose_a_role() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server
        .client
        .post(server.url("/users"))
        .json(&json!({ "email": "sneaky@hungry.test", "role": "admin" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let stored = server
        .store
        .find_one(Collection::Users, &Filter::eq("email", "sneaky@hungry.test"))
        .await?
        .expect("user stored");
    assert!(stored.get("role").is_none());

    let token = server.token_for("sneaky@hungry.test").await?;
    let res = server.client.get(server.url("/users")).bearer_auth(token).send().await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn registration_requires_email() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server
        .client
        .post(server.url("/users"))
        .json(&json!({ "name": "Nameless" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(server.store.count(Collection::Users).await, 0);
    Ok(())
}

#[tokio::test]
async fn admin_check_reports_own_role() -> Result<()> {
    let server = common::spawn_server().await?;
    server.seed_user("diner@hungry.test", None).await?;
    server.seed_user("admin@hungry.test", Some("admin")).await?;

    let diner = server.token_for("diner@hungry.test").await?;
    let res = server
        .client
        .get(server.url("/users/admin/diner@hungry.test"))
        .bearer_auth(&diner)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({ "admin": false }));

    let admin = server.token_for("admin@hungry.test").await?;
    let res = server
        .client
        .get(server.url("/users/admin/admin@hungry.test"))
        .bearer_auth(&admin)
        .send()
        .await?;
    assert_eq!(res.json::<Value>().await?, json!({ "admin": true }));
    Ok(())
}

#[tokio::test]
async fn admin_check_for_someone_else_is_false_not_an_error() -> Result<()> {
    let server = common::spawn_server().await?;
    server.seed_user("admin@hungry.test", Some("admin")).await?;
    server.seed_user("diner@hungry.test", None).await?;

    let diner = server.token_for("diner@hungry.test").await?;
    let res = server
        .client
        .get(server.url("/users/admin/admin@hungry.test"))
        .bearer_auth(&diner)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({ "admin": false }));

    let res = server
        .client
        .get(server.url("/users/admin/admin@hungry.test"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn promoted_user_becomes_admin() -> Result<()> {
    let server = common::spawn_server().await?;
    let admin = server.admin_token().await?;
    let diner_id = server.seed_user("diner@hungry.test", None).await?;

    let res = server
        .client
        .patch(server.url(&format!("/users/admin/{}", diner_id)))
        .bearer_auth(&admin)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let result = res.json::<Value>().await?;
    assert_eq!(result["matchedCount"], 1);
    assert_eq!(result["modifiedCount"], 1);

    let diner = server.token_for("diner@hungry.test").await?;
    let res = server
        .client
        .get(server.url("/users/admin/diner@hungry.test"))
        .bearer_auth(&diner)
        .send()
        .await?;
    assert_eq!(res.json::<Value>().await?, json!({ "admin": true }));

    // promotion is a set, not a toggle
    let res = server
        .client
        .patch(server.url(&format!("/users/admin/{}", diner_id)))
        .bearer_auth(&admin)
        .send()
        .await?;
    let result = res.json::<Value>().await?;
    assert_eq!(result["matchedCount"], 1);
    assert_eq!(result["modifiedCount"], 0);
    Ok(())
}

#[tokio::test]
async fn promotion_requires_an_admin_caller() -> Result<()> {
    let server = common::spawn_server().await?;
    let diner_id = server.seed_user("diner@hungry.test", None).await?;
    let diner = server.token_for("diner@hungry.test").await?;

    let res = server
        .client
        .patch(server.url(&format!("/users/admin/{}", diner_id)))
        .bearer_auth(&diner)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = server
        .client
        .get(server.url("/users/admin/diner@hungry.test"))
        .bearer_auth(&diner)
        .send()
        .await?;
    assert_eq!(res.json::<Value>().await?, json!({ "admin": false }));
    Ok(())
}

#[tokio::test]
async fn promotion_validates_ids() -> Result<()> {
    let server = common::spawn_server().await?;
    let admin = server.admin_token().await?;

    let res = server
        .client
        .patch(server.url("/users/admin/not-an-id"))
        .bearer_auth(&admin)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = server
        .client
        .patch(server.url(&format!("/users/admin/{}", Uuid::new_v4())))
        .bearer_auth(&admin)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?["matchedCount"], 0);
    Ok(())
}
