/// Integration tests for the signed-in task list
///
/// Cover the access guard and ownership scoping end to end.

mod common;

use axum::http::StatusCode;
use common::{body_json, location, TestContext};
use ticklist_shared::store::UserStore;

async fn task_list(ctx: &TestContext, session: &str) -> serde_json::Value {
    let response = ctx.get("/tasks", Some(session)).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

#[tokio::test]
async fn test_task_lifecycle() {
    let ctx = TestContext::new();
    let ada = ctx.signed_in_user("Ada", "ada@x.com").await;

    let response = ctx.post_form("/add", &[("title", "buy milk")], Some(&ada)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/tasks");

    let body = task_list(&ctx, &ada).await;
    assert_eq!(body["name"], "Ada");
    let tasks = body["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "buy milk");
    assert_eq!(tasks[0]["complete"], false);
    assert!(tasks[0].get("user_id").is_none());
    let id = tasks[0]["id"].as_i64().unwrap();

    let response = ctx.get(&format!("/update/{}", id), Some(&ada)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(task_list(&ctx, &ada).await["tasks"][0]["complete"], true);

    let response = ctx.get(&format!("/delete/{}", id), Some(&ada)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(task_list(&ctx, &ada).await["tasks"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_toggle_twice_restores_state() {
    let ctx = TestContext::new();
    let ada = ctx.signed_in_user("Ada", "ada@x.com").await;
    ctx.post_form("/add", &[("title", "walk dog")], Some(&ada)).await;
    let id = task_list(&ctx, &ada).await["tasks"][0]["id"].as_i64().unwrap();

    ctx.get(&format!("/update/{}", id), Some(&ada)).await;
    ctx.get(&format!("/update/{}", id), Some(&ada)).await;

    assert_eq!(task_list(&ctx, &ada).await["tasks"][0]["complete"], false);
}

#[tokio::test]
async fn test_blank_title_is_rejected() {
    let ctx = TestContext::new();
    let ada = ctx.signed_in_user("Ada", "ada@x.com").await;

    let response = ctx.post_form("/add", &[("title", "   ")], Some(&ada)).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["details"][0]["field"], "title");

    let too_long = "x".repeat(101);
    let response = ctx.post_form("/add", &[("title", &too_long)], Some(&ada)).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    assert!(task_list(&ctx, &ada).await["tasks"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_other_users_tasks_are_invisible() {
    let ctx = TestContext::new();
    let ada = ctx.signed_in_user("Ada", "ada@x.com").await;
    let bob = ctx.signed_in_user("Bob", "bob@x.com").await;

    ctx.post_form("/add", &[("title", "buy milk")], Some(&ada)).await;
    let id = task_list(&ctx, &ada).await["tasks"][0]["id"].as_i64().unwrap();

    assert!(task_list(&ctx, &bob).await["tasks"].as_array().unwrap().is_empty());

    let response = ctx.get(&format!("/update/{}", id), Some(&bob)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "Task not found");

    let response = ctx.get(&format!("/delete/{}", id), Some(&bob)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let tasks = task_list(&ctx, &ada).await;
    assert_eq!(tasks["tasks"].as_array().unwrap().len(), 1);
    assert_eq!(tasks["tasks"][0]["complete"], false);
}

#[tokio::test]
async fn test_missing_and_malformed_ids_are_not_found() {
    let ctx = TestContext::new();
    let ada = ctx.signed_in_user("Ada", "ada@x.com").await;

    assert_eq!(ctx.get("/update/999", Some(&ada)).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(ctx.get("/delete/abc", Some(&ada)).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_anonymous_requests_are_redirected() {
    let ctx = TestContext::new();
    let ada = ctx.signed_in_user("Ada", "ada@x.com").await;
    ctx.post_form("/add", &[("title", "buy milk")], Some(&ada)).await;
    let id = task_list(&ctx, &ada).await["tasks"][0]["id"].as_i64().unwrap();

    for uri in ["/tasks".to_string(), format!("/update/{}", id), format!("/delete/{}", id)] {
        let response = ctx.get(&uri, None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{}", uri);
        assert_eq!(location(&response), "/sign-in");
    }

    let response = ctx.post_form("/add", &[("title", "sneaky")], None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/sign-in");

    let tasks = task_list(&ctx, &ada).await;
    assert_eq!(tasks["tasks"].as_array().unwrap().len(), 1);
    assert_eq!(tasks["tasks"][0]["complete"], false);
}

#[tokio::test]
async fn test_anonymous_add_redirects_whatever_the_body() {
    let ctx = TestContext::new();

    let json = ctx
        .post_raw("/add", Some("application/json"), r#"{"title":"sneaky"}"#, None)
        .await;
    assert_eq!(json.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&json), "/sign-in");

    let bare = ctx.post_raw("/add", None, "", None).await;
    assert_eq!(bare.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&bare), "/sign-in");
}

#[tokio::test]
async fn test_non_form_add_is_json_bad_request() {
    let ctx = TestContext::new();
    let ada = ctx.signed_in_user("Ada", "ada@x.com").await;

    let response = ctx
        .post_raw("/add", Some("application/json"), r#"{"title":"buy milk"}"#, Some(&ada))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "bad_request");
    assert!(body["message"].is_string());
    assert!(task_list(&ctx, &ada).await["tasks"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_session_of_removed_user_is_denied() {
    let ctx = TestContext::new();
    let ada = ctx.signed_in_user("Ada", "ada@x.com").await;
    let user = ctx
        .store
        .find_user_by_email("ada@x.com")
        .await
        .unwrap()
        .unwrap();

    ctx.store.remove_user(user.id);

    let response = ctx.get("/tasks", Some(&ada)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/sign-in");
}
