use crate::helpers::{
    approve, create_task, get_error_message, pledge, TestApp, ALICE, BOB,
};
use reqwest::header::CONTENT_TYPE;
use test_context::test_context;

#[test_context(TestApp)]
#[tokio::test]
async fn should_render_board_for_first_member_by_default(app: &mut TestApp) {
    let response = app.get_board(None).await;
    assert_eq!(response.status().as_u16(), 200);

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    assert!(content_type.is_some_and(|ct| ct.starts_with("text/html")));

    let html = response.text().await.expect("Failed to read body");
    assert!(html.contains("Credits: 100"));
    assert!(html.contains(r#"<option value="1" selected>Alice</option>"#));
    assert!(html.contains("Charlie"));
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_show_selected_member_and_projected_payout(app: &mut TestApp) {
    let task_id = create_task(app, "Fix the <gate>", ALICE).await;
    pledge(app, task_id, BOB, 20).await;
    approve(app, task_id, ALICE).await;

    let html = app
        .get_board(Some(BOB))
        .await
        .text()
        .await
        .expect("Failed to read body");

    assert!(html.contains("Credits: 60"));
    assert!(html.contains(r#"<option value="2" selected>Bob</option>"#));
    assert!(html.contains("Fix the &lt;gate&gt;"));
    assert!(!html.contains("Fix the <gate>"));
    assert!(html.contains("Pledged: 20"));
    assert!(html.contains("Total payout if completed now: 20"));
    assert!(html.contains("Approved"));
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_fall_back_for_unknown_member(app: &mut TestApp) {
    let html = app
        .get_board(Some(42))
        .await
        .text()
        .await
        .expect("Failed to read body");

    assert!(html.contains(r#"<option value="1" selected>Alice</option>"#));
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_json_error_for_malformed_member_id(app: &mut TestApp) {
    let response = app
        .http_client
        .get(format!("{}/?memberId=alice", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(get_error_message(response).await, "Malformed query string");
}

#[tokio::test]
async fn should_render_board_without_members() {
    let app = TestApp::with_members(&[]).await;

    let response = app.get_board(None).await;
    assert_eq!(response.status().as_u16(), 200);
    let html = response.text().await.expect("Failed to read body");
    assert!(html.contains("No members"));
}
