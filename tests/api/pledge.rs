use crate::helpers::{
    approve, create_task, get_error_message, get_json_response_body,
    get_task, member_credits, pledge, TestApp, ALICE, BOB, CHARLIE,
};
use serde_json::json;
use test_context::test_context;

#[test_context(TestApp)]
#[tokio::test]
async fn should_move_credits_from_member_to_task(app: &mut TestApp) {
    let task_id = create_task(app, "Water plants", ALICE).await;

    let response = app
        .post_pledge(task_id, &json!({ "memberId": BOB, "amount": 20 }))
        .await;
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        get_json_response_body(response).await,
        json!({ "taskId": task_id, "memberId": BOB, "pledged": 20 })
    );

    assert_eq!(member_credits(app, BOB).await, 60);
    assert_eq!(get_task(app, task_id).await["pledgedCredits"], 20);

    pledge(app, task_id, CHARLIE, 15).await;
    assert_eq!(member_credits(app, CHARLIE).await, 85);
    assert_eq!(get_task(app, task_id).await["pledgedCredits"], 35);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_allow_pledging_entire_balance(app: &mut TestApp) {
    let task_id = create_task(app, "Water plants", ALICE).await;

    pledge(app, task_id, BOB, 80).await;
    assert_eq!(member_credits(app, BOB).await, 0);

    let response = app
        .post_pledge(task_id, &json!({ "memberId": BOB, "amount": 1 }))
        .await;
    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(get_error_message(response).await, "Insufficient credits");
    assert_eq!(member_credits(app, BOB).await, 0);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_400_if_insufficient_credits(app: &mut TestApp) {
    let task_id = create_task(app, "Water plants", ALICE).await;

    let test_cases = [
        json!({ "memberId": BOB, "amount": 81 }),
        json!({ "memberId": 99, "amount": 10 }),
    ];

    for test_case in test_cases.iter() {
        let response = app.post_pledge(task_id, test_case).await;
        assert_eq!(
            response.status().as_u16(),
            400,
            "Should fail with HTTP400 for input: {test_case}"
        );
        assert_eq!(get_error_message(response).await, "Insufficient credits");
    }

    assert_eq!(member_credits(app, BOB).await, 80);
    assert_eq!(get_task(app, task_id).await["pledgedCredits"], 0);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_400_if_task_missing_or_completed(app: &mut TestApp) {
    let response = app
        .post_pledge(42, &json!({ "memberId": BOB, "amount": 10 }))
        .await;
    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(get_error_message(response).await, "Invalid task");

    let task_id = create_task(app, "Water plants", ALICE).await;
    pledge(app, task_id, BOB, 10).await;
    approve(app, task_id, ALICE).await;
    let response = app
        .post_complete(task_id, &json!({ "memberId": CHARLIE }))
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let response = app
        .post_pledge(task_id, &json!({ "memberId": BOB, "amount": 10 }))
        .await;
    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(get_error_message(response).await, "Invalid task");
    assert_eq!(member_credits(app, BOB).await, 70);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_400_if_amount_not_positive(app: &mut TestApp) {
    let task_id = create_task(app, "Water plants", ALICE).await;

    for amount in [0, -5] {
        let response = app
            .post_pledge(task_id, &json!({ "memberId": BOB, "amount": amount }))
            .await;
        assert_eq!(response.status().as_u16(), 400);
        assert_eq!(
            get_error_message(response).await,
            format!("Pledge amount must be a positive integer: {amount}")
        );
    }
    assert_eq!(member_credits(app, BOB).await, 80);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_reject_malformed_requests(app: &mut TestApp) {
    let task_id = create_task(app, "Water plants", ALICE).await;

    let test_cases = [
        json!({ "memberId": BOB, "amount": "ten" }),
        json!({ "memberId": BOB }),
        json!({ "amount": 10 }),
    ];
    for test_case in test_cases.iter() {
        let response = app.post_pledge(task_id, test_case).await;
        assert_eq!(
            response.status().as_u16(),
            422,
            "Failed for input: {test_case}"
        );
        assert_eq!(get_error_message(response).await, "Malformed request body");
    }

    for bad_id in ["not-a-number", "1.5", "abc"] {
        let response = app
            .post_pledge(bad_id, &json!({ "memberId": BOB, "amount": 10 }))
            .await;
        assert_eq!(response.status().as_u16(), 400);
        assert_eq!(get_error_message(response).await, "Invalid task");
    }

    assert_eq!(member_credits(app, BOB).await, 80);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_treat_non_positive_ids_as_unknown(app: &mut TestApp) {
    let task_id = create_task(app, "Water plants", ALICE).await;

    for task in [0, -3] {
        let response = app
            .post_pledge(task, &json!({ "memberId": BOB, "amount": 10 }))
            .await;
        assert_eq!(response.status().as_u16(), 400);
        assert_eq!(get_error_message(response).await, "Invalid task");
    }

    let response = app
        .post_pledge(task_id, &json!({ "memberId": 0, "amount": 10 }))
        .await;
    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(get_error_message(response).await, "Insufficient credits");
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_not_lose_concurrent_pledges(app: &mut TestApp) {
    let task_id = create_task(app, "Water plants", ALICE).await;

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let member_id = if i % 2 == 0 { ALICE } else { CHARLIE };
            let client = app.http_client.clone();
            let url = format!("{}/api/tasks/{}/pledge", app.address, task_id);
            tokio::spawn(async move {
                client
                    .post(url)
                    .json(&json!({ "memberId": member_id, "amount": 5 }))
                    .send()
                    .await
                    .expect("Failed to execute request")
            })
        })
        .collect();
    for handle in handles {
        let response = handle.await.expect("request task panicked");
        assert_eq!(response.status().as_u16(), 200);
    }

    assert_eq!(member_credits(app, ALICE).await, 50);
    assert_eq!(member_credits(app, CHARLIE).await, 50);
    assert_eq!(get_task(app, task_id).await["pledgedCredits"], 100);
}
