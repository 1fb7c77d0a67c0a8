use serde::Serialize;

use super::{Credits, MemberId, TaskId, TaskTitle};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    pub id: TaskId,
    pub title: TaskTitle,
    #[serde(rename = "creatorId")]
    pub creator_id: MemberId,
    #[serde(rename = "pledgedCredits")]
    pub pledged_credits: Credits,
    pub approved: bool,
    pub completed: bool,
    #[serde(rename = "completedBy")]
    pub completed_by: Option<MemberId>,
}

impl Task {
    pub fn new(id: TaskId, title: TaskTitle, creator_id: MemberId) -> Self {
        Self {
            id,
            title,
            creator_id,
            pledged_credits: Credits::ZERO,
            approved: false,
            completed: false,
            completed_by: None,
        }
    }
}

#[test]
fn test_new_task_serialises_with_client_field_names() {
    let task = Task::new(
        TaskId::new(3),
        TaskTitle::parse("Water plants").unwrap(),
        MemberId::new(1),
    );

    assert_eq!(
        serde_json::to_value(&task).unwrap(),
        serde_json::json!({
            "id": 3,
            "title": "Water plants",
            "creatorId": 1,
            "pledgedCredits": 0,
            "approved": false,
            "completed": false,
            "completedBy": null
        })
    );
}
