use super::ValidationError;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskTitle(String);

impl TaskTitle {
    pub fn parse(title: &str) -> Result<Self, ValidationError> {
        match title.trim().chars().count() {
            x if x < 1 => Err(ValidationError::new(
                "Task title cannot be empty".to_string(),
            )),
            _ if title.chars().count() > 255 => Err(ValidationError::new(
                "Max title length is 255 characters".to_string(),
            )),
            _ => Ok(Self(title.to_owned())),
        }
    }
}

impl AsRef<String> for TaskTitle {
    fn as_ref(&self) -> &String {
        &self.0
    }
}

#[test]
fn test_valid_task_titles() {
    let valid_titles = ["Water plants".to_string(), "a".repeat(255)];
    for valid_title in valid_titles.iter() {
        let parsed = TaskTitle::parse(valid_title)
            .expect("Failed to parse valid task title");

        assert_eq!(parsed.as_ref(), valid_title);
    }
}

#[test]
fn test_blank_task_titles() {
    for blank in ["", "   "] {
        let result = TaskTitle::parse(blank);
        assert_eq!(result.unwrap_err().as_ref(), "Task title cannot be empty");
    }
}

#[test]
fn test_long_task_titles() {
    let result = TaskTitle::parse(&"a".repeat(256));
    assert_eq!(
        result.unwrap_err().as_ref(),
        "Max title length is 255 characters"
    );
}
