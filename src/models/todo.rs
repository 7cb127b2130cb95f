use serde::{Deserialize, Serialize};
use validator::Validate;

/// A single entry in a user's todo list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Unique within the owning user's list only.
    pub id: u64,
    #[serde(rename = "todo")]
    pub text: String,
    pub completed: bool,
}

/// Body of `POST /users/todos`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TodoInput {
    /// The todo text. Must be between 1 and 1000 characters.
    #[validate(length(min = 1, max = 1000))]
    pub todo: String,
    #[serde(default)]
    pub completed: bool,
}

/// Partial update for a todo, also the body of `PUT /users/todos/{id}`.
///
/// Only non-empty text and `completed: true` overwrite the stored item.
/// An empty string or `false` reads the same as an omitted field, so an
/// update can never clear the text or un-complete an item.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct TodoPatch {
    #[validate(length(max = 1000))]
    pub todo: Option<String>,
    pub completed: Option<bool>,
}

impl TodoPatch {
    pub(crate) fn apply_to(self, item: &mut TodoItem) {
        if let Some(text) = self.todo.filter(|t| !t.is_empty()) {
            item.text = text;
        }
        if self.completed == Some(true) {
            item.completed = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> TodoItem {
        TodoItem {
            id: 1,
            text: "water the plants".into(),
            completed: false,
        }
    }

    #[test]
    fn test_todo_serializes_with_todo_key() {
        let json = serde_json::to_value(item()).unwrap();
        assert_eq!(json["todo"], "water the plants");
        assert_eq!(json["id"], 1);
        assert_eq!(json["completed"], false);
    }

    #[test]
    fn test_todo_input_validation() {
        let valid: TodoInput = serde_json::from_str(r#"{"todo": "buy milk"}"#).unwrap();
        assert!(valid.validate().is_ok());
        assert!(!valid.completed);

        let empty = TodoInput {
            todo: String::new(),
            completed: false,
        };
        assert!(empty.validate().is_err());

        let too_long = TodoInput {
            todo: "a".repeat(1001),
            completed: false,
        };
        assert!(too_long.validate().is_err());
    }

    #[test]
    fn test_patch_completed_keeps_text() {
        let mut todo = item();
        TodoPatch {
            completed: Some(true),
            ..Default::default()
        }
        .apply_to(&mut todo);

        assert!(todo.completed);
        assert_eq!(todo.text, "water the plants");
    }

    #[test]
    fn test_patch_cannot_reset_fields() {
        let mut todo = item();
        todo.completed = true;
        TodoPatch {
            todo: Some(String::new()),
            completed: Some(false),
        }
        .apply_to(&mut todo);

        assert!(todo.completed);
        assert_eq!(todo.text, "water the plants");
    }
}
