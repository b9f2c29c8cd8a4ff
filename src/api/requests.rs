//! Request bodies for the board and todo routes.
//!
//! Update bodies are partial: a field left out of the JSON is `None` and
//! leaves the stored value alone. `dueDate` additionally tells `null`
//! (clear the date) apart from absence, hence its nested `Option`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::database::models::{Board, Priority, Todo};
use crate::error::ApiError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBoardRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl CreateBoardRequest {
    pub fn into_board(self, owner: &str) -> Result<Board, ApiError> {
        let title = required_title(self.title, "Board title is required")?;
        let description = self.description.map(|d| d.trim().to_string()).unwrap_or_default();
        let color = self
            .color
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| Board::DEFAULT_COLOR.to_string());

        Ok(Board::new(owner, title, description, color))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBoardRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl UpdateBoardRequest {
    /// Apply the present fields. Nothing is touched if validation fails.
    pub fn apply(self, board: &mut Board) -> Result<(), ApiError> {
        let title = match self.title {
            Some(title) => Some(required_title(Some(title), "Board title cannot be empty")?),
            None => None,
        };

        if let Some(title) = title {
            board.title = title;
        }
        if let Some(description) = self.description {
            board.description = description.trim().to_string();
        }
        if let Some(color) = self.color {
            board.color = color.trim().to_string();
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

/// A create request that passed field validation but whose board has not
/// been checked yet
#[derive(Debug, Clone)]
pub struct TodoDraft {
    pub title: String,
    pub description: String,
    /// Raw board reference; `None` when it is not even a valid id
    pub board_id: Option<Uuid>,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
}

impl CreateTodoRequest {
    pub fn validate(self) -> Result<TodoDraft, ApiError> {
        let title = required_title(self.title, "Todo title is required")?;

        let board_ref = self
            .board_id
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty())
            .ok_or_else(|| ApiError::bad_request("Board ID is required"))?;

        let priority = match self.priority {
            Some(p) => parse_priority(&p)?,
            None => Priority::default(),
        };

        let due_date = match self.due_date {
            Some(raw) => parse_due_date(&raw)?,
            None => None,
        };

        Ok(TodoDraft {
            title,
            description: self.description.map(|d| d.trim().to_string()).unwrap_or_default(),
            board_id: Uuid::parse_str(&board_ref).ok(),
            priority,
            due_date,
        })
    }
}

impl TodoDraft {
    pub fn into_todo(self, owner: &str, board_id: Uuid) -> Todo {
        Todo::new(owner, board_id, self.title, self.description, self.priority, self.due_date)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    /// absent = keep, `null` = clear, string = set
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<String>>,
}

impl UpdateTodoRequest {
    /// Apply the present fields. Nothing is touched if validation fails.
    pub fn apply(self, todo: &mut Todo) -> Result<(), ApiError> {
        let title = match self.title {
            Some(title) => Some(required_title(Some(title), "Todo title cannot be empty")?),
            None => None,
        };
        let priority = match self.priority {
            Some(p) => Some(parse_priority(&p)?),
            None => None,
        };
        let due_date = match self.due_date {
            Some(Some(raw)) => Some(parse_due_date(&raw)?),
            Some(None) => Some(None),
            None => None,
        };

        if let Some(title) = title {
            todo.title = title;
        }
        if let Some(description) = self.description {
            todo.description = description.trim().to_string();
        }
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
        if let Some(priority) = priority {
            todo.priority = priority;
        }
        if let Some(due_date) = due_date {
            todo.due_date = due_date;
        }
        Ok(())
    }
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn required_title(title: Option<String>, message: &'static str) -> Result<String, ApiError> {
    title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::bad_request(message))
}

fn parse_priority(raw: &str) -> Result<Priority, ApiError> {
    raw.trim()
        .parse::<Priority>()
        .map_err(|e| ApiError::bad_request(e.to_string()))
}

/// Accepts RFC 3339, a zone-less `YYYY-MM-DDTHH:MM:SS` (read as UTC) or a
/// bare `YYYY-MM-DD` (midnight UTC). Blank means no date.
pub fn parse_due_date(raw: &str) -> Result<Option<DateTime<Utc>>, ApiError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(Some(Utc.from_utc_datetime(&naive)));
    }
    if let Some(naive) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(Some(Utc.from_utc_datetime(&naive)));
    }

    Err(ApiError::bad_request(format!("Invalid due date '{}'", raw)))
}
