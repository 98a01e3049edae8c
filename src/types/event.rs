use super::Credential;
use crate::error::CredwatchError;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Wire envelope pushed by the backend for each row change:
/// `{ "data": { "type": ..., "record": ..., "old_record": ... } }`.
#[derive(Debug, Deserialize)]
struct EventEnvelope {
    data: EventData,
}

#[derive(Debug, Deserialize)]
struct EventData {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    record: Option<Credential>,
    #[serde(default)]
    old_record: Option<DeletedRow>,
    #[serde(default)]
    commit_timestamp: Option<DateTime<Utc>>,
}

/// Snapshot of a deleted row. Delete notifications may carry only the key
/// columns, so the password is optional here.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeletedRow {
    pub email: String,
    #[serde(default)]
    pub password: Option<String>,
}

/// A row change on the watched table, decoded once at the wire boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeEvent {
    Insert {
        row: Credential,
        at: Option<DateTime<Utc>>,
    },
    Update {
        row: Credential,
        at: Option<DateTime<Utc>>,
    },
    Delete {
        old_row: DeletedRow,
        at: Option<DateTime<Utc>>,
    },
}

impl ChangeEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            ChangeEvent::Insert { .. } => "INSERT",
            ChangeEvent::Update { .. } => "UPDATE",
            ChangeEvent::Delete { .. } => "DELETE",
        }
    }

    /// Human-readable line the listener callback prints for this event.
    /// Inserts and updates report the post-change row; deletes report the
    /// pre-deletion snapshot.
    pub fn describe(&self) -> String {
        match self {
            ChangeEvent::Insert { row, .. } | ChangeEvent::Update { row, .. } => {
                format!("updated record: email={} password={}", row.email, row.password)
            }
            ChangeEvent::Delete { old_row, .. } => {
                format!("record deleted: email={}", old_row.email)
            }
        }
    }
}

/// Decode one raw event payload into the tagged union. An unknown event
/// type or a missing row snapshot is a decode error, surfaced to the reader
/// task which logs and skips the event.
pub fn decode_change(payload: &str) -> Result<ChangeEvent, CredwatchError> {
    let envelope: EventEnvelope = serde_json::from_str(payload)?;
    let data = envelope.data;
    let at = data.commit_timestamp;

    match data.kind.as_str() {
        "INSERT" => {
            let row = data.record.ok_or_else(missing("record"))?;
            Ok(ChangeEvent::Insert { row, at })
        }
        "UPDATE" => {
            let row = data.record.ok_or_else(missing("record"))?;
            Ok(ChangeEvent::Update { row, at })
        }
        "DELETE" => {
            let old_row = data.old_record.ok_or_else(missing("old_record"))?;
            Ok(ChangeEvent::Delete { old_row, at })
        }
        other => Err(CredwatchError::Json(serde::de::Error::custom(format!(
            "unknown change event type: {other}"
        )))),
    }
}

fn missing(field: &'static str) -> impl FnOnce() -> CredwatchError {
    move || CredwatchError::Json(serde::de::Error::custom(format!("missing {field} in change event")))
}
