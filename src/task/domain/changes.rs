//! Structured diffs recorded in the activity log.

use crate::ids::ColumnId;
use serde_json::{Map, Value, json};

/// Task fields whose changes are recorded in the activity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackedField {
    /// `title`
    Title,
    /// `description`
    Description,
    /// `status`
    Status,
    /// `priority`
    Priority,
    /// `type`
    Type,
    /// `assignee_id`
    AssigneeId,
    /// `column_id`
    ColumnId,
    /// `due_date`
    DueDate,
    /// `tags`
    Tags,
}

impl TrackedField {
    /// Returns the key used in activity details.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Status => "status",
            Self::Priority => "priority",
            Self::Type => "type",
            Self::AssigneeId => "assignee_id",
            Self::ColumnId => "column_id",
            Self::DueDate => "due_date",
            Self::Tags => "tags",
        }
    }
}

/// One changed field with its previous and new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    /// The changed field.
    pub field: TrackedField,
    /// Value before the update.
    pub from: Value,
    /// Value after the update.
    pub to: Value,
}

/// Ordered set of changed tracked fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChanges(Vec<FieldChange>);

impl TaskChanges {
    pub(crate) fn record(&mut self, field: TrackedField, from: Value, to: Value) {
        self.0.push(FieldChange { field, from, to });
    }

    /// Returns whether no tracked field changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns whether `field` changed.
    #[must_use]
    pub fn contains(&self, field: TrackedField) -> bool {
        self.0.iter().any(|change| change.field == field)
    }

    /// Returns the changes in field order.
    #[must_use]
    pub fn changes(&self) -> &[FieldChange] {
        &self.0
    }

    /// Renders the diff as `{field: {from, to}}`.
    #[must_use]
    pub fn to_details(&self) -> Value {
        let map: Map<String, Value> = self
            .0
            .iter()
            .map(|change| {
                (
                    change.field.as_str().to_owned(),
                    json!({ "from": change.from, "to": change.to }),
                )
            })
            .collect();
        Value::Object(map)
    }
}

/// Column and position before and after a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskMove {
    /// Column before the move.
    pub from_column_id: Option<ColumnId>,
    /// Column after the move.
    pub to_column_id: ColumnId,
    /// Position before the move.
    pub from_position: i32,
    /// Position after the move.
    pub to_position: i32,
}

impl TaskMove {
    /// Renders the move as activity details.
    #[must_use]
    pub fn to_details(&self) -> Value {
        json!({
            "from_column_id": self.from_column_id,
            "to_column_id": self.to_column_id,
            "from_position": self.from_position,
            "to_position": self.to_position,
        })
    }
}
