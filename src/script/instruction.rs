//! Mutation stream elements and their wire shapes

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::codec::encode_wire;
use crate::schema::SemanticType;
use crate::translate::RowOperation;

/// Dataset-level command kinds carried by the script header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    /// Create a new dataset
    Create,
    /// Create a working copy
    Copy,
    /// Publish the working copy
    Publish,
    /// Drop the working copy
    Drop,
    /// Ordinary update against the current copy
    Normal,
}

impl CommandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::Create => "create",
            CommandKind::Copy => "copy",
            CommandKind::Publish => "publish",
            CommandKind::Drop => "drop",
            CommandKind::Normal => "normal",
        }
    }
}

/// The dataset-level command that heads every mutation script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetCommand {
    pub kind: CommandKind,
    /// Locale for dataset creation
    pub locale: Option<String>,
}

impl DatasetCommand {
    /// An ordinary update command.
    pub fn normal() -> Self {
        Self {
            kind: CommandKind::Normal,
            locale: None,
        }
    }

    /// A dataset-creation command with the given locale.
    pub fn create(locale: impl Into<String>) -> Self {
        Self {
            kind: CommandKind::Create,
            locale: Some(locale.into()),
        }
    }

    pub fn of(kind: CommandKind) -> Self {
        Self { kind, locale: None }
    }

    /// The header element: `{"c": <kind>, "user": <actor>[, "locale": …]}`.
    pub(crate) fn header_json(&self, actor: &str) -> Value {
        let mut header = Map::new();
        header.insert("c".into(), json!(self.kind.as_str()));
        header.insert("user".into(), json!(actor));
        if let Some(locale) = &self.locale {
            header.insert("locale".into(), json!(locale));
        }
        Value::Object(header)
    }
}

/// How row upserts are applied against existing rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateMode {
    /// Merge upserted fields into existing rows
    Merge,
    /// Replace existing rows wholesale
    Replace,
}

impl UpdateMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateMode::Merge => "merge",
            UpdateMode::Replace => "replace",
        }
    }
}

/// The row-option state governing a run of row operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowOptions {
    pub truncate: bool,
    pub update: UpdateMode,
    pub fatal_row_errors: bool,
}

impl Default for RowOptions {
    fn default() -> Self {
        Self {
            truncate: false,
            update: UpdateMode::Merge,
            fatal_row_errors: true,
        }
    }
}

/// One element of the mutation stream, after the header.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Add a column of the given type
    AddColumn {
        semantic_type: SemanticType,
        hint: String,
        id: Option<String>,
    },
    /// Drop a column by id
    DropColumn { id: String },
    /// Designate a column as the row identifier
    SetRowIdColumn { id: String },
    /// Establish the option state for the following run of rows
    RowOptions(RowOptions),
    /// One typed row operation
    Row(RowOperation),
}

impl Mutation {
    /// Returns true for row payloads, false for instructions.
    pub fn is_row(&self) -> bool {
        matches!(self, Mutation::Row(_))
    }

    /// The positional wire shape of this element.
    pub(crate) fn wire_json(&self) -> Value {
        match self {
            Mutation::AddColumn {
                semantic_type,
                hint,
                id,
            } => {
                let mut obj = Map::new();
                obj.insert("c".into(), json!("add column"));
                obj.insert("hint".into(), json!(hint));
                obj.insert("type".into(), json!(semantic_type.name()));
                if let Some(id) = id {
                    obj.insert("id".into(), json!(id));
                }
                Value::Object(obj)
            }
            Mutation::DropColumn { id } => json!({ "c": "drop column", "column": id }),
            Mutation::SetRowIdColumn { id } => json!({ "c": "set row id", "column": id }),
            Mutation::RowOptions(options) => json!({
                "c": "row data",
                "truncate": options.truncate,
                "update": options.update.as_str(),
                "fatal_row_errors": options.fatal_row_errors,
            }),
            Mutation::Row(op) => row_wire_json(op),
        }
    }
}

/// Upserts are objects of wire-encoded fields; deletes are one-element
/// arrays of the wire-encoded primary key.
fn row_wire_json(op: &RowOperation) -> Value {
    match op {
        RowOperation::Upsert(fields) => Value::Object(
            fields
                .iter()
                .map(|(name, value)| (name.clone(), encode_wire(value)))
                .collect(),
        ),
        RowOperation::Delete(key) => Value::Array(vec![encode_wire(key)]),
    }
}
