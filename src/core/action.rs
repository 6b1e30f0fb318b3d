//! The closed vocabulary of actions the reducer understands.

use super::dataset::{ClassId, Dataset, FitnessClass, Member, MemberId};
use super::state::RollbackReason;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Fixed-shape metadata carried by every action.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionMeta {
    /// Correlation id linking an optimistic dispatch to its commit or rollback
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_id: Option<String>,
    /// Whether the mutation is applied ahead of its confirmation
    #[serde(default)]
    pub optimistic: bool,
    /// Whether the transition bypasses the history stacks
    #[serde(default)]
    pub skip_history: bool,
}

/// Mutation descriptors and history commands.
///
/// Serialized adjacently tagged, e.g. `{"type": "DELETE_MEMBER", "payload": 4}`.
/// Any tag not listed here decodes to [`ActionKind::Unknown`] whatever its
/// payload, and the reducer ignores it. Decoding needs a self-describing
/// format such as JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self")]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    SetDataset(Dataset),
    AddMember(Member),
    UpdateMember(Member),
    DeleteMember(MemberId),
    AddClass(FitnessClass),
    UpdateClass(FitnessClass),
    DeleteClass(ClassId),
    BatchUpdateMembers(Vec<Member>),
    BatchUpdateClasses(Vec<FitnessClass>),
    Undo,
    Redo,
    ClearHistory,
    RecordError {
        action_id: String,
        reason: RollbackReason,
    },
    ClearError(String),
    #[serde(other)]
    Unknown,
}

/// Every tag [`ActionKind`] serializes to.
pub const ACTION_TAGS: &[&str] = &[
    "SET_DATASET",
    "ADD_MEMBER",
    "UPDATE_MEMBER",
    "DELETE_MEMBER",
    "ADD_CLASS",
    "UPDATE_CLASS",
    "DELETE_CLASS",
    "BATCH_UPDATE_MEMBERS",
    "BATCH_UPDATE_CLASSES",
    "UNDO",
    "REDO",
    "CLEAR_HISTORY",
    "RECORD_ERROR",
    "CLEAR_ERROR",
    "UNKNOWN",
];

impl Serialize for ActionKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        ActionKind::serialize(self, serializer)
    }
}

impl<'de> Deserialize<'de> for ActionKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        match value.get("type").and_then(serde_json::Value::as_str) {
            Some(tag) if !ACTION_TAGS.contains(&tag) => Ok(ActionKind::Unknown),
            _ => ActionKind::deserialize(value).map_err(de::Error::custom),
        }
    }
}

impl ActionKind {
    /// Whether this action changes the dataset (and so participates in history).
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::SetDataset(_)
                | Self::AddMember(_)
                | Self::UpdateMember(_)
                | Self::DeleteMember(_)
                | Self::AddClass(_)
                | Self::UpdateClass(_)
                | Self::DeleteClass(_)
                | Self::BatchUpdateMembers(_)
                | Self::BatchUpdateClasses(_)
        )
    }

    /// Tag name for display/logging.
    pub fn name(&self) -> &str {
        match self {
            Self::SetDataset(_) => "SET_DATASET",
            Self::AddMember(_) => "ADD_MEMBER",
            Self::UpdateMember(_) => "UPDATE_MEMBER",
            Self::DeleteMember(_) => "DELETE_MEMBER",
            Self::AddClass(_) => "ADD_CLASS",
            Self::UpdateClass(_) => "UPDATE_CLASS",
            Self::DeleteClass(_) => "DELETE_CLASS",
            Self::BatchUpdateMembers(_) => "BATCH_UPDATE_MEMBERS",
            Self::BatchUpdateClasses(_) => "BATCH_UPDATE_CLASSES",
            Self::Undo => "UNDO",
            Self::Redo => "REDO",
            Self::ClearHistory => "CLEAR_HISTORY",
            Self::RecordError { .. } => "RECORD_ERROR",
            Self::ClearError(_) => "CLEAR_ERROR",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// An action together with its metadata envelope.
///
/// # Example
///
/// ```rust
/// use fitstore::core::{Action, ActionKind};
///
/// let plain = Action::new(ActionKind::DeleteMember(7));
/// assert!(!plain.meta.optimistic);
///
/// let pending = Action::optimistic(ActionKind::DeleteMember(7), "abc");
/// assert!(pending.meta.optimistic);
/// assert_eq!(pending.meta.action_id.as_deref(), Some("abc"));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub kind: ActionKind,
    #[serde(default)]
    pub meta: ActionMeta,
}

impl Action {
    /// A plain action with empty metadata.
    pub fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            meta: ActionMeta::default(),
        }
    }

    /// A tentative mutation tracked under `action_id` until committed or rolled back.
    pub fn optimistic(kind: ActionKind, action_id: impl Into<String>) -> Self {
        Self {
            kind,
            meta: ActionMeta {
                action_id: Some(action_id.into()),
                optimistic: true,
                skip_history: false,
            },
        }
    }

    /// The confirmation of a previously dispatched optimistic mutation.
    ///
    /// The mutation is re-applied without touching history; it is dropped if
    /// `action_id` is no longer pending.
    pub fn commit(kind: ActionKind, action_id: impl Into<String>) -> Self {
        Self {
            kind,
            meta: ActionMeta {
                action_id: Some(action_id.into()),
                optimistic: false,
                skip_history: true,
            },
        }
    }

    /// Revert the optimistic mutation tracked under `action_id`.
    pub fn rollback(action_id: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::Undo,
            meta: ActionMeta {
                action_id: Some(action_id.into()),
                optimistic: false,
                skip_history: true,
            },
        }
    }

    pub fn skip_history(mut self) -> Self {
        self.meta.skip_history = true;
        self
    }

    pub fn with_meta(mut self, meta: ActionMeta) -> Self {
        self.meta = meta;
        self
    }
}

impl From<ActionKind> for Action {
    fn from(kind: ActionKind) -> Self {
        Self::new(kind)
    }
}
