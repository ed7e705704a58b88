use std::fmt;

use serde::{Deserialize, Serialize};

use crate::page_keys;

/// What a vote applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Question,
    Answer,
}

impl TargetKind {
    /// Map a `data-type` attribute to a kind.
    ///
    /// Anything other than `question` is sent to the answer endpoint.
    pub fn from_data_type(raw: &str) -> Self {
        match raw {
            "question" => TargetKind::Question,
            "answer" => TargetKind::Answer,
            other => {
                tracing::warn!(data_type = other, "unrecognized vote target type, treating as answer");
                TargetKind::Answer
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TargetKind::Question => "question",
            TargetKind::Answer => "answer",
        }
    }

    /// Server path that accepts votes for this kind.
    pub fn endpoint(self) -> &'static str {
        match self {
            TargetKind::Question => "/ajax/like/question/",
            TargetKind::Answer => "/ajax/like/answer/",
        }
    }

    /// Name of the request field carrying the target id.
    pub fn id_field(self) -> &'static str {
        match self {
            TargetKind::Question => "question_id",
            TargetKind::Answer => "answer_id",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A question or answer rendered on the page. The id is opaque and
/// copied verbatim from the `data-id` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoteTarget {
    pub kind: TargetKind,
    pub id: String,
}

impl VoteTarget {
    pub fn new(kind: TargetKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }

    pub fn question(id: impl Into<String>) -> Self {
        Self::new(TargetKind::Question, id)
    }

    pub fn answer(id: impl Into<String>) -> Self {
        Self::new(TargetKind::Answer, id)
    }

    pub fn counter_id(&self) -> String {
        page_keys::rating_counter(self.kind.as_str(), &self.id)
    }

    pub fn control_key(&self) -> ControlKey {
        ControlKey::new(self.kind.as_str(), &self.id)
    }
}

impl fmt::Display for VoteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.id)
    }
}

/// How the page itself names a target: the raw `data-type` and `data-id`
/// of its controls.
///
/// Counter and button lookups use this, never the normalized
/// [`TargetKind`], so a control with an unrecognized type still updates
/// its own counter and buttons.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ControlKey {
    pub data_type: String,
    pub id: String,
}

impl ControlKey {
    pub fn new(data_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            data_type: data_type.into(),
            id: id.into(),
        }
    }

    pub fn counter_id(&self) -> String {
        page_keys::rating_counter(&self.data_type, &self.id)
    }
}

impl From<&VoteTarget> for ControlKey {
    fn from(target: &VoteTarget) -> Self {
        target.control_key()
    }
}

impl From<&ControlKey> for ControlKey {
    fn from(key: &ControlKey) -> Self {
        key.clone()
    }
}

impl fmt::Display for ControlKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.data_type, self.id)
    }
}
