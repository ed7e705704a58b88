use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::CoreError;
use crate::models::button::ButtonState;
use crate::models::target::VoteTarget;

/// Vote direction as rendered in `data-value`. Expected to be 1 or -1;
/// the server decides what other values mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoteValue(i32);

impl VoteValue {
    pub const LIKE: VoteValue = VoteValue(1);
    pub const DISLIKE: VoteValue = VoteValue(-1);

    pub fn new(value: i32) -> Self {
        Self(value)
    }

    pub fn get(self) -> i32 {
        self.0
    }

    /// Parse the leading integer of an attribute value.
    ///
    /// Surrounding whitespace and anything after the digits are ignored,
    /// so `" 1 "` and `"-1px"` both parse. No digits is an error.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim_start();
        let (negative, rest) = match trimmed.as_bytes().first().copied() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits_len == 0 {
            return Err(CoreError::InvalidVoteValue(raw.to_string()));
        }

        let magnitude: i64 = rest[..digits_len]
            .parse()
            .map_err(|_| CoreError::InvalidVoteValue(raw.to_string()))?;
        let signed = if negative { -magnitude } else { magnitude };

        i32::try_from(signed)
            .map(VoteValue)
            .map_err(|_| CoreError::InvalidVoteValue(raw.to_string()))
    }
}

impl FromStr for VoteValue {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Request body for the vote endpoints: `{"<kind>_id": id, "value": value}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteRequest {
    pub target: VoteTarget,
    pub value: VoteValue,
}

impl VoteRequest {
    pub fn new(target: VoteTarget, value: VoteValue) -> Self {
        Self { target, value }
    }

    pub fn endpoint(&self) -> &'static str {
        self.target.kind.endpoint()
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Serialize for VoteRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(self.target.kind.id_field(), &self.target.id)?;
        map.serialize_entry("value", &self.value)?;
        map.end()
    }
}

/// JSON body returned by the vote endpoints, on success and on failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_vote: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VoteResponse {
    pub fn button_state(&self) -> ButtonState {
        ButtonState::from_user_vote(self.user_vote)
    }

    fn error_or(&self, fallback: &str) -> String {
        match self.error.as_deref() {
            Some(message) if !message.is_empty() => message.to_string(),
            _ => fallback.to_string(),
        }
    }
}

/// HTTP status plus decoded body of one vote round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteReply {
    pub status: u16,
    pub body: VoteResponse,
}

/// What the page should do with a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyVerdict {
    /// Show the new rating (if present) and highlight per `state`.
    Applied {
        rating: Option<i64>,
        state: ButtonState,
    },
    /// 2xx, but the server refused the vote.
    Rejected { message: String },
    /// Non-2xx status.
    Failed { status: u16, message: String },
}

impl VoteReply {
    pub fn is_success_status(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn verdict(&self) -> ReplyVerdict {
        if !self.is_success_status() {
            return ReplyVerdict::Failed {
                status: self.status,
                message: self.body.error_or("Server error"),
            };
        }

        if self.body.success {
            ReplyVerdict::Applied {
                rating: self.body.rating,
                state: self.body.button_state(),
            }
        } else {
            ReplyVerdict::Rejected {
                message: self.body.error_or("Unknown error"),
            }
        }
    }
}
