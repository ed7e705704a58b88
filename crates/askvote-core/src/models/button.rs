use serde::{Deserialize, Serialize};

use crate::page_keys;

/// Which of the two vote buttons a control is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonRole {
    Like,
    Dislike,
}

impl ButtonRole {
    /// Marker class identifying the control.
    pub fn marker_class(self) -> &'static str {
        match self {
            ButtonRole::Like => page_keys::LIKE_BUTTON_CLASS,
            ButtonRole::Dislike => page_keys::DISLIKE_BUTTON_CLASS,
        }
    }

    pub fn active_class(self) -> &'static str {
        match self {
            ButtonRole::Like => page_keys::LIKE_ACTIVE_CLASS,
            ButtonRole::Dislike => page_keys::DISLIKE_ACTIVE_CLASS,
        }
    }

    pub fn idle_class(self) -> &'static str {
        match self {
            ButtonRole::Like => page_keys::LIKE_IDLE_CLASS,
            ButtonRole::Dislike => page_keys::DISLIKE_IDLE_CLASS,
        }
    }

    /// Resolve the role from an element's class list. Like wins if an
    /// element somehow carries both markers.
    pub fn from_classes<'a>(classes: impl IntoIterator<Item = &'a str>) -> Option<Self> {
        let mut found = None;
        for class in classes {
            if class == page_keys::LIKE_BUTTON_CLASS {
                return Some(ButtonRole::Like);
            }
            if class == page_keys::DISLIKE_BUTTON_CLASS {
                found = Some(ButtonRole::Dislike);
            }
        }
        found
    }
}

/// Highlighting of the like/dislike pair for one target.
///
/// At most one button is active. Transitions happen only when a server
/// reply is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonState {
    #[default]
    None,
    Liked,
    Disliked,
}

impl ButtonState {
    /// Derive the state from the server's `user_vote`.
    pub fn from_user_vote(user_vote: Option<i64>) -> Self {
        match user_vote {
            Some(1) => ButtonState::Liked,
            Some(-1) => ButtonState::Disliked,
            _ => ButtonState::None,
        }
    }

    pub fn is_active(self, role: ButtonRole) -> bool {
        matches!(
            (self, role),
            (ButtonState::Liked, ButtonRole::Like) | (ButtonState::Disliked, ButtonRole::Dislike)
        )
    }

    /// The style class `role` should carry in this state.
    pub fn class_for(self, role: ButtonRole) -> &'static str {
        if self.is_active(role) {
            role.active_class()
        } else {
            role.idle_class()
        }
    }
}
