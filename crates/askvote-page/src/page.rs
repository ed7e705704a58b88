use std::collections::BTreeMap;

use askvote_core::models::button::{ButtonRole, ButtonState};
use askvote_core::models::target::ControlKey;

use crate::error::PageError;

/// Handle to an element on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// What a handler can see of a clicked element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClickedElement {
    pub classes: Vec<String>,
    pub dataset: BTreeMap<String, String>,
    pub disabled: bool,
}

impl ClickedElement {
    pub fn role(&self) -> Option<ButtonRole> {
        ButtonRole::from_classes(self.classes.iter().map(String::as_str))
    }

    pub fn data(&self, key: &str) -> Option<&str> {
        self.dataset.get(key).map(String::as_str)
    }
}

/// The surface of a rendered forum page that voting touches.
///
/// Methods take `&self`; implementations shared between in-flight votes
/// provide their own synchronization.
pub trait Page: Send + Sync {
    fn clicked(&self, node: NodeId) -> Option<ClickedElement>;

    /// Value of the first form field named `name`, if the page has one.
    fn form_field_value(&self, name: &str) -> Option<String>;

    /// Cookies visible to the page, `document.cookie` style.
    fn cookie(&self) -> String;

    /// Replace the text of the element with `element_id`.
    /// Returns `false` when no such element exists.
    fn set_text(&self, element_id: &str, text: &str) -> bool;

    /// Highlight the like/dislike pair named by `key` to match `state`.
    fn render_vote_state(&self, key: &ControlKey, state: ButtonState) -> Result<(), PageError>;

    fn count_vote_controls(&self) -> usize;

    /// Blocking user notification.
    fn alert(&self, message: &str);
}
