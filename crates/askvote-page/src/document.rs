//! In-memory page.
//!
//! Holds the handful of element properties voting cares about. Used for
//! headless voting from the CLI and as the page in tests.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use askvote_core::models::button::{ButtonRole, ButtonState};
use askvote_core::models::target::{ControlKey, VoteTarget};
use askvote_core::models::vote::VoteValue;
use askvote_core::page_keys;
use tracing::warn;

use crate::error::PageError;
use crate::page::{ClickedElement, NodeId, Page};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub id: Option<String>,
    pub name: Option<String>,
    pub classes: Vec<String>,
    pub dataset: BTreeMap<String, String>,
    pub disabled: bool,
    pub text: String,
    pub value: Option<String>,
}

impl Element {
    pub fn new() -> Self {
        Self::default()
    }

    /// A like or dislike button for `target`, rendered unhighlighted.
    pub fn vote_button(role: ButtonRole, target: &VoteTarget, value: VoteValue) -> Self {
        Self::new()
            .with_class("btn")
            .with_class(role.marker_class())
            .with_class(role.idle_class())
            .with_data(page_keys::DATA_TYPE, target.kind.as_str())
            .with_data(page_keys::DATA_ID, &target.id)
            .with_data(page_keys::DATA_VALUE, &value.get().to_string())
    }

    pub fn rating_counter(target: &VoteTarget, rating: i64) -> Self {
        Self::new()
            .with_id(&target.counter_id())
            .with_text(&rating.to_string())
    }

    /// Hidden `<input>` as rendered by `{% csrf_token %}`.
    pub fn csrf_field(token: &str) -> Self {
        Self {
            name: Some(page_keys::CSRF_FORM_FIELD.to_string()),
            value: Some(token.to_string()),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_data(mut self, key: &str, value: &str) -> Self {
        self.dataset.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    fn is_vote_button_for(&self, role: ButtonRole, key: &ControlKey) -> bool {
        self.has_class(role.marker_class())
            && self.dataset.get(page_keys::DATA_TYPE) == Some(&key.data_type)
            && self.dataset.get(page_keys::DATA_ID) == Some(&key.id)
    }
}

#[derive(Debug, Default)]
struct DocumentState {
    elements: Vec<Element>,
    cookie: String,
    alerts: Vec<String>,
}

impl DocumentState {
    fn find_button(&self, role: ButtonRole, key: &ControlKey) -> Option<usize> {
        self.elements
            .iter()
            .position(|el| el.is_vote_button_for(role, key))
    }
}

#[derive(Debug, Default)]
pub struct Document {
    state: RwLock<DocumentState>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Page with the two vote buttons and the counter for `target`.
    pub fn for_target(target: &VoteTarget, rating: i64) -> Self {
        let doc = Self::new();
        doc.push(Element::vote_button(ButtonRole::Like, target, VoteValue::LIKE));
        doc.push(Element::rating_counter(target, rating));
        doc.push(Element::vote_button(ButtonRole::Dislike, target, VoteValue::DISLIKE));
        doc
    }

    fn read(&self) -> RwLockReadGuard<'_, DocumentState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, DocumentState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push(&self, element: Element) -> NodeId {
        let mut state = self.write();
        state.elements.push(element);
        NodeId(state.elements.len() - 1)
    }

    pub fn set_cookie(&self, cookie: &str) {
        self.write().cookie = cookie.to_string();
    }

    pub fn element(&self, node: NodeId) -> Option<Element> {
        self.read().elements.get(node.0).cloned()
    }

    pub fn set_disabled(&self, node: NodeId, disabled: bool) {
        if let Some(el) = self.write().elements.get_mut(node.0) {
            el.disabled = disabled;
        }
    }

    pub fn text_of(&self, element_id: &str) -> Option<String> {
        self.read()
            .elements
            .iter()
            .find(|el| el.id.as_deref() == Some(element_id))
            .map(|el| el.text.clone())
    }

    pub fn button(&self, role: ButtonRole, key: impl Into<ControlKey>) -> Option<NodeId> {
        self.read().find_button(role, &key.into()).map(NodeId)
    }

    /// Highlighting as currently shown, read back from style classes.
    pub fn vote_state(&self, key: impl Into<ControlKey>) -> Option<ButtonState> {
        let key = key.into();
        let state = self.read();
        let like = &state.elements[state.find_button(ButtonRole::Like, &key)?];
        let dislike = &state.elements[state.find_button(ButtonRole::Dislike, &key)?];

        match (
            like.has_class(ButtonRole::Like.active_class()),
            dislike.has_class(ButtonRole::Dislike.active_class()),
        ) {
            (false, false) => Some(ButtonState::None),
            (true, false) => Some(ButtonState::Liked),
            (false, true) => Some(ButtonState::Disliked),
            (true, true) => {
                warn!(control = %key, "both vote buttons highlighted");
                None
            }
        }
    }

    pub fn alerts(&self) -> Vec<String> {
        self.read().alerts.clone()
    }
}

impl Page for Document {
    fn clicked(&self, node: NodeId) -> Option<ClickedElement> {
        self.read().elements.get(node.0).map(|el| ClickedElement {
            classes: el.classes.clone(),
            dataset: el.dataset.clone(),
            disabled: el.disabled,
        })
    }

    fn form_field_value(&self, name: &str) -> Option<String> {
        self.read()
            .elements
            .iter()
            .find(|el| el.name.as_deref() == Some(name))
            .map(|el| el.value.clone().unwrap_or_default())
    }

    fn cookie(&self) -> String {
        self.read().cookie.clone()
    }

    fn set_text(&self, element_id: &str, text: &str) -> bool {
        let mut state = self.write();
        match state
            .elements
            .iter_mut()
            .find(|el| el.id.as_deref() == Some(element_id))
        {
            Some(el) => {
                el.text = text.to_string();
                true
            }
            None => false,
        }
    }

    fn render_vote_state(&self, key: &ControlKey, vote_state: ButtonState) -> Result<(), PageError> {
        let mut state = self.write();
        let (Some(like), Some(dislike)) = (
            state.find_button(ButtonRole::Like, key),
            state.find_button(ButtonRole::Dislike, key),
        ) else {
            return Err(PageError::ButtonsNotFound {
                target: key.to_string(),
            });
        };

        for (index, role) in [(like, ButtonRole::Like), (dislike, ButtonRole::Dislike)] {
            let el = &mut state.elements[index];
            el.remove_class(role.active_class());
            el.remove_class(role.idle_class());
            el.add_class(vote_state.class_for(role));
        }
        Ok(())
    }

    fn count_vote_controls(&self) -> usize {
        self.read()
            .elements
            .iter()
            .filter(|el| {
                el.has_class(page_keys::LIKE_BUTTON_CLASS) || el.has_class(page_keys::DISLIKE_BUTTON_CLASS)
            })
            .count()
    }

    fn alert(&self, message: &str) {
        warn!(text = message, "alert shown");
        self.write().alerts.push(message.to_string());
    }
}
