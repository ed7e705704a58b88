//! Page element conventions.
//!
//! Class names, data attributes and element ids that the server-rendered
//! forum templates use for vote controls. Pure string functions.

pub const LIKE_BUTTON_CLASS: &str = "like-btn";
pub const DISLIKE_BUTTON_CLASS: &str = "dislike-btn";

pub const LIKE_ACTIVE_CLASS: &str = "btn-success";
pub const LIKE_IDLE_CLASS: &str = "btn-outline-success";
pub const DISLIKE_ACTIVE_CLASS: &str = "btn-danger";
pub const DISLIKE_IDLE_CLASS: &str = "btn-outline-danger";

pub const DATA_TYPE: &str = "type";
pub const DATA_ID: &str = "id";
pub const DATA_VALUE: &str = "value";

pub const CSRF_FORM_FIELD: &str = "csrfmiddlewaretoken";
pub const CSRF_COOKIE: &str = "csrftoken";

pub const CSRF_HEADER: &str = "X-CSRFToken";
pub const REQUESTED_WITH_HEADER: &str = "X-Requested-With";
pub const REQUESTED_WITH_VALUE: &str = "XMLHttpRequest";

/// Id of the element that displays the rating of the control with
/// `data-type` and `data-id`.
pub fn rating_counter(data_type: &str, id: &str) -> String {
    format!("{data_type}-rating-{id}")
}
