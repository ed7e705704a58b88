use thiserror::Error;

/// Why a click did not end in an applied vote. The `Display` text is what
/// the user is shown.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoteError {
    #[error("CSRF token not found. Please refresh the page.")]
    MissingCsrfToken,

    #[error("Invalid vote value: {0}")]
    InvalidValue(String),

    #[error("Error: {0}")]
    Rejected(String),

    #[error("Error {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Error)]
pub enum PageError {
    #[error("vote buttons not found for {target}")]
    ButtonsNotFound { target: String },
}
