//! Click → request → page update.

use std::sync::Arc;

use askvote_client::csrf;
use askvote_client::transport::{OutgoingVote, VoteTransport};
use askvote_core::models::button::ButtonState;
use askvote_core::models::target::{ControlKey, TargetKind, VoteTarget};
use askvote_core::models::vote::{ReplyVerdict, VoteRequest, VoteValue};
use askvote_core::page_keys;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::VoteError;
use crate::events::{ClickEvent, ClickOutcome, VoteResult};
use crate::page::Page;

/// Page-wide vote click handler.
///
/// Every click is handled on its own: requests are neither sequenced nor
/// cancelled, so replies for the same target are applied in whatever
/// order they complete.
pub struct VoteHandler<P> {
    page: Arc<P>,
    transport: Arc<dyn VoteTransport>,
}

impl<P> Clone for VoteHandler<P> {
    fn clone(&self) -> Self {
        Self {
            page: Arc::clone(&self.page),
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<P: Page + 'static> VoteHandler<P> {
    pub fn attach(page: Arc<P>, transport: Arc<dyn VoteTransport>) -> Self {
        info!(buttons = page.count_vote_controls(), "vote handler attached");
        Self { page, transport }
    }

    /// Handle one click. Must be called inside a tokio runtime; the
    /// request, if any, runs as a separate task.
    pub fn handle_click(&self, event: ClickEvent) -> ClickOutcome {
        let Some(element) = self.page.clicked(event.target) else {
            return ClickOutcome::Ignored;
        };
        let Some(role) = element.role() else {
            return ClickOutcome::Ignored;
        };

        let data_type = element.data(page_keys::DATA_TYPE).unwrap_or_default();
        let id = element.data(page_keys::DATA_ID).unwrap_or_default();
        let raw_value = element.data(page_keys::DATA_VALUE).unwrap_or_default();
        debug!(?role, data_type, id, value = raw_value, "vote control clicked");

        if element.disabled {
            debug!(data_type, id, "vote control disabled");
            return ClickOutcome::Disabled;
        }

        // The kind only picks the endpoint; page updates go to the clicked
        // control's own data-type.
        let key = ControlKey::new(data_type, id);
        let target = VoteTarget::new(TargetKind::from_data_type(data_type), id);

        let value = match VoteValue::parse(raw_value) {
            Ok(value) => value,
            Err(_) => return self.abort(VoteError::InvalidValue(raw_value.to_string())),
        };

        let form_token = self.page.form_field_value(page_keys::CSRF_FORM_FIELD);
        let Some(csrf_token) = csrf::resolve_token(form_token.as_deref(), &self.page.cookie()) else {
            return self.abort(VoteError::MissingCsrfToken);
        };

        let vote = OutgoingVote {
            request: VoteRequest::new(target, value),
            csrf_token,
        };

        let page = Arc::clone(&self.page);
        let transport = Arc::clone(&self.transport);
        ClickOutcome::Dispatched(tokio::spawn(async move {
            let result = deliver(page.as_ref(), transport.as_ref(), &key, vote).await;
            if let Err(e) = &result {
                page.alert(&e.to_string());
            }
            result
        }))
    }

    /// Handle clicks from `events` until every sender is dropped, then wait
    /// for requests still in flight.
    pub fn subscribe(&self, mut events: mpsc::Receiver<ClickEvent>) -> JoinHandle<()> {
        let handler = self.clone();
        tokio::spawn(async move {
            let mut in_flight: Vec<JoinHandle<VoteResult>> = Vec::new();

            while let Some(event) = events.recv().await {
                in_flight.retain(|task| !task.is_finished());
                if let ClickOutcome::Dispatched(task) = handler.handle_click(event) {
                    in_flight.push(task);
                }
            }

            for task in in_flight {
                if let Err(e) = task.await {
                    warn!(error = %e, "vote task failed");
                }
            }
            debug!("click subscription closed");
        })
    }

    fn abort(&self, error: VoteError) -> ClickOutcome {
        self.page.alert(&error.to_string());
        ClickOutcome::Aborted(error)
    }
}

async fn deliver<P: Page + ?Sized>(
    page: &P,
    transport: &dyn VoteTransport,
    key: &ControlKey,
    vote: OutgoingVote,
) -> VoteResult {
    let target = vote.request.target.clone();

    let reply = transport
        .send(vote)
        .await
        .map_err(|e| VoteError::Network(e.to_string()))?;
    debug!(vote_target = %target, status = reply.status, "vote reply");

    match reply.verdict() {
        ReplyVerdict::Applied { rating, state } => {
            apply(page, key, rating, state);
            Ok(state)
        }
        ReplyVerdict::Rejected { message } => Err(VoteError::Rejected(message)),
        ReplyVerdict::Failed { status, message } => Err(VoteError::Http { status, message }),
    }
}

fn apply<P: Page + ?Sized>(page: &P, key: &ControlKey, rating: Option<i64>, state: ButtonState) {
    match rating {
        Some(rating) => {
            let counter = key.counter_id();
            if page.set_text(&counter, &rating.to_string()) {
                info!(control = %key, rating, "rating updated");
            } else {
                debug!(counter = %counter, "rating counter not on page");
            }
        }
        None => warn!(control = %key, "successful reply without rating"),
    }

    if let Err(e) = page.render_vote_state(key, state) {
        debug!(error = %e, "highlighting not updated");
    }
}
