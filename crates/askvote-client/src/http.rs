//! `ureq`-backed vote transport.
//!
//! `ureq` is blocking, so each request runs on tokio's blocking pool.

use std::time::Duration;

use askvote_core::models::vote::{VoteReply, VoteResponse};
use askvote_core::page_keys::{CSRF_COOKIE, CSRF_HEADER, REQUESTED_WITH_HEADER, REQUESTED_WITH_VALUE};
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::csrf;
use crate::error::ClientError;
use crate::transport::{BoxFuture, OutgoingVote, VoteTransport};

pub struct HttpTransport {
    agent: ureq::Agent,
    base_url: String,
    session_cookie: Option<String>,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .build()
            .into();

        Self {
            agent,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session_cookie: config.session_cookie.clone(),
        }
    }

    pub fn url_for(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }

    /// Cookies a same-origin browser request would carry: the session
    /// plus the CSRF cookie the token was issued with. A session cookie
    /// that already has a `csrftoken` is sent as is.
    fn cookie_header(&self, csrf_token: &str) -> String {
        match &self.session_cookie {
            Some(session) if csrf::token_from_cookie(session).is_some() => session.clone(),
            Some(session) if !session.is_empty() => {
                format!("{session}; {CSRF_COOKIE}={csrf_token}")
            }
            _ => format!("{CSRF_COOKIE}={csrf_token}"),
        }
    }
}

impl VoteTransport for HttpTransport {
    fn send(&self, vote: OutgoingVote) -> BoxFuture<'_, Result<VoteReply, ClientError>> {
        Box::pin(async move {
            let url = self.url_for(vote.request.endpoint());
            let body = vote.request.to_json()?;
            let cookie = self.cookie_header(&vote.csrf_token);
            let agent = self.agent.clone();

            info!(url = %url, vote_target = %vote.request.target, value = vote.request.value.get(), "sending vote");

            tokio::task::spawn_blocking(move || post_vote(&agent, &url, &vote.csrf_token, &cookie, body))
                .await
                .map_err(|e| ClientError::Transport(format!("request task failed: {e}")))?
        })
    }
}

fn post_vote(
    agent: &ureq::Agent,
    url: &str,
    csrf_token: &str,
    cookie: &str,
    body: String,
) -> Result<VoteReply, ClientError> {
    let mut response = agent
        .post(url)
        .header("Content-Type", "application/json")
        .header(CSRF_HEADER, csrf_token)
        .header(REQUESTED_WITH_HEADER, REQUESTED_WITH_VALUE)
        .header("Cookie", cookie)
        .send(body)
        .map_err(|e| ClientError::Transport(e.to_string()))?;

    let status = response.status().as_u16();
    debug!(status, url, "vote response received");

    let text = response
        .body_mut()
        .read_to_string()
        .map_err(|e| ClientError::Transport(e.to_string()))?;

    let body: VoteResponse =
        serde_json::from_str(&text).map_err(|e| ClientError::Decode(e.to_string()))?;

    Ok(VoteReply { status, body })
}
