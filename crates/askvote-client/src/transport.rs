use std::future::Future;
use std::pin::Pin;

use askvote_core::models::vote::{VoteReply, VoteRequest};

use crate::error::ClientError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A vote ready to leave the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingVote {
    pub request: VoteRequest,
    pub csrf_token: String,
}

/// Sends votes to the forum server.
///
/// Implementations must decode the JSON body whatever the HTTP status
/// and only return `Err` when no usable reply was obtained (connection
/// failure, unreadable or non-JSON body). Methods return boxed futures
/// for dyn compatibility.
pub trait VoteTransport: Send + Sync {
    fn send(&self, vote: OutgoingVote) -> BoxFuture<'_, Result<VoteReply, ClientError>>;
}
