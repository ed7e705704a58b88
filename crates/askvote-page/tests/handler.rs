use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use askvote_client::error::ClientError;
use askvote_client::transport::{BoxFuture, OutgoingVote, VoteTransport};
use askvote_core::models::button::{ButtonRole, ButtonState};
use askvote_core::models::target::{ControlKey, VoteTarget};
use askvote_core::models::vote::{VoteReply, VoteResponse, VoteValue};
use askvote_page::document::{Document, Element};
use askvote_page::error::VoteError;
use askvote_page::events::{ClickEvent, ClickOutcome, VoteResult};
use askvote_page::handler::VoteHandler;
use askvote_page::page::NodeId;
use tokio::sync::mpsc;

type Scripted = (Duration, Result<VoteReply, ClientError>);

#[derive(Default)]
struct ScriptedTransport {
    sent: Mutex<Vec<OutgoingVote>>,
    replies: Mutex<VecDeque<Scripted>>,
}

impl ScriptedTransport {
    fn replying(replies: Vec<Scripted>) -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::default(),
            replies: Mutex::new(replies.into()),
        })
    }

    fn sent(&self) -> Vec<OutgoingVote> {
        self.sent.lock().unwrap().clone()
    }
}

impl VoteTransport for ScriptedTransport {
    fn send(&self, vote: OutgoingVote) -> BoxFuture<'_, Result<VoteReply, ClientError>> {
        self.sent.lock().unwrap().push(vote);
        let (delay, reply) = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or((Duration::ZERO, Err(ClientError::Transport("no scripted reply".to_string()))));
        Box::pin(async move {
            tokio::time::sleep(delay).await;
            reply
        })
    }
}

fn ok(body: serde_json::Value) -> Scripted {
    reply(200, body)
}

fn reply(status: u16, body: serde_json::Value) -> Scripted {
    let body: VoteResponse = serde_json::from_value(body).unwrap();
    (Duration::ZERO, Ok(VoteReply { status, body }))
}

struct Fixture {
    page: Arc<Document>,
    like: NodeId,
    dislike: NodeId,
    target: VoteTarget,
}

fn question_page(rating: i64) -> Fixture {
    let target = VoteTarget::question("42");
    let page = Arc::new(Document::for_target(&target, rating));
    page.set_cookie("sessionid=abc; csrftoken=cookie-token");
    Fixture {
        like: page.button(ButtonRole::Like, &target).unwrap(),
        dislike: page.button(ButtonRole::Dislike, &target).unwrap(),
        page,
        target,
    }
}

async fn finish(outcome: ClickOutcome) -> VoteResult {
    match outcome {
        ClickOutcome::Dispatched(task) => task.await.unwrap(),
        other => panic!("expected a dispatched vote, got {other:?}"),
    }
}

#[tokio::test]
async fn disabled_control_sends_nothing() {
    let fx = question_page(0);
    fx.page.set_disabled(fx.like, true);
    let transport = ScriptedTransport::replying(vec![]);
    let handler = VoteHandler::attach(fx.page.clone(), transport.clone());

    let outcome = handler.handle_click(ClickEvent::on(fx.like));

    assert!(matches!(outcome, ClickOutcome::Disabled));
    assert!(outcome.default_prevented());
    assert!(transport.sent().is_empty());
    assert!(fx.page.alerts().is_empty());
}

#[tokio::test]
async fn clicks_elsewhere_are_ignored() {
    let fx = question_page(0);
    let plain = fx.page.push(Element::new().with_class("btn").with_text("Reply"));
    let transport = ScriptedTransport::replying(vec![]);
    let handler = VoteHandler::attach(fx.page.clone(), transport.clone());

    let outcome = handler.handle_click(ClickEvent::on(plain));
    assert!(matches!(outcome, ClickOutcome::Ignored));
    assert!(!outcome.default_prevented());

    assert!(matches!(
        handler.handle_click(ClickEvent::on(NodeId(999))),
        ClickOutcome::Ignored
    ));
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn like_on_question_goes_to_question_endpoint() {
    let fx = question_page(4);
    let transport =
        ScriptedTransport::replying(vec![ok(serde_json::json!({ "success": true, "rating": 5, "user_vote": 1 }))]);
    let handler = VoteHandler::attach(fx.page.clone(), transport.clone());

    finish(handler.handle_click(ClickEvent::on(fx.like))).await.unwrap();

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].request.endpoint(), "/ajax/like/question/");
    assert_eq!(sent[0].request.target, fx.target);
    assert_eq!(sent[0].request.value, VoteValue::LIKE);
    assert_eq!(sent[0].csrf_token, "cookie-token");
}

#[tokio::test]
async fn dislike_on_answer_goes_to_answer_endpoint() {
    let target = VoteTarget::answer("7");
    let page = Arc::new(Document::for_target(&target, 0));
    page.set_cookie("csrftoken=t");
    let dislike = page.button(ButtonRole::Dislike, &target).unwrap();
    let transport =
        ScriptedTransport::replying(vec![ok(serde_json::json!({ "success": true, "rating": -1, "user_vote": -1 }))]);
    let handler = VoteHandler::attach(page.clone(), transport.clone());

    finish(handler.handle_click(ClickEvent::on(dislike))).await.unwrap();

    let sent = transport.sent();
    assert_eq!(sent[0].request.endpoint(), "/ajax/like/answer/");
    assert_eq!(
        serde_json::to_value(&sent[0].request).unwrap(),
        serde_json::json!({ "answer_id": "7", "value": -1 })
    );
}

#[tokio::test]
async fn successful_like_updates_counter_and_highlights_like() {
    let fx = question_page(4);
    let transport =
        ScriptedTransport::replying(vec![ok(serde_json::json!({ "success": true, "rating": 5, "user_vote": 1 }))]);
    let handler = VoteHandler::attach(fx.page.clone(), transport);

    let state = finish(handler.handle_click(ClickEvent::on(fx.like))).await.unwrap();

    assert_eq!(state, ButtonState::Liked);
    assert_eq!(fx.page.text_of("question-rating-42").as_deref(), Some("5"));
    assert_eq!(fx.page.vote_state(&fx.target), Some(ButtonState::Liked));

    let like = fx.page.element(fx.like).unwrap();
    let dislike = fx.page.element(fx.dislike).unwrap();
    assert!(like.has_class("btn-success") && !like.has_class("btn-outline-success"));
    assert!(dislike.has_class("btn-outline-danger") && !dislike.has_class("btn-danger"));
    assert!(fx.page.alerts().is_empty());
}

#[tokio::test]
async fn dislike_reply_moves_highlight_to_dislike() {
    let fx = question_page(6);
    let transport = ScriptedTransport::replying(vec![
        ok(serde_json::json!({ "success": true, "rating": 7, "user_vote": 1 })),
        ok(serde_json::json!({ "success": true, "rating": 5, "user_vote": -1 })),
    ]);
    let handler = VoteHandler::attach(fx.page.clone(), transport);

    finish(handler.handle_click(ClickEvent::on(fx.like))).await.unwrap();
    finish(handler.handle_click(ClickEvent::on(fx.dislike))).await.unwrap();

    assert_eq!(fx.page.text_of("question-rating-42").as_deref(), Some("5"));
    assert_eq!(fx.page.vote_state(&fx.target), Some(ButtonState::Disliked));
    let like = fx.page.element(fx.like).unwrap();
    assert!(like.has_class("btn-outline-success") && !like.has_class("btn-success"));
}

#[tokio::test]
async fn neutral_user_vote_clears_both_highlights() {
    let fx = question_page(0);
    let transport = ScriptedTransport::replying(vec![
        ok(serde_json::json!({ "success": true, "rating": 1, "user_vote": 1 })),
        ok(serde_json::json!({ "success": true, "rating": 0, "user_vote": 0 })),
    ]);
    let handler = VoteHandler::attach(fx.page.clone(), transport);

    finish(handler.handle_click(ClickEvent::on(fx.like))).await.unwrap();
    let state = finish(handler.handle_click(ClickEvent::on(fx.like))).await.unwrap();

    assert_eq!(state, ButtonState::None);
    assert_eq!(fx.page.vote_state(&fx.target), Some(ButtonState::None));
    assert_eq!(fx.page.text_of("question-rating-42").as_deref(), Some("0"));
}

#[tokio::test]
async fn refused_vote_alerts_and_keeps_counter() {
    let fx = question_page(3);
    let transport = ScriptedTransport::replying(vec![ok(
        serde_json::json!({ "success": false, "error": "already voted" }),
    )]);
    let handler = VoteHandler::attach(fx.page.clone(), transport);

    let err = finish(handler.handle_click(ClickEvent::on(fx.like))).await.unwrap_err();

    assert_eq!(err, VoteError::Rejected("already voted".to_string()));
    assert_eq!(fx.page.alerts(), vec!["Error: already voted".to_string()]);
    assert_eq!(fx.page.text_of("question-rating-42").as_deref(), Some("3"));
    assert_eq!(fx.page.vote_state(&fx.target), Some(ButtonState::None));
}

#[tokio::test]
async fn http_failure_alerts_with_status() {
    let fx = question_page(3);
    let transport = ScriptedTransport::replying(vec![
        reply(403, serde_json::json!({ "success": false, "error": "login required" })),
        reply(500, serde_json::json!({})),
    ]);
    let handler = VoteHandler::attach(fx.page.clone(), transport);

    finish(handler.handle_click(ClickEvent::on(fx.like))).await.unwrap_err();
    finish(handler.handle_click(ClickEvent::on(fx.like))).await.unwrap_err();

    assert_eq!(
        fx.page.alerts(),
        vec![
            "Error 403: login required".to_string(),
            "Error 500: Server error".to_string(),
        ]
    );
    assert_eq!(fx.page.text_of("question-rating-42").as_deref(), Some("3"));
}

#[tokio::test]
async fn transport_failure_alerts_network_error() {
    let fx = question_page(3);
    let transport = ScriptedTransport::replying(vec![(
        Duration::ZERO,
        Err(ClientError::Transport("connection refused".to_string())),
    )]);
    let handler = VoteHandler::attach(fx.page.clone(), transport);

    let err = finish(handler.handle_click(ClickEvent::on(fx.like))).await.unwrap_err();

    assert!(matches!(err, VoteError::Network(_)));
    let alerts = fx.page.alerts();
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].starts_with("Network error: "));
    assert!(alerts[0].contains("connection refused"));
}

#[tokio::test]
async fn missing_csrf_token_blocks_the_request() {
    let fx = question_page(0);
    fx.page.set_cookie("sessionid=abc");
    let transport = ScriptedTransport::replying(vec![]);
    let handler = VoteHandler::attach(fx.page.clone(), transport.clone());

    let outcome = handler.handle_click(ClickEvent::on(fx.like));

    assert!(matches!(outcome, ClickOutcome::Aborted(VoteError::MissingCsrfToken)));
    assert!(transport.sent().is_empty());
    assert_eq!(
        fx.page.alerts(),
        vec!["CSRF token not found. Please refresh the page.".to_string()]
    );
}

#[tokio::test]
async fn form_field_token_is_preferred() {
    let fx = question_page(0);
    fx.page.push(Element::csrf_field("form-token"));
    let transport =
        ScriptedTransport::replying(vec![ok(serde_json::json!({ "success": true, "rating": 1, "user_vote": 1 }))]);
    let handler = VoteHandler::attach(fx.page.clone(), transport.clone());

    finish(handler.handle_click(ClickEvent::on(fx.like))).await.unwrap();

    assert_eq!(transport.sent()[0].csrf_token, "form-token");
}

#[tokio::test]
async fn unparseable_value_is_rejected_locally() {
    let fx = question_page(0);
    let broken = fx.page.push(
        Element::new()
            .with_class("like-btn")
            .with_data("type", "question")
            .with_data("id", "42")
            .with_data("value", "up"),
    );
    let transport = ScriptedTransport::replying(vec![]);
    let handler = VoteHandler::attach(fx.page.clone(), transport.clone());

    let outcome = handler.handle_click(ClickEvent::on(broken));

    assert!(matches!(outcome, ClickOutcome::Aborted(VoteError::InvalidValue(_))));
    assert!(transport.sent().is_empty());
    assert_eq!(fx.page.alerts(), vec!["Invalid vote value: up".to_string()]);
}

#[tokio::test]
async fn missing_counter_still_updates_highlighting() {
    let target = VoteTarget::question("9");
    let page = Arc::new(Document::new());
    let like = page.push(Element::vote_button(ButtonRole::Like, &target, VoteValue::LIKE));
    page.push(Element::vote_button(ButtonRole::Dislike, &target, VoteValue::DISLIKE));
    page.set_cookie("csrftoken=t");
    let transport =
        ScriptedTransport::replying(vec![ok(serde_json::json!({ "success": true, "rating": 2, "user_vote": 1 }))]);
    let handler = VoteHandler::attach(page.clone(), transport);

    finish(handler.handle_click(ClickEvent::on(like))).await.unwrap();

    assert_eq!(page.vote_state(&target), Some(ButtonState::Liked));
    assert!(page.alerts().is_empty());
}

#[tokio::test]
async fn unrecognized_type_updates_the_clicked_controls_only() {
    let page = Arc::new(Document::new());
    let comment = ControlKey::new("comment", "5");
    let comment_like = page.push(
        Element::new()
            .with_class("like-btn")
            .with_class("btn-outline-success")
            .with_data("type", "comment")
            .with_data("id", "5")
            .with_data("value", "1"),
    );
    page.push(
        Element::new()
            .with_class("dislike-btn")
            .with_class("btn-outline-danger")
            .with_data("type", "comment")
            .with_data("id", "5")
            .with_data("value", "-1"),
    );
    page.push(Element::new().with_id("comment-rating-5").with_text("0"));

    let answer = VoteTarget::answer("5");
    page.push(Element::vote_button(ButtonRole::Like, &answer, VoteValue::LIKE));
    page.push(Element::rating_counter(&answer, 100));
    page.push(Element::vote_button(ButtonRole::Dislike, &answer, VoteValue::DISLIKE));
    page.set_cookie("csrftoken=t");

    let transport =
        ScriptedTransport::replying(vec![ok(serde_json::json!({ "success": true, "rating": 9, "user_vote": 1 }))]);
    let handler = VoteHandler::attach(page.clone(), transport.clone());

    finish(handler.handle_click(ClickEvent::on(comment_like))).await.unwrap();

    // The request still goes to the answer endpoint.
    assert_eq!(transport.sent()[0].request.endpoint(), "/ajax/like/answer/");

    assert_eq!(page.text_of("comment-rating-5").as_deref(), Some("9"));
    assert_eq!(page.vote_state(&comment), Some(ButtonState::Liked));
    assert!(page.element(comment_like).unwrap().has_class("btn-success"));

    assert_eq!(page.text_of("answer-rating-5").as_deref(), Some("100"));
    assert_eq!(page.vote_state(&answer), Some(ButtonState::None));
}

/// Answers each vote after a delay chosen by its value, echoing the value
/// back as rating and user vote.
struct DelayedEcho {
    like_delay: Duration,
    dislike_delay: Duration,
}

impl VoteTransport for DelayedEcho {
    fn send(&self, vote: OutgoingVote) -> BoxFuture<'_, Result<VoteReply, ClientError>> {
        let value = vote.request.value.get();
        let delay = if value > 0 { self.like_delay } else { self.dislike_delay };
        Box::pin(async move {
            tokio::time::sleep(delay).await;
            Ok(VoteReply {
                status: 200,
                body: VoteResponse {
                    success: true,
                    rating: Some(i64::from(value)),
                    user_vote: Some(i64::from(value)),
                    error: None,
                },
            })
        })
    }
}

#[tokio::test(start_paused = true)]
async fn subscription_applies_replies_in_completion_order() {
    let fx = question_page(0);
    let transport = Arc::new(DelayedEcho {
        like_delay: Duration::from_millis(500),
        dislike_delay: Duration::from_millis(10),
    });
    let handler = VoteHandler::attach(fx.page.clone(), transport);

    let (tx, rx) = mpsc::channel(8);
    let subscription = handler.subscribe(rx);
    tx.send(ClickEvent::on(fx.like)).await.unwrap();
    tx.send(ClickEvent::on(fx.dislike)).await.unwrap();
    drop(tx);
    subscription.await.unwrap();

    // The like was clicked first but answered last, so it wins.
    assert_eq!(fx.page.text_of("question-rating-42").as_deref(), Some("1"));
    assert_eq!(fx.page.vote_state(&fx.target), Some(ButtonState::Liked));
    assert!(fx.page.alerts().is_empty());
}
