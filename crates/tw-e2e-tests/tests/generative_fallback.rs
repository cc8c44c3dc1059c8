//! E2E tests for the generative layer against a mock OpenAI-compatible
//! endpoint: narratives are optional, confirmations are not.

mod helpers;

use std::time::Duration;

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use helpers::{
    TestHarness, completion_body, mock_completion, mock_completion_failure, received_prompts,
};
use tw_api::pipeline::inquiry::FALLBACK_MESSAGE;
use tw_api::render::to_html;

const BOOK: &str = "I'd like to book a table for 4 on 2025-08-15 at 8 PM";
const CONFIRMATION: &str = "Reservation confirmed for 4 people on 2025-08-15 at 8:00 PM.";

/// A generated narrative is appended after the deterministic confirmation.
#[tokio::test]
async fn e2e_confirmation_with_narrative() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer gsk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
            "Thank you for choosing us! We look forward to hosting your party of **four**.",
        )))
        .expect(1)
        .mount(&server)
        .await;
    let h = TestHarness::with_llm_server(&server);

    let (reply, _) = h.chat(BOOK, None).await;
    assert_eq!(
        reply,
        format!(
            "<p>{CONFIRMATION}</p>\n<p>Thank you for choosing us! We look forward to hosting \
             your party of <strong>four</strong>.</p>"
        )
    );

    let prompts = received_prompts(&server).await;
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains(CONFIRMATION), "got {}", prompts[0]);
    assert_eq!(h.occupancy("2025-08-15", "8:00 PM").await, 4);
}

/// An upstream 500 still books the table and sends the confirmation alone.
#[tokio::test]
async fn e2e_upstream_error_keeps_confirmation() {
    let server = MockServer::start().await;
    mock_completion_failure(&server, 500).await;
    let h = TestHarness::with_llm_server(&server);

    let (reply, _) = h.chat(BOOK, None).await;
    assert_eq!(reply, format!("<p>{CONFIRMATION}</p>"));
    assert_eq!(h.occupancy("2025-08-15", "8:00 PM").await, 4);
}

/// A slow upstream times out without losing the booking.
#[tokio::test]
async fn e2e_upstream_timeout_keeps_confirmation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body("too late"))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;
    let h = TestHarness::with_llm_server(&server);

    let (reply, _) = h.chat(BOOK, None).await;
    assert_eq!(reply, format!("<p>{CONFIRMATION}</p>"));
    assert!(!reply.contains("too late"));
}

/// Rejections never call the model.
#[tokio::test]
async fn e2e_rejection_skips_generation() {
    let server = MockServer::start().await;
    mock_completion(&server, "should not appear").await;
    let h = TestHarness::with_llm_server(&server);
    h.seed("2025-08-15", "8:00 PM", 47).await;

    let (reply, _) = h.chat(BOOK, None).await;
    assert!(reply.contains("fully booked for 2025-08-15 at 8:00 PM"), "got {reply}");
    assert!(received_prompts(&server).await.is_empty());
}

/// A failed inquiry generation yields the fixed apology.
#[tokio::test]
async fn e2e_inquiry_generation_failure_apologizes() {
    let server = MockServer::start().await;
    mock_completion_failure(&server, 503).await;
    let h = TestHarness::with_llm_server(&server).with_sample_knowledge().await;

    let (reply, _) = h.chat("What are your opening hours?", None).await;
    assert_eq!(reply, to_html(FALLBACK_MESSAGE));
}

/// A successful inquiry returns the model's answer with retrieved context in the prompt.
#[tokio::test]
async fn e2e_inquiry_answer_uses_context() {
    let server = MockServer::start().await;
    mock_completion(&server, "We are open Tuesday to Sunday, 5 PM to 11 PM.").await;
    let h = TestHarness::with_llm_server(&server).with_sample_knowledge().await;

    let (reply, _) = h.chat("What are your opening hours?", None).await;
    assert_eq!(reply, "<p>We are open Tuesday to Sunday, 5 PM to 11 PM.</p>");

    let prompts = received_prompts(&server).await;
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].starts_with("Restaurant information:\n"));
    assert!(prompts[0].contains("closed on Mondays"));
    assert!(prompts[0].ends_with("Customer message: What are your opening hours?"));
}
