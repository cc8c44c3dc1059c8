//! Inquiry pipeline: relevance gate → retrieval → bounded generation.

use std::sync::Arc;

use rand::seq::SliceRandom;
use tw_knowledge::{KnowledgeError, SimilaritySearch};
use tw_nlu::TopicClassifier;

use super::ChatReply;
use crate::llm::{CompletionRequest, TextCompletion};
use crate::sessions::Turn;

/// Reply when the knowledge base has not been initialized.
pub const NOT_READY_MESSAGE: &str = "I'm still getting to know our restaurant, so I can't answer \
questions just yet. Please try again shortly. I can already help you book a table!";

/// Reply when generation fails.
pub const FALLBACK_MESSAGE: &str = "I'm sorry, I'm having trouble answering that right now. \
Please try again in a moment or contact the restaurant directly.";

/// Replies for out-of-domain inquiries, one picked at random.
pub const DEFLECTIONS: &[&str] = &[
    "I'm here to help with questions about our restaurant, such as the menu, opening hours \
     and reservations. Is there something about dining with us I can help you with?",
    "That's outside what I can help with, I'm afraid. Ask me about our dishes, special \
     events or booking a table!",
    "I can only answer questions about our restaurant. Would you like to hear about today's \
     menu or make a reservation?",
    "Sorry, I'm just the restaurant's assistant! I'd be happy to tell you about our food, \
     location or availability instead.",
];

const INQUIRY_DIRECTIVE: &str = "You are the information specialist for a restaurant. \
Answer only questions about this restaurant: its cuisine, menu, opening hours, location, \
events, services and policies. Use the restaurant information provided and do not invent \
facts. Answer in 2-3 sentences. If the question is unrelated to the restaurant, politely \
decline and offer to help with restaurant questions instead.";

/// Turns of history included in the prompt.
const HISTORY_TURNS: usize = 3;

pub struct InquiryPipeline {
    classifier: TopicClassifier,
    knowledge: Arc<dyn SimilaritySearch>,
    completion: Arc<dyn TextCompletion>,
    top_k: usize,
}

impl InquiryPipeline {
    pub fn new(
        knowledge: Arc<dyn SimilaritySearch>,
        completion: Arc<dyn TextCompletion>,
        top_k: usize,
    ) -> Self {
        Self {
            classifier: TopicClassifier::new(),
            knowledge,
            completion,
            top_k,
        }
    }

    pub async fn handle(&self, message: &str, history: &[Turn]) -> ChatReply {
        if !self.knowledge.is_ready().await {
            tracing::info!("inquiry received before knowledge base initialization");
            return ChatReply::new(NOT_READY_MESSAGE);
        }

        let score = self.classifier.classify(message);
        if !score.is_relevant {
            tracing::info!(confidence = score.confidence, "inquiry deflected as off-topic");
            let deflection = DEFLECTIONS
                .choose(&mut rand::thread_rng())
                .copied()
                .unwrap_or(FALLBACK_MESSAGE);
            return ChatReply::new(deflection);
        }
        tracing::debug!(confidence = score.confidence, "inquiry accepted");

        let passages = match self.knowledge.similarity_search(message, self.top_k).await {
            Ok(passages) => passages,
            Err(KnowledgeError::NotReady) => return ChatReply::new(NOT_READY_MESSAGE),
            Err(e) => {
                tracing::warn!(error = %e, "knowledge retrieval failed");
                return ChatReply::new(FALLBACK_MESSAGE);
            }
        };
        let context = passages
            .iter()
            .map(|p| p.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let request = CompletionRequest::new(INQUIRY_DIRECTIVE, compose_prompt(message, history))
            .with_context(context);
        match self.completion.complete(&request).await {
            Ok(answer) => ChatReply::new(answer),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    provider = self.completion.provider_name(),
                    "inquiry generation failed, sending fallback"
                );
                ChatReply::new(FALLBACK_MESSAGE)
            }
        }
    }
}

fn compose_prompt(message: &str, history: &[Turn]) -> String {
    let recent = &history[history.len().saturating_sub(HISTORY_TURNS)..];
    if recent.is_empty() {
        return message.to_string();
    }
    let mut prompt = String::from("Earlier in this conversation:\n");
    for turn in recent {
        prompt.push_str(&format!("Customer: {}\nAssistant: {}\n", turn.user, turn.assistant));
    }
    prompt.push('\n');
    prompt.push_str(message);
    prompt
}
