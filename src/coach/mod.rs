//! Coach response engine.
//!
//! A message is classified against the catalog ([`intent`]) and rendered
//! from the personality templates ([`templates`]). [`Coach::respond`] adds the
//! artificial thinking delay; [`Coach::converse`] also records both sides of
//! the exchange in a [`ChatLog`] and swaps failures for a fallback reply.

pub mod intent;
pub mod phrases;
pub mod templates;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;

use crate::types::{ChatMessage, Personality, Sender, Skill};

use self::intent::IntentClassifier;
use self::phrases::{PhraseSource, RandomPhrases};

pub const GREETING: &str = "Hi! I'm your skill coach. Ask me about any skill in your garden, \
                            study strategies, project ideas or career advice.";

pub const FALLBACK_REPLY: &str =
    "Sorry, I'm having some technical difficulties right now. Please try again in a moment.";

#[derive(Debug, Error)]
pub enum CoachError {
    #[error("Failed to generate a response: {0}")]
    ResponseGeneration(String),
    #[error("Invalid intent pattern: {0}")]
    Pattern(#[from] regex::Error),
}

pub struct Coach {
    classifier: Arc<IntentClassifier>,
    phrases: Arc<Mutex<Box<dyn PhraseSource>>>,
    latency: Duration,
}

impl Coach {
    pub fn new(latency: Duration) -> Result<Self, CoachError> {
        Ok(Self {
            classifier: Arc::new(IntentClassifier::new()?),
            phrases: Arc::new(Mutex::new(Box::new(RandomPhrases))),
            latency,
        })
    }

    pub fn with_phrases(mut self, source: Box<dyn PhraseSource>) -> Self {
        self.phrases = Arc::new(Mutex::new(source));
        self
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    /// Waits out the configured latency, then renders the reply. Rendering
    /// runs on the blocking pool so a misbehaving phrase source surfaces as
    /// [`CoachError::ResponseGeneration`] instead of unwinding the caller.
    pub async fn respond(
        &self,
        message: &str,
        skills: &[Skill],
        personality: Personality,
    ) -> Result<String, CoachError> {
        tokio::time::sleep(self.latency).await;

        let classifier = self.classifier.clone();
        let phrases = self.phrases.clone();
        let message = message.to_string();
        let skills = skills.to_vec();

        tokio::task::spawn_blocking(move || {
            let intent = classifier.classify(&message, &skills);
            tracing::debug!(?intent, %personality, "coach intent");
            // A source that panicked on an earlier call is still usable.
            let mut source = phrases.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            Ok(templates::render(intent, &skills, personality, &mut **source))
        })
        .await
        .map_err(|e| CoachError::ResponseGeneration(e.to_string()))?
    }

    /// Appends the user message and the coach's reply to `log` and returns
    /// the reply. Never fails: on error the fallback reply is recorded.
    pub async fn converse<'a>(
        &self,
        log: &'a mut ChatLog,
        message: &str,
        skills: &[Skill],
        personality: Personality,
    ) -> &'a ChatMessage {
        log.push(ChatMessage::new(Sender::User, message));
        let reply = match self.respond(message, skills, personality).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(error = %e, "coach response failed, using fallback");
                FALLBACK_REPLY.to_string()
            }
        };
        log.push(ChatMessage::new(Sender::Assistant, reply))
    }
}

/// Append-only conversation log. Starts with, and is reset to, the greeting.
#[derive(Clone, Debug)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
}

impl Default for ChatLog {
    fn default() -> Self {
        Self {
            messages: vec![ChatMessage::new(Sender::Assistant, GREETING)],
        }
    }
}

impl ChatLog {
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn push(&mut self, message: ChatMessage) -> &ChatMessage {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
