//! Input buffer, transcript and single-flight guard for the assistant.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::client::ChatClient;
use crate::error::AssistantError;

/// One answered question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub question: String,
    pub answer: String,
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Question: {}\nAnswer: {}\n\n", self.question, self.answer)
    }
}

/// Append-only log of answered questions.
#[derive(Debug, Default, Clone)]
pub struct Transcript {
    text: String,
    exchanges: usize,
}

impl Transcript {
    pub fn push(&mut self, exchange: &Exchange) {
        self.text.push_str(&exchange.to_string());
        self.exchanges += 1;
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.exchanges
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exchanges == 0
    }
}

/// Releases the in-flight flag when dropped.
#[derive(Debug)]
struct InFlightGuard(Arc<AtomicBool>);

impl InFlightGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(Arc::clone(flag)))
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// A prompt taken from the panel, holding the in-flight slot until it
/// completes or is dropped. `Send`, so it can run on a spawned task.
#[derive(Debug)]
pub struct PendingAsk {
    client: ChatClient,
    prompt: String,
    _guard: InFlightGuard,
}

impl PendingAsk {
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Performs the request. The in-flight slot is released on return,
    /// whatever the outcome.
    ///
    /// # Errors
    ///
    /// Propagates [`ChatClient::ask`] errors.
    pub async fn run(self) -> Result<Exchange, AssistantError> {
        let answer = self.client.ask(&self.prompt).await?;
        Ok(Exchange {
            question: self.prompt,
            answer,
        })
    }
}

/// The assistant's interactive state.
pub struct ChatPanel {
    client: ChatClient,
    input: String,
    transcript: Transcript,
    in_flight: Arc<AtomicBool>,
}

impl ChatPanel {
    #[must_use]
    pub fn new(client: ChatClient) -> Self {
        Self {
            client,
            input: String::new(),
            transcript: Transcript::default(),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn set_input(&mut self, text: &str) {
        text.clone_into(&mut self.input);
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[must_use]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Takes the current input as a prompt and claims the in-flight slot.
    ///
    /// On success the input stays as typed until [`finish`](Self::finish)
    /// settles the request. Rejected input is cleared straight away.
    ///
    /// # Errors
    ///
    /// - [`AssistantError::EmptyPrompt`] if the input is blank.
    /// - [`AssistantError::Busy`] while another prompt is in flight.
    pub fn begin(&mut self) -> Result<PendingAsk, AssistantError> {
        let prompt = self.input.trim().to_owned();
        if prompt.is_empty() {
            self.input.clear();
            return Err(AssistantError::EmptyPrompt);
        }
        let Some(guard) = InFlightGuard::acquire(&self.in_flight) else {
            self.input.clear();
            return Err(AssistantError::Busy);
        };
        Ok(PendingAsk {
            client: self.client.clone(),
            prompt,
            _guard: guard,
        })
    }

    /// Settles a request started with [`begin`](Self::begin): clears the
    /// input and appends the exchange to the transcript on success.
    ///
    /// # Errors
    ///
    /// Hands `result` back unchanged; the transcript is left alone on error.
    pub fn finish(
        &mut self,
        result: Result<Exchange, AssistantError>,
    ) -> Result<Exchange, AssistantError> {
        self.input.clear();
        let exchange = result?;
        self.transcript.push(&exchange);
        Ok(exchange)
    }

    /// Runs [`begin`](Self::begin), the request and [`finish`](Self::finish)
    /// in one step.
    ///
    /// # Errors
    ///
    /// Returns the `begin` or request error; the transcript is only appended
    /// on success.
    pub async fn submit(&mut self) -> Result<Exchange, AssistantError> {
        let pending = self.begin()?;
        let result = pending.run().await;
        self.finish(result)
    }
}
