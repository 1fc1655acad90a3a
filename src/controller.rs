//! The widget controller: one explicitly constructed instance per widget,
//! owning the session state and the transcript.
//!
//! The controller serializes sends itself: `begin_submit` refuses while a
//! send is in flight, so at most one relay request exists per widget at
//! any time. Nothing is queued and nothing is retried; a failed send
//! leaves the widget ready for the next attempt.

use crate::config::{CloseStyle, WidgetOptions};
use crate::locale::{Direction, Locale, Strings};
use crate::message::Message;
use crate::relay::{Relay, RelayRequest, RelayResult};

pub struct WidgetController {
    locale: Locale,
    options: WidgetOptions,
    token: Option<String>,

    pub is_open: bool,
    pub is_minimized: bool,
    is_processing: bool,
    pub draft: String,

    messages: Vec<Message>,
    welcomed: bool,
}

impl WidgetController {
    pub fn new(locale: Locale, options: WidgetOptions, token: Option<String>) -> Self {
        Self {
            locale,
            options,
            token,
            is_open: false,
            is_minimized: false,
            is_processing: false,
            draft: String::new(),
            messages: Vec::new(),
            welcomed: false,
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn strings(&self) -> Strings {
        self.locale.strings()
    }

    pub fn direction(&self) -> Direction {
        self.locale.direction()
    }

    pub fn is_processing(&self) -> bool {
        self.is_processing
    }

    pub fn open(&mut self) {
        self.is_open = true;
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }

    pub fn toggle_minimize(&mut self) {
        self.is_minimized = !self.is_minimized;
    }

    /// What the header button does depends on the configured style
    pub fn dismiss(&mut self) {
        match self.options.close_style {
            CloseStyle::Minimize => self.toggle_minimize(),
            CloseStyle::Dismiss => self.close(),
        }
    }

    /// Append the locale's greeting once. The front-end decides when,
    /// honoring the configured delay.
    pub fn welcome(&mut self) {
        if !self.welcomed {
            self.messages.push(Message::assistant(self.strings().welcome));
            self.welcomed = true;
        }
    }

    /// Apply the submit preconditions and stage the send.
    ///
    /// Returns the request to put on the wire, or None when the trimmed
    /// draft is empty or a send is already in flight. A None is a silent
    /// no-op: the draft, log, and processing flag are untouched.
    pub fn begin_submit(&mut self) -> Option<RelayRequest> {
        if self.is_processing {
            return None;
        }

        let trimmed = self.draft.trim();
        if trimmed.is_empty() {
            return None;
        }

        let message = trimmed.to_string();
        self.messages.push(Message::user(message.clone()));
        self.draft.clear();
        self.is_processing = true;

        Some(RelayRequest {
            message,
            language: Some(self.locale.as_str().to_string()),
            token: self.token.clone(),
        })
    }

    /// Fold the relay outcome back into the transcript.
    ///
    /// Failures become the locale's fixed fallback bubble; the underlying
    /// reason goes to the operator log, never to the user.
    pub fn complete_submit(&mut self, outcome: RelayResult) {
        match outcome {
            Ok(reply) => self.messages.push(Message::assistant(reply)),
            Err(reason) => {
                tracing::warn!(%reason, "relay send failed");
                self.messages.push(Message::fallback(self.strings().error_message));
            }
        }
        self.is_processing = false;
    }

    /// One full send: stage, await the relay, fold the result back in.
    pub async fn submit<R: Relay + ?Sized>(&mut self, relay: &R) {
        if let Some(request) = self.begin_submit() {
            let outcome = relay.send(request).await;
            self.complete_submit(outcome);
        }
    }

    /// The transcript in insertion order; pure projection
    pub fn transcript(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    /// Rows the input box needs for the current draft at the given width,
    /// clamped to the configured auto-resize bounds
    pub fn input_height(&self, width: u16) -> u16 {
        let width = width.max(1) as usize;
        let mut rows = 0u16;
        for line in self.draft.split('\n') {
            let chars = line.chars().count();
            rows += ((chars / width) + 1) as u16;
        }
        rows.max(self.options.resize_min_rows)
            .min(self.options.resize_max_rows)
    }

    pub fn options(&self) -> &WidgetOptions {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RelayError;
    use crate::message::Sender;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Relay double that records every message it is asked to send
    struct FakeRelay {
        reply: Option<String>,
        sent: Mutex<Vec<String>>,
    }

    impl FakeRelay {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Some(reply.to_string()),
                sent: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: None,
                sent: Mutex::new(Vec::new()),
            }
        }

        fn sent(&self) -> Vec<String> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Relay for FakeRelay {
        async fn send(&self, request: RelayRequest) -> RelayResult {
            self.sent.lock().unwrap().push(request.message);
            match &self.reply {
                Some(reply) => Ok(reply.clone()),
                None => Err(RelayError::Upstream("relay request timed out".to_string())),
            }
        }
    }

    fn controller() -> WidgetController {
        WidgetController::new(Locale::En, WidgetOptions::default(), None)
    }

    #[tokio::test]
    async fn test_submit_appends_user_then_assistant() {
        let relay = FakeRelay::replying("Hi there!");
        let mut widget = controller();
        widget.draft = "Hello".to_string();

        widget.submit(&relay).await;

        let transcript: Vec<_> = widget.transcript().collect();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].sender, Sender::User);
        assert_eq!(transcript[0].text, "Hello");
        assert_eq!(transcript[1].sender, Sender::Assistant);
        assert_eq!(transcript[1].text, "Hi there!");
        assert!(!transcript[1].error);
        assert!(!widget.is_processing());
        assert!(widget.draft.is_empty());
    }

    #[tokio::test]
    async fn test_failed_submit_appends_fallback() {
        let relay = FakeRelay::failing();
        let mut widget = controller();
        widget.draft = "Hello".to_string();

        widget.submit(&relay).await;

        let transcript: Vec<_> = widget.transcript().collect();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].text, "Hello");
        assert_eq!(transcript[1].text, Locale::En.strings().error_message);
        assert!(transcript[1].error);
        assert!(!widget.is_processing());
    }

    #[tokio::test]
    async fn test_empty_and_whitespace_drafts_are_noops() {
        let relay = FakeRelay::replying("Hi there!");
        let mut widget = controller();

        for draft in ["", "   ", "\n\t "] {
            widget.draft = draft.to_string();
            widget.submit(&relay).await;
        }

        assert_eq!(widget.transcript().count(), 0);
        assert!(!widget.is_processing());
        assert!(relay.sent().is_empty());
    }

    #[test]
    fn test_second_submit_while_in_flight_is_dropped() {
        let mut widget = controller();

        widget.draft = "A".to_string();
        let first = widget.begin_submit();
        assert!(first.is_some());

        // "B" arrives before the first send resolves
        widget.draft = "B".to_string();
        assert!(widget.begin_submit().is_none());
        assert_eq!(widget.draft, "B");

        widget.complete_submit(Ok("reply to A".to_string()));

        let texts: Vec<_> = widget.transcript().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["A", "reply to A"]);

        // The guard lifts once the first send completes
        assert!(widget.begin_submit().is_some());
    }

    #[tokio::test]
    async fn test_only_first_message_reaches_relay() {
        let relay = FakeRelay::replying("ok");
        let mut widget = controller();

        widget.draft = "A".to_string();
        let request = widget.begin_submit().unwrap();
        widget.draft = "B".to_string();
        widget.submit(&relay).await; // rejected, still processing
        widget.complete_submit(relay.send(request).await);

        assert_eq!(relay.sent(), vec!["A".to_string()]);
    }

    #[test]
    fn test_open_close_and_minimize_restore() {
        let mut widget = controller();

        assert!(!widget.is_open);
        widget.open();
        assert!(widget.is_open);
        widget.close();
        assert!(!widget.is_open);

        widget.toggle_minimize();
        widget.toggle_minimize();
        assert!(!widget.is_minimized);
    }

    #[test]
    fn test_minimize_leaves_log_and_flag_alone() {
        let mut widget = controller();
        widget.draft = "Hello".to_string();
        widget.begin_submit();

        widget.toggle_minimize();
        assert!(widget.is_processing());
        assert_eq!(widget.transcript().count(), 1);
    }

    #[test]
    fn test_dismiss_follows_close_style() {
        let mut minimizing = controller();
        minimizing.open();
        minimizing.dismiss();
        assert!(minimizing.is_open);
        assert!(minimizing.is_minimized);

        let options = WidgetOptions {
            close_style: CloseStyle::Dismiss,
            ..WidgetOptions::default()
        };
        let mut dismissing = WidgetController::new(Locale::En, options, None);
        dismissing.open();
        dismissing.dismiss();
        assert!(!dismissing.is_open);
        assert!(!dismissing.is_minimized);
    }

    #[test]
    fn test_welcome_appears_once() {
        let mut widget = controller();
        widget.welcome();
        widget.welcome();

        let transcript: Vec<_> = widget.transcript().collect();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript[0].text, Locale::En.strings().welcome);
    }

    #[test]
    fn test_request_carries_locale_and_token() {
        let mut widget = WidgetController::new(
            Locale::Ar,
            WidgetOptions::default(),
            Some("nonce123".to_string()),
        );
        widget.draft = "مرحبا".to_string();

        let request = widget.begin_submit().unwrap();
        assert_eq!(request.language.as_deref(), Some("ar"));
        assert_eq!(request.token.as_deref(), Some("nonce123"));
    }

    #[test]
    fn test_submit_trims_draft() {
        let mut widget = controller();
        widget.draft = "  Hello  \n".to_string();

        let request = widget.begin_submit().unwrap();
        assert_eq!(request.message, "Hello");
        assert_eq!(widget.transcript().next().unwrap().text, "Hello");
    }

    #[test]
    fn test_input_height_respects_bounds() {
        let mut widget = controller();
        assert_eq!(widget.input_height(40), 1);

        widget.draft = "x".repeat(200);
        assert_eq!(widget.input_height(40), 3); // clamped at max

        widget.draft = "one\ntwo".to_string();
        assert_eq!(widget.input_height(40), 2);
    }
}
