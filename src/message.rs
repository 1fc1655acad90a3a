//! Transcript types shared between the widget front-ends.
//!
//! Messages are immutable once created and live only in the controller's
//! in-memory log for the lifetime of one widget session.

use serde::{Deserialize, Serialize};

/// A single chat bubble in the transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
    /// Assistant messages produced from a failed relay call are tagged so
    /// the UI can style them differently. Always false for user messages.
    pub error: bool,
}

/// Who produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    User,
    Assistant,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            error: false,
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Assistant,
            text: text.into(),
            error: false,
        }
    }

    /// The fixed fallback shown when a send fails
    pub fn fallback(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Assistant,
            text: text.into(),
            error: true,
        }
    }
}
