use std::time::{Duration, Instant};

use crate::controller::WidgetController;
use crate::error::RelayError;
use crate::relay::{Relay, RelayClient, RelayResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Terminal-side state around the widget controller: draft cursor,
/// transcript scroll, the in-flight send task, and the tick-driven
/// animation and welcome timers.
pub struct App {
    pub should_quit: bool,
    pub input_mode: InputMode,

    pub controller: WidgetController,
    relay: RelayClient,
    send_task: Option<tokio::task::JoinHandle<RelayResult>>,

    // Draft cursor position, in chars
    pub cursor: usize,

    // Transcript viewport
    pub scroll: u16,
    pub chat_height: u16,
    pub chat_width: u16,

    // 0-2 for the ellipsis animation
    pub animation_frame: u8,

    started: Instant,
}

impl App {
    pub fn new(controller: WidgetController, relay: RelayClient) -> Self {
        Self {
            should_quit: false,
            input_mode: InputMode::Normal,
            controller,
            relay,
            send_task: None,
            cursor: 0,
            scroll: 0,
            chat_height: 0,
            chat_width: 0,
            animation_frame: 0,
            started: Instant::now(),
        }
    }

    /// Stage the draft and put the send on the wire.
    ///
    /// The controller enforces the at-most-one-in-flight guard; when it
    /// refuses, nothing is spawned and the draft stays put.
    pub fn submit(&mut self) {
        if let Some(request) = self.controller.begin_submit() {
            let relay = self.relay.clone();
            self.send_task = Some(tokio::spawn(async move { relay.send(request).await }));
            self.cursor = 0;
            self.scroll_to_bottom();
        }
    }

    /// Advance timers: welcome delay, loading animation, and completion
    /// of the in-flight send task.
    pub async fn tick(&mut self) {
        let welcome_delay = Duration::from_millis(self.controller.options().welcome_delay_ms);
        if self.started.elapsed() >= welcome_delay {
            self.controller.welcome();
        }

        if self.controller.is_processing() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }

        let finished = self
            .send_task
            .as_ref()
            .map(|task| task.is_finished())
            .unwrap_or(false);
        if finished {
            if let Some(task) = self.send_task.take() {
                let outcome = match task.await {
                    Ok(outcome) => outcome,
                    Err(e) => Err(RelayError::Unknown(format!("send task panicked: {}", e))),
                };
                self.controller.complete_submit(outcome);
                self.scroll_to_bottom();
            }
        }
    }

    // Transcript scrolling
    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        let max = self.transcript_lines().saturating_sub(self.chat_height);
        if self.scroll < max {
            self.scroll += 1;
        }
    }

    /// Keep the latest bubble (or the loading indicator) visible
    pub fn scroll_to_bottom(&mut self) {
        let total = self.transcript_lines();
        let visible = if self.chat_height > 0 { self.chat_height } else { 20 };
        self.scroll = total.saturating_sub(visible);
    }

    /// Rendered height of the transcript at the current chat width
    fn transcript_lines(&self) -> u16 {
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total: u16 = 0;
        for message in self.controller.transcript() {
            total += 1; // sender line
            for line in message.text.lines() {
                // Character count, not byte length, for UTF-8 content
                let chars = line.chars().count();
                if chars == 0 {
                    total += 1;
                } else {
                    total += ((chars / wrap_width) + 1) as u16;
                }
            }
            total += 1; // blank line after each bubble
        }

        if self.controller.is_processing() {
            total += 2; // sender line + loading indicator
        }

        total
    }
}
