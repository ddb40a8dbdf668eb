//! Button input from text lines
//!
//! A reader thread turns each line into a button press: `u`/`up` is Up,
//! `d`/`down` is Down, anything else (including an empty line) is Enter.
//! While the motion controller polls for aborts, any line counts as one.

use std::io::{self, BufRead};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use cubot_core::traits::{AbortSource, ButtonEvent, ButtonInput};
use tracing::debug;

/// Map an input line to a button
pub fn parse_line(line: &str) -> ButtonEvent {
    match line.trim().to_ascii_lowercase().as_str() {
        "u" | "up" => ButtonEvent::Up,
        "d" | "down" => ButtonEvent::Down,
        _ => ButtonEvent::Enter,
    }
}

/// Button source fed by a line reader
pub struct LineButtons {
    events: Receiver<ButtonEvent>,
    /// Event seen by an abort poll but not yet consumed
    pending: Option<ButtonEvent>,
}

impl LineButtons {
    /// Read buttons from standard input
    pub fn stdin() -> Self {
        Self::from_reader(io::BufReader::new(io::stdin()))
    }

    pub fn from_reader<R: BufRead + Send + 'static>(reader: R) -> Self {
        let (tx, events) = mpsc::channel();
        thread::spawn(move || {
            for line in reader.lines() {
                let Ok(line) = line else { break };
                let event = parse_line(&line);
                debug!(?event, "button");
                if tx.send(event).is_err() {
                    break;
                }
            }
        });

        Self {
            events,
            pending: None,
        }
    }
}

impl AbortSource for LineButtons {
    fn has_pending_abort(&mut self) -> bool {
        if self.pending.is_none() {
            match self.events.try_recv() {
                Ok(event) => self.pending = Some(event),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => {}
            }
        }
        self.pending.is_some()
    }

    fn consume_abort(&mut self) {
        self.pending = None;
    }
}

impl ButtonInput for LineButtons {
    fn wait_for_button(&mut self) -> Option<ButtonEvent> {
        self.pending.take().or_else(|| self.events.recv().ok())
    }
}
