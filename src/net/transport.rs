//! Message channel to the relay
//!
//! The relay itself lives outside this crate. A transport only has to carry
//! JSON text frames in order; delivery is fire-and-forget.

use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};

use crate::error::TransportError;

use super::protocol::Message;

/// Something the transport observed since the last poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Opened,
    Message(Message),
    Closed,
    /// Frame that is not a known message; the channel is still usable
    Malformed(String),
    /// Channel failure
    Error(String),
}

pub trait Transport {
    /// Queue one message. No acknowledgement, no retry.
    fn send(&mut self, message: &Message) -> Result<(), TransportError>;

    /// Next pending event, without blocking
    fn poll(&mut self) -> Option<TransportEvent>;
}

/// In-process transport over a pair of std channels carrying JSON frames.
#[derive(Debug)]
pub struct ChannelTransport {
    tx: Option<Sender<String>>,
    rx: Receiver<String>,
    opened_reported: bool,
    closed_reported: bool,
}

impl ChannelTransport {
    /// Two endpoints wired to each other
    pub fn pair() -> (ChannelTransport, ChannelTransport) {
        let (a_tx, b_rx) = channel();
        let (b_tx, a_rx) = channel();
        (Self::new(a_tx, a_rx), Self::new(b_tx, b_rx))
    }

    fn new(tx: Sender<String>, rx: Receiver<String>) -> Self {
        Self {
            tx: Some(tx),
            rx,
            opened_reported: false,
            closed_reported: false,
        }
    }

    /// Send a raw frame, bypassing the codec
    pub fn send_raw(&mut self, frame: impl Into<String>) -> Result<(), TransportError> {
        let tx = self.tx.as_ref().ok_or(TransportError::Disconnected)?;
        tx.send(frame.into()).map_err(|_| TransportError::Disconnected)
    }

    /// Drop the sending half; the other endpoint sees `Closed`
    pub fn close(&mut self) {
        self.tx = None;
    }
}

impl Transport for ChannelTransport {
    fn send(&mut self, message: &Message) -> Result<(), TransportError> {
        let frame = message.to_json()?;
        self.send_raw(frame)
    }

    fn poll(&mut self) -> Option<TransportEvent> {
        if !self.opened_reported {
            self.opened_reported = true;
            return Some(TransportEvent::Opened);
        }
        match self.rx.try_recv() {
            Ok(frame) => Some(match Message::from_json(&frame) {
                Ok(message) => TransportEvent::Message(message),
                Err(e) => TransportEvent::Malformed(e.to_string()),
            }),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) if !self.closed_reported => {
                self.closed_reported = true;
                Some(TransportEvent::Closed)
            }
            Err(TryRecvError::Disconnected) => None,
        }
    }
}
