//! Glue between a [`GameState`] and a [`Transport`]

use crate::game::GameState;

use super::session::SessionEvent;
use super::transport::{Transport, TransportEvent};

/// A match driven by messages from the relay
pub struct OnlineClient<T: Transport> {
    game: GameState,
    transport: T,
}

impl<T: Transport> OnlineClient<T> {
    pub fn new(game: GameState, transport: T) -> Self {
        Self { game, transport }
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut GameState {
        &mut self.game
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_parts(self) -> (GameState, T) {
        (self.game, self.transport)
    }

    /// Send every queued outbound message. Failures are logged and dropped.
    pub fn flush(&mut self) -> usize {
        let mut sent = 0;
        for message in self.game.take_outbound() {
            match self.transport.send(&message) {
                Ok(()) => sent += 1,
                Err(e) => tracing::warn!(kind = message.kind(), error = %e, "send failed"),
            }
        }
        sent
    }

    /// Exchange everything pending in both directions.
    ///
    /// Returns the session events produced by inbound messages, in arrival order.
    pub fn pump(&mut self) -> Vec<SessionEvent> {
        self.flush();
        let mut events = Vec::new();
        while let Some(event) = self.transport.poll() {
            match event {
                TransportEvent::Opened => self.game.on_transport_opened(),
                TransportEvent::Message(message) => {
                    tracing::trace!(kind = message.kind(), "inbound");
                    events.push(self.game.apply_session_message(message));
                }
                TransportEvent::Closed => self.game.on_transport_closed(),
                TransportEvent::Malformed(e) => {
                    tracing::warn!(error = %e, "dropping undecodable frame");
                }
                TransportEvent::Error(e) => self.game.on_transport_error(&e),
            }
        }
        self.flush();
        events
    }
}
