//! Online play through a relay
//!
//! The relay only forwards JSON messages between the two peers of a room.
//! Each peer runs its own [`crate::GameState`]; [`RoomSession`] tracks the room
//! handshake and [`OnlineClient`] moves messages between the game and a
//! [`Transport`].

pub mod client;
pub mod protocol;
pub mod room;
pub mod session;
pub mod transport;

pub use client::OnlineClient;
pub use protocol::Message;
pub use room::{generate_room_id, ROOM_ID_LEN};
pub use session::{ConnectionState, RoomSession, SessionEvent, SessionPhase, TerminalReason};
pub use transport::{ChannelTransport, Transport, TransportEvent};
