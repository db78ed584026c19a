//! Transport-facing surface: packet wrapping, recursive message dispatch,
//! and SLIP framing. Actual I/O stays with the caller.

mod packet;
pub mod slip;

pub use packet::{MessageHandler, Packet, MAX_PACKET_SIZE};
pub use slip::SlipDecoder;
