//! oscwire - Portable OSC 1.0 codec with SLIP framing
//!
//! This library implements bit-exact construction and parsing of Open Sound
//! Control messages, bundles, and packets, the OSC glob-style address
//! pattern matcher, and SLIP framing for carrying packets over unframed
//! byte streams. Transport I/O stays with the caller: bytes in, bytes out,
//! and a handler per dispatched message.
//!
//! All storage is held inline in fixed buffers sized by
//! [`MAX_TRANSPORT_SIZE`](protocol::MAX_TRANSPORT_SIZE), so entities can
//! live on the stack or in static memory and no work is deferred past the
//! calling thread.
//!
//! # Quick Start
//!
//! ```rust
//! use oscwire::{Message, Packet};
//! use oscwire::transport::slip;
//!
//! // Send path: build a message, wrap it, frame it.
//! let mut message = Message::new("/oscillator/frequency")?;
//! message.add_f32(440.0)?;
//!
//! let packet = Packet::from_contents(&message)?;
//! let mut frame = [0u8; 64];
//! let size = slip::encode(&packet, &mut frame)?;
//! assert_eq!(frame[size - 1], slip::END);
//!
//! // Receive path: feed bytes, handle each message.
//! let mut decoder = oscwire::SlipDecoder::new();
//! decoder.set_packet_handler(|packet| {
//!     packet.set_message_handler(|_time_tag, message| {
//!         println!("{} Hz", message.read_f32().unwrap_or_default());
//!     });
//!     packet.process_messages()
//! });
//! for &byte in &frame[..size] {
//!     decoder.feed(byte)?;
//! }
//! # Ok::<(), oscwire::Error>(())
//! ```
//!
//! # Features
//!
//! - **Bit-exact wire format** - big-endian encodings, 4-byte alignment,
//!   and all 17 OSC 1.0 argument type tags including array markers
//! - **Recursive bundles** - nested time-tagged bundles with depth-first
//!   dispatch, innermost time tag winning
//! - **Glob address matching** - `?`, `*`, `[...]` sets and ranges, and
//!   `{...,...}` alternation, with partial-prefix matching
//! - **Fixed buffers** - no allocation in the codec paths; sizes bounded
//!   at build time by the transport limit

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_precision_loss)]

pub mod protocol;
pub mod transport;

pub use protocol::{
    Bundle, Contents, Error, Message, MidiMessage, Result, RgbaColour, TimeTag, TypeTag,
};
pub use transport::{Packet, SlipDecoder};
