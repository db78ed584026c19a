//! OSC 1.0 protocol core: argument types, message and bundle codecs, and
//! the address pattern matcher.

pub mod address;
mod bundle;
mod error;
mod message;
mod types;
mod wire;

pub use bundle::Bundle;
pub use error::{Error, Result};
pub use message::Message;
pub use types::{MidiMessage, RgbaColour, TimeTag, TypeTag};

/// Maximum packet size permitted by the transport layer.
///
/// Caps the size of a packet, bundle, message, and the SLIP buffers.
/// 1472 bytes is the common UDP payload limit for a 1500-byte MTU.
pub const MAX_TRANSPORT_SIZE: usize = 1472;

/// Maximum address pattern length in bytes, excluding the terminator.
pub const MAX_ADDRESS_PATTERN_LENGTH: usize = 64;

/// Maximum number of arguments a message may carry.
pub const MAX_ARGUMENTS: usize = 16;

/// Maximum type tag string length, including the leading comma.
pub const MAX_TYPE_TAG_LENGTH: usize = MAX_ARGUMENTS + 1;

/// Minimum size of a serialized OSC message (`/\0\0\0,\0\0\0`).
pub const MIN_MESSAGE_SIZE: usize = 8;

/// Maximum size of a serialized OSC message.
pub const MAX_MESSAGE_SIZE: usize = MAX_TRANSPORT_SIZE;

/// Maximum combined size of all argument payloads in one message.
///
/// Assumes the worst case of the address pattern and type tag string each
/// costing four extra padding bytes.
pub const MAX_ARGUMENTS_SIZE: usize =
    MAX_MESSAGE_SIZE - (MAX_ADDRESS_PATTERN_LENGTH + 4) - (MAX_TYPE_TAG_LENGTH + 4);

/// The 8-byte literal opening every serialized bundle.
pub const BUNDLE_HEADER: [u8; 8] = *b"#bundle\0";

/// Minimum size of a serialized OSC bundle (header plus time tag).
pub const MIN_BUNDLE_SIZE: usize = 16;

/// Maximum size of a serialized OSC bundle.
pub const MAX_BUNDLE_SIZE: usize = MAX_TRANSPORT_SIZE;

/// Maximum combined size of all size-prefixed elements in one bundle.
pub const MAX_BUNDLE_ELEMENTS_SIZE: usize = MAX_BUNDLE_SIZE - MIN_BUNDLE_SIZE;

/// Serialized form shared by OSC messages and bundles.
///
/// Messages and bundles are the only kinds of contents an OSC packet or a
/// bundle element may hold; this trait is how they enter containers on the
/// send path. On the receive path, where only bytes exist, the first byte
/// (`/` or `#`) distinguishes the two.
pub trait Contents {
    /// Size in bytes of the serialized form.
    fn size(&self) -> usize;

    /// Serialize into `destination`, returning the number of bytes written.
    fn write_to(&self, destination: &mut [u8]) -> Result<usize>;
}
