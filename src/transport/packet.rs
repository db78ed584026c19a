//! OSC packet wrapping and recursive message dispatch.

use core::fmt;

use tracing::trace;

use crate::protocol::{Bundle, Contents, Error, Message, Result, TimeTag, MAX_TRANSPORT_SIZE};

/// Maximum OSC packet size, limited by the transport layer.
pub const MAX_PACKET_SIZE: usize = MAX_TRANSPORT_SIZE;

/// Handler invoked for each message found while processing a packet.
///
/// Receives the time tag of the innermost enclosing bundle, or `None` for a
/// message that is the packet's immediate contents. The message reference
/// is only valid for the duration of the call.
pub type MessageHandler = Box<dyn FnMut(Option<TimeTag>, &mut Message)>;

/// An OSC packet: the unit handed to and received from the transport.
///
/// The contents are a single serialized message or bundle. An installed
/// message handler is invoked per contained message by
/// [`Packet::process_messages`].
pub struct Packet {
    contents: [u8; MAX_PACKET_SIZE],
    size: usize,
    handler: Option<MessageHandler>,
}

impl Packet {
    /// Create an empty packet with no handler installed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            contents: [0; MAX_PACKET_SIZE],
            size: 0,
            handler: None,
        }
    }

    /// Create a packet holding the serialized form of a message or bundle.
    pub fn from_contents(contents: &impl Contents) -> Result<Self> {
        let mut packet = Self::new();
        packet.size = contents.write_to(&mut packet.contents)?;
        Ok(packet)
    }

    /// Create a packet from received bytes.
    pub fn from_bytes(source: &[u8]) -> Result<Self> {
        if source.len() > MAX_PACKET_SIZE {
            return Err(Error::PacketSizeTooLarge);
        }
        let mut packet = Self::new();
        packet.contents[..source.len()].copy_from_slice(source);
        packet.size = source.len();
        Ok(packet)
    }

    /// The packet's contents.
    #[must_use]
    pub fn contents(&self) -> &[u8] {
        &self.contents[..self.size]
    }

    /// Size in bytes of the packet's contents.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Append one decoded byte; used by the SLIP decoder while rebuilding
    /// a packet from a frame.
    pub(crate) fn push_decoded_byte(&mut self, byte: u8) -> Result<()> {
        if self.size >= MAX_PACKET_SIZE {
            return Err(Error::DecodedSlipPacketTooLong);
        }
        self.contents[self.size] = byte;
        self.size += 1;
        Ok(())
    }

    /// Install the handler invoked per message by
    /// [`Packet::process_messages`].
    pub fn set_message_handler(
        &mut self,
        handler: impl FnMut(Option<TimeTag>, &mut Message) + 'static,
    ) {
        self.handler = Some(Box::new(handler));
    }

    /// Remove the installed message handler, if any.
    pub fn clear_message_handler(&mut self) {
        self.handler = None;
    }

    /// Walk the packet's contents and invoke the handler for each message.
    ///
    /// Bundles are descended depth-first in element order, so the handler
    /// sees messages in pre-order with the time tag of their innermost
    /// enclosing bundle. Iteration stops at the first error, which is
    /// propagated. Returns [`Error::CallbackUndefined`] when no handler has
    /// been installed.
    pub fn process_messages(&mut self) -> Result<()> {
        let Some(mut handler) = self.handler.take() else {
            return Err(Error::CallbackUndefined);
        };
        let result = dispatch_contents(&mut handler, None, &self.contents[..self.size]);
        self.handler = Some(handler);
        result
    }
}

impl Default for Packet {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Packet")
            .field("size", &self.size)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

/// Recursive descent over packet contents.
///
/// The first byte distinguishes a message (`/`) from a bundle (`#`); any
/// other leading byte is invalid contents.
fn dispatch_contents(
    handler: &mut dyn FnMut(Option<TimeTag>, &mut Message),
    time_tag: Option<TimeTag>,
    contents: &[u8],
) -> Result<()> {
    match contents.first() {
        None => Err(Error::ContentsEmpty),
        Some(b'/') => {
            let mut message = Message::from_bytes(contents)?;
            trace!(address = message.address(), "dispatching message");
            handler(time_tag, &mut message);
            Ok(())
        }
        Some(b'#') => {
            let mut bundle = Bundle::from_bytes(contents)?;
            let enclosing = Some(bundle.time_tag());
            while bundle.is_element_available() {
                let element = bundle.next_element()?;
                dispatch_contents(handler, enclosing, element)?;
            }
            Ok(())
        }
        Some(_) => Err(Error::InvalidContents),
    }
}
