//! SLIP framing for OSC packets over unframed byte streams.
//!
//! SLIP (RFC 1055) terminates each packet with an `END` byte and escapes
//! `END`/`ESC` bytes occurring inside the payload as `ESC ESC_END` and
//! `ESC ESC_ESC`.

use core::fmt;

use tracing::debug;

use crate::protocol::{Error, Result, MAX_TRANSPORT_SIZE};
use crate::transport::packet::Packet;

/// Frame terminator.
pub const END: u8 = 0xC0;
/// Escape introducer.
pub const ESC: u8 = 0xDB;
/// Escaped stand-in for `END`.
pub const ESC_END: u8 = 0xDC;
/// Escaped stand-in for `ESC`.
pub const ESC_ESC: u8 = 0xDD;

/// Size of the SLIP decoder's receive buffer.
///
/// A frame exceeding this size is discarded in its entirety.
pub const DECODER_BUFFER_SIZE: usize = MAX_TRANSPORT_SIZE;

/// Encode a packet as a SLIP frame, returning the encoded size.
///
/// Worst case the frame occupies `2 * contents + 1` bytes.
///
/// ```
/// use oscwire::{Message, Packet};
/// use oscwire::transport::slip;
///
/// let packet = Packet::from_contents(&Message::new("/a")?)?;
/// let mut frame = [0u8; 32];
/// let size = slip::encode(&packet, &mut frame)?;
/// assert_eq!(frame[size - 1], slip::END);
/// # Ok::<(), oscwire::Error>(())
/// ```
pub fn encode(packet: &Packet, destination: &mut [u8]) -> Result<usize> {
    let mut index = 0;
    for &byte in packet.contents() {
        let escaped: &[u8] = match byte {
            END => &[ESC, ESC_END],
            ESC => &[ESC, ESC_ESC],
            _ => {
                if index >= destination.len() {
                    return Err(Error::DestinationTooSmall);
                }
                destination[index] = byte;
                index += 1;
                continue;
            }
        };
        if index + 2 > destination.len() {
            return Err(Error::DestinationTooSmall);
        }
        destination[index..index + 2].copy_from_slice(escaped);
        index += 2;
    }
    if index >= destination.len() {
        return Err(Error::DestinationTooSmall);
    }
    destination[index] = END;
    Ok(index + 1)
}

/// Handler invoked with each packet decoded from the byte stream.
///
/// An error returned by the handler propagates out of
/// [`SlipDecoder::feed`].
pub type PacketHandler = Box<dyn FnMut(&mut Packet) -> Result<()>>;

/// Byte-by-byte SLIP frame decoder.
///
/// Feed every byte received from the stream through
/// [`SlipDecoder::feed`]; each `END` byte closes a frame, which is decoded
/// into a fresh [`Packet`] and handed to the installed packet handler.
pub struct SlipDecoder {
    buffer: [u8; DECODER_BUFFER_SIZE],
    index: usize,
    handler: Option<PacketHandler>,
}

impl SlipDecoder {
    /// Create a decoder with an empty buffer and no handler installed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: [0; DECODER_BUFFER_SIZE],
            index: 0,
            handler: None,
        }
    }

    /// Install the handler invoked with each decoded packet.
    pub fn set_packet_handler(
        &mut self,
        handler: impl FnMut(&mut Packet) -> Result<()> + 'static,
    ) {
        self.handler = Some(Box::new(handler));
    }

    /// Remove the installed packet handler, if any.
    pub fn clear_packet_handler(&mut self) {
        self.handler = None;
    }

    /// Discard any partially received frame.
    pub fn clear(&mut self) {
        self.index = 0;
    }

    /// Process one byte received from the stream.
    ///
    /// Returns [`Error::EncodedSlipPacketTooLong`] and discards the buffer
    /// when a frame overruns it. On a completed frame, the decoded packet
    /// is handed to the packet handler; without one installed the packet is
    /// dropped and [`Error::CallbackUndefined`] is returned.
    pub fn feed(&mut self, byte: u8) -> Result<()> {
        self.buffer[self.index] = byte;
        self.index += 1;
        if self.index >= DECODER_BUFFER_SIZE {
            self.index = 0;
            return Err(Error::EncodedSlipPacketTooLong);
        }

        if byte != END {
            return Ok(());
        }
        self.index = 0;

        let mut packet = Packet::new();
        let mut read = 0;
        while self.buffer[read] != END {
            let value = if self.buffer[read] == ESC {
                read += 1;
                match self.buffer[read] {
                    ESC_END => END,
                    ESC_ESC => ESC,
                    _ => return Err(Error::UnexpectedByteAfterSlipEsc),
                }
            } else {
                self.buffer[read]
            };
            packet.push_decoded_byte(value)?;
            read += 1;
        }
        debug!(size = packet.size(), "slip frame decoded");

        let Some(mut handler) = self.handler.take() else {
            return Err(Error::CallbackUndefined);
        };
        let result = handler(&mut packet);
        self.handler = Some(handler);
        result
    }
}

impl Default for SlipDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SlipDecoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlipDecoder")
            .field("index", &self.index)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}
