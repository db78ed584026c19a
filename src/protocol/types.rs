//! OSC type tags and argument value types.

use std::fmt;

/// OSC type tag characters, one per argument in a message.
///
/// The tag character set is fixed by the OSC 1.0 specification; the array
/// markers group arguments without consuming payload bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TypeTag {
    /// 32-bit big-endian signed integer.
    Int32 = b'i',
    /// 32-bit big-endian IEEE 754 float.
    Float32 = b'f',
    /// Null-terminated string padded to a multiple of four bytes.
    Str = b's',
    /// Size-prefixed byte array padded to a multiple of four bytes.
    Blob = b'b',
    /// 64-bit big-endian signed integer.
    Int64 = b'h',
    /// 64-bit NTP-style time tag.
    TimeTag = b't',
    /// 64-bit big-endian IEEE 754 double.
    Double = b'd',
    /// Alternate string, encoded identically to [`TypeTag::Str`].
    AlternateStr = b'S',
    /// ASCII character carried in the final byte of a 4-byte word.
    Character = b'c',
    /// 32-bit RGBA colour.
    RgbaColour = b'r',
    /// 4-byte MIDI message.
    Midi = b'm',
    /// Boolean true; no payload bytes.
    True = b'T',
    /// Boolean false; no payload bytes.
    False = b'F',
    /// Nil; no payload bytes.
    Nil = b'N',
    /// Infinitum; no payload bytes.
    Infinitum = b'I',
    /// Opens an argument array; no payload bytes.
    ArrayBegin = b'[',
    /// Closes an argument array; no payload bytes.
    ArrayEnd = b']',
}

impl TypeTag {
    /// Convert from a tag character.
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            b'i' => Some(Self::Int32),
            b'f' => Some(Self::Float32),
            b's' => Some(Self::Str),
            b'b' => Some(Self::Blob),
            b'h' => Some(Self::Int64),
            b't' => Some(Self::TimeTag),
            b'd' => Some(Self::Double),
            b'S' => Some(Self::AlternateStr),
            b'c' => Some(Self::Character),
            b'r' => Some(Self::RgbaColour),
            b'm' => Some(Self::Midi),
            b'T' => Some(Self::True),
            b'F' => Some(Self::False),
            b'N' => Some(Self::Nil),
            b'I' => Some(Self::Infinitum),
            b'[' => Some(Self::ArrayBegin),
            b']' => Some(Self::ArrayEnd),
            _ => None,
        }
    }

    /// Convert to the tag character.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Check whether the tag consumes payload bytes.
    #[must_use]
    pub const fn has_payload(self) -> bool {
        !matches!(
            self,
            Self::True | Self::False | Self::Nil | Self::Infinitum | Self::ArrayBegin | Self::ArrayEnd
        )
    }

    /// Wire size of the argument payload, if it is fixed.
    ///
    /// Strings and blobs report `None`; their size is only known from the
    /// payload itself.
    #[must_use]
    pub const fn fixed_payload_size(self) -> Option<usize> {
        match self {
            Self::Int32 | Self::Float32 | Self::Character | Self::RgbaColour | Self::Midi => Some(4),
            Self::Int64 | Self::TimeTag | Self::Double => Some(8),
            Self::Str | Self::AlternateStr | Self::Blob => None,
            Self::True | Self::False | Self::Nil | Self::Infinitum | Self::ArrayBegin | Self::ArrayEnd => {
                Some(0)
            }
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8() as char)
    }
}

/// NTP-style 64-bit OSC time tag.
///
/// The upper 32 bits hold whole seconds, the lower 32 bits the fractional
/// part. A value of zero is the "immediately / irrelevant" sentinel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeTag(u64);

impl TimeTag {
    /// The zero time tag, meaning "now / irrelevant".
    pub const IMMEDIATE: Self = Self(0);

    /// Create a time tag from seconds and fraction halves.
    #[must_use]
    pub const fn new(seconds: u32, fraction: u32) -> Self {
        Self(((seconds as u64) << 32) | fraction as u64)
    }

    /// Create a time tag from the raw 64-bit value.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw 64-bit value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Whole-seconds half.
    #[must_use]
    pub const fn seconds(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Fractional half.
    #[must_use]
    pub const fn fraction(self) -> u32 {
        self.0 as u32
    }

    /// Check whether this is the zero sentinel.
    #[must_use]
    pub const fn is_immediate(self) -> bool {
        self.0 == 0
    }

    /// Wire form: seconds half first, then fraction, each big-endian.
    #[must_use]
    pub const fn to_be_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    /// Parse the wire form.
    #[must_use]
    pub const fn from_be_bytes(bytes: [u8; 8]) -> Self {
        Self(u64::from_be_bytes(bytes))
    }
}

impl fmt::Display for TimeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}/2^32", self.seconds(), self.fraction())
    }
}

/// 32-bit RGBA colour argument.
///
/// Wire order is red first (most significant byte) through alpha last.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RgbaColour {
    /// Red channel (most significant wire byte).
    pub red: u8,
    /// Green channel.
    pub green: u8,
    /// Blue channel.
    pub blue: u8,
    /// Alpha channel (least significant wire byte).
    pub alpha: u8,
}

impl RgbaColour {
    /// Create a colour from channel values.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self { red, green, blue, alpha }
    }

    /// Wire form, red byte first.
    #[must_use]
    pub const fn to_be_bytes(self) -> [u8; 4] {
        [self.red, self.green, self.blue, self.alpha]
    }

    /// Parse the wire form.
    #[must_use]
    pub const fn from_be_bytes(bytes: [u8; 4]) -> Self {
        Self {
            red: bytes[0],
            green: bytes[1],
            blue: bytes[2],
            alpha: bytes[3],
        }
    }
}

/// 4-byte MIDI message argument as defined by OSC 1.0.
///
/// Wire order is port ID first (most significant byte) through data2 last.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MidiMessage {
    /// Port identifier (most significant wire byte).
    pub port_id: u8,
    /// MIDI status byte.
    pub status: u8,
    /// First data byte.
    pub data1: u8,
    /// Second data byte (least significant wire byte).
    pub data2: u8,
}

impl MidiMessage {
    /// Create a MIDI message from its four bytes.
    #[must_use]
    pub const fn new(port_id: u8, status: u8, data1: u8, data2: u8) -> Self {
        Self { port_id, status, data1, data2 }
    }

    /// Wire form, port ID byte first.
    #[must_use]
    pub const fn to_be_bytes(self) -> [u8; 4] {
        [self.port_id, self.status, self.data1, self.data2]
    }

    /// Parse the wire form.
    #[must_use]
    pub const fn from_be_bytes(bytes: [u8; 4]) -> Self {
        Self {
            port_id: bytes[0],
            status: bytes[1],
            data1: bytes[2],
            data2: bytes[3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tag_roundtrip() {
        let tags = [
            TypeTag::Int32,
            TypeTag::Blob,
            TypeTag::AlternateStr,
            TypeTag::Infinitum,
            TypeTag::ArrayEnd,
        ];

        for tag in tags {
            let byte = tag.as_u8();
            let decoded = TypeTag::from_u8(byte).unwrap();
            assert_eq!(tag, decoded);
        }
    }

    #[test]
    fn test_type_tag_rejects_unknown() {
        assert_eq!(TypeTag::from_u8(b'x'), None);
        assert_eq!(TypeTag::from_u8(b','), None);
        assert_eq!(TypeTag::from_u8(0), None);
    }

    #[test]
    fn test_payload_sizes() {
        assert_eq!(TypeTag::Int32.fixed_payload_size(), Some(4));
        assert_eq!(TypeTag::Double.fixed_payload_size(), Some(8));
        assert_eq!(TypeTag::Blob.fixed_payload_size(), None);
        assert_eq!(TypeTag::ArrayBegin.fixed_payload_size(), Some(0));
        assert!(!TypeTag::Nil.has_payload());
        assert!(TypeTag::Character.has_payload());
    }

    #[test]
    fn test_time_tag_halves() {
        let tag = TimeTag::new(1, 0);
        assert_eq!(tag.raw(), 0x0000_0001_0000_0000);
        assert_eq!(tag.seconds(), 1);
        assert_eq!(tag.fraction(), 0);
        assert!(!tag.is_immediate());
        assert!(TimeTag::IMMEDIATE.is_immediate());
    }

    #[test]
    fn test_time_tag_wire_order() {
        let tag = TimeTag::new(0x0102_0304, 0x0506_0708);
        assert_eq!(
            tag.to_be_bytes(),
            [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08]
        );
        assert_eq!(TimeTag::from_be_bytes(tag.to_be_bytes()), tag);
    }

    #[test]
    fn test_rgba_and_midi_wire_order() {
        let colour = RgbaColour::new(0x11, 0x22, 0x33, 0x44);
        assert_eq!(colour.to_be_bytes(), [0x11, 0x22, 0x33, 0x44]);
        assert_eq!(RgbaColour::from_be_bytes(colour.to_be_bytes()), colour);

        let midi = MidiMessage::new(0, 0x90, 60, 100);
        assert_eq!(midi.to_be_bytes(), [0, 0x90, 60, 100]);
        assert_eq!(MidiMessage::from_be_bytes(midi.to_be_bytes()), midi);
    }
}
