//! OSC message construction and deconstruction.

use core::fmt;
use core::str;

use super::error::{Error, Result};
use super::types::{MidiMessage, RgbaColour, TimeTag, TypeTag};
use super::wire::{padded4, Writer};
use super::{
    Contents, MAX_ADDRESS_PATTERN_LENGTH, MAX_ARGUMENTS, MAX_ARGUMENTS_SIZE, MAX_MESSAGE_SIZE,
    MIN_MESSAGE_SIZE,
};

/// An OSC message: an address pattern, a type tag string, and a sequence of
/// typed arguments.
///
/// Construction appends arguments in order; deconstruction reads them back
/// strictly forward through two internal cursors (type tag index and payload
/// offset). A failed reader leaves both cursors untouched so the caller may
/// retry with a different reader. Equality compares contents only, not the
/// read cursors.
///
/// ```
/// use oscwire::Message;
///
/// let mut message = Message::new("/oscillator/frequency")?;
/// message.add_f32(440.0)?;
///
/// let mut wire = [0u8; 32];
/// let size = message.write_to(&mut wire)?;
/// let mut parsed = Message::from_bytes(&wire[..size])?;
/// assert_eq!(parsed.read_f32()?, 440.0);
/// # Ok::<(), oscwire::Error>(())
/// ```
#[derive(Clone)]
pub struct Message {
    address: [u8; MAX_ADDRESS_PATTERN_LENGTH],
    address_len: usize,
    /// Type tag characters without the leading comma; the comma is implicit
    /// and restored on serialization.
    tags: [u8; MAX_ARGUMENTS],
    tag_count: usize,
    arguments: [u8; MAX_ARGUMENTS_SIZE],
    arguments_size: usize,
    tag_index: usize,
    arguments_index: usize,
}

impl Message {
    /// Create a message with the given address pattern.
    ///
    /// An empty address is permitted when the address is undetermined at
    /// construction time; it must then be set with [`Message::set_address`]
    /// before serialization.
    pub fn new(address: &str) -> Result<Self> {
        let mut message = Self::default();
        if !address.is_empty() {
            message.set_address(address)?;
        }
        Ok(message)
    }

    /// Replace the address pattern.
    pub fn set_address(&mut self, address: &str) -> Result<()> {
        self.address_len = 0;
        self.append_address(address)
    }

    /// Append characters to the address pattern.
    ///
    /// The first character of the first appended part must be `/`.
    pub fn append_address(&mut self, parts: &str) -> Result<()> {
        if self.address_len == 0 && !parts.starts_with('/') {
            return Err(Error::NoSlashAtStartOfMessage);
        }
        let end = self.address_len + parts.len();
        if end > MAX_ADDRESS_PATTERN_LENGTH {
            return Err(Error::AddressPatternTooLong);
        }
        self.address[self.address_len..end].copy_from_slice(parts.as_bytes());
        self.address_len = end;
        Ok(())
    }

    /// The address pattern.
    #[must_use]
    pub fn address(&self) -> &str {
        // address bytes are validated UTF-8 at construction and parse time
        str::from_utf8(&self.address[..self.address_len]).unwrap_or("")
    }

    /// Number of arguments in the message.
    #[must_use]
    pub fn argument_count(&self) -> usize {
        self.tag_count
    }

    /// Add a 32-bit integer argument.
    pub fn add_i32(&mut self, value: i32) -> Result<()> {
        self.push_argument(TypeTag::Int32, &value.to_be_bytes())
    }

    /// Add a 32-bit float argument.
    pub fn add_f32(&mut self, value: f32) -> Result<()> {
        self.push_argument(TypeTag::Float32, &value.to_be_bytes())
    }

    /// Add a string argument.
    ///
    /// The string is null-terminated and padded to a multiple of four bytes
    /// on the wire; it must not contain interior null bytes.
    pub fn add_str(&mut self, value: &str) -> Result<()> {
        self.push_string_argument(TypeTag::Str, value)
    }

    /// Add an alternate string argument (tag `S`, encoded like a string).
    pub fn add_alternate_str(&mut self, value: &str) -> Result<()> {
        self.push_string_argument(TypeTag::AlternateStr, value)
    }

    /// Add a blob (byte array) argument.
    ///
    /// Costs `4 + len + pad` payload bytes: a big-endian size prefix, the
    /// bytes, and zero padding to a multiple of four.
    pub fn add_blob(&mut self, bytes: &[u8]) -> Result<()> {
        if self.tag_count >= MAX_ARGUMENTS {
            return Err(Error::TooManyArguments);
        }
        let total = 4 + padded4(bytes.len());
        if self.arguments_size + total > MAX_ARGUMENTS_SIZE {
            return Err(Error::ArgumentsSizeTooLarge);
        }
        let start = self.arguments_size;
        self.arguments[start..start + 4].copy_from_slice(&(bytes.len() as i32).to_be_bytes());
        self.arguments[start + 4..start + 4 + bytes.len()].copy_from_slice(bytes);
        self.arguments[start + 4 + bytes.len()..start + total].fill(0);
        self.arguments_size = start + total;
        self.push_tag(TypeTag::Blob);
        Ok(())
    }

    /// Add a 64-bit integer argument.
    pub fn add_i64(&mut self, value: i64) -> Result<()> {
        self.push_argument(TypeTag::Int64, &value.to_be_bytes())
    }

    /// Add an OSC time tag argument.
    pub fn add_time_tag(&mut self, value: TimeTag) -> Result<()> {
        self.push_argument(TypeTag::TimeTag, &value.to_be_bytes())
    }

    /// Add a 64-bit double argument.
    pub fn add_f64(&mut self, value: f64) -> Result<()> {
        self.push_argument(TypeTag::Double, &value.to_be_bytes())
    }

    /// Add an ASCII character argument, carried in the final byte of a
    /// 4-byte word.
    ///
    /// Characters outside the ASCII range have no wire form and are
    /// rejected.
    pub fn add_char(&mut self, value: char) -> Result<()> {
        if !value.is_ascii() {
            return Err(Error::CharacterNotAscii);
        }
        self.push_argument(TypeTag::Character, &[0, 0, 0, value as u8])
    }

    /// Add a 32-bit RGBA colour argument.
    pub fn add_rgba(&mut self, value: RgbaColour) -> Result<()> {
        self.push_argument(TypeTag::RgbaColour, &value.to_be_bytes())
    }

    /// Add a 4-byte MIDI message argument.
    pub fn add_midi(&mut self, value: MidiMessage) -> Result<()> {
        self.push_argument(TypeTag::Midi, &value.to_be_bytes())
    }

    /// Add a boolean argument. Writes only the tag (`T` or `F`).
    pub fn add_bool(&mut self, value: bool) -> Result<()> {
        self.push_argument(if value { TypeTag::True } else { TypeTag::False }, &[])
    }

    /// Add a nil argument. Writes only the tag.
    pub fn add_nil(&mut self) -> Result<()> {
        self.push_argument(TypeTag::Nil, &[])
    }

    /// Add an infinitum argument. Writes only the tag.
    pub fn add_infinitum(&mut self) -> Result<()> {
        self.push_argument(TypeTag::Infinitum, &[])
    }

    /// Open an argument array. Writes only the tag.
    pub fn add_array_begin(&mut self) -> Result<()> {
        self.push_argument(TypeTag::ArrayBegin, &[])
    }

    /// Close an argument array. Writes only the tag.
    pub fn add_array_end(&mut self) -> Result<()> {
        self.push_argument(TypeTag::ArrayEnd, &[])
    }

    /// Size in bytes of the serialized message.
    #[must_use]
    pub fn size(&self) -> usize {
        padded4(self.address_len + 1) + padded4(self.tag_count + 2) + self.arguments_size
    }

    /// Serialize into `destination`, returning the number of bytes written.
    ///
    /// Writes the address pattern, the type tag string (leading comma
    /// restored), and the raw arguments payload, each string null-padded to
    /// a multiple of four bytes.
    pub fn write_to(&self, destination: &mut [u8]) -> Result<usize> {
        if self.address_len == 0 {
            return Err(Error::UndefinedAddressPattern);
        }
        if self.address[0] != b'/' {
            return Err(Error::NoSlashAtStartOfMessage);
        }
        let mut writer = Writer::new(destination);
        writer.put(&self.address[..self.address_len])?;
        writer.terminate_string()?;
        writer.put(&[b','])?;
        writer.put(&self.tags[..self.tag_count])?;
        writer.terminate_string()?;
        writer.put(&self.arguments[..self.arguments_size])?;
        Ok(writer.position())
    }

    /// Parse a message from the byte array of a packet or bundle element.
    pub fn from_bytes(source: &[u8]) -> Result<Self> {
        if source.len() % 4 != 0 {
            return Err(Error::SizeNotMultipleOfFour);
        }
        if source.len() < MIN_MESSAGE_SIZE {
            return Err(Error::MessageSizeTooSmall);
        }
        if source.len() > MAX_MESSAGE_SIZE {
            return Err(Error::MessageSizeTooLarge);
        }
        if source[0] != b'/' {
            return Err(Error::NoSlashAtStartOfMessage);
        }

        let mut message = Self::default();

        // address pattern: bytes up to the first null
        let mut index = 0;
        while source[index] != 0 {
            if message.address_len >= MAX_ADDRESS_PATTERN_LENGTH {
                return Err(Error::AddressPatternTooLong);
            }
            message.address[message.address_len] = source[index];
            message.address_len += 1;
            index += 1;
            if index >= source.len() {
                return Err(Error::SourceEndsBeforeEndOfAddressPattern);
            }
        }
        if str::from_utf8(&message.address[..message.address_len]).is_err() {
            return Err(Error::StringNotUtf8);
        }

        // skip padding up to and including the comma
        while source[index - 1] != b',' {
            index += 1;
            if index >= source.len() {
                return Err(Error::SourceEndsBeforeStartOfTypeTagString);
            }
        }

        // type tag string: tag characters up to the first null
        while source[index] != 0 {
            if message.tag_count >= MAX_ARGUMENTS {
                return Err(Error::TypeTagStringTooLong);
            }
            if TypeTag::from_u8(source[index]).is_none() {
                return Err(Error::UnexpectedArgumentType);
            }
            message.tags[message.tag_count] = source[index];
            message.tag_count += 1;
            index += 1;
            if index >= source.len() {
                return Err(Error::SourceEndsBeforeEndOfTypeTagString);
            }
        }

        // skip the terminator and padding to the arguments
        loop {
            index += 1;
            if index > source.len() {
                return Err(Error::UnexpectedEndOfSource);
            }
            if index % 4 == 0 {
                break;
            }
        }

        // arguments: all remaining bytes
        let remaining = source.len() - index;
        if remaining > MAX_ARGUMENTS_SIZE {
            return Err(Error::ArgumentsSizeTooLarge);
        }
        message.arguments[..remaining].copy_from_slice(&source[index..]);
        message.arguments_size = remaining;

        Ok(message)
    }

    /// Check whether another argument is available at the read cursor.
    #[must_use]
    pub fn is_argument_available(&self) -> bool {
        self.tag_index < self.tag_count
    }

    /// Type tag of the next argument, or `None` when all arguments have
    /// been consumed.
    #[must_use]
    pub fn argument_type(&self) -> Option<TypeTag> {
        if self.tag_index < self.tag_count {
            TypeTag::from_u8(self.tags[self.tag_index])
        } else {
            None
        }
    }

    /// Skip the next argument, advancing both the type tag cursor and the
    /// payload cursor by the wire size the skipped tag implies.
    pub fn skip_argument(&mut self) -> Result<()> {
        let tag = self.current_tag()?;
        let consumed = match tag {
            TypeTag::Int32
            | TypeTag::Float32
            | TypeTag::Character
            | TypeTag::RgbaColour
            | TypeTag::Midi => 4,
            TypeTag::Int64 | TypeTag::TimeTag | TypeTag::Double => 8,
            TypeTag::Str | TypeTag::AlternateStr => {
                let length = self.scan_string_length()?;
                padded4(length + 1)
            }
            TypeTag::Blob => {
                let length = self.scan_blob_length()?;
                4 + padded4(length)
            }
            TypeTag::True
            | TypeTag::False
            | TypeTag::Nil
            | TypeTag::Infinitum
            | TypeTag::ArrayBegin
            | TypeTag::ArrayEnd => 0,
        };
        if self.arguments_index + consumed > self.arguments_size {
            return Err(Error::MessageTooShortForArgumentType);
        }
        self.arguments_index += consumed;
        self.tag_index += 1;
        Ok(())
    }

    /// Read a 32-bit integer argument.
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_be_bytes(self.read_fixed::<4>(TypeTag::Int32)?))
    }

    /// Read a 32-bit float argument.
    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_be_bytes(self.read_fixed::<4>(TypeTag::Float32)?))
    }

    /// Read a string or alternate string argument.
    ///
    /// Borrows the bytes up to the null terminator and advances past the
    /// padding.
    pub fn read_str(&mut self) -> Result<&str> {
        let tag = self.current_tag()?;
        if tag != TypeTag::Str && tag != TypeTag::AlternateStr {
            return Err(Error::UnexpectedArgumentType);
        }
        let start = self.arguments_index;
        let length = self.scan_string_length()?;
        let consumed = padded4(length + 1);
        if start + consumed > self.arguments_size {
            return Err(Error::MessageTooShortForArgumentType);
        }
        let value = str::from_utf8(&self.arguments[start..start + length])
            .map_err(|_| Error::StringNotUtf8)?;
        self.arguments_index = start + consumed;
        self.tag_index += 1;
        Ok(value)
    }

    /// Read a blob argument, borrowing its contents.
    pub fn read_blob(&mut self) -> Result<&[u8]> {
        let tag = self.current_tag()?;
        if tag != TypeTag::Blob {
            return Err(Error::UnexpectedArgumentType);
        }
        let start = self.arguments_index;
        let length = self.scan_blob_length()?;
        let consumed = 4 + padded4(length);
        if start + consumed > self.arguments_size {
            return Err(Error::MessageTooShortForArgumentType);
        }
        let value = &self.arguments[start + 4..start + 4 + length];
        self.arguments_index = start + consumed;
        self.tag_index += 1;
        Ok(value)
    }

    /// Read a 64-bit integer argument.
    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(i64::from_be_bytes(self.read_fixed::<8>(TypeTag::Int64)?))
    }

    /// Read an OSC time tag argument.
    pub fn read_time_tag(&mut self) -> Result<TimeTag> {
        Ok(TimeTag::from_be_bytes(
            self.read_fixed::<8>(TypeTag::TimeTag)?,
        ))
    }

    /// Read a 64-bit double argument.
    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_be_bytes(self.read_fixed::<8>(TypeTag::Double)?))
    }

    /// Read a character argument from the final byte of its 4-byte word.
    pub fn read_char(&mut self) -> Result<char> {
        let bytes = self.read_fixed::<4>(TypeTag::Character)?;
        Ok(bytes[3] as char)
    }

    /// Read a 32-bit RGBA colour argument.
    pub fn read_rgba(&mut self) -> Result<RgbaColour> {
        Ok(RgbaColour::from_be_bytes(
            self.read_fixed::<4>(TypeTag::RgbaColour)?,
        ))
    }

    /// Read a 4-byte MIDI message argument.
    pub fn read_midi(&mut self) -> Result<MidiMessage> {
        Ok(MidiMessage::from_be_bytes(
            self.read_fixed::<4>(TypeTag::Midi)?,
        ))
    }

    /// Read a boolean argument (`T` or `F` tag, no payload).
    pub fn read_bool(&mut self) -> Result<bool> {
        let value = match self.current_tag()? {
            TypeTag::True => true,
            TypeTag::False => false,
            _ => return Err(Error::UnexpectedArgumentType),
        };
        self.tag_index += 1;
        Ok(value)
    }

    /// Consume a nil argument.
    pub fn read_nil(&mut self) -> Result<()> {
        self.read_marker(TypeTag::Nil)
    }

    /// Consume an infinitum argument.
    pub fn read_infinitum(&mut self) -> Result<()> {
        self.read_marker(TypeTag::Infinitum)
    }

    /// Consume an array-begin marker.
    pub fn read_array_begin(&mut self) -> Result<()> {
        self.read_marker(TypeTag::ArrayBegin)
    }

    /// Consume an array-end marker.
    pub fn read_array_end(&mut self) -> Result<()> {
        self.read_marker(TypeTag::ArrayEnd)
    }

    /// Read the next argument as a 32-bit integer, converting from any
    /// numerical type.
    pub fn read_as_i32(&mut self) -> Result<i32> {
        match self.current_tag()? {
            TypeTag::Int32 => self.read_i32(),
            TypeTag::Float32 => Ok(self.read_f32()? as i32),
            TypeTag::Int64 => Ok(self.read_i64()? as i32),
            TypeTag::TimeTag => Ok(self.read_time_tag()?.raw() as i32),
            TypeTag::Double => Ok(self.read_f64()? as i32),
            TypeTag::Character => Ok(self.read_char()? as i32),
            TypeTag::True => self.consume_marker(1),
            TypeTag::False | TypeTag::Nil => self.consume_marker(0),
            TypeTag::Infinitum => self.consume_marker(u32::MAX as i32),
            _ => Err(Error::UnexpectedArgumentType),
        }
    }

    /// Read the next argument as a 32-bit float, converting from any
    /// numerical type.
    pub fn read_as_f32(&mut self) -> Result<f32> {
        match self.current_tag()? {
            TypeTag::Int32 => Ok(self.read_i32()? as f32),
            TypeTag::Float32 => self.read_f32(),
            TypeTag::Int64 => Ok(self.read_i64()? as f32),
            TypeTag::TimeTag => Ok(self.read_time_tag()?.raw() as f32),
            TypeTag::Double => Ok(self.read_f64()? as f32),
            TypeTag::Character => Ok(self.read_char()? as u32 as f32),
            TypeTag::True => self.consume_marker(1.0),
            TypeTag::False | TypeTag::Nil => self.consume_marker(0.0),
            TypeTag::Infinitum => self.consume_marker(f32::INFINITY),
            _ => Err(Error::UnexpectedArgumentType),
        }
    }

    /// Read the next argument as a 64-bit integer, converting from any
    /// numerical type.
    pub fn read_as_i64(&mut self) -> Result<i64> {
        match self.current_tag()? {
            TypeTag::Int32 => Ok(i64::from(self.read_i32()?)),
            TypeTag::Float32 => Ok(self.read_f32()? as i64),
            TypeTag::Int64 => self.read_i64(),
            TypeTag::TimeTag => Ok(self.read_time_tag()?.raw() as i64),
            TypeTag::Double => Ok(self.read_f64()? as i64),
            TypeTag::Character => Ok(self.read_char()? as i64),
            TypeTag::True => self.consume_marker(1),
            TypeTag::False | TypeTag::Nil => self.consume_marker(0),
            TypeTag::Infinitum => self.consume_marker(i64::MAX),
            _ => Err(Error::UnexpectedArgumentType),
        }
    }

    /// Read the next argument as an OSC time tag, converting from any
    /// numerical type.
    pub fn read_as_time_tag(&mut self) -> Result<TimeTag> {
        let raw = match self.current_tag()? {
            TypeTag::Int32 => self.read_i32()? as u64,
            TypeTag::Float32 => self.read_f32()? as u64,
            TypeTag::Int64 => self.read_i64()? as u64,
            TypeTag::TimeTag => return self.read_time_tag(),
            TypeTag::Double => self.read_f64()? as u64,
            TypeTag::Character => self.read_char()? as u64,
            TypeTag::True => return self.consume_marker(TimeTag::from_raw(1)),
            TypeTag::False | TypeTag::Nil => return self.consume_marker(TimeTag::IMMEDIATE),
            TypeTag::Infinitum => return self.consume_marker(TimeTag::from_raw(i64::MAX as u64)),
            _ => return Err(Error::UnexpectedArgumentType),
        };
        Ok(TimeTag::from_raw(raw))
    }

    /// Read the next argument as a 64-bit double, converting from any
    /// numerical type.
    pub fn read_as_f64(&mut self) -> Result<f64> {
        match self.current_tag()? {
            TypeTag::Int32 => Ok(f64::from(self.read_i32()?)),
            TypeTag::Float32 => Ok(f64::from(self.read_f32()?)),
            TypeTag::Int64 => Ok(self.read_i64()? as f64),
            TypeTag::TimeTag => Ok(self.read_time_tag()?.raw() as f64),
            TypeTag::Double => self.read_f64(),
            TypeTag::Character => Ok(self.read_char()? as u32 as f64),
            TypeTag::True => self.consume_marker(1.0),
            TypeTag::False | TypeTag::Nil => self.consume_marker(0.0),
            TypeTag::Infinitum => self.consume_marker(f64::INFINITY),
            _ => Err(Error::UnexpectedArgumentType),
        }
    }

    /// Read the next argument as a character, converting from any numerical
    /// type.
    pub fn read_as_char(&mut self) -> Result<char> {
        let byte = match self.current_tag()? {
            TypeTag::Int32 => self.read_i32()? as u8,
            TypeTag::Float32 => self.read_f32()? as u8,
            TypeTag::Int64 => self.read_i64()? as u8,
            TypeTag::TimeTag => self.read_time_tag()?.raw() as u8,
            TypeTag::Double => self.read_f64()? as u8,
            TypeTag::Character => return self.read_char(),
            TypeTag::True => return self.consume_marker('\u{1}'),
            TypeTag::False | TypeTag::Nil => return self.consume_marker('\0'),
            TypeTag::Infinitum => return self.consume_marker('\u{7f}'),
            _ => return Err(Error::UnexpectedArgumentType),
        };
        Ok(byte as char)
    }

    /// Read the next argument as a boolean, converting from any numerical
    /// type. Every non-zero value is `true`.
    pub fn read_as_bool(&mut self) -> Result<bool> {
        match self.current_tag()? {
            TypeTag::Int32 => Ok(self.read_i32()? != 0),
            TypeTag::Float32 => Ok(self.read_f32()? != 0.0),
            TypeTag::Int64 => Ok(self.read_i64()? != 0),
            TypeTag::TimeTag => Ok(!self.read_time_tag()?.is_immediate()),
            TypeTag::Double => Ok(self.read_f64()? != 0.0),
            TypeTag::Character => Ok(self.read_char()? != '\0'),
            TypeTag::True | TypeTag::Infinitum => self.consume_marker(true),
            TypeTag::False | TypeTag::Nil => self.consume_marker(false),
            _ => Err(Error::UnexpectedArgumentType),
        }
    }

    /// Read the next argument as an owned string.
    ///
    /// Accepts strings, blobs (truncated at an embedded null), and
    /// characters.
    pub fn read_as_string(&mut self) -> Result<String> {
        match self.current_tag()? {
            TypeTag::Str | TypeTag::AlternateStr => Ok(self.read_str()?.to_owned()),
            TypeTag::Blob => {
                let saved = (self.tag_index, self.arguments_index);
                let converted = {
                    let bytes = self.read_blob()?;
                    let end = bytes.iter().position(|&byte| byte == 0).unwrap_or(bytes.len());
                    str::from_utf8(&bytes[..end]).map(|value| value.to_owned())
                };
                match converted {
                    Ok(value) => Ok(value),
                    Err(_) => {
                        (self.tag_index, self.arguments_index) = saved;
                        Err(Error::StringNotUtf8)
                    }
                }
            }
            TypeTag::Character => Ok(self.read_char()?.to_string()),
            _ => Err(Error::UnexpectedArgumentType),
        }
    }

    /// Read the next argument as an owned byte array.
    ///
    /// Accepts blobs, strings (without the terminator), and characters.
    pub fn read_as_blob(&mut self) -> Result<Vec<u8>> {
        match self.current_tag()? {
            TypeTag::Str | TypeTag::AlternateStr => Ok(self.read_str()?.as_bytes().to_vec()),
            TypeTag::Blob => Ok(self.read_blob()?.to_vec()),
            TypeTag::Character => Ok(vec![self.read_char()? as u8]),
            _ => Err(Error::UnexpectedArgumentType),
        }
    }

    /// Read the next argument as an RGBA colour.
    ///
    /// Accepts a colour argument or a blob of exactly four bytes, decoded
    /// field by field.
    pub fn read_as_rgba(&mut self) -> Result<RgbaColour> {
        match self.current_tag()? {
            TypeTag::RgbaColour => self.read_rgba(),
            TypeTag::Blob => Ok(RgbaColour::from_be_bytes(self.read_blob_word()?)),
            _ => Err(Error::UnexpectedArgumentType),
        }
    }

    /// Read the next argument as a MIDI message.
    ///
    /// Accepts a MIDI argument or a blob of exactly four bytes, decoded
    /// field by field.
    pub fn read_as_midi(&mut self) -> Result<MidiMessage> {
        match self.current_tag()? {
            TypeTag::Midi => self.read_midi(),
            TypeTag::Blob => Ok(MidiMessage::from_be_bytes(self.read_blob_word()?)),
            _ => Err(Error::UnexpectedArgumentType),
        }
    }

    /// Consume a blob argument of exactly four bytes.
    ///
    /// The cursors stay in place when the blob has any other size, so the
    /// caller may still read it as an ordinary blob.
    fn read_blob_word(&mut self) -> Result<[u8; 4]> {
        let length = self.scan_blob_length()?;
        if length != 4 {
            return Err(Error::UnexpectedEndOfSource);
        }
        let start = self.arguments_index + 4;
        let word = [
            self.arguments[start],
            self.arguments[start + 1],
            self.arguments[start + 2],
            self.arguments[start + 3],
        ];
        self.arguments_index = start + 4;
        self.tag_index += 1;
        Ok(word)
    }

    fn current_tag(&self) -> Result<TypeTag> {
        if self.tag_index >= self.tag_count {
            return Err(Error::NoArgumentsAvailable);
        }
        TypeTag::from_u8(self.tags[self.tag_index]).ok_or(Error::UnexpectedArgumentType)
    }

    fn push_tag(&mut self, tag: TypeTag) {
        self.tags[self.tag_count] = tag.as_u8();
        self.tag_count += 1;
    }

    fn push_argument(&mut self, tag: TypeTag, payload: &[u8]) -> Result<()> {
        if self.tag_count >= MAX_ARGUMENTS {
            return Err(Error::TooManyArguments);
        }
        let end = self.arguments_size + payload.len();
        if end > MAX_ARGUMENTS_SIZE {
            return Err(Error::ArgumentsSizeTooLarge);
        }
        self.arguments[self.arguments_size..end].copy_from_slice(payload);
        self.arguments_size = end;
        self.push_tag(tag);
        Ok(())
    }

    fn push_string_argument(&mut self, tag: TypeTag, value: &str) -> Result<()> {
        if self.tag_count >= MAX_ARGUMENTS {
            return Err(Error::TooManyArguments);
        }
        let total = padded4(value.len() + 1);
        if self.arguments_size + total > MAX_ARGUMENTS_SIZE {
            return Err(Error::ArgumentsSizeTooLarge);
        }
        let start = self.arguments_size;
        self.arguments[start..start + value.len()].copy_from_slice(value.as_bytes());
        self.arguments[start + value.len()..start + total].fill(0);
        self.arguments_size = start + total;
        self.push_tag(tag);
        Ok(())
    }

    /// Read a fixed-size payload for the expected tag, advancing both
    /// cursors.
    fn read_fixed<const N: usize>(&mut self, expected: TypeTag) -> Result<[u8; N]> {
        if self.current_tag()? != expected {
            return Err(Error::UnexpectedArgumentType);
        }
        if self.arguments_index + N > self.arguments_size {
            return Err(Error::MessageTooShortForArgumentType);
        }
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(&self.arguments[self.arguments_index..self.arguments_index + N]);
        self.arguments_index += N;
        self.tag_index += 1;
        Ok(bytes)
    }

    fn read_marker(&mut self, expected: TypeTag) -> Result<()> {
        if self.current_tag()? != expected {
            return Err(Error::UnexpectedArgumentType);
        }
        self.tag_index += 1;
        Ok(())
    }

    /// Consume a payload-free tag, yielding its converted value.
    fn consume_marker<T>(&mut self, value: T) -> Result<T> {
        self.tag_index += 1;
        Ok(value)
    }

    /// Unterminated length of the string argument at the payload cursor.
    fn scan_string_length(&self) -> Result<usize> {
        self.arguments[self.arguments_index..self.arguments_size]
            .iter()
            .position(|&byte| byte == 0)
            .ok_or(Error::MessageTooShortForArgumentType)
    }

    /// Declared length of the blob argument at the payload cursor.
    fn scan_blob_length(&self) -> Result<usize> {
        let start = self.arguments_index;
        if start + 4 > self.arguments_size {
            return Err(Error::MessageTooShortForArgumentType);
        }
        let declared = i32::from_be_bytes([
            self.arguments[start],
            self.arguments[start + 1],
            self.arguments[start + 2],
            self.arguments[start + 3],
        ]);
        let length = usize::try_from(declared).map_err(|_| Error::MessageTooShortForArgumentType)?;
        if start + 4 + length > self.arguments_size {
            return Err(Error::MessageTooShortForArgumentType);
        }
        Ok(length)
    }
}

impl Default for Message {
    fn default() -> Self {
        Self {
            address: [0; MAX_ADDRESS_PATTERN_LENGTH],
            address_len: 0,
            tags: [0; MAX_ARGUMENTS],
            tag_count: 0,
            arguments: [0; MAX_ARGUMENTS_SIZE],
            arguments_size: 0,
            tag_index: 0,
            arguments_index: 0,
        }
    }
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.address[..self.address_len] == other.address[..other.address_len]
            && self.tags[..self.tag_count] == other.tags[..other.tag_count]
            && self.arguments[..self.arguments_size] == other.arguments[..other.arguments_size]
    }
}

impl Eq for Message {}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("address", &self.address())
            .field(
                "type_tags",
                &str::from_utf8(&self.tags[..self.tag_count]).unwrap_or(""),
            )
            .field("arguments_size", &self.arguments_size)
            .finish()
    }
}

impl Contents for Message {
    fn size(&self) -> usize {
        Message::size(self)
    }

    fn write_to(&self, destination: &mut [u8]) -> Result<usize> {
        Message::write_to(self, destination)
    }
}
