//! OSC bundle construction and deconstruction.

use core::fmt;

use super::error::{Error, Result};
use super::types::TimeTag;
use super::wire::Writer;
use super::{
    Contents, BUNDLE_HEADER, MAX_BUNDLE_ELEMENTS_SIZE, MAX_BUNDLE_SIZE, MIN_BUNDLE_SIZE,
};

/// An OSC bundle: a time tag and an ordered sequence of size-prefixed
/// elements, each a serialized message or nested bundle.
///
/// Contents are copied by value into the element buffer; the source may be
/// mutated or dropped afterwards. Equality compares the time tag and
/// element bytes, not the iteration cursor.
///
/// ```
/// use oscwire::{Bundle, Message, TimeTag};
///
/// let mut bundle = Bundle::new(TimeTag::IMMEDIATE);
/// bundle.add(&Message::new("/a")?)?;
/// bundle.add(&Message::new("/b")?)?;
/// assert_eq!(bundle.size(), 16 + 2 * (4 + 8));
/// # Ok::<(), oscwire::Error>(())
/// ```
#[derive(Clone)]
pub struct Bundle {
    time_tag: TimeTag,
    elements: [u8; MAX_BUNDLE_ELEMENTS_SIZE],
    elements_size: usize,
    elements_index: usize,
}

impl Bundle {
    /// Create an empty bundle with the given time tag.
    ///
    /// Use [`TimeTag::IMMEDIATE`] when the time tag is irrelevant or the
    /// contained messages should be invoked immediately.
    #[must_use]
    pub fn new(time_tag: TimeTag) -> Self {
        Self {
            time_tag,
            elements: [0; MAX_BUNDLE_ELEMENTS_SIZE],
            elements_size: 0,
            elements_index: 0,
        }
    }

    /// The bundle's time tag.
    #[must_use]
    pub const fn time_tag(&self) -> TimeTag {
        self.time_tag
    }

    /// Replace the bundle's time tag.
    pub fn set_time_tag(&mut self, time_tag: TimeTag) {
        self.time_tag = time_tag;
    }

    /// Append a message or nested bundle as the next element.
    ///
    /// The contents are serialized into the element buffer behind a 4-byte
    /// big-endian size prefix. Returns [`Error::BundleFull`] when the
    /// remaining capacity cannot hold them.
    pub fn add(&mut self, contents: &impl Contents) -> Result<()> {
        if self.elements_size + 4 > MAX_BUNDLE_ELEMENTS_SIZE {
            return Err(Error::BundleFull);
        }
        let start = self.elements_size + 4;
        let capacity = self.remaining_capacity();
        let written = contents
            .write_to(&mut self.elements[start..start + capacity])
            .map_err(|error| match error {
                Error::DestinationTooSmall => Error::BundleFull,
                other => other,
            })?;
        self.elements[self.elements_size..start]
            .copy_from_slice(&(written as i32).to_be_bytes());
        self.elements_size = start + written;
        Ok(())
    }

    /// Discard all elements. The time tag is preserved.
    pub fn clear(&mut self) {
        self.elements_size = 0;
        self.elements_index = 0;
    }

    /// Check whether the bundle holds no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.elements_size == 0
    }

    /// Bytes still available for the next element's contents.
    ///
    /// Accounts for the 4-byte size prefix every element requires.
    #[must_use]
    pub const fn remaining_capacity(&self) -> usize {
        (MAX_BUNDLE_ELEMENTS_SIZE - self.elements_size).saturating_sub(4)
    }

    /// Size in bytes of the serialized bundle.
    #[must_use]
    pub const fn size(&self) -> usize {
        MIN_BUNDLE_SIZE + self.elements_size
    }

    /// Serialize into `destination`, returning the number of bytes written.
    pub fn write_to(&self, destination: &mut [u8]) -> Result<usize> {
        let mut writer = Writer::new(destination);
        writer.put(&BUNDLE_HEADER)?;
        writer.put(&self.time_tag.to_be_bytes())?;
        writer.put(&self.elements[..self.elements_size])?;
        Ok(writer.position())
    }

    /// Parse a bundle from the byte array of a packet or an enclosing
    /// bundle element.
    pub fn from_bytes(source: &[u8]) -> Result<Self> {
        if source.len() % 4 != 0 {
            return Err(Error::SizeNotMultipleOfFour);
        }
        if source.len() < MIN_BUNDLE_SIZE {
            return Err(Error::BundleSizeTooSmall);
        }
        if source.len() > MAX_BUNDLE_SIZE {
            return Err(Error::BundleSizeTooLarge);
        }
        if source[..8] != BUNDLE_HEADER {
            return Err(Error::NoHashAtStartOfBundle);
        }

        let mut time_tag = [0u8; 8];
        time_tag.copy_from_slice(&source[8..16]);
        let mut bundle = Self::new(TimeTag::from_be_bytes(time_tag));

        let remaining = source.len() - MIN_BUNDLE_SIZE;
        bundle.elements[..remaining].copy_from_slice(&source[MIN_BUNDLE_SIZE..]);
        bundle.elements_size = remaining;
        Ok(bundle)
    }

    /// Check whether another element is available at the iteration cursor.
    ///
    /// An element needs strictly more than its 4-byte size prefix to be
    /// surfaced, so a trailing zero-size element is never available.
    #[must_use]
    pub const fn is_element_available(&self) -> bool {
        self.elements_index + 4 < self.elements_size
    }

    /// Borrow the contents of the next element and advance the cursor.
    ///
    /// The element size must be non-negative, a multiple of four, and lie
    /// within the element buffer. The cursor stays in place on error.
    pub fn next_element(&mut self) -> Result<&[u8]> {
        if self.elements_index + 4 >= self.elements_size {
            return Err(Error::BundleElementNotAvailable);
        }
        let index = self.elements_index;
        let declared = i32::from_be_bytes([
            self.elements[index],
            self.elements[index + 1],
            self.elements[index + 2],
            self.elements[index + 3],
        ]);
        if declared < 0 {
            return Err(Error::NegativeBundleElementSize);
        }
        let element_size = declared as usize;
        if element_size % 4 != 0 {
            return Err(Error::SizeNotMultipleOfFour);
        }
        let start = index + 4;
        if start + element_size > self.elements_size {
            return Err(Error::InvalidElementSize);
        }
        self.elements_index = start + element_size;
        Ok(&self.elements[start..start + element_size])
    }
}

impl Default for Bundle {
    fn default() -> Self {
        Self::new(TimeTag::IMMEDIATE)
    }
}

impl PartialEq for Bundle {
    fn eq(&self, other: &Self) -> bool {
        self.time_tag == other.time_tag
            && self.elements[..self.elements_size] == other.elements[..other.elements_size]
    }
}

impl Eq for Bundle {}

impl fmt::Debug for Bundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bundle")
            .field("time_tag", &self.time_tag)
            .field("elements_size", &self.elements_size)
            .finish()
    }
}

impl Contents for Bundle {
    fn size(&self) -> usize {
        Bundle::size(self)
    }

    fn write_to(&self, destination: &mut [u8]) -> Result<usize> {
        Bundle::write_to(self, destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Message;

    fn serialize(bundle: &Bundle) -> Vec<u8> {
        let mut buffer = [0u8; MAX_BUNDLE_SIZE];
        let size = bundle.write_to(&mut buffer).unwrap();
        buffer[..size].to_vec()
    }

    #[test]
    fn test_empty_bundle_bytes() {
        let bundle = Bundle::new(TimeTag::new(1, 0));
        assert_eq!(bundle.size(), 16);
        assert_eq!(
            serialize(&bundle),
            [
                0x23, 0x62, 0x75, 0x6E, 0x64, 0x6C, 0x65, 0x00, // "#bundle\0"
                0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, // time tag
            ]
        );
    }

    #[test]
    fn test_add_message_prefixes_size() {
        let mut bundle = Bundle::new(TimeTag::IMMEDIATE);
        bundle.add(&Message::new("/a").unwrap()).unwrap();

        let bytes = serialize(&bundle);
        assert_eq!(bytes.len(), 16 + 4 + 8);
        assert_eq!(&bytes[16..20], &[0x00, 0x00, 0x00, 0x08]);
        assert_eq!(&bytes[20..28], b"/a\0\0,\0\0\0");
    }

    #[test]
    fn test_capacity_decreases_by_element_cost() {
        let mut bundle = Bundle::new(TimeTag::IMMEDIATE);
        let message = Message::new("/abc").unwrap();
        let before = bundle.remaining_capacity();
        bundle.add(&message).unwrap();
        assert_eq!(
            bundle.remaining_capacity(),
            before - (Contents::size(&message) + 4)
        );
    }

    #[test]
    fn test_clear_preserves_time_tag() {
        let mut bundle = Bundle::new(TimeTag::new(5, 6));
        bundle.add(&Message::new("/a").unwrap()).unwrap();
        assert!(!bundle.is_empty());

        bundle.clear();
        assert!(bundle.is_empty());
        assert_eq!(bundle.time_tag(), TimeTag::new(5, 6));
        assert_eq!(bundle.size(), 16);

        // clearing an empty bundle is a no-op
        let snapshot = bundle.clone();
        bundle.clear();
        assert_eq!(bundle, snapshot);
    }

    #[test]
    fn test_bundle_full() {
        let mut bundle = Bundle::new(TimeTag::IMMEDIATE);
        let mut message = Message::new("/pad").unwrap();
        message.add_blob(&[0u8; 500]).unwrap();
        message.add_blob(&[0u8; 500]).unwrap();

        bundle.add(&message).unwrap();
        assert_eq!(bundle.add(&message), Err(Error::BundleFull));
    }

    #[test]
    fn test_roundtrip_with_nested_bundle() {
        let mut inner = Bundle::new(TimeTag::IMMEDIATE);
        inner.add(&Message::new("/inner").unwrap()).unwrap();

        let mut outer = Bundle::new(TimeTag::new(2, 0));
        outer.add(&Message::new("/outer").unwrap()).unwrap();
        outer.add(&inner).unwrap();

        let bytes = serialize(&outer);
        assert_eq!(bytes.len() % 4, 0);
        let parsed = Bundle::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, outer);
    }

    #[test]
    fn test_element_iteration() {
        let mut bundle = Bundle::new(TimeTag::IMMEDIATE);
        bundle.add(&Message::new("/a").unwrap()).unwrap();
        bundle.add(&Message::new("/bc").unwrap()).unwrap();

        let bytes = serialize(&bundle);
        let mut parsed = Bundle::from_bytes(&bytes).unwrap();

        assert!(parsed.is_element_available());
        assert_eq!(parsed.next_element().unwrap(), b"/a\0\0,\0\0\0");
        assert!(parsed.is_element_available());
        assert_eq!(parsed.next_element().unwrap(), b"/bc\0,\0\0\0");
        assert!(!parsed.is_element_available());
        assert_eq!(parsed.next_element(), Err(Error::BundleElementNotAvailable));
    }

    #[test]
    fn test_parse_rejects_invalid_headers() {
        assert_eq!(
            Bundle::from_bytes(&[0u8; 15]).unwrap_err(),
            Error::SizeNotMultipleOfFour
        );
        assert_eq!(
            Bundle::from_bytes(&[0u8; 12]).unwrap_err(),
            Error::BundleSizeTooSmall
        );
        let oversized = vec![0u8; MAX_BUNDLE_SIZE + 4];
        assert_eq!(
            Bundle::from_bytes(&oversized).unwrap_err(),
            Error::BundleSizeTooLarge
        );
        assert_eq!(
            Bundle::from_bytes(b"/bundle\0\0\0\0\0\0\0\0\0").unwrap_err(),
            Error::NoHashAtStartOfBundle
        );
    }

    #[test]
    fn test_element_errors() {
        let mut bytes = Vec::from(BUNDLE_HEADER);
        bytes.extend_from_slice(&[0u8; 8]); // time tag
        bytes.extend_from_slice(&(-4i32).to_be_bytes());
        bytes.extend_from_slice(&[0u8; 4]);

        let mut bundle = Bundle::from_bytes(&bytes).unwrap();
        assert_eq!(
            bundle.next_element(),
            Err(Error::NegativeBundleElementSize)
        );

        // a size that is not a multiple of four
        bytes[16..20].copy_from_slice(&2i32.to_be_bytes());
        let mut bundle = Bundle::from_bytes(&bytes).unwrap();
        assert_eq!(bundle.next_element(), Err(Error::SizeNotMultipleOfFour));

        // a size pointing past the end of the element buffer
        bytes[16..20].copy_from_slice(&8i32.to_be_bytes());
        let mut bundle = Bundle::from_bytes(&bytes).unwrap();
        assert_eq!(bundle.next_element(), Err(Error::InvalidElementSize));
    }
}
