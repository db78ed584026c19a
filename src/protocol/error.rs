//! Errors returned by codec, dispatch, and framing operations.

use thiserror::Error;

/// Errors produced while constructing, parsing, or dispatching OSC data.
///
/// Every variant carries a fixed human-readable message through `Display`.
/// Operations leave their target in a consistent state on error; a failed
/// argument reader additionally leaves the message cursors untouched so the
/// caller may retry with a different reader.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Error {
    /// Destination buffer cannot hold the bytes to be written.
    #[error("destination size too small to contain the number of bytes available")]
    DestinationTooSmall,

    /// OSC data sizes must always be multiples of four bytes.
    #[error("OSC packet or OSC contents size must be a multiple of four")]
    SizeNotMultipleOfFour,

    /// A handler was required but none has been installed.
    #[error("callback function undefined")]
    CallbackUndefined,

    /// Requested address part index is beyond the last part.
    #[error("not enough parts in OSC address pattern to get part at specified index")]
    NotEnoughPartsInAddressPattern,

    /// Message bytes or an address pattern did not begin with `/`.
    #[error("OSC address pattern does not start with a slash character")]
    NoSlashAtStartOfMessage,

    /// Address pattern exceeds [`MAX_ADDRESS_PATTERN_LENGTH`](crate::protocol::MAX_ADDRESS_PATTERN_LENGTH).
    #[error("OSC address pattern length cannot exceed the maximum address pattern length")]
    AddressPatternTooLong,

    /// Argument count exceeds [`MAX_ARGUMENTS`](crate::protocol::MAX_ARGUMENTS).
    #[error("number of arguments cannot exceed the maximum number of arguments")]
    TooManyArguments,

    /// Combined argument payload exceeds [`MAX_ARGUMENTS_SIZE`](crate::protocol::MAX_ARGUMENTS_SIZE).
    #[error("total arguments size cannot exceed the maximum arguments size")]
    ArgumentsSizeTooLarge,

    /// Message serialized without an address pattern.
    #[error("undefined OSC address pattern")]
    UndefinedAddressPattern,

    /// Fewer bytes than the smallest valid OSC message.
    #[error("OSC message size too small to be a valid OSC message")]
    MessageSizeTooSmall,

    /// More bytes than the transport permits for one message.
    #[error("OSC message size cannot exceed the maximum message size")]
    MessageSizeTooLarge,

    /// Source ran out before the address pattern terminator.
    #[error("source data ends before the end of address pattern")]
    SourceEndsBeforeEndOfAddressPattern,

    /// Source ran out before the `,` opening the type tag string.
    #[error("source data ends before the start of type tag string")]
    SourceEndsBeforeStartOfTypeTagString,

    /// Type tag string exceeds [`MAX_TYPE_TAG_LENGTH`](crate::protocol::MAX_TYPE_TAG_LENGTH).
    #[error("type tag string length cannot exceed the maximum type tag string length")]
    TypeTagStringTooLong,

    /// Source ran out before the type tag string terminator.
    #[error("source data ends before the end of type tag string")]
    SourceEndsBeforeEndOfTypeTagString,

    /// Source ran out where more bytes were required.
    #[error("unexpected end of source data")]
    UnexpectedEndOfSource,

    /// The argument cursor is past the final argument.
    #[error("no arguments available")]
    NoArgumentsAvailable,

    /// The next argument's type tag does not match the reader.
    #[error("unexpected argument type")]
    UnexpectedArgumentType,

    /// Payload too short for the argument declared by the type tag.
    #[error("OSC message is too short to contain argument type")]
    MessageTooShortForArgumentType,

    /// An OSC string or address pattern was not valid UTF-8.
    #[error("OSC string is not valid UTF-8")]
    StringNotUtf8,

    /// A character argument outside the ASCII range.
    #[error("OSC character argument must be an ASCII character")]
    CharacterNotAscii,

    /// Insufficient remaining capacity in the bundle for the contents.
    #[error("not enough space available in OSC bundle to contain contents")]
    BundleFull,

    /// Fewer bytes than the smallest valid OSC bundle.
    #[error("OSC bundle size too small to be a valid OSC bundle")]
    BundleSizeTooSmall,

    /// More bytes than the transport permits for one bundle.
    #[error("OSC bundle size cannot exceed the maximum bundle size")]
    BundleSizeTooLarge,

    /// Bundle bytes did not begin with `#`.
    #[error("OSC bundle does not start with a hash character")]
    NoHashAtStartOfBundle,

    /// No further element behind the iteration cursor.
    #[error("OSC bundle element not available")]
    BundleElementNotAvailable,

    /// A bundle element declared a negative size.
    #[error("OSC bundle element size cannot be negative")]
    NegativeBundleElementSize,

    /// A bundle element declared more bytes than remain in the bundle.
    #[error("OSC bundle too short to contain the OSC bundle element size")]
    InvalidElementSize,

    /// Contents were neither an OSC message nor an OSC bundle.
    #[error("OSC contents is not an OSC bundle or OSC message")]
    InvalidContents,

    /// More bytes than the transport permits for one packet.
    #[error("OSC packet size cannot exceed the maximum packet size")]
    PacketSizeTooLarge,

    /// A packet or bundle element held zero bytes of contents.
    #[error("OSC contents size cannot be zero")]
    ContentsEmpty,

    /// SLIP receive buffer overflowed before an END byte arrived.
    #[error("encoded SLIP packet size cannot exceed the SLIP decoder buffer size")]
    EncodedSlipPacketTooLong,

    /// A SLIP ESC byte was followed by neither ESC_END nor ESC_ESC.
    #[error("unexpected byte after SLIP ESC byte")]
    UnexpectedByteAfterSlipEsc,

    /// Decoded SLIP payload exceeds the maximum packet size.
    #[error("decoded SLIP packet size cannot exceed the maximum packet size")]
    DecodedSlipPacketTooLong,
}

/// Result type alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_fixed() {
        assert_eq!(
            Error::SizeNotMultipleOfFour.to_string(),
            "OSC packet or OSC contents size must be a multiple of four"
        );
        assert_eq!(
            Error::NoSlashAtStartOfMessage.to_string(),
            "OSC address pattern does not start with a slash character"
        );
        assert_eq!(
            Error::UnexpectedByteAfterSlipEsc.to_string(),
            "unexpected byte after SLIP ESC byte"
        );
    }

    #[test]
    fn test_errors_are_comparable() {
        assert_eq!(Error::BundleFull, Error::BundleFull);
        assert_ne!(Error::BundleFull, Error::ContentsEmpty);
    }
}
