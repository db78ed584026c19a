//! End-to-end serialize/parse round trips across messages, bundles, and
//! packets.

use oscwire::protocol::{address, MAX_TRANSPORT_SIZE};
use oscwire::{Bundle, Contents, Error, Message, MidiMessage, Packet, RgbaColour, TimeTag};

fn serialize(contents: &impl Contents) -> Vec<u8> {
    let mut buffer = [0u8; MAX_TRANSPORT_SIZE];
    let size = contents.write_to(&mut buffer).unwrap();
    buffer[..size].to_vec()
}

#[test]
fn minimal_message_wire_form() {
    let message = Message::new("/a").unwrap();
    let bytes = serialize(&message);
    assert_eq!(bytes, [0x2F, 0x61, 0x00, 0x00, 0x2C, 0x00, 0x00, 0x00]);
    assert_eq!(Message::from_bytes(&bytes).unwrap(), message);
}

#[test]
fn message_with_every_type_survives_roundtrip() {
    let mut message = Message::new("/synth/voice/3").unwrap();
    message.add_i32(i32::MIN).unwrap();
    message.add_f32(f32::MIN_POSITIVE).unwrap();
    message.add_str("").unwrap();
    message.add_blob(&[]).unwrap();
    message.add_i64(i64::MIN).unwrap();
    message.add_time_tag(TimeTag::new(u32::MAX, u32::MAX)).unwrap();
    message.add_f64(f64::MAX).unwrap();
    message.add_alternate_str("S").unwrap();
    message.add_char('~').unwrap();
    message.add_rgba(RgbaColour::new(255, 0, 127, 1)).unwrap();
    message.add_midi(MidiMessage::new(1, 0x80, 64, 0)).unwrap();
    message.add_bool(true).unwrap();
    message.add_nil().unwrap();
    message.add_infinitum().unwrap();

    let bytes = serialize(&message);
    assert_eq!(bytes.len() % 4, 0);
    assert_eq!(bytes.len(), message.size());

    let mut parsed = Message::from_bytes(&bytes).unwrap();
    assert_eq!(parsed, message);

    assert_eq!(parsed.read_i32().unwrap(), i32::MIN);
    assert_eq!(parsed.read_f32().unwrap(), f32::MIN_POSITIVE);
    assert_eq!(parsed.read_str().unwrap(), "");
    assert_eq!(parsed.read_blob().unwrap(), &[] as &[u8]);
    assert_eq!(parsed.read_i64().unwrap(), i64::MIN);
    assert_eq!(
        parsed.read_time_tag().unwrap(),
        TimeTag::new(u32::MAX, u32::MAX)
    );
    assert_eq!(parsed.read_f64().unwrap(), f64::MAX);
    assert_eq!(parsed.read_str().unwrap(), "S");
    assert_eq!(parsed.read_char().unwrap(), '~');
    assert_eq!(parsed.read_rgba().unwrap(), RgbaColour::new(255, 0, 127, 1));
    assert_eq!(parsed.read_midi().unwrap(), MidiMessage::new(1, 0x80, 64, 0));
    assert!(parsed.read_bool().unwrap());
    parsed.read_nil().unwrap();
    parsed.read_infinitum().unwrap();
    assert!(!parsed.is_argument_available());
}

#[test]
fn bundle_tree_survives_roundtrip() {
    let mut leaf = Message::new("/leaf").unwrap();
    leaf.add_str("x").unwrap();

    let mut inner = Bundle::new(TimeTag::IMMEDIATE);
    inner.add(&leaf).unwrap();

    let mut outer = Bundle::new(TimeTag::new(1, 0));
    outer.add(&Message::new("/a").unwrap()).unwrap();
    outer.add(&inner).unwrap();

    let bytes = serialize(&outer);
    assert_eq!(bytes.len() % 4, 0);
    assert_eq!(bytes.len(), outer.size());
    assert_eq!(Bundle::from_bytes(&bytes).unwrap(), outer);
}

#[test]
fn packet_roundtrip_through_bytes() {
    let mut message = Message::new("/m").unwrap();
    message.add_i32(9).unwrap();
    let packet = Packet::from_contents(&message).unwrap();

    let received = Packet::from_bytes(packet.contents()).unwrap();
    assert_eq!(received.contents(), packet.contents());
    assert_eq!(Message::from_bytes(received.contents()).unwrap(), message);
}

#[test]
fn matcher_agrees_with_literal_equality() {
    let patterns = ["/exact/address", "/another", "/with/three/parts"];
    for pattern in patterns {
        assert!(address::is_literal(pattern));
        assert!(address::pattern_matches(pattern, pattern));
        assert!(!address::pattern_matches(pattern, "/something/else"));
    }
}

#[test]
fn matcher_spec_cases() {
    assert!(address::pattern_matches("/colour/b*", "/colour/blue"));
    assert!(!address::pattern_matches("/colour/b*", "/colour/red"));
    assert!(address::pattern_matches("/abc[!d-h]qrst", "/abcXqrst"));
    assert!(!address::pattern_matches("/abc[!d-h]qrst", "/abcdqrst"));
    assert!(address::pattern_matches("/{in,out,,}puts", "/inputs"));
    assert!(address::pattern_matches("/{in,out,,}puts", "/puts"));
    assert!(!address::pattern_matches("/{in,out,,}puts", "/midputs"));
}

#[test]
fn truncated_payload_surfaces_error() {
    // declares an int argument but carries no payload bytes
    let mut message = Message::from_bytes(b"/a\0\0,i\0\0").unwrap();
    assert_eq!(
        message.read_i32().unwrap_err(),
        Error::MessageTooShortForArgumentType
    );
}
