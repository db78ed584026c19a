use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use oscwire::protocol::MAX_TRANSPORT_SIZE;
use oscwire::transport::slip;
use oscwire::{Bundle, Message, Packet, SlipDecoder, TimeTag};

fn typical_message() -> Message {
    let mut message = Message::new("/synth/voice/1/frequency").unwrap();
    message.add_i32(1).unwrap();
    message.add_f32(440.0).unwrap();
    message.add_str("sawtooth").unwrap();
    message.add_blob(&[0u8; 32]).unwrap();
    message
}

fn bench_message_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("message");

    let message = typical_message();
    group.throughput(Throughput::Bytes(message.size() as u64));
    group.bench_function("serialize", |b| {
        let mut buffer = [0u8; MAX_TRANSPORT_SIZE];
        b.iter(|| {
            black_box(message.write_to(&mut buffer).unwrap());
        });
    });

    let mut buffer = [0u8; MAX_TRANSPORT_SIZE];
    let size = message.write_to(&mut buffer).unwrap();
    group.throughput(Throughput::Bytes(size as u64));
    group.bench_function("parse", |b| {
        b.iter(|| {
            black_box(Message::from_bytes(&buffer[..size]).unwrap());
        });
    });

    group.bench_function("read_arguments", |b| {
        b.iter(|| {
            let mut parsed = Message::from_bytes(&buffer[..size]).unwrap();
            black_box(parsed.read_i32().unwrap());
            black_box(parsed.read_f32().unwrap());
            black_box(parsed.read_str().unwrap());
            black_box(parsed.read_blob().unwrap());
        });
    });

    group.finish();
}

fn bench_bundle_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("bundle");

    let mut bundle = Bundle::new(TimeTag::new(1, 0));
    for _ in 0..8 {
        bundle.add(&typical_message()).unwrap();
    }
    let mut packet = Packet::from_contents(&bundle).unwrap();
    packet.set_message_handler(|time_tag, message| {
        black_box((time_tag, message.address()));
    });

    group.throughput(Throughput::Bytes(packet.size() as u64));
    group.bench_function("process_messages", |b| {
        b.iter(|| {
            packet.process_messages().unwrap();
        });
    });

    group.finish();
}

fn bench_slip(c: &mut Criterion) {
    let mut group = c.benchmark_group("slip");

    let packet = Packet::from_contents(&typical_message()).unwrap();
    let mut frame = [0u8; 2 * MAX_TRANSPORT_SIZE + 1];

    group.throughput(Throughput::Bytes(packet.size() as u64));
    group.bench_function("encode", |b| {
        b.iter(|| {
            black_box(slip::encode(&packet, &mut frame).unwrap());
        });
    });

    let size = slip::encode(&packet, &mut frame).unwrap();
    let mut decoder = SlipDecoder::new();
    decoder.set_packet_handler(|packet| {
        black_box(packet.contents());
        Ok(())
    });
    group.throughput(Throughput::Bytes(size as u64));
    group.bench_function("decode", |b| {
        b.iter(|| {
            for &byte in &frame[..size] {
                decoder.feed(byte).unwrap();
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_message_codec, bench_bundle_dispatch, bench_slip);
criterion_main!(benches);
