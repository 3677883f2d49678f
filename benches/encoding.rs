use bacnet_codec::encoding::{ApplicationValue, Serializable, TagHeader};
use bacnet_codec::service::ConfirmedServiceRequest;
use bacnet_codec::ReadBuffer;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn header_benchmark(c: &mut Criterion) {
    // extended tag number and a two octet extended length
    let bytes = [0xFD, 0x15, 0xFE, 0x01, 0x2C];
    c.bench_function("parse_tag_header", |b| {
        b.iter(|| {
            let mut buffer = ReadBuffer::new(black_box(&bytes));
            TagHeader::parse(&mut buffer).unwrap()
        })
    });

    c.bench_function("serialize_application_unsigned", |b| {
        b.iter(|| ApplicationValue::unsigned(black_box(1_000_000)).to_bytes().unwrap())
    });
}

fn service_benchmark(c: &mut Criterion) {
    let bytes = hex::decode("0F0C0140000119553E91013F4908").unwrap();
    c.bench_function("write_property_round_trip", |b| {
        b.iter(|| {
            let mut buffer = ReadBuffer::new(black_box(&bytes));
            let request = ConfirmedServiceRequest::parse(&mut buffer, bytes.len()).unwrap();
            request.to_bytes().unwrap()
        })
    });
}

criterion_group!(benches, header_benchmark, service_benchmark);
criterion_main!(benches);
