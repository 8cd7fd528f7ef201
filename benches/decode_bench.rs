use byteorder::{LittleEndian, WriteBytesExt};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pakmeta::{get_decoder, DecodeMode, DecodeOptions};
use std::io::Write;

/// Index with `count` records alternating stored and 4-block compressed.
fn synthetic_index(count: u32) -> Vec<u8> {
    let mut out = Vec::new();
    out.write_u32::<LittleEndian>(10).unwrap();
    out.write_all(b"../../../\0").unwrap();
    out.write_u32::<LittleEndian>(count).unwrap();
    for i in 0..count {
        let name = format!("Game/Content/Asset_{i:06}.uasset");
        out.write_u32::<LittleEndian>(name.len() as u32 + 1).unwrap();
        out.write_all(name.as_bytes()).unwrap();
        out.write_u8(0).unwrap();

        let method = if i % 2 == 0 { 0 } else { 1 };
        out.write_u64::<LittleEndian>(u64::from(i) * 4096).unwrap();
        out.write_u64::<LittleEndian>(4096).unwrap();
        out.write_u64::<LittleEndian>(16384).unwrap();
        out.write_u32::<LittleEndian>(method).unwrap();
        out.write_all(&[0xA5; 20]).unwrap();
        if method != 0 {
            out.write_u32::<LittleEndian>(4).unwrap();
            for b in 0..4u64 {
                out.write_u64::<LittleEndian>(b * 1024).unwrap();
                out.write_u64::<LittleEndian>((b + 1) * 1024).unwrap();
            }
        }
        out.write_u8(0).unwrap();
        out.write_u32::<LittleEndian>(65536).unwrap();
    }
    out
}

fn bench_decode_index(c: &mut Criterion) {
    let index = synthetic_index(10_000);

    for mode in [DecodeMode::Schema, DecodeMode::Safe] {
        let decoder = get_decoder(&DecodeOptions::default().with_mode(mode));
        c.bench_function(&format!("decode_index_10k_{}", mode.name()), |b| {
            b.iter(|| decoder.decode_index(black_box(&index)).unwrap())
        });
    }
}

criterion_group!(benches, bench_decode_index);
criterion_main!(benches);
