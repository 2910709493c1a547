use criterion::{criterion_group, criterion_main, Criterion};
use mavtest_gen::generator::{render_suite, TestIds};
use mavtest_gen::lookup::LongFieldTable;
use mavtest_gen::parser::scan_records;
use mavtest_gen::types::ProtocolVersion;

fn reference_output(frames: usize) -> String {
    let mut out = String::new();
    for i in 0..frames {
        out.push_str("fd 1c 00 00 7e 2a 0b e2 00 00 00 00 88 41 00 00 34 42 30 93 00 00 00 00 00 00 00 00 00 00 00 00\n");
        out.push_str(&format!(
            "sysid:42 compid:11 seq:{} SERVO_OUTPUT_RAW {{ time_usec: 963497464  port: 2  servo: [ 1,  2,  3,  4, ]  }}\n",
            i % 256
        ));
    }
    out
}

fn scan_benchmarks(c: &mut Criterion) {
    let output = reference_output(1000);
    let table = LongFieldTable::from_helper_text(
        "      test_servo_output_raw.time_usec = wrap_long(Long.fromNumber(1, true));\n",
    );

    c.bench_function("scan_1000_frames", |b| {
        b.iter(|| scan_records(&output, ProtocolVersion::V2))
    });

    c.bench_function("render_1000_frames", |b| {
        b.iter(|| {
            let mut ids = TestIds::default();
            render_suite("common", ProtocolVersion::V2, &output, &table, &mut ids)
        })
    });
}

criterion_group!(benches, scan_benchmarks);
criterion_main!(benches);
