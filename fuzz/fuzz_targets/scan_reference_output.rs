#![no_main]

// Harness: scan_reference_output
// Feed arbitrary text to the scanner for both versions. It may reject the
// text, but must not panic, and every record it returns must carry a frame of
// the requested version.

use libfuzzer_sys::fuzz_target;
use mavtest_gen::generator::{render_suite, TestIds};
use mavtest_gen::lookup::LongFieldTable;
use mavtest_gen::parser::scan_records;
use mavtest_gen::types::ProtocolVersion;

fuzz_target!(|text: &str| {
    for version in ProtocolVersion::ALL {
        if let Ok(outcome) = scan_records(text, version) {
            for record in &outcome.records {
                assert_eq!(record.packet.version, version);
                assert_eq!(record.packet.bytes.first(), Some(&version.start_byte()));
            }

            let mut ids = TestIds::default();
            let (_, summary) = render_suite("fuzz", version, text, &LongFieldTable::default(), &mut ids)
                .expect("scan succeeded, render must too");
            assert_eq!(summary.cases, outcome.records.len());
            assert_eq!(ids.peek(), 1 + outcome.records.len() as u64);
        }
    }
});
