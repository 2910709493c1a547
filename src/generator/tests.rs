#![cfg(test)]

use crate::config::GeneratorConfig;
use crate::error::GenError;
use crate::generator::{render_suite, Generator, TestIds};
use crate::lookup::LongFieldTable;
use crate::template::{CASE_SEPARATOR, DONE_MARKER};
use crate::testing::StaticSource;
use crate::types::ProtocolVersion;

// --- Test Utilities ---

const V2_OUTPUT: &str = "\
fd 08 00 00 7e 2a 0b e2 00 00 00 00 88 41 00 00 34 42 30 93
sysid:42 compid:11 seq:126 RPM { rpm1: 17.000000  rpm2: 45.000000  }
fd 09 01 00 7f 2a 0b 02 00 00 00 00 00 00 00 00 00 00 11 22
sysid:42 compid:11 seq:127 ts:1608800000 SYSTEM_TIME { time_unix_usec: 93372036854775807  time_boot_ms: 1  }
";

const V1_OUTPUT: &str = "\
fe 08 7e 2a 0b e2 00 00 88 41 00 00 34 42 30 93
sysid:42 compid:11 seq:126 RPM { rpm1: 17.000000  rpm2: 45.000000  }
";

const HELPER: &str = "\
      test_system_time.time_unix_usec = wrap_long(Long.fromNumber(1, true)); // fieldtype: uint64_t
";

fn config(sets: &[&str], versions: &[ProtocolVersion]) -> GeneratorConfig {
    GeneratorConfig {
        message_sets: sets.iter().map(|s| s.to_string()).collect(),
        versions: versions.to_vec(),
        ..GeneratorConfig::default()
    }
}

fn ids_in(text: &str) -> Vec<u64> {
    text.lines()
        .filter_map(|l| l.trim_start().strip_prefix("it('id"))
        .map(|rest| rest.split(' ').next().unwrap().parse().unwrap())
        .collect()
}

// --- render_suite ---

#[test]
fn suite_emits_one_case_per_detail_line() {
    let mut ids = TestIds::default();
    let table = LongFieldTable::from_helper_text(HELPER);
    let (text, summary) = render_suite("common", ProtocolVersion::V2, V2_OUTPUT, &table, &mut ids).unwrap();

    assert_eq!(summary.cases, 2);
    assert_eq!(summary.signed_cases, 1);
    assert_eq!(summary.ids, Some((1, 2)));
    assert_eq!(ids.peek(), 3);
    assert_eq!(text.matches(CASE_SEPARATOR).count(), 2);
    assert!(text.starts_with("\n//----"));
    assert!(text.ends_with("\n\n});\n"));
    assert!(text.contains("//      test_system_time.time_unix_usec=wrap_long(Long.fromNumber(93372036854775807, true));"));
    assert!(text.contains("//      test_system_time.time_boot_ms=1;"));
}

#[test]
fn suite_for_other_version_skips_details() {
    let mut ids = TestIds::starting_at(10);
    let (text, summary) =
        render_suite("common", ProtocolVersion::V1, V2_OUTPUT, &LongFieldTable::default(), &mut ids).unwrap();
    assert_eq!(summary.cases, 0);
    assert_eq!(summary.skipped_details, 2);
    assert_eq!(summary.ids, None);
    assert_eq!(ids.peek(), 10);
    assert!(!text.contains("it('id"));
}

#[test]
fn suite_errors_name_the_pair() {
    let mut ids = TestIds::default();
    let bad = "fd 08 00 00\nsysid:42 compid:11 seq:1 RPM { rpm1  }\n";
    let err = render_suite("ardupilotmega", ProtocolVersion::V2, bad, &LongFieldTable::default(), &mut ids)
        .unwrap_err();
    match err {
        GenError::Suite { message_set, version, source } => {
            assert_eq!(message_set, "ardupilotmega");
            assert_eq!(version, ProtocolVersion::V2);
            assert!(matches!(*source, GenError::MalformedField { .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

// --- Generator ---

#[test]
fn ids_continue_across_suites() {
    let source = StaticSource::new()
        .with_output("ardupilotmega", ProtocolVersion::V1, V1_OUTPUT)
        .with_output("ardupilotmega", ProtocolVersion::V2, V2_OUTPUT)
        .with_output("common", ProtocolVersion::V1, V1_OUTPUT)
        .with_output("common", ProtocolVersion::V2, V2_OUTPUT);
    let generator = Generator::new(GeneratorConfig::default(), source);
    let out = generator.generate().unwrap();

    assert_eq!(ids_in(&out.text), vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(out.report.total_cases(), 6);
    assert_eq!(out.report.total_signed(), 2);
    assert_eq!(out.report.suites.len(), 4);
    assert_eq!(out.report.suites[1].ids, Some((2, 3)));
}

#[test]
fn suites_follow_config_order() {
    let source = StaticSource::new();
    let generator = Generator::new(config(&["common", "ardupilotmega"], &ProtocolVersion::ALL), source);
    let text = generator.generate().unwrap().text;

    let order: Vec<usize> = ["common/1.0", "common/2.0", "ardupilotmega/1.0", "ardupilotmega/2.0"]
        .iter()
        .map(|pair| text.find(&format!("tests of {pair} against C impl")).unwrap())
        .collect();
    assert!(order.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn empty_sources_still_produce_wrappers() {
    let generator = Generator::new(config(&["common"], &[ProtocolVersion::V2]), StaticSource::new());
    let out = generator.generate().unwrap();
    assert!(out.text.contains("should = require('should');"));
    assert!(out.text.contains("describe('end-to-end node byte-level tests of common/2.0 against C impl'"));
    assert!(out.text.ends_with(&format!("{DONE_MARKER}\n")));
    assert_eq!(out.report.total_cases(), 0);
}

#[test]
fn output_is_deterministic() {
    let source = StaticSource::new()
        .with_output("common", ProtocolVersion::V2, V2_OUTPUT)
        .with_helper("common", ProtocolVersion::V2, HELPER);
    let generator = Generator::new(config(&["common"], &[ProtocolVersion::V2]), source);
    assert_eq!(generator.generate().unwrap().text, generator.generate().unwrap().text);
}
