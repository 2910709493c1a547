use proptest::prelude::*;
use mavtest_gen::parser::{parse_detail, parse_hex_dump, scan_records};
use mavtest_gen::primitives::FieldValue;
use mavtest_gen::types::ProtocolVersion;

#[derive(Debug, Clone)]
enum Printed {
    Scalar(String),
    Array(Vec<u32>),
}

fn printed_value() -> impl Strategy<Value = Printed> {
    prop_oneof![
        (-1_000_000i64..1_000_000).prop_map(|n| Printed::Scalar(n.to_string())),
        (0u32..100_000, 0u32..1_000_000).prop_map(|(a, b)| Printed::Scalar(format!("{a}.{b:06}"))),
        prop::collection::vec(0u32..256, 1..6).prop_map(Printed::Array),
    ]
}

// Prints a field list the way the reference binaries do: `name: value` pairs
// separated by two spaces, arrays as `[ a,  b, ]`.
fn print_fields(fields: &[(String, Printed)]) -> String {
    let mut out = String::from("{ ");
    for (name, value) in fields {
        out.push_str(name);
        out.push_str(": ");
        match value {
            Printed::Scalar(s) => out.push_str(s),
            Printed::Array(items) => {
                out.push_str("[ ");
                let parts: Vec<String> = items.iter().map(|i| format!("{i},")).collect();
                out.push_str(&parts.join("  "));
                out.push_str(" ]");
            }
        }
        out.push_str("  ");
    }
    out.push('}');
    out
}

proptest! {
    /// Every printed field comes back with its name and value, in order.
    #[test]
    fn prop_fields_survive_parsing(
        fields in prop::collection::vec(("[a-z][a-z0-9_]{0,12}", printed_value()), 0..8),
        sysid in any::<u8>(),
        compid in any::<u8>(),
        seq in any::<u8>(),
        ts in prop::option::of(any::<u32>()),
    ) {
        let ts_token = ts.map(|t| format!("ts:{t} ")).unwrap_or_default();
        let line = format!("sysid:{sysid} compid:{compid} seq:{seq} {ts_token}MSG_NAME {}", print_fields(&fields));

        let detail = parse_detail(&line, 1).unwrap();
        prop_assert_eq!(detail.message.as_str(), "msg_name");
        prop_assert_eq!((detail.sysid, detail.compid, detail.seq), (sysid, compid, seq));
        prop_assert_eq!(detail.signing_timestamp, ts.map(u64::from));
        prop_assert_eq!(detail.fields.len(), fields.len());

        for (parsed, (name, printed)) in detail.fields.iter().zip(&fields) {
            prop_assert_eq!(&parsed.name, name);
            match printed {
                Printed::Scalar(s) => prop_assert_eq!(&parsed.value, &FieldValue::Scalar(s.clone())),
                Printed::Array(items) => prop_assert_eq!(
                    &parsed.value,
                    &FieldValue::Array(items.iter().map(|i| i.to_string()).collect())
                ),
            }
        }
    }

    /// The captured bytes equal the bytes printed, for any frame.
    #[test]
    fn prop_hex_dump_bytes_exact(tail in prop::collection::vec(any::<u8>(), 2..280)) {
        let mut bytes = vec![0xfd];
        bytes.extend(&tail);
        let line = bytes.iter().map(|b| format!("{b:02x}")).collect::<Vec<_>>().join(" ") + " ";

        let dump = parse_hex_dump(&line, ProtocolVersion::V2, 1).unwrap();
        prop_assert_eq!(&dump.bytes, &bytes);
        prop_assert_eq!(dump.is_signed(), bytes[2] & 1 == 1);

        let expected = bytes.iter().map(|b| format!("0x{b:02x}")).collect::<Vec<_>>().join(", ");
        prop_assert_eq!(dump.to_js_list(), expected);
    }

    /// Arbitrary text without marker or detail lines never yields records or errors.
    #[test]
    fn prop_unknown_lines_are_ignored(lines in prop::collection::vec("[g-z ]{0,40}", 0..20)) {
        let text = lines.join("\n");
        let outcome = scan_records(&text, ProtocolVersion::V2).unwrap();
        prop_assert!(outcome.records.is_empty());
    }
}
