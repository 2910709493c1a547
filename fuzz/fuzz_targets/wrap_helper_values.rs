#![no_main]

// Harness: wrap_helper_values
// Arbitrary helper text plus an arbitrary value: building the table and
// rendering through any wrapper must not panic (byte offsets must stay on
// char boundaries).

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mavtest_gen::lookup::{LongFieldTable, ValueWrapper};
use mavtest_gen::primitives::{FieldAssignment, FieldValue};

#[derive(Arbitrary, Debug)]
struct Input {
    helper: String,
    expr: String,
    field: String,
    value: String,
}

fuzz_target!(|input: Input| {
    let table = LongFieldTable::from_helper_text(&input.helper);
    let assignment = FieldAssignment {
        name: input.field.clone(),
        value: FieldValue::Scalar(input.value.clone()),
    };
    let _ = table.render_value("msg", &assignment);

    let wrapper = ValueWrapper::from_expression(&input.expr);
    let rendered = wrapper.apply(&FieldValue::Str(input.value.clone()));
    assert!(rendered.contains(&input.value) || input.value.is_empty());
});
