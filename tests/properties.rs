//! Property tests over arbitrary push sequences.

use hetvec::HetVec;
use proptest::prelude::*;

#[repr(align(16))]
#[derive(Clone, Copy, Debug, PartialEq)]
struct Aligned16(u64);

#[derive(Clone, Debug, PartialEq)]
struct Blob([u8; 37]);

type Mixed = (u8, u16, u64, Aligned16, Blob, String, ());

#[derive(Clone, Debug)]
enum Value {
    Byte(u8),
    Short(u16),
    Long(u64),
    Wide(Aligned16),
    Blob(Blob),
    Text(String),
    Unit,
}

fn value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<u8>().prop_map(Value::Byte),
        any::<u16>().prop_map(Value::Short),
        any::<u64>().prop_map(Value::Long),
        any::<u64>().prop_map(|v| Value::Wide(Aligned16(v))),
        any::<u8>().prop_map(|b| Value::Blob(Blob([b; 37]))),
        "[a-z]{0,12}".prop_map(Value::Text),
        Just(Value::Unit),
    ]
}

fn build(values: &[Value]) -> HetVec<Mixed> {
    let mut vector = HetVec::new();
    for value in values {
        match value.clone() {
            Value::Byte(v) => vector.push(v),
            Value::Short(v) => vector.push(v),
            Value::Long(v) => vector.push(v),
            Value::Wide(v) => vector.push(v),
            Value::Blob(v) => vector.push(v),
            Value::Text(v) => vector.push(v),
            Value::Unit => vector.push(()),
        }
    }
    vector
}

fn matches(vector: &HetVec<Mixed>, index: usize, expected: &Value) -> bool {
    match expected {
        Value::Byte(v) => vector.get::<u8, _>(index) == Ok(v),
        Value::Short(v) => vector.get::<u16, _>(index) == Ok(v),
        Value::Long(v) => vector.get::<u64, _>(index) == Ok(v),
        Value::Wide(v) => vector.get::<Aligned16, _>(index) == Ok(v),
        Value::Blob(v) => vector.get::<Blob, _>(index) == Ok(v),
        Value::Text(v) => vector.get::<String, _>(index) == Ok(v),
        Value::Unit => vector.get::<(), _>(index).is_ok(),
    }
}

/// For each member of `Mixed`, in type-index order, whether `get` at `index`
/// reports a type mismatch.
fn mismatches(vector: &HetVec<Mixed>, index: usize) -> [bool; 7] {
    [
        vector.get::<u8, _>(index).is_err_and(|e| e.is_type_mismatch()),
        vector.get::<u16, _>(index).is_err_and(|e| e.is_type_mismatch()),
        vector.get::<u64, _>(index).is_err_and(|e| e.is_type_mismatch()),
        vector.get::<Aligned16, _>(index).is_err_and(|e| e.is_type_mismatch()),
        vector.get::<Blob, _>(index).is_err_and(|e| e.is_type_mismatch()),
        vector.get::<String, _>(index).is_err_and(|e| e.is_type_mismatch()),
        vector.get::<(), _>(index).is_err_and(|e| e.is_type_mismatch()),
    ]
}

proptest! {
    #[test]
    fn elements_read_back_in_order(values in proptest::collection::vec(value(), 0..200)) {
        let vector = build(&values);
        prop_assert_eq!(vector.len(), values.len());
        for (index, expected) in values.iter().enumerate() {
            prop_assert!(matches(&vector, index, expected), "element {} differs", index);
        }
    }

    #[test]
    fn elements_are_aligned_and_disjoint(values in proptest::collection::vec(value(), 1..200)) {
        let vector = build(&values);
        let mut previous_end = 0usize;
        for (index, element) in vector.iter().enumerate() {
            let address = element.as_ptr() as usize;
            prop_assert_eq!(address % element.align(), 0, "element {} misaligned", index);
            prop_assert!(address >= previous_end, "element {} overlaps", index);
            previous_end = address + element.size();
        }
        prop_assert!(vector.byte_len() <= vector.capacity());
        prop_assert!(vector.len() <= vector.entries());
    }

    #[test]
    fn other_member_types_are_rejected(values in proptest::collection::vec(value(), 1..100)) {
        let vector = build(&values);
        for index in 0..vector.len() {
            let stored = vector.type_index(index).unwrap();
            for (type_index, mismatch) in mismatches(&vector, index).into_iter().enumerate() {
                prop_assert_eq!(
                    mismatch,
                    type_index != stored,
                    "element {} holds type {}, asked for type {}",
                    index,
                    stored,
                    type_index
                );
            }
        }
    }

    #[test]
    fn clone_matches_source(values in proptest::collection::vec(value(), 0..100)) {
        let vector = build(&values);
        let copy = vector.clone();
        prop_assert_eq!(copy.len(), vector.len());
        for (index, expected) in values.iter().enumerate() {
            prop_assert!(matches(&copy, index, expected), "clone differs at {}", index);
        }
    }

    #[test]
    fn type_indices_follow_pushes(values in proptest::collection::vec(value(), 0..100)) {
        let vector = build(&values);
        let expected: Vec<usize> = values
            .iter()
            .map(|value| match value {
                Value::Byte(_) => 0,
                Value::Short(_) => 1,
                Value::Long(_) => 2,
                Value::Wide(_) => 3,
                Value::Blob(_) => 4,
                Value::Text(_) => 5,
                Value::Unit => 6,
            })
            .collect();
        let actual: Vec<usize> = (0..vector.len()).filter_map(|i| vector.type_index(i)).collect();
        prop_assert_eq!(actual, expected);
    }
}
