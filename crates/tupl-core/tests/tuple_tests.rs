use super::*;
use std::collections::HashMap;

fn nums(values: &[i32]) -> Vec<Value> {
    values.iter().copied().map(Value::from).collect()
}

fn tuple_of(interner: &Interner, values: &[i32]) -> Tuple {
    interner.intern(nums(values))
}

#[test]
fn test_read_access() {
    let interner = Interner::new();
    let t = tuple_of(&interner, &[1, 2, 3]);

    assert_eq!(t.len(), 3);
    assert_eq!(t[0], Value::from(1));
    assert_eq!(t.get(2), Some(&Value::from(3)));
    assert_eq!(t.get(3), None);
    assert_eq!(t.first(), Some(&Value::from(1)));
    assert_eq!(t.last(), Some(&Value::from(3)));
    assert!(t.contains(&Value::from(2)));
    assert_eq!(t.iter().position(|v| *v == Value::from(3)), Some(2));
    assert_eq!((&t).into_iter().count(), 3);
}

#[test]
fn test_immutability_of_copies() {
    let interner = Interner::new();
    let t = tuple_of(&interner, &[1, 2, 3]);

    let mut copy = t.to_vec();
    copy.push(Value::from(4));
    copy[0] = Value::from(100);

    assert_eq!(t.len(), 3);
    assert_eq!(t[0], Value::from(1));
    assert_eq!(tuple_of(&interner, &[1, 2, 3]), t);
}

#[test]
fn test_map_reinterns() {
    let interner = Interner::new();
    let t = tuple_of(&interner, &[1, 2, 3]);
    let doubled = t.map(|v| Value::from(v.as_f64().unwrap_or(0.0) * 2.0));
    assert_eq!(doubled, tuple_of(&interner, &[2, 4, 6]));
    assert!(interner.owns(&doubled));
}

#[test]
fn test_filter() {
    let interner = Interner::new();
    let t = tuple_of(&interner, &[1, 2, 3, 4]);
    let even = t.filter(|v| v.as_f64().is_some_and(|n| n % 2.0 == 0.0));
    assert_eq!(even, tuple_of(&interner, &[2, 4]));
}

#[test]
fn test_slice_clamps() {
    let interner = Interner::new();
    let t = tuple_of(&interner, &[1, 2, 3, 4]);

    assert_eq!(t.slice(1..3), tuple_of(&interner, &[2, 3]));
    assert_eq!(t.slice(2..), tuple_of(&interner, &[3, 4]));
    assert_eq!(t.slice(..=1), tuple_of(&interner, &[1, 2]));
    assert_eq!(t.slice(..), t);
    assert_eq!(t.slice(3..100), tuple_of(&interner, &[4]));
    assert_eq!(t.slice(10..20), interner.intern(Vec::new()));
    assert_eq!(t.slice(3..1), interner.intern(Vec::new()));
}

#[test]
fn test_concat_spreads_tuples() {
    let interner = Interner::new();
    let t = tuple_of(&interner, &[1]);
    let other = tuple_of(&interner, &[2, 3]);
    let joined = t.concat(&[other.to_value(), Value::from(4)]);
    assert_eq!(joined, tuple_of(&interner, &[1, 2, 3, 4]));

    // Plain objects are appended, not spread.
    let plain = Object::new(nums(&[5, 6]));
    let with_plain = t.concat(&[Value::from(plain.clone())]);
    assert_eq!(with_plain.len(), 2);
    assert_eq!(with_plain[1], Value::from(plain));
}

#[test]
fn test_reversed_with_pushed_sorted() {
    let interner = Interner::new();
    let t = tuple_of(&interner, &[3, 1, 2]);

    assert_eq!(t.reversed(), tuple_of(&interner, &[2, 1, 3]));
    assert_eq!(
        t.with(1, Value::from(9)),
        Some(tuple_of(&interner, &[3, 9, 2]))
    );
    assert_eq!(t.with(3, Value::from(9)), None);
    assert_eq!(t.pushed(Value::from(0)), tuple_of(&interner, &[3, 1, 2, 0]));

    let sorted = t.sorted_by(|a, b| {
        let a = a.as_f64().unwrap_or(f64::NAN);
        let b = b.as_f64().unwrap_or(f64::NAN);
        a.total_cmp(&b)
    });
    assert_eq!(sorted, tuple_of(&interner, &[1, 2, 3]));
}

#[test]
fn test_derived_tuples_stay_in_pool() {
    let interner = Interner::new();
    let t = tuple_of(&interner, &[1, 2]);
    let derived = t.pushed(Value::from(3)).slice(1..);
    assert!(interner.owns(&derived));
    assert!(!Interner::global().owns(&derived));
}

#[test]
fn test_derived_tuples_fall_back_to_global_pool() {
    let t = {
        let interner = Interner::new();
        interner.intern([Value::from(Object::new("orphan"))])
    };
    let derived = t.pushed(Value::from(1));
    assert!(Interner::global().owns(&derived));
}

#[test]
fn test_from_value_roundtrip() {
    let interner = Interner::new();
    let t = tuple_of(&interner, &[7]);
    let value = Value::from(&t);
    assert_eq!(Tuple::from_value(&value), Some(t));
    assert_eq!(Tuple::from_value(&Value::from(7)), None);
    assert_eq!(Tuple::from_value(&Value::from(Object::new(()))), None);
}

#[test]
fn test_foreign_brand_is_recognised() {
    struct ForeignTuple;

    impl Branded for ForeignTuple {
        fn brand(&self) -> Option<Brand> {
            Some(TUPLE_BRAND)
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
            self
        }
    }

    let foreign = Value::from(Object::from_branded(Arc::new(ForeignTuple)));
    assert!(is_tuple(&foreign));
    // Recognised, but its storage is not ours to read.
    assert_eq!(Tuple::from_value(&foreign), None);
}

#[test]
fn test_tuples_as_map_keys() {
    let interner = Interner::new();
    let mut scores = HashMap::new();
    scores.insert(tuple_of(&interner, &[0, 0]), "origin");
    scores.insert(tuple_of(&interner, &[1, 0]), "east");

    assert_eq!(scores.get(&tuple_of(&interner, &[0, 0])), Some(&"origin"));
    assert_eq!(scores.get(&tuple_of(&interner, &[0, 1])), None);
}

#[test]
fn test_debug_format() {
    let interner = Interner::new();
    let t = interner.intern([Value::from(1), Value::from("a"), Value::Null]);
    assert_eq!(format!("{:?}", t), "#[1, \"a\", null]");
    let nested = interner.intern([t.to_value()]);
    assert_eq!(nested.to_string(), "#[#[1, \"a\", null]]");
}

#[test]
fn test_collect_into_global_pool() {
    let t: Tuple = nums(&[5, 5]).into_iter().collect();
    assert!(Interner::global().owns(&t));
    assert_eq!(t, crate::intern(nums(&[5, 5])));
}
