use super::*;
use crate::value::Symbol;

fn small_config() -> InternerConfig {
    InternerConfig {
        min_sweep_len: 4,
        sweep_growth_factor: 2,
    }
}

#[test]
fn test_backing_maps_allocated_lazily() {
    let mut map: HybridMap<u32> = HybridMap::new();
    assert_eq!(map.is_allocated(), (false, false));
    assert!(map.get(&Value::from(1)).is_none());
    assert!(map.get(&Value::from(Object::new(()))).is_none());

    map.set(&Value::from(1), 10);
    assert_eq!(map.is_allocated(), (false, true));

    let key = Object::new(());
    map.set(&Value::from(key), 20);
    assert_eq!(map.is_allocated(), (true, true));
}

#[test]
fn test_set_returns_inserted_value() {
    let mut map = HybridMap::new();
    assert_eq!(*map.set(&Value::from("a"), 1), 1);
    assert_eq!(*map.set(&Value::from("a"), 2), 2);
    assert_eq!(map.get(&Value::from("a")), Some(&2));
    assert_eq!(map.len(), 1);
}

#[test]
fn test_primitive_keys_by_value() {
    let mut map = HybridMap::new();
    map.set(&Value::from(0.0), "zero");
    map.set(&Value::from(f64::NAN), "nan");
    map.set(&Value::Int(1), "int");

    assert_eq!(map.get(&Value::from(-0.0)), Some(&"zero"));
    assert_eq!(map.get(&Value::from(f64::NAN)), Some(&"nan"));
    assert_eq!(map.get(&Value::from(1.0)), None);
    assert_eq!(map.get(&Value::Int(1)), Some(&"int"));

    let sym = Symbol::new("s");
    map.set(&Value::from(sym.clone()), "sym");
    assert_eq!(map.get(&Value::from(sym)), Some(&"sym"));
    assert_eq!(map.get(&Value::from(Symbol::new("s"))), None);
}

#[test]
fn test_object_keys_by_identity() {
    let mut map = HybridMap::new();
    let a = Object::new("k");
    let b = Object::new("k");
    map.set(&Value::from(a.clone()), 1);

    assert_eq!(map.get(&Value::from(a.clone())), Some(&1));
    assert_eq!(map.get(&Value::from(b)), None);
    assert_eq!(map.weak_len(), 1);
    assert_eq!(map.strong_len(), 0);
}

#[test]
fn test_object_key_held_weakly() {
    let mut map = HybridMap::new();
    let key = Object::new(5u64);
    map.set(&Value::from(key.clone()), "v");
    assert_eq!(key.strong_count(), 1);

    drop(key);
    assert_eq!(map.weak_len(), 1);
    assert_eq!(map.dead_len(), 1);
    assert_eq!(map.live_values().count(), 0);
    assert_eq!(map.all_values().count(), 1);

    assert_eq!(map.sweep(), 1);
    assert_eq!(map.weak_len(), 0);
}

#[test]
fn test_sweep_drops_values() {
    let mut map = HybridMap::new();
    let value = std::sync::Arc::new(());
    let key = Object::new(());
    map.set(&Value::from(key.clone()), std::sync::Arc::clone(&value));
    assert_eq!(std::sync::Arc::strong_count(&value), 2);

    drop(key);
    map.sweep();
    assert_eq!(std::sync::Arc::strong_count(&value), 1);
}

#[test]
fn test_insert_sweeps_at_threshold() {
    let mut map = HybridMap::with_config(small_config());
    for i in 0..1000 {
        let key = Object::new(i);
        map.set(&Value::from(key), i);
        assert!(
            map.weak_len() <= 4,
            "weak map grew to {} entries with no live keys",
            map.weak_len()
        );
    }
}

#[test]
fn test_threshold_grows_with_live_entries() {
    let mut map = HybridMap::with_config(small_config());
    let live: Vec<Object> = (0..10).map(Object::new).collect();
    for key in &live {
        map.set(&Value::from(key.clone()), ());
    }
    assert_eq!(map.weak_len(), 10);

    for i in 0..100 {
        map.set(&Value::from(Object::new(i)), ());
    }
    // Live entries survive every sweep; dead ones stay bounded by the live count.
    assert!(live.iter().all(|key| map.get(&Value::from(key.clone())).is_some()));
    assert!(map.weak_len() <= 2 * live.len());
}

#[test]
fn test_sweep_leaves_strong_entries() {
    let mut map = HybridMap::new();
    map.set(&Value::from("kept"), 1);
    map.set(&Value::from(Object::new(())), 2);
    assert_eq!(map.sweep(), 1);
    assert_eq!(map.strong_len(), 1);
    assert_eq!(map.get(&Value::from("kept")), Some(&1));
}

#[test]
fn test_drain_values_empties_both_maps() {
    let mut map = HybridMap::new();
    let key = Object::new(());
    map.set(&Value::from(key.clone()), 1);
    map.set(&Value::from("s"), 2);

    let mut drained: Vec<i32> = map.drain_values().collect();
    drained.sort_unstable();
    assert_eq!(drained, vec![1, 2]);
    assert!(map.is_empty());
    assert_eq!(map.is_allocated(), (false, false));
}
