use super::*;
use crate::value::Object;

fn node() -> Arc<TrieNode> {
    Arc::new(TrieNode::new(InternerConfig::default()))
}

fn build(root: &Arc<TrieNode>, items: &[Value]) -> Tuple {
    Tuple::new_in(root, items.into())
}

#[test]
fn test_child_created_once_per_edge() {
    let root = node();
    let a = root.child(&Value::from(1));
    let b = root.child(&Value::from(1));
    let c = root.child(&Value::from(2));

    assert!(Arc::ptr_eq(&a, &b));
    assert!(!Arc::ptr_eq(&a, &c));
    assert_eq!(root.stats().nodes, 3);
}

#[test]
fn test_payload_built_once() {
    let root = node();
    let mut builds = 0;
    let first = root.payload_or_insert_with(|| {
        builds += 1;
        build(&root, &[])
    });
    let second = root.payload_or_insert_with(|| {
        builds += 1;
        build(&root, &[])
    });

    assert_eq!(builds, 1);
    assert!(first.ptr_eq(&second));
}

#[test]
fn test_primitive_payload_held_strongly() {
    let root = node();
    let leaf = root.child(&Value::from("x"));
    let weak = {
        let tuple = leaf.payload_or_insert_with(|| build(&root, &[Value::from("x")]));
        tuple.downgrade()
    };

    assert_eq!(root.stats().tuples, 1);
    let cached = weak.upgrade().map(Tuple::from_data).expect("node keeps the tuple alive");
    let again = leaf.payload_or_insert_with(|| panic!("tuple should still be cached"));
    assert!(again.ptr_eq(&cached));
}

#[test]
fn test_object_payload_held_weakly() {
    let root = node();
    let key = Object::new(());
    let items = [Value::from(key.clone())];
    let leaf = root.child(&items[0]);

    let tuple = leaf.payload_or_insert_with(|| build(&root, &items));
    assert_eq!(root.stats().tuples, 1);

    drop(tuple);
    assert_eq!(root.stats().tuples, 0);

    // The key is still alive, so the entry is too; a new tuple gets built.
    let mut rebuilt = false;
    leaf.payload_or_insert_with(|| {
        rebuilt = true;
        build(&root, &items)
    });
    assert!(rebuilt);
}

#[test]
fn test_sweep_recursive_reclaims_nested_entries() {
    let root = node();
    let outer = root.child(&Value::from("prefix"));
    {
        let key = Object::new(1);
        outer.child(&Value::from(key));
    }
    let live = Object::new(2);
    outer.child(&Value::from(live.clone()));

    let before = root.stats();
    assert_eq!(before.nodes, 4);
    assert_eq!(before.weak_entries, 2);
    assert_eq!(before.dead_entries, 1);

    assert_eq!(root.sweep_recursive(), 1);

    let after = root.stats();
    assert_eq!(after.nodes, 3);
    assert_eq!(after.weak_entries, 1);
    assert_eq!(after.dead_entries, 0);
    assert_eq!(after.strong_entries, 1);
}

#[test]
fn test_stats_on_fresh_node() {
    assert_eq!(
        node().stats(),
        TrieStats {
            nodes: 1,
            ..TrieStats::default()
        }
    );
}

#[test]
fn test_drop_frees_long_path_iteratively() {
    let root = node();
    let mut tail = Arc::clone(&root);
    let mut middle = None;
    for i in 0..100_000 {
        tail = tail.child(&Value::Int(i));
        if i == 50_000 {
            middle = Some(Arc::clone(&tail));
        }
    }
    drop(tail);
    drop(root);

    // A node still held elsewhere keeps its own subtree.
    let middle = middle.expect("middle node held");
    assert_eq!(middle.stats().nodes, 50_000);
    drop(middle);
}
