//! Tests for eviction policies

use super::*;
use crate::core::Index;
use crate::entry::Ttl;
use std::time::SystemTime;

fn index_with(keys: &[(&str, u64)]) -> Index {
    let index = Index::new();
    for (key, size) in keys {
        index.insert(key.to_string(), *size, Ttl::Default, SystemTime::now());
    }
    index
}

#[test]
fn test_oldest_first_order() {
    let policy = OldestFirstPolicy;
    let index = index_with(&[("a", 100), ("b", 200), ("c", 300)]);

    // Reads never change eviction order
    let _ = index.lookup("a");

    let before = index.next_sequence();
    assert_eq!(policy.next_eviction(&index, before).unwrap().key, "a");
    assert_eq!(policy.next_eviction(&index, before).unwrap().key, "b");
    assert_eq!(index.len(), 1);
}

#[test]
fn test_oldest_first_skips_entries_newer_than_sweep() {
    let policy = OldestFirstPolicy;
    let index = index_with(&[("a", 1)]);
    let before = index.next_sequence();
    index.insert("late".to_string(), 1, Ttl::Default, SystemTime::now());

    assert_eq!(policy.next_eviction(&index, before).unwrap().key, "a");
    assert!(policy.next_eviction(&index, before).is_none());
    assert!(index.contains("late"));
}

#[test]
fn test_factory() {
    assert!(create_eviction_policy(EvictionPolicyKind::None).is_none());
    let policy = create_eviction_policy(EvictionPolicyKind::OldestFirst).unwrap();
    assert_eq!(policy.name(), "oldest-first");
}

#[test]
fn test_kind_parsing() {
    assert_eq!(
        "oldest-first".parse::<EvictionPolicyKind>().unwrap(),
        EvictionPolicyKind::OldestFirst
    );
    assert_eq!(
        "None".parse::<EvictionPolicyKind>().unwrap(),
        EvictionPolicyKind::None
    );
    let err = "lru".parse::<EvictionPolicyKind>().unwrap_err();
    assert!(err.to_string().contains("Unknown eviction policy: lru"));
    assert_eq!(EvictionPolicyKind::OldestFirst.to_string(), "oldest-first");
}
