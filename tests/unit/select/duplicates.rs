use super::*;

#[test]
fn fingerprint_is_deterministic() {
    assert_eq!(
        fingerprint_snapshot(&[1, 2, 3]),
        fingerprint_snapshot(&[1, 2, 3])
    );
}

#[test]
fn fingerprint_changes_with_bytes_and_length() {
    let base = fingerprint_snapshot(&[1, 2, 3]);
    assert_ne!(base, fingerprint_snapshot(&[1, 2, 4]));
    assert_ne!(base, fingerprint_snapshot(&[1, 2, 3, 0]));
}

#[test]
fn index_rejects_exact_repeats_only() {
    let mut idx = DuplicateIndex::new();

    assert!(idx.insert(vec![9, 9]));
    assert!(!idx.insert(vec![9, 9]));
    assert!(idx.insert(vec![9, 8]));
    assert!(idx.insert(vec![9, 9, 9, 9]));
    assert_eq!(idx.len(), 3);
}

#[test]
fn empty_snapshots_match_each_other() {
    let mut idx = DuplicateIndex::new();
    assert!(idx.insert(Vec::new()));
    assert!(!idx.insert(Vec::new()));
}
