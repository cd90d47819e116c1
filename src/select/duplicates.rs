use std::collections::HashMap;

use smallvec::SmallVec;
use xxhash_rust::xxh3::Xxh3;

const XXH3_SEED: u64 = 0x8b5ad4a0c7d8e9f1;

/// 128-bit fingerprint of a frame's cropped pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct FrameFingerprint {
    pub(crate) hi: u64,
    pub(crate) lo: u64,
}

/// Only the bytes are hashed. The same sprite at another position has the same fingerprint.
pub(crate) fn fingerprint_snapshot(pixels: &[u8]) -> FrameFingerprint {
    let mut h = StableHasher::new();
    h.write_u64(pixels.len() as u64);
    h.write_bytes(pixels);
    h.finish()
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn finish(self) -> FrameFingerprint {
        let v = self.inner.digest128();
        FrameFingerprint {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

/// Snapshots of retained frames, looked up by fingerprint.
///
/// A fingerprint hit is only a candidate; equality is confirmed against the stored bytes, so a
/// hash collision can never make two different frames count as duplicates.
#[derive(Default)]
pub(crate) struct DuplicateIndex {
    snapshots: Vec<Vec<u8>>,
    buckets: HashMap<FrameFingerprint, SmallVec<[usize; 1]>>,
}

impl DuplicateIndex {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Record the snapshot unless an identical one is already stored.
    ///
    /// Returns `false` for a duplicate.
    pub(crate) fn insert(&mut self, pixels: Vec<u8>) -> bool {
        let fp = fingerprint_snapshot(&pixels);
        let bucket = self.buckets.entry(fp).or_default();
        if bucket.iter().any(|&i| self.snapshots[i] == pixels) {
            return false;
        }
        bucket.push(self.snapshots.len());
        self.snapshots.push(pixels);
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/select/duplicates.rs"]
mod tests;
