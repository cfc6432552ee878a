//! Merkle tree over entitlement leaves
//!
//! Sorted-pair SHA-256: a parent is the hash of its children concatenated
//! in byte order, so inclusion proofs carry no left/right indices. Odd
//! layers are padded with the zero hash. The builders exist for tests and
//! tooling; production roots are computed off-chain and only *verified*
//! here.

use sha2::{Digest, Sha256};

/// A tree node or leaf hash.
pub type Hash = [u8; 32];

/// The padding value for odd layers.
pub const EMPTY_HASH: Hash = [0u8; 32];

/// Compute a SHA-256 hash of arbitrary data.
pub fn compute_hash(data: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Hash a sibling pair, lower byte order first.
fn pair_hash(a: &Hash, b: &Hash) -> Hash {
    let mut hasher = Sha256::new();
    if a <= b {
        hasher.update(a);
        hasher.update(b);
    } else {
        hasher.update(b);
        hasher.update(a);
    }
    hasher.finalize().into()
}

/// Hash each adjacent pair to form the next layer up.
fn one_level_up(layer: &[Hash]) -> Vec<Hash> {
    let mut result = Vec::with_capacity(layer.len().div_ceil(2));
    for pair in layer.chunks(2) {
        let right = pair.get(1).unwrap_or(&EMPTY_HASH);
        result.push(pair_hash(&pair[0], right));
    }
    result
}

/// Compute the root of a leaf set. An empty set roots to the zero hash.
pub fn root(leaves: &[Hash]) -> Hash {
    if leaves.is_empty() {
        return EMPTY_HASH;
    }
    let mut layer = leaves.to_vec();
    while layer.len() > 1 {
        layer = one_level_up(&layer);
    }
    layer[0]
}

/// Build the inclusion proof for `leaves[index]`: the sibling hash at each
/// layer from bottom to top.
pub fn proof(leaves: &[Hash], index: usize) -> Vec<Hash> {
    let mut path = Vec::new();
    let mut layer = leaves.to_vec();
    let mut n = index;

    while layer.len() > 1 {
        let sibling = if n % 2 == 1 { n - 1 } else { n + 1 };
        path.push(*layer.get(sibling).unwrap_or(&EMPTY_HASH));
        n /= 2;
        layer = one_level_up(&layer);
    }

    path
}

/// Verify that `leaf` is included under `root_hash` via `proof`.
pub fn verify(root_hash: &Hash, leaf: &Hash, proof: &[Hash]) -> bool {
    let mut acc = *leaf;
    for sibling in proof {
        acc = pair_hash(&acc, sibling);
    }
    acc == *root_hash
}
