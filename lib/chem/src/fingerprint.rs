//! Structural fingerprints.
//!
//! [`Fingerprint`] is a fixed-length bit vector backed by u64 words, so
//! similarity kernels can run on word-wide popcounts. [`morgan_fingerprint`]
//! produces the circular (ECFP-style) encoding used as the primary
//! structural feature space.

use serde::{Deserialize, Serialize};

use crate::molecule::Molecule;
use crate::ring;

/// Default Morgan fingerprint length in bits.
pub const MORGAN_NBITS: usize = 2048;
/// Default Morgan neighborhood radius (2 = ECFP4).
pub const MORGAN_RADIUS: usize = 2;

/// A fixed-length bit vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {
    words: Vec<u64>,
    nbits: usize,
}

impl Fingerprint {
    /// Create an all-zero fingerprint of `nbits` bits.
    pub fn new(nbits: usize) -> Self {
        Fingerprint {
            words: vec![0u64; nbits.div_ceil(64)],
            nbits,
        }
    }

    #[inline]
    pub fn set_bit(&mut self, pos: usize) {
        let pos = pos % self.nbits;
        self.words[pos / 64] |= 1u64 << (pos % 64);
    }

    #[inline]
    pub fn get_bit(&self, pos: usize) -> bool {
        let pos = pos % self.nbits;
        (self.words[pos / 64] >> (pos % 64)) & 1 == 1
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> u32 {
        self.words.iter().map(|w| w.count_ones()).sum()
    }

    #[inline]
    pub fn nbits(&self) -> usize {
        self.nbits
    }

    #[inline]
    pub fn words(&self) -> &[u64] {
        &self.words
    }
}

/// Compute a Morgan (circular, ECFP-style) fingerprint.
///
/// Atom environments are hashed with FNV-1a from local invariants, then
/// iteratively extended by `radius` shells of sorted neighbor identifiers,
/// and folded into `nbits` positions. Identical molecule, identical vector.
pub fn morgan_fingerprint(mol: &Molecule, radius: usize, nbits: usize) -> Fingerprint {
    let n = mol.atom_count();
    let mut fp = Fingerprint::new(nbits);
    if n == 0 {
        return fp;
    }

    let in_ring = ring::ring_membership(mol);

    // Initial invariants per atom.
    let mut identifiers: Vec<u64> = (0..n)
        .map(|i| {
            let atom = &mol.atoms[i];
            let mut h = fnv1a_init();
            h = fnv1a_update(h, atom.atomic_number as u64);
            h = fnv1a_update(h, mol.degree(i) as u64);
            h = fnv1a_update(h, atom.implicit_hydrogens as u64);
            h = fnv1a_update(h, atom.formal_charge as u64);
            h = fnv1a_update(h, atom.is_aromatic as u64);
            h = fnv1a_update(h, in_ring[i] as u64);
            h
        })
        .collect();

    for &id in &identifiers {
        fp.set_bit((id % nbits as u64) as usize);
    }

    for _ in 0..radius {
        let mut next = Vec::with_capacity(n);
        for i in 0..n {
            let mut h = fnv1a_init();
            h = fnv1a_update(h, identifiers[i]);

            // Neighbor identifiers sorted so the hash is order-independent.
            let mut neighbor_ids: Vec<(u64, u8)> = mol.adjacency[i]
                .iter()
                .map(|&(neighbor, bi)| (identifiers[neighbor], mol.bonds[bi].order as u8))
                .collect();
            neighbor_ids.sort_unstable();

            for (nid, order) in &neighbor_ids {
                h = fnv1a_update(h, *nid);
                h = fnv1a_update(h, *order as u64);
            }

            next.push(h);
            fp.set_bit((h % nbits as u64) as usize);
        }
        identifiers = next;
    }

    fp
}

/// Morgan fingerprint with the default radius and length.
pub fn morgan_fingerprint_default(mol: &Molecule) -> Fingerprint {
    morgan_fingerprint(mol, MORGAN_RADIUS, MORGAN_NBITS)
}

const FNV_OFFSET: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

#[inline]
fn fnv1a_init() -> u64 {
    FNV_OFFSET
}

#[inline]
fn fnv1a_update(hash: u64, value: u64) -> u64 {
    let mut h = hash;
    for b in value.to_le_bytes() {
        h ^= b as u64;
        h = h.wrapping_mul(FNV_PRIME);
    }
    h
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::parse_smiles;

    #[test]
    fn bit_operations() {
        let mut fp = Fingerprint::new(128);
        assert!(!fp.get_bit(42));
        fp.set_bit(42);
        assert!(fp.get_bit(42));
        fp.set_bit(100);
        assert_eq!(fp.count_ones(), 2);
    }

    #[test]
    fn encoding_is_deterministic() {
        let mol = parse_smiles("CC(=O)Oc1ccccc1C(=O)O").unwrap();
        let fp1 = morgan_fingerprint_default(&mol);
        let fp2 = morgan_fingerprint_default(&mol);
        assert_eq!(fp1, fp2);
    }

    #[test]
    fn different_molecules_differ() {
        let ethanol = parse_smiles("CCO").unwrap();
        let benzene = parse_smiles("c1ccccc1").unwrap();
        assert_ne!(
            morgan_fingerprint_default(&ethanol),
            morgan_fingerprint_default(&benzene)
        );
    }

    #[test]
    fn empty_molecule_gives_empty_fingerprint() {
        let mol = Molecule::new(Vec::new(), Vec::new());
        let fp = morgan_fingerprint_default(&mol);
        assert_eq!(fp.count_ones(), 0);
    }

    #[test]
    fn radius_grows_bit_count() {
        let mol = parse_smiles("CC(=O)Oc1ccccc1C(=O)O").unwrap();
        let r0 = morgan_fingerprint(&mol, 0, 2048).count_ones();
        let r2 = morgan_fingerprint(&mol, 2, 2048).count_ones();
        assert!(r2 > r0, "r0={r0} r2={r2}");
    }
}
