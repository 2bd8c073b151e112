//! MACCS-style 166-key structural fingerprints.
//!
//! Each bit position corresponds to a fixed structural feature: element
//! presence, ring topology, bonded-pair patterns, functional-group
//! neighborhoods, and count thresholds. Keys are evaluated directly from
//! the molecular graph; keys that would need full SMARTS matching are left
//! unset. The bit length is fixed at 166 so vectors from any molecule are
//! directly comparable.

use crate::fingerprint::Fingerprint;
use crate::molecule::{BondOrder, Molecule};
use crate::ring;

/// Number of keys in the dictionary.
pub const MACCS_NBITS: usize = 166;

const C: u8 = 6;
const N: u8 = 7;
const O: u8 = 8;
const F: u8 = 9;
const SI: u8 = 14;
const P: u8 = 15;
const S: u8 = 16;
const CL: u8 = 17;
const BR: u8 = 35;
const I: u8 = 53;

/// Compute the MACCS-style 166-key fingerprint.
pub fn maccs_fingerprint(mol: &Molecule) -> Fingerprint {
    let mut fp = Fingerprint::new(MACCS_NBITS);
    if mol.atom_count() == 0 {
        return fp;
    }

    let rings = ring::find_rings(mol);
    let in_ring = ring::ring_membership(mol);

    let mut element_counts = [0u32; 120];
    for atom in &mol.atoms {
        element_counts[atom.atomic_number as usize] += 1;
    }
    let count = |z: u8| element_counts[z as usize];

    // Heteroatoms bonded to each other / separated by one carbon.
    let hetero = |z: u8| z != C && z != 1;

    let bonded_pair = |z1: u8, z2: u8, order: Option<BondOrder>| -> bool {
        mol.bonds.iter().any(|b| {
            let (a, c) = (
                mol.atoms[b.atom1].atomic_number,
                mol.atoms[b.atom2].atomic_number,
            );
            let elements = (a == z1 && c == z2) || (a == z2 && c == z1);
            elements && order.map_or(true, |o| b.order == o)
        })
    };

    // Atom of element `z` whose neighborhood satisfies `pred`.
    let atom_where = |z: u8, pred: &dyn Fn(usize) -> bool| -> bool {
        mol.atoms
            .iter()
            .enumerate()
            .any(|(i, a)| a.atomic_number == z && pred(i))
    };

    let neighbor_count = |i: usize, z: u8| -> usize {
        mol.adjacency[i]
            .iter()
            .filter(|&&(n, _)| mol.atoms[n].atomic_number == z)
            .count()
    };

    let has_double_to = |i: usize, z: u8| -> bool {
        mol.adjacency[i].iter().any(|&(n, bi)| {
            mol.atoms[n].atomic_number == z && mol.bonds[bi].order == BondOrder::Double
        })
    };

    // -- Element presence and isotopes (keys 1..48, subset) ----------------

    if mol.atoms.iter().any(|a| a.isotope.is_some()) {
        fp.set_bit(1); // key 2: isotope
    }
    if count(P) > 0 {
        fp.set_bit(28); // key 29: phosphorus
    }
    if count(SI) > 0 {
        fp.set_bit(13); // key 14: silicon
    }
    if count(F) + count(CL) + count(BR) + count(I) > 0 {
        fp.set_bit(133); // key 134: halogen
    }
    if count(CL) > 0 {
        fp.set_bit(102); // key 103: chlorine
    }
    if count(BR) > 0 {
        fp.set_bit(45); // key 46: bromine
    }
    if count(I) > 0 {
        fp.set_bit(34); // key 35: iodine
    }
    if count(S) > 0 {
        fp.set_bit(87); // key 88: sulfur
    }
    if count(N) > 0 {
        fp.set_bit(160); // key 161: nitrogen
    }
    if count(O) > 0 {
        fp.set_bit(163); // key 164: oxygen
    }

    // -- Charge ------------------------------------------------------------

    if mol.atoms.iter().any(|a| a.formal_charge != 0) {
        fp.set_bit(41); // key 42: charged atom
    }
    if mol.atoms.iter().any(|a| a.formal_charge < 0) {
        fp.set_bit(42);
    }
    if mol.atoms.iter().any(|a| a.formal_charge > 0) {
        fp.set_bit(43);
    }

    // -- Ring topology -----------------------------------------------------

    if !rings.is_empty() {
        fp.set_bit(162); // key 163: any ring
    }
    for ring in &rings {
        match ring.len() {
            3 => fp.set_bit(95),
            4 => fp.set_bit(96),
            5 => fp.set_bit(97),
            6 => fp.set_bit(100),
            7 => fp.set_bit(98),
            8 => fp.set_bit(99),
            _ => {}
        }
    }
    let aromatic_rings = rings
        .iter()
        .filter(|r| r.iter().all(|&i| mol.atoms[i].is_aromatic))
        .count();
    if aromatic_rings > 0 {
        fp.set_bit(161); // key 162: aromatic ring
    }
    if aromatic_rings > 1 {
        fp.set_bit(144); // key 145: more than one aromatic ring
    }
    if rings
        .iter()
        .any(|r| r.iter().any(|&i| hetero(mol.atoms[i].atomic_number)))
    {
        fp.set_bit(120); // key 121: heterocycle
    }
    if rings.iter().any(|r| {
        r.iter().all(|&i| mol.atoms[i].is_aromatic)
            && r.iter().any(|&i| mol.atoms[i].atomic_number == N)
    }) {
        fp.set_bit(64); // aromatic N heterocycle
    }
    if rings.len() > 1 {
        fp.set_bit(110); // multiple rings
    }
    // Fused pair: two rings sharing at least two atoms.
    let fused = rings.iter().enumerate().any(|(i, ri)| {
        rings[i + 1..]
            .iter()
            .any(|rj| ri.iter().filter(|a| rj.contains(a)).count() >= 2)
    });
    if fused {
        fp.set_bit(111);
    }

    // -- Bond patterns -----------------------------------------------------

    if mol.bonds.iter().any(|b| b.order == BondOrder::Triple) {
        fp.set_bit(105); // triple bond
    }
    if bonded_pair(C, N, Some(BondOrder::Triple)) {
        fp.set_bit(106); // nitrile
    }
    if mol.bonds.iter().any(|b| b.order == BondOrder::Double) {
        fp.set_bit(140);
    }
    if bonded_pair(C, O, Some(BondOrder::Double)) {
        fp.set_bit(153); // carbonyl
    }
    if bonded_pair(C, N, Some(BondOrder::Double)) {
        fp.set_bit(74); // imine
    }
    if bonded_pair(N, O, None) {
        fp.set_bit(65); // N-O
    }
    if bonded_pair(N, N, None) {
        fp.set_bit(67); // N-N
    }
    if bonded_pair(O, O, None) {
        fp.set_bit(70); // peroxide-like
    }
    if bonded_pair(S, S, None) {
        fp.set_bit(71); // disulfide
    }
    if bonded_pair(C, S, None) {
        fp.set_bit(88);
    }
    if bonded_pair(S, O, None) {
        fp.set_bit(89);
    }

    // -- Functional-group neighborhoods -------------------------------------

    // Carboxylic acid / ester carbon: C(=O)O
    if atom_where(C, &|i| has_double_to(i, O) && neighbor_count(i, O) >= 2) {
        fp.set_bit(116);
    }
    // Amide carbon: C(=O)N
    if atom_where(C, &|i| has_double_to(i, O) && neighbor_count(i, N) >= 1) {
        fp.set_bit(117);
    }
    // Sulfone/sulfonamide sulfur: S with two double-bonded O.
    if atom_where(S, &|i| {
        mol.adjacency[i]
            .iter()
            .filter(|&&(n, bi)| {
                mol.atoms[n].atomic_number == O && mol.bonds[bi].order == BondOrder::Double
            })
            .count()
            >= 2
    }) {
        fp.set_bit(118);
    }
    // Hydroxyl: O with one heavy neighbor and one hydrogen.
    if atom_where(O, &|i| {
        mol.degree(i) == 1 && mol.atoms[i].implicit_hydrogens >= 1
    }) {
        fp.set_bit(138);
    }
    // Ether: O with two heavy neighbors and no hydrogen.
    if atom_where(O, &|i| {
        mol.degree(i) == 2 && mol.atoms[i].implicit_hydrogens == 0 && !mol.atoms[i].is_aromatic
    }) {
        fp.set_bit(139);
    }
    // Primary amine: N with one heavy neighbor and two hydrogens.
    if atom_where(N, &|i| {
        mol.degree(i) == 1 && mol.atoms[i].implicit_hydrogens >= 2
    }) {
        fp.set_bit(141);
    }
    // Tertiary nitrogen.
    if atom_where(N, &|i| mol.degree(i) >= 3) {
        fp.set_bit(142);
    }
    // Quaternary / branched carbon.
    if atom_where(C, &|i| mol.degree(i) >= 4) {
        fp.set_bit(143);
    }
    // Hetero-C-hetero: carbon bonded to two heteroatoms.
    if atom_where(C, &|i| {
        mol.adjacency[i]
            .iter()
            .filter(|&&(n, _)| hetero(mol.atoms[n].atomic_number))
            .count()
            >= 2
    }) {
        fp.set_bit(121);
    }
    // Methyl group: terminal carbon with three hydrogens.
    if atom_where(C, &|i| {
        mol.degree(i) == 1 && mol.atoms[i].implicit_hydrogens == 3
    }) {
        fp.set_bit(149);
    }
    // Ring atom bearing a substituent outside the ring.
    if mol.atoms.iter().enumerate().any(|(i, _)| {
        in_ring[i]
            && mol.adjacency[i]
                .iter()
                .any(|&(n, _)| !in_ring[n] && mol.atoms[n].atomic_number != 1)
    }) {
        fp.set_bit(125);
    }

    // -- Count thresholds ---------------------------------------------------

    if count(O) > 2 {
        fp.set_bit(145);
    }
    if count(O) > 3 {
        fp.set_bit(146);
    }
    if count(N) > 1 {
        fp.set_bit(147);
    }
    if mol.heavy_atom_count() > 15 {
        fp.set_bit(148);
    }
    if mol.bond_count() >= mol.atom_count() {
        // Cyclomatic shortcut: at least one ring per component.
        fp.set_bit(150);
    }
    if mol.total_hydrogen_count() > 0 {
        fp.set_bit(164); // key 165
    }
    if mol.atom_count() > 1 {
        fp.set_bit(165); // key 166: more than one atom
    }

    fp
}
