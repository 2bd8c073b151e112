//! Constitutional properties read directly off the graph.

use crate::molecule::{BondOrder, Molecule};
use crate::ring;

/// Counts and sums that several descriptor layers share.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstitutionalProperties {
    pub molecular_weight: f64,
    pub heavy_atom_count: usize,
    pub rotatable_bonds: usize,
    pub ring_count: usize,
    pub aromatic_ring_count: usize,
}

/// Compute the shared constitutional properties in one pass.
pub fn compute_properties(mol: &Molecule) -> ConstitutionalProperties {
    let rings = ring::find_rings(mol);
    let aromatic_ring_count = rings
        .iter()
        .filter(|r| r.iter().all(|&i| mol.atoms[i].is_aromatic))
        .count();

    ConstitutionalProperties {
        molecular_weight: mol.molecular_weight(),
        heavy_atom_count: mol.heavy_atom_count(),
        rotatable_bonds: rotatable_bond_count(mol),
        ring_count: rings.len(),
        aromatic_ring_count,
    }
}

/// Hydrogen-bond donor count: N or O atoms carrying at least one hydrogen.
pub fn hbd_count(mol: &Molecule) -> usize {
    mol.atoms
        .iter()
        .enumerate()
        .filter(|(i, a)| {
            matches!(a.atomic_number, 7 | 8)
                && (a.implicit_hydrogens > 0 || bonded_to_explicit_h(mol, *i))
        })
        .count()
}

/// Hydrogen-bond acceptor count: all N and O atoms, excluding positively
/// charged ones and pyrrole-type aromatic nitrogens whose lone pair sits in
/// the ring system.
pub fn hba_count(mol: &Molecule) -> usize {
    mol.atoms
        .iter()
        .filter(|a| {
            matches!(a.atomic_number, 7 | 8)
                && a.formal_charge <= 0
                && !(a.atomic_number == 7 && a.is_aromatic && a.implicit_hydrogens > 0)
        })
        .count()
}

/// Rotatable bonds: acyclic single bonds between two non-terminal heavy
/// atoms, excluding amide C-N bonds.
pub fn rotatable_bond_count(mol: &Molecule) -> usize {
    let ring_bonds = ring::ring_bond_membership(mol);
    mol.bonds
        .iter()
        .enumerate()
        .filter(|(bi, bond)| {
            if bond.order != BondOrder::Single || ring_bonds[*bi] {
                return false;
            }
            let (a1, a2) = (bond.atom1, bond.atom2);
            if mol.degree(a1) < 2 || mol.degree(a2) < 2 {
                return false;
            }
            if mol.atoms[a1].atomic_number == 1 || mol.atoms[a2].atomic_number == 1 {
                return false;
            }
            !is_amide_bond(mol, a1, a2)
        })
        .count()
}

fn is_amide_bond(mol: &Molecule, a1: usize, a2: usize) -> bool {
    let check = |carbon: usize, nitrogen: usize| {
        mol.atoms[carbon].atomic_number == 6
            && mol.atoms[nitrogen].atomic_number == 7
            && mol.adjacency[carbon].iter().any(|&(n, bi)| {
                mol.atoms[n].atomic_number == 8 && mol.bonds[bi].order == BondOrder::Double
            })
    };
    check(a1, a2) || check(a2, a1)
}

fn bonded_to_explicit_h(mol: &Molecule, atom_idx: usize) -> bool {
    mol.adjacency[atom_idx]
        .iter()
        .any(|&(n, _)| mol.atoms[n].atomic_number == 1)
}
