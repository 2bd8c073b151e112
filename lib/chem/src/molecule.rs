//! Molecular graph representation.
//!
//! A [`Molecule`] is the canonical internal handle for a parsed structure:
//! atoms, bonds, and a prebuilt adjacency list. It is immutable once
//! constructed; every descriptor and fingerprint is a pure function of it.

use serde::{Deserialize, Serialize};

use crate::element::atomic_weight;

/// Tetrahedral chirality marker on an atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Chirality {
    #[default]
    None,
    /// `@` in SMILES.
    CounterClockwise,
    /// `@@` in SMILES.
    Clockwise,
}

/// Cis/trans direction marker on a single bond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BondStereo {
    #[default]
    None,
    /// `/` in SMILES.
    Up,
    /// `\` in SMILES.
    Down,
}

/// Bond order classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Aromatic,
}

impl BondOrder {
    /// Numeric order for valence arithmetic. Aromatic counts as 1.5.
    pub fn as_f64(self) -> f64 {
        match self {
            BondOrder::Single => 1.0,
            BondOrder::Double => 2.0,
            BondOrder::Triple => 3.0,
            BondOrder::Aromatic => 1.5,
        }
    }
}

/// An atom in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Atom {
    pub atomic_number: u8,
    pub formal_charge: i8,
    pub isotope: Option<u16>,
    pub is_aromatic: bool,
    pub implicit_hydrogens: u8,
    pub chirality: Chirality,
}

/// A bond between two atoms, stored once per pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bond {
    pub atom1: usize,
    pub atom2: usize,
    pub order: BondOrder,
    pub stereo: BondStereo,
}

/// The parsed molecular graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Molecule {
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
    /// adjacency[atom] = (neighbor atom index, bond index)
    pub adjacency: Vec<Vec<(usize, usize)>>,
}

impl Molecule {
    /// Build a molecule from atoms and bonds, constructing the adjacency list.
    pub fn new(atoms: Vec<Atom>, bonds: Vec<Bond>) -> Self {
        let mut adjacency = vec![Vec::new(); atoms.len()];
        for (bi, bond) in bonds.iter().enumerate() {
            adjacency[bond.atom1].push((bond.atom2, bi));
            adjacency[bond.atom2].push((bond.atom1, bi));
        }
        Molecule {
            atoms,
            bonds,
            adjacency,
        }
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    #[inline]
    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    /// Graph degree of an atom (explicit bonds only).
    #[inline]
    pub fn degree(&self, atom_idx: usize) -> usize {
        self.adjacency[atom_idx].len()
    }

    /// Number of non-hydrogen atoms in the graph.
    pub fn heavy_atom_count(&self) -> usize {
        self.atoms.iter().filter(|a| a.atomic_number != 1).count()
    }

    /// The bond between two atoms, if they are bonded.
    pub fn bond_between(&self, a1: usize, a2: usize) -> Option<&Bond> {
        self.adjacency[a1]
            .iter()
            .find(|&&(n, _)| n == a2)
            .map(|&(_, bi)| &self.bonds[bi])
    }

    /// Sum of bond orders around an atom, aromatic bonds counting 1.5.
    pub fn bond_order_sum(&self, atom_idx: usize) -> f64 {
        self.adjacency[atom_idx]
            .iter()
            .map(|&(_, bi)| self.bonds[bi].order.as_f64())
            .sum()
    }

    /// Whether the atom participates in any double or triple bond.
    pub fn has_multiple_bond(&self, atom_idx: usize) -> bool {
        self.adjacency[atom_idx].iter().any(|&(_, bi)| {
            matches!(self.bonds[bi].order, BondOrder::Double | BondOrder::Triple)
        })
    }

    /// Molecular weight including implicit hydrogens.
    pub fn molecular_weight(&self) -> f64 {
        let heavy: f64 = self
            .atoms
            .iter()
            .map(|a| {
                // Isotope label overrides the standard weight if present.
                match a.isotope {
                    Some(iso) => iso as f64,
                    None => atomic_weight(a.atomic_number),
                }
            })
            .sum();
        let implicit_h: f64 = self
            .atoms
            .iter()
            .map(|a| a.implicit_hydrogens as f64 * atomic_weight(1))
            .sum();
        heavy + implicit_h
    }

    /// Total hydrogen count: explicit H atoms plus implicit hydrogens.
    pub fn total_hydrogen_count(&self) -> usize {
        let explicit = self.atoms.iter().filter(|a| a.atomic_number == 1).count();
        let implicit: usize = self
            .atoms
            .iter()
            .map(|a| a.implicit_hydrogens as usize)
            .sum();
        explicit + implicit
    }
}
