//! SMILES parsing into the molecular graph.
//!
//! Supports the organic subset (bare `B C N O P S F Cl Br I`), aromatic
//! lowercase atoms, bracket atoms with isotope/chirality/H-count/charge,
//! branches, bond symbols (`- = # : / \`), ring closures including `%nn`,
//! and dot-separated fragments. Implicit hydrogens are assigned from
//! standard valences after the graph is built.
//!
//! Malformed input returns a typed [`ChemError`]; parsing never panics, so
//! one bad row can be recorded and skipped by batch callers.

use crate::element::{atomic_number, default_valences, in_organic_subset};
use crate::error::{ChemError, Result};
use crate::molecule::{Atom, Bond, BondOrder, BondStereo, Chirality, Molecule};

/// A bond waiting for its second atom: explicit order and stereo, if any.
#[derive(Clone, Copy, Default)]
struct PendingBond {
    order: Option<BondOrder>,
    stereo: BondStereo,
}

/// An open ring closure: the atom that opened it plus any bond annotation.
#[derive(Clone, Copy)]
struct RingOpening {
    atom: usize,
    bond: PendingBond,
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    /// Atom waiting to be bonded to the next atom parsed, `None` after `.`.
    prev_atom: Option<usize>,
    branch_stack: Vec<Option<usize>>,
    ring_openings: Vec<(u8, RingOpening)>,
    pending: PendingBond,
}

/// Parse a SMILES string into a [`Molecule`].
pub fn parse_smiles(input: &str) -> Result<Molecule> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ChemError::EmptyInput);
    }

    let mut parser = Parser {
        chars: trimmed.chars().collect(),
        pos: 0,
        atoms: Vec::new(),
        bonds: Vec::new(),
        prev_atom: None,
        branch_stack: Vec::new(),
        ring_openings: Vec::new(),
        pending: PendingBond::default(),
    };
    parser.run()?;

    if !parser.branch_stack.is_empty() {
        return Err(ChemError::UnbalancedParens("missing ')'"));
    }
    if let Some(&(digit, _)) = parser.ring_openings.first() {
        return Err(ChemError::UnmatchedRingClosure(digit));
    }

    let mut mol = Molecule::new(parser.atoms, parser.bonds);
    assign_implicit_hydrogens(&mut mol);
    Ok(mol)
}

impl Parser {
    fn run(&mut self) -> Result<()> {
        while self.pos < self.chars.len() {
            let ch = self.chars[self.pos];
            match ch {
                '(' => {
                    self.branch_stack.push(self.prev_atom);
                    self.pos += 1;
                }
                ')' => {
                    let restored = self
                        .branch_stack
                        .pop()
                        .ok_or(ChemError::UnbalancedParens("unexpected ')'"))?;
                    self.prev_atom = restored;
                    self.pos += 1;
                }
                '-' => {
                    self.set_pending(BondOrder::Single, BondStereo::None)?;
                }
                '=' => {
                    self.set_pending(BondOrder::Double, BondStereo::None)?;
                }
                '#' => {
                    self.set_pending(BondOrder::Triple, BondStereo::None)?;
                }
                ':' => {
                    self.set_pending(BondOrder::Aromatic, BondStereo::None)?;
                }
                '/' => {
                    self.set_pending(BondOrder::Single, BondStereo::Up)?;
                }
                '\\' => {
                    self.set_pending(BondOrder::Single, BondStereo::Down)?;
                }
                '.' => {
                    // Fragment separator: next atom starts unbonded.
                    self.prev_atom = None;
                    self.pending = PendingBond::default();
                    self.pos += 1;
                }
                '0'..='9' => {
                    let digit = ch as u8 - b'0';
                    self.pos += 1;
                    self.close_or_open_ring(digit)?;
                }
                '%' => {
                    let digit = self.parse_two_digit_ring()?;
                    self.close_or_open_ring(digit)?;
                }
                '[' => {
                    let atom = self.parse_bracket_atom()?;
                    self.add_atom(atom);
                }
                _ => {
                    let atom = self.parse_bare_atom()?;
                    self.add_atom(atom);
                }
            }
        }
        Ok(())
    }

    fn set_pending(&mut self, order: BondOrder, stereo: BondStereo) -> Result<()> {
        if self.prev_atom.is_none() && self.ring_openings.is_empty() {
            return Err(ChemError::DanglingBond(self.pos));
        }
        self.pending = PendingBond {
            order: Some(order),
            stereo,
        };
        self.pos += 1;
        Ok(())
    }

    fn parse_two_digit_ring(&mut self) -> Result<u8> {
        let start = self.pos;
        self.pos += 1; // consume '%'
        let mut value: u32 = 0;
        let mut digits = 0;
        while self.pos < self.chars.len() && digits < 2 {
            match self.chars[self.pos].to_digit(10) {
                Some(d) => {
                    value = value * 10 + d;
                    digits += 1;
                    self.pos += 1;
                }
                None => break,
            }
        }
        if digits != 2 {
            return Err(ChemError::UnexpectedChar {
                ch: '%',
                pos: start,
            });
        }
        Ok(value as u8)
    }

    fn close_or_open_ring(&mut self, digit: u8) -> Result<()> {
        let current = self.prev_atom.ok_or(ChemError::DanglingBond(self.pos))?;
        let annotation = std::mem::take(&mut self.pending);

        if let Some(idx) = self
            .ring_openings
            .iter()
            .position(|&(d, _)| d == digit)
        {
            let (_, opening) = self.ring_openings.remove(idx);
            // Either end may carry the bond annotation; an explicit one wins.
            let explicit = annotation.order.or(opening.bond.order);
            let order = explicit.unwrap_or_else(|| {
                self.default_order(opening.atom, current)
            });
            let stereo = if annotation.stereo != BondStereo::None {
                annotation.stereo
            } else {
                opening.bond.stereo
            };
            self.bonds.push(Bond {
                atom1: opening.atom,
                atom2: current,
                order,
                stereo,
            });
        } else {
            self.ring_openings.push((
                digit,
                RingOpening {
                    atom: current,
                    bond: annotation,
                },
            ));
        }
        Ok(())
    }

    /// Default order for an unannotated bond: aromatic between two aromatic
    /// atoms, single otherwise.
    fn default_order(&self, a: usize, b: usize) -> BondOrder {
        if self.atoms[a].is_aromatic && self.atoms[b].is_aromatic {
            BondOrder::Aromatic
        } else {
            BondOrder::Single
        }
    }

    fn add_atom(&mut self, atom: Atom) {
        let idx = self.atoms.len();
        self.atoms.push(atom);
        if let Some(prev) = self.prev_atom {
            let annotation = std::mem::take(&mut self.pending);
            let order = annotation
                .order
                .unwrap_or_else(|| self.default_order(prev, idx));
            self.bonds.push(Bond {
                atom1: prev,
                atom2: idx,
                order,
                stereo: annotation.stereo,
            });
        } else {
            self.pending = PendingBond::default();
        }
        self.prev_atom = Some(idx);
    }

    /// Bare atom outside brackets: organic subset or aromatic lowercase.
    fn parse_bare_atom(&mut self) -> Result<Atom> {
        let ch = self.chars[self.pos];
        let start = self.pos;

        // Aromatic lowercase atoms.
        if let Some(z) = match ch {
            'b' => Some(5),
            'c' => Some(6),
            'n' => Some(7),
            'o' => Some(8),
            'p' => Some(15),
            's' => Some(16),
            _ => None,
        } {
            self.pos += 1;
            return Ok(bare_atom(z, true));
        }

        if !ch.is_ascii_uppercase() {
            return Err(ChemError::UnexpectedChar { ch, pos: start });
        }

        // Try the two-letter symbol first (Cl, Br).
        if self.pos + 1 < self.chars.len() {
            let next = self.chars[self.pos + 1];
            if next.is_ascii_lowercase() {
                let symbol: String = [ch, next].iter().collect();
                if let Some(z) = atomic_number(&symbol) {
                    if in_organic_subset(z) {
                        self.pos += 2;
                        return Ok(bare_atom(z, false));
                    }
                }
            }
        }

        let symbol = ch.to_string();
        match atomic_number(&symbol) {
            Some(z) if in_organic_subset(z) => {
                self.pos += 1;
                Ok(bare_atom(z, false))
            }
            Some(_) | None => Err(ChemError::UnknownElement(
                self.chars[start..].iter().take(2).collect(),
            )),
        }
    }

    /// Bracket atom: `[isotope? symbol chirality? Hcount? charge? class?]`.
    fn parse_bracket_atom(&mut self) -> Result<Atom> {
        let open = self.pos;
        self.pos += 1; // consume '['

        let isotope = self.parse_number().map(|n| n as u16);

        // Element symbol: uppercase (+ optional lowercase), aromatic
        // lowercase single letter, or aromatic two-letter (se, as).
        let ch = *self
            .chars
            .get(self.pos)
            .ok_or(ChemError::UnclosedBracket(open))?;
        let (z, is_aromatic) = if ch.is_ascii_uppercase() {
            let mut symbol = ch.to_string();
            self.pos += 1;
            if let Some(&next) = self.chars.get(self.pos) {
                if next.is_ascii_lowercase() {
                    let candidate = format!("{symbol}{next}");
                    if atomic_number(&candidate).is_some() {
                        symbol = candidate;
                        self.pos += 1;
                    }
                }
            }
            let z = atomic_number(&symbol).ok_or(ChemError::UnknownElement(symbol))?;
            (z, false)
        } else if ch.is_ascii_lowercase() {
            // Aromatic: single letters plus se/as.
            let rest = &self.chars[self.pos..];
            let (z, consumed) = if rest.starts_with(&['s', 'e']) {
                (34, 2)
            } else if rest.starts_with(&['a', 's']) {
                (33, 2)
            } else {
                let z = match ch {
                    'b' => 5,
                    'c' => 6,
                    'n' => 7,
                    'o' => 8,
                    'p' => 15,
                    's' => 16,
                    _ => return Err(ChemError::UnknownElement(ch.to_string())),
                };
                (z, 1)
            };
            self.pos += consumed;
            (z, true)
        } else {
            return Err(ChemError::UnexpectedChar { ch, pos: self.pos });
        };

        let mut chirality = Chirality::None;
        let mut explicit_h: u8 = 0;
        let mut charge: i8 = 0;

        while let Some(&ch) = self.chars.get(self.pos) {
            match ch {
                '@' => {
                    self.pos += 1;
                    if self.chars.get(self.pos) == Some(&'@') {
                        self.pos += 1;
                        chirality = Chirality::Clockwise;
                    } else {
                        chirality = Chirality::CounterClockwise;
                    }
                }
                'H' => {
                    self.pos += 1;
                    explicit_h = self.parse_number().unwrap_or(1) as u8;
                }
                '+' => {
                    self.pos += 1;
                    charge = self.parse_signed_magnitude(1);
                }
                '-' => {
                    self.pos += 1;
                    charge = self.parse_signed_magnitude(-1);
                }
                ':' => {
                    // Atom class: parsed and discarded.
                    self.pos += 1;
                    self.parse_number();
                }
                ']' => {
                    self.pos += 1;
                    return Ok(Atom {
                        atomic_number: z,
                        formal_charge: charge,
                        isotope,
                        is_aromatic,
                        // Bracket atoms state their hydrogen count explicitly;
                        // valence-based assignment must not touch them.
                        implicit_hydrogens: explicit_h,
                        chirality,
                    });
                }
                _ => return Err(ChemError::UnexpectedChar { ch, pos: self.pos }),
            }
        }
        Err(ChemError::UnclosedBracket(open))
    }

    /// `+`/`-` runs (`++`) or an explicit magnitude (`+2`).
    fn parse_signed_magnitude(&mut self, sign: i8) -> i8 {
        if let Some(n) = self.parse_number() {
            return sign * n as i8;
        }
        let mut magnitude: i8 = 1;
        let repeat = if sign > 0 { '+' } else { '-' };
        while self.chars.get(self.pos) == Some(&repeat) {
            magnitude += 1;
            self.pos += 1;
        }
        sign * magnitude
    }

    fn parse_number(&mut self) -> Option<u32> {
        let mut value: u32 = 0;
        let mut any = false;
        while let Some(&ch) = self.chars.get(self.pos) {
            match ch.to_digit(10) {
                Some(d) => {
                    value = value.saturating_mul(10).saturating_add(d);
                    any = true;
                    self.pos += 1;
                }
                None => break,
            }
        }
        any.then_some(value)
    }
}

fn bare_atom(atomic_number: u8, is_aromatic: bool) -> Atom {
    Atom {
        atomic_number,
        formal_charge: 0,
        isotope: None,
        is_aromatic,
        // Filled in by assign_implicit_hydrogens once bonds are known.
        implicit_hydrogens: u8::MAX,
        chirality: Chirality::None,
    }
}

/// Assign implicit hydrogens to bare (non-bracket) atoms. Bracket atoms
/// keep their explicit count.
///
/// Aliphatic atoms use the smallest standard valence that accommodates the
/// bond order sum. Bare aromatic atoms follow the SMILES convention: an
/// aromatic carbon carries `3 - degree` hydrogens; aromatic heteroatoms
/// carry none unless written in brackets (`[nH]`).
fn assign_implicit_hydrogens(mol: &mut Molecule) {
    let counts: Vec<u8> = (0..mol.atom_count())
        .map(|i| {
            let atom = &mol.atoms[i];
            if atom.implicit_hydrogens != u8::MAX {
                return atom.implicit_hydrogens;
            }
            if atom.is_aromatic {
                return if atom.atomic_number == 6 {
                    (3usize.saturating_sub(mol.degree(i))) as u8
                } else {
                    0
                };
            }
            let used = mol.bond_order_sum(i).ceil() as i32;
            let base = default_valences(atom.atomic_number);
            let valence = base
                .iter()
                .map(|&v| v as i32 + atom.formal_charge as i32)
                .find(|&v| v >= used);
            match valence {
                Some(v) => (v - used).max(0) as u8,
                None => 0,
            }
        })
        .collect();
    for (atom, h) in mol.atoms.iter_mut().zip(counts) {
        atom.implicit_hydrogens = h;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ethanol_parses() {
        let mol = parse_smiles("CCO").unwrap();
        assert_eq!(mol.atom_count(), 3);
        assert_eq!(mol.bond_count(), 2);
        assert_eq!(mol.atoms[0].implicit_hydrogens, 3);
        assert_eq!(mol.atoms[1].implicit_hydrogens, 2);
        assert_eq!(mol.atoms[2].implicit_hydrogens, 1);
        assert!((mol.molecular_weight() - 46.07).abs() < 0.01);
    }

    #[test]
    fn benzene_is_aromatic_with_one_h_each() {
        let mol = parse_smiles("c1ccccc1").unwrap();
        assert_eq!(mol.atom_count(), 6);
        assert_eq!(mol.bond_count(), 6);
        assert!(mol.atoms.iter().all(|a| a.is_aromatic));
        assert!(mol.atoms.iter().all(|a| a.implicit_hydrogens == 1));
        assert!(mol
            .bonds
            .iter()
            .all(|b| b.order == BondOrder::Aromatic));
    }

    #[test]
    fn aspirin_parses() {
        let mol = parse_smiles("CC(=O)Oc1ccccc1C(=O)O").unwrap();
        assert_eq!(mol.atom_count(), 13);
        // MW of aspirin is 180.16
        assert!((mol.molecular_weight() - 180.16).abs() < 0.1);
    }

    #[test]
    fn branches_restore_attachment_point() {
        let mol = parse_smiles("CC(C)(C)C").unwrap(); // neopentane
        assert_eq!(mol.degree(1), 4);
    }

    #[test]
    fn bracket_atom_charge_and_h() {
        let mol = parse_smiles("[NH4+]").unwrap();
        assert_eq!(mol.atoms[0].formal_charge, 1);
        assert_eq!(mol.atoms[0].implicit_hydrogens, 4);

        let mol = parse_smiles("[O-]C").unwrap();
        assert_eq!(mol.atoms[0].formal_charge, -1);
        assert_eq!(mol.atoms[0].implicit_hydrogens, 0);
    }

    #[test]
    fn isotope_label() {
        let mol = parse_smiles("[13CH4]").unwrap();
        assert_eq!(mol.atoms[0].isotope, Some(13));
        assert_eq!(mol.atoms[0].implicit_hydrogens, 4);
    }

    #[test]
    fn two_letter_elements() {
        let mol = parse_smiles("ClCCBr").unwrap();
        assert_eq!(mol.atoms[0].atomic_number, 17);
        assert_eq!(mol.atoms[3].atomic_number, 35);
    }

    #[test]
    fn percent_ring_closure() {
        let mol = parse_smiles("C%12CCCCC%12").unwrap();
        assert_eq!(mol.bond_count(), 6);
    }

    #[test]
    fn dot_separates_fragments() {
        let mol = parse_smiles("CCO.[Na]").unwrap();
        assert_eq!(mol.atom_count(), 4);
        assert_eq!(mol.bond_count(), 2);
    }

    #[test]
    fn triple_bond() {
        let mol = parse_smiles("C#N").unwrap();
        assert_eq!(mol.bonds[0].order, BondOrder::Triple);
        assert_eq!(mol.atoms[0].implicit_hydrogens, 1);
        assert_eq!(mol.atoms[1].implicit_hydrogens, 0);
    }

    #[test]
    fn pyridine_nitrogen_has_no_h() {
        let mol = parse_smiles("c1ccncc1").unwrap();
        let n = mol.atoms.iter().find(|a| a.atomic_number == 7).unwrap();
        assert_eq!(n.implicit_hydrogens, 0);
    }

    #[test]
    fn thiophene_sulfur_has_no_h() {
        let mol = parse_smiles("c1ccsc1").unwrap();
        let s = mol.atoms.iter().find(|a| a.atomic_number == 16).unwrap();
        assert_eq!(s.implicit_hydrogens, 0);
    }

    #[test]
    fn pyrrole_nitrogen_keeps_bracket_h() {
        let mol = parse_smiles("c1cc[nH]c1").unwrap();
        let n = mol.atoms.iter().find(|a| a.atomic_number == 7).unwrap();
        assert_eq!(n.implicit_hydrogens, 1);
    }

    #[test]
    fn malformed_inputs_are_typed_errors() {
        assert_eq!(parse_smiles(""), Err(ChemError::EmptyInput));
        assert_eq!(parse_smiles("   "), Err(ChemError::EmptyInput));
        assert!(matches!(
            parse_smiles("C(("),
            Err(ChemError::UnbalancedParens(_)) | Err(ChemError::DanglingBond(_))
        ));
        assert!(matches!(
            parse_smiles("C)"),
            Err(ChemError::UnbalancedParens(_))
        ));
        assert!(matches!(
            parse_smiles("[CH3"),
            Err(ChemError::UnclosedBracket(_))
        ));
        assert!(matches!(
            parse_smiles("C1CC"),
            Err(ChemError::UnmatchedRingClosure(1))
        ));
        assert!(matches!(
            parse_smiles("Xy"),
            Err(ChemError::UnknownElement(_)) | Err(ChemError::UnexpectedChar { .. })
        ));
        assert!(matches!(
            parse_smiles("=C"),
            Err(ChemError::DanglingBond(_))
        ));
    }

    #[test]
    fn parsing_is_deterministic() {
        let a = parse_smiles("CC(=O)Oc1ccccc1C(=O)O").unwrap();
        let b = parse_smiles("CC(=O)Oc1ccccc1C(=O)O").unwrap();
        assert_eq!(a.atoms, b.atoms);
        assert_eq!(a.bonds, b.bonds);
    }
}
