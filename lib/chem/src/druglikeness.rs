//! Drug-likeness scoring and rule-based compliance.
//!
//! [`qed`] is the Bickerton 2012 quantitative estimate of drug-likeness: a
//! weighted geometric mean of per-property desirability functions, in
//! [0, 1]. [`RuleThresholds`] is the extended Rule-of-Five (beyond-Ro5)
//! variant with every bound configurable.

use serde::{Deserialize, Serialize};

use crate::descriptors::{crippen_logp, fraction_csp3, tpsa};
use crate::molecule::Molecule;
use crate::properties::{compute_properties, hba_count, hbd_count};

/// Configurable thresholds for the extended Rule-of-Five check.
///
/// Defaults are the beyond-Ro5 bounds: MW ≤ 1000, −2 ≤ LogP ≤ 10,
/// HBD ≤ 6, HBA ≤ 15, TPSA ≤ 250, rotatable bonds ≤ 20.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleThresholds {
    pub max_molecular_weight: f64,
    pub min_logp: f64,
    pub max_logp: f64,
    pub max_hbd: usize,
    pub max_hba: usize,
    pub max_tpsa: f64,
    pub max_rotatable_bonds: usize,
}

impl Default for RuleThresholds {
    fn default() -> Self {
        RuleThresholds {
            max_molecular_weight: 1000.0,
            min_logp: -2.0,
            max_logp: 10.0,
            max_hbd: 6,
            max_hba: 15,
            max_tpsa: 250.0,
            max_rotatable_bonds: 20,
        }
    }
}

impl RuleThresholds {
    /// The classical Lipinski bounds, for callers that want the strict rule.
    pub fn lipinski() -> Self {
        RuleThresholds {
            max_molecular_weight: 500.0,
            min_logp: f64::NEG_INFINITY,
            max_logp: 5.0,
            max_hbd: 5,
            max_hba: 10,
            max_tpsa: f64::INFINITY,
            max_rotatable_bonds: usize::MAX,
        }
    }
}

/// Full per-molecule descriptor profile plus rule compliance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyProfile {
    pub molecular_weight: f64,
    pub logp: f64,
    pub hbd: usize,
    pub hba: usize,
    pub tpsa: f64,
    pub rotatable_bonds: usize,
    pub qed: f64,
    pub fraction_csp3: f64,
    pub ring_count: usize,
    pub aromatic_ring_count: usize,
    /// True iff no threshold in the rule set is violated.
    pub compliant: bool,
    /// Number of violated rules, 0..=6.
    pub violations: u8,
}

/// Compute the descriptor profile and evaluate it against `rules`.
///
/// Pure function of the graph; no state is carried between molecules.
pub fn property_profile(mol: &Molecule, rules: &RuleThresholds) -> PropertyProfile {
    let props = compute_properties(mol);
    let logp = crippen_logp(mol);
    let hbd = hbd_count(mol);
    let hba = hba_count(mol);
    let polar_area = tpsa(mol);

    let checks = [
        props.molecular_weight <= rules.max_molecular_weight,
        logp >= rules.min_logp && logp <= rules.max_logp,
        hbd <= rules.max_hbd,
        hba <= rules.max_hba,
        polar_area <= rules.max_tpsa,
        props.rotatable_bonds <= rules.max_rotatable_bonds,
    ];
    let violations = checks.iter().filter(|&&ok| !ok).count() as u8;

    PropertyProfile {
        molecular_weight: props.molecular_weight,
        logp,
        hbd,
        hba,
        tpsa: polar_area,
        rotatable_bonds: props.rotatable_bonds,
        qed: qed(mol),
        fraction_csp3: fraction_csp3(mol),
        ring_count: props.ring_count,
        aromatic_ring_count: props.aromatic_ring_count,
        compliant: violations == 0,
        violations,
    }
}

/// QED property weights (Bickerton 2012, Table 1): MW, LogP, HBA, HBD,
/// TPSA, rotatable bonds, aromatic rings, structural alerts.
const QED_WEIGHTS: [f64; 8] = [0.66, 0.46, 0.05, 0.61, 0.06, 0.65, 0.48, 0.95];

/// Desirability of one property value: a Gaussian with asymmetric tails
/// around the literature optimum for that property.
fn desirability(x: f64, property: usize) -> f64 {
    let (center, sigma_left, sigma_right): (f64, f64, f64) = match property {
        0 => (300.0, 120.0, 200.0), // MW
        1 => (2.5, 2.5, 2.5),       // LogP
        2 => (4.0, 4.0, 6.0),       // HBA
        3 => (1.0, 1.0, 4.0),       // HBD
        4 => (60.0, 40.0, 80.0),    // TPSA
        5 => (3.0, 3.0, 7.0),       // RotBonds
        6 => (2.0, 2.0, 2.0),       // AromaticRings
        7 => (0.0, 0.5, 0.5),       // Alerts
        _ => return 0.5,
    };
    let sigma = if x <= center { sigma_left } else { sigma_right };
    let z = (x - center) / sigma;
    (-0.5 * z * z).exp()
}

/// Quantitative estimate of drug-likeness, in [0, 1].
pub fn qed(mol: &Molecule) -> f64 {
    let props = compute_properties(mol);
    let values = [
        props.molecular_weight,
        crippen_logp(mol),
        hba_count(mol) as f64,
        hbd_count(mol) as f64,
        tpsa(mol),
        props.rotatable_bonds as f64,
        props.aromatic_ring_count as f64,
        alert_count(mol) as f64,
    ];

    // Weighted geometric mean of desirabilities.
    let mut log_sum = 0.0;
    let mut weight_sum = 0.0;
    for (i, &x) in values.iter().enumerate() {
        let d = desirability(x, i).max(1e-10);
        log_sum += QED_WEIGHTS[i] * d.ln();
        weight_sum += QED_WEIGHTS[i];
    }
    (log_sum / weight_sum).exp().clamp(0.0, 1.0)
}

/// Crude structural-alert count for QED: reactive motifs detectable from
/// local bond patterns without substructure search.
fn alert_count(mol: &Molecule) -> usize {
    use crate::molecule::BondOrder;

    let mut count = 0;

    // Free aldehyde: carbonyl carbon with a hydrogen.
    if mol.atoms.iter().enumerate().any(|(i, a)| {
        a.atomic_number == 6
            && a.implicit_hydrogens >= 1
            && mol.adjacency[i].iter().any(|&(n, bi)| {
                mol.atoms[n].atomic_number == 8 && mol.bonds[bi].order == BondOrder::Double
            })
    }) {
        count += 1;
    }
    // Peroxide O-O.
    if mol.bonds.iter().any(|b| {
        mol.atoms[b.atom1].atomic_number == 8 && mol.atoms[b.atom2].atomic_number == 8
    }) {
        count += 1;
    }
    // Hydrazine-like N-N single bond.
    if mol.bonds.iter().any(|b| {
        b.order == BondOrder::Single
            && mol.atoms[b.atom1].atomic_number == 7
            && mol.atoms[b.atom2].atomic_number == 7
    }) {
        count += 1;
    }
    // Thiol.
    if mol
        .atoms
        .iter()
        .any(|a| a.atomic_number == 16 && a.implicit_hydrogens >= 1)
    {
        count += 1;
    }
    // Acyl halide.
    if mol.atoms.iter().enumerate().any(|(i, a)| {
        a.atomic_number == 6
            && mol.adjacency[i].iter().any(|&(n, bi)| {
                mol.atoms[n].atomic_number == 8 && mol.bonds[bi].order == BondOrder::Double
            })
            && mol.adjacency[i]
                .iter()
                .any(|&(n, _)| matches!(mol.atoms[n].atomic_number, 17 | 35 | 53))
    }) {
        count += 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::parse_smiles;

    #[test]
    fn qed_is_bounded() {
        for smi in ["CCO", "CC(=O)Oc1ccccc1C(=O)O", "c1ccccc1", "C"] {
            let mol = parse_smiles(smi).unwrap();
            let score = qed(&mol);
            assert!((0.0..=1.0).contains(&score), "{smi}: qed={score}");
        }
    }

    #[test]
    fn aspirin_scores_better_than_methane() {
        let aspirin = parse_smiles("CC(=O)Oc1ccccc1C(=O)O").unwrap();
        let methane = parse_smiles("C").unwrap();
        assert!(qed(&aspirin) > qed(&methane));
    }

    #[test]
    fn ethanol_is_compliant() {
        let mol = parse_smiles("CCO").unwrap();
        let profile = property_profile(&mol, &RuleThresholds::default());
        assert!(profile.compliant);
        assert_eq!(profile.violations, 0);
        assert!((profile.molecular_weight - 46.07).abs() < 0.01);
    }

    #[test]
    fn weight_violation_forces_noncompliance() {
        let mol = parse_smiles("CCO").unwrap();
        let rules = RuleThresholds {
            max_molecular_weight: 40.0,
            ..RuleThresholds::default()
        };
        let profile = property_profile(&mol, &rules);
        assert!(!profile.compliant);
        assert_eq!(profile.violations, 1);
    }

    #[test]
    fn lipinski_preset_is_stricter() {
        let lip = RuleThresholds::lipinski();
        assert!(lip.max_molecular_weight < RuleThresholds::default().max_molecular_weight);
    }

    #[test]
    fn profile_is_deterministic() {
        let mol = parse_smiles("CC(=O)Oc1ccccc1C(=O)O").unwrap();
        let rules = RuleThresholds::default();
        assert_eq!(property_profile(&mol, &rules), property_profile(&mol, &rules));
    }

    #[test]
    fn alert_count_flags_peroxide() {
        let mol = parse_smiles("COOC").unwrap();
        assert!(alert_count(&mol) >= 1);
    }
}
