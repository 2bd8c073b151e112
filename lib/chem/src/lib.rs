//! # molscreen-chem
//!
//! Cheminformatics core for molscreen:
//!
//! - [`parse_smiles`] - SMILES parsing into an immutable [`Molecule`] graph
//! - [`morgan_fingerprint`] / [`maccs_fingerprint`] - structural fingerprints
//! - [`property_profile`] - physicochemical descriptors + rule compliance
//! - [`qed`] - quantitative drug-likeness in [0, 1]
//!
//! ## Example
//!
//! ```rust
//! use molscreen_chem::{parse_smiles, morgan_fingerprint_default, property_profile, RuleThresholds};
//!
//! let mol = parse_smiles("CC(=O)Oc1ccccc1C(=O)O").unwrap();
//! let fp = morgan_fingerprint_default(&mol);
//! assert!(fp.count_ones() > 0);
//!
//! let profile = property_profile(&mol, &RuleThresholds::default());
//! assert!(profile.compliant);
//! ```

pub mod descriptors;
pub mod druglikeness;
pub mod element;
pub mod error;
pub mod fingerprint;
pub mod maccs;
pub mod molecule;
pub mod properties;
pub mod ring;
pub mod smiles;

pub use descriptors::{crippen_logp, fraction_csp3, tpsa};
pub use druglikeness::{property_profile, qed, PropertyProfile, RuleThresholds};
pub use error::{ChemError, Result};
pub use fingerprint::{
    morgan_fingerprint, morgan_fingerprint_default, Fingerprint, MORGAN_NBITS, MORGAN_RADIUS,
};
pub use maccs::{maccs_fingerprint, MACCS_NBITS};
pub use molecule::{Atom, Bond, BondOrder, BondStereo, Chirality, Molecule};
pub use properties::{compute_properties, hba_count, hbd_count, rotatable_bond_count};
pub use smiles::parse_smiles;
