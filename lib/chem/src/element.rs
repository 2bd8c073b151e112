//! Element data: symbols, standard atomic weights, and default valences.

/// Look up an atomic number by element symbol. Case-sensitive, matching
/// SMILES conventions (`Cl` vs `C`+`l`).
pub fn atomic_number(symbol: &str) -> Option<u8> {
    let n = match symbol {
        "H" => 1,
        "He" => 2,
        "Li" => 3,
        "Be" => 4,
        "B" => 5,
        "C" => 6,
        "N" => 7,
        "O" => 8,
        "F" => 9,
        "Ne" => 10,
        "Na" => 11,
        "Mg" => 12,
        "Al" => 13,
        "Si" => 14,
        "P" => 15,
        "S" => 16,
        "Cl" => 17,
        "Ar" => 18,
        "K" => 19,
        "Ca" => 20,
        "Mn" => 25,
        "Fe" => 26,
        "Co" => 27,
        "Ni" => 28,
        "Cu" => 29,
        "Zn" => 30,
        "Ge" => 32,
        "As" => 33,
        "Se" => 34,
        "Br" => 35,
        "Sn" => 50,
        "Te" => 52,
        "I" => 53,
        _ => return None,
    };
    Some(n)
}

/// Standard atomic weight for an atomic number (CIAAW 2021 values, rounded).
pub fn atomic_weight(atomic_number: u8) -> f64 {
    match atomic_number {
        1 => 1.008,
        2 => 4.0026,
        3 => 6.94,
        4 => 9.0122,
        5 => 10.81,
        6 => 12.011,
        7 => 14.007,
        8 => 15.999,
        9 => 18.998,
        10 => 20.180,
        11 => 22.990,
        12 => 24.305,
        13 => 26.982,
        14 => 28.085,
        15 => 30.974,
        16 => 32.06,
        17 => 35.45,
        18 => 39.95,
        19 => 39.098,
        20 => 40.078,
        25 => 54.938,
        26 => 55.845,
        27 => 58.933,
        28 => 58.693,
        29 => 63.546,
        30 => 65.38,
        32 => 72.630,
        33 => 74.922,
        34 => 78.971,
        35 => 79.904,
        50 => 118.71,
        52 => 127.60,
        53 => 126.90,
        _ => 0.0,
    }
}

/// Default valence used for implicit hydrogen assignment on organic-subset
/// atoms. Multi-valent elements (N, P, S) return the smallest standard
/// valence not less than the current bond order sum.
pub fn default_valences(atomic_number: u8) -> &'static [u8] {
    match atomic_number {
        5 => &[3],
        6 => &[4],
        7 => &[3, 5],
        8 => &[2],
        15 => &[3, 5],
        16 => &[2, 4, 6],
        9 | 17 | 35 | 53 => &[1],
        _ => &[],
    }
}

/// Whether the element may be written bare (outside brackets) in SMILES.
pub fn in_organic_subset(atomic_number: u8) -> bool {
    matches!(atomic_number, 5 | 6 | 7 | 8 | 9 | 15 | 16 | 17 | 35 | 53)
}
