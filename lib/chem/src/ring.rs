//! Ring perception.
//!
//! Finds a smallest set of smallest rings by locating, for every bond that
//! closes a cycle against a BFS spanning forest, the shortest ring through
//! that bond. Good enough for fingerprint invariants, rotatable-bond
//! detection, and ring-count descriptors; exact SSSR minimality for exotic
//! cage systems is not required by any consumer here.

use std::collections::VecDeque;

use crate::molecule::Molecule;

/// Rings as atom-index lists, one per independent cycle.
pub fn find_rings(mol: &Molecule) -> Vec<Vec<usize>> {
    let n = mol.atom_count();
    if n == 0 {
        return Vec::new();
    }

    // BFS spanning forest; bonds not used by the forest close cycles.
    let mut visited = vec![false; n];
    let mut tree_bond = vec![false; mol.bond_count()];
    for start in 0..n {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        let mut queue = VecDeque::new();
        queue.push_back(start);
        while let Some(curr) = queue.pop_front() {
            for &(neighbor, bi) in &mol.adjacency[curr] {
                if !visited[neighbor] {
                    visited[neighbor] = true;
                    tree_bond[bi] = true;
                    queue.push_back(neighbor);
                }
            }
        }
    }

    let mut rings: Vec<Vec<usize>> = Vec::new();
    for (bi, bond) in mol.bonds.iter().enumerate() {
        if tree_bond[bi] {
            continue;
        }
        // Shortest path between the bond's endpoints avoiding the bond
        // itself; together with the bond it forms the smallest ring
        // through it.
        if let Some(path) = shortest_path_avoiding(mol, bond.atom1, bond.atom2, bi) {
            let mut ring = path;
            ring.sort_unstable();
            ring.dedup();
            if !rings.iter().any(|r| *r == ring) {
                rings.push(ring);
            }
        }
    }
    rings
}

/// Atom membership flags for any ring.
pub fn ring_membership(mol: &Molecule) -> Vec<bool> {
    let mut member = vec![false; mol.atom_count()];
    for ring in find_rings(mol) {
        for idx in ring {
            member[idx] = true;
        }
    }
    member
}

/// Bond membership flags for any ring.
pub fn ring_bond_membership(mol: &Molecule) -> Vec<bool> {
    let rings = find_rings(mol);
    let mut member = vec![false; mol.bond_count()];
    for (bi, bond) in mol.bonds.iter().enumerate() {
        for ring in &rings {
            if ring.contains(&bond.atom1) && ring.contains(&bond.atom2) {
                member[bi] = true;
                break;
            }
        }
    }
    member
}

fn shortest_path_avoiding(
    mol: &Molecule,
    from: usize,
    to: usize,
    avoid_bond: usize,
) -> Option<Vec<usize>> {
    let n = mol.atom_count();
    let mut parent = vec![usize::MAX; n];
    let mut seen = vec![false; n];
    let mut queue = VecDeque::new();
    seen[from] = true;
    queue.push_back(from);

    while let Some(curr) = queue.pop_front() {
        if curr == to {
            let mut path = vec![to];
            let mut walk = to;
            while walk != from {
                walk = parent[walk];
                path.push(walk);
            }
            return Some(path);
        }
        for &(neighbor, bi) in &mol.adjacency[curr] {
            if bi == avoid_bond || seen[neighbor] {
                continue;
            }
            seen[neighbor] = true;
            parent[neighbor] = curr;
            queue.push_back(neighbor);
        }
    }
    None
}
