//! Covalent bond inference by sweep and prune along X.

use super::coords::AtomicCoordinates;
use super::elements::ElementTable;

struct Candidate {
    position: [f64; 3],
    radius: f64,
    index: usize,
}

/// Infer bonds: atoms `i` and `j` bond when their distance is below
/// `(r_i + r_j) * (1 + tolerance)` for covalent radii `r`.
///
/// Atoms with atomic number below 1, no element style or a zero covalent
/// radius never bond. Pairs are returned as `(low, high)` index pairs in
/// ascending order.
pub fn infer_bonds(
    coords: &AtomicCoordinates,
    elements: &ElementTable,
    tolerance: f64,
) -> Vec<(usize, usize)> {
    let mut max_radius = 0.0_f64;
    let mut atoms: Vec<Candidate> = (0..coords.len())
        .filter(|&i| coords.atomic_num[i] >= 1)
        .filter_map(|i| {
            let style = elements.get(coords.atomic_num[i])?;
            let radius = f64::from(style.covalent_radius);
            (radius > 0.0).then(|| {
                max_radius = max_radius.max(radius);
                Candidate {
                    position: coords.position(i),
                    radius,
                    index: i,
                }
            })
        })
        .collect();

    atoms.sort_by(|a, b| a.position[0].total_cmp(&b.position[0]));

    let tol_factor = 1.0 + tolerance;
    let mut bonds = Vec::new();
    for (i, a) in atoms.iter().enumerate() {
        // No partner further along X than this can be within any cutoff.
        let limit = (a.radius + max_radius) * tol_factor;
        for b in &atoms[i + 1..] {
            let dx = b.position[0] - a.position[0];
            if dx > limit {
                break;
            }
            let dy = b.position[1] - a.position[1];
            let dz = b.position[2] - a.position[2];
            if dy.abs() > limit || dz.abs() > limit {
                continue;
            }
            let cutoff = (a.radius + b.radius) * tol_factor;
            if dx * dx + dy * dy + dz * dz < cutoff * cutoff {
                bonds.push((a.index.min(b.index), a.index.max(b.index)));
            }
        }
    }
    bonds.sort_unstable();
    bonds
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(atomic_num: Vec<i32>, positions: &[[f64; 3]]) -> AtomicCoordinates {
        AtomicCoordinates {
            atomic_num,
            x: positions.iter().map(|p| p[0]).collect(),
            y: positions.iter().map(|p| p[1]).collect(),
            z: positions.iter().map(|p| p[2]).collect(),
            bonds: None,
        }
    }

    /// Quadratic reference: every pair checked.
    fn brute_force(c: &AtomicCoordinates, elements: &ElementTable, tol: f64) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for i in 0..c.len() {
            for j in i + 1..c.len() {
                let (Some(a), Some(b)) = (elements.get(c.atomic_num[i]), elements.get(c.atomic_num[j])) else {
                    continue;
                };
                if c.atomic_num[i] < 1 || c.atomic_num[j] < 1 || a.covalent_radius <= 0.0 || b.covalent_radius <= 0.0 {
                    continue;
                }
                let cutoff = (f64::from(a.covalent_radius) + f64::from(b.covalent_radius)) * (1.0 + tol);
                let p = c.position(i);
                let q = c.position(j);
                let d2 = (0..3).map(|k| (p[k] - q[k]).powi(2)).sum::<f64>();
                if d2 < cutoff * cutoff {
                    out.push((i, j));
                }
            }
        }
        out
    }

    #[test]
    fn water_has_two_bonds() {
        let c = coords(
            vec![8, 1, 1],
            &[[0.0, 0.0, 0.0], [0.76, 0.59, 0.0], [-0.76, 0.59, 0.0]],
        );
        assert_eq!(infer_bonds(&c, &ElementTable::default(), 0.15), vec![(0, 1), (0, 2)]);
    }

    #[test]
    fn tolerance_widens_cutoff() {
        // C-C cutoff is 1.52 * (1 + tol).
        let c = coords(vec![6, 6], &[[0.0, 0.0, 0.0], [1.6, 0.0, 0.0]]);
        let table = ElementTable::default();
        assert!(infer_bonds(&c, &table, 0.0).is_empty());
        assert_eq!(infer_bonds(&c, &table, 0.15), vec![(0, 1)]);
    }

    #[test]
    fn pseudo_atoms_are_skipped() {
        let c = coords(vec![-1, 6, -2], &[[0.0, 0.0, 0.0], [0.5, 0.0, 0.0], [1.0, 0.0, 0.0]]);
        assert!(infer_bonds(&c, &ElementTable::default(), 0.15).is_empty());
    }

    #[test]
    fn matches_brute_force_on_a_lattice() {
        let mut nums = Vec::new();
        let mut positions = Vec::new();
        for i in 0..6 {
            for j in 0..5 {
                for k in 0..4 {
                    nums.push([1, 6, 7, 8][(i + j + k) % 4]);
                    // Irregular spacing so some pairs fall on each side of the cutoff.
                    let jitter = ((i * 7 + j * 3 + k) % 5) as f64 * 0.07;
                    positions.push([i as f64 * 1.1 + jitter, j as f64 * 1.3, k as f64 * 0.9 - jitter]);
                }
            }
        }
        let c = coords(nums, &positions);
        let table = ElementTable::default();
        assert_eq!(infer_bonds(&c, &table, 0.15), brute_force(&c, &table, 0.15));
    }
}
