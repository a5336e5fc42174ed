//! Authoritative molecule: atoms with resolved styles, bonds, framing and
//! the selection/hover state that feeds instance rebuilds.
//!
//! [`Molecule`] is rebuilt wholesale from [`AtomicCoordinates`]; mutations
//! after load (selection, hover) bump a generation counter so the engine
//! knows when instance buffers are stale.

pub mod bonds;
pub mod coords;
pub mod elements;
pub mod instances;
pub mod labels;
/// Bitset of selected atom tags.
pub mod selection;

use glam::Vec3;
use serde::Serialize;

pub use self::coords::AtomicCoordinates;
pub use self::elements::{ElementStyle, ElementTable};
pub use self::instances::InstanceBatches;
pub use self::labels::{FontAtlas, GlyphInfo};
use self::selection::Selection;
use crate::error::DataError;
use crate::options::GeometryOptions;

/// Identity of a picked atom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AtomInfo {
    /// Element symbol.
    pub symbol: String,
    /// Load-order ordinal.
    pub tag: u32,
}

/// One atom with its display style resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Load-order ordinal, also the picking id minus one.
    pub tag: u32,
    /// Atomic number as supplied.
    pub atomic_num: i32,
    /// Element symbol.
    pub symbol: String,
    /// Position in molecule coordinates.
    pub position: Vec3,
    /// Sphere radius.
    pub radius: f32,
    /// Linear RGB color.
    pub color: [f32; 3],
}

impl Atom {
    /// Picking identity.
    pub fn info(&self) -> AtomInfo {
        AtomInfo {
            symbol: self.symbol.clone(),
            tag: self.tag,
        }
    }
}

/// A loaded molecule.
#[derive(Debug, Clone)]
pub struct Molecule {
    atoms: Vec<Atom>,
    bonds: Vec<(usize, usize)>,
    centroid: Vec3,
    size: f32,
    selection: Selection,
    hovered: Option<u32>,
    /// Bumped on any mutation after load.
    generation: u64,
    /// Generation last turned into instances.
    rendered_generation: u64,
}

impl Molecule {
    /// Validate `coords`, resolve element styles and infer bonds when none
    /// are supplied.
    ///
    /// # Errors
    ///
    /// Returns the first [`DataError`] found by
    /// [`AtomicCoordinates::validate`].
    pub fn build(
        coords: &AtomicCoordinates,
        elements: &ElementTable,
        geometry: &GeometryOptions,
    ) -> Result<Self, DataError> {
        coords.validate(elements)?;

        let atoms = (0..coords.len())
            .map(|i| {
                let style = elements.style(coords.atomic_num[i])?;
                let [x, y, z] = coords.position(i);
                Ok(Atom {
                    tag: i as u32,
                    atomic_num: coords.atomic_num[i],
                    symbol: style.symbol.clone(),
                    position: Vec3::new(x as f32, y as f32, z as f32),
                    radius: style.radius,
                    color: style.color,
                })
            })
            .collect::<Result<Vec<_>, DataError>>()?;

        let bonds = match &coords.bonds {
            Some(explicit) => explicit.iter().copied().filter(|(a, b)| a != b).collect(),
            None => bonds::infer_bonds(coords, elements, f64::from(geometry.bond_tolerance)),
        };

        let centroid = atoms.iter().map(|a| a.position).sum::<Vec3>() / atoms.len() as f32;
        let size = atoms
            .iter()
            .map(|a| a.position.distance(centroid) + a.radius)
            .fold(0.0_f32, f32::max);
        // Finite inputs near the f32 limit can still overflow the sums.
        if !centroid.is_finite() || !size.is_finite() {
            let atom = atoms
                .iter()
                .position(|a| !(a.position.distance(centroid) + a.radius).is_finite())
                .unwrap_or(0);
            return Err(DataError::NonFiniteCoordinate { atom });
        }

        log::info!(
            "molecule loaded: {} atoms, {} bonds{}",
            atoms.len(),
            bonds.len(),
            if coords.bonds.is_some() { "" } else { " (inferred)" }
        );

        Ok(Self {
            selection: Selection::new(atoms.len()),
            atoms,
            bonds,
            centroid,
            size,
            hovered: None,
            generation: 1,
            rendered_generation: 0,
        })
    }

    /// Atoms in tag order.
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// Bonds as atom index pairs.
    pub fn bonds(&self) -> &[(usize, usize)] {
        &self.bonds
    }

    /// Atom with `tag`.
    pub fn atom(&self, tag: u32) -> Option<&Atom> {
        self.atoms.get(tag as usize)
    }

    /// Number of atoms.
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    /// Whether the molecule has no atoms (never true after a successful
    /// build).
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Mean atom position.
    pub fn centroid(&self) -> Vec3 {
        self.centroid
    }

    /// Bounding radius about the centroid, including atom radii.
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Current selection.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Flip the selection bit of `tag`; `None` if no such atom.
    pub fn toggle_selection(&mut self, tag: u32) -> Option<bool> {
        let selected = self.selection.toggle(tag)?;
        self.generation += 1;
        Some(selected)
    }

    /// Deselect everything. Returns whether anything changed.
    pub fn clear_selection(&mut self) -> bool {
        let changed = self.selection.clear();
        if changed {
            self.generation += 1;
        }
        changed
    }

    /// Atom under the cursor.
    pub fn hovered(&self) -> Option<u32> {
        self.hovered
    }

    /// Set the hovered atom. Returns whether it changed.
    pub fn set_hovered(&mut self, tag: Option<u32>) -> bool {
        let tag = tag.filter(|&t| (t as usize) < self.atoms.len());
        if self.hovered == tag {
            return false;
        }
        self.hovered = tag;
        self.generation += 1;
        true
    }

    /// Whether instances must be rebuilt.
    pub fn is_dirty(&self) -> bool {
        self.generation != self.rendered_generation
    }

    /// Force an instance rebuild (options or camera-dependent labels).
    pub fn force_dirty(&mut self) {
        self.generation += 1;
    }

    /// Record that instances reflect the current state.
    pub fn mark_rendered(&mut self) {
        self.rendered_generation = self.generation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_atoms() -> AtomicCoordinates {
        AtomicCoordinates {
            atomic_num: vec![6, 8, 1],
            x: vec![0.0, 1.0, 0.0],
            y: vec![0.0, 0.0, 1.0],
            z: vec![0.0, 0.0, 0.0],
            bonds: None,
        }
    }

    fn build(coords: &AtomicCoordinates) -> Result<Molecule, DataError> {
        Molecule::build(coords, &ElementTable::default(), &GeometryOptions::default())
    }

    #[test]
    fn resolves_styles_in_tag_order() {
        let molecule = build(&three_atoms()).unwrap();
        let symbols: Vec<&str> = molecule.atoms().iter().map(|a| a.symbol.as_str()).collect();
        assert_eq!(symbols, ["C", "O", "H"]);
        assert_eq!(molecule.atom(2).unwrap().info(), AtomInfo { symbol: "H".into(), tag: 2 });
    }

    #[test]
    fn centroid_and_size() {
        let molecule = build(&three_atoms()).unwrap();
        let c = molecule.centroid();
        assert!((c - Vec3::new(1.0 / 3.0, 1.0 / 3.0, 0.0)).length() < 1e-6);
        let expected = molecule
            .atoms()
            .iter()
            .map(|a| a.position.distance(c) + a.radius)
            .fold(0.0_f32, f32::max);
        assert_eq!(molecule.size(), expected);
    }

    #[test]
    fn explicit_bonds_are_kept() {
        let mut coords = three_atoms();
        coords.bonds = Some(vec![(0, 2), (1, 1)]);
        let molecule = build(&coords).unwrap();
        assert_eq!(molecule.bonds(), &[(0, 2)]);
    }

    #[test]
    fn invalid_data_is_rejected() {
        let mut coords = three_atoms();
        let _ = coords.x.pop();
        assert!(matches!(build(&coords), Err(DataError::LengthMismatch { .. })));
        assert_eq!(build(&AtomicCoordinates::default()).unwrap_err(), DataError::Empty);
    }

    #[test]
    fn coordinates_that_overflow_f32_are_rejected() {
        let mut coords = three_atoms();
        coords.x[1] = 1e39;
        assert_eq!(
            build(&coords).unwrap_err(),
            DataError::NonFiniteCoordinate { atom: 1 }
        );

        // Each value fits in f32, but the centroid sum does not.
        let mut coords = three_atoms();
        coords.x = vec![3e38, 3e38, 3e38];
        assert!(matches!(
            build(&coords),
            Err(DataError::NonFiniteCoordinate { .. })
        ));
    }

    #[test]
    fn mutations_mark_dirty() {
        let mut molecule = build(&three_atoms()).unwrap();
        assert!(molecule.is_dirty());
        molecule.mark_rendered();
        assert!(!molecule.is_dirty());

        assert_eq!(molecule.toggle_selection(0), Some(true));
        assert!(molecule.is_dirty());
        molecule.mark_rendered();

        assert!(molecule.set_hovered(Some(1)));
        assert!(!molecule.set_hovered(Some(1)));
        molecule.mark_rendered();
        // Unknown tags clear the hover.
        assert!(molecule.set_hovered(Some(99)));
        assert_eq!(molecule.hovered(), None);
    }

    #[test]
    fn out_of_range_toggle_is_ignored() {
        let mut molecule = build(&three_atoms()).unwrap();
        molecule.mark_rendered();
        assert_eq!(molecule.toggle_selection(3), None);
        assert!(!molecule.is_dirty());
    }
}
