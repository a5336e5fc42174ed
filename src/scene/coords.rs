//! Host-supplied atomic coordinates and their validation.

use serde::{Deserialize, Serialize};

use super::elements::ElementTable;
use crate::error::DataError;
use crate::renderer::picking::MAX_PICK_ID;

/// Parallel arrays of atomic numbers and Cartesian coordinates.
///
/// `bonds` is optional; when absent, bonds are inferred from covalent
/// radii.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AtomicCoordinates {
    /// Atomic number per atom (`-1` dummy, `-2` ghost).
    pub atomic_num: Vec<i32>,
    /// X coordinates.
    pub x: Vec<f64>,
    /// Y coordinates.
    pub y: Vec<f64>,
    /// Z coordinates.
    pub z: Vec<f64>,
    /// Explicit bonds as atom index pairs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bonds: Option<Vec<(usize, usize)>>,
}

impl AtomicCoordinates {
    /// Parse the JSON form (`{"atomic_num": [...], "x": [...], ...}`).
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Parse`] on malformed JSON.
    pub fn from_json(json: &str) -> Result<Self, DataError> {
        serde_json::from_str(json).map_err(|e| DataError::Parse(e.to_string()))
    }

    /// Number of atoms.
    pub fn len(&self) -> usize {
        self.atomic_num.len()
    }

    /// Whether there are no atoms.
    pub fn is_empty(&self) -> bool {
        self.atomic_num.is_empty()
    }

    /// Position of atom `i`. Callers must have validated the arrays.
    pub(crate) fn position(&self, i: usize) -> [f64; 3] {
        [self.x[i], self.y[i], self.z[i]]
    }

    /// Check the input against `elements`.
    ///
    /// # Errors
    ///
    /// Returns the first [`DataError`] found, checking array shape first,
    /// then coordinates, elements and explicit bonds.
    pub fn validate(&self, elements: &ElementTable) -> Result<(), DataError> {
        let n = self.atomic_num.len();
        if self.x.len() != n || self.y.len() != n || self.z.len() != n {
            return Err(DataError::LengthMismatch {
                atoms: n,
                coords: [self.x.len(), self.y.len(), self.z.len()],
            });
        }
        if n == 0 {
            return Err(DataError::Empty);
        }
        if n > MAX_PICK_ID as usize {
            return Err(DataError::TooManyAtoms(n));
        }
        for i in 0..n {
            // Atoms are stored as f32; values past its range become inf.
            if !self.position(i).iter().all(|&c| (c as f32).is_finite()) {
                return Err(DataError::NonFiniteCoordinate { atom: i });
            }
            let _ = elements.style(self.atomic_num[i])?;
        }
        if let Some(bonds) = &self.bonds {
            if let Some(&bond) = bonds.iter().find(|(a, b)| *a >= n || *b >= n) {
                return Err(DataError::BondOutOfRange { bond, atoms: n });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn water() -> AtomicCoordinates {
        AtomicCoordinates {
            atomic_num: vec![8, 1, 1],
            x: vec![0.0, 0.76, -0.76],
            y: vec![0.0, 0.59, 0.59],
            z: vec![0.0, 0.0, 0.0],
            bonds: None,
        }
    }

    #[test]
    fn parses_json_without_bonds() {
        let json = r#"{"atomic_num":[8,1,1],"x":[0,0.76,-0.76],"y":[0,0.59,0.59],"z":[0,0,0]}"#;
        let coords = AtomicCoordinates::from_json(json).unwrap();
        assert_eq!(coords, water());
    }

    #[test]
    fn parses_json_with_bonds() {
        let json = r#"{"atomic_num":[1,1],"x":[0,0.7],"y":[0,0],"z":[0,0],"bonds":[[0,1]]}"#;
        let coords = AtomicCoordinates::from_json(json).unwrap();
        assert_eq!(coords.bonds, Some(vec![(0, 1)]));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            AtomicCoordinates::from_json("{\"x\": [1,"),
            Err(DataError::Parse(_))
        ));
    }

    #[test]
    fn valid_input_passes() {
        assert_eq!(water().validate(&ElementTable::default()), Ok(()));
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let mut coords = water();
        let _ = coords.y.pop();
        assert_eq!(
            coords.validate(&ElementTable::default()),
            Err(DataError::LengthMismatch {
                atoms: 3,
                coords: [3, 2, 3]
            })
        );
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(
            AtomicCoordinates::default().validate(&ElementTable::default()),
            Err(DataError::Empty)
        );
    }

    #[test]
    fn unknown_element_is_rejected() {
        let mut coords = water();
        coords.atomic_num[2] = 999;
        assert_eq!(
            coords.validate(&ElementTable::default()),
            Err(DataError::UnknownElement(999))
        );
    }

    #[test]
    fn non_finite_coordinate_is_rejected() {
        let mut coords = water();
        coords.z[1] = f64::NAN;
        assert_eq!(
            coords.validate(&ElementTable::default()),
            Err(DataError::NonFiniteCoordinate { atom: 1 })
        );
    }

    #[test]
    fn coordinate_beyond_f32_range_is_rejected() {
        let mut coords = water();
        coords.x[2] = 1e39;
        assert!(coords.x[2].is_finite());
        assert_eq!(
            coords.validate(&ElementTable::default()),
            Err(DataError::NonFiniteCoordinate { atom: 2 })
        );
    }

    #[test]
    fn out_of_range_bond_is_rejected() {
        let mut coords = water();
        coords.bonds = Some(vec![(0, 1), (1, 3)]);
        assert_eq!(
            coords.validate(&ElementTable::default()),
            Err(DataError::BondOutOfRange {
                bond: (1, 3),
                atoms: 3
            })
        );
    }
}
