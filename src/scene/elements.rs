//! Per-element display style: radius, color and covalent radius.

use rustc_hash::FxHashMap;

use crate::error::DataError;

/// `(atomic number, symbol, display radius, rgb, covalent radius)`.
///
/// Display radii are ball-and-stick sizes in molecule units; covalent
/// radii (Angstrom) drive bond inference. Ghost (`X`) and dummy (`Bq`)
/// centers have no covalent radius and never bond.
#[rustfmt::skip]
const ELEMENTS: &[(i32, &str, f32, [f32; 3], f32)] = &[
    (-2, "X", 0.25, [0.73, 0.58, 0.31], 0.0),
    (-1, "Bq", 0.15, [0.0, 0.98, 1.0], 0.0),
    (1, "H", 0.17, [1.0, 1.0, 1.0], 0.31),
    (2, "He", 0.18, [0.85, 1.0, 1.0], 0.28),
    (3, "Li", 0.2, [0.8, 0.5, 1.0], 1.28),
    (4, "Be", 0.22, [0.76, 1.0, 0.0], 0.96),
    (5, "B", 0.24, [1.0, 0.71, 0.71], 0.84),
    (6, "C", 0.26, [0.56, 0.56, 0.56], 0.76),
    (7, "N", 0.28, [0.19, 0.31, 0.97], 0.71),
    (8, "O", 0.3, [1.0, 0.05, 0.05], 0.66),
    (9, "F", 0.32, [0.56, 0.88, 0.31], 0.57),
    (10, "Ne", 0.34, [0.7, 0.89, 0.96], 0.58),
    (11, "Na", 0.3, [0.67, 0.36, 0.95], 1.66),
    (12, "Mg", 0.32, [0.54, 1.0, 0.0], 1.41),
    (13, "Al", 0.34, [0.75, 0.65, 0.65], 1.21),
    (14, "Si", 0.36, [0.94, 0.78, 0.63], 1.11),
    (15, "P", 0.38, [1.0, 0.5, 0.0], 1.07),
    (16, "S", 0.4, [1.0, 1.0, 0.19], 1.05),
    (17, "Cl", 0.42, [0.12, 0.94, 0.12], 1.02),
    (18, "Ar", 0.44, [0.5, 0.82, 0.89], 1.06),
    (19, "K", 0.4, [0.56, 0.25, 0.83], 2.03),
    (20, "Ca", 0.41, [0.24, 1.0, 0.0], 1.76),
    (21, "Sc", 0.42, [0.9, 0.9, 0.9], 1.7),
    (22, "Ti", 0.43, [0.75, 0.76, 0.78], 1.6),
    (23, "V", 0.44, [0.65, 0.65, 0.67], 1.53),
    (24, "Cr", 0.45, [0.54, 0.6, 0.78], 1.39),
    (25, "Mn", 0.46, [0.61, 0.48, 0.78], 1.39),
    (26, "Fe", 0.47, [0.88, 0.4, 0.2], 1.32),
    (27, "Co", 0.48, [0.94, 0.56, 0.63], 1.26),
    (28, "Ni", 0.49, [0.31, 0.82, 0.31], 1.24),
    (29, "Cu", 0.5, [0.78, 0.5, 0.2], 1.32),
    (30, "Zn", 0.51, [0.49, 0.5, 0.69], 1.22),
    (31, "Ga", 0.52, [0.76, 0.56, 0.56], 1.22),
    (32, "Ge", 0.53, [0.4, 0.56, 0.56], 1.2),
    (33, "As", 0.54, [0.74, 0.5, 0.89], 1.19),
    (34, "Se", 0.55, [1.0, 0.63, 0.0], 1.2),
    (35, "Br", 0.56, [0.65, 0.16, 0.16], 1.2),
    (36, "Kr", 0.57, [0.36, 0.72, 0.82], 1.16),
    (37, "Rb", 0.5, [0.44, 0.18, 0.69], 2.2),
    (38, "Sr", 0.51, [0.0, 1.0, 0.0], 1.95),
    (39, "Y", 0.52, [0.58, 1.0, 1.0], 1.9),
    (40, "Zr", 0.53, [0.58, 0.88, 0.88], 1.75),
    (41, "Nb", 0.54, [0.45, 0.76, 0.79], 1.64),
    (42, "Mo", 0.55, [0.33, 0.71, 0.71], 1.54),
    (43, "Tc", 0.56, [0.23, 0.62, 0.62], 1.47),
    (44, "Ru", 0.57, [0.14, 0.56, 0.56], 1.46),
    (45, "Rh", 0.58, [0.04, 0.49, 0.55], 1.42),
    (46, "Pd", 0.59, [0.0, 0.41, 0.52], 1.39),
    (47, "Ag", 0.6, [0.75, 0.75, 0.75], 1.45),
    (48, "Cd", 0.61, [1.0, 0.85, 0.56], 1.44),
    (49, "In", 0.62, [0.65, 0.46, 0.45], 1.42),
    (50, "Sn", 0.63, [0.4, 0.5, 0.5], 1.39),
    (51, "Sb", 0.64, [0.62, 0.39, 0.71], 1.39),
    (52, "Te", 0.65, [0.83, 0.48, 0.0], 1.38),
    (53, "I", 0.66, [0.58, 0.0, 0.58], 1.39),
    (54, "Xe", 0.67, [0.26, 0.62, 0.69], 1.4),
    (55, "Cs", 0.6, [0.34, 0.09, 0.56], 2.44),
    (56, "Ba", 0.61, [0.0, 0.79, 0.0], 2.15),
    (57, "La", 0.62, [0.44, 0.83, 1.0], 2.07),
    (58, "Ce", 0.62, [1.0, 1.0, 0.78], 2.04),
    (59, "Pr", 0.62, [0.85, 1.0, 0.78], 2.03),
    (60, "Nd", 0.62, [0.78, 1.0, 0.78], 2.01),
    (61, "Pm", 0.62, [0.64, 1.0, 0.78], 1.99),
    (62, "Sm", 0.62, [0.56, 1.0, 0.78], 1.98),
    (63, "Eu", 0.62, [0.38, 1.0, 0.78], 1.98),
    (64, "Gd", 0.62, [0.27, 1.0, 0.78], 1.96),
    (65, "Tb", 0.62, [0.19, 1.0, 0.78], 1.94),
    (66, "Dy", 0.62, [0.12, 1.0, 0.78], 1.92),
    (67, "Ho", 0.62, [0.0, 1.0, 0.61], 1.92),
    (68, "Er", 0.62, [0.0, 0.9, 0.46], 1.89),
    (69, "Tm", 0.62, [0.0, 0.83, 0.32], 1.9),
    (70, "Yb", 0.62, [0.0, 0.75, 0.22], 1.87),
    (71, "Lu", 0.62, [0.0, 0.67, 0.14], 1.87),
    (72, "Hf", 0.63, [0.3, 0.76, 1.0], 1.75),
    (73, "Ta", 0.64, [0.3, 0.65, 1.0], 1.7),
    (74, "W", 0.65, [0.13, 0.58, 0.84], 1.62),
    (75, "Re", 0.66, [0.15, 0.49, 0.67], 1.51),
    (76, "Os", 0.67, [0.15, 0.4, 0.59], 1.44),
    (77, "Ir", 0.68, [0.09, 0.33, 0.53], 1.41),
    (78, "Pt", 0.69, [0.82, 0.82, 0.88], 1.36),
    (79, "Au", 0.7, [1.0, 0.82, 0.14], 1.36),
    (80, "Hg", 0.71, [0.72, 0.72, 0.82], 1.32),
    (81, "Tl", 0.72, [0.65, 0.33, 0.3], 1.45),
    (82, "Pb", 0.73, [0.34, 0.35, 0.38], 1.46),
    (83, "Bi", 0.74, [0.62, 0.31, 0.71], 1.48),
    (84, "Po", 0.75, [0.67, 0.36, 0.0], 1.4),
    (85, "At", 0.76, [0.46, 0.31, 0.27], 1.5),
    (86, "Rn", 0.77, [0.26, 0.51, 0.59], 1.5),
    (87, "Fr", 0.7, [0.26, 0.0, 0.4], 2.6),
    (88, "Ra", 0.71, [0.0, 0.49, 0.0], 2.21),
    (89, "Ac", 0.72, [0.44, 0.67, 0.98], 2.15),
    (90, "Th", 0.72, [0.0, 0.73, 1.0], 2.06),
    (91, "Pa", 0.72, [0.0, 0.63, 1.0], 2.0),
    (92, "U", 0.72, [0.0, 0.56, 1.0], 1.96),
    (93, "Np", 0.72, [0.0, 0.5, 1.0], 1.9),
    (94, "Pu", 0.72, [0.0, 0.42, 1.0], 1.87),
    (95, "Am", 0.72, [0.33, 0.36, 0.95], 1.8),
    (96, "Cm", 0.72, [0.47, 0.36, 0.89], 1.69),
    (97, "Bk", 0.72, [0.54, 0.31, 0.89], 1.7),
    (98, "Cf", 0.72, [0.63, 0.21, 0.83], 1.7),
    (99, "Es", 0.72, [0.7, 0.12, 0.83], 1.7),
    (100, "Fm", 0.72, [0.7, 0.12, 0.73], 1.7),
    (101, "Md", 0.72, [0.7, 0.05, 0.65], 1.7),
    (102, "No", 0.72, [0.74, 0.05, 0.53], 1.7),
    (103, "Lr", 0.72, [0.78, 0.0, 0.4], 1.7),
    (104, "Rf", 0.73, [0.8, 0.0, 0.35], 1.7),
    (105, "Db", 0.74, [0.82, 0.0, 0.31], 1.7),
    (106, "Sg", 0.75, [0.85, 0.0, 0.27], 1.7),
    (107, "Bh", 0.76, [0.88, 0.0, 0.22], 1.7),
    (108, "Hs", 0.77, [0.9, 0.0, 0.18], 1.7),
    (109, "Mt", 0.78, [0.92, 0.0, 0.15], 1.7),
    (110, "Ds", 0.79, [0.94, 0.0, 0.14], 1.7),
    (111, "Rg", 0.8, [0.94, 0.0, 0.14], 1.7),
    (112, "Cn", 0.81, [0.94, 0.0, 0.14], 1.7),
    (113, "Nh", 0.82, [0.94, 0.0, 0.14], 1.7),
    (114, "Fl", 0.83, [0.94, 0.0, 0.14], 1.7),
    (115, "Mc", 0.84, [0.94, 0.0, 0.14], 1.7),
    (116, "Lv", 0.85, [0.94, 0.0, 0.14], 1.7),
    (117, "Ts", 0.86, [0.94, 0.0, 0.14], 1.7),
    (118, "Og", 0.87, [0.94, 0.0, 0.14], 1.7),
];

/// Display style of one element.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementStyle {
    /// Element symbol, used for labels and [`AtomInfo`](super::AtomInfo).
    pub symbol: String,
    /// Sphere radius in molecule units.
    pub radius: f32,
    /// Linear RGB color.
    pub color: [f32; 3],
    /// Covalent radius; zero disables bond inference for the element.
    pub covalent_radius: f32,
}

/// Lookup from atomic number to [`ElementStyle`].
#[derive(Debug, Clone)]
pub struct ElementTable {
    styles: FxHashMap<i32, ElementStyle>,
}

impl Default for ElementTable {
    fn default() -> Self {
        let styles = ELEMENTS
            .iter()
            .map(|&(num, symbol, radius, color, covalent_radius)| {
                (
                    num,
                    ElementStyle {
                        symbol: symbol.to_owned(),
                        radius,
                        color,
                        covalent_radius,
                    },
                )
            })
            .collect();
        Self { styles }
    }
}

impl ElementTable {
    /// Table with no entries.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            styles: FxHashMap::default(),
        }
    }

    /// Add or replace the style for `atomic_num`.
    pub fn insert(&mut self, atomic_num: i32, style: ElementStyle) {
        let _ = self.styles.insert(atomic_num, style);
    }

    /// Style for `atomic_num`, if registered.
    pub fn get(&self, atomic_num: i32) -> Option<&ElementStyle> {
        self.styles.get(&atomic_num)
    }

    /// Style for `atomic_num`.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::UnknownElement`] if no style is registered.
    pub fn style(&self, atomic_num: i32) -> Result<&ElementStyle, DataError> {
        self.get(atomic_num)
            .ok_or(DataError::UnknownElement(atomic_num))
    }

    /// Number of registered elements.
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_covers_periodic_table() {
        let table = ElementTable::default();
        for z in 1..=118 {
            assert!(table.get(z).is_some(), "missing element {z}");
        }
        assert_eq!(table.style(6).unwrap().symbol, "C");
        assert_eq!(table.style(8).unwrap().symbol, "O");
        assert!(table.style(0).is_err());
    }

    #[test]
    fn pseudo_atoms_do_not_bond() {
        let table = ElementTable::default();
        assert_eq!(table.style(-1).unwrap().covalent_radius, 0.0);
        assert_eq!(table.style(-2).unwrap().covalent_radius, 0.0);
    }

    #[test]
    fn unknown_element_is_reported() {
        let table = ElementTable::default();
        assert_eq!(table.style(500), Err(DataError::UnknownElement(500)));
    }

    #[test]
    fn insert_overrides_style() {
        let mut table = ElementTable::empty();
        assert!(table.is_empty());
        table.insert(
            6,
            ElementStyle {
                symbol: "C".into(),
                radius: 1.0,
                color: [0.0, 1.0, 0.0],
                covalent_radius: 0.7,
            },
        );
        assert_eq!(table.len(), 1);
        assert_eq!(table.style(6).unwrap().radius, 1.0);
    }
}
