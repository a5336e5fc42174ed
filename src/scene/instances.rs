//! Turns a [`Molecule`] plus display options into GPU instance batches.

use glam::{Quat, Vec3};

use super::labels::{label_instances, FontAtlas, LabelStyle};
use super::{Atom, Molecule};
use crate::options::{BondColorMode, DisplayOptions, GeometryOptions};
use crate::renderer::instance::InstanceRecord;
use crate::renderer::picking::encode_tag;

/// Instances grouped by the pass that draws them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstanceBatches {
    /// Opaque atoms and bonds.
    pub opaque: Vec<InstanceRecord>,
    /// Translucent atoms, bonds and selection halos.
    pub transparent: Vec<InstanceRecord>,
    /// Label glyph quads.
    pub labels: Vec<InstanceRecord>,
    /// Every atom with its identity color, for the picking pass.
    pub picking: Vec<InstanceRecord>,
}

/// Everything besides the molecule that shapes its instances.
#[derive(Debug, Clone, Copy)]
pub struct InstanceContext<'a> {
    /// Colors, opacity, highlight and label settings.
    pub display: &'a DisplayOptions,
    /// Bond radius and coloring.
    pub geometry: &'a GeometryOptions,
    /// Scene rotation, used to billboard labels.
    pub rotation: Quat,
    /// Glyph atlas; labels are skipped without one.
    pub atlas: Option<&'a FontAtlas>,
}

impl InstanceBatches {
    /// Build every batch for the molecule's current selection and hover.
    pub fn build(molecule: &Molecule, ctx: &InstanceContext<'_>) -> Self {
        let mut batches = Self::default();
        let display = ctx.display;
        let opacity = display.atom_opacity.clamp(0.0, 1.0);

        for atom in molecule.atoms() {
            let selected = molecule.selection().contains(atom.tag);
            let radius = if molecule.hovered() == Some(atom.tag) {
                atom.radius * display.highlight_scale
            } else {
                atom.radius
            };
            let rgb = if selected {
                display.selection_color
            } else {
                atom.color
            };
            let sphere = InstanceRecord::sphere(atom.position, radius, rgba(rgb, opacity))
                .with_picking_color(encode_tag(atom.tag));
            batches.picking.push(InstanceRecord {
                color: [0.0, 0.0, 0.0, 1.0],
                ..sphere
            });
            batches.push(sphere);

            if selected && display.selection_halo {
                batches.transparent.push(InstanceRecord::sphere(
                    atom.position,
                    radius * display.halo_scale,
                    rgba(display.selection_color, display.halo_alpha.clamp(0.0, 0.999)),
                ));
            }
        }

        let atoms = molecule.atoms();
        for &(a, b) in molecule.bonds() {
            if let (Some(a), Some(b)) = (atoms.get(a), atoms.get(b)) {
                for segment in bond_segments(a, b, ctx.geometry, opacity) {
                    batches.push(segment);
                }
            }
        }

        if display.show_labels {
            if let Some(atlas) = ctx.atlas {
                let style = LabelStyle {
                    height: display.label_height,
                    color: display.label_color,
                };
                for atom in atoms {
                    batches.labels.extend(label_instances(
                        atlas,
                        &atom.symbol,
                        atom.position,
                        atom.radius,
                        ctx.rotation,
                        &style,
                    ));
                }
            }
        }

        log::debug!(
            "built instances: {} opaque, {} transparent, {} labels",
            batches.opaque.len(),
            batches.transparent.len(),
            batches.labels.len()
        );
        batches
    }

    fn push(&mut self, record: InstanceRecord) {
        if record.is_transparent() {
            self.transparent.push(record);
        } else {
            self.opaque.push(record);
        }
    }

    /// Total visible instances.
    pub fn len(&self) -> usize {
        self.opaque.len() + self.transparent.len() + self.labels.len()
    }

    /// Whether nothing is drawn.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn rgba(rgb: [f32; 3], alpha: f32) -> [f32; 4] {
    [rgb[0], rgb[1], rgb[2], alpha]
}

/// Cylinders for the bond `a`-`b`.
///
/// Split bonds cover only the gap between the two spheres plus the part
/// hidden inside them, meeting at the middle of the visible gap; touching
/// or overlapping spheres get no bond.
fn bond_segments(
    a: &Atom,
    b: &Atom,
    geometry: &GeometryOptions,
    opacity: f32,
) -> Vec<InstanceRecord> {
    let radius = geometry.bond_radius;
    match geometry.bond_color_mode {
        BondColorMode::Uniform => {
            InstanceRecord::cylinder(a.position, b.position, radius, rgba(geometry.bond_color, opacity))
                .into_iter()
                .collect()
        }
        BondColorMode::SplitByAtom => {
            let axis = b.position - a.position;
            let length = axis.length();
            let gap = (length - a.radius - b.radius) * 0.5;
            if gap <= 0.0 {
                return Vec::new();
            }
            let split: Vec3 = a.position + axis / length * (a.radius + gap);
            [
                InstanceRecord::cylinder(a.position, split, radius, rgba(a.color, opacity)),
                InstanceRecord::cylinder(split, b.position, radius, rgba(b.color, opacity)),
            ]
            .into_iter()
            .flatten()
            .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::instance::RaycastType;
    use crate::scene::{AtomicCoordinates, ElementTable};

    fn molecule(bonds: Option<Vec<(usize, usize)>>) -> Molecule {
        let coords = AtomicCoordinates {
            atomic_num: vec![6, 8, 1],
            x: vec![0.0, 3.0, 0.0],
            y: vec![0.0, 0.0, 3.0],
            z: vec![0.0, 0.0, 0.0],
            bonds,
        };
        Molecule::build(&coords, &ElementTable::default(), &GeometryOptions::default()).unwrap()
    }

    fn build(molecule: &Molecule, display: &DisplayOptions) -> InstanceBatches {
        InstanceBatches::build(
            molecule,
            &InstanceContext {
                display,
                geometry: &GeometryOptions::default(),
                rotation: Quat::IDENTITY,
                atlas: None,
            },
        )
    }

    fn atom_colors(batches: &InstanceBatches) -> Vec<[f32; 4]> {
        batches
            .opaque
            .iter()
            .filter(|r| r.raycast() == Some(RaycastType::Sphere))
            .map(|r| r.color)
            .collect()
    }

    #[test]
    fn one_sphere_per_atom_with_unique_picking_colors() {
        let batches = build(&molecule(Some(vec![])), &DisplayOptions::default());
        assert_eq!(batches.opaque.len(), 3);
        assert_eq!(batches.picking.len(), 3);
        let ids: Vec<_> = batches.picking.iter().map(|r| r.picking_color).collect();
        assert_eq!(ids, vec![encode_tag(0), encode_tag(1), encode_tag(2)]);
    }

    #[test]
    fn toggling_atom_zero_changes_only_its_color() {
        let display = DisplayOptions::default();
        let mut molecule = molecule(Some(vec![]));
        let before = atom_colors(&build(&molecule, &display));
        let _ = molecule.toggle_selection(0);
        let after = atom_colors(&build(&molecule, &display));

        assert_ne!(before[0], after[0]);
        assert_eq!(&after[0][..3], &display.selection_color);
        assert_eq!(before[1..], after[1..]);
    }

    #[test]
    fn hover_enlarges_only_hovered_atom() {
        let display = DisplayOptions::default();
        let mut molecule = molecule(Some(vec![]));
        let plain = build(&molecule, &display);
        let _ = molecule.set_hovered(Some(1));
        let hovered = build(&molecule, &display);

        let scale = |r: &InstanceRecord| r.model_matrix().x_axis.x;
        assert_eq!(scale(&plain.opaque[0]), scale(&hovered.opaque[0]));
        let ratio = scale(&hovered.opaque[1]) / scale(&plain.opaque[1]);
        assert!((ratio - display.highlight_scale).abs() < 1e-6);
    }

    #[test]
    fn split_bond_halves_take_atom_colors() {
        let molecule = molecule(Some(vec![(0, 1)]));
        let batches = build(&molecule, &DisplayOptions::default());
        let bonds: Vec<_> = batches
            .opaque
            .iter()
            .filter(|r| r.raycast() == Some(RaycastType::Cylinder))
            .collect();
        assert_eq!(bonds.len(), 2);
        let [c, o] = [&molecule.atoms()[0], &molecule.atoms()[1]];
        assert_eq!(&bonds[0].color[..3], &c.color);
        assert_eq!(&bonds[1].color[..3], &o.color);

        // The halves meet in the middle of the visible gap.
        let gap = (3.0 - c.radius - o.radius) * 0.5;
        let split = c.radius + gap;
        let end_of_first = bonds[0].model_matrix().w_axis.x + bonds[0].model_matrix().z_axis.length();
        assert!((end_of_first - split).abs() < 1e-5);
    }

    #[test]
    fn overlapping_atoms_get_no_split_bond() {
        let mut coords = AtomicCoordinates {
            atomic_num: vec![6, 6],
            x: vec![0.0, 0.5],
            y: vec![0.0; 2],
            z: vec![0.0; 2],
            bonds: Some(vec![(0, 1)]),
        };
        let geometry = GeometryOptions::default();
        let molecule = Molecule::build(&coords, &ElementTable::default(), &geometry).unwrap();
        let atoms = molecule.atoms();
        assert!(bond_segments(&atoms[0], &atoms[1], &geometry, 1.0).is_empty());

        coords.x[1] = 5.0;
        let uniform = GeometryOptions {
            bond_color_mode: BondColorMode::Uniform,
            ..GeometryOptions::default()
        };
        let molecule = Molecule::build(&coords, &ElementTable::default(), &uniform).unwrap();
        let atoms = molecule.atoms();
        let segments = bond_segments(&atoms[0], &atoms[1], &uniform, 1.0);
        assert_eq!(segments.len(), 1);
        assert_eq!(&segments[0].color[..3], &uniform.bond_color);
    }

    #[test]
    fn translucent_atoms_and_halos_go_to_transparent_batch() {
        let display = DisplayOptions {
            atom_opacity: 0.5,
            selection_halo: true,
            ..DisplayOptions::default()
        };
        let mut molecule = molecule(Some(vec![]));
        let _ = molecule.toggle_selection(2);
        let batches = build(&molecule, &display);
        assert!(batches.opaque.is_empty());
        assert_eq!(batches.transparent.len(), 4);
        // Picking stays opaque so every atom remains pickable.
        assert!(batches.picking.iter().all(|r| !r.is_transparent()));
    }

    #[test]
    fn labels_need_an_atlas() {
        let display = DisplayOptions {
            show_labels: true,
            ..DisplayOptions::default()
        };
        let batches = build(&molecule(Some(vec![])), &display);
        assert!(batches.labels.is_empty());
    }
}
