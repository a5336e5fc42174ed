//! CPU mirror of the ray-casting in `raycast.wgsl`.
//!
//! Same rays, same quadratic and the same tie rules as the fragment
//! stage, so tests can check silhouettes and hits without a GPU.

use glam::{Mat4, Vec3};

use super::instance::RaycastType;

const EPSILON: f32 = 1e-6;

/// View-space ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Origin.
    pub origin: Vec3,
    /// Direction (unit length).
    pub direction: Vec3,
}

/// Ray through the view-space point `view_pos`.
///
/// Perspective rays start at the camera; orthographic rays start on the
/// camera plane and look down -Z.
pub fn make_ray(view_pos: Vec3, perspective: bool) -> Ray {
    if perspective {
        Ray {
            origin: Vec3::ZERO,
            direction: view_pos.normalize_or_zero(),
        }
    } else {
        Ray {
            origin: Vec3::new(view_pos.x, view_pos.y, 0.0),
            direction: Vec3::NEG_Z,
        }
    }
}

/// Nearest intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Ray parameter.
    pub t: f32,
    /// Unit surface normal.
    pub normal: Vec3,
}

impl Hit {
    /// Hit position along `ray`.
    pub fn point(&self, ray: &Ray) -> Vec3 {
        ray.origin + ray.direction * self.t
    }
}

/// View-space implicit shape of one instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Sphere.
    Sphere {
        /// Center.
        center: Vec3,
        /// Radius.
        radius: f32,
    },
    /// Capped cylinder.
    Cylinder {
        /// Center of the axis.
        center: Vec3,
        /// Unit axis.
        axis: Vec3,
        /// Radius.
        radius: f32,
        /// Half the axis length.
        half_height: f32,
    },
}

impl Shape {
    /// Shape the vertex stage derives from `model_view = view * scene * model`.
    pub fn from_model_view(raycast: RaycastType, model_view: Mat4) -> Option<Self> {
        let center = model_view.w_axis.truncate();
        let radius = model_view.x_axis.truncate().length();
        match raycast {
            RaycastType::None => None,
            RaycastType::Sphere => Some(Self::Sphere { center, radius }),
            RaycastType::Cylinder => {
                let axis = model_view.z_axis.truncate();
                let half_height = axis.length();
                Some(Self::Cylinder {
                    center,
                    axis: axis / half_height.max(EPSILON),
                    radius,
                    half_height,
                })
            }
        }
    }

    /// Nearest non-negative intersection.
    pub fn intersect(&self, ray: &Ray) -> Option<Hit> {
        match *self {
            Self::Sphere { center, radius } => intersect_sphere(ray, center, radius),
            Self::Cylinder {
                center,
                axis,
                radius,
                half_height,
            } => intersect_cylinder(ray, center, axis, radius, half_height),
        }
    }
}

/// Smaller non-negative root of the ray/sphere quadratic.
pub fn intersect_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<Hit> {
    let oc = ray.origin - center;
    let a = ray.direction.dot(ray.direction);
    let b = 2.0 * oc.dot(ray.direction);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 || a < EPSILON {
        return None;
    }
    let sq = disc.sqrt();
    let mut t = (-b - sq) / (2.0 * a);
    if t < 0.0 {
        t = (-b + sq) / (2.0 * a);
    }
    if t < 0.0 {
        return None;
    }
    let p = ray.origin + ray.direction * t;
    Some(Hit {
        t,
        normal: (p - center).normalize_or_zero(),
    })
}

/// Nearest hit on a capped cylinder; `axis` must be unit length.
pub fn intersect_cylinder(
    ray: &Ray,
    center: Vec3,
    axis: Vec3,
    radius: f32,
    half_height: f32,
) -> Option<Hit> {
    let mut best: Option<Hit> = None;
    let mut consider = |hit: Hit| {
        if best.is_none_or(|b| hit.t < b.t) {
            best = Some(hit);
        }
    };

    let oc = ray.origin - center;
    let d_perp = ray.direction - axis * ray.direction.dot(axis);
    let oc_perp = oc - axis * oc.dot(axis);
    let a = d_perp.dot(d_perp);
    // Rays parallel to the axis can only hit the caps.
    if a > EPSILON {
        let b = 2.0 * oc_perp.dot(d_perp);
        let c = oc_perp.dot(oc_perp) - radius * radius;
        let disc = b * b - 4.0 * a * c;
        if disc >= 0.0 {
            let sq = disc.sqrt();
            for t in [(-b - sq) / (2.0 * a), (-b + sq) / (2.0 * a)] {
                if t < 0.0 {
                    continue;
                }
                let local = ray.origin + ray.direction * t - center;
                let along = local.dot(axis);
                if along.abs() <= half_height {
                    consider(Hit {
                        t,
                        normal: (local - axis * along).normalize_or_zero(),
                    });
                }
            }
        }
    }

    for normal in [axis, -axis] {
        let denom = ray.direction.dot(normal);
        if denom.abs() < EPSILON {
            continue;
        }
        let cap_center = center + normal * half_height;
        let t = (cap_center - ray.origin).dot(normal) / denom;
        if t >= 0.0 && (ray.origin + ray.direction * t - cap_center).length() <= radius {
            consider(Hit { t, normal });
        }
    }
    best
}

/// Window depth of a view-space point under `projection`.
pub fn view_depth(projection: Mat4, view_pos: Vec3) -> f32 {
    let clip = projection * view_pos.extend(1.0);
    clip.z / clip.w
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::controller::SceneTransforms;
    use crate::options::{CameraOptions, ProjectionMode};
    use crate::renderer::instance::InstanceRecord;

    const W: u32 = 96;
    const H: u32 = 64;

    fn transforms(mode: ProjectionMode, size: f32) -> SceneTransforms {
        let options = CameraOptions {
            projection: mode,
            ..CameraOptions::default()
        };
        let mut t = SceneTransforms::new(&options, W, H);
        t.frame(Vec3::ZERO, size);
        t
    }

    /// View-space point on the ray through the center of pixel `(px, py)`.
    fn pixel_view_point(t: &SceneTransforms, px: u32, py: u32) -> Vec3 {
        let ndc_x = (px as f32 + 0.5) / W as f32 * 2.0 - 1.0;
        let ndc_y = 1.0 - (py as f32 + 0.5) / H as f32 * 2.0;
        t.projection()
            .matrix()
            .inverse()
            .project_point3(Vec3::new(ndc_x, ndc_y, 0.5))
    }

    /// Software ray-cast of `instances`; index of the nearest hit per pixel.
    fn cast(t: &SceneTransforms, instances: &[InstanceRecord]) -> Vec<Option<usize>> {
        let view_scene = t.camera().view() * t.scene_matrix();
        let perspective = t.projection().is_perspective();
        let mut image = Vec::with_capacity((W * H) as usize);
        for py in 0..H {
            for px in 0..W {
                let ray = make_ray(pixel_view_point(t, px, py), perspective);
                let nearest = instances
                    .iter()
                    .enumerate()
                    .filter_map(|(i, inst)| {
                        let shape = Shape::from_model_view(
                            inst.raycast()?,
                            view_scene * inst.model_matrix(),
                        )?;
                        shape.intersect(&ray).map(|hit| (i, hit.t))
                    })
                    .min_by(|a, b| a.1.total_cmp(&b.1));
                image.push(nearest.map(|(i, _)| i));
            }
        }
        image
    }

    fn project_to_pixel(t: &mut SceneTransforms, p: Vec3) -> (f32, f32) {
        let ndc = t.final_transform().project_point3(p);
        ((ndc.x + 1.0) * 0.5 * W as f32, (1.0 - ndc.y) * 0.5 * H as f32)
    }

    #[test]
    fn sphere_hit_takes_near_root() {
        let ray = make_ray(Vec3::new(0.0, 0.0, -1.0), true);
        let hit = intersect_sphere(&ray, Vec3::new(0.0, 0.0, -10.0), 2.0).unwrap();
        assert!((hit.t - 8.0).abs() < 1e-5);
        assert!((hit.normal - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn sphere_behind_ray_is_missed() {
        let ray = make_ray(Vec3::new(0.0, 0.0, -1.0), true);
        assert!(intersect_sphere(&ray, Vec3::new(0.0, 0.0, 10.0), 2.0).is_none());
    }

    #[test]
    fn ray_inside_sphere_uses_far_root() {
        let ray = make_ray(Vec3::new(0.0, 0.0, -1.0), true);
        let hit = intersect_sphere(&ray, Vec3::ZERO, 3.0).unwrap();
        assert!((hit.t - 3.0).abs() < 1e-5);
    }

    #[test]
    fn tangent_ray_hits_sphere_once() {
        let ray = Ray {
            origin: Vec3::new(1.0, 0.0, 0.0),
            direction: Vec3::NEG_Z,
        };
        let hit = intersect_sphere(&ray, Vec3::new(0.0, 0.0, -5.0), 1.0).unwrap();
        assert!((hit.t - 5.0).abs() < 1e-4);
    }

    #[test]
    fn orthographic_ray_starts_on_camera_plane() {
        let ray = make_ray(Vec3::new(0.5, -0.25, -7.0), false);
        assert_eq!(ray.origin, Vec3::new(0.5, -0.25, 0.0));
        assert_eq!(ray.direction, Vec3::NEG_Z);
    }

    #[test]
    fn cylinder_side_hit_has_radial_normal() {
        let ray = make_ray(Vec3::new(0.0, 0.0, -1.0), false);
        let hit = intersect_cylinder(&ray, Vec3::new(0.0, 0.0, -10.0), Vec3::Y, 1.0, 2.0).unwrap();
        assert!((hit.t - 9.0).abs() < 1e-5);
        assert!((hit.normal - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn tangent_ray_grazes_cylinder_side() {
        // Discriminant is exactly zero: one lateral hit at the silhouette.
        let ray = Ray {
            origin: Vec3::new(1.0, 0.5, 0.0),
            direction: Vec3::NEG_Z,
        };
        let hit = intersect_cylinder(&ray, Vec3::new(0.0, 0.0, -10.0), Vec3::Y, 1.0, 2.0).unwrap();
        assert!((hit.t - 10.0).abs() < 1e-5);
        assert!((hit.normal - Vec3::X).length() < 1e-5);

        let outside = Ray {
            origin: Vec3::new(1.001, 0.5, 0.0),
            direction: Vec3::NEG_Z,
        };
        assert!(intersect_cylinder(&outside, Vec3::new(0.0, 0.0, -10.0), Vec3::Y, 1.0, 2.0).is_none());
    }

    #[test]
    fn cylinder_rejects_hits_beyond_caps() {
        let ray = Ray {
            origin: Vec3::new(0.0, 3.0, 0.0),
            direction: Vec3::NEG_Z,
        };
        assert!(intersect_cylinder(&ray, Vec3::new(0.0, 0.0, -10.0), Vec3::Y, 1.0, 2.0).is_none());
    }

    #[test]
    fn ray_along_axis_hits_cap() {
        let ray = make_ray(Vec3::new(0.2, 0.0, -1.0), false);
        let hit = intersect_cylinder(&ray, Vec3::new(0.0, 0.0, -10.0), Vec3::Z, 1.0, 2.0).unwrap();
        assert!((hit.t - 8.0).abs() < 1e-5);
        assert_eq!(hit.normal, Vec3::Z);
    }

    #[test]
    fn near_cap_wins_over_far_cap() {
        let ray = make_ray(Vec3::new(0.0, 0.0, -1.0), false);
        let hit = intersect_cylinder(&ray, Vec3::new(0.0, 0.0, -10.0), Vec3::NEG_Z, 1.0, 2.0).unwrap();
        assert!((hit.t - 8.0).abs() < 1e-5);
        assert_eq!(hit.normal, Vec3::Z);
    }

    #[test]
    fn shape_follows_scene_scale() {
        let model_view = Mat4::from_scale(Vec3::splat(3.0))
            * InstanceRecord::sphere(Vec3::X, 0.5, [1.0; 4]).model_matrix();
        let shape = Shape::from_model_view(RaycastType::Sphere, model_view).unwrap();
        assert_eq!(
            shape,
            Shape::Sphere {
                center: Vec3::new(3.0, 0.0, 0.0),
                radius: 1.5
            }
        );
    }

    #[test]
    fn orthographic_silhouette_is_projected_circle() {
        let mut t = transforms(ProjectionMode::Orthographic, 3.0);
        let center = Vec3::new(0.7, -0.4, 0.0);
        let radius = 1.2;
        let image = cast(&t, &[InstanceRecord::sphere(center, radius, [1.0; 4])]);

        let (cx, cy) = project_to_pixel(&mut t, center);
        let (_, hy) = t.projection().ortho_half_extents();
        let r_px = radius * (H as f32 * 0.5) / hy;
        for py in 0..H {
            for px in 0..W {
                let d = ((px as f32 + 0.5 - cx).powi(2) + (py as f32 + 0.5 - cy).powi(2)).sqrt();
                // Skip pixels straddling the rim.
                if (d - r_px).abs() < 0.75 {
                    continue;
                }
                let covered = image[(py * W + px) as usize].is_some();
                assert_eq!(covered, d < r_px, "pixel ({px}, {py})");
            }
        }
    }

    #[test]
    fn perspective_silhouette_is_tangent_cone() {
        let t = transforms(ProjectionMode::Perspective, 3.0);
        let world_center = Vec3::new(0.8, 0.5, 0.3);
        let radius = 1.0;
        let image = cast(&t, &[InstanceRecord::sphere(world_center, radius, [1.0; 4])]);

        let view_center = (t.camera().view() * t.scene_matrix()).transform_point3(world_center);
        let half_angle = (radius / view_center.length()).asin();
        for py in 0..H {
            for px in 0..W {
                let dir = pixel_view_point(&t, px, py).normalize();
                let angle = dir.angle_between(view_center.normalize());
                if (angle - half_angle).abs() < 2e-3 {
                    continue;
                }
                let covered = image[(py * W + px) as usize].is_some();
                assert_eq!(covered, angle < half_angle, "pixel ({px}, {py})");
            }
        }
    }

    #[test]
    fn three_atoms_resolve_at_their_projected_centers() {
        let mut t = transforms(ProjectionMode::Orthographic, 3.0);
        let centers = [Vec3::ZERO, Vec3::X, Vec3::Y];
        let spheres: Vec<_> = centers
            .iter()
            .map(|&c| InstanceRecord::sphere(c, 1.0, [1.0; 4]))
            .collect();
        let image = cast(&t, &spheres);
        for (i, &c) in centers.iter().enumerate() {
            let (x, y) = project_to_pixel(&mut t, c);
            let pixel = (y.floor() as u32).min(H - 1) * W + (x.floor() as u32).min(W - 1);
            assert_eq!(image[pixel as usize], Some(i), "atom {i}");
        }
    }

    #[test]
    fn hit_depth_is_in_unit_range() {
        let mut t = transforms(ProjectionMode::Perspective, 2.0);
        let _ = t.final_transform();
        let projection = t.projection().matrix();
        let ray = make_ray(Vec3::new(0.0, 0.0, -1.0), true);
        let center = t.camera().view().transform_point3(Vec3::ZERO);
        let hit = intersect_sphere(&ray, center, 1.0).unwrap();
        let depth = view_depth(projection, hit.point(&ray));
        assert!(depth > 0.0 && depth < 1.0);
        let far = view_depth(projection, center - Vec3::Z);
        assert!(depth < far);
    }
}
