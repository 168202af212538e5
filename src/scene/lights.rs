use glam::{Mat4, Vec3};

use crate::options::AreaLightOptions;

/// Rect lights the shaders evaluate; extra lights are ignored.
pub const MAX_AREA_LIGHTS: usize = 4;

/// One-sided rectangular area light.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaLight {
    /// Centre of the rectangle.
    pub position: Vec3,
    /// Unit emission direction.
    pub normal: Vec3,
    /// Unit axis along the width.
    pub tangent: Vec3,
    /// Extent along `tangent`.
    pub width: f32,
    /// Extent along [`bitangent`](Self::bitangent).
    pub height: f32,
    /// Linear RGB.
    pub color: [f32; 3],
    /// Radiance multiplier.
    pub intensity: f32,
    /// Draw the rectangle as an emissive panel.
    pub show_panel: bool,
}

impl AreaLight {
    /// Resolve the facing direction from the configured target.
    pub fn from_options(options: &AreaLightOptions) -> Self {
        let position = Vec3::from(options.position);
        let normal = (Vec3::from(options.target) - position).normalize_or(Vec3::NEG_Z);
        let reference = if normal.y.abs() < 0.99 { Vec3::Y } else { Vec3::X };
        let tangent = reference.cross(normal).normalize();

        Self {
            position,
            normal,
            tangent,
            width: options.width.max(0.0),
            height: options.height.max(0.0),
            color: options.color.to_linear(),
            intensity: options.intensity.max(0.0),
            show_panel: options.show_panel,
        }
    }

    /// Unit axis along the height, completing a right-handed basis with
    /// the tangent and normal.
    pub fn bitangent(&self) -> Vec3 {
        self.normal.cross(self.tangent)
    }

    /// Maps the unit XY quad (normal +Z) onto the light rectangle.
    pub fn panel_transform(&self) -> Mat4 {
        Mat4::from_cols(
            (self.tangent * self.width).extend(0.0),
            (self.bitangent() * self.height).extend(0.0),
            self.normal.extend(0.0),
            self.position.extend(1.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::SceneOptions;

    fn default_lights() -> Vec<AreaLight> {
        SceneOptions::default()
            .area_lights
            .iter()
            .map(AreaLight::from_options)
            .collect()
    }

    #[test]
    fn key_light_faces_negative_z() {
        let key = &default_lights()[0];
        assert!((key.normal - Vec3::NEG_Z).length() < 1e-6);
        assert_eq!(key.position, Vec3::new(0.0, 0.0, 6.0));
    }

    #[test]
    fn lights_face_the_origin() {
        for light in default_lights() {
            let to_origin = (-light.position).normalize();
            assert!((light.normal - to_origin).length() < 1e-5);
        }
    }

    #[test]
    fn basis_is_orthonormal() {
        for light in default_lights() {
            let (n, t, b) = (light.normal, light.tangent, light.bitangent());
            assert!(n.dot(t).abs() < 1e-5 && n.dot(b).abs() < 1e-5 && t.dot(b).abs() < 1e-5);
            assert!((t.cross(b) - n).length() < 1e-5);
        }
    }

    #[test]
    fn panel_corners_span_the_rectangle() {
        let background = &default_lights()[1];
        let m = background.panel_transform();
        let corner = m.transform_point3(Vec3::new(0.5, 0.5, 0.0));
        let half_diag = (3.0_f32.powi(2) + 3.25_f32.powi(2)).sqrt();
        assert!(((corner - background.position).length() - half_diag).abs() < 1e-4);
        let facing = m.transform_vector3(Vec3::Z);
        assert!((facing - background.normal).length() < 1e-6);
    }

    #[test]
    fn degenerate_target_falls_back() {
        let light = AreaLight::from_options(&AreaLightOptions {
            position: [1.0, 2.0, 3.0],
            target: [1.0, 2.0, 3.0],
            ..AreaLightOptions::default()
        });
        assert_eq!(light.normal, Vec3::NEG_Z);
    }
}
