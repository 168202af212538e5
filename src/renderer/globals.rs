//! Per-frame scene uniforms shared by every raster pipeline (group 0).

use crate::camera::core::Camera;
use crate::gpu::pipeline_helpers::{uniform_bind_group, uniform_layout};
use crate::scene::{AreaLight, MAX_AREA_LIGHTS};

/// GPU mirror of the WGSL `RectLight` struct.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RectLightUniform {
    /// xyz: centre, w: intensity.
    pub position: [f32; 4],
    /// xyz: emission direction, w: half width.
    pub normal: [f32; 4],
    /// xyz: width axis, w: half height.
    pub tangent: [f32; 4],
    /// Linear RGB, alpha unused.
    pub color: [f32; 4],
}

impl From<&AreaLight> for RectLightUniform {
    fn from(light: &AreaLight) -> Self {
        let [r, g, b] = light.color;
        Self {
            position: light.position.extend(light.intensity).to_array(),
            normal: light.normal.extend(light.width * 0.5).to_array(),
            tangent: light.tangent.extend(light.height * 0.5).to_array(),
            color: [r, g, b, 1.0],
        }
    }
}

/// GPU mirror of the WGSL `Globals` struct.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalsUniform {
    /// Projection times view.
    pub view_proj: [[f32; 4]; 4],
    /// World to view.
    pub view: [[f32; 4]; 4],
    /// xyz: eye, w: elapsed seconds.
    pub camera_position: [f32; 4],
    /// rgb: fog colour, a: 1 when fog is enabled.
    pub fog_color: [f32; 4],
    /// x: near, y: far.
    pub fog_range: [f32; 4],
    /// x: active lights.
    pub light_count: [u32; 4],
    /// Area lights; only the first `light_count.x` are shaded.
    pub lights: [RectLightUniform; MAX_AREA_LIGHTS],
}

/// Linear fog parameters as pushed to the GPU.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    /// Whether fog is applied at all.
    pub enabled: bool,
    /// Linear RGB.
    pub color: [f32; 3],
    /// Distance where fog starts.
    pub near: f32,
    /// Distance where fog is opaque.
    pub far: f32,
}

impl GlobalsUniform {
    /// Pack camera, time, fog and the first [`MAX_AREA_LIGHTS`] lights.
    pub fn new(camera: &Camera, elapsed: f32, fog: &Fog, lights: &[AreaLight]) -> Self {
        let mut packed = [bytemuck::zeroed::<RectLightUniform>(); MAX_AREA_LIGHTS];
        let count = lights.len().min(MAX_AREA_LIGHTS);
        for (slot, light) in packed.iter_mut().zip(lights) {
            *slot = light.into();
        }
        let [r, g, b] = fog.color;
        Self {
            view_proj: camera.build_matrix().to_cols_array_2d(),
            view: camera.build_view().to_cols_array_2d(),
            camera_position: camera.eye.extend(elapsed).to_array(),
            fog_color: [r, g, b, if fog.enabled { 1.0 } else { 0.0 }],
            fog_range: [fog.near, fog.far.max(fog.near + f32::EPSILON), 0.0, 0.0],
            light_count: [count as u32, 0, 0, 0],
            lights: packed,
        }
    }
}

/// Globals buffer, layout and bind group.
pub struct GlobalsBinding {
    buffer: wgpu::Buffer,
    /// Group 0 layout shared by every raster pipeline.
    pub layout: wgpu::BindGroupLayout,
    /// Bind group over the globals buffer.
    pub bind_group: wgpu::BindGroup,
}

impl GlobalsBinding {
    /// Allocate a zeroed globals buffer.
    pub fn new(device: &wgpu::Device) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Globals Buffer"),
            size: size_of::<GlobalsUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let layout = uniform_layout(
            device,
            "Globals Layout",
            wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        );
        let bind_group = uniform_bind_group(device, "Globals Bind Group", &layout, &buffer);
        Self {
            buffer,
            layout,
            bind_group,
        }
    }

    /// Upload this frame's values.
    pub fn write(&self, queue: &wgpu::Queue, uniform: &GlobalsUniform) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(uniform));
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::options::SceneOptions;

    fn camera() -> Camera {
        Camera {
            eye: Vec3::new(0.0, 0.0, 8.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: 1.0,
            fovy: 75.0,
            znear: 0.1,
            zfar: 100.0,
        }
    }

    fn fog() -> Fog {
        Fog {
            enabled: true,
            color: [0.0; 3],
            near: 40.0,
            far: 100_000.0,
        }
    }

    #[test]
    fn layout_matches_wgsl() {
        assert_eq!(size_of::<RectLightUniform>(), 64);
        assert_eq!(size_of::<GlobalsUniform>(), 448);
    }

    #[test]
    fn packs_time_fog_and_lights() {
        let lights: Vec<AreaLight> = SceneOptions::default()
            .area_lights
            .iter()
            .map(AreaLight::from_options)
            .collect();
        let u = GlobalsUniform::new(&camera(), 2.5, &fog(), &lights);
        assert_eq!(u.camera_position, [0.0, 0.0, 8.0, 2.5]);
        assert_eq!(u.fog_color[3], 1.0);
        assert_eq!(u.light_count[0], 3);
        assert_eq!(u.lights[0].position[3], 3.0);
        assert_eq!(u.lights[1].normal[3], 3.0);
        assert_eq!(u.lights[1].tangent[3], 3.25);
        assert_eq!(u.lights[3], bytemuck::zeroed::<RectLightUniform>());
    }

    #[test]
    fn extra_lights_are_dropped() {
        let light = AreaLight::from_options(&Default::default());
        let lights = vec![light; 6];
        let u = GlobalsUniform::new(&camera(), 0.0, &fog(), &lights);
        assert_eq!(u.light_count[0], MAX_AREA_LIGHTS as u32);
    }
}
