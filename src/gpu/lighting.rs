use glam::Vec3;
use wgpu::util::DeviceExt;

use super::render_context::RenderContext;
use crate::options::LightingOptions;

/// Scene lighting: one directional light plus ambient.
/// NOTE: Must match the WGSL `Lighting` struct layout exactly (48 bytes)
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightingUniform {
    /// Unit vector from the surface towards the directional light.
    pub direction: [f32; 3],
    /// Directional light intensity.
    pub directional_intensity: f32,
    /// Directional light colour.
    pub directional_color: [f32; 3],
    /// Ambient light intensity.
    pub ambient_intensity: f32,
    /// Ambient light colour.
    pub ambient_color: [f32; 3],
    /// Padding to a 16-byte boundary.
    pub _pad: f32,
}

impl LightingUniform {
    /// Build the uniform from options. The directional light shines from
    /// its position towards the origin.
    #[must_use]
    pub fn from_options(options: &LightingOptions) -> Self {
        let direction = Vec3::from(options.directional_position)
            .try_normalize()
            .unwrap_or(Vec3::Y);
        Self {
            direction: direction.to_array(),
            directional_intensity: options.directional_intensity,
            directional_color: options.directional_color,
            ambient_intensity: options.ambient_intensity,
            ambient_color: options.ambient_color,
            _pad: 0.0,
        }
    }
}

/// Lighting uniform buffer and its bind group.
pub struct Lighting {
    /// CPU copy of the uniform.
    pub uniform: LightingUniform,
    /// GPU uniform buffer.
    pub buffer: wgpu::Buffer,
    /// Bind group layout (one uniform at binding 0).
    pub layout: wgpu::BindGroupLayout,
    /// Bind group referencing `buffer`.
    pub bind_group: wgpu::BindGroup,
}

impl Lighting {
    /// Upload lighting built from `options`.
    #[must_use]
    pub fn new(context: &RenderContext, options: &LightingOptions) -> Self {
        let uniform = LightingUniform::from_options(options);

        let buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Lighting Buffer"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM,
            },
        );

        let layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Lighting Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            },
        );

        let bind_group =
            context.device.create_bind_group(&wgpu::BindGroupDescriptor {
                layout: &layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
                label: Some("Lighting Bind Group"),
            });

        Self {
            uniform,
            buffer,
            layout,
            bind_group,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_is_48_bytes() {
        assert_eq!(std::mem::size_of::<LightingUniform>(), 48);
    }

    #[test]
    fn direction_points_at_light_position() {
        let uniform =
            LightingUniform::from_options(&LightingOptions::default());
        let expected = 1.0 / 3.0_f32.sqrt();
        for c in uniform.direction {
            assert!((c - expected).abs() < 1e-6);
        }
        assert_eq!(uniform.ambient_color, [0.2, 0.2, 0.2]);
    }
}
