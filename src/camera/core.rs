use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::gpu::pipeline_helpers::{
    single_uniform_bind_group, single_uniform_layout,
};

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
/// GPU uniform matching `skyline::camera::Camera` in WGSL.
pub struct CameraUniform {
    /// World-to-view matrix.
    pub view: [[f32; 4]; 4],
    /// View-to-clip matrix.
    pub projection: [[f32; 4]; 4],
    /// Inverse transpose of `view`, for transforming normals.
    pub normal: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Mat4::IDENTITY)
    }
}

impl CameraUniform {
    /// Build the uniform from view and projection matrices.
    pub fn new(view: Mat4, projection: Mat4) -> Self {
        Self {
            view: view.to_cols_array_2d(),
            projection: projection.to_cols_array_2d(),
            normal: view.inverse().transpose().to_cols_array_2d(),
        }
    }
}

/// A camera uniform buffer and its bind group (group 0 of every scene
/// pipeline).
pub struct CameraBinding {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl CameraBinding {
    /// Layout shared by every camera binding.
    pub fn layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        single_uniform_layout(
            device,
            "Camera Bind Group Layout",
            wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        )
    }

    /// Allocate a binding initialized to identity matrices.
    pub fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        label: &str,
    ) -> Self {
        let buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Camera Buffer")),
                contents: bytemuck::bytes_of(&CameraUniform::default()),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });
        let bind_group = single_uniform_bind_group(
            device,
            &format!("{label} Camera Bind Group"),
            layout,
            &buffer,
        );
        Self { buffer, bind_group }
    }

    /// Upload new matrices.
    pub fn update(&self, queue: &wgpu::Queue, view: Mat4, projection: Mat4) {
        queue.write_buffer(
            &self.buffer,
            0,
            bytemuck::bytes_of(&CameraUniform::new(view, projection)),
        );
    }

    /// The bind group to set at group 0.
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn uniform_is_three_mat4() {
        assert_eq!(size_of::<CameraUniform>(), 3 * 64);
    }

    #[test]
    fn normal_matrix_of_rigid_view_is_the_view_rotation() {
        let view = Mat4::look_at_rh(Vec3::new(3.0, 2.0, 5.0), Vec3::ZERO, Vec3::Y);
        let uniform = CameraUniform::new(view, Mat4::IDENTITY);
        let normal = Mat4::from_cols_array_2d(&uniform.normal);
        let n = normal.transform_vector3(Vec3::Y);
        let v = view.transform_vector3(Vec3::Y);
        assert!(n.abs_diff_eq(v, 1e-5));
    }
}
