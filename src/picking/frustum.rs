//! Pixel-sized projection frusta.
//!
//! A pick pass renders the scene into a 1x1 target through a frustum whose
//! near-plane rectangle is exactly the one backing pixel under the pointer.
//! Everything here is pure math over the camera's perspective parameters and
//! the canvas sizes, so it is unit tested without a GPU.

use glam::{Mat4, Vec4};

/// Perspective parameters shared by the main camera and the pick pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perspective {
    /// Vertical field of view in radians.
    pub fovy_radians: f32,
    /// Near clip distance (> 0).
    pub near: f32,
    /// Far clip distance (> near).
    pub far: f32,
}

/// Canvas sizes: backing in device pixels, client in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Backing (render target) size in device pixels.
    pub backing: (u32, u32),
    /// Client (pointer coordinate) size in logical pixels.
    pub client: (f32, f32),
}

impl Viewport {
    /// Backing aspect ratio (width / height).
    pub fn aspect(&self) -> f32 {
        self.backing.0 as f32 / self.backing.1.max(1) as f32
    }
}

/// Axis-aligned rectangle on the near plane, in view-space units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearPlane {
    /// Left edge.
    pub left: f32,
    /// Right edge.
    pub right: f32,
    /// Bottom edge.
    pub bottom: f32,
    /// Top edge.
    pub top: f32,
}

impl NearPlane {
    /// Horizontal extent.
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Vertical extent.
    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }

    /// Rectangle area.
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Whether `other` lies inside this rectangle, within `epsilon`.
    pub fn contains(&self, other: &Self, epsilon: f32) -> bool {
        other.left >= self.left - epsilon
            && other.right <= self.right + epsilon
            && other.bottom >= self.bottom - epsilon
            && other.top <= self.top + epsilon
    }
}

/// Map a pointer position in client coordinates (origin top-left) to the
/// backing pixel under it (origin bottom-left).
///
/// Coordinates are floored and clamped into the backing rectangle, so
/// pointers on or past the canvas edge resolve to the edge pixel.
pub fn pointer_to_backing_pixel(
    viewport: &Viewport,
    pointer: (f32, f32),
) -> (u32, u32) {
    let (backing_w, backing_h) = (viewport.backing.0.max(1), viewport.backing.1.max(1));
    let (client_w, client_h) = (
        viewport.client.0.max(f32::EPSILON),
        viewport.client.1.max(f32::EPSILON),
    );

    let scaled_x = pointer.0 * backing_w as f32 / client_w;
    let scaled_y = pointer.1 * backing_h as f32 / client_h;
    let x = scaled_x.floor().clamp(0.0, (backing_w - 1) as f32) as u32;
    let row_from_top =
        scaled_y.floor().clamp(0.0, (backing_h - 1) as f32) as u32;
    (x, backing_h - row_from_top - 1)
}

/// The full near-plane rectangle of a symmetric perspective.
pub fn full_near_plane(perspective: &Perspective, aspect: f32) -> NearPlane {
    let top = (perspective.fovy_radians * 0.5).tan() * perspective.near;
    let bottom = -top;
    NearPlane {
        left: aspect * bottom,
        right: aspect * top,
        bottom,
        top,
    }
}

/// The sub-rectangle of `full` covering backing pixel `pixel`
/// (origin bottom-left).
pub fn pixel_near_plane(
    full: &NearPlane,
    backing: (u32, u32),
    pixel: (u32, u32),
) -> NearPlane {
    let pixel_w = full.width() / backing.0.max(1) as f32;
    let pixel_h = full.height() / backing.1.max(1) as f32;
    let left = full.left + pixel.0 as f32 * pixel_w;
    let bottom = full.bottom + pixel.1 as f32 * pixel_h;
    NearPlane {
        left,
        right: left + pixel_w,
        bottom,
        top: bottom + pixel_h,
    }
}

/// Right-handed off-axis perspective projection with `[0, 1]` depth, the
/// same convention as [`Mat4::perspective_rh`].
///
/// `rect` is the near-plane rectangle at distance `near`.
pub fn frustum_rh(rect: &NearPlane, near: f32, far: f32) -> Mat4 {
    let width = rect.width();
    let height = rect.height();
    let depth = near - far;
    Mat4::from_cols(
        Vec4::new(2.0 * near / width, 0.0, 0.0, 0.0),
        Vec4::new(0.0, 2.0 * near / height, 0.0, 0.0),
        Vec4::new(
            (rect.right + rect.left) / width,
            (rect.top + rect.bottom) / height,
            far / depth,
            -1.0,
        ),
        Vec4::new(0.0, 0.0, near * far / depth, 0.0),
    )
}

/// Projection whose whole clip volume is the single backing pixel under
/// `pointer`.
pub fn pixel_frustum(
    perspective: &Perspective,
    viewport: &Viewport,
    pointer: (f32, f32),
) -> Mat4 {
    let full = full_near_plane(perspective, viewport.aspect());
    let pixel = pointer_to_backing_pixel(viewport, pointer);
    let rect = pixel_near_plane(&full, viewport.backing, pixel);
    frustum_rh(&rect, perspective.near, perspective.far)
}

#[cfg(test)]
mod tests {
    use glam::{Vec3, Vec4Swizzles};

    use super::*;

    fn perspective() -> Perspective {
        Perspective {
            fovy_radians: 75f32.to_radians(),
            near: 0.1,
            far: 100.0,
        }
    }

    fn viewport(backing: (u32, u32), scale: f32) -> Viewport {
        Viewport {
            backing,
            client: (backing.0 as f32 / scale, backing.1 as f32 / scale),
        }
    }

    fn project(m: Mat4, p: Vec3) -> Vec3 {
        let clip = m * p.extend(1.0);
        clip.xyz() / clip.w
    }

    #[test]
    fn symmetric_frustum_matches_perspective_rh() {
        let p = perspective();
        let aspect = 16.0 / 9.0;
        let full = full_near_plane(&p, aspect);
        let ours = frustum_rh(&full, p.near, p.far);
        let glam_proj =
            Mat4::perspective_rh(p.fovy_radians, aspect, p.near, p.far);
        assert!(ours.abs_diff_eq(glam_proj, 1e-5), "{ours:?} vs {glam_proj:?}");
    }

    #[test]
    fn origin_pointer_maps_to_top_left_pixel() {
        let vp = viewport((800, 600), 1.0);
        assert_eq!(pointer_to_backing_pixel(&vp, (0.0, 0.0)), (0, 599));
    }

    #[test]
    fn far_corner_pointer_maps_near_bottom_right() {
        let vp = viewport((1600, 1200), 2.0);
        let (x, y) = pointer_to_backing_pixel(&vp, (799.0, 599.0));
        assert_eq!(x, 1598);
        assert_eq!(y, 1);
    }

    #[test]
    fn pointer_outside_canvas_is_clamped() {
        let vp = viewport((100, 50), 1.0);
        assert_eq!(pointer_to_backing_pixel(&vp, (-5.0, -5.0)), (0, 49));
        assert_eq!(pointer_to_backing_pixel(&vp, (100.0, 50.0)), (99, 0));
        assert_eq!(pointer_to_backing_pixel(&vp, (1e6, 1e6)), (99, 0));
    }

    #[test]
    fn pixel_rect_area_is_full_area_over_pixel_count() {
        let p = perspective();
        let vp = viewport((320, 240), 1.0);
        let full = full_near_plane(&p, vp.aspect());
        for pointer in [(0.0, 0.0), (160.0, 120.0), (319.0, 239.0)] {
            let pixel = pointer_to_backing_pixel(&vp, pointer);
            let rect = pixel_near_plane(&full, vp.backing, pixel);
            let expected = full.area() / (320.0 * 240.0);
            assert!((rect.area() - expected).abs() < expected * 1e-3);
            assert!(full.contains(&rect, 1e-6));
        }
    }

    #[test]
    fn pixel_rect_center_projects_to_pixel_frustum_center() {
        let p = perspective();
        let vp = viewport((64, 48), 1.0);
        let pointer = (10.3, 7.9);
        let full = full_near_plane(&p, vp.aspect());
        let pixel = pointer_to_backing_pixel(&vp, pointer);
        let rect = pixel_near_plane(&full, vp.backing, pixel);

        // A point on the ray through the pixel center, somewhere mid-frustum.
        let depth = 5.0;
        let scale = depth / p.near;
        let center = Vec3::new(
            (rect.left + rect.right) * 0.5 * scale,
            (rect.top + rect.bottom) * 0.5 * scale,
            -depth,
        );

        let sub = project(pixel_frustum(&p, &vp, pointer), center);
        assert!(sub.x.abs() < 1e-3 && sub.y.abs() < 1e-3, "{sub:?}");

        // The same point through the full projection lands inside that pixel.
        let full_proj =
            Mat4::perspective_rh(p.fovy_radians, vp.aspect(), p.near, p.far);
        let ndc = project(full_proj, center);
        let px = (ndc.x + 1.0) * 0.5 * vp.backing.0 as f32;
        let py = (ndc.y + 1.0) * 0.5 * vp.backing.1 as f32;
        assert_eq!(px.floor() as u32, pixel.0);
        assert_eq!(py.floor() as u32, pixel.1);
    }

    #[test]
    fn pixel_frustum_keeps_depth_range() {
        let p = perspective();
        let vp = viewport((32, 32), 1.0);
        let m = pixel_frustum(&p, &vp, (16.0, 16.0));
        let full = full_near_plane(&p, vp.aspect());
        let rect = pixel_near_plane(
            &full,
            vp.backing,
            pointer_to_backing_pixel(&vp, (16.0, 16.0)),
        );
        let on_near = Vec3::new(
            (rect.left + rect.right) * 0.5,
            (rect.top + rect.bottom) * 0.5,
            -p.near,
        );
        let near_depth = project(m, on_near).z;
        let far_depth = project(m, on_near * (p.far / p.near)).z;
        assert!(near_depth.abs() < 1e-4, "{near_depth}");
        assert!((far_depth - 1.0).abs() < 1e-3, "{far_depth}");
    }
}
