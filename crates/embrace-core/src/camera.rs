//! Camera description and the viewport responder that keeps it in sync with
//! the host container.
//!
//! Framing is fixed: on resize the camera only takes the new aspect ratio and
//! looks back at the scene's focal point. Nothing is ever auto-fit to the
//! scene's bounds.

use crate::constants::*;
use crate::resources::RenderBackend;
use glam::{Mat4, Vec3};

/// Anything the engine can be mounted into. `None` means the container is
/// detached (or otherwise has no layout).
pub trait HostContainer {
    fn pixel_size(&self) -> Option<(u32, u32)>;
}

/// Fixed-size container, used by hosts without a layout engine and by tests.
impl HostContainer for (u32, u32) {
    fn pixel_size(&self) -> Option<(u32, u32)> {
        Some(*self)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Reject missing or degenerate sizes.
    pub fn from_size(size: Option<(u32, u32)>) -> Option<Self> {
        match size {
            Some((width, height)) if width > 0 && height > 0 => Some(Self { width, height }),
            _ => None,
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// The scene's fixed framing at the given aspect ratio.
    pub fn framing(aspect: f32) -> Self {
        Self {
            eye: CAMERA_EYE,
            target: CAMERA_FOCAL_POINT,
            up: Vec3::Y,
            aspect,
            fovy_radians: CAMERA_FOVY_DEG.to_radians(),
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    /// Look back at the fixed focal point without moving the eye.
    pub fn recenter(&mut self) {
        self.target = CAMERA_FOCAL_POINT;
        self.up = Vec3::Y;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizeOutcome {
    /// Container detached or zero-sized; nothing touched.
    Ignored,
    /// Same dimensions as last time; nothing touched.
    Unchanged,
    Resized(Viewport),
}

/// Tracks the last applied viewport so repeated resize notifications with the
/// same dimensions are free.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewportResponder {
    current: Viewport,
}

impl ViewportResponder {
    pub fn new(initial: Viewport) -> Self {
        Self { current: initial }
    }

    pub fn current(&self) -> Viewport {
        self.current
    }

    pub fn on_resize<B: RenderBackend + ?Sized>(
        &mut self,
        container: &dyn HostContainer,
        camera: &mut Camera,
        backend: &mut B,
    ) -> ResizeOutcome {
        let Some(viewport) = Viewport::from_size(container.pixel_size()) else {
            log::debug!("[resize] container detached or empty; ignoring");
            return ResizeOutcome::Ignored;
        };
        if viewport == self.current {
            return ResizeOutcome::Unchanged;
        }
        self.current = viewport;
        camera.set_aspect(viewport.aspect());
        backend.resize(viewport);
        camera.recenter();
        log::info!("[resize] {}x{}", viewport.width, viewport.height);
        ResizeOutcome::Resized(viewport)
    }
}
