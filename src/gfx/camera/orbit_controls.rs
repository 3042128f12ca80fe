use cgmath::{InnerSpace, Vector3, Zero};
use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use super::{controls::CameraControls, perspective::PerspectiveCamera};

/// Pitch/yaw/distance of the camera around the orbit target
#[derive(Debug, Clone, Copy, PartialEq)]
struct Spherical {
    distance: f32,
    pitch: f32,
    yaw: f32,
}

impl Spherical {
    fn from_offset(offset: Vector3<f32>) -> Self {
        let distance = offset.magnitude().max(f32::EPSILON);
        Self {
            distance,
            pitch: (offset.y / distance).clamp(-1.0, 1.0).asin(),
            yaw: offset.x.atan2(offset.z),
        }
    }

    fn to_offset(self) -> Vector3<f32> {
        Vector3::new(
            self.distance * self.yaw.sin() * self.pitch.cos(),
            self.distance * self.pitch.sin(),
            self.distance * self.yaw.cos() * self.pitch.cos(),
        )
    }
}

/// Orbit camera controls: drag to rotate, shift-drag to pan, wheel to zoom
///
/// The spherical state is taken from the camera on the first
/// [`update`](CameraControls::update) and again after every
/// [`set_target`](CameraControls::set_target).
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub enable_pan: bool,
    /// Spreads each input over several updates
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_pitch: f32,
    pub max_pitch: f32,

    target: Vector3<f32>,
    spherical: Option<Spherical>,
    home: Option<(Vector3<f32>, Spherical)>,

    yaw_delta: f32,
    pitch_delta: f32,
    zoom_delta: f32,
    pan_delta: Vector3<f32>,

    is_mouse_pressed: bool,
    is_shift_held: bool,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            rotate_speed: 0.005,
            zoom_speed: 0.1,
            pan_speed: 0.01,
            enable_pan: true,
            enable_damping: false,
            damping_factor: 0.05,
            min_distance: f32::EPSILON,
            max_distance: f32::MAX,
            min_pitch: -std::f32::consts::FRAC_PI_2 + 0.001,
            max_pitch: std::f32::consts::FRAC_PI_2 - 0.001,
            target: Vector3::zero(),
            spherical: None,
            home: None,
            yaw_delta: 0.0,
            pitch_delta: 0.0,
            zoom_delta: 0.0,
            pan_delta: Vector3::zero(),
            is_mouse_pressed: false,
            is_shift_held: false,
        }
    }
}

impl OrbitControls {
    pub fn new(target: Vector3<f32>) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }

    pub fn rotate(&mut self, yaw: f32, pitch: f32) {
        self.yaw_delta += yaw;
        self.pitch_delta += pitch;
    }

    /// Positive values move the camera away from the target
    pub fn zoom(&mut self, amount: f32) {
        self.zoom_delta += amount;
    }

    /// Pans in the view plane; ignored when `enable_pan` is false
    ///
    /// `dx` moves along the camera's right vector, `dy` along its up vector.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        if !self.enable_pan {
            return;
        }
        let Some(spherical) = self.spherical else {
            return;
        };
        let forward = -spherical.to_offset().normalize();
        let right = forward.cross(Vector3::unit_y());
        if right.magnitude2() < f32::EPSILON {
            return;
        }
        let right = right.normalize();
        let up = right.cross(forward).normalize();
        let scale = spherical.distance * 0.1;
        self.pan_delta += (right * dx + up * dy) * scale;
    }

    /// Returns to the pose captured on the first update
    pub fn reset(&mut self) {
        if let Some((target, spherical)) = self.home {
            self.target = target;
            self.spherical = Some(spherical);
            self.clear_pending();
        }
    }

    pub fn is_panning(&self) -> bool {
        self.enable_pan && self.is_mouse_pressed && self.is_shift_held
    }

    pub fn is_rotating(&self) -> bool {
        self.is_mouse_pressed && !self.is_panning()
    }

    fn clear_pending(&mut self) {
        self.yaw_delta = 0.0;
        self.pitch_delta = 0.0;
        self.zoom_delta = 0.0;
        self.pan_delta = Vector3::zero();
    }

    fn drag(&mut self, dx: f32, dy: f32) {
        if self.is_panning() {
            self.pan(-dx * self.pan_speed, dy * self.pan_speed);
        } else {
            self.rotate(-dx * self.rotate_speed, dy * self.rotate_speed);
        }
    }

    fn scroll(&mut self, delta: &MouseScrollDelta) {
        let amount = -match delta {
            MouseScrollDelta::LineDelta(_, scroll) => *scroll,
            MouseScrollDelta::PixelDelta(PhysicalPosition { y: scroll, .. }) => *scroll as f32,
        };
        self.zoom(amount * self.zoom_speed);
    }

    fn process_key(&mut self, event: &KeyEvent) -> bool {
        match event {
            KeyEvent {
                physical_key: PhysicalKey::Code(KeyCode::KeyR),
                state: ElementState::Pressed,
                ..
            } => {
                log::debug!("Resetting orbit controls");
                self.reset();
                true
            }
            _ => false,
        }
    }
}

impl CameraControls for OrbitControls {
    fn update(&mut self, camera: &mut PerspectiveCamera) {
        let mut spherical = match self.spherical {
            Some(spherical) => spherical,
            None => {
                let spherical = Spherical::from_offset(camera.position - self.target);
                if self.home.is_none() {
                    self.home = Some((self.target, spherical));
                }
                spherical
            }
        };

        let factor = if self.enable_damping {
            self.damping_factor.clamp(0.0, 1.0)
        } else {
            1.0
        };

        spherical.yaw += self.yaw_delta * factor;
        spherical.pitch =
            (spherical.pitch + self.pitch_delta * factor).clamp(self.min_pitch, self.max_pitch);
        let zoom = 1.0 + self.zoom_delta;
        spherical.distance =
            (spherical.distance * zoom.max(0.01)).clamp(self.min_distance, self.max_distance);
        self.target += self.pan_delta * factor;

        self.zoom_delta = 0.0;
        if self.enable_damping {
            let decay = 1.0 - factor;
            self.yaw_delta *= decay;
            self.pitch_delta *= decay;
            self.pan_delta *= decay;
        } else {
            self.yaw_delta = 0.0;
            self.pitch_delta = 0.0;
            self.pan_delta = Vector3::zero();
        }

        self.spherical = Some(spherical);
        camera.target = self.target;
        camera.position = self.target + spherical.to_offset();
    }

    fn target(&self) -> Vector3<f32> {
        self.target
    }

    fn set_target(&mut self, target: Vector3<f32>) {
        self.target = target;
        self.spherical = None;
        self.home = None;
    }

    fn handle_device_event(&mut self, event: &DeviceEvent) -> bool {
        match event {
            DeviceEvent::Button {
                button: 0, // Left Mouse Button
                state,
            } => {
                self.is_mouse_pressed = *state == ElementState::Pressed;
                true
            }
            DeviceEvent::MouseWheel { delta } => {
                self.scroll(delta);
                true
            }
            DeviceEvent::MouseMotion { delta } if self.is_mouse_pressed => {
                self.drag(delta.0 as f32, delta.1 as f32);
                true
            }
            _ => false,
        }
    }

    fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::ModifiersChanged(modifiers) => {
                self.is_shift_held = modifiers.state().shift_key();
                false
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => {
                self.is_mouse_pressed = *state == ElementState::Pressed;
                true
            }
            WindowEvent::KeyboardInput { event, .. } => self.process_key(event),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::{event::Modifiers, keyboard::ModifiersState};

    fn camera_at(x: f32, y: f32, z: f32) -> PerspectiveCamera {
        let mut camera = PerspectiveCamera::with_aspect(1.0);
        camera.set_position(x, y, z);
        camera
    }

    fn press(controls: &mut OrbitControls) {
        controls.handle_device_event(&DeviceEvent::Button {
            button: 0,
            state: ElementState::Pressed,
        });
    }

    #[test]
    fn test_first_update_keeps_pose() {
        let mut camera = camera_at(15.0, 12.0, 8.0);
        let mut controls = OrbitControls::default();
        controls.update(&mut camera);
        assert!((camera.position - Vector3::new(15.0, 12.0, 8.0)).magnitude() < 1e-4);
        assert_eq!(camera.target, Vector3::zero());
    }

    #[test]
    fn test_drag_rotates_at_constant_distance() {
        let mut camera = camera_at(0.0, 0.0, 10.0);
        let mut controls = OrbitControls::default();
        controls.update(&mut camera);

        press(&mut controls);
        controls.handle_device_event(&DeviceEvent::MouseMotion { delta: (100.0, 0.0) });
        controls.update(&mut camera);

        assert!((camera.position.magnitude() - 10.0).abs() < 1e-4);
        assert!(camera.position.x.abs() > 1.0);
    }

    #[test]
    fn test_motion_without_button_is_ignored() {
        let mut controls = OrbitControls::default();
        let consumed =
            controls.handle_device_event(&DeviceEvent::MouseMotion { delta: (50.0, 50.0) });
        assert!(!consumed);
    }

    #[test]
    fn test_pan_disabled() {
        let mut camera = camera_at(0.0, 0.0, 10.0);
        let mut controls = OrbitControls::new(Vector3::new(0.0, 0.5, 0.0));
        controls.enable_pan = false;
        controls.update(&mut camera);

        controls.handle_window_event(&WindowEvent::ModifiersChanged(Modifiers::from(
            ModifiersState::SHIFT,
        )));
        press(&mut controls);
        controls.handle_device_event(&DeviceEvent::MouseMotion { delta: (40.0, 40.0) });
        controls.update(&mut camera);

        assert_eq!(controls.target(), Vector3::new(0.0, 0.5, 0.0));
    }

    #[test]
    fn test_shift_drag_pans_target() {
        let mut camera = camera_at(0.0, 0.0, 10.0);
        let mut controls = OrbitControls::default();
        controls.update(&mut camera);

        controls.handle_window_event(&WindowEvent::ModifiersChanged(Modifiers::from(
            ModifiersState::SHIFT,
        )));
        press(&mut controls);
        assert!(controls.is_panning());
        controls.handle_device_event(&DeviceEvent::MouseMotion { delta: (-10.0, 0.0) });
        controls.update(&mut camera);

        assert!(controls.target().x > 0.0);
        assert_eq!(camera.target, controls.target());
    }

    #[test]
    fn test_damping_spreads_rotation() {
        let mut camera = camera_at(0.0, 0.0, 10.0);
        let mut controls = OrbitControls::default();
        controls.enable_damping = true;
        controls.update(&mut camera);

        controls.rotate(1.0, 0.0);
        controls.update(&mut camera);
        let first = camera.position.x.atan2(camera.position.z);
        assert!((first - 0.05).abs() < 1e-5);

        for _ in 0..200 {
            controls.update(&mut camera);
        }
        let settled = camera.position.x.atan2(camera.position.z);
        assert!(settled > first);
        assert!(settled <= 1.0 + 1e-4);
    }

    #[test]
    fn test_wheel_zooms_out() {
        let mut camera = camera_at(0.0, 0.0, 10.0);
        let mut controls = OrbitControls::default();
        controls.update(&mut camera);
        controls.handle_device_event(&DeviceEvent::MouseWheel {
            delta: MouseScrollDelta::LineDelta(0.0, -1.0),
        });
        controls.update(&mut camera);
        assert!(camera.position.magnitude() > 10.0);
    }

    #[test]
    fn test_reset_restores_initial_pose() {
        let mut camera = camera_at(0.0, 0.0, 10.0);
        let mut controls = OrbitControls::default();
        controls.update(&mut camera);
        controls.rotate(0.7, 0.2);
        controls.update(&mut camera);
        controls.reset();
        controls.update(&mut camera);
        assert!((camera.position - Vector3::new(0.0, 0.0, 10.0)).magnitude() < 1e-4);
    }
}
