use cgmath::Vector3;
use winit::event::{DeviceEvent, WindowEvent};

use super::perspective::PerspectiveCamera;

/// Input-driven camera manipulation bound to a render context
///
/// Input hooks only record intent. The camera itself is moved in
/// [`update`](CameraControls::update), called once per tick.
pub trait CameraControls {
    /// Applies pending input (and damping) to the camera
    fn update(&mut self, camera: &mut PerspectiveCamera);

    /// Point the camera orbits around
    fn target(&self) -> Vector3<f32>;

    fn set_target(&mut self, target: Vector3<f32>);

    /// Returns true if the event was consumed
    fn handle_device_event(&mut self, _event: &DeviceEvent) -> bool {
        false
    }

    /// Returns true if the event was consumed
    fn handle_window_event(&mut self, _event: &WindowEvent) -> bool {
        false
    }
}
