use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use crate::display::domain::frame_display::{FrameDisplay, KeyPress};
use crate::shared::frame::Frame;
use crate::shared::DynError;

use super::frame_renderer::FrameRenderer;

/// A native window showing frames at their own resolution.
///
/// The event loop is pumped rather than run, so the caller keeps control of
/// the thread and events are only processed inside `show` and `poll_key`.
/// The window itself appears with the first frame, sized to fit it.
/// Must be used from the main thread.
pub struct WindowDisplay {
    event_loop: Option<EventLoop<()>>,
    state: WindowState,
}

impl WindowDisplay {
    pub fn new() -> Self {
        Self {
            event_loop: None,
            state: WindowState::default(),
        }
    }

    fn pump(&mut self, timeout: Duration) {
        let Some(event_loop) = self.event_loop.as_mut() else {
            std::thread::sleep(timeout);
            return;
        };
        if let PumpStatus::Exit(_) = event_loop.pump_app_events(Some(timeout), &mut self.state) {
            self.state.release_window();
        }
    }
}

impl Default for WindowDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDisplay for WindowDisplay {
    fn open(&mut self, title: &str) -> Result<(), DynError> {
        if self.event_loop.is_none() {
            let event_loop =
                EventLoop::new().map_err(|e| format!("cannot start window system: {e}"))?;
            self.event_loop = Some(event_loop);
        }
        self.state = WindowState {
            title: title.to_string(),
            ..WindowState::default()
        };
        log::debug!("Display '{title}' opened");
        Ok(())
    }

    fn show(&mut self, frame: &Frame) -> Result<(), DynError> {
        if !self.is_open() {
            return Err("display is not open".into());
        }
        if frame.is_empty() {
            return Ok(());
        }

        let size = PhysicalSize::new(frame.width(), frame.height());
        if self.state.requested_size != Some(size) {
            self.state.requested_size = Some(size);
            if let Some(window) = &self.state.window {
                let _ = window.request_inner_size(size);
            }
        }
        if self.state.window.is_none() {
            self.pump(Duration::ZERO);
        }
        if let Some(err) = self.state.error.take() {
            return Err(err.into());
        }

        let Some(renderer) = self.state.renderer.as_mut() else {
            return Err("window could not be created".into());
        };
        renderer.upload(frame);
        renderer.render()
    }

    fn poll_key(&mut self, timeout: Duration) -> Option<KeyPress> {
        self.pump(timeout);
        self.state.keys.pop_front()
    }

    fn is_open(&self) -> bool {
        self.event_loop.is_some() && !self.state.closed
    }

    fn close(&mut self) {
        if self.state.closed {
            return;
        }
        self.state.release_window();
        // Let the platform process the window teardown.
        self.pump(Duration::ZERO);
        log::debug!("Display '{}' closed", self.state.title);
    }
}

#[derive(Default)]
struct WindowState {
    title: String,
    requested_size: Option<PhysicalSize<u32>>,
    window: Option<Arc<Window>>,
    renderer: Option<FrameRenderer>,
    keys: VecDeque<KeyPress>,
    closed: bool,
    error: Option<String>,
}

impl WindowState {
    fn ensure_window(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.closed || self.error.is_some() {
            return;
        }
        let Some(size) = self.requested_size else {
            return;
        };

        let attributes = Window::default_attributes()
            .with_title(self.title.clone())
            .with_resizable(false)
            .with_inner_size(size);
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.error = Some(format!("cannot create window: {e}"));
                return;
            }
        };
        match FrameRenderer::new(window.clone()) {
            Ok(renderer) => {
                self.renderer = Some(renderer);
                self.window = Some(window);
            }
            Err(e) => self.error = Some(format!("cannot initialise renderer: {e}")),
        }
    }

    /// Renderer first: its surface must not outlive the window.
    fn release_window(&mut self) {
        self.renderer = None;
        self.window = None;
        self.closed = true;
    }
}

impl ApplicationHandler for WindowState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.ensure_window(event_loop);
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => self.release_window(),
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed && !event.repeat =>
            {
                if let Some(key) = key_press(&event.logical_key) {
                    self.keys.push_back(key);
                }
            }
            WindowEvent::Resized(size) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(size.width, size.height);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.ensure_window(event_loop);
    }
}

fn key_press(key: &Key) -> Option<KeyPress> {
    match key {
        Key::Named(NamedKey::Escape) => Some(KeyPress::Escape),
        Key::Character(text) => text.chars().next().map(KeyPress::Char),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::escape(Key::Named(NamedKey::Escape), Some(KeyPress::Escape))]
    #[case::q(Key::Character("q".into()), Some(KeyPress::Char('q')))]
    #[case::shifted_q(Key::Character("Q".into()), Some(KeyPress::Char('Q')))]
    #[case::enter(Key::Named(NamedKey::Enter), None)]
    fn test_key_press_mapping(#[case] key: Key, #[case] expected: Option<KeyPress>) {
        assert_eq!(key_press(&key), expected);
    }

    #[test]
    fn test_unopened_display_is_closed() {
        let mut display = WindowDisplay::new();
        assert!(!display.is_open());
        let frame = Frame::new(vec![0; 12], 2, 2, 3, 0);
        assert!(display.show(&frame).is_err());
        display.close();
        assert!(!display.is_open());
    }
}
