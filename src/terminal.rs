// SPDX-License-Identifier: GPL-3.0-only

//! Terminal-based viewfinder
//!
//! Renders the virtual camera feed with the active overlay to the terminal
//! using Unicode half-block characters for improved vertical resolution.
//! Keyboard and mouse input drive the same [`SessionController`] a graphical
//! front end would.

use crate::app::{Collaborators, Message, Notice, NoticeLevel, SessionController, Snapshot};
use crate::backends::permissions::DesktopPermissions;
use crate::backends::virtual_camera::{Faults, VirtualCamera};
use crate::capture::SessionState;
use crate::config::Config;
use crate::constants::app_info;
use crate::constants::virtual_camera::{FRAME_INTERVAL, PORTRAIT_HEIGHT, PORTRAIT_WIDTH};
use crate::gesture::GestureEvent;
use crate::storage::GalleryStore;

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use image::RgbaImage;
use kurbo::{Point, Size};
use ratatui::{
    Terminal, backend::CrosstermBackend, buffer::Buffer, layout::Rect, style::Color,
    style::Style, widgets::Widget,
};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;

/// How long a notice stays in the status area
const NOTICE_DURATION: Duration = Duration::from_secs(4);

/// Drag distance per arrow key press
const DRAG_STEP: f64 = 10.0;

/// Pinch scale factor per +/- key press
const PINCH_STEP: f64 = 1.1;

/// Simulated device conditions for a terminal session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceSimulation {
    /// Report that no camera is present
    pub unavailable: bool,
    pub faults: Faults,
}

impl DeviceSimulation {
    fn apply(&self, camera: &VirtualCamera) {
        camera.set_available(!self.unavailable);
        camera.set_faults(self.faults);
        if *self != Self::default() {
            info!(simulation = ?self, "Simulating device conditions");
        }
    }
}

/// Run the terminal viewfinder
pub fn run(
    config_path: Option<PathBuf>,
    simulation: DeviceSimulation,
) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let guard = runtime.enter();

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let result = run_app(&mut terminal, config_path, simulation);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    drop(guard);
    runtime.shutdown_timeout(Duration::from_secs(1));
    result
}

/// Gesture input accumulated from key presses
#[derive(Debug, Default)]
struct KeyGestures {
    drag: Option<f64>,
    pinch: Option<f64>,
}

impl KeyGestures {
    fn drag(&mut self, delta: f64) -> GestureEvent {
        let translation = self.drag.unwrap_or(0.0) + delta;
        self.drag = Some(translation);
        GestureEvent::DragUpdate(translation)
    }

    fn pinch(&mut self, factor: f64) -> GestureEvent {
        let scale = self.pinch.unwrap_or(1.0) * factor;
        self.pinch = Some(scale);
        GestureEvent::PinchUpdate(scale)
    }

    /// End events for every gesture in progress
    fn end(&mut self) -> Vec<GestureEvent> {
        let mut events = Vec::new();
        if self.drag.take().is_some() {
            events.push(GestureEvent::DragEnd);
        }
        if self.pinch.take().is_some() {
            events.push(GestureEvent::PinchEnd);
        }
        events
    }
}

struct Viewer {
    session: SessionController,
    receiver: UnboundedReceiver<Message>,
    camera: Arc<VirtualCamera>,
    gestures: KeyGestures,
    /// Terminals report no key release, so the capture button toggles
    button_held: bool,
    show_help: bool,
    notice: Option<(Notice, Instant)>,
    /// Where the frame was drawn last, for mapping mouse input
    frame_area: Rect,
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config_path: Option<PathBuf>,
    simulation: DeviceSimulation,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut viewer = Viewer::new(config_path, simulation);
    let mut frame_widget = FrameWidget::new();

    loop {
        viewer.pump();

        let mut frame = viewer.camera.current_frame();
        viewer.session.render_overlay(&mut frame);
        frame_widget.update_frame(frame);

        let snapshot = viewer.session.snapshot();
        let status = viewer.status_line(&snapshot);
        let notice = viewer.current_notice();
        let mut frame_area = viewer.frame_area;

        terminal.draw(|f| {
            let area = f.area();

            // Reserve bottom lines for notices and status
            let camera_area = Rect {
                x: area.x,
                y: area.y,
                width: area.width,
                height: area.height.saturating_sub(2),
            };
            frame_area = fit_frame(camera_area, PORTRAIT_WIDTH, PORTRAIT_HEIGHT);
            f.render_widget(&frame_widget, camera_area);

            let notice_area = Rect {
                x: area.x,
                y: area.height.saturating_sub(2),
                width: area.width,
                height: 1,
            };
            if let Some(notice) = &notice {
                f.render_widget(NoticeBar { notice }, notice_area);
            }

            let status_area = Rect {
                x: area.x,
                y: area.height.saturating_sub(1),
                width: area.width,
                height: 1,
            };
            f.render_widget(StatusBar { message: &status }, status_area);
        })?;
        viewer.frame_area = frame_area;

        // Handle input with timeout for frame updates
        if event::poll(FRAME_INTERVAL)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if !viewer.handle_key(key) {
                        break;
                    }
                }
                Event::Mouse(mouse) => viewer.handle_mouse(mouse),
                _ => {}
            }
        }
    }

    viewer.session.dispatch(Message::Teardown);
    info!("Terminal viewer closed");
    Ok(())
}

impl Viewer {
    fn new(config_path: Option<PathBuf>, simulation: DeviceSimulation) -> Self {
        let config = config_path
            .as_deref()
            .map(Config::load_or_default)
            .unwrap_or_default();
        let gallery_dir = config.gallery_directory();
        let capture_dir = dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(app_info::APP_ID)
            .join("captures");

        let camera = Arc::new(
            VirtualCamera::new(capture_dir).with_frame_size(PORTRAIT_WIDTH, PORTRAIT_HEIGHT),
        );
        simulation.apply(&camera);
        let collaborators = Collaborators {
            device: camera.clone(),
            permissions: Arc::new(DesktopPermissions::new(gallery_dir.clone())),
            store: Arc::new(GalleryStore::new(gallery_dir)),
        };
        let viewport = Size::new(PORTRAIT_WIDTH as f64, PORTRAIT_HEIGHT as f64);
        let (session, receiver) = SessionController::new(collaborators, config, viewport);
        let session = match config_path {
            Some(path) => session.with_config_path(path),
            None => session,
        };

        Self {
            session,
            receiver,
            camera,
            gestures: KeyGestures::default(),
            button_held: false,
            show_help: false,
            notice: None,
            frame_area: Rect::default(),
        }
    }

    /// Deliver async results, frame events and notices
    fn pump(&mut self) {
        while let Ok(message) = self.receiver.try_recv() {
            self.session.dispatch(message);
        }

        if self.session.wants_animation_frames() {
            self.session.dispatch(Message::AnimationFrame(Instant::now()));
        }

        if let Some(notice) = self.session.drain_notices().pop() {
            self.notice = Some((notice, Instant::now()));
        }

        // A failed or finished recording leaves nothing to release
        if self.button_held && self.session.snapshot().session_state == SessionState::Idle {
            self.button_held = false;
        }
    }

    fn current_notice(&self) -> Option<Notice> {
        self.notice
            .as_ref()
            .filter(|(_, shown)| shown.elapsed() < NOTICE_DURATION)
            .map(|(notice, _)| notice.clone())
    }

    /// Returns false when the viewer should quit
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        // Ctrl+C to quit
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return false;
        }

        let message = match key.code {
            KeyCode::Char('q') => return false,
            KeyCode::Char(' ') => {
                self.button_held = !self.button_held;
                if self.button_held {
                    Message::CaptureButtonPressed
                } else {
                    Message::CaptureButtonReleased
                }
            }
            KeyCode::Char('m') => Message::ToggleCaptureMode,
            KeyCode::Char('f') => Message::ToggleFlash,
            KeyCode::Char('c') => Message::ToggleCamera,
            KeyCode::Char('e') | KeyCode::Right => Message::NextEffect,
            KeyCode::Char('E') | KeyCode::Left => Message::PreviousEffect,
            KeyCode::Char('p') => Message::ToggleFiltersPanel,
            KeyCode::Char('g') => Message::OpenGallery,
            KeyCode::Up => Message::Gesture(self.gestures.drag(-DRAG_STEP)),
            KeyCode::Down => Message::Gesture(self.gestures.drag(DRAG_STEP)),
            KeyCode::Char('+') | KeyCode::Char('=') => {
                Message::Gesture(self.gestures.pinch(PINCH_STEP))
            }
            KeyCode::Char('-') => Message::Gesture(self.gestures.pinch(1.0 / PINCH_STEP)),
            KeyCode::Enter => {
                for event in self.gestures.end() {
                    self.session.dispatch(Message::Gesture(event));
                }
                return true;
            }
            KeyCode::Char('h') => {
                self.show_help = !self.show_help;
                return true;
            }
            _ => return true,
        };

        self.session.dispatch(message);
        true
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let Some(point) = viewport_point(self.frame_area, mouse.column, mouse.row) else {
            return;
        };
        let message = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => Message::PointerDown(point),
            MouseEventKind::Drag(MouseButton::Left) => Message::PointerMoved(point),
            MouseEventKind::Up(MouseButton::Left) => Message::PointerUp,
            _ => return,
        };
        self.session.dispatch(message);
    }

    fn status_line(&self, snapshot: &Snapshot) -> String {
        if self.show_help {
            return build_help_message();
        }

        let mut parts = vec![
            format!("[{}]", snapshot.capture_mode),
            snapshot.zoom_label.clone(),
            format!("{} {:?}", snapshot.flash_mode.icon(), snapshot.flash_mode),
            format!("{:?}", snapshot.camera_position),
        ];
        if let Some(label) = &snapshot.active_effect_label {
            parts.push(label.clone());
        }
        match snapshot.session_state {
            SessionState::Recording => {
                let dot = if snapshot.recording_indicator_opacity > 0.5 {
                    "●"
                } else {
                    "○"
                };
                parts.push(format!("{} REC {}", dot, snapshot.recording_time));
            }
            SessionState::Capturing => parts.push("Capturing...".to_string()),
            SessionState::Idle => {}
        }
        if !snapshot.capture_enabled {
            parts.push("capture unavailable".to_string());
        }
        if let Some(last) = &snapshot.last_result {
            parts.push(format!("last: {}", last));
        }
        parts.push("'h' help".to_string());
        parts.join(" | ")
    }
}

fn build_help_message() -> String {
    [
        "space: capture/hold",
        "m: mode",
        "f: flash",
        "c: camera",
        "e/E: effect",
        "up/down: drag zoom",
        "+/-: pinch zoom",
        "enter: end gesture",
        "mouse: draw (Sepia)",
        "g: gallery",
        "h: help",
        "q: quit",
    ]
    .join(" | ")
}

/// Largest aspect-preserving rectangle for a frame inside `area`
///
/// Each terminal cell displays 2 vertical pixels using half-block characters.
fn fit_frame(area: Rect, width: u32, height: u32) -> Rect {
    if width == 0 || height == 0 || area.width == 0 || area.height == 0 {
        return Rect::default();
    }
    let frame_aspect = width as f64 / height as f64;
    let term_width = area.width as f64;
    let term_height = (area.height * 2) as f64;

    let (display_width, display_height) = if term_width / term_height > frame_aspect {
        // Terminal is wider - fit to height
        let w = term_height * frame_aspect;
        (w as u16, area.height)
    } else {
        // Terminal is taller - fit to width
        let h = term_width / frame_aspect;
        (area.width, (h / 2.0) as u16)
    };

    Rect {
        x: area.x + area.width.saturating_sub(display_width) / 2,
        y: area.y + area.height.saturating_sub(display_height) / 2,
        width: display_width.max(1),
        height: display_height.max(1),
    }
}

/// Map a terminal cell to overlay coordinates
fn viewport_point(frame_area: Rect, column: u16, row: u16) -> Option<Point> {
    if frame_area.width == 0
        || frame_area.height == 0
        || column < frame_area.x
        || row < frame_area.y
        || column >= frame_area.x + frame_area.width
        || row >= frame_area.y + frame_area.height
    {
        return None;
    }
    let fx = (column - frame_area.x) as f64 + 0.5;
    let fy = (row - frame_area.y) as f64 + 0.5;
    Some(Point::new(
        fx / frame_area.width as f64 * PORTRAIT_WIDTH as f64,
        fy / frame_area.height as f64 * PORTRAIT_HEIGHT as f64,
    ))
}

/// Widget that renders a composited frame using half-block characters
struct FrameWidget {
    frame: Option<RgbaImage>,
}

impl FrameWidget {
    fn new() -> Self {
        Self { frame: None }
    }

    fn update_frame(&mut self, frame: RgbaImage) {
        self.frame = Some(frame);
    }
}

impl Widget for &FrameWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(frame) = &self.frame else {
            // No frame yet - show placeholder
            let msg = "Waiting for camera...";
            let x = area.x + (area.width.saturating_sub(msg.len() as u16)) / 2;
            let y = area.y + area.height / 2;
            if y < area.y + area.height && x < area.x + area.width {
                buf.set_string(x, y, msg, Style::default());
            }
            return;
        };

        let target = fit_frame(area, frame.width(), frame.height());
        if target.width == 0 || target.height == 0 {
            return;
        }

        // Scale factors
        let x_scale = frame.width() as f64 / target.width as f64;
        let y_scale = frame.height() as f64 / (target.height * 2) as f64;

        // Upper half (▀) colored with fg, lower half with bg
        for ty in 0..target.height {
            for tx in 0..target.width {
                let src_x = (tx as f64 * x_scale) as u32;
                let src_y_top = (ty as f64 * 2.0 * y_scale) as u32;
                let src_y_bottom = ((ty as f64 * 2.0 + 1.0) * y_scale) as u32;

                if let Some(cell) = buf.cell_mut((target.x + tx, target.y + ty)) {
                    cell.set_char('▀');
                    cell.set_fg(sample_pixel(frame, src_x, src_y_top));
                    cell.set_bg(sample_pixel(frame, src_x, src_y_bottom));
                }
            }
        }
    }
}

fn sample_pixel(frame: &RgbaImage, x: u32, y: u32) -> Color {
    let x = x.min(frame.width().saturating_sub(1));
    let y = y.min(frame.height().saturating_sub(1));
    let [r, g, b, _] = frame.get_pixel(x, y).0;
    Color::Rgb(r, g, b)
}

/// Status bar widget
struct StatusBar<'a> {
    message: &'a str,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        fill_line(area, buf, Color::DarkGray);
        buf.set_stringn(
            area.x,
            area.y,
            self.message,
            area.width as usize,
            Style::default().fg(Color::White).bg(Color::DarkGray),
        );
    }
}

/// Transient notice line
struct NoticeBar<'a> {
    notice: &'a Notice,
}

impl Widget for NoticeBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let background = match self.notice.level {
            NoticeLevel::Info => Color::Blue,
            NoticeLevel::Success => Color::Green,
            NoticeLevel::Error => Color::Red,
        };
        fill_line(area, buf, background);
        let text = format!("{}: {}", self.notice.title, self.notice.message);
        buf.set_stringn(
            area.x,
            area.y,
            text,
            area.width as usize,
            Style::default().fg(Color::White).bg(background),
        );
    }
}

fn fill_line(area: Rect, buf: &mut Buffer, background: Color) {
    for x in area.x..area.x + area.width {
        if let Some(cell) = buf.cell_mut((x, area.y)) {
            cell.set_char(' ');
            cell.set_bg(background);
        }
    }
}
