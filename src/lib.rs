//! A horizontal slider whose track is a rounded gradient bar and whose thumb
//! is an image that grows while dragged, rendered with ratatui.
//!
//! The drag arithmetic ([`drag`], [`geometry`]) and the draw description
//! ([`frame`]) are pure; [`ImageSlider`] owns the runtime state and talks to
//! its caller through a two-way [`Binding`].

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Instant;

use color_eyre::Result;
use crossterm::event;
use crossterm::event::{Event, KeyCode, KeyEventKind, MouseEvent};
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Paragraph};
use ratatui::{DefaultTerminal, Frame};

pub mod binding;
pub mod config;
pub mod drag;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod gesture;
pub mod gradient;
pub mod haptics;
pub mod logging;
pub mod slider;
pub mod thumb;
mod widget;

pub use binding::{Binding, SubscriptionId};
pub use config::{SliderConfiguration, SliderSpec};
pub use drag::AnchorPolicy;
pub use error::{InvalidConfiguration, SliderError};
pub use gradient::Rgba;
pub use slider::ImageSlider;
pub use thumb::ThumbImage;

const HISTORY_LEN: usize = 8;

/// Demo host: one slider, its value, and the values it has reported.
pub struct App {
    slider: ImageSlider,
    value: Binding<f64>,
    history: Rc<RefCell<VecDeque<f64>>>,
    rows: u16,
    should_quit: bool,
}

impl App {
    pub fn new(slider: ImageSlider, rows: u16) -> Self {
        let value = slider.binding().clone();
        let history = Rc::new(RefCell::new(VecDeque::with_capacity(HISTORY_LEN)));
        let sink = Rc::clone(&history);
        value.subscribe(move |v: f64| {
            let mut history = sink.borrow_mut();
            // Drags report on every column; only keep distinct steps.
            if history.back() != Some(&v) {
                if history.len() == HISTORY_LEN {
                    history.pop_front();
                }
                history.push_back(v);
            }
        });
        Self {
            slider,
            value,
            history,
            rows: rows.max(1),
            should_quit: false,
        }
    }

    pub fn slider(&self) -> &ImageSlider {
        &self.slider
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    fn get_event(&self) -> Result<Option<Event>> {
        if event::poll(core::time::Duration::from_millis(10))? {
            // It's guaranteed that the `read()` won't block when the `poll()`
            // function returns `true`
            Ok(Some(event::read()?))
        } else {
            Ok(None)
        }
    }

    fn process_event(&self, event: Option<Event>) -> Action {
        match event {
            Some(Event::Key(key)) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Action::Quit,
                KeyCode::Char('r') => Action::ResetValue,
                _ => Action::None,
            },
            Some(Event::Mouse(mouse)) => Action::Mouse(mouse),
            Some(Event::FocusLost) => Action::CancelGesture,
            _ => Action::None,
        }
    }

    fn process_action(&mut self, action: Action, now: Instant) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Mouse(mouse) => {
                self.slider.handle_mouse(&mouse, now);
            }
            Action::CancelGesture => self.slider.cancel_gesture(now),
            Action::ResetValue => {
                let lower = self.slider.configuration().lower();
                tracing::info!(value = lower, "reset from host");
                self.value.set(lower);
            }
            Action::None => (),
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        let bg_color = Color::Rgb(25, 50, 50);
        let fg_color = Color::Rgb(255, 123, 0);

        let screen_block = Block::bordered()
            .title("Image Slider")
            .style(Style::default().fg(fg_color).bg(bg_color));
        let inner = screen_block.inner(frame.area());
        frame.render_widget(screen_block, frame.area());

        let [_, slider_row, _, value_row, history_row, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(self.rows),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(inner);
        let [_, slider_area, _] = Layout::horizontal([
            Constraint::Length(4),
            Constraint::Fill(1),
            Constraint::Length(4),
        ])
        .areas(slider_row);

        frame.render_widget(&mut self.slider, slider_area);

        let status = format!(
            "value: {}    drag the thumb · r: reset · q: quit",
            self.value.get()
        );
        frame.render_widget(Paragraph::new(status).centered(), value_row);

        let history = self
            .history
            .borrow()
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" → ");
        frame.render_widget(Paragraph::new(history).centered(), history_row);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Action {
    Quit,
    Mouse(MouseEvent),
    CancelGesture,
    ResetValue,
    None,
}

pub fn run(app: &mut App, mut terminal: DefaultTerminal) -> Result<()> {
    loop {
        terminal.draw(|frame| app.draw(frame))?;

        let event = app.get_event()?;
        let action = app.process_event(event);
        app.process_action(action, Instant::now());

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

/// Run `session`, then `teardown` whether or not the session failed. The
/// session's error wins over a teardown error.
pub fn with_teardown<T>(
    session: impl FnOnce() -> Result<T>,
    teardown: impl FnOnce() -> Result<()>,
) -> Result<T> {
    let result = session();
    let restored = teardown();
    let value = result?;
    restored?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers, MouseButton, MouseEventKind};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn app() -> App {
        let spec = SliderSpec::default();
        let value = Binding::new(spec.initial_value());
        let slider = ImageSlider::new(value, spec.into_configuration().unwrap());
        App::new(slider, 2)
    }

    fn key(code: KeyCode) -> Option<Event> {
        Some(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    #[test]
    fn keys_map_to_host_actions() {
        let app = app();
        assert_eq!(app.process_event(key(KeyCode::Char('q'))), Action::Quit);
        assert_eq!(app.process_event(key(KeyCode::Esc)), Action::Quit);
        assert_eq!(app.process_event(key(KeyCode::Char('r'))), Action::ResetValue);
        assert_eq!(app.process_event(key(KeyCode::Left)), Action::None);
        assert_eq!(app.process_event(Some(Event::FocusLost)), Action::CancelGesture);
        assert_eq!(app.process_event(None), Action::None);
    }

    #[test]
    fn drag_through_the_terminal_updates_value_and_history() {
        let mut app = app();
        let mut terminal = Terminal::new(TestBackend::new(60, 10)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();

        let thumb = app.slider().thumb_area().unwrap();
        let mouse = |kind, column| MouseEvent {
            kind,
            column,
            row: thumb.y,
            modifiers: KeyModifiers::NONE,
        };
        let now = Instant::now();
        app.process_action(
            Action::Mouse(mouse(MouseEventKind::Down(MouseButton::Left), thumb.x)),
            now,
        );
        app.process_action(
            Action::Mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 59)),
            now,
        );
        app.process_action(
            Action::Mouse(mouse(MouseEventKind::Up(MouseButton::Left), 59)),
            now,
        );
        assert_eq!(app.value.get(), 91.0);
        assert_eq!(app.history.borrow().back(), Some(&91.0));

        app.process_action(Action::ResetValue, now);
        assert_eq!(app.value.get(), 1.0);
        terminal.draw(|frame| app.draw(frame)).unwrap();
        assert_eq!(app.slider().thumb_offset(), 0.0);
    }

    #[test]
    fn quit_action_stops_the_loop() {
        let mut app = app();
        app.process_action(Action::Quit, Instant::now());
        assert!(app.should_quit());
    }

    #[test]
    fn teardown_runs_when_the_session_fails() {
        let restored = std::cell::Cell::new(false);
        let result: Result<()> = with_teardown(
            || Err(color_eyre::eyre::eyre!("mouse capture refused")),
            || {
                restored.set(true);
                Ok(())
            },
        );
        assert!(restored.get());
        assert_eq!(result.unwrap_err().to_string(), "mouse capture refused");
    }

    #[test]
    fn teardown_error_surfaces_after_a_clean_session() {
        let result = with_teardown(|| Ok(3), || Err(color_eyre::eyre::eyre!("restore failed")));
        assert_eq!(result.unwrap_err().to_string(), "restore failed");
        assert_eq!(with_teardown(|| Ok(3), || Ok(())).unwrap(), 3);
    }
}
