//! Turns terminal mouse reports into drag gesture events.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    Started,
    /// Cumulative horizontal translation since `Started`, in columns.
    Changed { delta_x: f64 },
    Ended,
    /// The gesture was interrupted (focus loss and the like).
    Cancelled,
}

/// Tracks one left-button drag that began on the thumb.
#[derive(Debug, Default, Clone)]
pub struct GestureRecognizer {
    origin_column: Option<u16>,
}

impl GestureRecognizer {
    pub fn is_tracking(&self) -> bool {
        self.origin_column.is_some()
    }

    /// `on_thumb` says whether the event position hits the thumb.
    pub fn handle(&mut self, event: &MouseEvent, on_thumb: bool) -> Vec<GestureEvent> {
        match (event.kind, self.origin_column) {
            (MouseEventKind::Down(MouseButton::Left), None) if on_thumb => {
                self.origin_column = Some(event.column);
                // A zero-distance drag reports its first change immediately.
                vec![GestureEvent::Started, GestureEvent::Changed { delta_x: 0.0 }]
            }
            (MouseEventKind::Drag(MouseButton::Left), Some(origin)) => {
                let delta_x = event.column as f64 - origin as f64;
                vec![GestureEvent::Changed { delta_x }]
            }
            (MouseEventKind::Up(MouseButton::Left), Some(_)) => {
                self.origin_column = None;
                vec![GestureEvent::Ended]
            }
            _ => Vec::new(),
        }
    }

    pub fn cancel(&mut self) -> Option<GestureEvent> {
        self.origin_column.take().map(|_| GestureEvent::Cancelled)
    }
}
