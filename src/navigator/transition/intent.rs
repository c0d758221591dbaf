//! Gesture input for the transition state machine.

use crate::mvi::Intent;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One pan-gesture callback, already measured by the gesture recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PanSample {
    pub content_offset: Point,
    pub translation: Point,
    pub velocity: Point,
    pub is_dragging: bool,
}

impl PanSample {
    /// Vertical-only sample, the only axis the dismiss transition reads.
    pub const fn vertical(offset_y: f64, translation_y: f64, velocity_y: f64, is_dragging: bool) -> Self {
        Self {
            content_offset: Point::new(0.0, offset_y),
            translation: Point::new(0.0, translation_y),
            velocity: Point::new(0.0, velocity_y),
            is_dragging,
        }
    }

    /// Content pulled down past its top.
    pub fn is_overscrolled(&self) -> bool {
        self.content_offset.y <= 0.0 && self.translation.y > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionIntent {
    Pan {
        sample: PanSample,
        /// Translation mapped to full progress.
        dismiss_distance: f64,
    },
}

impl Intent for TransitionIntent {}
