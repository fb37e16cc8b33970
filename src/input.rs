//! Per-frame input supplied by the host and the press/drag/click detection
//! derived from it.

use crate::geometry::{Point, Rect};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Buttons {
    pub left: bool,
    pub middle: bool,
    pub right: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

/// Raw input for one frame, in screen coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    pub pointer: Point,
    pub buttons: Buttons,
    pub modifiers: Modifiers,
    /// Scroll wheel ticks this frame; positive zooms in
    pub scroll: f64,
    /// Area the canvas occupies on screen
    pub canvas: Rect,
}

impl FrameInput {
    pub fn new(canvas: Rect) -> Self {
        Self { canvas, ..Self::default() }
    }

    pub fn at(mut self, pointer: Point) -> Self {
        self.pointer = pointer;
        self
    }

    pub fn with_left(mut self, down: bool) -> Self {
        self.buttons.left = down;
        self
    }

    pub fn with_middle(mut self, down: bool) -> Self {
        self.buttons.middle = down;
        self
    }

    pub fn with_ctrl(mut self, down: bool) -> Self {
        self.modifiers.ctrl = down;
        self
    }

    pub fn with_alt(mut self, down: bool) -> Self {
        self.modifiers.alt = down;
        self
    }

    pub fn with_shift(mut self, down: bool) -> Self {
        self.modifiers.shift = down;
        self
    }

    pub fn with_scroll(mut self, ticks: f64) -> Self {
        self.scroll = ticks;
        self
    }

    pub fn pointer_over_canvas(&self) -> bool {
        self.canvas.contains(self.pointer)
    }
}

/// Pointer events derived from two consecutive frames.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerFrame {
    /// Pointer movement since the previous frame (screen px)
    pub delta: Point,
    pub left_pressed: bool,
    pub left_released: bool,
    /// Left button travelled past the drag threshold this frame
    pub drag_started: bool,
    /// A left drag is in progress (including the frame it started)
    pub dragging: bool,
    /// Left button released this frame ending a drag
    pub drag_ended: bool,
    /// Left button released this frame without a drag
    pub clicked: bool,
    /// Screen position where the left button went down
    pub press_origin: Option<Point>,
}

/// Turns raw button state into press, drag and click events.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    prev_pointer: Option<Point>,
    prev_left: bool,
    press_origin: Option<Point>,
    dragging: bool,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn update(&mut self, input: &FrameInput, drag_threshold: f64) -> PointerFrame {
        let pointer = input.pointer;
        let left = input.buttons.left;
        let mut frame = PointerFrame {
            delta: self.prev_pointer.map_or(Point::ZERO, |prev| pointer - prev),
            ..PointerFrame::default()
        };

        if left && !self.prev_left {
            frame.left_pressed = true;
            self.press_origin = Some(pointer);
            self.dragging = false;
        }

        if left && !self.dragging {
            if let Some(origin) = self.press_origin {
                if origin.distance_to(pointer) > drag_threshold {
                    self.dragging = true;
                    frame.drag_started = true;
                }
            }
        }

        frame.press_origin = self.press_origin;
        frame.dragging = left && self.dragging;

        if !left && self.prev_left {
            frame.left_released = true;
            frame.drag_ended = self.dragging;
            frame.clicked = !self.dragging;
            self.dragging = false;
            self.press_origin = None;
        }

        self.prev_pointer = Some(pointer);
        self.prev_left = left;
        frame
    }
}
