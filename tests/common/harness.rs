//! Frame-by-frame driver for the canvas controller.
//!
//! Emulates a host frame loop: each call produces one `update` with the
//! pointer, buttons and modifiers held in the driver.

use flowgraph_editor::{
    CanvasController, DrawCommand, EditorConfig, FrameInput, Graph, NodeId, NodePin, Point, Rect,
};

pub const CANVAS: Rect = Rect::new(0.0, 0.0, 1024.0, 768.0);

pub struct FrameDriver {
    pub ctrl: CanvasController,
    pointer: Point,
    left: bool,
    middle: bool,
    ctrl_key: bool,
    alt: bool,
    pub last_frame: Vec<DrawCommand>,
}

impl FrameDriver {
    pub fn new(graph: Graph) -> Self {
        Self::with_config(graph, EditorConfig::default())
    }

    pub fn with_config(graph: Graph, config: EditorConfig) -> Self {
        let mut driver = Self {
            ctrl: CanvasController::new(graph, config),
            pointer: Point::ZERO,
            left: false,
            middle: false,
            ctrl_key: false,
            alt: false,
            last_frame: Vec::new(),
        };
        driver.frame();
        driver
    }

    fn input(&self) -> FrameInput {
        FrameInput::new(CANVAS)
            .at(self.pointer)
            .with_left(self.left)
            .with_middle(self.middle)
            .with_ctrl(self.ctrl_key)
            .with_alt(self.alt)
    }

    /// Run one frame with the current state.
    pub fn frame(&mut self) -> &[DrawCommand] {
        let input = self.input();
        self.last_frame = self.ctrl.update(&input);
        &self.last_frame
    }

    pub fn hold_ctrl(&mut self, down: bool) {
        self.ctrl_key = down;
    }

    pub fn hold_alt(&mut self, down: bool) {
        self.alt = down;
    }

    pub fn move_to(&mut self, p: Point) {
        self.pointer = p;
        self.frame();
    }

    pub fn press(&mut self, p: Point) {
        self.pointer = p;
        self.left = true;
        self.frame();
    }

    pub fn release(&mut self) {
        self.left = false;
        self.frame();
    }

    pub fn click(&mut self, p: Point) {
        self.press(p);
        self.release();
    }

    /// Left-drag from `from` to `to` in `steps` intermediate frames.
    pub fn drag(&mut self, from: Point, to: Point, steps: usize) {
        self.press(from);
        let steps = steps.max(1);
        for i in 1..=steps {
            let t = i as f64 / steps as f64;
            self.move_to(from.lerp(to, t));
        }
        self.release();
    }

    pub fn middle_drag(&mut self, from: Point, to: Point) {
        self.pointer = from;
        self.middle = true;
        self.frame();
        self.pointer = to;
        self.frame();
        self.middle = false;
        self.frame();
    }

    pub fn scroll(&mut self, p: Point, ticks: f64) {
        self.pointer = p;
        let input = self.input().with_scroll(ticks);
        self.last_frame = self.ctrl.update(&input);
    }

    // === Geometry helpers (screen coordinates) ===

    pub fn node_header(&self, node: NodeId) -> Point {
        let rect = self.ctrl.graph().node(node).expect("node exists").rect;
        self.ctrl.world_to_screen(rect.origin() + Point::new(4.0, 4.0))
    }

    pub fn node_screen_rect(&self, node: NodeId) -> Rect {
        let rect = self.ctrl.graph().node(node).expect("node exists").rect;
        self.ctrl.transform().rect_to_screen(&rect)
    }

    pub fn pin_point(&self, pin: NodePin) -> Point {
        let world = self.ctrl.graph().pin(pin).expect("pin exists").connection_point();
        self.ctrl.world_to_screen(world)
    }
}
