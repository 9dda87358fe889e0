pub mod glitch;
pub mod lens;

/// Amount the time counter advances after every painted frame.
pub const TIME_STEP: f64 = 0.025;

/// A position in surface units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum PointerState {
    #[default]
    Idle,
    /// The pointer is over the surface; the position is unknown until the first move.
    Hovering { position: Option<Point> },
}

/// Mutable per-portrait animation state, owned by the renderer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnimationState {
    pub time: f64,
    pub pointer: PointerState,
}

impl AnimationState {
    pub fn enter(&mut self) {
        if self.pointer == PointerState::Idle {
            self.pointer = PointerState::Hovering { position: None };
        }
    }

    /// Records the pointer position. Ignored until the pointer has entered.
    pub fn move_to(&mut self, point: Point) {
        if let PointerState::Hovering { position } = &mut self.pointer {
            *position = Some(point);
        }
    }

    pub fn leave(&mut self) {
        self.pointer = PointerState::Idle;
    }

    pub fn is_hovering(&self) -> bool {
        matches!(self.pointer, PointerState::Hovering { .. })
    }

    /// Pointer position when it should distort the grid.
    pub fn lens_center(&self) -> Option<Point> {
        match self.pointer {
            PointerState::Hovering { position } => position,
            PointerState::Idle => None,
        }
    }

    pub fn advance(&mut self) {
        self.time += TIME_STEP;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_lifecycle() {
        let mut state = AnimationState::default();
        state.move_to(Point::new(1.0, 1.0));
        assert_eq!(state.lens_center(), None);

        state.enter();
        assert!(state.is_hovering());
        assert_eq!(state.lens_center(), None);

        state.move_to(Point::new(3.0, 4.0));
        assert_eq!(state.lens_center(), Some(Point::new(3.0, 4.0)));

        // Re-entering keeps the known position.
        state.enter();
        assert_eq!(state.lens_center(), Some(Point::new(3.0, 4.0)));

        state.leave();
        assert!(!state.is_hovering());
        assert_eq!(state.lens_center(), None);
    }

    #[test]
    fn time_advances_by_fixed_step() {
        let mut state = AnimationState::default();
        for _ in 0..4 {
            state.advance();
        }
        assert!((state.time - 0.1).abs() < 1e-12);
    }
}
