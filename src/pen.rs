//! Virtual pen that turns commands into recorded points
//!
//! Heading is in degrees, 0 along +x, growing counter-clockwise, and is never
//! wrapped. Points are recorded only while the pen is down: once when it goes
//! down and once after every move.

use glam::DVec2;

use crate::command::Command;

/// Mutable pen state for a single run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurtleState {
    pub position: DVec2,
    /// Degrees, unbounded
    pub heading: f64,
    pub pen_down: bool,
}

impl Default for TurtleState {
    fn default() -> Self {
        Self {
            position: DVec2::ZERO,
            heading: 0.0,
            pen_down: false,
        }
    }
}

/// Executes commands one at a time
#[derive(Debug, Clone, Default)]
pub struct Pen {
    state: TurtleState,
}

impl Pen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &TurtleState {
        &self.state
    }

    /// Apply one command, returning the point it records, if any.
    pub fn apply(&mut self, command: Command) -> Option<DVec2> {
        let state = &mut self.state;
        match command {
            Command::PenUp => {
                state.pen_down = false;
                return None;
            }
            Command::PenDown => {
                state.pen_down = true;
                return Some(state.position);
            }
            Command::Goto { x, y } => state.position = DVec2::new(x, y),
            Command::Forward(d) => state.position += heading_vector(state.heading) * d,
            Command::Backward(d) => state.position -= heading_vector(state.heading) * d,
            Command::Left(a) => {
                state.heading += a;
                return None;
            }
            Command::Right(a) => {
                state.heading -= a;
                return None;
            }
        }
        state.pen_down.then_some(state.position)
    }
}

fn heading_vector(degrees: f64) -> DVec2 {
    DVec2::from_angle(degrees.to_radians())
}

/// Run a command sequence from a fresh state and collect the recorded points.
pub fn execute(commands: &[Command]) -> Vec<DVec2> {
    let mut pen = Pen::new();
    let points: Vec<DVec2> = commands
        .iter()
        .filter_map(|&command| pen.apply(command))
        .collect();

    if points.is_empty() && !commands.is_empty() {
        crate::log::warn!(commands = commands.len(), "pen was never lowered");
    }
    crate::log::debug!(points = points.len(), "executed commands");
    points
}
