use serde::{Deserialize, Serialize};

use crate::palette::HexColor;

/// Shape family drawn for every entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Circle,
    Square,
}

impl ShapeKind {
    /// Decode the numeric `shapeType` parameter: exactly 0 is a circle,
    /// anything else a square
    pub fn from_discriminant(value: f64) -> Self {
        if value == 0.0 { Self::Circle } else { Self::Square }
    }

    pub fn discriminant(&self) -> f64 {
        match self {
            Self::Circle => 0.0,
            Self::Square => 1.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Circle => "Circle",
            Self::Square => "Square",
        }
    }
}

/// Geometry of one draw call
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Filled disc centered on the instruction position
    Circle { radius: f64 },
    /// Filled rectangle centered on the instruction position,
    /// rotated by `rotation` radians (clockwise on a y-down surface)
    Square { width: f64, height: f64, rotation: f64 },
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Circle { .. } => ShapeKind::Circle,
            Self::Square { .. } => ShapeKind::Square,
        }
    }
}

/// Everything a surface needs to paint one entity
#[derive(Debug, Clone, PartialEq)]
pub struct DrawInstruction {
    pub shape: Shape,
    /// Center in surface coordinates (origin top-left, y down)
    pub position: [f64; 2],
    pub color: HexColor,
    /// Gaussian blur radius in pixels, `None` when blur is off
    pub blur: Option<f64>,
}

/// One animation cycle. Replaces everything drawn by the previous frame;
/// instructions are in paint order, later ones cover earlier ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    /// Monotonic tick counter
    pub index: u64,
    pub instructions: Vec<DrawInstruction>,
}

impl Frame {
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

/// Size of the drawing surface, orbits are centered in it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub width: f64,
    pub height: f64,
}

impl Surface {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> [f64; 2] {
        [self.width / 2.0, self.height / 2.0]
    }
}

impl Default for Surface {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}
