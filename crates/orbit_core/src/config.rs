use serde::{Deserialize, Serialize};

use crate::constants::{ROTATION_SPEED_SCALE, WIGGLE_SPEED_SCALE};
use crate::types::ShapeKind;

/// Live animation parameters.
///
/// Speeds are stored on the 0-10 UI scale and only converted to simulation
/// units at use and at export. Setters never clamp; see [`ParamBounds`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrbitConfig {
    /// Number of orbiting shapes
    pub shape_count: f64,
    /// Disc radius in pixels (circles only)
    pub circle_radius: f64,
    /// Shared orbit radius in pixels
    pub orbit_radius: f64,
    /// Base wiggle amplitude in pixels
    pub wiggle_amplitude: f64,
    /// Wiggle speed, UI scale 0-10
    pub wiggle_speed: f64,
    /// Rotation speed, UI scale 0-10
    pub rotation_speed: f64,
    /// Blur radius in pixels, 0 disables blur
    pub blur_amount: f64,
    /// Fraction (0-10 scale) of each entity's orbit jitter that is applied
    pub orbit_offset: f64,
    /// 0 = circle, 1 = square
    pub shape_type: f64,
    pub square_width: f64,
    pub square_height: f64,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            shape_count: 6.0,
            circle_radius: 40.0,
            orbit_radius: 41.0,
            wiggle_amplitude: 6.5,
            wiggle_speed: 1.0,
            rotation_speed: 1.0,
            blur_amount: 42.0,
            orbit_offset: 0.0,
            shape_type: 0.0,
            square_width: 40.0,
            square_height: 40.0,
        }
    }
}

impl OrbitConfig {
    pub fn get(&self, param: Param) -> f64 {
        match param {
            Param::ShapeCount => self.shape_count,
            Param::CircleRadius => self.circle_radius,
            Param::OrbitRadius => self.orbit_radius,
            Param::WiggleAmplitude => self.wiggle_amplitude,
            Param::WiggleSpeed => self.wiggle_speed,
            Param::RotationSpeed => self.rotation_speed,
            Param::BlurAmount => self.blur_amount,
            Param::OrbitOffset => self.orbit_offset,
            Param::ShapeType => self.shape_type,
            Param::SquareWidth => self.square_width,
            Param::SquareHeight => self.square_height,
        }
    }

    pub fn set(&mut self, param: Param, value: f64) {
        let slot = match param {
            Param::ShapeCount => &mut self.shape_count,
            Param::CircleRadius => &mut self.circle_radius,
            Param::OrbitRadius => &mut self.orbit_radius,
            Param::WiggleAmplitude => &mut self.wiggle_amplitude,
            Param::WiggleSpeed => &mut self.wiggle_speed,
            Param::RotationSpeed => &mut self.rotation_speed,
            Param::BlurAmount => &mut self.blur_amount,
            Param::OrbitOffset => &mut self.orbit_offset,
            Param::ShapeType => &mut self.shape_type,
            Param::SquareWidth => &mut self.square_width,
            Param::SquareHeight => &mut self.square_height,
        };
        *slot = value;
    }

    /// Wiggle speed in radians per millisecond
    pub fn wiggle_speed_internal(&self) -> f64 {
        scale_wiggle_speed(self.wiggle_speed)
    }

    /// Rotation speed in radians per frame
    pub fn rotation_speed_internal(&self) -> f64 {
        scale_rotation_speed(self.rotation_speed)
    }

    pub fn shape_kind(&self) -> ShapeKind {
        ShapeKind::from_discriminant(self.shape_type)
    }

    /// Shape count held within `0..=max` of its bounds, fraction kept.
    /// NaN counts as zero.
    pub fn bounded_shape_count(&self) -> f64 {
        if self.shape_count.is_nan() {
            return 0.0;
        }
        self.shape_count.clamp(0.0, Param::ShapeCount.bounds().max)
    }

    /// Number of entities a rebuild creates.
    /// A fractional count behaves like the loop bound `i < count`.
    pub fn shape_count(&self) -> usize {
        self.bounded_shape_count().ceil() as usize
    }

    /// Copy with both speeds converted to simulation units, as exported
    pub fn to_internal_units(&self) -> Self {
        Self {
            wiggle_speed: self.wiggle_speed_internal(),
            rotation_speed: self.rotation_speed_internal(),
            ..self.clone()
        }
    }
}

pub fn scale_wiggle_speed(ui_value: f64) -> f64 {
    ui_value * WIGGLE_SPEED_SCALE
}

pub fn scale_rotation_speed(ui_value: f64) -> f64 {
    ui_value * ROTATION_SPEED_SCALE
}

/// Inverse of [`scale_wiggle_speed`], used when importing snapshots
pub fn unscale_wiggle_speed(internal: f64) -> f64 {
    internal / WIGGLE_SPEED_SCALE
}

/// Inverse of [`scale_rotation_speed`], used when importing snapshots
pub fn unscale_rotation_speed(internal: f64) -> f64 {
    internal / ROTATION_SPEED_SCALE
}

/// Named configuration parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    ShapeCount,
    CircleRadius,
    OrbitRadius,
    WiggleAmplitude,
    WiggleSpeed,
    RotationSpeed,
    BlurAmount,
    OrbitOffset,
    ShapeType,
    SquareWidth,
    SquareHeight,
}

impl Param {
    pub const ALL: [Param; 11] = [
        Param::ShapeCount,
        Param::CircleRadius,
        Param::OrbitRadius,
        Param::WiggleAmplitude,
        Param::WiggleSpeed,
        Param::RotationSpeed,
        Param::BlurAmount,
        Param::OrbitOffset,
        Param::ShapeType,
        Param::SquareWidth,
        Param::SquareHeight,
    ];

    /// Key used in snapshots
    pub fn name(&self) -> &'static str {
        match self {
            Self::ShapeCount => "shapeCount",
            Self::CircleRadius => "circleRadius",
            Self::OrbitRadius => "orbitRadius",
            Self::WiggleAmplitude => "wiggleAmplitude",
            Self::WiggleSpeed => "wiggleSpeed",
            Self::RotationSpeed => "rotationSpeed",
            Self::BlurAmount => "blurAmount",
            Self::OrbitOffset => "orbitOffset",
            Self::ShapeType => "shapeType",
            Self::SquareWidth => "squareWidth",
            Self::SquareHeight => "squareHeight",
        }
    }

    /// Human-readable label for the HUD
    pub fn label(&self) -> &'static str {
        match self {
            Self::ShapeCount => "Shapes",
            Self::CircleRadius => "Circle radius",
            Self::OrbitRadius => "Orbit radius",
            Self::WiggleAmplitude => "Wiggle amplitude",
            Self::WiggleSpeed => "Wiggle speed",
            Self::RotationSpeed => "Rotation speed",
            Self::BlurAmount => "Blur",
            Self::OrbitOffset => "Orbit offset",
            Self::ShapeType => "Shape",
            Self::SquareWidth => "Square width",
            Self::SquareHeight => "Square height",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    pub fn bounds(&self) -> ParamBounds {
        let (min, max, step) = match self {
            Self::ShapeCount => (1.0, 32.0, 1.0),
            Self::CircleRadius => (2.0, 100.0, 1.0),
            Self::OrbitRadius => (0.0, 300.0, 1.0),
            Self::WiggleAmplitude => (0.0, 20.0, 0.5),
            Self::WiggleSpeed => (0.0, 10.0, 0.1),
            Self::RotationSpeed => (0.0, 10.0, 0.1),
            Self::BlurAmount => (0.0, 56.0, 0.5),
            Self::OrbitOffset => (0.0, 10.0, 0.5),
            Self::ShapeType => (0.0, 1.0, 1.0),
            Self::SquareWidth => (2.0, 100.0, 1.0),
            Self::SquareHeight => (2.0, 100.0, 1.0),
        };
        ParamBounds { min, max, step }
    }

    /// Keys whose absence from an imported snapshot is reported
    pub fn is_required(&self) -> bool {
        !matches!(self, Self::ShapeType | Self::SquareWidth | Self::SquareHeight)
    }

    /// Changing a structural parameter invalidates the entity collection
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::ShapeCount | Self::ShapeType)
    }
}

/// Range a UI control keeps a parameter within
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamBounds {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl ParamBounds {
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Move `value` by `steps` increments, snapped to the step grid and clamped
    pub fn step_by(&self, value: f64, steps: i32) -> f64 {
        let raw = value + steps as f64 * self.step;
        let snapped = self.min + ((raw - self.min) / self.step).round() * self.step;
        // Trim float noise from repeated 0.1 steps
        self.clamp((snapped * 1e6).round() / 1e6)
    }
}
