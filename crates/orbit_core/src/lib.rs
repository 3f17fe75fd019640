pub mod config;
pub mod constants;
pub mod palette;
pub mod types;

pub use config::{OrbitConfig, Param, ParamBounds};
pub use constants::*;
pub use palette::{HexColor, Palette};
pub use types::*;
