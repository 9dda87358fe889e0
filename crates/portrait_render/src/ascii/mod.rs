pub mod gradient;
pub mod grid;
pub mod mapping;
pub mod taper;
