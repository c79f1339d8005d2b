pub mod blend;
pub mod cpu;
pub mod surface;
pub mod warp;
