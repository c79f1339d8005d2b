pub mod affine;
pub mod quad;
