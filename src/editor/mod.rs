pub mod controller;
pub mod pointer;
pub mod session;
