pub mod controller;
pub mod interactive;
pub mod render;
pub mod session;
