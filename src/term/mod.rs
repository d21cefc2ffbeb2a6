pub mod ambient;
pub mod app;
pub mod canvas;
pub mod overlay;
