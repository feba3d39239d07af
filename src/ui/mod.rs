//! UI components for Scriptum

pub mod status;
pub mod surface;
pub mod toolbar;
