//! UI components

pub mod input_bar;
pub mod panels;
pub mod theme;
