//! PresentationLayer: egui widgets over the data layer's query surface.

pub mod charts;
pub mod dashboard;
pub mod overview;
pub mod panels;
