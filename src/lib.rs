//! plotkit: backend-neutral 2D plotting engine.
//!
//! This crate provides axis and tick generation, a pluggable output-device
//! abstraction, markup-aware text layout, and a plot controller with legend
//! handling and a pointer interaction state machine.

pub mod core;
pub mod error;
pub mod plot;
pub mod render;
pub mod telemetry;
pub mod text;

pub use crate::core::{Axis, AxisDeviceMapping, DeviceMapping, Plottable, RealPoint, RealRect};
pub use error::{PlotError, PlotResult};
pub use plot::{AxisPos, HighlightMode, InteractionConfig, LegendPos, Plot, PlotEvent, PlotPos};
