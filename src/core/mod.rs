pub mod axis;
pub mod mapping;
pub mod plottable;
pub mod types;

pub use axis::{Axis, TickData, TickSize};
pub use mapping::{AxisDeviceMapping, DeviceMapping};
pub use plottable::{LinePlot, Plottable};
pub use types::{RealPoint, RealRect};
