//! Export entry points. All graphical exports re-run the normal render
//! pipeline at the requested size on a fresh backend device, with cached
//! layouts invalidated before and after so the export cannot poison the
//! interactive caches.

use std::io::Write;

use tracing::debug;

use crate::core::axis::format_tick_value;
use crate::core::types::RealRect;
use crate::error::PlotResult;
use crate::render::{OutputDevice, SvgDevice};

use super::{Plot, PlotPos};

impl Plot {
    /// Writes the chart as an SVG document.
    pub fn render_to_svg<W: Write>(
        &mut self,
        writer: &mut W,
        width: f64,
        height: f64,
    ) -> PlotResult<()> {
        RealRect::new(0.0, 0.0, width, height).validate()?;
        let mut dc = SvgDevice::new(width, height);
        self.export_render(&mut dc, width, height);
        dc.finish(writer)?;
        debug!(width, height, "svg export finished");
        Ok(())
    }

    /// Rasterizes the chart to a PNG file.
    #[cfg(feature = "cairo-backend")]
    pub fn render_to_png<P: AsRef<std::path::Path>>(
        &mut self,
        path: P,
        width: i32,
        height: i32,
    ) -> PlotResult<()> {
        use crate::error::PlotError;
        use crate::render::CairoDevice;

        RealRect::new(0.0, 0.0, f64::from(width), f64::from(height)).validate()?;
        let (mut dc, surface) = CairoDevice::image(width, height)?;
        self.export_render(&mut dc, f64::from(width), f64::from(height));
        dc.finish()?;

        let mut file = std::fs::File::create(path)?;
        surface
            .write_to_png(&mut file)
            .map_err(|err| PlotError::Backend(format!("png export: {err}")))?;
        debug!(width, height, "png export finished");
        Ok(())
    }

    /// Writes the chart as a single-page PDF document.
    #[cfg(feature = "cairo-backend")]
    pub fn render_to_pdf<P: AsRef<std::path::Path>>(
        &mut self,
        path: P,
        width_pt: f64,
        height_pt: f64,
    ) -> PlotResult<()> {
        use crate::render::CairoDevice;

        RealRect::new(0.0, 0.0, width_pt, height_pt).validate()?;
        let (mut dc, surface) = CairoDevice::pdf(path, width_pt, height_pt)?;
        self.export_render(&mut dc, width_pt, height_pt);
        dc.finish()?;
        surface.finish();
        debug!(width_pt, height_pt, "pdf export finished");
        Ok(())
    }

    /// Renders for export with the legend forced visible, restoring the
    /// interactive legend setting afterwards.
    fn export_render(&mut self, dc: &mut dyn OutputDevice, width: f64, height: f64) {
        let legend_shown = self.show_legend;
        self.show_legend = true;
        self.invalidate();
        self.render(dc, RealRect::new(0.0, 0.0, width, height));
        self.show_legend = legend_shown;
        self.invalidate();
    }

    /// Writes the registered series as delimited text: one header row of
    /// series names, then one row per sample index. `visible_only` keeps
    /// only samples inside the bound X axis's world range; `include_x`
    /// prepends each series' x value column.
    pub fn write_data_as_text<W: Write>(
        &self,
        sep: char,
        writer: &mut W,
        visible_only: bool,
        include_x: bool,
    ) -> PlotResult<()> {
        let mut first = true;
        for binding in &self.plots {
            if !first {
                write!(writer, "{sep}")?;
            }
            first = false;
            if include_x {
                let x_label = self
                    .axis(binding.x_pos, PlotPos::Top)
                    .map(|a| a.label())
                    .unwrap_or_default();
                let name = if x_label.is_empty() {
                    "X".to_owned()
                } else {
                    x_label
                };
                write!(writer, "{name}{sep}")?;
            }
            write!(writer, "{}", binding.plot.label())?;
        }
        writeln!(writer)?;

        // per-series sample indices to emit
        let emitted: Vec<Vec<usize>> = self
            .plots
            .iter()
            .map(|binding| {
                let window = if visible_only {
                    self.axis(binding.x_pos, PlotPos::Top)
                        .map(|a| (a.world_min(), a.world_max()))
                } else {
                    None
                };
                (0..binding.plot.len())
                    .filter(|&i| match window {
                        Some((lo, hi)) => {
                            let x = binding.plot.at(i).x;
                            x >= lo && x <= hi
                        }
                        None => true,
                    })
                    .collect()
            })
            .collect();

        let rows = emitted.iter().map(Vec::len).max().unwrap_or(0);
        for row in 0..rows {
            let mut first = true;
            for (binding, indices) in self.plots.iter().zip(&emitted) {
                if !first {
                    write!(writer, "{sep}")?;
                }
                first = false;
                match indices.get(row) {
                    Some(&i) => {
                        let p = binding.plot.at(i);
                        if include_x {
                            write!(writer, "{}{sep}", format_tick_value(p.x).1)?;
                        }
                        write!(writer, "{}", format_tick_value(p.y).1)?;
                    }
                    None => {
                        if include_x {
                            write!(writer, "{sep}")?;
                        }
                    }
                }
            }
            writeln!(writer)?;
        }

        debug!(rows, series = self.plots.len(), "tabular export finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::{AxisPos, Plot, PlotPos};
    use crate::core::plottable::LinePlot;
    use crate::render::Color;

    fn plot_with_series() -> Plot {
        let mut plot = Plot::new();
        plot.add_plot(
            Box::new(LinePlot::from_xy(
                &[0.0, 1.0, 2.0, 3.0],
                &[5.0, 15.0, 10.0, 20.0],
                "load",
                Color::BLACK,
            )),
            AxisPos::XBottom,
            AxisPos::YLeft,
            PlotPos::Top,
            true,
        );
        plot
    }

    #[test]
    fn svg_export_writes_a_document() {
        let mut plot = plot_with_series();
        plot.set_title("export");
        let mut out = Vec::new();
        plot.render_to_svg(&mut out, 640.0, 480.0).unwrap();
        let svg = String::from_utf8(out).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.ends_with("</svg>\n") || svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn svg_export_rejects_degenerate_size() {
        let mut plot = plot_with_series();
        let mut out = Vec::new();
        assert!(plot.render_to_svg(&mut out, 0.0, 480.0).is_err());
    }

    #[test]
    fn tabular_export_emits_header_and_rows() {
        let plot = plot_with_series();
        let mut out = Vec::new();
        plot.write_data_as_text('\t', &mut out, false, true).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "X\tload");
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1], "0\t5");
        assert_eq!(lines[4], "3\t20");
    }

    #[test]
    fn tabular_export_visible_only_honors_axis_window() {
        let mut plot = plot_with_series();
        if let Some(axis) = plot.axis_mut(AxisPos::XBottom, PlotPos::Top) {
            axis.set_world(1.0, 2.0);
        }
        let mut out = Vec::new();
        plot.write_data_as_text(',', &mut out, true, false).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, ["load", "15", "10"]);
    }
}
