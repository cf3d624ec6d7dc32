//! Plot controller: axis slots, series bindings, legend, caches, and the
//! render pipeline.
//!
//! Mutation does not redraw anything. Hosts mutate, call [`Plot::invalidate`]
//! when an axis or title changed underneath a cache, then call
//! [`Plot::render`] against any [`OutputDevice`].

mod axis_layout;
mod export;
mod interaction;
mod legend;

pub use interaction::{HighlightMode, HighlightRegion, InteractionConfig, PlotEvent};
pub use legend::LegendPos;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::axis::{Axis, TickSize};
use crate::core::mapping::AxisDeviceMapping;
use crate::core::plottable::Plottable;
use crate::core::types::{RealPoint, RealRect};
use crate::render::{Brush, Color, LineStyle, OutputDevice, Pen, TextFont};
use crate::text::{TextAlignment, TextLayout};

use axis_layout::AxisLayout;
use interaction::DragState;
use legend::LegendItem;

/// Padding between chart elements.
pub(crate) const TEXT_SPACE: f64 = 3.0;
/// Size of the sample swatch drawn next to each legend entry.
pub(crate) const LEGEND_ITEM_BOX: RealPoint = RealPoint::new(14.0, 14.0);
/// Vertical gap between stacked plot rows.
const PLOT_SPACE: f64 = 16.0;

const TITLE_FONT: TextFont = TextFont::points(1.0);
const LEGEND_FONT: TextFont = TextFont::points(-1.0);
const NORMAL_FONT: TextFont = TextFont::points(0.0);
const AXIS_FONT: TextFont = TextFont::points(0.0);

/// Number of stacked plot rows.
const NROWS: usize = 2;

/// Which edge an axis occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisPos {
    XBottom,
    XTop,
    YLeft,
    YRight,
}

/// Which stacked row a series draws into. X axes are shared by both rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlotPos {
    Top,
    Bottom,
}

impl PlotPos {
    fn index(self) -> usize {
        match self {
            Self::Top => 0,
            Self::Bottom => 1,
        }
    }
}

/// One axis slot plus its cached tick layout and label layout.
#[derive(Default)]
struct AxisSlot {
    axis: Option<Box<dyn Axis>>,
    layout: Option<AxisLayout>,
    label: Option<TextLayout>,
}

impl AxisSlot {
    fn set(&mut self, axis: Option<Box<dyn Axis>>) {
        self.axis = axis;
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.layout = None;
        self.label = None;
    }

    fn ensure_label(&mut self, dc: &mut dyn OutputDevice) {
        if self.label.is_some() {
            return;
        }
        if let Some(axis) = &self.axis {
            if axis.base().show_label {
                let text = axis.label();
                if !text.is_empty() {
                    self.label = Some(TextLayout::new(dc, &text, TextAlignment::Center));
                }
            }
        }
    }

    fn label_height(&self) -> f64 {
        self.label.as_ref().map_or(0.0, TextLayout::height)
    }

    fn ensure_layout(
        &mut self,
        pos: AxisPos,
        dc: &mut dyn OutputDevice,
        phys_min: f64,
        phys_max: f64,
    ) {
        if self.layout.is_some() {
            return;
        }
        if let Some(axis) = &self.axis {
            self.layout = Some(AxisLayout::new(pos, dc, axis.as_ref(), phys_min, phys_max));
        }
    }

    fn layout_bounds(&self) -> RealPoint {
        self.layout
            .as_ref()
            .map_or(RealPoint::new(0.0, 0.0), AxisLayout::bounds)
    }
}

struct PlotBinding {
    plot: Box<dyn Plottable>,
    x_pos: AxisPos,
    y_pos: AxisPos,
    row: PlotPos,
}

/// The chart controller.
pub struct Plot {
    title: String,
    show_title: bool,
    show_legend: bool,
    show_coarse_grid: bool,
    show_fine_grid: bool,
    title_layout: Option<TextLayout>,

    x1: AxisSlot,
    x2: AxisSlot,
    y1: [AxisSlot; NROWS],
    y2: [AxisSlot; NROWS],
    plots: Vec<PlotBinding>,

    pub grid_color: Color,
    pub axis_color: Color,
    pub tick_text_color: Color,
    pub plot_area_color: Color,

    legend_pos: LegendPos,
    legend_pos_percent: RealPoint,
    legend_rect: RealRect,
    legend_items: Vec<LegendItem>,
    legend_invalidated: bool,
    reverse_legend: bool,

    plot_rects: Vec<RealRect>,
    highlight_mode: HighlightMode,
    highlight: HighlightRegion,
    interaction: InteractionConfig,
    drag: Option<DragState>,
}

impl Default for Plot {
    fn default() -> Self {
        Self {
            title: String::new(),
            show_title: true,
            show_legend: true,
            show_coarse_grid: true,
            show_fine_grid: true,
            title_layout: None,
            x1: AxisSlot::default(),
            x2: AxisSlot::default(),
            y1: [AxisSlot::default(), AxisSlot::default()],
            y2: [AxisSlot::default(), AxisSlot::default()],
            plots: Vec::new(),
            grid_color: Color::rgb(225.0 / 255.0, 225.0 / 255.0, 225.0 / 255.0),
            axis_color: Color::BLACK,
            tick_text_color: Color::BLACK,
            plot_area_color: Color::WHITE,
            legend_pos: LegendPos::Floating,
            legend_pos_percent: RealPoint::new(85.0, 4.0),
            legend_rect: RealRect::new(10.0, 10.0, 0.0, 0.0),
            legend_items: Vec::new(),
            legend_invalidated: true,
            reverse_legend: false,
            plot_rects: Vec::new(),
            highlight_mode: HighlightMode::Disabled,
            highlight: HighlightRegion::default(),
            interaction: InteractionConfig::default(),
            drag: None,
        }
    }
}

impl Plot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a series against an axis pair and a row. With
    /// `update_axes` the bound axes adopt or extend to the series' data
    /// range immediately.
    pub fn add_plot(
        &mut self,
        plot: Box<dyn Plottable>,
        x_pos: AxisPos,
        y_pos: AxisPos,
        row: PlotPos,
        update_axes: bool,
    ) {
        let x_pos = match x_pos {
            AxisPos::XBottom | AxisPos::XTop => x_pos,
            other => {
                warn!(?other, "series bound to a non-X axis slot, using bottom");
                AxisPos::XBottom
            }
        };
        let y_pos = match y_pos {
            AxisPos::YLeft | AxisPos::YRight => y_pos,
            other => {
                warn!(?other, "series bound to a non-Y axis slot, using left");
                AxisPos::YLeft
            }
        };

        self.plots.push(PlotBinding {
            plot,
            x_pos,
            y_pos,
            row,
        });
        self.legend_invalidated = true;
        if update_axes {
            self.update_axes(false);
        }
    }

    /// Unregisters a series and hands ownership back to the caller.
    pub fn remove_plot(&mut self, index: usize) -> Option<Box<dyn Plottable>> {
        if index >= self.plots.len() {
            return None;
        }
        let binding = self.plots.remove(index);
        self.legend_invalidated = true;
        Some(binding.plot)
    }

    #[must_use]
    pub fn plot_count(&self) -> usize {
        self.plots.len()
    }

    #[must_use]
    pub fn plot(&self, index: usize) -> Option<&dyn Plottable> {
        self.plots.get(index).map(|b| b.plot.as_ref())
    }

    pub fn plot_mut(&mut self, index: usize) -> Option<&mut (dyn Plottable + '_)> {
        match self.plots.get_mut(index) {
            Some(b) => Some(b.plot.as_mut()),
            None => None,
        }
    }

    #[must_use]
    pub fn plot_index_by_label(&self, label: &str) -> Option<usize> {
        self.plots.iter().position(|b| b.plot.label() == label)
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: &str) {
        if self.title != title {
            self.title = title.to_owned();
            self.title_layout = None;
        }
    }

    pub fn set_show_title(&mut self, show: bool) {
        self.show_title = show;
    }

    pub fn set_show_legend(&mut self, show: bool) {
        self.show_legend = show;
    }

    #[must_use]
    pub fn shows_legend(&self) -> bool {
        self.show_legend
    }

    pub fn set_show_coarse_grid(&mut self, show: bool) {
        self.show_coarse_grid = show;
    }

    pub fn set_show_fine_grid(&mut self, show: bool) {
        self.show_fine_grid = show;
    }

    pub fn set_reverse_legend(&mut self, reverse: bool) {
        self.reverse_legend = reverse;
    }

    #[must_use]
    pub fn legend_position(&self) -> LegendPos {
        self.legend_pos
    }

    pub fn set_legend_position(&mut self, pos: LegendPos) {
        if self.legend_pos != pos {
            self.legend_pos = pos;
            self.legend_invalidated = true;
        }
    }

    /// Sets the legend position from a config string such as
    /// `"northeast"`. Returns false and leaves the position unchanged for
    /// an unrecognized name.
    pub fn set_legend_location(&mut self, name: &str) -> bool {
        match LegendPos::parse(name) {
            Some(pos) => {
                self.set_legend_position(pos);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn legend_pos_percent(&self) -> RealPoint {
        self.legend_pos_percent
    }

    /// Floating legend position as percent of the client area, clamped to
    /// [-10, 90] on both axes.
    pub fn set_legend_pos_percent(&mut self, percent: RealPoint) {
        self.legend_pos_percent = RealPoint::new(
            percent.x.clamp(-10.0, 90.0),
            percent.y.clamp(-10.0, 90.0),
        );
    }

    #[must_use]
    pub fn highlight_mode(&self) -> HighlightMode {
        self.highlight_mode
    }

    pub fn set_highlight_mode(&mut self, mode: HighlightMode) {
        self.highlight_mode = mode;
    }

    #[must_use]
    pub fn interaction_config(&self) -> InteractionConfig {
        self.interaction
    }

    pub fn set_interaction_config(&mut self, config: InteractionConfig) {
        self.interaction = config;
    }

    /// Row rectangles of the last render, for host-side hit testing.
    #[must_use]
    pub fn plot_rects(&self) -> &[RealRect] {
        &self.plot_rects
    }

    /// Legend rectangle of the last render.
    #[must_use]
    pub fn legend_rect(&self) -> RealRect {
        self.legend_rect
    }

    fn slot(&self, pos: AxisPos, row: PlotPos) -> &AxisSlot {
        match pos {
            AxisPos::XBottom => &self.x1,
            AxisPos::XTop => &self.x2,
            AxisPos::YLeft => &self.y1[row.index()],
            AxisPos::YRight => &self.y2[row.index()],
        }
    }

    fn slot_mut(&mut self, pos: AxisPos, row: PlotPos) -> &mut AxisSlot {
        match pos {
            AxisPos::XBottom => &mut self.x1,
            AxisPos::XTop => &mut self.x2,
            AxisPos::YLeft => &mut self.y1[row.index()],
            AxisPos::YRight => &mut self.y2[row.index()],
        }
    }

    /// Axis in a slot. The row is ignored for the shared X slots.
    #[must_use]
    pub fn axis(&self, pos: AxisPos, row: PlotPos) -> Option<&dyn Axis> {
        self.slot(pos, row).axis.as_deref()
    }

    pub fn axis_mut(&mut self, pos: AxisPos, row: PlotPos) -> Option<&mut (dyn Axis + '_)> {
        match &mut self.slot_mut(pos, row).axis {
            Some(axis) => Some(axis.as_mut()),
            None => None,
        }
    }

    /// Installs or removes an axis, dropping the slot's cached layouts.
    pub fn set_axis(&mut self, pos: AxisPos, row: PlotPos, axis: Option<Box<dyn Axis>>) {
        self.slot_mut(pos, row).set(axis);
    }

    /// Drops every cached layout: title, legend, axis tick and label
    /// layouts. Call after mutating an axis or series data.
    pub fn invalidate(&mut self) {
        self.title_layout = None;
        self.legend_invalidated = true;
        self.x1.invalidate();
        self.x2.invalidate();
        for pp in 0..NROWS {
            self.y1[pp].invalidate();
            self.y2[pp].invalidate();
        }
    }

    /// Removes every axis and invalidates.
    pub fn delete_axes(&mut self) {
        self.x1.set(None);
        self.x2.set(None);
        for pp in 0..NROWS {
            self.y1[pp].set(None);
            self.y2[pp].set(None);
        }
        self.invalidate();
    }

    /// Adopts suggested axes into empty slots and extends occupied ones.
    /// With `recalc_all` every slot is rebuilt from scratch from all
    /// registered series; otherwise only the most recent series is folded
    /// in.
    pub fn update_axes(&mut self, recalc_all: bool) {
        let start = if recalc_all {
            self.delete_axes();
            0
        } else {
            self.plots.len().saturating_sub(1)
        };

        for i in start..self.plots.len() {
            let (x_pos, y_pos, row) = {
                let b = &self.plots[i];
                (b.x_pos, b.y_pos, b.row)
            };

            let suggestion = self.plots[i].plot.suggest_x_axis();
            match self.axis_mut(x_pos, PlotPos::Top) {
                Some(axis) => axis.extend_bound(suggestion.as_ref()),
                None => self.set_axis(x_pos, PlotPos::Top, Some(suggestion)),
            }

            let suggestion = self.plots[i].plot.suggest_y_axis();
            match self.axis_mut(y_pos, row) {
                Some(axis) => axis.extend_bound(suggestion.as_ref()),
                None => self.set_axis(y_pos, row, Some(suggestion)),
            }

            if y_pos == AxisPos::YRight {
                if let Some(axis) = self.axis_mut(AxisPos::YRight, row) {
                    axis.base_mut().show_tick_text = true;
                }
            }
        }
    }

    /// Resets every bound axis to the full range of its series data. Axis
    /// identity and styling are untouched, only world bounds change.
    pub fn rescale_axes(&mut self) {
        let mut x1_set = false;
        let mut x2_set = false;
        let mut y1_set = [false; NROWS];
        let mut y2_set = [false; NROWS];

        for i in 0..self.plots.len() {
            let (x_pos, y_pos, row) = {
                let b = &self.plots[i];
                (b.x_pos, b.y_pos, b.row)
            };
            let (min, max) = self.plots[i].plot.min_max();

            match x_pos {
                AxisPos::XBottom => {
                    if !x1_set && self.x1.axis.is_some() {
                        if let Some(axis) = self.axis_mut(AxisPos::XBottom, PlotPos::Top) {
                            axis.set_world(min.x, max.x);
                        }
                    } else {
                        let suggestion = self.plots[i].plot.suggest_x_axis();
                        if let Some(axis) = self.axis_mut(AxisPos::XBottom, PlotPos::Top) {
                            axis.extend_bound(suggestion.as_ref());
                        }
                    }
                    x1_set = true;
                }
                AxisPos::XTop => {
                    if !x2_set && self.x2.axis.is_some() {
                        if let Some(axis) = self.axis_mut(AxisPos::XTop, PlotPos::Top) {
                            axis.set_world(min.x, max.x);
                        }
                    } else {
                        let suggestion = self.plots[i].plot.suggest_x_axis();
                        if let Some(axis) = self.axis_mut(AxisPos::XTop, PlotPos::Top) {
                            axis.extend_bound(suggestion.as_ref());
                        }
                    }
                    x2_set = true;
                }
                _ => {}
            }

            match y_pos {
                AxisPos::YLeft => {
                    if !y1_set[row.index()] && self.y1[row.index()].axis.is_some() {
                        if let Some(axis) = self.axis_mut(AxisPos::YLeft, row) {
                            axis.set_world(min.y, max.y);
                        }
                    } else {
                        let suggestion = self.plots[i].plot.suggest_y_axis();
                        if let Some(axis) = self.axis_mut(AxisPos::YLeft, row) {
                            axis.extend_bound(suggestion.as_ref());
                        }
                    }
                    y1_set[row.index()] = true;
                }
                AxisPos::YRight => {
                    if !y2_set[row.index()] && self.y2[row.index()].axis.is_some() {
                        if let Some(axis) = self.axis_mut(AxisPos::YRight, row) {
                            axis.set_world(min.y, max.y);
                        }
                    } else {
                        let suggestion = self.plots[i].plot.suggest_y_axis();
                        if let Some(axis) = self.axis_mut(AxisPos::YRight, row) {
                            axis.extend_bound(suggestion.as_ref());
                        }
                    }
                    y2_set[row.index()] = true;
                }
                _ => {}
            }
        }
    }

    fn adopt_suggested_axes(&mut self) {
        for i in 0..self.plots.len() {
            let (x_pos, y_pos, row) = {
                let b = &self.plots[i];
                (b.x_pos, b.y_pos, b.row)
            };
            if self.axis(x_pos, PlotPos::Top).is_none() {
                let suggestion = self.plots[i].plot.suggest_x_axis();
                self.set_axis(x_pos, PlotPos::Top, Some(suggestion));
            }
            if self.axis(y_pos, row).is_none() {
                let suggestion = self.plots[i].plot.suggest_y_axis();
                self.set_axis(y_pos, row, Some(suggestion));
            }
        }
    }

    fn is_cartesian(&self) -> bool {
        self.x1
            .axis
            .as_deref()
            .is_none_or(|axis| axis.polar().is_none())
    }

    /// Lays out and draws the whole chart into `geom` on any device.
    pub fn render(&mut self, dc: &mut dyn OutputDevice, geom: RealRect) {
        self.adopt_suggested_axes();

        let mut bx = RealRect::new(
            geom.x + TEXT_SPACE,
            geom.y + TEXT_SPACE,
            geom.width - 2.0 * TEXT_SPACE,
            geom.height - 2.0 * TEXT_SPACE,
        );

        let mut legend_bottom = false;
        let mut legend_right = false;
        if self.show_legend {
            dc.set_font(LEGEND_FONT);
            self.calc_legend_text_layout(dc);

            if self.legend_pos == LegendPos::Bottom {
                let height = self
                    .legend_items
                    .iter()
                    .map(|i| i.layout.height())
                    .fold(0.0, f64::max);
                if height > 0.0 {
                    legend_bottom = true;
                }
                bx.height -= height + TEXT_SPACE;
            }

            if self.legend_pos == LegendPos::Right {
                let width = self
                    .legend_items
                    .iter()
                    .map(|i| i.layout.width())
                    .fold(0.0, f64::max);
                if width > 0.0 {
                    legend_right = true;
                }
                bx.width -= width + 5.0 * TEXT_SPACE + LEGEND_ITEM_BOX.x;
            }
        }

        if self.show_title && !self.title.is_empty() {
            dc.set_font(TITLE_FONT);
            let title = &self.title;
            let layout = self
                .title_layout
                .get_or_insert_with(|| TextLayout::new(dc, title, TextAlignment::Center));
            layout.render(
                dc,
                bx.x + bx.width / 2.0 - layout.width() / 2.0,
                bx.y,
                0.0,
                false,
            );
            bx.y += layout.height() + TEXT_SPACE;
            bx.height -= layout.height() + TEXT_SPACE;
        } else {
            // leave a little headroom for Y tick labels at the top edge
            dc.set_font(NORMAL_FONT);
            let top_margin = 0.5 * dc.measure("0").height + TEXT_SPACE;
            bx.y += top_margin;
            bx.height -= top_margin;
        }

        dc.set_font(NORMAL_FONT);
        let plotbox = bx; // where axis labels anchor

        // axis label space
        self.x2.ensure_label(dc);
        if self.x2.label.is_some() {
            bx.y += self.x2.label_height() + TEXT_SPACE;
            bx.height -= self.x2.label_height() + TEXT_SPACE;
        }

        self.x1.ensure_label(dc);
        if self.x1.label.is_some() {
            bx.height -= self.x1.label_height() + 2.0 * TEXT_SPACE;
        }

        let mut yleft_max_label = 0.0f64;
        let mut yright_max_label = 0.0f64;
        for pp in 0..NROWS {
            self.y1[pp].ensure_label(dc);
            yleft_max_label = yleft_max_label.max(self.y1[pp].label_height());
            self.y2[pp].ensure_label(dc);
            yright_max_label = yright_max_label.max(self.y2[pp].label_height());
        }
        bx.x += yleft_max_label + 2.0 * TEXT_SPACE;
        bx.width -= yleft_max_label + 2.0 * TEXT_SPACE;
        bx.width -= yright_max_label + 2.0 * TEXT_SPACE;

        if bx.width < 50.0 || bx.height < 50.0 {
            debug!(width = bx.width, height = bx.height, "geometry too small");
            // stale rows must not keep feeding hit tests
            self.plot_rects.clear();
            return;
        }

        // tick label space; layouts are cached until invalidated
        dc.set_font(AXIS_FONT);
        self.x2.ensure_layout(AxisPos::XTop, dc, bx.x, bx.x + bx.width);
        if self.x2.axis.is_some() {
            let bounds = self.x2.layout_bounds();
            if bounds.x > bx.width {
                // really wide tick text at the axis ends
                let diff = bounds.x - bx.width;
                let adj = 2.0 * diff / 3.0;
                if bx.x + bx.width + diff > plotbox.x + plotbox.width {
                    bx.width -= adj;
                }
                if bx.x - diff < plotbox.x {
                    bx.x += adj;
                    bx.width -= adj;
                }
            }
            bx.y += bounds.y;
            bx.height -= bounds.y;
        }

        let cartesian = self.is_cartesian();

        if self.x1.axis.is_some() {
            if cartesian {
                self.x1
                    .ensure_layout(AxisPos::XBottom, dc, bx.x, bx.x + bx.width);
                bx.height -= self.x1.layout_bounds().y;
            } else {
                if bx.width < bx.height {
                    self.x1
                        .ensure_layout(AxisPos::XBottom, dc, bx.x, bx.x + bx.width);
                } else {
                    self.x1
                        .ensure_layout(AxisPos::XBottom, dc, bx.y, bx.y + bx.height);
                }
                let by = self.x1.layout_bounds().y;
                bx.y += by;
                bx.height -= by * 2.0;
            }
        }

        let mut yleft_max_axis = 0.0f64;
        let mut yright_max_axis = 0.0f64;
        for pp in 0..NROWS {
            if self.y1[pp].axis.is_some() {
                if cartesian {
                    self.y1[pp].ensure_layout(AxisPos::YLeft, dc, bx.y + bx.height, bx.y);
                } else if bx.width < bx.height {
                    self.y1[pp].ensure_layout(AxisPos::YLeft, dc, bx.x, bx.x + bx.width);
                } else {
                    self.y1[pp].ensure_layout(AxisPos::YLeft, dc, bx.y + bx.height, bx.y);
                }
                yleft_max_axis = yleft_max_axis.max(self.y1[pp].layout_bounds().x);
            }
            if self.y2[pp].axis.is_some() {
                self.y2[pp].ensure_layout(AxisPos::YRight, dc, bx.y + bx.height, bx.y);
                yright_max_axis = yright_max_axis.max(self.y2[pp].layout_bounds().x);
            }
        }
        bx.x += yleft_max_axis;
        bx.width -= yleft_max_axis;
        bx.width -= yright_max_axis;

        if bx.width < 30.0 || bx.height < 30.0 {
            debug!(width = bx.width, height = bx.height, "geometry too small");
            self.plot_rects.clear();
            return;
        }

        let mut nyaxes = 0;
        for pp in 0..NROWS {
            if self.y1[pp].axis.is_some() || self.y2[pp].axis.is_some() {
                nyaxes = pp + 1;
            }
        }
        let nyaxes = nyaxes.max(1);
        let single_plot_height =
            bx.height / nyaxes as f64 - (nyaxes - 1) as f64 * (PLOT_SPACE / 2.0);
        if single_plot_height < 50.0 {
            debug!(single_plot_height, "plot rows too small");
            self.plot_rects.clear();
            return;
        }

        // row rects and plot area background
        dc.set_brush(Brush::solid(self.plot_area_color));
        dc.set_pen(Pen::none());
        self.plot_rects.clear();
        let mut row_y = bx.y;
        for _ in 0..nyaxes {
            let rect = RealRect::new(bx.x, row_y, bx.width, single_plot_height);
            if cartesian {
                dc.rect(rect);
            } else {
                let radius = bx.width.min(bx.height) / 2.0;
                dc.circle(bx.x + bx.width / 2.0, bx.y + bx.height / 2.0, radius);
            }
            self.plot_rects.push(rect);
            row_y += single_plot_height + PLOT_SPACE;
        }

        if self.show_coarse_grid {
            dc.set_pen(Pen::styled(self.grid_color, 0.5, LineStyle::Solid));
            if cartesian {
                self.draw_grid(dc, TickSize::Large);
            } else {
                self.draw_polar_grid(dc, TickSize::Large);
            }
        }

        if self.show_fine_grid {
            dc.set_pen(Pen::styled(self.grid_color, 0.5, LineStyle::Dot));
            if cartesian {
                self.draw_grid(dc, TickSize::Small);
            } else {
                self.draw_polar_grid(dc, TickSize::Small);
            }
        }

        // series, clipped to their rows
        for binding in &self.plots {
            let Some(x_axis) = self.slot(binding.x_pos, PlotPos::Top).axis.as_deref() else {
                continue;
            };
            let Some(y_axis) = self.slot(binding.y_pos, binding.row).axis.as_deref() else {
                continue;
            };
            let Some(bb) = self.plot_rects.get(binding.row.index()).copied() else {
                continue;
            };
            let map =
                AxisDeviceMapping::new(x_axis, bb.x, bb.x + bb.width, y_axis, bb.y + bb.height, bb.y);

            dc.set_antialiasing(binding.plot.antialiasing());
            dc.clip(bb);
            binding.plot.draw(dc, &map);
            dc.unclip();
        }
        dc.set_antialiasing(false);

        // axes
        dc.set_font(AXIS_FONT);
        dc.set_pen(Pen::solid(self.axis_color, 0.5));
        if let (Some(axis), Some(layout)) = (self.x2.axis.as_deref(), self.x2.layout.as_ref()) {
            if axis.base().shown {
                let opposite = if self.x1.axis.is_none() {
                    let last = self.plot_rects[nyaxes - 1];
                    Some(last.y + last.height)
                } else {
                    None
                };
                layout.render(
                    dc,
                    self.plot_rects[0].y,
                    axis,
                    bx.x,
                    bx.x + bx.width,
                    opposite,
                );
            }
        }

        let rect0 = self.plot_rects[0];
        let pp_radius = rect0.width.min(rect0.height) / 2.0;
        let pp_center = RealPoint::new(rect0.x + rect0.width / 2.0, rect0.y + rect0.height / 2.0);

        for pp in 0..nyaxes {
            let row_rect = self.plot_rects[pp];
            if let (Some(axis), Some(layout)) =
                (self.y1[pp].axis.as_deref(), self.y1[pp].layout.as_ref())
            {
                if axis.base().shown {
                    if cartesian {
                        let opposite = if self.y2[pp].axis.is_none() {
                            Some(bx.x + bx.width)
                        } else {
                            None
                        };
                        layout.render(
                            dc,
                            bx.x,
                            axis,
                            row_rect.y + row_rect.height,
                            row_rect.y,
                            opposite,
                        );
                    } else {
                        layout.render(
                            dc,
                            pp_center.x,
                            axis,
                            pp_center.y,
                            pp_center.y - pp_radius,
                            None,
                        );
                    }
                }
            }

            if let (Some(axis), Some(layout)) =
                (self.y2[pp].axis.as_deref(), self.y2[pp].layout.as_ref())
            {
                if axis.base().shown {
                    layout.render(
                        dc,
                        bx.x + bx.width,
                        axis,
                        row_rect.y + row_rect.height,
                        row_rect.y,
                        None,
                    );
                }
            }
        }

        if let (Some(axis), Some(layout)) = (self.x1.axis.as_deref(), self.x1.layout.as_ref()) {
            if axis.base().shown {
                if cartesian {
                    let last = self.plot_rects[nyaxes - 1];
                    layout.render(dc, last.y + last.height, axis, bx.x, bx.x + bx.width, None);
                } else {
                    layout.render(dc, pp_radius, axis, pp_center.x, pp_center.y, None);
                }
            }
        }

        // frames
        if cartesian {
            for rect in &self.plot_rects {
                dc.line(rect.x, rect.y, rect.x + rect.width, rect.y);
                dc.line(rect.x, rect.y, rect.x, rect.y + rect.height);
                dc.line(
                    rect.x,
                    rect.y + rect.height,
                    rect.x + rect.width,
                    rect.y + rect.height,
                );
                dc.line(
                    rect.x + rect.width,
                    rect.y,
                    rect.x + rect.width,
                    rect.y + rect.height,
                );
            }
        } else {
            dc.line(
                pp_center.x - pp_radius,
                pp_center.y,
                pp_center.x + pp_radius,
                pp_center.y,
            );
            dc.line(
                pp_center.x,
                pp_center.y + pp_radius,
                pp_center.x,
                pp_center.y - pp_radius,
            );
            dc.set_brush(Brush::none());
            dc.circle(pp_center.x, pp_center.y, pp_radius);
        }

        // axis labels
        dc.set_font(AXIS_FONT);
        dc.set_pen(Pen::solid(self.tick_text_color, 0.5));
        if let Some(label) = &self.x1.label {
            if cartesian {
                label.render(
                    dc,
                    bx.x + bx.width / 2.0 - label.width() / 2.0,
                    plotbox.y + plotbox.height - label.height() - TEXT_SPACE,
                    0.0,
                    false,
                );
            } else {
                let dist = (pp_radius * pp_radius / 2.0).sqrt();
                label.render(
                    dc,
                    pp_center.x + dist,
                    pp_center.y - dist - self.x1.layout_bounds().y - label.height() - TEXT_SPACE,
                    0.0,
                    false,
                );
            }
        }

        if let Some(label) = &self.x2.label {
            label.render(
                dc,
                bx.x + bx.width / 2.0 - label.width() / 2.0,
                plotbox.y,
                0.0,
                false,
            );
        }

        for pp in 0..nyaxes {
            let row_rect = self.plot_rects[pp];
            if let Some(label) = &self.y1[pp].label {
                if cartesian {
                    label.render(
                        dc,
                        plotbox.x + yleft_max_label - label.height(),
                        row_rect.y + row_rect.height / 2.0 + label.width() / 2.0,
                        90.0,
                        false,
                    );
                } else {
                    label.render(
                        dc,
                        pp_center.x,
                        pp_center.y - pp_radius + label.width() + TEXT_SPACE,
                        90.0,
                        false,
                    );
                }
            }
            if let Some(label) = &self.y2[pp].label {
                label.render(
                    dc,
                    plotbox.x + plotbox.width - yright_max_label + label.height(),
                    row_rect.y + row_rect.height / 2.0 - label.width() / 2.0,
                    -90.0,
                    false,
                );
            }
        }

        dc.set_font(LEGEND_FONT);
        let plot_area = RealRect::new(
            rect0.x,
            rect0.y,
            rect0.width,
            rect0.height * nyaxes as f64 + (nyaxes - 1) as f64 * PLOT_SPACE,
        );
        let legend_geom =
            if self.legend_pos == LegendPos::Floating || legend_bottom || legend_right {
                geom
            } else {
                plot_area
            };
        self.draw_legend(dc, legend_geom);
    }

    /// Vertical grid lines from the X ticks across every row, horizontal
    /// lines from each row's Y ticks. Uses the current pen.
    fn draw_grid(&self, dc: &mut dyn OutputDevice, size: TickSize) {
        let Some(rect0) = self.plot_rects.first().copied() else {
            return;
        };

        let x_slot = if self.x1.axis.is_some() {
            &self.x1
        } else {
            &self.x2
        };
        if let (Some(axis), Some(layout)) = (x_slot.axis.as_deref(), x_slot.layout.as_ref()) {
            for world in layout.tick_worlds(size) {
                let x = axis.world_to_physical(world, rect0.x, rect0.x + rect0.width);
                for rect in &self.plot_rects {
                    dc.line(x, rect.y, x, rect.y + rect.height);
                }
            }
        }

        for (pp, rect) in self.plot_rects.iter().enumerate() {
            let y_slot = if self.y1[pp].axis.is_some() {
                &self.y1[pp]
            } else {
                &self.y2[pp]
            };
            if let (Some(axis), Some(layout)) = (y_slot.axis.as_deref(), y_slot.layout.as_ref()) {
                for world in layout.tick_worlds(size) {
                    let y = axis.world_to_physical(world, rect.y + rect.height, rect.y);
                    dc.line(rect0.x, y, rect0.x + rect0.width, y);
                }
            }
        }
    }

    /// Concentric circles from the radial ticks, rays from the angular
    /// ticks.
    fn draw_polar_grid(&self, dc: &mut dyn OutputDevice, size: TickSize) {
        let Some(rect0) = self.plot_rects.first().copied() else {
            return;
        };

        dc.set_brush(Brush::none());
        let center = RealPoint::new(rect0.x + rect0.width / 2.0, rect0.y + rect0.height / 2.0);
        let max_radius = rect0.width.min(rect0.height) / 2.0;

        if let (Some(axis), Some(layout)) =
            (self.y1[0].axis.as_deref(), self.y1[0].layout.as_ref())
        {
            for world in layout.tick_worlds(size) {
                let radius = axis.world_to_physical(world, 0.0, max_radius);
                dc.circle(center.x, center.y, radius);
            }
        }

        if let (Some(axis), Some(layout)) = (self.x1.axis.as_deref(), self.x1.layout.as_ref()) {
            if let Some(pa) = axis.polar() {
                for world in layout.tick_worlds(size) {
                    let angle = pa.angle_in_radians(world);
                    dc.line(
                        center.x,
                        center.y,
                        center.x + max_radius * angle.cos(),
                        center.y + max_radius * angle.sin(),
                    );
                }
            }
        }
    }
}
