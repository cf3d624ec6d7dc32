//! Pointer interaction state machine.
//!
//! The host feeds pointer events in pixel coordinates of the last rendered
//! geometry. Drags are ephemeral: `pointer_move` returns an outline rect for
//! the host to draw as an overlay, and committed state is only touched on
//! `pointer_up`. A drag that never leaves its commit threshold changes
//! nothing and raises no event.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::types::{RealPoint, RealRect};

use super::{AxisPos, LegendPos, Plot, PlotPos};

/// What a drag inside a plot row selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HighlightMode {
    Disabled,
    /// Horizontal span across the full row height.
    Span,
    /// Free rectangle.
    Rect,
    /// Rectangle that rescales the bound axes on commit.
    Zoom,
}

/// Pixel thresholds for committing drags.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InteractionConfig {
    /// Minimum horizontal travel before a span highlight commits.
    pub span_commit_px: f64,
    /// Minimum travel on either axis before a rect highlight commits.
    pub rect_commit_px: f64,
    /// Minimum travel on either axis before a zoom commits.
    pub zoom_commit_px: f64,
    /// Distance from a client edge that docks or undocks the legend.
    pub dock_threshold_px: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            span_commit_px: 10.0,
            rect_commit_px: 1.0,
            zoom_commit_px: 1.0,
            dock_threshold_px: 10.0,
        }
    }
}

/// Committed highlight bounds as percentages of the first plot row.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HighlightRegion {
    pub left_percent: f64,
    pub right_percent: f64,
    pub top_percent: f64,
    pub bottom_percent: f64,
}

/// Notification returned from `pointer_up` / `double_click`.
#[derive(Debug, Clone, PartialEq)]
pub enum PlotEvent {
    LegendMoved {
        pos: LegendPos,
        percent: RealPoint,
    },
    HighlightChanged(HighlightRegion),
    Zoom {
        x_min: f64,
        x_max: f64,
        y_min: f64,
        y_max: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragKind {
    Legend,
    Highlight,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct DragState {
    kind: DragKind,
    anchor: RealPoint,
    current: RealPoint,
    row: usize,
}

impl Plot {
    /// Starts a drag. Legend drags win over highlight drags when the
    /// pointer is over the legend.
    pub fn pointer_down(&mut self, point: RealPoint) {
        if self.show_legend && self.legend_rect.contains(point.x, point.y) {
            self.drag = Some(DragState {
                kind: DragKind::Legend,
                anchor: point,
                current: point,
                row: 0,
            });
            return;
        }

        if self.highlight_mode == HighlightMode::Disabled {
            return;
        }
        if let Some(row) = self
            .plot_rects
            .iter()
            .position(|r| r.contains(point.x, point.y))
        {
            self.drag = Some(DragState {
                kind: DragKind::Highlight,
                anchor: point,
                current: point,
                row,
            });
        }
    }

    /// Advances a drag in progress and returns the outline rect the host
    /// should draw as an ephemeral overlay.
    pub fn pointer_move(&mut self, point: RealPoint) -> Option<RealRect> {
        let drag = self.drag.as_mut()?;
        drag.current = point;
        let drag = *drag;

        match drag.kind {
            DragKind::Legend => {
                let dx = drag.current.x - drag.anchor.x;
                let dy = drag.current.y - drag.anchor.y;
                Some(RealRect::new(
                    self.legend_rect.x + dx,
                    self.legend_rect.y + dy,
                    self.legend_rect.width,
                    self.legend_rect.height,
                ))
            }
            DragKind::Highlight => Some(self.selection_rect(&drag)),
        }
    }

    /// Ends a drag. Legend drags commit a new position (and may dock or
    /// undock); highlight drags past their threshold commit a region or a
    /// zoom. `client` is the geometry of the last render.
    pub fn pointer_up(&mut self, point: RealPoint, client: RealRect) -> Option<PlotEvent> {
        let mut drag = self.drag.take()?;
        drag.current = point;

        match drag.kind {
            DragKind::Legend => self.finish_legend_drag(&drag, client),
            DragKind::Highlight => self.finish_highlight_drag(&drag),
        }
    }

    /// Restores every bound axis to the full range of its data and
    /// invalidates cached layouts. Only armed in zoom mode, and only for a
    /// click inside a plot row.
    pub fn double_click(&mut self, point: RealPoint) -> Option<PlotEvent> {
        if self.highlight_mode != HighlightMode::Zoom || self.plots.is_empty() {
            return None;
        }
        if !self
            .plot_rects
            .iter()
            .any(|r| r.contains(point.x, point.y))
        {
            return None;
        }
        self.rescale_axes();
        self.invalidate();

        let x = self.axis(AxisPos::XBottom, PlotPos::Top)?;
        let (x_min, x_max) = (x.world_min(), x.world_max());
        let (y_min, y_max) = match self.axis(AxisPos::YLeft, PlotPos::Top) {
            Some(y) => (y.world_min(), y.world_max()),
            None => (f64::NAN, f64::NAN),
        };
        debug!(x_min, x_max, "rescaled axes to data bounds");
        Some(PlotEvent::Zoom {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    /// Abandons any drag in progress without committing.
    pub fn capture_lost(&mut self) {
        self.drag = None;
    }

    #[must_use]
    pub fn highlight_region(&self) -> HighlightRegion {
        self.highlight
    }

    fn finish_legend_drag(&mut self, drag: &DragState, client: RealRect) -> Option<PlotEvent> {
        let dx = drag.current.x - drag.anchor.x;
        let dy = drag.current.y - drag.anchor.y;
        if dx == 0.0 && dy == 0.0 {
            return None;
        }

        if client.width > 0.0 && client.height > 0.0 {
            self.legend_pos_percent = RealPoint::new(
                100.0 * (self.legend_rect.x + dx - client.x) / client.width,
                100.0 * (self.legend_rect.y + dy - client.y) / client.height,
            );
        }

        let old = self.legend_pos;
        let threshold = self.interaction.dock_threshold_px;
        let right_edge = client.x + client.width;
        let bottom_edge = client.y + client.height;

        // undock a docked legend that was pulled away from its edge
        if self.legend_pos == LegendPos::Right && drag.current.x < right_edge - threshold {
            self.legend_pos = LegendPos::Floating;
        } else if self.legend_pos == LegendPos::Bottom && drag.current.y < bottom_edge - threshold
        {
            self.legend_pos = LegendPos::Floating;
        }

        if self.legend_pos == LegendPos::Floating {
            if drag.current.x > right_edge - threshold {
                self.legend_pos = LegendPos::Right;
            } else if drag.current.y > bottom_edge - threshold {
                self.legend_pos = LegendPos::Bottom;
            }
        }

        if old != self.legend_pos {
            // a dock change reshapes the legend and every plot rect
            self.legend_invalidated = true;
            self.invalidate();
        }

        debug!(pos = ?self.legend_pos, "legend moved");
        Some(PlotEvent::LegendMoved {
            pos: self.legend_pos,
            percent: self.legend_pos_percent,
        })
    }

    fn finish_highlight_drag(&mut self, drag: &DragState) -> Option<PlotEvent> {
        let dx = (drag.current.x - drag.anchor.x).abs();
        let dy = (drag.current.y - drag.anchor.y).abs();
        let rect = self.selection_rect(drag);

        match self.highlight_mode {
            HighlightMode::Disabled => None,
            HighlightMode::Span => {
                if dx <= self.interaction.span_commit_px {
                    return None;
                }
                self.highlight = self.region_from_rect(rect);
                self.highlight.top_percent = 0.0;
                self.highlight.bottom_percent = 100.0;
                Some(PlotEvent::HighlightChanged(self.highlight))
            }
            HighlightMode::Rect => {
                if dx <= self.interaction.rect_commit_px && dy <= self.interaction.rect_commit_px
                {
                    return None;
                }
                self.highlight = self.region_from_rect(rect);
                Some(PlotEvent::HighlightChanged(self.highlight))
            }
            HighlightMode::Zoom => {
                if dx <= self.interaction.zoom_commit_px && dy <= self.interaction.zoom_commit_px
                {
                    return None;
                }
                self.commit_zoom(drag.row, rect)
            }
        }
    }

    /// Drag selection clamped to the row it started in. Span selections
    /// take the full row height.
    fn selection_rect(&self, drag: &DragState) -> RealRect {
        let row = self
            .plot_rects
            .get(drag.row)
            .copied()
            .unwrap_or_else(|| RealRect::new(0.0, 0.0, 0.0, 0.0));
        let clamp_x = |v: f64| v.clamp(row.x, row.x + row.width);
        let clamp_y = |v: f64| v.clamp(row.y, row.y + row.height);

        let x0 = clamp_x(drag.anchor.x.min(drag.current.x));
        let x1 = clamp_x(drag.anchor.x.max(drag.current.x));
        if self.highlight_mode == HighlightMode::Span {
            RealRect::new(x0, row.y, x1 - x0, row.height)
        } else {
            let y0 = clamp_y(drag.anchor.y.min(drag.current.y));
            let y1 = clamp_y(drag.anchor.y.max(drag.current.y));
            RealRect::new(x0, y0, x1 - x0, y1 - y0)
        }
    }

    fn region_from_rect(&self, rect: RealRect) -> HighlightRegion {
        let Some(row) = self.plot_rects.first().copied() else {
            return HighlightRegion::default();
        };
        if row.width <= 0.0 || row.height <= 0.0 {
            return HighlightRegion::default();
        }
        HighlightRegion {
            left_percent: 100.0 * (rect.x - row.x) / row.width,
            right_percent: 100.0 * (rect.x + rect.width - row.x) / row.width,
            top_percent: 100.0 * (rect.y - row.y) / row.height,
            bottom_percent: 100.0 * (rect.y + rect.height - row.y) / row.height,
        }
    }

    /// Maps the selected pixel rect to world ranges through the row's bound
    /// axes and narrows them.
    fn commit_zoom(&mut self, row_index: usize, rect: RealRect) -> Option<PlotEvent> {
        let row = self.plot_rects.get(row_index).copied()?;
        let ppos = if row_index == 0 {
            PlotPos::Top
        } else {
            PlotPos::Bottom
        };

        let x_pos = if self.axis(AxisPos::XBottom, PlotPos::Top).is_some() {
            AxisPos::XBottom
        } else {
            AxisPos::XTop
        };
        let (x_min, x_max) = {
            let x = self.axis(x_pos, PlotPos::Top)?;
            (
                x.physical_to_world(rect.x, row.x, row.x + row.width),
                x.physical_to_world(rect.x + rect.width, row.x, row.x + row.width),
            )
        };

        let y_pos = if self.axis(AxisPos::YLeft, ppos).is_some() {
            AxisPos::YLeft
        } else {
            AxisPos::YRight
        };
        let y_range = self.axis(y_pos, ppos).map(|y| {
            // row pixels run top-down, world y runs bottom-up
            (
                y.physical_to_world(rect.y + rect.height, row.y + row.height, row.y),
                y.physical_to_world(rect.y, row.y + row.height, row.y),
            )
        });

        if let Some(x) = self.axis_mut(x_pos, PlotPos::Top) {
            x.set_world(x_min, x_max);
        }
        let (y_min, y_max) = match y_range {
            Some((lo, hi)) => {
                if let Some(y) = self.axis_mut(y_pos, ppos) {
                    y.set_world(lo, hi);
                }
                (lo, hi)
            }
            None => (f64::NAN, f64::NAN),
        };

        self.invalidate();
        debug!(x_min, x_max, y_min, y_max, "zoom committed");
        Some(PlotEvent::Zoom {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }
}
