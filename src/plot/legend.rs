//! Legend sizing, placement, and drawing.

use serde::{Deserialize, Serialize};

use crate::core::types::{RealPoint, RealRect};
use crate::render::{Brush, Color, OutputDevice, Pen};
use crate::text::{TextAlignment, TextLayout};

use super::{LEGEND_ITEM_BOX, Plot, TEXT_SPACE};

/// Where the legend sits relative to the plot.
///
/// `Floating` positions by percent of the client area and is draggable;
/// `Bottom` and `Right` dock the legend outside the plot rows and reserve
/// layout space for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegendPos {
    Floating,
    NorthWest,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    Bottom,
    Right,
}

impl LegendPos {
    /// Parses a host-config location name, e.g. `"northeast"` or `"bottom"`.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "floating" => Some(Self::Floating),
            "northwest" => Some(Self::NorthWest),
            "north" => Some(Self::North),
            "northeast" => Some(Self::NorthEast),
            "east" => Some(Self::East),
            "southeast" => Some(Self::SouthEast),
            "south" => Some(Self::South),
            "southwest" => Some(Self::SouthWest),
            "west" => Some(Self::West),
            "bottom" => Some(Self::Bottom),
            "right" => Some(Self::Right),
            _ => None,
        }
    }
}

/// One legend entry with its cached text layout.
pub(crate) struct LegendItem {
    pub(crate) text: String,
    pub(crate) layout: TextLayout,
    pub(crate) plot_index: usize,
}

impl Plot {
    /// Rebuilds legend item layouts and the legend rect size when the
    /// legend cache has been invalidated. Expects the legend font to be
    /// active on the device.
    pub(crate) fn calc_legend_text_layout(&mut self, dc: &mut dyn OutputDevice) {
        if !self.show_legend || !self.legend_invalidated {
            return;
        }

        let entries: Vec<(usize, String)> = self
            .plots
            .iter()
            .enumerate()
            .filter(|(_, b)| b.plot.is_shown_in_legend())
            .map(|(i, b)| (i, b.plot.label().to_owned()))
            .collect();

        self.legend_items.clear();
        for (plot_index, text) in entries {
            let layout = TextLayout::new(dc, &text, TextAlignment::Left);
            self.legend_items.push(LegendItem {
                text,
                layout,
                plot_index,
            });
        }

        if self.legend_pos == LegendPos::Bottom {
            self.legend_rect.width = 0.0;
            self.legend_rect.height = 0.0;
            for item in &self.legend_items {
                if item.text.is_empty() {
                    continue;
                }
                if item.layout.height() > self.legend_rect.height {
                    self.legend_rect.height = item.layout.height();
                }
                self.legend_rect.width +=
                    item.layout.width() + 5.0 * TEXT_SPACE + LEGEND_ITEM_BOX.x;
            }
        } else {
            self.legend_rect.width = 0.0;
            self.legend_rect.height = TEXT_SPACE;
            for item in &self.legend_items {
                if item.text.is_empty() {
                    continue;
                }
                if item.layout.width() > self.legend_rect.width {
                    self.legend_rect.width = item.layout.width();
                }
                let height = item.layout.height().max(LEGEND_ITEM_BOX.y);
                self.legend_rect.height += height + TEXT_SPACE;
            }
        }

        self.legend_rect.width += LEGEND_ITEM_BOX.x + 5.0 * TEXT_SPACE;
        self.legend_invalidated = false;
    }

    /// Positions the legend rect within `geom` and draws the entries.
    pub(crate) fn draw_legend(&mut self, dc: &mut dyn OutputDevice, geom: RealRect) {
        if !self.show_legend {
            return;
        }

        let horizontal = self.legend_pos == LegendPos::Bottom;
        let mut max_item_height = 0.0f64;
        let mut max_item_width = 0.0f64;
        for item in &self.legend_items {
            max_item_height = max_item_height.max(item.layout.height());
            max_item_width = max_item_width.max(item.layout.width());
        }

        if self.legend_pos == LegendPos::Floating {
            self.legend_pos_percent = RealPoint::new(
                self.legend_pos_percent.x.clamp(-10.0, 90.0),
                self.legend_pos_percent.y.clamp(-10.0, 90.0),
            );
            self.legend_rect.x = geom.x + self.legend_pos_percent.x / 100.0 * geom.width;
            self.legend_rect.y = geom.y + self.legend_pos_percent.y / 100.0 * geom.height;
        } else {
            let r = &mut self.legend_rect;
            match self.legend_pos {
                LegendPos::NorthWest => {
                    r.x = geom.x + TEXT_SPACE * 2.0;
                    r.y = geom.y + TEXT_SPACE * 2.0;
                }
                LegendPos::SouthWest => {
                    r.x = geom.x + TEXT_SPACE * 2.0;
                    r.y = geom.y + geom.height - r.height - TEXT_SPACE * 2.0;
                }
                LegendPos::NorthEast => {
                    r.x = geom.x + geom.width - r.width - TEXT_SPACE * 2.0;
                    r.y = geom.y + TEXT_SPACE * 2.0;
                }
                LegendPos::SouthEast => {
                    r.x = geom.x + geom.width - r.width - TEXT_SPACE * 2.0;
                    r.y = geom.y + geom.height - r.height - TEXT_SPACE * 2.0;
                }
                LegendPos::North => {
                    r.x = geom.x + geom.width / 2.0 - r.width / 2.0;
                    r.y = geom.y + TEXT_SPACE * 2.0;
                }
                LegendPos::South => {
                    r.x = geom.x + geom.width / 2.0 - r.width / 2.0;
                    r.y = geom.y + geom.height - r.height - TEXT_SPACE * 2.0;
                }
                LegendPos::East => {
                    r.x = geom.x + geom.width - r.width - TEXT_SPACE * 2.0;
                    r.y = geom.y + geom.height / 2.0 - r.height / 2.0;
                }
                LegendPos::West => {
                    r.x = geom.x + TEXT_SPACE * 2.0;
                    r.y = geom.y + geom.height / 2.0 - r.height / 2.0;
                }
                LegendPos::Bottom => {
                    r.x = geom.x + TEXT_SPACE;
                    r.y = geom.y + geom.height - max_item_height - TEXT_SPACE;
                }
                LegendPos::Right => {
                    r.y = geom.y + TEXT_SPACE;
                    r.x = geom.x + geom.width
                        - max_item_width
                        - 5.0 * TEXT_SPACE
                        - LEGEND_ITEM_BOX.x;
                }
                LegendPos::Floating => {}
            }
        }

        dc.set_antialiasing(false);

        if self.legend_pos != LegendPos::Bottom && self.legend_pos != LegendPos::Right {
            dc.set_brush(Brush::solid(Color::WHITE));
            dc.set_pen(Pen::solid(Color::LIGHT_GREY, 0.5));
            dc.rect(self.legend_rect);
        }

        let mut x = self.legend_rect.x;
        let mut y = self.legend_rect.y + TEXT_SPACE;
        let count = self.legend_items.len();
        for i in 0..count {
            let index = if self.reverse_legend { count - i - 1 } else { i };
            let item = &self.legend_items[index];
            if item.text.is_empty() {
                continue;
            }

            let yoff_text = if horizontal {
                (max_item_height - item.layout.height()) / 2.0
            } else {
                0.0
            };
            item.layout.render(
                dc,
                x + LEGEND_ITEM_BOX.x + 3.0 * TEXT_SPACE,
                y + yoff_text,
                0.0,
                false,
            );

            let yoff_box = if horizontal {
                max_item_height / 2.0 - LEGEND_ITEM_BOX.y / 2.0
            } else {
                item.layout.height() / 2.0 - LEGEND_ITEM_BOX.y / 2.0
            };

            let binding = &self.plots[item.plot_index];
            dc.set_antialiasing(binding.plot.antialiasing());
            binding.plot.draw_in_legend(
                dc,
                RealRect::new(
                    x + 2.0 * TEXT_SPACE,
                    y + yoff_box,
                    LEGEND_ITEM_BOX.x,
                    LEGEND_ITEM_BOX.y,
                ),
            );

            if horizontal {
                x += 5.0 * TEXT_SPACE + LEGEND_ITEM_BOX.x + item.layout.width();
            } else {
                y += item.layout.height() + TEXT_SPACE;
            }
        }

        dc.set_antialiasing(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_location_names() {
        assert_eq!(LegendPos::parse("northeast"), Some(LegendPos::NorthEast));
        assert_eq!(LegendPos::parse(" Bottom "), Some(LegendPos::Bottom));
        assert_eq!(LegendPos::parse("floating"), Some(LegendPos::Floating));
        assert_eq!(LegendPos::parse("middle"), None);
    }
}
