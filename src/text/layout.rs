//! Markup-aware text layout.
//!
//! A `TextLayout` is computed once against a device's current font and can
//! then be re-rendered any number of times at different origins, rotations,
//! and devices without re-measuring.

use smallvec::SmallVec;

use crate::core::types::RealPoint;
use crate::render::{Brush, Color, OutputDevice, Pen, TextExtent};

use super::symbols::{PLACEHOLDER_GLYPH, resolve_symbol};

/// Point-size reduction applied to super/subscript pieces.
const FONT_POINT_ADJUST: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlignment {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    Normal,
    Superscript,
    Subscript,
}

/// One measured run of text with a single script state.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPiece {
    pub text: String,
    pub script: Script,
    pub origin: RealPoint,
    pub size: TextExtent,
    aligned_x: f64,
}

type Line = SmallVec<[TextPiece; 4]>;

pub struct TextLayout {
    lines: Vec<Line>,
    bounds: RealPoint,
}

impl TextLayout {
    /// Measures and lays out `text` with the device's current font.
    pub fn new(dc: &mut dyn OutputDevice, text: &str, alignment: TextAlignment) -> Self {
        let mut layout = Self {
            lines: Vec::new(),
            bounds: RealPoint::new(0.0, 0.0),
        };
        if text.is_empty() {
            return layout;
        }

        // current font state, for subsequent relative adjustments
        let font = dc.font();
        let small = font.with_delta(font.point_delta - FONT_POINT_ADJUST);

        for line in text.split(['\r', '\n']).filter(|l| !l.is_empty()) {
            layout.lines.push(parse_pieces(&resolve_escapes(line)));
        }
        if layout.lines.is_empty() {
            return layout;
        }

        for line in &mut layout.lines {
            for piece in line.iter_mut() {
                dc.set_font(if piece.script == Script::Normal {
                    font
                } else {
                    small
                });
                piece.size = dc.measure(&piece.text);
            }
        }

        dc.set_font(small);
        let height_small = dc.measure("0").height;
        dc.set_font(font);
        let height_normal = dc.measure("0").height;

        // amount to raise/lower super/sub-scripts
        let offset = 0.25 * height_small;
        let mut y = 0.0;

        for line in &mut layout.lines {
            let mut x = 0.0;
            let mut has_sup = false;
            for piece in line.iter_mut() {
                if piece.script == Script::Superscript {
                    has_sup = true;
                }
                piece.aligned_x = x;
                piece.origin.x = x;
                x += piece.size.width;
            }
            if x > layout.bounds.x {
                layout.bounds.x = x;
            }

            if has_sup {
                y += offset;
            }
            for piece in line.iter_mut() {
                piece.origin.y = match piece.script {
                    Script::Normal => y,
                    Script::Superscript => y - offset,
                    Script::Subscript => y + height_normal - 3.0 * offset,
                };
            }

            y += height_normal + offset / 3.0;
        }

        if alignment != TextAlignment::Left {
            layout.align(alignment);
        }

        layout.bounds.y = y;
        layout
    }

    /// Re-aligns cached x-origins; sizes are not re-measured.
    pub fn align(&mut self, alignment: TextAlignment) {
        for line in &mut self.lines {
            let mut line_width = 0.0;
            for piece in line.iter_mut() {
                piece.origin.x = piece.aligned_x;
                line_width += piece.size.width;
            }

            let shift = match alignment {
                TextAlignment::Left => 0.0,
                TextAlignment::Center => 0.5 * (self.bounds.x - line_width),
                TextAlignment::Right => self.bounds.x - line_width,
            };
            if shift != 0.0 {
                for piece in line.iter_mut() {
                    piece.origin.x += shift;
                }
            }
        }
    }

    /// Replays the cached layout with its top-left corner at `(x, y)`,
    /// rotated counter-clockwise by `rotation_degrees` about that corner.
    pub fn render(
        &self,
        dc: &mut dyn OutputDevice,
        x: f64,
        y: f64,
        rotation_degrees: f64,
        draw_bounds: bool,
    ) {
        if self.lines.is_empty() {
            return;
        }

        let font = dc.font();
        let small = font.with_delta(font.point_delta - FONT_POINT_ADJUST);

        if draw_bounds {
            dc.set_pen(Pen::solid(Color::LIGHT_GREY, 0.5));
            dc.set_brush(Brush::none());
        }

        if rotation_degrees == 0.0 {
            for line in &self.lines {
                for piece in line {
                    dc.set_font(if piece.script == Script::Normal {
                        font
                    } else {
                        small
                    });
                    dc.text(&piece.text, x + piece.origin.x, y + piece.origin.y, 0.0);
                    if draw_bounds {
                        dc.rect(crate::core::types::RealRect::new(
                            x + piece.origin.x,
                            y + piece.origin.y,
                            piece.size.width,
                            piece.size.height,
                        ));
                    }
                }
            }
        } else {
            let theta = -std::f64::consts::PI / 180.0 * rotation_degrees;
            let (sin_theta, cos_theta) = theta.sin_cos();
            for line in &self.lines {
                for piece in line {
                    dc.set_font(if piece.script == Script::Normal {
                        font
                    } else {
                        small
                    });
                    let rot_x = piece.origin.x * cos_theta - piece.origin.y * sin_theta;
                    let rot_y = piece.origin.x * sin_theta + piece.origin.y * cos_theta;
                    dc.text(&piece.text, x + rot_x, y + rot_y, rotation_degrees);
                }
            }
        }

        dc.set_font(font);
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.bounds.x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.bounds.y
    }

    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn pieces(&self) -> impl Iterator<Item = &TextPiece> {
        self.lines.iter().flat_map(|line| line.iter())
    }
}

/// Replaces `\code` escapes with their glyphs. A doubled backslash yields a
/// literal backslash; an unknown non-empty code yields the placeholder
/// glyph. One space after a code is swallowed as a delimiter.
fn resolve_escapes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut literal_slash = false;
    while let Some(&ch) = chars.peek() {
        if ch == '\\' && !literal_slash {
            chars.next();
            let mut code = String::new();
            while let Some(&c) = chars.peek() {
                if c == '\\' || !c.is_alphabetic() {
                    break;
                }
                code.push(c);
                chars.next();
            }

            literal_slash = code.is_empty() && chars.peek() == Some(&'\\');

            if matches!(chars.peek(), Some(' ' | '\t')) {
                chars.next();
            }

            match resolve_symbol(&code) {
                Some(glyph) => out.push(glyph),
                None if literal_slash => {}
                None => out.push(PLACEHOLDER_GLYPH),
            }
        } else {
            literal_slash = false;
            out.push(ch);
            chars.next();
        }
    }
    out
}

/// Terminators for an unbraced super/subscript token.
fn ends_token(c: char) -> bool {
    matches!(
        c,
        ' ' | '/' | '\t' | '^' | '_' | '(' | '{' | '[' | '=' | ',' | ';'
    )
}

/// Splits one escaped line into script-tagged pieces.
fn parse_pieces(text: &str) -> Line {
    let chars: Vec<char> = text.chars().collect();
    let mut list = Line::new();
    let mut current = String::new();
    let mut i = 0;

    let mut push = |text: String, script: Script, list: &mut Line| {
        if !text.is_empty() {
            list.push(TextPiece {
                text,
                script,
                origin: RealPoint::new(0.0, 0.0),
                size: TextExtent::default(),
                aligned_x: 0.0,
            });
        }
    };

    while i < chars.len() {
        let ch = chars[i];
        if ch == '^' || ch == '_' {
            if i + 1 >= chars.len() || chars[i + 1] == ch {
                // doubled (or trailing) modifier is literal text
                current.push(ch);
                i += 2;
                continue;
            }

            push(std::mem::take(&mut current), Script::Normal, &mut list);
            let script = if ch == '^' {
                Script::Superscript
            } else {
                Script::Subscript
            };
            i += 1;

            let mut token = String::new();
            if chars[i] == '{' {
                i += 1;
                while i < chars.len() && chars[i] != '}' {
                    token.push(chars[i]);
                    i += 1;
                }
                if i < chars.len() {
                    i += 1; // closing brace
                }
                if i < chars.len() && (chars[i] == ' ' || chars[i] == '\t') {
                    i += 1;
                }
            } else {
                while i < chars.len() && !ends_token(chars[i]) {
                    token.push(chars[i]);
                    i += 1;
                }
                // swallow a single trailing space; other terminators are
                // reprocessed as ordinary input
                if i < chars.len() && chars[i] == ' ' {
                    i += 1;
                }
            }
            push(token, script, &mut list);
        } else {
            current.push(ch);
            i += 1;
        }
    }

    push(current, Script::Normal, &mut list);
    list
}
