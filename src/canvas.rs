use std::sync::Arc;

use indexmap::IndexMap;

use crate::types::{Color, Pt, Rect, Size, Transform};

/// Drawing primitive recorded for a page or a vector form.
///
/// Coordinates are absolute points with the origin at the lower-left corner.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SaveState,
    RestoreState,
    ConcatMatrix(Transform),
    // Non-rendered metadata used for page-aware reporting. Ignored by the PDF writer.
    Meta {
        key: String,
        value: String,
    },
    SetFillColor(Color),
    SetStrokeColor(Color),
    SetLineWidth(Pt),
    SetFontSize(Pt),
    MoveTo {
        x: Pt,
        y: Pt,
    },
    LineTo {
        x: Pt,
        y: Pt,
    },
    CurveTo {
        x1: Pt,
        y1: Pt,
        x2: Pt,
        y2: Pt,
        x: Pt,
        y: Pt,
    },
    ClosePath,
    Fill,
    Stroke,
    FillStroke,
    DrawString {
        x: Pt,
        y: Pt,
        text: String,
    },
    Rectangle {
        x: Pt,
        y: Pt,
        width: Pt,
        height: Pt,
    },
    DrawForm {
        resource_id: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub width: Pt,
    pub color: Color,
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            width: Pt::from_f32(1.0),
            color: Color::BLACK,
        }
    }
}

/// Pre-rendered vector art with its own coordinate space of
/// `width` x `height` points.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorForm {
    pub id: String,
    pub width: Pt,
    pub height: Pt,
    pub commands: Vec<Command>,
}

impl VectorForm {
    pub fn new(id: impl Into<String>, width: Pt, height: Pt, commands: Vec<Command>) -> Self {
        Self {
            id: id.into(),
            width,
            height,
            commands,
        }
    }
}

pub trait Surface {
    fn draw_line(&mut self, from: (Pt, Pt), to: (Pt, Pt), stroke: Stroke);

    fn draw_rect(&mut self, rect: Rect, stroke: Option<Stroke>, fill: Option<Color>);

    fn draw_text(&mut self, x: Pt, y: Pt, font_size: Pt, text: &str);

    fn draw_form(&mut self, form: &Arc<VectorForm>, transform: Transform);

    fn record_bounds(&mut self, _name: &str, _rect: Rect) {}

    fn show_page(&mut self);

    fn current_command_count(&self) -> usize {
        0
    }
}

#[derive(Debug, Clone, Default)]
pub struct RenderedPage {
    pub commands: Vec<Command>,
}

#[derive(Debug, Clone)]
pub struct Document {
    pub page_size: Size,
    pub pages: Vec<RenderedPage>,
    pub forms: IndexMap<String, Arc<VectorForm>>,
}

#[derive(Debug, Clone)]
struct GraphicsState {
    fill_color: Color,
    stroke_color: Color,
    line_width: Pt,
    font_size: Pt,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            fill_color: Color::BLACK,
            stroke_color: Color::BLACK,
            line_width: Pt::from_f32(1.0),
            font_size: Pt::from_f32(12.0),
        }
    }
}

pub struct Canvas {
    page_size: Size,
    pages: Vec<RenderedPage>,
    current: RenderedPage,
    current_state: GraphicsState,
    forms: IndexMap<String, Arc<VectorForm>>,
}

impl Canvas {
    pub fn new(page_size: Size) -> Self {
        Self {
            page_size,
            pages: Vec::new(),
            current: RenderedPage::default(),
            current_state: GraphicsState::default(),
            forms: IndexMap::new(),
        }
    }

    pub fn page_size(&self) -> Size {
        self.page_size
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn meta(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.current.commands.push(Command::Meta {
            key: key.into(),
            value: value.into(),
        });
    }

    fn set_fill_color(&mut self, color: Color) {
        if self.current_state.fill_color == color {
            return;
        }
        self.current_state.fill_color = color;
        self.current.commands.push(Command::SetFillColor(color));
    }

    fn set_stroke(&mut self, stroke: Stroke) {
        if self.current_state.stroke_color != stroke.color {
            self.current_state.stroke_color = stroke.color;
            self.current
                .commands
                .push(Command::SetStrokeColor(stroke.color));
        }
        let width = stroke.width.max(Pt::ZERO);
        if self.current_state.line_width != width {
            self.current_state.line_width = width;
            self.current.commands.push(Command::SetLineWidth(width));
        }
    }

    fn set_font_size(&mut self, size: Pt) {
        if self.current_state.font_size == size {
            return;
        }
        self.current_state.font_size = size;
        self.current.commands.push(Command::SetFontSize(size));
    }

    pub fn is_current_empty(&self) -> bool {
        self.current.commands.is_empty()
    }

    pub fn finish(mut self) -> Document {
        if !self.current.commands.is_empty() {
            self.show_page();
        }
        Document {
            page_size: self.page_size,
            pages: self.pages,
            forms: self.forms,
        }
    }
}

impl Surface for Canvas {
    fn draw_line(&mut self, from: (Pt, Pt), to: (Pt, Pt), stroke: Stroke) {
        self.set_stroke(stroke);
        self.current.commands.push(Command::MoveTo {
            x: from.0,
            y: from.1,
        });
        self.current.commands.push(Command::LineTo { x: to.0, y: to.1 });
        self.current.commands.push(Command::Stroke);
    }

    fn draw_rect(&mut self, rect: Rect, stroke: Option<Stroke>, fill: Option<Color>) {
        if stroke.is_none() && fill.is_none() {
            return;
        }
        if let Some(stroke) = stroke {
            self.set_stroke(stroke);
        }
        if let Some(fill) = fill {
            self.set_fill_color(fill);
        }
        self.current.commands.push(Command::Rectangle {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
        });
        let paint = match (stroke.is_some(), fill.is_some()) {
            (true, true) => Command::FillStroke,
            (true, false) => Command::Stroke,
            _ => Command::Fill,
        };
        self.current.commands.push(paint);
    }

    fn draw_text(&mut self, x: Pt, y: Pt, font_size: Pt, text: &str) {
        self.set_font_size(font_size);
        self.current.commands.push(Command::DrawString {
            x,
            y,
            text: text.to_string(),
        });
    }

    fn draw_form(&mut self, form: &Arc<VectorForm>, transform: Transform) {
        self.forms
            .entry(form.id.clone())
            .or_insert_with(|| Arc::clone(form));
        self.current.commands.push(Command::SaveState);
        self.current.commands.push(Command::ConcatMatrix(transform));
        self.current.commands.push(Command::DrawForm {
            resource_id: form.id.clone(),
        });
        self.current.commands.push(Command::RestoreState);
    }

    fn record_bounds(&mut self, name: &str, rect: Rect) {
        let value = format!(
            "{},{},{},{}",
            rect.x.to_milli_i64(),
            rect.y.to_milli_i64(),
            rect.width.to_milli_i64(),
            rect.height.to_milli_i64()
        );
        self.meta(format!("__folio_bbox:{name}"), value);
    }

    fn show_page(&mut self) {
        let current = std::mem::take(&mut self.current);
        self.pages.push(current);
        self.current_state = GraphicsState::default();
    }

    fn current_command_count(&self) -> usize {
        self.current.commands.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letter() -> Size {
        Size {
            width: Pt::from_f32(612.0),
            height: Pt::from_f32(792.0),
        }
    }

    #[test]
    fn redundant_state_changes_are_skipped() {
        let mut canvas = Canvas::new(letter());
        let stroke = Stroke::default();
        canvas.draw_line((Pt::ZERO, Pt::ZERO), (Pt::from_f32(10.0), Pt::ZERO), stroke);
        let thick = Stroke {
            width: Pt::from_f32(2.0),
            color: Color::GRAY,
        };
        canvas.draw_line((Pt::ZERO, Pt::ZERO), (Pt::from_f32(10.0), Pt::ZERO), thick);
        canvas.draw_line((Pt::ZERO, Pt::ZERO), (Pt::from_f32(10.0), Pt::ZERO), thick);
        let doc = canvas.finish();
        let commands = &doc.pages[0].commands;
        let width_changes = commands
            .iter()
            .filter(|cmd| matches!(cmd, Command::SetLineWidth(_)))
            .count();
        assert_eq!(width_changes, 1);
        assert_eq!(commands.len(), 3 + 2 + 3 + 3);
    }

    #[test]
    fn show_page_starts_a_new_command_list() {
        let mut canvas = Canvas::new(letter());
        canvas.draw_text(Pt::ZERO, Pt::ZERO, Pt::from_f32(12.0), "first");
        canvas.show_page();
        assert!(canvas.is_current_empty());
        canvas.draw_text(Pt::ZERO, Pt::ZERO, Pt::from_f32(12.0), "second");
        let doc = canvas.finish();
        assert_eq!(doc.pages.len(), 2);
        assert_eq!(
            doc.pages[1].commands,
            vec![Command::DrawString {
                x: Pt::ZERO,
                y: Pt::ZERO,
                text: "second".to_string()
            }]
        );
    }

    #[test]
    fn forms_are_registered_once() {
        let form = Arc::new(VectorForm::new(
            "glyph",
            Pt::from_f32(10.0),
            Pt::from_f32(10.0),
            vec![Command::Stroke],
        ));
        let mut canvas = Canvas::new(letter());
        canvas.draw_form(&form, Transform::IDENTITY);
        canvas.draw_form(&form, Transform::scale(2.0, 2.0));
        canvas.record_bounds("glyph", Rect {
            x: Pt::ZERO,
            y: Pt::ZERO,
            width: Pt::from_f32(1.5),
            height: Pt::from_f32(2.0),
        });
        let doc = canvas.finish();
        assert_eq!(doc.forms.len(), 1);
        assert!(doc.pages[0].commands.contains(&Command::Meta {
            key: "__folio_bbox:glyph".to_string(),
            value: "0,0,1500,2000".to_string(),
        }));
    }
}
