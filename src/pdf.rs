use std::fs;
use std::path::Path;

use fixed::types::I32F32;
use indexmap::IndexMap;
use lopdf::{Document as LoDocument, Object as LoObject, ObjectId as LoObjectId, Stream as LoStream, dictionary};

use crate::canvas::{Command, Document};
use crate::error::FolioError;
use crate::types::{Color, Pt};

const FONT_RESOURCE: &str = "F1";

pub fn document_to_pdf(document: &Document) -> Result<Vec<u8>, FolioError> {
    let mut pdf = LoDocument::with_version("1.7");

    let font_id = pdf.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut forms: IndexMap<String, (String, LoObjectId)> = IndexMap::new();
    for (index, (id, form)) in document.forms.iter().enumerate() {
        let resource = format!("Fm{}", index + 1);
        let content = content_stream(&form.commands, &forms);
        let bbox: Vec<LoObject> = vec![
            LoObject::Integer(0),
            LoObject::Integer(0),
            LoObject::Real(form.width.to_f32()),
            LoObject::Real(form.height.to_f32()),
        ];
        let form_id = pdf.add_object(LoStream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Form",
                "FormType" => 1,
                "BBox" => bbox,
                "Resources" => dictionary! {
                    "Font" => dictionary! { FONT_RESOURCE => font_id },
                },
            },
            content.into_bytes(),
        ));
        forms.insert(id.clone(), (resource, form_id));
    }

    let pages_id = pdf.new_object_id();
    let media_box: Vec<LoObject> = vec![
        LoObject::Integer(0),
        LoObject::Integer(0),
        LoObject::Real(document.page_size.width.to_f32()),
        LoObject::Real(document.page_size.height.to_f32()),
    ];

    let mut xobjects = lopdf::Dictionary::new();
    for (resource, form_id) in forms.values() {
        xobjects.set(resource.as_bytes().to_vec(), *form_id);
    }

    let mut kids: Vec<LoObject> = Vec::with_capacity(document.pages.len());
    for page in &document.pages {
        let content = content_stream(&page.commands, &forms);
        let content_id = pdf.add_object(LoStream::new(dictionary! {}, content.into_bytes()));
        let page_id = pdf.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { FONT_RESOURCE => font_id },
                "XObject" => xobjects.clone(),
            },
            "MediaBox" => media_box.clone(),
        });
        kids.push(LoObject::Reference(page_id));
    }

    pdf.objects.insert(
        pages_id,
        LoObject::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => document.pages.len() as i64,
        }),
    );
    let catalog_id = pdf.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    pdf.trailer.set("Root", catalog_id);
    pdf.compress();

    let mut out = Vec::new();
    pdf.save_to(&mut out)?;
    Ok(out)
}

pub fn write_pdf(document: &Document, path: impl AsRef<Path>) -> Result<usize, FolioError> {
    let bytes = document_to_pdf(document)?;
    fs::write(path, &bytes)?;
    Ok(bytes.len())
}

fn content_stream(commands: &[Command], forms: &IndexMap<String, (String, LoObjectId)>) -> String {
    let mut out = String::new();
    let mut font_size = Pt::from_f32(12.0);
    for command in commands {
        match command {
            Command::SaveState => out.push_str("q\n"),
            Command::RestoreState => out.push_str("Q\n"),
            Command::ConcatMatrix(transform) => {
                let [a, b, c, d, e, f] = transform.as_array();
                out.push_str(&format!(
                    "{} {} {} {} {} {} cm\n",
                    fmt(a),
                    fmt(b),
                    fmt(c),
                    fmt(d),
                    fmt(e),
                    fmt(f)
                ));
            }
            Command::Meta { .. } => {}
            Command::SetFillColor(color) => out.push_str(&format!("{} rg\n", rgb(*color))),
            Command::SetStrokeColor(color) => out.push_str(&format!("{} RG\n", rgb(*color))),
            Command::SetLineWidth(width) => out.push_str(&format!("{} w\n", fmt_pt(*width))),
            Command::SetFontSize(size) => font_size = *size,
            Command::MoveTo { x, y } => {
                out.push_str(&format!("{} {} m\n", fmt_pt(*x), fmt_pt(*y)));
            }
            Command::LineTo { x, y } => {
                out.push_str(&format!("{} {} l\n", fmt_pt(*x), fmt_pt(*y)));
            }
            Command::CurveTo {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                out.push_str(&format!(
                    "{} {} {} {} {} {} c\n",
                    fmt_pt(*x1),
                    fmt_pt(*y1),
                    fmt_pt(*x2),
                    fmt_pt(*y2),
                    fmt_pt(*x),
                    fmt_pt(*y),
                ));
            }
            Command::ClosePath => out.push_str("h\n"),
            Command::Fill => out.push_str("f\n"),
            Command::Stroke => out.push_str("S\n"),
            Command::FillStroke => out.push_str("B\n"),
            Command::DrawString { x, y, text } => {
                out.push_str("BT\n");
                out.push_str(&format!("/{} {} Tf\n", FONT_RESOURCE, fmt_pt(font_size)));
                out.push_str(&format!("{} {} Td\n", fmt_pt(*x), fmt_pt(*y)));
                out.push_str(&format!("({}) Tj\n", escape_pdf_string(text)));
                out.push_str("ET\n");
            }
            Command::Rectangle {
                x,
                y,
                width,
                height,
            } => {
                out.push_str(&format!(
                    "{} {} {} {} re\n",
                    fmt_pt(*x),
                    fmt_pt(*y),
                    fmt_pt(*width),
                    fmt_pt(*height)
                ));
            }
            Command::DrawForm { resource_id } => match forms.get(resource_id) {
                Some((resource, _)) => out.push_str(&format!("/{resource} Do\n")),
                None => log::warn!("form '{resource_id}' is not registered; skipped"),
            },
        }
    }
    out
}

/// Literal string in WinAnsi; characters outside Latin-1 become `?`.
fn escape_pdf_string(input: &str) -> String {
    let mut out = String::new();
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            ' '..='~' => out.push(ch),
            '\u{a0}'..='\u{ff}' => out.push_str(&format!("\\{:03o}", ch as u32)),
            _ => out.push('?'),
        }
    }
    out
}

fn rgb(color: Color) -> String {
    format!("{} {} {}", fmt(color.r), fmt(color.g), fmt(color.b))
}

fn fmt(value: f32) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let fixed = I32F32::from_num(value);
    let scaled = (fixed * I32F32::from_num(1000)).round();
    let milli: i64 = scaled.to_num();
    format_milli(milli)
}

fn format_milli(milli: i64) -> String {
    if milli == 0 {
        return "0".to_string();
    }
    let sign = if milli < 0 { "-" } else { "" };
    let abs = milli.abs();
    let int_part = abs / 1000;
    let frac_part = abs % 1000;
    if frac_part == 0 {
        return format!("{sign}{int_part}");
    }
    let mut s = format!("{sign}{int_part}.{frac_part:03}");
    while s.ends_with('0') {
        s.pop();
    }
    s
}

fn fmt_pt(value: Pt) -> String {
    format_milli(value.to_milli_i64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{Canvas, Surface, VectorForm};
    use crate::types::{Size, Transform};
    use std::sync::Arc;

    fn letter() -> Size {
        Size {
            width: Pt::from_f32(612.0),
            height: Pt::from_f32(792.0),
        }
    }

    #[test]
    fn numbers_are_compact() {
        assert_eq!(format_milli(0), "0");
        assert_eq!(format_milli(12_000), "12");
        assert_eq!(format_milli(-1_500), "-1.5");
        assert_eq!(format_milli(36_125), "36.125");
        assert_eq!(fmt(0.5), "0.5");
    }

    #[test]
    fn strings_are_escaped() {
        assert_eq!(escape_pdf_string("a(b)\\"), "a\\(b\\)\\\\");
        assert_eq!(escape_pdf_string("é"), "\\351");
        assert_eq!(escape_pdf_string("字"), "?");
    }

    #[test]
    fn content_uses_pdf_coordinates_unchanged() {
        let commands = vec![
            Command::SetFontSize(Pt::from_f32(10.0)),
            Command::DrawString {
                x: Pt::from_f32(36.0),
                y: Pt::from_f32(700.0),
                text: "Hi".to_string(),
            },
            Command::Meta {
                key: "k".to_string(),
                value: "v".to_string(),
            },
        ];
        let content = content_stream(&commands, &IndexMap::new());
        assert_eq!(content, "BT\n/F1 10 Tf\n36 700 Td\n(Hi) Tj\nET\n");
    }

    #[test]
    fn documents_serialise_with_every_page() {
        let mut canvas = Canvas::new(letter());
        let form = Arc::new(VectorForm::new(
            "glyph",
            Pt::from_f32(50.0),
            Pt::from_f32(50.0),
            vec![Command::Rectangle {
                x: Pt::ZERO,
                y: Pt::ZERO,
                width: Pt::from_f32(50.0),
                height: Pt::from_f32(50.0),
            }, Command::Fill],
        ));
        canvas.draw_text(Pt::from_f32(36.0), Pt::from_f32(700.0), Pt::from_f32(12.0), "page one");
        canvas.show_page();
        canvas.draw_form(&form, Transform::translate(Pt::from_f32(100.0), Pt::from_f32(100.0)));
        let document = canvas.finish();

        let bytes = document_to_pdf(&document).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.7"));
        let parsed = LoDocument::load_mem(&bytes).unwrap();
        assert_eq!(parsed.get_pages().len(), 2);
    }
}
