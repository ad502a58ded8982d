//! SVG restyling: stroke weight, endpoint dots and recoloring
//!
//! The source document is streamed through `quick-xml` and written back event
//! by event, so everything the transform does not touch is preserved as-is.

use std::sync::OnceLock;

use quick_xml::events::{BytesCData, BytesDecl, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;
use regex::{Captures, Regex};
use thiserror::Error;

use crate::config::ThemeConfig;

/// Radius of the endpoint dots drawn at the default stroke width
const DOT_RADIUS: f64 = 0.75;

#[derive(Error, Debug, PartialEq)]
pub enum StyleError {
    #[error("no style block")]
    MissingStyleBlock,

    #[error("{0}")]
    Xml(String),
}

/// Per-theme restyling parameters
#[derive(Debug, Clone, PartialEq)]
pub struct StyleTransform {
    pub line_weight: f64,
    pub src_color: String,
    pub dest_color: String,
}

fn stroke_width_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(stroke-width\s*:\s*)[^;]*?(\s*;)").expect("valid regex"))
}

fn stroke_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(stroke\s*:[^;]+;)").expect("valid regex"))
}

/// Shortest representation that round-trips (`2`, `1.5`, `2.25`)
fn format_number(value: f64) -> String {
    format!("{value}")
}

fn is_dot_radius(value: &[u8]) -> bool {
    value == b"0.75" || value == b".75"
}

fn xml_error(err: impl std::fmt::Display) -> StyleError {
    StyleError::Xml(err.to_string())
}

/// Text collected from the first `<style>` element
#[derive(Default)]
struct StyleBlock {
    css: String,
    cdata: bool,
}

impl StyleTransform {
    pub fn new(line_weight: f64, src_color: impl Into<String>, dest_color: impl Into<String>) -> Self {
        Self {
            line_weight,
            src_color: src_color.into(),
            dest_color: dest_color.into(),
        }
    }

    pub fn from_config(config: &ThemeConfig) -> Self {
        Self::new(config.line_weight, &config.src_color, &config.dest_color)
    }

    /// Rewrite the text of a style block.
    ///
    /// An existing `stroke-width` only has its value replaced. Without one, a
    /// width declaration is inserted after every `stroke` declaration.
    pub fn restyle_css(&self, css: &str) -> String {
        let weight = format_number(self.line_weight);

        let css = if css.contains("stroke-width") {
            stroke_width_re()
                .replace_all(css, |caps: &Captures| format!("{}{weight}px{}", &caps[1], &caps[2]))
                .into_owned()
        } else {
            stroke_re()
                .replace_all(css, |caps: &Captures| {
                    format!("{}stroke-width:{weight}px;", &caps[1])
                })
                .into_owned()
        };

        if self.src_color.is_empty() {
            return css;
        }
        css.replace(&self.src_color, &self.dest_color)
    }

    /// Apply the transform to a whole SVG document.
    ///
    /// Returns the serialized document with a UTF-8 XML declaration, or
    /// [`StyleError::MissingStyleBlock`] when the first `<style>` element is
    /// absent or empty.
    pub fn apply(&self, source: &str) -> Result<String, StyleError> {
        let mut reader = Reader::from_str(source);
        let mut writer = Writer::new(Vec::with_capacity(source.len() + 64));

        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_error)?;
        writer
            .write_event(Event::Text(BytesText::from_escaped("\n")))
            .map_err(xml_error)?;

        let mut in_prolog = true;
        let mut style: Option<StyleBlock> = None;
        let mut style_done = false;

        loop {
            let event = reader.read_event().map_err(xml_error)?;

            if in_prolog {
                match &event {
                    Event::Decl(_) => continue,
                    Event::Text(text) if text.iter().all(u8::is_ascii_whitespace) => continue,
                    _ => in_prolog = false,
                }
            }

            match event {
                Event::Eof => break,
                Event::Start(elem) if elem.local_name().as_ref() == b"circle" => {
                    writer
                        .write_event(Event::Start(self.scale_dot(&elem)?))
                        .map_err(xml_error)?;
                }
                Event::Empty(elem) if elem.local_name().as_ref() == b"circle" => {
                    writer
                        .write_event(Event::Empty(self.scale_dot(&elem)?))
                        .map_err(xml_error)?;
                }
                Event::Start(elem) if !style_done && elem.local_name().as_ref() == b"style" => {
                    style = Some(StyleBlock::default());
                    writer.write_event(Event::Start(elem)).map_err(xml_error)?;
                }
                Event::Empty(elem) if !style_done && elem.local_name().as_ref() == b"style" => {
                    return Err(StyleError::MissingStyleBlock);
                }
                Event::Text(text) if style.is_some() => {
                    let raw = std::str::from_utf8(&text).map_err(xml_error)?;
                    if let Some(block) = style.as_mut() {
                        block.css.push_str(raw);
                    }
                }
                Event::CData(data) if style.is_some() => {
                    let raw = std::str::from_utf8(&data).map_err(xml_error)?;
                    if let Some(block) = style.as_mut() {
                        block.css.push_str(raw);
                        block.cdata = true;
                    }
                }
                Event::End(end) if style.is_some() && end.local_name().as_ref() == b"style" => {
                    let block = style.take().unwrap_or_default();
                    if block.css.is_empty() {
                        return Err(StyleError::MissingStyleBlock);
                    }
                    let css = self.restyle_css(&block.css);
                    let content = if block.cdata {
                        Event::CData(BytesCData::new(css))
                    } else {
                        Event::Text(BytesText::from_escaped(css))
                    };
                    writer.write_event(content).map_err(xml_error)?;
                    writer.write_event(Event::End(end)).map_err(xml_error)?;
                    style_done = true;
                }
                other => writer.write_event(other).map_err(xml_error)?,
            }
        }

        if !style_done {
            return Err(StyleError::MissingStyleBlock);
        }

        let mut out = String::from_utf8(writer.into_inner()).map_err(xml_error)?;
        if !out.ends_with('\n') {
            out.push('\n');
        }
        Ok(out)
    }

    /// Copy a circle element, scaling the radius of endpoint dots
    fn scale_dot<'a>(&self, elem: &BytesStart<'a>) -> Result<BytesStart<'a>, StyleError> {
        let mut out = elem.clone();
        out.clear_attributes();

        let radius = format_number(DOT_RADIUS * self.line_weight);
        for attr in elem.attributes() {
            let attr = attr.map_err(xml_error)?;
            if attr.key.as_ref() == b"r" && is_dot_radius(&attr.value) {
                out.push_attribute(("r", radius.as_str()));
            } else {
                out.push_attribute(attr);
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ICON: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="48" height="48" viewBox="0 0 48 48">
  <defs>
    <style>.a{fill:none;stroke:#111111;stroke-linecap:round;stroke-linejoin:round;}</style>
  </defs>
  <path class="a" d="M10,10H38V38H10Z"/>
  <circle class="a" cx="24" cy="24" r="0.75"/>
  <circle class="a" cx="30" cy="24" r=".75"/>
  <circle class="a" cx="18" cy="24" r="4"/>
  <rect x="1" y="1" width="2" height="2" fill="#111111"/>
</svg>
"##;

    fn transform(weight: f64) -> StyleTransform {
        StyleTransform::new(weight, "#111111", "#ff0000")
    }

    #[test]
    fn test_inserts_stroke_width_after_stroke() {
        let css = transform(2.0).restyle_css(".a{fill:none;stroke:#111111;stroke-linecap:round;}");
        assert_eq!(
            css,
            ".a{fill:none;stroke:#ff0000;stroke-width:2px;stroke-linecap:round;}"
        );
    }

    #[test]
    fn test_replaces_existing_stroke_width_numeral_only() {
        let css = transform(1.5).restyle_css(".a{stroke:#111111;stroke-width: 1px;fill:none;}");
        assert_eq!(css, ".a{stroke:#ff0000;stroke-width: 1.5px;fill:none;}");

        let css = transform(3.0).restyle_css(".a{stroke-width : 2 ;}.b{stroke-width:1px;}");
        assert_eq!(css, ".a{stroke-width : 3px ;}.b{stroke-width:3px;}");
    }

    #[test]
    fn test_block_without_stroke_is_only_recolored() {
        let css = transform(2.0).restyle_css(".a{fill:#111111;}");
        assert_eq!(css, ".a{fill:#ff0000;}");
    }

    #[test]
    fn test_recolor_is_exact_and_limited_to_style_block() {
        let out = transform(1.0).apply(ICON).unwrap();
        let style_start = out.find("<style>").unwrap();
        let style_end = out.find("</style>").unwrap();
        let style = &out[style_start..style_end];

        assert_eq!(style.matches("#111111").count(), 0);
        assert_eq!(style.matches("#ff0000").count(), 1);
        // The rect fill lives outside the style block and keeps its color
        assert!(out.contains(r##"fill="#111111""##));
    }

    #[test]
    fn test_scales_endpoint_dots_only() {
        let out = transform(2.0).apply(ICON).unwrap();
        assert_eq!(out.matches(r#"r="1.5""#).count(), 2);
        assert!(out.contains(r#"r="4""#));
        assert!(!out.contains(r#"r="0.75""#));
        assert!(!out.contains(r#"r=".75""#));
    }

    #[test]
    fn test_writes_utf8_declaration_once() {
        let out = transform(1.0).apply(ICON).unwrap();
        assert!(out.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert_eq!(out.matches("<?xml").count(), 1);
        assert!(out.contains("<svg"));

        let without_decl = ICON.split_once('\n').unwrap().1;
        let out = transform(1.0).apply(without_decl).unwrap();
        assert!(out.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    }

    #[test]
    fn test_missing_style_block() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"><path d="M0,0H1"/></svg>"#;
        assert_eq!(transform(1.0).apply(svg), Err(StyleError::MissingStyleBlock));
    }

    #[test]
    fn test_empty_style_block() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"><style></style></svg>"#;
        assert_eq!(transform(1.0).apply(svg), Err(StyleError::MissingStyleBlock));

        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"><style/></svg>"#;
        assert_eq!(transform(1.0).apply(svg), Err(StyleError::MissingStyleBlock));
    }

    #[test]
    fn test_cdata_style_block() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"><style><![CDATA[.a{stroke:#111111;}]]></style></svg>"#;
        let out = transform(3.0).apply(svg).unwrap();
        assert!(out.contains("<![CDATA[.a{stroke:#ff0000;stroke-width:3px;}]]>"));
    }

    #[test]
    fn test_malformed_document() {
        let svg = r#"<svg><style>.a{}</style></g></svg>"#;
        assert!(matches!(transform(1.0).apply(svg), Err(StyleError::Xml(_))));
    }
}
