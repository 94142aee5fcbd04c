use std::path::Path;

use minijinja::Environment;
use quick_xml::events::Event;
use quick_xml::{Reader, Writer};
use serde::Serialize;
use tracing::debug;

use crate::RenderError;

const TEMPLATE_NAME: &str = "chart.svg";

/// Values handed to the svg template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderContext {
    pub theme: &'static str,
    /// Space separated `x,y` pairs
    pub points: String,
    pub price_labels: Vec<String>,
    #[serde(rename = "currentX")]
    pub current_x: f64,
    pub price_level: String,
    /// Current price in cents
    pub current_price: i64,
    pub show_now: bool,
}

/// A loaded chart template.
///
/// Build it once and pass it to every render call.
pub struct SvgTemplate {
    env: Environment<'static>,
}

impl SvgTemplate {
    pub fn from_source(source: impl Into<String>) -> Result<Self, RenderError> {
        let mut env = Environment::new();
        env.add_template_owned(TEMPLATE_NAME, source.into())?;

        Ok(Self { env })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RenderError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading template");

        Self::from_source(std::fs::read_to_string(path)?)
    }

    pub fn render(&self, context: &RenderContext) -> Result<String, RenderError> {
        Ok(self.env.get_template(TEMPLATE_NAME)?.render(context)?)
    }
}

/// Re-serialize `svg` without blank text between elements and without an xml
/// declaration.
///
/// Only whitespace-only text nodes are dropped; text with content is kept as is,
/// including its surrounding spaces.
pub fn compact_svg(svg: &str) -> Result<String, RenderError> {
    let mut reader = Reader::from_str(svg);
    let mut writer = Writer::new(Vec::new());

    loop {
        match reader.read_event()? {
            Event::Eof => break,
            Event::Decl(_) => {}
            Event::Text(text) if text.iter().all(u8::is_ascii_whitespace) => {}
            event => writer.write_event(event)?,
        }
    }

    String::from_utf8(writer.into_inner())
        .map_err(|e| RenderError::Xml(quick_xml::Error::from(e.utf8_error())))
}
