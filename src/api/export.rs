use std::fmt::Write as _;
use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::error::{MapError, MapResult};
use crate::style::LegendEntry;

/// Self-contained HTML page embedding one PNG as a data URI.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HtmlReport {
    pub title: String,
    pub rows: Vec<(String, String)>,
    pub legend: Vec<LegendEntry>,
    pub image_base64: String,
}

impl HtmlReport {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_row(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.rows.push((label.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_legend(mut self, legend: Vec<LegendEntry>) -> Self {
        self.legend = legend;
        self
    }

    #[must_use]
    pub fn with_png(mut self, png: &[u8]) -> Self {
        self.image_base64 = STANDARD.encode(png);
        self
    }

    #[must_use]
    pub fn to_html(&self) -> String {
        let title = escape_html(&self.title);
        let mut html = String::with_capacity(self.image_base64.len() + 2048);
        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
        let _ = writeln!(html, "<title>{title}</title>");
        html.push_str(
            "<style>\n\
             body { font-family: sans-serif; margin: 2em; background: #f5f5f5; }\n\
             .info { background: #fff; padding: 1em; border-radius: 6px; margin-bottom: 1em; }\n\
             .info td { padding: 2px 12px 2px 0; }\n\
             .map img { max-width: 100%; border: 1px solid #999; }\n\
             .legend span.swatch { display: inline-block; width: 14px; height: 14px; margin: 0 6px 0 16px; vertical-align: middle; }\n\
             </style>\n</head>\n<body>\n",
        );
        let _ = writeln!(html, "<h1>{title}</h1>");

        if !self.rows.is_empty() {
            html.push_str("<div class=\"info\"><table>\n");
            for (label, value) in &self.rows {
                let _ = writeln!(
                    html,
                    "<tr><td><strong>{}</strong></td><td>{}</td></tr>",
                    escape_html(label),
                    escape_html(value)
                );
            }
            html.push_str("</table></div>\n");
        }

        let _ = writeln!(
            html,
            "<div class=\"map\"><img alt=\"{title}\" src=\"data:image/png;base64,{}\"></div>",
            self.image_base64
        );

        if !self.legend.is_empty() {
            html.push_str("<div class=\"legend\"><h3>Legend</h3>\n");
            for entry in &self.legend {
                let _ = writeln!(
                    html,
                    "<span class=\"swatch\" style=\"background: {}\"></span>{}",
                    entry.color.to_hex(),
                    escape_html(entry.label)
                );
            }
            html.push_str("</div>\n");
        }
        html.push_str("</body>\n</html>\n");
        html
    }

    pub fn write_to(&self, path: &Path) -> MapResult<()> {
        std::fs::write(path, self.to_html()).map_err(|err| MapError::io(path, err))
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
