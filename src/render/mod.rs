// src/render/mod.rs
pub mod charts;
pub mod kpi;
pub mod page;
pub mod tables;

pub use page::{render_page, write_page, Page, PAGE_FILE};
pub use tables::{RankingTable, RenderedTable, HIGHEST_POVERTY_RATE, RANKINGS, TOP_EVOLUTION};

/// Escape text for HTML/SVG element content and attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
