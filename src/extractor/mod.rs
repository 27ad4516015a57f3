pub mod cleaner;
pub mod model;
pub mod reader;

#[cfg(test)]
mod tests;

pub use model::PageText;

use scraper::Html;
use tracing::debug;

/// Below this many characters the extracted text is replaced by the page body.
pub const MIN_EXTRACTED_CHARS: usize = 100;

/// Best-effort main-content text of a parsed document. Never fails.
pub fn extract(document: &Html) -> PageText {
    // 1. Known content containers
    let content = match reader::best_container_text(document) {
        Some(text) => {
            debug!(chars = text.chars().count(), "matched content container");
            text
        }
        // 2. Substantial paragraphs
        None => reader::paragraph_text(document),
    };

    // 3. Normalize
    let content = cleaner::clean_text(&content);

    // 4. Whole body fallback
    if content.chars().count() < MIN_EXTRACTED_CHARS {
        debug!("extracted content too short, falling back to body text");
        return PageText::new(cleaner::clean_text(&reader::body_text(document)));
    }

    PageText::new(content)
}

/// Parse raw HTML and extract its main text.
pub fn extract_html(html: &str) -> PageText {
    let document = Html::parse_document(html);
    extract(&document)
}
