use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

/// Content containers, most specific first.
const CONTENT_SELECTORS: &[&str] = &[
    // Article content
    "article",
    "[role='main']",
    ".article-content",
    ".post-content",
    ".entry-content",
    ".content",
    ".main-content",
    // Financial news
    ".financial-news",
    ".market-news",
    ".business-news",
    ".stock-news",
    // Common content areas
    ".text-content",
    ".body-content",
    ".story-content",
    ".news-content",
    // Main content fallbacks
    "main",
    "#main",
    "#content",
    ".main",
];

pub const MIN_CONTAINER_CHARS: usize = 100;
pub const MIN_PARAGRAPH_CHARS: usize = 50;

static PARSED_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    CONTENT_SELECTORS
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .collect()
});

static PARAGRAPH_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());

static BODY_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("body").unwrap());

fn trimmed_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Longest qualifying element of the first selector that has one.
pub fn best_container_text(document: &Html) -> Option<String> {
    for selector in PARSED_SELECTORS.iter() {
        let mut best: Option<(usize, String)> = None;

        for element in document.select(selector) {
            let text = trimmed_text(element);
            let len = text.chars().count();
            if len <= MIN_CONTAINER_CHARS {
                continue;
            }
            if best.as_ref().is_none_or(|(best_len, _)| len > *best_len) {
                best = Some((len, text));
            }
        }

        if let Some((_, text)) = best {
            return Some(text);
        }
    }

    None
}

/// Substantial paragraphs joined with single spaces. Empty when none qualify.
pub fn paragraph_text(document: &Html) -> String {
    document
        .select(&PARAGRAPH_SELECTOR)
        .map(trimmed_text)
        .filter(|text| text.chars().count() > MIN_PARAGRAPH_CHARS)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whole-body text, or the document root's when there is no `<body>`.
pub fn body_text(document: &Html) -> String {
    match document.select(&BODY_SELECTOR).next() {
        Some(body) => trimmed_text(body),
        None => trimmed_text(document.root_element()),
    }
}
