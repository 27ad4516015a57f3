use regex::Regex;
use scraper::Html;
use std::fs;

use crate::extractor::{extract, extract_html};

fn fixture(name: &str) -> String {
    fs::read_to_string(format!("src/extractor/tests/fixtures/{name}"))
        .expect("Failed to read test fixture")
}

fn assert_normalized(text: &str) {
    assert!(!Regex::new(r"\s{2,}").unwrap().is_match(text));
    assert!(!Regex::new(r"[.!?]{2,}").unwrap().is_match(text));
    assert_eq!(text, text.trim());
}

#[test]
fn test_extract_article() {
    let text = extract_html(&fixture("article.html"));

    assert!(text.as_str().starts_with("Acme Corp Beats Earnings Expectations"));
    assert!(text.as_str().contains("sensors accelerated. Shares rose 6%"));
    assert!(text.as_str().ends_with("buyback program."));
    // Navigation and footer sit outside the article
    assert!(!text.as_str().contains("Home"));
    assert!(!text.as_str().contains("Copyright"));
    assert_normalized(text.as_str());
}

#[test]
fn test_extract_prefers_selector_priority() {
    let text = extract_html(&fixture("market_news.html"));

    assert!(text.as_str().starts_with("Treasury yields climbed"));
    assert!(!text.as_str().contains("Brief update"));
    assert!(!text.as_str().contains("Site-wide banner"));
}

#[test]
fn test_extract_from_paragraphs() {
    let text = extract_html(&fixture("paragraphs.html"));

    assert_eq!(
        text.as_str(),
        "Oil prices slipped as inventories rose more than expected last week in Cushing. \
         Analysts expect OPEC to hold output steady at its next meeting in Vienna."
    );
}

#[test]
fn test_falls_back_to_body_text() {
    let text = extract_html(&fixture("sparse.html"));

    assert_eq!(text.as_str(), "Quarterly results Revenue up Tiny paragraph.");
}

#[test]
fn test_short_container_falls_back_to_body() {
    // The article qualifies (> 100 chars) but shrinks below 100 once chrome words go.
    let article = "menu ".repeat(25) + "Rates held.";
    let html = format!(
        "<html><body><article>{article}</article>\n<div>Closing bell recap</div></body></html>"
    );

    let text = extract_html(&html);
    assert_eq!(text.as_str(), "Rates held. Closing bell recap");
}

#[test]
fn test_empty_document() {
    assert!(extract_html("").is_empty());
    assert!(extract_html("<html><body></body></html>").is_empty());
}

#[test]
fn test_malformed_html() {
    let html = format!(
        "<html><head><title>Broken</title><body><article>{}<div>Unclosed tags",
        "Futures pointed higher before the open. ".repeat(5)
    );
    let text = extract(&Html::parse_document(&html));

    assert!(text.as_str().starts_with("Futures pointed higher"));
    assert!(text.as_str().ends_with("Unclosed tags"));
}

#[test]
fn test_long_body_yields_normalized_text() {
    let body = "Stocks  rallied!!  Bonds\tfell?? ".repeat(10);
    let html = format!("<html><body><div>{body}</div></body></html>");

    let text = extract_html(&html);
    assert!(!text.is_empty());
    assert_normalized(text.as_str());
}

#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_extract_never_panics(html in ".*") {
            let _ = extract_html(&html);
        }

        #[test]
        fn test_long_body_is_normalized(
            words in prop::collection::vec("[0-9]{1,6}[.!?]{0,3}[ \t\n]{1,3}", 40..120),
        ) {
            let body = words.concat();
            prop_assume!(body.trim().chars().count() >= 100);
            let html = format!("<html><body><div>{body}</div></body></html>");

            let text = extract_html(&html);
            prop_assert!(!text.is_empty());
            assert_normalized(text.as_str());
        }
    }
}
