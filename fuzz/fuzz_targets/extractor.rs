#![no_main]

use libfuzzer_sys::fuzz_target;

use finanswer::extractor::extract_html;

fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

fuzz_target!(|data: &[u8]| {
    let html = String::from_utf8_lossy(data);

    // Extraction must never panic, and its output is always normalized
    let text = extract_html(&html);
    let chars: Vec<char> = text.as_str().chars().collect();

    assert!(!text.as_str().contains("  "));
    assert!(!chars.windows(2).any(|w| is_terminal(w[0]) && is_terminal(w[1])));
});
