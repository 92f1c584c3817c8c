use text_size::TextSize;

use crate::{Analysis, FilePosition, Vocabulary};

const CURSOR_MARKER: &str = "$0";

pub(crate) const VOCABULARY: &str = r#"{
    "screens": { "sm": "640px", "md": "768px" },
    "variants": ["hover", "focus", "first"],
    "utilities": [
        "underline",
        "text-lg",
        { "value": "text-xl", "css": "font-size: 1.25rem;" },
        "text-center",
        "ring",
        "ring-offset-2",
        "ring-offset-10",
        "font-bold",
        { "value": "mx-", "interpolation": "number" }
    ]
}"#;

pub(crate) fn extract_offset(text: &str) -> (TextSize, String) {
    let cursor_pos = text.find(CURSOR_MARKER).expect("Cursor marker not found");
    let mut new_text = String::with_capacity(text.len() - CURSOR_MARKER.len());
    new_text.push_str(&text[..cursor_pos]);
    new_text.push_str(&text[cursor_pos + CURSOR_MARKER.len()..]);
    (TextSize::from(cursor_pos as u32), new_text)
}

pub(crate) fn position(fixture: &str) -> (Analysis, FilePosition) {
    let analysis = Analysis::new(Vocabulary::from_json(VOCABULARY).unwrap());
    let (offset, text) = extract_offset(fixture);
    let file = analysis.add_file("fixture.html", text);
    (analysis, FilePosition { file, offset })
}
