use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TAG_RE: Regex = Regex::new(r"<[^<]+?>").expect("tag regex is valid");
}

/// Removes markup tags from question text coming back from the bank.
pub fn strip_html(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    TAG_RE.replace_all(text, "").into_owned()
}

/// Splits sanitized question text into clue sentences for the review
/// breakdown. A sentence ends at `.`, `!` or `?` followed by whitespace and
/// an uppercase letter or opening quote. Abbreviations like "Mr." can split
/// early; quiz prose tolerates that.
pub fn split_sentences(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < chars.len() {
        if matches!(chars[i], '.' | '!' | '?') {
            let mut j = i + 1;
            while j < chars.len() && chars[j].is_whitespace() {
                j += 1;
            }
            let boundary = j > i + 1
                && chars
                    .get(j)
                    .is_some_and(|c| c.is_uppercase() || *c == '"' || *c == '\u{201c}');
            if boundary {
                push_trimmed(&mut sentences, &chars[start..=i]);
                start = j;
                i = j;
                continue;
            }
        }
        i += 1;
    }

    if start < chars.len() {
        push_trimmed(&mut sentences, &chars[start..]);
    }
    sentences
}

fn push_trimmed(sentences: &mut Vec<String>, slice: &[char]) {
    let sentence: String = slice.iter().collect();
    let trimmed = sentence.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
}
