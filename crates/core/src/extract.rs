//! Recover option text from free-form explanations.
//!
//! Explanations in the question sheets usually end with a per-option
//! breakdown such as:
//!
//! ```text
//! - ✅ b (Posterior): Most frequent location [cite: 336].
//! - ❌ a (Anterior): Seen in ~10% females.
//! ```
//!
//! When a dump lost its option columns, these lines are the only place the
//! option text survives.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::model::Letter;

static OPTION_LINES: LazyLock<[Regex; 4]> = LazyLock::new(|| Letter::ALL.map(option_line));

static CITATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[cite:\s*[^\]]+\]").unwrap_or_else(|err| panic!("citation pattern: {err}"))
});

fn option_line(letter: Letter) -> Regex {
    let pattern = format!(
        r#"(?im)^\s*[-–—]\s*(?:[✅❌]\x{{FE0F}}?)?\s*{letter}\b\s*["'(]*([^\r\n|)]+)\)?"#
    );
    Regex::new(&pattern).unwrap_or_else(|err| panic!("option pattern for {letter}: {err}"))
}

fn trim_capture(raw: &str) -> Option<String> {
    let head = raw.split(':').next().unwrap_or_default();
    let head = head.split(" - ").next().unwrap_or_default().trim();
    (!head.is_empty()).then(|| head.to_string())
}

/// Option text for a single letter, taken from the first matching line.
#[must_use]
pub fn extract_option(explanation: &str, letter: Letter) -> Option<String> {
    let idx = Letter::ALL.iter().position(|l| *l == letter)?;
    let caps = OPTION_LINES[idx].captures(explanation)?;
    trim_capture(caps.get(1)?.as_str())
}

/// Every option text recoverable from the explanation. Letters without a
/// matching line are absent from the map.
#[must_use]
pub fn extract_options(explanation: &str) -> BTreeMap<Letter, String> {
    Letter::ALL
        .into_iter()
        .filter_map(|letter| extract_option(explanation, letter).map(|text| (letter, text)))
        .collect()
}

/// Prepare an explanation for display: expand literal `\n`, drop
/// `[cite: …]` markers and the ✅/❌ marks.
#[must_use]
pub fn clean_explanation(text: &str) -> String {
    let expanded = text.replace("\\n", "\n");
    let uncited = CITATION.replace_all(&expanded, "");
    uncited.replace(['✅', '❌'], "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Option b is correct[cite: 346].\n\
        - ✅ b (Posterior): Most frequent location [cite: 336].\n\
        - ❌ a (Anterior): Seen in ~10% females [cite: 336].\n\
        - ❌ c (Lateral): Suspect secondary causes like Crohn's[cite: 336].";

    #[test]
    fn extracts_parenthesized_option() {
        let got = extract_option("- ✅ B (Posterior): text [cite: 5]", Letter::B);
        assert_eq!(got.as_deref(), Some("Posterior"));
    }

    #[test]
    fn extracts_all_present_letters() {
        let options = extract_options(SAMPLE);
        assert_eq!(options.get(&Letter::A).map(String::as_str), Some("Anterior"));
        assert_eq!(options.get(&Letter::B).map(String::as_str), Some("Posterior"));
        assert_eq!(options.get(&Letter::C).map(String::as_str), Some("Lateral"));
        assert!(!options.contains_key(&Letter::D));
    }

    #[test]
    fn cuts_at_dash_separator_and_accepts_en_dash() {
        let text = "– ❌ D Hypokalemia - common after diuretics";
        assert_eq!(extract_option(text, Letter::D).as_deref(), Some("Hypokalemia"));
    }

    #[test]
    fn ignores_words_starting_with_the_letter() {
        assert_eq!(extract_option("- Anterior wall", Letter::A), None);
    }

    #[test]
    fn no_breakdown_yields_empty_map() {
        assert!(extract_options("Plain explanation without a list.").is_empty());
        assert!(extract_options("").is_empty());
    }

    #[test]
    fn clean_explanation_strips_markers() {
        let cleaned = clean_explanation("Line one [cite: 12]\\n- ✅ b Correct");
        assert_eq!(cleaned, "Line one \n-  b Correct");
    }
}
