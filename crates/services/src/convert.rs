//! JSON question dump to sheet CSV.
//!
//! Output columns match what the sheet importer reads back. Records whose
//! options A and B are both empty get their options recovered from the
//! explanation bullets.

use log::info;
use serde_json::{Map, Value};
use std::io;
use std::path::Path;

use quiz_core::extract::extract_options;
use quiz_core::model::Letter;

use crate::error::ConvertError;
use crate::sheet::{flatten_records, record_options};

pub const CSV_HEADERS: [&str; 10] = [
    "id",
    "year",
    "question_text",
    "option_A",
    "option_B",
    "option_C",
    "option_D",
    "correct_answer",
    "explanation",
    "tags",
];

/// Counts reported after a conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertReport {
    pub processed: usize,
    /// Records whose options came from the explanation.
    pub recovered: usize,
}

/// Write `value` (any nesting of record arrays) as CSV to `out`.
///
/// # Errors
///
/// Returns `ConvertError` if writing fails.
pub fn dump_to_csv<W: io::Write>(value: Value, mut out: W) -> Result<ConvertReport, ConvertError> {
    out.write_all(CSV_HEADERS.join(",").as_bytes())?;
    out.write_all(b"\r\n")?;

    // Fields arrive pre-quoted: text always, id and year only when needed.
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::CRLF)
        .from_writer(out);

    let mut report = ConvertReport::default();
    for (index, record) in flatten_records(value).into_iter().enumerate() {
        let (row, recovered) = csv_row(&record, index);
        writer.write_record(&row)?;
        report.processed += 1;
        if recovered {
            report.recovered += 1;
        }
    }
    writer.flush()?;
    Ok(report)
}

/// Read a JSON dump from `input` and write the CSV to `output`.
///
/// # Errors
///
/// Returns `ConvertError` if either file cannot be accessed or the input is
/// not JSON.
pub async fn convert_file(input: &Path, output: &Path) -> Result<ConvertReport, ConvertError> {
    let raw = tokio::fs::read(input).await?;
    let value: Value = serde_json::from_slice(&raw)?;

    let mut buffer = Vec::new();
    let report = dump_to_csv(value, &mut buffer)?;
    tokio::fs::write(output, buffer).await?;

    info!(
        "converted {} records to {} ({} with options recovered from explanations)",
        report.processed,
        output.display(),
        report.recovered
    );
    Ok(report)
}

fn csv_row(record: &Map<String, Value>, index: usize) -> ([String; 10], bool) {
    let explanation = text_field(record, &["explanation"]);

    let mut options = record_options(record);
    let mut recovered = false;
    if !options.contains_key(&Letter::A) && !options.contains_key(&Letter::B) && !explanation.is_empty() {
        let extracted = extract_options(&explanation);
        if extracted.contains_key(&Letter::A) || extracted.contains_key(&Letter::B) {
            options = extracted;
            recovered = true;
        }
    }
    let option = |letter: Letter| options.get(&letter).cloned().unwrap_or_default();

    let id = scalar(record.get("id"))
        .filter(|id| !id.is_empty() && id != "0")
        .unwrap_or_else(|| (index + 1).to_string());
    let year = scalar(record.get("year"))
        .filter(|year| year != "0")
        .unwrap_or_default();

    let correct_answer = text_field(record, &["correct_answer", "correctAnswer"])
        .trim()
        .to_uppercase();
    let row = [
        bare(id),
        bare(year),
        quoted(&text_field(record, &["question_text", "questionText"])),
        quoted(&option(Letter::A)),
        quoted(&option(Letter::B)),
        quoted(&option(Letter::C)),
        quoted(&option(Letter::D)),
        quoted(&correct_answer),
        quoted(&explanation),
        quoted(&tags_field(record.get("tags"))),
    ];
    (row, recovered)
}

fn quoted(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

fn bare(text: String) -> String {
    if text.contains([',', '"', '\r', '\n']) {
        quoted(&text)
    } else {
        text
    }
}

/// First non-empty value among `keys`, rendered as text.
fn text_field(record: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| scalar(record.get(*key)))
        .find(|text| !text.is_empty())
        .unwrap_or_default()
}

fn scalar(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn tags_field(value: Option<&Value>) -> String {
    match value {
        Some(Value::Array(tags)) => tags
            .iter()
            .filter_map(|tag| scalar(Some(tag)))
            .collect::<Vec<_>>()
            .join("|"),
        Some(Value::String(tags)) => tags.clone(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::parse_sheet_csv;

    fn convert(json: &str) -> (String, ConvertReport) {
        let value: Value = serde_json::from_str(json).unwrap();
        let mut out = Vec::new();
        let report = dump_to_csv(value, &mut out).unwrap();
        (String::from_utf8(out).unwrap(), report)
    }

    #[test]
    fn writes_header_and_quoted_rows() {
        let (csv, report) = convert(
            r#"[{"id": 3, "year": 2022, "question_text": "Say \"hi\"?",
                 "options": {"A": "x", "B": "y"}, "correct_answer": " b ",
                 "explanation": "E", "tags": ["t1", "t2"]}]"#,
        );
        let mut lines = csv.split("\r\n");
        assert_eq!(
            lines.next(),
            Some("id,year,question_text,option_A,option_B,option_C,option_D,correct_answer,explanation,tags")
        );
        assert_eq!(
            lines.next(),
            Some(r#"3,2022,"Say ""hi""?","x","y","","","B","E","t1|t2""#)
        );
        assert_eq!(report, ConvertReport { processed: 1, recovered: 0 });
    }

    #[test]
    fn numeric_text_is_quoted_and_missing_year_is_bare() {
        let (csv, _) = convert(
            r#"[{"id": "7", "question_text": "Dose?",
                 "options": {"A": "100", "B": "200"}, "correct_answer": "a"}]"#,
        );
        assert_eq!(
            csv.split("\r\n").nth(1),
            Some(r#"7,,"Dose?","100","200","","","A","","""#)
        );
    }

    #[test]
    fn missing_id_falls_back_to_position() {
        let (csv, report) = convert(r#"[[{"questionText": "One?"}], [{"question_text": "Two?"}]]"#);
        let ids: Vec<&str> = csv
            .split("\r\n")
            .skip(1)
            .filter(|line| !line.is_empty())
            .map(|line| line.split(',').next().unwrap_or_default())
            .collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(report.processed, 2);
    }

    #[test]
    fn recovers_options_from_explanation() {
        let (csv, report) = convert(
            r#"[{"id": 1, "question_text": "Where?",
                 "options": {"A": "", "B": ""}, "correct_answer": "b",
                 "explanation": "- ✅ b (Posterior): most common [cite: 5]\n- ❌ a (Anterior): rare"}]"#,
        );
        assert_eq!(report.recovered, 1);

        let questions = parse_sheet_csv(&csv).unwrap();
        assert_eq!(questions[0].option(Letter::A), Some("Anterior"));
        assert_eq!(questions[0].option(Letter::B), Some("Posterior"));
        assert_eq!(questions[0].correct_answer(), Some(Letter::B));
    }

    #[test]
    fn unrecoverable_options_stay_empty() {
        let (_, report) = convert(r#"[{"id": 1, "question_text": "Q?", "explanation": "no bullets"}]"#);
        assert_eq!(report, ConvertReport { processed: 1, recovered: 0 });
    }
}
