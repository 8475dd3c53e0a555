//! Parsing of the published question sheet (CSV) and of JSON question dumps.

use log::debug;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

use quiz_core::model::{Letter, Question, QuestionDraft, QuestionId};

use crate::error::SourceError;

/// One sheet row. Column names vary between sheet revisions, hence the
/// aliases.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SheetRow {
    #[serde(alias = "ID")]
    id: String,
    #[serde(alias = "Year")]
    year: String,
    #[serde(alias = "questionText")]
    question_text: String,
    #[serde(rename = "option_A", alias = "option_a")]
    option_a: String,
    #[serde(rename = "option_B", alias = "option_b")]
    option_b: String,
    #[serde(rename = "option_C", alias = "option_c")]
    option_c: String,
    #[serde(rename = "option_D", alias = "option_d")]
    option_d: String,
    #[serde(alias = "correctAnswer")]
    correct_answer: String,
    explanation: String,
    tags: String,
}

impl SheetRow {
    fn into_draft(self, row_number: u64) -> QuestionDraft {
        let id = self.id.parse().unwrap_or_else(|_| {
            debug!("sheet row {row_number} has no usable id ({:?})", self.id);
            QuestionId::new(row_number)
        });
        let options = [
            (Letter::A, self.option_a),
            (Letter::B, self.option_b),
            (Letter::C, self.option_c),
            (Letter::D, self.option_d),
        ]
        .into_iter()
        .filter(|(_, text)| !text.trim().is_empty())
        .collect();

        QuestionDraft {
            id,
            year: parse_year(&self.year),
            text: self.question_text,
            options,
            correct_answer: self.correct_answer,
            explanation: self.explanation,
            tags: split_tags(&self.tags),
        }
    }
}

/// Leading digits of a year cell; anything else is year 0.
#[must_use]
pub fn parse_year(raw: &str) -> u32 {
    let digits: String = raw.trim().chars().take_while(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

/// Split a tag cell on `|` or `,`, dropping blanks.
#[must_use]
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(['|', ','])
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Parse the sheet CSV export. Rows without question text are skipped.
///
/// # Errors
///
/// Returns `SourceError::Csv` if the CSV itself is malformed.
pub fn parse_sheet_csv(text: &str) -> Result<Vec<Question>, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut questions = Vec::new();
    for (idx, row) in reader.deserialize::<SheetRow>().enumerate() {
        let row_number = idx as u64 + 1;
        match row?.into_draft(row_number).validate() {
            Ok(question) => questions.push(question),
            Err(err) => debug!("skipping sheet row {row_number}: {err}"),
        }
    }
    Ok(questions)
}

/// Flatten arbitrarily nested arrays of records into a flat list of objects.
/// Scalars are dropped.
#[must_use]
pub fn flatten_records(value: Value) -> Vec<serde_json::Map<String, Value>> {
    match value {
        Value::Array(items) => items.into_iter().flat_map(flatten_records).collect(),
        Value::Object(map) => vec![map],
        _ => Vec::new(),
    }
}

/// Decode a JSON dump (such as the `data.json` snapshot) into questions,
/// skipping records that do not decode.
#[must_use]
pub fn questions_from_dump(value: Value) -> Vec<Question> {
    flatten_records(value)
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<Question>(Value::Object(record)) {
            Ok(question) => Some(question),
            Err(err) => {
                debug!("skipping dump record: {err}");
                None
            }
        })
        .collect()
}

/// Option text keyed by letter for a dump record, accepting lowercase keys.
#[must_use]
pub(crate) fn record_options(record: &serde_json::Map<String, Value>) -> BTreeMap<Letter, String> {
    let Some(Value::Object(options)) = record.get("options") else {
        return BTreeMap::new();
    };
    Letter::ALL
        .into_iter()
        .filter_map(|letter| {
            let upper = letter.as_str();
            let lower = upper.to_lowercase();
            let text = [upper, lower.as_str()]
                .into_iter()
                .filter_map(|key| options.get(key).and_then(Value::as_str))
                .find(|text| !text.is_empty())?;
            Some((letter, text.to_string()))
        })
        .collect()
}
