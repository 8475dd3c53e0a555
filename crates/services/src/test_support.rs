use quiz_core::model::{Letter, Question, QuestionDraft, QuestionId};

/// Four-option question from 2023 whose answer is A.
pub(crate) fn tagged(id: u64, tags: &[&str]) -> Question {
    QuestionDraft {
        id: QuestionId::new(id),
        year: 2023,
        text: format!("Question {id}?"),
        options: Letter::ALL
            .into_iter()
            .map(|letter| (letter, format!("Option {}", letter.as_str())))
            .collect(),
        correct_answer: "A".into(),
        explanation: "Because A.".into(),
        tags: tags.iter().map(ToString::to_string).collect(),
    }
    .validate()
    .unwrap()
}
