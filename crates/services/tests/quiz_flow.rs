use std::sync::Arc;

use quiz_core::model::{Letter, Progress, Question, QuestionDraft, QuestionId, Selection};
use quiz_core::session::{AdvanceOutcome, SessionState, StartOutcome};
use quiz_core::time::fixed_now;
use services::{
    AppServices, Clock, ProgressStore, QuizConfig, QuizRunner, StaticQuestionSource, convert_file,
};
use storage::repository::{InMemoryRepository, ProgressRepository, Storage};

fn question(id: u64, year: u32, correct: &str) -> Question {
    QuestionDraft {
        id: QuestionId::new(id),
        year,
        text: format!("Question {id}?"),
        options: Letter::ALL
            .into_iter()
            .map(|letter| (letter, format!("Choice {}", letter.as_str())))
            .collect(),
        correct_answer: correct.into(),
        explanation: "See notes.".into(),
        tags: vec!["haryanamo".into()],
    }
    .validate()
    .unwrap()
}

fn services(questions: Vec<Question>) -> AppServices {
    AppServices::from_parts(
        Storage::in_memory(),
        Arc::new(StaticQuestionSource::new(questions)),
        &QuizConfig::default(),
        Clock::fixed(fixed_now()),
    )
}

#[tokio::test]
async fn practice_run_scores_correct_answers() {
    let questions = vec![
        question(3, 2021, "C"),
        question(1, 2021, "A"),
        question(2, 2021, "B"),
        question(9, 2020, "A"),
    ];
    let runner = services(questions).runner();

    let started = runner
        .select(Selection::Year {
            year: 2021,
            tag: None,
        })
        .await
        .unwrap();
    assert_eq!(started, StartOutcome::Started { discarded_stale: false });

    // Sorted by id: answers A (right), C (wrong), C (right).
    let picks = [Letter::A, Letter::C, Letter::C];
    let mut last = None;
    for (index, letter) in picks.into_iter().enumerate() {
        runner.answer(index, letter).await.unwrap();
        last = Some(runner.advance().await.unwrap());
    }

    let Some(AdvanceOutcome::Completed { summary }) = last else {
        panic!("quiz should be complete");
    };
    assert_eq!(summary.score(), 2);
    assert_eq!(summary.total(), 3);
    assert_eq!(summary.percentage(), 67);
    assert_eq!(runner.view().await.unwrap().state, SessionState::Completed);
}

#[tokio::test]
async fn unknown_year_is_an_empty_set() {
    let runner = services(vec![question(1, 2021, "A")]).runner();
    let err = runner
        .select(Selection::Year {
            year: 2005,
            tag: None,
        })
        .await
        .unwrap_err();
    assert!(err.is_empty_set());
    assert_eq!(runner.view().await.unwrap().state, SessionState::Idle);
}

#[tokio::test]
async fn remote_checkpoint_ahead_is_offered_for_resume() {
    let local = InMemoryRepository::new();
    let remote = InMemoryRepository::new();
    let selection = Selection::Year {
        year: 2021,
        tag: None,
    };
    let key = selection.session_key();
    local.save_progress(&key, &Progress::new(3, 1, 10)).await.unwrap();
    remote.save_progress(&key, &Progress::new(7, 5, 10)).await.unwrap();

    let questions = (1..=10).map(|id| question(id, 2021, "A")).collect();
    let runner = QuizRunner::new(
        Arc::new(StaticQuestionSource::new(questions)),
        ProgressStore::new(Arc::new(local.clone())).with_remote(Some(Arc::new(remote))),
        Arc::new(local.clone()),
        Clock::fixed(fixed_now()),
    );

    let outcome = runner.select(selection).await.unwrap();
    let StartOutcome::ResumeOffered { progress } = outcome else {
        panic!("expected a resume offer");
    };
    assert_eq!(progress.index, 7);
    assert_eq!(local.get_progress(&key).await.unwrap().map(|p| p.index), Some(7));

    runner.resume().await.unwrap();
    assert_eq!(runner.view().await.unwrap().position, 8);
}

#[tokio::test]
async fn stale_checkpoint_is_ignored() {
    let storage = Storage::in_memory();
    let selection = Selection::Year {
        year: 2021,
        tag: None,
    };
    storage
        .progress
        .save_progress(&selection.session_key(), &Progress::new(1, 1, 40))
        .await
        .unwrap();
    let services = AppServices::from_parts(
        storage,
        Arc::new(StaticQuestionSource::new(vec![
            question(1, 2021, "A"),
            question(2, 2021, "A"),
        ])),
        &QuizConfig::default(),
        Clock::fixed(fixed_now()),
    );

    let outcome = services.runner().select(selection).await.unwrap();
    assert_eq!(outcome, StartOutcome::Started { discarded_stale: true });
}

#[tokio::test]
async fn converts_a_dump_file() {
    let dir = std::env::temp_dir().join(format!("quiz-convert-{}", std::process::id()));
    tokio::fs::create_dir_all(&dir).await.unwrap();
    let input = dir.join("data.json");
    let output = dir.join("converted_data.csv");
    tokio::fs::write(
        &input,
        r#"[[{"id": 1, "year": 2020, "question_text": "Q?", "options": {"a": "x", "b": "y"}, "correct_answer": "a", "tags": "t"}]]"#,
    )
    .await
    .unwrap();

    let report = convert_file(&input, &output).await.unwrap();
    assert_eq!(report.processed, 1);
    assert_eq!(report.recovered, 0);

    let csv = tokio::fs::read_to_string(&output).await.unwrap();
    assert!(csv.starts_with("id,year,question_text"));
    assert!(csv.contains(r#"1,2020,"Q?","x","y""#));

    tokio::fs::remove_dir_all(&dir).await.unwrap();
}
