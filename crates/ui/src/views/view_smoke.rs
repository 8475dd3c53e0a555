use quiz_core::model::{Letter, Progress, Question};
use storage::repository::ProgressRepository;

use super::test_harness::{ViewKind, question, setup_view_harness};

fn practice_pool() -> Vec<Question> {
    let mut questions: Vec<Question> = (1..=60).map(|id| question(id, &["practiseset"])).collect();
    questions.extend((61..=63).map(|id| question(id, &["practiseset", "mocktest", "mocktest1"])));
    questions
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_renders_mode_cards() {
    let mut harness = setup_view_harness(ViewKind::Home, practice_pool());
    harness.rebuild();
    harness.settle().await;
    let html = harness.render();

    for expected in ["Previous Years", "Practice Sets", "Shuffle", "Bookmarks", "Reset all progress"] {
        assert!(html.contains(expected), "missing {expected} in {html}");
    }
}

#[tokio::test(flavor = "current_thread")]
async fn years_view_smoke_renders_badges() {
    let mut harness = setup_view_harness(ViewKind::Years, practice_pool());
    harness
        .storage
        .progress
        .save_progress("progress_year_2023_null", &Progress::new(4, 3, 63))
        .await
        .expect("save progress");

    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Quiz Year 2023"), "missing year card in {html}");
    assert!(html.contains("Progress: 5/63"), "missing badge in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn sets_view_smoke_lists_sets_and_mock_card() {
    let mut harness = setup_view_harness(ViewKind::Sets("practiseset".into()), practice_pool());
    harness.rebuild();
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Set 1"), "missing set 1 in {html}");
    assert!(html.contains("Questions 51 - 60"), "missing set 2 range in {html}");
    assert!(html.contains("Mock Test"), "missing mock card in {html}");
    assert!(html.contains("50 random questions"), "missing shuffle card in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn mock_papers_view_smoke_lists_papers() {
    let mut harness = setup_view_harness(ViewKind::MockPapers("practiseset".into()), practice_pool());
    harness.rebuild();
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Mock Test 1"), "missing paper in {html}");
    assert!(html.contains("3 questions"), "missing count in {html}");
    assert!(html.contains("Back"), "missing back card in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_shows_feedback_after_answer() {
    let mut harness = setup_view_harness(
        ViewKind::Quiz("progress_set_practiseset_0".into()),
        practice_pool(),
    );
    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Question 1 of 50"), "missing counter in {html}");
    assert!(html.contains("Set 1"), "missing title in {html}");

    harness.runner.answer(0, Letter::A).await.expect("answer");
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("option-btn--correct"), "missing feedback in {html}");
    assert!(html.contains("Because A."), "missing explanation in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_renders_exam_timer() {
    let mut harness = setup_view_harness(
        ViewKind::Quiz("progress_mock_mocktest1".into()),
        practice_pool(),
    );
    harness.rebuild();
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Time Left: 60:00"), "missing timer in {html}");
    assert!(html.contains("Submit Test"), "missing submit in {html}");
    assert!(html.contains("nav-cell"), "missing navigator in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_reports_empty_selection() {
    let mut harness = setup_view_harness(ViewKind::Quiz("progress_bookmarks".into()), practice_pool());
    harness.rebuild();
    harness.settle().await;
    let html = harness.render();

    assert!(
        html.contains("No questions found for this selection."),
        "missing empty notice in {html}"
    );
    assert!(html.contains("Back"), "missing back button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_offers_resume() {
    let mut harness = setup_view_harness(
        ViewKind::Quiz("progress_set_practiseset_0".into()),
        practice_pool(),
    );
    harness
        .storage
        .progress
        .save_progress("progress_set_practiseset_0", &Progress::new(6, 5, 50))
        .await
        .expect("save progress");

    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Resume from question 8 of 50?"), "missing prompt in {html}");
    assert!(html.contains("Start Over"), "missing start over in {html}");
}
