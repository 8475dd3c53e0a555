use quiz_core::model::{Progress, Question, QuestionDraft, QuestionId};
use quiz_core::time::fixed_now;
use storage::repository::{BookmarkRepository, ProgressRepository, StorageError};
use storage::sqlite::SqliteRepository;

fn build_question(id: u64) -> Question {
    QuestionDraft {
        id: QuestionId::new(id),
        year: 2024,
        text: format!("Question {id}"),
        correct_answer: "c".into(),
        tags: vec!["renal".into()],
        ..QuestionDraft::default()
    }
    .validate()
    .unwrap()
}

async fn connect(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

#[tokio::test]
async fn sqlite_progress_overwrites_and_clears() {
    let repo = connect("memdb_progress").await;

    repo.save_progress("progress_year_2023_null", &Progress::new(2, 1, 40))
        .await
        .unwrap();
    repo.save_progress("progress_year_2023_null", &Progress::new(5, 4, 40))
        .await
        .unwrap();
    let shuffle = Progress::new(0, 1, 2).with_questions(vec![build_question(8), build_question(3)]);
    repo.save_progress("progress_shuffle_renal", &shuffle)
        .await
        .unwrap();

    let year = repo
        .get_progress("progress_year_2023_null")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(year.index, 5);
    let pinned = repo
        .get_progress("progress_shuffle_renal")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(pinned, shuffle);

    assert_eq!(
        repo.list_progress_keys().await.unwrap(),
        vec!["progress_shuffle_renal", "progress_year_2023_null"]
    );
    repo.delete_progress("progress_year_2023_null").await.unwrap();
    assert!(repo.get_progress("progress_year_2023_null").await.unwrap().is_none());
    assert_eq!(repo.clear_progress().await.unwrap(), 1);
}

#[tokio::test]
async fn sqlite_reports_malformed_payload() {
    let repo = connect("memdb_malformed").await;
    sqlx::query("INSERT INTO progress (session_key, payload, updated_at) VALUES (?1, ?2, ?3)")
        .bind("progress_set_anatomy_0")
        .bind("{\"index\":")
        .bind(fixed_now())
        .execute(repo.pool())
        .await
        .unwrap();

    let err = repo
        .get_progress("progress_set_anatomy_0")
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Serialization(_)));
}

#[tokio::test]
async fn sqlite_bookmarks_round_trip() {
    let repo = connect("memdb_bookmarks").await;
    let now = fixed_now();

    repo.add_bookmark(&build_question(30), now).await.unwrap();
    repo.add_bookmark(&build_question(4), now + chrono::Duration::seconds(5))
        .await
        .unwrap();
    repo.add_bookmark(&build_question(30), now + chrono::Duration::seconds(9))
        .await
        .unwrap();

    let listed = repo.list_bookmarks().await.unwrap();
    let ids: Vec<u64> = listed.iter().map(|q| q.id().value()).collect();
    assert_eq!(ids, vec![30, 4]);
    assert_eq!(listed[0], build_question(30));

    assert!(repo.is_bookmarked(QuestionId::new(4)).await.unwrap());
    repo.remove_bookmark(QuestionId::new(4)).await.unwrap();
    assert!(matches!(
        repo.remove_bookmark(QuestionId::new(4)).await,
        Err(StorageError::NotFound)
    ));
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = connect("memdb_migrate_twice").await;
    repo.migrate().await.expect("second migrate");
}
