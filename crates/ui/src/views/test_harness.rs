use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use quiz_core::model::{Letter, Question, QuestionDraft, QuestionId};
use quiz_core::time::fixed_now;
use services::{Clock, ProgressStore, QuizRunner, StaticQuestionSource};
use storage::repository::Storage;

use crate::context::{UiApp, build_app_context};
use crate::views::{HomeView, MockPapersView, QuizView, SetsView, YearsView};

#[derive(Clone)]
struct TestApp {
    runner: Arc<QuizRunner>,
}

impl UiApp for TestApp {
    fn runner(&self) -> Arc<QuizRunner> {
        Arc::clone(&self.runner)
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum ViewKind {
    Home,
    Years,
    Sets(String),
    MockPapers(String),
    Quiz(String),
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view.clone());
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Home => rsx! { HomeView {} },
        ViewKind::Years => rsx! { YearsView {} },
        ViewKind::Sets(tag) => rsx! { SetsView { tag } },
        ViewKind::MockPapers(tag) => rsx! { MockPapersView { tag } },
        ViewKind::Quiz(session) => rsx! { QuizView { session } },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub storage: Storage,
    pub runner: Arc<QuizRunner>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Let resources and the change subscription settle.
    pub async fn settle(&mut self) {
        for _ in 0..6 {
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

/// 2023 question whose answer is A.
pub fn question(id: u64, tags: &[&str]) -> Question {
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

pub fn setup_view_harness(view: ViewKind, questions: Vec<Question>) -> ViewHarness {
    let storage = Storage::in_memory();
    let runner = Arc::new(QuizRunner::new(
        Arc::new(StaticQuestionSource::new(questions)),
        ProgressStore::new(Arc::clone(&storage.progress)),
        Arc::clone(&storage.bookmarks),
        Clock::fixed(fixed_now()),
    ));
    let app = Arc::new(TestApp {
        runner: Arc::clone(&runner),
    });

    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });

    ViewHarness {
        dom,
        storage,
        runner,
    }
}
