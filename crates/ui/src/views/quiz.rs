use dioxus::prelude::*;
use dioxus_router::use_navigator;

use quiz_core::model::Selection;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{LoadError, ViewError, ViewState, view_state_from_resource};
use crate::vm::{QuizIntent, QuizPhase, QuizScreenVm, ResultsVm, dispatch};

#[component]
pub fn QuizView(session: String) -> Element {
    let ctx = use_context::<AppContext>();
    let runner = ctx.runner();
    let navigator = use_navigator();

    let error = use_signal(|| None::<ViewError>);
    let version = use_signal(|| 0_u64);

    let runner_for_select = runner.clone();
    // Reselect when the route key changes.
    let mut select_resource = use_resource(use_reactive((&session,), move |(session,)| {
        let runner = runner_for_select.clone();
        let mut error = error;
        async move {
            error.set(None);
            let selection: Selection = session.parse().map_err(|_| ViewError::Unknown)?;
            runner.select(selection).await?;
            Ok::<_, ViewError>(())
        }
    }));
    let state = view_state_from_resource(&select_resource);

    // Subscribe before any selection task runs.
    let changes = use_hook(|| runner.subscribe());
    use_future(move || {
        let mut changes = changes.clone();
        let mut version = version;
        async move {
            while changes.changed().await.is_ok() {
                let next = *changes.borrow_and_update();
                version.set(next);
            }
        }
    });

    let runner_for_view = runner.clone();
    let view_resource = use_resource(move || {
        let runner = runner_for_view.clone();
        // Rerun on every runner change.
        let _ = version();
        async move {
            let view = runner.view().await?;
            Ok::<_, ViewError>(QuizScreenVm::from_view(&view))
        }
    });
    let screen = view_resource
        .value()
        .read()
        .as_ref()
        .and_then(|value| value.as_ref().ok())
        .cloned();

    let dispatch_intent = use_callback(move |intent: QuizIntent| {
        let runner = runner.clone();
        let mut error = error;
        spawn(async move {
            match dispatch(&runner, intent).await {
                Ok(()) => error.set(None),
                Err(err) => error.set(Some(err)),
            }
        });
    });

    rsx! {
        div { class: "page quiz-page",
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(ViewError::EmptySet) => rsx! {
                    div { class: "notice notice--empty",
                        p { "{ViewError::EmptySet.message()}" }
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            onclick: move |_| {
                                let _ = navigator.push(Route::Home {});
                            },
                            "Back"
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    LoadError { err, on_retry: move |()| select_resource.restart() }
                },
                ViewState::Ready(()) => rsx! {
                    if let Some(err) = *error.read() {
                        p { class: "notice notice--error", "{err.message()}" }
                    }
                    match screen {
                        Some(screen) => rsx! {
                            QuizScreen { screen, on_intent: dispatch_intent }
                        },
                        None => rsx! {
                            p { "Loading..." }
                        },
                    }
                },
            }
        }
    }
}

#[component]
fn QuizScreen(screen: QuizScreenVm, on_intent: EventHandler<QuizIntent>) -> Element {
    let navigator = use_navigator();

    rsx! {
        header { class: "quiz-header",
            h2 { class: "quiz-header__title", "{screen.title}" }
            if let Some(timer) = screen.timer_label.as_ref() {
                span { class: "quiz-header__timer", id: "quiz-timer", "{timer}" }
            }
        }
        match screen.phase {
            QuizPhase::Idle => rsx! {
                p { "Loading..." }
            },
            QuizPhase::ResumePrompt => rsx! {
                div { class: "resume-prompt",
                    if let Some(label) = screen.resume_label.as_ref() {
                        p { "{label}" }
                    }
                    button {
                        class: "btn btn-primary",
                        id: "quiz-resume",
                        r#type: "button",
                        onclick: move |_| on_intent.call(QuizIntent::Resume),
                        "Resume"
                    }
                    button {
                        class: "btn btn-secondary",
                        id: "quiz-start-over",
                        r#type: "button",
                        onclick: move |_| on_intent.call(QuizIntent::StartOver),
                        "Start Over"
                    }
                }
            },
            QuizPhase::Question => rsx! {
                QuestionPanel { screen: screen.clone(), on_intent }
            },
            QuizPhase::Results => rsx! {
                if let Some(results) = screen.results.clone() {
                    ResultsPanel {
                        results,
                        on_retry: move |()| on_intent.call(QuizIntent::Reset),
                        on_home: move |()| {
                            let _ = navigator.push(Route::Home {});
                        },
                    }
                }
            },
        }
    }
}

#[component]
fn QuestionPanel(screen: QuizScreenVm, on_intent: EventHandler<QuizIntent>) -> Element {
    let index = screen.index;

    rsx! {
        div { class: "quiz-meta",
            span { class: "quiz-meta__counter", "{screen.counter}" }
            span { class: "quiz-meta__year", "{screen.year_label}" }
            span { class: "quiz-meta__category", "{screen.category}" }
            button {
                class: "quiz-bookmark",
                id: "quiz-bookmark",
                r#type: "button",
                onclick: move |_| on_intent.call(QuizIntent::ToggleBookmark),
                "{screen.bookmark_label}"
            }
        }
        if let Some(banner) = screen.review_banner {
            p { class: "notice notice--review", "{banner}" }
        }
        div { class: "quiz-question", dangerous_inner_html: "{screen.question_html}" }
        div { class: "quiz-options",
            for option in screen.options.iter().cloned() {
                button {
                    key: "{option.letter}",
                    class: "{option.class}",
                    r#type: "button",
                    disabled: option.disabled,
                    onclick: move |_| on_intent.call(QuizIntent::Answer { index, letter: option.letter }),
                    "{option.label}"
                }
            }
        }
        if let Some(explanation) = screen.explanation_html.as_ref() {
            div { class: "quiz-explanation",
                h4 { "Explanation" }
                div { dangerous_inner_html: "{explanation}" }
            }
        }
        div { class: "quiz-controls",
            if screen.can_go_back {
                button {
                    class: "btn btn-secondary",
                    id: "quiz-previous",
                    r#type: "button",
                    onclick: move |_| on_intent.call(QuizIntent::Previous),
                    "Previous"
                }
            }
            button {
                class: "btn btn-primary",
                id: "quiz-next",
                r#type: "button",
                disabled: !screen.can_advance,
                onclick: move |_| on_intent.call(QuizIntent::Next),
                "{screen.next_label}"
            }
            if screen.show_submit {
                button {
                    class: "btn btn-danger",
                    id: "quiz-submit",
                    r#type: "button",
                    onclick: move |_| on_intent.call(QuizIntent::Submit),
                    "Submit Test"
                }
            }
        }
        if !screen.navigator.is_empty() {
            div { class: "quiz-navigator",
                for cell in screen.navigator.iter().cloned() {
                    button {
                        key: "{cell.index}",
                        class: "{cell.class}",
                        r#type: "button",
                        onclick: move |_| on_intent.call(QuizIntent::Jump(cell.index)),
                        "{cell.label}"
                    }
                }
            }
        }
    }
}

#[component]
fn ResultsPanel(results: ResultsVm, on_retry: EventHandler<()>, on_home: EventHandler<()>) -> Element {
    rsx! {
        div { class: "quiz-results",
            h3 { "Quiz Complete" }
            p { class: "quiz-results__score", "Score: {results.score_label}" }
            p { class: "quiz-results__percentage", "{results.percentage_label}" }
            p { class: "quiz-results__message", "{results.message}" }
            div { class: "quiz-results__actions",
                button {
                    class: "btn btn-primary",
                    id: "quiz-try-again",
                    r#type: "button",
                    onclick: move |_| on_retry.call(()),
                    "Try Again"
                }
                button {
                    class: "btn btn-secondary",
                    id: "quiz-home",
                    r#type: "button",
                    onclick: move |_| on_home.call(()),
                    "Home"
                }
            }
        }
    }
}
