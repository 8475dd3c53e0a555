use dioxus::prelude::*;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{
    LoadError, NavCard, SelectionCard, ViewError, ViewState, view_state_from_resource,
};
use crate::vm::{load_mock_papers, load_sets};

#[component]
pub fn SetsView(tag: String) -> Element {
    let ctx = use_context::<AppContext>();
    let runner = ctx.runner();

    let tag_for_resource = tag.clone();
    let mut resource = use_resource(move || {
        let runner = runner.clone();
        let tag = tag_for_resource.clone();
        async move { load_sets(&runner, &tag).await }
    });
    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page sets-page",
            h2 { "Practice Sets" }
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(screen) => rsx! {
                    div { class: "card-grid",
                        SelectionCard { card: screen.shuffle.clone() }
                        if screen.mock_count > 0 {
                            NavCard {
                                title: "Mock Test".to_string(),
                                subtitle: format!("{} timed papers", screen.mock_count),
                                to: Route::MockPapers { tag: tag.clone() },
                            }
                        }
                        for card in screen.sets.iter().cloned() {
                            SelectionCard { key: "{card.key}", card }
                        }
                    }
                    if screen.sets.is_empty() && screen.mock_count == 0 {
                        p { class: "notice", "{ViewError::EmptySet.message()}" }
                    }
                },
                ViewState::Error(err) => rsx! {
                    LoadError { err, on_retry: move |()| resource.restart() }
                },
            }
        }
    }
}

#[component]
pub fn MockPapersView(tag: String) -> Element {
    let ctx = use_context::<AppContext>();
    let runner = ctx.runner();

    let tag_for_resource = tag.clone();
    let mut resource = use_resource(move || {
        let runner = runner.clone();
        let tag = tag_for_resource.clone();
        async move { load_mock_papers(&runner, &tag).await }
    });
    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page mock-page",
            h2 { "Mock Tests" }
            div { class: "card-grid",
                NavCard {
                    title: "← Back".to_string(),
                    subtitle: "Practice Sets".to_string(),
                    to: Route::Sets { tag: tag.clone() },
                }
                match state {
                    ViewState::Idle | ViewState::Loading => rsx! {
                        p { "Loading..." }
                    },
                    ViewState::Ready(cards) => rsx! {
                        for card in cards {
                            SelectionCard { key: "{card.key}", card: card.clone() }
                        }
                    },
                    ViewState::Error(err) => rsx! {
                        LoadError { err, on_retry: move |()| resource.restart() }
                    },
                }
            }
        }
    }
}
