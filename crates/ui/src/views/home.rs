use dioxus::prelude::*;

use services::sessions::{PRACTICE_SET_TAG, SHUFFLE_SIZE};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{LoadError, NavCard, SelectionCard, ViewError, ViewState, view_state_from_resource};
use crate::vm::{SelectionCardVm, attach_badges, shuffle_card};

#[derive(Clone, Debug, PartialEq)]
struct HomeData {
    shuffle: SelectionCardVm,
}

#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let runner = ctx.runner();
    let notice = use_signal(|| None::<String>);

    let runner_for_resource = runner.clone();
    let mut resource = use_resource(move || {
        let runner = runner_for_resource.clone();
        async move {
            let mut shuffle = shuffle_card(SHUFFLE_SIZE);
            attach_badges(&runner, std::slice::from_mut(&mut shuffle)).await?;
            Ok::<_, ViewError>(HomeData { shuffle })
        }
    });
    let state = view_state_from_resource(&resource);

    let on_reset_all = {
        let runner = runner.clone();
        use_callback(move |()| {
            let runner = runner.clone();
            let mut notice = notice;
            let mut resource = resource;
            spawn(async move {
                match runner.reset_all_progress().await {
                    Ok(removed) => notice.set(Some(format!("Cleared {removed} saved quizzes."))),
                    Err(err) => notice.set(Some(ViewError::from(&err).message().to_string())),
                }
                resource.restart();
            });
        })
    };
    let on_refresh = use_callback(move |()| {
        let runner = runner.clone();
        let mut notice = notice;
        spawn(async move {
            match runner.refresh().await {
                Ok(count) => notice.set(Some(format!("Loaded {count} questions."))),
                Err(err) => notice.set(Some(ViewError::from(&err).message().to_string())),
            }
        });
    });

    rsx! {
        div { class: "page home-page",
            h2 { "Choose a quiz" }
            div { class: "card-grid",
                NavCard {
                    title: "Previous Years".to_string(),
                    subtitle: "Full papers by year".to_string(),
                    to: Route::Years {},
                }
                NavCard {
                    title: "Practice Sets".to_string(),
                    subtitle: "Sets of 50 and mock tests".to_string(),
                    to: Route::Sets { tag: PRACTICE_SET_TAG.to_string() },
                }
                match state {
                    ViewState::Ready(data) => rsx! {
                        SelectionCard { card: data.shuffle }
                    },
                    ViewState::Error(err) => rsx! {
                        LoadError { err, on_retry: move |()| resource.restart() }
                    },
                    ViewState::Idle | ViewState::Loading => rsx! {},
                }
                NavCard {
                    title: "Bookmarks".to_string(),
                    subtitle: "Questions you saved".to_string(),
                    to: Route::quiz("progress_bookmarks"),
                }
            }
            div { class: "home-actions",
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| on_refresh.call(()),
                    "Refresh questions"
                }
                button {
                    class: "btn btn-danger",
                    id: "reset-all-progress",
                    r#type: "button",
                    onclick: move |_| on_reset_all.call(()),
                    "Reset all progress"
                }
            }
            if let Some(text) = notice.read().as_ref() {
                p { class: "notice", "{text}" }
            }
        }
    }
}
