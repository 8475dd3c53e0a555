use dioxus::prelude::*;

use crate::context::AppContext;
use crate::views::{LoadError, SelectionCard, ViewError, ViewState, view_state_from_resource};
use crate::vm::load_years;

#[component]
pub fn YearsView() -> Element {
    let ctx = use_context::<AppContext>();
    let runner = ctx.runner();

    let mut resource = use_resource(move || {
        let runner = runner.clone();
        async move { load_years(&runner).await }
    });
    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page years-page",
            h2 { "Previous Years" }
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(cards) if cards.is_empty() => rsx! {
                    p { class: "notice", "{ViewError::EmptySet.message()}" }
                },
                ViewState::Ready(cards) => rsx! {
                    div { class: "card-grid",
                        for card in cards {
                            SelectionCard { key: "{card.key}", card: card.clone() }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    LoadError { err, on_retry: move |()| resource.restart() }
                },
            }
        }
    }
}
