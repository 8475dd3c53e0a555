use dioxus::prelude::*;
use dioxus_router::use_navigator;

use crate::routes::Route;
use crate::views::ViewError;
use crate::vm::SelectionCardVm;

#[component]
pub fn SelectionCard(card: SelectionCardVm) -> Element {
    let navigator = use_navigator();
    let key = card.key.clone();

    rsx! {
        button {
            class: "select-card",
            r#type: "button",
            onclick: move |_| {
                let _ = navigator.push(Route::quiz(key.clone()));
            },
            h3 { class: "select-card__title", "{card.title}" }
            p { class: "select-card__subtitle", "{card.subtitle}" }
            if let Some(badge) = card.badge.as_ref() {
                span { class: "select-card__badge", "{badge}" }
            }
        }
    }
}

/// Card that navigates somewhere other than a quiz.
#[component]
pub fn NavCard(title: String, subtitle: String, to: Route) -> Element {
    let navigator = use_navigator();

    rsx! {
        button {
            class: "select-card select-card--nav",
            r#type: "button",
            onclick: move |_| {
                let _ = navigator.push(to.clone());
            },
            h3 { class: "select-card__title", "{title}" }
            p { class: "select-card__subtitle", "{subtitle}" }
        }
    }
}

#[component]
pub fn LoadError(err: ViewError, on_retry: EventHandler<()>) -> Element {
    rsx! {
        div { class: "notice notice--error",
            p { "{err.message()}" }
            button {
                class: "btn btn-secondary",
                r#type: "button",
                onclick: move |_| on_retry.call(()),
                "Retry"
            }
        }
    }
}

