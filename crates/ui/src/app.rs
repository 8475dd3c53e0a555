use dioxus::prelude::*;
use dioxus_router::Router;

use crate::routes::Route;

/// Root component. Expects an `AppContext` from the launcher.
#[component]
pub fn App() -> Element {
    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }
        document::Title { "Quiz" }

        div { class: "quiz-root",
            ErrorBoundary {
                handle_error: |errors: ErrorContext| rsx! {
                    div { class: "fatal",
                        h1 { "The quiz stopped unexpectedly" }
                        p { "Restart the app. Your saved progress is kept." }
                        pre { "{errors:?}" }
                    }
                },
                Router::<Route> {}
            }
        }
    }
}
