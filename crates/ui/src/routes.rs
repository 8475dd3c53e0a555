use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{HomeView, MockPapersView, QuizView, SetsView, YearsView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", HomeView)] Home {},
        #[route("/years", YearsView)] Years {},
        #[route("/sets/:tag", SetsView)] Sets { tag: String },
        #[route("/mock/:tag", MockPapersView)] MockPapers { tag: String },
        #[route("/quiz/:session", QuizView)] Quiz { session: String },
}

impl Route {
    /// Route that starts the quiz for a progress key such as `progress_set_practiseset_2`.
    #[must_use]
    pub fn quiz(session: impl Into<String>) -> Self {
        Route::Quiz {
            session: session.into(),
        }
    }
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    rsx! {
        nav { class: "sidebar",
            h1 { "Quiz" }
            ul {
                li { Link { to: Route::Home {}, "Home" } }
                li { Link { to: Route::Years {}, "Previous Years" } }
                li { Link { to: Route::Sets { tag: services::sessions::PRACTICE_SET_TAG.to_string() }, "Practice Sets" } }
                li { Link { to: Route::quiz("progress_bookmarks"), "Bookmarks" } }
            }
        }
    }
}
