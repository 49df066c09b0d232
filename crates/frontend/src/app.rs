use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes, A};
use leptos_router::path;

use crate::pages::{LocationsPage, StationsPage, TagsPage};
use crate::shared::notify::BrowserNotifier;

#[component]
pub fn App() -> impl IntoView {
    // One notifier instance for the whole app
    provide_context(BrowserNotifier::new());

    view! {
        <Router>
            <div class="shell">
                <nav class="sidebar">
                    <div class="sidebar__title">"OCPP Console"</div>
                    <A href="/stations" attr:class="sidebar__link">
                        "Charging stations"
                    </A>
                    <A href="/locations" attr:class="sidebar__link">
                        "Locations"
                    </A>
                    <A href="/tags" attr:class="sidebar__link">
                        "OCPP tags"
                    </A>
                </nav>
                <main class="shell__content">
                    <Routes fallback=|| view! { <StationsPage /> }>
                        <Route path=path!("/") view=StationsPage />
                        <Route path=path!("/stations") view=StationsPage />
                        <Route path=path!("/locations") view=LocationsPage />
                        <Route path=path!("/tags") view=TagsPage />
                    </Routes>
                </main>
            </div>
        </Router>
    }
}
