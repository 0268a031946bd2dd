//! Campaign Web App - Leptos Frontend

use leptos::prelude::*;

use crate::components::Card;

#[component]
pub fn App() -> impl IntoView {
    view! {
        <main class="app">
            <Card/>
        </main>
    }
}
