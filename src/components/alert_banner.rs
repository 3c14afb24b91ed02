//! Alert Banner Component
//!
//! Dismissable info alert shown after a record is deleted.

use leptos::prelude::*;

/// Dismissable alert bound to a message signal
///
/// Renders nothing while the signal is `None`. The close control clears it.
#[component]
pub fn AlertBanner(banner: RwSignal<Option<String>>) -> impl IntoView {
    view! {
        <Show when=move || banner.get().is_some()>
            <div class="alert alert-info alert-dismissible" role="alert" data-banner="true">
                <button
                    type="button"
                    class="close"
                    aria-label="Close"
                    on:click=move |_| banner.set(None)
                >
                    <span aria-hidden="true">"×"</span>
                </button>
                <span class="alert-message">{move || banner.get().unwrap_or_default()}</span>
            </div>
        </Show>
    }
}
