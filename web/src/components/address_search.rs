use leptos::prelude::*;
use thaw::{Button, ButtonAppearance};
use web_sys::KeyboardEvent;

#[component]
pub fn AddressSearch<F>(busy: RwSignal<bool>, on_search: F) -> impl IntoView
where
    F: Fn(String) + 'static + Copy + Send + Sync,
{
    let search_input = RwSignal::new(String::new());

    let submit = move || {
        let query = search_input.get_untracked().trim().to_string();
        if !query.is_empty() {
            on_search(query);
        }
    };

    let handle_keydown = move |ev: KeyboardEvent| {
        if ev.key() == "Enter" {
            ev.prevent_default();
            submit();
        }
    };

    view! {
        <div class="address-search">
            <label class="address-search-label" for="address-search-input">
                "Search for the pub's address"
            </label>
            <div class="address-search-row">
                <input
                    id="address-search-input"
                    type="text"
                    class="address-search-input"
                    placeholder="e.g. Red Lion, Parliament Street"
                    prop:value=move || search_input.get()
                    on:input=move |ev| search_input.set(event_target_value(&ev))
                    on:keydown=handle_keydown
                    disabled=move || busy.get()
                />
                <Button
                    appearance=ButtonAppearance::Primary
                    loading=Signal::from(busy)
                    disabled=Signal::derive(move || busy.get() || search_input.get().trim().is_empty())
                    on_click=move |_| submit()
                >
                    "Search"
                </Button>
            </div>
        </div>
    }
}
