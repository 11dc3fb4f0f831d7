use geezer_core::{Commentary, YesNo};
use leptos::prelude::*;
use thaw::{Button, ButtonAppearance};

use crate::workflow::PubForm;

#[component]
fn YesNoChoice(label: &'static str, name: &'static str, value: RwSignal<YesNo>) -> impl IntoView {
    view! {
        <fieldset class="choice">
            <legend>{label}</legend>
            {YesNo::ALL
                .into_iter()
                .map(|option| {
                    view! {
                        <label class="choice-option">
                            <input
                                type="radio"
                                name=name
                                prop:checked=move || value.get() == option
                                on:change=move |_| value.set(option)
                            />
                            {option.as_str()}
                        </label>
                    }
                })
                .collect_view()}
        </fieldset>
    }
}

/// Details entry, shown once an address has been confirmed.
#[component]
pub fn PubDetailsForm<F>(suggested_name: String, busy: RwSignal<bool>, on_submit: F) -> impl IntoView
where
    F: Fn(PubForm) + 'static + Copy + Send + Sync,
{
    let name = RwSignal::new(suggested_name);
    let pool_table = RwSignal::new(YesNo::No);
    let darts = RwSignal::new(YesNo::No);
    let commentary = RwSignal::new(Commentary::Occasional);
    let fosters_carling = RwSignal::new(YesNo::No);
    let pint_price = RwSignal::new(String::new());
    let lock_ins = RwSignal::new(YesNo::No);

    let submit = move || {
        on_submit(PubForm {
            name: name.get_untracked(),
            pool_table: pool_table.get_untracked(),
            darts: darts.get_untracked(),
            commentary: commentary.get_untracked(),
            fosters_carling: fosters_carling.get_untracked(),
            pint_price: pint_price.get_untracked(),
            lock_ins: lock_ins.get_untracked(),
        })
    };

    view! {
        <div class="pub-details-form">
            <h3>"Tell us about the pub"</h3>

            <label class="form-field">
                "Pub name"
                <input
                    type="text"
                    placeholder="Enter Pub Name"
                    prop:value=move || name.get()
                    on:input=move |ev| name.set(event_target_value(&ev))
                />
            </label>

            <YesNoChoice label="Pool table?" name="pool_table" value=pool_table/>
            <YesNoChoice label="Darts?" name="darts" value=darts/>

            <label class="form-field">
                "Football commentary"
                <select
                    prop:value=move || commentary.get().as_str()
                    on:change=move |ev| {
                        if let Ok(choice) = event_target_value(&ev).parse::<Commentary>() {
                            commentary.set(choice);
                        }
                    }
                >
                    {Commentary::ALL
                        .into_iter()
                        .map(|choice| view! { <option value=choice.as_str()>{choice.as_str()}</option> })
                        .collect_view()}
                </select>
            </label>

            <YesNoChoice label="Fosters or Carling on tap?" name="fosters_carling" value=fosters_carling/>

            <label class="form-field">
                "Price of a pint (£)"
                <input
                    type="number"
                    min="0"
                    step="0.01"
                    placeholder="4.50"
                    prop:value=move || pint_price.get()
                    on:input=move |ev| pint_price.set(event_target_value(&ev))
                />
            </label>

            <YesNoChoice label="Lock-ins?" name="lock_ins" value=lock_ins/>

            <Button
                appearance=ButtonAppearance::Primary
                loading=Signal::from(busy)
                disabled=Signal::from(busy)
                on_click=move |_| submit()
            >
                "Submit Pub"
            </Button>
        </div>
    }
}
