use geezer_core::AddressCandidate;
use leptos::prelude::*;

#[component]
pub fn CandidateList<F>(
    candidates: Vec<AddressCandidate>,
    selected: Option<String>,
    on_select: F,
) -> impl IntoView
where
    F: Fn(usize) + 'static + Copy + Send + Sync,
{
    view! {
        <div class="candidate-list">
            <h3>"Pick the right address"</h3>
            <ul>
                {candidates
                    .into_iter()
                    .enumerate()
                    .map(|(idx, candidate)| {
                        let is_selected = selected.as_deref() == Some(candidate.full_address.as_str());
                        view! {
                            <li>
                                <label class="candidate-option" class:selected=is_selected>
                                    <input
                                        type="radio"
                                        name="address-candidate"
                                        prop:checked=is_selected
                                        on:change=move |_| on_select(idx)
                                    />
                                    <span>{candidate.full_address}</span>
                                </label>
                            </li>
                        }
                    })
                    .collect_view()}
            </ul>
        </div>
    }
}
