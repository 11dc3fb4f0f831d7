pub mod map_renderer;
pub mod pub_marker;

use geezer_core::Pub;
use leptos::{prelude::*, task::spawn_local};
use thaw::{Button, ButtonAppearance, Spinner, SpinnerSize};

use crate::{
    components::{AddressSearch, CandidateList, Notice, NoticeView, PubDetailsForm, PubTable},
    server::{get_workflow_settings, list_pubs},
    views::pub_map::map_renderer::PubMapRenderer,
    workflow::{
        record_commit, render_model, PubForm, RenderModel, ServerBackend, Stage, WorkflowController,
        WorkflowSession, WorkflowSettings,
    },
};

fn controller(settings: &WorkflowSettings) -> WorkflowController<'_, ServerBackend, ServerBackend> {
    WorkflowController::new(ServerBackend, ServerBackend, settings)
}

#[component]
pub fn PubMapPage() -> impl IntoView {
    let session = RwSignal::new(WorkflowSession::default());
    let settings = RwSignal::new(WorkflowSettings::default());
    let pub_list = RwSignal::new(Vec::<Pub>::new());
    let model = RwSignal::new(RenderModel::default());
    let notice = RwSignal::new(None::<Notice>);
    let busy = RwSignal::new(false);
    let show_table = RwSignal::new(false);

    let settings_resource = Resource::new(|| (), |_| async move { get_workflow_settings().await });
    let pubs_resource = Resource::new(|| (), |_| async move { list_pubs().await });

    Effect::new(move |_| {
        if let Some(Ok(loaded)) = settings_resource.get() {
            settings.set(loaded);
        }
    });

    Effect::new(move |_| match pubs_resource.get() {
        Some(Ok(pubs)) => pub_list.set(pubs),
        Some(Err(e)) => {
            leptos::logging::warn!("could not load pubs: {e}");
            notice.set(Some(Notice::Error(format!("Could not load pubs: {}", e))));
        }
        None => {}
    });

    // Rebuild the frame whenever the session or the pubs change. Building it
    // consumes any pending recenter, which must not retrigger this effect.
    Effect::new(move |_| {
        session.track();
        let pubs = pub_list.get();
        let mut next = RenderModel::default();
        session.update_untracked(|s| next = render_model(s, &pubs));
        model.set(next);
    });

    let stage = Memo::new(move |_| model.with(|m| m.stage));

    let report = move |result: Result<(), crate::error::WorkflowError>| match result {
        Ok(()) => notice.set(None),
        Err(e) => notice.set(Some(Notice::from(&e))),
    };

    let on_search = move |query: String| {
        if busy.get_untracked() {
            return;
        }
        busy.set(true);
        notice.set(None);
        spawn_local(async move {
            let current = settings.get_untracked();
            let outcome = controller(&current).lookup(&query).await.and_then(|found| {
                let mut accepted = Ok(0);
                session.update(|s| accepted = controller(&current).accept_candidates(s, found));
                accepted
            });
            match outcome {
                Ok(count) => {
                    notice.set(Some(Notice::Info(format!(
                        "Found {} address{} for '{}'",
                        count,
                        if count == 1 { "" } else { "es" },
                        query
                    ))));
                }
                Err(e) => notice.set(Some(Notice::from(&e))),
            }
            busy.set(false);
        });
    };

    let on_select = move |index: usize| {
        if busy.get_untracked() {
            return;
        }
        let current = settings.get_untracked();
        let mut result = Ok(());
        session.update(|s| result = controller(&current).select(s, index));
        report(result);
    };

    let on_confirm = move || {
        if busy.get_untracked() {
            return;
        }
        let current = settings.get_untracked();
        let mut result = Ok(());
        session.update(|s| result = controller(&current).confirm(s).map(|_| ()));
        report(result);
    };

    let on_clear = move || {
        if busy.get_untracked() {
            return;
        }
        let current = settings.get_untracked();
        session.update(|s| controller(&current).clear_preview(s));
        notice.set(None);
    };

    let on_submit = move |form: PubForm| {
        if busy.get_untracked() {
            return;
        }
        busy.set(true);
        spawn_local(async move {
            let current = settings.get_untracked();
            let mut working = session.get_untracked();
            match controller(&current).submit(&mut working, form).await {
                Ok(stored) => {
                    notice.set(Some(Notice::Success(format!(
                        "Successfully added '{}' to the map!",
                        stored.name
                    ))));
                    pub_list.update(|pubs| record_commit(pubs, stored));
                    session.set(working);
                }
                Err(e) => notice.set(Some(Notice::from(&e))),
            }
            busy.set(false);
        });
    };

    view! {
        <div class="pub-map-page">
            <h1>"Geezer Pubs of London 🍻"</h1>
            <p class="tagline">"Fosters, Darts, Pool."</p>

            {move || notice.get().map(|n| view! { <NoticeView notice=n/> })}

            <Suspense fallback=|| view! { <Spinner size=SpinnerSize::Small/> }>
                {move || {
                    pubs_resource.get().map(|loaded| match loaded {
                        Ok(pubs) => format!("{} pubs on the map", pubs.len()),
                        Err(_) => "Pubs could not be loaded".to_string(),
                    })
                }}
            </Suspense>

            <PubMapRenderer model=model/>

            <section class="submit-pub">
                <h2>"Submit a New Pub"</h2>

                <AddressSearch busy=busy on_search=on_search/>

                {move || {
                    let (candidates, selected) = model.with(|m| {
                        (m.candidates.clone(), m.preview.as_ref().map(|p| p.label.clone()))
                    });
                    (!candidates.is_empty())
                        .then(|| view! { <CandidateList candidates=candidates selected=selected on_select=on_select/> })
                }}

                <Show when=move || matches!(stage.get(), Stage::Previewing | Stage::Confirmed)>
                    <div class="preview-actions">
                        <Show when=move || stage.get() == Stage::Previewing>
                            <Button
                                appearance=ButtonAppearance::Primary
                                disabled=Signal::from(busy)
                                on_click=move |_| on_confirm()
                            >
                                "Confirm address"
                            </Button>
                        </Show>
                        <Button disabled=Signal::from(busy) on_click=move |_| on_clear()>
                            "Clear preview"
                        </Button>
                    </div>
                </Show>

                <Show when=move || stage.get() == Stage::Confirmed>
                    <PubDetailsForm
                        suggested_name=model.with_untracked(|m| m.confirmed_name.clone().unwrap_or_default())
                        busy=busy
                        on_submit=on_submit
                    />
                </Show>
            </section>

            <label class="raw-table-toggle">
                <input
                    type="checkbox"
                    prop:checked=move || show_table.get()
                    on:change=move |ev| show_table.set(event_target_checked(&ev))
                />
                "Show raw pub table"
            </label>
            <Show when=move || show_table.get()>
                {move || view! { <PubTable pubs=pub_list.get()/> }}
            </Show>
        </div>
    }
}
