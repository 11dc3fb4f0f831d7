use leptos::prelude::*;
use leptos_leaflet::{leaflet::Map, prelude::*};

use crate::views::pub_map::pub_marker::{PreviewMarkerView, PubMarkerView};
use crate::workflow::RenderModel;

#[component]
pub fn PubMapRenderer(model: RwSignal<RenderModel>) -> impl IntoView {
    let center: Memo<Position> = Memo::new(move |_| {
        let c = model.with(|m| m.center);
        Position::new(c.lat, c.lon)
    });
    let zoom = Memo::new(move |_| model.with(|m| m.zoom));

    let map = JsRwSignal::new_local(None::<Map>);
    Effect::new(move |_| {
        let new_pos = center.get();
        let new_zoom = zoom.get();
        if let Some(map) = map.get_untracked() {
            map.set_view(&new_pos.as_lat_lng(), new_zoom);
        }
    });

    view! {
        <MapContainer style="height: 60vh" center=center.get_untracked() zoom=zoom.get_untracked() set_view=true map=map.write_only()>
            <TileLayer
                url="https://tile.openstreetmap.org/{z}/{x}/{y}.png"
                attribution="&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors"
            />
            {move || {
                model
                    .get()
                    .markers
                    .into_iter()
                    .map(|marker| view! { <PubMarkerView marker=marker/> })
                    .collect_view()
            }}
            {move || model.get().preview.map(|marker| view! { <PreviewMarkerView marker=marker/> })}
        </MapContainer>
    }
}
