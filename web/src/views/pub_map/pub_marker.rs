use leptos::prelude::*;
use leptos_leaflet::prelude::*;

use crate::workflow::{PreviewMarker, PubMarker};

const PREVIEW_ICON: &str = "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' width='28' height='42' viewBox='0 0 28 42'%3E%3Cpath fill='%23f97316' stroke='%23ffffff' stroke-width='1.5' d='M14 2C8.5 2 4 6.5 4 12c0 8.5 10 26 10 26s10-17.5 10-26c0-5.5-4.5-10-10-10zm0 13.5c-1.9 0-3.5-1.6-3.5-3.5s1.6-3.5 3.5-3.5 3.5 1.6 3.5 3.5-1.6 3.5-3.5 3.5z'/%3E%3C/svg%3E";

#[component]
pub fn PubMarkerView(marker: PubMarker) -> impl IntoView {
    view! {
        <Marker
            position=Position::new(marker.position.lat, marker.position.lon)
            draggable=false
            icon_url=Some("/geezer_icon.svg".to_string())
            icon_size=Some((51.0, 30.0))
            icon_anchor=Some((25.5, 30.0))
        >
            <Popup>
                <p class="pub-popup">{marker.label}</p>
            </Popup>
        </Marker>
    }
}

/// The orange pin for an address that has not been saved yet.
#[component]
pub fn PreviewMarkerView(marker: PreviewMarker) -> impl IntoView {
    view! {
        <Marker
            position=Position::new(marker.position.lat, marker.position.lon)
            draggable=false
            icon_url=Some(PREVIEW_ICON.to_string())
            icon_size=Some((28.0, 42.0))
            icon_anchor=Some((14.0, 42.0))
        >
            <Popup>
                <p class="preview-popup">{marker.label}</p>
            </Popup>
        </Marker>
    }
}
