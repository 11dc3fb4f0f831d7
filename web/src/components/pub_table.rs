use geezer_core::{Pub, PubDetails};
use leptos::prelude::*;

fn cells(details: &PubDetails) -> [String; 7] {
    match details {
        PubDetails::Amenities(a) => [
            String::new(),
            a.pool_table.to_string(),
            a.darts.to_string(),
            a.commentary.to_string(),
            a.fosters_carling.to_string(),
            format!("{:.2}", a.pint_price),
            a.lock_ins.to_string(),
        ],
        PubDetails::Legacy { rating } => [
            rating.map(|r| r.to_string()).unwrap_or_default(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
        ],
    }
}

/// Every stored row, as it sits in the database.
#[component]
pub fn PubTable(pubs: Vec<Pub>) -> impl IntoView {
    view! {
        <table class="pub-table">
            <thead>
                <tr>
                    <th>"name"</th>
                    <th>"latitude"</th>
                    <th>"longitude"</th>
                    <th>"rating"</th>
                    <th>"pool_table"</th>
                    <th>"darts"</th>
                    <th>"commentary"</th>
                    <th>"fosters_carling"</th>
                    <th>"pint_price"</th>
                    <th>"lock_ins"</th>
                </tr>
            </thead>
            <tbody>
                {pubs
                    .into_iter()
                    .map(|p| {
                        let row = cells(&p.details);
                        view! {
                            <tr>
                                <td>{p.name}</td>
                                <td>{format!("{:.6}", p.latitude)}</td>
                                <td>{format!("{:.6}", p.longitude)}</td>
                                {row.into_iter().map(|cell| view! { <td>{cell}</td> }).collect_view()}
                            </tr>
                        }
                    })
                    .collect_view()}
            </tbody>
        </table>
    }
}
