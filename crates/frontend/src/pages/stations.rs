use leptos::prelude::*;

use crate::metaform::EditableTable;

#[component]
pub fn StationsPage() -> impl IntoView {
    view! { <EditableTable resource="charging_station" /> }
}
