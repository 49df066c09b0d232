use leptos::prelude::*;

use crate::metaform::EditableTable;

#[component]
pub fn LocationsPage() -> impl IntoView {
    view! { <EditableTable resource="location" /> }
}
