use leptos::prelude::*;

use crate::metaform::EditableTable;

#[component]
pub fn TagsPage() -> impl IntoView {
    view! { <EditableTable resource="ocpp_tag" /> }
}
