//! Whole-record form over an extracted schema

use leptos::prelude::*;

use contracts::engine::{resolve_form, FormState};
use contracts::shared::metadata::FieldSchema;

use super::association_picker::PickerRequest;
use super::field_renderer::{render_node, FormHandle};

/// Renders every field of `schema` bound to `state`. Association pickers are
/// requested through `picker` and handled by the hosting component.
#[component]
pub fn GenericForm(
    schema: StoredValue<Vec<FieldSchema>>,
    state: RwSignal<FormState>,
    picker: RwSignal<Option<PickerRequest>>,
) -> impl IntoView {
    let form = FormHandle { state, picker };

    view! {
        <div class="generic-form">
            {move || {
                state.track();
                let nodes = schema
                    .with_value(|fields| {
                        state.try_update_untracked(|s| resolve_form(fields, s))
                    })
                    .unwrap_or_default();
                nodes
                    .into_iter()
                    .map(|node| render_node(node, form))
                    .collect_view()
            }}
        </div>
    }
}
