//! Candidate picker for association fields
//!
//! Opened by the field renderer when the user hits "Select...". Interim
//! selections live in the session-scoped [`SelectionCache`], so closing and
//! reopening the picker restores what was ticked but never leaks into
//! another form instance.

use leptos::prelude::*;
use serde_json::Value;
use wasm_bindgen_futures::spawn_local;

use contracts::engine::{
    AssociationPlan, DataProvider, FieldPath, FormSessionId, FormState, SelectionCache,
};
use contracts::shared::metadata::Cardinality;

use crate::shared::rest_provider::RestProvider;

/// One open-picker request emitted by an association field
#[derive(Clone)]
pub struct PickerRequest {
    pub path: FieldPath,
    pub plan: AssociationPlan,
    pub label: String,
}

fn display_of(item: &Value, id_field: &str) -> String {
    for key in ["name", "description", "label"] {
        if let Some(text) = item.get(key).and_then(Value::as_str) {
            if !text.is_empty() {
                return text.to_string();
            }
        }
    }
    match item.get(id_field) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => item.to_string(),
    }
}

#[component]
pub fn AssociationPickerModal(
    request: PickerRequest,
    session: FormSessionId,
    form_state: RwSignal<FormState>,
    cache: RwSignal<SelectionCache>,
    picker: RwSignal<Option<PickerRequest>>,
) -> impl IntoView {
    let PickerRequest { path, plan, label } = request;
    let cardinality = plan.cardinality;
    let id_field = StoredValue::new(plan.id_field.clone());
    let plan = StoredValue::new(plan);
    let path = StoredValue::new(path);

    let items = RwSignal::new(Vec::<Value>::new());
    let loading = RwSignal::new(false);
    let load_error = RwSignal::new(None::<String>);
    let search = RwSignal::new(String::new());

    // Restore an interim selection first, then fall back to the committed value
    let initial = cache
        .with_untracked(|c| path.with_value(|p| c.get(session, p).map(<[Value]>::to_vec)))
        .or_else(|| {
            form_state.with_untracked(|s| {
                path.with_value(|p| {
                    s.value_at(p).map(|value| match value {
                        Value::Array(picked) => picked.clone(),
                        Value::Null => Vec::new(),
                        single => vec![single.clone()],
                    })
                })
            })
        })
        .unwrap_or_default();
    let selection = RwSignal::new(initial);

    Effect::new(move |_| {
        let term = search.get();
        spawn_local(async move {
            if !term.is_empty() {
                // Debounce typing; only the latest term fires a lookup
                gloo_timers::future::TimeoutFuture::new(250).await;
                if search.get_untracked() != term {
                    return;
                }
            }
            loading.set(true);
            let plan = plan.get_value();
            let mut params = plan.list_params();
            if !term.is_empty() {
                params.search = Some(term);
            }
            match RestProvider::new()
                .list(&plan.resource, Some(&plan.list_query), &params)
                .await
            {
                Ok(result) => {
                    items.set(result.items);
                    load_error.set(None);
                }
                Err(e) => load_error.set(Some(e.to_string())),
            }
            loading.set(false);
        });
    });

    let is_selected = move |item: &Value| {
        let id = item.get(&id_field.get_value()).cloned();
        id.is_some()
            && selection.with(|sel| {
                sel.iter()
                    .any(|picked| picked.get(&id_field.get_value()) == id.as_ref())
            })
    };

    let toggle = move |item: Value| {
        selection.update(|sel| {
            let id = item.get(&id_field.get_value()).cloned();
            match cardinality {
                Cardinality::Single => {
                    sel.clear();
                    sel.push(item);
                }
                Cardinality::Multiple => {
                    let existing = sel
                        .iter()
                        .position(|picked| picked.get(&id_field.get_value()) == id.as_ref());
                    match existing {
                        Some(pos) => {
                            sel.remove(pos);
                        }
                        None => sel.push(item),
                    }
                }
            }
        });
        cache.update(|c| {
            path.with_value(|p| c.set(session, p, selection.get_untracked()));
        });
    };

    let confirm = move |_| {
        let picked = cache
            .try_update(|c| path.with_value(|p| c.take(session, p)))
            .flatten()
            .unwrap_or_else(|| selection.get_untracked());
        let value = match cardinality {
            Cardinality::Single => picked.into_iter().next().unwrap_or(Value::Null),
            Cardinality::Multiple => Value::Array(picked),
        };
        form_state.update(|s| path.with_value(|p| s.set_value(p, value)));
        picker.set(None);
    };

    // Cancel keeps the cached interim selection around for a later reopen
    let cancel = move |_| picker.set(None);

    view! {
        <div class="modal-overlay">
            <div class="modal picker">
                <div class="picker__header">
                    <h3 class="picker__title">{label}</h3>
                    <button class="button button--ghost button--small" on:click=cancel>
                        "✕"
                    </button>
                </div>
                <input
                    class="picker__search"
                    type="text"
                    placeholder="Search..."
                    prop:value=move || search.get()
                    on:input=move |ev| search.set(event_target_value(&ev))
                />
                {move || {
                    load_error
                        .get()
                        .map(|message| view! { <div class="picker__error">{message}</div> })
                }}
                <div class="picker__list">
                    <Show
                        when=move || !loading.get()
                        fallback=|| view! { <div class="picker__loading">"Loading..."</div> }
                    >
                        <table class="table table--picker">
                            <tbody>
                                {move || {
                                    items
                                        .get()
                                        .into_iter()
                                        .map(|item| {
                                            let text = display_of(&item, &id_field.get_value());
                                            let row_item = item.clone();
                                            let marker = if is_selected(&item) { "✓" } else { "" };
                                            let class = if is_selected(&item) {
                                                "table__row table__row--selected"
                                            } else {
                                                "table__row"
                                            };
                                            view! {
                                                <tr class=class on:click=move |_| toggle(row_item.clone())>
                                                    <td class="table__cell table__cell--marker">{marker}</td>
                                                    <td class="table__cell">{text}</td>
                                                </tr>
                                            }
                                        })
                                        .collect_view()
                                }}
                            </tbody>
                        </table>
                    </Show>
                </div>
                <div class="picker__footer">
                    <span class="picker__count">
                        {move || format!("{} selected", selection.with(Vec::len))}
                    </span>
                    <button class="button button--primary" on:click=confirm>
                        "Confirm"
                    </button>
                    <button class="button button--secondary" on:click=cancel>
                        "Cancel"
                    </button>
                </div>
            </div>
        </div>
    }
}
