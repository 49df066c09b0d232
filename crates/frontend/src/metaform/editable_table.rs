//! List view with inline create/edit over any registered resource
//!
//! The component owns one [`EditableTableController`] in a signal and performs
//! the I/O the controller decides on: fetching rows, dispatching save actions
//! and reporting the outcome back. Everything rendered inside the editor panel
//! comes from [`GenericForm`]; nothing here knows a concrete entity.

use leptos::prelude::*;
use serde_json::Value;
use wasm_bindgen_futures::spawn_local;

use contracts::engine::reconcile::reconcile_unknowns;
use contracts::engine::{
    association, dispatch_save, hydrate_record, DataProvider, EditOutcome, EditableTableController,
    FieldPath,
    FormState, ListParams, NotificationService, Pagination, SaveAction, SelectionCache, Sort,
    TableMode,
};
use contracts::shared::metadata::{extract, registry, FieldSchema, FieldType};

use crate::shared::notify::BrowserNotifier;
use crate::shared::rest_provider::RestProvider;

use super::association_picker::{AssociationPickerModal, PickerRequest};
use super::generic_form::GenericForm;

/// Top-level fields that render as a column
fn is_column(field: &FieldSchema) -> bool {
    field.custom_render.is_some()
        || field.association.is_some()
        || matches!(
            field.field_type,
            FieldType::Input
                | FieldType::Number
                | FieldType::Boolean
                | FieldType::Select
                | FieldType::DateTime
        )
}

fn cell_view(field: &FieldSchema, record: &Value) -> AnyView {
    if let Some(render) = &field.custom_render {
        let rendered = render.render(record);
        return view! {
            <span class=rendered.class.unwrap_or_default()>{rendered.text}</span>
        }
        .into_any();
    }
    if let Some(descriptor) = &field.association {
        // Loaded rows carry the stored parent key until they are hydrated
        let value = record
            .get(&field.name)
            .filter(|v| !v.is_null())
            .or_else(|| record.get(&descriptor.parent_id_field_name));
        return association::summarize(value, descriptor).into_any();
    }
    let text = match record.get(&field.name) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(true)) => "✓".to_string(),
        Some(Value::Bool(false)) | Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };
    text.into_any()
}

#[component]
pub fn EditableTable(resource: &'static str) -> impl IntoView {
    let notifier = use_context::<BrowserNotifier>().unwrap_or_default();

    let registry = registry::global();
    let schema = match extract::extract(registry, resource) {
        Ok(fields) => fields,
        Err(e) => {
            return view! { <div class="table-error">{e.to_string()}</div> }.into_any();
        }
    };
    let descriptor = match registry.get(resource) {
        Some(descriptor) => descriptor.clone(),
        None => {
            return view! {
                <div class="table-error">{format!("resource '{}' is not registered", resource)}</div>
            }
            .into_any();
        }
    };

    let controller = match EditableTableController::new(descriptor, schema) {
        Ok(controller) => controller,
        Err(e) => {
            // Missing table metadata disables the whole table, naming each piece
            return view! { <div class="table-error">{e.to_string()}</div> }.into_any();
        }
    };

    let element_name = StoredValue::new(controller.descriptor().element_name.clone());
    let list_name = controller.descriptor().list_name.clone();
    let list_query = StoredValue::new(controller.descriptor().list_query.clone());
    let primary_key = StoredValue::new(controller.descriptor().primary_key.clone());
    let session = controller.session();
    let schema_sv = StoredValue::new(controller.schema().to_vec());
    let columns = StoredValue::new(
        controller
            .schema()
            .iter()
            .filter(|field| is_column(field))
            .cloned()
            .collect::<Vec<_>>(),
    );

    let table = RwSignal::new(controller);
    let form_state = RwSignal::new(FormState::new());
    let picker = RwSignal::new(None::<PickerRequest>);
    let cache = RwSignal::new(SelectionCache::new());
    let sort = RwSignal::new(None::<Sort>);
    let search = RwSignal::new(String::new());
    let loading = RwSignal::new(false);
    let total = RwSignal::new(0usize);

    let fetch = move || {
        loading.set(true);
        spawn_local(async move {
            let params = ListParams {
                pagination: Some(Pagination::default()),
                sort: sort.get_untracked(),
                search: Some(search.get_untracked()).filter(|term| !term.is_empty()),
                ..ListParams::default()
            };
            let query = list_query.get_value();
            match RestProvider::new()
                .list(resource, query.as_deref(), &params)
                .await
            {
                Ok(result) => {
                    total.set(result.total_count);
                    table.update(|c| {
                        // A refetch must not swallow an unsaved placeholder row
                        if c.mode != TableMode::Creating {
                            c.set_rows(result.items);
                        }
                    });
                }
                Err(e) => notifier.error(&e.to_string()),
            }
            loading.set(false);
        });
    };
    fetch();

    // Copy the live form back into the controller before any decision that
    // depends on it (dirtiness, validation)
    let sync_form = move || table.update(|c| c.form = form_state.get_untracked());

    // Push the controller's form out to the reactive state, reconciling
    // unknown-property rows before the first render of the loaded record
    let load_form = move || {
        let mut form = table.with_untracked(|c| c.form.clone());
        let record = form.record.clone();
        schema_sv.with_value(|fields| {
            reconcile_unknowns(fields, &record, &FieldPath::root(), &mut form.unknowns);
        });
        form_state.set(form);
    };

    // Rows come back with associations in parent-key form; resolve them into
    // full objects before handing the record to the form
    let start_editing = move |record: Value| {
        spawn_local(async move {
            let fields = schema_sv.get_value();
            let hydrated = hydrate_record(&RestProvider::new(), &fields, &record).await;
            table.update(|c| c.force_edit(&hydrated));
            load_form();
        });
    };

    let edit_row = move |record: Value| {
        sync_form();
        let outcome = table
            .try_update(|c| c.begin_edit(&record))
            .unwrap_or(EditOutcome::Ignored);
        match outcome {
            EditOutcome::Started => start_editing(record),
            EditOutcome::NeedsConfirmation => {
                if notifier.confirm("Discard unsaved changes?") {
                    start_editing(record);
                }
            }
            EditOutcome::Ignored => {}
        }
    };

    let new_record = move |_| {
        sync_form();
        let outcome = table
            .try_update(|c| c.begin_create())
            .unwrap_or(EditOutcome::Ignored);
        match outcome {
            EditOutcome::Started => load_form(),
            EditOutcome::NeedsConfirmation => {
                if notifier.confirm("Discard unsaved changes?") {
                    table.update(|c| {
                        c.cancel();
                        c.begin_create();
                    });
                    load_form();
                }
            }
            EditOutcome::Ignored => {}
        }
    };

    let on_save = move |_| {
        sync_form();
        let Some(action) = table.try_update(|c| c.save()).flatten() else {
            return;
        };
        if matches!(action, SaveAction::RejectedInvalid(_)) {
            // Inline errors are already on the controller; no network call
            return;
        }
        spawn_local(async move {
            let descriptor = table.with_untracked(|c| c.descriptor().clone());
            match dispatch_save(&RestProvider::new(), &descriptor, &action).await {
                Ok(_) => {
                    table.update(|c| c.save_succeeded());
                    cache.update(|c| c.clear_session(session));
                    form_state.set(FormState::new());
                    notifier.success(&format!("{} saved", element_name.get_value()));
                    fetch();
                }
                Err(e) => {
                    table.update(|c| c.save_failed());
                    notifier.error(&e.to_string());
                }
            }
        });
    };

    let on_cancel = move |_| {
        table.update(|c| c.cancel());
        cache.update(|c| c.clear_session(session));
        form_state.set(FormState::new());
    };

    let toggle_sort = move |field: String| {
        sort.update(|current| {
            *current = match current.take() {
                Some(prev) if prev.field == field && prev.ascending => {
                    Some(Sort::descending(field))
                }
                Some(prev) if prev.field == field => None,
                _ => Some(Sort::ascending(field)),
            };
        });
        fetch();
    };

    view! {
        <div class="page">
            <div class="page__header header">
                <h2 class="header__title">{list_name}</h2>
                <div class="header__actions">
                    <input
                        class="header__search"
                        type="text"
                        placeholder="Search..."
                        on:change=move |ev| {
                            search.set(event_target_value(&ev));
                            fetch();
                        }
                    />
                    <button class="button button--primary" on:click=new_record>
                        {format!("New {}", element_name.get_value())}
                    </button>
                </div>
            </div>

            <div class="page__body">
                <table class="table">
                    <thead>
                        <tr>
                            {columns
                                .get_value()
                                .into_iter()
                                .map(|col| {
                                    let label = col.label.clone();
                                    if col.sortable {
                                        let field = col.name.clone();
                                        let marker_field = col.name.clone();
                                        view! {
                                            <th
                                                class="table__header table__header--sortable"
                                                on:click=move |_| toggle_sort(field.clone())
                                            >
                                                {label}
                                                {move || {
                                                    sort.with(|s| match s {
                                                        Some(s) if s.field == marker_field && s.ascending => " ▲",
                                                        Some(s) if s.field == marker_field => " ▼",
                                                        _ => "",
                                                    })
                                                }}
                                            </th>
                                        }
                                            .into_any()
                                    } else {
                                        view! { <th class="table__header">{label}</th> }.into_any()
                                    }
                                })
                                .collect_view()}
                        </tr>
                    </thead>
                    <tbody>
                        {move || {
                            let rows = table.with(|c| c.rows.clone());
                            rows.into_iter()
                                .map(|record| {
                                    let cells = columns.with_value(|cols| {
                                        cols.iter()
                                            .map(|col| {
                                                view! {
                                                    <td class="table__cell">{cell_view(col, &record)}</td>
                                                }
                                            })
                                            .collect_view()
                                    });
                                    let row_id = primary_key
                                        .with_value(|pk| record.get(pk.as_str()).cloned());
                                    let selected = table.with(|c| match &c.mode {
                                        TableMode::Editing(original) => {
                                            primary_key.with_value(|pk| {
                                                original.get(pk.as_str()) == row_id.as_ref()
                                            })
                                        }
                                        _ => false,
                                    });
                                    let class = if selected {
                                        "table__row table__row--selected"
                                    } else {
                                        "table__row"
                                    };
                                    let row_record = record.clone();
                                    view! {
                                        <tr class=class on:click=move |_| edit_row(row_record.clone())>
                                            {cells}
                                        </tr>
                                    }
                                })
                                .collect_view()
                        }}
                    </tbody>
                </table>
                <div class="table__footer">
                    {move || {
                        if loading.get() {
                            "Loading...".to_string()
                        } else {
                            format!("{} total", total.get())
                        }
                    }}
                </div>
            </div>

            <Show when=move || table.with(|c| c.is_editing() || c.is_saving())>
                <div class="editor-panel">
                    <h3 class="editor-panel__title">
                        {move || {
                            let creating = table
                                .with(|c| matches!(c.mode, TableMode::Creating));
                            if creating {
                                format!("New {}", element_name.get_value())
                            } else {
                                format!("Edit {}", element_name.get_value())
                            }
                        }}
                    </h3>
                    {move || {
                        let errors = table.with(|c| c.errors.clone());
                        (!errors.is_empty())
                            .then(|| {
                                view! {
                                    <ul class="form-errors">
                                        {errors
                                            .into_iter()
                                            .map(|e| view! { <li class="form-errors__item">{e.message}</li> })
                                            .collect_view()}
                                    </ul>
                                }
                            })
                    }}
                    <GenericForm schema=schema_sv state=form_state picker=picker />
                    <div class="editor-panel__actions">
                        <button
                            class="button button--primary"
                            disabled=move || table.with(|c| c.is_saving())
                            on:click=on_save
                        >
                            "Save"
                        </button>
                        <button class="button button--secondary" on:click=on_cancel>
                            "Cancel"
                        </button>
                    </div>
                </div>
            </Show>

            {move || {
                picker
                    .get()
                    .map(|request| {
                        view! {
                            <AssociationPickerModal
                                request
                                session
                                form_state
                                cache
                                picker
                            />
                        }
                    })
            }}
        </div>
    }
    .into_any()
}
