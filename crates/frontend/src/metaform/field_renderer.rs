//! Recursive view emitter for resolved render descriptors
//!
//! `render_node` walks one [`RenderNode`] and emits the matching markup;
//! every editor writes back into the shared [`FormState`] signal through the
//! binding path carried by the descriptor, which re-resolves the tree.

use leptos::prelude::*;
use serde_json::Value;

use contracts::engine::{
    value_path, EditorKind, FieldPath, FormState, RenderNode, UnknownEntry, UnknownType,
};
use contracts::shared::metadata::Cardinality;

use super::association_picker::PickerRequest;

/// Shared handles of one rendered form instance
#[derive(Clone, Copy)]
pub struct FormHandle {
    pub state: RwSignal<FormState>,
    /// Open association-picker request, consumed by the hosting page
    pub picker: RwSignal<Option<PickerRequest>>,
}

pub fn render_node(node: RenderNode, form: FormHandle) -> AnyView {
    match node {
        RenderNode::Editor {
            path,
            label,
            kind,
            required,
            value,
        } => render_editor(path, label, kind, required, value, form),
        RenderNode::Disclosure { path, label } => render_disclosure(path, label, form),
        RenderNode::Group {
            path: _,
            label,
            children,
        } => {
            let children: Vec<AnyView> = children
                .into_iter()
                .map(|child| render_node(child, form))
                .collect();
            view! {
                <fieldset class="form-group">
                    <legend class="form-group__legend">{label}</legend>
                    {children}
                </fieldset>
            }
            .into_any()
        }
        RenderNode::ArrayList { path, label, items } => render_array(path, label, items, form),
        RenderNode::Association {
            path,
            label,
            plan,
            summary,
            editable,
        } => {
            let clear_path = path.clone();
            let cardinality = plan.cardinality;
            let request = PickerRequest {
                path: path.clone(),
                plan,
                label: label.clone(),
            };
            view! {
                <div class="form-field form-field--association">
                    <label class="form-field__label">{label}</label>
                    <span class="association__summary">{summary}</span>
                    <Show when=move || editable>
                        {
                            let request = request.clone();
                            let clear_path = clear_path.clone();
                            view! {
                                <button
                                    class="button button--secondary button--small"
                                    on:click={
                                        let request = request.clone();
                                        move |_| form.picker.set(Some(request.clone()))
                                    }
                                >
                                    "Select..."
                                </button>
                                <button
                                    class="button button--ghost button--small"
                                    on:click=move |_| {
                                        let cleared = match cardinality {
                                            Cardinality::Single => Value::Null,
                                            Cardinality::Multiple => Value::Array(Vec::new()),
                                        };
                                        form.state
                                            .update(|s| s.set_value(&clear_path, cleared.clone()));
                                    }
                                >
                                    "Clear"
                                </button>
                            }
                        }
                    </Show>
                </div>
            }
            .into_any()
        }
        RenderNode::UnknownSlot {
            path,
            label,
            entry,
            value_editor,
        } => render_unknown_slot(path, label, entry, value_editor, form),
        RenderNode::UnknownList {
            path,
            label,
            rows,
            can_add,
        } => render_unknown_list(path, label, rows, can_add, form),
        RenderNode::Custom { path: _, output } => view! {
            <span class=output.class.unwrap_or_default()>{output.text}</span>
        }
        .into_any(),
        RenderNode::Error { path: _, message } => view! {
            <div class="form-error">{message}</div>
        }
        .into_any(),
    }
}

fn render_editor(
    path: FieldPath,
    label: String,
    kind: EditorKind,
    required: bool,
    value: Value,
    form: FormHandle,
) -> AnyView {
    let marker = if required { " *" } else { "" };
    let label_view = view! {
        <label class="form-field__label">{label}{marker}</label>
    };

    let input = match kind {
        EditorKind::Text => {
            let current = value.as_str().unwrap_or_default().to_string();
            view! {
                <input
                    class="form-input"
                    type="text"
                    prop:value=current
                    on:input=move |ev| {
                        let text = event_target_value(&ev);
                        form.state.update(|s| s.set_value(&path, Value::String(text.clone())));
                    }
                />
            }
            .into_any()
        }
        EditorKind::Number => {
            let current = match &value {
                Value::Number(n) => n.to_string(),
                _ => String::new(),
            };
            view! {
                <input
                    class="form-input"
                    type="number"
                    prop:value=current
                    on:input=move |ev| {
                        let text = event_target_value(&ev);
                        let parsed = text
                            .parse::<f64>()
                            .ok()
                            .and_then(serde_json::Number::from_f64)
                            .map(Value::Number)
                            .unwrap_or(Value::Null);
                        form.state.update(|s| s.set_value(&path, parsed.clone()));
                    }
                />
            }
            .into_any()
        }
        EditorKind::Checkbox => {
            let current = value.as_bool().unwrap_or(false);
            view! {
                <input
                    class="form-checkbox"
                    type="checkbox"
                    prop:checked=current
                    on:change=move |ev| {
                        let checked = event_target_checked(&ev);
                        form.state.update(|s| s.set_value(&path, Value::Bool(checked)));
                    }
                />
            }
            .into_any()
        }
        EditorKind::DateTime => {
            let current = value
                .as_str()
                .and_then(|raw| chrono::DateTime::parse_from_rfc3339(raw).ok())
                .map(|dt| dt.format("%Y-%m-%dT%H:%M").to_string())
                .unwrap_or_default();
            view! {
                <input
                    class="form-input"
                    type="datetime-local"
                    prop:value=current
                    on:input=move |ev| {
                        let text = event_target_value(&ev);
                        let parsed = chrono::NaiveDateTime::parse_from_str(&text, "%Y-%m-%dT%H:%M")
                            .ok()
                            .map(|naive| {
                                Value::String(naive.and_utc().to_rfc3339_opts(
                                    chrono::SecondsFormat::Secs,
                                    true,
                                ))
                            })
                            .unwrap_or(Value::Null);
                        form.state.update(|s| s.set_value(&path, parsed.clone()));
                    }
                />
            }
            .into_any()
        }
        EditorKind::Select(options) => {
            let current = value.as_str().unwrap_or_default().to_string();
            view! {
                <select
                    class="form-select"
                    prop:value=current
                    on:change=move |ev| {
                        let choice = event_target_value(&ev);
                        let next = if choice.is_empty() {
                            Value::Null
                        } else {
                            Value::String(choice.clone())
                        };
                        form.state.update(|s| s.set_value(&path, next.clone()));
                    }
                >
                    <option value="">"—"</option>
                    {options
                        .into_iter()
                        .map(|opt| {
                            view! { <option value=opt.value.clone()>{opt.label}</option> }
                        })
                        .collect_view()}
                </select>
            }
            .into_any()
        }
    };

    view! {
        <div class="form-field">
            {label_view}
            {input}
        </div>
    }
    .into_any()
}

fn render_disclosure(path: FieldPath, label: String, form: FormHandle) -> AnyView {
    view! {
        <button
            class="form-disclosure"
            on:click=move |_| form.state.update(|s| s.flags.enable(&path))
        >
            "+ "
            {label}
        </button>
    }
    .into_any()
}

fn render_array(
    path: FieldPath,
    label: String,
    items: Vec<RenderNode>,
    form: FormHandle,
) -> AnyView {
    let add_path = path.clone();
    let rendered: Vec<AnyView> = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let remove_path = path.clone();
            view! {
                <div class="array-item">
                    {render_node(item, form)}
                    <button
                        class="button button--ghost button--small"
                        on:click=move |_| {
                            form.state.update(|s| s.remove_array_item(&remove_path, index));
                        }
                    >
                        "Remove"
                    </button>
                </div>
            }
            .into_any()
        })
        .collect();

    view! {
        <div class="form-field form-field--array">
            <label class="form-field__label">{label}</label>
            {rendered}
            <button
                class="button button--secondary button--small"
                on:click=move |_| {
                    form.state
                        .update(|s| s.push_array_item(&add_path, Value::Object(Default::default())));
                }
            >
                "Add"
            </button>
        </div>
    }
    .into_any()
}

fn type_select(
    current: Option<UnknownType>,
    on_pick: impl Fn(Option<UnknownType>) + Send + Sync + 'static,
) -> AnyView {
    let selected = current.map(|t| t.as_str().to_string()).unwrap_or_default();
    view! {
        <select
            class="form-select form-select--small"
            prop:value=selected
            on:change=move |ev| {
                let raw = event_target_value(&ev);
                on_pick(UnknownType::parse(&raw));
            }
        >
            <option value="">"type..."</option>
            {UnknownType::all()
                .iter()
                .map(|t| view! { <option value=t.as_str()>{t.as_str()}</option> })
                .collect_view()}
        </select>
    }
    .into_any()
}

fn render_unknown_slot(
    path: FieldPath,
    label: String,
    entry: Option<UnknownEntry>,
    value_editor: Option<Box<RenderNode>>,
    form: FormHandle,
) -> AnyView {
    let register_path = path.clone();
    let Some(entry) = entry else {
        return view! {
            <div class="form-field form-field--unknown">
                <label class="form-field__label">{label}</label>
                <button
                    class="button button--secondary button--small"
                    on:click=move |_| {
                        form.state.update(|s| s.unknowns.register_last(&register_path));
                    }
                >
                    "Set value"
                </button>
            </div>
        }
        .into_any();
    };

    let select_path = path.clone();
    let current_entry = entry.clone();
    let editor = value_editor
        .map(|editor| render_node(*editor, form))
        .unwrap_or_else(|| view! { <span class="form-hint">"choose a type"</span> }.into_any());

    view! {
        <div class="form-field form-field--unknown">
            <label class="form-field__label">{label}</label>
            {type_select(entry.entry_type, move |picked| {
                let mut next = current_entry.clone();
                next.entry_type = picked;
                form.state.update(|s| s.unknowns.update(&select_path, 0, next.clone()));
            })}
            {editor}
        </div>
    }
    .into_any()
}

fn render_unknown_list(
    path: FieldPath,
    label: String,
    rows: Vec<contracts::engine::UnknownRow>,
    can_add: bool,
    form: FormHandle,
) -> AnyView {
    let add_path = path.clone();
    let host = path.pop();

    let rendered: Vec<AnyView> = rows
        .into_iter()
        .map(|row| {
            let index = row.index;
            let entry = row.entry;
            let name_path = path.clone();
            let name_host = host.clone();
            let name_entry = entry.clone();
            let type_path = path.clone();
            let type_entry = entry.clone();
            let remove_path = path.clone();
            let remove_host = host.clone();
            let remove_entry = entry.clone();
            let current_name = entry.name.clone().unwrap_or_default();

            let editor = row
                .value_editor
                .map(|editor| render_node(*editor, form))
                .unwrap_or_else(|| {
                    view! { <span class="form-hint">"name and type first"</span> }.into_any()
                });

            view! {
                <div class="unknown-row">
                    <input
                        class="form-input form-input--small"
                        type="text"
                        placeholder="name"
                        prop:value=current_name
                        on:change=move |ev| {
                            let new_name = event_target_value(&ev);
                            let mut next = name_entry.clone();
                            let old_name = next.name.clone();
                            next.name = if new_name.is_empty() {
                                None
                            } else {
                                Some(new_name.clone())
                            };
                            form.state.update(|s| {
                                // Carry the value over when the key is renamed
                                if let Some(old) = old_name.as_deref().filter(|o| *o != new_name) {
                                    let old_path = name_host.child(old);
                                    if let Some(value) = s.value_at(&old_path).cloned() {
                                        if !new_name.is_empty() {
                                            s.set_value(&name_host.child(&new_name), value);
                                        }
                                        value_path::remove(&mut s.record, old_path.name_path());
                                    }
                                }
                                s.unknowns.update(&name_path, index, next.clone());
                            });
                        }
                    />
                    {type_select(entry.entry_type, move |picked| {
                        let mut next = type_entry.clone();
                        next.entry_type = picked;
                        form.state
                            .update(|s| s.unknowns.update(&type_path, index, next.clone()));
                    })}
                    {editor}
                    <button
                        class="button button--ghost button--small"
                        on:click=move |_| {
                            form.state.update(|s| {
                                if let Some(name) = remove_entry.name.as_deref() {
                                    let value_at = remove_host.child(name);
                                    value_path::remove(&mut s.record, value_at.name_path());
                                }
                                s.unknowns.remove(&remove_path, index);
                            });
                        }
                    >
                        "Remove"
                    </button>
                </div>
            }
            .into_any()
        })
        .collect();

    view! {
        <div class="form-field form-field--unknown-list">
            <label class="form-field__label">{label}</label>
            {rendered}
            <Show when=move || can_add>
                {
                    let add_path = add_path.clone();
                    view! {
                        <button
                            class="button button--secondary button--small"
                            on:click=move |_| {
                                form.state.update(|s| s.unknowns.register_last(&add_path));
                            }
                        >
                            "Add property"
                        </button>
                    }
                }
            </Show>
        </div>
    }
    .into_any()
}
