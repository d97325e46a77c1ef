use leptos::prelude::*;

use crate::api;
use crate::components::status_overlay::StatusOverlay;
use crate::components::EditRequest;
use crate::controller::{FormError, FormMode, SegmentForm, OVERLAY_DISMISS_MS};
use crate::types::{SchemaOption, TraitKind};

/// "Save Segment" button, the segment form dialog and its status overlay
#[component]
pub fn SegmentModal(form: RwSignal<SegmentForm>) -> impl IntoView {
    let edit_request = expect_context::<EditRequest>();

    // Edit clicks in the list arrive through the shared request signal
    Effect::new(move || {
        if let Some(id) = edit_request.0.get() {
            form.update(|f| f.open_edit(&id));
            edit_request.0.set(None);
        }
    });

    let is_open = move || form.with(|f| f.is_open());
    let is_editing = move || form.with(|f| matches!(f.mode(), FormMode::Edit(_)));
    let can_submit = move || form.with(|f| f.can_submit());
    let submitting = move || form.with(|f| f.is_submitting());
    let tooltip = move || {
        form.with(|f| f.validation_issue().map(|issue| issue.to_string()).unwrap_or_default())
    };
    let can_add_row = move || form.with(|f| f.can_add_row());
    // Rows are rebuilt only when one is added or removed
    let row_count = Memo::new(move |_| form.with(|f| f.rows().len()));

    let submit = move |_| {
        let request = match form.try_update(|f| f.begin_submit()) {
            Some(Ok(request)) => request,
            Some(Err(e)) => {
                log::debug!("Submit ignored: {}", e);
                return;
            }
            None => return,
        };

        wasm_bindgen_futures::spawn_local(async move {
            let outcome = api::save_segment(&request).await;
            // The page may be gone by now; try_update makes that a no-op
            if let Some(Some(generation)) = form.try_update(|f| f.finish_submit(outcome)) {
                schedule_dismiss(form, generation);
            }
        });
    };

    view! {
        <button
            class="bg-blue-500 hover:bg-blue-600 text-white px-4 py-2 rounded"
            on:click=move |_| form.update(|f| f.open_create())
        >
            "Save Segment"
        </button>

        <Show when=is_open>
            <div class="fixed inset-0 z-40 flex items-center justify-center bg-black/40">
                <div class="bg-white rounded-2xl shadow-lg p-6 sm:p-8 max-w-lg w-full">
                    <h2 class="text-2xl font-bold text-gray-900">
                        {move || if is_editing() { "Edit Segment" } else { "Save Segment" }}
                    </h2>

                    <div class="mt-4">
                        <label class="block text-sm font-medium text-gray-700 mb-1">
                            "Enter the Name of the Segment"
                        </label>
                        <input
                            type="text"
                            class="w-full border rounded px-3 py-2"
                            placeholder="Name of the segment"
                            prop:value=move || form.with(|f| f.name().to_string())
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                form.update(|f| log_rejected(f.set_name(value)));
                            }
                        />
                    </div>

                    <p class="mt-4 text-sm text-blue-700">
                        "To save your segment, you need to add the schemas to build the query."
                    </p>

                    <Legend />

                    <div class="mt-4 space-y-3">
                        {move || {
                            (0..row_count.get())
                                .map(|index| view! { <SchemaRowSelect form=form index=index /> })
                                .collect_view()
                        }}
                    </div>

                    <div class="mt-3">
                        <button
                            type="button"
                            class="text-sm font-medium text-blue-600 hover:text-blue-800 disabled:text-gray-400 disabled:cursor-not-allowed"
                            prop:disabled=move || !can_add_row()
                            title=move || if can_add_row() { String::new() } else { FormError::Saturated.to_string() }
                            on:click=move |_| form.update(|f| log_rejected(f.add_row()))
                        >
                            "+ Add new schema"
                        </button>
                    </div>

                    <div class="mt-8 flex justify-end gap-3">
                        <button
                            class="px-4 py-2 rounded bg-gray-200 hover:bg-gray-300 disabled:opacity-50"
                            prop:disabled=submitting
                            on:click=move |_| form.update(|f| f.request_close())
                        >
                            "Cancel"
                        </button>
                        <button
                            class="px-4 py-2 rounded bg-blue-500 hover:bg-blue-600 text-white disabled:opacity-50 disabled:cursor-not-allowed"
                            prop:disabled=move || !can_submit()
                            title=tooltip
                            on:click=submit
                        >
                            {move || if submitting() { "Saving..." } else { "Save the Segment" }}
                        </button>
                    </div>
                </div>
            </div>
        </Show>

        <StatusOverlay form=form />
    }
}

#[component]
fn SchemaRowSelect(form: RwSignal<SegmentForm>, index: usize) -> impl IntoView {
    let current = move || form.with(|f| f.rows().get(index).and_then(|r| r.value.clone()));
    let options = move || form.with(|f| f.available_for(index));
    let dot = move || {
        let value = current();
        form.with(|f| {
            value
                .and_then(|v| f.catalog().lookup(&v).map(|o| o.trait_kind.dot_class()))
                .unwrap_or("bg-gray-300")
        })
    };

    view! {
        <div class="flex items-center gap-2">
            <span class=move || format!("h-2 w-2 rounded-full {}", dot())></span>
            <select
                class="flex-1 border rounded px-3 py-2"
                prop:value=move || current().unwrap_or_default()
                on:change=move |ev| {
                    let value = event_target_value(&ev);
                    if !value.is_empty() {
                        form.update(|f| log_rejected(f.select_row(index, &value)));
                    }
                }
            >
                <option value="" disabled=true selected=move || current().is_none()>
                    "Select a schema"
                </option>
                {move || options().into_iter().map(|opt: SchemaOption| {
                    let selected = current().as_deref() == Some(opt.value.as_str());
                    view! {
                        <option value=opt.value.clone() selected=selected>{opt.label}</option>
                    }
                }).collect_view()}
            </select>
            <button
                class="px-2 text-lg text-red-500 hover:text-red-700"
                title="Remove schema"
                on:click=move |_| form.update(|f| log_rejected(f.remove_row(index)))
            >
                "–"
            </button>
        </div>
    }
}

#[component]
fn Legend() -> impl IntoView {
    view! {
        <div class="mt-3 flex justify-end gap-4 text-sm">
            <div class="flex items-center gap-2">
                <span class=format!("h-2 w-2 rounded-full {}", TraitKind::User.dot_class())></span>
                <span class="text-gray-600">"User Traits"</span>
            </div>
            <div class="flex items-center gap-2">
                <span class=format!("h-2 w-2 rounded-full {}", TraitKind::Group.dot_class())></span>
                <span class="text-gray-600">"Group Traits"</span>
            </div>
        </div>
    }
}

/// Close the overlay after a delay, unless a newer one has replaced it
fn schedule_dismiss(form: RwSignal<SegmentForm>, generation: u64) {
    let handle = gloo_timers::callback::Timeout::new(OVERLAY_DISMISS_MS, move || {
        form.try_update(|f| f.dismiss_overlay_if_current(generation));
    });
    handle.forget();
}

fn log_rejected(result: Result<(), FormError>) {
    if let Err(e) = result {
        log::debug!("Form change rejected: {}", e);
    }
}
