use leptos::prelude::*;

use crate::catalog::SchemaCatalog;
use crate::components::EditRequest;
use crate::list::{can_delete_all, sort_by_recency, DeleteConfirm};
use crate::store::SegmentStore;
use crate::types::Segment;

#[component]
pub fn SavedSegments() -> impl IntoView {
    let store = expect_context::<SegmentStore>();
    let catalog = expect_context::<SchemaCatalog>();
    let edit_request = expect_context::<EditRequest>();

    // Bumped by every store change so the list reloads
    let version = RwSignal::new(0u64);
    let subscription = store.subscribe(move || {
        version.try_update(|v| *v += 1);
    });
    {
        let store = store.clone();
        on_cleanup(move || store.unsubscribe(subscription));
    }

    let store = StoredValue::new(store);
    let catalog = StoredValue::new(catalog);

    let segments = Memo::new(move |_| {
        version.track();
        store.with_value(|s| sort_by_recency(s.load_all()))
    });
    let confirm = RwSignal::new(DeleteConfirm::default());

    let delete_all = move |_| {
        store.with_value(|s| {
            confirm.update(|c| {
                c.confirm_all(s);
            })
        })
    };

    view! {
        <div class="w-full max-w-xl">
            <Show
                when=move || segments.with(|s| !s.is_empty())
                fallback=|| view! {
                    <div class="text-center text-sm italic text-gray-500">"No saved segments yet."</div>
                }
            >
                <h3 class="mb-5 text-center text-lg font-semibold text-gray-800">"Saved Segments"</h3>

                <ul class="flex flex-col gap-4">
                    {move || segments.get().into_iter().map(|segment| {
                        view! {
                            <SegmentItem
                                segment=segment
                                catalog=catalog.get_value()
                                store=store
                                confirm=confirm
                                edit_request=edit_request
                            />
                        }
                    }).collect_view()}
                </ul>

                <div class="mt-6 flex flex-col items-center justify-between gap-3 sm:flex-row">
                    <p class="text-xs italic text-gray-500">
                        "For demonstration purposes, your segments are temporarily stored in your browser's local storage."
                    </p>

                    <Show when=move || segments.with(|s| can_delete_all(s.len()))>
                        {move || if confirm.with(|c| c.is_all_armed()) {
                            view! {
                                <div class="flex items-center gap-2">
                                    <button
                                        class="h-7 px-2 text-xs rounded bg-red-500 hover:bg-red-600 text-white"
                                        on:click=delete_all
                                    >
                                        "Confirm Delete All"
                                    </button>
                                    <button
                                        class="h-7 px-2 text-xs rounded bg-gray-200 hover:bg-gray-300"
                                        on:click=move |_| confirm.update(|c| c.disarm_all())
                                    >
                                        "Cancel"
                                    </button>
                                </div>
                            }.into_any()
                        } else {
                            view! {
                                <button
                                    class="h-7 px-2 text-xs text-red-500 hover:text-red-600"
                                    on:click=move |_| {
                                        let count = segments.with(|s| s.len());
                                        confirm.update(|c| c.arm_all(count));
                                    }
                                >
                                    "Delete All Segments"
                                </button>
                            }.into_any()
                        }}
                    </Show>
                </div>
            </Show>
        </div>
    }
}

#[component]
fn SegmentItem(
    segment: Segment,
    catalog: SchemaCatalog,
    store: StoredValue<SegmentStore>,
    confirm: RwSignal<DeleteConfirm>,
    edit_request: EditRequest,
) -> impl IntoView {
    let id = segment.id.clone();
    let armed = {
        let id = id.clone();
        move || confirm.with(|c| c.is_armed(&id))
    };
    let saved_at = segment
        .timestamp
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string());

    let pills = segment
        .schemas
        .iter()
        .map(|value| {
            let (label, pill, dot, title) = match catalog.lookup(value) {
                Some(opt) => (
                    opt.label.clone(),
                    opt.trait_kind.pill_class(),
                    opt.trait_kind.dot_class(),
                    format!("{} ({})", opt.label, opt.trait_kind.as_str()),
                ),
                None => (
                    value.clone(),
                    "border-gray-200 bg-gray-50 text-gray-700",
                    "bg-gray-300",
                    value.clone(),
                ),
            };
            view! {
                <span
                    class=format!("inline-flex items-center gap-1 rounded-full border px-2 py-1 text-xs font-medium {}", pill)
                    title=title
                >
                    <span class=format!("h-2 w-2 rounded-full {}", dot)></span>
                    {label}
                </span>
            }
        })
        .collect_view();
    let has_schemas = !segment.schemas.is_empty();

    view! {
        <li class="rounded-2xl border border-gray-200 bg-white p-5 shadow hover:shadow-lg transition-shadow">
            <div class="flex items-start justify-between">
                <div>
                    <h4 class="text-lg font-semibold text-gray-900">{segment.name.clone()}</h4>
                    {saved_at.map(|t| view! { <p class="text-xs text-gray-500">{t}</p> })}
                </div>

                {move || if armed() {
                    let id = id.clone();
                    view! {
                        <div class="flex items-center gap-2">
                            <button
                                class="h-7 px-2 text-xs rounded bg-red-500 hover:bg-red-600 text-white"
                                on:click=move |_| store.with_value(|s| {
                                    confirm.update(|c| {
                                        c.confirm(s, &id);
                                    })
                                })
                            >
                                "Confirm"
                            </button>
                            <button
                                class="h-7 px-2 text-xs rounded bg-gray-200 hover:bg-gray-300"
                                on:click=move |_| confirm.update(|c| c.disarm())
                            >
                                "Cancel"
                            </button>
                        </div>
                    }.into_any()
                } else {
                    let edit_id = id.clone();
                    let arm_id = id.clone();
                    view! {
                        <div class="flex items-center gap-2">
                            <button
                                class="h-7 px-2 text-xs text-blue-600 hover:text-blue-800"
                                on:click=move |_| edit_request.request(edit_id.clone())
                            >
                                "Edit"
                            </button>
                            <button
                                class="h-7 px-2 text-xs text-red-500 hover:text-red-600"
                                on:click=move |_| confirm.update(|c| c.arm(&arm_id))
                            >
                                "Delete"
                            </button>
                        </div>
                    }.into_any()
                }}
            </div>

            {if has_schemas {
                view! { <div class="mt-3 flex flex-wrap gap-2">{pills}</div> }.into_any()
            } else {
                view! { <p class="mt-2 text-sm text-gray-500">"No schemas selected."</p> }.into_any()
            }}
        </li>
    }
}
