use leptos::prelude::*;

use crate::controller::{OverlayKind, SegmentForm};

/// Success, failure and discard dialogs driven by the form's overlay
#[component]
pub fn StatusOverlay(form: RwSignal<SegmentForm>) -> impl IntoView {
    let overlay = move || form.with(|f| f.overlay().map(|o| o.kind.clone()));

    let close = move |_| form.update(|f| f.dismiss_overlay());
    let discard = move |_| form.update(|f| f.confirm_discard());

    view! {
        {move || overlay().map(|kind| {
            let (title, color, message, webhook_response) = match kind.clone() {
                OverlayKind::Saved { webhook_response } => (
                    "✅ Segment Saved Successfully!",
                    "text-green-600",
                    "Your segment has been saved. This window will close automatically.".to_string(),
                    webhook_response,
                ),
                OverlayKind::Failed { message } => (
                    "❌ Error Saving Segment",
                    "text-red-600",
                    format!("Something went wrong while saving your segment: {}", message),
                    None,
                ),
                OverlayKind::ConfirmDiscard => (
                    "Discard changes?",
                    "text-gray-900",
                    "You have unsaved changes. Closing now will lose them.".to_string(),
                    None,
                ),
            };
            let confirming = kind == OverlayKind::ConfirmDiscard;

            view! {
                <div class="fixed inset-0 z-50 flex items-center justify-center bg-black/40">
                    <div class="bg-white rounded-2xl shadow-lg p-6 max-w-sm w-full text-center">
                        <h3 class=format!("text-xl font-semibold {}", color)>{title}</h3>
                        <p class="mt-2 text-sm text-gray-600">{message}</p>

                        {webhook_response.map(|text| view! {
                            <div class="mt-3 rounded-md bg-gray-100 p-3 text-left text-xs text-gray-700">
                                <strong>"Webhook Response:"</strong>
                                <pre class="mt-1 break-words whitespace-pre-wrap">{text}</pre>
                            </div>
                        })}

                        <div class="mt-6 flex justify-end gap-3">
                            {if confirming {
                                view! {
                                    <button
                                        class="px-4 py-2 rounded bg-gray-200 hover:bg-gray-300"
                                        on:click=close
                                    >
                                        "Cancel"
                                    </button>
                                    <button
                                        class="px-4 py-2 rounded bg-red-500 hover:bg-red-600 text-white"
                                        on:click=discard
                                    >
                                        "Discard"
                                    </button>
                                }.into_any()
                            } else {
                                view! {
                                    <button
                                        class="px-4 py-2 rounded bg-blue-500 hover:bg-blue-600 text-white"
                                        on:click=close
                                    >
                                        "Close"
                                    </button>
                                }.into_any()
                            }}
                        </div>
                    </div>
                </div>
            }
        })}
    }
}
