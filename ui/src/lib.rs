use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes, A};
use leptos_router::path;

pub mod allocator;
pub mod api;
pub mod catalog;
pub mod components;
pub mod controller;
pub mod list;
pub mod store;
pub mod types;

use catalog::SchemaCatalog;
use components::saved_segments::SavedSegments;
use components::segment_modal::SegmentModal;
use components::EditRequest;
use controller::SegmentForm;
use store::SegmentStore;

#[component]
pub fn App() -> impl IntoView {
    let store = SegmentStore::browser();
    let catalog = SchemaCatalog::default();
    provide_context(store);
    provide_context(catalog);
    provide_context(EditRequest::new());

    view! {
        <Router>
            <div class="flex h-screen bg-gray-100">
                // Sidebar
                <div class="w-64 bg-gray-800 text-white p-4 flex flex-col">
                    <h1 class="text-2xl font-bold mb-8">"Segments"</h1>
                    <nav class="space-y-1 flex-1">
                        <NavLink href="/" label="Segment Builder" />
                    </nav>
                    <div class="text-xs text-gray-500 mt-4">
                        "Segment Builder Demo"
                    </div>
                </div>

                // Main Content
                <div class="flex-1 overflow-y-auto">
                    <Routes fallback=|| "Not found.">
                        <Route path=path!("/") view=SegmentsPage/>
                    </Routes>
                </div>
            </div>
        </Router>
    }
}

#[component]
fn SegmentsPage() -> impl IntoView {
    let store = expect_context::<SegmentStore>();
    let catalog = expect_context::<SchemaCatalog>();
    let form = RwSignal::new(SegmentForm::new(catalog, store));

    view! {
        <div class="p-6 flex flex-col items-center gap-8">
            <div class="w-full max-w-xl flex justify-between items-center">
                <h2 class="text-2xl font-bold">"Segment Builder"</h2>
                <SegmentModal form=form />
            </div>
            <SavedSegments />
        </div>
    }
}

#[component]
fn NavLink(href: &'static str, label: &'static str) -> impl IntoView {
    view! {
        <A href=href attr:class="block p-2 hover:bg-gray-700 rounded transition-colors">
            {label}
        </A>
    }
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    // A second init only fails because a logger is already installed
    console_log::init_with_level(log::Level::Debug).ok();
    leptos::mount::mount_to_body(App);
}
