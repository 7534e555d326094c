//! Pagination bar.

use leptos::*;

use gridkit::{Pagination, MAX_PAGE_BUTTONS};

use crate::config::{PAGINATION_COMPACT_CLASS, PAGINATION_WIDE_CLASS};

/// Parse a quick-jump entry, clamping to the valid page range.
fn parse_jump(input: &str, page_count: usize) -> Option<usize> {
    let page: usize = input.trim().parse().ok()?;
    if page == 0 {
        return None;
    }
    Some(page.min(page_count))
}

/// Render-only pagination controls.
///
/// Page data never flows through here: every interaction is forwarded to
/// `on_change` as `(page, page_size)` and the host refetches. Orientation
/// follows the compact flag (bottom-right wide, bottom-center narrow).
#[component]
pub fn PaginationBar(
    /// Pagination descriptor for the current page.
    pagination: ReadSignal<Pagination>,
    /// Plural item name for the total-count caption.
    #[prop(into)] item_name: String,
    /// Compact-viewport flag.
    compact: Signal<bool>,
    /// Receives `(page, page_size)` for every page change.
    #[prop(into)] on_change: Callback<(usize, usize)>,
) -> impl IntoView {
    let go = move |page: usize| {
        let p = pagination.get_untracked();
        if page != p.current && (1..=p.page_count()).contains(&page) {
            on_change.call((page, p.page_size));
        }
    };

    view! {
        <div class=move || {
            if compact.get() { PAGINATION_COMPACT_CLASS } else { PAGINATION_WIDE_CLASS }
        }>
            <span class="gridkit-pagination-total">
                {move || pagination.with(|p| p.caption(&item_name))}
            </span>
            <button
                class="gridkit-page-prev"
                disabled=move || pagination.with(|p| p.current <= 1)
                on:click=move |_| go(pagination.get_untracked().current.saturating_sub(1))
            >
                "‹"
            </button>
            {move || {
                pagination.with(|p| {
                    let current = p.current;
                    p.window(MAX_PAGE_BUTTONS)
                        .into_iter()
                        .map(|page| {
                            view! {
                                <button
                                    class="gridkit-page-number"
                                    class:active={page == current}
                                    on:click=move |_| go(page)
                                >
                                    {page}
                                </button>
                            }
                        })
                        .collect_view()
                })
            }}
            <button
                class="gridkit-page-next"
                disabled=move || pagination.with(|p| p.current >= p.page_count())
                on:click=move |_| go(pagination.get_untracked().current + 1)
            >
                "›"
            </button>
            <span class="gridkit-page-jump">
                "Go to "
                <input
                    class="gridkit-page-jump-input"
                    on:keydown=move |ev: ev::KeyboardEvent| {
                        if ev.key() == "Enter" {
                            let entry = event_target_value(&ev);
                            let count = pagination.get_untracked().page_count();
                            if let Some(page) = parse_jump(&entry, count) {
                                go(page);
                            }
                        }
                    }
                />
            </span>
        </div>
    }
}
