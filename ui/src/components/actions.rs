//! Per-row actions dropdown.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::leptos_dom::helpers::WindowListenerHandle;
use leptos::*;
use serde_json::Value;

use gridkit::{dispatch, ActionDescriptor, Notice};

/// Dropdown of the actions visible for one row.
///
/// The caller passes only the actions that survived permission filtering
/// and the per-row `should_show` check; when that set is empty no dropdown
/// is rendered at all, so this component is never mounted with an empty
/// list. Every click inside stops propagation so the row's own click
/// handler (detail navigation) does not fire as well; any click that
/// reaches the window closes an open menu.
#[component]
pub fn RowActions(
    /// Actions visible for this row.
    actions: Vec<ActionDescriptor>,
    /// The row the actions operate on.
    row: Value,
    /// Sink for transient notices raised by failing handlers.
    #[prop(optional_no_strip)] set_notices: Option<WriteSignal<Vec<Notice>>>,
) -> impl IntoView {
    let (open, set_open) = create_signal(false);

    let toggle = move |ev: ev::MouseEvent| {
        ev.stop_propagation();
        set_open.update(|o| *o = !*o);
    };

    // The window listener exists only while the menu is open. Toggle and
    // item clicks stop propagation, so they never reach it.
    let outside_click: Rc<RefCell<Option<WindowListenerHandle>>> = Rc::new(RefCell::new(None));
    create_effect({
        let outside_click = Rc::clone(&outside_click);
        move |_| {
            if open.get() {
                if outside_click.borrow().is_none() {
                    let handle = window_event_listener(ev::click, move |_| set_open.set(false));
                    *outside_click.borrow_mut() = Some(handle);
                }
            } else if let Some(handle) = outside_click.borrow_mut().take() {
                handle.remove();
            }
        }
    });
    on_cleanup({
        let outside_click = Rc::clone(&outside_click);
        move || {
            if let Some(handle) = outside_click.borrow_mut().take() {
                handle.remove();
            }
        }
    });

    view! {
        <div class="gridkit-actions">
            <button class="gridkit-actions-toggle" on:click=toggle>"⋯"</button>
            <Show
                when=move || open.get()
                fallback=|| view! { }
            >
                {
                    let actions = actions.clone();
                    let row = row.clone();
                    view! {
                        <div class="gridkit-actions-menu">
                            {actions
                                .iter()
                                .map(|action| {
                                    let action = action.clone();
                                    let row = row.clone();
                                    let label = action.label.clone();
                                    let icon = action.icon.clone();
                                    let danger = action.danger;
                                    view! {
                                        <button
                                            class="gridkit-action-item"
                                            class:danger=danger
                                            on:click=move |ev: ev::MouseEvent| {
                                                ev.stop_propagation();
                                                set_open.set(false);
                                                if let Some(notice) = dispatch(&action, &row) {
                                                    if let Some(set) = set_notices {
                                                        set.update(|notices| notices.push(notice));
                                                    }
                                                }
                                            }
                                        >
                                            <span class="gridkit-action-icon">{icon}</span>
                                            {label}
                                        </button>
                                    }
                                })
                                .collect_view()}
                        </div>
                    }
                }
            </Show>
        </div>
    }
}
