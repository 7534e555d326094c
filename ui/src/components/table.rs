//! The data table — one generic controller for every CRUD screen.
//!
//! A screen supplies rows, field descriptors, action descriptors, and its
//! module name; the table compiles columns, gates actions against the
//! caller's permission matrix, and owns all interactive state (per-column
//! search, sorting, enumerable filters, row selection, bulk delete, compact
//! viewport). Page data is render-only: page changes and deletes go back
//! to the host through callbacks, never fetched here.

use std::rc::Rc;

use leptos::*;
use serde_json::Value;

use gridkit::{
    compile, delete_each, empty_message, resolve, row_key, visible_for, ActionDescriptor,
    DeleteFn, EngineConfig, FieldDescriptor, GridState, Notice, Pagination, PermissionMatrix,
    RowSelection, SortDirection,
};

use crate::components::actions::RowActions;
use crate::components::pagination::PaginationBar;
use crate::config::{BULK_BAR_CLASS, EMPTY_CLASS, TABLE_CLASS};
use crate::viewport::use_viewport_width;

#[component]
pub fn DataTable(
    /// Current page of rows.
    rows: ReadSignal<Vec<Value>>,
    /// Semantic field descriptors, compiled once at mount.
    fields: Vec<FieldDescriptor>,
    /// Row-scoped action descriptors.
    #[prop(optional)] actions: Vec<ActionDescriptor>,
    /// Module the table is bound to.
    #[prop(into)] module: String,
    /// Plural item name for captions and the empty state.
    #[prop(into)] item_name: String,
    /// Caller permission matrix, shared for the session.
    matrix: Rc<PermissionMatrix>,
    /// Engine configuration supplied at application start.
    config: Rc<EngineConfig>,
    /// Pagination descriptor for the current page.
    pagination: ReadSignal<Pagination>,
    /// Receives `(page, page_size)` on page change.
    #[prop(into)] on_page_change: Callback<(usize, usize)>,
    /// Row selection eligibility; selection is off when absent.
    #[prop(optional)] row_selection: Option<RowSelection>,
    /// Per-key delete call backing the bulk-delete batch.
    #[prop(optional_no_strip)] on_delete_row: Option<DeleteFn>,
    /// Row click hook (detail navigation).
    #[prop(optional)] on_row_click: Option<Callback<Value>>,
    /// Sink for transient notices.
    #[prop(optional_no_strip)] set_notices: Option<WriteSignal<Vec<Notice>>>,
) -> impl IntoView {
    let columns = Rc::new(compile(&fields, &config));
    let resolved = Rc::new(resolve(&actions, &matrix));
    let selection = row_selection.unwrap_or(RowSelection::Disabled);
    let selection_enabled = selection.is_enabled();
    let has_actions_column = !resolved.is_empty();
    let key_field = config.row_key_field.clone();

    let state = create_rw_signal(GridState::new());
    let has_delete = matrix.grant(&module, "delete");
    state.update(|s| s.set_delete_permission(has_delete));

    // Single width source; the state owns the derived compact flag.
    let width = use_viewport_width();
    create_effect(move |_| {
        let px = width.get();
        state.update(|s| s.set_viewport_width(px));
    });
    let compact = Signal::derive(move || state.with(|s| s.is_compact_viewport()));

    // Any replacement of the row set (page change, refetch) clears the
    // selection. The first run is the initial mount, not a replacement.
    create_effect(move |prev: Option<()>| {
        rows.with(|_| ());
        if prev.is_some() {
            state.update(|s| s.rows_replaced());
        }
    });

    // At most one enumerable filter is active at a time: (column key, value).
    let active_filter = create_rw_signal(None::<(String, Value)>);

    let visible = {
        let columns = Rc::clone(&columns);
        create_memo(move |_| {
            rows.with(|rows| {
                let searched = state.with(|s| s.visible_rows(&columns, rows));
                match active_filter.get() {
                    None => searched,
                    Some((key, value)) => match columns.iter().find(|c| c.key == key) {
                        Some(column) => searched
                            .into_iter()
                            .filter(|row| column.matches_filter(&value, row))
                            .collect(),
                        None => searched,
                    },
                }
            })
        })
    };

    // --- header ------------------------------------------------------------

    let header_cells = columns
        .iter()
        .map(|col| {
            let title = col.title.clone();
            let key = col.key.clone();

            let search_input = col.searchable.then(|| {
                let placeholder = format!("Search {}", title.to_lowercase());
                let value_key = key.clone();
                let edit_key = key.clone();
                view! {
                    <input
                        class="gridkit-col-search"
                        placeholder=placeholder
                        prop:value=move || {
                            state.with(|s| {
                                s.filtered_value(&value_key)
                                    .map(|terms| terms[0].clone())
                                    .unwrap_or_default()
                            })
                        }
                        on:input=move |ev| {
                            let term = event_target_value(&ev);
                            if term.is_empty() {
                                state.update(|s| s.reset_search(&edit_key));
                            } else {
                                state.update(|s| s.apply_search(&edit_key, &term));
                            }
                        }
                    />
                }
            });

            let filter_menu = (!col.filters.is_empty()).then(|| {
                let filter_key = key.clone();
                let options = col.filters.clone();
                let entries = col.filters.clone();
                view! {
                    <select
                        class="gridkit-col-filter"
                        on:change=move |ev| {
                            let picked = event_target_value(&ev);
                            let chosen = picked
                                .parse::<usize>()
                                .ok()
                                .and_then(|i| options.get(i))
                                .map(|opt| (filter_key.clone(), opt.value.clone()));
                            active_filter.set(chosen);
                        }
                    >
                        <option value="">"All"</option>
                        {entries
                            .iter()
                            .enumerate()
                            .map(|(i, opt)| {
                                view! { <option value=i.to_string()>{opt.text.clone()}</option> }
                            })
                            .collect_view()}
                    </select>
                }
            });

            let title_cell = if col.sorter.is_some() {
                let sort_key = key.clone();
                let indicator_key = key.clone();
                view! {
                    <div
                        class="gridkit-col-title gridkit-col-sortable"
                        on:click=move |_| state.update(|s| s.toggle_sort(&sort_key))
                    >
                        {title}
                        <span class="gridkit-col-sort">
                            {move || match state.with(|s| s.sort_direction(&indicator_key)) {
                                Some(SortDirection::Ascending) => "▲",
                                Some(SortDirection::Descending) => "▼",
                                None => "",
                            }}
                        </span>
                    </div>
                }
                .into_view()
            } else {
                view! { <div class="gridkit-col-title">{title}</div> }.into_view()
            };

            view! {
                <th class="gridkit-th">
                    {title_cell}
                    {search_input}
                    {filter_menu}
                </th>
            }
        })
        .collect_view();

    // --- body --------------------------------------------------------------

    let rows_view = {
        let columns = Rc::clone(&columns);
        let resolved = Rc::clone(&resolved);
        let matrix = Rc::clone(&matrix);
        let selection = selection.clone();
        let children_key_field = key_field.clone();
        view! {
            <For
                each=move || visible.get()
                key={
                    let key_field = key_field.clone();
                    move |row: &Value| {
                        row_key(row, &key_field).unwrap_or_else(|| row.to_string())
                    }
                }
                children=move |row: Value| {
                    let key = row_key(&row, &children_key_field);
                    let selectable = selection.row_selectable(&row, &matrix);

                    let cells = columns
                        .iter()
                        .map(|col| {
                            view! { <td class="gridkit-cell">{col.cell_text(&row)}</td> }
                        })
                        .collect_view();

                    let select_cell = selection_enabled.then(|| {
                        let can_select = selectable && key.is_some();
                        let checked = {
                            let key = key.clone();
                            move || {
                                key.as_deref()
                                    .map(|k| state.with(|s| s.is_selected(k)))
                                    .unwrap_or(false)
                            }
                        };
                        let on_toggle = {
                            let key = key.clone();
                            move |_| {
                                if let Some(k) = key.clone() {
                                    state.update(|s| s.toggle_selected(k));
                                }
                            }
                        };
                        view! {
                            <td
                                class="gridkit-select-cell"
                                on:click=|ev: ev::MouseEvent| ev.stop_propagation()
                            >
                                <input
                                    type="checkbox"
                                    class="gridkit-select-box"
                                    prop:checked=checked
                                    disabled=!can_select
                                    on:change=on_toggle
                                />
                            </td>
                        }
                    });

                    let actions_cell = has_actions_column.then(|| {
                        let menu = {
                            let visible_actions: Vec<ActionDescriptor> =
                                visible_for(&resolved, &row).into_iter().cloned().collect();
                            (!visible_actions.is_empty()).then(|| {
                                view! {
                                    <RowActions
                                        actions=visible_actions
                                        row=row.clone()
                                        set_notices=set_notices
                                    />
                                }
                            })
                        };
                        view! { <td class="gridkit-actions-cell">{menu}</td> }
                    });

                    let selected = {
                        let key = key.clone();
                        move || {
                            key.as_deref()
                                .map(|k| state.with(|s| s.is_selected(k)))
                                .unwrap_or(false)
                        }
                    };
                    let on_click_row = {
                        let row = row.clone();
                        move |_ev: ev::MouseEvent| {
                            if let Some(cb) = on_row_click {
                                cb.call(row.clone());
                            }
                        }
                    };

                    view! {
                        <tr
                            class="gridkit-row"
                            class=("gridkit-row-selected", selected)
                            on:click=on_click_row
                        >
                            {select_cell}
                            {cells}
                            {actions_cell}
                        </tr>
                    }
                }
            />
        }
    };

    // --- bulk delete -------------------------------------------------------

    // The bar is structural: without a bound deleter and delete permission
    // on the module it is not rendered at all, not merely disabled.
    let can_bind_bulk = on_delete_row.is_some() && has_delete;
    let submit_bulk = {
        let deleter = on_delete_row.clone();
        let item_name = item_name.clone();
        move |_ev: ev::MouseEvent| {
            let Some(deleter) = deleter.clone() else {
                return;
            };
            let mut started = false;
            state.update(|s| started = s.begin_bulk());
            if !started {
                return;
            }
            let keys = state.with_untracked(|s| s.selected_row_keys());
            let item_name = item_name.clone();
            spawn_local(async move {
                let outcome = delete_each(&keys, |key| deleter(key)).await;
                // Selection clears only once the whole batch settled.
                state.update(|s| s.finish_bulk());
                if let Some(set) = set_notices {
                    set.update(|notices| notices.push(outcome.notice(&item_name)));
                }
            });
        }
    };

    let bulk_bar = view! {
        <Show
            when=move || can_bind_bulk && state.with(|s| s.bulk_actions_visible())
            fallback=|| view! { }
        >
            {
                let submit = submit_bulk.clone();
                view! {
                    <div class=BULK_BAR_CLASS>
                        <span class="gridkit-bulk-count">
                            {move || state.with(|s| s.selected_row_keys().len())}
                            " selected"
                        </span>
                        <button
                            class="gridkit-bulk-delete"
                            disabled=move || state.with(|s| s.bulk_in_flight())
                            on:click=submit
                        >
                            "Delete selected"
                        </button>
                    </div>
                }
            }
        </Show>
    };

    // --- assembly ----------------------------------------------------------

    let empty_item_name = item_name.clone();

    view! {
        <div class=TABLE_CLASS>
            {bulk_bar}
            <table class="gridkit-grid">
                <thead>
                    <tr>
                        {selection_enabled
                            .then(|| view! { <th class="gridkit-select-th"></th> })}
                        {header_cells}
                        {has_actions_column
                            .then(|| view! { <th class="gridkit-actions-th">"Actions"</th> })}
                    </tr>
                </thead>
                <tbody>{rows_view}</tbody>
            </table>
            // Header affordances stay rendered for empty pages; only the
            // body is replaced by the module-aware message.
            <Show
                when=move || visible.with(|v| v.is_empty())
                fallback=|| view! { }
            >
                <div class=EMPTY_CLASS>{empty_message(&empty_item_name)}</div>
            </Show>
            <PaginationBar
                pagination=pagination
                item_name=item_name
                compact=compact
                on_change=on_page_change
            />
        </div>
    }
}
