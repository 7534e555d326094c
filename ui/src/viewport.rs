//! Viewport width tracking.
//!
//! One application-wide width signal fed by a single debounced `resize`
//! listener. [`init_viewport_tracking`] installs the listener once at
//! startup; every component reads the shared signal instead of attaching
//! a listener of its own.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use leptos::{
    create_signal, ev, window_event_listener, ReadSignal, Signal, SignalGet, SignalSet,
    WriteSignal,
};

use gridkit::{COMPACT_BREAKPOINT_PX, RESIZE_DEBOUNCE_MS};

thread_local! {
    static WIDTH: RefCell<Option<ReadSignal<u32>>> = const { RefCell::new(None) };
}

/// Current viewport width in pixels.
///
/// Outside a browser (tests, prerendering) the width is unknown; report
/// wide so the grid renders its full layout.
fn current_width() -> u32 {
    web_sys::window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|v| v.as_f64())
        .map(|w| w as u32)
        .unwrap_or(COMPACT_BREAKPOINT_PX + 1)
}

/// Register the shared width signal. Returns the write half on the first
/// call, `None` when tracking is already installed.
fn install_width_signal(initial: u32) -> Option<WriteSignal<u32>> {
    WIDTH.with(|slot| {
        if slot.borrow().is_some() {
            return None;
        }
        let (width, set_width) = create_signal(initial);
        *slot.borrow_mut() = Some(width);
        Some(set_width)
    })
}

/// Install the application-wide debounced resize listener.
///
/// Call once at startup, inside the root component (alongside
/// [`crate::init_logging`]); later calls are no-ops. The listener lives
/// for the application lifetime.
pub fn init_viewport_tracking() {
    let Some(set_width) = install_width_signal(current_width()) else {
        return;
    };
    let pending: Rc<RefCell<Option<Timeout>>> = Rc::new(RefCell::new(None));
    let _handle = window_event_listener(ev::resize, move |_| {
        let timeout = Timeout::new(RESIZE_DEBOUNCE_MS, move || {
            set_width.set(current_width());
        });
        // A newer resize supersedes the pending update.
        if let Some(previous) = pending.borrow_mut().replace(timeout) {
            previous.cancel();
        }
    });
}

/// Shared reactive viewport width.
///
/// Without [`init_viewport_tracking`] the width is a wide constant and
/// never updates (tests, prerendering).
pub fn use_viewport_width() -> Signal<u32> {
    match WIDTH.with(|slot| *slot.borrow()) {
        Some(width) => width.into(),
        None => Signal::derive(|| COMPACT_BREAKPOINT_PX + 1),
    }
}

/// Derived compact-mode flag for the current viewport.
pub fn use_compact_viewport() -> Signal<bool> {
    let width = use_viewport_width();
    Signal::derive(move || width.get() <= COMPACT_BREAKPOINT_PX)
}
