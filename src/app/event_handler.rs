use std::cell::RefCell;
use std::rc::Rc;

use gtk4::prelude::*;

use super::session::ProcessingStatus;
use super::state::{refresh_window, set_status_text, AppState, BackendEvent};

/// Apply a backend event to the session and the window. This is the core
/// state machine.
pub fn handle_backend_event(state: &Rc<RefCell<AppState>>, event: BackendEvent) {
    match event {
        BackendEvent::FileLoaded(record) => {
            log::info!("Loaded {} ({} bytes)", record.name, record.size);
            {
                let mut s = state.borrow_mut();
                s.session.accept_file(record);
                if let Some(ref win) = s.window {
                    win.result_buffer.set_text("");
                }
            }
            refresh_window(state);
        }
        BackendEvent::FileRejected(message) => {
            state.borrow_mut().session.reject_file();
            refresh_window(state);
            set_status_text(state, &message);
        }
        BackendEvent::StreamChunk(text) => {
            // Fast path: only the result view updates, no full refresh.
            let mut s = state.borrow_mut();
            if s.session.apply_increment(&text) {
                if let Some(ref win) = s.window {
                    win.result_buffer.set_text(&text);
                }
            }
        }
        BackendEvent::HumanizeComplete(text) => {
            {
                let mut s = state.borrow_mut();
                s.stream_in_flight = false;
                if s.session.status() == ProcessingStatus::Processing {
                    if let Some(ref win) = s.window {
                        win.result_buffer.set_text(&text);
                    }
                    s.session.finish(text);
                } else {
                    // The session was reset while the stream was draining.
                    log::info!("Discarding result of a superseded stream");
                }
            }
            refresh_window(state);
        }
        BackendEvent::HumanizeFailed(message) => {
            let was_processing;
            {
                let mut s = state.borrow_mut();
                s.stream_in_flight = false;
                was_processing = s.session.status() == ProcessingStatus::Processing;
                if was_processing {
                    s.session.fail();
                }
            }
            refresh_window(state);
            if was_processing {
                set_status_text(state, &message);
            }
        }
    }
}
