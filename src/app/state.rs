use std::cell::RefCell;
use std::rc::Rc;

use gtk4::prelude::*;

use crate::app::session::Session;
use crate::config::Config;
use crate::ingest::FileRecord;
use crate::ui::window::WindowWidgets;

/// Events sent from the tokio runtime back to the GTK main thread.
#[derive(Debug, Clone)]
pub enum BackendEvent {
    FileLoaded(FileRecord),
    FileRejected(String),
    /// Full cumulative text after one stream increment.
    StreamChunk(String),
    HumanizeComplete(String),
    HumanizeFailed(String),
}

/// Central application state. Lives on the GTK main thread inside Rc<RefCell<>>.
pub struct AppState {
    pub session: Session,
    pub config: Config,
    pub tokio_rt: tokio::runtime::Runtime,
    pub backend_sender: async_channel::Sender<BackendEvent>,
    /// A streaming request is running. Tracked apart from the session
    /// status so a reset during Processing cannot start a second request
    /// while the first is still draining.
    pub stream_in_flight: bool,
    pub window: Option<WindowWidgets>,
}

impl AppState {
    pub fn new(sender: async_channel::Sender<BackendEvent>) -> Self {
        let config = Config::load();
        let tokio_rt = tokio::runtime::Runtime::new()
            .expect("Failed to create tokio runtime");

        Self {
            session: Session::new(),
            config,
            tokio_rt,
            backend_sender: sender,
            stream_in_flight: false,
            window: None,
        }
    }
}

/// Sync widget sensitivity and labels with the current session.
pub fn refresh_window(state: &Rc<RefCell<AppState>>) {
    let s = state.borrow();
    if let Some(ref win) = s.window {
        crate::ui::window::refresh(win, &s.session, s.stream_in_flight);
    }
}

/// Override the status line, e.g. with an error message.
pub fn set_status_text(state: &Rc<RefCell<AppState>>, text: &str) {
    let s = state.borrow();
    if let Some(ref win) = s.window {
        win.status_label.set_text(text);
    }
}
