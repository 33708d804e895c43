mod app;
mod clipboard;
mod config;
mod error;
mod gemini;
mod ingest;
mod options;
mod prompt;
mod ui;

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use gtk4::prelude::*;
use libadwaita::prelude::*;

use app::{AppState, BackendEvent};
use options::Tone;

fn main() {
    env_logger::init();
    log::info!("Humanize AI starting");

    let application = libadwaita::Application::builder()
        .application_id("com.github.humanizeai")
        .build();

    application.connect_activate(on_activate);
    application.run();
}

fn on_activate(app: &libadwaita::Application) {
    // Create the backend → UI event channel
    let (backend_tx, backend_rx) = async_channel::unbounded::<BackendEvent>();

    let state = Rc::new(RefCell::new(AppState::new(backend_tx)));

    // Build UI
    let widgets = ui::window::build_window(
        app,
        &state.borrow().config.gemini_api_key,
        &state.borrow().session.options,
    );

    // Quit action for the app menu
    let quit_action = gtk4::gio::ActionEntry::builder("quit")
        .activate(|app: &libadwaita::Application, _, _| app.quit())
        .build();
    app.add_action_entries([quit_action]);
    app.set_accels_for_action("app.quit", &["<primary>q"]);

    // Wire up the file chooser
    {
        let state_clone = state.clone();
        let window = widgets.window.clone();
        widgets.choose_button.connect_clicked(move |_| {
            if !state_clone.borrow().session.can_select_file() {
                return;
            }

            let filter = gtk4::FileFilter::new();
            filter.set_name(Some("Documents and images"));
            for ext in ingest::ACCEPTED_EXTENSIONS {
                filter.add_suffix(ext);
            }
            let filters = gtk4::gio::ListStore::new::<gtk4::FileFilter>();
            filters.append(&filter);

            let dialog = gtk4::FileDialog::builder()
                .title("Select a document")
                .build();
            dialog.set_filters(Some(&filters));

            let state_inner = state_clone.clone();
            dialog.open(
                Some(&window),
                gtk4::gio::Cancellable::NONE,
                move |result| {
                    if let Ok(file) = result {
                        if let Some(path) = file.path() {
                            begin_file_load(&state_inner, path);
                        }
                    }
                },
            );
        });
    }

    // Accept a file dropped onto the document row
    {
        let state_clone = state.clone();
        let drop_target = gtk4::DropTarget::new(
            gtk4::gio::File::static_type(),
            gtk4::gdk::DragAction::COPY,
        );
        drop_target.connect_drop(move |_, value, _, _| {
            if let Ok(file) = value.get::<gtk4::gio::File>() {
                if let Some(path) = file.path() {
                    begin_file_load(&state_clone, path);
                    return true;
                }
            }
            false
        });
        widgets.file_row.add_controller(drop_target);
    }

    // Wire up the rewrite options
    {
        let state_clone = state.clone();
        widgets.tone_row.connect_selected_notify(move |row| {
            let tone = Tone::from_index(row.selected());
            state_clone.borrow_mut().session.options.set_tone(tone);
        });
    }
    {
        let state_clone = state.clone();
        widgets.simplify_row.connect_active_notify(move |row| {
            state_clone
                .borrow_mut()
                .session
                .options
                .set_simplify_complex_terms(row.is_active());
        });
    }
    {
        let state_clone = state.clone();
        widgets.flow_row.connect_active_notify(move |row| {
            state_clone
                .borrow_mut()
                .session
                .options
                .set_improve_flow(row.is_active());
        });
    }
    {
        let state_clone = state.clone();
        widgets
            .audience_row
            .connect_changed(move |row: &libadwaita::EntryRow| {
                state_clone
                    .borrow_mut()
                    .session
                    .options
                    .set_target_audience(row.text().to_string());
            });
    }

    // Wire up API key changes
    {
        let state_clone = state.clone();
        widgets
            .api_key_row
            .connect_changed(move |row: &libadwaita::PasswordEntryRow| {
                let key = row.text().to_string();
                let mut s = state_clone.borrow_mut();
                s.config.gemini_api_key = key;
                if let Err(e) = s.config.save() {
                    log::warn!("Failed to save config: {e}");
                }
            });
    }

    // Wire up the action button
    {
        let state_clone = state.clone();
        widgets.humanize_button.connect_clicked(move |_| {
            {
                let mut s = state_clone.borrow_mut();
                if s.stream_in_flight || !s.session.start_processing() {
                    return;
                }
                if let Some(ref win) = s.window {
                    win.result_buffer.set_text("");
                }
            }
            app::refresh_window(&state_clone);
            app::dispatch_humanize(&state_clone);
        });
    }

    // Wire up "Copy Text"
    {
        let state_clone = state.clone();
        widgets.copy_button.connect_clicked(move |_| {
            let text = {
                let s = state_clone.borrow();
                if !s.session.can_copy() {
                    return;
                }
                s.session.result_text().to_string()
            };
            match clipboard::copy_text(&text) {
                Ok(()) => app::set_status_text(&state_clone, "Copied to clipboard"),
                Err(e) => {
                    log::error!("Clipboard error: {e}");
                    app::set_status_text(&state_clone, &e.user_message());
                }
            }
        });
    }

    // Wire up "Start Over"
    {
        let state_clone = state.clone();
        widgets.reset_button.connect_clicked(move |_| {
            {
                let mut s = state_clone.borrow_mut();
                s.session.reset();
                if let Some(ref win) = s.window {
                    win.result_buffer.set_text("");
                }
            }
            app::refresh_window(&state_clone);
        });
    }

    // Store UI handles in state and show the window
    {
        let mut s = state.borrow_mut();
        s.window = Some(widgets);
    }
    app::refresh_window(&state);
    state.borrow().window.as_ref().unwrap().window.present();

    // Attach backend event handler
    {
        let state_clone = state.clone();
        gtk4::glib::spawn_future_local(async move {
            while let Ok(event) = backend_rx.recv().await {
                app::handle_backend_event(&state_clone, event);
            }
        });
    }
}

/// Mark the upload as started, then read the file on the tokio runtime.
fn begin_file_load(state: &Rc<RefCell<AppState>>, path: PathBuf) {
    if !state.borrow_mut().session.begin_upload() {
        return;
    }
    app::refresh_window(state);
    app::dispatch_file_load(state, path);
}
