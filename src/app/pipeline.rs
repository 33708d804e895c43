use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use super::state::{AppState, BackendEvent};
use crate::gemini::GeminiClient;

/// Read and encode a selected file on the tokio runtime.
pub fn dispatch_file_load(state: &Rc<RefCell<AppState>>, path: PathBuf) {
    let s = state.borrow();
    let sender = s.backend_sender.clone();

    s.tokio_rt.spawn(async move {
        match crate::ingest::load_file(&path).await {
            Ok(record) => {
                let _ = sender.send(BackendEvent::FileLoaded(record)).await;
            }
            Err(e) => {
                log::warn!("File rejected: {e}");
                let _ = sender
                    .send(BackendEvent::FileRejected(e.user_message()))
                    .await;
            }
        }
    });
}

/// Run the streaming rewrite on the tokio runtime. Increments are
/// forwarded as they arrive, each carrying the full cumulative text.
pub fn dispatch_humanize(state: &Rc<RefCell<AppState>>) {
    let mut s = state.borrow_mut();
    let file = match s.session.file() {
        Some(f) => f.clone(),
        None => return,
    };
    let instruction = crate::prompt::build_prompt(&s.session.options);
    let api_key = s.config.api_key();
    let sender = s.backend_sender.clone();
    s.stream_in_flight = true;

    s.tokio_rt.spawn(async move {
        let client = GeminiClient::new(api_key);
        let chunk_sender = sender.clone();
        let result = client
            .humanize(&file, &instruction, |text| {
                let _ = chunk_sender.try_send(BackendEvent::StreamChunk(text.to_string()));
            })
            .await;

        match result {
            Ok(text) => {
                let _ = sender.send(BackendEvent::HumanizeComplete(text)).await;
            }
            Err(e) => {
                log::error!("Humanization failed: {e}");
                let _ = sender
                    .send(BackendEvent::HumanizeFailed(e.user_message()))
                    .await;
            }
        }
    });
}
