use crate::ingest::FileRecord;
use crate::options::HumanizeOptions;

/// Lifecycle of one humanization attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessingStatus {
    #[default]
    Idle,
    Uploading,
    Processing,
    Complete,
    Error,
}

/// Session state driving the window. All mutation goes through the
/// transition methods; widgets are synced from the result afterwards.
///
/// Transitions: Idle → Uploading → Idle (file accepted or rejected),
/// Idle → Processing → Complete or Error, and reset back to Idle from
/// anywhere. Selecting a new file replaces the record and discards the
/// previous result.
#[derive(Debug, Default)]
pub struct Session {
    status: ProcessingStatus,
    file: Option<FileRecord>,
    result_text: String,
    pub options: HumanizeOptions,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> ProcessingStatus {
        self.status
    }

    pub fn file(&self) -> Option<&FileRecord> {
        self.file.as_ref()
    }

    pub fn result_text(&self) -> &str {
        &self.result_text
    }

    /// Mark a background file read as started. Refused while a rewrite
    /// or another read is running.
    pub fn begin_upload(&mut self) -> bool {
        if !self.can_select_file() {
            return false;
        }
        self.status = ProcessingStatus::Uploading;
        true
    }

    /// Accept a loaded file. Replaces any previous record and discards
    /// the previous result.
    pub fn accept_file(&mut self, file: FileRecord) {
        self.file = Some(file);
        self.result_text.clear();
        self.status = ProcessingStatus::Idle;
    }

    /// A file failed validation or could not be read. The previous
    /// record and result are left untouched.
    pub fn reject_file(&mut self) {
        self.status = ProcessingStatus::Idle;
    }

    /// Start a rewrite. Requires a file and no operation in flight.
    pub fn start_processing(&mut self) -> bool {
        if !self.can_start() {
            return false;
        }
        self.result_text.clear();
        self.status = ProcessingStatus::Processing;
        true
    }

    /// Apply one streamed increment: the full cumulative text so far,
    /// replacing the previous value wholesale. Ignored outside
    /// Processing (e.g. an increment racing a reset).
    pub fn apply_increment(&mut self, text: &str) -> bool {
        if self.status != ProcessingStatus::Processing {
            return false;
        }
        self.result_text.clear();
        self.result_text.push_str(text);
        true
    }

    /// The stream finished; `final_text` is authoritative.
    pub fn finish(&mut self, final_text: String) {
        self.result_text = final_text;
        self.status = ProcessingStatus::Complete;
    }

    /// The operation failed. Partial text already rendered stays visible.
    pub fn fail(&mut self) {
        self.status = ProcessingStatus::Error;
    }

    /// Back to a blank session. Options are kept for the rest of the
    /// session; file and result are dropped.
    pub fn reset(&mut self) {
        self.file = None;
        self.result_text.clear();
        self.status = ProcessingStatus::Idle;
    }

    pub fn can_select_file(&self) -> bool {
        !matches!(
            self.status,
            ProcessingStatus::Processing | ProcessingStatus::Uploading
        )
    }

    pub fn can_start(&self) -> bool {
        self.file.is_some()
            && matches!(
                self.status,
                ProcessingStatus::Idle | ProcessingStatus::Complete | ProcessingStatus::Error
            )
    }

    pub fn can_edit_options(&self) -> bool {
        self.status != ProcessingStatus::Processing
    }

    pub fn can_copy(&self) -> bool {
        !self.result_text.is_empty() && self.status != ProcessingStatus::Processing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> FileRecord {
        FileRecord::from_bytes(name, "text/plain", b"doc".to_vec()).unwrap()
    }

    #[test]
    fn rewrite_requires_a_file() {
        let mut session = Session::new();
        assert!(!session.can_start());
        assert!(!session.start_processing());
        assert_eq!(session.status(), ProcessingStatus::Idle);
    }

    #[test]
    fn selecting_a_new_file_clears_the_result_and_returns_to_idle() {
        let mut session = Session::new();
        session.accept_file(record("first.txt"));
        session.start_processing();
        session.apply_increment("old result");
        session.finish("old result".into());
        assert_eq!(session.status(), ProcessingStatus::Complete);

        assert!(session.begin_upload());
        session.accept_file(record("second.txt"));
        assert_eq!(session.status(), ProcessingStatus::Idle);
        assert_eq!(session.file().unwrap().name, "second.txt");
        assert_eq!(session.result_text(), "");
    }

    #[test]
    fn rejected_file_leaves_the_previous_record_in_place() {
        let mut session = Session::new();
        session.accept_file(record("kept.txt"));

        assert!(session.begin_upload());
        session.reject_file();
        assert_eq!(session.file().unwrap().name, "kept.txt");
        assert_eq!(session.status(), ProcessingStatus::Idle);
    }

    #[test]
    fn increments_replace_the_result_wholesale_while_processing() {
        let mut session = Session::new();
        session.accept_file(record("doc.txt"));
        assert!(session.start_processing());

        assert!(session.apply_increment("Hello"));
        assert!(session.apply_increment("Hello, world"));
        assert_eq!(session.result_text(), "Hello, world");

        session.finish("Hello, world!".into());
        assert_eq!(session.status(), ProcessingStatus::Complete);
        assert_eq!(session.result_text(), "Hello, world!");

        // Late increment after completion is dropped.
        assert!(!session.apply_increment("stale"));
        assert_eq!(session.result_text(), "Hello, world!");
    }

    #[test]
    fn only_one_rewrite_can_be_in_flight() {
        let mut session = Session::new();
        session.accept_file(record("doc.txt"));
        assert!(session.start_processing());
        assert!(!session.start_processing());
        assert!(!session.can_select_file());
        assert!(!session.can_edit_options());
    }

    #[test]
    fn failure_keeps_partial_text_and_reset_clears_everything() {
        let mut session = Session::new();
        session.accept_file(record("doc.txt"));
        session.start_processing();
        session.apply_increment("partial text");
        session.fail();

        assert_eq!(session.status(), ProcessingStatus::Error);
        assert_eq!(session.result_text(), "partial text");
        assert!(session.can_start());

        session.reset();
        assert_eq!(session.status(), ProcessingStatus::Idle);
        assert!(session.file().is_none());
        assert_eq!(session.result_text(), "");
    }

    #[test]
    fn copy_is_unavailable_while_processing_or_without_text() {
        let mut session = Session::new();
        assert!(!session.can_copy());

        session.accept_file(record("doc.txt"));
        session.start_processing();
        session.apply_increment("streaming");
        assert!(!session.can_copy());

        session.finish("streaming done".into());
        assert!(session.can_copy());
    }

    #[test]
    fn options_survive_a_reset() {
        let mut session = Session::new();
        session.options.set_target_audience("Engineers");
        session.reset();
        assert_eq!(session.options.target_audience(), "Engineers");
    }
}
