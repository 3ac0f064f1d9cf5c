//! State owner for one mounted tenant creation form.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::fields::{FieldKey, FormData, FormErrors};
use crate::layout::{self, ViewportClass};
use crate::locale::Dictionary;
use crate::upload::{FileIngestionManager, UploadPolicy};
use crate::validator;

/// How long the success notice stays up after a submit.
pub const SUCCESS_NOTICE_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted,
    Rejected { error_count: usize },
}

/// Single pending auto-dismiss deadline; scheduling again replaces it.
#[derive(Debug, Clone, Copy, Default)]
struct SuccessNotice {
    deadline: Option<Instant>,
}

impl SuccessNotice {
    fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + SUCCESS_NOTICE_DURATION);
    }

    fn is_visible(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns true when the notice expired on this tick.
    fn expire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    fn cancel(&mut self) {
        self.deadline = None;
    }
}

pub struct FormController {
    data: FormData,
    errors: FormErrors,
    uploads: FileIngestionManager,
    has_uploaded_files: Rc<Cell<bool>>,
    viewport: ViewportClass,
    notice: SuccessNotice,
    text: Dictionary,
}

impl FormController {
    pub fn new(policy: UploadPolicy, text: Dictionary) -> Self {
        let has_uploaded_files = Rc::new(Cell::new(false));
        let sink = Rc::clone(&has_uploaded_files);
        let uploads = FileIngestionManager::new(policy)
            .on_upload_state_changed(move |has_files| sink.set(has_files));

        Self {
            data: FormData::new(),
            errors: FormErrors::new(),
            uploads,
            has_uploaded_files,
            viewport: ViewportClass::default(),
            notice: SuccessNotice::default(),
            text,
        }
    }

    pub fn data(&self) -> &FormData {
        &self.data
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn text(&self) -> &Dictionary {
        &self.text
    }

    pub fn uploads(&self) -> &FileIngestionManager {
        &self.uploads
    }

    pub fn uploads_mut(&mut self) -> &mut FileIngestionManager {
        &mut self.uploads
    }

    /// Last value reported by the upload widget.
    pub fn has_uploaded_files(&self) -> bool {
        self.has_uploaded_files.get()
    }

    pub fn viewport(&self) -> ViewportClass {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: ViewportClass) {
        if viewport != self.viewport {
            debug!(from = self.viewport.label(), to = viewport.label(), "viewport class changed");
            self.viewport = viewport;
        }
    }

    pub fn prompt_above_grid(&self) -> bool {
        layout::place_prompt_above_grid(self.has_uploaded_files(), self.viewport)
    }

    pub fn is_success(&self) -> bool {
        self.notice.is_visible()
    }

    /// Store an edit and drop that field's error without revalidating.
    pub fn on_field_change(&mut self, key: FieldKey, value: impl Into<String>) {
        self.data.set(key, value);
        self.errors.clear_field(key);
    }

    /// Blank every field and clear errors. Attachments are left alone.
    pub fn reset(&mut self) {
        self.data.clear();
        self.errors.clear();
    }

    pub fn submit(&mut self, now: Instant) -> SubmitOutcome {
        let errors = validator::validate_with(&self.data, &self.text);

        if !errors.is_empty() {
            let error_count = errors.len();
            debug!(error_count, "tenant form rejected");
            self.errors = errors;
            return SubmitOutcome::Rejected { error_count };
        }

        info!(
            name = %self.data.get(FieldKey::Name),
            business = %self.data.get(FieldKey::BusinessName),
            whatsapp_number = %self.data.get(FieldKey::WhatsappNumber),
            attachments = self.uploads.files().len(),
            "tenant form submitted"
        );

        self.notice.schedule(now);
        self.reset();
        SubmitOutcome::Accepted
    }

    /// Advance the notice timer. Returns true if the notice just closed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.notice.expire(now)
    }

    pub fn dismiss_notice(&mut self) {
        self.notice.cancel();
    }
}

impl Default for FormController {
    fn default() -> Self {
        Self::new(UploadPolicy::default(), Dictionary::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::UploadedFile;

    fn fill_valid(controller: &mut FormController) {
        for key in FieldKey::all() {
            controller.on_field_change(key, "filled");
        }
        controller.on_field_change(FieldKey::WhatsappNumber, "+14155551234");
    }

    #[test]
    fn test_field_change_clears_only_that_error() {
        let mut controller = FormController::default();
        let start = Instant::now();
        assert!(matches!(controller.submit(start), SubmitOutcome::Rejected { .. }));
        assert!(controller.errors().contains(FieldKey::Email));

        // An invalid value still clears the message; no revalidation happens.
        controller.on_field_change(FieldKey::WhatsappNumber, "123");
        assert!(!controller.errors().contains(FieldKey::WhatsappNumber));
        assert!(controller.errors().contains(FieldKey::Email));
        assert_eq!(controller.data().get(FieldKey::WhatsappNumber), "123");
    }

    #[test]
    fn test_failed_submit_keeps_data() {
        let mut controller = FormController::default();
        controller.on_field_change(FieldKey::Email, "ops@example.com");

        let outcome = controller.submit(Instant::now());
        assert_eq!(
            outcome,
            SubmitOutcome::Rejected {
                error_count: FieldKey::all().len() - 1
            }
        );
        assert_eq!(controller.data().get(FieldKey::Email), "ops@example.com");
        assert!(!controller.is_success());
    }

    #[test]
    fn test_successful_submit_resets_and_expires_notice() {
        let mut controller = FormController::default();
        fill_valid(&mut controller);
        let start = Instant::now();

        assert_eq!(controller.submit(start), SubmitOutcome::Accepted);
        assert!(controller.is_success());
        assert!(controller.errors().is_empty());
        assert!(FieldKey::all()
            .into_iter()
            .all(|key| controller.data().get(key).is_empty()));

        assert!(!controller.tick(start + Duration::from_millis(2999)));
        assert!(controller.is_success());

        assert!(controller.tick(start + SUCCESS_NOTICE_DURATION));
        assert!(!controller.is_success());
    }

    #[test]
    fn test_second_submit_supersedes_timer() {
        let mut controller = FormController::default();
        let start = Instant::now();
        fill_valid(&mut controller);
        controller.submit(start);

        fill_valid(&mut controller);
        controller.submit(start + Duration::from_secs(2));

        assert!(!controller.tick(start + Duration::from_secs(3)));
        assert!(controller.is_success());
        assert!(controller.tick(start + Duration::from_secs(5)));
        assert!(!controller.is_success());
    }

    #[test]
    fn test_dismiss_notice() {
        let mut controller = FormController::default();
        fill_valid(&mut controller);
        let start = Instant::now();
        controller.submit(start);
        controller.dismiss_notice();
        assert!(!controller.is_success());
        assert!(!controller.tick(start + SUCCESS_NOTICE_DURATION));
    }

    #[test]
    fn test_reset_leaves_attachments() {
        let mut controller = FormController::default();
        controller
            .uploads_mut()
            .add_files(vec![UploadedFile::new("menu.pdf", 2048)]);
        controller.on_field_change(FieldKey::Prompt, "Be helpful");

        controller.reset();
        assert_eq!(controller.data().get(FieldKey::Prompt), "");
        assert_eq!(controller.uploads().files().len(), 1);
        assert!(controller.has_uploaded_files());

        fill_valid(&mut controller);
        controller.submit(Instant::now());
        assert_eq!(controller.uploads().files().len(), 1);
    }

    #[test]
    fn test_prompt_moves_below_grid_once_files_arrive() {
        let mut controller = FormController::default();
        controller.set_viewport(ViewportClass::Large);
        assert!(controller.prompt_above_grid());

        let handles = controller
            .uploads_mut()
            .add_files(vec![UploadedFile::new("faq.txt", 10)]);
        assert!(!controller.prompt_above_grid());

        controller.uploads_mut().remove_file(handles[0]);
        assert!(controller.prompt_above_grid());

        controller.set_viewport(ViewportClass::Medium);
        assert!(!controller.prompt_above_grid());
    }
}
