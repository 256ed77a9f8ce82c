//! Edit-absensi screen state: load, edit, submit.
//!
//! This module performs no IO. The UI layer spawns the HTTP calls and feeds
//! their results back in; every request is tagged with a generation so a
//! result that is no longer current is ignored.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::AppError;
use crate::models::attendance::{AttendanceRecord, Field, FormState, UpdateAttendance};
use crate::routes::Route;

pub const LOAD_FAILED: &str = "Gagal load data";
pub const UPDATE_SUCCEEDED: &str = "Absensi berhasil diperbarui";
pub const UPDATE_FAILED: &str = "Update gagal";

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Generations are unique across screen instances, so a screen re-created
/// for the same id never accepts a result meant for its predecessor.
fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

/// Screen lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// User-visible result message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// What the app should do once a submission settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub notification: Notification,
    pub navigate: Option<Route>,
}

/// State for editing one attendance record.
#[derive(Debug, Clone)]
pub struct EditAbsen {
    id: String,
    phase: Phase,
    form: FormState,
    load_generation: u64,
    submit_generation: u64,
}

impl EditAbsen {
    /// New screen for `id`, in the loading phase with a default form.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            phase: Phase::Loading,
            form: FormState::default(),
            load_generation: 0,
            submit_generation: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == Phase::Submitting
    }

    /// Start a fetch. Returns the generation to tag the request with.
    pub fn begin_load(&mut self) -> u64 {
        self.load_generation = next_generation();
        self.phase = Phase::Loading;
        self.load_generation
    }

    /// Apply a fetch result.
    ///
    /// On success the form is replaced wholesale. On failure it keeps its
    /// current values and an error notification is returned. Either way the
    /// screen becomes ready. Results for an older generation are dropped.
    pub fn finish_load(
        &mut self,
        generation: u64,
        result: Result<AttendanceRecord, AppError>,
    ) -> Option<Notification> {
        if generation != self.load_generation || self.phase != Phase::Loading {
            tracing::debug!("Dropping stale load result for absensi {} (gen {})", self.id, generation);
            return None;
        }

        self.phase = Phase::Ready;
        match result {
            Ok(record) => {
                self.form = FormState::from_record(&record);
                tracing::info!("Loaded absensi {}", self.id);
                None
            }
            Err(e) => {
                tracing::warn!("Failed to load absensi {}: {}", self.id, e);
                Some(Notification::error("Error", LOAD_FAILED))
            }
        }
    }

    /// Generic change handler: replace one field, keep the rest.
    pub fn change(&mut self, field: Field, value: impl Into<String>) {
        self.form = self.form.with(field, value);
    }

    /// Change handler keyed by field name. Returns false for unknown names.
    pub fn change_named(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.form.with_named(name, value) {
            Some(next) => {
                self.form = next;
                true
            }
            None => {
                tracing::warn!("Ignoring change to unknown field '{}'", name);
                false
            }
        }
    }

    /// Start a submission from the current form.
    ///
    /// Returns `None` unless the screen is ready; a submission already in
    /// flight blocks another one.
    pub fn begin_submit(&mut self) -> Option<(u64, UpdateAttendance)> {
        if self.phase != Phase::Ready {
            return None;
        }
        self.submit_generation = next_generation();
        self.phase = Phase::Submitting;
        Some((self.submit_generation, UpdateAttendance::from_form(&self.form)))
    }

    /// Apply an update result. The form is never modified here.
    pub fn finish_submit(&mut self, generation: u64, result: Result<(), AppError>) -> Option<SubmitOutcome> {
        if generation != self.submit_generation || self.phase != Phase::Submitting {
            tracing::debug!("Dropping stale update result for absensi {} (gen {})", self.id, generation);
            return None;
        }

        self.phase = Phase::Ready;
        Some(match result {
            Ok(()) => {
                tracing::info!("Updated absensi {}", self.id);
                SubmitOutcome {
                    notification: Notification::success("Berhasil", UPDATE_SUCCEEDED),
                    navigate: Some(Route::DataAbsen),
                }
            }
            Err(e) => {
                tracing::error!("Update of absensi {} failed: {}", self.id, e.detail());
                SubmitOutcome {
                    notification: Notification::error("Gagal", UPDATE_FAILED),
                    navigate: None,
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use serde_json::json;

    fn record(value: serde_json::Value) -> AttendanceRecord {
        serde_json::from_value(value).unwrap()
    }

    fn loaded(value: serde_json::Value) -> EditAbsen {
        let mut screen = EditAbsen::new("7");
        let generation = screen.begin_load();
        assert!(screen.finish_load(generation, Ok(record(value))).is_none());
        screen
    }

    fn server_error() -> AppError {
        AppError::Status {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            body: json!({ "message": "invalid" }),
        }
    }

    #[test]
    fn test_starts_loading_with_defaults() {
        let screen = EditAbsen::new("7");
        assert!(screen.is_loading());
        assert_eq!(screen.form(), &FormState::default());
        assert_eq!(screen.id(), "7");
    }

    #[test]
    fn test_load_success_populates_form() {
        let screen = loaded(json!({ "status": "izin", "keterangan": "sakit flu" }));
        assert_eq!(screen.phase(), Phase::Ready);
        assert_eq!(screen.form().status, "izin");
        assert_eq!(screen.form().verifikasi, "pending");
        assert_eq!(screen.form().keterangan, "sakit flu");
        assert!(screen.form().jam_masuk.is_empty());
        assert!(screen.form().lokasi_pulang.is_empty());
    }

    #[test]
    fn test_load_failure_keeps_defaults_and_notifies() {
        let mut screen = EditAbsen::new("7");
        let generation = screen.begin_load();
        let notice = screen.finish_load(generation, Err(AppError::decode("bad"))).unwrap();

        assert_eq!(notice, Notification::error("Error", LOAD_FAILED));
        assert_eq!(screen.phase(), Phase::Ready);
        assert_eq!(screen.form(), &FormState::default());
    }

    #[test]
    fn test_stale_load_is_ignored() {
        let mut screen = EditAbsen::new("7");
        let first = screen.begin_load();
        let second = screen.begin_load();

        assert!(screen.finish_load(first, Ok(record(json!({ "status": "libur" })))).is_none());
        assert!(screen.is_loading());

        screen.finish_load(second, Ok(record(json!({ "status": "cuti" }))));
        assert_eq!(screen.form().status, "cuti");
    }

    #[test]
    fn test_recreated_screen_ignores_predecessor_result() {
        let mut old = EditAbsen::new("7");
        let old_generation = old.begin_load();

        let mut fresh = EditAbsen::new("7");
        let fresh_generation = fresh.begin_load();
        assert_ne!(old_generation, fresh_generation);
        assert!(fresh.finish_load(old_generation, Err(AppError::decode("late"))).is_none());
        assert!(fresh.is_loading());
    }

    #[test]
    fn test_change_named() {
        let mut screen = loaded(json!({}));
        assert!(screen.change_named("lokasi_masuk", "Kantor"));
        assert!(!screen.change_named("nama", "x"));
        assert_eq!(screen.form(), &FormState::default().with(Field::LokasiMasuk, "Kantor"));
    }

    #[test]
    fn test_submit_unchanged_form_sends_loaded_values() {
        let mut screen = loaded(json!({ "status": "izin", "keterangan": "sakit flu" }));
        let (_, payload) = screen.begin_submit().unwrap();
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({ "status": "izin", "verifikasi": "pending", "keterangan": "sakit flu" })
        );
    }

    #[test]
    fn test_submit_blocked_while_loading_or_submitting() {
        let mut screen = EditAbsen::new("7");
        assert!(screen.begin_submit().is_none());

        let generation = screen.begin_load();
        screen.finish_load(generation, Ok(record(json!({}))));
        assert!(screen.begin_submit().is_some());
        assert!(screen.is_submitting());
        assert!(screen.begin_submit().is_none());
    }

    #[test]
    fn test_submit_success_navigates_once() {
        let mut screen = loaded(json!({ "jam_masuk": "08:15:00" }));
        let (generation, payload) = screen.begin_submit().unwrap();
        assert_eq!(payload.jam_masuk.as_deref(), Some("08:15"));

        let outcome = screen.finish_submit(generation, Ok(())).unwrap();
        assert_eq!(outcome.notification, Notification::success("Berhasil", UPDATE_SUCCEEDED));
        assert_eq!(outcome.navigate, Some(Route::DataAbsen));

        // A duplicate delivery produces nothing.
        assert!(screen.finish_submit(generation, Ok(())).is_none());
    }

    #[test]
    fn test_submit_failure_keeps_form_and_stays() {
        let mut screen = loaded(json!({ "status": "sakit" }));
        screen.change(Field::Keterangan, "demam");
        let before = screen.form().clone();

        let (generation, _) = screen.begin_submit().unwrap();
        let outcome = screen.finish_submit(generation, Err(server_error())).unwrap();

        assert_eq!(outcome.notification, Notification::error("Gagal", UPDATE_FAILED));
        assert_eq!(outcome.navigate, None);
        assert_eq!(screen.form(), &before);
        assert_eq!(screen.phase(), Phase::Ready);

        // Resubmitting after a failure is allowed.
        assert!(screen.begin_submit().is_some());
    }
}
