//! Generation lifecycle: the single-flight submit state machine.
//!
//! ```text
//!          begin (non-empty, valid)
//!   Idle ─────────────────────────► InFlight ──complete──► Succeeded
//!                                     ▲   │                    │
//!                                     │   └────complete──► Failed
//!                                     └────── begin ───────────┘
//! ```
//!
//! Refused submissions never change state. There is no cancel and no
//! timeout at this layer.

use std::fmt;
use std::path::{Path, PathBuf};

use shorts_composition::{Composition, GlobalSettings};

use crate::payload::{build_request, SubmissionPayload};
use crate::service::{RenderReply, RenderService, TransportError};

/// File name used for every downloaded video.
pub const DEFAULT_DOWNLOAD_NAME: &str = "generated_video.mp4";

/// Shortest duration, in seconds, accepted at submit time.
pub const MIN_DURATION_SECS: i64 = 1;

/// State of the generation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStatus {
    /// Nothing submitted yet.
    Idle,
    /// A request is outstanding.
    InFlight,
    /// The last request produced a video locator.
    Succeeded,
    /// The last request failed.
    Failed,
}

/// Observable state of the current or most recent submission.
#[derive(Debug, Clone)]
pub struct GenerationSession {
    status: GenerationStatus,
    result_artifact_url: Option<String>,
    error_message: Option<String>,
    attempts: u32,
    submitted_at: Option<String>,
    finished_at: Option<String>,
}

impl Default for GenerationSession {
    fn default() -> Self {
        Self {
            status: GenerationStatus::Idle,
            result_artifact_url: None,
            error_message: None,
            attempts: 0,
            submitted_at: None,
            finished_at: None,
        }
    }
}

impl GenerationSession {
    pub fn status(&self) -> GenerationStatus {
        self.status
    }

    pub fn result_artifact_url(&self) -> Option<&str> {
        self.result_artifact_url.as_deref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Number of submissions that entered `InFlight`.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// When the current attempt was sent (RFC 3339).
    pub fn submitted_at(&self) -> Option<&str> {
        self.submitted_at.as_deref()
    }

    /// When the current attempt resolved (RFC 3339).
    pub fn finished_at(&self) -> Option<&str> {
        self.finished_at.as_deref()
    }

    pub fn is_in_flight(&self) -> bool {
        self.status == GenerationStatus::InFlight
    }
}

/// Why a submit action was refused without sending anything.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitRefused {
    #[error("Add at least one image before generating a video")]
    NoMedia,

    #[error("A video is already being generated")]
    AlreadyInFlight,

    #[error("Image {position} has a duration of {value}s; durations must be at least 1s")]
    InvalidDuration { position: usize, value: i64 },

    #[error("The {which} font size must be greater than zero")]
    InvalidFontSize { which: &'static str },
}

/// User-facing message produced by a lifecycle action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The video is ready at `url`.
    Generated { url: String },
    /// The service reported success without a video locator.
    MissingVideoUrl,
    /// The service reported an error.
    ServiceError { message: String },
    /// The request could not be sent or the reply could not be read.
    TransportFailure,
    /// Retrieval was attempted before a video exists.
    NotReady,
}

impl Notice {
    pub fn is_error(&self) -> bool {
        !matches!(self, Notice::Generated { .. })
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Generated { .. } => f.write_str("Video generation successful!"),
            Notice::MissingVideoUrl => f.write_str("Failed to generate video URL"),
            Notice::ServiceError { message } => write!(f, "Error: {message}"),
            Notice::TransportFailure => f.write_str("Error generating video"),
            Notice::NotReady => f.write_str("The video has not been generated yet."),
        }
    }
}

/// Client-side download of the generated video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadAction {
    pub url: String,
    pub file_name: &'static str,
}

impl DownloadAction {
    /// Where the download lands inside `dir`.
    pub fn target_in(&self, dir: &Path) -> PathBuf {
        dir.join(self.file_name)
    }
}

/// Proof that a submission entered `InFlight`; redeemed by `complete`.
#[derive(Debug)]
#[must_use = "an in-flight submission must be completed"]
pub struct SubmissionTicket {
    attempt: u32,
}

impl SubmissionTicket {
    pub fn attempt(&self) -> u32 {
        self.attempt
    }
}

/// A started submission: its ticket plus the payload to send.
#[derive(Debug)]
pub struct PendingSubmission {
    pub ticket: SubmissionTicket,
    pub payload: SubmissionPayload,
}

/// How a completed attempt resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Outcome {
    Succeeded(String),
    Failed { message: String, notice: Notice },
}

impl Outcome {
    fn classify(result: Result<RenderReply, TransportError>) -> Self {
        match result {
            Ok(reply) if reply.is_success() => match reply.body.video_url {
                Some(url) if !url.trim().is_empty() => Outcome::Succeeded(url),
                _ => Outcome::Failed {
                    message: Notice::MissingVideoUrl.to_string(),
                    notice: Notice::MissingVideoUrl,
                },
            },
            Ok(reply) => {
                let message = reply
                    .body
                    .error
                    .unwrap_or_else(|| format!("Render service answered HTTP {}", reply.status));
                Outcome::Failed {
                    notice: Notice::ServiceError {
                        message: message.clone(),
                    },
                    message,
                }
            }
            Err(e) => Outcome::Failed {
                message: e.to_string(),
                notice: Notice::TransportFailure,
            },
        }
    }
}

/// Drives submissions through a [`RenderService`] and owns the session.
pub struct GenerationController<S> {
    service: S,
    session: GenerationSession,
}

impl<S: RenderService> GenerationController<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            session: GenerationSession::default(),
        }
    }

    pub fn session(&self) -> &GenerationSession {
        &self.session
    }

    pub fn status(&self) -> GenerationStatus {
        self.session.status
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Whether the submit affordance should be enabled.
    pub fn can_submit(&self, composition: &Composition) -> bool {
        !self.session.is_in_flight() && !composition.is_empty()
    }

    /// Check preconditions, assemble the payload and enter `InFlight`.
    ///
    /// On refusal the session is left untouched.
    pub fn begin(
        &mut self,
        composition: &Composition,
        settings: &GlobalSettings,
    ) -> Result<PendingSubmission, SubmitRefused> {
        if let Err(refused) = self.check_preconditions(composition, settings) {
            tracing::warn!(reason = %refused, "Submit refused");
            return Err(refused);
        }

        let payload = build_request(composition, settings);

        self.session.attempts += 1;
        self.session.status = GenerationStatus::InFlight;
        self.session.result_artifact_url = None;
        self.session.error_message = None;
        self.session.submitted_at = Some(chrono::Utc::now().to_rfc3339());
        self.session.finished_at = None;

        tracing::info!(
            attempt = self.session.attempts,
            items = composition.len(),
            service = self.service.name(),
            "Submitting render request"
        );

        Ok(PendingSubmission {
            ticket: SubmissionTicket {
                attempt: self.session.attempts,
            },
            payload,
        })
    }

    /// Resolve the in-flight attempt with the transport's result.
    pub fn complete(
        &mut self,
        ticket: SubmissionTicket,
        result: Result<RenderReply, TransportError>,
    ) -> Notice {
        debug_assert!(self.session.is_in_flight());
        debug_assert_eq!(ticket.attempt, self.session.attempts);

        self.session.finished_at = Some(chrono::Utc::now().to_rfc3339());

        match Outcome::classify(result) {
            Outcome::Succeeded(url) => {
                tracing::info!(attempt = ticket.attempt, url = %url, "Video generated");
                self.session.status = GenerationStatus::Succeeded;
                self.session.result_artifact_url = Some(url.clone());
                Notice::Generated { url }
            }
            Outcome::Failed { message, notice } => {
                tracing::warn!(attempt = ticket.attempt, error = %message, "Video generation failed");
                self.session.status = GenerationStatus::Failed;
                self.session.error_message = Some(message);
                notice
            }
        }
    }

    /// Submit and wait for the service to answer.
    ///
    /// `&mut self` is held across the await, so a second submit cannot start
    /// until this one resolves.
    pub async fn submit(
        &mut self,
        composition: &Composition,
        settings: &GlobalSettings,
    ) -> Result<Notice, SubmitRefused> {
        let PendingSubmission { ticket, payload } = self.begin(composition, settings)?;
        let result = self.service.submit(payload).await;
        Ok(self.complete(ticket, result))
    }

    /// Download action for the generated video.
    ///
    /// Outside `Succeeded` this yields [`Notice::NotReady`] instead.
    pub fn retrieve_artifact(&self) -> Result<DownloadAction, Notice> {
        match (self.session.status, self.session.result_artifact_url.as_deref()) {
            (GenerationStatus::Succeeded, Some(url)) => Ok(DownloadAction {
                url: url.to_string(),
                file_name: DEFAULT_DOWNLOAD_NAME,
            }),
            (status, _) => {
                tracing::info!(?status, "No video to retrieve");
                Err(Notice::NotReady)
            }
        }
    }

    fn check_preconditions(
        &self,
        composition: &Composition,
        settings: &GlobalSettings,
    ) -> Result<(), SubmitRefused> {
        if self.session.is_in_flight() {
            return Err(SubmitRefused::AlreadyInFlight);
        }
        if composition.is_empty() {
            return Err(SubmitRefused::NoMedia);
        }
        if let Some((position, record)) = composition
            .attributes()
            .records()
            .enumerate()
            .find(|(_, r)| r.duration_secs < MIN_DURATION_SECS)
        {
            return Err(SubmitRefused::InvalidDuration {
                position,
                value: record.duration_secs,
            });
        }
        if settings.title_font_size == 0 {
            return Err(SubmitRefused::InvalidFontSize { which: "title" });
        }
        if settings.script_font_size == 0 {
            return Err(SubmitRefused::InvalidFontSize { which: "script" });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::RenderResponse;
    use shorts_composition::{AttributeEdit, MediaBlob};

    /// Service that must never be called.
    struct Unreachable;

    #[async_trait::async_trait]
    impl RenderService for Unreachable {
        async fn submit(&self, _payload: SubmissionPayload) -> Result<RenderReply, TransportError> {
            panic!("no request expected");
        }

        fn name(&self) -> &str {
            "unreachable"
        }
    }

    fn composition_with(n: usize) -> Composition {
        let mut composition = Composition::new();
        composition.append((0..n).map(|i| MediaBlob::new(format!("{i}.png"), "image/png", vec![0])));
        composition
    }

    #[test]
    fn test_starts_idle_and_cannot_retrieve() {
        let controller = GenerationController::new(Unreachable);
        assert_eq!(controller.status(), GenerationStatus::Idle);
        assert_eq!(controller.retrieve_artifact(), Err(Notice::NotReady));
        assert_eq!(controller.session().attempts(), 0);
    }

    #[test]
    fn test_empty_composition_is_refused_without_transition() {
        let mut controller = GenerationController::new(Unreachable);
        let refused = controller
            .begin(&Composition::new(), &GlobalSettings::default())
            .unwrap_err();
        assert_eq!(refused, SubmitRefused::NoMedia);
        assert_eq!(controller.status(), GenerationStatus::Idle);
        assert!(!controller.can_submit(&Composition::new()));
    }

    #[test]
    fn test_begin_enters_in_flight_and_blocks_second_begin() {
        let mut controller = GenerationController::new(Unreachable);
        let composition = composition_with(1);
        let settings = GlobalSettings::default();

        let pending = controller.begin(&composition, &settings).unwrap();
        assert_eq!(controller.status(), GenerationStatus::InFlight);
        assert!(controller.session().submitted_at().is_some());
        assert!(!controller.can_submit(&composition));
        assert_eq!(
            controller.begin(&composition, &settings).unwrap_err(),
            SubmitRefused::AlreadyInFlight
        );

        let notice = controller.complete(pending.ticket, Ok(RenderReply::video("http://x/y.mp4")));
        assert_eq!(
            notice,
            Notice::Generated {
                url: "http://x/y.mp4".to_string()
            }
        );
        assert!(controller.can_submit(&composition));
    }

    #[test]
    fn test_success_stores_locator() {
        let mut controller = GenerationController::new(Unreachable);
        let pending = controller
            .begin(&composition_with(2), &GlobalSettings::default())
            .unwrap();
        controller.complete(pending.ticket, Ok(RenderReply::video("http://x/y.mp4")));

        assert_eq!(controller.status(), GenerationStatus::Succeeded);
        assert_eq!(controller.session().result_artifact_url(), Some("http://x/y.mp4"));
        assert!(controller.session().finished_at().is_some());
        let action = controller.retrieve_artifact().unwrap();
        assert_eq!(action.url, "http://x/y.mp4");
        assert_eq!(action.file_name, "generated_video.mp4");
    }

    #[test]
    fn test_success_without_locator_fails() {
        for body in [RenderResponse::default(), RenderResponse { video_url: Some("  ".to_string()), error: None }] {
            let mut controller = GenerationController::new(Unreachable);
            let pending = controller
                .begin(&composition_with(1), &GlobalSettings::default())
                .unwrap();
            let notice = controller.complete(pending.ticket, Ok(RenderReply::new(200, body)));

            assert_eq!(notice, Notice::MissingVideoUrl);
            assert_eq!(controller.status(), GenerationStatus::Failed);
            assert_eq!(
                controller.session().error_message(),
                Some("Failed to generate video URL")
            );
            assert!(controller.session().result_artifact_url().is_none());
            assert_eq!(controller.retrieve_artifact(), Err(Notice::NotReady));
        }
    }

    #[test]
    fn test_service_error_uses_provided_message() {
        let mut controller = GenerationController::new(Unreachable);
        let pending = controller
            .begin(&composition_with(1), &GlobalSettings::default())
            .unwrap();
        let notice = controller.complete(pending.ticket, Ok(RenderReply::error(500, "ffmpeg exploded")));

        assert_eq!(notice.to_string(), "Error: ffmpeg exploded");
        assert_eq!(controller.session().error_message(), Some("ffmpeg exploded"));
    }

    #[test]
    fn test_service_error_without_message_is_derived() {
        let mut controller = GenerationController::new(Unreachable);
        let pending = controller
            .begin(&composition_with(1), &GlobalSettings::default())
            .unwrap();
        controller.complete(
            pending.ticket,
            Ok(RenderReply::new(502, RenderResponse::default())),
        );
        assert_eq!(
            controller.session().error_message(),
            Some("Render service answered HTTP 502")
        );
    }

    #[test]
    fn test_transport_failure_is_generic_notice() {
        let mut controller = GenerationController::new(Unreachable);
        let pending = controller
            .begin(&composition_with(1), &GlobalSettings::default())
            .unwrap();
        let notice = controller.complete(
            pending.ticket,
            Err(TransportError::Connection {
                message: "connection refused".to_string(),
            }),
        );

        assert_eq!(notice, Notice::TransportFailure);
        assert_eq!(notice.to_string(), "Error generating video");
        assert!(controller
            .session()
            .error_message()
            .unwrap()
            .contains("connection refused"));
    }

    #[test]
    fn test_resubmit_clears_previous_result() {
        let mut controller = GenerationController::new(Unreachable);
        let composition = composition_with(1);
        let settings = GlobalSettings::default();

        let first = controller.begin(&composition, &settings).unwrap();
        controller.complete(first.ticket, Ok(RenderReply::video("http://x/1.mp4")));

        let second = controller.begin(&composition, &settings).unwrap();
        assert_eq!(second.ticket.attempt(), 2);
        assert_eq!(controller.status(), GenerationStatus::InFlight);
        assert!(controller.session().result_artifact_url().is_none());
        assert_eq!(controller.retrieve_artifact(), Err(Notice::NotReady));
        controller.complete(second.ticket, Ok(RenderReply::error(400, "nope")));
    }

    #[test]
    fn test_non_positive_duration_is_refused() {
        let mut controller = GenerationController::new(Unreachable);
        let mut composition = composition_with(3);
        composition.set_attribute(2, AttributeEdit::Duration(0));

        let refused = controller
            .begin(&composition, &GlobalSettings::default())
            .unwrap_err();
        assert_eq!(refused, SubmitRefused::InvalidDuration { position: 2, value: 0 });
        assert_eq!(controller.status(), GenerationStatus::Idle);
    }

    #[test]
    fn test_zero_font_size_is_refused() {
        let mut controller = GenerationController::new(Unreachable);
        let settings = GlobalSettings {
            script_font_size: 0,
            ..GlobalSettings::default()
        };
        let refused = controller.begin(&composition_with(1), &settings).unwrap_err();
        assert_eq!(refused, SubmitRefused::InvalidFontSize { which: "script" });
    }

    #[test]
    fn test_notice_error_flag() {
        assert!(!Notice::Generated { url: "u".to_string() }.is_error());
        assert!(Notice::NotReady.is_error());
        assert!(Notice::MissingVideoUrl.is_error());
    }
}
