use std::path::PathBuf;
use std::time::SystemTime;

use engine_logging::{engine_debug, engine_info, engine_warn};

use crate::shortcuts::handle_trigger;
use crate::{
    interpret, AppState, ArchiveCandidate, ArtifactKind, Effect, Interpretation, JobError,
    JobHandle, JobId, JobPhase, Msg, Notice, NoticeKind, ProgressEvent, RawStatus, SessionId,
    Severity, TransportError, UploadReceipt,
};

/// Pure update function: applies a message to state and returns any effects.
///
/// Every resolution of an asynchronous call carries the job (and poll session)
/// it was issued for and is dropped if that identity is no longer current.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FileSubmitted(candidate) => submit_file(&mut state, candidate),
        Msg::UploadFinished {
            job_id,
            completed_at,
            result,
        } => upload_finished(&mut state, job_id, completed_at, result),
        Msg::ProcessingStarted { job_id, result } => processing_started(&mut state, job_id, result),
        Msg::PollTick { session_id } => poll_tick(&mut state, session_id),
        Msg::StatusReceived {
            session_id,
            job_id,
            result,
        } => status_received(&mut state, session_id, job_id, result),
        Msg::CancelConfirmed => cancel(&mut state),
        Msg::ResetRequested => reset(&mut state),
        Msg::Trigger(trigger) => handle_trigger(&mut state, trigger),
        Msg::DownloadFinished { artifact, result } => {
            download_finished(&mut state, artifact, result);
            Vec::new()
        }
        Msg::NoticeDismissed => {
            state.dismiss_notice();
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn submit_file(state: &mut AppState, candidate: ArchiveCandidate) -> Vec<Effect> {
    match state.phase() {
        JobPhase::Uploading | JobPhase::Processing => {
            engine_warn!(
                "Rejected submission of {} while {:?}",
                candidate.file_name,
                state.phase()
            );
            state.set_notice(Notice::warning(
                NoticeKind::ConcurrencyRejection,
                "A file is already being processed. Please wait.",
            ));
            return Vec::new();
        }
        JobPhase::Complete | JobPhase::Error => {
            state.set_notice(Notice::info(
                NoticeKind::ResetRequired,
                "Reset before submitting another archive.",
            ));
            return Vec::new();
        }
        JobPhase::Idle => {}
    }

    if !state
        .config()
        .accepts(&candidate.file_name, candidate.content_type.as_deref())
    {
        engine_debug!("Rejected {} as not a ZIP archive", candidate.file_name);
        state.set_notice(Notice::danger(
            NoticeKind::Validation,
            "Please upload a valid ZIP file.",
        ));
        return Vec::new();
    }

    let job_id = state.begin_upload(candidate.file_name);
    engine_info!(job = job_id; "uploading {:?}", candidate.path);
    vec![Effect::Upload {
        job_id,
        path: candidate.path,
    }]
}

fn upload_finished(
    state: &mut AppState,
    job_id: JobId,
    completed_at: SystemTime,
    result: Result<UploadReceipt, TransportError>,
) -> Vec<Effect> {
    if !state.is_current_job(job_id) || state.phase() != JobPhase::Uploading {
        engine_debug!(job = job_id; "dropping stale upload result");
        return Vec::new();
    }

    match result {
        Ok(receipt) => {
            engine_info!(
                job = job_id;
                "uploaded as {} ({} files)",
                receipt.remote_job_id,
                receipt.file_count
            );
            let remote_job_id = receipt.remote_job_id.clone();
            state.attach_handle(JobHandle {
                job_id,
                remote_job_id: receipt.remote_job_id,
                file_count: receipt.file_count,
                submitted_at: completed_at,
            });
            vec![Effect::StartProcessing {
                job_id,
                remote_job_id,
            }]
        }
        Err(err) => {
            engine_warn!(job = job_id; "upload failed: {}", err.message);
            fail_with_transport(state, "Upload failed", err)
        }
    }
}

fn processing_started(
    state: &mut AppState,
    job_id: JobId,
    result: Result<(), TransportError>,
) -> Vec<Effect> {
    let holds_job = state.job_handle().is_some_and(|handle| handle.job_id == job_id);
    if !holds_job || state.phase() != JobPhase::Processing || state.poll_session().is_some() {
        engine_debug!(job = job_id; "dropping stale start result");
        return Vec::new();
    }

    match result {
        Ok(()) => {
            let (previous, session_id) = state.open_poll_session(job_id);
            engine_info!(job = job_id; "processing; poll session {}", session_id);
            let mut effects = Vec::with_capacity(2);
            if let Some(previous) = previous {
                effects.push(Effect::StopPolling {
                    session_id: previous,
                });
            }
            effects.push(Effect::StartPolling {
                session_id,
                interval: state.config().poll_interval,
            });
            effects
        }
        Err(err) => {
            engine_warn!(job = job_id; "could not start processing: {}", err.message);
            fail_with_transport(state, "Failed to start processing", err)
        }
    }
}

fn poll_tick(state: &mut AppState, session_id: SessionId) -> Vec<Effect> {
    if state.phase() != JobPhase::Processing {
        engine_debug!("Ignoring poll tick for session {} outside processing", session_id);
        return Vec::new();
    }
    let Some(session) = state.poll_session_mut() else {
        return Vec::new();
    };
    if session.session_id != session_id {
        engine_debug!("Ignoring tick from superseded session {}", session_id);
        return Vec::new();
    }
    if session.in_flight {
        engine_debug!("Previous status request still pending; skipping tick");
        return Vec::new();
    }
    session.in_flight = true;
    vec![Effect::FetchStatus {
        session_id,
        job_id: session.job_id,
    }]
}

fn status_received(
    state: &mut AppState,
    session_id: SessionId,
    job_id: JobId,
    result: Result<Option<RawStatus>, TransportError>,
) -> Vec<Effect> {
    if state.phase() != JobPhase::Processing || !state.session_matches(session_id, job_id) {
        engine_debug!(job = job_id; "dropping stale status from session {}", session_id);
        return Vec::new();
    }
    if let Some(session) = state.poll_session_mut() {
        session.in_flight = false;
    }

    let limits = state.config().clone();
    match result {
        Ok(None) => {
            engine_debug!(job = job_id; "status not available yet");
            count_pending(state, limits.max_pending_polls)
        }
        Ok(Some(raw)) => match interpret(&raw) {
            Interpretation::Ignored { step } => {
                engine_warn!(
                    job = job_id;
                    "unusable status (step {:?}, error {:?})",
                    step,
                    raw.error
                );
                count_pending(state, limits.max_pending_polls)
            }
            interpretation => {
                state.record_poll_answer();
                apply_status(state, interpretation)
            }
        },
        Err(err) => {
            let failures = state.record_poll_failure();
            engine_warn!(
                job = job_id;
                "status check failed ({}/{}): {}",
                failures,
                limits.max_consecutive_poll_failures,
                err.message
            );
            if limits.max_consecutive_poll_failures > 0
                && failures >= limits.max_consecutive_poll_failures
            {
                return fail_with_timeout(state, failures);
            }
            Vec::new()
        }
    }
}

/// A status that carries nothing usable counts as "not ready" so the ceiling still applies.
fn count_pending(state: &mut AppState, max_pending_polls: u32) -> Vec<Effect> {
    let pending = state.record_pending_poll();
    if max_pending_polls > 0 && pending >= max_pending_polls {
        return fail_with_timeout(state, pending);
    }
    Vec::new()
}

fn apply_status(state: &mut AppState, interpretation: Interpretation) -> Vec<Effect> {
    match interpretation {
        Interpretation::Progress(event) => {
            state.apply_progress(event);
            Vec::new()
        }
        Interpretation::Completed { event, stats } => {
            engine_info!("Job completed: {:?}", stats);
            stop_effects(state.complete(event, stats))
        }
        Interpretation::Failed(event) => {
            let detail = event.error_detail().unwrap_or_default().to_string();
            engine_warn!("Remote processing failed: {}", detail);
            stop_effects(state.fail(JobError::RemoteProcessing(detail), event))
        }
        Interpretation::Ignored { .. } => Vec::new(),
    }
}

fn cancel(state: &mut AppState) -> Vec<Effect> {
    if !state.phase().is_busy() {
        engine_debug!("Nothing to cancel in phase {:?}", state.phase());
        return Vec::new();
    }
    engine_info!("Cancelling job {:?}", state.active_job());
    stop_effects(state.clear_job())
}

/// Reset from a terminal phase; a running job needs an explicit confirmation first.
pub(crate) fn reset(state: &mut AppState) -> Vec<Effect> {
    match state.phase() {
        JobPhase::Complete | JobPhase::Error => stop_effects(state.clear_job()),
        JobPhase::Uploading | JobPhase::Processing => vec![Effect::ConfirmCancel],
        JobPhase::Idle => {
            state.dismiss_notice();
            Vec::new()
        }
    }
}

fn download_finished(
    state: &mut AppState,
    artifact: ArtifactKind,
    result: Result<PathBuf, TransportError>,
) {
    match result {
        Ok(path) => state.set_notice(Notice::new(
            NoticeKind::Info,
            Severity::Success,
            format!("Saved the {} file to {}", artifact.label(), path.display()),
        )),
        Err(err) => {
            engine_warn!("Download of {} failed: {}", artifact, err.message);
            state.set_notice(Notice::danger(
                NoticeKind::TransportFailure,
                format!("Could not download the {} file: {}", artifact.label(), err.message),
            ));
        }
    }
}

fn fail_with_transport(state: &mut AppState, context: &str, err: TransportError) -> Vec<Effect> {
    let event = ProgressEvent::failed(format!("{context}: {}", err.message), err.message.clone());
    stop_effects(state.fail(JobError::from(err), event))
}

fn fail_with_timeout(state: &mut AppState, attempts: u32) -> Vec<Effect> {
    let error = JobError::PollTimeout { attempts };
    let event = ProgressEvent::failed(
        "Lost track of the processing status. Please try again.",
        error.detail(),
    );
    stop_effects(state.fail(error, event))
}

fn stop_effects(stopped: Option<SessionId>) -> Vec<Effect> {
    stopped
        .map(|session_id| vec![Effect::StopPolling { session_id }])
        .unwrap_or_default()
}
