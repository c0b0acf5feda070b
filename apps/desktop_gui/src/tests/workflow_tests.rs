use std::path::PathBuf;

use client_core::RequestError;
use shared::{Reference, MAX_UPLOAD_BYTES};

use super::*;
use crate::controller::events::Severity;
use crate::controller::orchestration::DispatchError;

#[derive(Default)]
struct RecordingDispatcher {
    sent: Vec<BackendCommand>,
    fail_with: Option<DispatchError>,
}

impl CommandDispatcher for RecordingDispatcher {
    fn dispatch(&mut self, cmd: BackendCommand) -> Result<(), DispatchError> {
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        self.sent.push(cmd);
        Ok(())
    }
}

fn controller() -> WorkflowController<RecordingDispatcher> {
    WorkflowController::new(RecordingDispatcher::default())
}

fn document(size_bytes: u64) -> SelectedDocument {
    SelectedDocument {
        path: PathBuf::from("/tmp/notice.pdf"),
        file_name: "notice.pdf".to_string(),
        size_bytes,
        media_type: "application/pdf".to_string(),
    }
}

fn answer(text: &str, sources: &[&str]) -> AnalysisResult {
    AnalysisResult {
        answer_text: text.to_string(),
        references: sources.iter().copied().map(Reference::new).collect(),
    }
}

fn running(kind: WorkflowKind, progress_percent: Option<u8>) -> WorkflowState {
    WorkflowState::Running {
        kind,
        progress_percent,
    }
}

#[test]
fn query_runs_then_succeeds() {
    let mut controller = controller();
    assert_eq!(controller.state(), &WorkflowState::Idle);

    let generation = controller
        .start_query("What is the punishment under IPC 302?")
        .expect("query should start");
    assert_eq!(controller.state(), &running(WorkflowKind::Query, None));
    assert_eq!(
        controller.dispatcher().sent,
        vec![BackendCommand::Ask {
            generation,
            query: "What is the punishment under IPC 302?".to_string(),
        }]
    );

    let applied = controller.apply(UiEvent::QueryResolved {
        generation,
        outcome: Ok(answer("...", &["IPC 302"])),
    });

    assert_eq!(applied, Applied::Updated);
    match controller.state() {
        WorkflowState::Succeeded { result } => {
            assert_eq!(result.answer_text, "...");
            assert_eq!(result.references.len(), 1);
        }
        other => panic!("unexpected state: {other:?}"),
    }
    let notifications = controller.drain_notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].title, "Analysis Complete");
    assert_eq!(notifications[0].severity, Severity::Success);
}

#[test]
fn query_failure_is_prefixed_and_notified() {
    let mut controller = controller();
    let generation = controller.start_query("bail for theft").expect("start");

    controller.apply(UiEvent::QueryResolved {
        generation,
        outcome: Err(RequestError::Timeout {
            after: std::time::Duration::from_secs(90),
        }),
    });

    assert_eq!(
        controller.state(),
        &WorkflowState::Failed {
            message: "Error: timeout of 90000ms exceeded".to_string()
        }
    );
    let notifications = controller.drain_notifications();
    assert_eq!(
        notifications,
        vec![Notification::error(
            "Analysis Failed",
            "timeout of 90000ms exceeded"
        )]
    );
}

#[test]
fn query_is_trimmed_before_dispatch() {
    let mut controller = controller();
    controller.start_query("  Rights under Article 21 \n").expect("start");
    assert!(matches!(
        &controller.dispatcher().sent[0],
        BackendCommand::Ask { query, .. } if query == "Rights under Article 21"
    ));
}

#[test]
fn blank_query_is_rejected_without_dispatch() {
    let mut controller = controller();
    let before = controller.generation();

    let err = controller.start_query(" \t\n").expect_err("blank query");

    assert_eq!(err, WorkflowError::Validation(ValidationError::EmptyQuery));
    assert_eq!(controller.state(), &WorkflowState::Idle);
    assert_eq!(controller.generation(), before);
    assert!(controller.dispatcher().sent.is_empty());
    let notifications = controller.drain_notifications();
    assert_eq!(notifications[0].title, "Input Required");
    assert_eq!(notifications[0].severity, Severity::Error);
}

#[test]
fn oversized_upload_never_reaches_backend() {
    let mut controller = controller();

    let err = controller
        .start_upload(Some(&document(20 * 1024 * 1024)))
        .expect_err("20 MiB upload must be rejected");

    assert_eq!(
        err,
        WorkflowError::Validation(ValidationError::FileTooLarge {
            size_bytes: 20 * 1024 * 1024
        })
    );
    assert_eq!(controller.state(), &WorkflowState::Idle);
    assert!(controller.dispatcher().sent.is_empty());
    assert_eq!(controller.drain_notifications()[0].title, "File Too Large");
}

#[test]
fn upload_at_exact_limit_is_accepted() {
    let mut controller = controller();
    controller
        .start_upload(Some(&document(MAX_UPLOAD_BYTES)))
        .expect("limit is inclusive");
    assert_eq!(controller.state(), &running(WorkflowKind::Upload, Some(0)));
}

#[test]
fn missing_file_is_rejected() {
    let mut controller = controller();
    let err = controller.start_upload(None).expect_err("no file");
    assert_eq!(err, WorkflowError::Validation(ValidationError::MissingFile));
    assert_eq!(controller.state(), &WorkflowState::Idle);
    assert!(controller.dispatcher().sent.is_empty());
    assert_eq!(controller.drain_notifications()[0].title, "File Required");
}

#[test]
fn running_state_rejects_new_workflows_without_touching_progress() {
    let mut controller = controller();
    let generation = controller
        .start_upload(Some(&document(1024)))
        .expect("upload starts");
    controller.apply(UiEvent::UploadProgress {
        generation,
        percent: 40,
    });
    let snapshot = controller.state().clone();

    for _ in 0..3 {
        assert_eq!(
            controller.start_query("another question"),
            Err(WorkflowError::Busy(WorkflowKind::Upload))
        );
        assert_eq!(
            controller.start_upload(Some(&document(10))),
            Err(WorkflowError::Busy(WorkflowKind::Upload))
        );
    }

    assert_eq!(controller.state(), &snapshot);
    assert_eq!(controller.state().progress_percent(), Some(40));
    assert_eq!(controller.generation(), generation);
    assert_eq!(controller.dispatcher().sent.len(), 1);
    assert!(controller.drain_notifications().is_empty());
}

#[test]
fn upload_progress_is_monotonic_and_bounded() {
    let mut controller = controller();
    let generation = controller
        .start_upload(Some(&document(4096)))
        .expect("upload starts");

    let mut observed = vec![controller.state().progress_percent().expect("starts at 0")];
    for percent in [10, 5, 10, 55, 54, 250, 99] {
        controller.apply(UiEvent::UploadProgress {
            generation,
            percent,
        });
        observed.push(
            controller
                .state()
                .progress_percent()
                .expect("still uploading"),
        );
    }

    assert_eq!(observed, vec![0, 10, 10, 10, 55, 55, 100, 100]);
    assert!(observed.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(controller.state().running_kind(), Some(WorkflowKind::Upload));
}

#[test]
fn progress_is_ignored_for_query_runs() {
    let mut controller = controller();
    let generation = controller.start_query("q").expect("start");
    assert_eq!(
        controller.apply(UiEvent::UploadProgress {
            generation,
            percent: 50
        }),
        Applied::Unchanged
    );
    assert_eq!(controller.state(), &running(WorkflowKind::Query, None));
}

#[test]
fn upload_server_failure_uses_detail() {
    let mut controller = controller();
    let generation = controller
        .start_upload(Some(&document(2048)))
        .expect("upload starts");

    controller.apply(UiEvent::UploadResolved {
        generation,
        outcome: Err(RequestError::Api {
            status: 500,
            detail: "parse failure".to_string(),
        }),
    });

    assert_eq!(
        controller.state(),
        &WorkflowState::Failed {
            message: "Upload Error: parse failure".to_string()
        }
    );
    assert_eq!(controller.drain_notifications()[0].title, "Upload Failed");
}

#[test]
fn blank_request_error_falls_back_to_generic_message() {
    let mut controller = controller();
    let generation = controller
        .start_upload(Some(&document(1)))
        .expect("upload starts");

    controller.apply(UiEvent::UploadResolved {
        generation,
        outcome: Err(RequestError::Transport(String::new())),
    });

    assert_eq!(
        controller.state(),
        &WorkflowState::Failed {
            message: "Upload Error: Upload failed. Please try again.".to_string()
        }
    );
}

#[test]
fn clear_from_settled_states_yields_idle() {
    let mut controller = controller();
    assert_eq!(controller.clear(), Ok(()));
    assert_eq!(controller.state(), &WorkflowState::Idle);

    let generation = controller.start_query("q").expect("start");
    controller.apply(UiEvent::QueryResolved {
        generation,
        outcome: Ok(answer("a", &["IPC 499"])),
    });
    assert_eq!(controller.clear(), Ok(()));
    assert_eq!(controller.state(), &WorkflowState::Idle);
    assert_eq!(controller.state().progress_percent(), None);

    let generation = controller
        .start_upload(Some(&document(5)))
        .expect("upload starts");
    controller.apply(UiEvent::UploadResolved {
        generation,
        outcome: Err(RequestError::Status { status: 502 }),
    });
    assert!(matches!(controller.state(), WorkflowState::Failed { .. }));
    assert_eq!(controller.clear(), Ok(()));
    assert_eq!(controller.state(), &WorkflowState::Idle);
}

#[test]
fn clear_while_running_is_a_no_op_and_result_still_lands() {
    let mut controller = controller();
    let generation = controller.start_query("q").expect("start");

    assert_eq!(
        controller.clear(),
        Err(WorkflowError::Busy(WorkflowKind::Query))
    );
    assert_eq!(controller.state(), &running(WorkflowKind::Query, None));

    assert_eq!(
        controller.apply(UiEvent::QueryResolved {
            generation,
            outcome: Ok(answer("kept", &[])),
        }),
        Applied::Updated
    );
    assert!(matches!(controller.state(), WorkflowState::Succeeded { .. }));
}

#[test]
fn resolution_after_reset_is_discarded() {
    let mut controller = controller();
    let generation = controller.start_query("q").expect("start");

    controller.reset();
    assert_eq!(controller.state(), &WorkflowState::Idle);

    let applied = controller.apply(UiEvent::QueryResolved {
        generation,
        outcome: Ok(answer("late", &["stale"])),
    });

    assert_eq!(applied, Applied::Stale);
    assert_eq!(controller.state(), &WorkflowState::Idle);
    assert!(controller.drain_notifications().is_empty());
}

#[test]
fn stale_upload_events_do_not_touch_newer_workflow() {
    let mut controller = controller();
    let old = controller
        .start_upload(Some(&document(100)))
        .expect("upload starts");
    controller.reset();
    let current = controller.start_query("fresh question").expect("start");
    assert_ne!(old, current);

    assert_eq!(
        controller.apply(UiEvent::UploadProgress {
            generation: old,
            percent: 80
        }),
        Applied::Stale
    );
    assert_eq!(
        controller.apply(UiEvent::UploadResolved {
            generation: old,
            outcome: Err(RequestError::Api {
                status: 500,
                detail: "parse failure".to_string()
            }),
        }),
        Applied::Stale
    );
    assert_eq!(controller.state(), &running(WorkflowKind::Query, None));

    controller.apply(UiEvent::QueryResolved {
        generation: current,
        outcome: Ok(answer("fresh", &[])),
    });
    assert!(matches!(
        controller.state(),
        WorkflowState::Succeeded { result } if result.answer_text == "fresh"
    ));
}

#[test]
fn mismatched_resolution_kind_is_ignored() {
    let mut controller = controller();
    let generation = controller.start_query("q").expect("start");
    assert_eq!(
        controller.apply(UiEvent::UploadResolved {
            generation,
            outcome: Ok(answer("wrong kind", &[])),
        }),
        Applied::Unchanged
    );
    assert_eq!(controller.state(), &running(WorkflowKind::Query, None));
}

#[test]
fn generations_increase_with_every_start() {
    let mut controller = controller();
    let first = controller.start_query("one").expect("start");
    controller.apply(UiEvent::QueryResolved {
        generation: first,
        outcome: Ok(answer("1", &[])),
    });
    let second = controller
        .start_upload(Some(&document(1)))
        .expect("upload starts");
    assert!(second > first);
}

#[test]
fn dispatch_failure_fails_the_workflow_immediately() {
    let mut controller = WorkflowController::new(RecordingDispatcher {
        sent: Vec::new(),
        fail_with: Some(DispatchError::Disconnected),
    });

    controller.start_query("q").expect("validation passes");

    assert_eq!(
        controller.state(),
        &WorkflowState::Failed {
            message: format!("Error: {}", DispatchError::Disconnected)
        }
    );
    assert!(!controller.state().is_running());
    assert_eq!(controller.drain_notifications()[0].title, "Analysis Failed");
}

#[test]
fn backend_unavailable_is_notified_without_state_change() {
    let mut controller = controller();
    assert_eq!(
        controller.apply(UiEvent::BackendUnavailable("runtime failed".to_string())),
        Applied::Unchanged
    );
    assert_eq!(controller.state(), &WorkflowState::Idle);
    assert_eq!(
        controller.drain_notifications(),
        vec![Notification::error("Backend Unavailable", "runtime failed")]
    );
}

#[test]
fn backend_unavailable_while_running_abandons_the_request() {
    let mut controller = controller();
    let pending = controller.start_upload(Some(&document(1024))).expect("start");

    assert_eq!(
        controller.apply(UiEvent::BackendUnavailable("runtime failed".to_string())),
        Applied::Updated
    );
    assert_eq!(controller.state(), &WorkflowState::Idle);
    assert_ne!(controller.generation(), pending);
    assert_eq!(
        controller.drain_notifications(),
        vec![Notification::error("Backend Unavailable", "runtime failed")]
    );

    assert_eq!(
        controller.apply(UiEvent::UploadResolved {
            generation: pending,
            outcome: Ok(answer("late", &[])),
        }),
        Applied::Stale
    );
    assert_eq!(controller.state(), &WorkflowState::Idle);

    controller.start_query("retry").expect("a new workflow can start");
}
