mod common;

use std::fs;

use serde_json::{json, Value};
use stackshift_core::models::{Route, StepStatus, WorkflowState, WorkflowStep};
use stackshift_core::ErrorKind;

use common::create_test_store;

#[tokio::test]
async fn test_complete_workflow_lifecycle() {
    let (_temp_dir, store) = create_test_store();

    let state = store
        .initialize(Some(Route::Greenfield))
        .await
        .expect("Failed to initialize");
    assert_eq!(state.current_step, Some(WorkflowStep::Analyze));

    for step in WorkflowStep::ALL {
        let started = store.start_step(step).await.expect("Failed to start step");
        assert_eq!(started.current_step, Some(step));
        assert_eq!(started.step_details[&step].status, StepStatus::InProgress);

        let done = store
            .complete_step(step, Some(json!({ "step": step.as_str() })))
            .await
            .expect("Failed to complete step");
        assert!(done.is_completed(step));
    }

    let state = store.load().await.unwrap();
    assert_eq!(state.completed_steps, WorkflowStep::ALL.to_vec());
    assert_eq!(state.current_step, None);
    assert_eq!(store.next_step().await.unwrap(), None);
    assert_eq!(store.progress().await.unwrap().percent(), 100);

    // Started timestamps survive completion.
    let detail = &state.step_details[&WorkflowStep::Implement];
    assert!(detail.completed.is_some_and(|done| done >= detail.started));

    assert!(store.reset().await.unwrap());
    assert_eq!(store.load().await.unwrap().current_step, None);
}

#[tokio::test]
async fn test_load_without_state_file_returns_default() {
    let (_temp_dir, store) = create_test_store();

    let state = store.load().await.expect("Failed to load");
    assert_eq!(state.current_step, None);
    assert!(state.completed_steps.is_empty());
}

#[tokio::test]
async fn test_state_file_is_pretty_camel_case_json() {
    let (_temp_dir, store) = create_test_store();
    store
        .complete_step(WorkflowStep::ReverseEngineer, None)
        .await
        .unwrap();

    let text = fs::read_to_string(store.state_path()).unwrap();
    assert!(text.ends_with("}\n"));
    assert!(text.contains("\n  \"completedSteps\": [\n    \"reverse-engineer\"\n  ]"));

    let raw: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(raw["stepDetails"]["reverse-engineer"]["status"], "completed");
    assert_eq!(raw["currentStep"], Value::Null);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_updates_leave_a_valid_file() {
    let (_temp_dir, store) = create_test_store();

    let mut handles = Vec::new();
    for writer in 0..10usize {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store
                .update(move |mut state| {
                    let step = WorkflowStep::ALL[writer % WorkflowStep::ALL.len()];
                    state.start_step(step).expect("nothing is completed");
                    if let Some(detail) = state.step_details.get_mut(&step) {
                        detail.details = json!({ "writer": writer });
                    }
                    state
                })
                .await
        }));
    }
    for handle in handles {
        handle
            .await
            .expect("task panicked")
            .expect("update failed");
    }

    let text = fs::read_to_string(store.state_path()).unwrap();
    let state: WorkflowState = serde_json::from_str(&text).expect("file must parse");
    assert!(state.validate().is_empty());
    assert!(!state.step_details.is_empty());
    assert!(state
        .step_details
        .values()
        .any(|detail| detail.details.get("writer").is_some()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_complete_step_never_corrupts() {
    let (_temp_dir, store) = create_test_store();
    store.initialize(None).await.unwrap();

    let mut handles = Vec::new();
    for step in WorkflowStep::ALL {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store.complete_step(step, None).await
        }));
    }
    for handle in handles {
        handle.await.expect("task panicked").expect("complete failed");
    }

    let state = store.load().await.expect("file must stay loadable");
    assert!(!state.completed_steps.is_empty());
    assert!(state.validate().is_empty());
}

#[tokio::test]
async fn test_traversal_and_oversize_are_not_swallowed() {
    let (temp_dir, store) = create_test_store();

    let err = stackshift_core::StateStoreBuilder::new(temp_dir.path())
        .with_directory(Some("../../etc"))
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::PathTraversal));
    assert!(!err.user_message().contains("etc"));

    let file = fs::File::create(store.state_path()).unwrap();
    file.set_len(stackshift_core::file_io::MAX_FILE_SIZE + 1)
        .unwrap();
    let err = store.load().await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::FileTooLarge));
}
