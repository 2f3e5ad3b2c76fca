//! Submission, settlement and cancellation through the app.

use std::sync::Arc;
use std::time::Duration;

use ratatui::crossterm::event::{KeyCode, KeyModifiers};

use super::helpers::*;
use crate::core::testing::StubService;
use crate::core::{DispatchError, ErrorKind, Label, Metrics, Mode, SubmitOutcome, SwitchPolicy};

/// Selects `name` (relative to the working directory) in the active file mode.
fn choose_typed_file(h: &mut Harness, name: &str) {
    type_text(&mut h.app, name);
    h.app.handle_key(key(KeyCode::Enter));
}

#[tokio::test]
async fn single_success_stores_one_row_and_clears_inputs() {
    let mut h = create_harness(positive_service());
    type_text(&mut h.app, "Breaking news");
    h.app.handle_key(key(KeyCode::Tab));
    h.app.handle_key(key(KeyCode::Enter));

    settle(&mut h.app).await;

    let sent = h.service.last_single().unwrap();
    assert_eq!(sent.title, "Breaking news");
    assert_eq!(sent.body, "");

    let view = h.app.session.view();
    assert_eq!(view.rows.len(), 1);
    assert_eq!(view.rows[0].label, Label::Positive);
    assert_eq!(view.rows[0].probability_text(), "0.92");
    assert!(view.error.is_none());

    assert!(h.app.session.inputs().single().is_empty());
    assert_eq!(h.app.editor.title.lines(), [""]);
    assert_eq!(h.app.editor.focus, crate::app::SingleField::Title);
}

#[tokio::test]
async fn failed_single_keeps_inputs_and_sets_error() {
    let mut h = create_harness(StubService::failing(DispatchError::Service {
        status: 500,
        detail: "model not loaded".to_string(),
    }));
    type_text(&mut h.app, "Breaking news");
    h.app.handle_key(ctrl('d'));

    settle(&mut h.app).await;

    let error = h.app.session.errors().current().cloned().unwrap();
    assert_eq!(error.kind, ErrorKind::Service);
    assert!(error.text.contains("model not loaded"));
    assert_eq!(h.app.session.inputs().single().title, "Breaking news");
    assert_eq!(h.app.editor.title.lines(), ["Breaking news"]);
    assert!(h.app.session.results().prediction(Mode::Single).is_none());
}

#[tokio::test]
async fn ctrl_enter_and_f5_also_submit() {
    let mut h = create_harness(positive_service());
    h.app
        .handle_key(with_modifiers(KeyCode::Enter, KeyModifiers::CONTROL));
    settle(&mut h.app).await;
    h.app.handle_key(key(KeyCode::F(5)));
    settle(&mut h.app).await;

    assert_eq!(h.service.calls(), 2);
}

#[tokio::test]
async fn batch_rows_follow_file_order() {
    let mut h = create_harness(StubService::ok(&[0, 1, 0], &[0.8, 0.6, 0.99]));
    h.write_file("reviews.csv", "Titulo;Descripcion\na;b\nc;d\ne;f\n");
    h.app.handle_key(key(KeyCode::F(2)));
    choose_typed_file(&mut h, "reviews.csv");
    h.app.handle_key(ctrl('d'));

    settle(&mut h.app).await;

    assert_eq!(
        h.service.last_file().unwrap().path(),
        h.absolute("reviews.csv")
    );
    let view = h.app.session.view();
    let labels: Vec<Label> = view.rows.iter().map(|row| row.label).collect();
    assert_eq!(labels, vec![Label::Positive, Label::Negative, Label::Positive]);
    // The slot is cleared once the file has been classified.
    assert!(h.app.session.inputs().file(crate::core::FileSlot::Batch).is_none());
    assert_eq!(h.app.current_path_query(), "");
}

#[tokio::test]
async fn retrain_reports_metrics_and_clears_slot() {
    let metrics = Metrics {
        precision: 0.91,
        recall: 0.88,
        f1: 0.895,
    };
    let mut h = create_harness(StubService::ok(&[1, 0], &[0.7, 0.9]).with_metrics(metrics));
    h.write_file("labeled.csv", "Titulo;Descripcion;Label\na;b;1\n");
    h.app.handle_key(key(KeyCode::F(3)));
    choose_typed_file(&mut h, "labeled.csv");
    h.app.handle_key(ctrl('d'));

    settle(&mut h.app).await;

    let view = h.app.session.view();
    assert_eq!(view.metrics, Some(metrics));
    assert_eq!(view.rows.len(), 2);
    assert!(h.app.session.inputs().file(crate::core::FileSlot::Retrain).is_none());
}

#[tokio::test]
async fn failure_keeps_previous_results() {
    let mut h = create_harness(positive_service());
    h.app.handle_key(ctrl('d'));
    settle(&mut h.app).await;
    assert_eq!(h.app.session.view().rows.len(), 1);

    h.app
        .session
        .dispatcher_mut()
        .set_service(Arc::new(StubService::failing(DispatchError::Network(
            "connection refused".to_string(),
        ))));
    h.app.handle_key(ctrl('d'));
    settle(&mut h.app).await;

    let view = h.app.session.view();
    assert_eq!(view.rows.len(), 1);
    assert_eq!(view.error.map(|e| e.kind), Some(ErrorKind::Network));
}

#[tokio::test]
async fn success_clears_a_previous_error() {
    let mut h = create_harness(positive_service());
    h.app.handle_key(key(KeyCode::F(2)));
    h.app.handle_key(ctrl('d'));
    assert!(h.app.session.errors().is_set());

    h.app.handle_key(key(KeyCode::F(1)));
    h.app.handle_key(ctrl('d'));
    settle(&mut h.app).await;

    assert!(!h.app.session.errors().is_set());
}

#[tokio::test]
async fn second_submit_while_pending_is_ignored() {
    let mut h = create_harness(positive_service().with_delay(Duration::from_millis(100)));

    assert!(matches!(h.app.submit(), SubmitOutcome::Dispatched(_)));
    assert_eq!(h.app.submit(), SubmitOutcome::AlreadyPending);
    assert!(h.app.session.view().pending);

    settle(&mut h.app).await;

    assert_eq!(h.service.calls(), 1);
    assert!(!h.app.session.view().pending);
}

#[tokio::test]
async fn result_for_a_background_mode_is_stored() {
    let mut h = create_harness(
        StubService::ok(&[0, 1, 0], &[0.8, 0.6, 0.99]).with_delay(Duration::from_millis(50)),
    );
    h.write_file("reviews.csv", "Titulo;Descripcion\n");
    h.app.handle_key(key(KeyCode::F(2)));
    choose_typed_file(&mut h, "reviews.csv");
    h.app.handle_key(ctrl('d'));
    h.app.handle_key(key(KeyCode::F(1)));

    settle(&mut h.app).await;

    assert_eq!(h.app.session.active_mode(), Mode::Single);
    assert!(h.app.session.view().rows.is_empty());
    assert_eq!(
        h.app.session.results().prediction(Mode::Batch).map(|p| p.len()),
        Some(3)
    );
}

#[tokio::test]
async fn clear_on_leave_drops_results_of_the_mode_left() {
    let mut h = create_harness(positive_service());
    h.app.session.set_policy(SwitchPolicy::ClearOnLeave);
    h.app.handle_key(ctrl('d'));
    settle(&mut h.app).await;
    assert!(h.app.session.results().prediction(Mode::Single).is_some());

    h.app.handle_key(key(KeyCode::F(2)));

    assert!(h.app.session.results().prediction(Mode::Single).is_none());
}

#[tokio::test]
async fn retained_results_survive_a_round_trip() {
    let mut h = create_harness(positive_service());
    h.app.handle_key(ctrl('d'));
    settle(&mut h.app).await;

    h.app.handle_key(key(KeyCode::F(2)));
    h.app.handle_key(key(KeyCode::F(1)));

    assert_eq!(h.app.session.view().rows.len(), 1);
}

#[tokio::test]
async fn timeout_surfaces_a_network_error() {
    let mut h = create_harness(StubService::hanging());
    h.app.session.set_timeout(Duration::from_millis(50));
    h.app.handle_key(ctrl('d'));

    settle(&mut h.app).await;

    let error = h.app.session.errors().current().cloned().unwrap();
    assert_eq!(error.kind, ErrorKind::Network);
    assert!(error.text.contains("timed out"));
}

#[tokio::test]
async fn quitting_cancels_in_flight_requests() {
    let mut h = create_harness(StubService::hanging());
    h.app.handle_key(ctrl('d'));
    assert!(h.app.session.is_pending(Mode::Single));

    h.app.handle_key(ctrl('c'));
    tokio::time::sleep(Duration::from_millis(30)).await;
    h.app.process_events();

    assert!(h.app.should_quit());
    assert!(!h.app.session.is_pending(Mode::Single));
    assert!(h.app.session.results().prediction(Mode::Single).is_none());
    assert!(!h.app.session.errors().is_set());
}

#[tokio::test]
async fn editing_while_pending_keeps_the_new_text() {
    let mut h = create_harness(positive_service().with_delay(Duration::from_millis(50)));
    type_text(&mut h.app, "Sent title");
    h.app.handle_key(ctrl('d'));
    type_text(&mut h.app, " and more");

    settle(&mut h.app).await;

    assert_eq!(h.service.last_single().unwrap().title, "Sent title");
    assert_eq!(h.app.session.view().rows.len(), 1);
    assert_eq!(h.app.session.inputs().single().title, "Sent title and more");
    assert_eq!(h.app.editor.title.lines(), ["Sent title and more"]);
}

#[tokio::test]
async fn file_chosen_while_pending_stays_selected() {
    let mut h = create_harness(positive_service().with_delay(Duration::from_millis(50)));
    h.write_file("first.csv", "Titulo;Descripcion\n");
    h.write_file("second.csv", "Titulo;Descripcion\n");
    h.app.handle_key(key(KeyCode::F(2)));
    choose_typed_file(&mut h, "first.csv");
    h.app.handle_key(ctrl('d'));

    h.app.handle_key(ctrl('u'));
    choose_typed_file(&mut h, "second.csv");
    settle(&mut h.app).await;

    assert_eq!(
        h.service.last_file().unwrap().path(),
        h.absolute("first.csv")
    );
    let selected = h.app.session.inputs().file(crate::core::FileSlot::Batch);
    assert_eq!(
        selected.map(|file| file.path().to_path_buf()),
        Some(h.absolute("second.csv"))
    );
    assert_eq!(h.app.current_path_query(), "second.csv");
}
