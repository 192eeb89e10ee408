//! Integration tests for the conversation controller
//!
//! Drives full request cycles against a scripted backend and checks the
//! filtered view, the conversation log, and what reached the backend.

mod common;

use common::{ScriptedBackend, properties};
use parking_lot::Mutex;
use std::sync::Arc;

use tablechat::conversation::controller::SHOW_ALL_SUMMARY;
use tablechat::dataset::Value;
use tablechat::error::TranslationError;
use tablechat::filter::apply_filter;
use tablechat::translate::Role;
use tablechat::{ConversationController, CycleOutcome, FilterSpec, TableSchema};

const GREETING: &str = "Describe the properties you want to see.";

fn controller(backend: ScriptedBackend) -> (ConversationController, Arc<ScriptedBackend>) {
    let backend = Arc::new(backend);
    let controller = ConversationController::new(
        Arc::new(properties()),
        &TableSchema::property_schedule(),
        backend.clone(),
        GREETING,
    );
    (controller, backend)
}

#[tokio::test]
async fn test_three_way_filter_keeps_exact_matches() {
    let (mut controller, backend) = controller(ScriptedBackend::new().reply(
        r#"{"FloodRisk": "High", "Construction": "Timber Frame", "Location": "London"}"#,
    ));

    let outcome = controller
        .submit("Show me high risk timber buildings in London")
        .await;

    let view = controller.view().get();
    assert_eq!(view.len(), 2);
    for row in 0..view.len() {
        assert_eq!(view.value(row, "Location"), Some(&Value::from("London")));
        assert_eq!(view.value(row, "Construction"), Some(&Value::from("Timber Frame")));
        assert_eq!(view.value(row, "FloodRisk"), Some(&Value::from("High")));
    }
    assert_eq!(view.value(0, "SumInsured"), Some(&Value::Integer(500000)));
    assert_eq!(view.value(0, "YearBuilt"), Some(&Value::Integer(1990)));

    let expected = "Applied filters: FloodRisk='High', Construction='Timber Frame', Location='London'";
    match outcome {
        CycleOutcome::Applied { rows, summary, .. } => {
            assert_eq!(rows, 2);
            assert_eq!(summary, expected);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    let messages = controller.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0].content, GREETING);
    assert_eq!(messages[1].role, Role::User);
    assert_eq!(messages[2].role, Role::Assistant);
    assert_eq!(messages[2].content, expected);

    let requests = backend.requests.lock();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].len(), 2);
    assert_eq!(requests[0][0].role, Role::System);
    assert_eq!(
        requests[0][1].content,
        "Show me high risk timber buildings in London"
    );
}

#[tokio::test]
async fn test_empty_filter_shows_all_data() {
    let (mut controller, _) = controller(
        ScriptedBackend::new()
            .reply(r#"{"Location": "Glasgow"}"#)
            .reply("{}"),
    );

    controller.submit("Glasgow only").await;
    assert_eq!(controller.view().get().len(), 2);

    controller.submit("reset").await;
    assert_eq!(*controller.view().get(), properties());
    assert_eq!(
        controller.log().last().map(|m| m.content.as_str()),
        Some(SHOW_ALL_SUMMARY)
    );
    assert!(controller.active_filter().is_empty());
}

#[tokio::test]
async fn test_malformed_reply_keeps_previous_view() {
    let (mut controller, _) = controller(
        ScriptedBackend::new()
            .reply(r#"{"Location": "Leeds"}"#)
            .reply("not json"),
    );

    controller.submit("Leeds").await;
    let before = controller.view().get();
    let version = controller.view().version();
    let messages_before = controller.messages().len();

    let outcome = controller.submit("something odd").await;

    assert!(matches!(outcome, CycleOutcome::Failed { .. }));
    assert_eq!(*controller.view().get(), *before);
    assert_eq!(controller.view().version(), version);
    assert_eq!(controller.messages().len(), messages_before + 2);

    let reply = controller.log().last().unwrap();
    assert_eq!(reply.role, Role::Assistant);
    assert!(reply.content.starts_with("Error: "));
    assert!(reply.content.contains("not json"));
    assert_eq!(
        controller.active_filter(),
        &FilterSpec::new().with("Location", "Leeds")
    );
}

#[tokio::test]
async fn test_backend_failure_reported_verbatim() {
    let (mut controller, _) = controller(ScriptedBackend::new().fail(TranslationError::Status {
        status: 401,
        body: "invalid api key".to_string(),
    }));

    let outcome = controller.submit("anything").await;

    match outcome {
        CycleOutcome::Failed { message } => {
            assert!(message.contains("401"));
            assert!(message.contains("invalid api key"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(controller.view().version(), 0);
    assert_eq!(*controller.view().get(), properties());
}

#[tokio::test]
async fn test_filters_do_not_accumulate() {
    let (mut controller, _) = controller(
        ScriptedBackend::new()
            .reply(r#"{"Location": "London"}"#)
            .reply(r#"{"FloodRisk": "Low"}"#),
    );

    controller.submit("London").await;
    controller.submit("low risk").await;

    let second = FilterSpec::new().with("FloodRisk", "Low");
    assert_eq!(*controller.view().get(), apply_filter(&properties(), &second));
    assert_eq!(controller.view().get().len(), 2);
}

#[tokio::test]
async fn test_unknown_columns_silently_ignored() {
    let (mut controller, _) = controller(
        ScriptedBackend::new().reply(r#"{"Colour": "Red", "Location": "Bristol"}"#),
    );

    let outcome = controller.submit("red buildings in Bristol").await;

    assert_eq!(controller.view().get().len(), 1);
    match outcome {
        CycleOutcome::Applied { summary, .. } => {
            assert_eq!(summary, "Applied filters: Location='Bristol'")
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn test_view_subscribers_see_each_write() {
    let (mut controller, _) = controller(
        ScriptedBackend::new()
            .reply(r#"{"Location": "Glasgow"}"#)
            .reply("oops")
            .reply("{}"),
    );
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    controller
        .view()
        .subscribe(move |view| sink.lock().push(view.len()));

    controller.submit("Glasgow").await;
    controller.submit("???").await;
    controller.submit("all").await;

    assert_eq!(*seen.lock(), vec![2, 8]);
    assert_eq!(controller.messages().len(), 7);
}
