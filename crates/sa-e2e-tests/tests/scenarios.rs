//! E2E tests for the local pipeline through the orchestrator:
//! message → clarification check → intent → parameters → tool → reply.

mod helpers;

use helpers::{TestHarness, date};
use sa_assistant::orchestrator::TurnRoute;
use sa_protocol::{ResponseOrigin, Role, SlotStatus};

/// "show my availability tomorrow" on Monday queries Tuesday only.
#[tokio::test]
async fn e2e_availability_tomorrow() {
    let h = TestHarness::local();

    let outcome = h.say("show my availability tomorrow").await;

    let calls = outcome.message.tool_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].tool_name, "get_availability_data");
    assert_eq!(calls[0].parameters["startDate"], "2024-01-16");
    assert_eq!(calls[0].parameters["endDate"], "2024-01-16");
    assert!(calls[0].result.success);
    assert!(outcome.message.content().contains("You have 2 slots"));
    assert_eq!(outcome.message.origin(), Some(ResponseOrigin::Local));
}

/// A vague delete asks which slots and leaves the store alone.
#[tokio::test]
async fn e2e_vague_delete_asks_for_scope() {
    let h = TestHarness::local();

    let outcome = h.say("delete the slot").await;

    assert!(outcome.message.tool_calls().is_empty());
    assert!(!outcome.message.suggested_options().is_empty());
    assert_eq!(h.slot_count().await, 10);
    assert_eq!(h.orchestrator.context().await.recent_action_count(), 0);
}

/// A bare weekday with an hour-only time asks about the date first.
#[tokio::test]
async fn e2e_bare_weekday_offers_two_dates() {
    let h = TestHarness::local();

    let outcome = h.say("book Friday at 2").await;

    assert!(outcome.message.tool_calls().is_empty());
    let options = outcome.message.suggested_options();
    assert_eq!(options.len(), 2);
    assert!(options.iter().all(|o| o.dates.is_some()));
    assert_eq!(h.slot_count().await, 10);
}

/// Duration plus start time gives a computed end time.
#[tokio::test]
async fn e2e_two_hour_slot_tomorrow() {
    let h = TestHarness::local();

    let outcome = h.say("create a 2 hour slot tomorrow at 9am").await;

    let call = &outcome.message.tool_calls()[0];
    assert_eq!(call.tool_name, "create_availability_slot");
    assert_eq!(call.parameters["date"], "2024-01-16");
    assert_eq!(call.parameters["startTime"], "09:00");
    assert_eq!(call.parameters["endTime"], "11:00");
    assert!(call.result.success, "create failed: {:?}", call.result.error);

    let created: Vec<_> = h
        .backend
        .all_slots()
        .await
        .into_iter()
        .filter(|s| s.date == date(1, 16) && s.end_time.to_string() == "11:00")
        .collect();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].status, SlotStatus::Available);
}

/// Deleting a named day removes exactly that day's slots.
#[tokio::test]
async fn e2e_delete_tomorrow() {
    let h = TestHarness::local();

    let outcome = h.say("delete all slots tomorrow").await;

    let call = &outcome.message.tool_calls()[0];
    assert_eq!(call.tool_name, "delete_availability_slots");
    assert!(call.result.success, "delete failed: {:?}", call.result.error);
    assert_eq!(h.slot_count().await, 8);
    assert!(h.backend.all_slots().await.iter().all(|s| s.date != date(1, 16)));
}

/// Requests outside the assistant's tools get the help text and no tool runs.
#[tokio::test]
async fn e2e_unrelated_request_gets_help() {
    let h = TestHarness::local();

    let outcome = h.say("what's the weather like on mars").await;

    assert!(outcome.message.tool_calls().is_empty());
    assert!(outcome.message.content().contains("show my availability tomorrow"));
    assert!(matches!(outcome.route, TurnRoute::LocalFallback { .. }));
}

/// A failing slot store is reported in the reply, never raised.
#[tokio::test]
async fn e2e_backend_failure_is_reported() {
    let h = TestHarness::local();
    h.backend.fail_with("store offline").await;

    let outcome = h.say("show my availability tomorrow").await;

    assert!(!outcome.message.tool_calls()[0].result.success);
    assert!(outcome.message.content().contains("store offline"));

    let ctx = h.orchestrator.context().await;
    assert!(!ctx.latest_action().unwrap().success);
}

/// Every turn appends the user message then the assistant message.
#[tokio::test]
async fn e2e_turns_alternate_roles() {
    let h = TestHarness::local();

    h.say("show my availability tomorrow").await;
    h.say("delete the slot").await;

    let session = h.orchestrator.session().await;
    let roles: Vec<Role> = session.messages().iter().map(|m| m.role()).collect();
    assert_eq!(roles, [Role::User, Role::Assistant, Role::User, Role::Assistant]);
    assert_eq!(session.messages()[2].content(), "delete the slot");
}

/// "move X to Y" shifts the slot and keeps its length.
#[tokio::test]
async fn e2e_move_slot_keeps_length() {
    let h = TestHarness::local();

    let outcome = h.say("move my 9am slot tomorrow to 10am").await;

    let call = &outcome.message.tool_calls()[0];
    assert_eq!(call.tool_name, "update_availability_slot");
    assert_eq!(call.parameters["startTime"], "09:00");
    assert_eq!(call.parameters["newStartTime"], "10:00");
    assert!(call.result.success, "move failed: {:?}", call.result.error);

    let tuesday: Vec<_> = h
        .backend
        .all_slots()
        .await
        .into_iter()
        .filter(|s| s.date == date(1, 16))
        .map(|s| (s.start_time.to_string(), s.end_time.to_string()))
        .collect();
    assert!(tuesday.contains(&("10:00".into(), "11:00".into())));
    assert!(!tuesday.iter().any(|(start, _)| start == "09:00"));
    assert_eq!(h.slot_count().await, 10);
}

/// A slot that would cross midnight is refused, not shortened.
#[tokio::test]
async fn e2e_slot_past_midnight_is_refused() {
    let h = TestHarness::local();

    let outcome = h.say("create a 2 hour slot tomorrow at 11pm").await;

    let call = &outcome.message.tool_calls()[0];
    assert_eq!(call.tool_name, "create_availability_slot");
    assert!(!call.result.success);
    assert!(call.result.error.as_deref().unwrap().contains("past midnight"));
    assert!(outcome.message.content().contains("past midnight"));
    assert_eq!(h.slot_count().await, 10);
}

/// A status word narrows a delete to slots with that status.
#[tokio::test]
async fn e2e_delete_booked_keeps_available() {
    let h = TestHarness::local();

    let outcome = h.say("delete booked slots today").await;

    let call = &outcome.message.tool_calls()[0];
    assert_eq!(call.tool_name, "delete_availability_slots");
    assert_eq!(call.parameters["status"], "booked");
    assert!(call.result.success, "delete failed: {:?}", call.result.error);
    assert_eq!(h.slot_count().await, 9);
    let monday: Vec<_> = h
        .backend
        .all_slots()
        .await
        .into_iter()
        .filter(|s| s.date == date(1, 15))
        .collect();
    assert_eq!(monday.len(), 1);
    assert_eq!(monday[0].status, SlotStatus::Available);
}
