//! End-to-end reminder flow through the public API: store snapshot ->
//! evaluator -> channels, with real toast/system channels and fake
//! clock/notifier seams.

use chrono::{NaiveDate, NaiveDateTime};
use diet_core::{
    Clock, DeliveryChannel, MealStore, NotificationRequest, Notifier, PermissionGate,
    PermissionProbe, PermissionState, ReminderEvaluator, ReminderKey, SystemChannel,
    ToastChannel,
};
use std::collections::VecDeque;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

struct SteppingClock {
    times: Mutex<VecDeque<NaiveDateTime>>,
    last: Mutex<NaiveDateTime>,
}

impl SteppingClock {
    fn new(times: Vec<NaiveDateTime>) -> Self {
        let first = times[0];
        Self {
            times: Mutex::new(VecDeque::from(times)),
            last: Mutex::new(first),
        }
    }
}

impl Clock for SteppingClock {
    fn now_local(&self) -> NaiveDateTime {
        let mut times = self.times.lock().expect("lock times");
        match times.pop_front() {
            Some(next) => {
                *self.last.lock().expect("lock last") = next;
                next
            }
            None => *self.last.lock().expect("lock last"),
        }
    }
}

#[derive(Clone, Default)]
struct RecordingNotifier {
    shown: Arc<Mutex<Vec<NotificationRequest>>>,
}

impl Notifier for RecordingNotifier {
    fn show(&self, request: &NotificationRequest) -> diet_core::Result<()> {
        self.shown.lock().expect("lock shown").push(request.clone());
        Ok(())
    }
}

struct FixedProbe(PermissionState);

impl PermissionProbe for FixedProbe {
    fn request(&self) -> PermissionState {
        self.0
    }
}

#[derive(Clone, Default)]
struct SharedSink(Arc<Mutex<Vec<u8>>>);

impl Write for SharedSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().expect("lock sink").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .expect("valid date")
        .and_hms_opt(h, min, 0)
        .expect("valid time")
}

fn toast_lines(sink: &SharedSink) -> Vec<String> {
    String::from_utf8(sink.0.lock().expect("lock sink").clone())
        .expect("utf8")
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn store_snapshot_drives_both_channels_once_per_day() {
    let dir = TempDir::new().expect("temp dir");
    let store = MealStore::new(dir.path().join("meals.db")).expect("open store");
    let lunch = store
        .create_meal("u1", "Lunch", "12:30:00", 3)
        .expect("create lunch");

    let sink = SharedSink::default();
    let notifier = RecordingNotifier::default();
    let channels: Vec<Box<dyn DeliveryChannel>> = vec![
        Box::new(ToastChannel::new(Box::new(sink.clone()))),
        Box::new(SystemChannel::new(
            PermissionGate::new(Box::new(FixedProbe(PermissionState::Granted))),
            notifier.clone(),
            None,
        )),
    ];

    // Wednesday 12:30 twice (same minute re-tick), then 12:31.
    let clock = SteppingClock::new(vec![
        at(2026, 8, 5, 12, 30),
        at(2026, 8, 5, 12, 30),
        at(2026, 8, 5, 12, 31),
    ]);
    let mut evaluator = ReminderEvaluator::new(channels, Box::new(clock));
    evaluator.replace_snapshot(store.reminder_snapshot("u1").expect("snapshot"));

    let summary = evaluator.tick();
    assert_eq!(summary.due, 1);
    assert_eq!(summary.delivered, 2);

    let lines = toast_lines(&sink);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("Lunch"));
    assert!(lines[0].contains("12:30"));

    {
        let shown = notifier.shown.lock().expect("lock shown");
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].tag, ReminderKey::new(&lunch.id, "2026-08-05").tag());
        assert!(shown[0].require_interaction);
    }

    // Same minute again: due per the matcher, deduped before delivery.
    let summary = evaluator.tick();
    assert_eq!(summary.due, 1);
    assert_eq!(summary.deduped, 1);
    assert_eq!(toast_lines(&sink).len(), 1);

    // Next minute: not due at all.
    let summary = evaluator.tick();
    assert_eq!(summary.due, 0);
    assert_eq!(notifier.shown.lock().expect("lock shown").len(), 1);
}

#[test]
fn denied_permission_silences_system_channel_but_not_toasts() {
    let sink = SharedSink::default();
    let notifier = RecordingNotifier::default();
    let channels: Vec<Box<dyn DeliveryChannel>> = vec![
        Box::new(ToastChannel::new(Box::new(sink.clone()))),
        Box::new(SystemChannel::new(
            PermissionGate::new(Box::new(FixedProbe(PermissionState::Denied))),
            notifier.clone(),
            None,
        )),
    ];

    // Two different due minutes across two days.
    let clock = SteppingClock::new(vec![
        at(2026, 8, 5, 12, 30),
        at(2026, 8, 6, 12, 30),
        at(2026, 8, 6, 12, 30),
    ]);
    let mut evaluator = ReminderEvaluator::new(channels, Box::new(clock));
    evaluator.replace_snapshot(vec![
        dietwatch_daemon_protocol::SnapshotMeal {
            id: "m1".to_string(),
            name: "Lunch".to_string(),
            scheduled_time: "12:30:00".to_string(),
            day_of_week: 3,
        },
        dietwatch_daemon_protocol::SnapshotMeal {
            id: "m2".to_string(),
            name: "Thursday lunch".to_string(),
            scheduled_time: "12:30:00".to_string(),
            day_of_week: 4,
        },
    ]);

    assert_eq!(evaluator.tick().delivered, 2); // Wednesday: toast ok, system no-op
    assert_eq!(evaluator.tick().delivered, 2); // Thursday: fresh key, same story
    assert_eq!(evaluator.tick().deduped, 1);

    assert_eq!(toast_lines(&sink).len(), 2);
    assert!(notifier.shown.lock().expect("lock shown").is_empty());
}

#[test]
fn deleting_a_meal_and_resending_the_snapshot_stops_future_occurrences() {
    let dir = TempDir::new().expect("temp dir");
    let store = MealStore::new(dir.path().join("meals.db")).expect("open store");
    let lunch = store
        .create_meal("u1", "Lunch", "12:30:00", 3)
        .expect("create lunch");
    store
        .create_meal("u1", "Dinner", "19:00:00", 3)
        .expect("create dinner");

    let sink = SharedSink::default();
    let channels: Vec<Box<dyn DeliveryChannel>> =
        vec![Box::new(ToastChannel::new(Box::new(sink.clone())))];
    let clock = SteppingClock::new(vec![at(2026, 8, 5, 12, 30), at(2026, 8, 5, 19, 0)]);
    let mut evaluator = ReminderEvaluator::new(channels, Box::new(clock));
    evaluator.replace_snapshot(store.reminder_snapshot("u1").expect("snapshot"));

    assert_eq!(evaluator.tick().delivered, 1); // lunch fires

    store.delete_meal("u1", &lunch.id).expect("delete lunch");
    evaluator.replace_snapshot(store.reminder_snapshot("u1").expect("snapshot"));

    let summary = evaluator.tick(); // dinner still fires at 19:00
    assert_eq!(summary.checked, 1);
    assert_eq!(summary.delivered, 1);

    let lines = toast_lines(&sink);
    assert_eq!(lines.len(), 2);
    assert!(lines[1].contains("Dinner"));
}
