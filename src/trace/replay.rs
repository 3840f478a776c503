/*!
 * Trace Replay
 * Drives a scheduler from a recorded event stream on a manual clock
 */

use super::{TraceEvent, TraceOp, TuneValue};
use crate::core::errors::{IoSchedError, IoSchedResult};
use crate::core::time::{msecs_to_ticks, Clock, ManualClock};
use crate::core::types::{Direction, RequestClass, RequestId, RqHandle};
use crate::iosched::{Admission, IoSchedStats, MarrowScheduler, Request, TunablesConfig};
use crate::signal::DisplayState;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// One request leaving the scheduler during replay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchRecord {
    pub at: u64,
    pub id: RequestId,
    pub class: RequestClass,
    /// Forced through by the expiry sweep
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub expired: bool,
}

/// Outcome of a replay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayReport {
    pub dispatched: Vec<DispatchRecord>,
    pub untracked: Vec<RequestId>,
    pub merged: Vec<RequestId>,
    pub remaining: usize,
    pub stats: IoSchedStats,
    pub tunables: TunablesConfig,
}

/// Replays trace events against a fresh scheduler
pub struct Replayer {
    sched: MarrowScheduler<DisplayState, ManualClock>,
    display: DisplayState,
    clock: ManualClock,
    queued: HashMap<u64, RqHandle>,
    now_ms: u64,
    dispatched: Vec<DispatchRecord>,
    untracked: Vec<RequestId>,
    merged: Vec<RequestId>,
}

impl Replayer {
    /// Start a replay with the display in `display_on` state
    pub fn new(display_on: bool, overrides: Option<&TunablesConfig>) -> IoSchedResult<Self> {
        let display = DisplayState::new(display_on);
        let clock = ManualClock::new();
        let mut sched = MarrowScheduler::init(display.clone(), clock.clone())?;
        if let Some(config) = overrides {
            sched.tunables_mut().apply(config);
        }

        Ok(Self {
            sched,
            display,
            clock,
            queued: HashMap::new(),
            now_ms: 0,
            dispatched: Vec::new(),
            untracked: Vec::new(),
            merged: Vec::new(),
        })
    }

    /// Replay every event, then tear down
    pub fn run(mut self, events: &[TraceEvent]) -> IoSchedResult<ReplayReport> {
        for (index, event) in events.iter().enumerate() {
            self.apply(event).map_err(|err| match err {
                IoSchedError::Trace { message, .. } => IoSchedError::Trace {
                    line: index + 1,
                    message,
                },
                other => other,
            })?;
        }
        info!(events = events.len(), "Trace replay complete");
        Ok(self.finish())
    }

    /// Apply a single event
    pub fn apply(&mut self, event: &TraceEvent) -> IoSchedResult<()> {
        if event.at < self.now_ms {
            return Err(trace_error(format!(
                "timestamp {} ms is earlier than {} ms",
                event.at, self.now_ms
            )));
        }
        self.now_ms = event.at;
        self.clock.set(msecs_to_ticks(event.at));

        match &event.op {
            TraceOp::Admit {
                id,
                sync,
                dir,
                sector,
            } => self.admit(*id, *sync, *dir, *sector)?,
            TraceOp::Dispatch => {
                self.dispatch_one();
            }
            TraceOp::Drain => while self.dispatch_one() {},
            TraceOp::Display { on } => self.display.set(*on),
            TraceOp::Tune { key, value } => {
                let tunables = self.sched.tunables_mut();
                match value {
                    TuneValue::Number(n) => tunables.set(*key, *n),
                    TuneValue::Text(text) => {
                        tunables.store(*key, text);
                    }
                }
                debug!(key = %key, value = tunables.get(*key), "Tunable stored");
            }
            TraceOp::Merge { rq, next } => self.merge(*rq, *next)?,
        }
        Ok(())
    }

    /// Tear down and produce the report
    pub fn finish(self) -> ReplayReport {
        let report = ReplayReport {
            dispatched: self.dispatched,
            untracked: self.untracked,
            merged: self.merged,
            remaining: self.sched.len(),
            stats: self.sched.stats(),
            tunables: self.sched.tunables().to_config(),
        };
        self.sched.exit_queue();
        report
    }

    /// Current scheduler tick
    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    fn admit(&mut self, id: u64, sync: bool, dir: Direction, sector: u64) -> IoSchedResult<()> {
        if self.queued.contains_key(&id) {
            return Err(trace_error(format!("request {} is already queued", id)));
        }
        let request = Request::new(id, RequestClass::new(sync, dir)).at_sector(sector);
        match self.sched.admit(request) {
            Admission::Queued(handle) => {
                self.queued.insert(id, handle);
            }
            Admission::Untracked(request) => self.untracked.push(request.id),
        }
        Ok(())
    }

    fn dispatch_one(&mut self) -> bool {
        let expired_before = self.sched.stats().expired_dispatches;
        let Some(request) = self.sched.dispatch() else {
            return false;
        };
        self.queued.remove(&request.id.0);
        self.dispatched.push(DispatchRecord {
            at: self.now_ms,
            id: request.id,
            class: request.class(),
            expired: self.sched.stats().expired_dispatches > expired_before,
        });
        true
    }

    fn merge(&mut self, rq: u64, next: u64) -> IoSchedResult<()> {
        let rq_handle = self.handle(rq)?;
        let next_handle = self.handle(next)?;
        let absorbed = self.sched.merge(rq_handle, next_handle)?;
        self.queued.remove(&next);
        self.merged.push(absorbed.id);
        Ok(())
    }

    fn handle(&self, id: u64) -> IoSchedResult<RqHandle> {
        self.queued
            .get(&id)
            .copied()
            .ok_or_else(|| trace_error(format!("request {} is not queued", id)))
    }
}

fn trace_error(message: String) -> IoSchedError {
    IoSchedError::Trace { line: 0, message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::parse_trace;

    fn replay(text: &str) -> IoSchedResult<ReplayReport> {
        let events = parse_trace(text.as_bytes())?;
        Replayer::new(true, None)?.run(&events)
    }

    fn order(report: &ReplayReport) -> Vec<u64> {
        report.dispatched.iter().map(|d| d.id.0).collect()
    }

    #[test]
    fn test_replay_dispatch_order() {
        let report = replay(
            r#"
{"at": 0, "op": "admit", "id": 1, "sync": true, "dir": "write"}
{"at": 0, "op": "admit", "id": 2, "sync": true, "dir": "read"}
{"at": 1, "op": "drain"}
"#,
        )
        .unwrap();
        assert_eq!(order(&report), vec![2, 1]);
        assert_eq!(report.remaining, 0);
        assert_eq!(report.stats.dispatched, 2);
    }

    #[test]
    fn test_replay_marks_expired_dispatch() {
        let report = replay(
            r#"
{"at": 0, "op": "tune", "key": "fifo_batch", "value": 1}
{"at": 0, "op": "tune", "key": "async_write_expire", "value": "10"}
{"at": 0, "op": "admit", "id": 1, "dir": "write"}
{"at": 100, "op": "admit", "id": 2, "sync": true, "dir": "read"}
{"at": 100, "op": "admit", "id": 3, "sync": true, "dir": "read"}
{"at": 100, "op": "drain"}
"#,
        )
        .unwrap();
        assert_eq!(order(&report), vec![2, 1, 3]);
        assert!(report.dispatched[1].expired);
        assert!(!report.dispatched[0].expired);
    }

    #[test]
    fn test_replay_merge_and_untracked() {
        let report = replay(
            r#"
{"at": 0, "op": "admit", "id": 1, "dir": "read"}
{"at": 0, "op": "admit", "id": 2, "dir": "read"}
{"at": 0, "op": "tune", "key": "sync_write_expire", "value": 0}
{"at": 0, "op": "admit", "id": 3, "sync": true, "dir": "write"}
{"at": 1, "op": "merge", "rq": 1, "next": 2}
"#,
        )
        .unwrap();
        assert_eq!(report.merged, vec![RequestId(2)]);
        assert_eq!(report.untracked, vec![RequestId(3)]);
        assert_eq!(report.remaining, 1);
        assert_eq!(report.tunables.sync_write_expire, Some(0));
    }

    #[test]
    fn test_replay_rejects_unknown_merge_target() {
        let err = replay(
            r#"
{"at": 0, "op": "admit", "id": 1, "dir": "read"}
{"at": 0, "op": "merge", "rq": 1, "next": 9}
"#,
        )
        .unwrap_err();
        assert!(matches!(err, IoSchedError::Trace { line: 2, .. }));
    }

    #[test]
    fn test_replay_rejects_time_going_backwards() {
        let err = replay(
            r#"
{"at": 10, "op": "dispatch"}
{"at": 5, "op": "dispatch"}
"#,
        )
        .unwrap_err();
        assert!(matches!(err, IoSchedError::Trace { line: 2, .. }));
    }
}
