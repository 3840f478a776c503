/*!
 * Request Traces
 *
 * JSON-lines recordings of scheduler input: admissions, dispatch points,
 * display transitions, tunable writes and merges. Each line carries the
 * millisecond timestamp at which it happens.
 */

mod replay;

pub use replay::{DispatchRecord, ReplayReport, Replayer};

use crate::core::errors::{IoSchedError, IoSchedResult};
use crate::core::types::Direction;
use crate::iosched::TunableKey;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One trace line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEvent {
    /// Milliseconds since the start of the trace
    pub at: u64,
    #[serde(flatten)]
    pub op: TraceOp,
}

/// Operation recorded on a trace line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TraceOp {
    Admit {
        id: u64,
        #[serde(default)]
        sync: bool,
        dir: Direction,
        #[serde(default)]
        sector: u64,
    },
    Dispatch,
    Drain,
    Display {
        on: bool,
    },
    Tune {
        key: TunableKey,
        value: TuneValue,
    },
    Merge {
        rq: u64,
        next: u64,
    },
}

/// Tunable value as written in a trace, either raw text or a number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TuneValue {
    Number(i64),
    Text(String),
}

/// Parse a trace, skipping blank lines and `#` comments
pub fn parse_trace<R: BufRead>(reader: R) -> IoSchedResult<Vec<TraceEvent>> {
    let mut events = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let text = line.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        let event = serde_json::from_str(text).map_err(|e| IoSchedError::Trace {
            line: index + 1,
            message: e.to_string(),
        })?;
        events.push(event);
    }
    Ok(events)
}

/// Read and parse a trace file
pub fn load_trace(path: impl AsRef<Path>) -> IoSchedResult<Vec<TraceEvent>> {
    let file = File::open(path)?;
    parse_trace(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_ops() {
        let text = r#"
# warm-up
{"at": 0, "op": "admit", "id": 1, "sync": true, "dir": "read", "sector": 2048}
{"at": 0, "op": "admit", "id": 2, "dir": "write"}
{"at": 3, "op": "merge", "rq": 1, "next": 2}
{"at": 4, "op": "tune", "key": "fifo_batch", "value": "12abc"}
{"at": 4, "op": "tune", "key": "sync_read_expire", "value": 250}
{"at": 5, "op": "display", "on": false}
{"at": 6, "op": "dispatch"}
{"at": 9, "op": "drain"}
"#;
        let events = parse_trace(text.as_bytes()).unwrap();
        assert_eq!(events.len(), 8);
        assert_eq!(
            events[0].op,
            TraceOp::Admit {
                id: 1,
                sync: true,
                dir: Direction::Read,
                sector: 2048
            }
        );
        assert_eq!(
            events[3].op,
            TraceOp::Tune {
                key: TunableKey::FifoBatch,
                value: TuneValue::Text("12abc".into())
            }
        );
        assert_eq!(events[4].at, 4);
        assert!(matches!(events[4].op, TraceOp::Tune { value: TuneValue::Number(250), .. }));
    }

    #[test]
    fn test_bad_line_reports_line_number() {
        let text = "{\"at\": 0, \"op\": \"dispatch\"}\n\n{\"at\": 1, \"op\": \"fly\"}\n";
        match parse_trace(text.as_bytes()) {
            Err(IoSchedError::Trace { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected trace error, got {:?}", other),
        }
    }
}
