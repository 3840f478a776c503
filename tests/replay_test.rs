/*!
 * Trace Replay Tests
 * Loading traces from disk and replaying them end to end
 */

use marrow_iosched::{load_trace, IoSchedError, Replayer, RequestId, TunablesConfig};
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

const TRACE: &str = r#"# display on, reads win
{"at": 0, "op": "admit", "id": 1, "sync": false, "dir": "write", "sector": 4096}
{"at": 0, "op": "admit", "id": 2, "sync": true, "dir": "read", "sector": 8}
{"at": 0, "op": "admit", "id": 3, "sync": true, "dir": "read", "sector": 16}
{"at": 2, "op": "dispatch"}

# screen goes dark, async reads lead normal selection
{"at": 5, "op": "display", "on": false}
{"at": 5, "op": "admit", "id": 4, "sync": false, "dir": "read", "sector": 24}
{"at": 6, "op": "drain"}
"#;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_replay_from_file() {
    let file = write_temp(TRACE);
    let events = load_trace(file.path()).unwrap();
    assert_eq!(events.len(), 7);

    let report = Replayer::new(true, None).unwrap().run(&events).unwrap();
    let order: Vec<u64> = report.dispatched.iter().map(|d| d.id.0).collect();
    assert_eq!(order, vec![2, 4, 3, 1]);
    assert_eq!(report.dispatched[0].at, 2);
    assert_eq!(report.dispatched[3].at, 6);
    assert_eq!(report.remaining, 0);
    assert_eq!(report.stats.admitted, 4);
}

#[test]
fn test_replay_with_overrides() {
    let file = write_temp(
        r#"
{"at": 0, "op": "admit", "id": 1, "sync": true, "dir": "write"}
{"at": 0, "op": "admit", "id": 2, "sync": true, "dir": "read"}
"#,
    );
    let overrides: TunablesConfig =
        serde_json::from_str(r#"{"sync_write_expire": 0, "fifo_batch": -3}"#).unwrap();

    let events = load_trace(file.path()).unwrap();
    let report = Replayer::new(true, Some(&overrides)).unwrap().run(&events).unwrap();

    assert_eq!(report.untracked, vec![RequestId(1)]);
    assert_eq!(report.remaining, 1);
    assert_eq!(report.tunables.fifo_batch, Some(1));
}

#[test]
fn test_report_serializes() {
    let file = write_temp(TRACE);
    let events = load_trace(file.path()).unwrap();
    let report = Replayer::new(true, None).unwrap().run(&events).unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["dispatched"][0]["id"], 2);
    assert_eq!(json["dispatched"][0]["class"]["direction"], "read");
    assert_eq!(json["tunables"]["fifo_batch"], 4);
}

#[test]
fn test_missing_trace_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_trace(dir.path().join("absent.jsonl")).unwrap_err();
    assert!(matches!(err, IoSchedError::Io(_)));
}
