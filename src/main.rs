/*!
 * iosched-replay - Trace Replay Tool
 *
 * Replays a JSON-lines request trace through the marrow scheduler and prints
 * the dispatch report as JSON.
 *
 * Usage: iosched-replay <trace.jsonl> [tunables.json]
 *
 * Environment variables:
 * - IOSCHED_DISPLAY_OFF: start with the display off (default: on)
 */

use anyhow::{bail, Context, Result};
use marrow_iosched::{init_tracing, load_trace, Replayer, TunablesConfig};
use std::fs;
use tracing::info;

fn main() -> Result<()> {
    init_tracing();

    let mut args = std::env::args().skip(1);
    let Some(trace_path) = args.next() else {
        bail!("usage: iosched-replay <trace.jsonl> [tunables.json]");
    };

    let overrides = match args.next() {
        Some(path) => {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("reading tunables from {}", path))?;
            let config: TunablesConfig = serde_json::from_str(&text)
                .with_context(|| format!("parsing tunables from {}", path))?;
            Some(config)
        }
        None => None,
    };

    let display_on = !std::env::var("IOSCHED_DISPLAY_OFF")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let events = load_trace(&trace_path).with_context(|| format!("loading {}", trace_path))?;
    info!(path = %trace_path, events = events.len(), display_on, "Replaying trace");

    let report = Replayer::new(display_on, overrides.as_ref())?.run(&events)?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
