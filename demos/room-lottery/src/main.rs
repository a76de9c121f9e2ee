use std::fs::File;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use roomdraw::prelude::*;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct Report<'a> {
    draw: DrawId,
    preview_frames: u64,
    assigned: usize,
    entries: usize,
    rooms: &'a [Assignment],
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

const USAGE: &str = "usage: room-lottery <dataset.json> [roll-ms] [seed]";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let mut args = std::env::args().skip(1);
    let path = args.next().ok_or(USAGE)?;
    let roll_ms: u64 = match args.next() {
        Some(ms) => ms.parse()?,
        None => 1_500,
    };
    let seed: Option<u64> = args.next().map(|s| s.parse()).transpose()?;

    let entries = entries_from_reader(File::open(&path)?)?;
    tracing::info!(%path, entries = entries.len(), "dataset loaded");

    let config = DrawConfig {
        seed,
        ..DrawConfig::default()
    };
    let mut manager = DrawManager::new(config);
    let draw_id = manager.create_draw();
    let session = manager.session(draw_id)?;

    session.initialize(entries.clone()).await?;

    let frames = Arc::new(AtomicU64::new(0));
    let counter = Arc::clone(&frames);
    session
        .start_rolling(move |rows: &[Assignment], _rolling: bool| {
            let n = counter.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(row) = rows.first() {
                tracing::debug!(frame = n, preview = %row, "rolling");
            }
        })
        .await?;

    tokio::time::sleep(Duration::from_millis(roll_ms)).await;

    let mut result = session
        .stop_rolling(|rows: &[Assignment], _rolling: bool| {
            tracing::info!(assigned = rows.len(), "lottery stopped");
        })
        .await?;
    sort_by_room_label(&mut result);

    if result.len() < entries.len() {
        tracing::warn!(
            unmatched = entries.len() - result.len(),
            "some rows were not matched"
        );
    }

    let report = Report {
        draw: draw_id,
        preview_frames: frames.load(Ordering::Relaxed),
        assigned: result.len(),
        entries: entries.len(),
        rooms: &result,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    manager.shutdown_all().await;
    Ok(())
}
