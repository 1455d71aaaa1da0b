//! Replays device events through the reading processor.
//!
//! Reads one event JSON object per line from stdin and writes every
//! processed reading as one JSON object per line to stdout.
//!
//! ```bash
//! cat events.jsonl | RUST_LOG=debug cargo run --bin sensor-replay
//! ```

use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

use futures::executor::block_on;
use sensor_processor::{Event, EventQueue, ProcessedReadingBatch, ReadingDispatcher};

/// How often the consumer looks for queued events.
const DRAIN_INTERVAL: Duration = Duration::from_millis(100);

static EVENTS: EventQueue<4> = EventQueue::new();

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format_timestamp_nanos()
        .init();

    let producer = thread::spawn(|| -> io::Result<usize> {
        let mut received = 0;
        for line in io::stdin().lock().lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match Event::from_json(line.as_bytes()) {
                Ok(event) if event.is_sensor_event() => {
                    block_on(EVENTS.send(event));
                    received += 1;
                }
                Ok(_) => log::debug!("Ignoring non-sensor event"),
                Err(e) => log::warn!("Undecodable event: {}", e),
            }
        }
        Ok(received)
    });

    let dispatcher = ReadingDispatcher::default();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut write_error = None;
    let mut sink = |reading: &ProcessedReadingBatch| {
        let result = serde_json::to_string(reading)
            .map_err(io::Error::from)
            .and_then(|line| writeln!(out, "{}", line));
        if let Err(e) = result {
            write_error.get_or_insert(e);
        }
    };

    let mut delivered = 0;
    loop {
        let finished = producer.is_finished();
        delivered += EVENTS.drain(&dispatcher, &mut sink);
        if finished {
            break;
        }
        thread::sleep(DRAIN_INTERVAL);
    }
    drop(sink);

    if let Some(e) = write_error {
        return Err(e.into());
    }
    out.flush()?;

    let received = producer
        .join()
        .map_err(|_| "event reader panicked")??;
    log::info!("Processed {} readings from {} events", delivered, received);
    Ok(())
}
