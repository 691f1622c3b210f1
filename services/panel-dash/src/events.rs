// services/panel-dash/src/events.rs
//
// Subscriber for the backend's server-sent event stream. One reader thread
// per subscription feeds raw payload lines to the UI loop over a channel.
// A failed stream is reported and torn down, never retried automatically.

use std::io::{BufRead, BufReader};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub enum StreamEvent {
    Line(String),
    Closed(String),
}

pub struct EventStream {
    rx: Receiver<StreamEvent>,
    stop: Arc<AtomicBool>,
    /// Subscription generation; lets the panel label which subscription a
    /// diagnostic came from after rapid reselects.
    pub generation: u64,
}

impl EventStream {
    pub fn subscribe(services_url: &str, generation: u64) -> Self {
        let (tx, rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let url = format!(
            "{}/services/events/",
            services_url.trim_end_matches('/')
        );
        let flag = Arc::clone(&stop);
        // Detached on purpose: close() signals the flag and the reader
        // exits on its own; joining would block the UI on a quiet stream.
        let _ = thread::spawn(move || run_reader(url, tx, flag));
        EventStream {
            rx,
            stop,
            generation,
        }
    }

    /// Non-blocking drain step, called once per UI tick.
    pub fn try_next(&self) -> Option<StreamEvent> {
        self.rx.try_recv().ok()
    }

    /// Explicit teardown. The reader notices the flag at the next line (or
    /// transport error) and exits; the connection drops with the response.
    pub fn close(self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

fn run_reader(url: String, tx: Sender<StreamEvent>, stop: Arc<AtomicBool>) {
    let client = match reqwest::blocking::Client::builder()
        .timeout(None::<Duration>)
        .build()
    {
        Ok(c) => c,
        Err(e) => {
            let _ = tx.send(StreamEvent::Closed(e.to_string()));
            return;
        }
    };

    let response = match client.get(&url).send() {
        Ok(r) => r,
        Err(e) => {
            let _ = tx.send(StreamEvent::Closed(e.to_string()));
            return;
        }
    };
    if !response.status().is_success() {
        let _ = tx.send(StreamEvent::Closed(format!("HTTP {}", response.status())));
        return;
    }

    let reader = BufReader::new(response);
    for line in reader.lines() {
        if stop.load(Ordering::Relaxed) {
            return;
        }
        match line {
            Ok(raw) => {
                if let Some(payload) = parse_sse_line(&raw) {
                    if tx.send(StreamEvent::Line(payload)).is_err() {
                        return;
                    }
                }
            }
            Err(e) => {
                let _ = tx.send(StreamEvent::Closed(e.to_string()));
                return;
            }
        }
    }
    let _ = tx.send(StreamEvent::Closed("stream ended".to_string()));
}

/// Extracts the payload of a `data:` line. Blank separator lines and other
/// SSE fields (`event:`, `id:`, comments) carry no payload here.
fn parse_sse_line(line: &str) -> Option<String> {
    let payload = line.strip_prefix("data:")?;
    Some(payload.strip_prefix(' ').unwrap_or(payload).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_data_payload() {
        assert_eq!(
            parse_sse_line("data: {\"node_id\": \"WN01\"}").as_deref(),
            Some("{\"node_id\": \"WN01\"}")
        );
        assert_eq!(parse_sse_line("data:x").as_deref(), Some("x"));
    }

    #[test]
    fn ignores_non_data_lines() {
        assert_eq!(parse_sse_line(""), None);
        assert_eq!(parse_sse_line(": keep-alive"), None);
        assert_eq!(parse_sse_line("event: services"), None);
        assert_eq!(parse_sse_line("id: 42"), None);
    }

    #[test]
    fn keeps_leading_whitespace_past_the_first_space() {
        assert_eq!(parse_sse_line("data:  spaced").as_deref(), Some(" spaced"));
    }
}
