//! Input report reader
//!
//! The K90 reports G-keys, profile buttons, MR and backlight changes as
//! keyboard-page usages inside an ordinary key-array input report:
//!
//! ```text
//! [report_id?] [modifiers] [reserved] [key0] [key1] ... [keyN]
//! ```
//!
//! A dedicated thread reads reports with hidapi, diffs the key array against
//! the previous report and broadcasts one `UsageEvent` per press/release.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use hidapi::HidDevice;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::types::{TimestampedEvent, UsageEvent};

/// Key-array slot value meaning "too many keys held" (phantom state)
const ERROR_ROLLOVER: u8 = 0x01;

/// Offset of the first key slot after modifiers and the reserved byte
const KEY_ARRAY_OFFSET: usize = 2;

/// Broadcast channel capacity for usage events
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Turns successive key-array reports into usage press/release events
#[derive(Debug, Clone, Default)]
pub struct KeyArrayDecoder {
    /// Report ID to strip, if the interface uses numbered reports
    report_id: Option<u8>,
    /// Usages held as of the last accepted report
    held: Vec<u16>,
}

impl KeyArrayDecoder {
    pub fn new(report_id: Option<u8>) -> Self {
        Self {
            report_id,
            held: Vec::new(),
        }
    }

    /// Usages currently held down
    pub fn held(&self) -> &[u16] {
        &self.held
    }

    /// Decode one raw report into the usage changes it carries
    ///
    /// Releases come before presses. Rollover reports are dropped without
    /// touching the held set.
    pub fn decode(&mut self, report: &[u8]) -> Vec<UsageEvent> {
        let body = match (self.report_id, report.split_first()) {
            (Some(id), Some((&first, rest))) if first == id => rest,
            (Some(_), _) => return Vec::new(),
            (None, _) => report,
        };

        let Some(slots) = body.get(KEY_ARRAY_OFFSET..) else {
            return Vec::new();
        };

        if slots.contains(&ERROR_ROLLOVER) {
            debug!("Dropping rollover report");
            return Vec::new();
        }

        let mut now: Vec<u16> = Vec::with_capacity(slots.len());
        for usage in slots.iter().filter(|&&b| b != 0).map(|&b| u16::from(b)) {
            if !now.contains(&usage) {
                now.push(usage);
            }
        }

        let mut events: Vec<UsageEvent> = self
            .held
            .iter()
            .filter(|u| !now.contains(u))
            .map(|&u| UsageEvent::released(u))
            .collect();
        events.extend(
            now.iter()
                .filter(|u| !self.held.contains(u))
                .map(|&u| UsageEvent::pressed(u)),
        );

        self.held = now;
        events
    }
}

/// Configuration for the event reader loop
#[derive(Debug, Clone)]
pub struct EventReaderConfig {
    /// Read timeout in milliseconds (for checking the shutdown flag when idle)
    pub read_timeout_ms: i32,
    /// Sleep duration on error before retrying
    pub error_sleep_ms: u64,
    /// Report ID to strip before decoding
    pub report_id: Option<u8>,
}

impl Default for EventReaderConfig {
    fn default() -> Self {
        Self {
            read_timeout_ms: 50,
            error_sleep_ms: 100,
            report_id: None,
        }
    }
}

/// Background reader that broadcasts usage events
///
/// Dropping the reader signals its thread to exit at the next read timeout.
pub struct EventReader {
    event_tx: broadcast::Sender<TimestampedEvent>,
    shutdown: Arc<AtomicBool>,
}

impl EventReader {
    /// Spawn the reader thread for an opened HID input device
    pub fn spawn(device: HidDevice, config: EventReaderConfig) -> std::io::Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let (tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let tx_clone = tx.clone();
        let shutdown_clone = shutdown.clone();

        std::thread::Builder::new()
            .name("k90-event-reader".into())
            .spawn(move || run_event_reader_loop(device, tx_clone, shutdown_clone, config))?;

        Ok(Self {
            event_tx: tx,
            shutdown,
        })
    }

    /// Subscribe to usage events
    pub fn subscribe(&self) -> broadcast::Receiver<TimestampedEvent> {
        self.event_tx.subscribe()
    }

    /// Ask the reader thread to stop
    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        self.stop();
        debug!("EventReader dropped, signaling reader shutdown");
    }
}

/// Reader loop: runs until the shutdown flag is set
fn run_event_reader_loop(
    input_device: HidDevice,
    tx: broadcast::Sender<TimestampedEvent>,
    shutdown: Arc<AtomicBool>,
    config: EventReaderConfig,
) {
    debug!("Event reader thread started");
    let mut buf = [0u8; 64];
    let mut decoder = KeyArrayDecoder::new(config.report_id);
    let start_time = Instant::now();

    while !shutdown.load(Ordering::Relaxed) {
        match input_device.read_timeout(&mut buf, config.read_timeout_ms) {
            Ok(len) if len > 0 => {
                let timestamp = start_time.elapsed().as_secs_f64();
                debug!(
                    "Event reader got {} bytes at {:.3}s: {:02X?}",
                    len,
                    timestamp,
                    &buf[..len.min(16)]
                );
                for event in decoder.decode(&buf[..len]) {
                    // No receivers is fine
                    let _ = tx.send(TimestampedEvent::new(timestamp, event));
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("Event reader error: {}", e);
                std::thread::sleep(Duration::from_millis(config.error_sleep_ms));
            }
        }
    }

    debug!("Event reader thread exiting");
}
