//! Long-running driver loop.
//!
//! Usage events from the HID reader and control lines from stdin are funneled
//! into one channel and handled on the main thread, so device reports and
//! attribute writes are applied in arrival order.

use std::io::{BufRead, Write};
use std::sync::atomic::Ordering;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Context, Result};
use hidapi::HidApi;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use k90_driver::{handle_line, DriverConfig, VirtualKeyboard};
use k90_keyboard::EventDisposition;
use k90_transport::{open_input_device, EventReader, TimestampedEvent, PRIMARY_INTERFACE};

use super::{setup_interrupt_handler, Session};

/// How often the main loop checks the shutdown flag when idle
const IDLE_POLL: Duration = Duration::from_millis(200);

enum Input {
    Usage(TimestampedEvent),
    Line(String),
    StdinClosed,
}

/// Run the driver until Ctrl-C
pub fn run(config: &DriverConfig, monitor: bool) -> Result<()> {
    let session = Session::open(config, monitor)?;

    let keys = session.driver.mapped_keys();
    let mut keyboard = VirtualKeyboard::new(&config.virtual_device_name, &keys)
        .context("creating virtual keyboard")?;
    info!("Created virtual keyboard: {}", config.virtual_device_name);
    if let Some(path) = keyboard.device_path() {
        info!("Device path: {}", path.display());
    }

    let api = HidApi::new()?;
    let input = open_input_device(&api, PRIMARY_INTERFACE)?;
    let reader = EventReader::spawn(input, config.reader_config())?;

    let (tx, rx) = mpsc::channel();
    spawn_event_forwarder(reader.subscribe(), tx.clone())?;
    spawn_stdin_reader(tx)?;

    let running = setup_interrupt_handler();
    info!("Entering main loop. Press Ctrl+C to exit.");

    while running.load(Ordering::SeqCst) {
        let input = match rx.recv_timeout(IDLE_POLL) {
            Ok(input) => input,
            Err(mpsc::RecvTimeoutError::Timeout) => continue,
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        };

        match input {
            Input::Usage(ev) => {
                let usage = ev.event.usage;
                match session.driver.raw_event(session.primary, usage, ev.event.value)? {
                    EventDisposition::GKey {
                        gkey,
                        code,
                        pressed,
                    } => {
                        debug!("[{:.3}] {gkey} pressed={pressed}", ev.timestamp);
                        if let Err(e) = keyboard.emit_key(code, pressed) {
                            warn!("Failed to emit {gkey}: {e}");
                        }
                    }
                    EventDisposition::StateChanged(change) => {
                        info!("K90 reported {change:?}");
                    }
                    EventDisposition::Ignored | EventDisposition::PassThrough => {}
                }
            }
            Input::Line(line) => {
                if let Some(reply) = handle_line(&session.driver, session.primary, &line) {
                    let mut out = std::io::stdout().lock();
                    out.write_all(reply.as_bytes())?;
                    out.flush()?;
                }
            }
            Input::StdinClosed => {
                debug!("stdin closed, control surface disabled");
            }
        }
    }

    info!("Shutting down");
    reader.stop();
    drop(reader);
    session.close();
    Ok(())
}

/// Move usage events from the broadcast channel into the main loop
fn spawn_event_forwarder(
    mut events: broadcast::Receiver<TimestampedEvent>,
    tx: mpsc::Sender<Input>,
) -> std::io::Result<()> {
    std::thread::Builder::new()
        .name("k90-event-forwarder".into())
        .spawn(move || loop {
            match events.blocking_recv() {
                Ok(ev) => {
                    if tx.send(Input::Usage(ev)).is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!("Dropped {n} input events");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        })?;
    Ok(())
}

/// Forward stdin lines as control requests
fn spawn_stdin_reader(tx: mpsc::Sender<Input>) -> std::io::Result<()> {
    std::thread::Builder::new()
        .name("k90-control".into())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(Input::Line(line)).is_err() {
                    return;
                }
            }
            let _ = tx.send(Input::StdinClosed);
        })?;
    Ok(())
}
