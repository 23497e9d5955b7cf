//! Scripted in-memory transport
//!
//! Records every control request and answers from queues of canned results.
//! Enabled for this crate's tests and, via the `test-util` feature, for
//! downstream crates.

use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::error::TransportError;
use crate::types::TransportDeviceInfo;
use crate::{device_registry, ControlTransport};

/// One recorded control request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCall {
    Out { request: u8, value: u16 },
    In { request: u8, value: u16, len: usize },
}

/// Transport double with queued results
///
/// When a queue is empty, OUT requests succeed and IN requests time out.
pub struct ScriptedTransport {
    info: TransportDeviceInfo,
    calls: Mutex<Vec<ControlCall>>,
    out_results: Mutex<VecDeque<Result<(), TransportError>>>,
    in_results: Mutex<VecDeque<Result<Vec<u8>, TransportError>>>,
}

impl Default for ScriptedTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            info: TransportDeviceInfo {
                vid: device_registry::VENDOR_ID,
                pid: device_registry::PRODUCT_ID,
                product_name: Some("Scripted K90".into()),
                ..Default::default()
            },
            calls: Mutex::new(Vec::new()),
            out_results: Mutex::new(VecDeque::new()),
            in_results: Mutex::new(VecDeque::new()),
        }
    }

    /// Transport whose first status query returns `reply`
    pub fn with_status(reply: [u8; 8]) -> Self {
        let t = Self::new();
        t.push_in_result(Ok(reply.to_vec()));
        t
    }

    /// Queue the result of the next OUT request
    pub fn push_out_result(&self, result: Result<(), TransportError>) {
        self.out_results.lock().push_back(result);
    }

    /// Queue the result of the next IN request
    pub fn push_in_result(&self, result: Result<Vec<u8>, TransportError>) {
        self.in_results.lock().push_back(result);
    }

    /// All requests seen so far, in order
    pub fn calls(&self) -> Vec<ControlCall> {
        self.calls.lock().clone()
    }

    /// OUT requests seen so far, as (request, value)
    pub fn out_calls(&self) -> Vec<(u8, u16)> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match *c {
                ControlCall::Out { request, value } => Some((request, value)),
                ControlCall::In { .. } => None,
            })
            .collect()
    }
}

impl ControlTransport for ScriptedTransport {
    fn control_out(&self, request: u8, value: u16) -> Result<(), TransportError> {
        self.calls.lock().push(ControlCall::Out { request, value });
        self.out_results.lock().pop_front().unwrap_or(Ok(()))
    }

    fn control_in(&self, request: u8, value: u16, len: usize) -> Result<Vec<u8>, TransportError> {
        self.calls
            .lock()
            .push(ControlCall::In { request, value, len });
        self.in_results
            .lock()
            .pop_front()
            .unwrap_or(Err(TransportError::Timeout))
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        &self.info
    }
}
