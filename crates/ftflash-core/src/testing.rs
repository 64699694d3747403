//! Scripted bus used by the unit tests
//!
//! Rules match on a prefix of the written bytes; the longest matching
//! prefix wins. Every transaction and delay is recorded.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::bus::I2cMaster;
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct Transaction {
    pub addr: u8,
    pub write: Vec<u8>,
    pub read_len: usize,
}

struct Rule {
    prefix: Vec<u8>,
    responses: VecDeque<Vec<u8>>,
}

struct Failure {
    prefix: Vec<u8>,
    remaining: Option<u32>,
}

#[derive(Default)]
pub struct ScriptedBus {
    pub log: Vec<Transaction>,
    pub delays: Vec<u32>,
    rules: Vec<Rule>,
    failures: Vec<Failure>,
}

impl ScriptedBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer reads whose write phase starts with `prefix`
    ///
    /// Repeated calls for the same prefix queue responses; the last one
    /// stays in place once the queue drains.
    pub fn respond(&mut self, prefix: &[u8], response: &[u8]) {
        if let Some(rule) = self.rules.iter_mut().find(|r| r.prefix == prefix) {
            rule.responses.push_back(response.to_vec());
            return;
        }
        let mut responses = VecDeque::new();
        responses.push_back(response.to_vec());
        self.rules.push(Rule {
            prefix: prefix.to_vec(),
            responses,
        });
    }

    /// Fail every transaction whose write phase starts with `prefix`
    pub fn fail_on(&mut self, prefix: &[u8]) {
        self.failures.push(Failure {
            prefix: prefix.to_vec(),
            remaining: None,
        });
    }

    /// Fail the next `times` transactions whose write phase starts with `prefix`
    pub fn fail_times(&mut self, prefix: &[u8], times: u32) {
        self.failures.push(Failure {
            prefix: prefix.to_vec(),
            remaining: Some(times),
        });
    }

    /// Write phases of all recorded transactions
    pub fn writes(&self) -> Vec<&[u8]> {
        self.log.iter().map(|t| t.write.as_slice()).collect()
    }

    /// Recorded transactions whose write phase starts with `prefix`
    pub fn count(&self, prefix: &[u8]) -> usize {
        self.log
            .iter()
            .filter(|t| t.write.starts_with(prefix))
            .count()
    }

    fn should_fail(&mut self, write: &[u8]) -> bool {
        for failure in &mut self.failures {
            if !write.starts_with(&failure.prefix) {
                continue;
            }
            match &mut failure.remaining {
                None => return true,
                Some(0) => {}
                Some(n) => {
                    *n -= 1;
                    return true;
                }
            }
        }
        false
    }
}

impl I2cMaster for ScriptedBus {
    fn transact(&mut self, addr: u8, write: &[u8], read: &mut [u8]) -> Result<()> {
        self.log.push(Transaction {
            addr,
            write: write.to_vec(),
            read_len: read.len(),
        });

        if self.should_fail(write) {
            return Err(Error::BusTransaction);
        }

        read.fill(0);
        let rule = self
            .rules
            .iter_mut()
            .filter(|r| write.starts_with(&r.prefix))
            .max_by_key(|r| r.prefix.len());
        if let Some(rule) = rule {
            let response = if rule.responses.len() > 1 {
                rule.responses.pop_front().unwrap_or_default()
            } else {
                rule.responses.front().cloned().unwrap_or_default()
            };
            let n = core::cmp::min(read.len(), response.len());
            read[..n].copy_from_slice(&response[..n]);
        }
        Ok(())
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delays.push(ms);
    }
}
