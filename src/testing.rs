//! Simulated register file used by the unit tests.
//!
//! Registers are stored per bank (the last value written to `0x7F`). Reads can
//! be scripted per bank/register; once a script runs dry the stored value is
//! returned instead.

use std::collections::{HashMap, VecDeque};

use crate::interface::FlowInterface;
use crate::registers::REG_BANK_SELECT;

// Guards tests against spinning forever on a poll that never resolves.
const MAX_OPS: usize = 1_000_000;

/// One recorded interface operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Write(u8, u8),
    Read(u8, u8),
    ResetBus,
    DelayMs(u32),
    DelayUs(u32),
}

/// Fault injected by [`SimInterface::fail_after`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimFault;

#[derive(Default)]
pub struct SimInterface {
    bank: u8,
    registers: HashMap<(u8, u8), u8>,
    scripts: HashMap<(u8, u8), VecDeque<u8>>,
    ops: Vec<Op>,
    fail_after: Option<usize>,
}

impl SimInterface {
    pub fn new() -> Self {
        Self::default()
    }

    /// A chip that passes both identity checks and keeps the tuning defaults.
    pub fn healthy() -> Self {
        let mut sim = Self::new();
        sim.set(0x00, 0x00, 0x49);
        sim.set(0x00, 0x01, 0x00);
        sim.set(0x00, 0x5F, 0xB8);
        // Non-zero 0x73 skips the calibration block.
        sim.set(0x0E, 0x73, 0x01);
        sim
    }

    pub fn set(&mut self, bank: u8, register: u8, value: u8) {
        self.registers.insert((bank, register), value);
    }

    pub fn value(&self, bank: u8, register: u8) -> u8 {
        self.registers.get(&(bank, register)).copied().unwrap_or(0)
    }

    /// Queues values returned by successive reads of `register` in `bank`.
    pub fn script(&mut self, bank: u8, register: u8, values: &[u8]) {
        self.scripts
            .entry((bank, register))
            .or_default()
            .extend(values.iter().copied());
    }

    /// Makes every operation after the first `ops` ones fail.
    pub fn fail_after(&mut self, ops: usize) {
        self.fail_after = Some(ops);
    }

    pub fn bank(&self) -> u8 {
        self.bank
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    pub fn writes(&self) -> Vec<(u8, u8)> {
        self.ops
            .iter()
            .filter_map(|op| match *op {
                Op::Write(register, value) => Some((register, value)),
                _ => None,
            })
            .collect()
    }

    pub fn reads_of(&self, register: u8) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, Op::Read(r, _) if *r == register))
            .count()
    }

    fn record(&mut self, op: Op) -> Result<(), SimFault> {
        assert!(self.ops.len() < MAX_OPS, "simulated sensor never became ready");
        if let Some(limit) = self.fail_after {
            if self.ops.len() >= limit {
                return Err(SimFault);
            }
        }
        self.ops.push(op);
        Ok(())
    }
}

impl FlowInterface for SimInterface {
    type Error = SimFault;

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), SimFault> {
        let register = register & 0x7F;
        self.record(Op::Write(register, value))?;
        if register == REG_BANK_SELECT {
            self.bank = value;
        } else {
            self.registers.insert((self.bank, register), value);
        }
        Ok(())
    }

    fn read_register(&mut self, register: u8) -> Result<u8, SimFault> {
        let register = register & 0x7F;
        let value = if register == REG_BANK_SELECT {
            self.bank
        } else {
            self.scripts
                .get_mut(&(self.bank, register))
                .and_then(VecDeque::pop_front)
                .unwrap_or_else(|| self.value(self.bank, register))
        };
        self.record(Op::Read(register, value))?;
        Ok(value)
    }

    fn reset_bus(&mut self) -> Result<(), SimFault> {
        self.record(Op::ResetBus)
    }

    fn delay_ms(&mut self, ms: u32) {
        self.ops.push(Op::DelayMs(ms));
    }

    fn delay_us(&mut self, us: u32) {
        self.ops.push(Op::DelayUs(us));
    }
}
