//! Per-operator artificial delay configuration, read from the environment
//! by the orchestrator binary and threaded down into the Graph Builder.

use crate::types::Operator;

#[derive(Clone, Copy, Debug)]
pub struct DelayConfig {
    pub add_ms: u64,
    pub sub_ms: u64,
    pub mul_ms: u64,
    pub div_ms: u64,
}

impl DelayConfig {
    pub fn get(&self, op: Operator) -> u64 {
        match op {
            Operator::Add => self.add_ms,
            Operator::Sub => self.sub_ms,
            Operator::Mul => self.mul_ms,
            Operator::Div => self.div_ms,
        }
    }
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            add_ms: 1000,
            sub_ms: 1000,
            mul_ms: 1000,
            div_ms: 1000,
        }
    }
}
