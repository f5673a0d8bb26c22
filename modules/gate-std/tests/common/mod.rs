#![allow(dead_code)]

use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;
use nexus_gate_core_rs::{ClosePolicy, Gate, GateBackend, GateConfigOption};
use nexus_gate_std_rs::{ChannelGateBackend, CondvarGateBackend};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
  Condvar,
  Channel,
}

pub fn init_tracing() {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_test_writer()
    .try_init();
}

/// Runs `scenario` against the requested backend.
pub fn with_backend<F>(kind: BackendKind, scenario: F)
where
  F: BackendScenario, {
  match kind {
    BackendKind::Condvar => scenario.run::<CondvarGateBackend>(),
    BackendKind::Channel => scenario.run::<ChannelGateBackend>(),
  }
}

pub trait BackendScenario {
  fn run<B>(self)
  where
    B: GateBackend + Send + Sync + 'static;
}

pub fn new_gate<B>(name: &str, policy: ClosePolicy) -> Gate<B>
where
  B: GateBackend, {
  Gate::from_options(vec![
    GateConfigOption::with_name(name),
    GateConfigOption::with_close_policy(policy),
  ])
}

/// Spawns `count` threads blocked in `wait`. The receiver yields once per
/// returned wait.
pub fn spawn_waiters<B>(gate: &Gate<B>, count: usize) -> Receiver<()>
where
  B: GateBackend + Send + Sync + 'static, {
  let (tx, rx) = crossbeam_channel::unbounded();
  for _ in 0..count {
    let gate = gate.clone();
    let tx = tx.clone();
    thread::spawn(move || {
      gate.wait();
      let _ = tx.send(());
    });
  }
  rx
}

/// Whether `count` messages arrive on `rx` before `within` elapses.
pub fn received_all(rx: &Receiver<()>, count: usize, within: Duration) -> bool {
  let deadline = Instant::now() + within;
  (0..count).all(|_| rx.recv_deadline(deadline).is_ok())
}

pub fn wait_for_waiters<B>(gate: &Gate<B>, expected: usize)
where
  B: GateBackend, {
  let deadline = Instant::now() + Duration::from_secs(5);
  while gate.snapshot().waiters < expected {
    assert!(Instant::now() < deadline, "waiters never registered");
    thread::sleep(Duration::from_millis(1));
  }
}
