use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use nexus_gate_core_rs::{
  contract_violation, Admission, Gate as CoreGate, GateBackend, GateConfig, GateSnapshot, GateState, Released,
  WaitRegistration,
};
use parking_lot::{Condvar, Mutex};


/// MutexとCondvarによるゲートのバックエンド実装
///
/// Mutexがクリティカルセクションです。カウンタが0になるとサイクル数を進め、Condvarで全待機者に通知します。
/// 各待機者は登録したサイクルが完了するまで待機するため、スプリアスウェイクアップや
/// 通知直後に登録されたジョブによって待機し続けることはありません。
#[derive(Clone)]
pub struct CondvarGateBackend {
  inner: Arc<Inner>,
}

struct Inner {
  config: GateConfig,
  state: Mutex<GateState<()>>,
  zero: Condvar,
}

impl Debug for CondvarGateBackend {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CondvarGateBackend")
      .field("name", &self.inner.config.name)
      .field("state", &self.snapshot())
      .finish()
  }
}

impl CondvarGateBackend {
  fn wake(&self, released: Released<()>) {
    if let Some(cycle) = released.cycle() {
      tracing::debug!(
        gate = %self.inner.config.name,
        released = released.len(),
        cycle,
        "counter reached zero"
      );
      if !released.is_empty() {
        self.inner.zero.notify_all();
      }
    }
  }
}

impl GateBackend for CondvarGateBackend {
  fn new(config: GateConfig) -> Self {
    Self {
      inner: Arc::new(Inner {
        config,
        state: Mutex::new(GateState::new()),
        zero: Condvar::new(),
      }),
    }
  }

  fn config(&self) -> &GateConfig {
    &self.inner.config
  }

  fn add(&self, delta: isize) -> bool {
    let result = self.inner.state.lock().add(delta);
    match result {
      Ok(Admission::Accepted(released)) => {
        self.wake(released);
        true
      }
      Ok(Admission::Refused) => {
        tracing::trace!(gate = %self.inner.config.name, delta, "gate closed, job refused");
        false
      }
      Err(err) => contract_violation(&self.inner.config.name, err),
    }
  }

  fn done(&self) {
    let result = self.inner.state.lock().done();
    match result {
      Ok(released) => self.wake(released),
      Err(err) => contract_violation(&self.inner.config.name, err),
    }
  }

  fn wait(&self) {
    let mut state = self.inner.state.lock();
    let was_closed = state.is_closed();
    let registration = state.register_wait(self.inner.config.close_policy);
    if !was_closed && state.is_closed() {
      tracing::debug!(gate = %self.inner.config.name, "gate closed by wait");
    }
    if let WaitRegistration::Pending { cycle } = registration {
      tracing::trace!(gate = %self.inner.config.name, count = state.count(), "waiting for jobs");
      state.push_waiter(());
      while !state.is_released(cycle) {
        self.inner.zero.wait(&mut state);
      }
    }
  }

  fn finish(&self) {
    if self.inner.state.lock().close() {
      tracing::debug!(gate = %self.inner.config.name, "gate closed by finish");
    }
  }

  fn snapshot(&self) -> GateSnapshot {
    self.inner.state.lock().snapshot()
  }
}

/// MutexとCondvarのバックエンドを使用するGate
pub type Gate = CoreGate<CondvarGateBackend>;
