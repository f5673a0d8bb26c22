use std::fmt::{Debug, Formatter};
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use nexus_gate_core_rs::{
  contract_violation, Admission, Gate as CoreGate, GateBackend, GateConfig, GateSnapshot, GateState, Released,
  WaitRegistration,
};


type Waiter = Sender<()>;

/// ロックせずに状態を受け渡すゲートのバックエンド実装
///
/// 状態は容量1のチャネルに格納されています。各操作は状態を受信し、処理した後に送り返します。
/// 状態を保持している間がクリティカルセクションです。
///
/// ブロックする`wait`は、容量0のチャネルを新たに作成して送信側を待機者リストに登録し、受信側でブロックします。
/// カウンタが0になると登録済みの送信側がすべてドロップされ、切断によりすべての受信側が一斉に再開されます。
#[derive(Clone)]
pub struct ChannelGateBackend {
  inner: Arc<Inner>,
}

struct Inner {
  config: GateConfig,
  slot_tx: Sender<GateState<Waiter>>,
  slot_rx: Receiver<GateState<Waiter>>,
}

/// スロットから取り出した状態。パニックによる巻き戻し時も含め、ドロップ時にスロットへ戻されます
struct Checkout<'a> {
  inner: &'a Inner,
  state: Option<GateState<Waiter>>,
}

impl Deref for Checkout<'_> {
  type Target = GateState<Waiter>;

  fn deref(&self) -> &Self::Target {
    match self.state.as_ref() {
      Some(state) => state,
      None => unreachable!("gate state is checked out until drop"),
    }
  }
}

impl DerefMut for Checkout<'_> {
  fn deref_mut(&mut self) -> &mut Self::Target {
    match self.state.as_mut() {
      Some(state) => state,
      None => unreachable!("gate state is checked out until drop"),
    }
  }
}

impl Drop for Checkout<'_> {
  fn drop(&mut self) {
    if let Some(state) = self.state.take() {
      // the slot is empty while we hold the record, so this never blocks
      let _ = self.inner.slot_tx.send(state);
    }
  }
}

impl Inner {
  fn checkout(&self) -> Checkout<'_> {
    // both channel ends live as long as `Inner`, so the slot never disconnects
    let state = self.slot_rx.recv().ok();
    debug_assert!(state.is_some(), "gate slot disconnected");
    Checkout { inner: self, state }
  }
}

impl Debug for ChannelGateBackend {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ChannelGateBackend")
      .field("name", &self.inner.config.name)
      .field("state", &self.snapshot())
      .finish()
  }
}

impl ChannelGateBackend {
  fn wake(&self, released: Released<Waiter>) {
    if let Some(cycle) = released.cycle() {
      tracing::debug!(
        gate = %self.inner.config.name,
        released = released.len(),
        cycle,
        "counter reached zero"
      );
    }
    // dropping the senders closes every waiter's channel
    drop(released.into_waiters());
  }
}

impl GateBackend for ChannelGateBackend {
  fn new(config: GateConfig) -> Self {
    let (slot_tx, slot_rx) = crossbeam_channel::bounded(1);
    let seeded = slot_tx.send(GateState::new());
    debug_assert!(seeded.is_ok(), "gate slot rejected the initial state");
    Self {
      inner: Arc::new(Inner {
        config,
        slot_tx,
        slot_rx,
      }),
    }
  }

  fn config(&self) -> &GateConfig {
    &self.inner.config
  }

  fn add(&self, delta: isize) -> bool {
    let result = self.inner.checkout().add(delta);
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
    let result = self.inner.checkout().done();
    match result {
      Ok(released) => self.wake(released),
      Err(err) => contract_violation(&self.inner.config.name, err),
    }
  }

  fn wait(&self) {
    let receiver = {
      let mut state = self.inner.checkout();
      let was_closed = state.is_closed();
      let registration = state.register_wait(self.inner.config.close_policy);
      if !was_closed && state.is_closed() {
        tracing::debug!(gate = %self.inner.config.name, "gate closed by wait");
      }
      match registration {
        WaitRegistration::Ready => return,
        WaitRegistration::Pending { .. } => {
          tracing::trace!(gate = %self.inner.config.name, count = state.count(), "waiting for jobs");
          let (tx, rx) = crossbeam_channel::bounded::<()>(0);
          state.push_waiter(tx);
          rx
        }
      }
    };
    // nothing is ever sent; the sender being dropped is the signal
    let _ = receiver.recv();
  }

  fn finish(&self) {
    if self.inner.checkout().close() {
      tracing::debug!(gate = %self.inner.config.name, "gate closed by finish");
    }
  }

  fn snapshot(&self) -> GateSnapshot {
    self.inner.checkout().snapshot()
  }
}

/// チャネルで状態を受け渡すバックエンドを使用するGate
pub type ChannelGate = CoreGate<ChannelGateBackend>;
