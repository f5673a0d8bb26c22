use alloc::vec::Vec;
use core::mem;

use crate::config::ClosePolicy;
use crate::error::GateError;


/// ゲートのすべての操作が直列化される共有状態
///
/// `GateState`自身はロックを持ちません。バックエンドはクリティカルセクション内に1つだけ保持し、
/// セクションを保持したままこれらのメソッドを呼び出します。
/// 返された値（特に再開する待機者）はセクションを解放した後に処理します。
///
/// # 型パラメータ
///
/// * `W` - バックエンドの一回限りの通知ハンドル。待機者の再開は[`Released`]で返されたハンドルのドロップまたは通知で行う
#[derive(Debug)]
pub struct GateState<W> {
  count: usize,
  closed: bool,
  waiters: Vec<W>,
  cycles: u64,
}

/// [`GateState::add`]の結果
#[derive(Debug)]
pub enum Admission<W> {
  /// ゲートが閉じているため何も変更していない
  Refused,
  Accepted(Released<W>),
}

/// カウンタが0になったことで状態から切り離された待機者
#[derive(Debug)]
pub struct Released<W> {
  waiters: Vec<W>,
  cycle: Option<u64>,
}

/// [`GateState::register_wait`]の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitRegistration {
  /// カウンタは既に0
  Ready,
  /// [`GateState::cycles`]が`cycle`を超えるまで呼び出し側はブロックする
  Pending { cycle: u64 },
}

/// ゲートの状態の一貫したコピー
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GateSnapshot {
  pub count: usize,
  pub closed: bool,
  pub waiters: usize,
  pub cycles: u64,
}

impl<W> Released<W> {
  fn none() -> Self {
    Self {
      waiters: Vec::new(),
      cycle: None,
    }
  }

  /// 操作によってカウンタが0になったかどうか
  pub fn is_drained(&self) -> bool {
    self.cycle.is_some()
  }

  /// 遷移によって完了したサイクル
  pub fn cycle(&self) -> Option<u64> {
    self.cycle
  }

  pub fn len(&self) -> usize {
    self.waiters.len()
  }

  pub fn is_empty(&self) -> bool {
    self.waiters.is_empty()
  }

  pub fn into_waiters(self) -> Vec<W> {
    self.waiters
  }
}

impl<W> Admission<W> {
  pub fn is_accepted(&self) -> bool {
    matches!(self, Admission::Accepted(_))
  }
}

impl<W> Default for GateState<W> {
  fn default() -> Self {
    Self::new()
  }
}

impl<W> GateState<W> {
  pub const fn new() -> Self {
    Self {
      count: 0,
      closed: false,
      waiters: Vec::new(),
      cycles: 0,
    }
  }

  pub fn count(&self) -> usize {
    self.count
  }

  pub fn is_closed(&self) -> bool {
    self.closed
  }

  pub fn waiter_count(&self) -> usize {
    self.waiters.len()
  }

  /// これまでにカウンタが非0から0に遷移した回数
  pub fn cycles(&self) -> u64 {
    self.cycles
  }

  pub fn snapshot(&self) -> GateSnapshot {
    GateSnapshot {
      count: self.count,
      closed: self.closed,
      waiters: self.waiters.len(),
      cycles: self.cycles,
    }
  }

  /// ゲートが閉じていなければ`delta`個のジョブを登録
  ///
  /// # 引数
  ///
  /// * `delta` - 加算する値（負の値も可）
  ///
  /// # 戻り値
  ///
  /// 受け付けた場合は[`Admission::Accepted`]、閉じている場合は[`Admission::Refused`]。
  /// エラーの場合、状態は変更されません。
  pub fn add(&mut self, delta: isize) -> Result<Admission<W>, GateError> {
    if self.closed {
      return Ok(Admission::Refused);
    }
    self.apply(delta).map(Admission::Accepted)
  }

  /// ジョブを1つ完了させる。`closed`は参照しない
  pub fn done(&mut self) -> Result<Released<W>, GateError> {
    self.apply(-1)
  }

  /// ゲートを閉じる
  ///
  /// # 戻り値
  ///
  /// この呼び出しでフラグが変化した場合は`true`
  pub fn close(&mut self) -> bool {
    !mem::replace(&mut self.closed, true)
  }

  /// カウンタを確認し、呼び出し側がブロックすべきかを1ステップで判定
  ///
  /// [`ClosePolicy::OnWait`]の場合は先にゲートを閉じます。
  /// `Pending`の場合、呼び出し側はセクションを抜ける前に[`push_waiter`](Self::push_waiter)を呼び出します。
  pub fn register_wait(&mut self, policy: ClosePolicy) -> WaitRegistration {
    if policy.closes_on_wait() {
      self.closed = true;
    }
    if self.count == 0 {
      WaitRegistration::Ready
    } else {
      WaitRegistration::Pending { cycle: self.cycles }
    }
  }

  pub fn push_waiter(&mut self, waiter: W) {
    debug_assert!(self.count != 0, "waiter registered while the counter is zero");
    self.waiters.push(waiter);
  }

  /// `cycle`中に登録した待機者が戻ってよいかどうか
  pub fn is_released(&self, cycle: u64) -> bool {
    self.cycles > cycle
  }

  fn apply(&mut self, delta: isize) -> Result<Released<W>, GateError> {
    let count = self.count;
    let next = if delta >= 0 {
      count
        .checked_add(delta.unsigned_abs())
        .ok_or(GateError::CounterOverflow { count, delta })?
    } else {
      count
        .checked_sub(delta.unsigned_abs())
        .ok_or(GateError::NegativeCounter { count, delta })?
    };
    self.count = next;
    if next == 0 && count != 0 {
      self.cycles += 1;
      Ok(Released {
        waiters: mem::take(&mut self.waiters),
        cycle: Some(self.cycles),
      })
    } else {
      Ok(Released::none())
    }
  }
}
