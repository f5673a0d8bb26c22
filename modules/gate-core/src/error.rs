use alloc::string::String;

use thiserror::Error;

/// ゲートが検出した呼び出し側のバグ
///
/// 呼び出し側に返されることはありません。検出したバックエンドは[`contract_violation`]に渡し、
/// クリティカルセクションを解放した後にパニックで呼び出しを中断します。
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GateError {
  #[error("negative counter (count = {count}, delta = {delta})")]
  NegativeCounter { count: usize, delta: isize },
  #[error("counter overflow (count = {count}, delta = {delta})")]
  CounterOverflow { count: usize, delta: isize },
}

/// 文字列から[`GateConfig`](crate::GateConfig)を構築する際のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GateConfigError {
  #[error("invalid close policy: {value:?} (expected `explicit` or `on-wait`)")]
  InvalidClosePolicy { value: String },
  #[error("invalid value for {name}: {reason}")]
  InvalidVariable { name: String, reason: String },
}

/// 契約違反をログに記録し、呼び出し中の操作をパニックで中断する
///
/// # 引数
///
/// * `gate` - ゲート名
/// * `err` - 検出された契約違反
#[cold]
#[track_caller]
pub fn contract_violation(gate: &str, err: GateError) -> ! {
  tracing::error!(gate = %gate, error = %err, "gate contract violation");
  panic!("nexus-gate: contract violation: {}", err)
}
