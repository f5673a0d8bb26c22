use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt::{Display, Formatter};
use core::str::FromStr;

use crate::error::GateConfigError;

#[cfg(test)]
mod tests;

/// ゲートが新しいジョブの受け付けを停止する契機を決めるポリシー
///
/// 2つのポリシーは排他的で、呼び出し側から見えるタイミングが異なります。
///
/// - [`ClosePolicy::Explicit`]: [`Gate::finish`](crate::Gate::finish)が呼ばれたときのみ閉じる。
///   `wait`は何度呼んでも登録に影響しない
/// - [`ClosePolicy::OnWait`]: 最初の[`Gate::wait`](crate::Gate::wait)の呼び出しで閉じる。
///   ブロックするかどうかは問わない。`finish`は無視される
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ClosePolicy {
  #[default]
  Explicit,
  OnWait,
}

impl ClosePolicy {
  pub fn as_str(&self) -> &'static str {
    match self {
      ClosePolicy::Explicit => "explicit",
      ClosePolicy::OnWait => "on-wait",
    }
  }

  pub fn closes_on_wait(&self) -> bool {
    matches!(self, ClosePolicy::OnWait)
  }
}

impl Display for ClosePolicy {
  fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for ClosePolicy {
  type Err = GateConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let normalized = s.trim();
    if normalized.eq_ignore_ascii_case("explicit") || normalized.eq_ignore_ascii_case("finish") {
      Ok(ClosePolicy::Explicit)
    } else if ["on-wait", "on_wait", "onwait"]
      .iter()
      .any(|candidate| normalized.eq_ignore_ascii_case(candidate))
    {
      Ok(ClosePolicy::OnWait)
    } else {
      Err(GateConfigError::InvalidClosePolicy { value: s.to_string() })
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
  /// ゲートが出力するすべてのログイベントに付与されるラベル
  pub name: String,
  pub close_policy: ClosePolicy,
}

impl Default for GateConfig {
  fn default() -> Self {
    GateConfig {
      name: "gate".to_string(),
      close_policy: ClosePolicy::Explicit,
    }
  }
}

impl GateConfig {
  pub fn from(options: impl IntoIterator<Item = GateConfigOption>) -> GateConfig {
    let options = options.into_iter().collect::<Vec<_>>();
    let mut config = GateConfig::default();
    for option in options {
      option.apply(&mut config);
    }
    config
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateConfigOption {
  SetName(String),
  SetClosePolicy(ClosePolicy),
}

impl GateConfigOption {
  pub(crate) fn apply(&self, config: &mut GateConfig) {
    match self {
      GateConfigOption::SetName(name) => {
        config.name = name.clone();
      }
      GateConfigOption::SetClosePolicy(policy) => {
        config.close_policy = *policy;
      }
    }
  }

  pub fn with_name(name: impl Into<String>) -> GateConfigOption {
    GateConfigOption::SetName(name.into())
  }

  pub fn with_close_policy(policy: ClosePolicy) -> GateConfigOption {
    GateConfigOption::SetClosePolicy(policy)
  }
}
