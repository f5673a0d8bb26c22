use std::env;

use nexus_gate_core_rs::{ClosePolicy, GateConfig, GateConfigError, GateConfigOption};

#[cfg(test)]
mod tests;

/// ゲート名を指定する環境変数
pub const GATE_NAME_VAR: &str = "NEXUS_GATE_NAME";
/// クローズポリシーを指定する環境変数
pub const GATE_CLOSE_POLICY_VAR: &str = "NEXUS_GATE_CLOSE_POLICY";

/// `NEXUS_GATE_NAME`と`NEXUS_GATE_CLOSE_POLICY`からゲートのオプションを読み込む
///
/// 未設定の変数はオプションを生成しません。
///
/// # 戻り値
///
/// 読み込んだオプションのリスト。値が不正な場合は[`GateConfigError`]
pub fn options_from_env() -> Result<Vec<GateConfigOption>, GateConfigError> {
  options_from_lookup(|name| env::var(name))
}

/// [`options_from_env`]で読み込んだオプションをデフォルト設定に適用した設定を返す
pub fn config_from_env() -> Result<GateConfig, GateConfigError> {
  options_from_env().map(GateConfig::from)
}

fn options_from_lookup<F>(lookup: F) -> Result<Vec<GateConfigOption>, GateConfigError>
where
  F: Fn(&str) -> Result<String, env::VarError>, {
  let mut options = Vec::new();
  if let Some(name) = read_var(&lookup, GATE_NAME_VAR)? {
    if name.trim().is_empty() {
      return Err(GateConfigError::InvalidVariable {
        name: GATE_NAME_VAR.to_string(),
        reason: "gate name must not be empty".to_string(),
      });
    }
    options.push(GateConfigOption::with_name(name));
  }
  if let Some(policy) = read_var(&lookup, GATE_CLOSE_POLICY_VAR)? {
    options.push(GateConfigOption::with_close_policy(policy.parse::<ClosePolicy>()?));
  }
  Ok(options)
}

fn read_var<F>(lookup: &F, name: &str) -> Result<Option<String>, GateConfigError>
where
  F: Fn(&str) -> Result<String, env::VarError>, {
  match lookup(name) {
    Ok(value) => Ok(Some(value)),
    Err(env::VarError::NotPresent) => Ok(None),
    Err(err @ env::VarError::NotUnicode(_)) => Err(GateConfigError::InvalidVariable {
      name: name.to_string(),
      reason: err.to_string(),
    }),
  }
}
