use super::*;
use std::collections::HashMap;
use std::ffi::OsString;

fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Result<String, env::VarError> {
  let vars = vars
    .iter()
    .map(|(name, value)| (name.to_string(), value.to_string()))
    .collect::<HashMap<_, _>>();
  move |name| vars.get(name).cloned().ok_or(env::VarError::NotPresent)
}

#[test]
fn no_variables_yield_no_options() {
  let options = options_from_lookup(lookup_from(&[])).unwrap();
  assert!(options.is_empty());
  assert_eq!(GateConfig::from(options), GateConfig::default());
}

#[test]
fn both_variables_are_read() {
  let options = options_from_lookup(lookup_from(&[
    (GATE_NAME_VAR, "ingest"),
    (GATE_CLOSE_POLICY_VAR, "on-wait"),
  ]))
  .unwrap();
  let config = GateConfig::from(options);
  assert_eq!(config.name, "ingest");
  assert_eq!(config.close_policy, ClosePolicy::OnWait);
}

#[test]
fn invalid_policy_is_reported() {
  let result = options_from_lookup(lookup_from(&[(GATE_CLOSE_POLICY_VAR, "sometimes")]));
  assert_eq!(
    result.unwrap_err(),
    GateConfigError::InvalidClosePolicy {
      value: "sometimes".to_string()
    }
  );
}

#[test]
fn blank_name_is_reported() {
  match options_from_lookup(lookup_from(&[(GATE_NAME_VAR, "  ")])) {
    Err(GateConfigError::InvalidVariable { name, .. }) => assert_eq!(name, GATE_NAME_VAR),
    other => panic!("Expected InvalidVariable, got {:?}", other),
  }
}

#[test]
fn non_unicode_value_is_reported() {
  let lookup = |_: &str| -> Result<String, env::VarError> { Err(env::VarError::NotUnicode(OsString::from("x"))) };
  match options_from_lookup(lookup) {
    Err(GateConfigError::InvalidVariable { name, reason }) => {
      assert_eq!(name, GATE_NAME_VAR);
      assert!(!reason.is_empty());
    }
    other => panic!("Expected InvalidVariable, got {:?}", other),
  }
}
