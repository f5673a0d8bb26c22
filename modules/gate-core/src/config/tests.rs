use super::*;
use rstest::rstest;

#[test]
fn default_config_uses_explicit_policy() {
  let config = GateConfig::default();
  assert_eq!(config.name, "gate");
  assert_eq!(config.close_policy, ClosePolicy::Explicit);
}

#[test]
fn options_are_applied_in_order() {
  let config = GateConfig::from(vec![
    GateConfigOption::with_name("first"),
    GateConfigOption::with_close_policy(ClosePolicy::OnWait),
    GateConfigOption::with_name("http-workers"),
  ]);
  assert_eq!(config.name, "http-workers");
  assert_eq!(config.close_policy, ClosePolicy::OnWait);
}

#[test]
fn empty_options_yield_default() {
  assert_eq!(GateConfig::from(Vec::new()), GateConfig::default());
}

#[rstest]
#[case("explicit", ClosePolicy::Explicit)]
#[case("EXPLICIT", ClosePolicy::Explicit)]
#[case("finish", ClosePolicy::Explicit)]
#[case("on-wait", ClosePolicy::OnWait)]
#[case("on_wait", ClosePolicy::OnWait)]
#[case(" OnWait ", ClosePolicy::OnWait)]
fn close_policy_parses(#[case] input: &str, #[case] expected: ClosePolicy) {
  assert_eq!(input.parse::<ClosePolicy>(), Ok(expected));
}

#[rstest]
#[case("")]
#[case("never")]
#[case("on wait")]
fn close_policy_rejects_unknown_values(#[case] input: &str) {
  match input.parse::<ClosePolicy>() {
    Err(GateConfigError::InvalidClosePolicy { value }) => assert_eq!(value, input),
    other => panic!("Expected InvalidClosePolicy, got {:?}", other),
  }
}

#[test]
fn close_policy_display_round_trips() {
  for policy in [ClosePolicy::Explicit, ClosePolicy::OnWait] {
    assert_eq!(policy.to_string().parse::<ClosePolicy>(), Ok(policy));
  }
  assert!(ClosePolicy::OnWait.closes_on_wait());
  assert!(!ClosePolicy::Explicit.closes_on_wait());
}
