pub mod async_wait;
pub mod channel_backend;
pub mod condvar_backend;
pub mod env_config;

pub use nexus_gate_core_rs::{
  ClosePolicy, GateBackend, GateConfig, GateConfigError, GateConfigOption, GateError, GateSnapshot, JobGuard,
};

pub use async_wait::AsyncWaitExt;
pub use channel_backend::{ChannelGate, ChannelGateBackend};
pub use condvar_backend::{CondvarGateBackend, Gate};
pub use env_config::{config_from_env, options_from_env, GATE_CLOSE_POLICY_VAR, GATE_NAME_VAR};

pub mod prelude {
  pub use super::{
    AsyncWaitExt, ChannelGate, ClosePolicy, CondvarGateBackend, Gate, GateConfig, GateConfigOption, JobGuard,
  };
}
