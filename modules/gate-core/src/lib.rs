//! Nexusカウンティングゲートのランタイム非依存コア
//!
//! ゲートは`add`と`wait`の並行呼び出しを許容するWaitGroupです。
//! このクレートは状態とその遷移規則（[`GateState`]）、クリティカルセクションの戦略ごとに実装される
//! [`GateBackend`]トレイト、呼び出し側が使用する[`Gate`]を提供します。
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod backend;
pub mod config;
pub mod error;
pub mod gate;
pub mod state;

pub use backend::GateBackend;
pub use config::{ClosePolicy, GateConfig, GateConfigOption};
pub use error::{contract_violation, GateConfigError, GateError};
pub use gate::{Gate, JobGuard};
pub use state::{Admission, GateSnapshot, GateState, Released, WaitRegistration};
