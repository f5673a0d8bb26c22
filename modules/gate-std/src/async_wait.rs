use async_trait::async_trait;
use nexus_gate_core_rs::{Gate, GateBackend};


/// 実行スレッドをブロックせずに非同期コードからゲートを待機するための拡張トレイト
///
/// ブロックする[`Gate::wait`]はTokioのブロッキングプールで実行されます。
/// 返されるFutureは`tokio::time::timeout`と組み合わせられます。
/// タイムアウトした場合もブロッキング待機はプール内で継続し、カウンタが0になった時点で終了します。
#[async_trait]
pub trait AsyncWaitExt {
  /// カウンタが0になるまで非同期に待機
  async fn wait_async(&self);
}

#[async_trait]
impl<B> AsyncWaitExt for Gate<B>
where
  B: GateBackend + Send + Sync + 'static,
{
  async fn wait_async(&self) {
    let gate = self.clone();
    if let Err(err) = tokio::task::spawn_blocking(move || gate.wait()).await {
      if err.is_panic() {
        std::panic::resume_unwind(err.into_panic());
      }
      tracing::warn!(gate = %self.config().name, "blocking wait cancelled by runtime shutdown");
    }
  }
}
