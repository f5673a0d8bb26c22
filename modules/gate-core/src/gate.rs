use core::fmt::{Debug, Formatter};

use crate::backend::GateBackend;
use crate::config::{ClosePolicy, GateConfig, GateConfigOption};
use crate::state::GateSnapshot;


/// `add`と`wait`を並行して呼び出せるWaitGroup
///
/// 通常のWaitGroupでは、カウンタが0であることを観測しうる`wait`の実行中に`add`を呼ぶことは禁止されています。
/// `Gate`はこの制約を取り除きます。`wait`のカウンタ確認と待機者登録は`add`/`done`に対して
/// アトミックに行われるため起床が失われることはなく、カウンタが0になった時点で
/// 待機中のすべての待機者がまとめて再開されます。
///
/// 一度閉じると（[`ClosePolicy`]を参照）、以降の`add`はすべて拒否されます。
/// 停止処理中の所有者は、新しいジョブの開始を止めつつ実行中のジョブを待つことができます。
/// 閉じたゲートは再利用しません。次の処理には新しいゲートを作成してください。
///
/// # 使用パターン
///
/// 1. ジョブを開始する前に`add(1)`（または[`try_enter`](Self::try_enter)）を呼び、`false`ならジョブを開始しない
/// 2. 受け付けられたジョブの完了時に`done()`をちょうど1回呼び出し
/// 3. `wait()`で未完了のジョブがなくなるまで待機
///
/// # 例
///
/// ```rust,ignore
/// let gate = Gate::new();
///
/// let worker = gate.clone();
/// std::thread::spawn(move || {
///   if worker.add(1) {
///     // ジョブの処理
///     worker.done();
///   }
/// });
///
/// gate.finish();
/// gate.wait();
/// ```
///
/// カウンタが0のときに行う正の`add`は、それを観測すべき`wait`よりも先に行われている必要があります。
///
/// # パニック
///
/// 登録数より多く完了させてカウンタが負になる場合、呼び出し側のバグとして契約違反でパニックします。
///
/// # 型パラメータ
///
/// * `B` - GateBackendトレイトを実装する具体的なバックエンド型
#[derive(Clone)]
pub struct Gate<B>
where
  B: GateBackend, {
  backend: B,
}

impl<B> Gate<B>
where
  B: GateBackend,
{
  /// デフォルト設定で空のゲートを作成
  pub fn new() -> Self {
    Self::with_config(GateConfig::default())
  }

  /// 指定された設定で空のゲートを作成
  ///
  /// # 引数
  ///
  /// * `config` - ゲートの設定
  pub fn with_config(config: GateConfig) -> Self {
    Self {
      backend: B::new(config),
    }
  }

  pub fn from_options(options: impl IntoIterator<Item = GateConfigOption>) -> Self {
    Self::with_config(GateConfig::from(options))
  }

  /// カウンタに`delta`を加算
  ///
  /// # 引数
  ///
  /// * `delta` - 加算する値（負の値も可）
  ///
  /// # 戻り値
  ///
  /// ジョブが登録され開始してよい場合は`true`、ゲートが閉じている場合は`false`。
  /// 拒否された呼び出しはカウンタを変更しません。
  ///
  /// # パニック
  ///
  /// カウンタが負になる場合
  pub fn add(&self, delta: isize) -> bool {
    self.backend.add(delta)
  }

  /// カウンタを1減算
  ///
  /// 閉じたゲートでも動作します。閉じる前に受け付けたジョブは完了させる必要があるためです。
  ///
  /// # パニック
  ///
  /// カウンタが既に0の場合
  pub fn done(&self) {
    self.backend.done();
  }

  /// カウンタが0になるまで現在のスレッドをブロック
  ///
  /// 未完了のジョブがなければ即座に返ります。[`ClosePolicy::OnWait`]の場合はゲートも閉じます。
  pub fn wait(&self) {
    self.backend.wait();
  }

  /// 新しいジョブの受け付けを停止
  ///
  /// [`ClosePolicy::Explicit`]でのみ有効です。`OnWait`のゲートでは無視されます。
  pub fn finish(&self) {
    match self.close_policy() {
      ClosePolicy::Explicit => self.backend.finish(),
      ClosePolicy::OnWait => {
        tracing::warn!(
          gate = %self.config().name,
          "finish called on a gate that closes on wait; ignoring"
        );
      }
    }
  }

  /// ジョブを1つ登録し、ドロップ時にそのジョブを完了させるガードを返す
  ///
  /// # 戻り値
  ///
  /// ゲートが閉じている場合は`None`
  pub fn try_enter(&self) -> Option<JobGuard<'_, B>> {
    if self.add(1) {
      Some(JobGuard { gate: self })
    } else {
      None
    }
  }

  pub fn count(&self) -> usize {
    self.backend.snapshot().count
  }

  pub fn is_closed(&self) -> bool {
    self.backend.snapshot().closed
  }

  pub fn snapshot(&self) -> GateSnapshot {
    self.backend.snapshot()
  }

  pub fn config(&self) -> &GateConfig {
    self.backend.config()
  }

  pub fn close_policy(&self) -> ClosePolicy {
    self.backend.config().close_policy
  }

  pub fn backend(&self) -> &B {
    &self.backend
  }
}

impl<B> Default for Gate<B>
where
  B: GateBackend,
{
  fn default() -> Self {
    Self::new()
  }
}

impl<B> Debug for Gate<B>
where
  B: GateBackend,
{
  fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("Gate")
      .field("name", &self.config().name)
      .field("close_policy", &self.close_policy())
      .field("state", &self.snapshot())
      .finish()
  }
}

/// 受け付けられたジョブ。ドロップすると[`Gate::done`]を呼び出します
#[must_use = "dropping the guard completes the job immediately"]
pub struct JobGuard<'a, B>
where
  B: GateBackend, {
  gate: &'a Gate<B>,
}

impl<B> JobGuard<'_, B>
where
  B: GateBackend,
{
  /// ジョブを完了させる。ガードのドロップと同じです
  pub fn complete(self) {
    drop(self);
  }
}

impl<B> Debug for JobGuard<'_, B>
where
  B: GateBackend,
{
  fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("JobGuard").field("gate", &self.gate.config().name).finish()
  }
}

impl<B> Drop for JobGuard<'_, B>
where
  B: GateBackend,
{
  fn drop(&mut self) {
    self.gate.done();
  }
}
