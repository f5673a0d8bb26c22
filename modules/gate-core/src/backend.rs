use crate::config::GateConfig;
use crate::state::GateSnapshot;

/// [`Gate`](crate::Gate)の操作を実行するクリティカルセクションを定義するトレイト
///
/// バックエンドは1つの[`GateState`](crate::GateState)を所有し、排他制御の下で状態を遷移させます。
/// 実装戦略（ロックと条件変数、チャネルによる状態の受け渡しなど）が異なっても、
/// 観測できる振る舞いは同じでなければなりません。
///
/// # 契約
///
/// - すべての状態遷移はセクション内で行われ、単一の全順序を持つ
/// - 「カウンタを確認し、0でなければ待機者として登録する」は1ステップで行う
/// - 契約違反は状態を変更する前に検出し、セクションを解放した後に
///   [`contract_violation`](crate::contract_violation)で報告する
/// - 待機者の起床で起床側のスレッドがブロックしない
///
/// クローンは同じ状態を共有します。
pub trait GateBackend: Clone {
  /// 指定された設定で空のバックエンドを作成
  ///
  /// # 引数
  ///
  /// * `config` - ゲートの設定
  fn new(config: GateConfig) -> Self;

  fn config(&self) -> &GateConfig;

  /// カウンタに`delta`を加算
  ///
  /// # 引数
  ///
  /// * `delta` - 加算する値（負の値も可）
  ///
  /// # 戻り値
  ///
  /// ジョブが登録された場合は`true`。ゲートが閉じている場合は何も変更せず`false`
  fn add(&self, delta: isize) -> bool;

  /// ジョブを1つ完了させる
  fn done(&self);

  /// カウンタが0になるまで待機
  fn wait(&self);

  /// 設定された[`ClosePolicy`](crate::ClosePolicy)に関係なく、ゲートを閉じる
  ///
  /// ポリシーの判定は呼び出し前に[`Gate::finish`](crate::Gate::finish)が行います。
  fn finish(&self);

  /// セクション内で取得した状態のスナップショットを返す
  fn snapshot(&self) -> GateSnapshot;
}
