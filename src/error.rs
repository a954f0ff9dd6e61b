use thiserror::Error;

/// 調査実行とUI操作のエラー
#[derive(Debug, Error)]
pub enum ScoutError {
    /// 入力不足。調査は開始されない
    #[error("{0}")]
    Validation(String),

    /// エージェント実行時のエラー（ネットワーク、モデル側の失敗など）
    #[error("エージェント {role} の実行に失敗しました: {message}")]
    Runtime { role: String, message: String },

    /// エージェントが空の出力を返した
    #[error("エージェント {0} から調査結果を取得できませんでした")]
    EmptyOutput(String),

    /// 調査中は入力を変更できない
    #[error("調査中のため入力を変更できません")]
    InputLocked,

    #[error("年度は2000から2100の範囲で指定してください: {0}")]
    YearOutOfRange(i32),
}

impl ScoutError {
    pub fn runtime(role: impl Into<String>, err: &anyhow::Error) -> Self {
        ScoutError::Runtime {
            role: role.into(),
            message: format!("{:#}", err),
        }
    }
}
