use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("テンプレートの登録に失敗しました: {id}\n理由: {message}")]
    Template { id: String, message: String },

    #[error("テンプレートが見つかりません: {0}")]
    TemplateNotFound(String),

    #[error("トポロジのシリアライズに失敗しました: {0}")]
    Serialize(String),

    #[error("テンプレート展開エラー: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, ComposeError>;
