use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TopologyError {
    #[error("KDLパースエラー: {0}")]
    Kdl(#[from] kdl::KdlError),

    #[error("ファイル読み込みエラー: {path}\n理由: {message}")]
    Io { path: PathBuf, message: String },

    #[error("無効なサイト定義: {0}")]
    InvalidConfig(String),

    #[error(
        "コンポーネント '{component}' のボリューム定義がありません\nヒント: volumes \"{component}\" {{ ... }} ブロックを追加してください"
    )]
    MissingVolumeSpec { component: String },

    #[error(
        "コンポーネント '{component}' のイメージバージョンを解決できません\nヒント: バージョンレジストリに '{component}' が登録されているか確認してください"
    )]
    UnknownComponentVersion { component: String },

    #[error("コンポーネント '{component}' のマウント解決に失敗しました: {message}")]
    MountResolutionFailed { component: String, message: String },
}

pub type Result<T> = std::result::Result<T, TopologyError>;
