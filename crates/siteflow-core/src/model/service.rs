//! サービス定義

use super::network::NetworkAttachment;
use super::volume::Mount;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 再起動ポリシー (no, always, on-failure, unless-stopped)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RestartPolicy {
    /// 再起動しない
    No,
    /// 常に再起動（トポロジ内の全サービスの既定値）
    #[default]
    Always,
    /// 異常終了時のみ再起動
    OnFailure,
    /// 明示的に停止しない限り再起動
    UnlessStopped,
}

impl RestartPolicy {
    /// 文字列からパース
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "no" => Some(Self::No),
            "always" => Some(Self::Always),
            "on-failure" | "on_failure" => Some(Self::OnFailure),
            "unless-stopped" | "unless_stopped" => Some(Self::UnlessStopped),
            _ => None,
        }
    }

    /// compose文書で使用する文字列に変換
    pub fn as_docker_str(&self) -> &'static str {
        match self {
            Self::No => "no",
            Self::Always => "always",
            Self::OnFailure => "on-failure",
            Self::UnlessStopped => "unless-stopped",
        }
    }
}

/// サービス定義
///
/// トポロジ内の1つのデプロイ単位。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub name: String,

    /// 解決済みイメージ参照 (repository:tag)
    pub image: String,

    #[serde(default)]
    pub restart: RestartPolicy,

    /// コンテナのホスト名
    #[serde(default)]
    pub hostname: Option<String>,

    /// 起動コマンド
    #[serde(default)]
    pub command: Option<String>,

    /// 起動時に到達可能である必要があるサービス（宣言順）
    #[serde(default)]
    pub depends_on: Vec<String>,

    /// ラベル（キー順で決定的に列挙される）
    #[serde(default)]
    pub labels: BTreeMap<String, String>,

    /// 環境変数エントリ（NAME または NAME=value、順序保持）
    #[serde(default)]
    pub environment: Vec<String>,

    /// 参加するネットワーク
    #[serde(default)]
    pub networks: Vec<NetworkAttachment>,

    /// 解決済みマウント
    #[serde(default)]
    pub volumes: Vec<Mount>,
}
