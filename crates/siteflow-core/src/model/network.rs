//! ネットワーク定義

use serde::{Deserialize, Serialize};

/// サービスのネットワーク参加定義
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkAttachment {
    pub name: String,
    /// ネットワークローカルエイリアス
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl NetworkAttachment {
    /// エイリアスなしで参加
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
        }
    }

    /// エイリアス付きで参加
    pub fn with_alias(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: vec![alias.into()],
        }
    }
}

/// トポロジ全体のネットワークメタデータ
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkMeta {
    /// 宣言するネットワークに付与するラベル
    #[serde(default)]
    pub labels: Vec<String>,

    /// バックエンドネットワークをこのスタック側で用意するか
    ///
    /// ローカルDBがある場合はDB側のネットワークに相乗りするためfalse。
    #[serde(default)]
    pub enable_backend_network: bool,
}
