//! ボリューム定義

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// コンポーネント名 → マウント要求リスト
pub type VolumeSpec = HashMap<String, Vec<MountRequest>>;

/// 未解決のマウント要求
///
/// sourceは名前付きボリューム名またはホストの絶対パス。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountRequest {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub read_only: bool,
}

/// 解決済みマウント
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mount {
    pub host: String,
    pub container: String,
    #[serde(default)]
    pub read_only: bool,
}

/// 外部管理ボリュームの宣言
///
/// どのサービスのライフサイクルにも属さない、永続ボリュームの宣言。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalVolume {
    /// サイト識別子による名前空間
    pub prefix: String,
    pub name: String,
}

impl ExternalVolume {
    pub fn new(prefix: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            name: name.into(),
        }
    }

    /// 宣言名 ({prefix}_{name})
    pub fn full_name(&self) -> String {
        format!("{}_{}", self.prefix, self.name)
    }
}
