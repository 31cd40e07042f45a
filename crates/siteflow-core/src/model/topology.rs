//! トポロジ定義

use super::network::NetworkMeta;
use super::service::Service;
use super::volume::ExternalVolume;
use serde::{Deserialize, Serialize};

/// 1サイト分の組み立て済みトポロジ
///
/// 呼び出しごとに新しく構築され、構築後に変更されることはない。
/// レンダラーに一度渡して使い捨てる値で、永続的な同一性を持たない。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    /// サービス一覧（宣言順）
    pub services: Vec<Service>,

    /// ネットワークメタデータ
    pub network: NetworkMeta,

    /// 外部管理ボリューム
    ///
    /// ホストがボリュームをネイティブ管理する場合はNone。
    pub created_volumes: Option<Vec<ExternalVolume>>,
}

impl Topology {
    /// 名前でサービスを取得
    pub fn service(&self, name: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.name == name)
    }

    /// サービス名の一覧（宣言順）
    pub fn service_names(&self) -> Vec<&str> {
        self.services.iter().map(|s| s.name.as_str()).collect()
    }
}
