//! イメージバージョン解決とマウント解決
//!
//! トポロジビルダーが外部コラボレーターとして参照する2つのシームを
//! トレイトとして定義し、既定実装を提供します。

use crate::constants;
use crate::error::{Result, TopologyError};
use crate::model::{Mount, MountRequest};
use std::collections::HashMap;
use tracing::debug;

/// コンポーネント名からイメージ参照を解決する
pub trait VersionResolver {
    /// 解決済みイメージ参照 (repository:tag) を返す。未登録ならNone。
    fn resolve(&self, component: &str) -> Option<String>;
}

/// 固定マップによるバージョンレジストリ
///
/// イメージリポジトリ名 → タグの対応表を保持する。
#[derive(Debug, Clone, Default)]
pub struct StaticVersionResolver {
    versions: HashMap<String, String>,
}

impl StaticVersionResolver {
    /// 空のレジストリを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 全コンポーネントの既定タグを持つレジストリを作成
    pub fn with_defaults() -> Self {
        let mut resolver = Self::new();
        for (repository, tag) in [
            (constants::IMAGE_MARIADB, "v4.1.3"),
            (constants::IMAGE_PHP, "v4.1.4"),
            (constants::IMAGE_PHP56, "v4.0.0"),
            (constants::IMAGE_NGINX, "v4.1.2"),
            (constants::IMAGE_MAILHOG, "v4.0.8"),
            (constants::IMAGE_POSTFIX, "v4.1.0"),
            (constants::IMAGE_REDIS, "v4.0.6"),
        ] {
            resolver.insert(repository, tag);
        }
        resolver
    }

    /// タグを登録（既存エントリは上書き）
    pub fn insert(&mut self, repository: impl Into<String>, tag: impl Into<String>) {
        let _ = self.versions.insert(repository.into(), tag.into());
    }
}

impl VersionResolver for StaticVersionResolver {
    fn resolve(&self, component: &str) -> Option<String> {
        let tag = self.versions.get(component)?;
        debug!(component = %component, tag = %tag, "Resolved image version");
        Some(format!("{}:{}", component, tag))
    }
}

/// マウント要求のリストを検証済みマウントに解決する
pub trait MountResolver {
    fn resolve(&self, component: &str, requests: &[MountRequest]) -> Result<Vec<Mount>>;
}

/// 名前付きボリュームとバインドマウントの既定リゾルバ
///
/// 変換はせず、要求の妥当性だけを検証して通す。
#[derive(Debug, Clone, Copy, Default)]
pub struct BindMountResolver;

impl MountResolver for BindMountResolver {
    fn resolve(&self, component: &str, requests: &[MountRequest]) -> Result<Vec<Mount>> {
        let mut mounts = Vec::with_capacity(requests.len());

        for request in requests {
            if request.source.is_empty() {
                return Err(TopologyError::MountResolutionFailed {
                    component: component.to_string(),
                    message: format!("マウント元が空です (target: {})", request.target),
                });
            }
            if !request.target.starts_with('/') {
                return Err(TopologyError::MountResolutionFailed {
                    component: component.to_string(),
                    message: format!(
                        "コンテナパスは絶対パスである必要があります: {}",
                        request.target
                    ),
                });
            }

            mounts.push(Mount {
                host: request.source.clone(),
                container: request.target.clone(),
                read_only: request.read_only,
            });
        }

        debug!(component = %component, mounts = mounts.len(), "Resolved mounts");
        Ok(mounts)
    }
}
