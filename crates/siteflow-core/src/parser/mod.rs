//! KDLサイト定義パーサー
//!
//! サイト定義ファイルをパースして構成フラグとボリューム定義を生成します。
//!
//! KDL形式：
//! ```kdl
//! site "example.com" prefix="example" {
//!     php_version "7.4"
//!     database #true
//!     redis #false
//!     volumes "php" {
//!         volume "example_htdocs" "/var/www/htdocs"
//!     }
//! }
//! ```


use crate::error::{Result, TopologyError};
use crate::model::{MountRequest, PhpVersion, SiteFlags, VolumeSpec};
use kdl::{KdlDocument, KdlNode};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// サイト定義ファイルをパース
pub fn parse_site_file<P: AsRef<Path>>(path: P) -> Result<(SiteFlags, VolumeSpec)> {
    let content = fs::read_to_string(path.as_ref()).map_err(|e| TopologyError::Io {
        path: path.as_ref().to_path_buf(),
        message: e.to_string(),
    })?;
    parse_site_string(&content)
}

/// サイト定義文字列をパース
pub fn parse_site_string(content: &str) -> Result<(SiteFlags, VolumeSpec)> {
    let doc: KdlDocument = content.parse()?;

    let site = doc
        .nodes()
        .iter()
        .find(|node| node.name().value() == "site")
        .ok_or_else(|| TopologyError::InvalidConfig("site ノードが見つかりません".to_string()))?;

    let site_name = site
        .entries()
        .first()
        .and_then(|e| e.value().as_string())
        .ok_or_else(|| TopologyError::InvalidConfig("site 名が指定されていません".to_string()))?;

    let mut flags = SiteFlags {
        site_prefix: site
            .get("prefix")
            .and_then(|e| e.as_string())
            .map(str::to_string)
            .unwrap_or_else(|| default_prefix(site_name)),
        ..Default::default()
    };
    let mut volumes: VolumeSpec = HashMap::new();

    if let Some(children) = site.children() {
        for node in children.nodes() {
            match node.name().value() {
                "php_version" => {
                    if let Some(version) =
                        node.entries().first().and_then(|e| e.value().as_string())
                    {
                        flags.php_version = PhpVersion::parse(version);
                    }
                }
                "database" => flags.database = node_flag(node),
                "redis" => flags.redis = node_flag(node),
                "no_https" => flags.no_https = node_flag(node),
                "global_db" => flags.global_db = node_flag(node),
                "global_redis" => flags.global_redis = node_flag(node),
                "volumes" => {
                    let (component, requests) = parse_volumes(node)?;
                    let _ = volumes.insert(component, requests);
                }
                // 未知のノードは無視する（前方互換）
                _ => {}
            }
        }
    }

    debug!(
        site = %site_name,
        prefix = %flags.site_prefix,
        volume_components = volumes.len(),
        "Parsed site definition"
    );

    Ok((flags, volumes))
}

/// フラグノードをパース
///
/// 引数なしは #true と同じ扱い。
fn node_flag(node: &KdlNode) -> bool {
    let Some(entry) = node.entries().first() else {
        return true;
    };

    if let Some(value) = entry.value().as_bool() {
        return value;
    }

    // KDL v2では #true / #false を使用する必要がある
    if let Some(str_value) = entry.value().as_string() {
        match str_value {
            "true" => {
                eprintln!(
                    "Warning: '{name} \"true\"' is a string, not a boolean.\n\
                     Hint: In KDL v2, use '#true' for boolean values.\n\
                     Example: {name} #true",
                    name = node.name().value()
                );
                return true;
            }
            "false" => {
                eprintln!(
                    "Warning: '{name} \"false\"' is a string, not a boolean.\n\
                     Hint: In KDL v2, use '#false' for boolean values.\n\
                     Example: {name} #false",
                    name = node.name().value()
                );
                return false;
            }
            _ => {}
        }
    }

    false
}

/// volumes ノードをパース
fn parse_volumes(node: &KdlNode) -> Result<(String, Vec<MountRequest>)> {
    let component = node
        .entries()
        .first()
        .and_then(|e| e.value().as_string())
        .ok_or_else(|| {
            TopologyError::InvalidConfig(
                "volumes にコンポーネント名が指定されていません".to_string(),
            )
        })?
        .to_string();

    let mut requests = Vec::new();
    if let Some(children) = node.children() {
        for volume in children.nodes() {
            if volume.name().value() != "volume" {
                continue;
            }
            if let Some(request) = parse_volume(volume) {
                requests.push(request);
            }
        }
    }

    Ok((component, requests))
}

/// volume ノードをパース
fn parse_volume(node: &KdlNode) -> Option<MountRequest> {
    let entries: Vec<_> = node.entries().iter().collect();

    let source = entries.first()?.value().as_string()?.to_string();
    let target = entries.get(1)?.value().as_string()?.to_string();
    let read_only = node.get("read_only").and_then(|e| e.as_bool()).unwrap_or(false);

    Some(MountRequest {
        source,
        target,
        read_only,
    })
}

/// prefix未指定時の既定値（サイト名から英数字以外を除去）
fn default_prefix(site_name: &str) -> String {
    site_name
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect()
}
