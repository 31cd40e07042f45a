//! サイト構成フラグ

use crate::constants;
use serde::{Deserialize, Serialize};

/// PHPランタイムのイメージ系統
///
/// バージョン文字列 "5.6" のみレガシー系統を選択し、
/// それ以外はすべて現行系統を選択する。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PhpVersion {
    /// レガシー系統 (easyengine/php5.6)
    Php56,
    /// 現行系統 (easyengine/php)
    #[default]
    Latest,
}

impl PhpVersion {
    /// バージョン文字列からパース
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "5.6" => Self::Php56,
            _ => Self::Latest,
        }
    }

    /// イメージリポジトリ名に変換
    pub fn image_repository(&self) -> &'static str {
        match self {
            Self::Php56 => constants::IMAGE_PHP56,
            Self::Latest => constants::IMAGE_PHP,
        }
    }
}

/// サイト構成フラグ
///
/// どのサービスが存在し、どのネットワークに参加するかを決める
/// トグルの集合。フィールドはすべて独立している。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteFlags {
    /// ローカルDBコンテナを持つか
    #[serde(default)]
    pub database: bool,

    /// Redisキャッシュコンテナを持つか
    #[serde(default)]
    pub redis: bool,

    /// HTTPSを無効化するか
    #[serde(default)]
    pub no_https: bool,

    /// グローバルDBを利用するか（phpがバックエンドネットワークに参加する）
    #[serde(default)]
    pub global_db: bool,

    /// グローバルRedisを利用するか
    #[serde(default)]
    pub global_redis: bool,

    /// PHPランタイムの系統
    #[serde(default)]
    pub php_version: PhpVersion,

    /// 外部ボリューム名の名前空間となるサイト識別子
    #[serde(default)]
    pub site_prefix: String,
}
