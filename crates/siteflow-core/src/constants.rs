//! 固定名の定義
//!
//! ネットワーク名・ラベル・イメージリポジトリ・外部ボリューム名など、
//! 生成される文書の互換性のために値を変えてはならない定数を集約します。

/// サイトローカルネットワーク名
pub const SITE_NETWORK: &str = "site-network";

/// グローバルフロントエンドネットワーク名（リバースプロキシ用）
pub const GLOBAL_FRONTEND_NETWORK: &str = "global-frontend-network";

/// グローバルバックエンドネットワーク名（共有DB/キャッシュ用）
pub const GLOBAL_BACKEND_NETWORK: &str = "global-backend-network";

/// 全サービスに付与する所有ラベルのキー
pub const SITE_LABEL_KEY: &str = "io.easyengine.site";

/// 所有ラベルの値（デプロイ時にオーケストレーターが展開する）
pub const SITE_LABEL_VALUE: &str = "${VIRTUAL_HOST}";

/// ネットワーク宣言に付与するベンダーラベル
pub const VENDOR_LABEL: &str = "org.label-schema.vendor=EasyEngine";

// サービス名
pub const SERVICE_DB: &str = "db";
pub const SERVICE_PHP: &str = "php";
pub const SERVICE_NGINX: &str = "nginx";
pub const SERVICE_MAILHOG: &str = "mailhog";
pub const SERVICE_POSTFIX: &str = "postfix";
pub const SERVICE_REDIS: &str = "redis";

// イメージリポジトリ
pub const IMAGE_MARIADB: &str = "easyengine/mariadb";
pub const IMAGE_PHP: &str = "easyengine/php";
pub const IMAGE_PHP56: &str = "easyengine/php5.6";
pub const IMAGE_NGINX: &str = "easyengine/nginx";
pub const IMAGE_MAILHOG: &str = "easyengine/mailhog";
pub const IMAGE_POSTFIX: &str = "easyengine/postfix";
pub const IMAGE_REDIS: &str = "easyengine/redis";

/// 常に宣言する外部ボリューム名（8個）
pub const BASE_EXTERNAL_VOLUMES: [&str; 8] = [
    "htdocs",
    "config_nginx",
    "config_php",
    "log_php",
    "log_nginx",
    "data_postfix",
    "ssl_postfix",
    "config_postfix",
];

/// データベース利用時のみ追加する外部ボリューム名（3個）
pub const DB_EXTERNAL_VOLUMES: [&str; 3] = ["db_data", "db_conf", "db_logs"];
