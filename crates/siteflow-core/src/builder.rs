//! トポロジビルダー
//!
//! サイト構成フラグとボリューム定義から、1サイト分のサービス・
//! ネットワーク・外部ボリュームを決定的に組み立てます。
//! イメージバージョン解決・マウント解決・ホスト判定は外部から注入され、
//! build自体はI/Oを持たない純粋な変換として実行されます。

use crate::constants::{
    BASE_EXTERNAL_VOLUMES, DB_EXTERNAL_VOLUMES, GLOBAL_BACKEND_NETWORK, GLOBAL_FRONTEND_NETWORK,
    IMAGE_MAILHOG, IMAGE_MARIADB, IMAGE_NGINX, IMAGE_POSTFIX, IMAGE_REDIS, SERVICE_DB,
    SERVICE_MAILHOG, SERVICE_NGINX, SERVICE_PHP, SERVICE_POSTFIX, SERVICE_REDIS, SITE_LABEL_KEY,
    SITE_LABEL_VALUE, SITE_NETWORK, VENDOR_LABEL,
};
use crate::error::{Result, TopologyError};
use crate::host::HostProbe;
use crate::model::{
    ExternalVolume, Mount, NetworkAttachment, NetworkMeta, RestartPolicy, Service, SiteFlags,
    Topology, VolumeSpec,
};
use crate::resolver::{MountResolver, VersionResolver};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// トポロジビルダー
pub struct TopologyBuilder<'a> {
    versions: &'a dyn VersionResolver,
    mounts: &'a dyn MountResolver,
    host: &'a dyn HostProbe,
}

impl<'a> TopologyBuilder<'a> {
    pub fn new(
        versions: &'a dyn VersionResolver,
        mounts: &'a dyn MountResolver,
        host: &'a dyn HostProbe,
    ) -> Self {
        Self {
            versions,
            mounts,
            host,
        }
    }

    /// トポロジを構築
    ///
    /// 入力不備・解決失敗はすべて即時エラーで、部分的なトポロジは
    /// 決して返さない。同じ入力と同じコラボレーター応答に対して
    /// 常に同じ結果を返す。
    pub fn build(&self, flags: &SiteFlags, volumes: &VolumeSpec) -> Result<Topology> {
        self.validate_volume_spec(flags, volumes)?;

        let db = if flags.database {
            let image = self.resolve_image(IMAGE_MARIADB)?;
            let mounts = self.resolve_mounts(SERVICE_DB, volumes)?;
            Some(build_db(image, mounts))
        } else {
            None
        };

        let php_image = self.resolve_image(flags.php_version.image_repository())?;
        let php_mounts = self.resolve_mounts(SERVICE_PHP, volumes)?;
        let php = build_php(php_image, php_mounts, flags);

        let nginx_image = self.resolve_image(IMAGE_NGINX)?;
        let nginx_mounts = self.resolve_mounts(SERVICE_NGINX, volumes)?;
        let nginx = build_nginx(nginx_image, nginx_mounts, flags);

        let mailhog = build_mailhog(self.resolve_image(IMAGE_MAILHOG)?);

        let postfix_image = self.resolve_image(IMAGE_POSTFIX)?;
        let postfix_mounts = self.resolve_mounts(SERVICE_POSTFIX, volumes)?;
        let postfix = build_postfix(postfix_image, postfix_mounts);

        let redis = if flags.redis {
            Some(build_redis(self.resolve_image(IMAGE_REDIS)?))
        } else {
            None
        };

        // レンダラーが期待する宣言順。dbは論理的には独立だが最後に置く。
        let mut services = vec![php, nginx, mailhog, postfix];
        if let Some(redis) = redis {
            services.push(redis);
        }
        if let Some(db) = db {
            services.push(db);
        }

        let network = NetworkMeta {
            labels: vec![
                VENDOR_LABEL.to_string(),
                format!("{}={}", SITE_LABEL_KEY, SITE_LABEL_VALUE),
            ],
            enable_backend_network: !flags.database,
        };

        let created_volumes = if self.host.manages_volumes_natively() {
            None
        } else {
            Some(external_volumes(flags))
        };

        info!(
            services = services.len(),
            database = flags.database,
            redis = flags.redis,
            "Assembled site topology"
        );

        Ok(Topology {
            services,
            network,
            created_volumes,
        })
    }

    /// 必須コンポーネントのボリューム定義を検証
    fn validate_volume_spec(&self, flags: &SiteFlags, volumes: &VolumeSpec) -> Result<()> {
        let mut required = vec![SERVICE_PHP, SERVICE_NGINX, SERVICE_POSTFIX];
        if flags.database {
            required.push(SERVICE_DB);
        }

        for component in required {
            if !volumes.contains_key(component) {
                return Err(TopologyError::MissingVolumeSpec {
                    component: component.to_string(),
                });
            }
        }
        Ok(())
    }

    fn resolve_image(&self, repository: &str) -> Result<String> {
        self.versions
            .resolve(repository)
            .ok_or_else(|| TopologyError::UnknownComponentVersion {
                component: repository.to_string(),
            })
    }

    fn resolve_mounts(&self, component: &str, volumes: &VolumeSpec) -> Result<Vec<Mount>> {
        let requests =
            volumes
                .get(component)
                .ok_or_else(|| TopologyError::MissingVolumeSpec {
                    component: component.to_string(),
                })?;
        self.mounts.resolve(component, requests)
    }
}

/// 全サービス共通の所有ラベル
fn site_labels() -> BTreeMap<String, String> {
    let mut labels = BTreeMap::new();
    labels.insert(SITE_LABEL_KEY.to_string(), SITE_LABEL_VALUE.to_string());
    labels
}

fn build_db(image: String, volumes: Vec<Mount>) -> Service {
    debug!(service = SERVICE_DB, "Building service");
    Service {
        name: SERVICE_DB.to_string(),
        image,
        restart: RestartPolicy::Always,
        labels: site_labels(),
        // 値はデプロイ時にオーケストレーターが注入する。名前のみ列挙。
        environment: vec![
            "MYSQL_ROOT_PASSWORD".to_string(),
            "MYSQL_DATABASE".to_string(),
            "MYSQL_USER".to_string(),
            "MYSQL_PASSWORD".to_string(),
        ],
        networks: vec![NetworkAttachment::new(SITE_NETWORK)],
        volumes,
        ..Default::default()
    }
}

fn build_php(image: String, volumes: Vec<Mount>, flags: &SiteFlags) -> Service {
    debug!(service = SERVICE_PHP, "Building service");
    let mut depends_on = Vec::new();
    if flags.database {
        depends_on.push(SERVICE_DB.to_string());
    }
    if flags.redis {
        depends_on.push(SERVICE_REDIS.to_string());
    }

    let mut networks = vec![NetworkAttachment::with_alias(
        SITE_NETWORK,
        format!("{}_php", SITE_LABEL_VALUE),
    )];
    if flags.global_db {
        networks.push(NetworkAttachment::new(GLOBAL_BACKEND_NETWORK));
    }

    Service {
        name: SERVICE_PHP.to_string(),
        image,
        restart: RestartPolicy::Always,
        depends_on,
        labels: site_labels(),
        environment: vec![
            "USER_ID".to_string(),
            "GROUP_ID".to_string(),
            "VIRTUAL_HOST".to_string(),
        ],
        networks,
        volumes,
        ..Default::default()
    }
}

fn build_nginx(image: String, volumes: Vec<Mount>, flags: &SiteFlags) -> Service {
    debug!(service = SERVICE_NGINX, "Building service");
    let mut environment = vec![
        "VIRTUAL_HOST".to_string(),
        "VIRTUAL_PATH=/".to_string(),
        "HSTS=off".to_string(),
    ];
    if flags.no_https {
        environment.push("HTTPS_METHOD=nohttps".to_string());
    }

    // バックエンド参加の条件はglobal_redis（global_dbではない）
    let mut networks = vec![
        NetworkAttachment::new(GLOBAL_FRONTEND_NETWORK),
        NetworkAttachment::new(SITE_NETWORK),
    ];
    if flags.global_redis {
        networks.push(NetworkAttachment::new(GLOBAL_BACKEND_NETWORK));
    }

    Service {
        name: SERVICE_NGINX.to_string(),
        image,
        restart: RestartPolicy::Always,
        depends_on: vec![SERVICE_PHP.to_string()],
        labels: site_labels(),
        environment,
        networks,
        volumes,
        ..Default::default()
    }
}

fn build_mailhog(image: String) -> Service {
    debug!(service = SERVICE_MAILHOG, "Building service");
    Service {
        name: SERVICE_MAILHOG.to_string(),
        image,
        restart: RestartPolicy::Always,
        command: Some(r#"["-invite-jim=false"]"#.to_string()),
        labels: site_labels(),
        environment: vec![
            "VIRTUAL_HOST".to_string(),
            "VIRTUAL_PATH=/ee-admin/mailhog/".to_string(),
            "VIRTUAL_PORT=8025".to_string(),
        ],
        networks: vec![
            NetworkAttachment::new(SITE_NETWORK),
            NetworkAttachment::new(GLOBAL_FRONTEND_NETWORK),
        ],
        ..Default::default()
    }
}

fn build_postfix(image: String, volumes: Vec<Mount>) -> Service {
    debug!(service = SERVICE_POSTFIX, "Building service");
    Service {
        name: SERVICE_POSTFIX.to_string(),
        image,
        restart: RestartPolicy::Always,
        hostname: Some(SITE_LABEL_VALUE.to_string()),
        labels: site_labels(),
        networks: vec![NetworkAttachment::new(SITE_NETWORK)],
        volumes,
        ..Default::default()
    }
}

fn build_redis(image: String) -> Service {
    debug!(service = SERVICE_REDIS, "Building service");
    Service {
        name: SERVICE_REDIS.to_string(),
        image,
        restart: RestartPolicy::Always,
        labels: site_labels(),
        networks: vec![NetworkAttachment::new(SITE_NETWORK)],
        ..Default::default()
    }
}

/// 外部ボリューム一覧（8個の基本エントリ + DB利用時は3個追加）
fn external_volumes(flags: &SiteFlags) -> Vec<ExternalVolume> {
    let mut volumes: Vec<ExternalVolume> = BASE_EXTERNAL_VOLUMES
        .iter()
        .map(|name| ExternalVolume::new(&flags.site_prefix, *name))
        .collect();

    if flags.database {
        volumes.extend(
            DB_EXTERNAL_VOLUMES
                .iter()
                .map(|name| ExternalVolume::new(&flags.site_prefix, *name)),
        );
    }

    volumes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::FixedProbe;
    use crate::model::{MountRequest, PhpVersion};
    use crate::resolver::{BindMountResolver, StaticVersionResolver};
    use std::collections::HashMap;

    fn request(source: &str, target: &str) -> MountRequest {
        MountRequest {
            source: source.to_string(),
            target: target.to_string(),
            read_only: false,
        }
    }

    fn sample_volumes(with_db: bool) -> VolumeSpec {
        let mut volumes: VolumeSpec = HashMap::new();
        volumes.insert(
            "php".to_string(),
            vec![
                request("site1_htdocs", "/var/www/htdocs"),
                request("site1_config_php", "/usr/local/etc"),
            ],
        );
        volumes.insert(
            "nginx".to_string(),
            vec![
                request("site1_htdocs", "/var/www/htdocs"),
                request("site1_config_nginx", "/usr/local/openresty/nginx/conf"),
            ],
        );
        volumes.insert(
            "postfix".to_string(),
            vec![request("site1_data_postfix", "/var/spool/postfix")],
        );
        if with_db {
            volumes.insert(
                "db".to_string(),
                vec![request("site1_db_data", "/var/lib/mysql")],
            );
        }
        volumes
    }

    fn flags(database: bool, redis: bool) -> SiteFlags {
        SiteFlags {
            database,
            redis,
            site_prefix: "site1".to_string(),
            ..Default::default()
        }
    }

    fn build(flags: &SiteFlags, volumes: &VolumeSpec) -> Result<Topology> {
        let versions = StaticVersionResolver::with_defaults();
        let builder = TopologyBuilder::new(&versions, &BindMountResolver, &FixedProbe(false));
        builder.build(flags, volumes)
    }

    #[test]
    fn test_database_stack_service_order() {
        let topology = build(&flags(true, false), &sample_volumes(true)).unwrap();

        // dbは最後に置かれる
        assert_eq!(
            topology.service_names(),
            vec!["php", "nginx", "mailhog", "postfix", "db"]
        );
        assert_eq!(topology.service("php").unwrap().depends_on, vec!["db"]);
        assert_eq!(topology.created_volumes.as_ref().unwrap().len(), 11);
        assert!(!topology.network.enable_backend_network);
    }

    #[test]
    fn test_redis_stack_without_database() {
        let topology = build(&flags(false, true), &sample_volumes(false)).unwrap();

        assert_eq!(
            topology.service_names(),
            vec!["php", "nginx", "mailhog", "postfix", "redis"]
        );
        assert!(topology.network.enable_backend_network);
        assert_eq!(topology.created_volumes.as_ref().unwrap().len(), 8);
        assert_eq!(topology.service("php").unwrap().depends_on, vec!["redis"]);
    }

    #[test]
    fn test_core_services_present_for_all_flag_combinations() {
        for database in [false, true] {
            for redis in [false, true] {
                let topology =
                    build(&flags(database, redis), &sample_volumes(database)).unwrap();

                for name in ["php", "nginx", "mailhog", "postfix"] {
                    assert!(
                        topology.service(name).is_some(),
                        "{name} がトポロジに存在するべき (database={database}, redis={redis})"
                    );
                }
                assert_eq!(topology.service("db").is_some(), database);
                assert_eq!(topology.service("redis").is_some(), redis);
            }
        }
    }

    #[test]
    fn test_every_service_carries_ownership_label() {
        let topology = build(&flags(true, true), &sample_volumes(true)).unwrap();

        for service in &topology.services {
            assert_eq!(
                service.labels.get("io.easyengine.site"),
                Some(&"${VIRTUAL_HOST}".to_string()),
                "{} に所有ラベルが必要",
                service.name
            );
        }
    }

    #[test]
    fn test_php_depends_on_db_then_redis() {
        let topology = build(&flags(true, true), &sample_volumes(true)).unwrap();
        assert_eq!(
            topology.service("php").unwrap().depends_on,
            vec!["db", "redis"]
        );
    }

    #[test]
    fn test_nginx_depends_on_php() {
        let topology = build(&flags(false, false), &sample_volumes(false)).unwrap();
        assert_eq!(topology.service("nginx").unwrap().depends_on, vec!["php"]);
        assert!(topology.service("mailhog").unwrap().depends_on.is_empty());
    }

    #[test]
    fn test_external_volume_names() {
        let topology = build(&flags(true, false), &sample_volumes(true)).unwrap();
        let volumes = topology.created_volumes.as_ref().unwrap();

        let names: Vec<String> = volumes.iter().map(ExternalVolume::full_name).collect();
        assert_eq!(
            names,
            vec![
                "site1_htdocs",
                "site1_config_nginx",
                "site1_config_php",
                "site1_log_php",
                "site1_log_nginx",
                "site1_data_postfix",
                "site1_ssl_postfix",
                "site1_config_postfix",
                "site1_db_data",
                "site1_db_conf",
                "site1_db_logs",
            ]
        );
    }

    #[test]
    fn test_database_only_volumes_absent_without_database() {
        let topology = build(&flags(false, false), &sample_volumes(false)).unwrap();
        let volumes = topology.created_volumes.as_ref().unwrap();

        assert_eq!(volumes.len(), 8);
        assert!(volumes.iter().all(|v| !v.name.starts_with("db_")));
    }

    #[test]
    fn test_nohttps_appends_last_environment_entry() {
        let mut site_flags = flags(false, false);
        site_flags.no_https = true;

        let topology = build(&site_flags, &sample_volumes(false)).unwrap();
        let nginx = topology.service("nginx").unwrap();
        assert_eq!(
            nginx.environment.last().unwrap(),
            "HTTPS_METHOD=nohttps"
        );

        // フラグなしでは現れない
        let topology = build(&flags(false, false), &sample_volumes(false)).unwrap();
        let nginx = topology.service("nginx").unwrap();
        assert!(
            !nginx
                .environment
                .iter()
                .any(|e| e == "HTTPS_METHOD=nohttps")
        );
    }

    #[test]
    fn test_php56_selects_legacy_image_family() {
        let mut site_flags = flags(false, false);
        site_flags.php_version = PhpVersion::parse("5.6");

        let topology = build(&site_flags, &sample_volumes(false)).unwrap();
        assert!(
            topology
                .service("php")
                .unwrap()
                .image
                .starts_with("easyengine/php5.6:")
        );

        site_flags.php_version = PhpVersion::parse("7.4");
        let topology = build(&site_flags, &sample_volumes(false)).unwrap();
        assert!(
            topology
                .service("php")
                .unwrap()
                .image
                .starts_with("easyengine/php:")
        );
    }

    #[test]
    fn test_php_site_network_alias() {
        let topology = build(&flags(false, false), &sample_volumes(false)).unwrap();
        let php = topology.service("php").unwrap();

        let site_net = php
            .networks
            .iter()
            .find(|n| n.name == "site-network")
            .unwrap();
        assert_eq!(site_net.aliases, vec!["${VIRTUAL_HOST}_php"]);
    }

    #[test]
    fn test_global_db_joins_php_to_backend_network() {
        let mut site_flags = flags(false, false);
        site_flags.global_db = true;

        let topology = build(&site_flags, &sample_volumes(false)).unwrap();
        let php = topology.service("php").unwrap();
        assert!(
            php.networks
                .iter()
                .any(|n| n.name == "global-backend-network")
        );

        // nginxはglobal_dbでは参加しない
        let nginx = topology.service("nginx").unwrap();
        assert!(
            !nginx
                .networks
                .iter()
                .any(|n| n.name == "global-backend-network")
        );
    }

    #[test]
    fn test_global_redis_joins_nginx_to_backend_network() {
        let mut site_flags = flags(false, false);
        site_flags.global_redis = true;

        let topology = build(&site_flags, &sample_volumes(false)).unwrap();
        let nginx = topology.service("nginx").unwrap();
        assert!(
            nginx
                .networks
                .iter()
                .any(|n| n.name == "global-backend-network")
        );
    }

    #[test]
    fn test_db_environment_entries_are_names_only() {
        let topology = build(&flags(true, false), &sample_volumes(true)).unwrap();
        let db = topology.service("db").unwrap();

        assert_eq!(
            db.environment,
            vec![
                "MYSQL_ROOT_PASSWORD",
                "MYSQL_DATABASE",
                "MYSQL_USER",
                "MYSQL_PASSWORD"
            ]
        );
        assert!(db.environment.iter().all(|e| !e.contains('=')));
    }

    #[test]
    fn test_postfix_hostname_and_mailhog_command() {
        let topology = build(&flags(false, false), &sample_volumes(false)).unwrap();

        let postfix = topology.service("postfix").unwrap();
        assert_eq!(postfix.hostname.as_deref(), Some("${VIRTUAL_HOST}"));

        let mailhog = topology.service("mailhog").unwrap();
        assert_eq!(
            mailhog.command.as_deref(),
            Some(r#"["-invite-jim=false"]"#)
        );
    }

    #[test]
    fn test_build_is_idempotent() {
        let site_flags = flags(true, true);
        let volumes = sample_volumes(true);

        let first = build(&site_flags, &volumes).unwrap();
        let second = build(&site_flags, &volumes).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_php_volume_spec_fails() {
        let mut volumes = sample_volumes(false);
        let _ = volumes.remove("php");

        let err = build(&flags(false, false), &volumes).unwrap_err();
        match err {
            TopologyError::MissingVolumeSpec { component } => assert_eq!(component, "php"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_db_volume_spec_fails_only_with_database() {
        // databaseフラグなしではdbエントリは要求されない
        assert!(build(&flags(false, false), &sample_volumes(false)).is_ok());

        let err = build(&flags(true, false), &sample_volumes(false)).unwrap_err();
        match err {
            TopologyError::MissingVolumeSpec { component } => assert_eq!(component, "db"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_component_version_aborts_build() {
        // mailhogだけ未登録のレジストリ
        let mut versions = StaticVersionResolver::new();
        for repo in [
            "easyengine/mariadb",
            "easyengine/php",
            "easyengine/nginx",
            "easyengine/postfix",
            "easyengine/redis",
        ] {
            versions.insert(repo, "v4.0.0");
        }

        let builder = TopologyBuilder::new(&versions, &BindMountResolver, &FixedProbe(false));
        let err = builder
            .build(&flags(false, false), &sample_volumes(false))
            .unwrap_err();
        match err {
            TopologyError::UnknownComponentVersion { component } => {
                assert_eq!(component, "easyengine/mailhog");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_version_registry_fails_on_first_component() {
        let versions = StaticVersionResolver::new();
        let builder = TopologyBuilder::new(&versions, &BindMountResolver, &FixedProbe(false));

        let err = builder
            .build(&flags(true, false), &sample_volumes(true))
            .unwrap_err();
        // 組み立て順でdbのイメージが最初に解決される
        match err {
            TopologyError::UnknownComponentVersion { component } => {
                assert_eq!(component, "easyengine/mariadb");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_mount_resolution_failure_aborts_build() {
        let mut volumes = sample_volumes(false);
        volumes.insert(
            "nginx".to_string(),
            vec![request("site1_htdocs", "relative/path")],
        );

        let err = build(&flags(false, false), &volumes).unwrap_err();
        match err {
            TopologyError::MountResolutionFailed { component, .. } => {
                assert_eq!(component, "nginx");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_native_volume_host_omits_created_volumes() {
        let versions = StaticVersionResolver::with_defaults();
        let builder = TopologyBuilder::new(&versions, &BindMountResolver, &FixedProbe(true));

        let topology = builder
            .build(&flags(true, false), &sample_volumes(true))
            .unwrap();
        assert!(topology.created_volumes.is_none());
    }

    #[test]
    fn test_network_metadata_labels() {
        let topology = build(&flags(false, false), &sample_volumes(false)).unwrap();
        assert_eq!(
            topology.network.labels,
            vec![
                "org.label-schema.vendor=EasyEngine",
                "io.easyengine.site=${VIRTUAL_HOST}"
            ]
        );
    }

    #[test]
    fn test_all_services_restart_always() {
        let topology = build(&flags(true, true), &sample_volumes(true)).unwrap();
        for service in &topology.services {
            assert_eq!(
                service.restart,
                RestartPolicy::Always,
                "{} の再起動ポリシー",
                service.name
            );
        }
    }

    #[test]
    fn test_resolved_mounts_attached_to_services() {
        let topology = build(&flags(true, false), &sample_volumes(true)).unwrap();

        let php = topology.service("php").unwrap();
        assert_eq!(php.volumes.len(), 2);
        assert_eq!(php.volumes[0].host, "site1_htdocs");
        assert_eq!(php.volumes[0].container, "/var/www/htdocs");

        // mailhogとredisはボリュームを持たない
        assert!(topology.service("mailhog").unwrap().volumes.is_empty());
    }
}
