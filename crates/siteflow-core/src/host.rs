//! ホスト能力の検出

/// ホストがボリュームをネイティブ管理するかの判定
pub trait HostProbe {
    fn manages_volumes_natively(&self) -> bool;
}

/// 実行プラットフォームによる判定
///
/// macOSではコンテナランタイム側がボリュームを管理するため、
/// compose文書側での外部ボリューム宣言は不要になる。
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformProbe;

impl HostProbe for PlatformProbe {
    fn manages_volumes_natively(&self) -> bool {
        cfg!(target_os = "macos")
    }
}

/// 固定値を返すプローブ（テスト・強制指定用）
#[derive(Debug, Clone, Copy)]
pub struct FixedProbe(pub bool);

impl HostProbe for FixedProbe {
    fn manages_volumes_natively(&self) -> bool {
        self.0
    }
}
