//! モデル定義
//!
//! SiteFlowで使用されるデータモデルを定義します。
//! 各モデルは機能ごとにモジュールに分離されています。

mod flags;
mod network;
mod service;
mod topology;
mod volume;

// Re-exports
pub use flags::*;
pub use network::*;
pub use service::*;
pub use topology::*;
pub use volume::*;
