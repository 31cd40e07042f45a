//! SiteFlow Core — サイトトポロジの構築
//!
//! 構成フラグとボリューム定義から、1サイト分のコンテナトポロジ
//! （サービス・ネットワーク・外部ボリューム）を決定的に組み立てます。
//!
//! # 概要
//!
//! - **model**: トポロジのデータモデル
//! - **builder**: トポロジビルダー本体
//! - **resolver**: イメージバージョン解決・マウント解決
//! - **host**: ホスト能力の検出
//! - **parser**: KDLサイト定義のパース

pub mod builder;
pub mod constants;
pub mod error;
pub mod host;
pub mod model;
pub mod parser;
pub mod resolver;

pub use builder::*;
pub use error::*;
pub use host::*;
pub use model::*;
pub use parser::*;
pub use resolver::*;
