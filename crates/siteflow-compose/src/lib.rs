//! SiteFlow Compose — トポロジのcompose文書化
//!
//! 組み立て済みトポロジをTeraテンプレートに束縛して、
//! コンテナオーケストレーター向けのcompose文書を生成します。

pub mod error;
pub mod template;

pub use error::*;
pub use template::*;
