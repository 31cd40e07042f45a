//! compose文書のレンダリング
//!
//! トポロジをTeraコンテキストに束縛し、埋め込みテンプレートで
//! 文書化します。テンプレートはIDで選択します。

use crate::error::{ComposeError, Result};
use siteflow_core::Topology;
use tera::{Context, Tera};
use tracing::debug;

/// phpサイト用テンプレートID
pub const PHP_TEMPLATE: &str = "php";

const PHP_TEMPLATE_SOURCE: &str = include_str!("../resources/templates/docker-compose.yml.tera");

/// トポロジレンダラー
///
/// 埋め込みテンプレートを登録済みのTeraインスタンスを保持する。
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    /// 埋め込みテンプレートを登録してレンダラーを作成
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(PHP_TEMPLATE, PHP_TEMPLATE_SOURCE)
            .map_err(|e| ComposeError::Template {
                id: PHP_TEMPLATE.to_string(),
                message: render_error_detail(&e),
            })?;
        Ok(Self { tera })
    }

    /// トポロジを指定テンプレートで文書化
    pub fn render(&self, template_id: &str, topology: &Topology) -> Result<String> {
        if !self
            .tera
            .get_template_names()
            .any(|name| name == template_id)
        {
            return Err(ComposeError::TemplateNotFound(template_id.to_string()));
        }

        let context = Context::from_serialize(topology)
            .map_err(|e| ComposeError::Serialize(e.to_string()))?;

        debug!(
            template = %template_id,
            services = topology.services.len(),
            "Rendering topology"
        );

        self.tera
            .render(template_id, &context)
            .map_err(|e| ComposeError::Render(render_error_detail(&e)))
    }
}

/// Teraエラーからエラーチェーンの詳細を抽出
fn render_error_detail(e: &tera::Error) -> String {
    use std::error::Error;

    let mut details = vec![e.to_string()];
    let mut source = e.source();
    while let Some(err) = source {
        details.push(err.to_string());
        source = err.source();
    }
    details.join(" | ")
}
