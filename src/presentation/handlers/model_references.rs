//! 模型目录处理器
//!
//! 套餐编辑器的模型选择器用的只读常量表

use axum::response::Json;
use serde::Serialize;
use tracing::instrument;

use crate::shared::AppResult;

/// 提供商与其可选模型
#[derive(Debug, Serialize)]
pub struct ProviderModels {
    pub provider: &'static str,
    pub label: &'static str,
    pub models: &'static [&'static str],
}

const MODEL_REFERENCES: &[ProviderModels] = &[
    ProviderModels {
        provider: "gemini",
        label: "Gemini CLI",
        models: &["gemini-2.5-pro", "gemini-2.5-flash", "gemini-2.0-flash"],
    },
    ProviderModels {
        provider: "codex",
        label: "Codex",
        models: &["gpt-5", "gpt-5-codex", "codex-mini-latest"],
    },
    ProviderModels {
        provider: "claude",
        label: "Claude Code",
        models: &[
            "claude-sonnet-4-20250514",
            "claude-opus-4-20250514",
            "claude-3-5-haiku-20241022",
        ],
    },
    ProviderModels {
        provider: "antigravity",
        label: "Antigravity",
        models: &["gemini-2.5-pro", "gemini-2.5-flash"],
    },
    ProviderModels {
        provider: "openai",
        label: "OpenAI API",
        models: &["gpt-4o", "gpt-4o-mini", "o3-mini"],
    },
];

/// 获取模型目录
#[instrument]
pub async fn list_model_references() -> AppResult<Json<&'static [ProviderModels]>> {
    Ok(Json(MODEL_REFERENCES))
}
