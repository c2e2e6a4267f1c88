// ============================================================================
// 生成相关 Commands
// 负责：收集表单字段、补全已保存的配置、验证输入、调用构建服务、保存配置
// ============================================================================

use std::path::PathBuf;

use crate::config_store::ConfigStore;
use crate::models::dtos::{BuildResult, GenerationRequest, SavedConfig};
use crate::services::builder::{build_aia, BuildOptions};
use crate::services::packer::{validate_generation_params, GenerationParams};

/// 前端收集到的原始表单内容
///
/// 用户 ID、API Key、搜索引擎 ID 为空时使用已保存的配置。
#[derive(Clone, Debug, Default)]
pub struct GenerateInput {
    pub project_name: String,
    pub user_id: Option<String>,
    pub api_key: Option<String>,
    pub cse_id: Option<String>,
    pub search_prompt: String,
    pub requirements: String,
    pub extensions: Vec<PathBuf>,
    /// 未指定时输出到当前目录下的 `<项目名>.aia`
    pub output: Option<PathBuf>,
    /// 构建成功后是否保存配置
    pub save_config: bool,
}

/// 去除首尾空白；用户未填写时退回已保存的值
fn field_or_saved(value: Option<&str>, saved: &str) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => saved.trim().to_string(),
    }
}

/// 把表单内容整理为已验证的 GenerationRequest
pub fn prepare_request(input: &GenerateInput, saved: &SavedConfig) -> Result<GenerationRequest, String> {
    let project_name = input.project_name.trim().to_string();
    let user_id = field_or_saved(input.user_id.as_deref(), &saved.user_id);
    let api_key = field_or_saved(input.api_key.as_deref(), &saved.api_key);
    let cse_id = field_or_saved(input.cse_id.as_deref(), &saved.cse_id);
    let search_prompt = input.search_prompt.trim().to_string();

    validate_generation_params(&GenerationParams {
        project_name: &project_name,
        user_id: &user_id,
        api_key: &api_key,
        cse_id: &cse_id,
        search_prompt: &search_prompt,
    })?;

    let output_path = input
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{}.aia", project_name)));

    Ok(GenerationRequest {
        project_name,
        user_id,
        api_key,
        search_engine_id: cse_id,
        search_prompt,
        requirements_text: input.requirements.trim().to_string(),
        extension_paths: input.extensions.clone(),
        output_path,
    })
}

/// 生成 .aia：验证 → 构建 → （成功后）保存配置
///
/// 配置只在构建完全成功后更新；配置保存失败不影响已生成的文件，只记录警告。
pub fn generate(
    input: GenerateInput,
    store: &ConfigStore,
    options: &BuildOptions,
) -> Result<BuildResult, String> {
    let saved = store.load()?;
    let request = prepare_request(&input, &saved)?;

    let result = build_aia(&request, options)?;

    if input.save_config {
        let config = SavedConfig {
            user_id: request.user_id.clone(),
            api_key: request.api_key.clone(),
            cse_id: request.search_engine_id.clone(),
        };
        if let Err(e) = store.save(&config) {
            log::warn!("{}", e);
        }
    }

    Ok(result)
}
