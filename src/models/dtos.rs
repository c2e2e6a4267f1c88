// ============================================================================
// 数据传输对象（DTO）定义
// 前端（CLI）与构建服务之间传递的数据结构，仅包含字段定义和序列化派生
// ⛔ 禁止：包含复杂的业务逻辑方法
// ============================================================================

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// 一次 .aia 生成请求，由前端构造一次后按值传入构建服务
///
/// 构建服务不会重新校验字段内容（非空、项目名称字母数字），
/// 这些约束由 `commands::generate::prepare_request`
/// （调用 `services::packer::validate_generation_params`）负责。
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct GenerationRequest {
    /// 项目名称，仅包含字母和数字
    pub project_name: String,
    /// App Inventor 用户 ID，用于拼接 `ai_<user_id>` 源码路径
    pub user_id: String,
    /// Google API Key
    pub api_key: String,
    /// 自定义搜索引擎 ID（cx）
    pub search_engine_id: String,
    /// 搜索框的初始文本
    pub search_prompt: String,
    /// 自由文本的功能需求，可为空
    pub requirements_text: String,
    /// 用户选择的扩展文件（.aix），保持选择顺序
    pub extension_paths: Vec<PathBuf>,
    /// 生成的 .aia 文件路径
    pub output_path: PathBuf,
}

/// 从需求文本推导出的功能开关，每次构建重新计算，不做持久化
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FeatureFlags {
    /// 使用 ListView 展示搜索结果（否则使用 Label）
    pub use_list_view: bool,
    /// 添加播放声音的按钮和 Sound 组件
    pub play_sound: bool,
}

/// 构建结果，由 `generate` command 返回
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct BuildResult {
    /// 生成的 .aia 文件的完整路径
    pub aia_path: String,
    /// 项目名称
    pub project_name: String,
    /// .aia 文件大小（字节）
    pub size_bytes: u64,
    /// 打包的扩展数量
    pub extension_count: usize,
    /// 本次构建使用的功能开关
    pub features: FeatureFlags,
}

/// 持久化的用户配置，在多次运行之间复用
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct SavedConfig {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub cse_id: String,
}
