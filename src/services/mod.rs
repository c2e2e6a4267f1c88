// ============================================================================
// 业务层：纯 Rust 核心逻辑
// ✅ 特点：不依赖命令行解析，保持纯净，方便写 #[test]
// ⛔ 禁止：直接读取全局状态或打印面向用户的输出
// ============================================================================

pub mod builder;
pub mod descriptor;
pub mod extensions;
pub mod features;
pub mod layout;
pub mod packer;
pub mod screen_plan;

// ============================================================================
// 常量定义：.aia 归档内的固定路径和文件名
// ============================================================================

/// 资源目录
pub const ASSETS_DIR: &str = "assets";

/// 扩展组件目录（位于 assets/ 下）
pub const EXTERNAL_COMPS_DIR: &str = "external_comps";

/// 项目元数据目录
pub const PROJECT_META_DIR: &str = "youngandroidproject";

/// 项目属性文件名
pub const PROPERTIES_FILE_NAME: &str = "project.properties";

/// 界面声明文件名
pub const SCM_FILE_NAME: &str = "Screen1.scm";

/// Blockly 逻辑文件名
pub const BKY_FILE_NAME: &str = "Screen1.bky";

/// 占位音频文件名
pub const SOUND_FILE_NAME: &str = "sample_sound.mp3";

/// 临时工作目录名前缀，完整名称为 `temp_<项目名>_<随机后缀>`
pub const SCRATCH_DIR_PREFIX: &str = "temp_";
