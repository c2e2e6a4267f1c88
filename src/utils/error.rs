// ============================================================================
// 统一错误类型定义
// 使用 thiserror 派生宏，覆盖 .aia 生成流程中的所有失败场景
// ============================================================================

use std::path::PathBuf;

use thiserror::Error;

/// 应用统一错误枚举
///
/// 每个变体对应一类错误，按照发生阶段划分：
/// 输入校验 → 文件系统前置条件 → 写入后完整性 → 其他意外错误。
/// 通过 `impl From<AppError> for String` 让 command 层直接返回 `Result<T, String>`。
#[derive(Debug, Error)]
pub enum AppError {
    /// 参数验证失败（如必填字段为空、项目名称包含非字母数字字符）
    #[error("验证失败：{0}")]
    ValidationError(String),

    /// 输出目录不存在或不可写
    #[error("输出目录不可写：{}", .0.display())]
    OutputNotWritable(PathBuf),

    /// 扩展文件不存在
    #[error("扩展文件不存在：{}", .0.display())]
    NotFound(PathBuf),

    /// 写入阶段结束后缺少必需文件
    #[error("缺少必需文件：{}", .0.display())]
    MissingFile(PathBuf),

    /// 压缩完成后归档文件不存在或为空
    #[error(".aia 文件未生成或为空：{}", .0.display())]
    EmptyArchive(PathBuf),

    /// 构建过程中的其他错误（如写入文件、ZIP 打包失败）
    #[error("构建失败：{0}")]
    BuildError(String),

    /// 配置文件读写失败
    #[error("配置错误：{0}")]
    ConfigError(String),
}

/// 便捷类型别名，统一项目内的 Result 签名
pub type AppResult<T> = Result<T, AppError>;

/// 将 AppError 转换为 String，供 command 层向用户展示
impl From<AppError> for String {
    fn from(err: AppError) -> Self {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_contains_path() {
        let err = AppError::NotFound(PathBuf::from("missing.aix"));
        let msg: String = err.into();
        assert!(msg.contains("missing.aix"));
        assert!(msg.contains("扩展文件不存在"));
    }
}
