// ============================================================================
// 打包服务：输入参数验证、必需文件检查、ZIP 打包与结果校验
// 纯 Rust 函数，不依赖命令行，方便单元测试
// ============================================================================

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::utils::error::{AppError, AppResult};

/// 项目名称规则：只允许字母和数字
static PROJECT_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]+$").expect("valid project name regex"));

/// 待验证的表单字段（已去除首尾空白）
pub struct GenerationParams<'a> {
    pub project_name: &'a str,
    pub user_id: &'a str,
    pub api_key: &'a str,
    pub cse_id: &'a str,
    pub search_prompt: &'a str,
}

/// 验证构建参数：必填字段非空，项目名称仅含字母和数字
///
/// 需求文本可以为空，不参与验证。
pub fn validate_generation_params(params: &GenerationParams<'_>) -> AppResult<()> {
    let required = [
        ("项目名称", params.project_name),
        ("用户 ID", params.user_id),
        ("API Key", params.api_key),
        ("搜索引擎 ID", params.cse_id),
        ("搜索提示词", params.search_prompt),
    ];

    let missing: Vec<&str> = required
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(label, _)| *label)
        .collect();

    if !missing.is_empty() {
        return Err(AppError::ValidationError(format!(
            "以下字段不能为空：{}",
            missing.join("、")
        )));
    }

    if !is_valid_project_name(params.project_name) {
        return Err(AppError::ValidationError(
            "项目名称只能包含字母和数字".to_string(),
        ));
    }

    Ok(())
}

/// 项目名称是否只包含 ASCII 字母和数字
pub fn is_valid_project_name(name: &str) -> bool {
    PROJECT_NAME_RE.is_match(name)
}

/// 按顺序检查必需文件，返回第一个不存在的路径
pub fn verify_required_files(paths: &[PathBuf]) -> AppResult<()> {
    for path in paths {
        if !path.is_file() {
            return Err(AppError::MissingFile(path.clone()));
        }
    }
    Ok(())
}

/// 将目录内容打包为 ZIP 文件
///
/// 所有条目都放在 `root_folder/` 之下，只写入普通文件，不写目录条目。
/// 返回写入的条目名称列表。
pub fn create_zip_from_dir(src_dir: &Path, zip_path: &Path, root_folder: &str) -> AppResult<Vec<String>> {
    let file = std::fs::File::create(zip_path)
        .map_err(|e| AppError::BuildError(format!("打包 ZIP 时出错 - 无法创建 ZIP 文件: {}", e)))?;
    let mut zip_writer = zip::ZipWriter::new(file);

    // 设置 ZIP 压缩选项（使用 Deflated 压缩）
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);

    let mut entry_names = Vec::new();

    for entry in walkdir::WalkDir::new(src_dir).sort_by_file_name() {
        let entry = entry
            .map_err(|e| AppError::BuildError(format!("打包 ZIP 时出错 - 遍历目录失败: {}", e)))?;

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative_path = path
            .strip_prefix(src_dir)
            .map_err(|e| AppError::BuildError(format!("打包 ZIP 时出错 - 路径处理失败: {}", e)))?;

        // 统一使用正斜杠作为 ZIP 内路径分隔符
        let zip_entry_name = format!(
            "{}/{}",
            root_folder,
            relative_path.to_string_lossy().replace('\\', "/")
        );

        zip_writer
            .start_file(zip_entry_name.as_str(), options)
            .map_err(|e| AppError::BuildError(format!("打包 ZIP 时出错 - 添加文件失败: {}", e)))?;

        // 流式写入：分块读取文件，避免大文件一次性加载到内存
        let mut file = std::fs::File::open(path)
            .map_err(|e| AppError::BuildError(format!("打包 ZIP 时出错 - 读取文件失败: {}", e)))?;
        let mut buf = [0u8; 64 * 1024]; // 64KB 缓冲区
        loop {
            let n = file
                .read(&mut buf)
                .map_err(|e| AppError::BuildError(format!("打包 ZIP 时出错 - 读取文件失败: {}", e)))?;
            if n == 0 {
                break;
            }
            zip_writer
                .write_all(&buf[..n])
                .map_err(|e| AppError::BuildError(format!("打包 ZIP 时出错 - 写入文件失败: {}", e)))?;
        }

        log::debug!("已加入归档: {} -> {}", path.display(), zip_entry_name);
        entry_names.push(zip_entry_name);
    }

    zip_writer
        .finish()
        .map_err(|e| AppError::BuildError(format!("打包 ZIP 时出错 - 完成写入失败: {}", e)))?;

    Ok(entry_names)
}

/// 校验生成的归档：文件必须存在且非空，返回文件大小
pub fn verify_archive(zip_path: &Path) -> AppResult<u64> {
    match std::fs::metadata(zip_path) {
        Ok(meta) if meta.is_file() && meta.len() > 0 => Ok(meta.len()),
        _ => Err(AppError::EmptyArchive(zip_path.to_path_buf())),
    }
}

// ============================================================================
// 单元测试
// ============================================================================
