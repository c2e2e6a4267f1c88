// ============================================================================
// 扩展文件复制：把用户选择的 .aix 原样复制到 assets/external_comps/
// ============================================================================

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::utils::error::{AppError, AppResult};

/// 已复制到临时目录中的扩展文件
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CopiedExtension {
    /// 原始文件名（含扩展名）
    pub file_name: String,
    /// 去掉扩展名的文件名，用于生成 external_comps 包名
    pub stem: String,
    /// 复制后的路径
    pub path: PathBuf,
}

/// 检查所有扩展文件都存在，第一个不存在的路径返回 `NotFound`
pub fn ensure_extensions_exist(paths: &[PathBuf]) -> AppResult<()> {
    match paths.iter().find(|p| !p.exists()) {
        Some(missing) => Err(AppError::NotFound(missing.clone())),
        None => Ok(()),
    }
}

/// 扩展文件的文件名和文件名主干
pub fn extension_names(path: &Path) -> AppResult<(String, String)> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| AppError::BuildError(format!("无效的扩展文件路径: {}", path.display())))?;
    let stem = Path::new(&file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| file_name.clone());
    Ok((file_name, stem))
}

/// 按输入顺序复制扩展文件，保留原始文件名，内容逐字节不变
pub fn copy_extensions(paths: &[PathBuf], dest_dir: &Path) -> AppResult<Vec<CopiedExtension>> {
    let mut copied = Vec::with_capacity(paths.len());
    let mut seen = HashSet::new();

    for source in paths {
        if !source.exists() {
            return Err(AppError::NotFound(source.clone()));
        }

        let (file_name, stem) = extension_names(source)?;
        if !seen.insert(file_name.clone()) {
            return Err(AppError::BuildError(format!("扩展文件名重复: {}", file_name)));
        }

        let target = dest_dir.join(&file_name);
        std::fs::copy(source, &target).map_err(|e| {
            AppError::BuildError(format!(
                "复制扩展时出错 - 无法复制 {} 到 {}: {}",
                source.display(),
                target.display(),
                e
            ))
        })?;
        log::debug!("已复制扩展: {} -> {}", source.display(), target.display());

        copied.push(CopiedExtension {
            file_name,
            stem,
            path: target,
        });
    }

    Ok(copied)
}
