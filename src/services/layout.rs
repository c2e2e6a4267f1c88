// ============================================================================
// 目录布局：输出目录可写性检查 + 临时工作目录的创建与清理
// ============================================================================

use std::path::{Component, Path, PathBuf};

use tempfile::TempDir;

use crate::models::dtos::GenerationRequest;
use crate::services::{
    ASSETS_DIR, BKY_FILE_NAME, EXTERNAL_COMPS_DIR, PROJECT_META_DIR, PROPERTIES_FILE_NAME,
    SCM_FILE_NAME, SCRATCH_DIR_PREFIX, SOUND_FILE_NAME,
};
use crate::utils::error::{AppError, AppResult};

/// 检查 .aia 输出路径所在目录存在且可写
///
/// 通过在目标目录中创建并立即删除一个临时文件来探测写权限，
/// 在写入任何构建文件之前调用，避免产生半成品。
pub fn ensure_output_writable(output_path: &Path) -> AppResult<()> {
    let dir = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    if !dir.is_dir() {
        return Err(AppError::OutputNotWritable(dir.to_path_buf()));
    }

    tempfile::Builder::new()
        .prefix(".aia-write-check")
        .tempfile_in(dir)
        .map(drop)
        .map_err(|_| AppError::OutputNotWritable(dir.to_path_buf()))
}

/// 检查 `ai_<user_id>` 只构成单个普通路径段
///
/// 含 `..` 或路径分隔符的用户 ID 会让源码目录逃出临时目录。
pub fn ensure_user_segment(user_id: &str) -> AppResult<()> {
    let segment = format!("ai_{}", user_id);
    let mut components = Path::new(&segment).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(AppError::BuildError(format!(
            "用户 ID 不能包含路径分隔符或 '..': {}",
            user_id
        ))),
    }
}

/// 一次构建独占的临时目录树
///
/// 目录名带随机后缀，同名项目的多次构建互不干扰。
pub struct ArchiveLayout {
    scratch: TempDir,
    /// `assets/`
    pub assets_dir: PathBuf,
    /// `assets/external_comps/`
    pub external_comps_dir: PathBuf,
    /// `src/appinventor/ai_<user_id>/<project_name>/`
    pub source_dir: PathBuf,
    /// `youngandroidproject/`
    pub project_meta_dir: PathBuf,
}

impl ArchiveLayout {
    /// 在 `work_root` 下创建临时目录及全部子目录
    ///
    /// 创建顺序：assets → external_comps → 源码目录 → youngandroidproject
    pub fn create(work_root: &Path, request: &GenerationRequest) -> AppResult<Self> {
        ensure_user_segment(&request.user_id)?;

        std::fs::create_dir_all(work_root).map_err(|e| {
            AppError::BuildError(format!("无法创建工作目录 {}: {}", work_root.display(), e))
        })?;

        let scratch = tempfile::Builder::new()
            .prefix(&format!("{}{}_", SCRATCH_DIR_PREFIX, request.project_name))
            .tempdir_in(work_root)
            .map_err(|e| AppError::BuildError(format!("无法创建临时目录: {}", e)))?;

        let root = scratch.path();
        let assets_dir = root.join(ASSETS_DIR);
        let external_comps_dir = assets_dir.join(EXTERNAL_COMPS_DIR);
        let source_dir = root
            .join("src")
            .join("appinventor")
            .join(format!("ai_{}", request.user_id))
            .join(&request.project_name);
        let project_meta_dir = root.join(PROJECT_META_DIR);

        for dir in [&assets_dir, &external_comps_dir, &source_dir, &project_meta_dir] {
            std::fs::create_dir_all(dir).map_err(|e| {
                AppError::BuildError(format!("无法创建目录 {}: {}", dir.display(), e))
            })?;
        }

        log::debug!("临时目录已创建: {}", root.display());

        Ok(Self {
            scratch,
            assets_dir,
            external_comps_dir,
            source_dir,
            project_meta_dir,
        })
    }

    /// 临时目录根路径
    pub fn root(&self) -> &Path {
        self.scratch.path()
    }

    pub fn properties_path(&self) -> PathBuf {
        self.project_meta_dir.join(PROPERTIES_FILE_NAME)
    }

    pub fn scm_path(&self) -> PathBuf {
        self.source_dir.join(SCM_FILE_NAME)
    }

    pub fn bky_path(&self) -> PathBuf {
        self.source_dir.join(BKY_FILE_NAME)
    }

    pub fn sound_path(&self) -> PathBuf {
        self.assets_dir.join(SOUND_FILE_NAME)
    }

    /// 删除整个临时目录
    pub fn close(self) -> AppResult<()> {
        let path = self.scratch.path().to_path_buf();
        self.scratch.close().map_err(|e| {
            AppError::BuildError(format!("无法删除临时目录 {}: {}", path.display(), e))
        })?;
        log::info!("临时目录已清理: {}", path.display());
        Ok(())
    }
}
