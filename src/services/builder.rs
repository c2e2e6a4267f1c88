// ============================================================================
// .aia 构建流程
// ============================================================================
//
// 状态流转：Validated → DirectoriesCreated → FilesWritten → ExtensionsCopied
//          → Verified → Archived → Done
// 任意阶段失败都会进入 Failed：先清理临时目录，再把错误返回给调用方。
// 临时目录的清理由 scopeguard 保证，成功和失败路径都只执行一次。

use std::path::{Path, PathBuf};

use scopeguard::ScopeGuard;
use time::OffsetDateTime;

use crate::models::dtos::{BuildResult, GenerationRequest};
use crate::services::descriptor::{render_project_properties, render_screen_bky, render_screen_scm};
use crate::services::extensions::{copy_extensions, ensure_extensions_exist, extension_names};
use crate::services::features::parse_requirements;
use crate::services::layout::{ensure_output_writable, ensure_user_segment, ArchiveLayout};
use crate::services::packer::{create_zip_from_dir, verify_archive, verify_required_files};
use crate::services::screen_plan::ScreenPlan;
use crate::utils::error::{AppError, AppResult};

/// 构建阶段
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildStage {
    Validated,
    DirectoriesCreated,
    FilesWritten,
    ExtensionsCopied,
    Verified,
    Archived,
    Done,
}

/// 构建选项：不属于用户输入、但会影响构建结果的环境参数
#[derive(Clone, Debug)]
pub struct BuildOptions {
    /// 临时工作目录的父目录
    pub work_root: PathBuf,
    /// 写入 project.properties 的生成时间
    pub generated_at: OffsetDateTime,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            work_root: std::env::temp_dir(),
            generated_at: OffsetDateTime::now_utc(),
        }
    }
}

/// 生成 .aia 文件
///
/// 请求必须已经通过验证。构建本身只额外检查输出目录可写、扩展文件存在。
pub fn build_aia(request: &GenerationRequest, options: &BuildOptions) -> AppResult<BuildResult> {
    log::info!(
        "开始生成 .aia: 项目 {}，扩展 {} 个",
        request.project_name,
        request.extension_paths.len()
    );

    let mut stage = BuildStage::Validated;
    match run_stages(request, options, &mut stage) {
        Ok(result) => {
            log::info!("生成完成: {} ({} 字节)", result.aia_path, result.size_bytes);
            Ok(result)
        }
        Err(e) => {
            log::warn!("构建在 {:?} 阶段之后失败: {}", stage, e);
            Err(e)
        }
    }
}

fn advance(stage: &mut BuildStage, next: BuildStage) {
    log::debug!("构建阶段: {:?} -> {:?}", stage, next);
    *stage = next;
}

fn run_stages(
    request: &GenerationRequest,
    options: &BuildOptions,
    stage: &mut BuildStage,
) -> AppResult<BuildResult> {
    // 1. 前置检查：不创建任何文件
    ensure_output_writable(&request.output_path)?;
    ensure_extensions_exist(&request.extension_paths)?;
    ensure_user_segment(&request.user_id)?;

    let features = parse_requirements(&request.requirements_text);
    let plan = ScreenPlan::for_features(features);
    log::info!("功能开关: {:?}", features);

    // 2. 创建临时目录，离开作用域时无论成功失败都会删除
    let layout = scopeguard::guard(
        ArchiveLayout::create(&options.work_root, request)?,
        |layout| {
            if let Err(e) = layout.close() {
                log::warn!("{}", e);
            }
        },
    );
    advance(stage, BuildStage::DirectoriesCreated);

    // 3. 写入描述文件
    let stems = request
        .extension_paths
        .iter()
        .map(|p| extension_names(p).map(|(_, stem)| stem))
        .collect::<AppResult<Vec<_>>>()?;

    let properties = render_project_properties(request, &stems, options.generated_at)?;
    let scm = render_screen_scm(request, &plan)?;
    let bky = render_screen_bky(request, &plan);

    let mut required = vec![layout.properties_path(), layout.scm_path(), layout.bky_path()];
    write_text(&required[0], &properties)?;
    write_text(&required[1], &scm)?;
    write_text(&required[2], &bky)?;

    if plan.needs_sound_asset() {
        let sound = layout.sound_path();
        write_text(&sound, "")?;
        log::debug!("已创建占位音频: {}", sound.display());
        required.push(sound);
    }
    advance(stage, BuildStage::FilesWritten);

    // 4. 复制扩展
    let copied = copy_extensions(&request.extension_paths, &layout.external_comps_dir)?;
    required.extend(copied.iter().map(|c| c.path.clone()));
    advance(stage, BuildStage::ExtensionsCopied);

    // 5. 校验必需文件
    verify_required_files(&required)?;
    advance(stage, BuildStage::Verified);

    // 6. 打包；失败时删除残缺的输出文件
    let partial_output = scopeguard::guard(request.output_path.clone(), |path| {
        if path.is_file() {
            if let Err(e) = std::fs::remove_file(&path) {
                log::warn!("无法删除残缺的归档 {}: {}", path.display(), e);
            }
        }
    });
    let entries = create_zip_from_dir(layout.root(), &request.output_path, &request.project_name)?;
    log::info!("已写入 {} 个归档条目", entries.len());
    advance(stage, BuildStage::Archived);

    let size_bytes = verify_archive(&request.output_path)?;
    ScopeGuard::into_inner(partial_output);
    advance(stage, BuildStage::Done);

    Ok(BuildResult {
        aia_path: request.output_path.to_string_lossy().to_string(),
        project_name: request.project_name.clone(),
        size_bytes,
        extension_count: copied.len(),
        features,
    })
}

fn write_text(path: &Path, content: &str) -> AppResult<()> {
    std::fs::write(path, content).map_err(|e| {
        AppError::BuildError(format!("无法写入文件 {}: {}", path.display(), e))
    })?;
    log::debug!("已写入: {}", path.display());
    Ok(())
}

// ============================================================================
// 单元测试
// ============================================================================
