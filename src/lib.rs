// ============================================================================
// [总线] 程序的组装车间
// ✅ 只能做：pub mod 暴露子模块、解析命令行、分发到 commands
// ⛔ 禁止：直接实现业务逻辑
// ============================================================================

pub mod cli;
pub mod commands;
pub mod config_store;
pub mod models;
pub mod services;
pub mod utils;

use anyhow::{anyhow, Result};
use clap::Parser;

use crate::cli::{Cli, Command};
use crate::config_store::ConfigStore;
use crate::services::builder::BuildOptions;

// ============================================================================
// 应用入口
// ============================================================================

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let store = cli
        .config
        .clone()
        .map(ConfigStore::new)
        .unwrap_or_else(ConfigStore::default_location);

    match cli.command {
        Command::Generate(args) => {
            let mut options = BuildOptions::default();
            if let Some(dir) = &args.work_dir {
                options.work_root = dir.clone();
            }

            let result = commands::generate::generate(args.to_input(), &store, &options)
                .map_err(|e| anyhow!("生成 .aia 文件失败：{}", e))?;
            println!("Created {} ({} bytes)", result.aia_path, result.size_bytes);
        }
        Command::Config => {
            let config = commands::settings::show_config(&store).map_err(|e| anyhow!(e))?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
