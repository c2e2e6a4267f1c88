// ============================================================================
// 持久化配置：用户 ID、API Key、搜索引擎 ID
// 以单个 JSON 对象保存，每次成功构建后整体覆盖
// ============================================================================

use std::path::{Path, PathBuf};

use crate::models::dtos::SavedConfig;
use crate::utils::error::{AppError, AppResult};

/// 默认配置文件名（位于用户主目录下）
pub const CONFIG_FILE_NAME: &str = "aia_generator_config.json";

/// 配置文件读写
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 默认位置：`~/aia_generator_config.json`，无法获取主目录时退回当前目录
    pub fn default_location() -> Self {
        let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::new(dir.join(CONFIG_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 读取配置；文件不存在时返回空配置
    pub fn load(&self) -> AppResult<SavedConfig> {
        if !self.path.exists() {
            log::debug!("配置文件不存在: {}", self.path.display());
            return Ok(SavedConfig::default());
        }

        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            AppError::ConfigError(format!("无法读取 {}: {}", self.path.display(), e))
        })?;
        let config = serde_json::from_str(&content).map_err(|e| {
            AppError::ConfigError(format!("无法解析 {}: {}", self.path.display(), e))
        })?;
        log::info!("已加载配置: {}", self.path.display());
        Ok(config)
    }

    /// 整体覆盖写入配置
    pub fn save(&self, config: &SavedConfig) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::ConfigError(format!("无法创建目录 {}: {}", parent.display(), e))
            })?;
        }

        let content = serde_json::to_string_pretty(config)
            .map_err(|e| AppError::ConfigError(format!("无法序列化配置: {}", e)))?;
        std::fs::write(&self.path, content).map_err(|e| {
            AppError::ConfigError(format!("无法写入 {}: {}", self.path.display(), e))
        })?;
        log::info!("配置已保存: {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> SavedConfig {
        SavedConfig {
            user_id: "dev42".to_string(),
            api_key: "KEY".to_string(),
            cse_id: "CSE1".to_string(),
        }
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path().join("config.json"));
        assert_eq!(store.load().unwrap(), SavedConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path().join("nested").join("config.json"));
        store.save(&sample()).unwrap();
        assert_eq!(store.load().unwrap(), sample());
    }

    #[test]
    fn test_save_overwrites_in_full() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path().join("config.json"));
        store.save(&sample()).unwrap();

        let updated = SavedConfig {
            user_id: "other".to_string(),
            ..SavedConfig::default()
        };
        store.save(&updated).unwrap();
        assert_eq!(store.load().unwrap(), updated);
    }

    #[test]
    fn test_file_uses_snake_case_keys() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path().join("config.json"));
        store.save(&sample()).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["user_id"], "dev42");
        assert_eq!(raw["api_key"], "KEY");
        assert_eq!(raw["cse_id"], "CSE1");
    }

    #[test]
    fn test_unknown_and_missing_keys_are_tolerated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"user_id":"u","savedAt":"2024-01-01"}"#).unwrap();

        let config = ConfigStore::new(&path).load().unwrap();
        assert_eq!(config.user_id, "u");
        assert_eq!(config.api_key, "");
    }

    #[test]
    fn test_corrupt_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            ConfigStore::new(&path).load(),
            Err(AppError::ConfigError(_))
        ));
    }
}
