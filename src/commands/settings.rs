// ============================================================================
// 配置相关 Commands
// 负责：查看已保存的配置
// ============================================================================

use crate::config_store::ConfigStore;
use crate::models::dtos::SavedConfig;

/// 遮盖 API Key，只保留末尾 4 个字符
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), visible)
}

/// 读取已保存的配置（API Key 已遮盖），用于展示
pub fn show_config(store: &ConfigStore) -> Result<SavedConfig, String> {
    let config = store.load()?;
    Ok(SavedConfig {
        api_key: mask_secret(&config.api_key),
        ..config
    })
}
