// ============================================================================
// 需求解析：从自由文本中识别功能开关
// 纯函数，无副作用
// ============================================================================

use crate::models::dtos::FeatureFlags;

/// 触发 ListView 展示的短语
const LIST_VIEW_PHRASES: &[&str] = &["list view", "show results in list"];

/// 触发声音播放的短语
const PLAY_SOUND_PHRASES: &[&str] = &["play a sound"];

/// 解析需求文本，返回功能开关
///
/// 文本转为小写后做子串匹配。不处理否定语义，
/// 例如 "no list view" 同样会开启 `use_list_view`。
pub fn parse_requirements(requirements: &str) -> FeatureFlags {
    let text = requirements.to_lowercase();
    let contains_any = |phrases: &[&str]| phrases.iter().any(|p| text.contains(p));

    FeatureFlags {
        use_list_view: contains_any(LIST_VIEW_PHRASES),
        play_sound: contains_any(PLAY_SOUND_PHRASES),
    }
}
