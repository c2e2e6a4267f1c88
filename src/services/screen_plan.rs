// ============================================================================
// 屏幕规划：功能开关 → 组件集合 + 事件处理器集合 的声明式映射表
// 与文件 IO 完全解耦，渲染阶段只依赖这里的结果
// ============================================================================

use crate::models::dtos::FeatureFlags;

/// Screen1 上可能出现的组件
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComponentKind {
    /// TextBox `SearchBox`
    SearchBox,
    /// Button `SearchButton`
    SearchButton,
    /// Web `Web1`，负责发起搜索请求
    Web,
    /// ListView `ResultListView`
    ResultList,
    /// Label `ResultLabel`
    ResultLabel,
    /// Button `SoundButton`
    SoundButton,
    /// Sound `Sound1`
    Sound,
}

impl ComponentKind {
    /// 组件在 .scm / .bky 中使用的 `$Name`
    pub fn component_name(self) -> &'static str {
        match self {
            ComponentKind::SearchBox => "SearchBox",
            ComponentKind::SearchButton => "SearchButton",
            ComponentKind::Web => "Web1",
            ComponentKind::ResultList => "ResultListView",
            ComponentKind::ResultLabel => "ResultLabel",
            ComponentKind::SoundButton => "SoundButton",
            ComponentKind::Sound => "Sound1",
        }
    }

    /// 组件类型（`$Type`）
    pub fn component_type(self) -> &'static str {
        match self {
            ComponentKind::SearchBox => "TextBox",
            ComponentKind::SearchButton | ComponentKind::SoundButton => "Button",
            ComponentKind::Web => "Web",
            ComponentKind::ResultList => "ListView",
            ComponentKind::ResultLabel => "Label",
            ComponentKind::Sound => "Sound",
        }
    }

    /// 组件版本号（`$Version`）
    pub fn version(self) -> &'static str {
        match self {
            ComponentKind::SearchBox | ComponentKind::Web => "6",
            ComponentKind::ResultLabel | ComponentKind::Sound => "6",
            ComponentKind::SearchButton | ComponentKind::SoundButton => "7",
            ComponentKind::ResultList => "8",
        }
    }
}

/// Screen1 上可能出现的事件处理器（Blockly `component_event`）
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandlerKind {
    /// SearchButton.Click：拼接搜索 URL 并调用 Web1.Get
    SearchClick,
    /// Web1.GotText：把结果 items 的 title 填入 ListView
    GotTextList,
    /// Web1.GotText：把结果的 title 写入 Label
    GotTextLabel,
    /// SoundButton.Click：播放 Sound1
    SoundClick,
}

/// 一次构建的屏幕规划
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScreenPlan {
    pub components: Vec<ComponentKind>,
    pub handlers: Vec<HandlerKind>,
}

impl ScreenPlan {
    /// 根据功能开关生成组件和事件处理器列表（顺序固定）
    pub fn for_features(flags: FeatureFlags) -> Self {
        let mut components = vec![
            ComponentKind::SearchBox,
            ComponentKind::SearchButton,
            ComponentKind::Web,
        ];
        let mut handlers = vec![HandlerKind::SearchClick];

        if flags.use_list_view {
            components.push(ComponentKind::ResultList);
            handlers.push(HandlerKind::GotTextList);
        } else {
            components.push(ComponentKind::ResultLabel);
            handlers.push(HandlerKind::GotTextLabel);
        }

        if flags.play_sound {
            components.push(ComponentKind::SoundButton);
            components.push(ComponentKind::Sound);
            handlers.push(HandlerKind::SoundClick);
        }

        Self {
            components,
            handlers,
        }
    }

    /// 是否需要在 assets/ 中生成占位音频文件
    pub fn needs_sound_asset(&self) -> bool {
        self.components.contains(&ComponentKind::Sound)
    }
}
