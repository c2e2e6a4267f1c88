// ============================================================================
// 控制层：面向前端（命令行）的入口函数
// ✅ 只能做：整理输入、调用 services、把错误转换为可展示的 String
// ============================================================================

pub mod generate;
pub mod settings;
