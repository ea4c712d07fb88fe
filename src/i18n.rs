//! Built-in UI strings for English and Chinese.
//!
//! Strings are looked up by [`Text`] key for a resolved [`Locale`]. The
//! `Auto` language setting follows the `LANG` family of environment
//! variables.

use serde::{Deserialize, Serialize};

use crate::model::{EndpointStyle, LengthUnit, PaletteColor};

/// Language preference stored in settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "auto")]
    Auto,
    #[serde(rename = "en")]
    English,
    #[serde(rename = "zh")]
    Chinese,
}

impl Language {
    pub const ALL: [Self; 3] = [Self::Auto, Self::English, Self::Chinese];

    /// Concrete locale, reading the environment for `Auto`
    pub fn resolve(self) -> Locale {
        match self {
            Self::English => Locale::En,
            Self::Chinese => Locale::Zh,
            Self::Auto => {
                let env = ["LC_ALL", "LC_MESSAGES", "LANG"]
                    .iter()
                    .filter_map(|key| std::env::var(key).ok())
                    .find(|value| !value.is_empty());
                locale_from_env(env.as_deref())
            }
        }
    }
}

/// A language strings can actually be rendered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    Zh,
}

fn locale_from_env(value: Option<&str>) -> Locale {
    match value {
        Some(v) if v.to_ascii_lowercase().starts_with("zh") => Locale::Zh,
        _ => Locale::En,
    }
}

/// Keys of translatable UI strings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Text {
    AppTitle,
    Photos,
    AddPhoto,
    Open,
    Export,
    Delete,
    DeletePhotoTitle,
    DeletePhotoConfirm,
    Cancel,
    Ok,
    Annotations,
    AddAnnotation,
    Undo,
    Settings,
    NoPhotoHint,
    NoPhotos,
    NoAnnotations,
    AnnotationCount,
    EditAnnotation,
    Value,
    Unit,
    Color,
    Width,
    Save,
    Close,
    EndpointStyle,
    Language,
    ExportScaleCap,
    DefaultUnit,
    ShowIds,
    LabelFont,
    Browse,
    Clear,
    SystemFont,
    MoveUp,
    MoveDown,
    Loading,
    ExportSaved,
    ExportFailed,
    ImportFailed,
    PhotoLoadFailed,
    InvalidNumber,
    SaveFailed,
    SettingsSaveFailed,
    LibraryLoadFailed,
    SettingsReset,
    NoLabelFont,
}

/// Translate a UI string
pub fn tr(locale: Locale, text: Text) -> &'static str {
    match locale {
        Locale::En => english(text),
        Locale::Zh => chinese(text),
    }
}

fn english(text: Text) -> &'static str {
    match text {
        Text::AppTitle => "DimensionCam",
        Text::Photos => "Photos",
        Text::AddPhoto => "Add photo",
        Text::Open => "Open",
        Text::Export => "Export",
        Text::Delete => "Delete",
        Text::DeletePhotoTitle => "Delete photo",
        Text::DeletePhotoConfirm => {
            "Delete this photo and all of its annotations? This cannot be undone."
        }
        Text::Cancel => "Cancel",
        Text::Ok => "OK",
        Text::Annotations => "Annotations",
        Text::AddAnnotation => "Add line",
        Text::Undo => "Undo",
        Text::Settings => "Settings",
        Text::NoPhotoHint => "Add a photo and open it to start measuring",
        Text::NoPhotos => "No photos yet",
        Text::NoAnnotations => "No lines yet",
        Text::AnnotationCount => "lines",
        Text::EditAnnotation => "Edit line",
        Text::Value => "Length",
        Text::Unit => "Unit",
        Text::Color => "Color",
        Text::Width => "Width",
        Text::Save => "Save",
        Text::Close => "Close",
        Text::EndpointStyle => "Line ends",
        Text::Language => "Language",
        Text::ExportScaleCap => "Max export scale",
        Text::DefaultUnit => "Default unit",
        Text::ShowIds => "Show line numbers",
        Text::LabelFont => "Label font",
        Text::Browse => "Browse...",
        Text::Clear => "Clear",
        Text::SystemFont => "(system font)",
        Text::MoveUp => "Move up",
        Text::MoveDown => "Move down",
        Text::Loading => "Loading...",
        Text::ExportSaved => "Image saved to",
        Text::ExportFailed => "Export failed",
        Text::ImportFailed => "Could not import photo",
        Text::PhotoLoadFailed => "Could not load photo",
        Text::InvalidNumber => "Please enter a valid number",
        Text::SaveFailed => "Could not save library",
        Text::SettingsSaveFailed => "Could not save settings",
        Text::LibraryLoadFailed => "Could not read the photo library",
        Text::SettingsReset => "Settings were reset to defaults",
        Text::NoLabelFont => "No label font found, exported labels were skipped",
    }
}

fn chinese(text: Text) -> &'static str {
    match text {
        Text::AppTitle => "尺寸相机",
        Text::Photos => "照片",
        Text::AddPhoto => "添加照片",
        Text::Open => "打开",
        Text::Export => "导出",
        Text::Delete => "删除",
        Text::DeletePhotoTitle => "删除照片",
        Text::DeletePhotoConfirm => "确定删除这张照片及其所有标注吗？此操作无法撤销。",
        Text::Cancel => "取消",
        Text::Ok => "确定",
        Text::Annotations => "标注",
        Text::AddAnnotation => "添加标注",
        Text::Undo => "撤销",
        Text::Settings => "设置",
        Text::NoPhotoHint => "添加并打开一张照片开始测量",
        Text::NoPhotos => "暂无照片",
        Text::NoAnnotations => "暂无标注",
        Text::AnnotationCount => "条标注",
        Text::EditAnnotation => "编辑标注",
        Text::Value => "长度",
        Text::Unit => "单位",
        Text::Color => "颜色",
        Text::Width => "线宽",
        Text::Save => "保存",
        Text::Close => "关闭",
        Text::EndpointStyle => "端点样式",
        Text::Language => "语言",
        Text::ExportScaleCap => "导出最大缩放",
        Text::DefaultUnit => "默认单位",
        Text::ShowIds => "显示标注编号",
        Text::LabelFont => "标注字体",
        Text::Browse => "浏览...",
        Text::Clear => "清除",
        Text::SystemFont => "（系统字体）",
        Text::MoveUp => "上移",
        Text::MoveDown => "下移",
        Text::Loading => "加载中...",
        Text::ExportSaved => "图片已保存到",
        Text::ExportFailed => "导出失败",
        Text::ImportFailed => "无法导入照片",
        Text::PhotoLoadFailed => "无法加载照片",
        Text::InvalidNumber => "请输入有效的数字",
        Text::SaveFailed => "无法保存照片库",
        Text::SettingsSaveFailed => "无法保存设置",
        Text::LibraryLoadFailed => "无法读取照片库",
        Text::SettingsReset => "设置已恢复为默认值",
        Text::NoLabelFont => "未找到标注字体，导出时已跳过文字",
    }
}

/// Unit suffix used in labels and lists
pub fn unit_label(locale: Locale, unit: LengthUnit) -> &'static str {
    match (locale, unit) {
        (Locale::En, unit) => unit.symbol(),
        (Locale::Zh, LengthUnit::Millimeter) => "毫米",
        (Locale::Zh, LengthUnit::Centimeter) => "厘米",
        (Locale::Zh, LengthUnit::Decimeter) => "分米",
        (Locale::Zh, LengthUnit::Meter) => "米",
    }
}

pub fn color_name(locale: Locale, color: PaletteColor) -> &'static str {
    match (locale, color) {
        (Locale::En, PaletteColor::Red) => "Red",
        (Locale::En, PaletteColor::Green) => "Green",
        (Locale::En, PaletteColor::Blue) => "Blue",
        (Locale::En, PaletteColor::Yellow) => "Yellow",
        (Locale::Zh, PaletteColor::Red) => "红色",
        (Locale::Zh, PaletteColor::Green) => "绿色",
        (Locale::Zh, PaletteColor::Blue) => "蓝色",
        (Locale::Zh, PaletteColor::Yellow) => "黄色",
    }
}

pub fn style_name(locale: Locale, style: EndpointStyle) -> &'static str {
    match (locale, style) {
        (Locale::En, EndpointStyle::Arrow) => "Arrow",
        (Locale::En, EndpointStyle::TShape) => "T-bar",
        (Locale::En, EndpointStyle::Dot) => "Dot",
        (Locale::Zh, EndpointStyle::Arrow) => "箭头",
        (Locale::Zh, EndpointStyle::TShape) => "T 形",
        (Locale::Zh, EndpointStyle::Dot) => "圆点",
    }
}

pub fn language_name(locale: Locale, language: Language) -> &'static str {
    match (locale, language) {
        (Locale::En, Language::Auto) => "Follow system",
        (Locale::Zh, Language::Auto) => "跟随系统",
        (_, Language::English) => "English",
        (_, Language::Chinese) => "中文",
    }
}
