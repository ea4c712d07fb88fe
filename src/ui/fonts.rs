//! CJK font fallback for egui when the UI language is Chinese.

use std::sync::Arc;

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::config::AppSettings;
use crate::i18n::Locale;
use crate::render::SystemFont;
use crate::render::fonts::{find_cjk_font, system_fonts};

const CJK_FONT_NAME: &str = "cjk_fallback";

/// Locale the egui fonts were last configured for
#[derive(Resource, Default)]
pub struct InstalledUiFonts {
    locale: Option<Locale>,
}

/// Default egui fonts, with `font` appended to every family as a fallback
fn font_definitions_with_fallback(font: Option<SystemFont>) -> egui::FontDefinitions {
    let mut fonts = egui::FontDefinitions::default();
    if let Some(font) = font {
        let data = egui::FontData {
            index: font.index,
            ..egui::FontData::from_owned(font.bytes)
        };
        fonts.font_data.insert(CJK_FONT_NAME.to_owned(), Arc::new(data));
        for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
            fonts
                .families
                .entry(family)
                .or_default()
                .push(CJK_FONT_NAME.to_owned());
        }
    }
    fonts
}

/// Install (or remove) the CJK fallback when the language changes
pub fn sync_ui_fonts(
    mut contexts: EguiContexts,
    settings: Res<AppSettings>,
    mut installed: ResMut<InstalledUiFonts>,
) -> Result {
    let locale = settings.locale();
    if installed.locale == Some(locale) {
        return Ok(());
    }
    let ctx = contexts.ctx_mut()?;

    let font = match locale {
        Locale::Zh => match find_cjk_font(&system_fonts()) {
            Some(font) => {
                info!("Using {} for Chinese UI text", font.family);
                Some(font)
            }
            None => {
                warn!("No CJK font found, Chinese text may not render");
                None
            }
        },
        Locale::En => None,
    };

    ctx.set_fonts(font_definitions_with_fallback(font));
    installed.locale = Some(locale);
    Ok(())
}
