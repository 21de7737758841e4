use std::collections::BTreeMap;

use core_types::Locale;

#[derive(Debug, Clone)]
pub struct I18n {
    locale: Locale,
    en: BTreeMap<&'static str, &'static str>,
    zhs: BTreeMap<&'static str, &'static str>,
    zht: BTreeMap<&'static str, &'static str>,
}

impl I18n {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            en: en_map(),
            zhs: zhs_map(),
            zht: zht_map(),
        }
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Looks up `key`; traditional falls back to simplified, then English, then the key.
    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        let chain: [&BTreeMap<&'static str, &'static str>; 3] = match self.locale {
            Locale::En => [&self.en, &self.zhs, &self.zht],
            Locale::Zhs => [&self.zhs, &self.en, &self.zht],
            Locale::Zht => [&self.zht, &self.zhs, &self.en],
        };
        chain
            .iter()
            .find_map(|map| map.get(key).copied())
            .unwrap_or(key)
    }

    /// Like [`I18n::t`], replacing each `{name}` with its argument.
    pub fn format(&self, key: &str, args: &[(&str, &str)]) -> String {
        let mut text = self.t(key).to_string();
        for (name, value) in args {
            text = text.replace(&format!("{{{name}}}"), value);
        }
        text
    }
}

fn en_map() -> BTreeMap<&'static str, &'static str> {
    BTreeMap::from([
        ("nav.home", "Home"),
        ("nav.games", "Game Library"),
        ("nav.workbench", "Workbench"),
        ("nav.stickers", "Stickers"),
        ("nav.websites", "Websites"),
        ("nav.settings", "Settings"),
        ("nav.documents", "Documents"),
        ("dialog.error.title", "Error"),
        ("settings.load_failed", "Failed to load settings: {detail}"),
    ])
}

fn zhs_map() -> BTreeMap<&'static str, &'static str> {
    BTreeMap::from([
        ("nav.home", "主页"),
        ("nav.games", "游戏库"),
        ("nav.workbench", "工作台"),
        ("nav.stickers", "贴纸"),
        ("nav.websites", "网站"),
        ("nav.settings", "设置"),
        ("nav.documents", "文档"),
        ("dialog.error.title", "错误"),
        ("settings.load_failed", "加载设置失败: {detail}"),
    ])
}

fn zht_map() -> BTreeMap<&'static str, &'static str> {
    BTreeMap::from([
        ("nav.home", "主頁"),
        ("nav.games", "遊戲庫"),
        ("nav.workbench", "工作台"),
        ("nav.stickers", "貼紙"),
        ("nav.websites", "網站"),
        ("nav.settings", "設定"),
        ("nav.documents", "文檔"),
        ("dialog.error.title", "錯誤"),
        ("settings.load_failed", "載入設定失敗: {detail}"),
    ])
}
