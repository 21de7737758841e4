use crate::AppSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppRoute {
    Home,
    GameLibrary,
    Workbench,
    Stickers,
    Websites,
    Settings,
    Documents,
}

pub const ROUTES: &[AppRoute] = &[
    AppRoute::Home,
    AppRoute::GameLibrary,
    AppRoute::Workbench,
    AppRoute::Stickers,
    AppRoute::Websites,
    AppRoute::Settings,
    AppRoute::Documents,
];

impl AppRoute {
    pub fn path(self) -> &'static str {
        match self {
            AppRoute::Home => "/",
            AppRoute::GameLibrary => "/games",
            AppRoute::Workbench => "/workbench",
            AppRoute::Stickers => "/stickers",
            AppRoute::Websites => "/websites",
            AppRoute::Settings => "/settings",
            AppRoute::Documents => "/documents",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AppRoute::Home => "Home",
            AppRoute::GameLibrary => "GameLibrary",
            AppRoute::Workbench => "Workbench",
            AppRoute::Stickers => "Stickers",
            AppRoute::Websites => "Websites",
            AppRoute::Settings => "Settings",
            AppRoute::Documents => "Documents",
        }
    }

    pub fn i18n_key(self) -> &'static str {
        match self {
            AppRoute::Home => "nav.home",
            AppRoute::GameLibrary => "nav.games",
            AppRoute::Workbench => "nav.workbench",
            AppRoute::Stickers => "nav.stickers",
            AppRoute::Websites => "nav.websites",
            AppRoute::Settings => "nav.settings",
            AppRoute::Documents => "nav.documents",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        ROUTES.iter().copied().find(|route| route.path() == path)
    }

    /// Optional pages are hidden until their toggle is switched on.
    pub fn is_visible(self, settings: &AppSettings) -> bool {
        match self {
            AppRoute::Workbench => settings.show_workbench,
            AppRoute::Stickers => settings.show_stickers,
            AppRoute::Websites => settings.show_websites,
            AppRoute::Documents => settings.show_documents,
            AppRoute::Home | AppRoute::GameLibrary | AppRoute::Settings => true,
        }
    }
}
