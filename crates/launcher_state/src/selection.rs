use core_types::{AppSettings, BgType, GameInfo};

/// Copies `game`'s background preference into `settings` and marks it selected.
///
/// Video wins only when the game prefers it and actually has a video; the
/// field of the inactive mode is left as it was.
pub fn apply_selection(settings: &mut AppSettings, game: &GameInfo) {
    settings.current_config_name = game.name.clone();

    match (game.bg_type, game.video_path()) {
        (BgType::Video, Some(video)) => {
            settings.bg_type = BgType::Video;
            settings.bg_video = video.to_string();
        }
        _ => {
            settings.bg_type = BgType::Image;
            settings.bg_image = game.bg_path.clone();
        }
    }
}
