pub mod aliases;
pub mod config;
pub mod naming;
pub mod planner;

/// Audio file extensions the CLI treats as songs
pub const AUDIO_EXTENSIONS: &[&str] = &[
    "mp3", "wav", "ogg", "flac", "m4a", "aac", "opus", "wma", "aif", "aiff",
];

/// Application name for XDG paths
pub const APP_NAME: &str = "trackname";
