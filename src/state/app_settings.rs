use log::LevelFilter;

#[derive(Debug, Default, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
}

impl AppSettings {
    pub fn load() -> Self {
        // Simple defaults — venue installs flip to fullscreen with `f`.
        Self { full_screen: false, log_level: None }
    }
}
