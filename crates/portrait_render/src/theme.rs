use serde::{Deserialize, Serialize};

/// A concrete colour scheme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    /// Glyph colour drawn on a transparent backdrop.
    pub fn foreground(self) -> [u8; 3] {
        match self {
            Theme::Dark => [255; 3],
            Theme::Light => [0; 3],
        }
    }
}

/// Theme requested by the user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    #[default]
    System,
}

impl ThemePreference {
    pub const ALL: [ThemePreference; 3] =
        [ThemePreference::Light, ThemePreference::Dark, ThemePreference::System];

    pub fn label(self) -> &'static str {
        match self {
            ThemePreference::Light => "[ ]",
            ThemePreference::Dark => "[■]",
            ThemePreference::System => "[~]",
        }
    }

    pub fn resolve(self, system: Theme) -> Theme {
        match self {
            ThemePreference::Light => Theme::Light,
            ThemePreference::Dark => Theme::Dark,
            ThemePreference::System => system,
        }
    }
}

/// Current preference together with the platform's theme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ThemeSwitch {
    preference: ThemePreference,
    system: Theme,
}

impl ThemeSwitch {
    pub fn new(preference: ThemePreference, system: Theme) -> Self {
        Self { preference, system }
    }

    pub fn preference(&self) -> ThemePreference {
        self.preference
    }

    pub fn set_preference(&mut self, preference: ThemePreference) {
        self.preference = preference;
    }

    pub fn set_system(&mut self, system: Theme) {
        self.system = system;
    }

    pub fn resolved(&self) -> Theme {
        self.preference.resolve(self.system)
    }

    /// Moves to the next preference in toggle order and returns it.
    pub fn cycle(&mut self) -> ThemePreference {
        let idx = ThemePreference::ALL.iter().position(|p| *p == self.preference).unwrap_or(0);
        self.preference = ThemePreference::ALL[(idx + 1) % ThemePreference::ALL.len()];
        self.preference
    }
}

/// Guesses the terminal theme from a `COLORFGBG` value such as `"15;0"`.
pub fn theme_from_colorfgbg(value: Option<&str>) -> Theme {
    let background = value.and_then(|value| value.rsplit(';').next()?.trim().parse::<u8>().ok());
    match background {
        Some(0..=6 | 8) | None => Theme::Dark,
        Some(_) => Theme::Light,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_preference_follows_platform() {
        let mut switch = ThemeSwitch::new(ThemePreference::System, Theme::Light);
        assert_eq!(switch.resolved(), Theme::Light);
        switch.set_system(Theme::Dark);
        assert_eq!(switch.resolved(), Theme::Dark);
        switch.set_preference(ThemePreference::Light);
        assert_eq!(switch.resolved(), Theme::Light);
    }

    #[test]
    fn cycle_visits_every_preference() {
        let mut switch = ThemeSwitch::new(ThemePreference::Light, Theme::Dark);
        assert_eq!(switch.cycle(), ThemePreference::Dark);
        assert_eq!(switch.cycle(), ThemePreference::System);
        assert_eq!(switch.cycle(), ThemePreference::Light);
    }

    #[test]
    fn foreground_contrasts_with_backdrop() {
        assert_eq!(Theme::Dark.foreground(), [255, 255, 255]);
        assert_eq!(Theme::Light.foreground(), [0, 0, 0]);
        assert_eq!(ThemePreference::Dark.label(), "[■]");
    }

    #[test]
    fn colorfgbg_background_index() {
        assert_eq!(theme_from_colorfgbg(Some("15;0")), Theme::Dark);
        assert_eq!(theme_from_colorfgbg(Some("0;15")), Theme::Light);
        assert_eq!(theme_from_colorfgbg(Some("0;default;7")), Theme::Light);
        assert_eq!(theme_from_colorfgbg(Some("garbage")), Theme::Dark);
        assert_eq!(theme_from_colorfgbg(None), Theme::Dark);
    }
}
