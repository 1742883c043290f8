use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt, str::FromStr};

/// How a condition is rendered in the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionStyle {
    /// Nerd Font weather glyphs.
    #[default]
    Icons,
    /// Plain English words.
    Words,
}

impl ConditionStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionStyle::Icons => "icons",
            ConditionStyle::Words => "words",
        }
    }

    pub const fn all() -> &'static [ConditionStyle] {
        &[ConditionStyle::Icons, ConditionStyle::Words]
    }
}

impl fmt::Display for ConditionStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ConditionStyle {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "icons" | "icon" => Ok(ConditionStyle::Icons),
            "words" | "word" | "text" => Ok(ConditionStyle::Words),
            _ => Err(anyhow::anyhow!(
                "Unknown style '{value}'. Supported styles: icons, words."
            )),
        }
    }
}

impl FromStr for ConditionStyle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConditionStyle::try_from(s)
    }
}

/// Weather condition shown next to the temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Clear,
    Cloudy,
    Overcast,
    UnknownSky,
    Rain,
    RainSnow,
    Snow,
    Shower,
    /// Precipitation with a code outside 1..=4.
    Wet,
}

impl Condition {
    /// Pick the condition from the `SKY` and `PTY` codes.
    ///
    /// Any precipitation takes precedence over the sky state.
    pub fn from_codes(sky: &str, pty: &str) -> Self {
        if pty != "0" {
            match pty {
                "1" => Condition::Rain,
                "2" => Condition::RainSnow,
                "3" => Condition::Snow,
                "4" => Condition::Shower,
                _ => Condition::Wet,
            }
        } else {
            match sky {
                "1" => Condition::Clear,
                "3" => Condition::Cloudy,
                "4" => Condition::Overcast,
                _ => Condition::UnknownSky,
            }
        }
    }

    pub fn label(&self, style: ConditionStyle) -> &'static str {
        match style {
            ConditionStyle::Icons => self.icon(),
            ConditionStyle::Words => self.word(),
        }
    }

    fn icon(&self) -> &'static str {
        match self {
            Condition::Clear => "\u{e30d}",
            Condition::Cloudy => "\u{e302}",
            Condition::Overcast => "\u{e312}",
            Condition::UnknownSky => "\u{e374}",
            Condition::Rain => "\u{e318}",
            Condition::RainSnow => "\u{e316}",
            Condition::Snow => "\u{e31a}",
            Condition::Shower => "\u{e319}",
            Condition::Wet => "\u{e371}",
        }
    }

    fn word(&self) -> &'static str {
        match self {
            Condition::Clear => "Clear",
            Condition::Cloudy => "Cloudy",
            Condition::Overcast => "Overcast",
            Condition::UnknownSky => "Unknown",
            Condition::Rain => "Rain",
            Condition::RainSnow => "Rain/Snow",
            Condition::Snow => "Snow",
            Condition::Shower => "Shower",
            Condition::Wet => "Wet",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precipitation_wins_over_sky() {
        assert_eq!(Condition::from_codes("3", "1"), Condition::Rain);
        assert_eq!(Condition::from_codes("1", "2"), Condition::RainSnow);
        assert_eq!(Condition::from_codes("4", "3"), Condition::Snow);
        assert_eq!(Condition::from_codes("1", "4"), Condition::Shower);
    }

    #[test]
    fn unexpected_precipitation_code_is_wet() {
        assert_eq!(Condition::from_codes("1", "5"), Condition::Wet);
        assert_eq!(Condition::from_codes("1", ""), Condition::Wet);
    }

    #[test]
    fn sky_used_when_dry() {
        assert_eq!(Condition::from_codes("1", "0"), Condition::Clear);
        assert_eq!(Condition::from_codes("3", "0"), Condition::Cloudy);
        assert_eq!(Condition::from_codes("4", "0"), Condition::Overcast);
        assert_eq!(Condition::from_codes("2", "0"), Condition::UnknownSky);
        assert_eq!(Condition::from_codes("0", "0"), Condition::UnknownSky);
    }

    #[test]
    fn labels_per_style() {
        assert_eq!(Condition::Rain.label(ConditionStyle::Words), "Rain");
        assert_eq!(Condition::Clear.label(ConditionStyle::Icons), "\u{e30d}");
        assert_ne!(
            Condition::Cloudy.label(ConditionStyle::Icons),
            Condition::Overcast.label(ConditionStyle::Icons)
        );
    }

    #[test]
    fn style_as_str_roundtrip() {
        for style in ConditionStyle::all() {
            let parsed =
                ConditionStyle::try_from(style.as_str()).expect("roundtrip should succeed");
            assert_eq!(*style, parsed);
        }
    }

    #[test]
    fn unknown_style_error() {
        let err = "emoji".parse::<ConditionStyle>().unwrap_err();
        assert!(err.to_string().contains("Unknown style"));
    }
}
