use crate::observer::{ObserverOptions, RootMargin};
use crate::throttle::DEFAULT_THROTTLE_WINDOW_MS;
use serde::Serialize;

const DEFAULT_HEADER_OFFSET_PX: u32 = 80;
const DEFAULT_NAVBAR_SOLID_AFTER_PX: u32 = 100;
const DEFAULT_HERO_STAGGER_MS: u32 = 200;
const DEFAULT_TYPEWRITER_SPEED_MS: u32 = 150;
const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;
pub const DEFAULT_PARALLAX_SPEED: f64 = 0.5;

const SCROLL_THROTTLE_MS_BOUNDS: (u32, u32) = (1, 1_000);
const HEADER_OFFSET_PX_BOUNDS: (u32, u32) = (0, 400);
const NAVBAR_SOLID_AFTER_PX_BOUNDS: (u32, u32) = (0, 10_000);
const HERO_STAGGER_MS_BOUNDS: (u32, u32) = (0, 5_000);
const TYPEWRITER_SPEED_MS_BOUNDS: (u32, u32) = (10, 2_000);
const THRESHOLD_BOUNDS: (f64, f64) = (0.0, 1.0);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn to_log(self) -> log::Level {
        match self {
            Self::Debug => log::Level::Debug,
            Self::Info => log::Level::Info,
            Self::Warn => log::Level::Warn,
        }
    }
}

/// Page settings read from `data-*` attributes on the mount element.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageConfig {
    pub scroll_throttle_ms: u32,
    pub header_offset_px: u32,
    pub navbar_solid_after_px: u32,
    pub hero_stagger_ms: u32,
    pub typewriter: bool,
    pub typewriter_speed_ms: u32,
    pub log_level: LogLevel,
    pub preload: Vec<String>,
    #[serde(skip)]
    pub reveal: ObserverOptions,
    #[serde(skip)]
    pub active: ObserverOptions,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            scroll_throttle_ms: DEFAULT_THROTTLE_WINDOW_MS,
            header_offset_px: DEFAULT_HEADER_OFFSET_PX,
            navbar_solid_after_px: DEFAULT_NAVBAR_SOLID_AFTER_PX,
            hero_stagger_ms: DEFAULT_HERO_STAGGER_MS,
            typewriter: false,
            typewriter_speed_ms: DEFAULT_TYPEWRITER_SPEED_MS,
            log_level: DEFAULT_LOG_LEVEL,
            preload: Vec::new(),
            reveal: ObserverOptions::REVEAL,
            active: ObserverOptions::CENTERED,
        }
    }
}

impl PageConfig {
    /// `attribute` looks up a raw attribute value by name, e.g. `data-header-offset`.
    pub fn from_attributes(attribute: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            scroll_throttle_ms: parse_u32_with_bounds(
                &attribute,
                "data-scroll-throttle-ms",
                defaults.scroll_throttle_ms,
                SCROLL_THROTTLE_MS_BOUNDS,
            ),
            header_offset_px: parse_u32_with_bounds(
                &attribute,
                "data-header-offset",
                defaults.header_offset_px,
                HEADER_OFFSET_PX_BOUNDS,
            ),
            navbar_solid_after_px: parse_u32_with_bounds(
                &attribute,
                "data-navbar-solid-after",
                defaults.navbar_solid_after_px,
                NAVBAR_SOLID_AFTER_PX_BOUNDS,
            ),
            hero_stagger_ms: parse_u32_with_bounds(
                &attribute,
                "data-hero-stagger-ms",
                defaults.hero_stagger_ms,
                HERO_STAGGER_MS_BOUNDS,
            ),
            typewriter: parse_bool(&attribute, "data-typewriter", defaults.typewriter),
            typewriter_speed_ms: parse_u32_with_bounds(
                &attribute,
                "data-typewriter-speed-ms",
                defaults.typewriter_speed_ms,
                TYPEWRITER_SPEED_MS_BOUNDS,
            ),
            log_level: parse_log_level(&attribute, "data-log-level", defaults.log_level),
            preload: parse_list(&attribute, "data-preload"),
            reveal: parse_observer_options(
                &attribute,
                "data-reveal-threshold",
                "data-reveal-margin",
                defaults.reveal,
            ),
            active: parse_observer_options(
                &attribute,
                "data-active-threshold",
                "data-active-margin",
                defaults.active,
            ),
        }
    }
}

fn parse_non_empty(attribute: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    attribute(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_u32_with_bounds(
    attribute: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: u32,
    bounds: (u32, u32),
) -> u32 {
    parse_non_empty(attribute, name)
        .and_then(|value| value.parse::<u32>().ok())
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

fn parse_bool(attribute: &impl Fn(&str) -> Option<String>, name: &str, default: bool) -> bool {
    match parse_non_empty(attribute, name)
        .map(|value| value.to_ascii_lowercase())
        .as_deref()
    {
        Some("true" | "1" | "on") => true,
        Some("false" | "0" | "off") => false,
        _ => default,
    }
}

fn parse_log_level(
    attribute: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: LogLevel,
) -> LogLevel {
    match parse_non_empty(attribute, name)
        .unwrap_or_else(|| default.as_str().to_string())
        .to_ascii_lowercase()
        .as_str()
    {
        "debug" => LogLevel::Debug,
        "info" => LogLevel::Info,
        "warn" => LogLevel::Warn,
        _ => default,
    }
}

fn parse_list(attribute: &impl Fn(&str) -> Option<String>, name: &str) -> Vec<String> {
    parse_non_empty(attribute, name)
        .map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn parse_observer_options(
    attribute: &impl Fn(&str) -> Option<String>,
    threshold_name: &str,
    margin_name: &str,
    default: ObserverOptions,
) -> ObserverOptions {
    let threshold = parse_non_empty(attribute, threshold_name)
        .and_then(|value| value.parse::<f64>().ok())
        .filter(|value| (THRESHOLD_BOUNDS.0..=THRESHOLD_BOUNDS.1).contains(value))
        .unwrap_or(default.threshold);
    let root_margin = parse_non_empty(attribute, margin_name)
        .and_then(|value| RootMargin::parse(&value))
        .unwrap_or(default.root_margin);

    ObserverOptions {
        threshold,
        root_margin,
    }
}

/// `data-speed` on a parallax element. Missing, blank or unparseable values
/// fall back to the default speed; an explicit `0` disables the effect.
pub fn parse_parallax_speed(raw: Option<&str>) -> f64 {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|value| value.parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(DEFAULT_PARALLAX_SPEED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::MarginValue;
    use std::collections::HashMap;

    fn attributes(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn missing_attributes_yield_defaults() {
        let config = PageConfig::from_attributes(|_| None);
        assert_eq!(config, PageConfig::default());
        assert_eq!(config.scroll_throttle_ms, 16);
        assert_eq!(config.header_offset_px, 80);
        assert_eq!(config.navbar_solid_after_px, 100);
        assert!(!config.typewriter);
    }

    #[test]
    fn values_inside_bounds_are_applied() {
        let config = PageConfig::from_attributes(attributes(&[
            ("data-scroll-throttle-ms", " 33 "),
            ("data-header-offset", "64"),
            ("data-typewriter", "TRUE"),
            ("data-log-level", "Debug"),
            ("data-preload", "/img/a.png, ,/img/b.png"),
        ]));

        assert_eq!(config.scroll_throttle_ms, 33);
        assert_eq!(config.header_offset_px, 64);
        assert!(config.typewriter);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.preload, vec!["/img/a.png", "/img/b.png"]);
    }

    #[test]
    fn out_of_bounds_or_garbage_falls_back() {
        let config = PageConfig::from_attributes(attributes(&[
            ("data-scroll-throttle-ms", "0"),
            ("data-header-offset", "-5"),
            ("data-hero-stagger-ms", "99999"),
            ("data-typewriter", "maybe"),
            ("data-log-level", "trace"),
        ]));

        assert_eq!(config.scroll_throttle_ms, 16);
        assert_eq!(config.header_offset_px, 80);
        assert_eq!(config.hero_stagger_ms, 200);
        assert!(!config.typewriter);
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn observer_overrides_are_parsed() {
        let config = PageConfig::from_attributes(attributes(&[
            ("data-reveal-threshold", "0.25"),
            ("data-active-margin", "-10% 0px"),
            ("data-active-threshold", "1.5"),
        ]));

        assert_eq!(config.reveal.threshold, 0.25);
        assert_eq!(config.reveal.root_margin, ObserverOptions::REVEAL.root_margin);
        assert_eq!(config.active.threshold, 0.5, "threshold above 1 is rejected");
        assert_eq!(config.active.root_margin.top, MarginValue::Percent(-10.0));
    }

    #[test]
    fn parallax_speed_defaults_like_markup_fallback() {
        assert_eq!(parse_parallax_speed(None), 0.5);
        assert_eq!(parse_parallax_speed(Some("")), 0.5);
        assert_eq!(parse_parallax_speed(Some("fast")), 0.5);
        assert_eq!(parse_parallax_speed(Some("0")), 0.0);
        assert_eq!(parse_parallax_speed(Some(" 0.2 ")), 0.2);
    }

    #[test]
    fn serialized_config_skips_observer_options() {
        let value = serde_json::to_value(PageConfig::default()).expect("config serializes");
        assert_eq!(value["scrollThrottleMs"], 16);
        assert_eq!(value["logLevel"], "info");
        assert!(value.get("reveal").is_none());
    }
}
