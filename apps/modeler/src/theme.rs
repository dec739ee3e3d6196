//! # Theming
//!
//! Visual configuration: a light or dark palette of named colors. The
//! configured `colors` override individual entries of the base palette.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Base palette selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

const LIGHT: &[(&str, &str)] = &[
    ("background", "#FFFFFF"),
    ("surface", "#FFFFFF"),
    ("primary", "#1867C0"),
    ("secondary", "#48A9A6"),
    ("error", "#B00020"),
    ("info", "#2196F3"),
    ("success", "#4CAF50"),
    ("warning", "#FB8C00"),
];

const DARK: &[(&str, &str)] = &[
    ("background", "#121212"),
    ("surface", "#212121"),
    ("primary", "#2196F3"),
    ("secondary", "#54B6B2"),
    ("error", "#CF6679"),
    ("info", "#2196F3"),
    ("success", "#4CAF50"),
    ("warning", "#FB8C00"),
];

/// A resolved theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub mode: ThemeMode,
    pub colors: BTreeMap<String, String>,
}

impl Theme {
    /// Base palette for `mode` with `overrides` applied on top.
    pub fn resolve(mode: ThemeMode, overrides: &BTreeMap<String, String>) -> Self {
        let base = match mode {
            ThemeMode::Light => LIGHT,
            ThemeMode::Dark => DARK,
        };
        let mut colors: BTreeMap<String, String> = base
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        colors.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        Self { mode, colors }
    }

    pub fn color(&self, name: &str) -> Option<&str> {
        self.colors.get(name).map(String::as_str)
    }
}

/// `#RGB` or `#RRGGBB`.
pub fn is_hex_color(s: &str) -> bool {
    s.strip_prefix('#')
        .is_some_and(|hex| matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()))
}
