// storefront/src/theme.rs

//! Static design tokens shared with the Mini App front-end.

use serde::Serialize;
use std::collections::BTreeMap;

pub const COLORS: &[(&str, &str)] = &[
  ("primary", "#2481CC"),
  ("primary_text", "#FFFFFF"),
  ("background", "#FFFFFF"),
  ("secondary_background", "#F1F1F4"),
  ("text", "#000000"),
  ("hint", "#999999"),
  ("link", "#2481CC"),
  ("success", "#31B545"),
  ("warning", "#F5A623"),
  ("danger", "#E53935"),
  ("sale_badge", "#FF3B30"),
];

/// Spacing scale in px.
pub const SPACING: &[(&str, u16)] = &[("xs", 4), ("sm", 8), ("md", 16), ("lg", 24), ("xl", 32), ("xxl", 48)];

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ThemeTokens {
  pub colors: BTreeMap<&'static str, &'static str>,
  pub spacing: BTreeMap<&'static str, u16>,
}

impl ThemeTokens {
  pub fn default_theme() -> Self {
    Self {
      colors: COLORS.iter().copied().collect(),
      spacing: SPACING.iter().copied().collect(),
    }
  }

  pub fn color(&self, name: &str) -> Option<&'static str> {
    self.colors.get(name).copied()
  }

  pub fn spacing(&self, name: &str) -> Option<u16> {
    self.spacing.get(name).copied()
  }
}
