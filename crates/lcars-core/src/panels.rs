//! Panel catalog and the multi-view dispatcher.
//!
//! A multi-view request carries a list of panel tags (from the classifier or from a
//! `?panels=` query). The dispatcher dedups, caps at [`MAX_PANELS`], drops unknown tags and
//! picks a grid width. An empty result is an explicit state, never an empty grid.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MAX_PANELS: usize = 4;

/// Every view of the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Panel {
    Dashboard,
    Tasks,
    Weather,
    Calendar,
    Analytics,
    Space,
    Travel,
    Notifications,
    Terminal,
    Ai,
    Settings,
}

impl Panel {
    pub const ALL: [Panel; 11] = [
        Panel::Dashboard,
        Panel::Tasks,
        Panel::Weather,
        Panel::Calendar,
        Panel::Analytics,
        Panel::Space,
        Panel::Travel,
        Panel::Notifications,
        Panel::Terminal,
        Panel::Ai,
        Panel::Settings,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            Panel::Dashboard => "dashboard",
            Panel::Tasks => "tasks",
            Panel::Weather => "weather",
            Panel::Calendar => "calendar",
            Panel::Analytics => "analytics",
            Panel::Space => "space",
            Panel::Travel => "travel",
            Panel::Notifications => "notifications",
            Panel::Terminal => "terminal",
            Panel::Ai => "ai",
            Panel::Settings => "settings",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Panel::Dashboard => "Console",
            Panel::Tasks => "Task Manager",
            Panel::Weather => "Weather",
            Panel::Calendar => "Calendar",
            Panel::Analytics => "Analytics",
            Panel::Space => "Space Exploration",
            Panel::Travel => "Travel Calculator",
            Panel::Notifications => "Notifications",
            Panel::Terminal => "Terminal",
            Panel::Ai => "AI Chat",
            Panel::Settings => "Settings",
        }
    }

    /// Client route for single navigation.
    pub fn route(&self) -> &'static str {
        match self {
            Panel::Dashboard => "/",
            Panel::Tasks => "/tasks",
            Panel::Weather => "/weather",
            Panel::Calendar => "/calendar",
            Panel::Analytics => "/analytics",
            Panel::Space => "/space",
            Panel::Travel => "/travel",
            Panel::Notifications => "/notifications",
            Panel::Terminal => "/terminal",
            Panel::Ai => "/ai",
            Panel::Settings => "/settings",
        }
    }

    /// Dashboard and settings are full pages and cannot be tiled.
    pub fn is_tileable(&self) -> bool {
        !matches!(self, Panel::Dashboard | Panel::Settings)
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Panel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_lowercase();
        Panel::ALL
            .iter()
            .find(|p| p.tag() == tag)
            .copied()
            .ok_or_else(|| format!("unknown panel: {}", s.trim()))
    }
}

/// Route for a multi-view of `panels` (`/multiview?panels=a,b`).
pub fn multiview_route(panels: &[Panel]) -> String {
    let tags: Vec<&str> = panels.iter().map(Panel::tag).collect();
    format!("/multiview?panels={}", tags.join(","))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelSlot {
    pub panel: Panel,
    pub title: &'static str,
}

/// Outcome of a multi-view request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PanelLayout {
    /// No tags were requested at all.
    NoPanels,
    /// Tags were requested but none name a tileable panel.
    InvalidPanels { requested: Vec<String> },
    Grid { columns: u8, panels: Vec<PanelSlot> },
}

impl PanelLayout {
    pub fn is_grid(&self) -> bool {
        matches!(self, PanelLayout::Grid { .. })
    }

    /// Heading shown for the empty states.
    pub fn heading(&self) -> Option<&'static str> {
        match self {
            PanelLayout::NoPanels => Some("No Panels Selected"),
            PanelLayout::InvalidPanels { .. } => Some("Invalid Panels"),
            PanelLayout::Grid { .. } => None,
        }
    }
}

fn columns_for(count: usize) -> u8 {
    match count {
        1 => 1,
        2 => 2,
        3 => 3,
        _ => 2,
    }
}

/// Builds the multi-view layout for the requested tags.
///
/// Dedup keeps the first occurrence; the cap is applied before unknown tags are dropped.
pub fn dispatch<S: AsRef<str>>(tags: &[S]) -> PanelLayout {
    let mut requested: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim();
        if tag.is_empty() || requested.iter().any(|t| t == tag) {
            continue;
        }
        requested.push(tag.to_string());
    }
    requested.truncate(MAX_PANELS);

    if requested.is_empty() {
        return PanelLayout::NoPanels;
    }

    let panels: Vec<PanelSlot> = requested
        .iter()
        .filter_map(|t| t.parse::<Panel>().ok())
        .filter(Panel::is_tileable)
        .map(|panel| PanelSlot {
            panel,
            title: panel.title(),
        })
        .collect();

    if panels.is_empty() {
        return PanelLayout::InvalidPanels { requested };
    }

    PanelLayout::Grid {
        columns: columns_for(panels.len()),
        panels,
    }
}

/// Splits a `a,b,c` query value into tags.
pub fn parse_panel_query(query: &str) -> Vec<String> {
    query
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_tags(layout: &PanelLayout) -> Vec<&'static str> {
        match layout {
            PanelLayout::Grid { panels, .. } => panels.iter().map(|s| s.panel.tag()).collect(),
            _ => Vec::new(),
        }
    }

    #[test]
    fn bogus_tag_is_invalid_state() {
        let layout = dispatch(&["bogus"]);
        assert_eq!(
            layout,
            PanelLayout::InvalidPanels {
                requested: vec!["bogus".to_string()]
            }
        );
        assert_eq!(layout.heading(), Some("Invalid Panels"));
    }

    #[test]
    fn empty_request_is_no_panels() {
        let empty: [&str; 0] = [];
        assert_eq!(dispatch(&empty), PanelLayout::NoPanels);
        assert_eq!(dispatch(&parse_panel_query(",,")), PanelLayout::NoPanels);
    }

    #[test]
    fn dedup_and_cap() {
        let layout = dispatch(&["weather", "tasks", "weather", "calendar", "space", "travel"]);
        assert_eq!(grid_tags(&layout), vec!["weather", "tasks", "calendar", "space"]);
        match layout {
            PanelLayout::Grid { columns, .. } => assert_eq!(columns, 2),
            _ => panic!("expected grid"),
        }
    }

    #[test]
    fn unknown_tags_filtered_after_cap() {
        let layout = dispatch(&["bogus", "weather"]);
        assert_eq!(grid_tags(&layout), vec!["weather"]);
        match layout {
            PanelLayout::Grid { columns, .. } => assert_eq!(columns, 1),
            _ => panic!("expected grid"),
        }
    }

    #[test]
    fn three_panels_use_three_columns() {
        match dispatch(&["ai", "terminal", "analytics"]) {
            PanelLayout::Grid { columns, panels } => {
                assert_eq!(columns, 3);
                assert_eq!(panels[0].title, "AI Chat");
            }
            other => panic!("expected grid, got {:?}", other),
        }
    }

    #[test]
    fn full_pages_are_not_tileable() {
        assert!(matches!(dispatch(&["settings"]), PanelLayout::InvalidPanels { .. }));
    }

    #[test]
    fn multiview_route_joins_tags() {
        assert_eq!(
            multiview_route(&[Panel::Weather, Panel::Tasks]),
            "/multiview?panels=weather,tasks"
        );
    }
}
