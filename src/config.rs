//! Immutable poster configuration: canvas, palette, typography, thresholds and sidebar content.
//!
//! Everything tunable lives here and is passed by reference into the stack builder,
//! the label placer and the renderer.

use crate::color::ColorResolver;
use crate::labels::LabelConfig;
use crate::stack::StackBuilder;
use plotters::style::RGBColor;

/// Streamgraph width in pixels.
pub const GRAPH_WIDTH: u32 = 3000;
/// Sidebar width in pixels (infographic only).
pub const SIDEBAR_WIDTH: u32 = 1200;
pub const HEIGHT: u32 = 4000;

/// Which poster to render; each has a fixed output file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PosterVariant {
    /// Streamgraph plus statistics sidebar.
    #[default]
    Infographic,
    /// Streamgraph only.
    Streamgraph,
}

impl PosterVariant {
    pub fn file_name(self) -> &'static str {
        match self {
            PosterVariant::Infographic => "tschofen_infographic.svg",
            PosterVariant::Streamgraph => "tschofen_streamgraph.svg",
        }
    }

    pub fn has_sidebar(self) -> bool {
        matches!(self, PosterVariant::Infographic)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// A dated annotation drawn across the streamgraph.
#[derive(Debug, Clone, PartialEq)]
pub struct EventMarker {
    /// `YYYY-MM`
    pub month: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TriviaItem {
    pub question: String,
    pub answer: String,
}

/// A group of repositories shown as one bubble.
#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    pub name: String,
    pub repos: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Typography {
    pub repo_label_px: f64,
    pub event_label_px: f64,
    pub axis_px: f64,
    pub header_px: f64,
}

#[derive(Debug, Clone)]
pub struct PosterConfig {
    pub variant: PosterVariant,
    pub width: u32,
    pub height: u32,
    pub graph_width: u32,
    pub sidebar_x: f64,
    pub margin: Margin,

    pub background: RGBColor,
    pub text: RGBColor,
    pub sub_text: RGBColor,
    pub accent: RGBColor,
    pub panel: RGBColor,
    pub font_family: String,
    pub typography: Typography,
    /// Locale tag for thousands separators (see `viz::util::map_locale`).
    pub locale: String,

    pub stack: StackBuilder,
    pub labels: LabelConfig,
    pub colors: ColorResolver,

    pub events: Vec<EventMarker>,
    pub trivia: Vec<TriviaItem>,
    pub featured_repos: Vec<String>,
    pub teams: Vec<Team>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl PosterConfig {
    pub fn for_variant(variant: PosterVariant) -> Self {
        let width = if variant.has_sidebar() {
            GRAPH_WIDTH + SIDEBAR_WIDTH
        } else {
            GRAPH_WIDTH
        };
        let events = [
            ("2016-01", "First Commit"),
            ("2019-01", "Realtime System"),
            ("2021-02", "Acquisition by Triplelift"),
            ("2025-01", "AIS Team"),
        ]
        .iter()
        .map(|(month, label)| EventMarker {
            month: month.to_string(),
            label: label.to_string(),
        })
        .collect();
        // Facts the monthly counts cannot answer; the rest is derived in `stats::trivia_items`.
        let trivia = [
            ("Most Productive Day", "Tuesday"),
            ("Most Used Commit Msg", "'fix typo'"),
        ]
        .iter()
        .map(|(q, a)| TriviaItem {
            question: q.to_string(),
            answer: a.to_string(),
        })
        .collect();
        let teams = vec![
            Team {
                name: "Platform".into(),
                repos: owned(&["production", "production-frontend", "shared"]),
            },
            Team {
                name: "Data".into(),
                repos: owned(&["profile-api", "profile-db", "python-lib", "segment-api"]),
            },
            Team {
                name: "Infra".into(),
                repos: owned(&["infrastructure", "advertiser-connect"]),
            },
        ];

        Self {
            variant,
            width,
            height: HEIGHT,
            graph_width: GRAPH_WIDTH,
            sidebar_x: f64::from(GRAPH_WIDTH) + 150.0,
            margin: Margin {
                top: 150.0,
                right: 100.0,
                bottom: 80.0,
                left: 350.0,
            },
            background: RGBColor(0x1a, 0x1a, 0x1a),
            text: RGBColor(0xff, 0xff, 0xff),
            sub_text: RGBColor(0xaa, 0xaa, 0xaa),
            accent: RGBColor(0xcc, 0xcc, 0xcc),
            panel: RGBColor(0x22, 0x22, 0x22),
            font_family: "Helvetica Neue".into(),
            typography: Typography {
                repo_label_px: 42.0,
                event_label_px: 32.0,
                axis_px: 48.0,
                header_px: 36.0,
            },
            locale: "en".into(),
            stack: StackBuilder::streamgraph(),
            labels: LabelConfig::default(),
            colors: ColorResolver::default(),
            events,
            trivia,
            featured_repos: owned(&["production", "profile-api", "python-lib"]),
            teams,
        }
    }

    pub fn with_locale(mut self, tag: &str) -> Self {
        self.locale = tag.to_string();
        self
    }

    /// Horizontal pixel span of the streamgraph bands.
    pub fn stream_x_range(&self) -> (f64, f64) {
        (
            self.margin.left,
            f64::from(self.graph_width) - self.margin.right,
        )
    }

    /// Vertical pixel span of the time axis.
    pub fn stream_y_range(&self) -> (f64, f64) {
        (self.margin.top, f64::from(self.height) - self.margin.bottom)
    }
}

impl Default for PosterConfig {
    fn default() -> Self {
        Self::for_variant(PosterVariant::default())
    }
}
