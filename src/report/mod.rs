//! Dashboard rendering
//!
//! A [`Dashboard`] is the evaluated snapshot of one page view: the gauge, the
//! survey count and the celebration state. It is written out by:
//!
//! - **HTML**: the interactive page with a D3.js gauge and the fireworks overlay
//! - **JSON**: machine-readable snapshot, also served at `/api/dashboard`
//!
//! # Usage
//!
//! ```ignore
//! use surveygauge::report;
//!
//! // Picks the format from the extension
//! report::generate("dashboard.html", &dashboard)?;  // HTML
//! report::generate("dashboard.json", &dashboard)?;  // JSON
//! ```

pub mod html;
pub mod json;

use crate::assets::{self, AssetLinks};
use crate::config::{self, DashboardConfig, Media};
use crate::presenter::{PresentationState, ThresholdPresenter};
use crate::survey::SurveyCount;
use serde::Serialize;
use std::io;
use std::path::Path;

/// Write a dashboard in the format matching the file extension
pub fn generate<P: AsRef<Path>>(path: P, dashboard: &Dashboard) -> io::Result<()> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let mut file = std::fs::File::create(path)?;

    match ext.as_str() {
        "html" | "htm" => html::write(&mut file, dashboard),
        _ => json::write(&mut file, dashboard),
    }
}

/// Gauge indicator over `[0, max]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gauge {
    pub title: String,
    pub value: u64,
    pub max: u64,
    pub bar_color: String,
    /// Value with thousands separators, e.g. `1,500`
    pub formatted: String,
    /// Filled share of the arc, clamped to 0..=1
    pub fraction: f64,
}

impl Gauge {
    pub fn new(title: &str, value: u64, max: u64, bar_color: &str) -> Self {
        let fraction = if max == 0 {
            0.0
        } else {
            (value as f64 / max as f64).clamp(0.0, 1.0)
        };
        Self {
            title: title.to_string(),
            value,
            max,
            bar_color: bar_color.to_string(),
            formatted: format_thousands(value),
            fraction,
        }
    }
}

/// Evaluated dashboard snapshot
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub generated: String,
    pub title: String,
    pub survey: SurveyCount,
    pub target: i64,
    /// Completed share of the target in percent, not clamped
    pub progress: f64,
    pub remaining: u64,
    pub gauge: Gauge,
    pub state: PresentationState,
    pub celebration_message: String,
    pub media: Media,
    pub media_url: Option<String>,
    pub logos: Vec<String>,
}

impl Dashboard {
    /// Evaluate the presenter for a loaded survey and collect page labels
    ///
    /// `links` decides how logos and media are addressed: under `/assets/`
    /// for the served page, or by absolute path for a saved file.
    pub fn build(
        config: &DashboardConfig,
        presenter: &ThresholdPresenter,
        survey: &SurveyCount,
        links: &AssetLinks,
    ) -> config::Result<Self> {
        config.validate()?;
        let state = presenter.evaluate_survey(survey)?;
        let target = presenter.target();
        let target_u = target as u64;

        let media_url = match config.media {
            Media::Image => Some(links.url(&config.image_file)),
            Media::Video => Some(links.url(&config.video_file)),
            Media::None => None,
        };

        let logos = if config.logos.is_empty() {
            assets::discover_logos(&config.assets_dir)
        } else {
            config.logos.clone()
        };

        Ok(Self {
            generated: chrono::Local::now().to_rfc3339(),
            title: config.title.clone(),
            survey: survey.clone(),
            target,
            progress: survey.completed as f64 / target as f64 * 100.0,
            remaining: target_u.saturating_sub(survey.completed),
            gauge: Gauge::new(&config.gauge_title, survey.completed, target_u, &config.bar_color),
            state,
            celebration_message: config.celebration_message.clone(),
            media: config.media,
            media_url,
            logos: logos.iter().map(|l| links.url(l)).collect(),
        })
    }
}

/// Format an integer with `,` thousands separators
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::presenter::Region;
    use std::path::PathBuf;

    pub(crate) fn test_survey(completed: u64) -> SurveyCount {
        SurveyCount { column: "hh_num".to_string(), completed, rows: completed + 4 }
    }

    pub(crate) fn test_config() -> DashboardConfig {
        DashboardConfig {
            logos: vec!["logo1.png".to_string(), "logo2.png".to_string()],
            ..Default::default()
        }
    }

    // ==========================================================================
    // NUMBER FORMATTING
    // ==========================================================================

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1500), "1,500");
        assert_eq!(format_thousands(123456), "123,456");
        assert_eq!(format_thousands(1234567), "1,234,567");
    }

    // ==========================================================================
    // GAUGE
    // ==========================================================================
    //
    // The arc is filled proportionally and never overflows, even once the
    // fieldwork team goes past the target.
    // ==========================================================================

    #[test]
    fn test_gauge_fraction() {
        assert_eq!(Gauge::new("g", 750, 1500, "#FF4500").fraction, 0.5);
        assert_eq!(Gauge::new("g", 2000, 1500, "#FF4500").fraction, 1.0);
        assert_eq!(Gauge::new("g", 5, 0, "#FF4500").fraction, 0.0);
    }

    #[test]
    fn test_gauge_formatted() {
        let gauge = Gauge::new("Completed", 1523, 1500, "#FF4500");
        assert_eq!(gauge.formatted, "1,523");
        assert_eq!(gauge.max, 1500);
    }

    // ==========================================================================
    // DASHBOARD SNAPSHOT
    // ==========================================================================

    #[test]
    fn test_dashboard_below_target() {
        let config = test_config();
        let presenter = config.presenter().unwrap();
        let dashboard =
            Dashboard::build(&config, &presenter, &test_survey(1200), &AssetLinks::Served).unwrap();

        assert!(!dashboard.state.is_celebrating());
        assert_eq!(dashboard.remaining, 300);
        assert!((dashboard.progress - 80.0).abs() < 1e-9);
        assert_eq!(dashboard.media_url.as_deref(), Some("assets/fireworks.gif"));
        assert_eq!(dashboard.logos, vec!["assets/logo1.png", "assets/logo2.png"]);
    }

    #[test]
    fn test_dashboard_at_target() {
        let config = test_config();
        let presenter = config.presenter().unwrap();
        let dashboard =
            Dashboard::build(&config, &presenter, &test_survey(1500), &AssetLinks::Served).unwrap();

        assert!(dashboard.state.is_celebrating());
        assert_eq!(dashboard.remaining, 0);
        assert!(!dashboard.state.contains(Region::Video));
    }

    #[test]
    fn test_dashboard_video_media() {
        let config = DashboardConfig { media: Media::Video, ..test_config() };
        let presenter = config.presenter().unwrap();
        let dashboard =
            Dashboard::build(&config, &presenter, &test_survey(1600), &AssetLinks::Served).unwrap();

        assert_eq!(dashboard.media_url.as_deref(), Some("assets/fireworks.mp4"));
        assert!(dashboard.state.is_visible(Region::Video));
        assert!((dashboard.progress - 106.666).abs() < 0.01);
    }

    #[test]
    fn test_generate_picks_format_by_extension() {
        let config = test_config();
        let presenter = config.presenter().unwrap();
        let dashboard =
            Dashboard::build(&config, &presenter, &test_survey(10), &AssetLinks::Served).unwrap();

        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();

        let html_path = dir.join("dashboard.html");
        generate(&html_path, &dashboard).unwrap();
        assert!(std::fs::read_to_string(&html_path).unwrap().starts_with("<!DOCTYPE html>"));

        let json_path = dir.join("dashboard.json");
        generate(&json_path, &dashboard).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(value["survey"]["completed"], 10);
    }

    #[test]
    fn test_saved_dashboard_links_configured_assets_dir() {
        let config = DashboardConfig {
            assets_dir: PathBuf::from("/srv/fieldwork/media"),
            ..test_config()
        };
        let presenter = config.presenter().unwrap();
        let links = AssetLinks::for_file(&config.assets_dir);
        let dashboard = Dashboard::build(&config, &presenter, &test_survey(1500), &links).unwrap();

        assert_eq!(
            dashboard.media_url.as_deref(),
            Some("file:///srv/fieldwork/media/fireworks.gif")
        );
        assert_eq!(
            dashboard.logos,
            vec![
                "file:///srv/fieldwork/media/logo1.png",
                "file:///srv/fieldwork/media/logo2.png"
            ]
        );
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let config = DashboardConfig { bar_color: "red;} body {".to_string(), ..test_config() };
        let presenter = ThresholdPresenter::new(1500).unwrap();
        let err = Dashboard::build(&config, &presenter, &test_survey(10), &AssetLinks::Served)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
