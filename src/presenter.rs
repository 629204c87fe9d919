//! Threshold-triggered presentation state
//!
//! Decides which celebration regions of the dashboard are visible for a given
//! interview count. The rule is a single inclusive comparison:
//!
//! - `count >= target` → every region the deployment defines is visible
//! - `count < target`  → every region is hidden
//!
//! There is no partial reveal and no hidden state: the same `(count, target)`
//! pair always produces the same [`PresentationState`].
//!
//! # Example
//!
//! ```
//! use surveygauge::presenter::{compute_visibility, Region};
//!
//! let state = compute_visibility(1500, 1500).unwrap();
//! assert!(state.is_celebrating());
//! assert!(state.is_visible(Region::Video));
//!
//! assert!(compute_visibility(-1, 1500).is_err());
//! ```

use crate::survey::SurveyCount;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// A named UI region toggled by the celebration state
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    /// Full-page fireworks overlay
    Overlay,
    /// Blinking congratulation text
    Text,
    /// Fireworks video, only present in video deployments
    Video,
}

impl Region {
    pub const ALL: [Region; 3] = [Region::Overlay, Region::Text, Region::Video];

    /// DOM id of the element rendering this region
    pub fn element_id(&self) -> &'static str {
        match self {
            Region::Overlay => "fireworks-container",
            Region::Text => "congratulations-text",
            Region::Video => "fireworks-video",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Overlay => write!(f, "overlay"),
            Region::Text => write!(f, "text"),
            Region::Video => write!(f, "video"),
        }
    }
}

/// Error type for presenter evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenterError {
    InvalidInput(String),
}

impl fmt::Display for PresenterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresenterError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for PresenterError {}

pub type Result<T> = std::result::Result<T, PresenterError>;

/// Visibility flag for every region a deployment defines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationState {
    celebrating: bool,
    regions: BTreeMap<Region, bool>,
}

impl PresentationState {
    /// The not-celebrating state shown before the first evaluation
    pub fn initial(regions: &[Region]) -> Self {
        Self::uniform(regions, false)
    }

    fn uniform(regions: &[Region], visible: bool) -> Self {
        Self {
            celebrating: visible,
            regions: regions.iter().map(|r| (*r, visible)).collect(),
        }
    }

    /// True when the count reached the target, even with no regions to show
    pub fn is_celebrating(&self) -> bool {
        self.celebrating
    }

    /// Regions missing from the deployment report as hidden
    pub fn is_visible(&self, region: Region) -> bool {
        self.regions.get(&region).copied().unwrap_or(false)
    }

    pub fn regions(&self) -> impl Iterator<Item = (Region, bool)> + '_ {
        self.regions.iter().map(|(r, v)| (*r, *v))
    }

    pub fn contains(&self, region: Region) -> bool {
        self.regions.contains_key(&region)
    }

    /// CSS `display` value for a region
    pub fn display_style(&self, region: Region) -> &'static str {
        if self.is_visible(region) {
            "block"
        } else {
            "none"
        }
    }
}

impl Serialize for PresentationState {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("PresentationState", 2)?;
        s.serialize_field("celebrating", &self.is_celebrating())?;
        s.serialize_field("regions", &self.regions)?;
        s.end()
    }
}

/// Holds the immutable target and the region set of one deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThresholdPresenter {
    target: i64,
    regions: Vec<Region>,
}

impl ThresholdPresenter {
    /// Create a presenter over all regions. The target must be positive.
    pub fn new(target: i64) -> Result<Self> {
        check_target(target)?;
        Ok(Self {
            target,
            regions: Region::ALL.to_vec(),
        })
    }

    /// Restrict the presenter to the regions this deployment renders
    pub fn with_regions(mut self, regions: &[Region]) -> Self {
        let mut regions = regions.to_vec();
        regions.sort();
        regions.dedup();
        self.regions = regions;
        self
    }

    pub fn target(&self) -> i64 {
        self.target
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn initial_state(&self) -> PresentationState {
        PresentationState::initial(&self.regions)
    }

    pub fn evaluate(&self, count: i64) -> Result<PresentationState> {
        check_count(count)?;
        Ok(PresentationState::uniform(&self.regions, count >= self.target))
    }

    pub fn evaluate_survey(&self, survey: &SurveyCount) -> Result<PresentationState> {
        let count = i64::try_from(survey.completed).map_err(|_| {
            PresenterError::InvalidInput(format!(
                "survey count {} exceeds the supported range",
                survey.completed
            ))
        })?;
        self.evaluate(count)
    }
}

/// Evaluate `(count, target)` over every region
pub fn compute_visibility(count: i64, target: i64) -> Result<PresentationState> {
    ThresholdPresenter::new(target)?.evaluate(count)
}

fn check_count(count: i64) -> Result<()> {
    if count < 0 {
        return Err(PresenterError::InvalidInput(format!(
            "count must be non-negative, got {}",
            count
        )));
    }
    Ok(())
}

fn check_target(target: i64) -> Result<()> {
    if target <= 0 {
        return Err(PresenterError::InvalidInput(format!(
            "target must be positive, got {}",
            target
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_visible(state: &PresentationState) -> bool {
        Region::ALL.iter().all(|r| state.is_visible(*r))
    }

    fn all_hidden(state: &PresentationState) -> bool {
        Region::ALL.iter().all(|r| !state.is_visible(*r))
    }

    // ==========================================================================
    // THRESHOLD RULE
    // ==========================================================================
    //
    // The celebration appears exactly when the count reaches the target.
    // The boundary is inclusive: hitting 1500 of 1500 celebrates.
    // ==========================================================================

    #[test]
    fn test_exact_target_celebrates() {
        let state = compute_visibility(1500, 1500).unwrap();
        assert!(state.is_visible(Region::Overlay));
        assert!(state.is_visible(Region::Text));
        assert!(state.is_visible(Region::Video));
        assert!(state.is_celebrating());
    }

    #[test]
    fn test_one_below_target_hides_everything() {
        let state = compute_visibility(1499, 1500).unwrap();
        assert!(all_hidden(&state));
        assert!(!state.is_celebrating());
    }

    #[test]
    fn test_zero_count_hides_everything() {
        let state = compute_visibility(0, 1500).unwrap();
        assert!(all_hidden(&state));
    }

    #[test]
    fn test_above_target_celebrates() {
        let state = compute_visibility(2000, 1500).unwrap();
        assert!(all_visible(&state));
    }

    #[test]
    fn test_sweep_around_target() {
        let presenter = ThresholdPresenter::new(25).unwrap();
        for count in 0..25 {
            assert!(all_hidden(&presenter.evaluate(count).unwrap()), "count {}", count);
        }
        for count in 25..100 {
            assert!(all_visible(&presenter.evaluate(count).unwrap()), "count {}", count);
        }
    }

    #[test]
    fn test_target_of_one() {
        assert!(!compute_visibility(0, 1).unwrap().is_celebrating());
        assert!(compute_visibility(1, 1).unwrap().is_celebrating());
    }

    #[test]
    fn test_deterministic() {
        for (count, target) in [(0, 1500), (1499, 1500), (1500, 1500), (9000, 1500)] {
            let a = compute_visibility(count, target).unwrap();
            let b = compute_visibility(count, target).unwrap();
            assert_eq!(a, b);
        }
    }

    // ==========================================================================
    // INVALID INPUT
    // ==========================================================================

    #[test]
    fn test_negative_count_rejected() {
        let err = compute_visibility(-1, 1500).unwrap_err();
        assert!(matches!(err, PresenterError::InvalidInput(_)));
    }

    #[test]
    fn test_negative_target_rejected() {
        assert!(matches!(
            compute_visibility(10, -5),
            Err(PresenterError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_zero_target_rejected() {
        assert!(ThresholdPresenter::new(0).is_err());
    }

    #[test]
    fn test_error_display() {
        let err = compute_visibility(-1, 1500).unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: count must be non-negative, got -1");
    }

    // ==========================================================================
    // REGION SETS
    // ==========================================================================
    //
    // Image deployments have no video element, so the presenter only
    // reports the overlay and the text.
    // ==========================================================================

    #[test]
    fn test_image_deployment_regions() {
        let presenter = ThresholdPresenter::new(1500)
            .unwrap()
            .with_regions(&[Region::Text, Region::Overlay, Region::Text]);
        assert_eq!(presenter.regions(), &[Region::Overlay, Region::Text]);

        let state = presenter.evaluate(1600).unwrap();
        assert!(state.is_celebrating());
        assert!(!state.contains(Region::Video));
        assert!(!state.is_visible(Region::Video));
    }

    #[test]
    fn test_initial_state_not_celebrating() {
        let presenter = ThresholdPresenter::new(1500).unwrap();
        let state = presenter.initial_state();
        assert!(!state.is_celebrating());
        assert_eq!(state.regions().count(), 3);
    }

    #[test]
    fn test_empty_region_set_follows_threshold() {
        let presenter = ThresholdPresenter::new(10).unwrap().with_regions(&[]);
        assert!(presenter.evaluate(100).unwrap().is_celebrating());
        assert!(presenter.evaluate(10).unwrap().is_celebrating());
        assert!(!presenter.evaluate(9).unwrap().is_celebrating());
        assert!(!presenter.initial_state().is_celebrating());
    }

    #[test]
    fn test_display_style() {
        let state = compute_visibility(1500, 1500).unwrap();
        assert_eq!(state.display_style(Region::Overlay), "block");
        let state = compute_visibility(3, 1500).unwrap();
        assert_eq!(state.display_style(Region::Overlay), "none");
    }

    #[test]
    fn test_evaluate_survey() {
        let presenter = ThresholdPresenter::new(2).unwrap();
        let survey = SurveyCount { column: "hh_num".to_string(), completed: 2, rows: 3 };
        assert!(presenter.evaluate_survey(&survey).unwrap().is_celebrating());

        let huge = SurveyCount { column: "hh_num".to_string(), completed: u64::MAX, rows: 0 };
        assert!(presenter.evaluate_survey(&huge).is_err());
    }

    // ==========================================================================
    // JSON SHAPE
    // ==========================================================================

    #[test]
    fn test_serialized_shape() {
        let state = compute_visibility(1500, 1500).unwrap();
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "celebrating": true,
                "regions": { "overlay": true, "text": true, "video": true }
            })
        );
    }
}
