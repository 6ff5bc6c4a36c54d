//! Design scenario selection
//!
//! The host page passes `?scenario=<n>`; the number only picks which
//! background image is shown and is echoed back in the export payload.

use serde::Serialize;

pub const SCENARIO_COUNT: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Scenario(u8);

impl Default for Scenario {
    fn default() -> Self {
        Scenario(1)
    }
}

impl Scenario {
    /// Out-of-range or unparsable values fall back to scenario 1
    pub fn parse(value: Option<&str>) -> Self {
        value
            .and_then(|v| v.trim().parse::<u8>().ok())
            .and_then(Self::from_number)
            .unwrap_or_default()
    }

    pub fn from_number(n: u8) -> Option<Self> {
        (1..=SCENARIO_COUNT).contains(&n).then_some(Scenario(n))
    }

    /// Pick the `scenario` parameter out of a URL query string
    pub fn from_query(query: &str) -> Self {
        let value = query
            .trim_start_matches('?')
            .split('&')
            .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
            .find(|(key, _)| *key == "scenario")
            .map(|(_, value)| value);
        Self::parse(value)
    }

    pub fn number(&self) -> u8 {
        self.0
    }

    pub fn title(&self) -> String {
        format!("Design Scenario {}", self.0)
    }

    pub fn image_path(&self) -> String {
        format!("design{}.png", self.0)
    }

    pub fn diagram_path(&self) -> String {
        format!("Beam_Diagram{}.png", self.0)
    }

    pub fn diagram_alt(&self) -> String {
        format!("Beam diagram for Design Scenario {}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_query() {
        assert_eq!(Scenario::from_query("?scenario=3").number(), 3);
        assert_eq!(Scenario::from_query("lang=en&scenario=5").number(), 5);
        assert_eq!(Scenario::from_query("scenario=9").number(), 1);
        assert_eq!(Scenario::from_query("scenario=abc").number(), 1);
        assert_eq!(Scenario::from_query("scenario").number(), 1);
        assert_eq!(Scenario::from_query("").number(), 1);
    }

    #[test]
    fn test_asset_names() {
        let s = Scenario::parse(Some("2"));
        assert_eq!(s.title(), "Design Scenario 2");
        assert_eq!(s.image_path(), "design2.png");
        assert_eq!(s.diagram_path(), "Beam_Diagram2.png");
        assert_eq!(s.diagram_alt(), "Beam diagram for Design Scenario 2");
    }

    #[test]
    fn test_from_number_bounds() {
        assert!(Scenario::from_number(0).is_none());
        assert!(Scenario::from_number(1).is_some());
        assert!(Scenario::from_number(5).is_some());
        assert!(Scenario::from_number(6).is_none());
    }
}
