//! Disruption scenarios understood by the simulation service.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Disruption types applied to a city's road network.
///
/// Serialized with the exact identifiers the simulation service expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Scenario {
    #[serde(rename = "Bridge Collapse")]
    BridgeCollapse,
    #[serde(rename = "Tunnel Closure")]
    TunnelClosure,
    #[serde(rename = "Highway Flood")]
    HighwayFlood,
    #[serde(rename = "Targeted Attack (Top k%)")]
    TargetedAttack,
    #[serde(rename = "Random Failure")]
    RandomFailure,
}

/// Static presentation data attached to each scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScenarioInfo {
    pub scenario: Scenario,
    pub wire_name: &'static str,
    pub short: &'static str,
    pub long: &'static str,
    /// Whether the optional external flood dataset applies.
    pub flood_data_applicable: bool,
}

static SCENARIO_TABLE: [ScenarioInfo; 5] = [
    ScenarioInfo {
        scenario: Scenario::BridgeCollapse,
        wire_name: "Bridge Collapse",
        short: "Bridges fail, cutting cross-river or gap-spanning links.",
        long: "Bridge collapses isolate parts of the city separated by rivers, valleys, or highways. Detours are often long and limited.",
        flood_data_applicable: false,
    },
    ScenarioInfo {
        scenario: Scenario::TunnelClosure,
        wire_name: "Tunnel Closure",
        short: "Key tunnels close, forcing traffic onto surface routes.",
        long: "Tunnel closures push traffic onto surface streets and alternative crossings, often overloading a few remaining corridors.",
        flood_data_applicable: false,
    },
    ScenarioInfo {
        scenario: Scenario::HighwayFlood,
        wire_name: "Highway Flood",
        short: "Flooding removes segments of major highways.",
        long: "Highway floods take out the main fast corridors, forcing trips onto slower local streets and increasing vulnerability near flood-prone zones.",
        flood_data_applicable: true,
    },
    ScenarioInfo {
        scenario: Scenario::TargetedAttack,
        wire_name: "Targeted Attack (Top k%)",
        short: "The most important roads are deliberately taken out.",
        long: "Targeted attacks remove roads that carry lots of flow or connect many neighborhoods, similar to coordinated sabotage or systemic infrastructure failures.",
        flood_data_applicable: false,
    },
    ScenarioInfo {
        scenario: Scenario::RandomFailure,
        wire_name: "Random Failure",
        short: "Random roads go down, like scattered accidents or utility works.",
        long: "Random failures mimic everyday chaos: crashes, minor works, or localized weather. No one is targeting key roads, but enough small hits add up.",
        flood_data_applicable: false,
    },
];

impl Scenario {
    /// All scenarios in the order the service lists them.
    pub const ALL: [Self; 5] = [
        Self::BridgeCollapse,
        Self::TunnelClosure,
        Self::HighwayFlood,
        Self::TargetedAttack,
        Self::RandomFailure,
    ];

    #[must_use]
    pub fn info(self) -> &'static ScenarioInfo {
        match self {
            Self::BridgeCollapse => &SCENARIO_TABLE[0],
            Self::TunnelClosure => &SCENARIO_TABLE[1],
            Self::HighwayFlood => &SCENARIO_TABLE[2],
            Self::TargetedAttack => &SCENARIO_TABLE[3],
            Self::RandomFailure => &SCENARIO_TABLE[4],
        }
    }

    /// Identifier sent to and received from the simulation service.
    #[must_use]
    pub fn wire_name(self) -> &'static str {
        self.info().wire_name
    }

    #[must_use]
    pub fn accepts_flood_data(self) -> bool {
        self.info().flood_data_applicable
    }

    /// Parse a list of service identifiers, skipping names this build does not know.
    #[must_use]
    pub fn parse_known<S: AsRef<str>>(names: &[S]) -> Vec<Self> {
        let mut known = Vec::with_capacity(names.len());
        for name in names {
            match name.as_ref().parse::<Self>() {
                Ok(scenario) if !known.contains(&scenario) => known.push(scenario),
                Ok(_) => {}
                Err(err) => log::warn!("ignoring scenario from service: {err}"),
            }
        }
        known
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown scenario: {0}")]
pub struct UnknownScenario(pub String);

impl FromStr for Scenario {
    type Err = UnknownScenario;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        SCENARIO_TABLE
            .iter()
            .find(|info| info.wire_name.eq_ignore_ascii_case(trimmed))
            .map(|info| info.scenario)
            .ok_or_else(|| UnknownScenario(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_indexed_by_variant() {
        for scenario in Scenario::ALL {
            assert_eq!(scenario.info().scenario, scenario);
        }
    }

    #[test]
    fn only_highway_flood_accepts_flood_data() {
        let flood: Vec<_> = Scenario::ALL
            .into_iter()
            .filter(|s| s.accepts_flood_data())
            .collect();
        assert_eq!(flood, vec![Scenario::HighwayFlood]);
    }

    #[test]
    fn parses_service_identifiers() {
        assert_eq!(
            "Targeted Attack (Top k%)".parse::<Scenario>(),
            Ok(Scenario::TargetedAttack)
        );
        assert_eq!(" highway flood ".parse::<Scenario>(), Ok(Scenario::HighwayFlood));
        assert!("Meteor Strike".parse::<Scenario>().is_err());
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&Scenario::BridgeCollapse).unwrap();
        assert_eq!(json, "\"Bridge Collapse\"");
        let parsed: Scenario = serde_json::from_str("\"Random Failure\"").unwrap();
        assert_eq!(parsed, Scenario::RandomFailure);
    }

    #[test]
    fn parse_known_skips_unknown_and_duplicates() {
        let parsed = Scenario::parse_known(&["Bridge Collapse", "Alien Invasion", "Bridge Collapse"]);
        assert_eq!(parsed, vec![Scenario::BridgeCollapse]);
    }
}
