//! Configuration and results types exchanged with the simulation backend.
//!
//! Both shapes mirror the backend's JSON exactly. Map-valued fields use
//! [`IndexMap`] so the key order of the payload survives decoding; the detail
//! table relies on it to break ties.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown dilemma type: {0:?}")]
    UnknownKind(String),
    #[error("unknown distribution: {0:?}")]
    UnknownDistribution(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("at least 2 agents are required for the simulation (got {total})")]
    TooFewAgents { total: u64 },
    #[error("round count must be greater than zero")]
    NoRounds,
}

// ─────────────────────────────────────────────────────────────────────────
// Dilemma kinds
// ─────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DilemmaKind {
    TragedyCommons,
    FreeRider,
    PublicGoods,
}

impl DilemmaKind {
    pub fn label(self) -> &'static str {
        match self {
            DilemmaKind::TragedyCommons => "tragedy_commons",
            DilemmaKind::FreeRider => "free_rider",
            DilemmaKind::PublicGoods => "public_goods",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            DilemmaKind::TragedyCommons => "Tragedy of the Commons",
            DilemmaKind::FreeRider => "Free Rider Problem",
            DilemmaKind::PublicGoods => "Public Goods Game",
        }
    }

    /// DOM id of the configuration panel for this kind (`tragedy-commons-config`).
    pub fn panel_id(self) -> String {
        format!("{}-config", self.label().replace('_', "-"))
    }

    /// Strategies offered by the configuration form for this kind.
    pub fn known_strategies(self) -> &'static [&'static str] {
        match self {
            DilemmaKind::TragedyCommons => &["sustainable", "greedy", "adaptive", "random"],
            DilemmaKind::FreeRider => &["contributor", "free_rider", "conditional", "random"],
            DilemmaKind::PublicGoods => &["full", "zero", "conditional", "random"],
        }
    }

    /// Parse the `?dilemma=` query parameter; anything unrecognised is ignored.
    pub fn from_query(query: &str) -> Option<Self> {
        query
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(k, _)| *k == "dilemma")
            .and_then(|(_, v)| v.parse().ok())
    }

    pub fn all() -> &'static [DilemmaKind] {
        &[
            DilemmaKind::TragedyCommons,
            DilemmaKind::FreeRider,
            DilemmaKind::PublicGoods,
        ]
    }
}

impl fmt::Display for DilemmaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DilemmaKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DilemmaKind::all()
            .iter()
            .copied()
            .find(|k| k.label() == s.trim())
            .ok_or_else(|| ModelError::UnknownKind(s.to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────
// Kind-specific parameters
// ─────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommonsParams {
    pub resource_size: u32,
    pub regeneration_rate: f64,
    pub harvest_limit: u32,
}

impl Default for CommonsParams {
    fn default() -> Self {
        Self {
            resource_size: 1000,
            regeneration_rate: 0.1,
            harvest_limit: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FreeRiderParams {
    pub project_cost: u32,
    pub benefit_multiplier: f64,
    /// Funding threshold in percent of the project cost.
    pub threshold: u32,
}

impl Default for FreeRiderParams {
    fn default() -> Self {
        Self {
            project_cost: 100,
            benefit_multiplier: 1.5,
            threshold: 60,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Distribution {
    #[default]
    Equal,
    Proportional,
}

impl Distribution {
    pub fn label(self) -> &'static str {
        match self {
            Distribution::Equal => "equal",
            Distribution::Proportional => "proportional",
        }
    }

    pub fn all() -> &'static [Distribution] {
        &[Distribution::Equal, Distribution::Proportional]
    }
}

impl FromStr for Distribution {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Distribution::all()
            .iter()
            .copied()
            .find(|d| d.label() == s.trim())
            .ok_or_else(|| ModelError::UnknownDistribution(s.to_string()))
    }
}

impl Serialize for Distribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Distribution {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublicGoodsParams {
    pub endowment: u32,
    pub multiplier: f64,
    pub distribution: Distribution,
}

impl Default for PublicGoodsParams {
    fn default() -> Self {
        Self {
            endowment: 20,
            multiplier: 1.6,
            distribution: Distribution::Equal,
        }
    }
}

/// Parameter record tagged by the dilemma it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub enum DilemmaParameters {
    Commons(CommonsParams),
    FreeRider(FreeRiderParams),
    PublicGoods(PublicGoodsParams),
}

impl DilemmaParameters {
    pub fn defaults_for(kind: DilemmaKind) -> Self {
        match kind {
            DilemmaKind::TragedyCommons => DilemmaParameters::Commons(CommonsParams::default()),
            DilemmaKind::FreeRider => DilemmaParameters::FreeRider(FreeRiderParams::default()),
            DilemmaKind::PublicGoods => {
                DilemmaParameters::PublicGoods(PublicGoodsParams::default())
            }
        }
    }

    pub fn kind(&self) -> DilemmaKind {
        match self {
            DilemmaParameters::Commons(_) => DilemmaKind::TragedyCommons,
            DilemmaParameters::FreeRider(_) => DilemmaKind::FreeRider,
            DilemmaParameters::PublicGoods(_) => DilemmaKind::PublicGoods,
        }
    }

    fn from_value(kind: DilemmaKind, value: serde_json::Value) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            DilemmaKind::TragedyCommons => DilemmaParameters::Commons(serde_json::from_value(value)?),
            DilemmaKind::FreeRider => DilemmaParameters::FreeRider(serde_json::from_value(value)?),
            DilemmaKind::PublicGoods => {
                DilemmaParameters::PublicGoods(serde_json::from_value(value)?)
            }
        })
    }

    fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        match self {
            DilemmaParameters::Commons(p) => serde_json::to_value(p),
            DilemmaParameters::FreeRider(p) => serde_json::to_value(p),
            DilemmaParameters::PublicGoods(p) => serde_json::to_value(p),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────
// SimulationConfig
// ─────────────────────────────────────────────────────────────────────────

/// One simulation request. Serialises to
/// `{name, description, dilemma_type, rounds, strategies, parameters}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ConfigWire", into = "ConfigWire")]
pub struct SimulationConfig {
    pub name: String,
    pub description: String,
    pub rounds: u32,
    pub strategies: IndexMap<String, u32>,
    pub parameters: DilemmaParameters,
}

#[derive(Serialize, Deserialize)]
struct ConfigWire {
    name: String,
    #[serde(default)]
    description: String,
    dilemma_type: DilemmaKind,
    rounds: u32,
    #[serde(default)]
    strategies: IndexMap<String, u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parameters: Option<serde_json::Value>,
}

impl TryFrom<ConfigWire> for SimulationConfig {
    type Error = serde_json::Error;

    fn try_from(wire: ConfigWire) -> Result<Self, Self::Error> {
        let parameters = match wire.parameters {
            Some(v) if !v.is_null() => DilemmaParameters::from_value(wire.dilemma_type, v)?,
            _ => DilemmaParameters::defaults_for(wire.dilemma_type),
        };
        Ok(Self {
            name: wire.name,
            description: wire.description,
            rounds: wire.rounds,
            strategies: wire.strategies,
            parameters,
        })
    }
}

impl From<SimulationConfig> for ConfigWire {
    fn from(cfg: SimulationConfig) -> Self {
        let dilemma_type = cfg.parameters.kind();
        // Parameter records are plain numbers and strings; encoding cannot fail.
        let parameters = cfg.parameters.to_value().ok();
        Self {
            name: cfg.name,
            description: cfg.description,
            dilemma_type,
            rounds: cfg.rounds,
            strategies: cfg.strategies,
            parameters,
        }
    }
}

impl SimulationConfig {
    /// A config with the kind's default parameters and its first two known
    /// strategies at 5 agents each.
    pub fn with_defaults(kind: DilemmaKind, name: impl Into<String>) -> Self {
        let strategies = kind
            .known_strategies()
            .iter()
            .take(2)
            .map(|s| (s.to_string(), 5))
            .collect();
        Self {
            name: name.into(),
            description: String::new(),
            rounds: 50,
            strategies,
            parameters: DilemmaParameters::defaults_for(kind),
        }
    }

    pub fn kind(&self) -> DilemmaKind {
        self.parameters.kind()
    }

    /// Summed in `u64` so no combination of `u32` counts can wrap.
    pub fn total_agents(&self) -> u64 {
        self.strategies.values().map(|&n| u64::from(n)).sum()
    }

    pub fn check(&self) -> Result<(), ConfigError> {
        if self.rounds == 0 {
            return Err(ConfigError::NoRounds);
        }
        let total = self.total_agents();
        if total < 2 {
            return Err(ConfigError::TooFewAgents { total });
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string(self)?)
    }
}

// ─────────────────────────────────────────────────────────────────────────
// Results
// ─────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Cooperate,
    Defect,
}

impl Move {
    pub fn symbol(self) -> &'static str {
        match self {
            Move::Cooperate => "C",
            Move::Defect => "D",
        }
    }

    pub fn is_cooperate(self) -> bool {
        self == Move::Cooperate
    }
}

impl Serialize for Move {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}

impl<'de> Deserialize<'de> for Move {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Anything that is not an explicit cooperate counts as a defection.
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(match raw.as_deref() {
            Some("C") | Some("c") | Some("cooperate") => Move::Cooperate,
            _ => Move::Defect,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub agent1: String,
    pub agent2: String,
    pub move1: Move,
    pub move2: Move,
    #[serde(default)]
    pub score1: f64,
    #[serde(default)]
    pub score2: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoundSnapshot {
    #[serde(default)]
    pub round: u32,
    #[serde(default)]
    pub interactions: Vec<Interaction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_level: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funding_progress: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributions: Option<IndexMap<String, f64>>,
}

/// Per-strategy totals. Older backends spell the score `average_score`;
/// when a payload carries both spellings `avg_score` wins.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StrategyPerformance {
    pub avg_score: Option<f64>,
    pub total_cooperation: u64,
    pub total_defection: u64,
    pub cooperation_rate: Option<f64>,
    pub agent_count: Option<u32>,
    pub total_harvest: Option<f64>,
    pub average_gain: Option<f64>,
    pub average_payoff: Option<f64>,
    pub sustainability_impact: Option<f64>,
    pub social_welfare: Option<f64>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawPerformance {
    avg_score: Option<f64>,
    average_score: Option<f64>,
    total_cooperation: u64,
    total_defection: u64,
    cooperation_rate: Option<f64>,
    agent_count: Option<u32>,
    total_harvest: Option<f64>,
    average_gain: Option<f64>,
    average_payoff: Option<f64>,
    sustainability_impact: Option<f64>,
    social_welfare: Option<f64>,
}

impl<'de> Deserialize<'de> for StrategyPerformance {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = RawPerformance::deserialize(d)?;
        Ok(StrategyPerformance {
            avg_score: raw.avg_score.or(raw.average_score),
            total_cooperation: raw.total_cooperation,
            total_defection: raw.total_defection,
            cooperation_rate: raw.cooperation_rate,
            agent_count: raw.agent_count,
            total_harvest: raw.total_harvest,
            average_gain: raw.average_gain,
            average_payoff: raw.average_payoff,
            sustainability_impact: raw.sustainability_impact,
            social_welfare: raw.social_welfare,
        })
    }
}

impl StrategyPerformance {
    pub fn total_moves(&self) -> u64 {
        self.total_cooperation + self.total_defection
    }

    /// Average harvest per agent; zero when either side is missing.
    pub fn average_harvest(&self) -> f64 {
        match (self.total_harvest, self.agent_count) {
            (Some(h), Some(n)) if n > 0 => h / n as f64,
            _ => 0.0,
        }
    }
}

/// The backend's results payload. Immutable once decoded.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Results {
    #[serde(default)]
    pub rounds: Vec<RoundSnapshot>,
    #[serde(default)]
    pub scores: IndexMap<String, Vec<f64>>,
    #[serde(default)]
    pub strategy_performance: IndexMap<String, StrategyPerformance>,
    #[serde(default)]
    pub overall_cooperation: u64,
    #[serde(default)]
    pub overall_defection: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_levels: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funding_progress: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contribution_history: Option<IndexMap<String, Vec<f64>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_contribution: Option<Vec<f64>>,
}

impl Results {
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn total_rounds(&self) -> usize {
        self.rounds.len()
    }
}

/// Strategy prefix of an agent id: `tit_for_tat_3` → `tit_for_tat`.
pub fn agent_strategy(agent_id: &str) -> &str {
    match agent_id.rfind('_') {
        Some(idx) => &agent_id[..idx],
        None => agent_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_round_trips_the_backend_shape() {
        let json = r#"{
            "name": "Test",
            "description": "",
            "dilemma_type": "free_rider",
            "rounds": 20,
            "strategies": {"contributor": 3, "free_rider": 2},
            "parameters": {"project_cost": 200, "benefit_multiplier": 2.0, "threshold": 75}
        }"#;
        let cfg = SimulationConfig::from_json(json).unwrap();
        assert_eq!(cfg.kind(), DilemmaKind::FreeRider);
        assert_eq!(cfg.total_agents(), 5);
        assert_eq!(
            cfg.parameters,
            DilemmaParameters::FreeRider(FreeRiderParams {
                project_cost: 200,
                benefit_multiplier: 2.0,
                threshold: 75,
            })
        );

        let value: serde_json::Value = serde_json::from_str(&cfg.to_json().unwrap()).unwrap();
        assert_eq!(value["dilemma_type"], "free_rider");
        assert_eq!(value["parameters"]["threshold"], 75);
        let keys: Vec<&String> = value["strategies"].as_object().unwrap().keys().collect();
        assert_eq!(keys, ["contributor", "free_rider"]);
    }

    #[test]
    fn missing_parameters_fall_back_to_kind_defaults() {
        let json = r#"{"name":"x","dilemma_type":"public_goods","rounds":5}"#;
        let cfg = SimulationConfig::from_json(json).unwrap();
        assert_eq!(
            cfg.parameters,
            DilemmaParameters::PublicGoods(PublicGoodsParams::default())
        );
    }

    #[test]
    fn unknown_kind_and_distribution_are_rejected() {
        assert!("prisoners_dilemma".parse::<DilemmaKind>().is_err());
        let json = r#"{"name":"x","dilemma_type":"public_goods","rounds":5,
            "parameters":{"distribution":"lottery"}}"#;
        assert!(SimulationConfig::from_json(json).is_err());
    }

    #[test]
    fn agent_totals_do_not_wrap_at_u32_max() {
        let mut cfg = SimulationConfig::with_defaults(DilemmaKind::TragedyCommons, "big");
        cfg.strategies = IndexMap::from([("a".to_string(), u32::MAX), ("b".to_string(), 3)]);
        assert_eq!(cfg.total_agents(), 4_294_967_298);
        assert!(cfg.check().is_ok());
    }

    #[test]
    fn check_enforces_agent_and_round_invariants() {
        let mut cfg = SimulationConfig::with_defaults(DilemmaKind::TragedyCommons, "t");
        assert!(cfg.check().is_ok());

        cfg.strategies = IndexMap::from([("greedy".to_string(), 1)]);
        assert_eq!(cfg.check(), Err(ConfigError::TooFewAgents { total: 1 }));

        cfg.strategies.insert("sustainable".to_string(), 1);
        cfg.rounds = 0;
        assert_eq!(cfg.check(), Err(ConfigError::NoRounds));
    }

    #[test]
    fn moves_decode_tolerantly() {
        let json = r#"[
            {"agent1":"a_1","agent2":"b_1","move1":"C","move2":"D","score1":3,"score2":5},
            {"agent1":"a_1","agent2":"b_1","move1":"cooperate","move2":null}
        ]"#;
        let parsed: Vec<Interaction> = serde_json::from_str(json).unwrap();
        assert_eq!(parsed[0].move1, Move::Cooperate);
        assert_eq!(parsed[0].move2, Move::Defect);
        assert_eq!(parsed[1].move1, Move::Cooperate);
        assert_eq!(parsed[1].move2, Move::Defect);
        assert_eq!(parsed[1].score1, 0.0);
    }

    #[test]
    fn performance_accepts_both_score_spellings() {
        let a: StrategyPerformance = serde_json::from_str(r#"{"avg_score": 2.5}"#).unwrap();
        let b: StrategyPerformance = serde_json::from_str(r#"{"average_score": 2.5}"#).unwrap();
        assert_eq!(a.avg_score, Some(2.5));
        assert_eq!(b.avg_score, Some(2.5));
    }

    #[test]
    fn performance_with_both_score_keys_prefers_avg_score() {
        let p: StrategyPerformance =
            serde_json::from_str(r#"{"average_score": 1.0, "avg_score": 2.5, "total_cooperation": 3}"#)
                .unwrap();
        assert_eq!(p.avg_score, Some(2.5));
        assert_eq!(p.total_cooperation, 3);

        let only_old: StrategyPerformance =
            serde_json::from_str(r#"{"avg_score": null, "average_score": 4.0}"#).unwrap();
        assert_eq!(only_old.avg_score, Some(4.0));
    }

    #[test]
    fn query_selects_initial_kind() {
        assert_eq!(
            DilemmaKind::from_query("?dilemma=public_goods"),
            Some(DilemmaKind::PublicGoods)
        );
        assert_eq!(DilemmaKind::from_query("?x=1&dilemma=nope"), None);
        assert_eq!(DilemmaKind::FreeRider.panel_id(), "free-rider-config");
    }

    #[test]
    fn agent_strategy_strips_instance_suffix() {
        assert_eq!(agent_strategy("tit_for_tat_12"), "tit_for_tat");
        assert_eq!(agent_strategy("greedy"), "greedy");
    }
}
