//! Configuration form: raw inputs, validation and collection.
//!
//! The form keeps every input as the text the user typed. Counts are read
//! leniently (junk counts as zero) so the live agent total never fails;
//! rounds and parameters must contain a number when the form is collected.

use indexmap::IndexMap;
use thiserror::Error;
use tracing::debug;

use crate::model::{
    CommonsParams, DilemmaKind, DilemmaParameters, FreeRiderParams, ModelError,
    PublicGoodsParams, SimulationConfig,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please provide a configuration name")]
    MissingName,
    #[error("At least 2 agents are required for the simulation")]
    TooFewAgents { total: u64 },
    #[error("invalid value for {field}: {value:?}")]
    InvalidField { field: String, value: String },
}

impl FormError {
    fn invalid(field: &str, value: &str) -> Self {
        FormError::InvalidField {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}

/// Leading integer of `raw`, ignoring leading whitespace and trailing junk.
/// `"12abc"` → `Some(12)`, `"abc"` → `None`.
pub fn parse_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Leading decimal number of `raw`. `"1.5x"` → `Some(1.5)`.
pub fn parse_float(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let end = s
        .find(|c: char| !matches!(c, '0'..='9' | '+' | '-' | '.' | 'e' | 'E'))
        .unwrap_or(s.len());
    (1..=end)
        .rev()
        .find_map(|len| s[..len].parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Lenient agent count: anything unparsable or negative is zero.
pub fn parse_count(raw: &str) -> u32 {
    parse_int(raw)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(0)
}

/// Field names of the parameter inputs for each kind, in form order.
pub fn parameter_fields(kind: DilemmaKind) -> &'static [&'static str] {
    match kind {
        DilemmaKind::TragedyCommons => &["resource_size", "regeneration_rate", "harvest_limit"],
        DilemmaKind::FreeRider => &["project_cost", "benefit_multiplier", "threshold"],
        DilemmaKind::PublicGoods => &["endowment", "multiplier", "distribution"],
    }
}

fn parameter_inputs(params: &DilemmaParameters) -> IndexMap<&'static str, String> {
    let values = match params {
        DilemmaParameters::Commons(p) => [
            p.resource_size.to_string(),
            p.regeneration_rate.to_string(),
            p.harvest_limit.to_string(),
        ],
        DilemmaParameters::FreeRider(p) => [
            p.project_cost.to_string(),
            p.benefit_multiplier.to_string(),
            p.threshold.to_string(),
        ],
        DilemmaParameters::PublicGoods(p) => [
            p.endowment.to_string(),
            p.multiplier.to_string(),
            p.distribution.label().to_string(),
        ],
    };
    parameter_fields(params.kind())
        .iter()
        .copied()
        .zip(values)
        .collect()
}

/// Inputs of one dilemma panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelInputs {
    pub strategies: IndexMap<String, String>,
    pub parameters: IndexMap<&'static str, String>,
}

impl PanelInputs {
    fn defaults(kind: DilemmaKind) -> Self {
        Self {
            strategies: kind
                .known_strategies()
                .iter()
                .map(|s| (s.to_string(), "0".to_string()))
                .collect(),
            parameters: parameter_inputs(&DilemmaParameters::defaults_for(kind)),
        }
    }

    pub fn total_agents(&self) -> u64 {
        self.strategies
            .values()
            .map(|raw| u64::from(parse_count(raw)))
            .sum()
    }

    fn field(&self, name: &'static str) -> &str {
        self.parameters.get(name).map(String::as_str).unwrap_or("")
    }

    fn uint(&self, name: &'static str) -> Result<u32, FormError> {
        let raw = self.field(name);
        parse_int(raw)
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| FormError::invalid(name, raw))
    }

    fn float(&self, name: &'static str) -> Result<f64, FormError> {
        let raw = self.field(name);
        parse_float(raw).ok_or_else(|| FormError::invalid(name, raw))
    }

    fn collect_parameters(&self, kind: DilemmaKind) -> Result<DilemmaParameters, FormError> {
        Ok(match kind {
            DilemmaKind::TragedyCommons => DilemmaParameters::Commons(CommonsParams {
                resource_size: self.uint("resource_size")?,
                regeneration_rate: self.float("regeneration_rate")?,
                harvest_limit: self.uint("harvest_limit")?,
            }),
            DilemmaKind::FreeRider => DilemmaParameters::FreeRider(FreeRiderParams {
                project_cost: self.uint("project_cost")?,
                benefit_multiplier: self.float("benefit_multiplier")?,
                threshold: self.uint("threshold")?,
            }),
            DilemmaKind::PublicGoods => {
                let raw = self.field("distribution");
                DilemmaParameters::PublicGoods(PublicGoodsParams {
                    endowment: self.uint("endowment")?,
                    multiplier: self.float("multiplier")?,
                    distribution: raw
                        .parse()
                        .map_err(|_| FormError::invalid("distribution", raw))?,
                })
            }
        })
    }
}

/// The whole configuration form. Every kind keeps its own panel so switching
/// the selected kind does not lose what was typed.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub name: String,
    pub description: String,
    pub kind: DilemmaKind,
    pub rounds: String,
    panels: IndexMap<DilemmaKind, PanelInputs>,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

impl FormState {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            kind: DilemmaKind::TragedyCommons,
            rounds: "50".to_string(),
            panels: DilemmaKind::all()
                .iter()
                .map(|&k| (k, PanelInputs::defaults(k)))
                .collect(),
        }
    }

    /// A form pre-filled from an existing config.
    pub fn from_config(config: &SimulationConfig) -> Self {
        let mut form = Self::new();
        form.name = config.name.clone();
        form.description = config.description.clone();
        form.kind = config.kind();
        form.rounds = config.rounds.to_string();
        let panel = form.panel_mut(config.kind());
        for (strategy, count) in &config.strategies {
            panel.strategies.insert(strategy.clone(), count.to_string());
        }
        panel.parameters = parameter_inputs(&config.parameters);
        form
    }

    pub fn panel(&self, kind: DilemmaKind) -> Option<&PanelInputs> {
        self.panels.get(&kind)
    }

    fn panel_mut(&mut self, kind: DilemmaKind) -> &mut PanelInputs {
        self.panels
            .entry(kind)
            .or_insert_with(|| PanelInputs::defaults(kind))
    }

    pub fn set_strategy_count(&mut self, kind: DilemmaKind, strategy: &str, raw: impl Into<String>) {
        self.panel_mut(kind)
            .strategies
            .insert(strategy.to_string(), raw.into());
    }

    /// Set a parameter input. Unknown field names are ignored.
    pub fn set_parameter(&mut self, kind: DilemmaKind, field: &str, raw: impl Into<String>) {
        let Some(&name) = parameter_fields(kind).iter().find(|f| **f == field) else {
            debug!(field, kind = kind.label(), "ignoring unknown parameter field");
            return;
        };
        self.panel_mut(kind).parameters.insert(name, raw.into());
    }

    /// Live agent total for one panel.
    pub fn total_agents(&self, kind: DilemmaKind) -> u64 {
        self.panels.get(&kind).map_or(0, PanelInputs::total_agents)
    }

    pub fn validate(&self) -> Result<(), FormError> {
        if self.name.trim().is_empty() {
            return Err(FormError::MissingName);
        }
        let total = self.total_agents(self.kind);
        if total < 2 {
            return Err(FormError::TooFewAgents { total });
        }
        Ok(())
    }

    /// Build the config for the selected kind. Strategies with no agents are
    /// left out.
    pub fn collect(&self) -> Result<SimulationConfig, FormError> {
        let rounds = parse_int(&self.rounds)
            .and_then(|v| u32::try_from(v).ok())
            .filter(|&v| v > 0)
            .ok_or_else(|| FormError::invalid("rounds", &self.rounds))?;

        let fallback;
        let panel = match self.panel(self.kind) {
            Some(panel) => panel,
            None => {
                fallback = PanelInputs::defaults(self.kind);
                &fallback
            }
        };
        let strategies = panel
            .strategies
            .iter()
            .map(|(name, raw)| (name.clone(), parse_count(raw)))
            .filter(|(_, count)| *count > 0)
            .collect();

        Ok(SimulationConfig {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            rounds,
            strategies,
            parameters: panel.collect_parameters(self.kind)?,
        })
    }

    pub fn submit(&self) -> Result<SimulationConfig, FormError> {
        self.validate()?;
        self.collect()
    }
}

/// Backend endpoint that stores a configuration (JSON body).
pub const CONFIG_PATH: &str = "/api/social-dilemma/config";

/// Backend endpoint that runs a simulation (form body).
pub const SIMULATE_PATH: &str = "/api/social-dilemma/simulate";

/// Body of the simulate request: a single `config` field holding the JSON config.
pub fn simulate_form_fields(
    config: &SimulationConfig,
) -> Result<Vec<(&'static str, String)>, ModelError> {
    Ok(vec![("config", config.to_json()?)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Distribution;

    #[test]
    fn empty_name_is_rejected() {
        let mut form = FormState::new();
        form.name = "   ".into();
        form.set_strategy_count(DilemmaKind::TragedyCommons, "greedy", "3");
        assert_eq!(form.validate(), Err(FormError::MissingName));
    }

    #[test]
    fn a_single_agent_is_rejected() {
        let mut form = FormState::new();
        form.name = "Test".into();
        form.set_strategy_count(DilemmaKind::TragedyCommons, "greedy", "1");
        assert_eq!(form.validate(), Err(FormError::TooFewAgents { total: 1 }));
    }

    #[test]
    fn two_strategies_summing_to_two_are_accepted() {
        let mut form = FormState::new();
        form.name = "Test".into();
        form.set_strategy_count(DilemmaKind::TragedyCommons, "greedy", "1");
        form.set_strategy_count(DilemmaKind::TragedyCommons, "sustainable", "1");
        let cfg = form.submit().unwrap();
        assert_eq!(cfg.total_agents(), 2);
        let names: Vec<&str> = cfg.strategies.keys().map(String::as_str).collect();
        assert_eq!(names, ["sustainable", "greedy"]);
        assert_eq!(cfg.rounds, 50);
        assert_eq!(cfg.parameters, DilemmaParameters::Commons(CommonsParams::default()));
    }

    #[test]
    fn huge_counts_sum_without_wrapping() {
        let mut form = FormState::new();
        form.name = "Big".into();
        form.set_strategy_count(DilemmaKind::TragedyCommons, "greedy", "4294967295");
        form.set_strategy_count(DilemmaKind::TragedyCommons, "sustainable", "1");
        assert_eq!(form.total_agents(DilemmaKind::TragedyCommons), 4_294_967_296);
        assert_eq!(form.validate(), Ok(()));
    }

    #[test]
    fn totals_are_per_panel_and_lenient() {
        let mut form = FormState::new();
        form.set_strategy_count(DilemmaKind::FreeRider, "contributor", "4 agents");
        form.set_strategy_count(DilemmaKind::FreeRider, "free_rider", "lots");
        form.set_strategy_count(DilemmaKind::FreeRider, "random", "-3");
        assert_eq!(form.total_agents(DilemmaKind::FreeRider), 4);
        assert_eq!(form.total_agents(DilemmaKind::TragedyCommons), 0);
    }

    #[test]
    fn only_the_selected_panel_is_validated() {
        let mut form = FormState::new();
        form.name = "x".into();
        form.set_strategy_count(DilemmaKind::PublicGoods, "full", "5");
        assert!(form.validate().is_err());
        form.kind = DilemmaKind::PublicGoods;
        assert!(form.validate().is_ok());
    }

    #[test]
    fn unparsable_parameters_are_reported() {
        let mut form = FormState::new();
        form.name = "x".into();
        form.kind = DilemmaKind::PublicGoods;
        form.set_strategy_count(DilemmaKind::PublicGoods, "zero", "2");
        form.set_parameter(DilemmaKind::PublicGoods, "multiplier", "much");
        assert_eq!(
            form.submit(),
            Err(FormError::InvalidField {
                field: "multiplier".into(),
                value: "much".into()
            })
        );

        form.set_parameter(DilemmaKind::PublicGoods, "multiplier", "2.5x");
        form.set_parameter(DilemmaKind::PublicGoods, "distribution", "proportional");
        let cfg = form.submit().unwrap();
        assert_eq!(
            cfg.parameters,
            DilemmaParameters::PublicGoods(PublicGoodsParams {
                endowment: 20,
                multiplier: 2.5,
                distribution: Distribution::Proportional,
            })
        );
    }

    #[test]
    fn zero_rounds_are_invalid() {
        let mut form = FormState::new();
        form.name = "x".into();
        form.rounds = "0".into();
        form.set_strategy_count(DilemmaKind::TragedyCommons, "greedy", "2");
        assert!(matches!(form.submit(), Err(FormError::InvalidField { field, .. }) if field == "rounds"));
    }

    #[test]
    fn name_and_description_are_trimmed() {
        let mut form = FormState::new();
        form.name = "  Village  ".into();
        form.description = " shared pasture ".into();
        form.set_strategy_count(DilemmaKind::TragedyCommons, "adaptive", "3");
        let cfg = form.submit().unwrap();
        assert_eq!(cfg.name, "Village");
        assert_eq!(cfg.description, "shared pasture");
    }

    #[test]
    fn from_config_round_trips_through_collect() {
        let cfg = SimulationConfig::with_defaults(DilemmaKind::FreeRider, "again");
        assert_eq!(FormState::from_config(&cfg).submit().unwrap(), cfg);
    }

    #[test]
    fn lenient_number_parsing() {
        assert_eq!(parse_int("  42px"), Some(42));
        assert_eq!(parse_int("-7"), Some(-7));
        assert_eq!(parse_int(""), None);
        assert_eq!(parse_float("0.25e1z"), Some(2.5));
        assert_eq!(parse_float(".5"), Some(0.5));
        assert_eq!(parse_float("e"), None);
    }

    #[test]
    fn simulate_body_is_one_config_field() {
        let cfg = SimulationConfig::with_defaults(DilemmaKind::PublicGoods, "pg");
        let fields = simulate_form_fields(&cfg).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].0, "config");
        assert_eq!(SimulationConfig::from_json(&fields[0].1).unwrap(), cfg);
    }
}
