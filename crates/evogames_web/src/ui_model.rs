//! UI models and metadata that should be available on both wasm and native.
//!
//! Keeping these out of the wasm-only `web` module allows us to unit-test the
//! control states, element ids and stored preferences on the host.

use evogames::model::DilemmaKind;
use evogames::notice::Notice;
use evogames::playback::{PlaybackState, DEFAULT_INTERVAL_MS, MAX_INTERVAL_MS, MIN_INTERVAL_MS};
use evogames::present::insights::Tone;
use evogames::present::table::Indicator;

pub const SPEED_STORAGE_KEY: &str = "evogames.playback_interval_ms.v1";

/// `<script type="application/json">` blocks the server embeds in the results page.
pub const RESULTS_SCRIPT_ID: &str = "simulation-results";
pub const CONFIG_SCRIPT_ID: &str = "simulation-config";

/// Canvas ids, in [`evogames::present::Frame::charts`] order.
pub const CHART_CANVAS_IDS: [&str; 6] = [
    "scoreChart",
    "strategyChart",
    "cooperationChart",
    "cooperationRateChart",
    "dilemmaChart1",
    "dilemmaChart2",
];

/// Speeds offered by the playback selector, in milliseconds per round.
pub const SPEED_OPTIONS: [(u32, &str); 5] = [
    (1000, "Slow"),
    (DEFAULT_INTERVAL_MS, "Normal"),
    (250, "Fast"),
    (100, "Faster"),
    (25, "Fastest"),
];

/// Stored playback interval, or the default when missing or unreadable.
pub fn parse_speed(raw: Option<&str>) -> u32 {
    raw.and_then(|v| v.trim().parse::<u32>().ok())
        .map(|ms| ms.clamp(MIN_INTERVAL_MS, MAX_INTERVAL_MS))
        .unwrap_or(DEFAULT_INTERVAL_MS)
}

/// Which playback buttons are enabled for a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub play: bool,
    pub pause: bool,
    pub step: bool,
    pub stop: bool,
    pub pause_label: &'static str,
}

impl Controls {
    pub fn for_state(state: PlaybackState, cursor: usize, total: usize) -> Self {
        let remaining = cursor < total;
        match state {
            PlaybackState::Idle => Self {
                play: false,
                pause: false,
                step: false,
                stop: false,
                pause_label: "Pause",
            },
            PlaybackState::Ready => Self {
                play: total > 0,
                pause: false,
                step: remaining,
                stop: remaining,
                pause_label: "Pause",
            },
            PlaybackState::Playing => Self {
                play: false,
                pause: true,
                step: false,
                stop: true,
                pause_label: "Pause",
            },
            PlaybackState::Paused => Self {
                play: true,
                pause: true,
                step: remaining,
                stop: true,
                pause_label: "Resume",
            },
        }
    }
}

/// Short prefix used in input ids of a kind's panel.
pub fn kind_prefix(kind: DilemmaKind) -> &'static str {
    match kind {
        DilemmaKind::TragedyCommons => "tc",
        DilemmaKind::FreeRider => "fr",
        DilemmaKind::PublicGoods => "pg",
    }
}

/// `tc-greedy-count`, `fr-free-rider-count`, ...
pub fn strategy_input_id(kind: DilemmaKind, strategy: &str) -> String {
    format!("{}-{}-count", kind_prefix(kind), strategy.replace('_', "-"))
}

/// `tc-resource-size`, `pg-distribution`, ...
pub fn parameter_input_id(kind: DilemmaKind, field: &str) -> String {
    format!("{}-{}", kind_prefix(kind), field.replace('_', "-"))
}

pub fn parameter_label(field: &str) -> &'static str {
    match field {
        "resource_size" => "Resource Size",
        "regeneration_rate" => "Regeneration Rate",
        "harvest_limit" => "Harvest Limit",
        "project_cost" => "Project Cost",
        "benefit_multiplier" => "Benefit Multiplier",
        "threshold" => "Threshold (%)",
        "endowment" => "Endowment",
        "multiplier" => "Multiplier",
        "distribution" => "Distribution",
        _ => "Parameter",
    }
}

/// Step attribute for a numeric parameter input.
pub fn parameter_step(field: &str) -> &'static str {
    match field {
        "regeneration_rate" | "benefit_multiplier" | "multiplier" => "0.1",
        _ => "1",
    }
}

pub fn tone_class(tone: Tone) -> &'static str {
    match tone {
        Tone::Success => "border-success",
        Tone::Danger => "border-danger",
        Tone::Warning => "border-warning",
        Tone::Info => "border-info",
        Tone::Primary => "border-primary",
    }
}

pub fn indicator_class(indicator: Option<Indicator>) -> &'static str {
    match indicator {
        Some(Indicator::Positive) => "text-success",
        Some(Indicator::Neutral) => "text-warning",
        Some(Indicator::Negative) => "text-danger",
        None => "text-muted",
    }
}

/// Row highlight for the strategy table.
pub fn row_class(top: bool, bottom: bool) -> &'static str {
    if top {
        "table-success"
    } else if bottom {
        "table-danger"
    } else {
        ""
    }
}

/// Toast for the config save reply body. Anything but `{"success": true}`
/// is a failure; the backend's `error` text wins when present.
pub fn save_notice(body: &str) -> Notice {
    let Ok(reply) = serde_json::from_str::<serde_json::Value>(body) else {
        return Notice::save_failed();
    };
    match reply.get("success").and_then(serde_json::Value::as_bool) {
        Some(true) => Notice::saved(),
        Some(false) => Notice::rejected(reply.get("error").and_then(serde_json::Value::as_str)),
        None => Notice::save_failed(),
    }
}
