//! Text formatting shared by the terminal and browser renderers.
//!
//! Float formatting does **not** go through `format!`: Rust's float-to-decimal
//! path has panicked on some wasm toolchain/browser combinations. Values are
//! scaled and rounded into an `i64` and the integer parts are printed instead.

pub fn fmt_fixed(v: f64, decimals: usize) -> String {
    fmt_fixed_inner(v, decimals, false)
}

pub fn fmt_signed_fixed(v: f64, decimals: usize) -> String {
    fmt_fixed_inner(v, decimals, true)
}

/// `0.4567` → `45.7%`.
pub fn fmt_percent(ratio: f64, decimals: usize) -> String {
    let mut out = fmt_fixed(ratio * 100.0, decimals);
    out.push('%');
    out
}

fn fmt_fixed_inner(v: f64, decimals: usize, force_sign: bool) -> String {
    if !v.is_finite() {
        return if v.is_nan() {
            "NaN".to_string()
        } else if v.is_sign_positive() {
            "Inf".to_string()
        } else {
            "-Inf".to_string()
        };
    }

    let decimals = decimals.min(9);
    let scale_i64 = 10_i64.pow(decimals as u32);
    let scaled = (v * scale_i64 as f64).round();
    if !scaled.is_finite() || scaled.abs() > (i64::MAX as f64) {
        return if v.is_sign_negative() {
            "-Inf".to_string()
        } else {
            "Inf".to_string()
        };
    }

    let scaled_i = scaled as i64;
    let negative = scaled_i < 0;
    let abs_i = scaled_i.abs();
    let int_part = abs_i / scale_i64;
    let frac_part = abs_i % scale_i64;

    let mut out = String::new();
    if negative {
        out.push('-');
    } else if force_sign {
        out.push('+');
    }
    out.push_str(&int_part.to_string());

    if decimals > 0 {
        out.push('.');
        let frac_str = frac_part.to_string();
        for _ in 0..decimals.saturating_sub(frac_str.len()) {
            out.push('0');
        }
        out.push_str(&frac_str);
    }
    out
}

/// `tit_for_tat` → `Tit For Tat`.
pub fn strategy_display_name(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// `free_rider` → `FREE RIDER`, used on bar-chart axes.
pub fn strategy_axis_label(name: &str) -> String {
    name.replace('_', " ").to_uppercase()
}

/// `tit_for_tat_3` → `Tit For Tat 3`.
pub fn agent_display_name(agent_id: &str) -> String {
    match agent_id.rsplit_once('_') {
        Some((strategy, number)) => format!("{} {}", strategy_display_name(strategy), number),
        None => strategy_display_name(agent_id),
    }
}
