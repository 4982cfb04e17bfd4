//! Color assignment for rendered charts. Severity-like attributes get a
//! fixed semantic mapping; everything else cycles through a shared palette
//! so a label keeps its color only within a single chart.

pub const NO_DATA_LABEL: &str = "Aucune donnée";
pub const ERROR_COLOR: &str = "#ff6b6b";
pub const FALLBACK_COLOR: &str = "#3498db";

const CYCLE_PALETTE: [&str; 8] = [
    "#3498db", "#e74c3c", "#2ecc71", "#f39c12", "#9b59b6", "#1abc9c", "#e67e22", "#34495e",
];

/// Which fixed color mapping (if any) applies to a set of labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorDomain {
    Priority,
    Criticality,
    TestState,
    Open,
}

fn severity_color(label: &str) -> &'static str {
    match label {
        "High" => "#e74c3c",
        "Medium" => "#f39c12",
        "Low" => "#27ae60",
        _ => FALLBACK_COLOR,
    }
}

fn test_state_color(label: &str) -> &'static str {
    match label {
        "OK" => "#27ae60",
        "KO" => "#e74c3c",
        "KO JDD" => "#c0392b",
        "In Progress" => "#f39c12",
        "Not Started" => "#95a5a6",
        "Blocked" => "#8e44ad",
        "N/A" => "#34495e",
        _ => FALLBACK_COLOR,
    }
}

/// One color per label, in label order.
pub fn colors_for(domain: ColorDomain, labels: &[String]) -> Vec<String> {
    match domain {
        ColorDomain::Priority | ColorDomain::Criticality => labels
            .iter()
            .map(|l| severity_color(l).to_string())
            .collect(),
        ColorDomain::TestState => labels
            .iter()
            .map(|l| test_state_color(l).to_string())
            .collect(),
        ColorDomain::Open => labels
            .iter()
            .enumerate()
            .map(|(i, _)| CYCLE_PALETTE[i % CYCLE_PALETTE.len()].to_string())
            .collect(),
    }
}
