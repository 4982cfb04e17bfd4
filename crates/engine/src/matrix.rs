use chartbot_common::error::ChartbotResult;
use chartbot_db::testcases::repositories::TestCaseRepository;

use crate::payload::HeatmapPayload;

pub const PRIORITY_LEVELS: [&str; 3] = ["High", "Medium", "Low"];

fn level_index(label: &str) -> Option<usize> {
    PRIORITY_LEVELS.iter().position(|l| *l == label)
}

/// Build the dense 3×3 priority × criticality grid: criticality on the x
/// axis, priority on the y axis, `z[priority][criticality]`. Records with
/// levels outside the three known ones are left out of the grid. An empty
/// table still yields a full grid of zeros, flagged `no_data`.
pub async fn build_matrix<R: TestCaseRepository>(repo: &R) -> ChartbotResult<HeatmapPayload> {
    let levels: Vec<String> = PRIORITY_LEVELS.iter().map(|l| l.to_string()).collect();
    let mut z = vec![vec![0i64; PRIORITY_LEVELS.len()]; PRIORITY_LEVELS.len()];

    let no_data = repo.count_all().await? == 0;
    if !no_data {
        for cell in repo.matrix_counts().await? {
            if let (Some(y), Some(x)) = (level_index(&cell.prio), level_index(&cell.criticality)) {
                z[y][x] = cell.count;
            }
        }
    }

    Ok(HeatmapPayload {
        x: levels.clone(),
        y: levels,
        z,
        no_data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_indices_follow_severity_order() {
        assert_eq!(level_index("High"), Some(0));
        assert_eq!(level_index("Medium"), Some(1));
        assert_eq!(level_index("Low"), Some(2));
        assert_eq!(level_index("Urgent"), None);
    }
}
