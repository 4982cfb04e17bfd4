use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of a running chartbot service instance, served on `/info`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub instance_id: Uuid,
    pub started_at: DateTime<Utc>,
}

impl ServiceInfo {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            instance_id: Uuid::new_v4(),
            started_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_stamps_version_and_distinct_instance_ids() {
        let a = ServiceInfo::new("chartbot-api");
        let b = ServiceInfo::new("chartbot-api");
        assert_eq!(a.name, "chartbot-api");
        assert_eq!(a.version, env!("CARGO_PKG_VERSION"));
        assert_ne!(a.instance_id, b.instance_id);
        assert!(a.started_at <= Utc::now());
    }
}
