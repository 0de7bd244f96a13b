//! Data freshness: how old each input snapshot is at aggregation time

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Age of each source in minutes. A missing source is infinitely old.
///
/// On the wire an infinite age is written as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceAges {
    #[serde(with = "age_or_null")]
    pub market: f64,
    #[serde(with = "age_or_null")]
    pub investor: f64,
    #[serde(with = "age_or_null")]
    pub sector: f64,
    #[serde(with = "age_or_null")]
    pub rankings: f64,
}

impl SourceAges {
    pub fn max(&self) -> f64 {
        [self.market, self.investor, self.sector, self.rankings]
            .into_iter()
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataFreshness {
    pub is_fresh: bool,
    /// Oldest source age, minutes
    #[serde(with = "age_or_null")]
    pub max_age_minutes: f64,
    pub sources: SourceAges,
}

/// Minutes between `timestamp` and `now`; +∞ when there is no timestamp.
/// Timestamps in the future count as age 0.
pub fn age_minutes(timestamp: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    match timestamp {
        Some(ts) => ((now - ts).num_milliseconds() as f64 / 60_000.0).max(0.0),
        None => f64::INFINITY,
    }
}

pub fn compute_freshness(
    market: Option<DateTime<Utc>>,
    investor: Option<DateTime<Utc>>,
    sector: Option<DateTime<Utc>>,
    rankings: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    max_age_minutes: f64,
) -> DataFreshness {
    let sources = SourceAges {
        market: age_minutes(market, now),
        investor: age_minutes(investor, now),
        sector: age_minutes(sector, now),
        rankings: age_minutes(rankings, now),
    };
    let max_age = sources.max();

    DataFreshness {
        is_fresh: max_age <= max_age_minutes,
        max_age_minutes: max_age,
        sources,
    }
}

/// Ages as `Option<f64>` on the wire: non-finite ⇄ `null`
mod age_or_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(age: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if age.is_finite() {
            serializer.serialize_f64(*age)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_all_fresh() {
        let now = Utc::now();
        let f = compute_freshness(
            Some(now - Duration::minutes(5)),
            Some(now - Duration::minutes(10)),
            Some(now),
            Some(now - Duration::minutes(30)),
            now,
            30.0,
        );
        assert!(f.is_fresh);
        assert_eq!(f.max_age_minutes, 30.0);
        assert_eq!(f.sources.market, 5.0);
    }

    #[test]
    fn test_missing_source_is_stale() {
        let now = Utc::now();
        let f = compute_freshness(Some(now), None, Some(now), Some(now), now, 30.0);
        assert!(!f.is_fresh);
        assert!(f.sources.investor.is_infinite());
        assert!(f.max_age_minutes.is_infinite());
    }

    #[test]
    fn test_old_source_is_stale() {
        let now = Utc::now();
        let old = Some(now - Duration::minutes(45));
        let f = compute_freshness(old, Some(now), Some(now), Some(now), now, 30.0);
        assert!(!f.is_fresh);
        assert_eq!(f.max_age_minutes, 45.0);
    }

    #[test]
    fn test_missing_age_serializes_as_null() {
        let now = Utc::now();
        let f = compute_freshness(Some(now - Duration::minutes(5)), None, None, None, now, 30.0);

        let json = serde_json::to_value(&f).unwrap();
        assert_eq!(json["sources"]["market"], 5.0);
        assert!(json["sources"]["investor"].is_null());
        assert!(json["max_age_minutes"].is_null());

        let back: DataFreshness = serde_json::from_value(json).unwrap();
        assert_eq!(back.sources.market, 5.0);
        assert!(back.sources.rankings.is_infinite());
        assert!(back.max_age_minutes.is_infinite());
        assert!(!back.is_fresh);
    }

    #[test]
    fn test_future_timestamp() {
        let now = Utc::now();
        assert_eq!(age_minutes(Some(now + Duration::minutes(3)), now), 0.0);
    }
}
