//! Threshold rules that flag unsuitable planting conditions.

use serde::{Deserialize, Serialize};

use crate::feature::FeatureVector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Danger,
    Warning,
    Success,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertMemo {
    pub level: AlertLevel,
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub anomalies: Vec<String>,
    pub memo: AlertMemo,
}

pub fn check_for_anomalies(raw: &FeatureVector) -> Vec<String> {
    let mut anomalies = Vec::new();
    if raw.ndvi < 0.2 {
        anomalies.push(
            "Very low NDVI detected. Field may be bare or facing severe stress.".to_string(),
        );
    }
    if raw.soil_ph < 5.0 || raw.soil_ph > 7.5 {
        anomalies.push(format!(
            "Soil pH ({:.1}) is outside the optimal 5.5-7.0 range.",
            raw.soil_ph
        ));
    }
    if raw.tmin < 15.0 || raw.tmax > 40.0 {
        anomalies.push("Extreme temperature forecast detected.".to_string());
    }
    anomalies
}

pub fn assess(raw: &FeatureVector) -> Assessment {
    let anomalies = check_for_anomalies(raw);
    let memo = if !anomalies.is_empty() {
        AlertMemo {
            level: AlertLevel::Danger,
            title: "NOT SUITABLE FOR PLANTING".to_string(),
            message: format!(
                "Critical issues detected: {}. Planting is high risk.",
                anomalies.join("; ")
            ),
        }
    } else if raw.soil_ph < 5.5 {
        AlertMemo {
            level: AlertLevel::Warning,
            title: "CONDITIONS SUB-OPTIMAL".to_string(),
            message: "Soil pH is low. Yield may be reduced without treatment.".to_string(),
        }
    } else {
        AlertMemo {
            level: AlertLevel::Success,
            title: "CONDITIONS SUITABLE".to_string(),
            message: "Environmental factors look good for paddy cultivation.".to_string(),
        }
    };
    Assessment { anomalies, memo }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn healthy() -> FeatureVector {
        FeatureVector {
            ndvi: 0.7,
            tmin: 24.0,
            tmax: 32.0,
            rain: 6.0,
            srad: 5.0,
            soil_ph: 6.2,
            soil_cec: 18.0,
            soil_oc: 2.0,
        }
    }

    #[test]
    fn healthy_field_is_suitable() {
        let a = assess(&healthy());
        assert!(a.anomalies.is_empty());
        assert_eq!(a.memo.level, AlertLevel::Success);
    }

    #[test]
    fn slightly_acidic_soil_is_a_warning() {
        let mut raw = healthy();
        raw.soil_ph = 5.2;
        let a = assess(&raw);
        assert!(a.anomalies.is_empty());
        assert_eq!(a.memo.level, AlertLevel::Warning);
    }

    #[test]
    fn every_rule_fires_in_order() {
        let raw = FeatureVector {
            ndvi: 0.1,
            soil_ph: 4.6,
            tmin: 14.0,
            ..healthy()
        };
        let a = assess(&raw);
        assert_eq!(a.anomalies.len(), 3);
        assert!(a.anomalies[0].starts_with("Very low NDVI"));
        assert_eq!(
            a.anomalies[1],
            "Soil pH (4.6) is outside the optimal 5.5-7.0 range."
        );
        assert_eq!(a.anomalies[2], "Extreme temperature forecast detected.");
        assert_eq!(a.memo.level, AlertLevel::Danger);
        assert!(a.memo.message.contains("; Soil pH (4.6)"));
    }

    #[test]
    fn hot_days_alone_are_extreme() {
        let raw = FeatureVector {
            tmax: 41.5,
            ..healthy()
        };
        assert_eq!(check_for_anomalies(&raw).len(), 1);
    }
}
