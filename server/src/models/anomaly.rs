//! Request / response shapes for the evaluation endpoints

use std::collections::BTreeMap;

use exhibit_guard_core::{
    AnomalyVerdict, Detection, ExhibitId, PolicyConfig, SensorKind, VisionRuleSet, VisionVerdict,
    WindowStats,
};
use serde::{Deserialize, Serialize};

/// Ad-hoc check: a reading plus optional inline thresholds
#[derive(Debug, Deserialize)]
pub struct AnomalyCheckRequest {
    /// Kept untyped so malformed fields get field-level errors
    pub sensor_data: serde_json::Value,
    pub exhibit_id: Option<ExhibitId>,
    pub threshold_config: Option<PolicyConfig>,
}

#[derive(Debug, Serialize)]
pub struct VerdictResponse {
    #[serde(flatten)]
    pub verdict: AnomalyVerdict,
    pub affected_sensors: Vec<SensorKind>,
}

impl From<AnomalyVerdict> for VerdictResponse {
    fn from(verdict: AnomalyVerdict) -> Self {
        let affected_sensors = verdict.affected_sensors();
        Self {
            verdict,
            affected_sensors,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub exhibit_id: ExhibitId,
    pub sensors: BTreeMap<SensorKind, WindowStats>,
}

#[derive(Debug, Deserialize)]
pub struct VisionDecideRequest {
    pub exhibit_id: ExhibitId,
    #[serde(default)]
    pub detections: Vec<Detection>,
    /// Server default rules when omitted
    pub rules: Option<VisionRuleSet>,
}

#[derive(Debug, Deserialize)]
pub struct FrameQuery {
    pub exhibit_id: ExhibitId,
}

#[derive(Debug, Serialize)]
pub struct VisionResponse {
    pub vision: VisionVerdict,
    pub verdict: VerdictResponse,
}

impl From<(VisionVerdict, AnomalyVerdict)> for VisionResponse {
    fn from((vision, verdict): (VisionVerdict, AnomalyVerdict)) -> Self {
        Self {
            vision,
            verdict: verdict.into(),
        }
    }
}
