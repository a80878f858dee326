use chrono::Utc;
use serde::Serialize;

use crate::service::ServiceState;

pub const ENDPOINTS: [&str; 4] = ["/", "/health", "/detect", "/detect-json"];

/// `GET /` liveness summary.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub status: &'static str,
    pub model: String,
    pub device: &'static str,
    pub timestamp: String,
    pub endpoints: Vec<&'static str>,
}

impl StatusReport {
    pub fn from_state(state: &ServiceState) -> Self {
        Self {
            status: if state.model_loaded() { "online" } else { "degraded" },
            model: state.model_name.clone(),
            device: state.device.as_str(),
            timestamp: Utc::now().to_rfc3339(),
            endpoints: ENDPOINTS.to_vec(),
        }
    }
}

/// `GET /health` readiness detail.
#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub model_loaded: bool,
    pub device: &'static str,
    pub cuda_available: bool,
    pub timestamp: String,
    pub endpoints: Vec<&'static str>,
}

impl HealthReport {
    pub fn from_state(state: &ServiceState) -> Self {
        Self {
            status: if state.model_loaded() { "healthy" } else { "degraded" },
            model_loaded: state.model_loaded(),
            device: state.device.as_str(),
            cuda_available: state.cuda_available,
            timestamp: Utc::now().to_rfc3339(),
            endpoints: ENDPOINTS.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degraded_when_model_missing() {
        let state = ServiceState::without_detector("yolov8n".to_string());
        let health = HealthReport::from_state(&state);
        assert_eq!(health.status, "degraded");
        assert!(!health.model_loaded);
        assert!(!health.cuda_available);
        assert_eq!(health.endpoints, ENDPOINTS.to_vec());

        let status = StatusReport::from_state(&state);
        assert_eq!(status.status, "degraded");
        assert_eq!(status.model, "yolov8n");
    }
}
