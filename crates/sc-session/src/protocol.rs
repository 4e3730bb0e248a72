use serde::{Deserialize, Serialize};

use sc_core::error::CoreError;
use sc_core::frame::FramePayload;
use sc_core::keypoint::KeypointSet;
use sc_core::metrics::{GaitMetrics, HistoryPoint};

use crate::session::GaitSession;

/// One client message, tagged by `type`.
///
/// Unknown types are accepted and acknowledged without touching the session.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    #[serde(alias = "gait_analysis")]
    Frame(FrameRequest),
    #[serde(other)]
    Other,
}

/// A frame submitted for analysis.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct FrameRequest {
    #[serde(flatten)]
    pub frame: FramePayload,
    /// Record samples but skip cadence for this frame.
    #[serde(default)]
    pub fast_mode: bool,
    /// Attach the recent history regardless of the periodic schedule.
    #[serde(default)]
    pub include_history: bool,
}

/// One server message, tagged by `status`. Exactly one per request.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response {
    Success {
        frame_count: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        frame_id: Option<u64>,
        gait_metrics: GaitMetrics,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        past_metrics: Option<Vec<HistoryPoint>>,
    },
    Received {
        message: String,
    },
    Error {
        message: String,
    },
}

impl Response {
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// JSON encoding without the trailing newline.
    #[must_use]
    pub fn to_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            log::error!("response encoding failed: {e}");
            r#"{"status":"error","message":"response encoding failed"}"#.to_string()
        })
    }
}

/// Decodes one request line and applies it to `session`.
///
/// `detect` turns a frame into keypoints; it is only called for frame
/// requests. Malformed input and rejected frames yield an error response and
/// leave the session as it was.
///
/// # Example
/// ```
/// use sc_core::config::GaitConfig;
/// use sc_core::keypoint::KeypointSet;
/// use sc_session::{GaitSession, Response, dispatch};
///
/// let mut session = GaitSession::new(1, &GaitConfig::default());
/// let reply = dispatch(&mut session, r#"{"type":"hello"}"#, |_| Ok(KeypointSet::empty()));
/// assert!(matches!(reply, Response::Received { .. }));
/// ```
pub fn dispatch<D>(session: &mut GaitSession, line: &str, detect: D) -> Response
where
    D: FnOnce(&FramePayload) -> Result<KeypointSet, CoreError>,
{
    let request: Request = match serde_json::from_str(line) {
        Ok(r) => r,
        Err(e) => {
            log::warn!("session {}: malformed request: {e}", session.id());
            return Response::error(format!("malformed request: {e}"));
        }
    };
    match request {
        Request::Frame(frame) => handle_frame(session, &frame, detect),
        Request::Other => Response::Received {
            message: "message received".to_string(),
        },
    }
}

/// Runs detection and the session update for one frame.
pub fn handle_frame<D>(session: &mut GaitSession, request: &FrameRequest, detect: D) -> Response
where
    D: FnOnce(&FramePayload) -> Result<KeypointSet, CoreError>,
{
    let keypoints = match detect(&request.frame) {
        Ok(k) => k,
        Err(e) => {
            log::warn!("session {}: frame rejected: {e}", session.id());
            return Response::error(format!("frame could not be processed: {e}"));
        }
    };

    match session.process_frame(&keypoints, request.fast_mode) {
        Ok(metrics) => {
            let past_metrics = (request.include_history || session.history_due())
                .then(|| session.history(session.history_len()));
            Response::Success {
                frame_count: metrics.frame_count,
                frame_id: request.frame.frame_id,
                gait_metrics: metrics,
                past_metrics,
            }
        }
        Err(e) => Response::error(format!("frame could not be processed: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use sc_core::config::GaitConfig;
    use sc_core::keypoint::{LEFT_ANKLE, Landmark, RIGHT_ANKLE};
    use sc_core::metrics::CadenceEstimate;

    use super::*;

    fn session() -> GaitSession {
        GaitSession::new(1, &GaitConfig::default())
    }

    fn from_landmarks(frame: &FramePayload) -> Result<KeypointSet, CoreError> {
        match &frame.landmarks {
            Some(lms) => KeypointSet::from_normalized(lms, frame.width, frame.height),
            None => Err(CoreError::UndecodableFrame("no landmarks".into())),
        }
    }

    fn walking_line(stride_px: f64) -> String {
        let mut lms = vec![Landmark::new(0.5, 0.5); 33];
        lms[LEFT_ANKLE] = Landmark::new(0.5, 0.9);
        lms[RIGHT_ANKLE] = Landmark::new(0.5 + stride_px / 1000.0, 0.9);
        let req = Request::Frame(FrameRequest {
            frame: FramePayload::with_landmarks(1000, 1000, lms),
            fast_mode: false,
            include_history: false,
        });
        serde_json::to_string(&req).unwrap_or_default()
    }

    #[test]
    fn frame_request_parses_with_defaults_and_extra_fields() {
        let line = r#"{"type":"gait_analysis","width":640,"height":480,
            "image":"data:image/jpeg;base64,AAAA","timestamp":17,"user_id":"x"}"#;
        let req: Request = serde_json::from_str(line).unwrap_or(Request::Other);
        let Request::Frame(frame) = req else {
            panic!("expected a frame request");
        };
        assert_eq!(frame.frame.width, 640);
        assert!(!frame.fast_mode);
        assert!(!frame.include_history);
        assert!(frame.frame.landmarks.is_none());
    }

    #[test]
    fn unknown_type_is_acknowledged() {
        let mut s = session();
        let reply = dispatch(&mut s, r#"{"type":"ping"}"#, from_landmarks);
        assert_eq!(
            reply,
            Response::Received {
                message: "message received".into()
            }
        );
        assert_eq!(s.frame_count(), 0);
    }

    #[test]
    fn malformed_json_is_an_error_and_session_survives() {
        let mut s = session();
        let reply = dispatch(&mut s, "{not json", from_landmarks);
        assert!(matches!(reply, Response::Error { .. }));
        assert_eq!(s.frame_count(), 0);

        let reply = dispatch(&mut s, &walking_line(30.0), from_landmarks);
        assert!(matches!(reply, Response::Success { frame_count: 1, .. }));
    }

    #[test]
    fn undecodable_frame_does_not_count() {
        let mut s = session();
        let line = r#"{"type":"frame","width":640,"height":480,"image":"garbage"}"#;
        let reply = dispatch(&mut s, line, from_landmarks);
        let Response::Error { message } = reply else {
            panic!("expected an error");
        };
        assert!(message.contains("undecodable"), "{message}");
        assert_eq!(s.frame_count(), 0);
    }

    #[test]
    fn success_reports_measurements_and_frame_id() {
        let mut s = session();
        let mut lms = vec![Landmark::new(0.5, 0.5); 33];
        lms[LEFT_ANKLE] = Landmark::new(0.40, 0.9);
        lms[RIGHT_ANKLE] = Landmark::new(0.46, 0.9);
        let mut frame = FramePayload::with_landmarks(1000, 1000, lms);
        frame.frame_id = Some(99);
        let line = serde_json::to_string(&Request::Frame(FrameRequest {
            frame,
            fast_mode: false,
            include_history: true,
        }))
        .unwrap_or_default();

        let reply = dispatch(&mut s, &line, from_landmarks);
        let Response::Success {
            frame_count,
            frame_id,
            gait_metrics,
            past_metrics,
        } = reply
        else {
            panic!("expected success");
        };
        assert_eq!(frame_count, 1);
        assert_eq!(frame_id, Some(99));
        assert_eq!(gait_metrics.stride_length, Some(-60));
        assert_eq!(gait_metrics.swing_length, Some(0));
        assert_eq!(gait_metrics.avg_stride, CadenceEstimate::Unknown);
        assert_eq!(past_metrics.map(|h| h.len()), Some(1));
    }

    #[test]
    fn missing_landmarks_yield_nulls() {
        let mut s = session();
        let line = r#"{"type":"frame","width":640,"height":480,"landmarks":[]}"#;
        let reply = dispatch(&mut s, line, from_landmarks);
        let json: serde_json::Value =
            serde_json::from_str(&reply.to_line()).unwrap_or_default();
        assert_eq!(json["status"], "success");
        assert!(json["gait_metrics"]["stride_length"].is_null());
        assert!(json["gait_metrics"]["avg_swing"].is_null());
        assert_eq!(json["frame_count"], 1);
    }

    #[test]
    fn history_is_attached_every_tenth_frame() {
        let mut s = session();
        let mut attached = Vec::new();
        for i in 0..20 {
            let reply = dispatch(&mut s, &walking_line(f64::from(i % 7) * 10.0), from_landmarks);
            if let Response::Success {
                frame_count,
                past_metrics: Some(history),
                ..
            } = reply
            {
                attached.push((frame_count, history.len()));
            }
        }
        assert_eq!(attached, vec![(10, 10), (20, 20)]);
    }

    #[test]
    fn response_encoding_has_no_nan() {
        let reply = Response::Success {
            frame_count: 3,
            frame_id: None,
            gait_metrics: GaitMetrics {
                avg_stride: CadenceEstimate::from_value(f64::NAN),
                ..GaitMetrics::default()
            },
            past_metrics: None,
        };
        let line = reply.to_line();
        assert!(!line.contains("NaN"));
        assert!(!line.contains("past_metrics"));
        assert!(line.contains(r#""status":"success""#));
    }
}
