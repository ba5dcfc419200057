//! Share payload: the session fields as JSON, optionally base64url for links.

use crate::errors::ShareError;
use crate::models::Session;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Schema version written into every payload.
pub const SHARE_VERSION: u32 = 1;

fn default_version() -> u32 {
    SHARE_VERSION
}

/// `{version, input, maxMask, expanded, locked, names}`.
///
/// Every field except `version` is optional when decoding; absent fields
/// leave the receiving session untouched.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SharePayload {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_mask: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub names: Option<BTreeMap<String, String>>,
}

impl SharePayload {
    pub fn from_session(session: &Session) -> Self {
        SharePayload {
            version: SHARE_VERSION,
            input: Some(session.input.clone()),
            max_mask: Some(session.view.max_depth),
            expanded: Some(session.view.expanded.iter().cloned().collect()),
            locked: Some(session.view.locked.iter().cloned().collect()),
            names: Some(session.view.names.clone()),
        }
    }

    /// Overwrite the fields of `session` that this payload carries.
    pub fn apply_to(self, session: &mut Session) {
        if let Some(input) = self.input.filter(|i| !i.is_empty()) {
            session.input = input;
        }
        if let Some(max_mask) = self.max_mask {
            session.view.max_depth = max_mask;
        }
        if let Some(expanded) = self.expanded {
            session.view.expanded = expanded.into_iter().collect();
        }
        if let Some(locked) = self.locked {
            session.view.locked = locked.into_iter().collect();
        }
        if let Some(names) = self.names {
            session.view.names = names;
        }
    }

    pub fn to_json(&self) -> Result<String, ShareError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, ShareError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse JSON; errors name the offending field path.
    pub fn from_json(json: &str) -> Result<Self, ShareError> {
        let de = &mut serde_json::Deserializer::from_str(json);
        let payload: SharePayload = serde_path_to_error::deserialize(de)?;
        if payload.version > SHARE_VERSION {
            return Err(ShareError::UnsupportedVersion(payload.version));
        }
        Ok(payload)
    }

    /// JSON encoded as unpadded base64url, ready for a query parameter.
    pub fn encode_link_param(&self) -> Result<String, ShareError> {
        Ok(URL_SAFE_NO_PAD.encode(self.to_json()?))
    }

    /// Decode a link parameter: base64url first, raw JSON as the fallback.
    pub fn decode_link_param(param: &str) -> Result<Self, ShareError> {
        let param = param.trim();
        let decoded = URL_SAFE_NO_PAD
            .decode(param.trim_end_matches('='))
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok());
        match decoded {
            Some(json) => SharePayload::from_json(&json),
            None => {
                log::debug!("share parameter is not base64url, trying raw JSON");
                SharePayload::from_json(param)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_session() -> Session {
        let mut session = Session {
            input: "10.20.0.0/16".to_string(),
            ..Default::default()
        };
        session.view.max_depth = 26;
        session.view.expand("10.20.0.0/16");
        session.view.set_name("10.20.4.0/24", "apps");
        session
    }

    #[test]
    fn test_json_shape() {
        let payload = SharePayload::from_session(&sample_session());
        let value: serde_json::Value = serde_json::from_str(&payload.to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "version": 1,
                "input": "10.20.0.0/16",
                "maxMask": 26,
                "expanded": ["10.20.0.0/16"],
                "locked": ["10.20.4.0/24"],
                "names": {"10.20.4.0/24": "apps"}
            })
        );
    }

    #[test]
    fn test_link_param_restores_session() {
        let session = sample_session();
        let param = SharePayload::from_session(&session)
            .encode_link_param()
            .unwrap();
        assert!(!param.contains('='));
        assert!(!param.contains('+'));
        assert!(!param.contains('/'));

        let mut restored = Session::default();
        SharePayload::decode_link_param(&param)
            .unwrap()
            .apply_to(&mut restored);
        assert_eq!(restored, session);
    }

    #[test]
    fn test_raw_json_fallback_and_partial_apply() {
        let payload = SharePayload::decode_link_param(r#"{"version":1,"maxMask":20}"#).unwrap();
        let mut session = sample_session();
        payload.apply_to(&mut session);
        assert_eq!(session.view.max_depth, 20);
        assert_eq!(session.input, "10.20.0.0/16");
        assert!(session.view.is_locked("10.20.4.0/24"));
    }

    #[test]
    fn test_error_names_field() {
        let err = SharePayload::from_json(r#"{"version":1,"maxMask":"wide"}"#).unwrap_err();
        match err {
            ShareError::Json { path, .. } => assert_eq!(path, "maxMask"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_future_version_rejected() {
        assert!(matches!(
            SharePayload::from_json(r#"{"version":2}"#),
            Err(ShareError::UnsupportedVersion(2))
        ));
    }
}
