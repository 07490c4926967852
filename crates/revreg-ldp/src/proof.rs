use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::LdpError;

/// What a proof is meant to establish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProofPurpose {
    AssertionMethod,
    Authentication,
}

/// A linked-data proof as embedded under a document's `proof` key.
///
/// Without `jws` it is the proof options object that gets hashed into the
/// verify data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedDataProof {
    #[serde(rename = "type")]
    pub proof_type: String,
    /// RFC 3339 timestamp, second precision.
    pub created: String,
    pub verification_method: String,
    pub proof_purpose: ProofPurpose,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jws: Option<String>,
}

impl LinkedDataProof {
    /// This proof without its signature.
    pub fn options(&self) -> Self {
        Self {
            jws: None,
            ..self.clone()
        }
    }
}

/// Protected header of a detached JWS with unencoded payload (RFC 7797).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwsHeader {
    pub alg: String,
    pub b64: bool,
    pub crit: Vec<String>,
}

impl JwsHeader {
    pub fn unencoded(alg: &str) -> Self {
        Self {
            alg: alg.to_string(),
            b64: false,
            crit: vec!["b64".to_string()],
        }
    }

    pub fn encode(&self) -> Result<String, LdpError> {
        Ok(URL_SAFE_NO_PAD.encode(serde_json::to_vec(self)?))
    }
}

/// JWS signing input: encoded header, `.`, raw payload bytes.
pub fn signing_input(header_b64: &str, payload: &[u8]) -> Vec<u8> {
    [header_b64.as_bytes(), b".", payload].concat()
}

/// Assemble `header..signature`.
pub fn detached_jws(header_b64: &str, signature: &[u8]) -> String {
    format!("{}..{}", header_b64, URL_SAFE_NO_PAD.encode(signature))
}

/// Split a detached JWS into its encoded header, decoded header, and
/// signature bytes.
pub fn split_detached_jws(jws: &str) -> Result<(&str, JwsHeader, Vec<u8>), LdpError> {
    let mut parts = jws.split('.');
    let (header_b64, payload, signature_b64) = match (parts.next(), parts.next(), parts.next()) {
        (Some(h), Some(p), Some(s)) if parts.next().is_none() => (h, p, s),
        _ => return Err(LdpError::InvalidJws("expected three segments".into())),
    };
    if !payload.is_empty() {
        return Err(LdpError::InvalidJws("payload must be detached".into()));
    }

    let header_bytes = URL_SAFE_NO_PAD
        .decode(header_b64)
        .map_err(|e| LdpError::InvalidJws(format!("header: {}", e)))?;
    let header: JwsHeader = serde_json::from_slice(&header_bytes)?;
    let signature = URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|e| LdpError::InvalidJws(format!("signature: {}", e)))?;
    Ok((header_b64, header, signature))
}
