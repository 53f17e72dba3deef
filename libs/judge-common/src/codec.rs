/// Payload codec
///
/// A grading job travels as a single command-line argument: standard base64
/// of a JSON-encoded `ProblemSpec`. Decoding also validates the parts of the
/// schema that cannot be expressed in the type, so later stages may index the
/// expected-output sequences without bounds surprises.
use crate::types::ProblemSpec;
use base64::{engine::general_purpose, Engine as _};

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("payload does not match the problem schema: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid problem: {0}")]
    Schema(String),
}

/// Decode a payload into a validated `ProblemSpec`
pub fn decode(payload: &str) -> Result<ProblemSpec, DecodeError> {
    let bytes = general_purpose::STANDARD.decode(payload.trim())?;
    let spec: ProblemSpec = serde_json::from_slice(&bytes)?;
    validate(&spec)?;
    Ok(spec)
}

/// Encode a `ProblemSpec` into its payload form
pub fn encode(spec: &ProblemSpec) -> Result<String, DecodeError> {
    let json = serde_json::to_vec(spec)?;
    Ok(general_purpose::STANDARD.encode(json))
}

/// Expected stdout/stderr, when present, must cover every test case
pub fn validate(spec: &ProblemSpec) -> Result<(), DecodeError> {
    let n = spec.test_count();

    let streams = [
        ("O", spec.expected_stdout.as_ref()),
        ("E", spec.expected_stderr.as_ref()),
    ];

    for (name, expected) in streams {
        if let Some(expected) = expected {
            if expected.len() < n {
                return Err(DecodeError::Schema(format!(
                    "{} has {} entries but there are {} test cases",
                    name,
                    expected.len(),
                    n
                )));
            }
        }
    }

    Ok(())
}
