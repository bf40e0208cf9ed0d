//! SigV4 request signing for the SageMaker runtime.

use aws_credential_types::Credentials;
use aws_sigv4::http_request::{SignableBody, SignableRequest, SigningSettings, sign};
use aws_sigv4::sign::v4;
use llm::{Error, Result};
use std::time::SystemTime;

const SERVICE: &str = "sagemaker";

/// Sign the request in place, adding the `authorization`, `x-amz-date`, and
/// (with session credentials) `x-amz-security-token` headers.
pub(crate) fn sign_request(
    request: &mut http::Request<Vec<u8>>,
    credentials: &Credentials,
    region: &str,
) -> Result<()> {
    let identity = credentials.clone().into();
    let params = v4::SigningParams::builder()
        .identity(&identity)
        .region(region)
        .name(SERVICE)
        .time(SystemTime::now())
        .settings(SigningSettings::default())
        .build()
        .map_err(|e| Error::Backend(format!("signing parameters: {e}")))?
        .into();

    let signable = SignableRequest::new(
        request.method().as_str(),
        request.uri().to_string(),
        request
            .headers()
            .iter()
            .map(|(name, value)| (name.as_str(), value.to_str().unwrap_or(""))),
        SignableBody::Bytes(request.body()),
    )
    .map_err(|e| Error::Backend(format!("signable request: {e}")))?;

    let (instructions, _signature) = sign(signable, &params)
        .map_err(|e| Error::Backend(format!("request signing: {e}")))?
        .into_parts();
    instructions.apply_to_request_http1x(request);
    Ok(())
}
