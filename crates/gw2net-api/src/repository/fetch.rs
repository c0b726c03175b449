//! Send a request and decode the response envelope

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use gw2net_protocol::{ProtocolError, Request, Response, ServiceClient};

use crate::error::Result;

pub(crate) fn fetch<T: DeserializeOwned>(
    client: &dyn ServiceClient,
    request: &Request,
) -> Result<Response<T>> {
    let raw = client.send(request)?;
    let response = Response::decode(raw)?;
    log_outcome(request, &response);
    Ok(response)
}

/// Cancellation is checked here before the transport is involved, so a
/// cancelled call never reaches the network regardless of the transport.
pub(crate) async fn fetch_async<T: DeserializeOwned>(
    client: &dyn ServiceClient,
    request: &Request,
    cancel: &CancellationToken,
) -> Result<Response<T>> {
    if cancel.is_cancelled() {
        return Err(ProtocolError::Cancelled.into());
    }

    let raw = client.send_async(request, cancel).await?;
    let response = Response::decode(raw)?;
    log_outcome(request, &response);
    Ok(response)
}

fn log_outcome<T>(request: &Request, response: &Response<T>) {
    if response.is_not_found() {
        tracing::debug!(resource = request.resource(), "no content for request");
    } else {
        tracing::trace!(
            resource = request.resource(),
            status = response.status,
            result_count = response.metadata.result_count,
            "response decoded"
        );
    }
}
