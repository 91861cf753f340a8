// SPDX-License-Identifier: GPL-3.0-only

//! XDG desktop portal camera permission request
//!
//! Talks to `org.freedesktop.portal.Camera` on the session bus. The portal
//! may show a system dialog, so [`request_access`] resolves only after the
//! user (or a remembered choice) has answered.

use crate::errors::CameraError;
use futures::StreamExt;
use std::collections::HashMap;
use tracing::{debug, info, warn};
use zbus::zvariant::{OwnedObjectPath, OwnedValue, Value};

const PORTAL_DESTINATION: &str = "org.freedesktop.portal.Desktop";
const PORTAL_PATH: &str = "/org/freedesktop/portal/desktop";
const CAMERA_INTERFACE: &str = "org.freedesktop.portal.Camera";
const REQUEST_INTERFACE: &str = "org.freedesktop.portal.Request";

/// Portal response code for a granted request
const RESPONSE_SUCCESS: u32 = 0;

/// Ask the camera portal for access to the camera.
///
/// Returns `Ok(())` when access is granted. A refused dialog maps to
/// [`CameraError::AccessDenied`]; a missing or broken portal maps to
/// [`CameraError::PortalUnavailable`].
pub async fn request_access() -> Result<(), CameraError> {
    let connection = zbus::Connection::session().await?;

    let camera_proxy = zbus::Proxy::new(
        &connection,
        PORTAL_DESTINATION,
        PORTAL_PATH,
        CAMERA_INTERFACE,
    )
    .await?;

    // The portal replies through a Request object whose path is derived from
    // our unique bus name and the handle token, so the Response signal can be
    // subscribed to before AccessCamera is called.
    let token = format!("filtercam_{}", std::process::id());
    let expected_path = expected_request_path(&connection, &token)?;

    let request_proxy = zbus::Proxy::new(
        &connection,
        PORTAL_DESTINATION,
        expected_path.as_str(),
        REQUEST_INTERFACE,
    )
    .await?;
    let mut responses = request_proxy.receive_signal("Response").await?;

    let mut options: HashMap<&str, Value<'_>> = HashMap::new();
    options.insert("handle_token", Value::from(token.as_str()));

    debug!(path = %expected_path, "Calling AccessCamera");
    let handle: OwnedObjectPath = camera_proxy
        .call("AccessCamera", &(options,))
        .await
        .map_err(|e| CameraError::PortalUnavailable(e.to_string()))?;

    // Older portal backends ignore the handle token and return their own
    // request path. Re-subscribe there if it differs from the prediction.
    if handle.as_str() != expected_path {
        warn!(
            expected = %expected_path,
            actual = %handle,
            "Portal returned an unexpected request path"
        );
        let fallback_proxy = zbus::Proxy::new(
            &connection,
            PORTAL_DESTINATION,
            handle.as_str(),
            REQUEST_INTERFACE,
        )
        .await?;
        responses = fallback_proxy.receive_signal("Response").await?;
    }

    let message = responses.next().await.ok_or_else(|| {
        CameraError::PortalUnavailable("Response signal stream closed".to_string())
    })?;

    let (response, _results): (u32, HashMap<String, OwnedValue>) = message
        .body()
        .deserialize()
        .map_err(|e| CameraError::PortalUnavailable(e.to_string()))?;

    if response == RESPONSE_SUCCESS {
        info!("Camera access granted");
        Ok(())
    } else {
        info!(response, "Camera access refused");
        Err(CameraError::AccessDenied)
    }
}

/// Predict the request object path for our connection and handle token.
///
/// Per the portal spec this is
/// `/org/freedesktop/portal/desktop/request/SENDER/TOKEN` where SENDER is the
/// caller's unique name with the leading ':' removed and '.' replaced by '_'.
fn expected_request_path(
    connection: &zbus::Connection,
    token: &str,
) -> Result<String, CameraError> {
    let unique_name = connection.unique_name().ok_or_else(|| {
        CameraError::PortalUnavailable("Connection has no unique name".to_string())
    })?;
    let sender = unique_name.as_str().trim_start_matches(':').replace('.', "_");
    Ok(format!(
        "/org/freedesktop/portal/desktop/request/{}/{}",
        sender, token
    ))
}
