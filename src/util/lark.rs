use std::path::{Path, PathBuf};

use reqwest::Client;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde_json::Value;
use tokio::fs;
use tracing::{error, info, instrument, warn};

use crate::configuration::Settings;
use crate::model::global_error::{NotificationError, UPLOAD_THROTTLED_CODE};

pub const TENANT_ACCESS_TOKEN_PATH: &str = "/open-apis/auth/v3/tenant_access_token/internal";
pub const IMAGE_UPLOAD_PATH: &str = "/open-apis/im/v1/images";

#[derive(Serialize)]
struct TenantAccessTokenRequest<'a> {
    app_id: &'a str,
    app_secret: &'a str,
}

/// POSTs `data` as JSON and returns the decoded response whatever its status.
pub async fn request_lark_api<T>(client: &Client, url: &str, data: &T) -> Result<Value, NotificationError>
where
    T: Serialize + ?Sized,
{
    info!(url, "lark api request");

    let res = client.post(url).json(data).send().await?;
    let status = res.status();
    let result: Value = serde_json::from_str(&res.text().await?)?;

    info!(status = status.as_u16(), response = %result, "lark api response");
    Ok(result)
}

/// Fetches a fresh tenant access token. A response without the token is
/// logged and yields `None` instead of failing.
#[instrument(skip_all)]
pub async fn fetch_tenant_access_token(
    client: &Client,
    settings: &Settings,
) -> Result<Option<String>, NotificationError> {
    let url = settings.endpoint(TENANT_ACCESS_TOKEN_PATH);
    let request = TenantAccessTokenRequest {
        app_id: &settings.app_id,
        app_secret: &settings.app_secret,
    };

    let result = request_lark_api(client, &url, &request).await?;
    let token = result
        .get("tenant_access_token")
        .and_then(Value::as_str)
        .map(str::to_owned);

    match &token {
        Some(_) => info!("tenant access token acquired"),
        None => warn!(response = %result, "no tenant_access_token in response, continuing without one"),
    }

    Ok(token)
}

/// Uploads every file in order and returns the image key of the last one.
/// Only the last response decides the outcome.
#[instrument(skip(client, settings, token, files), fields(files = files.len()))]
pub async fn upload_images(
    client: &Client,
    settings: &Settings,
    token: Option<&str>,
    report_name: &str,
    files: &[&[u8]],
) -> Result<String, NotificationError> {
    let url = settings.endpoint(IMAGE_UPLOAD_PATH);
    // one directory per call, deleted on drop
    let work_dir = tempfile::Builder::new()
        .prefix("lark-upload-")
        .tempdir_in(&settings.tmp_dir)?;
    let mut last = None;

    for (index, file) in files.iter().enumerate() {
        let img_path = attachment_path(work_dir.path(), report_name, index);
        info!(path = %img_path.display(), "img path");
        fs::write(&img_path, *file).await?;

        let file_name = img_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let part = Part::bytes(fs::read(&img_path).await?)
            .file_name(file_name)
            .mime_str("image/png")?;
        let form = Form::new()
            .text("image_type", "message")
            .part("image", part);

        let res = client
            .post(&url)
            .header(AUTHORIZATION, format!("Bearer {}", token.unwrap_or_default()))
            .multipart(form)
            .send()
            .await?;
        last = Some((res.status(), res.text().await?));
    }

    let (status, body) = last.ok_or(NotificationError::NothingToUpload)?;
    if !status.is_success() {
        error!(status = status.as_u16(), body = %body, "image upload request failed");
        return Err(NotificationError::Status { status, body });
    }

    let result: Value = serde_json::from_str(&body)?;
    info!(status = status.as_u16(), response = %result, "lark api response");

    match result.get("code").and_then(Value::as_i64) {
        Some(0) => result
            .pointer("/data/image_key")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or(NotificationError::UploadRejected { status, body }),
        Some(UPLOAD_THROTTLED_CODE) => {
            error!(body = %body, "upload image error");
            Err(NotificationError::UploadThrottled { body })
        }
        _ => Err(NotificationError::UploadRejected { status, body }),
    }
}

/// `<tmp_dir>/<name><index>.png`, with path separators in the name replaced.
pub fn attachment_path(tmp_dir: &Path, report_name: &str, index: usize) -> PathBuf {
    let safe_name: String = report_name
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();

    tmp_dir.join(format!("{safe_name}{index}.png"))
}
