use gloo_net::http::{Request, RequestBuilder};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use rog_shared::hunt::{ActiveHuntsResponse, HuntLogsResponse};
use rog_shared::point::{PointsImportResult, PointsResponse};
use rog_shared::quota::QuotaViewResponse;
use rog_shared::user::{
    Dashboard, LdsResponse, LoginResponse, MeResponse, PinResponse, SwitchLdResponse, User,
    UsersResponse,
};

/// API mount point; overridable at deploy time via `window.ROG_API_BASE`.
fn api_base() -> String {
    let Some(window) = web_sys::window() else {
        return String::new();
    };
    js_sys::Reflect::get(&window, &"ROG_API_BASE".into())
        .ok()
        .and_then(|v| v.as_string())
        .unwrap_or_default()
}

fn url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

fn with_auth(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => builder.header("Authorization", &format!("Bearer {token}")),
        None => builder,
    }
}

#[derive(Deserialize)]
struct ApiError {
    error: String,
}

/// Non-2xx responses carry `{error}`; fall back to the bare status code.
async fn read_error(resp: gloo_net::http::Response) -> String {
    let status = resp.status();
    match resp.json::<ApiError>().await {
        Ok(body) if !body.error.is_empty() => body.error,
        _ => format!("Error {status}"),
    }
}

async fn decode<T: DeserializeOwned>(resp: gloo_net::http::Response) -> Result<T, String> {
    if !resp.ok() {
        return Err(read_error(resp).await);
    }
    resp.json::<T>().await.map_err(|e| format!("parse error: {e}"))
}

async fn get_json<T: DeserializeOwned>(path: &str, token: Option<&str>) -> Result<T, String> {
    let resp = with_auth(Request::get(&url(path)), token)
        .send()
        .await
        .map_err(|e| format!("fetch error: {e}"))?;
    decode(resp).await
}

async fn send_json<T: DeserializeOwned>(
    builder: RequestBuilder,
    body: &impl Serialize,
) -> Result<T, String> {
    let resp = builder
        .json(body)
        .map_err(|e| format!("encode error: {e}"))?
        .send()
        .await
        .map_err(|e| format!("fetch error: {e}"))?;
    decode(resp).await
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    code: &'a str,
    pin: &'a str,
}

pub(crate) async fn login(code: &str, pin: &str) -> Result<LoginResponse, String> {
    send_json(Request::post(&url("/auth/login")), &LoginRequest { code, pin }).await
}

pub(crate) async fn me(token: &str) -> Result<MeResponse, String> {
    get_json("/auth/me", Some(token)).await
}

pub(crate) async fn lds(token: &str) -> Result<LdsResponse, String> {
    get_json("/auth/lds", Some(token)).await
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SwitchLdRequest<'a> {
    ld_id: &'a str,
}

pub(crate) async fn switch_ld(token: &str, ld_id: &str) -> Result<SwitchLdResponse, String> {
    send_json(
        with_auth(Request::post(&url("/auth/switch-ld")), Some(token)),
        &SwitchLdRequest { ld_id },
    )
    .await
}

pub(crate) async fn dashboard(token: &str) -> Result<Dashboard, String> {
    get_json("/ld/dashboard", Some(token)).await
}

pub(crate) async fn active_hunts(token: &str) -> Result<ActiveHuntsResponse, String> {
    get_json("/ld/active-hunts", Some(token)).await
}

pub(crate) async fn users(token: &str) -> Result<UsersResponse, String> {
    get_json("/ld/users", Some(token)).await
}

#[derive(Serialize)]
pub(crate) struct NewUser {
    pub code: String,
    pub name: String,
    pub role: String,
}

pub(crate) async fn create_user(token: &str, user: &NewUser) -> Result<PinResponse, String> {
    send_json(with_auth(Request::post(&url("/ld/users")), Some(token)), user).await
}

#[derive(Serialize, Default)]
pub(crate) struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

pub(crate) async fn update_user(
    token: &str,
    code: &str,
    patch: &UserPatch,
) -> Result<User, String> {
    let path = format!("/ld/users/{}", encode(code));
    send_json(with_auth(Request::patch(&url(&path)), Some(token)), patch).await
}

/// Soft-disable on the backend, surfaced as delete in the UI.
pub(crate) async fn delete_user(token: &str, code: &str) -> Result<(), String> {
    let path = format!("/ld/users/{}", encode(code));
    let resp = with_auth(Request::delete(&url(&path)), Some(token))
        .send()
        .await
        .map_err(|e| format!("fetch error: {e}"))?;
    if !resp.ok() {
        return Err(read_error(resp).await);
    }
    Ok(())
}

pub(crate) async fn reset_pin(token: &str, code: &str) -> Result<PinResponse, String> {
    let path = format!("/ld/users/{}/reset-pin", encode(code));
    let resp = with_auth(Request::post(&url(&path)), Some(token))
        .send()
        .await
        .map_err(|e| format!("fetch error: {e}"))?;
    decode(resp).await
}

pub(crate) async fn hunt_logs(
    token: &str,
    from: Option<&str>,
    to: Option<&str>,
    limit: u32,
) -> Result<HuntLogsResponse, String> {
    let mut path = format!("/ld/hunt-logs?limit={limit}");
    if let Some(from) = from {
        path.push_str(&format!("&from={}", encode(from)));
    }
    if let Some(to) = to {
        path.push_str(&format!("&to={}", encode(to)));
    }
    get_json(&path, Some(token)).await
}

pub(crate) async fn quota_view(token: &str, year: &str) -> Result<QuotaViewResponse, String> {
    let path = format!("/ld/odvzem-view?year={}", encode(year));
    get_json(&path, Some(token)).await
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FileUpload {
    #[serde(rename = "filename")]
    pub file_name: String,
    pub content_base64: String,
}

pub(crate) async fn import_quota_plan(
    token: &str,
    year: &str,
    upload: &FileUpload,
) -> Result<(), String> {
    let path = format!("/ld/odvzem-plan/import-excel?year={}", encode(year));
    let resp = with_auth(Request::post(&url(&path)), Some(token))
        .json(upload)
        .map_err(|e| format!("encode error: {e}"))?
        .send()
        .await
        .map_err(|e| format!("fetch error: {e}"))?;
    if !resp.ok() {
        return Err(read_error(resp).await);
    }
    Ok(())
}

pub(crate) async fn points(token: &str) -> Result<PointsResponse, String> {
    get_json("/ld/points", Some(token)).await
}

pub(crate) async fn import_points(
    token: &str,
    upload: &FileUpload,
) -> Result<PointsImportResult, String> {
    send_json(
        with_auth(Request::post(&url("/ld/points/import")), Some(token)),
        upload,
    )
    .await
}

/// Fetch a static asset relative to the site root (boundary manifest and
/// GeoJSON files are served alongside the app, not by the API).
pub(crate) async fn static_json<T: DeserializeOwned>(path: &str) -> Result<T, String> {
    let resp = Request::get(path)
        .send()
        .await
        .map_err(|e| format!("fetch error: {e}"))?;
    if !resp.ok() {
        return Err(format!("HTTP {}", resp.status()));
    }
    resp.json::<T>().await.map_err(|e| format!("parse error: {e}"))
}

fn encode(value: &str) -> String {
    js_sys::encode_uri_component(value)
        .as_string()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_body_uses_backend_field_names() {
        let upload = FileUpload {
            file_name: "plan.xlsx".to_string(),
            content_base64: "QUJD".to_string(),
        };
        let body = serde_json::to_string(&upload).unwrap();
        assert_eq!(body, r#"{"filename":"plan.xlsx","contentBase64":"QUJD"}"#);
    }
}
