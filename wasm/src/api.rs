use {
    gloo::net::http::Request,
    serde::{
        de::DeserializeOwned,
        Serialize,
    },
    shared::interface::PATH_PREFIX_API,
};

pub async fn req_post_json<
    R: Serialize,
    T: DeserializeOwned,
>(base_url: &str, path: &str, body: &R) -> Result<T, String> {
    let resp =
        Request::post(&format!("{}{}{}", base_url.trim_end_matches('/'), PATH_PREFIX_API, path))
            .json(body)
            .map_err(|e| format!("Error serializing request body for [{}]: {}", path, e))?
            .send()
            .await
            .map_err(|e| format!("Error sending request to [{}]: {}", path, e))?;
    if !resp.ok() {
        return Err(format!("Request to [{}] failed with status [{}]", path, resp.status()));
    }
    return resp.json().await.map_err(|e| format!("Error parsing response from [{}]: {}", path, e));
}

/// Like `req_post_json` for endpoints whose response body carries nothing.
pub async fn req_post<R: Serialize>(base_url: &str, path: &str, body: &R) -> Result<(), String> {
    let resp =
        Request::post(&format!("{}{}{}", base_url.trim_end_matches('/'), PATH_PREFIX_API, path))
            .json(body)
            .map_err(|e| format!("Error serializing request body for [{}]: {}", path, e))?
            .send()
            .await
            .map_err(|e| format!("Error sending request to [{}]: {}", path, e))?;
    if !resp.ok() {
        return Err(format!("Request to [{}] failed with status [{}]", path, resp.status()));
    }
    return Ok(());
}
