use serde::Serialize;

#[derive(Serialize)]
pub struct WatchQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

#[derive(Serialize)]
pub struct UploadQuery<'a> {
    #[serde(rename = "type")]
    pub format: &'a str,
    pub repair: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub force: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
}

#[derive(Serialize)]
pub struct UnloadQuery {
    pub force: bool,
}

#[derive(Serialize)]
pub struct ResyncQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<&'a str>,
    pub reset: bool,
}
