use serde::{Deserialize, Deserializer, Serialize};

/// Represents a GitHub release asset
#[derive(Deserialize, Serialize, Debug, PartialEq, Clone, Default)]
pub struct ReleaseAsset {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub browser_download_url: String,
}

/// Represents the `releases/latest` payload.
///
/// Every field is optional on the wire; validation happens when the payload
/// is turned into a `ReleaseRecord`.
#[derive(Deserialize, Serialize, Debug, PartialEq, Clone, Default)]
pub struct GitHubRelease {
    #[serde(default)]
    pub tag_name: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    /// `null` on the wire is read as no assets
    #[serde(default, deserialize_with = "null_as_empty")]
    pub assets: Vec<ReleaseAsset>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<ReleaseAsset>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<ReleaseAsset>>::deserialize(deserializer)?.unwrap_or_default())
}
