use serde::{Deserialize, Deserializer, Serialize};

/// One record from the compendium data source.
///
/// The upstream API sends `null` for missing text and list fields, so those
/// collapse to their empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monster {
    pub name: String,
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,
    #[serde(
        default,
        alias = "commonLocations",
        deserialize_with = "null_as_default"
    )]
    pub common_locations: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub drops: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dlc: bool,
}

/// The data source's response envelope. The whole dataset arrives in one page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonstersResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<Monster>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
