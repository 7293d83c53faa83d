use serde::{Deserialize, Deserializer};
use serde_aux::field_attributes::deserialize_number_from_string;

// `?page=abc` falls back to the first page instead of failing the request
pub fn deserialize_page<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.trim().parse().ok()).unwrap_or(1))
}

/// The category a quiz is played in. Clients send either a bare id or the
/// category object they got from `/categories`, e.g. `{"type": "Art", "id": "2"}`.
/// Id `0` stands for every category.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum QuizCategory {
    Id(#[serde(deserialize_with = "deserialize_number_from_string")] i64),
    Object {
        #[serde(deserialize_with = "deserialize_number_from_string")]
        id: i64,
    },
}

impl QuizCategory {
    pub fn filter(&self) -> Option<i64> {
        let id = match self {
            Self::Id(id) | Self::Object { id } => *id,
        };
        (id != 0).then_some(id)
    }
}
