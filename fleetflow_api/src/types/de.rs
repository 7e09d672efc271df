//! Lenient field deserializers for values the backend sends in more than one form.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
}

/// Money fields arrive as numbers (`1200.5`) or decimal strings (`"1200.50"`).
/// Unparseable strings and `null` read as `None`.
pub(crate) fn amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawAmount>::deserialize(deserializer)? {
        Some(RawAmount::Number(n)) => Some(n),
        Some(RawAmount::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}
