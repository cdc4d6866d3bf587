//! Lenient deserializers for backend fields that may be null, empty or
//! carry a time component.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

/// `null` (or a missing field, with `#[serde(default)]`) becomes `T::default()`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts `"2024-01-05"`, `"2024-01-05T00:00:00"`, `""` and `null`.
pub fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => {
            let day = s.get(..10).unwrap_or(s);
            NaiveDate::parse_from_str(day, "%Y-%m-%d")
                .map(Some)
                .map_err(serde::de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "lenient_date")]
        day: Option<NaiveDate>,
        #[serde(default, deserialize_with = "null_as_default")]
        amount: f64,
    }

    #[test]
    fn test_lenient_date_forms() {
        let r: Row = serde_json::from_str(r#"{"day":"2024-01-05T08:30:00","amount":null}"#).unwrap();
        assert_eq!(r.day, NaiveDate::from_ymd_opt(2024, 1, 5));
        assert_eq!(r.amount, 0.0);

        let r: Row = serde_json::from_str(r#"{"day":""}"#).unwrap();
        assert_eq!(r.day, None);

        let r: Row = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(r.day, None);

        assert!(serde_json::from_str::<Row>(r#"{"day":"05/01/2024"}"#).is_err());
    }
}
