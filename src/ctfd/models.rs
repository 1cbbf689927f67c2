// Wire and domain types for the CTFd REST API.
//
// CTFd wraps every response in `{"success": ..., "data": ...}`. Only the
// fields the announcer consumes are modelled; everything else is ignored.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::IgnoredAny;
use serde::Deserialize;

/// Response envelope shared by all CTFd API endpoints.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// A challenge from `GET /api/v1/challenges`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Challenge {
    pub id: i64,
    pub name: String,
    /// CTFd reports `null` when solve counts are hidden from the token's account.
    #[serde(rename = "solves", default, deserialize_with = "null_as_zero")]
    pub solve_count: u64,
}

/// A solve from `GET /api/v1/challenges/{id}/solves`, earliest first.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Solve {
    #[serde(rename = "account_id")]
    pub solver_id: i64,
    #[serde(rename = "name")]
    pub solver_name: String,
    /// Only logged. Anything that isn't a recognisable timestamp becomes
    /// `None` rather than failing the whole solve list.
    #[serde(default, deserialize_with = "lenient_date")]
    pub date: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDate {
    Text(String),
    Other(IgnoredAny),
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let text = match Option::<RawDate>::deserialize(deserializer)? {
        Some(RawDate::Text(text)) => text,
        Some(RawDate::Other(_)) | None => return Ok(None),
    };
    Ok(parse_date(&text))
}

/// RFC 3339, or a naive ISO timestamp taken as UTC.
fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or(0))
}

/// Keep only challenges somebody has solved, preserving platform order.
pub fn solved(challenges: Vec<Challenge>) -> Vec<Challenge> {
    challenges.into_iter().filter(|c| c.solve_count > 0).collect()
}
