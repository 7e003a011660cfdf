/// Reverse geocoding through the Nominatim HTTP API
///
/// Turns a GPS position into a short place name for the location field.
/// The call is made at most twice per image-visit: once, plus one retry
/// when the first attempt times out. Every other failure degrades to an
/// empty place name without surfacing an error.

use std::time::Duration;

use serde::Deserialize;

const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/reverse";
const TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = concat!("photo-renamer/", env!("CARGO_PKG_VERSION"));

/// The slice of the Nominatim response this tool cares about.
#[derive(Debug, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    address: Address,
}

#[derive(Debug, Default, Deserialize)]
struct Address {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
}

/// Resolve coordinates to a place name, or `""` when that is not possible.
///
/// Prefers city over town over village. Retries exactly once on a timeout,
/// then gives up quietly. Never panics.
pub async fn reverse_geocode(lat: f64, lon: f64) -> String {
    match lookup(lat, lon).await {
        Ok(place) => place,
        Err(err) if err.is_timeout() => lookup(lat, lon).await.unwrap_or_default(),
        Err(_) => String::new(),
    }
}

async fn lookup(lat: f64, lon: f64) -> Result<String, reqwest::Error> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(TIMEOUT)
        .build()?;

    let response: ReverseResponse = client
        .get(NOMINATIM_URL)
        .query(&[("format", "jsonv2"), ("accept-language", "en")])
        .query(&[("lat", lat), ("lon", lon)])
        .send()
        .await?
        .json()
        .await?;

    let address = response.address;
    Ok(address
        .city
        .or(address.town)
        .or(address.village)
        .unwrap_or_default())
}
