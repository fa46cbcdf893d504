use serde::{Deserialize, Serialize};

/// Address components returned by a reverse geocoder
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub road: Option<String>,
    #[serde(default)]
    pub house_number: Option<String>,
    #[serde(default, alias = "neighborhood")]
    pub neighbourhood: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub town: Option<String>,
    #[serde(default)]
    pub island: Option<String>,
}

impl Place {
    /// Human-readable address: `road house_number, neighbourhood, city`.
    ///
    /// Falls back to the island name, then to an empty string.
    pub fn format_address(&self) -> String {
        let mut parts = Vec::new();

        if let Some(road) = non_empty(&self.road) {
            match non_empty(&self.house_number) {
                Some(number) => parts.push(format!("{} {}", road, number)),
                None => parts.push(road.to_string()),
            }
        }

        if let Some(neighbourhood) = non_empty(&self.neighbourhood) {
            parts.push(neighbourhood.to_string());
        }

        if let Some(city) = non_empty(&self.city).or_else(|| non_empty(&self.town)) {
            parts.push(city.to_string());
        }

        if parts.is_empty() {
            return non_empty(&self.island).unwrap_or_default().to_string();
        }

        parts.join(", ")
    }

    /// Lower-case ISO country code when a country was resolved
    pub fn resolved_country_code(&self) -> Option<String> {
        non_empty(&self.country)?;
        non_empty(&self.country_code).map(str::to_lowercase)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
