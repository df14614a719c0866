use serde::{Deserialize, Deserializer, Serialize};

/// Treat an explicit `null` like a missing key
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Short-lived bearer credential scraped from the marketplace front page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.as_str())
    }
}

/// One selectable brand or model in a catalog response
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CategoryCounter {
    #[serde(deserialize_with = "null_default")]
    pub search_parameters: String,
    #[serde(deserialize_with = "null_default")]
    pub label: String,
    #[serde(deserialize_with = "null_default")]
    pub api_query: String,
    #[serde(deserialize_with = "null_default")]
    pub ad_counter: i64,
}

/// Ordered brand or model taxonomy as returned by the counters endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    #[serde(deserialize_with = "null_default")]
    pub category_counters: Vec<CategoryCounter>,
}

impl Catalog {
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.category_counters.iter().map(|c| c.label.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Attribute {
    #[serde(deserialize_with = "null_default")]
    pub header: String,
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    #[serde(deserialize_with = "null_default")]
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdLocation {
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(deserialize_with = "null_default")]
    pub query_key: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameter {
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    #[serde(deserialize_with = "null_default")]
    pub label: String,
    #[serde(deserialize_with = "null_default")]
    pub value: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterGroup {
    #[serde(deserialize_with = "null_default")]
    pub label: String,
    #[serde(deserialize_with = "null_default")]
    pub parameters: Vec<Parameter>,
    #[serde(rename = "type", deserialize_with = "null_default")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Price {
    #[serde(deserialize_with = "null_default")]
    pub label: String,
    #[serde(deserialize_with = "null_default")]
    pub suffix: String,
    #[serde(deserialize_with = "null_default")]
    pub value: i64,
}

/// Single vehicle listing from the search endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Ad {
    #[serde(deserialize_with = "null_default")]
    pub ad_id: String,
    #[serde(deserialize_with = "null_default")]
    pub ad_status: String,
    #[serde(deserialize_with = "null_default")]
    pub attributes: Vec<Attribute>,
    #[serde(deserialize_with = "null_default")]
    pub license_plate: String,
    #[serde(deserialize_with = "null_default")]
    pub list_id: String,
    #[serde(deserialize_with = "null_default")]
    pub location: Vec<AdLocation>,
    #[serde(deserialize_with = "null_default")]
    pub parameter_groups: Vec<ParameterGroup>,
    #[serde(deserialize_with = "null_default")]
    pub price: Price,
    #[serde(deserialize_with = "null_default")]
    pub share_url: String,
    #[serde(deserialize_with = "null_default")]
    pub subject: String,
}

/// Search response wrapping the matching ads
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdSequence {
    #[serde(deserialize_with = "null_default")]
    pub data: Vec<Ad>,
}

/// Flat CSV projection of one ad
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    pub subject: String,
    pub price: String,
    pub mileage: String,
    pub year: String,
    pub municipality: String,
    pub area: String,
    pub url: String,
}

impl ExportRow {
    pub const HEADER: [&'static str; 7] = [
        "Subject",
        "Price",
        "Mileage",
        "Year",
        "Municipality",
        "Area",
        "URL",
    ];

    pub fn as_record(&self) -> [&str; 7] {
        [
            self.subject.as_str(),
            self.price.as_str(),
            self.mileage.as_str(),
            self.year.as_str(),
            self.municipality.as_str(),
            self.area.as_str(),
            self.url.as_str(),
        ]
    }
}
