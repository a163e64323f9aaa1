use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One alert as published by the alert-history service.
///
/// Fields the service adds beyond the ones we read are kept in `extra` so
/// that a record re-serialized by `/api/alerts` matches what upstream sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAlert {
    #[serde(with = "alert_date")]
    pub alert_date: NaiveDateTime,
    pub title: String,
    pub data: String,
    #[serde(default)]
    pub category: Option<i64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

mod alert_date {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format(FORMATS[0]).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let text = String::deserialize(deserializer)?;
        FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(text.trim(), format).ok())
            .ok_or_else(|| de::Error::custom(format!("invalid alertDate '{text}'")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Rocket/Missile Fire")]
    RocketMissileFire,
    #[serde(rename = "Hostile Aircraft Intrusion")]
    HostileAircraftIntrusion,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::RocketMissileFire,
        Category::HostileAircraftIntrusion,
        Category::Unknown,
    ];

    /// Total mapping from the upstream numeric code.
    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(1) => Category::RocketMissileFire,
            Some(2) => Category::HostileAircraftIntrusion,
            _ => Category::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::RocketMissileFire => "Rocket/Missile Fire",
            Category::HostileAircraftIntrusion => "Hostile Aircraft Intrusion",
            Category::Unknown => "Unknown",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.label() == label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedAlert {
    pub date: NaiveDateTime,
    pub title: String,
    pub location: String,
    pub category: Category,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub category: Category,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationCount {
    pub location: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DateBounds {
    pub min: NaiveDateTime,
    pub max: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateStats {
    pub total: usize,
    pub by_category: Vec<CategoryCount>,
    pub by_location: Vec<LocationCount>,
    pub top_locations: Vec<LocationCount>,
    pub date_range: Option<DateBounds>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatPoint {
    pub lat: f64,
    pub lon: f64,
    pub weight: usize,
}

#[derive(Debug, Serialize)]
pub struct AlertView {
    pub alerts: Vec<ResolvedAlert>,
    pub total: usize,
    pub stats: AggregateStats,
    pub heatmap: Vec<HeatPoint>,
    pub markers: Vec<ResolvedAlert>,
}

#[derive(Debug, Deserialize)]
pub struct AlertsQuery {
    #[serde(rename = "fromDate")]
    pub from_date: Option<String>,
    #[serde(rename = "toDate")]
    pub to_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ViewQuery {
    #[serde(rename = "fromDate")]
    pub from_date: Option<String>,
    #[serde(rename = "toDate")]
    pub to_date: Option<String>,
    pub category: Option<String>,
    pub top: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub category: Option<String>,
    pub top: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearestRequest {
    pub lat: f64,
    pub lon: f64,
    pub points: Vec<ResolvedAlert>,
    pub max_distance_meters: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Apartment {
    pub id: String,
    pub address: String,
    pub contact_name: String,
    pub contact_phone: String,
    pub price: f64,
    pub rooms: f64,
    pub size: f64,
    pub floor: i32,
    pub details: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub is_irrelevant: bool,
}

const COUNTRY_CODE: &str = "972";

impl Apartment {
    /// WhatsApp chat link to the listing's contact, with an enquiry about the
    /// address prefilled. Local numbers lose their leading zero and gain the
    /// Israeli country code; `None` when the phone holds no digits.
    pub fn contact_link(&self) -> Option<String> {
        let digits: String = self.contact_phone.chars().filter(char::is_ascii_digit).collect();
        let national = match digits.strip_prefix(COUNTRY_CODE) {
            Some(rest) => rest,
            None => digits.strip_prefix('0').unwrap_or(&digits),
        };
        if national.is_empty() {
            return None;
        }
        let message = format!(
            "היי, אני מתעניין בדירה בכתובת {}. האם אפשר לקבל פרטים נוספים?",
            self.address
        );
        Some(format!(
            "https://wa.me/+{COUNTRY_CODE}{national}?text={}",
            urlencoding::encode(&message)
        ))
    }
}

/// A listing as the API returns it: the stored record plus derived fields.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApartmentView {
    #[serde(flatten)]
    pub apartment: Apartment,
    pub contact_link: Option<String>,
}

impl From<Apartment> for ApartmentView {
    fn from(apartment: Apartment) -> Self {
        let contact_link = apartment.contact_link();
        Self {
            apartment,
            contact_link,
        }
    }
}

/// Listing fields as entered in the form, before geocoding assigns a position.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewApartment {
    pub address: String,
    pub contact_name: String,
    pub contact_phone: String,
    pub price: f64,
    pub rooms: f64,
    pub size: f64,
    pub floor: i32,
    pub details: String,
}

#[derive(Debug, Deserialize)]
pub struct NoteRequest {
    pub note: String,
}

#[derive(Debug, Deserialize)]
pub struct PositionQuery {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SuggestQuery {
    #[serde(default)]
    pub q: String,
}
