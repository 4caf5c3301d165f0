//! Inbound mockup generation request and its validation

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::{AppError, Result};

const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("valid regex"));

pub const KEYWORD_MIN_CHARS: usize = 3;
pub const KEYWORD_MAX_CHARS: usize = 200;
pub const DETAILS_MAX_CHARS: usize = 500;
pub const DEFAULT_COLOR_SCHEME: &str = "modern";

macro_rules! industries {
    ($($variant:ident => $value:literal),+ $(,)?) => {
        /// Industry category of the requested website
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum Industry {
            $(
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl Industry {
            pub const ALL: &'static [Industry] = &[$(Industry::$variant),+];

            /// Wire value, interpolated verbatim into prompts and emails
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Industry::$variant => $value,)+
                }
            }
        }
    };
}

industries! {
    // Technology
    Technology => "technology",
    Saas => "saas",
    Fintech => "fintech",
    Cybersecurity => "cybersecurity",
    Software => "software",
    Hardware => "hardware",
    Telecommunications => "telecommunications",
    Cloud => "cloud",
    // E-commerce
    ECommerce => "e-commerce",
    Marketplace => "marketplace",
    Dropshipping => "dropshipping",
    B2b => "b2b",
    Groceries => "groceries",
    Fashion => "fashion",
    Beauty => "beauty",
    Furniture => "furniture",
    Automotive => "automotive",
    // Real estate
    RealEstate => "real_estate",
    PropertyDevelopment => "property_development",
    PropertyRental => "property_rental",
    Construction => "construction",
    InteriorDesign => "interior_design",
    // Gastronomy & hotels
    Restaurant => "restaurant",
    Cafe => "cafe",
    Hotel => "hotel",
    Catering => "catering",
    BarClub => "bar_club",
    Bakery => "bakery",
    // Professional services
    Law => "law",
    Consulting => "consulting",
    Accounting => "accounting",
    HrRecruitment => "hr_recruitment",
    MarketingAgency => "marketing_agency",
    Advertising => "advertising",
    PrCommunications => "pr_communications",
    // Education
    Education => "education",
    University => "university",
    Training => "training",
    OnlineCourses => "online_courses",
    Tutoring => "tutoring",
    LanguageSchool => "language_school",
    // Healthcare & fitness
    Healthcare => "healthcare",
    Clinic => "clinic",
    Pharmacy => "pharmacy",
    Dentistry => "dentistry",
    Psychology => "psychology",
    Veterinary => "veterinary",
    Fitness => "fitness",
    SpaWellness => "spa_wellness",
    Nutrition => "nutrition",
    // Transportation & logistics
    Transportation => "transportation",
    Logistics => "logistics",
    Courier => "courier",
    Taxi => "taxi",
    MovingServices => "moving_services",
    // Home
    RealEstateAgency => "real_estate_agency",
    HomeServices => "home_services",
    Cleaning => "cleaning",
    Plumbing => "plumbing",
    Electrical => "electrical",
    Painting => "painting",
    Carpentry => "carpentry",
    // Tourism & travel
    Tourism => "tourism",
    TravelAgency => "travel_agency",
    HotelBooking => "hotel_booking",
    CarRental => "car_rental",
    TourOperator => "tour_operator",
    // Media & entertainment
    Media => "media",
    Publishing => "publishing",
    Movies => "movies",
    Music => "music",
    Gaming => "gaming",
    Streaming => "streaming",
    Photography => "photography",
    Videography => "videography",
    // Sports
    Sports => "sports",
    Gym => "gym",
    Yoga => "yoga",
    MartialArts => "martial_arts",
    SportsEquipment => "sports_equipment",
    // Retail
    Retail => "retail",
    Wholesale => "wholesale",
    AntiqueShop => "antique_shop",
    Bookstore => "bookstore",
    FlowerShop => "flower_shop",
    PetShop => "pet_shop",
    Jewelry => "jewelry",
    Electronics => "electronics",
    // Personal services
    Hairdresser => "hairdresser",
    Barber => "barber",
    ManicurePedicure => "manicure_pedicure",
    Tattoo => "tattoo",
    WeddingPlanner => "wedding_planner",
    EventPlanning => "event_planning",
    // Manufacturing & crafts
    Manufacturing => "manufacturing",
    Crafts => "crafts",
    Textiles => "textiles",
    Metalwork => "metalwork",
    Ceramics => "ceramics",
    // Agriculture & environment
    Agriculture => "agriculture",
    EnvironmentalProtection => "environmental_protection",
    // Finance
    Banking => "banking",
    Insurance => "insurance",
    Investment => "investment",
    Cryptocurrency => "cryptocurrency",
    Forex => "forex",
    // Independent professionals
    Freelancer => "freelancer",
    Consultant => "consultant",
    Coaching => "coaching",
    Other => "other",
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Industry {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        Industry::ALL
            .iter()
            .copied()
            .find(|industry| industry.as_str() == s)
            .ok_or_else(|| AppError::InvalidRequest(format!("Unknown industry '{}'", s)))
    }
}

fn default_color_scheme() -> Option<String> {
    Some(DEFAULT_COLOR_SCHEME.to_string())
}

/// Request for a website mockup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Topic phrase the mockup is built around
    pub keyword: String,

    pub industry: Industry,

    /// Where the finished mockup is sent
    pub email: String,

    #[serde(default = "default_color_scheme")]
    pub color_scheme: Option<String>,

    #[serde(default)]
    pub additional_details: Option<String>,
}

impl GenerationRequest {
    /// Check field constraints. Industry is already enforced by deserialization.
    pub fn validate(&self) -> Result<()> {
        if !is_valid_email(&self.email) {
            return Err(AppError::InvalidRequest("Invalid email format".to_string()));
        }

        if self.keyword.trim().is_empty() {
            return Err(AppError::InvalidRequest("Keyword cannot be empty".to_string()));
        }

        let keyword_len = self.keyword.chars().count();
        if !(KEYWORD_MIN_CHARS..=KEYWORD_MAX_CHARS).contains(&keyword_len) {
            return Err(AppError::InvalidRequest(format!(
                "Keyword must be between {} and {} characters",
                KEYWORD_MIN_CHARS, KEYWORD_MAX_CHARS
            )));
        }

        if let Some(details) = &self.additional_details {
            if details.chars().count() > DETAILS_MAX_CHARS {
                return Err(AppError::InvalidRequest(format!(
                    "Additional details cannot exceed {} characters",
                    DETAILS_MAX_CHARS
                )));
            }
        }

        Ok(())
    }

    pub fn color_scheme(&self) -> &str {
        self.color_scheme.as_deref().unwrap_or(DEFAULT_COLOR_SCHEME)
    }
}

/// Syntactic email check
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}
