//! Unit tests for request parsing and validation

use mockup_generator::error::AppError;
use mockup_generator::task::{request::is_valid_email, GenerationRequest, Industry};

fn parse(body: &str) -> GenerationRequest {
    serde_json::from_str(body).unwrap()
}

#[test]
fn test_full_request_parses() {
    let request = parse(
        r#"{
            "keyword": "vegan cafe",
            "industry": "cafe",
            "email": "owner@cafe.pl",
            "color_scheme": "pastel",
            "additional_details": "outdoor seating"
        }"#,
    );

    assert_eq!(request.industry, Industry::Cafe);
    assert_eq!(request.color_scheme(), "pastel");
    assert_eq!(request.additional_details.as_deref(), Some("outdoor seating"));
    assert!(request.validate().is_ok());
}

#[test]
fn test_unknown_industry_fails_to_parse() {
    let result: Result<GenerationRequest, _> = serde_json::from_str(
        r#"{"keyword": "vegan cafe", "industry": "asteroid_mining", "email": "a@b.com"}"#,
    );
    assert!(result.is_err());
}

#[test]
fn test_validation_errors_are_invalid_request() {
    let request = parse(r#"{"keyword": "vegan cafe", "industry": "cafe", "email": "a@@b"}"#);
    assert!(matches!(request.validate(), Err(AppError::InvalidRequest(_))));

    let request = parse(r#"{"keyword": "\t \n", "industry": "cafe", "email": "a@b.com"}"#);
    assert!(matches!(request.validate(), Err(AppError::InvalidRequest(_))));
}

#[test]
fn test_keyword_length_counts_characters() {
    // Multi-byte characters count once each
    let request = parse(r#"{"keyword": "żółw", "industry": "pet_shop", "email": "a@b.com"}"#);
    assert!(request.validate().is_ok());
}

#[test]
fn test_industry_set_round_trips_through_strings() {
    for industry in Industry::ALL {
        assert_eq!(industry.as_str().parse::<Industry>().unwrap(), *industry);
    }
    assert!(Industry::ALL.contains(&Industry::Other));
}

#[test]
fn test_email_examples() {
    assert!(is_valid_email("jan.kowalski@firma.com.pl"));
    assert!(!is_valid_email("jan kowalski@firma.pl"));
    assert!(!is_valid_email("@firma.pl"));
}
