/// Schema round-trips against the real migrations
pub mod schema_tests;

/// Pure validators and enums
pub mod validation_tests {
    use std::str::FromStr;

    use crate::contact_message::ContactStatus;
    use crate::{company_info, testimonial};

    #[test]
    fn rating_bounds_are_inclusive() {
        assert!(testimonial::validate_rating(1).is_ok());
        assert!(testimonial::validate_rating(5).is_ok());
        assert!(testimonial::validate_rating(0).is_err());
        assert!(testimonial::validate_rating(6).is_err());
    }

    #[test]
    fn contact_status_parses_case_insensitive() {
        assert_eq!(ContactStatus::from_str("Replied").unwrap(), ContactStatus::Replied);
        assert_eq!(ContactStatus::default(), ContactStatus::New);
        assert!(ContactStatus::from_str("spam").is_err());
        assert_eq!(ContactStatus::Archived.to_string(), "archived");
    }

    #[test]
    fn meta_description_limit() {
        assert!(company_info::validate_meta_description(&"a".repeat(160)).is_ok());
        assert!(company_info::validate_meta_description(&"a".repeat(161)).is_err());
    }
}
