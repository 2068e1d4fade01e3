// libs/intake-cell/src/services/greeting.rs

use crate::models::Greeting;

/// Time-of-day greeting, personalised once the first name is known.
pub fn greeting(hour: u32, first_name: Option<&str>) -> Greeting {
    let salutation = if hour < 12 {
        "Good morning"
    } else if hour < 18 {
        "Good afternoon"
    } else {
        "Good evening"
    };

    match first_name.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => Greeting {
            headline: format!("{}, {}", salutation, name),
            subtitle: "Let us get you booked quickly",
        },
        None => Greeting {
            headline: salutation.to_string(),
            subtitle: "I will take you step by step",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hour_boundaries() {
        assert_eq!(greeting(0, None).headline, "Good morning");
        assert_eq!(greeting(11, None).headline, "Good morning");
        assert_eq!(greeting(12, None).headline, "Good afternoon");
        assert_eq!(greeting(17, None).headline, "Good afternoon");
        assert_eq!(greeting(18, None).headline, "Good evening");
        assert_eq!(greeting(23, None).headline, "Good evening");
    }

    #[test]
    fn test_personalised_with_first_name() {
        let g = greeting(9, Some("Jane"));
        assert_eq!(g.headline, "Good morning, Jane");
        assert_eq!(g.subtitle, "Let us get you booked quickly");

        let blank = greeting(9, Some("  "));
        assert_eq!(blank.headline, "Good morning");
        assert_eq!(blank.subtitle, "I will take you step by step");
    }
}
