//! # Country
//!
//! Title-cased country name with canonicalization of common abbreviations
//! (spec §3: `UK→United Kingdom`, `USA→United States`,
//! `UAE→United Arab Emirates`, `RSA→South Africa`).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Country(String);

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn canonicalize(title_cased: &str) -> &str {
    match title_cased {
        "Uk" | "U.k." => "United Kingdom",
        "Usa" | "U.s.a." | "U.s." => "United States",
        "Uae" => "United Arab Emirates",
        "Rsa" => "South Africa",
        other => other,
    }
}

impl Country {
    pub fn clean(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Country("Unknown".to_string());
        }
        let cased = title_case(trimmed);
        Country(canonicalize(&cased).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn unknown() -> Self {
        Country("Unknown".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalizes_abbreviations() {
        assert_eq!(Country::clean("UK").as_str(), "United Kingdom");
        assert_eq!(Country::clean("usa").as_str(), "United States");
        assert_eq!(Country::clean("UAE").as_str(), "United Arab Emirates");
        assert_eq!(Country::clean("rsa").as_str(), "South Africa");
    }

    #[test]
    fn title_cases_other_countries() {
        assert_eq!(Country::clean("united kingdom").as_str(), "United Kingdom");
        assert_eq!(Country::clean("FRANCE").as_str(), "France");
    }

    #[test]
    fn empty_is_unknown() {
        assert_eq!(Country::clean("").as_str(), "Unknown");
    }
}
