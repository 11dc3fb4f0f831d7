use serde::{Deserialize, Serialize};

/// An unconfirmed address returned by the geocoder.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AddressCandidate {
    pub full_address: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl AddressCandidate {
    pub fn suggested_name(&self) -> String {
        derive_name(&self.full_address)
    }
}

/// Geocoders put the place name first: "The Crown, 10 High St, London".
pub fn derive_name(address: &str) -> String {
    match address.split_once(',') {
        Some((head, _)) => head.trim().to_string(),
        None => address.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_text_before_first_comma() {
        assert_eq!(derive_name("The Crown, 10 High St, London"), "The Crown");
        assert_eq!(derive_name("NoCommaAddress"), "NoCommaAddress");
    }

    #[test]
    fn name_derivation_edge_cases() {
        assert_eq!(derive_name(""), "");
        assert_eq!(derive_name(", Soho, London"), "");
        assert_eq!(derive_name("  Red Lion ,Whitehall"), "Red Lion");
    }

    #[test]
    fn candidate_suggests_its_own_name() {
        let candidate = AddressCandidate {
            full_address: "Red Lion, 48 Parliament Street, London".to_string(),
            latitude: 51.5027,
            longitude: -0.1262,
        };
        assert_eq!(candidate.suggested_name(), "Red Lion");
    }
}
