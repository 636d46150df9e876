//! Inbound request validation
//!
//! Schema checks on query/path parameters. Every violation is reported as a
//! `FieldError` so responses can carry per-field detail; validation always
//! runs before any upstream call.

use serde::Serialize;

pub const MIN_CURRENCY_LEN: usize = 2;
pub const MAX_CURRENCY_LEN: usize = 8;
pub const MAX_PAGE_SIZE: u32 = 250;
pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const MAX_CHAT_MESSAGE_LEN: usize = 2000;

const DAYS_PRESETS: [&str; 8] = ["1", "7", "14", "30", "90", "180", "365", "max"];

/// A single field-level validation failure
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Market list sort order, mirroring the upstream enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketOrder {
    MarketCapDesc,
    MarketCapAsc,
    VolumeDesc,
    VolumeAsc,
    IdAsc,
    IdDesc,
    GeckoDesc,
    GeckoAsc,
    PriceAsc,
    PriceDesc,
}

impl MarketOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketOrder::MarketCapDesc => "market_cap_desc",
            MarketOrder::MarketCapAsc => "market_cap_asc",
            MarketOrder::VolumeDesc => "volume_desc",
            MarketOrder::VolumeAsc => "volume_asc",
            MarketOrder::IdAsc => "id_asc",
            MarketOrder::IdDesc => "id_desc",
            MarketOrder::GeckoDesc => "gecko_desc",
            MarketOrder::GeckoAsc => "gecko_asc",
            MarketOrder::PriceAsc => "price_asc",
            MarketOrder::PriceDesc => "price_desc",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "market_cap_desc" => Some(MarketOrder::MarketCapDesc),
            "market_cap_asc" => Some(MarketOrder::MarketCapAsc),
            "volume_desc" => Some(MarketOrder::VolumeDesc),
            "volume_asc" => Some(MarketOrder::VolumeAsc),
            "id_asc" => Some(MarketOrder::IdAsc),
            "id_desc" => Some(MarketOrder::IdDesc),
            "gecko_desc" => Some(MarketOrder::GeckoDesc),
            "gecko_asc" => Some(MarketOrder::GeckoAsc),
            "price_asc" => Some(MarketOrder::PriceAsc),
            "price_desc" => Some(MarketOrder::PriceDesc),
            _ => None,
        }
    }
}

/// Currency code: 2-8 characters, defaults to "usd"
pub fn validate_currency(raw: Option<&str>) -> Result<String, FieldError> {
    let value = match raw {
        Some(v) if !v.trim().is_empty() => v.trim().to_lowercase(),
        _ => return Ok("usd".to_string()),
    };
    if value.len() < MIN_CURRENCY_LEN || value.len() > MAX_CURRENCY_LEN {
        return Err(FieldError::new(
            "currency",
            format!(
                "must be between {} and {} characters",
                MIN_CURRENCY_LEN, MAX_CURRENCY_LEN
            ),
        ));
    }
    Ok(value)
}

/// Page size: integer 1-250, defaults to 50
pub fn validate_page_size(raw: Option<&str>) -> Result<u32, FieldError> {
    let value = match raw {
        Some(v) if !v.trim().is_empty() => v.trim(),
        _ => return Ok(DEFAULT_PAGE_SIZE),
    };
    let parsed: u32 = value
        .parse()
        .map_err(|_| FieldError::new("page_size", "must be an integer"))?;
    if parsed < 1 || parsed > MAX_PAGE_SIZE {
        return Err(FieldError::new(
            "page_size",
            format!("must be between 1 and {}", MAX_PAGE_SIZE),
        ));
    }
    Ok(parsed)
}

/// Page number: integer >= 1, defaults to 1
pub fn validate_page(raw: Option<&str>) -> Result<u32, FieldError> {
    let value = match raw {
        Some(v) if !v.trim().is_empty() => v.trim(),
        _ => return Ok(1),
    };
    let parsed: u32 = value
        .parse()
        .map_err(|_| FieldError::new("page", "must be an integer"))?;
    if parsed < 1 {
        return Err(FieldError::new("page", "must be at least 1"));
    }
    Ok(parsed)
}

/// Sort order: one of the fixed enumeration, defaults to market_cap_desc
pub fn validate_order(raw: Option<&str>) -> Result<MarketOrder, FieldError> {
    let value = match raw {
        Some(v) if !v.trim().is_empty() => v.trim(),
        _ => return Ok(MarketOrder::MarketCapDesc),
    };
    MarketOrder::from_str(value)
        .ok_or_else(|| FieldError::new("order", "is not a recognized sort order"))
}

/// Days window: a positive-integer literal or a preset including "max",
/// defaults to "7". The validated string passes through to the upstream
/// query and the cache key unchanged.
pub fn validate_days(raw: Option<&str>) -> Result<String, FieldError> {
    let value = match raw {
        Some(v) if !v.trim().is_empty() => v.trim(),
        _ => return Ok("7".to_string()),
    };
    let is_literal = !value.is_empty() && value.chars().all(|c| c.is_ascii_digit());
    if is_literal || DAYS_PRESETS.contains(&value) {
        Ok(value.to_string())
    } else {
        Err(FieldError::new(
            "days",
            "must be a number of days or one of 1, 7, 14, 30, 90, 180, 365, max",
        ))
    }
}

/// Coin identifier path segment: non-empty
pub fn validate_coin_id(raw: &str) -> Result<String, FieldError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(FieldError::new("id", "must not be empty"));
    }
    Ok(value.to_string())
}

/// Wallet address: exactly 42 characters, 0x prefix, hex body. Malformed
/// input fails here, before any network call.
pub fn validate_address(raw: Option<&str>) -> Result<String, FieldError> {
    let value = match raw {
        Some(v) if !v.trim().is_empty() => v.trim(),
        _ => return Err(FieldError::new("address", "is required")),
    };
    if !value.starts_with("0x") {
        return Err(FieldError::new("address", "must start with 0x"));
    }
    if value.len() != 42 {
        return Err(FieldError::new("address", "must be 42 characters long"));
    }
    if !value[2..].chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(FieldError::new("address", "must be hexadecimal"));
    }
    Ok(value.to_string())
}

/// Chat message body: 1-2000 characters
pub fn validate_chat_message(raw: &str) -> Result<String, FieldError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(FieldError::new("message", "must not be empty"));
    }
    if value.chars().count() > MAX_CHAT_MESSAGE_LEN {
        return Err(FieldError::new(
            "message",
            format!("must be at most {} characters", MAX_CHAT_MESSAGE_LEN),
        ));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_bounds() {
        assert_eq!(validate_currency(None).unwrap(), "usd");
        assert_eq!(validate_currency(Some("EUR")).unwrap(), "eur");
        assert!(validate_currency(Some("x")).is_err());
        assert!(validate_currency(Some("muchtoolong")).is_err());
    }

    #[test]
    fn test_page_size_bounds() {
        assert!(validate_page_size(Some("0")).is_err());
        assert!(validate_page_size(Some("251")).is_err());
        assert_eq!(validate_page_size(Some("250")).unwrap(), 250);
        assert_eq!(validate_page_size(Some("1")).unwrap(), 1);
        assert_eq!(validate_page_size(None).unwrap(), DEFAULT_PAGE_SIZE);
        assert!(validate_page_size(Some("abc")).is_err());
    }

    #[test]
    fn test_page_bounds() {
        assert_eq!(validate_page(None).unwrap(), 1);
        assert_eq!(validate_page(Some("3")).unwrap(), 3);
        assert!(validate_page(Some("0")).is_err());
    }

    #[test]
    fn test_order_enumeration() {
        assert_eq!(
            validate_order(Some("volume_asc")).unwrap(),
            MarketOrder::VolumeAsc
        );
        assert_eq!(
            validate_order(None).unwrap(),
            MarketOrder::MarketCapDesc
        );
        assert!(validate_order(Some("alphabetical")).is_err());
    }

    #[test]
    fn test_days_literal_and_presets() {
        assert_eq!(validate_days(Some("42")).unwrap(), "42");
        assert_eq!(validate_days(Some("max")).unwrap(), "max");
        assert_eq!(validate_days(None).unwrap(), "7");
        assert!(validate_days(Some("yesterday")).is_err());
        assert!(validate_days(Some("-3")).is_err());
    }

    #[test]
    fn test_address_length() {
        let valid = format!("0x{}", "a".repeat(40));
        assert_eq!(validate_address(Some(&valid)).unwrap(), valid);
        // 41 and 43 characters rejected
        assert!(validate_address(Some(&format!("0x{}", "a".repeat(39)))).is_err());
        assert!(validate_address(Some(&format!("0x{}", "a".repeat(41)))).is_err());
        assert!(validate_address(Some(&format!("zz{}", "a".repeat(40)))).is_err());
        assert!(validate_address(Some(&format!("0x{}", "g".repeat(40)))).is_err());
        assert!(validate_address(None).is_err());
    }

    #[test]
    fn test_chat_message_bounds() {
        assert!(validate_chat_message("").is_err());
        assert!(validate_chat_message("   ").is_err());
        assert_eq!(validate_chat_message("hi").unwrap(), "hi");
        let long = "a".repeat(2001);
        assert!(validate_chat_message(&long).is_err());
        let max = "a".repeat(2000);
        assert!(validate_chat_message(&max).is_ok());
    }
}
