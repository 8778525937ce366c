//! Kubernetes resource quantity helpers.
//!
//! Only zero-ness matters to the engine, so quantities are reduced to a
//! scaled `f64` rather than carried as exact decimals.

use k8s_openapi::apimachinery::pkg::api::resource::Quantity;

/// Binary and decimal suffixes accepted by the API server.
const SUFFIXES: &[(&str, f64)] = &[
    ("Ki", 1024.0),
    ("Mi", 1024.0 * 1024.0),
    ("Gi", 1024.0 * 1024.0 * 1024.0),
    ("Ti", 1024.0 * 1024.0 * 1024.0 * 1024.0),
    ("Pi", 1024.0 * 1024.0 * 1024.0 * 1024.0 * 1024.0),
    ("Ei", 1024.0 * 1024.0 * 1024.0 * 1024.0 * 1024.0 * 1024.0),
    ("n", 1e-9),
    ("u", 1e-6),
    ("m", 1e-3),
    ("k", 1e3),
    ("M", 1e6),
    ("G", 1e9),
    ("T", 1e12),
    ("P", 1e15),
    ("E", 1e18),
];

/// Parse a quantity string (e.g. "100m", "128Mi", "1e3") into its base unit.
///
/// Returns `None` for strings the API server would have rejected.
pub fn parse_quantity(quantity: &str) -> Option<f64> {
    let quantity = quantity.trim();
    if quantity.is_empty() {
        return None;
    }

    for (suffix, scale) in SUFFIXES {
        if let Some(number) = quantity.strip_suffix(suffix) {
            return number.parse::<f64>().ok().map(|n| n * scale);
        }
    }

    // Plain numbers and decimal exponents ("1e3", "5E-2")
    quantity.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// A quantity counts as set only when it parses to a non-zero value.
pub fn is_nonzero(quantity: &Quantity) -> bool {
    match parse_quantity(&quantity.0) {
        Some(value) => value != 0.0,
        None => {
            log::debug!("Unparseable quantity '{}' treated as unset", quantity.0);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cpu_quantity() {
        assert_eq!(parse_quantity("100m"), Some(0.1));
        assert_eq!(parse_quantity("1"), Some(1.0));
        assert_eq!(parse_quantity("0.5"), Some(0.5));
        assert_eq!(parse_quantity("500000000n"), Some(0.5));
    }

    #[test]
    fn test_parse_memory_quantity() {
        assert_eq!(parse_quantity("128Mi"), Some(128.0 * 1024.0 * 1024.0));
        assert_eq!(parse_quantity("1Gi"), Some(1024.0 * 1024.0 * 1024.0));
        assert_eq!(parse_quantity("500M"), Some(500e6));
        assert_eq!(parse_quantity("1e3"), Some(1000.0));
    }

    #[test]
    fn test_zero_forms() {
        for zero in ["0", "0m", "0Mi", "0.0", "0e3"] {
            assert!(!is_nonzero(&Quantity(zero.to_string())), "{zero}");
        }
        assert!(is_nonzero(&Quantity("1m".to_string())));
    }

    #[test]
    fn test_garbage_is_unset() {
        assert_eq!(parse_quantity(""), None);
        assert_eq!(parse_quantity("lots"), None);
        assert!(!is_nonzero(&Quantity("12Xi".to_string())));
    }
}
