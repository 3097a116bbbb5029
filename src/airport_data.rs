//! Built-in airport reference data.
//!
//! `MAJOR_AIRPORTS` is the table used whenever the remote dataset is
//! unavailable; `MAJOR_IATA_CODES` and `EXCLUDED_TERMS` filter the remote
//! dataset down to airports with regular scheduled service.

/// A static airport entry: (IATA, name, lat, lng).
pub type AirportEntry = (&'static str, &'static str, f64, f64);

pub const MAJOR_AIRPORTS: &[AirportEntry] = &[
    // East Asia
    ("HND", "Tokyo Haneda Airport", 35.5494, 139.7798),
    ("NRT", "Narita International Airport", 35.7720, 140.3929),
    ("KIX", "Kansai International Airport", 34.4347, 135.2440),
    ("ITM", "Osaka Itami Airport", 34.7855, 135.4382),
    ("NGO", "Chubu Centrair International Airport", 34.8584, 136.8054),
    ("FUK", "Fukuoka Airport", 33.5859, 130.4511),
    ("CTS", "New Chitose Airport", 42.7752, 141.6923),
    ("OKA", "Naha Airport", 26.1958, 127.6459),
    ("ICN", "Incheon International Airport", 37.4602, 126.4407),
    ("PEK", "Beijing Capital International Airport", 40.0799, 116.6031),
    ("PVG", "Shanghai Pudong International Airport", 31.1443, 121.8083),
    ("HKG", "Hong Kong International Airport", 22.3080, 113.9185),
    ("TPE", "Taiwan Taoyuan International Airport", 25.0797, 121.2342),
    // South-East and South Asia
    ("SIN", "Singapore Changi Airport", 1.3644, 103.9915),
    ("BKK", "Suvarnabhumi Airport", 13.6900, 100.7501),
    ("KUL", "Kuala Lumpur International Airport", 2.7456, 101.7099),
    ("CGK", "Soekarno-Hatta International Airport", -6.1256, 106.6559),
    ("MNL", "Ninoy Aquino International Airport", 14.5086, 121.0194),
    ("DEL", "Indira Gandhi International Airport", 28.5562, 77.1000),
    ("BOM", "Chhatrapati Shivaji Maharaj International Airport", 19.0896, 72.8656),
    // Middle East and Africa
    ("DXB", "Dubai International Airport", 25.2532, 55.3657),
    ("DOH", "Hamad International Airport", 25.2731, 51.6081),
    ("IST", "Istanbul Airport", 41.2753, 28.7519),
    ("CAI", "Cairo International Airport", 30.1219, 31.4056),
    ("JNB", "O. R. Tambo International Airport", -26.1367, 28.2411),
    ("NBO", "Jomo Kenyatta International Airport", -1.3192, 36.9278),
    // Europe
    ("LHR", "London Heathrow Airport", 51.4700, -0.4543),
    ("CDG", "Paris Charles de Gaulle Airport", 49.0097, 2.5479),
    ("AMS", "Amsterdam Airport Schiphol", 52.3105, 4.7683),
    ("FRA", "Frankfurt Airport", 50.0379, 8.5622),
    ("MUC", "Munich Airport", 48.3537, 11.7750),
    ("ZRH", "Zurich Airport", 47.4582, 8.5555),
    ("MAD", "Adolfo Suárez Madrid-Barajas Airport", 40.4983, -3.5676),
    ("BCN", "Barcelona-El Prat Airport", 41.2974, 2.0833),
    ("FCO", "Leonardo da Vinci-Fiumicino Airport", 41.8003, 12.2389),
    ("VIE", "Vienna International Airport", 48.1103, 16.5697),
    ("CPH", "Copenhagen Airport", 55.6180, 12.6508),
    // Americas
    ("JFK", "John F. Kennedy International Airport", 40.6413, -73.7781),
    ("ORD", "O'Hare International Airport", 41.9742, -87.9073),
    ("ATL", "Hartsfield-Jackson Atlanta International Airport", 33.6407, -84.4277),
    ("DFW", "Dallas/Fort Worth International Airport", 32.8998, -97.0403),
    ("LAX", "Los Angeles International Airport", 33.9416, -118.4085),
    ("SFO", "San Francisco International Airport", 37.6213, -122.3790),
    ("SEA", "Seattle-Tacoma International Airport", 47.4502, -122.3088),
    ("YYZ", "Toronto Pearson International Airport", 43.6777, -79.6248),
    ("YVR", "Vancouver International Airport", 49.1967, -123.1815),
    ("MEX", "Mexico City International Airport", 19.4361, -99.0719),
    ("GRU", "São Paulo/Guarulhos International Airport", -23.4356, -46.4731),
    ("EZE", "Ministro Pistarini International Airport", -34.8222, -58.5358),
    ("BOG", "El Dorado International Airport", 4.7016, -74.1469),
    // Oceania
    ("SYD", "Sydney Kingsford Smith Airport", -33.9399, 151.1753),
    ("MEL", "Melbourne Airport", -37.6690, 144.8410),
    ("AKL", "Auckland Airport", -37.0082, 174.7850),
];

/// Airports accepted from the remote dataset even without "international"
/// in their name.
pub const MAJOR_IATA_CODES: &[&str] = &[
    "HND", "NRT", "KIX", "ITM", "NGO", "FUK", "CTS", "OKA", "SDJ", "HIJ", "KOJ", "KMQ",
    "ICN", "GMP", "PUS", "CJU", "PEK", "PKX", "PVG", "SHA", "CAN", "SZX", "CTU", "HKG",
    "TPE", "TSA", "SIN", "BKK", "DMK", "KUL", "CGK", "DPS", "MNL", "SGN", "HAN", "DEL",
    "BOM", "DXB", "DOH", "AUH", "IST", "CAI", "JNB", "CPT", "NBO", "LHR", "LGW", "STN",
    "CDG", "ORY", "AMS", "FRA", "MUC", "ZRH", "GVA", "MAD", "BCN", "FCO", "MXP", "VIE",
    "CPH", "ARN", "OSL", "HEL", "DUB", "LIS", "ATH", "BRU", "JFK", "EWR", "LGA", "ORD",
    "ATL", "DFW", "DEN", "LAX", "SFO", "SEA", "LAS", "MIA", "BOS", "IAD", "YYZ", "YVR",
    "YUL", "MEX", "CUN", "GRU", "GIG", "EZE", "BOG", "LIM", "SCL", "SYD", "MEL", "BNE",
    "AKL",
];

/// Name or type fragments that disqualify an entry.
pub const EXCLUDED_TERMS: &[&str] = &[
    "heliport",
    "helipad",
    "military",
    "air force",
    "air base",
    "naval",
    "army",
    "private",
    "closed",
    "seaplane",
    "balloon",
    "glider",
    "ultralight",
];

pub fn is_major_iata(code: &str) -> bool {
    MAJOR_IATA_CODES.contains(&code)
}

/// True when any excluded term occurs in the given text (case-insensitive).
pub fn is_excluded(text: &str) -> bool {
    let lower = text.to_lowercase();
    EXCLUDED_TERMS.iter().any(|term| lower.contains(term))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_table_codes_are_curated() {
        for (iata, name, lat, lng) in MAJOR_AIRPORTS {
            assert_eq!(iata.len(), 3, "{}", name);
            assert!(is_major_iata(iata), "{} missing from curated list", iata);
            assert!(lat.abs() <= 90.0 && lng.abs() <= 180.0, "{} coords", iata);
        }
    }

    #[test]
    fn test_exclusion_is_case_insensitive() {
        assert!(is_excluded("Yokota Air Base"));
        assert!(is_excluded("Tokyo Heliport"));
        assert!(is_excluded("closed"));
        assert!(!is_excluded("Fukuoka Airport"));
    }
}
