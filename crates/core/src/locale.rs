//! ISO 639-1 language codes accepted by the locale rules.

/// Every accepted two-letter code, lowercase and sorted.
pub const LOCALE_CODES: [&str; 182] = [
    "aa", "ab", "ae", "af", "ak", "am", "an", "ar", "as", "av", "ay", "az",
    "ba", "be", "bg", "bi", "bm", "bn", "bo", "br", "bs", "ca", "ce", "ch",
    "co", "cr", "cs", "cv", "cy", "da", "de", "dv", "dz", "ee", "el", "en",
    "eo", "es", "et", "eu", "fa", "ff", "fi", "fj", "fo", "fr", "fy", "ga",
    "gd", "gl", "gn", "gu", "gv", "ha", "he", "hi", "ho", "hr", "ht", "hu",
    "hy", "hz", "ia", "id", "ie", "ig", "ii", "ik", "io", "is", "it", "iu",
    "ja", "jv", "ka", "kg", "ki", "kj", "kk", "kl", "km", "kn", "ko", "kr",
    "ks", "ku", "kv", "kw", "ky", "la", "lb", "lg", "li", "ln", "lo", "lt",
    "lu", "lv", "mg", "mh", "mi", "mk", "ml", "mn", "mr", "ms", "mt", "my",
    "na", "nb", "nd", "ne", "ng", "nl", "nn", "no", "nr", "nv", "ny", "oc",
    "oj", "om", "or", "os", "pa", "pi", "pl", "ps", "pt", "qu", "rm", "rn",
    "ro", "ru", "rw", "sa", "sc", "sd", "se", "sg", "si", "sk", "sl", "sm",
    "sn", "so", "sq", "sr", "ss", "st", "su", "sv", "sw", "ta", "te", "tg",
    "th", "ti", "tk", "tl", "tn", "to", "tr", "ts", "tt", "tw", "ty", "ug",
    "uk", "ur", "uz", "ve", "vi", "vo", "wa", "wo", "xh", "yi", "yo", "za",
    "zh", "zu",
];

/// Whether `code` is one of [`LOCALE_CODES`]. Matching is exact: no case
/// folding and no trimming.
pub fn is_locale_code(code: &str) -> bool {
    LOCALE_CODES.binary_search(&code).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted_and_unique() {
        assert!(LOCALE_CODES.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn every_code_is_two_lowercase_letters() {
        assert!(LOCALE_CODES
            .iter()
            .all(|code| code.len() == 2 && code.bytes().all(|b| b.is_ascii_lowercase())));
    }

    #[test]
    fn accepts_known_codes() {
        assert!(is_locale_code("en"));
        assert!(is_locale_code("ru"));
        assert!(is_locale_code("zu"));
    }

    #[test]
    fn rejects_everything_else() {
        assert!(!is_locale_code("EN"));
        assert!(!is_locale_code("english"));
        assert!(!is_locale_code(""));
        assert!(!is_locale_code("xx"));
        assert!(!is_locale_code(" en"));
    }
}
