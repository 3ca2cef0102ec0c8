//! Localized string lookup and locale-derived SEO metadata.

use std::collections::BTreeMap;

use otl_api_types::LocalizedString;

pub const FALLBACK_LOCALE: &str = "en";
pub const X_DEFAULT: &str = "x-default";

/// Region used for Open Graph when a locale carries none.
const OG_DEFAULT_REGIONS: &[(&str, &str)] = &[
    ("da", "DK"),
    ("de", "DE"),
    ("en", "US"),
    ("es", "ES"),
    ("fr", "FR"),
    ("it", "IT"),
    ("ja", "JP"),
    ("ko", "KR"),
    ("nb", "NO"),
    ("nl", "NL"),
    ("pl", "PL"),
    ("pt", "BR"),
    ("sv", "SE"),
    ("zh", "CN"),
];

/// Exact locale, then the fallback locale. Empty values count as missing.
pub fn resolve_localized<'a>(value: Option<&'a LocalizedString>, locale: &str) -> Option<&'a str> {
    match value? {
        LocalizedString::Plain(text) => non_empty(text),
        LocalizedString::Localized(values) => translation(values, locale)
            .or_else(|| translation(values, FALLBACK_LOCALE)),
    }
}

/// Like [`resolve_localized`], but falls back to any translation and finally `""`.
pub fn localized_string_or_first(value: Option<&LocalizedString>, locale: &str) -> String {
    if let Some(text) = resolve_localized(value, locale) {
        return text.to_string();
    }
    match value {
        Some(LocalizedString::Localized(values)) => values
            .values()
            .find_map(|text| text.as_deref().and_then(non_empty))
            .map(str::to_string)
            .unwrap_or_default(),
        _ => String::new(),
    }
}

/// `de-at` becomes `de_AT`; a bare language gets its usual region.
pub fn locale_to_og_format(locale: &str) -> String {
    let mut parts = locale.split(['-', '_']).filter(|part| !part.is_empty());
    let language = parts.next().unwrap_or(FALLBACK_LOCALE).to_ascii_lowercase();

    let region = match parts.next() {
        Some(region) => region.to_ascii_uppercase(),
        None => OG_DEFAULT_REGIONS
            .iter()
            .find(|(lang, _)| *lang == language)
            .map(|(_, region)| (*region).to_string())
            .unwrap_or_else(|| language.to_ascii_uppercase()),
    };

    format!("{language}_{region}")
}

/// Alternate URL of `path` for every supported locale, plus `x-default`.
///
/// The default locale is served without a prefix; every other locale under
/// `/{locale}`. `site_url` must not end with `/`.
pub fn build_hreflang_alternates(
    site_url: &str,
    path: &str,
    supported_locales: &[String],
    default_locale: &str,
) -> BTreeMap<String, String> {
    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };

    let mut alternates = BTreeMap::new();
    for locale in supported_locales {
        alternates.insert(
            locale.clone(),
            localized_url(site_url, &path, locale, default_locale),
        );
    }
    alternates.insert(
        X_DEFAULT.to_string(),
        localized_url(site_url, &path, default_locale, default_locale),
    );
    alternates
}

fn localized_url(site_url: &str, path: &str, locale: &str, default_locale: &str) -> String {
    if locale.eq_ignore_ascii_case(default_locale) {
        return format!("{site_url}{path}");
    }
    if path == "/" {
        format!("{site_url}/{locale}")
    } else {
        format!("{site_url}/{locale}{path}")
    }
}

fn translation<'a>(values: &'a BTreeMap<String, Option<String>>, locale: &str) -> Option<&'a str> {
    values.get(locale)?.as_deref().and_then(non_empty)
}

fn non_empty(text: &str) -> Option<&str> {
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn localized(pairs: &[(&str, &str)]) -> LocalizedString {
        LocalizedString::Localized(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), Some(v.to_string())))
                .collect(),
        )
    }

    #[test]
    fn plain_strings_resolve_to_themselves() {
        let value = LocalizedString::from("Acme");
        assert_eq!(resolve_localized(Some(&value), "de"), Some("Acme"));
        assert_eq!(resolve_localized(Some(&LocalizedString::from("")), "de"), None);
        assert_eq!(resolve_localized(None, "de"), None);
    }

    #[test]
    fn maps_prefer_exact_locale_then_english() {
        let value = localized(&[("en", "Shop"), ("de", "Laden")]);
        assert_eq!(resolve_localized(Some(&value), "de"), Some("Laden"));
        assert_eq!(resolve_localized(Some(&value), "fr"), Some("Shop"));

        let french_only = localized(&[("fr", "Boutique")]);
        assert_eq!(resolve_localized(Some(&french_only), "de"), None);
    }

    #[test]
    fn or_first_falls_back_to_any_translation() {
        let french_only = localized(&[("fr", "Boutique")]);
        assert_eq!(localized_string_or_first(Some(&french_only), "de"), "Boutique");
        assert_eq!(localized_string_or_first(None, "de"), "");
        assert_eq!(localized_string_or_first(Some(&localized(&[])), "de"), "");
    }

    #[test]
    fn null_translations_count_as_missing() {
        let value: LocalizedString =
            serde_json::from_str(r#"{"de":null,"fr":"Boutique","en":null}"#).expect("map");

        assert_eq!(resolve_localized(Some(&value), "de"), None);
        assert_eq!(localized_string_or_first(Some(&value), "de"), "Boutique");

        let with_english: LocalizedString =
            serde_json::from_str(r#"{"en":"Shop","de":null}"#).expect("map");
        assert_eq!(resolve_localized(Some(&with_english), "de"), Some("Shop"));
    }

    #[test]
    fn og_locale_formats() {
        assert_eq!(locale_to_og_format("de-at"), "de_AT");
        assert_eq!(locale_to_og_format("en_gb"), "en_GB");
        assert_eq!(locale_to_og_format("de"), "de_DE");
        assert_eq!(locale_to_og_format("en"), "en_US");
        assert_eq!(locale_to_og_format("pt"), "pt_BR");
        assert_eq!(locale_to_og_format("fi"), "fi_FI");
    }

    #[test]
    fn hreflang_prefixes_non_default_locales() {
        let supported = vec!["en".to_string(), "de".to_string()];
        let alternates =
            build_hreflang_alternates("https://acme.com", "/about", &supported, "en");

        assert_eq!(alternates["en"], "https://acme.com/about");
        assert_eq!(alternates["de"], "https://acme.com/de/about");
        assert_eq!(alternates[X_DEFAULT], "https://acme.com/about");
        assert_eq!(alternates.len(), 3);
    }

    #[test]
    fn hreflang_root_path_collapses_for_prefixed_locales() {
        let supported = vec!["en".to_string(), "de".to_string()];
        let alternates = build_hreflang_alternates("https://acme.com", "/", &supported, "en");

        assert_eq!(alternates["en"], "https://acme.com/");
        assert_eq!(alternates["de"], "https://acme.com/de");
    }
}
