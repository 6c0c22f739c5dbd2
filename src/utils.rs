use url::Url;

/// Readable site name for a URL: first host label, `www.` dropped, capitalized
pub fn site_name(url: &str) -> String {
    let host = Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string));

    let Some(host) = host else {
        return "Unknown Site".to_string();
    };

    let label = host
        .strip_prefix("www.")
        .unwrap_or(&host)
        .split('.')
        .next()
        .unwrap_or_default();

    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => "Unknown Site".to_string(),
    }
}

/// Fill a search query template with the product name
pub fn fill_query(template: &str, product: &str) -> String {
    if template.contains("{product}") {
        template.replace("{product}", product)
    } else {
        format!("{} {}", template, product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_name() {
        assert_eq!(site_name("https://www.techradar.com/reviews/acme"), "Techradar");
        assert_eq!(site_name("https://rtings.com/phone"), "Rtings");
        assert_eq!(site_name("http://forum.example.org/t/1"), "Forum");
    }

    #[test]
    fn test_site_name_without_host() {
        assert_eq!(site_name("not a url"), "Unknown Site");
        assert_eq!(site_name("mailto:a@b.example"), "Unknown Site");
    }

    #[test]
    fn test_fill_query() {
        assert_eq!(fill_query("{product} review", "Acme Phone"), "Acme Phone review");
        assert_eq!(fill_query("review users", "Acme Phone"), "review users Acme Phone");
    }
}
