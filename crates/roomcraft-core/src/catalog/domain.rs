/// Reduces a retailer link to its bare host.
///
/// Strips a leading `https://` or `http://`, drops everything from the first
/// `/`, then drops leading `www.` labels. Applying it to its own output
/// returns the same string.
pub fn normalize_domain(url: &str) -> &str {
    let without_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);

    let mut host = without_scheme
        .split_once('/')
        .map(|(host, _)| host)
        .unwrap_or(without_scheme);

    while let Some(rest) = host.strip_prefix("www.") {
        host = rest;
    }

    host
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn strips_scheme_path_and_www() {
        assert_eq!(normalize_domain("https://www.kavehome.com/uk/en/p/sofa"), "kavehome.com");
        assert_eq!(normalize_domain("http://heals.com"), "heals.com");
        assert_eq!(normalize_domain("www.rh.com/"), "rh.com");
        assert_eq!(normalize_domain("loaf.com"), "loaf.com");
        assert_eq!(normalize_domain(""), "");
    }

    #[test]
    fn repeated_www_labels_are_all_removed() {
        assert_eq!(normalize_domain("www.www.oka.com"), "oka.com");
    }

    proptest! {
        #[test]
        fn normalization_is_idempotent(input in "(https?://)?(www\\.){0,2}[a-z0-9.:-]{0,12}(/[a-z0-9/._-]{0,10})?") {
            let once = normalize_domain(&input);
            prop_assert_eq!(normalize_domain(once), once);
        }

        #[test]
        fn normalization_is_idempotent_for_arbitrary_text(input in ".*") {
            let once = normalize_domain(&input);
            prop_assert_eq!(normalize_domain(once), once);
        }
    }
}
