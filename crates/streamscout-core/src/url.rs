//! URL helper functions
//!
//! Builds the query URLs for each discovery source and the URLs derived
//! from a candidate host.

/// Builds the crt.sh JSON query URL for a keyword
///
/// The keyword is wrapped in `%` wildcards so crt.sh matches it anywhere in
/// the certificate name.
///
/// # Example
/// ```
/// use streamscout_core::url::build_crtsh_url;
/// let url = build_crtsh_url("https://crt.sh", "zirvedesin");
/// assert_eq!(url, "https://crt.sh/?q=%25zirvedesin%25&output=json");
/// ```
pub fn build_crtsh_url(base: &str, keyword: &str) -> String {
    let query = urlencoding::encode(&format!("%{}%", keyword)).into_owned();
    format!("{}/?q={}&output=json", base.trim_end_matches('/'), query)
}

/// Builds the certspotter issuance query URL for an apex domain
///
/// # Example
/// ```
/// use streamscout_core::url::build_certspotter_url;
/// let url = build_certspotter_url("https://api.certspotter.com", "zirvedesin.sbs");
/// assert_eq!(
///     url,
///     "https://api.certspotter.com/v1/issuances?domain=zirvedesin.sbs&include_subdomains=true&expand=dns_names"
/// );
/// ```
pub fn build_certspotter_url(base: &str, domain: &str) -> String {
    format!(
        "{}/v1/issuances?domain={}&include_subdomains=true&expand=dns_names",
        base.trim_end_matches('/'),
        urlencoding::encode(domain)
    )
}

/// Builds the RapidDNS search page URL for a keyword
///
/// # Example
/// ```
/// use streamscout_core::url::build_rapiddns_url;
/// let url = build_rapiddns_url("https://rapiddns.io", "zirvedesin");
/// assert_eq!(url, "https://rapiddns.io/s/zirvedesin?full=1");
/// ```
pub fn build_rapiddns_url(base: &str, keyword: &str) -> String {
    format!(
        "{}/s/{}?full=1",
        base.trim_end_matches('/'),
        urlencoding::encode(keyword)
    )
}

/// Fills the `{n}` placeholder of a numbered page template
///
/// # Example
/// ```
/// use streamscout_core::url::build_page_url;
/// assert_eq!(build_page_url("https://dengetv{n}.live/", 67), "https://dengetv67.live/");
/// ```
pub fn build_page_url(template: &str, number: u32) -> String {
    template.replace("{n}", &number.to_string())
}

/// Builds the probe URL for a host under a scheme
///
/// # Example
/// ```
/// use streamscout_core::url::build_probe_url;
/// let url = build_probe_url("https", "kodiaq.zirvedesin24.sbs", "/yayinzirve.m3u8");
/// assert_eq!(url, "https://kodiaq.zirvedesin24.sbs/yayinzirve.m3u8");
/// ```
pub fn build_probe_url(scheme: &str, host: &str, path: &str) -> String {
    format!("{}://{}{}", scheme, host, path)
}

/// Builds the base stream URL (with trailing slash) for a validated host
///
/// # Example
/// ```
/// use streamscout_core::url::build_base_url;
/// assert_eq!(build_base_url("http", "127.0.0.1:8080"), "http://127.0.0.1:8080/");
/// ```
pub fn build_base_url(scheme: &str, host: &str) -> String {
    format!("{}://{}/", scheme, host)
}

/// Joins a base stream URL and a channel file with exactly one slash
///
/// # Example
/// ```
/// use streamscout_core::url::join_stream_url;
/// assert_eq!(join_stream_url("https://x.example/", "a.m3u8"), "https://x.example/a.m3u8");
/// assert_eq!(join_stream_url("https://x.example", "/a.m3u8"), "https://x.example/a.m3u8");
/// ```
pub fn join_stream_url(base: &str, file: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        file.trim_start_matches('/')
    )
}
