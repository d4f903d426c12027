use url::form_urlencoded;
use url::Url;

/// Query parameters that never change the page content
const TRACKING_PARAMS: &[&str] = &[
    "fbclid",
    "gclid",
    "mc_eid",
    "ref",
    "from_search",
    "from_srp",
    "qid",
    "rank",
    "ac",
];

/// Computes the visited-set key for a URL
///
/// # Normalization Steps
///
/// 1. Lowercase the host (the `url` crate already does this on parse)
/// 2. Remove dot segments and duplicate slashes from the path
/// 3. Remove a trailing slash (except for root /)
/// 4. Remove the fragment
/// 5. Remove tracking query parameters
/// 6. Sort remaining query parameters by key, keeping their relative order
/// 7. Remove an empty query string
///
/// The scheme and host are otherwise kept as given; `www.` and plain-http
/// mirrors are distinct sites.
///
/// # Examples
///
/// ```
/// use bibliocrawl::url::canonical_key;
/// use url::Url;
///
/// let url = Url::parse("https://www.goodreads.com/book/show/2657.Mockingbird/?from_search=true#reviews").unwrap();
/// assert_eq!(canonical_key(&url), "https://www.goodreads.com/book/show/2657.Mockingbird");
/// ```
pub fn canonical_key(url: &Url) -> String {
    let mut url = url.clone();

    let path = normalize_path(url.path());
    url.set_path(&path);
    url.set_fragment(None);

    if url.query().is_some() {
        let params = filter_and_sort_query_params(&url);
        if params.is_empty() {
            url.set_query(None);
        } else {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(params)
                .finish();
            url.set_query(Some(&query));
        }
    }

    url.into()
}

/// Checks if a query parameter is a tracking parameter
pub fn is_tracking_param(key: &str) -> bool {
    TRACKING_PARAMS.contains(&key) || key.starts_with("utm_")
}

/// Normalizes a URL path by removing dot segments and trailing slashes
fn normalize_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }

    format!("/{}", segments.join("/"))
}

fn filter_and_sort_query_params(url: &Url) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !is_tracking_param(key))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    params.sort_by(|a, b| a.0.cmp(&b.0));
    params
}
