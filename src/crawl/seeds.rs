//! Initial requests for a crawl

use super::{FollowUp, ParserRole};
use crate::config::{Config, CrawlMode};
use url::Url;

/// The requests a configured crawl starts from
///
/// List mode walks `start-page..=end-page` of the configured list; author
/// mode starts from the author seeds.
pub fn initial_requests(config: &Config) -> crate::Result<Vec<FollowUp>> {
    let base = config.base_url()?;

    let requests = match config.crawl.mode {
        CrawlMode::List => list_page_requests(
            &base,
            config.crawl.list_name.as_deref().unwrap_or_default().trim(),
            config.crawl.start_page,
            config.crawl.end_page,
        )?,
        CrawlMode::Author => author_seed_requests(&base)?,
    };

    Ok(requests)
}

/// Builds one list-page request per page number, `start..=end`
///
/// Page URLs follow `{base}/list/show/{list_name}?page={n}`. An empty range
/// (`start > end`) yields no requests.
///
/// # Errors
///
/// Fails only if `base` cannot be joined with the list path.
pub fn list_page_requests(
    base: &Url,
    list_name: &str,
    start_page: u32,
    end_page: u32,
) -> Result<Vec<FollowUp>, url::ParseError> {
    (start_page..=end_page)
        .map(|page_no| {
            let mut url = base.join(&format!("list/show/{}", list_name))?;
            url.set_query(Some(&format!("page={}", page_no)));
            Ok(FollowUp::new(url, ParserRole::List))
        })
        .collect()
}

/// Seeds for a crawl that starts from author pages
///
/// The site root and the "authors on the site" index are both rich in
/// author links; the author parser takes it from there.
pub fn author_seed_requests(base: &Url) -> Result<Vec<FollowUp>, url::ParseError> {
    Ok(vec![
        FollowUp::new(base.clone(), ParserRole::Author),
        FollowUp::new(base.join("author/on_goodreads")?, ParserRole::Author),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://www.goodreads.com").unwrap()
    }

    #[test]
    fn test_inclusive_page_range() {
        let requests = list_page_requests(&base(), "1.Best_Books_Ever", 3, 5).unwrap();
        let urls: Vec<&str> = requests.iter().map(|r| r.url.as_str()).collect();

        assert_eq!(
            urls,
            vec![
                "https://www.goodreads.com/list/show/1.Best_Books_Ever?page=3",
                "https://www.goodreads.com/list/show/1.Best_Books_Ever?page=4",
                "https://www.goodreads.com/list/show/1.Best_Books_Ever?page=5",
            ]
        );
        assert!(requests.iter().all(|r| r.role == ParserRole::List));
    }

    #[test]
    fn test_single_page_and_empty_range() {
        assert_eq!(list_page_requests(&base(), "x", 2, 2).unwrap().len(), 1);
        assert!(list_page_requests(&base(), "x", 3, 2).unwrap().is_empty());
    }

    #[test]
    fn test_base_with_path_prefix() {
        let base = Url::parse("http://127.0.0.1:8080/mirror/").unwrap();
        let requests = list_page_requests(&base, "42", 1, 1).unwrap();
        assert_eq!(
            requests[0].url.as_str(),
            "http://127.0.0.1:8080/mirror/list/show/42?page=1"
        );
    }

    fn config(mode: &str) -> Config {
        toml::from_str(&format!(
            r#"
[site]
base-url = "http://127.0.0.1:9000"

[crawl]
mode = "{}"
list-name = "7.Best_Sci_Fi"
start-page = 2
end-page = 3

[user-agent]
crawler-name = "bibliocrawl"
crawler-version = "0.1"
contact-url = "https://example.com/about"
contact-email = "admin@example.com"

[output]
path = "out.jsonl"
"#,
            mode
        ))
        .unwrap()
    }

    #[test]
    fn test_initial_requests_by_mode() {
        let list = initial_requests(&config("list")).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(
            list[0].url.as_str(),
            "http://127.0.0.1:9000/list/show/7.Best_Sci_Fi?page=2"
        );

        let author = initial_requests(&config("author")).unwrap();
        assert_eq!(author.len(), 2);
        assert!(author.iter().all(|r| r.role == ParserRole::Author));
    }

    #[test]
    fn test_author_seeds() {
        let seeds = author_seed_requests(&base()).unwrap();
        assert_eq!(seeds[0].url.as_str(), "https://www.goodreads.com/");
        assert_eq!(
            seeds[1].url.as_str(),
            "https://www.goodreads.com/author/on_goodreads"
        );
        assert!(seeds.iter().all(|s| s.role == ParserRole::Author));
    }
}
