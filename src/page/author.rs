use super::{Lookup, Page, PageParser};
use crate::crawl::{Emission, FollowUp, ParserRole};
use crate::loader::{AuthorField, AuthorLoader};

/// URLs containing this are blog listings and are never parsed
pub const BLOG_LISTING_MARKER: &str = "/blog?page=";

/// Path prefix of pages that carry an author record
const AUTHOR_PATH_PREFIX: &str = "/author/show/";

const INFLUENCE_LINK_SELECTOR: &str = r#"div.dataItem>span>a[href*="/author/show"]"#;
const SIMILAR_AUTHORS_SELECTOR: &str = r#"a[href*="/author/similar"]"#;
const ANY_AUTHOR_LINK_SELECTOR: &str = r#"a[href*="/author/show"]"#;

const AUTHOR_FIELD_MAP: &[(AuthorField, Lookup)] = &[
    (AuthorField::Name, Lookup::text(r#"h1.authorName>span[itemprop="name"]"#)),
    (AuthorField::BirthDate, Lookup::text(r#"div.dataItem[itemprop="birthDate"]"#)),
    (AuthorField::DeathDate, Lookup::text(r#"div.dataItem[itemprop="deathDate"]"#)),
    (AuthorField::Genres, Lookup::text(r#"div.dataItem>a[href*="/genres/"]"#)),
    (AuthorField::Influences, Lookup::text(INFLUENCE_LINK_SELECTOR)),
    (AuthorField::AvgRating, Lookup::text(r#"span.average[itemprop="ratingValue"]"#)),
    (AuthorField::NumReviews, Lookup::attr(r#"span[itemprop="reviewCount"]"#, "content")),
    (AuthorField::NumRatings, Lookup::attr(r#"span[itemprop="ratingCount"]"#, "content")),
    (AuthorField::About, Lookup::html("div.aboutAuthorInfo")),
];

/// Parser for author pages
///
/// With author-crawl off, a page yields at most its own record. With it on,
/// the parser also follows influences, the similar-authors page and every
/// other author link on the page, so it can be seeded from any page of the
/// site.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorParser {
    author_crawl: bool,
}

impl AuthorParser {
    pub fn new(author_crawl: bool) -> Self {
        Self { author_crawl }
    }

    fn follow_ups(&self, page: &Page) -> Vec<Emission> {
        let influences = page.links(INFLUENCE_LINK_SELECTOR);
        let similar = page.first_link(SIMILAR_AUTHORS_SELECTOR);
        let everyone = page.links(ANY_AUTHOR_LINK_SELECTOR);

        tracing::trace!(
            "Author page {}: {} influences, similar page: {}, {} author links",
            page.url(),
            influences.len(),
            similar.is_some(),
            everyone.len()
        );

        influences
            .into_iter()
            .chain(similar)
            .chain(everyone)
            .map(|url| Emission::FollowUp(FollowUp::new(url, ParserRole::Author)))
            .collect()
    }
}

/// Returns true for URLs that must produce no output at all
pub fn is_blog_listing(url: &str) -> bool {
    url.contains(BLOG_LISTING_MARKER)
}

impl PageParser for AuthorParser {
    fn role(&self) -> ParserRole {
        ParserRole::Author
    }

    fn parse(&self, page: &Page) -> Vec<Emission> {
        if is_blog_listing(page.url().as_str()) {
            tracing::debug!("Skipping blog listing {}", page.url());
            return Vec::new();
        }

        let mut emissions = Vec::new();

        if page.url().path().starts_with(AUTHOR_PATH_PREFIX) {
            let mut loader = AuthorLoader::new(page.url().as_str());
            for (field, lookup) in AUTHOR_FIELD_MAP {
                loader.add(*field, page.fragments(lookup));
            }
            emissions.push(Emission::Record(loader.load().into()));
        }

        if self.author_crawl {
            emissions.extend(self.follow_ups(page));
        }

        emissions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use url::Url;

    const AUTHOR_URL: &str = "https://www.goodreads.com/author/show/1825.Harper_Lee";

    const AUTHOR_HTML: &str = r#"
<html><body>
  <h1 class="authorName"><span itemprop="name">Harper Lee</span></h1>
  <div class="rightContainer">
    <div class="dataTitle">Born</div>
    <div class="dataItem" itemprop="birthDate">April 28, 1926</div>
    <div class="dataTitle">Died</div>
    <div class="dataItem" itemprop="deathDate">February 19, 2016</div>
    <div class="dataTitle">Genre</div>
    <div class="dataItem">
      <a href="/genres/fiction">Fiction</a>, <a href="/genres/classics">Classics</a>, <a href="/genres/fiction">Fiction</a>
    </div>
    <div class="dataTitle">Influences</div>
    <div class="dataItem">
      <span><a href="/author/show/431149.Truman_Capote">Truman Capote</a>, <a href="/author/show/3535.William_Faulkner">William Faulkner</a></span>
    </div>
    <div class="aboutAuthorInfo">
      <a href="/author/edit/1825">edit data</a>
      <span id="freeText1825">Nelle Harper Lee was an American novelist.<br>
      She won the Pulitzer Prize in 1961.</span>
    </div>
  </div>
  <div class="hreview-aggregate">
    <span class="average" itemprop="ratingValue">4.24</span>
    <span itemprop="ratingCount" content="5301234">5,301,234 ratings</span>
    <span itemprop="reviewCount" content="112233">112,233 reviews</span>
  </div>
  <a href="/author/similar/1825.Harper_Lee">Similar authors</a>
  <a href="/author/show/1077326.J_K_Rowling">J.K. Rowling</a>
</body></html>
"#;

    fn parse(url: &str, html: &str, author_crawl: bool) -> Vec<Emission> {
        let page = Page::new(Url::parse(url).unwrap(), html);
        AuthorParser::new(author_crawl).parse(&page)
    }

    fn follow_up_urls(emissions: &[Emission]) -> Vec<String> {
        emissions
            .iter()
            .filter_map(Emission::as_follow_up)
            .map(|f| f.url.to_string())
            .collect()
    }

    #[test]
    fn test_author_record_fields() {
        let emissions = parse(AUTHOR_URL, AUTHOR_HTML, false);
        let author = match &emissions[0] {
            Emission::Record(Record::Author(author)) => author,
            other => panic!("expected an author, got {:?}", other),
        };

        assert_eq!(author.url(), AUTHOR_URL);
        assert_eq!(author.name.as_deref(), Some("Harper Lee"));
        assert_eq!(
            author.birth_date.map(|d| d.to_string()).as_deref(),
            Some("1926-04-28 00:00:00")
        );
        assert_eq!(
            author.death_date.map(|d| d.to_string()).as_deref(),
            Some("2016-02-19 00:00:00")
        );
        assert_eq!(author.genres.len(), 2);
        assert!(author.influences.contains("Truman Capote"));
        assert!(author.influences.contains("William Faulkner"));
        assert_eq!(author.avg_rating, Some(4.24));
        assert_eq!(author.num_ratings, Some(5301234));
        assert_eq!(author.num_reviews, Some(112233));
        assert_eq!(
            author.about.as_deref(),
            Some("Nelle Harper Lee was an American novelist.\nShe won the Pulitzer Prize in 1961.")
        );
    }

    #[test]
    fn test_author_crawl_disabled_emits_only_the_record() {
        let emissions = parse(AUTHOR_URL, AUTHOR_HTML, false);
        assert_eq!(emissions.len(), 1);
        assert!(emissions[0].as_record().is_some());
    }

    #[test]
    fn test_author_crawl_enabled_follows_author_links() {
        let emissions = parse(AUTHOR_URL, AUTHOR_HTML, true);
        assert!(emissions[0].as_record().is_some());
        assert!(emissions[1..]
            .iter()
            .all(|e| e.as_follow_up().map(|f| f.role) == Some(ParserRole::Author)));

        assert_eq!(
            follow_up_urls(&emissions),
            vec![
                // influences
                "https://www.goodreads.com/author/show/431149.Truman_Capote",
                "https://www.goodreads.com/author/show/3535.William_Faulkner",
                // similar authors page
                "https://www.goodreads.com/author/similar/1825.Harper_Lee",
                // every author link on the page
                "https://www.goodreads.com/author/show/431149.Truman_Capote",
                "https://www.goodreads.com/author/show/3535.William_Faulkner",
                "https://www.goodreads.com/author/show/1077326.J_K_Rowling",
            ]
        );
    }

    #[test]
    fn test_blog_listing_yields_nothing() {
        let url = "https://www.goodreads.com/author/show/1825.Harper_Lee/blog?page=2";
        assert!(parse(url, AUTHOR_HTML, true).is_empty());
        assert!(parse(url, AUTHOR_HTML, false).is_empty());
    }

    #[test]
    fn test_non_author_page_only_contributes_links() {
        let emissions = parse("https://www.goodreads.com/", AUTHOR_HTML, true);
        assert!(emissions.iter().all(|e| e.as_record().is_none()));
        assert_eq!(follow_up_urls(&emissions).len(), 6);

        assert!(parse("https://www.goodreads.com/", AUTHOR_HTML, false).is_empty());
    }

    #[test]
    fn test_missing_similar_link_is_skipped() {
        let html = r#"<a href="/author/show/9.Someone">Someone</a>"#;
        let emissions = parse(AUTHOR_URL, html, true);
        assert_eq!(
            follow_up_urls(&emissions),
            vec!["https://www.goodreads.com/author/show/9.Someone"]
        );
    }
}
