use super::{Lookup, Page, PageParser};
use crate::crawl::{Emission, FollowUp, ParserRole};
use crate::loader::{BookField, BookLoader};

/// Primary author anchor on a book page
const AUTHOR_LINK_SELECTOR: &str = "a.authorName";

/// Where each book field is read from
///
/// Fields listed more than once draw fragments from every lookup, merged in
/// table order before reduction.
pub const BOOK_FIELD_MAP: &[(BookField, Lookup)] = &[
    (BookField::Title, Lookup::text("#bookTitle")),
    (BookField::Author, Lookup::text("a.authorName>span")),
    (BookField::NumRatings, Lookup::attr("[itemprop=ratingCount]", "content")),
    (BookField::NumReviews, Lookup::attr("[itemprop=reviewCount]", "content")),
    (BookField::AvgRating, Lookup::text("span[itemprop=ratingValue]")),
    (BookField::NumPages, Lookup::text("span[itemprop=numberOfPages]")),
    (BookField::Language, Lookup::text("div[itemprop=inLanguage]")),
    (BookField::PublishDates, Lookup::text("div.row")),
    (BookField::PublishDates, Lookup::text("nobr.greyText")),
    (BookField::OriginalPublishYear, Lookup::text("nobr.greyText")),
    (
        BookField::Genres,
        Lookup::text(r#"div.left>a.bookPageGenreLink[href*="/genres/"]"#),
    ),
    (BookField::Awards, Lookup::text("a.award")),
    (BookField::Characters, Lookup::text(r#"a[href*="/characters/"]"#)),
    (BookField::Places, Lookup::text("div.infoBoxRowItem>a[href*=places]")),
    (BookField::Series, Lookup::text(r#"div.infoBoxRowItem>a[href*="/series/"]"#)),
    (BookField::Asin, Lookup::text("div.infoBoxRowItem[itemprop=isbn]")),
    (BookField::Isbn, Lookup::text("div.infoBoxRowItem[itemprop=isbn]")),
    (BookField::Isbn, Lookup::text("span[itemprop=isbn]")),
    (BookField::Isbn, Lookup::text("div.infoBoxRowItem")),
    (BookField::Isbn13, Lookup::text("div.infoBoxRowItem[itemprop=isbn]")),
    (BookField::Isbn13, Lookup::text("span[itemprop=isbn]")),
    (BookField::Isbn13, Lookup::text("div.infoBoxRowItem")),
    (BookField::RatingHistogram, Lookup::text(r#"script[type*="protovis"]"#)),
];

/// Parser for book pages
///
/// Emits the book first, then at most one author follow-up taken from the
/// page's primary author link.
#[derive(Debug, Clone, Copy, Default)]
pub struct BookParser;

impl PageParser for BookParser {
    fn role(&self) -> ParserRole {
        ParserRole::Book
    }

    fn parse(&self, page: &Page) -> Vec<Emission> {
        let mut loader = BookLoader::new(page.url().as_str());
        for (field, lookup) in BOOK_FIELD_MAP {
            loader.add(*field, page.fragments(lookup));
        }
        let book = loader.load();

        tracing::debug!(
            "Book page {} -> {:?}",
            page.url(),
            book.title.as_deref().unwrap_or("<untitled>")
        );

        let mut emissions = vec![Emission::Record(book.into())];

        match page.first_link(AUTHOR_LINK_SELECTOR) {
            Some(url) => emissions.push(Emission::FollowUp(FollowUp::new(url, ParserRole::Author))),
            None => tracing::debug!("Book page {} has no author link", page.url()),
        }

        emissions
    }
}
