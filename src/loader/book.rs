use super::{Fragments, LoaderField};
use crate::extract::{
    clean_text, extract_first_publish_year, extract_num_pages, extract_publish_dates,
    extract_rating_histogram, filter_asin, filter_isbn10, filter_isbn13, parse_count,
    parse_rating,
};
use crate::record::Book;

/// Fields of a [`Book`] that are filled from page fragments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookField {
    Title,
    Author,
    NumRatings,
    NumReviews,
    AvgRating,
    NumPages,
    Language,
    PublishDates,
    OriginalPublishYear,
    Isbn,
    Isbn13,
    Asin,
    Series,
    Awards,
    Places,
    Characters,
    Genres,
    RatingHistogram,
}

impl LoaderField for BookField {
    fn name(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Author => "author",
            Self::NumRatings => "num_ratings",
            Self::NumReviews => "num_reviews",
            Self::AvgRating => "avg_rating",
            Self::NumPages => "num_pages",
            Self::Language => "language",
            Self::PublishDates => "publish_dates",
            Self::OriginalPublishYear => "original_publish_year",
            Self::Isbn => "isbn",
            Self::Isbn13 => "isbn13",
            Self::Asin => "asin",
            Self::Series => "series",
            Self::Awards => "awards",
            Self::Places => "places",
            Self::Characters => "characters",
            Self::Genres => "genres",
            Self::RatingHistogram => "rating_histogram",
        }
    }
}

/// Assembles a [`Book`] from fragments
#[derive(Debug, Clone)]
pub struct BookLoader {
    url: String,
    fragments: Fragments<BookField>,
}

impl BookLoader {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            fragments: Fragments::new(),
        }
    }

    /// Appends fragments for one field; repeated calls merge in order
    pub fn add<I, S>(&mut self, field: BookField, fragments: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fragments.add(field, fragments);
    }

    /// Runs every field's transform and reduction
    pub fn load(self) -> Book {
        use BookField::*;
        let f = &self.fragments;

        let mut book = Book::new(self.url.clone());

        book.title = f.first(Title, clean_text);
        book.author = f.first(Author, clean_text);

        book.num_ratings = f.first(NumRatings, parse_count);
        book.num_reviews = f.first(NumReviews, parse_count);
        book.avg_rating = f.first(AvgRating, parse_rating);
        book.num_pages = f.first(NumPages, extract_num_pages);

        book.language = f.first(Language, clean_text);
        // Whole-list transform: the "published" filter looks at every line
        book.publish_dates = extract_publish_dates(f.get(PublishDates))
            .into_iter()
            .flatten()
            .collect();
        book.original_publish_year = f.first(OriginalPublishYear, extract_first_publish_year);

        book.isbn = f.first(Isbn, |raw| filter_isbn10(raw.trim()));
        book.isbn13 = f.first(Isbn13, |raw| filter_isbn13(raw.trim()));
        book.asin = f.first(Asin, filter_asin);

        book.series = f.first(Series, clean_text);

        book.awards = f.list(Awards, clean_text);
        book.places = f.list(Places, clean_text);
        book.characters = f.list(Characters, clean_text);
        book.genres = f.set(Genres, clean_text);

        book.rating_histogram = f.first(RatingHistogram, extract_rating_histogram);

        book
    }
}
