use super::{Fragments, LoaderField};
use crate::extract::{
    clean_text, parse_count, parse_flexible_date, parse_rating, strip_tags_and_boilerplate,
};
use crate::record::Author;

/// Fields of an [`Author`] that are filled from page fragments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthorField {
    Name,
    BirthDate,
    DeathDate,
    AvgRating,
    NumRatings,
    NumReviews,
    Genres,
    Influences,
    About,
}

impl LoaderField for AuthorField {
    fn name(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::BirthDate => "birth_date",
            Self::DeathDate => "death_date",
            Self::AvgRating => "avg_rating",
            Self::NumRatings => "num_ratings",
            Self::NumReviews => "num_reviews",
            Self::Genres => "genres",
            Self::Influences => "influences",
            Self::About => "about",
        }
    }
}

/// Assembles an [`Author`] from fragments
#[derive(Debug, Clone)]
pub struct AuthorLoader {
    url: String,
    fragments: Fragments<AuthorField>,
}

impl AuthorLoader {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            fragments: Fragments::new(),
        }
    }

    pub fn add<I, S>(&mut self, field: AuthorField, fragments: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fragments.add(field, fragments);
    }

    pub fn load(self) -> Author {
        use AuthorField::*;
        let f = &self.fragments;

        let mut author = Author::new(self.url.clone());

        author.name = f.first(Name, clean_text);
        author.birth_date = f.first(BirthDate, parse_flexible_date);
        author.death_date = f.first(DeathDate, parse_flexible_date);

        author.avg_rating = f.first(AvgRating, parse_rating);
        author.num_ratings = f.first(NumRatings, parse_count);
        author.num_reviews = f.first(NumReviews, parse_count);

        author.genres = f.set(Genres, clean_text);
        author.influences = f.set(Influences, clean_text);

        // Only the first matched block is the biography
        author.about = f
            .get(About)
            .first()
            .map(|html| strip_tags_and_boilerplate(html))
            .filter(|text| !text.is_empty());

        author
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://www.goodreads.com/author/show/1825.Harper_Lee";

    #[test]
    fn test_dates_and_counts() {
        let mut loader = AuthorLoader::new(URL);
        loader.add(AuthorField::Name, ["Harper Lee"]);
        loader.add(AuthorField::BirthDate, ["\n    April 28, 1926\n"]);
        loader.add(AuthorField::DeathDate, ["February 19, 2016"]);
        loader.add(AuthorField::NumRatings, ["5301234"]);
        loader.add(AuthorField::AvgRating, ["4.24"]);

        let author = loader.load();
        assert_eq!(author.url(), URL);
        assert_eq!(author.name.as_deref(), Some("Harper Lee"));
        assert_eq!(
            author.birth_date.map(|d| d.to_string()).as_deref(),
            Some("1926-04-28 00:00:00")
        );
        assert_eq!(
            author.death_date.map(|d| d.to_string()).as_deref(),
            Some("2016-02-19 00:00:00")
        );
        assert_eq!(author.num_ratings, Some(5301234));
        assert_eq!(author.num_reviews, None);
        assert_eq!(author.avg_rating, Some(4.24));
    }

    #[test]
    fn test_influences_are_a_set() {
        let mut loader = AuthorLoader::new(URL);
        loader.add(AuthorField::Influences, ["Truman Capote", "William Faulkner"]);
        loader.add(AuthorField::Influences, ["Truman Capote"]);

        let author = loader.load();
        assert_eq!(author.influences.len(), 2);
        assert!(author.influences.contains("William Faulkner"));
    }

    #[test]
    fn test_about_uses_first_block_only() {
        let mut loader = AuthorLoader::new(URL);
        loader.add(
            AuthorField::About,
            [
                "<div>\n<a>edit data</a>\n<span>Nelle Harper Lee was an American novelist.</span>\n</div>",
                "<div>\nheader\nsecond block\n</div>",
            ],
        );

        let author = loader.load();
        assert_eq!(
            author.about.as_deref(),
            Some("Nelle Harper Lee was an American novelist.")
        );
    }

    #[test]
    fn test_about_with_only_header_is_absent() {
        let mut loader = AuthorLoader::new(URL);
        loader.add(AuthorField::About, ["<div><a>edit data</a></div>"]);
        assert_eq!(loader.load().about, None);
    }
}
