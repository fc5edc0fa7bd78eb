use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Intent display names the agent is configured with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Intent {
    GenreRecommendation,
    SimilarBooks,
    BookInformation,
    TopRated,
    MultiCriteria,
    AuthorWorks,
    ReadingLevelInput,
    LengthInput,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown intent `{0}`")]
pub struct UnknownIntent(pub String);

impl Intent {
    pub const ALL: [Intent; 8] = [
        Intent::GenreRecommendation,
        Intent::SimilarBooks,
        Intent::BookInformation,
        Intent::TopRated,
        Intent::MultiCriteria,
        Intent::AuthorWorks,
        Intent::ReadingLevelInput,
        Intent::LengthInput,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::GenreRecommendation => "GenreBasedRecommendationIntent",
            Self::SimilarBooks => "SimilarBookRecommendationIntent",
            Self::BookInformation => "BookInformationIntent",
            Self::TopRated => "TopRatedBooksIntent",
            Self::MultiCriteria => "MultiCriteriaRecommendationIntent",
            Self::AuthorWorks => "AuthorBasedRecommendationIntent",
            Self::ReadingLevelInput => "ReadingLevelInputIntent",
            Self::LengthInput => "LengthInputIntent",
        }
    }
}

impl FromStr for Intent {
    type Err = UnknownIntent;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|intent| intent.as_str() == value)
            .ok_or_else(|| UnknownIntent(value.to_owned()))
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
