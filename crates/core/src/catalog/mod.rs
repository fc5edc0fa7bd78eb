//! Recommendation catalog: the canned text the handlers answer with, plus the
//! keyword classifiers that pick an entry for a free-text slot value.
//!
//! The catalog is a TOML document. One is compiled into the binary; an
//! operator can point `catalog.path` at a replacement. Either way it is
//! validated once at load, so lookups never miss at request time.

pub mod classifier;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use classifier::{Classification, Classifier, Rule};

const EMBEDDED_CATALOG: &str = include_str!("../../data/catalog.toml");

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("could not read catalog `{path}`: {message}")]
    Read { path: String, message: String },
    #[error("could not parse catalog `{origin}`: {message}")]
    Parse { origin: String, message: String },
    #[error("catalog is missing classifier `{0}`")]
    MissingClassifier(String),
    #[error("catalog defines unknown classifier `{0}`")]
    UnknownClassifier(String),
    #[error("classifier `{classifier}` has no fallback category")]
    MissingFallback { classifier: String },
    #[error("classifier `{classifier}` lists category `{category}` more than once")]
    DuplicateCategory { classifier: String, category: String },
    #[error("classifier `{classifier}` rule `{category}` has no keywords")]
    EmptyRule { classifier: String, category: String },
    #[error("catalog table `{table}` has no entry for category `{category}`")]
    MissingEntry { table: String, category: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClassifierKind {
    Genre,
    CriteriaGenre,
    Length,
    Title,
    Book,
    Author,
}

impl ClassifierKind {
    pub const ALL: [ClassifierKind; 6] = [
        ClassifierKind::Genre,
        ClassifierKind::CriteriaGenre,
        ClassifierKind::Length,
        ClassifierKind::Title,
        ClassifierKind::Book,
        ClassifierKind::Author,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Genre => "genre",
            Self::CriteriaGenre => "criteria_genre",
            Self::Length => "length",
            Self::Title => "title",
            Self::Book => "book",
            Self::Author => "author",
        }
    }
}

/// Single-key lookup tables and the classifier that selects their rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Table {
    GenrePicks,
    TopRated,
    SimilarBooks,
    BookDetails,
    AuthorWorks,
}

impl Table {
    pub const ALL: [Table; 5] =
        [Table::GenrePicks, Table::TopRated, Table::SimilarBooks, Table::BookDetails, Table::AuthorWorks];

    pub fn key(self) -> &'static str {
        match self {
            Self::GenrePicks => "genre_picks",
            Self::TopRated => "top_rated",
            Self::SimilarBooks => "similar_books",
            Self::BookDetails => "book_details",
            Self::AuthorWorks => "author_works",
        }
    }

    pub fn classifier(self) -> ClassifierKind {
        match self {
            Self::GenrePicks | Self::TopRated => ClassifierKind::Genre,
            Self::SimilarBooks => ClassifierKind::Title,
            Self::BookDetails => ClassifierKind::Book,
            Self::AuthorWorks => ClassifierKind::Author,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pick<'a> {
    pub category: &'a str,
    pub text: &'a str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CriteriaPick<'a> {
    pub genre_category: &'a str,
    pub length_category: &'a str,
    pub text: &'a str,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClassifierSummary {
    pub name: String,
    pub rules: usize,
    pub fallback: String,
    pub categories: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CatalogSummary {
    pub classifiers: Vec<ClassifierSummary>,
    pub tables: BTreeMap<String, usize>,
}

#[derive(Clone, Debug)]
pub struct Catalog {
    genre: Classifier,
    criteria_genre: Classifier,
    length: Classifier,
    title: Classifier,
    book: Classifier,
    author: Classifier,
    genre_picks: BTreeMap<String, String>,
    top_rated: BTreeMap<String, String>,
    similar_books: BTreeMap<String, String>,
    book_details: BTreeMap<String, String>,
    author_works: BTreeMap<String, String>,
    criteria_picks: BTreeMap<String, BTreeMap<String, String>>,
}

impl Catalog {
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_toml_str(EMBEDDED_CATALOG, "<embedded>")
    }

    /// Loads the catalog at `path`, or the embedded one when no path is set.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => Self::from_path(path),
            None => Self::embedded(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path).map_err(|error| CatalogError::Read {
            path: path.display().to_string(),
            message: error.to_string(),
        })?;
        Self::from_toml_str(&raw, &path.display().to_string())
    }

    pub fn from_toml_str(raw: &str, origin: &str) -> Result<Self, CatalogError> {
        let file = toml::from_str::<CatalogFile>(raw).map_err(|error| CatalogError::Parse {
            origin: origin.to_owned(),
            message: error.to_string(),
        })?;

        let mut classifiers = file.classifiers;
        let mut take = |kind: ClassifierKind| -> Result<Classifier, CatalogError> {
            let entry = classifiers
                .remove(kind.key())
                .ok_or_else(|| CatalogError::MissingClassifier(kind.key().to_owned()))?;
            Classifier::new(kind.key(), entry.rules, entry.fallback)
        };

        let catalog = Self {
            genre: take(ClassifierKind::Genre)?,
            criteria_genre: take(ClassifierKind::CriteriaGenre)?,
            length: take(ClassifierKind::Length)?,
            title: take(ClassifierKind::Title)?,
            book: take(ClassifierKind::Book)?,
            author: take(ClassifierKind::Author)?,
            genre_picks: file.genre_picks,
            top_rated: file.top_rated,
            similar_books: file.similar_books,
            book_details: file.book_details,
            author_works: file.author_works,
            criteria_picks: file.criteria_picks,
        };

        if let Some(unknown) = classifiers.into_keys().next() {
            return Err(CatalogError::UnknownClassifier(unknown));
        }

        catalog.validate()?;
        Ok(catalog)
    }

    pub fn classifier(&self, kind: ClassifierKind) -> &Classifier {
        match kind {
            ClassifierKind::Genre => &self.genre,
            ClassifierKind::CriteriaGenre => &self.criteria_genre,
            ClassifierKind::Length => &self.length,
            ClassifierKind::Title => &self.title,
            ClassifierKind::Book => &self.book,
            ClassifierKind::Author => &self.author,
        }
    }

    fn table(&self, table: Table) -> &BTreeMap<String, String> {
        match table {
            Table::GenrePicks => &self.genre_picks,
            Table::TopRated => &self.top_rated,
            Table::SimilarBooks => &self.similar_books,
            Table::BookDetails => &self.book_details,
            Table::AuthorWorks => &self.author_works,
        }
    }

    pub fn pick(&self, table: Table, value: &str) -> Pick<'_> {
        let category = self.classifier(table.classifier()).classify(value).category;
        Pick { category, text: entry(self.table(table), category) }
    }

    pub fn criteria_pick(&self, genre: &str, length: &str) -> CriteriaPick<'_> {
        let genre_category = self.criteria_genre.classify(genre).category;
        let length_category = self.length.classify(length).category;
        let text = self
            .criteria_picks
            .get(genre_category)
            .map(|row| entry(row, length_category))
            .unwrap_or_default();

        CriteriaPick { genre_category, length_category, text }
    }

    /// The top-rated list used when no genre is given: the genre fallback row.
    pub fn all_time_top_rated(&self) -> &str {
        entry(&self.top_rated, self.genre.fallback())
    }

    pub fn summary(&self) -> CatalogSummary {
        let classifiers = ClassifierKind::ALL
            .into_iter()
            .map(|kind| {
                let classifier = self.classifier(kind);
                ClassifierSummary {
                    name: classifier.name().to_owned(),
                    rules: classifier.rules().len(),
                    fallback: classifier.fallback().to_owned(),
                    categories: classifier.categories().into_iter().map(str::to_owned).collect(),
                }
            })
            .collect();

        let mut tables = Table::ALL
            .into_iter()
            .map(|table| (table.key().to_owned(), self.table(table).len()))
            .collect::<BTreeMap<_, _>>();
        tables.insert(
            "criteria_picks".to_owned(),
            self.criteria_picks.values().map(BTreeMap::len).sum(),
        );

        CatalogSummary { classifiers, tables }
    }

    fn validate(&self) -> Result<(), CatalogError> {
        for table in Table::ALL {
            let rows = self.table(table);
            for category in self.classifier(table.classifier()).categories() {
                if !rows.contains_key(category) {
                    return Err(CatalogError::MissingEntry {
                        table: table.key().to_owned(),
                        category: category.to_owned(),
                    });
                }
            }
        }

        for genre in self.criteria_genre.categories() {
            let row = self.criteria_picks.get(genre).ok_or_else(|| CatalogError::MissingEntry {
                table: "criteria_picks".to_owned(),
                category: genre.to_owned(),
            })?;
            for length in self.length.categories() {
                if !row.contains_key(length) {
                    return Err(CatalogError::MissingEntry {
                        table: format!("criteria_picks.{genre}"),
                        category: length.to_owned(),
                    });
                }
            }
        }

        Ok(())
    }
}

fn entry<'a>(rows: &'a BTreeMap<String, String>, category: &str) -> &'a str {
    rows.get(category).map(String::as_str).unwrap_or_default()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    classifiers: BTreeMap<String, ClassifierFile>,
    genre_picks: BTreeMap<String, String>,
    top_rated: BTreeMap<String, String>,
    similar_books: BTreeMap<String, String>,
    book_details: BTreeMap<String, String>,
    author_works: BTreeMap<String, String>,
    criteria_picks: BTreeMap<String, BTreeMap<String, String>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ClassifierFile {
    fallback: String,
    #[serde(default)]
    rules: Vec<Rule>,
}
