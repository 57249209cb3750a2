//! Catalog loading and lookup
//!
//! The catalog is an ordered, immutable sequence of [`Book`]s read once at
//! startup from a CSV source. Load failures degrade to an empty catalog so
//! the service always comes up; every query on an empty catalog returns an
//! empty result.

use std::collections::HashSet;
use std::path::Path;

use bookshelf_core::error::GatewayError;
use bookshelf_core::models::Book;
use bookshelf_core::Result;
use tracing::{error, info, warn};
use validator::Validate;

/// Canonical identity key for a recommendation target.
///
/// Similarity lookup and result deduplication both key on title text, not
/// on item id: two catalog entries sharing a title are one recommendation
/// target. Switching to id-based keying is a change to this function alone.
pub fn canonical_key(title: &str) -> &str {
    title
}

/// Accepted header names per logical column, source schema first.
const ID_HEADERS: &[&str] = &["ISBN", "book_id", "id"];
const TITLE_HEADERS: &[&str] = &["Book-Title", "title"];
const AUTHOR_HEADERS: &[&str] = &["Book-Author", "author"];
const YEAR_HEADERS: &[&str] = &["Year-Of-Publication", "year"];
const PUBLISHER_HEADERS: &[&str] = &["Publisher", "publisher"];
const IMAGE_URL_HEADERS: &[&str] = &["Image-URL-M", "image_url"];

/// Ordered, immutable collection of recommendable items.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    books: Vec<Book>,
}

impl Catalog {
    /// Load the catalog from a CSV source.
    ///
    /// Individual malformed rows are skipped, duplicate ids keep the first
    /// occurrence, and at most `row_cap` rows are loaded. An unreadable or
    /// structurally broken source logs an error and yields an empty
    /// catalog, never a startup failure.
    pub fn load(path: &Path, row_cap: usize) -> Catalog {
        match Self::read_source(path, row_cap) {
            Ok(books) => {
                info!(count = books.len(), path = %path.display(), "catalog loaded");
                Catalog { books }
            }
            Err(e) => {
                error!(
                    path = %path.display(),
                    error = %e,
                    "failed to read catalog source, continuing with an empty catalog"
                );
                Catalog::default()
            }
        }
    }

    /// Build a catalog from already-materialized books.
    ///
    /// Applies the same unique-id invariant as [`Catalog::load`]: later
    /// rows with an already-seen id are dropped.
    pub fn from_books(books: Vec<Book>) -> Catalog {
        let mut seen: HashSet<String> = HashSet::with_capacity(books.len());
        let books = books
            .into_iter()
            .filter(|b| seen.insert(b.id.clone()))
            .collect();
        Catalog { books }
    }

    fn read_source(path: &Path, row_cap: usize) -> Result<Vec<Book>> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(|e| GatewayError::CatalogSource {
                message: e.to_string(),
            })?;

        // The stock catalog is latin-1-ish; decode fields lossily instead
        // of rejecting whole rows over stray bytes.
        let headers = reader
            .byte_headers()
            .map_err(|e| GatewayError::CatalogSource {
                message: e.to_string(),
            })?
            .clone();

        let find = |names: &[&str]| -> Option<usize> {
            headers.iter().position(|h| {
                let h = String::from_utf8_lossy(h);
                names.iter().any(|n| h.trim() == *n)
            })
        };

        let id_col = find(ID_HEADERS).ok_or_else(|| GatewayError::CatalogSource {
            message: "catalog source has no identifier column".to_string(),
        })?;
        let title_col = find(TITLE_HEADERS);
        let author_col = find(AUTHOR_HEADERS);
        let year_col = find(YEAR_HEADERS);
        let publisher_col = find(PUBLISHER_HEADERS);
        let image_url_col = find(IMAGE_URL_HEADERS);

        let field = |record: &csv::ByteRecord, col: Option<usize>| -> String {
            col.and_then(|c| record.get(c))
                .map(|f| String::from_utf8_lossy(f).into_owned())
                .unwrap_or_default()
        };

        let mut books: Vec<Book> = Vec::new();
        let mut seen_ids: HashSet<String> = HashSet::new();
        let mut skipped = 0usize;

        for record in reader.byte_records() {
            if books.len() >= row_cap {
                break;
            }

            let record = match record {
                Ok(r) => r,
                Err(e) => {
                    skipped += 1;
                    warn!(error = %e, "skipping malformed catalog row");
                    continue;
                }
            };

            let book = Book {
                id: field(&record, Some(id_col)),
                title: field(&record, title_col),
                author: field(&record, author_col),
                publisher: field(&record, publisher_col),
                year: field(&record, year_col),
                image_url: field(&record, image_url_col),
            };

            if book.validate().is_err() {
                skipped += 1;
                warn!("skipping catalog row with invalid fields");
                continue;
            }

            if !seen_ids.insert(book.id.clone()) {
                skipped += 1;
                warn!(id = %book.id, "skipping catalog row with duplicate id");
                continue;
            }

            books.push(book);
        }

        if skipped > 0 {
            warn!(skipped, "catalog rows skipped during load");
        }

        Ok(books)
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn get(&self, index: usize) -> Option<&Book> {
        self.books.get(index)
    }

    /// Position of the first catalog-order item whose title matches.
    ///
    /// When several items share the title, the first match wins. This is
    /// a documented ambiguity of title-keyed identity.
    pub fn position_by_title(&self, title: &str) -> Option<usize> {
        let key = canonical_key(title);
        self.books
            .iter()
            .position(|b| canonical_key(&b.title) == key)
    }

    /// Case-insensitive substring search over title and author, first
    /// `limit` matches in catalog order.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&Book> {
        let q = query.to_lowercase();
        self.books
            .iter()
            .filter(|b| {
                b.title.to_lowercase().contains(&q) || b.author.to_lowercase().contains(&q)
            })
            .take(limit)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn book(id: &str, title: &str, author: &str) -> Book {
        Book {
            id: id.to_string(),
            title: title.to_string(),
            author: author.to_string(),
            publisher: String::new(),
            year: String::new(),
            image_url: String::new(),
        }
    }

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_source_schema() {
        let file = write_csv(
            "ISBN,Book-Title,Book-Author,Year-Of-Publication,Publisher,Image-URL-M\n\
             0441172717,Dune,Frank Herbert,1965,Chilton,http://img/dune.jpg\n\
             0553293354,Foundation,Isaac Asimov,1951,Gnome Press,http://img/foundation.jpg\n",
        );
        let catalog = Catalog::load(file.path(), 5000);
        assert_eq!(catalog.len(), 2);
        let dune = catalog.get(0).unwrap();
        assert_eq!(dune.id, "0441172717");
        assert_eq!(dune.title, "Dune");
        assert_eq!(dune.author, "Frank Herbert");
        assert_eq!(dune.year, "1965");
        assert_eq!(dune.image_url, "http://img/dune.jpg");
    }

    #[test]
    fn test_load_numeric_ids_become_strings() {
        let file = write_csv("ISBN,Book-Title,Book-Author\n12345,Dune,Frank Herbert\n");
        let catalog = Catalog::load(file.path(), 5000);
        assert_eq!(catalog.get(0).unwrap().id, "12345");
    }

    #[test]
    fn test_load_skips_rows_without_id() {
        let file = write_csv(
            "ISBN,Book-Title,Book-Author\n\
             ,No Id,Nobody\n\
             1,Dune,Frank Herbert\n",
        );
        let catalog = Catalog::load(file.path(), 5000);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(0).unwrap().title, "Dune");
    }

    #[test]
    fn test_load_short_rows_default_missing_fields_to_empty() {
        let file = write_csv(
            "ISBN,Book-Title,Book-Author,Year-Of-Publication,Publisher,Image-URL-M\n\
             1,Dune\n",
        );
        let catalog = Catalog::load(file.path(), 5000);
        assert_eq!(catalog.len(), 1);
        let b = catalog.get(0).unwrap();
        assert_eq!(b.author, "");
        assert_eq!(b.publisher, "");
    }

    #[test]
    fn test_load_respects_row_cap() {
        let file = write_csv(
            "ISBN,Book-Title,Book-Author\n1,A,x\n2,B,y\n3,C,z\n",
        );
        let catalog = Catalog::load(file.path(), 2);
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_load_missing_file_yields_empty_catalog() {
        let catalog = Catalog::load(Path::new("/nonexistent/books.csv"), 5000);
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_load_source_without_id_column_yields_empty_catalog() {
        let file = write_csv("Book-Title,Book-Author\nDune,Frank Herbert\n");
        let catalog = Catalog::load(file.path(), 5000);
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let catalog = Catalog::from_books(vec![
            book("1", "Dune", "Frank Herbert"),
            book("1", "Dune Messiah", "Frank Herbert"),
            book("2", "Foundation", "Isaac Asimov"),
        ]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(0).unwrap().title, "Dune");
    }

    #[test]
    fn test_position_by_title_first_match_wins() {
        let catalog = Catalog::from_books(vec![
            book("1", "Untitled", "First Author"),
            book("2", "Untitled", "Second Author"),
        ]);
        assert_eq!(catalog.position_by_title("Untitled"), Some(0));
        assert_eq!(catalog.position_by_title("Missing"), None);
    }

    #[test]
    fn test_search_matches_title_or_author_case_insensitive() {
        let catalog = Catalog::from_books(vec![
            book("1", "Dune", "Frank Herbert"),
            book("2", "Foundation", "Isaac Asimov"),
            book("3", "The Herbert Reader", "Someone Else"),
        ]);
        let by_author: Vec<_> = catalog.search("herbert", 20);
        assert_eq!(by_author.len(), 2);
        let by_title: Vec<_> = catalog.search("FOUND", 20);
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].title, "Foundation");
    }

    #[test]
    fn test_search_respects_limit() {
        let books = (0..30).map(|i| book(&i.to_string(), "Dune", "x")).collect();
        let catalog = Catalog::from_books(books);
        assert_eq!(catalog.search("dune", 20).len(), 20);
    }
}
