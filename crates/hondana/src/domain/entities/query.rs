use serde::{Deserialize, Serialize};

/// Ordering direction for `created_at` listings. Ties between equal
/// timestamps are left to the storage layer and carry no guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// A page window. `page` and `limit` are coerced to be at least 1; there is
/// no upper bound on `limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(10).max(1),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl PageMeta {
    pub fn new(total: i64, page: &PageRequest) -> Self {
        Self {
            total,
            page: page.page,
            limit: page.limit,
            total_pages: (total + page.limit - 1) / page.limit,
        }
    }
}

/// A page of rows together with its pagination metadata.
#[derive(Debug, Clone)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

/// Book columns a text predicate can match against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookField {
    Title,
    AltTitle,
    Author,
    Artist,
}

/// Filter expression handed to the book repository. The tagged `All`/`Any`
/// composition makes the intent of combined filters explicit instead of
/// leaving it implicit in control flow.
#[derive(Debug, Clone, PartialEq)]
pub enum BookPredicate {
    /// Every sub-predicate must hold.
    All(Vec<BookPredicate>),
    /// At least one sub-predicate must hold.
    Any(Vec<BookPredicate>),
    /// Case-insensitive substring match on a single column.
    Contains { field: BookField, value: String },
    /// The book has at least one genre among the given ids.
    HasAnyGenre(Vec<i64>),
}

/// Raw search/filter input for the combined book search.
#[derive(Debug, Clone, Default)]
pub struct BookQuery {
    pub genre_ids: Vec<i64>,
    pub search: Option<String>,
    pub creator: Option<String>,
    pub sort: SortDirection,
    pub page: PageRequest,
}

impl BookQuery {
    /// Compose the storage-level filter, or `None` when every criterion is
    /// absent and the plain listing path should be taken instead.
    ///
    /// `search` matches title or alternate title; `creator` matches author
    /// or artist. Both families land in one `Any` node, so a book matching
    /// either family qualifies — they are not independent constraints. The
    /// genre criterion is existential here ("has at least one of these
    /// genres"); callers narrow the fetched page down to books carrying
    /// every requested genre afterwards.
    pub fn filter(&self) -> Option<BookPredicate> {
        let search = self.search.as_deref().filter(|s| !s.trim().is_empty());
        let creator = self.creator.as_deref().filter(|s| !s.trim().is_empty());

        if self.genre_ids.is_empty() && search.is_none() && creator.is_none() {
            return None;
        }

        let mut text = Vec::new();
        if let Some(search) = search {
            text.push(BookPredicate::Contains {
                field: BookField::Title,
                value: search.to_string(),
            });
            text.push(BookPredicate::Contains {
                field: BookField::AltTitle,
                value: search.to_string(),
            });
        }
        if let Some(creator) = creator {
            text.push(BookPredicate::Contains {
                field: BookField::Author,
                value: creator.to_string(),
            });
            text.push(BookPredicate::Contains {
                field: BookField::Artist,
                value: creator.to_string(),
            });
        }

        let mut clauses = Vec::new();
        if !text.is_empty() {
            clauses.push(BookPredicate::Any(text));
        }
        if !self.genre_ids.is_empty() {
            clauses.push(BookPredicate::HasAnyGenre(self.genre_ids.clone()));
        }

        Some(BookPredicate::All(clauses))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_page_request_coerces_to_positive() {
        let page = PageRequest::new(Some(0), Some(-3));
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, 1);

        let page = PageRequest::new(None, None);
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, 10);
    }

    #[test]
    fn test_offset() {
        let page = PageRequest::new(Some(2), Some(5));
        assert_eq!(page.offset(), 5);
        assert_eq!(page.limit, 5);

        assert_eq!(PageRequest::new(Some(1), Some(10)).offset(), 0);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let page = PageRequest::new(Some(1), Some(10));
        assert_eq!(PageMeta::new(25, &page).total_pages, 3);
        assert_eq!(PageMeta::new(30, &page).total_pages, 3);
        assert_eq!(PageMeta::new(31, &page).total_pages, 4);
        assert_eq!(PageMeta::new(0, &page).total_pages, 0);
    }

    #[test]
    fn test_no_criteria_means_no_filter() {
        let query = BookQuery::default();
        assert!(query.filter().is_none());

        let query = BookQuery {
            search: Some("   ".to_string()),
            creator: Some(String::new()),
            ..Default::default()
        };
        assert!(query.filter().is_none());
    }

    #[test]
    fn test_search_and_creator_share_one_disjunction() {
        let query = BookQuery {
            search: Some("Naruto".to_string()),
            creator: Some("Kishimoto".to_string()),
            ..Default::default()
        };

        let filter = query.filter().expect("filter");
        let BookPredicate::All(clauses) = filter else {
            panic!("expected top-level All");
        };
        assert_eq!(clauses.len(), 1);
        let BookPredicate::Any(text) = &clauses[0] else {
            panic!("expected a single Any over all four columns");
        };
        assert_eq!(
            text.iter()
                .map(|p| match p {
                    BookPredicate::Contains { field, .. } => *field,
                    other => panic!("unexpected predicate {other:?}"),
                })
                .collect::<Vec<_>>(),
            vec![
                BookField::Title,
                BookField::AltTitle,
                BookField::Author,
                BookField::Artist
            ]
        );
    }

    #[test]
    fn test_genre_filter_is_existential() {
        let query = BookQuery {
            genre_ids: vec![1, 2],
            ..Default::default()
        };

        let filter = query.filter().expect("filter");
        assert_eq!(
            filter,
            BookPredicate::All(vec![BookPredicate::HasAnyGenre(vec![1, 2])])
        );
    }

    #[test]
    fn test_text_and_genres_are_conjoined() {
        let query = BookQuery {
            genre_ids: vec![7],
            search: Some("yuri".to_string()),
            ..Default::default()
        };

        let BookPredicate::All(clauses) = query.filter().expect("filter") else {
            panic!("expected All");
        };
        assert_eq!(clauses.len(), 2);
        assert!(matches!(clauses[0], BookPredicate::Any(_)));
        assert!(matches!(clauses[1], BookPredicate::HasAnyGenre(_)));
    }
}
