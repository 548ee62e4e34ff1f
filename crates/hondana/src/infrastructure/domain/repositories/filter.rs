use crate::domain::entities::query::{BookField, BookPredicate, SortDirection};

/// Bind value produced while compiling a predicate tree.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Bind {
    Int(i64),
    Text(String),
}

pub(super) fn order_keyword(sort: SortDirection) -> &'static str {
    match sort {
        SortDirection::Asc => "ASC",
        SortDirection::Desc => "DESC",
    }
}

fn column(field: BookField) -> &'static str {
    match field {
        BookField::Title => "book.title",
        BookField::AltTitle => "book.alt_title",
        BookField::Author => "book.author",
        BookField::Artist => "book.artist",
    }
}

/// Append the SQL form of `pred` to `sql`, pushing bind values in the
/// order their placeholders appear.
pub(super) fn write_predicate(pred: &BookPredicate, sql: &mut String, binds: &mut Vec<Bind>) {
    match pred {
        BookPredicate::All(preds) => write_group(preds, " AND ", "1=1", sql, binds),
        BookPredicate::Any(preds) => write_group(preds, " OR ", "1=0", sql, binds),
        BookPredicate::Contains { field, value } => {
            sql.push_str("LOWER(");
            sql.push_str(column(*field));
            sql.push_str(") LIKE ? ESCAPE '\\'");
            binds.push(Bind::Text(format!(
                "%{}%",
                escape_like(&value.to_lowercase())
            )));
        }
        BookPredicate::HasAnyGenre(ids) if ids.is_empty() => sql.push_str("1=0"),
        BookPredicate::HasAnyGenre(ids) => {
            sql.push_str(
                "EXISTS (SELECT 1 FROM book_genre \
                 WHERE book_genre.book_id = book.id AND book_genre.genre_id IN (",
            );
            sql.push_str(&vec!["?"; ids.len()].join(","));
            sql.push_str("))");
            binds.extend(ids.iter().map(|id| Bind::Int(*id)));
        }
    }
}

fn write_group(
    preds: &[BookPredicate],
    separator: &str,
    empty: &str,
    sql: &mut String,
    binds: &mut Vec<Bind>,
) {
    if preds.is_empty() {
        sql.push_str(empty);
        return;
    }

    sql.push('(');
    for (i, pred) in preds.iter().enumerate() {
        if i > 0 {
            sql.push_str(separator);
        }
        write_predicate(pred, sql, binds);
    }
    sql.push(')');
}

/// Escape LIKE wildcards so user input matches literally.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::domain::entities::query::BookQuery;

    fn compile(pred: &BookPredicate) -> (String, Vec<Bind>) {
        let mut sql = String::new();
        let mut binds = vec![];
        write_predicate(pred, &mut sql, &mut binds);
        (sql, binds)
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("naruto"), "naruto");
    }

    #[test]
    fn test_contains_compiles_to_case_insensitive_like() {
        let (sql, binds) = compile(&BookPredicate::Contains {
            field: BookField::Title,
            value: "Naruto".to_string(),
        });

        assert_eq!(sql, "LOWER(book.title) LIKE ? ESCAPE '\\'");
        assert_eq!(binds, vec![Bind::Text("%naruto%".to_string())]);
    }

    #[test]
    fn test_genre_filter_compiles_to_exists() {
        let (sql, binds) = compile(&BookPredicate::HasAnyGenre(vec![1, 2, 3]));

        assert_eq!(
            sql,
            "EXISTS (SELECT 1 FROM book_genre \
             WHERE book_genre.book_id = book.id AND book_genre.genre_id IN (?,?,?))"
        );
        assert_eq!(binds, vec![Bind::Int(1), Bind::Int(2), Bind::Int(3)]);
    }

    #[test]
    fn test_composed_search_binds_in_placeholder_order() {
        let query = BookQuery {
            genre_ids: vec![9],
            search: Some("solo".to_string()),
            creator: Some("chugong".to_string()),
            ..Default::default()
        };

        let (sql, binds) = compile(&query.filter().unwrap());

        assert_eq!(
            sql,
            "((LOWER(book.title) LIKE ? ESCAPE '\\' \
              OR LOWER(book.alt_title) LIKE ? ESCAPE '\\' \
              OR LOWER(book.author) LIKE ? ESCAPE '\\' \
              OR LOWER(book.artist) LIKE ? ESCAPE '\\') \
             AND EXISTS (SELECT 1 FROM book_genre \
             WHERE book_genre.book_id = book.id AND book_genre.genre_id IN (?)))"
        );
        assert_eq!(
            binds,
            vec![
                Bind::Text("%solo%".to_string()),
                Bind::Text("%solo%".to_string()),
                Bind::Text("%chugong%".to_string()),
                Bind::Text("%chugong%".to_string()),
                Bind::Int(9),
            ]
        );
    }

    #[test]
    fn test_empty_groups_never_match_anything_unexpected() {
        assert_eq!(compile(&BookPredicate::All(vec![])).0, "1=1");
        assert_eq!(compile(&BookPredicate::Any(vec![])).0, "1=0");
        assert_eq!(compile(&BookPredicate::HasAnyGenre(vec![])).0, "1=0");
    }
}
