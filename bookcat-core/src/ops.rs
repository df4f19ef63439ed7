//! The fixed catalog of operations the runner executes.
//!
//! The whole program is an ordered list of independent operations against one
//! bookstore collection: basic CRUD, advanced queries, rollups, and index
//! management. Each operation is a pure function over the store handle that
//! returns a typed [`Outcome`]; [`run_catalog`] drives the list in order and
//! logs every outcome. Operations share no intermediate state; each one
//! re-derives its result from the stored collection.

use std::fmt;

use bson::doc;
use log::info;

use crate::{
    aggregate::{GroupAverage, GroupCount, GroupKey, RollupOrder},
    backend::CatalogBackend,
    book::Book,
    error::CatalogResult,
    explain::ExplainReport,
    index::IndexKey,
    page::PaginationParams,
    query::{Filter, Query, SortDirection},
    store::CatalogStore,
};

/// Logical database the runner selects.
pub const DATABASE_NAME: &str = "bookstore";
/// Collection within the database. Matches [`Book::collection_name`].
pub const COLLECTION_NAME: &str = "books";
/// Page size used by the pagination operation.
pub const PAGE_SIZE: usize = 5;

/// The four groups the sequence is organized into, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpGroup {
    Crud,
    Advanced,
    Aggregation,
    Indexing,
}

impl OpGroup {
    /// Human-readable group heading for the log.
    pub fn title(&self) -> &'static str {
        match self {
            OpGroup::Crud => "basic CRUD",
            OpGroup::Advanced => "advanced queries",
            OpGroup::Aggregation => "aggregation",
            OpGroup::Indexing => "indexing",
        }
    }
}

/// The typed result of one catalog operation.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Whole documents, decoded.
    Books(Vec<Book>),
    /// Projected partial documents.
    Projected(Vec<bson::Bson>),
    /// Consecutive result pages, first page first.
    Paged(Vec<Vec<Book>>),
    /// Count of documents modified by an update.
    Modified(u64),
    /// Count of documents removed by a delete.
    Deleted(u64),
    /// Average rollup rows.
    Averages(Vec<GroupAverage>),
    /// Count rollup rows.
    Counts(Vec<GroupCount>),
    /// Name of a created index.
    Index(String),
    /// Execution statistics of an explained find.
    Plan(ExplainReport),
}

fn write_books(f: &mut fmt::Formatter<'_>, books: &[Book]) -> fmt::Result {
    write!(f, "{} book(s)", books.len())?;
    for book in books {
        write!(
            f,
            "\n    {} by {} ({}), ${:.2}",
            book.title, book.author, book.published_year, book.price
        )?;
    }
    Ok(())
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Books(books) => write_books(f, books),
            Outcome::Projected(rows) => {
                write!(f, "{} row(s)", rows.len())?;
                for row in rows {
                    match serde_json::to_string(row) {
                        Ok(line) => write!(f, "\n    {line}")?,
                        Err(_) => write!(f, "\n    {row:?}")?,
                    }
                }
                Ok(())
            }
            Outcome::Paged(pages) => {
                for (number, page) in pages.iter().enumerate() {
                    write!(f, "\npage {}: ", number + 1)?;
                    write_books(f, page)?;
                }
                Ok(())
            }
            Outcome::Modified(count) => write!(f, "{count} book(s) updated"),
            Outcome::Deleted(count) => write!(f, "{count} book(s) deleted"),
            Outcome::Averages(rows) => {
                write!(f, "{} bucket(s)", rows.len())?;
                for row in rows {
                    write!(f, "\n    {}: {:.2}", row.key, row.average)?;
                }
                Ok(())
            }
            Outcome::Counts(rows) => {
                write!(f, "{} bucket(s)", rows.len())?;
                for row in rows {
                    write!(f, "\n    {}: {}", row.key, row.count)?;
                }
                Ok(())
            }
            Outcome::Index(name) => write!(f, "index {name}"),
            Outcome::Plan(report) => write!(f, "{report}"),
        }
    }
}

/// One operation of the fixed sequence.
///
/// Each variant is independent: it takes the store handle, issues exactly the
/// round-trips it needs, and returns a typed [`Outcome`]. The order the runner
/// uses is [`CatalogOp::SEQUENCE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogOp {
    /// Find all books with genre "Fiction".
    FictionBooks,
    /// Find all books published after 2000.
    PublishedAfter2000,
    /// Find all books by George Orwell.
    BooksByOrwell,
    /// Set the price of the first book titled "1984" to 12.99.
    RepriceNineteenEightyFour,
    /// Delete the first book titled "Moby Dick".
    RemoveMobyDick,
    /// Find in-stock books published after 2010.
    InStockRecent,
    /// Reduce every book to title, author, and price.
    TitleAuthorPrice,
    /// All books, cheapest first.
    CheapestFirst,
    /// All books, priciest first.
    PriciestFirst,
    /// The first two pages of the collection, five books per page.
    FirstTwoPages,
    /// Mean price per genre.
    AveragePriceByGenre,
    /// The single author with the highest book count.
    MostProlificAuthor,
    /// Book count per publication decade, earliest decade first.
    BooksPerDecade,
    /// Single-field ascending index on title.
    TitleIndex,
    /// Compound index on author (asc) and published year (desc).
    AuthorYearIndex,
    /// Execution statistics for an exact title lookup.
    ExplainTitleLookup,
    /// Execution statistics for an author lookup sorted by year.
    ExplainAuthorSorted,
}

impl CatalogOp {
    /// The full operation sequence, in execution order.
    pub const SEQUENCE: [CatalogOp; 17] = [
        CatalogOp::FictionBooks,
        CatalogOp::PublishedAfter2000,
        CatalogOp::BooksByOrwell,
        CatalogOp::RepriceNineteenEightyFour,
        CatalogOp::RemoveMobyDick,
        CatalogOp::InStockRecent,
        CatalogOp::TitleAuthorPrice,
        CatalogOp::CheapestFirst,
        CatalogOp::PriciestFirst,
        CatalogOp::FirstTwoPages,
        CatalogOp::AveragePriceByGenre,
        CatalogOp::MostProlificAuthor,
        CatalogOp::BooksPerDecade,
        CatalogOp::TitleIndex,
        CatalogOp::AuthorYearIndex,
        CatalogOp::ExplainTitleLookup,
        CatalogOp::ExplainAuthorSorted,
    ];

    /// Short label used in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            CatalogOp::FictionBooks => "fiction books",
            CatalogOp::PublishedAfter2000 => "published after 2000",
            CatalogOp::BooksByOrwell => "books by George Orwell",
            CatalogOp::RepriceNineteenEightyFour => "reprice 1984",
            CatalogOp::RemoveMobyDick => "remove Moby Dick",
            CatalogOp::InStockRecent => "in stock, published after 2010",
            CatalogOp::TitleAuthorPrice => "title/author/price projection",
            CatalogOp::CheapestFirst => "sorted by price (asc)",
            CatalogOp::PriciestFirst => "sorted by price (desc)",
            CatalogOp::FirstTwoPages => "first two pages",
            CatalogOp::AveragePriceByGenre => "average price by genre",
            CatalogOp::MostProlificAuthor => "author with most books",
            CatalogOp::BooksPerDecade => "books per decade",
            CatalogOp::TitleIndex => "title index",
            CatalogOp::AuthorYearIndex => "author/year index",
            CatalogOp::ExplainTitleLookup => "explain title lookup",
            CatalogOp::ExplainAuthorSorted => "explain author lookup with sort",
        }
    }

    /// The group this operation belongs to.
    pub fn group(&self) -> OpGroup {
        match self {
            CatalogOp::FictionBooks
            | CatalogOp::PublishedAfter2000
            | CatalogOp::BooksByOrwell
            | CatalogOp::RepriceNineteenEightyFour
            | CatalogOp::RemoveMobyDick => OpGroup::Crud,
            CatalogOp::InStockRecent
            | CatalogOp::TitleAuthorPrice
            | CatalogOp::CheapestFirst
            | CatalogOp::PriciestFirst
            | CatalogOp::FirstTwoPages => OpGroup::Advanced,
            CatalogOp::AveragePriceByGenre
            | CatalogOp::MostProlificAuthor
            | CatalogOp::BooksPerDecade => OpGroup::Aggregation,
            CatalogOp::TitleIndex
            | CatalogOp::AuthorYearIndex
            | CatalogOp::ExplainTitleLookup
            | CatalogOp::ExplainAuthorSorted => OpGroup::Indexing,
        }
    }

    /// Executes this operation against the given store.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`](crate::error::CatalogError) if the backend
    /// rejects the operation; nothing is retried.
    pub async fn execute<B: CatalogBackend>(
        self,
        store: &CatalogStore<B>,
    ) -> CatalogResult<Outcome> {
        let books = store.typed_collection::<Book>();
        let raw = store.collection(COLLECTION_NAME);

        match self {
            CatalogOp::FictionBooks => Ok(Outcome::Books(
                books
                    .find(
                        Query::builder()
                            .filter(Filter::eq("genre", "Fiction"))
                            .build(),
                    )
                    .await?,
            )),
            CatalogOp::PublishedAfter2000 => Ok(Outcome::Books(
                books
                    .find(
                        Query::builder()
                            .filter(Filter::gt("published_year", 2000))
                            .build(),
                    )
                    .await?,
            )),
            CatalogOp::BooksByOrwell => Ok(Outcome::Books(
                books
                    .find(
                        Query::builder()
                            .filter(Filter::eq("author", "George Orwell"))
                            .build(),
                    )
                    .await?,
            )),
            CatalogOp::RepriceNineteenEightyFour => Ok(Outcome::Modified(
                books
                    .update_first(Filter::eq("title", "1984"), doc! { "price": 12.99 })
                    .await?,
            )),
            CatalogOp::RemoveMobyDick => Ok(Outcome::Deleted(
                books
                    .delete_first(Filter::eq("title", "Moby Dick"))
                    .await?,
            )),
            CatalogOp::InStockRecent => Ok(Outcome::Books(
                books
                    .find(
                        Query::builder()
                            .filter(
                                Filter::eq("in_stock", true)
                                    .and(Filter::gt("published_year", 2010)),
                            )
                            .build(),
                    )
                    .await?,
            )),
            CatalogOp::TitleAuthorPrice => Ok(Outcome::Projected(
                raw.find(
                    Query::builder()
                        .project(["title", "author", "price"])
                        .build(),
                )
                .await?,
            )),
            CatalogOp::CheapestFirst => Ok(Outcome::Books(
                books
                    .find(
                        Query::builder()
                            .sort("price", SortDirection::Asc)
                            .build(),
                    )
                    .await?,
            )),
            CatalogOp::PriciestFirst => Ok(Outcome::Books(
                books
                    .find(
                        Query::builder()
                            .sort("price", SortDirection::Desc)
                            .build(),
                    )
                    .await?,
            )),
            CatalogOp::FirstTwoPages => {
                let mut pages = Vec::new();
                for page in 1..=2 {
                    let params = PaginationParams::new(page, PAGE_SIZE);
                    pages.push(
                        books
                            .find(
                                Query::builder()
                                    .limit(params.per_page)
                                    .offset(params.offset())
                                    .build(),
                            )
                            .await?,
                    );
                }
                Ok(Outcome::Paged(pages))
            }
            CatalogOp::AveragePriceByGenre => Ok(Outcome::Averages(
                raw.average_by_group(GroupKey::field("genre"), "price")
                    .await?,
            )),
            CatalogOp::MostProlificAuthor => Ok(Outcome::Counts(
                raw.count_by_group(GroupKey::field("author"), RollupOrder::CountDesc, Some(1))
                    .await?,
            )),
            CatalogOp::BooksPerDecade => Ok(Outcome::Counts(
                raw.count_by_group(
                    GroupKey::decade("published_year"),
                    RollupOrder::KeyAsc,
                    None,
                )
                .await?,
            )),
            CatalogOp::TitleIndex => Ok(Outcome::Index(
                raw.create_index(vec![IndexKey::asc("title")])
                    .await?,
            )),
            CatalogOp::AuthorYearIndex => Ok(Outcome::Index(
                raw.create_index(vec![
                    IndexKey::asc("author"),
                    IndexKey::desc("published_year"),
                ])
                .await?,
            )),
            CatalogOp::ExplainTitleLookup => Ok(Outcome::Plan(
                raw.explain(
                    Query::builder()
                        .filter(Filter::eq("title", "1984"))
                        .build(),
                )
                .await?,
            )),
            CatalogOp::ExplainAuthorSorted => Ok(Outcome::Plan(
                raw.explain(
                    Query::builder()
                        .filter(Filter::eq("author", "George Orwell"))
                        .sort("published_year", SortDirection::Desc)
                        .build(),
                )
                .await?,
            )),
        }
    }
}

/// Runs the full operation sequence in order, logging every outcome.
///
/// The first failing operation aborts the remaining sequence; there is no
/// per-operation recovery. The caller is responsible for releasing the store
/// afterwards, whether or not this returned an error.
pub async fn run_catalog<B: CatalogBackend>(store: &CatalogStore<B>) -> CatalogResult<()> {
    let mut current_group = None;

    for op in CatalogOp::SEQUENCE {
        if current_group != Some(op.group()) {
            current_group = Some(op.group());
            info!("--- {} ---", op.group().title());
        }

        let outcome = op.execute(store).await?;
        info!("{}: {}", op.name(), outcome);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{CatalogOp, OpGroup};

    #[test]
    fn sequence_keeps_group_order() {
        // Groups must be contiguous: CRUD, advanced, aggregation, indexing.
        let groups: Vec<OpGroup> = CatalogOp::SEQUENCE
            .iter()
            .map(CatalogOp::group)
            .collect();

        let mut deduped = groups.clone();
        deduped.dedup();
        assert_eq!(
            deduped,
            vec![
                OpGroup::Crud,
                OpGroup::Advanced,
                OpGroup::Aggregation,
                OpGroup::Indexing
            ]
        );
    }

    #[test]
    fn sequence_has_no_duplicates() {
        for (i, a) in CatalogOp::SEQUENCE.iter().enumerate() {
            for b in &CatalogOp::SEQUENCE[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
