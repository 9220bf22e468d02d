//! End-to-end repository behavior over a real database file.
//!
//! These tests pin the caller-visible contract: round-trips, pagination
//! windows, trim rules, rows-affected counts, and the behaviors that look
//! like errors but are defined as normal empty results.

use tabula_core::{
    ColumnSpec, Entity, FieldKind, FieldValue, Filter, ShapeError, SortKey, StringField,
    ValueCursor,
};
use tabula_store::{Repository, SqliteRepository, StorageOptions};

#[derive(Debug, Clone, PartialEq)]
struct Forecast {
    id: Option<i64>,
    /// Unix milliseconds.
    date_ms: i64,
    temperature_c: i64,
    summary: Option<String>,
}

impl Forecast {
    fn new(date_ms: i64, temperature_c: i64, summary: &str) -> Self {
        Self {
            id: None,
            date_ms,
            temperature_c,
            summary: Some(summary.to_string()),
        }
    }
}

fn forecast_summary(f: &Forecast) -> Option<&str> {
    f.summary.as_deref()
}

fn set_forecast_summary(f: &mut Forecast, v: String) {
    f.summary = Some(v);
}

impl Entity for Forecast {
    type Key = i64;

    fn table() -> &'static str {
        "forecast"
    }

    fn columns() -> &'static [ColumnSpec] {
        const COLUMNS: &[ColumnSpec] = &[
            ColumnSpec::auto_identity("id"),
            ColumnSpec::new("date_ms", FieldKind::Integer),
            ColumnSpec::new("temperature_c", FieldKind::Integer),
            ColumnSpec::new("summary", FieldKind::Text),
        ];
        COLUMNS
    }

    fn string_fields() -> &'static [StringField<Self>] {
        const FIELDS: &[StringField<Forecast>] = &[StringField {
            name: "summary",
            get: forecast_summary,
            set: set_forecast_summary,
            exempt: false,
        }];
        FIELDS
    }

    fn key(&self) -> Option<i64> {
        self.id
    }

    fn set_key(&mut self, key: i64) {
        self.id = Some(key);
    }

    fn values(&self) -> Vec<FieldValue> {
        vec![
            self.id.into(),
            self.date_ms.into(),
            self.temperature_c.into(),
            self.summary.clone().into(),
        ]
    }

    fn from_values(values: Vec<FieldValue>) -> Result<Self, ShapeError> {
        let mut cursor = ValueCursor::new(values);
        Ok(Self {
            id: cursor.integer_opt()?,
            date_ms: cursor.integer()?,
            temperature_c: cursor.integer()?,
            summary: cursor.text_opt()?,
        })
    }
}

fn sqlite_in_memory() -> SqliteRepository<Forecast> {
    SqliteRepository::open_in_memory().unwrap()
}

async fn seed(repo: &SqliteRepository<Forecast>, forecasts: &mut [Forecast]) {
    for forecast in forecasts.iter_mut() {
        repo.add(forecast).await.unwrap();
    }
}

#[tokio::test]
async fn opens_and_roundtrips_through_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let options = StorageOptions::new(dir.path(), "forecasts.db");
    let repo = SqliteRepository::<Forecast>::open(&options).unwrap();

    let mut forecast = Forecast::new(1_000, 21, "mild");
    repo.add(&mut forecast).await.unwrap();
    let id = forecast.id.unwrap();

    // A second handle over the same file sees the row.
    let reopened = SqliteRepository::<Forecast>::open(&options).unwrap();
    let found = reopened.get(id).await.unwrap().unwrap();
    assert_eq!(found, forecast);
}

#[tokio::test]
async fn open_fails_fatally_on_inaccessible_path() {
    let options = StorageOptions::new("/nonexistent/deeply/nested", "forecasts.db");
    assert!(SqliteRepository::<Forecast>::open(&options).is_err());
}

#[tokio::test]
async fn count_matches_unpaginated_get_all() {
    let repo = sqlite_in_memory();
    let mut rows: Vec<Forecast> = (0..7)
        .map(|i| Forecast::new(i * 100, if i % 2 == 0 { 16 } else { 20 }, "s"))
        .collect();
    seed(&repo, &mut rows).await;

    let warm = Filter::new(|f: &Forecast| f.temperature_c >= 18);
    let listed = repo
        .get_all(Some(warm.clone()), None, None, None)
        .await
        .unwrap();
    assert_eq!(repo.count(Some(warm)).await.unwrap(), listed.len());
    assert_eq!(repo.count(None).await.unwrap(), 7);
}

#[tokio::test]
async fn pages_partition_the_sorted_result() {
    let repo = sqlite_in_memory();
    let mut rows: Vec<Forecast> = (0..25).map(|i| Forecast::new(2_500 - i, 10, "s")).collect();
    seed(&repo, &mut rows).await;

    let mut seen = Vec::new();
    for page in 1..=3 {
        let window = repo
            .get_all(
                None,
                Some(SortKey::by(|f: &Forecast| f.date_ms)),
                Some(page),
                Some(10),
            )
            .await
            .unwrap();
        assert_eq!(window.len(), if page < 3 { 10 } else { 5 });
        seen.extend(window);
    }

    let full = repo
        .get_all(None, Some(SortKey::by(|f: &Forecast| f.date_ms)), None, None)
        .await
        .unwrap();
    assert_eq!(seen, full);
    assert!(seen.windows(2).all(|w| w[0].date_ms <= w[1].date_ms));
}

#[tokio::test]
async fn page_without_page_size_returns_everything() {
    let repo = sqlite_in_memory();
    let mut rows: Vec<Forecast> = (0..25).map(|i| Forecast::new(i, 10, "s")).collect();
    seed(&repo, &mut rows).await;

    let unpaged = repo
        .get_all(
            None,
            Some(SortKey::by(|f: &Forecast| f.date_ms)),
            Some(3),
            None,
        )
        .await
        .unwrap();
    assert_eq!(unpaged.len(), 25);

    let third = repo
        .get_all(
            None,
            Some(SortKey::by(|f: &Forecast| f.date_ms)),
            Some(3),
            Some(10),
        )
        .await
        .unwrap();
    assert_eq!(third.len(), 5);
    assert_eq!(third[0].date_ms, 20);
}

#[tokio::test]
async fn zero_pagination_values_clamp_to_one() {
    let repo = sqlite_in_memory();
    let mut rows: Vec<Forecast> = (0..4).map(|i| Forecast::new(i, 10, "s")).collect();
    seed(&repo, &mut rows).await;

    let sort = || Some(SortKey::by(|f: &Forecast| f.date_ms));
    let zero_page = repo.get_all(None, sort(), Some(0), Some(2)).await.unwrap();
    let first_page = repo.get_all(None, sort(), Some(1), Some(2)).await.unwrap();
    assert_eq!(zero_page, first_page);

    let zero_size = repo.get_all(None, sort(), Some(2), Some(0)).await.unwrap();
    let one_size = repo.get_all(None, sort(), Some(2), Some(1)).await.unwrap();
    assert_eq!(zero_size, one_size);
}

#[tokio::test]
async fn filter_and_sort_scenario() {
    // Temperatures [10, 16, 16, 20] over ascending dates; the two 16-degree
    // rows come back date-ascending.
    let repo = sqlite_in_memory();
    let mut rows = vec![
        Forecast::new(4_000, 16, "late sixteen"),
        Forecast::new(1_000, 10, "cold"),
        Forecast::new(2_000, 16, "early sixteen"),
        Forecast::new(3_000, 20, "warm"),
    ];
    seed(&repo, &mut rows).await;

    let result = repo
        .get_all(
            Some(Filter::new(|f: &Forecast| f.temperature_c == 16)),
            Some(SortKey::by(|f: &Forecast| f.date_ms)),
            None,
            None,
        )
        .await
        .unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result[0].summary.as_deref(), Some("early sixteen"));
    assert_eq!(result[1].summary.as_deref(), Some("late sixteen"));
}

#[tokio::test]
async fn update_of_missing_identity_does_not_insert() {
    let repo = sqlite_in_memory();
    let mut ghost = Forecast::new(1, 10, "ghost");
    ghost.id = Some(77);

    assert_eq!(repo.update(&mut ghost).await.unwrap(), 0);
    assert_eq!(repo.count(None).await.unwrap(), 0);
}

#[tokio::test]
async fn empty_and_unknown_key_sets_affect_nothing() {
    let repo = sqlite_in_memory();
    assert_eq!(repo.delete_many(&[]).await.unwrap(), 0);
    assert_eq!(repo.delete_many(&[123]).await.unwrap(), 0);
    assert!(repo.get_many(&[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn trim_asymmetry_between_add_and_update() {
    let repo = sqlite_in_memory();

    let mut bare = Forecast::new(1, 10, "  abc  ");
    repo.add(&mut bare).await.unwrap();
    let stored = repo.get(bare.id.unwrap()).await.unwrap().unwrap();
    assert_eq!(stored.summary.as_deref(), Some("  abc  "));

    let mut updated = stored;
    updated.summary = Some("  abc  ".to_string());
    repo.update(&mut updated).await.unwrap();
    let stored = repo.get(updated.id.unwrap()).await.unwrap().unwrap();
    assert_eq!(stored.summary.as_deref(), Some("abc"));

    let mut bulk = [Forecast::new(2, 11, "  def  ")];
    repo.add_range(&mut bulk).await.unwrap();
    let stored = repo.get(bulk[0].id.unwrap()).await.unwrap().unwrap();
    assert_eq!(stored.summary.as_deref(), Some("def"));
}

#[tokio::test]
async fn update_range_persists_every_row() {
    let repo = sqlite_in_memory();
    let mut rows: Vec<Forecast> = (0..3).map(|i| Forecast::new(i, 10, "old")).collect();
    seed(&repo, &mut rows).await;

    for row in rows.iter_mut() {
        row.summary = Some(" new ".to_string());
    }
    assert_eq!(repo.update_range(&mut rows).await.unwrap(), 3);

    let all = repo.get_all(None, None, None, None).await.unwrap();
    assert!(all.iter().all(|f| f.summary.as_deref() == Some("new")));
}

#[tokio::test]
async fn delete_entities_skips_unpersisted_rows() {
    let repo = sqlite_in_memory();
    let mut saved = Forecast::new(1, 10, "saved");
    repo.add(&mut saved).await.unwrap();
    let unsaved = Forecast::new(2, 11, "unsaved");

    let affected = repo.delete_entities(&[saved, unsaved]).await.unwrap();
    assert_eq!(affected, 1);
    assert_eq!(repo.count(None).await.unwrap(), 0);
}

#[tokio::test]
async fn clear_table_empties_the_table() {
    let repo = sqlite_in_memory();
    let mut rows: Vec<Forecast> = (0..6).map(|i| Forecast::new(i, 10, "s")).collect();
    seed(&repo, &mut rows).await;

    assert_eq!(repo.clear_table().await.unwrap(), 6);
    assert_eq!(repo.count(None).await.unwrap(), 0);
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Windows of any size tile the sorted result exactly once.
        #[test]
        fn pagination_reconstructs_the_sequence(rows in 0usize..40, page_size in 1i64..9) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();

            rt.block_on(async {
                let repo = sqlite_in_memory();
                let mut seedlings: Vec<Forecast> =
                    (0..rows).map(|i| Forecast::new(i as i64, 10, "s")).collect();
                seed(&repo, &mut seedlings).await;

                let sort = || Some(SortKey::by(|f: &Forecast| f.date_ms));
                let full = repo.get_all(None, sort(), None, None).await.unwrap();

                let mut rebuilt = Vec::new();
                let mut page = 1;
                loop {
                    let window = repo
                        .get_all(None, sort(), Some(page), Some(page_size))
                        .await
                        .unwrap();
                    if window.is_empty() {
                        break;
                    }
                    rebuilt.extend(window);
                    page += 1;
                }

                assert_eq!(rebuilt, full);
            });
        }
    }
}
