//! Collection query engine: search, filter, sort and paginate a record slice.
//!
//! [`query`] is a pure function of its inputs. It borrows the records, never
//! reorders or mutates them, and returns references into the input for the
//! requested page. Irregular input (unknown filter fields, out-of-range pages)
//! is corrected silently; only an unknown sort field or a zero page size is an
//! error.

use super::error::QueryError;
use super::record::{FieldValue, Record, field_def, parse_timestamp};
use chrono::{Duration, Months, NaiveDateTime};
use serde::Serialize;
use std::cmp::Ordering;
use std::str::FromStr;

/// Filter value that disables its filter.
pub const ALL_SENTINEL: &str = "all";

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            other => Err(format!("unknown sort direction '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    One(String),
    AnyOf(Vec<String>),
}

/// Exact-match equality constraint on one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub field: String,
    pub value: FilterValue,
}

impl Filter {
    pub fn one(field: impl Into<String>, value: impl Into<String>) -> Self {
        Filter {
            field: field.into(),
            value: FilterValue::One(value.into()),
        }
    }

    pub fn any_of<I, S>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Filter {
            field: field.into(),
            value: FilterValue::AnyOf(values.into_iter().map(Into::into).collect()),
        }
    }

    /// Parses `field=value` or `field=a,b,c`.
    pub fn parse(input: &str) -> Result<Self, String> {
        let (field, values) = input
            .split_once('=')
            .ok_or_else(|| format!("filter '{input}' must look like field=value"))?;
        let field = field.trim();
        if field.is_empty() {
            return Err(format!("filter '{input}' has an empty field name"));
        }
        let values: Vec<&str> = values.split(',').map(str::trim).collect();
        if values.iter().any(|v| v.is_empty()) {
            return Err(format!("filter '{input}' has an empty value"));
        }
        Ok(match values.as_slice() {
            [single] => Filter::one(field, *single),
            many => Filter::any_of(field, many.iter().copied()),
        })
    }

    /// A filter constrains nothing when any accepted value is the `"all"`
    /// sentinel, when its value set is empty, or when the field is not part
    /// of the record kind.
    fn is_active<R: Record>(&self) -> bool {
        let values = self.values();
        !values.is_empty()
            && !values.iter().any(|v| v == ALL_SENTINEL)
            && field_def::<R>(&self.field).is_some()
    }

    fn values(&self) -> &[String] {
        match &self.value {
            FilterValue::One(v) => std::slice::from_ref(v),
            FilterValue::AnyOf(vs) => vs,
        }
    }

    fn accepts<R: Record>(&self, record: &R) -> bool {
        match record.field(&self.field) {
            Some(value) => self.values().iter().any(|raw| value.matches(raw)),
            None => true,
        }
    }
}

/// Inclusive timestamp bounds; a missing bound is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
}

impl DateRange {
    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        self.from.is_none_or(|from| ts >= from) && self.to.is_none_or(|to| ts <= to)
    }

    pub fn parse(from: Option<&str>, to: Option<&str>) -> Result<Self, String> {
        let parse = |raw: &str| {
            parse_timestamp(raw).ok_or_else(|| {
                format!("invalid date '{raw}', expected YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS")
            })
        };
        Ok(DateRange {
            from: from.map(parse).transpose()?,
            to: to.map(parse).transpose()?,
        })
    }
}

/// Relative date windows offered by the order history view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatePreset {
    #[default]
    All,
    Today,
    Week,
    Month,
}

impl DatePreset {
    /// Resolves the preset against a reference instant. Only the lower bound
    /// is set; `All` yields no range.
    pub fn range(&self, now: NaiveDateTime) -> Option<DateRange> {
        let from = match self {
            DatePreset::All => return None,
            DatePreset::Today => now.date().and_hms_opt(0, 0, 0)?,
            DatePreset::Week => now - Duration::days(7),
            DatePreset::Month => now.checked_sub_months(Months::new(1))?,
        };
        Some(DateRange {
            from: Some(from),
            to: None,
        })
    }
}

impl FromStr for DatePreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(DatePreset::All),
            "today" => Ok(DatePreset::Today),
            "week" => Ok(DatePreset::Week),
            "month" => Ok(DatePreset::Month),
            other => Err(format!("unknown date preset '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryParams {
    pub search_text: String,
    pub filters: Vec<Filter>,
    pub date_range: Option<DateRange>,
    pub sort_field: String,
    pub sort_direction: SortDirection,
    pub page: usize,
    pub page_size: usize,
}

impl QueryParams {
    /// Defaults for everything except the sort field: no search, no filters,
    /// ascending, first page of [`DEFAULT_PAGE_SIZE`].
    pub fn sorted_by(field: impl Into<String>) -> Self {
        QueryParams {
            search_text: String::new(),
            filters: Vec::new(),
            date_range: None,
            sort_field: field.into(),
            sort_direction: SortDirection::Ascending,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(bound = "R: Serialize")]
pub struct QueryResult<'a, R> {
    pub items: Vec<&'a R>,
    pub total_matched: usize,
    pub total_pages: usize,
    pub page: usize,
}

impl<R> QueryResult<'_, R> {
    pub fn is_empty(&self) -> bool {
        self.total_matched == 0
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

pub fn query<'a, R: Record>(
    records: &'a [R],
    params: &QueryParams,
) -> Result<QueryResult<'a, R>, QueryError> {
    if params.page_size < 1 {
        return Err(QueryError::InvalidPageSize {
            page_size: params.page_size,
        });
    }
    let sort_field = field_def::<R>(&params.sort_field)
        .ok_or_else(|| QueryError::InvalidField {
            kind: R::KIND,
            field: params.sort_field.clone(),
        })?
        .name;

    let needle = params.search_text.to_lowercase();
    let filters: Vec<&Filter> = params
        .filters
        .iter()
        .filter(|f| f.is_active::<R>())
        .collect();

    let mut matched: Vec<&R> = records
        .iter()
        .filter(|r| matches_search(*r, &needle))
        .filter(|r| filters.iter().all(|f| f.accepts(*r)))
        .filter(|r| within_range(*r, params.date_range.as_ref()))
        .collect();

    // `sort_by` is stable, so equal keys keep input order in both directions.
    matched.sort_by(|a, b| {
        params
            .sort_direction
            .apply(compare_field(*a, *b, sort_field))
    });

    let total_matched = matched.len();
    let total_pages = total_matched.div_ceil(params.page_size).max(1);
    let page = params.page.clamp(1, total_pages);
    let start = (page - 1) * params.page_size;
    let end = (start + params.page_size).min(total_matched);
    let items = matched.get(start..end).map(<[_]>::to_vec).unwrap_or_default();

    Ok(QueryResult {
        items,
        total_matched,
        total_pages,
        page,
    })
}

fn matches_search<R: Record>(record: &R, needle: &str) -> bool {
    needle.is_empty()
        || R::SEARCH_FIELDS.iter().any(|name| match record.field(name) {
            Some(FieldValue::Text(text)) => text.to_lowercase().contains(needle),
            _ => false,
        })
}

fn within_range<R: Record>(record: &R, range: Option<&DateRange>) -> bool {
    match (range, record.timestamp()) {
        (Some(range), Some(ts)) => range.contains(ts),
        _ => true,
    }
}

fn compare_field<R: Record>(a: &R, b: &R, field: &str) -> Ordering {
    match (a.field(field), b.field(field)) {
        (Some(x), Some(y)) => x.compare(&y),
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::holding::Holding;
    use crate::domain::order::{Order, OrderSide, OrderStatus};
    use crate::domain::record::RecordKind;

    fn ts(s: &str) -> NaiveDateTime {
        parse_timestamp(s).unwrap()
    }

    fn order(id: &str, side: OrderSide, status: OrderStatus, at: &str) -> Order {
        Order::new(id, side, "AAPL", 1, 100.0, status, ts(at))
    }

    fn orders() -> Vec<Order> {
        vec![
            order("ORD-1", OrderSide::Buy, OrderStatus::Completed, "2024-06-01T09:00:00"),
            order("ORD-2", OrderSide::Sell, OrderStatus::Processing, "2024-06-05T12:00:00"),
            order("ORD-3", OrderSide::Buy, OrderStatus::Canceled, "2024-06-10T16:30:00"),
            order("ORD-4", OrderSide::Sell, OrderStatus::Completed, "2024-06-14T10:00:00"),
        ]
    }

    fn ids<'a>(result: &QueryResult<'a, Order>) -> Vec<&'a str> {
        result.items.iter().map(|o| o.id()).collect()
    }

    #[test]
    fn unknown_sort_field_is_an_error() {
        let data = orders();
        let err = query(&data, &QueryParams::sorted_by("colour")).unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidField {
                kind: RecordKind::Order,
                field: "colour".into()
            }
        );
    }

    #[test]
    fn sort_field_is_checked_even_for_empty_input() {
        let empty: Vec<Order> = Vec::new();
        assert!(query(&empty, &QueryParams::sorted_by("colour")).is_err());
    }

    #[test]
    fn zero_page_size_is_an_error() {
        let data = orders();
        let params = QueryParams {
            page_size: 0,
            ..QueryParams::sorted_by("id")
        };
        assert_eq!(
            query(&data, &params).unwrap_err(),
            QueryError::InvalidPageSize { page_size: 0 }
        );
    }

    #[test]
    fn all_sentinel_disables_filter() {
        let data = orders();
        let params = QueryParams {
            filters: vec![Filter::one("status", "all"), Filter::one("side", "buy")],
            ..QueryParams::sorted_by("id")
        };
        assert_eq!(ids(&query(&data, &params).unwrap()), vec!["ORD-1", "ORD-3"]);
    }

    #[test]
    fn all_sentinel_inside_set_disables_filter() {
        let data = orders();
        let params = QueryParams {
            filters: vec![Filter::any_of("status", ["completed", "all"])],
            ..QueryParams::sorted_by("id")
        };
        assert_eq!(query(&data, &params).unwrap().total_matched, 4);
    }

    #[test]
    fn unknown_filter_field_is_ignored() {
        let data = orders();
        let params = QueryParams {
            filters: vec![Filter::one("colour", "red")],
            ..QueryParams::sorted_by("id")
        };
        assert_eq!(query(&data, &params).unwrap().total_matched, 4);
    }

    #[test]
    fn set_filter_accepts_any_listed_value() {
        let data = orders();
        let params = QueryParams {
            filters: vec![Filter::any_of("status", ["processing", "canceled"])],
            ..QueryParams::sorted_by("id")
        };
        assert_eq!(ids(&query(&data, &params).unwrap()), vec!["ORD-2", "ORD-3"]);
    }

    #[test]
    fn numeric_filter_matches_parsed_value() {
        let data = vec![
            Holding::new("AAPL", "Apple Inc.", "Technology", 15, 150.0, 180.0),
            Holding::new("MSFT", "Microsoft Corp.", "Technology", 10, 290.0, 378.0),
        ];
        let params = QueryParams {
            filters: vec![Filter::one("quantity", "10")],
            ..QueryParams::sorted_by("symbol")
        };
        let result = query(&data, &params).unwrap();
        assert_eq!(result.total_matched, 1);
        assert_eq!(result.items[0].symbol(), "MSFT");
    }

    #[test]
    fn date_range_bounds_are_inclusive() {
        let data = orders();
        let params = QueryParams {
            date_range: Some(DateRange {
                from: Some(ts("2024-06-05T12:00:00")),
                to: Some(ts("2024-06-10T16:30:00")),
            }),
            ..QueryParams::sorted_by("id")
        };
        assert_eq!(ids(&query(&data, &params).unwrap()), vec!["ORD-2", "ORD-3"]);
    }

    #[test]
    fn open_ended_date_range() {
        let data = orders();
        let params = QueryParams {
            date_range: Some(DateRange {
                from: None,
                to: Some(ts("2024-06-05")),
            }),
            ..QueryParams::sorted_by("id")
        };
        assert_eq!(ids(&query(&data, &params).unwrap()), vec!["ORD-1"]);
    }

    #[test]
    fn date_range_ignored_for_kinds_without_timestamp() {
        let data = vec![Holding::new("AAPL", "Apple Inc.", "Technology", 1, 1.0, 1.0)];
        let params = QueryParams {
            date_range: Some(DateRange {
                from: Some(ts("2030-01-01")),
                to: None,
            }),
            ..QueryParams::sorted_by("symbol")
        };
        assert_eq!(query(&data, &params).unwrap().total_matched, 1);
    }

    #[test]
    fn search_matches_id_case_insensitively() {
        let data = orders();
        let params = QueryParams {
            search_text: "ord-4".into(),
            ..QueryParams::sorted_by("id")
        };
        assert_eq!(ids(&query(&data, &params).unwrap()), vec!["ORD-4"]);
    }

    #[test]
    fn search_does_not_consult_non_search_fields() {
        let data = orders();
        let params = QueryParams {
            search_text: "completed".into(),
            ..QueryParams::sorted_by("id")
        };
        assert!(query(&data, &params).unwrap().is_empty());
    }

    #[test]
    fn page_zero_clamps_to_first_page() {
        let data = orders();
        let params = QueryParams {
            page: 0,
            page_size: 3,
            ..QueryParams::sorted_by("id")
        };
        let result = query(&data, &params).unwrap();
        assert_eq!(result.page, 1);
        assert_eq!(ids(&result), vec!["ORD-1", "ORD-2", "ORD-3"]);
        assert!(!result.has_previous());
        assert!(result.has_next());
    }

    #[test]
    fn descending_timestamp_sort() {
        let data = orders();
        let params = QueryParams {
            sort_direction: SortDirection::Descending,
            ..QueryParams::sorted_by("timestamp")
        };
        assert_eq!(
            ids(&query(&data, &params).unwrap()),
            vec!["ORD-4", "ORD-3", "ORD-2", "ORD-1"]
        );
    }

    #[test]
    fn descending_sort_keeps_ties_in_input_order() {
        let data = orders();
        let params = QueryParams {
            sort_direction: SortDirection::Descending,
            ..QueryParams::sorted_by("side")
        };
        assert_eq!(
            ids(&query(&data, &params).unwrap()),
            vec!["ORD-2", "ORD-4", "ORD-1", "ORD-3"]
        );
    }

    #[test]
    fn filter_parse_single_and_set() {
        assert_eq!(
            Filter::parse("status=completed"),
            Ok(Filter::one("status", "completed"))
        );
        assert_eq!(
            Filter::parse("side = buy, sell"),
            Ok(Filter::any_of("side", ["buy", "sell"]))
        );
        assert!(Filter::parse("status").is_err());
        assert!(Filter::parse("=buy").is_err());
        assert!(Filter::parse("status=a,,b").is_err());
    }

    #[test]
    fn date_range_parse() {
        let range = DateRange::parse(Some("2024-06-01"), None).unwrap();
        assert_eq!(range.from, Some(ts("2024-06-01T00:00:00")));
        assert_eq!(range.to, None);
        assert!(DateRange::parse(Some("June 1"), None).is_err());
    }

    #[test]
    fn date_presets_resolve_against_reference_instant() {
        let now = ts("2024-06-14T15:30:00");
        assert_eq!(DatePreset::All.range(now), None);
        assert_eq!(
            DatePreset::Today.range(now).unwrap().from,
            Some(ts("2024-06-14T00:00:00"))
        );
        assert_eq!(
            DatePreset::Week.range(now).unwrap().from,
            Some(ts("2024-06-07T15:30:00"))
        );
        assert_eq!(
            DatePreset::Month.range(now).unwrap().from,
            Some(ts("2024-05-14T15:30:00"))
        );
    }

    #[test]
    fn week_preset_filters_orders() {
        let data = orders();
        let params = QueryParams {
            date_range: DatePreset::Week.range(ts("2024-06-14T15:30:00")),
            ..QueryParams::sorted_by("id")
        };
        assert_eq!(ids(&query(&data, &params).unwrap()), vec!["ORD-3", "ORD-4"]);
    }

    #[test]
    fn sort_direction_parses() {
        assert_eq!("DESC".parse::<SortDirection>(), Ok(SortDirection::Descending));
        assert_eq!(SortDirection::Ascending.reversed(), SortDirection::Descending);
        assert!("up".parse::<SortDirection>().is_err());
    }
}
