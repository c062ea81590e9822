use crate::error::ApiError;
use crate::period::PeriodRange;
use crate::routes::AppState;
use axum::extract::{Json, Query, State};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::types::chrono::NaiveDate;
use sqlx::{Column, PgPool, Postgres, QueryBuilder, Row, TypeInfo};

/// A row from one of the wide per-category tables, keyed by stored column name.
pub type Record = serde_json::Map<String, Value>;

pub const NO_DATA: &str = "No data found.";
pub const NO_DATA_FOR_YEAR: &str = "No data found for that year.";

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct YearQuery {
    pub year: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub database: &'static str,
}

pub async fn root(State(state): State<AppState>) -> Json<Health> {
    let database = match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => "up",
        Err(e) => {
            tracing::warn!(error = %e, "database ping failed");
            "down"
        }
    };
    Json(Health {
        status: "ok",
        database,
    })
}

pub async fn list_categories_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryRow>>, ApiError> {
    let rows = list_categories_db(&state.pool)
        .await
        .map_err(|e| state.db_error(e))?;
    Ok(Json(rows_or_not_found(rows, NO_DATA)?))
}

pub async fn list_categories_db(pool: &PgPool) -> Result<Vec<CategoryRow>, sqlx::Error> {
    sqlx::query_as::<_, CategoryRow>(
        r#"
        SELECT name_geo, name_en, code, level, title_geo, title_en
        FROM personaltitle
        ORDER BY level, code
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn list_group_index_handler(
    State(state): State<AppState>,
    Query(q): Query<RangeQuery>,
) -> Result<Json<Vec<Record>>, ApiError> {
    index_range_response(&state, IndexTable::Groups, &q).await
}

pub async fn list_subgroup_index_handler(
    State(state): State<AppState>,
    Query(q): Query<RangeQuery>,
) -> Result<Json<Vec<Record>>, ApiError> {
    index_range_response(&state, IndexTable::SubGroups, &q).await
}

async fn index_range_response(
    state: &AppState,
    table: IndexTable,
    q: &RangeQuery,
) -> Result<Json<Vec<Record>>, ApiError> {
    let range = PeriodRange::from_query(q.from.as_deref(), q.to.as_deref())
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let rows = list_index_db(&state.pool, table, range.as_ref())
        .await
        .map_err(|e| state.db_error(e))?;
    tracing::debug!(table = table.name(), rows = rows.len(), "index range fetched");
    Ok(Json(rows_or_not_found(rows, NO_DATA)?))
}

/// The two monthly price-index tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexTable {
    Groups,
    SubGroups,
}

impl IndexTable {
    pub fn name(self) -> &'static str {
        match self {
            IndexTable::Groups => "infogroups",
            IndexTable::SubGroups => "subgroupindex",
        }
    }
}

pub fn index_range_query(
    table: IndexTable,
    range: Option<&PeriodRange>,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT * FROM {}", table.name()));
    if let Some(r) = range {
        qb.push(r#" WHERE ("Year", "Month") >= ("#);
        qb.push_bind(r.from.year);
        qb.push(", ");
        qb.push_bind(r.from.month);
        qb.push(r#") AND ("Year", "Month") <= ("#);
        qb.push_bind(r.to.year);
        qb.push(", ");
        qb.push_bind(r.to.month);
        qb.push(")");
    }
    // first and last rows are the interval endpoints on the client
    qb.push(r#" ORDER BY "Year", "Month""#);
    qb
}

pub async fn list_index_db(
    pool: &PgPool,
    table: IndexTable,
    range: Option<&PeriodRange>,
) -> Result<Vec<Record>, sqlx::Error> {
    let rows = index_range_query(table, range)
        .build()
        .fetch_all(pool)
        .await?;
    rows.iter().map(record_from_row).collect()
}

pub async fn list_group_prices_handler(
    State(state): State<AppState>,
    Query(q): Query<YearQuery>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let year = non_empty(q.year.as_deref()).map(parse_year).transpose()?;
    let rows = list_group_prices_db(&state.pool, year)
        .await
        .map_err(|e| state.db_error(e))?;
    Ok(Json(rows_or_not_found(rows, NO_DATA)?))
}

pub async fn list_group_prices_db(
    pool: &PgPool,
    year: Option<i32>,
) -> Result<Vec<Record>, sqlx::Error> {
    let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM groupprices");
    // the year lives in the "Date" column of this table
    if let Some(y) = year {
        qb.push(r#" WHERE "Date" = "#);
        qb.push_bind(y);
    }
    qb.push(r#" ORDER BY "Date""#);
    let rows = qb.build().fetch_all(pool).await?;
    rows.iter().map(record_from_row).collect()
}

pub async fn list_subgroup_weights_handler(
    State(state): State<AppState>,
    Query(q): Query<YearQuery>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let raw = non_empty(q.year.as_deref())
        .ok_or_else(|| ApiError::BadRequest("Year parameter is required".to_string()))?;
    let year = parse_year(raw)?;
    let rows = list_subgroup_weights_db(&state.pool, year)
        .await
        .map_err(|e| state.db_error(e))?;
    Ok(Json(rows_or_not_found(rows, NO_DATA_FOR_YEAR)?))
}

pub async fn list_subgroup_weights_db(
    pool: &PgPool,
    year: i32,
) -> Result<Vec<Record>, sqlx::Error> {
    let rows = sqlx::query(r#"SELECT * FROM subgroupweights WHERE "Year" = $1"#)
        .bind(year)
        .fetch_all(pool)
        .await?;
    rows.iter().map(record_from_row).collect()
}

pub fn parse_year(raw: &str) -> Result<i32, ApiError> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| ApiError::BadRequest(format!("invalid year '{raw}'")))
}

/// A blank query value is treated as if it were not sent.
fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.filter(|s| !s.trim().is_empty())
}

pub fn rows_or_not_found<T>(rows: Vec<T>, message: &str) -> Result<Vec<T>, ApiError> {
    if rows.is_empty() {
        Err(ApiError::NotFound(message.to_string()))
    } else {
        Ok(rows)
    }
}

/// Decodes a row of unknown width. Numeric columns become JSON numbers.
pub fn record_from_row(row: &PgRow) -> Result<Record, sqlx::Error> {
    let mut record = Record::new();
    for (idx, column) in row.columns().iter().enumerate() {
        let value = match column.type_info().name() {
            "INT2" => row.try_get::<Option<i16>, _>(idx)?.map(Value::from),
            "INT4" => row.try_get::<Option<i32>, _>(idx)?.map(Value::from),
            "INT8" => row.try_get::<Option<i64>, _>(idx)?.map(Value::from),
            "FLOAT4" => row.try_get::<Option<f32>, _>(idx)?.map(Value::from),
            "FLOAT8" => row.try_get::<Option<f64>, _>(idx)?.map(Value::from),
            "NUMERIC" => row
                .try_get::<Option<Decimal>, _>(idx)?
                .and_then(|d| d.to_f64())
                .map(Value::from),
            "BOOL" => row.try_get::<Option<bool>, _>(idx)?.map(Value::from),
            "DATE" => row
                .try_get::<Option<NaiveDate>, _>(idx)?
                .map(|d| Value::from(d.to_string())),
            _ => row.try_get::<Option<String>, _>(idx)?.map(Value::from),
        };
        record.insert(column.name().to_string(), value.unwrap_or(Value::Null));
    }
    Ok(record)
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CategoryRow {
    pub name_geo: String,
    pub name_en: String,
    pub code: i32,
    pub level: i32,
    pub title_geo: Option<String>,
    pub title_en: Option<String>,
}
