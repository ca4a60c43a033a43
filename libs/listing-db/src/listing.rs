//! ListQuery → SeaORM compiler for owner-scoped listing pages.
//!
//! An [`EntityDescriptor`] declares what a listing may filter and sort on.
//! [`ListPlan::build`] turns untrusted request values into a declarative
//! predicate list plus an ordering; [`list_page`] runs the count, page and
//! aggregate queries for that plan.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, Utc};
use listing_core::{
    normalize_search, normalize_token, parse_date, resolve_sort, Aggregate, ListQuery,
    ListResult, OrderBy, SortDir,
};
use sea_orm::{
    sea_query::{
        Alias, Asterisk, BinOper, Expr, Func, LikeExpr, Order, Query, SimpleExpr,
        SubQueryStatement,
    },
    ColumnTrait, Condition, ConnectionTrait, DbBackend, DbErr, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, QueryTrait, RelationDef, Select,
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::classify_db_err;
use crate::ListingError;

/// Field every ordering ends with.
pub const TIEBREAKER: &str = "id";

/// Value type of an exact-match filter; raw input that does not parse is ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    I64,
    Uuid,
}

impl FieldKind {
    fn coerce(self, raw: &str) -> Option<sea_orm::Value> {
        let raw = raw.trim();
        match self {
            FieldKind::I64 => raw.parse::<i64>().ok().map(Into::into),
            FieldKind::Uuid => raw.parse::<Uuid>().ok().map(Into::into),
        }
    }
}

/// How a named filter constrains the listing.
#[derive(Clone, Debug)]
pub enum FilterOp<E: EntityTrait> {
    /// Equality on an enumerated value; values outside `allowed` are ignored.
    OneOf {
        col: E::Column,
        allowed: &'static [&'static str],
    },
    /// Equality on a typed value.
    Exact { col: E::Column, kind: FieldKind },
    /// Case-insensitive substring, OR-ed across `exprs`.
    Search { exprs: Vec<SimpleExpr> },
    /// `col >= start of day`.
    OnOrAfter { col: E::Column },
    /// `col < start of next day`, so the bound date is included.
    OnOrBefore { col: E::Column },
}

#[derive(Clone, Debug)]
pub struct FilterSpec<E: EntityTrait> {
    pub name: &'static str,
    pub op: FilterOp<E>,
}

/// Sortable field: a real column or the alias of a derived column.
#[derive(Clone, Debug)]
pub enum SortField<E: EntityTrait> {
    Column(E::Column),
    Derived(&'static str),
}

/// Statistic computed over the filtered, unpaginated set.
#[derive(Clone, Debug)]
pub enum AggregateSpec<E: EntityTrait> {
    /// Row count per value of `col`. Every bucket is reported, zero when empty.
    CountBy {
        name: &'static str,
        col: E::Column,
        buckets: &'static [&'static str],
    },
    /// Sum of an integer column, 0 when nothing matches.
    Sum { name: &'static str, col: E::Column },
    /// Rows of a child table whose `fk` points at a matching row, counted per `group`.
    RelatedCountBy {
        name: &'static str,
        table: &'static str,
        fk: &'static str,
        group: &'static str,
        buckets: &'static [&'static str],
    },
}

impl<E: EntityTrait> AggregateSpec<E> {
    pub fn name(&self) -> &'static str {
        match self {
            AggregateSpec::CountBy { name, .. }
            | AggregateSpec::Sum { name, .. }
            | AggregateSpec::RelatedCountBy { name, .. } => name,
        }
    }
}

/// What a listing over `E` may filter, sort and aggregate on.
#[derive(Clone, Debug)]
pub struct EntityDescriptor<E: EntityTrait> {
    name: &'static str,
    owner: E::Column,
    id: E::Column,
    filters: Vec<FilterSpec<E>>,
    fields: HashMap<&'static str, SortField<E>>,
    derived: Vec<(&'static str, SimpleExpr)>,
    joins: Vec<fn() -> RelationDef>,
    sorts: Vec<(&'static str, OrderBy)>,
    default_sort: &'static str,
    aggregates: Vec<AggregateSpec<E>>,
}

impl<E> EntityDescriptor<E>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    pub fn new(name: &'static str, owner: E::Column, id: E::Column) -> Self {
        let mut fields = HashMap::new();
        fields.insert(TIEBREAKER, SortField::Column(id));
        Self {
            name,
            owner,
            id,
            filters: Vec::new(),
            fields,
            derived: Vec::new(),
            joins: Vec::new(),
            sorts: Vec::new(),
            default_sort: "",
            aggregates: Vec::new(),
        }
    }

    /// Filters apply in declaration order.
    pub fn filter(mut self, name: &'static str, op: FilterOp<E>) -> Self {
        self.filters.push(FilterSpec { name, op });
        self
    }

    pub fn field(mut self, name: &'static str, col: E::Column) -> Self {
        self.fields.insert(name, SortField::Column(col));
        self
    }

    /// Extra projected column, also usable as a sort field.
    pub fn derived(mut self, alias: &'static str, expr: SimpleExpr) -> Self {
        self.derived.push((alias, expr));
        self.fields.insert(alias, SortField::Derived(alias));
        self
    }

    /// LEFT JOIN applied to every query of the listing. Must not multiply rows.
    pub fn join(mut self, rel: fn() -> RelationDef) -> Self {
        self.joins.push(rel);
        self
    }

    pub fn sort(mut self, key: &'static str, order: OrderBy) -> Self {
        self.sorts.push((key, order));
        self
    }

    pub fn default_sort(mut self, key: &'static str) -> Self {
        self.default_sort = key;
        self
    }

    pub fn aggregate(mut self, spec: AggregateSpec<E>) -> Self {
        self.aggregates.push(spec);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn sort_keys(&self) -> Vec<&'static str> {
        self.sorts.iter().map(|(k, _)| *k).collect()
    }

    pub fn filter_names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|f| f.name).collect()
    }

    pub fn aggregates(&self) -> &[AggregateSpec<E>] {
        &self.aggregates
    }

    fn filter_op(&self, name: &str) -> Option<&FilterOp<E>> {
        self.filters.iter().find(|f| f.name == name).map(|f| &f.op)
    }

    fn order_for(&self, key: &str) -> OrderBy {
        self.sorts
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, o)| o.clone())
            .unwrap_or_default()
    }
}

/// One normalized constraint of a listing query, named after the filter that produced it.
#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    Owner(Uuid),
    Equals {
        filter: &'static str,
        value: sea_orm::Value,
    },
    /// Substring as entered (trimmed); case folding happens per backend.
    Contains {
        filter: &'static str,
        term: String,
    },
    AtOrAfter {
        filter: &'static str,
        at: DateTime<Utc>,
    },
    Before {
        filter: &'static str,
        at: DateTime<Utc>,
    },
}

fn start_of_day(d: NaiveDate) -> Option<DateTime<Utc>> {
    d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc())
}

/// Escape LIKE wildcards so user input matches literally (escape char `\`).
pub fn like_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '%' | '_' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            c => out.push(c),
        }
    }
    out
}

/// `LOWER(col) LIKE` pattern for backends whose `LOWER` folds Unicode.
pub fn like_contains(term: &str) -> String {
    format!("%{}%", like_escape(&term.to_lowercase()))
}

/// Case-insensitive `GLOB` pattern for SQLite, whose `LOWER`/`LIKE` fold ASCII only.
/// Every cased letter becomes a `[..]` class of its simple case variants and
/// the GLOB metacharacters `*`, `?`, `[` are bracketed so they match literally.
pub fn glob_contains(term: &str) -> String {
    fn single(mut it: impl Iterator<Item = char>) -> Option<char> {
        match (it.next(), it.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }

    let mut out = String::with_capacity(term.len() * 4 + 2);
    out.push('*');
    for ch in term.chars() {
        let mut variants = vec![ch];
        for v in [single(ch.to_lowercase()), single(ch.to_uppercase())]
            .into_iter()
            .flatten()
        {
            if !variants.contains(&v) {
                variants.push(v);
            }
        }
        match ch {
            '*' | '?' | '[' => {
                out.push('[');
                out.push(ch);
                out.push(']');
            }
            _ if variants.len() > 1 => {
                out.push('[');
                out.extend(variants);
                out.push(']');
            }
            _ => out.push(ch),
        }
    }
    out.push('*');
    out
}

/// Compiled form of a [`ListQuery`] against one descriptor.
#[derive(Debug)]
pub struct ListPlan<'a, E: EntityTrait> {
    desc: &'a EntityDescriptor<E>,
    backend: DbBackend,
    pub predicates: Vec<Predicate>,
    pub sort: &'static str,
    pub order: OrderBy,
    pub page: u64,
    pub page_size: u64,
    pub offset: u64,
}

impl<'a, E> ListPlan<'a, E>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    /// Owner first, then one predicate per recognized, usable filter value in
    /// declaration order. Unknown names and unusable values are dropped.
    /// `backend` selects how search predicates fold case.
    pub fn build(desc: &'a EntityDescriptor<E>, query: &ListQuery, backend: DbBackend) -> Self {
        let mut predicates = vec![Predicate::Owner(query.owner_id)];

        for spec in &desc.filters {
            let Some(raw) = query.filter(spec.name) else {
                continue;
            };
            let predicate = match &spec.op {
                FilterOp::OneOf { allowed, .. } => {
                    normalize_token(raw, Some(*allowed)).map(|token| Predicate::Equals {
                        filter: spec.name,
                        value: token.into(),
                    })
                }
                FilterOp::Exact { kind, .. } => kind.coerce(raw).map(|value| Predicate::Equals {
                    filter: spec.name,
                    value,
                }),
                FilterOp::Search { .. } => normalize_search(raw).map(|term| Predicate::Contains {
                    filter: spec.name,
                    term,
                }),
                FilterOp::OnOrAfter { .. } => parse_date(raw)
                    .and_then(start_of_day)
                    .map(|at| Predicate::AtOrAfter {
                        filter: spec.name,
                        at,
                    }),
                FilterOp::OnOrBefore { .. } => parse_date(raw)
                    .and_then(|d| d.succ_opt())
                    .and_then(start_of_day)
                    .map(|at| Predicate::Before {
                        filter: spec.name,
                        at,
                    }),
            };
            if let Some(p) = predicate {
                predicates.push(p);
            }
        }

        let keys = desc.sort_keys();
        let sort = resolve_sort(query.sort.as_deref(), &keys, desc.default_sort);
        let order = desc
            .order_for(sort)
            .ensure_tiebreaker(TIEBREAKER, SortDir::Asc);

        Self {
            desc,
            backend,
            predicates,
            sort,
            order,
            page: query.page,
            page_size: query.page_size,
            offset: query.offset(),
        }
    }

    /// All predicates AND-ed into one condition.
    pub fn condition(&self) -> Condition {
        self.predicates
            .iter()
            .fold(Condition::all(), |cond, p| match self.compile(p) {
                Some(c) => cond.add(c),
                None => cond,
            })
    }

    fn compile(&self, p: &Predicate) -> Option<Condition> {
        let op = match p {
            Predicate::Owner(owner) => {
                return Some(Condition::all().add(self.desc.owner.eq(*owner)));
            }
            Predicate::Equals { filter, .. }
            | Predicate::Contains { filter, .. }
            | Predicate::AtOrAfter { filter, .. }
            | Predicate::Before { filter, .. } => self.desc.filter_op(filter)?,
        };

        let cond = match (op, p) {
            (FilterOp::OneOf { col, .. }, Predicate::Equals { value, .. })
            | (FilterOp::Exact { col, .. }, Predicate::Equals { value, .. }) => {
                Condition::all().add(col.eq(value.clone()))
            }
            (FilterOp::Search { exprs }, Predicate::Contains { term, .. }) => {
                if self.backend == DbBackend::Sqlite {
                    let pattern = glob_contains(term);
                    exprs.iter().fold(Condition::any(), |any, e| {
                        any.add(
                            Expr::expr(e.clone())
                                .binary(BinOper::Custom("GLOB"), Expr::val(pattern.clone())),
                        )
                    })
                } else {
                    let pattern = like_contains(term);
                    exprs.iter().fold(Condition::any(), |any, e| {
                        any.add(
                            Expr::expr(Func::lower(e.clone()))
                                .like(LikeExpr::new(pattern.clone()).escape('\\')),
                        )
                    })
                }
            }
            (FilterOp::OnOrAfter { col }, Predicate::AtOrAfter { at, .. }) => {
                Condition::all().add(col.gte(*at))
            }
            (FilterOp::OnOrBefore { col }, Predicate::Before { at, .. }) => {
                Condition::all().add(col.lt(*at))
            }
            _ => return None,
        };
        Some(cond)
    }

    /// Joins and WHERE clause shared by every query of the plan.
    pub fn base(&self) -> Select<E> {
        let mut select = E::find();
        for rel in &self.desc.joins {
            select = select.join(JoinType::LeftJoin, rel());
        }
        select.filter(self.condition())
    }

    /// Page query: base plus derived columns, ordering and LIMIT/OFFSET.
    pub fn page_select(&self) -> Select<E> {
        let mut select = self.base();
        for (alias, expr) in &self.desc.derived {
            select = select.column_as(expr.clone(), *alias);
        }
        for key in &self.order.0 {
            let ord = match key.dir {
                SortDir::Asc => Order::Asc,
                SortDir::Desc => Order::Desc,
            };
            select = match self.desc.fields.get(key.field.as_str()) {
                Some(SortField::Column(col)) => select.order_by(*col, ord),
                Some(SortField::Derived(alias)) => {
                    select.order_by(SimpleExpr::from(Expr::col(Alias::new(*alias))), ord)
                }
                None => select,
            };
        }
        select.limit(self.page_size).offset(self.offset)
    }

    async fn aggregate<C: ConnectionTrait>(
        &self,
        conn: &C,
        spec: &AggregateSpec<E>,
    ) -> Result<Aggregate, DbErr> {
        match spec {
            AggregateSpec::CountBy { col, buckets, .. } => {
                let rows: Vec<(String, i64)> = self
                    .base()
                    .select_only()
                    .column(*col)
                    .column_as(Expr::col(Asterisk).count(), "n")
                    .group_by(*col)
                    .into_tuple()
                    .all(conn)
                    .await?;
                Ok(Aggregate::Counts(zero_filled(buckets, rows)))
            }
            AggregateSpec::Sum { col, .. } => {
                let total = SimpleExpr::from(Func::cast_as(
                    Func::coalesce([
                        Expr::col(col.as_column_ref()).sum(),
                        Expr::val(0i64).into(),
                    ]),
                    Alias::new("BIGINT"),
                ));
                let sum: Option<i64> = self
                    .base()
                    .select_only()
                    .column_as(total, "total")
                    .into_tuple()
                    .one(conn)
                    .await?;
                Ok(Aggregate::Sum(sum.unwrap_or(0)))
            }
            AggregateSpec::RelatedCountBy {
                table,
                fk,
                group,
                buckets,
                ..
            } => {
                let ids = self
                    .base()
                    .select_only()
                    .column(self.desc.id)
                    .into_query();
                let stmt = Query::select()
                    .column(Alias::new(*group))
                    .expr_as(Expr::col(Asterisk).count(), Alias::new("n"))
                    .from(Alias::new(*table))
                    .and_where(Expr::col(Alias::new(*fk)).in_subquery(ids))
                    .group_by_col(Alias::new(*group))
                    .to_owned();
                let backend = conn.get_database_backend();
                let mut rows = Vec::new();
                for row in conn.query_all(backend.build(&stmt)).await? {
                    let key: String = row.try_get_by_index(0)?;
                    let n: i64 = row.try_get_by_index(1)?;
                    rows.push((key, n));
                }
                Ok(Aggregate::Counts(zero_filled(buckets, rows)))
            }
        }
    }
}

fn zero_filled(buckets: &[&str], rows: Vec<(String, i64)>) -> BTreeMap<String, u64> {
    let mut out: BTreeMap<String, u64> = buckets.iter().map(|b| (b.to_string(), 0)).collect();
    for (key, n) in rows {
        *out.entry(key).or_insert(0) += n.max(0) as u64;
    }
    out
}

/// Correlated `SELECT COUNT(*) FROM table WHERE table.fk = parent` for use as a derived column.
pub fn related_count(table: &'static str, fk: &'static str, parent: impl ColumnTrait) -> SimpleExpr {
    let sub = Query::select()
        .expr(Expr::col(Asterisk).count())
        .from(Alias::new(table))
        .and_where(Expr::col((Alias::new(table), Alias::new(fk))).equals(parent.as_column_ref()))
        .to_owned();
    SimpleExpr::SubQuery(None, Box::new(SubQueryStatement::SelectStatement(sub)))
}

/// Table-qualified column expression, for search over joined tables.
pub fn qualified(col: impl ColumnTrait) -> SimpleExpr {
    Expr::col(col.as_column_ref()).into()
}

/// Run one listing: count, page (skipped past the last row) and every aggregate,
/// all under the same owner and filter predicates.
pub async fn list_page<E, R, D, C, F>(
    conn: &C,
    desc: &EntityDescriptor<E>,
    query: &ListQuery,
    map: F,
) -> Result<ListResult<D>, ListingError>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
    R: FromQueryResult + Send + Sync,
    C: ConnectionTrait,
    F: FnMut(R) -> D,
{
    let plan = ListPlan::build(desc, query, conn.get_database_backend());
    debug!(
        entity = desc.name(),
        predicates = ?plan.predicates,
        order = %plan.order,
        page = plan.page,
        page_size = plan.page_size,
        "compiled listing query"
    );

    let fail = |e: DbErr| {
        let err = classify_db_err(desc.name(), e);
        warn!(entity = desc.name(), error = %err, "listing query failed");
        err
    };

    let total: Option<i64> = plan
        .base()
        .select_only()
        .column_as(Expr::col(Asterisk).count(), "n")
        .into_tuple()
        .one(conn)
        .await
        .map_err(fail)?;
    let total = total.unwrap_or(0).max(0) as u64;

    let rows: Vec<R> = if plan.offset >= total {
        Vec::new()
    } else {
        plan.page_select()
            .into_model::<R>()
            .all(conn)
            .await
            .map_err(fail)?
    };

    let mut result = ListResult::new(rows, total, plan.page, plan.page_size).map_rows(map);
    for spec in desc.aggregates() {
        let value = plan.aggregate(conn, spec).await.map_err(fail)?;
        result = result.with_aggregate(spec.name(), value);
    }

    debug!(
        entity = desc.name(),
        total_count = result.total_count,
        rows = result.rows.len(),
        "listing page loaded"
    );
    Ok(result)
}

#[cfg(test)]
#[path = "listing_tests.rs"]
mod listing_tests;
