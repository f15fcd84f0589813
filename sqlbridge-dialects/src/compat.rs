use sqlbridge_core::{
    err::{bail, Result},
    sqlil as sql,
};

use crate::{BindCollector, Collector, PlaceholderStyle, QueryParam, SqlVisitor, VisitContext};

/// A compiler producing SQL text with `?` placeholders, appending the bind
/// values for those placeholders to `params` in order
pub trait LegacyCompiler {
    fn compile_legacy(
        &self,
        ctx: &mut VisitContext,
        query: &sql::Query,
        params: &mut Vec<QueryParam>,
    ) -> Result<String>;
}

/// Runs a [`LegacyCompiler`] against a [`Collector`]
pub struct LegacyAdapter<C: LegacyCompiler> {
    inner: C,
}

impl<C: LegacyCompiler> LegacyAdapter<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    pub fn compile(
        &self,
        ctx: &mut VisitContext,
        query: &sql::Query,
        out: &mut dyn Collector,
    ) -> Result<()> {
        let mut params = vec![];
        let sql = self.inner.compile_legacy(ctx, query, &mut params)?;
        let fragments = split_placeholders(&sql);

        if fragments.len() - 1 != params.len() {
            bail!(
                "Compiled query has {} placeholders but {} bind values",
                fragments.len() - 1,
                params.len()
            );
        }

        let mut params = params.into_iter();
        for (idx, fragment) in fragments.iter().enumerate() {
            if idx > 0 {
                if let Some(param) = params.next() {
                    out.add_bind(param);
                }
            }
            out.push_sql(fragment);
        }

        Ok(())
    }
}

/// Compiles the query with a collector-based visitor, returning the SQL with `?`
/// placeholders and appending the bind values to `params`
pub fn compile_to_string(
    visitor: &dyn SqlVisitor,
    ctx: &mut VisitContext,
    query: &sql::Query,
    params: &mut Vec<QueryParam>,
) -> Result<String> {
    let mut out = BindCollector::new(PlaceholderStyle::QuestionMark);
    visitor.visit_query(ctx, query, &mut out)?;
    let compiled = out.compile(visitor.as_quoter(), ctx.meta())?;

    params.extend(compiled.params);
    Ok(compiled.sql)
}

impl LegacyCompiler for &dyn SqlVisitor {
    fn compile_legacy(
        &self,
        ctx: &mut VisitContext,
        query: &sql::Query,
        params: &mut Vec<QueryParam>,
    ) -> Result<String> {
        compile_to_string(*self, ctx, query, params)
    }
}

/// Splits the SQL at each `?` which is not within a string literal or a quoted
/// identifier
fn split_placeholders(sql: &str) -> Vec<&str> {
    let mut fragments = vec![];
    let mut closing: Option<char> = None;
    let mut start = 0;

    for (idx, c) in sql.char_indices() {
        match (closing, c) {
            (Some(end), c) if c == end => closing = None,
            (Some(_), _) => {}
            (None, '\'') => closing = Some('\''),
            (None, '"') => closing = Some('"'),
            (None, '[') => closing = Some(']'),
            (None, '?') => {
                fragments.push(&sql[start..idx]);
                start = idx + 1;
            }
            (None, _) => {}
        }
    }

    fragments.push(&sql[start..]);
    fragments
}
