use sqlbridge_core::err::Result;

use crate::{CompiledQuery, ConnectionMetadata, QueryParam, ValueQuoter};

/// Receives the output of a visitor: SQL fragments interleaved with bind values
pub trait Collector {
    /// Appends raw SQL text
    fn push_sql(&mut self, sql: &str);

    /// Appends a bind value at the current position
    fn add_bind(&mut self, param: QueryParam);

    /// Renders the collected fragments into the final SQL text along with
    /// the bind values which remain as placeholders, in order
    fn compile(
        &self,
        quoter: &dyn ValueQuoter,
        meta: &dyn ConnectionMetadata,
    ) -> Result<CompiledQuery>;
}

/// How bind placeholders are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// `?`
    QuestionMark,
    /// `$1`, `$2`, ...
    Numbered,
    /// `:p1`, `:p2`, ...
    Named,
}

impl PlaceholderStyle {
    /// Renders the placeholder of the n'th bind, starting from 1
    pub fn placeholder(&self, n: usize) -> String {
        match self {
            PlaceholderStyle::QuestionMark => "?".into(),
            PlaceholderStyle::Numbered => format!("${n}"),
            PlaceholderStyle::Named => format!(":p{n}"),
        }
    }
}

impl Default for PlaceholderStyle {
    fn default() -> Self {
        Self::QuestionMark
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Part {
    Sql(String),
    Bind(usize),
}

/// Ordered SQL fragments and bind values shared by the collectors
#[derive(Debug, Clone, PartialEq, Default)]
struct Parts {
    parts: Vec<Part>,
    binds: Vec<QueryParam>,
}

impl Parts {
    fn push_sql(&mut self, sql: &str) {
        if let Some(Part::Sql(last)) = self.parts.last_mut() {
            last.push_str(sql);
        } else {
            self.parts.push(Part::Sql(sql.to_string()));
        }
    }

    fn add_bind(&mut self, param: QueryParam) {
        self.parts.push(Part::Bind(self.binds.len()));
        self.binds.push(param);
    }
}

/// Renders every bind value as a placeholder
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BindCollector {
    style: PlaceholderStyle,
    parts: Parts,
}

impl BindCollector {
    pub fn new(style: PlaceholderStyle) -> Self {
        Self {
            style,
            parts: Parts::default(),
        }
    }
}

impl Collector for BindCollector {
    fn push_sql(&mut self, sql: &str) {
        self.parts.push_sql(sql)
    }

    fn add_bind(&mut self, param: QueryParam) {
        self.parts.add_bind(param)
    }

    fn compile(&self, _: &dyn ValueQuoter, _: &dyn ConnectionMetadata) -> Result<CompiledQuery> {
        let sql = self
            .parts
            .parts
            .iter()
            .map(|p| match p {
                Part::Sql(sql) => sql.clone(),
                Part::Bind(idx) => self.style.placeholder(idx + 1),
            })
            .collect::<String>();

        Ok(CompiledQuery::new(sql, self.parts.binds.clone()))
    }
}

/// Inlines constant values as dialect-quoted literals.
///
/// Dynamic parameters, and constants the quoter refuses to inline (eg binary data),
/// are still rendered as placeholders.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubstituteCollector {
    style: PlaceholderStyle,
    parts: Parts,
}

impl SubstituteCollector {
    pub fn new(style: PlaceholderStyle) -> Self {
        Self {
            style,
            parts: Parts::default(),
        }
    }
}

impl Collector for SubstituteCollector {
    fn push_sql(&mut self, sql: &str) {
        self.parts.push_sql(sql)
    }

    fn add_bind(&mut self, param: QueryParam) {
        self.parts.add_bind(param)
    }

    fn compile(
        &self,
        quoter: &dyn ValueQuoter,
        meta: &dyn ConnectionMetadata,
    ) -> Result<CompiledQuery> {
        let mut sql = String::new();
        let mut params = vec![];

        for part in self.parts.parts.iter() {
            match part {
                Part::Sql(s) => sql.push_str(s),
                Part::Bind(idx) => match &self.parts.binds[*idx] {
                    QueryParam::Constant(val) if quoter.can_inline(val) => {
                        sql.push_str(&quoter.quote_value(meta, val)?)
                    }
                    param => {
                        params.push(param.clone());
                        sql.push_str(&self.style.placeholder(params.len()));
                    }
                },
            }
        }

        Ok(CompiledQuery::new(sql, params))
    }
}

/// Wraps another collector, transforming the compiled SQL
pub struct ProxyCollector<C: Collector> {
    inner: C,
    transform: Box<dyn Fn(String) -> String>,
}

impl<C: Collector> ProxyCollector<C> {
    pub fn new(inner: C, transform: impl Fn(String) -> String + 'static) -> Self {
        Self {
            inner,
            transform: Box::new(transform),
        }
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: Collector> Collector for ProxyCollector<C> {
    fn push_sql(&mut self, sql: &str) {
        self.inner.push_sql(sql)
    }

    fn add_bind(&mut self, param: QueryParam) {
        self.inner.add_bind(param)
    }

    fn compile(
        &self,
        quoter: &dyn ValueQuoter,
        meta: &dyn ConnectionMetadata,
    ) -> Result<CompiledQuery> {
        let compiled = self.inner.compile(quoter, meta)?;

        Ok(CompiledQuery::new(
            (self.transform)(compiled.sql),
            compiled.params,
        ))
    }
}
