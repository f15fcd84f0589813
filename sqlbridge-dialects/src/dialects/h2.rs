use sqlbridge_core::{data::DataValue, err::Result, sqlil as sql};

use super::hsqldb::{leading_limit_body, leading_limit_head, quote_array_constructor};
use crate::{Collector, ConnectionMetadata, SqlVisitor, ValueQuoter, VisitContext};

/// H2, paging like HyperSQL with `SELECT LIMIT <offset> <limit>` at the head of the
/// statement.
#[derive(Debug, Clone, Copy, Default)]
pub struct H2Visitor;

impl ValueQuoter for H2Visitor {
    fn quote_array(&self, meta: &dyn ConnectionMetadata, values: &[DataValue]) -> Result<String> {
        quote_array_constructor(self, meta, values)
    }
}

impl SqlVisitor for H2Visitor {
    fn name(&self) -> &'static str {
        "h2"
    }

    fn as_quoter(&self) -> &dyn ValueQuoter {
        self
    }

    fn visit_select_body(
        &self,
        ctx: &mut VisitContext,
        select: &sql::SelectStatement,
        out: &mut dyn Collector,
    ) -> Result<()> {
        leading_limit_body(self, ctx, select, out)
    }

    fn visit_select_head(
        &self,
        ctx: &mut VisitContext,
        select: &sql::SelectStatement,
        core: &sql::SelectCore,
        out: &mut dyn Collector,
    ) -> Result<()> {
        leading_limit_head(self, ctx, select, core, out)
    }

    fn visit_limit_offset(
        &self,
        _ctx: &mut VisitContext,
        _select: &sql::SelectStatement,
        _out: &mut dyn Collector,
    ) -> Result<()> {
        Ok(())
    }
}
