use crate::{SqlVisitor, ValueQuoter};

/// ANSI SQL with a trailing `LIMIT n OFFSET m`
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericVisitor;

impl ValueQuoter for GenericVisitor {}

impl SqlVisitor for GenericVisitor {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn as_quoter(&self) -> &dyn ValueQuoter {
        self
    }
}
