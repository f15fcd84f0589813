use std::fmt::{self, Debug, Display};

/// Truncates the formatted value to at most `limit` characters when logged
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MaxLogLength<'a, T> {
    limit: Option<usize>,
    val: &'a T,
}

impl<'a, T> MaxLogLength<'a, T> {
    pub fn new(limit: Option<usize>, val: &'a T) -> Self {
        Self { limit, val }
    }

    fn write_limited(&self, f: &mut fmt::Formatter<'_>, fmt: String) -> fmt::Result {
        match self.limit {
            Some(limit) if fmt.chars().count() > limit => {
                let cut = fmt
                    .char_indices()
                    .nth(limit)
                    .map(|(idx, _)| idx)
                    .unwrap_or(fmt.len());
                write!(f, "{}...", &fmt[..cut])
            }
            _ => write!(f, "{}", fmt),
        }
    }
}

impl<'a, T: Debug> Debug for MaxLogLength<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_limited(f, format!("{:?}", self.val))
    }
}

impl<'a, T: Display> Display for MaxLogLength<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_limited(f, format!("{}", self.val))
    }
}
