//! Minimal canonical SQL rendering.

use alloc::string::String;

/// Types that can render themselves as a SQL fragment.
pub trait FormatSql {
    /// Appends the SQL rendering of `self` to `buf`.
    fn output(&self, buf: &mut String);

    /// Renders `self` into a fresh string.
    fn format_sql(&self) -> String {
        let mut sql = String::new();
        self.output(&mut sql);
        sql
    }
}

impl<T: FormatSql + ?Sized> FormatSql for alloc::boxed::Box<T> {
    fn output(&self, buf: &mut String) {
        T::output(self, buf);
    }
}

/// Renders `items` separated by `", "`.
pub(crate) fn output_list<T: FormatSql>(items: &[T], buf: &mut String) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            buf.push_str(", ");
        }
        item.output(buf);
    }
}
