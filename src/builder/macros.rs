//! Macros for writing truth tables inline.

/// Build a [`TruthTable`](crate::core::TruthTable) from literal rows.
///
/// Each row maps a bit-string key to a list of
/// [`Value`](crate::core::Value) variant names. The macro evaluates to the
/// `Result` returned by [`TruthTable::new`](crate::core::TruthTable::new),
/// so shape errors surface at run time like any other table.
///
/// # Example
///
/// ```
/// use logic_sim::truth_table;
/// use logic_sim::core::Value;
///
/// let majority = truth_table! {
///     "000" => [Low],
///     "001" => [Low],
///     "010" => [Low],
///     "011" => [High],
///     "100" => [Low],
///     "101" => [High],
///     "110" => [High],
///     "111" => [High],
/// }
/// .unwrap();
///
/// assert_eq!(majority.input_width(), 3);
/// assert_eq!(
///     majority.lookup(&[Value::High, Value::Low, Value::High]),
///     Some(&[Value::High][..])
/// );
/// ```
#[macro_export]
macro_rules! truth_table {
    (
        $(
            $key:literal => [$($value:ident),* $(,)?]
        ),* $(,)?
    ) => {{
        let rows: ::std::vec::Vec<(&'static str, ::std::vec::Vec<$crate::core::Value>)> =
            ::std::vec![
                $(
                    ($key, ::std::vec![$($crate::core::Value::$value),*])
                ),*
            ];
        $crate::core::TruthTable::new(rows)
    }};
}

#[cfg(test)]
mod tests {
    use crate::core::{TableDefect, Value};

    #[test]
    fn truth_table_macro_builds_table() {
        let table = truth_table! {
            "0" => [High, Undefined],
            "1" => [Low, High],
        }
        .unwrap();

        assert_eq!(table.input_width(), 1);
        assert_eq!(table.output_width(), 2);
        assert_eq!(table.lookup(&[Value::Low]), Some(&[Value::High, Value::Undefined][..]));
    }

    #[test]
    fn truth_table_macro_supports_sources() {
        let table = truth_table! { "" => [High] }.unwrap();
        assert_eq!(table.input_width(), 0);
    }

    #[test]
    fn truth_table_macro_reports_defects() {
        let result = truth_table! {
            "00" => [Low],
            "11" => [High],
        };
        assert!(matches!(result, Err(TableDefect::Incomplete { .. })));

        let empty = truth_table! {};
        assert_eq!(empty, Err(TableDefect::Empty));
    }
}
