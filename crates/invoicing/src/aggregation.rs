//! Line-item aggregation.
//!
//! Pure functions computing line totals and invoice totals. Inputs are assumed to be
//! validated already (quantity >= 1, finite rate >= 0); validation lives with the
//! form controller and the domain constructors.

/// Anything that carries a quantity and a unit rate.
pub trait LineAmount {
    fn quantity(&self) -> i64;
    fn rate(&self) -> f64;

    /// `quantity * rate` for this line.
    fn line_total(&self) -> f64 {
        item_total(self.quantity(), self.rate())
    }
}

/// Total of a single line: `quantity * rate`.
pub fn item_total(quantity: i64, rate: f64) -> f64 {
    quantity as f64 * rate
}

/// Sum of the line totals. Returns 0 for no lines.
pub fn invoice_total<'a, T>(items: impl IntoIterator<Item = &'a T>) -> f64
where
    T: LineAmount + 'a,
{
    items.into_iter().map(LineAmount::line_total).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    struct Line(i64, f64);

    impl LineAmount for Line {
        fn quantity(&self) -> i64 {
            self.0
        }

        fn rate(&self) -> f64 {
            self.1
        }
    }

    #[test]
    fn item_total_multiplies_quantity_by_rate() {
        assert_eq!(item_total(3, 12.5), 37.5);
        assert_eq!(item_total(1, 0.0), 0.0);
    }

    #[test]
    fn empty_invoice_totals_zero() {
        let lines: Vec<Line> = Vec::new();
        assert_eq!(invoice_total(&lines), 0.0);
    }

    #[test]
    fn invoice_total_sums_lines() {
        let lines = vec![Line(2, 100.0), Line(1, 50.0), Line(4, 0.25)];
        assert_eq!(invoice_total(&lines), 251.0);
    }

    proptest! {
        /// Summation does not depend on line order (integer rates keep this exact).
        #[test]
        fn total_is_order_independent(
            lines in prop::collection::vec((1i64..1_000, 0u32..10_000), 0..20)
        ) {
            let lines: Vec<Line> = lines.into_iter().map(|(q, r)| Line(q, r as f64)).collect();
            let mut reversed = lines.clone();
            reversed.reverse();

            prop_assert_eq!(invoice_total(&lines), invoice_total(&reversed));
            prop_assert_eq!(invoice_total(&lines), invoice_total(&lines));
        }
    }
}
