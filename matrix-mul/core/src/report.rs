use crate::Matrix;
use std::fmt;
use std::time::Duration;

/// Printable result of a successful run
///
/// ```text
/// Result of A*W = [
/// 19 22
/// 43 50
/// ]
/// Runtime 0.001234 seconds
/// ```
pub struct ProductReport<'a> {
    product: &'a Matrix,
    elapsed: Duration,
}

impl<'a> ProductReport<'a> {
    pub fn new(product: &'a Matrix, elapsed: Duration) -> Self {
        Self { product, elapsed }
    }
}

impl fmt::Display for ProductReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Result of A*W = [")?;
        for row in self.product.rows() {
            let line = row
                .iter()
                .map(i64::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(f, "{}", line)?;
        }
        writeln!(f, "]")?;
        writeln!(f, "Runtime {:.6} seconds", self.elapsed.as_secs_f64())
    }
}
