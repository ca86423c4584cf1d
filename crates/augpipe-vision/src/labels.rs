//! Label Collector
//!
//! Gathers the gated parameters of every enabled effect, in application
//! order, into one `[N, D]` descriptor tensor.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use augpipe_core::error::{Error, Result};
use augpipe_tensor::Tensor;

/// Accumulates label columns group by group.
#[derive(Debug, Clone)]
pub struct LabelCollector {
    batch: usize,
    columns: Vec<Vec<f32>>,
    groups: Vec<(&'static str, usize)>,
}

impl LabelCollector {
    /// Creates an empty collector for `batch` samples.
    #[must_use]
    pub fn new(batch: usize) -> Self {
        Self {
            batch,
            columns: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Appends one effect's columns; each must be a `[N]` tensor.
    pub fn push(&mut self, effect: &'static str, columns: &[&Tensor<f32>]) -> Result<()> {
        for column in columns {
            if column.shape() != [self.batch].as_slice() {
                return Err(Error::shape_mismatch(&[self.batch], column.shape()));
            }
        }
        self.columns.extend(columns.iter().map(|c| c.to_vec()));
        self.groups.push((effect, columns.len()));
        Ok(())
    }

    /// Effects recorded so far, with their widths.
    #[must_use]
    pub fn groups(&self) -> &[(&'static str, usize)] {
        &self.groups
    }

    /// Current column count D.
    #[must_use]
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Builds the `[N, D]` label tensor.
    pub fn finish(self) -> Result<Tensor<f32>> {
        let width = self.width();
        let mut data = vec![0.0; self.batch * width];
        for (d, column) in self.columns.iter().enumerate() {
            for (n, &value) in column.iter().enumerate() {
                data[n * width + d] = value;
            }
        }
        Tensor::from_vec(data, &[self.batch, width])
    }
}
