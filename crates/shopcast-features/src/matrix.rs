//! Dense feature matrix with the fixed six-column schema.

use crate::error::{FeatureError, Result};
use crate::schema::{FEATURE_COUNT, FeatureColumn};
use ndarray::{Array2, ArrayView1, ArrayView2};
use polars::prelude::*;

/// One row of the feature matrix, by name.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FeatureVector {
    /// [`FeatureColumn::Momentum`]
    pub momentum: f64,
    /// [`FeatureColumn::Interaction`]
    pub interaction: f64,
    /// [`FeatureColumn::PriceTrend`]
    pub price_trend: f64,
    /// [`FeatureColumn::Volatility`]
    pub volatility: f64,
    /// [`FeatureColumn::CategoryAggregate`]
    pub category_aggregate: f64,
    /// [`FeatureColumn::TrendVolatilityRatio`]
    pub trend_volatility_ratio: f64,
}

impl FeatureVector {
    /// Values in matrix order.
    pub const fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.momentum,
            self.interaction,
            self.price_trend,
            self.volatility,
            self.category_aggregate,
            self.trend_volatility_ratio,
        ]
    }

    /// Value of one column.
    pub const fn get(&self, column: FeatureColumn) -> f64 {
        self.to_array()[column.index()]
    }
}

/// Row-major `n × 6` matrix whose columns follow [`FeatureColumn::ALL`].
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    values: Array2<f64>,
}

impl FeatureMatrix {
    /// Wrap an existing array.
    ///
    /// # Errors
    /// [`FeatureError::ColumnCount`] if the width is not six, and
    /// [`FeatureError::MissingValues`] if any entry is not finite.
    pub fn from_array(values: Array2<f64>) -> Result<Self> {
        if values.ncols() != FEATURE_COUNT {
            return Err(FeatureError::ColumnCount {
                expected: FEATURE_COUNT,
                actual: values.ncols(),
            });
        }
        if let Some(((row, col), _)) = values.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(FeatureError::MissingValues {
                column: FeatureColumn::ALL[col].name(),
                row,
            });
        }
        Ok(Self { values })
    }

    /// Read the feature columns out of a frame, ignoring any other column.
    pub fn from_frame(df: &DataFrame) -> Result<Self> {
        let mut values = Array2::<f64>::zeros((df.height(), FEATURE_COUNT));
        for column in FeatureColumn::ALL {
            let series = df.column(column.name())?.cast(&DataType::Float64)?;
            for (row, value) in series.f64()?.into_iter().enumerate() {
                match value {
                    Some(v) if v.is_finite() => values[[row, column.index()]] = v,
                    _ => {
                        return Err(FeatureError::MissingValues {
                            column: column.name(),
                            row,
                        });
                    }
                }
            }
        }
        Ok(Self { values })
    }

    /// Frame with one `Float64` column per feature, in schema order.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let columns = FeatureColumn::ALL
            .into_iter()
            .map(|c| Column::new(c.name().into(), self.column(c).to_vec()))
            .collect();
        Ok(DataFrame::new(columns)?)
    }

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    /// Whether the matrix has no rows.
    pub fn is_empty(&self) -> bool {
        self.values.nrows() == 0
    }

    /// One row by name.
    pub fn row(&self, index: usize) -> Option<FeatureVector> {
        (index < self.nrows()).then(|| {
            let r = self.values.row(index);
            FeatureVector {
                momentum: r[FeatureColumn::Momentum.index()],
                interaction: r[FeatureColumn::Interaction.index()],
                price_trend: r[FeatureColumn::PriceTrend.index()],
                volatility: r[FeatureColumn::Volatility.index()],
                category_aggregate: r[FeatureColumn::CategoryAggregate.index()],
                trend_volatility_ratio: r[FeatureColumn::TrendVolatilityRatio.index()],
            }
        })
    }

    /// One column.
    pub fn column(&self, column: FeatureColumn) -> ArrayView1<'_, f64> {
        self.values.column(column.index())
    }

    /// Borrow the underlying array.
    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    /// Take the underlying array.
    pub fn into_inner(self) -> Array2<f64> {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_from_array_rejects_wrong_width() {
        let err = FeatureMatrix::from_array(Array2::zeros((3, 5))).unwrap_err();
        assert!(matches!(
            err,
            FeatureError::ColumnCount {
                expected: 6,
                actual: 5
            }
        ));
    }

    #[test]
    fn test_from_array_rejects_nan() {
        let mut values = Array2::zeros((2, 6));
        values[[1, 3]] = f64::NAN;
        let err = FeatureMatrix::from_array(values).unwrap_err();
        assert!(matches!(
            err,
            FeatureError::MissingValues {
                column: "sales_volatility",
                row: 1
            }
        ));
    }

    #[test]
    fn test_frame_round_trip_keeps_order() {
        let m = FeatureMatrix::from_array(array![
            [1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            [7.0, 8.0, 9.0, 10.0, 11.0, 12.0]
        ])
        .unwrap();
        let df = m.to_frame().unwrap();
        let names: Vec<&str> = df.get_column_names().iter().map(|s| s.as_str()).collect();
        assert_eq!(names, FeatureColumn::names().to_vec());
        assert_eq!(FeatureMatrix::from_frame(&df).unwrap(), m);

        let row = m.row(1).unwrap();
        assert_eq!(row.momentum, 7.0);
        assert_eq!(row.trend_volatility_ratio, 12.0);
        assert_eq!(row.get(FeatureColumn::Volatility), 10.0);
        assert!(m.row(2).is_none());
    }

    #[test]
    fn test_from_frame_rejects_nulls() {
        let mut df = FeatureMatrix::from_array(Array2::zeros((2, 6)))
            .unwrap()
            .to_frame()
            .unwrap();
        df.with_column(Column::new("category_avg".into(), &[Some(1.0), None]))
            .unwrap();
        let err = FeatureMatrix::from_frame(&df).unwrap_err();
        assert!(matches!(
            err,
            FeatureError::MissingValues {
                column: "category_avg",
                row: 1
            }
        ));
    }
}
