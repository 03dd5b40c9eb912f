#[cfg(feature = "python-bindings")]
use ndarray::{Array1, Array2};

#[cfg(feature = "python-bindings")]
use pyo3::{
    exceptions::{PyTypeError, PyValueError},
    prelude::*,
    types::PyAny,
};

#[cfg(feature = "python-bindings")]
use numpy::{PyReadonlyArray1, PyReadonlyArray2};

#[cfg(feature = "python-bindings")]
use crate::{
    clustering::Connectivity,
    stability::{ClusterCount, SelectionMode},
};

#[cfg(feature = "python-bindings")]
pub fn extract_f64_vector<'py>(
    raw: &Bound<'py, PyAny>, name: &str,
) -> PyResult<Array1<f64>> {
    if let Ok(arr) = raw.extract::<PyReadonlyArray1<f64>>() {
        return Ok(arr.as_array().to_owned());
    }

    if let Ok(obj) = raw.call_method("to_numpy", (false,), None) {
        if let Ok(arr) = obj.extract::<PyReadonlyArray1<f64>>() {
            return Ok(arr.as_array().to_owned());
        }
    }

    let values: Vec<f64> = raw.extract().map_err(|_| {
        PyTypeError::new_err(format!(
            "{name} must be a 1-D numpy.ndarray, pandas.Series, or sequence of float64"
        ))
    })?;
    Ok(Array1::from(values))
}

#[cfg(feature = "python-bindings")]
pub fn extract_f64_matrix<'py>(
    raw: &Bound<'py, PyAny>, name: &str,
) -> PyResult<Array2<f64>> {
    if let Ok(arr) = raw.extract::<PyReadonlyArray2<f64>>() {
        return Ok(arr.as_array().to_owned());
    }

    if let Ok(obj) = raw.call_method("to_numpy", (false,), None) {
        if let Ok(arr) = obj.extract::<PyReadonlyArray2<f64>>() {
            return Ok(arr.as_array().to_owned());
        }
    }

    let rows: Vec<Vec<f64>> = raw.extract().map_err(|_| {
        PyTypeError::new_err(format!(
            "{name} must be a 2-D numpy.ndarray, pandas.DataFrame, or nested sequence of float64"
        ))
    })?;
    let n_rows = rows.len();
    let n_cols = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|row| row.len() != n_cols) {
        return Err(PyValueError::new_err(format!(
            "{name} rows must all share one length"
        )));
    }
    let mut matrix = Array2::zeros((n_rows, n_cols));
    for (i, row) in rows.iter().enumerate() {
        for (j, &value) in row.iter().enumerate() {
            matrix[(i, j)] = value;
        }
    }
    Ok(matrix)
}

#[cfg(feature = "python-bindings")]
pub fn extract_connectivity<'py>(
    raw: Option<&Bound<'py, PyAny>>,
) -> PyResult<Option<Connectivity>> {
    let Some(any) = raw else {
        return Ok(None);
    };
    if any.is_none() {
        return Ok(None);
    }
    let dense = extract_f64_matrix(any, "connectivity")?;
    let connectivity = Connectivity::from_dense(&dense.view())?;
    Ok(Some(connectivity))
}

#[cfg(feature = "python-bindings")]
pub fn parse_cluster_count<'py>(
    raw: Option<&Bound<'py, PyAny>>,
) -> PyResult<ClusterCount> {
    // Absent or None falls back to one cluster per ten features.
    let Some(any) = raw else {
        return Ok(ClusterCount::Proportional(0.1));
    };
    if any.is_none() {
        return Ok(ClusterCount::Proportional(0.1));
    }

    if let Ok(count) = any.extract::<usize>() {
        return Ok(ClusterCount::Fixed(count));
    }
    if let Ok(text) = any.extract::<String>() {
        if text == "auto" {
            return Ok(ClusterCount::Auto);
        }
        if let Ok(proportion) = text.parse::<f64>() {
            return Ok(ClusterCount::Proportional(proportion));
        }
        return Err(PyValueError::new_err(format!(
            "invalid n_clusters {:?} (expected an int, a float string like '0.1', or 'auto')",
            text
        )));
    }
    if let Ok(proportion) = any.extract::<f64>() {
        return Ok(ClusterCount::Proportional(proportion));
    }

    Err(PyTypeError::new_err(
        "n_clusters must be an int, a float string like '0.1', or 'auto'",
    ))
}

#[cfg(feature = "python-bindings")]
pub fn parse_selection_mode(name: &str) -> PyResult<SelectionMode> {
    match name.to_lowercase().as_str() {
        "multivariate" => Ok(SelectionMode::Multivariate),
        "univariate" => Ok(SelectionMode::Univariate),
        other => Err(PyValueError::new_err(format!(
            "invalid model_selection {:?} (expected 'multivariate' or 'univariate')",
            other
        ))),
    }
}
