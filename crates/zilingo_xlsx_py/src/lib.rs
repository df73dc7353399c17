use std::path::PathBuf;

use pyo3::exceptions::{PyOSError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use zilingo_xlsx::conf::{
    N_PRICE_MULTIPLE, N_PRICE_SUFFIX, N_SHIP_FEE_DEFAULT, N_SIZE_MAX, N_SIZE_MIN, N_SIZE_STEP,
    N_SPECIAL_PRICE_MIN, N_SPECIAL_PRICE_MULTIPLE, N_SPECIAL_PRICE_SUFFIX, N_STOCK_DEFAULT,
};
use zilingo_xlsx::{
    ProductRecord, ProductXlsxError, SpecPricePolicy, SpecSizeRun, SpecSpecialPricePolicy,
    XlsxWorkbookSink, ZILINGO_TEMPLATE,
};

const N_BRIDGE_ABI_VERSION: u64 = 1;
const C_BRIDGE_CONTRACT_VERSION: &str = "zilingo.xlsx.product.v1";

#[pyclass(name = "ProductRecord")]
struct PyProductRecord {
    #[pyo3(get)]
    file_csv: String,
    inner: ProductRecord,
}

#[pymethods]
impl PyProductRecord {
    #[new]
    #[pyo3(signature = (file_csv, file_config = None))]
    fn new(file_csv: String, file_config: Option<String>) -> PyResult<Self> {
        let path_config = file_config.map(PathBuf::from);
        let inner = ProductRecord::from_csv_path(&file_csv, path_config.as_deref())
            .map_err(derive_py_err)?;
        Ok(Self { file_csv, inner })
    }

    fn resolve(&self, field: &str) -> String {
        self.inner.resolve(field)
    }

    /// Resolve by logical name, e.g. `gem_type` -> `GemType`.
    fn get(&self, name: &str) -> String {
        self.inner.get(name)
    }

    #[pyo3(signature = (
        multiple = N_SPECIAL_PRICE_MULTIPLE,
        suffix = N_SPECIAL_PRICE_SUFFIX,
        min_price = N_SPECIAL_PRICE_MIN
    ))]
    fn special_price(&self, multiple: f64, suffix: f64, min_price: f64) -> f64 {
        self.inner.special_price_by(&SpecSpecialPricePolicy {
            multiple,
            suffix,
            min_price,
        })
    }

    #[pyo3(signature = (multiple = N_PRICE_MULTIPLE, suffix = N_PRICE_SUFFIX))]
    fn price(&self, multiple: f64, suffix: f64) -> f64 {
        self.inner.price_by(&SpecPricePolicy { multiple, suffix })
    }

    #[pyo3(signature = (stock = N_STOCK_DEFAULT))]
    fn stock(&self, stock: i64) -> i64 {
        self.inner.stock_or(stock)
    }

    #[pyo3(signature = (price = N_SHIP_FEE_DEFAULT))]
    fn ship_fee(&self, price: f64) -> f64 {
        self.inner.ship_fee_or(price)
    }

    #[pyo3(signature = (min = N_SIZE_MIN, max = N_SIZE_MAX, step = N_SIZE_STEP))]
    fn sizes(&self, min: f64, max: f64, step: f64) -> Vec<f64> {
        self.inner.sizes_by(&SpecSizeRun { min, max, step })
    }

    fn material(&self) -> &'static str {
        self.inner.material()
    }

    fn image_urls(&self) -> Vec<String> {
        self.inner.image_urls()
    }

    /// Export the record with the Zilingo template; returns `self`.
    fn save_excel(slf: PyRef<'_, Self>, file_out: String) -> PyResult<PyRef<'_, Self>> {
        let mut sink = XlsxWorkbookSink::new();
        zilingo_xlsx::project(
            &slf.inner,
            &ZILINGO_TEMPLATE,
            &mut sink,
            &PathBuf::from(file_out),
        )
        .map_err(derive_py_err)?;
        Ok(slf)
    }
}

#[pyfunction]
#[pyo3(signature = (file_csv, file_out, file_config = None))]
fn export_product_xlsx(file_csv: String, file_out: String, file_config: Option<String>) -> PyResult<()> {
    let path_config = file_config.map(PathBuf::from);
    zilingo_xlsx::export_product_xlsx(file_csv, path_config.as_deref(), file_out)
        .map_err(derive_py_err)
}

fn derive_py_err(err: ProductXlsxError) -> PyErr {
    match err {
        ProductXlsxError::Io { .. } => PyOSError::new_err(err.to_string()),
        ProductXlsxError::ExportIo { .. } => PyRuntimeError::new_err(err.to_string()),
        ProductXlsxError::MalformedRecord { .. }
        | ProductXlsxError::InvalidLayout(_)
        | ProductXlsxError::InvalidSheetName(_) => PyValueError::new_err(err.to_string()),
    }
}

#[pymodule]
fn _zilingo_xlsx_rs(_py: Python<'_>, module: &Bound<'_, PyModule>) -> PyResult<()> {
    module.add_class::<PyProductRecord>()?;
    module.add_function(wrap_pyfunction!(export_product_xlsx, module)?)?;
    module.add("__bridge_abi__", N_BRIDGE_ABI_VERSION)?;
    module.add("__bridge_contract__", C_BRIDGE_CONTRACT_VERSION)?;
    Ok(())
}
