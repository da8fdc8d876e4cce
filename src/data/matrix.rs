use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use matfile::NumericData;

use crate::error::{CorpusError, Result};

// ---------------------------------------------------------------------------
// Matrix – dense 2-D numeric array
// ---------------------------------------------------------------------------

/// Dense row-major matrix of `f64` cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Build from row-major `data`. Returns `None` if the length does not
    /// match `rows * cols`.
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Option<Self> {
        (data.len() == rows * cols).then_some(Matrix { rows, cols, data })
    }

    /// Build from nested rows. Ragged input is rejected.
    pub fn from_rows(rows: &[Vec<f64>]) -> Option<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != cols) {
            return None;
        }
        Matrix::new(rows.len(), cols, rows.concat())
    }

    /// Single-column matrix, the shape of the partition id lists.
    pub fn column_vector(values: &[f64]) -> Self {
        Matrix {
            rows: values.len(),
            cols: 1,
            data: values.to_vec(),
        }
    }

    fn from_column_major(rows: usize, cols: usize, values: &[f64]) -> Self {
        let mut data = vec![0.0; rows * cols];
        for c in 0..cols {
            for r in 0..rows {
                data[r * cols + c] = values[c * rows + r];
            }
        }
        Matrix { rows, cols, data }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cell at (`row`, `col`), `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    /// Values of column `col`, top to bottom.
    pub fn column(&self, col: usize) -> impl Iterator<Item = f64> + '_ {
        (0..self.rows).filter_map(move |r| self.get(r, col))
    }
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// A parsed MATLAB Level 5 file.
pub struct MatFile {
    path: PathBuf,
    inner: matfile::MatFile,
}

impl MatFile {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CorpusError::MissingPath {
                path: path.to_path_buf(),
            });
        }
        let file = File::open(path).map_err(|e| CorpusError::io(path, e))?;
        let inner = matfile::MatFile::parse(BufReader::new(file)).map_err(|e| CorpusError::Matrix {
            path: path.to_path_buf(),
            message: format!("not a readable MAT file: {e:?}"),
        })?;
        Ok(MatFile {
            path: path.to_path_buf(),
            inner,
        })
    }

    /// The real part of array `name` as a 2-D `f64` matrix.
    pub fn matrix(&self, name: &str) -> Result<Matrix> {
        let array = self
            .inner
            .find_by_name(name)
            .ok_or_else(|| CorpusError::MissingArray {
                path: self.path.clone(),
                name: name.to_string(),
            })?;

        let size = array.size();
        let (rows, cols) = match &size[..] {
            [] => (0, 0),
            [n] => (*n, 1),
            [r, c] => (*r, *c),
            _ => {
                return Err(CorpusError::Matrix {
                    path: self.path.clone(),
                    message: format!("array '{name}' has {} dimensions", size.len()),
                })
            }
        };

        let values = real_as_f64(array.data());
        if values.len() != rows * cols {
            return Err(CorpusError::Matrix {
                path: self.path.clone(),
                message: format!(
                    "array '{name}' is {rows}x{cols} but holds {} values",
                    values.len()
                ),
            });
        }
        Ok(Matrix::from_column_major(rows, cols, &values))
    }
}

fn real_as_f64(data: &NumericData) -> Vec<f64> {
    fn widen<T: Copy + Into<f64>>(values: &[T]) -> Vec<f64> {
        values.iter().map(|&v| v.into()).collect()
    }

    match data {
        NumericData::Double { real, .. } => real.clone(),
        NumericData::Single { real, .. } => widen(real),
        NumericData::Int8 { real, .. } => widen(real),
        NumericData::UInt8 { real, .. } => widen(real),
        NumericData::Int16 { real, .. } => widen(real),
        NumericData::UInt16 { real, .. } => widen(real),
        NumericData::Int32 { real, .. } => widen(real),
        NumericData::UInt32 { real, .. } => widen(real),
        NumericData::Int64 { real, .. } => real.iter().map(|&v| v as f64).collect(),
        NumericData::UInt64 { real, .. } => real.iter().map(|&v| v as f64).collect(),
        // Unknown classes fall through to the length check in `matrix`.
        #[allow(unreachable_patterns)]
        _ => Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

const MI_INT8: u32 = 1;
const MI_INT32: u32 = 5;
const MI_UINT32: u32 = 6;
const MI_DOUBLE: u32 = 9;
const MI_MATRIX: u32 = 14;
const MX_DOUBLE_CLASS: u32 = 6;

/// Write `arrays` as an uncompressed little-endian MAT v5 file of `double`
/// arrays. An array whose dimensions or byte length overflow the format's
/// 32-bit fields is a `Matrix` error and nothing is written.
pub fn write_mat_file(path: &Path, arrays: &[(&str, &Matrix)]) -> Result<()> {
    let mut bytes = header().to_vec();
    for (name, matrix) in arrays {
        let element = encode_matrix(name, matrix).map_err(|message| CorpusError::Matrix {
            path: path.to_path_buf(),
            message,
        })?;
        bytes.extend(element);
    }

    let file = File::create(path).map_err(|e| CorpusError::io(path, e))?;
    let mut out = BufWriter::new(file);
    out.write_all(&bytes)
        .and_then(|()| out.flush())
        .map_err(|e| CorpusError::io(path, e))
}

fn header() -> [u8; 128] {
    let mut header = [b' '; 128];
    let text = b"MATLAB 5.0 MAT-file, written by clef-corpus";
    header[..text.len()].copy_from_slice(text);
    header[116..124].fill(0);
    header[124..126].copy_from_slice(&0x0100u16.to_le_bytes());
    header[126..128].copy_from_slice(b"IM");
    header
}

fn encode_matrix(name: &str, matrix: &Matrix) -> std::result::Result<Vec<u8>, String> {
    let mut real = Vec::with_capacity(matrix.data.len() * 8);
    for c in 0..matrix.cols {
        for r in 0..matrix.rows {
            real.extend(matrix.data[r * matrix.cols + c].to_le_bytes());
        }
    }
    encode_array(name, matrix.rows, matrix.cols, MX_DOUBLE_CLASS, MI_DOUBLE, &real)
}

/// miMATRIX element holding `real`, already column-major and encoded as
/// `data_type`.
fn encode_array(
    name: &str,
    rows: usize,
    cols: usize,
    class: u32,
    data_type: u32,
    real: &[u8],
) -> std::result::Result<Vec<u8>, String> {
    let too_large = |what: &str| format!("array '{name}' {what} does not fit in a MAT v5 element");
    let rows = i32::try_from(rows).map_err(|_| too_large("row count"))?;
    let cols = i32::try_from(cols).map_err(|_| too_large("column count"))?;

    let mut body = Vec::new();

    let mut flags = Vec::new();
    flags.extend(class.to_le_bytes());
    flags.extend(0u32.to_le_bytes());
    push_element(&mut body, MI_UINT32, &flags).map_err(|()| too_large("flags"))?;

    let mut dims = Vec::new();
    dims.extend(rows.to_le_bytes());
    dims.extend(cols.to_le_bytes());
    push_element(&mut body, MI_INT32, &dims).map_err(|()| too_large("dimensions"))?;

    push_element(&mut body, MI_INT8, name.as_bytes()).map_err(|()| too_large("name"))?;
    push_element(&mut body, data_type, real).map_err(|()| too_large("data"))?;

    let body_len = u32::try_from(body.len()).map_err(|_| too_large("body"))?;
    let mut element = Vec::with_capacity(body.len() + 8);
    element.extend(MI_MATRIX.to_le_bytes());
    element.extend(body_len.to_le_bytes());
    element.extend(body);
    Ok(element)
}

/// Tagged data element, padded to an 8-byte boundary. Fails when the
/// payload length does not fit the 32-bit size field.
fn push_element(out: &mut Vec<u8>, data_type: u32, payload: &[u8]) -> std::result::Result<(), ()> {
    let len = u32::try_from(payload.len()).map_err(|_| ())?;
    out.extend(data_type.to_le_bytes());
    out.extend(len.to_le_bytes());
    out.extend_from_slice(payload);
    let padding = (8 - payload.len() % 8) % 8;
    out.extend(std::iter::repeat(0u8).take(padding));
    Ok(())
}
