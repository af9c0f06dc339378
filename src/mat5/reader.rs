use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use log::{debug, info, warn};

use super::format::file_header::{self, FILE_HEADER_LEN, FileHeader};
use super::iter::{TOP_LEVEL_CONTEXT, VariableIter};
use super::types::array::MatArray;
use super::types::error::{MatError, Result};
use super::types::models::{MatVariable, VariableInfo};
use super::types::options::ReadOptions;

/// The main reader for MAT5 files.
///
/// Parses the 128-byte file header on construction; variables are decoded
/// lazily by [`iter_variables`](Self::iter_variables) and the lookups built on it.
#[derive(Debug)]
pub struct MatFile<R> {
    stream: R,
    header: FileHeader,
    options: ReadOptions,
    data_start: u64,
}

impl MatFile<BufReader<File>> {
    /// Open a MAT5 file from the given path.
    ///
    /// # Errors
    /// Returns an error if:
    /// - File cannot be opened
    /// - The header has no valid endian indicator or an unsupported version
    pub fn open(path: impl AsRef<Path>, options: ReadOptions) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening MAT file: {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), options)
    }
}

impl<R: Read + Seek> MatFile<R> {
    /// Read a MAT5 stream whose file header starts at the current position.
    pub fn from_reader(mut stream: R, options: ReadOptions) -> Result<Self> {
        let start = stream.stream_position()?;
        let header = file_header::parse(&mut stream)?;
        if header.has_subsystem() {
            debug!("Subsystem data at offset {:#x} is not decoded", header.subsys_offset);
        }
        Ok(Self {
            stream,
            header,
            options,
            data_start: start + FILE_HEADER_LEN as u64,
        })
    }

    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    pub fn options(&self) -> &ReadOptions {
        &self.options
    }

    /// Iterate over every variable, starting again from the first one.
    pub fn iter_variables(&mut self) -> Result<VariableIter<'_, R>> {
        self.stream.seek(SeekFrom::Start(self.data_start))?;
        Ok(VariableIter::new(
            &mut self.stream,
            self.header.endian,
            self.options.clone(),
        ))
    }

    /// Name, class and dimensions of each variable, without decoding any data.
    pub fn list_variables(&mut self) -> Result<Vec<VariableInfo>> {
        let mut iter = self.iter_variables()?;
        let mut variables = Vec::new();
        while let Some(header) = iter.next_header() {
            match header {
                Ok(Some(header)) => variables.push(VariableInfo::from(&header)),
                Ok(None) => {}
                Err(e) if can_skip(&e) => warn!("Skipping variable: {}", e),
                Err(e) => return Err(e),
            }
        }
        Ok(variables)
    }

    /// Decode the first variable called `name`.
    pub fn read_variable(&mut self, name: &str) -> Result<Option<MatArray>> {
        let mut iter = self.iter_variables()?;
        while let Some(header) = iter.next_header() {
            match header {
                Ok(Some(header)) if header.name == name.as_bytes() => {
                    return iter.read_current(&header).map(|v| Some(v.array));
                }
                Ok(_) => {}
                Err(e) if can_skip(&e) => warn!("Skipping variable: {}", e),
                Err(e) => return Err(e),
            }
        }
        debug!("Variable '{}' not found", name);
        Ok(None)
    }

    /// Decode every variable, skipping those of unsupported classes or encodings
    /// and top-level elements that are not matrices.
    pub fn read_all(&mut self) -> Result<Vec<MatVariable>> {
        let mut variables = Vec::new();
        for variable in self.iter_variables()? {
            match variable {
                Ok(variable) => variables.push(variable),
                Err(e) if can_skip(&e) => warn!("Skipping variable: {}", e),
                Err(e) => return Err(e),
            }
        }
        info!("Read {} variables", variables.len());
        Ok(variables)
    }
}

fn can_skip(error: &MatError) -> bool {
    error.is_skippable()
        || matches!(error, MatError::TypeMismatch { context, .. } if *context == TOP_LEVEL_CONTEXT)
}
