//! Struct and object field data.
//!
//! # Element Order
//! ```text
//! [miINT32]  field name slot length, exactly one value
//! [miINT8]   field names, one null-terminated name per slot
//! [miMATRIX] one nested matrix per field, per instance, column-major
//! ```

use std::collections::HashMap;
use std::io::Read;

use log::{debug, warn};
use ndarray::{ArrayD, IxDyn, ShapeBuilder};

use super::MatrixReader;
use crate::mat5::process::ArrayProcessor;
use crate::mat5::types::array::{MatStruct, Record, StructArray, StructLayout};
use crate::mat5::types::error::{MatError, Result};
use crate::mat5::types::options::StructMode;
use crate::mat5::utils::{element_count, fortran_array};

impl<R: Read, P: ArrayProcessor> MatrixReader<R, P> {
    pub(super) fn read_struct(&mut self, shape: &[usize]) -> Result<StructArray> {
        let field_names = self.read_field_names()?;
        let count = element_count(shape)?;
        debug!("Struct array of {} instances, fields {:?}", count, field_names);

        let layout = match self.options.struct_mode {
            StructMode::Record if field_names.is_empty() => {
                StructLayout::Empty(ArrayD::from_elem(IxDyn(shape).f(), ()))
            }
            StructMode::Record => {
                let records = (0..count)
                    .map(|_| {
                        let values = field_names
                            .iter()
                            .map(|_| self.read_nested_matrix())
                            .collect::<Result<Vec<_>>>()?;
                        Ok(Record(values))
                    })
                    .collect::<Result<Vec<_>>>()?;
                StructLayout::Record(fortran_array(records, shape)?)
            }
            StructMode::Map if field_names.is_empty() => {
                // Nothing is read per instance, so the input does not bound the count.
                let mut instances: Vec<MatStruct> = Vec::new();
                instances.try_reserve_exact(count).map_err(|e| {
                    MatError::InvalidFormat(format!("Cannot allocate {} struct instances: {}", count, e))
                })?;
                instances.resize_with(count, MatStruct::new);
                StructLayout::Map(fortran_array(instances, shape)?)
            }
            StructMode::Map => {
                let instances = (0..count)
                    .map(|_| {
                        let mut instance = MatStruct::new();
                        for name in &field_names {
                            instance.insert(name.clone(), self.read_nested_matrix()?);
                        }
                        Ok(instance)
                    })
                    .collect::<Result<Vec<_>>>()?;
                StructLayout::Map(fortran_array(instances, shape)?)
            }
        };

        Ok(StructArray { field_names, layout })
    }

    fn read_field_names(&mut self) -> Result<Vec<String>> {
        let mut slot = [0i32; 1];
        let found = self.elements.read_int32s_into(&mut slot, "field name length")?;
        if found != 1 {
            return Err(MatError::InvalidFormat(format!(
                "Field name length element holds {} values, expected 1",
                found
            )));
        }
        let slot = slot[0];
        let raw = self.elements.read_int8_string("field names")?;

        if slot <= 0 {
            if raw.is_empty() {
                return Ok(Vec::new());
            }
            return Err(MatError::InvalidFormat(format!(
                "Field name length {} with {} bytes of names",
                slot,
                raw.len()
            )));
        }

        let names = raw
            .chunks_exact(slot as usize)
            .map(|chunk| {
                let end = chunk.iter().position(|&b| b == 0).unwrap_or(chunk.len());
                String::from_utf8_lossy(&chunk[..end]).into_owned()
            })
            .collect();
        Ok(dedupe_field_names(names))
    }
}

/// Rename repeated field names to `_{k}_{name}`, `k` counting earlier occurrences.
fn dedupe_field_names(names: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    names
        .into_iter()
        .map(|name| {
            let occurrences = seen.entry(name.clone()).or_insert(0);
            let renamed = if *occurrences == 0 {
                name
            } else {
                let renamed = format!("_{}_{}", occurrences, name);
                warn!("Duplicate field name '{}' renamed to '{}'", name, renamed);
                renamed
            };
            *occurrences += 1;
            renamed
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_names_get_occurrence_prefix() {
        let names = ["a", "b", "a", "a"].map(String::from).to_vec();
        assert_eq!(dedupe_field_names(names), ["a", "b", "_1_a", "_2_a"]);
    }
}
