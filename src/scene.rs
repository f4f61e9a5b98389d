//! Startup scene files, loaded once before the interactive loop.
//!
//! - Material table: text, first line is the material count `N`, followed by
//!   `8 * N` lines holding one float each (reflectance rgba, emittance rgba).
//! - Primitive list: JSON array of [`EditParameters`], committed in order.
//!
//! Any missing or malformed file is a startup error.

use bytemuck::{Pod, Zeroable};
use std::path::{Path, PathBuf};

use crate::edit::{EditParameters, EditStack, ObjectId, PrimitiveFactory};
use crate::util::{Error, Result};

/// Floats per material entry.
const MATERIAL_FLOATS: usize = 8;

/// Material record as uploaded to the renderer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Material {
    pub reflectance: [f32; 4],
    pub emittance: [f32; 4],
}

/// Ordered material table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialTable {
    materials: Vec<Material>,
}

impl MaterialTable {
    /// Parse the text format. Blank lines are skipped.
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim()))
            .filter(|(_, l)| !l.is_empty());

        let (count_line, count_text) = lines
            .next()
            .ok_or_else(|| Error::InvalidScene("material table is empty".into()))?;
        let count: usize = count_text
            .parse()
            .map_err(|_| Error::parse(count_line, format!("expected material count, got '{count_text}'")))?;

        let total = count
            .checked_mul(MATERIAL_FLOATS)
            .filter(|_| u32::try_from(count).is_ok())
            .ok_or_else(|| Error::parse(count_line, format!("material count {count} is too large")))?;

        // Values are counted against the file, not the header.
        let mut values = Vec::new();
        for _ in 0..total {
            let (line, text) = lines.next().ok_or_else(|| {
                Error::InvalidScene(format!(
                    "material table declares {count} materials but ends after {} values",
                    values.len()
                ))
            })?;
            let v: f32 = text
                .parse()
                .map_err(|_| Error::parse(line, format!("expected a float, got '{text}'")))?;
            values.push(v);
        }
        if let Some((line, _)) = lines.next() {
            return Err(Error::parse(line, format!("unexpected data after {count} materials")));
        }

        let materials = values
            .chunks_exact(MATERIAL_FLOATS)
            .map(|c| Material {
                reflectance: [c[0], c[1], c[2], c[3]],
                emittance: [c[4], c[5], c[6], c[7]],
            })
            .collect();
        Ok(Self { materials })
    }

    /// Read and parse a material table file.
    pub fn load(path: &Path) -> Result<Self> {
        let table = Self::parse(&read_startup_file(path)?)?;
        tracing::info!("loaded {} materials from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&Material> {
        self.materials.get(id as usize)
    }

    /// Packed bytes for upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.materials)
    }
}

/// Everything loaded before the first frame.
#[derive(Debug, Clone, Default)]
pub struct StartupScene {
    pub materials: Option<MaterialTable>,
    pub edits: Vec<EditParameters>,
}

impl StartupScene {
    /// Load whichever startup files are given.
    #[tracing::instrument(skip_all)]
    pub fn load(materials: Option<&Path>, edits: Option<&Path>) -> Result<Self> {
        let materials = materials.map(MaterialTable::load).transpose()?;
        let edits = match edits {
            Some(path) => {
                let list: Vec<EditParameters> = serde_json::from_str(&read_startup_file(path)?)?;
                tracing::info!("loaded {} startup edits from {}", list.len(), path.display());
                list
            }
            None => Vec::new(),
        };
        Ok(Self { materials, edits })
    }

    /// Material count edits are validated against: the table size when a
    /// table is loaded, otherwise `fallback`.
    pub fn material_count(&self, fallback: u32) -> u32 {
        match &self.materials {
            Some(table) => table.len() as u32,
            None => fallback,
        }
    }

    /// Validate every startup edit, then commit them in order.
    pub fn apply(
        &self,
        stack: &mut EditStack,
        factory: &mut PrimitiveFactory,
        material_count: u32,
    ) -> Result<Vec<ObjectId>> {
        if let Some(i) = self.edits.iter().position(|p| !p.is_valid(material_count)) {
            return Err(Error::InvalidScene(format!(
                "startup edit {i} is out of range (material count {material_count})"
            )));
        }
        self.edits
            .iter()
            .map(|params| stack.commit(factory, params))
            .collect()
    }
}

fn read_startup_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::FileNotFound(PathBuf::from(path)),
        _ => Error::Io(e),
    })
}
