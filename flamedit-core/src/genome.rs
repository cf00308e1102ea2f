//! Genome transform records
//!
//! A genome is an ordered list of affine transforms ("xforms"). The editor
//! never owns records by identity: triangles are bound to positions in this
//! list, so every structural change is followed by a resynchronisation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 2×3 affine coefficients of an xform
///
/// Row 0 is the X-axis vector, row 1 the Y-axis vector and row 2 the origin,
/// all in abstract (basis) coordinates.
pub type Coefs = [[f64; 2]; 3];

/// The identity transform
pub const IDENTITY_COEFS: Coefs = [[1.0, 0.0], [0.0, 1.0], [0.0, 0.0]];

/// One affine transform record of a genome
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct XForm {
    /// Pre-transform coefficients
    pub coefs: Coefs,

    /// Post-transform coefficients
    #[serde(default = "identity_coefs")]
    pub post: Coefs,

    /// Selection weight of this xform
    #[serde(default = "default_density")]
    pub density: f64,

    /// Palette colour index (0.0 to 1.0)
    #[serde(default)]
    pub color: f64,

    /// Variation name to weight
    #[serde(default)]
    pub variations: BTreeMap<String, f64>,
}

fn identity_coefs() -> Coefs {
    IDENTITY_COEFS
}

fn default_density() -> f64 {
    0.5
}

impl Default for XForm {
    fn default() -> Self {
        let mut variations = BTreeMap::new();
        variations.insert("linear".to_string(), 1.0);
        Self {
            coefs: IDENTITY_COEFS,
            post: IDENTITY_COEFS,
            density: default_density(),
            color: 0.0,
            variations,
        }
    }
}

impl XForm {
    /// Create a default xform (identity, linear variation)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an xform with the given pre-transform coefficients
    pub fn with_coefs(coefs: Coefs) -> Self {
        Self {
            coefs,
            ..Default::default()
        }
    }

    /// Weight of a variation, 0.0 when unset
    pub fn variation(&self, name: &str) -> f64 {
        self.variations.get(name).copied().unwrap_or(0.0)
    }

    /// Set a variation weight; a zero weight removes the entry
    pub fn set_variation(&mut self, name: impl Into<String>, weight: f64) {
        let name = name.into();
        if weight == 0.0 {
            self.variations.remove(&name);
        } else {
            self.variations.insert(name, weight);
        }
    }
}

/// Ordered collection of xforms with optional final xform
///
/// When `final_xform_enable` is set, the last record is the final xform.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    xforms: Vec<XForm>,
    final_xform_enable: bool,
}

impl Genome {
    /// Create an empty genome
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a genome from records; the last one becomes final if requested
    pub fn from_xforms(xforms: Vec<XForm>, final_xform: bool) -> Self {
        let final_xform_enable = final_xform && !xforms.is_empty();
        Self {
            xforms,
            final_xform_enable,
        }
    }

    /// Create a genome holding `count` default xforms
    pub fn with_default_xforms(count: usize) -> Self {
        Self {
            xforms: vec![XForm::default(); count],
            final_xform_enable: false,
        }
    }

    /// Number of records, final xform included
    pub fn num_xforms(&self) -> usize {
        self.xforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xforms.is_empty()
    }

    pub fn xforms(&self) -> &[XForm] {
        &self.xforms
    }

    pub fn xform(&self, index: usize) -> Option<&XForm> {
        self.xforms.get(index)
    }

    pub fn xform_mut(&mut self, index: usize) -> Option<&mut XForm> {
        self.xforms.get_mut(index)
    }

    /// Whether the genome currently has a final xform
    pub fn final_xform_enabled(&self) -> bool {
        self.final_xform_enable
    }

    /// Index of the final xform, if enabled
    pub fn final_xform_index(&self) -> Option<usize> {
        if self.final_xform_enable {
            self.xforms.len().checked_sub(1)
        } else {
            None
        }
    }

    pub fn is_final(&self, index: usize) -> bool {
        self.final_xform_index() == Some(index)
    }

    /// Insert `count` default records
    ///
    /// Regular records go before an existing final xform so the final xform
    /// stays last. With `final_flag` a single final xform is appended and
    /// enabled instead (ignored if one already exists).
    ///
    /// Returns the index of the first inserted record.
    pub fn add_xforms(&mut self, count: usize, final_flag: bool) -> usize {
        if final_flag {
            if self.final_xform_enable {
                log::warn!("Genome::add_xforms: final xform already present");
                return self.xforms.len() - 1;
            }
            self.xforms.push(XForm::default());
            self.final_xform_enable = true;
            return self.xforms.len() - 1;
        }

        let position = self.final_xform_index().unwrap_or(self.xforms.len());
        for offset in 0..count {
            self.xforms.insert(position + offset, XForm::default());
        }
        position
    }

    /// Insert a single default record, returning its index
    pub fn add_default_xform(&mut self) -> usize {
        self.add_xforms(1, false)
    }

    /// Delete a record; deleting the final xform disables it
    pub fn delete_xform(&mut self, index: usize) -> Option<XForm> {
        if index >= self.xforms.len() {
            log::warn!(
                "Genome::delete_xform: index {} out of range ({} xforms)",
                index,
                self.xforms.len()
            );
            return None;
        }
        if self.is_final(index) {
            self.final_xform_enable = false;
        }
        Some(self.xforms.remove(index))
    }
}
