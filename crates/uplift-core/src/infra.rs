//! Placeholder resolution against an infrastructure-as-code document.
//!
//! The v2 layout carries a provisioning template whose declared output
//! variables the generated pipeline definition refers to by logical name.
//! Resolution failures are non-fatal: an unresolved name simply drops out of
//! the render context and the artifact degrades gracefully.

use crate::error::Result;
use crate::paths;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

static ASSIGNMENT_RE: OnceLock<Regex> = OnceLock::new();

fn assignment_re() -> &'static Regex {
    // `output name ... = value` or plain `name = value`, quoted or bare.
    ASSIGNMENT_RE.get_or_init(|| {
        Regex::new(r#"(?m)^\s*(?:output\s+)?([A-Za-z_][A-Za-z0-9_]*)[^=\n]*=\s*'?"?([^'"\n]+?)'?"?\s*$"#)
            .unwrap()
    })
}

#[derive(Debug, Default)]
pub struct InfraDocument {
    outputs: HashMap<String, String>,
}

impl InfraDocument {
    /// Scan `text` for output-variable assignments.
    pub fn parse(text: &str) -> Self {
        let mut outputs = HashMap::new();
        for cap in assignment_re().captures_iter(text) {
            outputs.insert(cap[1].to_string(), cap[2].trim().to_string());
        }
        Self { outputs }
    }

    /// Load the project's infra document. A missing document yields an empty
    /// one — every placeholder then resolves to absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::legacy_infra_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        Ok(Self::parse(&std::fs::read_to_string(&path)?))
    }

    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.outputs.get(name).map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
