//! Company terminology list.
//!
//! A JSON array of [`TerminologyEntry`] objects; without one the built-in
//! security-industry list is used.

use crate::error::Result;
use crate::types::TerminologyEntry;
use std::path::Path;

/// Load the terminology list from `path`, or the built-in list when no path
/// is given or the file does not exist.
pub fn load(path: Option<&Path>) -> Result<Vec<TerminologyEntry>> {
    let Some(path) = path else {
        return Ok(builtin());
    };
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No terminology file, using built-in list");
        return Ok(builtin());
    }

    let content = std::fs::read_to_string(path)?;
    let entries: Vec<TerminologyEntry> = serde_json::from_str(&content)?;
    tracing::debug!(path = %path.display(), count = entries.len(), "Loaded terminology");
    Ok(entries)
}

/// The built-in list for surveillance and access-control products.
pub fn builtin() -> Vec<TerminologyEntry> {
    vec![
        TerminologyEntry::new(
            "IP Camera",
            "product",
            "Network camera that streams video over IP",
        )
        .with_preferred("Network Camera"),
        TerminologyEntry::new("NVR", "recording", "Network Video Recorder"),
        TerminologyEntry::new("DVR", "recording", "Digital Video Recorder for analog cameras"),
        TerminologyEntry::new(
            "PTZ",
            "product",
            "Pan-Tilt-Zoom camera with motorised movement",
        ),
        TerminologyEntry::new(
            "waterproof",
            "protection",
            "Sealed against water ingress, rated by IP code",
        )
        .with_preferred("weatherproof (IP67)"),
        TerminologyEntry::new(
            "IP67",
            "protection",
            "Dust-tight and protected against temporary immersion",
        ),
        TerminologyEntry::new("IK10", "protection", "Highest impact-resistance rating (20 J)"),
        TerminologyEntry::new(
            "WDR",
            "imaging",
            "Wide Dynamic Range for scenes with strong backlight",
        ),
        TerminologyEntry::new(
            "night vision",
            "imaging",
            "Imaging in low light using infrared illumination",
        )
        .with_preferred("IR night vision"),
        TerminologyEntry::new("H.265", "compression", "High Efficiency Video Coding"),
        TerminologyEntry::new(
            "PoE",
            "power",
            "Power over Ethernet: power and data on one cable",
        ),
        TerminologyEntry::new(
            "face recognition",
            "analytics",
            "Identifying people by facial features",
        )
        .with_preferred("facial recognition"),
        TerminologyEntry::new(
            "ANPR",
            "analytics",
            "Automatic Number Plate Recognition",
        ),
        TerminologyEntry::new(
            "access control",
            "access",
            "Systems that grant or deny entry to a secured area",
        ),
    ]
}
