//! Fidelity tracking - know what was lost in conversion.

/// Result of a conversion operation, including fidelity warnings.
#[derive(Debug)]
pub struct ConversionResult<T> {
    /// The conversion output.
    pub value: T,
    /// Warnings about information that was lost or transformed.
    pub warnings: Vec<FidelityWarning>,
}

impl<T> ConversionResult<T> {
    /// Create a successful result with no warnings.
    pub fn ok(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    /// Create a result with warnings.
    pub fn with_warnings(value: T, warnings: Vec<FidelityWarning>) -> Self {
        Self { value, warnings }
    }

    /// Add a warning.
    pub fn warn(mut self, warning: FidelityWarning) -> Self {
        self.warnings.push(warning);
        self
    }

    /// Check if there are any warnings.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if any warning is at least as severe as `severity`.
    pub fn has_at_least(&self, severity: Severity) -> bool {
        self.warnings.iter().any(|w| w.severity >= severity)
    }

    /// Map the value, keeping the warnings.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ConversionResult<U> {
        ConversionResult {
            value: f(self.value),
            warnings: self.warnings,
        }
    }
}

/// A warning about fidelity loss during conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct FidelityWarning {
    /// How severe is this warning?
    pub severity: Severity,
    /// What kind of issue?
    pub kind: WarningKind,
    /// Human-readable message.
    pub message: String,
}

impl FidelityWarning {
    /// Create a new warning.
    pub fn new(severity: Severity, kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            severity,
            kind,
            message: message.into(),
        }
    }
}

/// Severity of a fidelity warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Information only, no text lost.
    Info,
    /// Layout or formatting may differ.
    Minor,
    /// The input could not be converted normally.
    Major,
}

/// Kind of fidelity issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningKind {
    /// Element has no dedicated rendering; its children were kept.
    UnknownElement(String),
    /// Non-content element that is never rendered.
    OmittedElement(String),
    /// Style declaration whose value could not be used.
    DroppedStyle { property: String, value: String },
    /// Table row whose cell count differs from the table's column count.
    ColumnMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// Element missing the attribute that names its resource.
    MissingSource(String),
    /// Input was rendered through a fallback path.
    Recovered(String),
    /// Elements nested deeper than the limit were flattened to their text.
    NestingLimit { depth: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Info < Severity::Minor);
        assert!(Severity::Minor < Severity::Major);
    }

    #[test]
    fn test_has_at_least() {
        let result = ConversionResult::ok("x").warn(FidelityWarning::new(
            Severity::Minor,
            WarningKind::ColumnMismatch {
                row: 2,
                expected: 3,
                found: 2,
            },
            "row 2 has 2 cells, expected 3",
        ));
        assert!(result.has_warnings());
        assert!(result.has_at_least(Severity::Minor));
        assert!(!result.has_at_least(Severity::Major));
    }

    #[test]
    fn test_map_keeps_warnings() {
        let result = ConversionResult::ok(1)
            .warn(FidelityWarning::new(
                Severity::Info,
                WarningKind::UnknownElement("foo".into()),
                "unknown element <foo>",
            ))
            .map(|n| n + 1);
        assert_eq!(result.value, 2);
        assert_eq!(result.warnings.len(), 1);
    }
}
