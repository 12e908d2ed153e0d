//! Validation results.

use std::fmt;

/// Decrypted and shadow value of one output.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OutputValue {
    pub net: String,
    pub decrypted: bool,
    pub shadow: bool,
}

impl OutputValue {
    pub fn is_match(&self) -> bool {
        self.decrypted == self.shadow
    }
}

impl fmt::Display for OutputValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "`{}` decrypted to {} but shadow is {}",
            self.net, self.decrypted as u8, self.shadow as u8
        )
    }
}

/// Every output with its decrypted and shadow value, in output order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ValidationReport {
    outputs: Vec<OutputValue>,
}

impl ValidationReport {
    pub(crate) fn new(outputs: Vec<OutputValue>) -> Self {
        Self { outputs }
    }

    pub fn outputs(&self) -> &[OutputValue] {
        &self.outputs
    }

    /// Decrypted output bits in output order.
    pub fn values(&self) -> impl Iterator<Item = bool> + '_ {
        self.outputs.iter().map(|o| o.decrypted)
    }

    pub fn mismatches(&self) -> impl Iterator<Item = &OutputValue> {
        self.outputs.iter().filter(|o| !o.is_match())
    }

    pub fn is_ok(&self) -> bool {
        self.outputs.iter().all(OutputValue::is_match)
    }
}

/// Renders a list of mismatches for error messages.
pub(crate) fn fmt_mismatches(mismatches: &[OutputValue]) -> String {
    let mut s = format!("{} output(s) differ from the shadow", mismatches.len());
    for m in mismatches {
        s.push_str("; ");
        s.push_str(&m.to_string());
    }
    s
}
