//! Terminal operator: prints numbered candidates and reads one line per prompt.

use std::io::{self, BufRead, Write};

use replanet_core::catalog::Catalog;
use replanet_core::decision::{Decision, Operator, Prompt};

use crate::summary::{environment_label, material_label};

/// Heading and candidate labels for a prompt, in display order.
pub fn describe(catalog: &Catalog, prompt: &Prompt<'_>) -> (String, Vec<String>) {
    let material = |id| material_label(catalog, id);
    match prompt {
        Prompt::Environment {
            current,
            candidates,
        } => (
            format!("Current environment: {}", environment_label(catalog, *current)),
            candidates
                .iter()
                .map(|&id| environment_label(catalog, id))
                .collect(),
        ),
        Prompt::ReplacementProduct {
            current,
            candidates,
        } => (
            format!("Current P2 product: {}", material(*current)),
            candidates.iter().map(|&id| material(id)).collect(),
        ),
        Prompt::ReplacedIntermediate {
            required,
            candidates,
        } => (
            format!("Required P1 input: {}", material(*required)),
            candidates.iter().map(|&id| material(id)).collect(),
        ),
    }
}

pub struct ConsoleOperator<'c, R, W> {
    catalog: &'c Catalog,
    input: R,
    output: W,
}

impl<'c> ConsoleOperator<'c, io::StdinLock<'static>, io::Stdout> {
    pub fn stdio(catalog: &'c Catalog) -> Self {
        Self::new(catalog, io::stdin().lock(), io::stdout())
    }
}

impl<'c, R: BufRead, W: Write> ConsoleOperator<'c, R, W> {
    pub fn new(catalog: &'c Catalog, input: R, output: W) -> Self {
        Self {
            catalog,
            input,
            output,
        }
    }

    fn show(&mut self, prompt: &Prompt<'_>) -> io::Result<()> {
        let (heading, labels) = describe(self.catalog, prompt);
        writeln!(self.output)?;
        writeln!(self.output, "{heading}")?;
        for (i, label) in labels.iter().enumerate() {
            writeln!(self.output, "  {:>2}. {label}", i + 1)?;
        }
        write!(self.output, "{} (number, Enter to skip): ", prompt.kind())?;
        self.output.flush()
    }
}

impl<R: BufRead, W: Write> Operator for ConsoleOperator<'_, R, W> {
    fn decide(&mut self, prompt: &Prompt<'_>) -> Decision {
        if self.show(prompt).is_err() {
            return Decision::Skip;
        }
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => Decision::Skip,
            Ok(_) => Decision::parse(&line),
        }
    }
}
