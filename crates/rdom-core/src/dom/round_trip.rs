//! Parse, build, emit, and check that nothing was lost
//!
//! The validator runs the whole pipeline twice: once on the original source
//! and once on what the first pass emitted. The round trip is *stable* when
//! the first pass modelled the whole input and both models describe the same
//! program (`Dom::same_intent`).

use super::emit::SyntaxEmitter;
use super::factory::DomBuilder;
use super::tree::{Dom, NodeData, NodeId};
use crate::config::RdomConfig;
use crate::cst::{CsSyntaxNode, parse_source};
use crate::error::DomError;
use crate::result::Result;
use crate::semantic::SymbolTable;

/// Outcome of one round trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundTripReport {
    pub original: String,
    pub emitted: String,
    /// Nothing was skipped and re-building from the emitted text gives an
    /// equivalent model
    pub stable: bool,
    /// Constructs the first pass could not model, then where the two models
    /// disagree, outermost first
    pub differences: Vec<String>,
}

impl RoundTripReport {
    /// Emitted text is byte-identical to the input
    pub fn is_identical(&self) -> bool {
        self.original == self.emitted
    }
}

/// Runs source through build and emission twice and compares the models
#[derive(Debug, Clone, Default)]
pub struct RoundTripValidator {
    config: RdomConfig,
}

impl RoundTripValidator {
    pub fn new(config: RdomConfig) -> Self {
        Self { config }
    }

    pub fn validate(&self, source: &str) -> Result<RoundTripReport> {
        let emitter = SyntaxEmitter::new(&self.config.emit_config());

        let (first, lost) = self.build(source)?;
        let emitted = emitter.to_source(&first, first.root())?;
        let (second, reparse_errors) = self.build(&emitted)?;

        // Whatever the first pass dropped is also missing from the emitted
        // text, so the model comparison alone cannot see it
        let mut differences: Vec<String> = lost
            .iter()
            .map(|err| format!("not modelled: {err}"))
            .chain(reparse_errors.iter().map(|err| format!("re-parse: {err}")))
            .collect();
        collect_differences(&first, first.root(), &second, second.root(), "", &mut differences);

        let stable = differences.is_empty();
        if stable {
            tracing::debug!("Round trip stable ({} bytes emitted)", emitted.len());
        } else {
            tracing::warn!("Round trip unstable: {} differences", differences.len());
        }

        Ok(RoundTripReport {
            original: source.to_string(),
            emitted,
            stable,
            differences,
        })
    }

    fn build(&self, source: &str) -> Result<(Dom, Vec<DomError>)> {
        let (cst, lexer_errors, parse_errors) = parse_source(source);
        let mut errors: Vec<DomError> = lexer_errors
            .into_iter()
            .map(|e| DomError::parse_error(e.message))
            .chain(parse_errors.into_iter().map(|e| DomError::parse_error(e.message)))
            .collect();

        let (dom, skipped) = self.build_cst(&cst)?;
        errors.extend(skipped);
        Ok((dom, errors))
    }

    fn build_cst(&self, cst: &CsSyntaxNode) -> Result<(Dom, Vec<DomError>)> {
        let symbols = SymbolTable::collect(cst);
        DomBuilder::with_config(&symbols, &self.config.model_config()).build(cst)
    }
}

/// Short label for a node in a difference path
pub fn describe(data: &NodeData) -> String {
    let name = match data {
        NodeData::UsingDirective(using) => Some(using.name.as_str()),
        NodeData::Namespace(ns) => Some(ns.name.as_str()),
        NodeData::Type(ty) => Some(ty.name.as_str()),
        NodeData::Field(field) => Some(field.name.as_str()),
        NodeData::Method(method) => Some(method.name.as_str()),
        NodeData::BlockStart(start) => Some(start.text.as_str()),
        _ => None,
    };
    match name {
        Some(name) if !name.is_empty() => format!("{} {}", data.kind_name(), name),
        _ => data.kind_name().to_string(),
    }
}

fn collect_differences(
    left: &Dom,
    a: NodeId,
    right: &Dom,
    b: NodeId,
    path: &str,
    out: &mut Vec<String>,
) {
    let (Ok(left_data), Ok(right_data)) = (left.data(a), right.data(b)) else {
        out.push(format!("{path}: missing node"));
        return;
    };
    let here = format!("{path}/{}", describe(left_data));

    // Compare the node itself without its members
    let (Some(left_members), Some(right_members)) = (left_data.members(), right_data.members())
    else {
        if !left.same_intent(a, right, b) {
            out.push(format!("{here}: became {}", describe(right_data)));
        }
        return;
    };

    if left_members.len() != right_members.len() {
        out.push(format!(
            "{here}: {} members became {}",
            left_members.len(),
            right_members.len()
        ));
        return;
    }
    for (x, y) in left_members.iter().zip(right_members.iter()) {
        collect_differences(left, x, right, y, &here, out);
    }
}
