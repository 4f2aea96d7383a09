//! Terminal rendering of models, regions and round-trip reports

use colored::*;
use rdom_core::dom::{Attribute, AttributeList, GroupIndex, NamingStyle, Pairing};
use rdom_core::{Dom, NodeData, NodeId, Result, RoundTripReport};
use std::fmt::Write as _;

/// Indented outline of a model, one member per line
pub fn render_tree(dom: &Dom, root: NodeId) -> Result<String> {
    let mut out = String::new();
    render_node(dom, root, 0, &mut out)?;
    Ok(out)
}

fn render_node(dom: &Dom, id: NodeId, depth: usize, out: &mut String) -> Result<()> {
    let data = dom.data(id)?;
    let pad = "  ".repeat(depth);
    let _ = writeln!(out, "{pad}{} {}", node_label(data), id.to_string().dimmed());

    for list in attributes_of(data) {
        render_attributes(list, &format!("{pad}  "), out);
    }
    if dom.is_container(id) {
        for &member in dom.members(id)? {
            render_node(dom, member, depth + 1, out)?;
        }
    }
    Ok(())
}

fn node_label(data: &NodeData) -> String {
    match data {
        NodeData::CompilationUnit(_) => "CompilationUnit".bold().to_string(),
        NodeData::UsingDirective(using) => format!("{} {}", "using".blue(), using.name),
        NodeData::Namespace(ns) => format!("{} {}", "namespace".blue(), ns.name.bold()),
        NodeData::Type(decl) => {
            let mut label = format!("{} {}", decl.kind.keyword().blue(), decl.name.bold());
            if let Some(bases) = &decl.base_list {
                let _ = write!(label, " : {bases}");
            }
            label
        }
        NodeData::Field(field) => {
            let mut label = format!("{} {} {}", "field".cyan(), field.type_name, field.name);
            if let Some(init) = &field.initializer {
                let _ = write!(label, " = {init}");
            }
            label
        }
        NodeData::Method(method) => {
            let returns = method.return_type.as_deref().unwrap_or("ctor");
            format!(
                "{} {} {}{}",
                "method".cyan(),
                returns,
                method.name,
                method.parameters
            )
        }
        NodeData::Block(_) => "block".cyan().to_string(),
        NodeData::Statement(statement) => format!("{} {}", "stmt".cyan(), statement.text),
        NodeData::Comment(comment) => comment.source().green().to_string(),
        NodeData::VerticalWhitespace(white) => format!("blank x{}", white.count).dimmed().to_string(),
        NodeData::BlockStart(start) => {
            format!("{} {} {}", "#region".magenta(), start.text, pairing_label(start.pairing))
        }
        NodeData::BlockEnd(end) => format!("{} {}", "#endregion".magenta(), pairing_label(end.pairing)),
    }
}

fn attributes_of(data: &NodeData) -> &[AttributeList] {
    match data {
        NodeData::Type(decl) => &decl.attributes,
        NodeData::Field(field) => &field.attributes,
        NodeData::Method(method) => &method.attributes,
        _ => &[],
    }
}

fn render_attributes(list: &AttributeList, pad: &str, out: &mut String) {
    for attribute in &list.attributes {
        let _ = writeln!(out, "{pad}{}", attribute_label(attribute));
    }
}

fn attribute_label(attribute: &Attribute) -> String {
    let values: Vec<String> = attribute
        .values
        .iter()
        .map(|v| {
            let style = match v.style {
                NamingStyle::Positional => "positional",
                NamingStyle::NameEquals => "name =",
                NamingStyle::NameColon => "name:",
            };
            format!("{} = {} ({}, {})", v.name, v.value, v.value.kind(), style)
        })
        .collect();
    if values.is_empty() {
        format!("@{}", attribute.name.yellow())
    } else {
        format!("@{} {}", attribute.name.yellow(), values.join("; "))
    }
}

fn pairing_label(pairing: Pairing) -> String {
    match pairing {
        Pairing::Paired(group) => format!("[{group}]").dimmed().to_string(),
        Pairing::Unresolved { original } => format!("[unresolved, was {original}]").red().to_string(),
    }
}

/// Region table: one line per group
pub fn render_regions(dom: &Dom, index: &GroupIndex) -> Result<String> {
    let mut out = String::new();
    for (group, entry) in index.regions() {
        let name = match entry.start.map(|s| dom.data(s)).transpose()? {
            Some(NodeData::BlockStart(start)) => start.text.clone(),
            _ => String::new(),
        };
        let status = match (entry.start, entry.end) {
            (Some(start), Some(end)) => {
                let valid = rdom_core::dom::semantically_valid(dom, start)?;
                let span = format!("{start}..{end}");
                if valid {
                    format!("{} {span}", "ok".green())
                } else {
                    format!("{} {span}", "crosses containers".yellow())
                }
            }
            (Some(start), None) => format!("{} {start}", "missing #endregion".red()),
            (None, Some(end)) => format!("{} {end}", "missing #region".red()),
            (None, None) => "empty".to_string(),
        };
        let _ = writeln!(out, "{group}  {:<20} {status}", name);
    }
    Ok(out)
}

/// Human summary of a round trip
pub fn render_report(label: &str, report: &RoundTripReport) -> String {
    let mut out = String::new();
    let verdict = if !report.stable {
        "unstable".red().bold()
    } else if report.is_identical() {
        "identical".green()
    } else {
        "stable".green()
    };
    let _ = writeln!(out, "{label}: {verdict}");
    for difference in &report.differences {
        let _ = writeln!(out, "  {difference}");
    }
    out
}
