//! Tests for CST construction over whole files

use super::*;

const SAMPLE: &str = r#"using System;
using System.Collections.Generic;

namespace Samples.Domain
{
    // Holds customer data
    [Serializable]
    [Table(Name = "customers", Schema: "crm")]
    public class Customer : EntityBase
    {
        #region Fields
        private int id = 0;
        private string name;
        #endregion

        /* Creates a customer */
        public Customer(int id)
        {
            this.id = id;
        }

        public string Describe()
        {
            if (name == null) { return "?"; } else { return name; }
        }
    }
}
"#;

#[test]
fn test_sample_is_lossless() {
    let (cst, lexer_errors, parse_errors) = parse_source(SAMPLE);
    assert!(lexer_errors.is_empty(), "{lexer_errors:?}");
    assert!(parse_errors.is_empty(), "{parse_errors:?}");
    assert_eq!(cst.text().to_string(), SAMPLE);
}

#[test]
fn test_sample_structure() {
    let (cst, _, _) = parse_source(SAMPLE);

    let count = |kind: CsSyntaxKind| cst.descendants().filter(|n| n.kind() == kind).count();
    assert_eq!(count(CsSyntaxKind::UsingDirective), 2);
    assert_eq!(count(CsSyntaxKind::NamespaceDecl), 1);
    assert_eq!(count(CsSyntaxKind::TypeDecl), 1);
    assert_eq!(count(CsSyntaxKind::FieldDecl), 2);
    assert_eq!(count(CsSyntaxKind::MethodDecl), 2);
    assert_eq!(count(CsSyntaxKind::Statement), 2);
    assert_eq!(count(CsSyntaxKind::RegionStart), 1);
    assert_eq!(count(CsSyntaxKind::RegionEnd), 1);
    assert_eq!(count(CsSyntaxKind::Attribute), 2);
    assert_eq!(count(CsSyntaxKind::NameEquals), 1);
    assert_eq!(count(CsSyntaxKind::NameColon), 1);
    assert_eq!(count(CsSyntaxKind::Error), 0);
}

#[test]
fn test_every_member_ends_at_a_line_break() {
    let (cst, _, _) = parse_source(SAMPLE);
    for member in cst
        .descendants()
        .filter(|n| ast::Member::cast(n.clone()).is_some())
        // A method body is part of its method, not a list member
        .filter(|n| n.parent().map(|p| p.kind()) != Some(CsSyntaxKind::MethodDecl))
    {
        assert!(
            member.text().to_string().ends_with('\n'),
            "member {:?} does not own its line break",
            member.kind()
        );
    }
}

#[test]
fn test_flat_build_matches_source() {
    let (tokens, _) = lex_with_trivia(SAMPLE);
    assert_eq!(tokens.last().map(|t| t.kind), Some(CsSyntaxKind::Eof));
    assert_eq!(build_cst_from_tokens(&tokens).text().to_string(), SAMPLE);
}

#[test]
fn test_empty_source() {
    let (cst, lexer_errors, parse_errors) = parse_source("");
    assert!(lexer_errors.is_empty());
    assert!(parse_errors.is_empty());
    assert_eq!(cst.kind(), CsSyntaxKind::CompilationUnit);
    assert_eq!(cst.children().count(), 0);
}
