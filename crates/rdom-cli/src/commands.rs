//! CLI command implementations

use rdom_core::cst::ast::{AstNode, AttributeArgument};
use rdom_core::cst::parse_attribute_argument;
use rdom_core::dom::{AttributeValue, GroupIndex, literal_source};
use rdom_core::{
    ConfigLoader, Dom, DomBuilder, DomError, RdomConfig, Result, RoundTripValidator,
    SymbolTable, SyntaxEmitter, parse_source,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::output;

/// Options shared by every command
pub struct GlobalOptions {
    pub config: Option<PathBuf>,
    pub strict: bool,
}

impl GlobalOptions {
    /// Load the configuration for `file`, discovering it from the file's
    /// directory when no explicit path was given
    fn load_config(&self, file: Option<&Path>) -> Result<RdomConfig> {
        let start_dir = file
            .and_then(|f| f.parent())
            .filter(|p| !p.as_os_str().is_empty());
        let mut config = ConfigLoader::load(self.config.as_deref(), start_dir)?;
        if self.strict {
            config.model.get_or_insert_with(Default::default).strict = Some(true);
        }
        Ok(config)
    }
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| DomError::io_error(path, e))
}

/// Parse and build, reporting skipped constructs as warnings
///
/// Returns the model and the number of lexer, parser and model problems.
fn build_model(path: &Path, config: &RdomConfig) -> Result<(Dom, usize)> {
    let source = read_source(path)?;
    let (cst, lexer_errors, parse_errors) = parse_source(&source);
    for err in &lexer_errors {
        warn!("{}: {}", path.display(), err.message);
    }
    for err in &parse_errors {
        warn!("{}: {}", path.display(), err.message);
    }

    let symbols = SymbolTable::collect(&cst);
    let (dom, skipped) = DomBuilder::with_config(&symbols, &config.model_config()).build(&cst)?;
    for err in &skipped {
        warn!("{}: skipped: {}", path.display(), err);
    }
    debug!("Built {} nodes from {}", dom.len(), path.display());
    Ok((dom, lexer_errors.len() + parse_errors.len() + skipped.len()))
}

/// Print the model outline
pub fn dump_command(file: &Path, options: &GlobalOptions) -> Result<()> {
    let config = options.load_config(Some(file))?;
    let (dom, _) = build_model(file, &config)?;
    print!("{}", output::render_tree(&dom, dom.root())?);
    Ok(())
}

/// List `#region` groups and whether they pair up
pub fn regions_command(file: &Path, options: &GlobalOptions) -> Result<()> {
    let config = options.load_config(Some(file))?;
    let (dom, _) = build_model(file, &config)?;
    let index = GroupIndex::build(&dom, dom.root())?;
    if index.is_empty() {
        println!("No regions");
        return Ok(());
    }
    print!("{}", output::render_regions(&dom, &index)?);
    Ok(())
}

/// Re-emit the file from its model, to stdout or in place
///
/// A file is only rewritten when its model covers all of it.
pub fn emit_command(file: &Path, write: bool, options: &GlobalOptions) -> Result<()> {
    let config = options.load_config(Some(file))?;
    let (dom, problems) = build_model(file, &config)?;
    if write && problems > 0 {
        return Err(DomError::LossyRewrite {
            path: file.to_path_buf(),
            problems,
        });
    }
    let text = SyntaxEmitter::new(&config.emit_config()).to_source(&dom, dom.root())?;

    if write {
        fs::write(file, &text).map_err(|e| DomError::io_error(file, e))?;
        info!("Wrote {}", file.display());
    } else {
        print!("{text}");
    }
    Ok(())
}

/// Round-trip each file; `Ok(false)` when any of them is unstable
pub fn check_command(files: &[PathBuf], options: &GlobalOptions) -> Result<bool> {
    let mut all_stable = true;
    for file in files {
        let config = options.load_config(Some(file))?;
        let source = read_source(file)?;
        let report = RoundTripValidator::new(config).validate(&source)?;
        all_stable &= report.stable;
        print!("{}", output::render_report(&file.display().to_string(), &report));
    }
    Ok(all_stable)
}

/// Show how one annotation argument is modelled and re-emitted
pub fn literal_command(argument: &str, owner: &str) -> Result<()> {
    let (root, errors) = parse_attribute_argument(argument);
    if let Some(err) = errors.into_iter().next() {
        return Err(DomError::parse_error(err.message));
    }
    let arg = AttributeArgument::cast(root)
        .ok_or_else(|| DomError::parse_error(format!("Not an attribute argument: `{argument}`")))?;

    let value = AttributeValue::from_syntax(&arg, owner, &SymbolTable::with_predefined())?;
    let rebuilt = rdom_core::CsSyntaxNode::new_root(value.build_syntax()?);

    println!("name:  {}", value.name);
    println!("style: {:?}", value.style);
    println!("kind:  {}", value.value.kind());
    println!("value: {}", literal_source(&value.value)?);
    println!("emit:  {}", rebuilt.text());
    Ok(())
}
