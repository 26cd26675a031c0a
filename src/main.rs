//! Pipewright CLI - pipelines-as-code tooling
//!
//! Usage: pipewright <COMMAND>
//!
//! Commands:
//!   template-api  Generate typed Rust references for checked-in YAML templates

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use pipewright::template::{method_name, update_template_api};

/// Pipewright - pipelines-as-code publisher and template API generator
#[derive(Parser, Debug)]
#[command(name = "pipewright")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate typed Rust references for checked-in YAML templates
    TemplateApi {
        /// Rust source file to create or update
        #[arg(short, long)]
        output: PathBuf,

        /// Name of the generated struct (defaults from the output file name)
        #[arg(short, long)]
        name: Option<String>,

        /// Template files to generate references for
        #[arg(required = true)]
        templates: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::TemplateApi {
            output,
            name,
            templates,
        } => cmd_template_api(&output, name, &templates),
    }
}

fn cmd_template_api(output: &Path, name: Option<String>, templates: &[PathBuf]) -> Result<()> {
    let struct_name = match name {
        Some(name) => name,
        None => default_struct_name(output)?,
    };

    for template in templates {
        if !template.exists() {
            bail!("template {} does not exist", template.display());
        }

        println!("Processing {}..", template.display());
        update_template_api(output, &struct_name, template).with_context(|| {
            format!("failed to generate the API for {}", template.display())
        })?;
        println!("API for template {} created", template.display());
    }

    Ok(())
}

fn default_struct_name(output: &Path) -> Result<String> {
    let stem = output
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .with_context(|| format!("cannot derive a struct name from {}", output.display()))?;
    Ok(method_name(stem))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_template_api() {
        let cli = Cli::try_parse_from([
            "pipewright",
            "template-api",
            "--output",
            "src/templates.rs",
            "templates/build.yml",
        ])
        .unwrap();

        let Commands::TemplateApi {
            output,
            name,
            templates,
        } = cli.command;
        assert_eq!(output, PathBuf::from("src/templates.rs"));
        assert_eq!(name, None);
        assert_eq!(templates, vec![PathBuf::from("templates/build.yml")]);
    }

    #[test]
    fn test_cli_parse_template_api_with_name() {
        let cli = Cli::try_parse_from([
            "pipewright",
            "template-api",
            "--output",
            "src/templates.rs",
            "--name",
            "PipelineTemplates",
            "a.yml",
            "b.yml",
        ])
        .unwrap();

        let Commands::TemplateApi { name, templates, .. } = cli.command;
        assert_eq!(name.as_deref(), Some("PipelineTemplates"));
        assert_eq!(templates.len(), 2);
    }

    #[test]
    fn test_cli_requires_at_least_one_template() {
        let result =
            Cli::try_parse_from(["pipewright", "template-api", "--output", "src/templates.rs"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_default_struct_name_from_output_stem() {
        assert_eq!(
            default_struct_name(Path::new("src/pipeline-templates.rs")).unwrap(),
            "PipelineTemplates"
        );
        assert_eq!(default_struct_name(Path::new("templates.rs")).unwrap(), "Templates");
    }
}
