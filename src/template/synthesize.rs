//! Generated method synthesis
//!
//! Turns a parsed template into the lines of one factory function that
//! builds the matching `Template<_>` reference. The first line of every
//! block is a marker comment naming the source template, which is how the
//! merge step later finds and replaces the block.

use crate::template::parser::{ParsedTemplate, TemplateParameter};

/// Derive the generated function name from the template's path
///
/// The file stem is recased to PascalCase: separators are dropped and the
/// letter after each one is capitalized. `deploy_to-prod.v2.yml` becomes
/// `DeployToProdV2`. A stem starting with a digit gets a `T` prefix so the
/// result is always a valid identifier.
pub fn method_name(repo_relative_path: &str) -> String {
    let file = repo_relative_path
        .rsplit('/')
        .next()
        .unwrap_or(repo_relative_path);
    let stem = file
        .strip_suffix(".yaml")
        .or_else(|| file.strip_suffix(".yml"))
        .unwrap_or(file);

    let mut name = String::with_capacity(stem.len());
    let mut upper_next = true;
    for c in stem.chars() {
        if c.is_ascii_alphanumeric() {
            if upper_next {
                name.push(c.to_ascii_uppercase());
            } else {
                name.push(c);
            }
            upper_next = false;
        } else {
            upper_next = true;
        }
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, 'T');
    }
    name
}

/// Render the full method block for one template, marker line included
///
/// The block ends with an empty line so consecutive blocks stay separated
/// after merging.
pub fn method_block(repo_relative_path: &str, template: &ParsedTemplate) -> Vec<String> {
    let name = method_name(repo_relative_path);
    let category = template.category.type_name();

    let mut lines = vec![format!("    // {repo_relative_path}")];

    if template.parameters.len() <= 3 {
        let arguments: Vec<String> = template.parameters.iter().map(render_argument).collect();
        lines.push(format!(
            "    pub fn {name}({}) -> Template<{category}> {{",
            arguments.join(", ")
        ));
    } else {
        lines.push(format!("    pub fn {name}("));
        for parameter in &template.parameters {
            lines.push(format!("        {},", render_argument(parameter)));
        }
        lines.push(format!("    ) -> Template<{category}> {{"));
    }

    if template.parameters.is_empty() {
        lines.push(format!("        Template::new(\"{repo_relative_path}\")"));
    } else {
        lines.push("        Template::with_parameters(".to_string());
        lines.push(format!("            \"{repo_relative_path}\","));
        lines.push("            [".to_string());
        for parameter in &template.parameters {
            lines.push(format!("                {},", render_entry(parameter)));
        }
        lines.push("            ],".to_string());
        lines.push("        )".to_string());
    }

    lines.push("    }".to_string());
    lines.push(String::new());
    lines
}

/// Defaulted parameters surface as `Option<T>` so callers can pass `None`
fn render_argument(parameter: &TemplateParameter) -> String {
    if parameter.has_default() {
        format!("{}: Option<{}>", parameter.name, parameter.rust_type)
    } else {
        format!("{}: {}", parameter.name, parameter.rust_type)
    }
}

/// One parameter-map entry; defaults are applied in the body so every
/// declared parameter always appears in the emitted map
fn render_entry(parameter: &TemplateParameter) -> String {
    let name = &parameter.name;
    match &parameter.default {
        Some(literal) if parameter.rust_type == "String" => {
            format!("(\"{name}\", {name}.unwrap_or_else(|| {literal}.to_string()).into())")
        }
        Some(literal) => format!("(\"{name}\", {name}.unwrap_or({literal}).into())"),
        None => format!("(\"{name}\", {name}.into())"),
    }
}
